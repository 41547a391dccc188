//! Terminal tables for resources and dashboard tiles.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use prep_core::derive::{PLACEHOLDER, format_count, format_number};
use prep_core::{
    ActivityPoint, DashboardKey, DashboardTiles, EventBadge, EventRow, StatCard,
    SubjectAccuracyBar, TileState, WeakTopicRow,
};
use prep_model::{
    AdminUserList, AiSettings, Coupon, ExamConfig, PodcastEpisode, Question, Subject, Topic,
};

// ============================================================================
// Resources
// ============================================================================

pub fn subjects_table(subjects: &[Subject]) -> Table {
    let mut table = styled_table(&["ID", "Name", "Exam", "Active"]);
    for subject in subjects {
        table.add_row(vec![
            dim_cell(subject.id.as_str()),
            Cell::new(&subject.name),
            Cell::new(subject.exam.label()),
            flag_cell(subject.is_active),
        ]);
    }
    align_column(&mut table, 3, CellAlignment::Center);
    table
}

pub fn topics_table(topics: &[Topic], subjects: &[Subject]) -> Table {
    let mut table = styled_table(&["ID", "Name", "Subject", "Active"]);
    for topic in topics {
        let subject = subjects
            .iter()
            .find(|subject| subject.id == topic.subject_id)
            .map_or_else(|| topic.subject_id.to_string(), |subject| subject.name.clone());
        table.add_row(vec![
            dim_cell(topic.id.as_str()),
            Cell::new(&topic.name),
            Cell::new(subject),
            flag_cell(topic.is_active),
        ]);
    }
    align_column(&mut table, 3, CellAlignment::Center);
    table
}

pub fn questions_table(questions: &[Question]) -> Table {
    let mut table = styled_table(&["ID", "Question", "Exam", "Answer", "Difficulty", "Active"]);
    for question in questions {
        let answer = question.correct_option_text().unwrap_or(PLACEHOLDER);
        table.add_row(vec![
            dim_cell(&question.id),
            Cell::new(&question.question_text),
            Cell::new(question.exam.label()),
            Cell::new(format!("{}. {answer}", question.correct_option)),
            optional_cell(question.difficulty_level),
            flag_cell(question.is_active),
        ]);
    }
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    table
}

pub fn exams_table(exams: &[ExamConfig]) -> Table {
    let mut table = styled_table(&["ID", "Name", "Exam", "Type", "Status", "Questions", "Minutes"]);
    for exam in exams {
        table.add_row(vec![
            dim_cell(&exam.id),
            Cell::new(&exam.name),
            Cell::new(exam.exam.label()),
            Cell::new(exam.kind.map_or(PLACEHOLDER, |kind| kind.label())),
            Cell::new(exam.status.map_or(PLACEHOLDER, |status| status.label())),
            optional_cell(exam.num_questions),
            optional_cell(exam.time_limit_minutes),
        ]);
    }
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    table
}

pub fn coupons_table(coupons: &[Coupon]) -> Table {
    let mut table = styled_table(&["Code", "Type", "Amount", "Expires", "Active"]);
    for coupon in coupons {
        table.add_row(vec![
            Cell::new(&coupon.code).add_attribute(Attribute::Bold),
            Cell::new(&coupon.kind),
            coupon
                .amount
                .map_or_else(|| dim_cell(PLACEHOLDER), |amount| Cell::new(format_number(amount))),
            optional_cell(coupon.expires_at.as_deref()),
            flag_cell(coupon.is_active),
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    table
}

pub fn podcasts_table(podcasts: &[PodcastEpisode]) -> Table {
    let mut table = styled_table(&["ID", "Title", "Exam", "Tags", "Active"]);
    for podcast in podcasts {
        table.add_row(vec![
            dim_cell(&podcast.id),
            Cell::new(&podcast.title),
            Cell::new(podcast.exam.map_or(PLACEHOLDER, |exam| exam.label())),
            Cell::new(podcast.tags.join(", ")),
            flag_cell(podcast.is_active),
        ]);
    }
    align_column(&mut table, 4, CellAlignment::Center);
    table
}

pub fn users_table(users: &AdminUserList) -> Table {
    let mut table = styled_table(&["ID", "Name", "Email", "Role", "Status"]);
    for user in &users.items {
        table.add_row(vec![
            dim_cell(&user.id),
            Cell::new(user.display_label()),
            optional_cell(user.email.as_deref()),
            Cell::new(user.role.map_or(PLACEHOLDER, |role| role.as_str())),
            optional_cell(user.status.as_deref()),
        ]);
    }
    table
}

/// `Page 2 · 25 per page · 130 users`, omitting unknown parts.
pub fn users_footer(users: &AdminUserList) -> String {
    let mut parts = Vec::new();
    if let Some(page) = users.page {
        parts.push(format!("Page {page}"));
    }
    if let Some(size) = users.page_size {
        parts.push(format!("{size} per page"));
    }
    if let Some(total) = users.total {
        parts.push(format!("{} users", format_count(total)));
    }
    parts.join(" · ")
}

pub fn ai_settings_table(settings: &AiSettings) -> Table {
    let mut table = styled_table(&["Setting", "Value"]);
    let intervals = settings.revision_intervals_days.as_ref().map(|days| {
        days.iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    });
    let rows: [(&str, Option<String>); 6] = [
        (
            "Include guessed correct",
            settings.include_guessed_correct.map(yes_no),
        ),
        ("Revision enabled", settings.revision_enabled.map(yes_no)),
        ("Revision intervals (days)", intervals),
        (
            "Strong threshold (%)",
            settings.strong_threshold_percent.map(format_number),
        ),
        (
            "Weakness min attempts",
            settings.weakness_min_attempts.map(|value| value.to_string()),
        ),
        (
            "Weakness threshold (%)",
            settings.weakness_threshold_percent.map(format_number),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), optional_cell(value)]);
    }
    table
}

// ============================================================================
// Dashboard
// ============================================================================

pub fn stat_cards_table(cards: &[StatCard]) -> Table {
    let mut table = styled_table(&["Metric", "Value", "Note"]);
    for card in cards {
        table.add_row(vec![
            Cell::new(&card.title),
            Cell::new(&card.value).add_attribute(Attribute::Bold),
            dim_cell(&card.caption),
        ]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

pub fn series_table(points: &[ActivityPoint]) -> Table {
    let mut table = styled_table(&["Date", "Value"]);
    for point in points {
        table.add_row(vec![
            Cell::new(&point.date),
            Cell::new(format_number(point.value)),
        ]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

pub fn accuracy_table(bars: &[SubjectAccuracyBar]) -> Table {
    let mut table = styled_table(&["Subject", "Accuracy", ""]);
    for bar in bars {
        table.add_row(vec![
            Cell::new(&bar.subject),
            Cell::new(format!("{}%", bar.accuracy)),
            Cell::new("█".repeat(usize::from(bar.accuracy / 5))).fg(Color::Cyan),
        ]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

pub fn weak_topics_table(rows: &[WeakTopicRow]) -> Table {
    let mut table = styled_table(&["Subject", "Topic", "Accuracy", "Attempts"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.subject),
            Cell::new(&row.topic),
            Cell::new(format!("{}%", row.accuracy)).fg(Color::Red),
            Cell::new(&row.attempts),
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table
}

pub fn events_table(rows: &[EventRow]) -> Table {
    let mut table = styled_table(&["Name", "Exam", "Type", "Start Date", "Registered", "Status"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(&row.exam),
            Cell::new(&row.kind),
            Cell::new(&row.start),
            Cell::new(&row.registered),
            badge_cell(&row.status, row.badge),
        ]);
    }
    align_column(&mut table, 4, CellAlignment::Right);
    table
}

/// Every tile in display order, each under its own heading.
pub fn dashboard_report(key: DashboardKey, tiles: &DashboardTiles) -> String {
    let range = key.range.label();
    let sections = [
        tile_section("Overview", &tiles.overview, "No overview data.", |cards| {
            stat_cards_table(cards)
        }),
        tile_section(
            &format!("Active Users ({range})"),
            &tiles.active_users,
            "No activity in this range.",
            |points| series_table(points),
        ),
        tile_section(
            &format!("Questions Answered ({range})"),
            &tiles.questions_answered,
            "No attempts in this range.",
            |points| series_table(points),
        ),
        tile_section(
            "Subject Accuracy",
            &tiles.subject_accuracy,
            "No accuracy data.",
            |bars| accuracy_table(bars),
        ),
        tile_section(
            "Weak Topics",
            &tiles.weak_topics,
            "No weak topics.",
            |rows| weak_topics_table(rows),
        ),
        tile_section(
            "Upcoming Events",
            &tiles.upcoming_events,
            "No upcoming events.",
            |rows| events_table(rows),
        ),
        tile_section("Referrals", &tiles.referrals, "No referral data.", |cards| {
            stat_cards_table(cards)
        }),
    ];
    let mut report = format!("Dashboard · {} · {range}\n", key.exam.label());
    for section in sections {
        report.push('\n');
        report.push_str(&section);
    }
    report
}

fn tile_section<T>(
    title: &str,
    state: &TileState<T>,
    empty_message: &str,
    render: impl FnOnce(&T) -> Table,
) -> String {
    let body = match state {
        TileState::Ready(data) => render(data).to_string(),
        TileState::Loading {
            previous: Some(data),
        } => format!("{}\n(refreshing)", render(data)),
        TileState::Loading { previous: None } => "...".to_string(),
        TileState::Empty => empty_message.to_string(),
        TileState::Error(error) => format!("error: {}", error.user_message()),
    };
    format!("{title}\n{body}\n")
}

// ============================================================================
// Cells and styling
// ============================================================================

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(headers.iter().map(|label| header_cell(label)));
    apply_table_style(&mut table);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn optional_cell<T: ToString>(value: Option<T>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell(PLACEHOLDER),
    }
}

fn flag_cell(value: Option<bool>) -> Cell {
    match value {
        Some(true) => Cell::new("yes").fg(Color::Green),
        Some(false) => Cell::new("no").fg(Color::Red),
        None => dim_cell(PLACEHOLDER),
    }
}

fn badge_cell(label: &str, badge: EventBadge) -> Cell {
    match badge {
        EventBadge::Default => Cell::new(label)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        EventBadge::Outline => Cell::new(label).fg(Color::Cyan),
        EventBadge::Secondary => dim_cell(label),
    }
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}
