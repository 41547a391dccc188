//! Pure derivations from server aggregates to chart and table rows.
//!
//! Every function here is total: absent or malformed input degrades to an
//! empty list, a zero, or a placeholder string, never a panic.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use prep_client::WEAK_TOPICS_LIMIT;
use prep_model::{
    AdminEvent, AdminReferralSummary, AnalyticsOverview, AnalyticsTimeSeries, DateRange,
    ExamCategory, ExamConfig, ExamSelection, ExamStatus, PodcastEpisode, Question, Subject,
    SubjectAccuracy, SubjectAccuracyResponse, Topic, WeakTopic,
};
use serde::Serialize;

/// Shown where a metric is absent.
pub const PLACEHOLDER: &str = "—";

// ============================================================================
// Time series
// ============================================================================

/// One chart point with a display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityPoint {
    pub date: String,
    pub value: f64,
}

pub fn format_time_series(series: Option<&AnalyticsTimeSeries>) -> Vec<ActivityPoint> {
    let Some(series) = series else {
        return Vec::new();
    };
    series
        .points
        .iter()
        .map(|point| ActivityPoint {
            date: point
                .date
                .as_deref()
                .map(format_date_label)
                .unwrap_or_default(),
            value: point.value.unwrap_or(0.0),
        })
        .collect()
}

/// `2024-03-05` → `05 Mar`. Unparsable input is returned unchanged.
pub fn format_date_label(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match parse_timestamp(raw) {
        Some(parsed) => parsed.format("%d %b").to_string(),
        None => raw.to_string(),
    }
}

/// Event start as `05 Mar 2024 · 09:30`, or the placeholder when absent.
pub fn format_event_start(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        None | Some("") => PLACEHOLDER.to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(parsed) => parsed.format("%d %b %Y · %H:%M").to_string(),
            None => raw.to_string(),
        },
    }
}

/// RFC 3339 keeps the wall-clock time of its own offset.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

// ============================================================================
// Percentages and numbers
// ============================================================================

/// Accuracy on a 0-100 scale. Values up to 1 are fractions.
pub fn normalized_accuracy(value: Option<f64>) -> f64 {
    match value {
        Some(value) if !value.is_nan() => {
            let scaled = if value <= 1.0 { value * 100.0 } else { value };
            scaled.clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

/// Rounded accuracy in `0..=100`; `None` and NaN are 0.
pub fn to_percent(value: Option<f64>) -> u8 {
    normalized_accuracy(value).round() as u8
}

/// `1234567` → `1,234,567`.
pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string())
}

/// en-US style: grouped integer part, at most three fraction digits,
/// trailing zeros dropped.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    let sign = if rounded < 0.0 { "-" } else { "" };
    let text = format!("{:.3}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let integer = group_digits(integer);
    if fraction.is_empty() {
        format!("{sign}{integer}")
    } else {
        format!("{sign}{integer}.{fraction}")
    }
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn count_or_placeholder(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), format_number)
}

// ============================================================================
// Cards
// ============================================================================

/// A titled metric with a caption line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub caption: String,
}

impl StatCard {
    fn new(title: impl Into<String>, value: String, caption: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value,
            caption: caption.into(),
        }
    }
}

/// Total referrals and rewards paid.
///
/// The range caption prefers the range the server reports and falls back to
/// `fallback_range`, the label of the locally selected range.
pub fn build_referral_snapshot(
    summary: Option<&AdminReferralSummary>,
    fallback_range: &str,
) -> [StatCard; 2] {
    let range = summary
        .and_then(|summary| summary.range.as_deref())
        .filter(|range| !range.is_empty())
        .unwrap_or(fallback_range);
    let rewards = summary
        .and_then(|summary| summary.rewards_paid)
        .map_or_else(
            || PLACEHOLDER.to_string(),
            |paid| format!("₹{}", format_number(paid)),
        );
    let rewards_caption = summary
        .and_then(|summary| summary.new_users)
        .map_or_else(
            || "Cash + token payouts".to_string(),
            |users| format!("{} new users", format_number(users)),
        );

    [
        StatCard::new(
            "Total Referrals",
            count_or_placeholder(summary.and_then(|summary| summary.total_referrals)),
            format!("Range: {range}"),
        ),
        StatCard::new("Referral Rewards Paid (₹)", rewards, rewards_caption),
    ]
}

/// The six KPI cards of the overview tile.
pub fn overview_cards(overview: Option<&AnalyticsOverview>, range: DateRange) -> [StatCard; 6] {
    let label = range.label();
    let count = |pick: fn(&AnalyticsOverview) -> Option<f64>| {
        count_or_placeholder(overview.and_then(pick))
    };
    let decimal = |pick: fn(&AnalyticsOverview) -> Option<f64>| {
        overview
            .and_then(pick)
            .map_or_else(|| PLACEHOLDER.to_string(), |value| format!("{value:.1}"))
    };
    let accuracy = overview
        .and_then(|overview| overview.average_accuracy)
        .map_or_else(|| PLACEHOLDER.to_string(), |value| format!("{value:.1}%"));

    [
        StatCard::new(
            "Total Users",
            count(|overview| overview.total_users),
            "All-time registrations",
        ),
        StatCard::new(
            format!("Active Users ({label})"),
            count(|overview| overview.active_users),
            "Logged activity in selected range",
        ),
        StatCard::new(
            "Questions Answered",
            count(|overview| overview.questions_answered),
            format!("{label} attempts"),
        ),
        StatCard::new("Average Accuracy", accuracy, format!("{label} average")),
        StatCard::new(
            "Avg Study Minutes",
            decimal(|overview| overview.average_study_minutes),
            "Per active learner",
        ),
        StatCard::new(
            "Total Rewards",
            count(|overview| overview.total_rewards),
            "Lifetime tokens/coins",
        ),
    ]
}

// ============================================================================
// Exam filtering
// ============================================================================

/// Items that carry an exam category.
pub trait ExamScoped {
    fn exam(&self) -> Option<ExamCategory>;
}

impl ExamScoped for Subject {
    fn exam(&self) -> Option<ExamCategory> {
        Some(self.exam)
    }
}

impl ExamScoped for Question {
    fn exam(&self) -> Option<ExamCategory> {
        Some(self.exam)
    }
}

impl ExamScoped for ExamConfig {
    fn exam(&self) -> Option<ExamCategory> {
        Some(self.exam)
    }
}

impl ExamScoped for PodcastEpisode {
    fn exam(&self) -> Option<ExamCategory> {
        self.exam
    }
}

impl ExamScoped for WeakTopic {
    fn exam(&self) -> Option<ExamCategory> {
        self.exam
    }
}

impl ExamScoped for AdminEvent {
    fn exam(&self) -> Option<ExamCategory> {
        self.exam
    }
}

impl ExamScoped for SubjectAccuracy {
    fn exam(&self) -> Option<ExamCategory> {
        self.exam
    }
}

/// Identity for `ALL`; otherwise the items of the selected exam, in order.
/// Items without an exam only survive `ALL`.
pub fn filter_by_exam<T: ExamScoped>(items: Vec<T>, exam: ExamSelection) -> Vec<T> {
    let Some(selected) = exam.as_filter() else {
        return items;
    };
    items
        .into_iter()
        .filter(|item| item.exam() == Some(selected))
        .collect()
}

/// Rows the server already scoped to `exam`: only rows naming a different
/// exam are dropped, rows without an exam are kept.
pub fn filter_server_scoped<T: ExamScoped>(items: Vec<T>, exam: ExamSelection) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| item.exam().is_none_or(|category| exam.matches(category)))
        .collect()
}

/// Topics whose parent subject belongs to the selected exam.
pub fn filter_topics_by_exam(
    topics: Vec<Topic>,
    subjects: &[Subject],
    exam: ExamSelection,
) -> Vec<Topic> {
    let Some(selected) = exam.as_filter() else {
        return topics;
    };
    topics
        .into_iter()
        .filter(|topic| {
            subjects
                .iter()
                .any(|subject| subject.id == topic.subject_id && subject.exam == selected)
        })
        .collect()
}

// ============================================================================
// Table rows
// ============================================================================

/// Weakest first, ties in input order, at most [`WEAK_TOPICS_LIMIT`].
pub fn sort_weak_topics(mut items: Vec<WeakTopic>) -> Vec<WeakTopic> {
    items.sort_by(|a, b| {
        normalized_accuracy(a.accuracy).total_cmp(&normalized_accuracy(b.accuracy))
    });
    items.truncate(WEAK_TOPICS_LIMIT as usize);
    items
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectAccuracyBar {
    pub subject: String,
    pub accuracy: u8,
}

pub fn subject_accuracy_bars(response: &SubjectAccuracyResponse) -> Vec<SubjectAccuracyBar> {
    response
        .subjects
        .iter()
        .map(|subject| SubjectAccuracyBar {
            subject: subject.subject_name.clone(),
            accuracy: to_percent(subject.accuracy),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeakTopicRow {
    pub subject: String,
    pub topic: String,
    pub accuracy: u8,
    pub attempts: String,
}

pub fn weak_topic_rows(items: &[WeakTopic]) -> Vec<WeakTopicRow> {
    items
        .iter()
        .map(|item| WeakTopicRow {
            subject: item.subject_name.clone(),
            topic: item.topic_name.clone(),
            accuracy: to_percent(item.accuracy),
            attempts: format_number(item.attempts.unwrap_or(0.0)),
        })
        .collect()
}

/// Status badge variant for an event row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventBadge {
    Default,
    Outline,
    Secondary,
}

impl EventBadge {
    pub fn for_status(status: Option<ExamStatus>) -> Self {
        match status {
            Some(ExamStatus::Ongoing) => Self::Default,
            Some(ExamStatus::Scheduled) => Self::Outline,
            _ => Self::Secondary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    pub name: String,
    pub exam: String,
    pub kind: String,
    pub start: String,
    pub registered: String,
    pub status: String,
    pub badge: EventBadge,
}

pub fn event_rows(events: &[AdminEvent]) -> Vec<EventRow> {
    events
        .iter()
        .map(|event| EventRow {
            name: event.name.clone(),
            exam: event
                .exam
                .map_or(PLACEHOLDER, |exam| exam.label())
                .to_string(),
            kind: event
                .kind
                .map_or(PLACEHOLDER, |kind| kind.label())
                .to_string(),
            start: format_event_start(event.start_at.as_deref()),
            registered: format_number(event.registered_count.unwrap_or(0.0)),
            status: event
                .status
                .map_or(PLACEHOLDER, |status| status.label())
                .to_string(),
            badge: EventBadge::for_status(event.status),
        })
        .collect()
}
