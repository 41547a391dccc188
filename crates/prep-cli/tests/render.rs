use prep_cli::render::{dashboard_report, subjects_table, users_table};
use prep_client::ApiError;
use prep_core::{DashboardKey, DashboardTiles, StatCard, TileState, build_referral_snapshot};
use prep_model::{
    AdminUser, AdminUserList, DateRange, ExamCategory, ExamSelection, Subject, SubjectId,
    UserRole,
};

#[test]
fn loading_dashboard_shows_placeholders() {
    let report = dashboard_report(DashboardKey::default(), &DashboardTiles::default());
    insta::assert_snapshot!(report, @r"
    Dashboard · All Exams · Last 7 days

    Overview
    ...

    Active Users (Last 7 days)
    ...

    Questions Answered (Last 7 days)
    ...

    Subject Accuracy
    ...

    Weak Topics
    ...

    Upcoming Events
    ...

    Referrals
    ...
    ");
}

#[test]
fn dashboard_report_renders_each_state() {
    let tiles = DashboardTiles {
        referrals: TileState::Ready(build_referral_snapshot(None, "Today")),
        upcoming_events: TileState::Empty,
        weak_topics: TileState::Error(ApiError::Timeout),
        ..DashboardTiles::default()
    };
    let key = DashboardKey {
        exam: ExamSelection::Exam(ExamCategory::Jee),
        range: DateRange::Today,
    };

    let report = dashboard_report(key, &tiles);

    assert!(report.starts_with("Dashboard · JEE · Today\n"));
    assert!(report.contains("Upcoming Events\nNo upcoming events.\n"));
    assert!(report.contains("Weak Topics\nerror: "));
    assert!(report.contains("Total Referrals"));
    assert!(report.contains("Range: Today"));
}

#[test]
fn retained_frame_renders_with_refreshing_marker() {
    let tiles = DashboardTiles {
        overview: TileState::Loading {
            previous: Some(std::array::from_fn(|index| StatCard {
                title: format!("Card {index}"),
                value: "1".to_string(),
                caption: String::new(),
            })),
        },
        ..DashboardTiles::default()
    };
    let report = dashboard_report(DashboardKey::default(), &tiles);
    assert!(report.contains("Card 0"));
    assert!(report.contains("(refreshing)"));
}

#[test]
fn resource_tables_list_rows() {
    let subjects = vec![Subject {
        id: SubjectId::new("anatomy").unwrap(),
        exam: ExamCategory::NeetPg,
        name: "Anatomy".to_string(),
        is_active: Some(true),
    }];
    let rendered = subjects_table(&subjects).to_string();
    assert!(rendered.contains("Anatomy"));
    assert!(rendered.contains("NEET PG"));

    let users = AdminUserList {
        items: vec![AdminUser {
            id: "u1".to_string(),
            username: Some("asha".to_string()),
            email: None,
            display_name: None,
            role: Some(UserRole::Admin),
            status: Some("ACTIVE".to_string()),
            primary_exam: None,
            created_at: None,
        }],
        ..AdminUserList::default()
    };
    let rendered = users_table(&users).to_string();
    assert!(rendered.contains("asha"));
    assert!(rendered.contains("ADMIN"));
}
