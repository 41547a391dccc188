use prep_client::{AdminClient, ApiError, MemoryTransport, Method};
use prep_core::{Dashboard, DashboardKey, PLACEHOLDER, SelectionStore, TileState};
use prep_model::{DateRange, ExamCategory, ExamSelection};
use serde_json::json;

fn client() -> AdminClient<MemoryTransport> {
    let transport = MemoryTransport::new();
    transport.respond(
        Method::Get,
        "/admin/analytics/overview",
        json!({
            "totalUsers": 12000,
            "activeUsers": 830,
            "questionsAnswered": 45210,
            "averageAccuracy": 61.4,
            "averageStudyMinutes": 38.24,
            "totalRewards": 9100
        }),
    );
    transport.respond(
        Method::Get,
        "/admin/analytics/time-series",
        json!({
            "metric": "active_users",
            "points": [
                {"date": "2024-03-05", "value": 120},
                {"date": "2024-03-06", "value": 134}
            ]
        }),
    );
    transport.respond(
        Method::Get,
        "/admin/analytics/subject-accuracy",
        json!({"subjects": [
            {"subjectName": "Anatomy", "accuracy": 0.72},
            {"subjectName": "Physiology", "accuracy": 58}
        ]}),
    );
    transport.respond(
        Method::Get,
        "/admin/analytics/weak-topics",
        json!({"items": [
            {"subjectName": "Anatomy", "topicName": "Thorax", "exam": "NEET_PG", "accuracy": 48, "attempts": 90},
            {"subjectName": "Physics", "topicName": "Optics", "exam": "JEE", "accuracy": 20, "attempts": 12},
            {"subjectName": "Anatomy", "topicName": "Upper limb", "exam": "NEET_PG", "accuracy": 0.35},
            {"subjectName": "Anatomy", "topicName": "Pelvis", "accuracy": 61}
        ]}),
    );
    transport.respond(
        Method::Get,
        "/admin/events/upcoming",
        json!({"items": [
            {"id": "e1", "name": "Grand Mock", "exam": "NEET_PG", "type": "MOCK",
             "startAt": "2024-04-01T10:00:00Z", "registeredCount": 2500, "status": "SCHEDULED"}
        ]}),
    );
    transport.respond(
        Method::Get,
        "/admin/referrals/summary",
        json!({"totalReferrals": 1520, "newUsers": 310}),
    );
    AdminClient::new(transport)
}

#[tokio::test]
async fn refresh_fills_every_tile() {
    let store = SelectionStore::new();
    let dashboard = Dashboard::new(client(), &store, DateRange::Last7Days);
    assert!(dashboard.tiles().overview.is_loading());

    dashboard.refresh().await;
    let tiles = dashboard.tiles();

    for (tile, label) in tiles.labels() {
        assert_eq!(label, "ready", "{} should be ready", tile.as_str());
    }
    let cards = tiles.overview.data().unwrap();
    assert_eq!(cards[1].title, "Active Users (Last 7 days)");
    assert_eq!(cards[4].value, "38.2");

    let bars = tiles.subject_accuracy.data().unwrap();
    assert_eq!(bars[0].accuracy, 72);
    assert_eq!(bars[1].accuracy, 58);

    let weak: Vec<_> = tiles
        .weak_topics
        .data()
        .unwrap()
        .iter()
        .map(|row| (row.topic.as_str(), row.accuracy, row.attempts.as_str()))
        .collect();
    assert_eq!(
        weak,
        vec![
            ("Optics", 20, "12"),
            ("Upper limb", 35, "0"),
            ("Thorax", 48, "90"),
            ("Pelvis", 61, "0")
        ]
    );

    let referrals = tiles.referrals.data().unwrap();
    assert_eq!(referrals[0].caption, "Range: Last 7 days");
    assert_eq!(referrals[1].value, PLACEHOLDER);
    assert_eq!(referrals[1].caption, "310 new users");
}

#[tokio::test]
async fn one_failing_tile_does_not_block_the_others() {
    let client = client();
    client.transport().fail(
        Method::Get,
        "/admin/analytics/weak-topics",
        ApiError::Status {
            status: 500,
            body: "boom".to_string(),
        },
    );
    client
        .transport()
        .respond(Method::Get, "/admin/events/upcoming", json!({"items": []}));
    let dashboard = Dashboard::new(client, &SelectionStore::new(), DateRange::Today);

    dashboard.refresh().await;
    let tiles = dashboard.tiles();

    assert!(matches!(
        tiles.weak_topics,
        TileState::Error(ApiError::Status { status: 500, .. })
    ));
    assert_eq!(tiles.upcoming_events, TileState::Empty);
    assert!(matches!(tiles.overview, TileState::Ready(_)));
    assert!(matches!(tiles.active_users, TileState::Ready(_)));
    assert!(matches!(tiles.referrals, TileState::Ready(_)));
}

#[tokio::test]
async fn null_aggregates_are_empty_tiles() {
    let client = client();
    let transport = client.transport();
    transport.respond(Method::Get, "/admin/analytics/overview", serde_json::Value::Null);
    transport.respond(
        Method::Get,
        "/admin/analytics/time-series",
        json!({"points": []}),
    );
    transport.respond(Method::Get, "/admin/referrals/summary", json!({}));
    let dashboard = Dashboard::new(client, &SelectionStore::new(), DateRange::Last30Days);

    dashboard.refresh().await;
    let tiles = dashboard.tiles();

    assert_eq!(tiles.overview, TileState::Empty);
    assert_eq!(tiles.active_users, TileState::Empty);
    assert_eq!(tiles.questions_answered, TileState::Empty);
    assert_eq!(tiles.referrals, TileState::Empty);
    assert!(matches!(tiles.subject_accuracy, TileState::Ready(_)));
}

#[tokio::test]
async fn exam_change_reenters_loading_and_charts_keep_their_frame() {
    let store = SelectionStore::new();
    let dashboard = Dashboard::new(client(), &store, DateRange::Last7Days);
    dashboard.refresh().await;

    store.set_exam(ExamSelection::Exam(ExamCategory::NeetPg));
    let tiles = dashboard.tiles();

    assert_eq!(
        dashboard.key(),
        DashboardKey {
            exam: ExamSelection::Exam(ExamCategory::NeetPg),
            range: DateRange::Last7Days,
        }
    );
    for (tile, label) in tiles.labels() {
        assert_eq!(label, "loading", "{} should be loading", tile.as_str());
    }
    assert!(tiles.active_users.data().is_some());
    assert!(tiles.subject_accuracy.data().is_some());
    assert!(tiles.overview.data().is_none());
    assert!(tiles.weak_topics.data().is_none());
    assert!(tiles.referrals.data().is_none());

    dashboard.refresh().await;
    let tiles = dashboard.tiles();
    let weak = tiles.weak_topics.data().unwrap();
    assert!(weak.iter().all(|row| row.subject == "Anatomy"));
    let topics: Vec<_> = weak.iter().map(|row| row.topic.as_str()).collect();
    assert_eq!(topics, vec!["Upper limb", "Thorax", "Pelvis"]);
}

#[tokio::test]
async fn range_change_reenters_loading() {
    let dashboard = Dashboard::new(client(), &SelectionStore::new(), DateRange::Last7Days);
    dashboard.refresh().await;

    assert!(dashboard.set_range(DateRange::Today));
    assert!(!dashboard.set_range(DateRange::Today));
    assert!(dashboard.tiles().overview.is_loading());

    dashboard.refresh().await;
    let tiles = dashboard.tiles();
    assert_eq!(
        tiles.overview.data().unwrap()[2].caption,
        "Today attempts"
    );
}

#[tokio::test]
async fn responses_for_a_stale_key_are_discarded() {
    let store = SelectionStore::new();
    let client = client();
    let dashboard = Dashboard::new(client.clone(), &store, DateRange::Last7Days);

    futures_util::join!(dashboard.refresh(), async {
        store.set_exam(ExamSelection::Exam(ExamCategory::Jee));
    });

    for (tile, label) in dashboard.tiles().labels() {
        assert_eq!(label, "loading", "{} should still be loading", tile.as_str());
    }

    dashboard.refresh().await;
    assert!(matches!(dashboard.tiles().overview, TileState::Ready(_)));

    let jee_requests = client
        .transport()
        .requests()
        .into_iter()
        .filter(|request| request.query.contains(&("exam", "JEE".to_string())))
        .count();
    assert_eq!(jee_requests, 6);
}

#[tokio::test]
async fn dropping_the_dashboard_unsubscribes() {
    let store = SelectionStore::new();
    let dashboard = Dashboard::new(client(), &store, DateRange::Last7Days);
    assert_eq!(store.subscriber_count(), 1);

    drop(dashboard);
    assert_eq!(store.subscriber_count(), 0);
}
