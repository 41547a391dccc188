use prep_client::{AdminClient, ApiError, Method, MemoryTransport};
use prep_core::{CoreError, SelectionStore, TopicBrowser};
use prep_model::{ExamCategory, ExamSelection, SubjectId, TopicId};
use serde_json::json;

fn client() -> AdminClient<MemoryTransport> {
    let transport = MemoryTransport::new();
    transport.respond(
        Method::Get,
        "/admin/subjects",
        json!([
            {"id": "anatomy", "exam": "NEET_PG", "name": "Anatomy"},
            {"id": "physics", "exam": "JEE", "name": "Physics"},
            {"id": "pathology", "exam": "NEET_PG", "name": "Pathology"},
            {"id": "polity", "exam": "UPSC", "name": "Polity"}
        ]),
    );
    transport.respond(
        Method::Get,
        "/admin/topics",
        json!([
            {"id": "upper-limb", "subjectId": "anatomy", "name": "Upper limb"},
            {"id": "thorax", "subjectId": "anatomy", "name": "Thorax"}
        ]),
    );
    AdminClient::new(transport)
}

#[tokio::test]
async fn neet_pg_topic_browser_lists_only_neet_pg_subjects() {
    let store = SelectionStore::new();
    store.set_exam(ExamSelection::Exam(ExamCategory::NeetPg));

    let browser = TopicBrowser::open(client(), &store).await.unwrap();

    let labels: Vec<_> = browser
        .subject_options()
        .into_iter()
        .map(|option| option.label)
        .collect();
    assert_eq!(labels, vec!["Anatomy (NEET PG)", "Pathology (NEET PG)"]);
    assert!(!browser.topic_enabled());
    assert!(browser.topic_options().is_empty());
    assert_eq!(
        browser
            .select_topic(&TopicId::new("thorax").unwrap())
            .unwrap_err(),
        CoreError::TopicWithoutSubject
    );

    browser
        .select_subject(&SubjectId::new("anatomy").unwrap())
        .await
        .unwrap();
    assert!(browser.topic_enabled());
    assert_eq!(browser.topic_options().len(), 2);
    browser
        .select_topic(&TopicId::new("thorax").unwrap())
        .unwrap();
    assert_eq!(
        browser.selection().topic().map(TopicId::as_str),
        Some("thorax")
    );
}

#[tokio::test]
async fn subject_from_another_exam_is_rejected() {
    let store = SelectionStore::new();
    store.set_exam(ExamSelection::Exam(ExamCategory::NeetPg));
    let browser = TopicBrowser::open(client(), &store).await.unwrap();

    let err = browser
        .select_subject(&SubjectId::new("physics").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::SubjectOutsideExam("physics".to_string()));
    assert!(!browser.topic_enabled());
}

#[tokio::test]
async fn exam_change_resets_the_cascade() {
    let store = SelectionStore::new();
    let browser = TopicBrowser::open(client(), &store).await.unwrap();
    assert_eq!(browser.subject_options().len(), 4);

    browser
        .select_subject(&SubjectId::new("anatomy").unwrap())
        .await
        .unwrap();
    browser
        .select_topic(&TopicId::new("upper-limb").unwrap())
        .unwrap();

    store.set_exam(ExamSelection::Exam(ExamCategory::Jee));

    assert!(browser.selection().subject().is_none());
    assert!(browser.selection().topic().is_none());
    assert!(!browser.topic_enabled());
    assert!(browser.topic_options().is_empty());
    assert_eq!(browser.subject_options().len(), 1);
}

#[tokio::test]
async fn store_exam_change_rescopes_subject_options() {
    let store = SelectionStore::new();
    store.set_exam(ExamSelection::Exam(ExamCategory::NeetPg));
    let browser = TopicBrowser::open(client(), &store).await.unwrap();

    store.set_exam(ExamSelection::Exam(ExamCategory::Jee));

    let labels: Vec<_> = browser
        .subject_options()
        .into_iter()
        .map(|option| option.label)
        .collect();
    assert_eq!(labels, vec!["Physics (JEE)"]);
    assert_eq!(
        browser.selection().exam(),
        ExamSelection::Exam(ExamCategory::Jee)
    );
}

#[tokio::test]
async fn dropping_the_browser_unsubscribes() {
    let store = SelectionStore::new();
    let browser = TopicBrowser::open(client(), &store).await.unwrap();
    assert_eq!(store.subscriber_count(), 1);
    drop(browser);
    assert_eq!(store.subscriber_count(), 0);
}

#[tokio::test]
async fn failed_topic_load_can_be_retried() {
    let client = client();
    client
        .transport()
        .respond_once(Method::Get, "/admin/topics", Err(ApiError::Timeout));
    let store = SelectionStore::new();
    let browser = TopicBrowser::open(client, &store).await.unwrap();
    let anatomy = SubjectId::new("anatomy").unwrap();

    let err = browser.select_subject(&anatomy).await.unwrap_err();
    assert_eq!(err, CoreError::Api(ApiError::Timeout));
    assert!(browser.selection().subject().is_none());
    assert!(!browser.topic_enabled());

    browser.select_subject(&anatomy).await.unwrap();
    assert_eq!(
        browser.selection().subject().map(SubjectId::as_str),
        Some("anatomy")
    );
    assert_eq!(browser.topic_options().len(), 2);
}
