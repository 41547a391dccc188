use prep_model::validate::{QuestionDraft, TopicDraft};
use prep_model::{
    AdminReferralSummary, ExamCategory, ExamSelection, Question, Subject, SubjectAccuracyResponse,
    Topic, WeakTopicsResponse,
};

#[test]
fn decodes_catalog_lists() {
    let subjects: Vec<Subject> = serde_json::from_str(
        r#"[
            {"id":"s1","exam":"NEET_PG","name":"Anatomy","isActive":true},
            {"id":"s2","exam":"JEE","name":"Physics"}
        ]"#,
    )
    .unwrap();
    assert_eq!(subjects.len(), 2);
    assert_eq!(subjects[1].exam, ExamCategory::Jee);

    let topics: Vec<Topic> =
        serde_json::from_str(r#"[{"id":"t1","subjectId":"s2","name":"Optics"}]"#).unwrap();
    assert_eq!(topics[0].subject_id, subjects[1].id);
}

#[test]
fn analytics_payloads_tolerate_missing_fields() {
    let accuracy: SubjectAccuracyResponse =
        serde_json::from_str(r#"{"subjects":[{"subjectName":"Biology"}]}"#).unwrap();
    assert_eq!(accuracy.subjects[0].accuracy, None);

    let weak: WeakTopicsResponse = serde_json::from_str("{}").unwrap();
    assert!(weak.items.is_empty());

    let referrals: AdminReferralSummary = serde_json::from_str(r#"{"range":"7d"}"#).unwrap();
    assert!(referrals.is_empty());
}

#[test]
fn validated_question_serializes_to_wire_shape() {
    let draft = QuestionDraft {
        question_text: "Unit of force?".to_string(),
        exam: "JEE".to_string(),
        subject_id: "s2".to_string(),
        topic_id: "t1".to_string(),
        option_a: "Joule".to_string(),
        option_b: "Newton".to_string(),
        option_c: "Watt".to_string(),
        option_d: "Pascal".to_string(),
        correct_option: "2".to_string(),
        ..Default::default()
    };
    let request = draft.validate().unwrap();
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["questionText"], "Unit of force?");
    assert_eq!(value["subjectId"], "s2");
    assert_eq!(value["correctOption"], 2);
    assert!(value.get("explanation").is_none());

    let created: Question = serde_json::from_value(serde_json::json!({
        "id": "q9",
        "questionText": request.question_text,
        "exam": "JEE",
        "subjectId": "s2",
        "topicId": "t1",
        "optionA": "Joule",
        "optionB": "Newton",
        "optionC": "Watt",
        "optionD": "Pascal",
        "correctOption": 2
    }))
    .unwrap();
    assert_eq!(created.correct_option_text(), Some("Newton"));
}

#[test]
fn topic_draft_reports_every_missing_field() {
    let errors = TopicDraft::default().validate().unwrap_err();
    let fields: Vec<_> = errors.iter().map(|error| error.field).collect();
    assert_eq!(fields, vec!["subjectId", "name"]);
    assert_eq!(errors.to_string(), "subjectId: is required; name: is required");
}

#[test]
fn every_selection_option_round_trips() {
    for option in ExamSelection::OPTIONS {
        assert_eq!(option.as_str().parse::<ExamSelection>().unwrap(), option);
    }
}
