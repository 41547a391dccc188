use anyhow::{Context, Result, anyhow};
use tracing::{Instrument, info, info_span};

use prep_cli::render::{
    ai_settings_table, coupons_table, dashboard_report, exams_table, podcasts_table,
    questions_table, subjects_table, topics_table, users_footer, users_table,
};
use prep_client::{AdminClient, HttpTransport, QuestionFilters, UserFilters};
use prep_core::{Dashboard, SelectionStore, filter_by_exam, filter_topics_by_exam};
use prep_model::validate::{SubjectDraft, TopicDraft};
use prep_model::{DateRange, SubjectId, TopicId};

use crate::cli::{Command, QuestionAction, SubjectAction, TopicAction};

/// Everything a command needs: the API client and the shared exam filter.
pub struct Session {
    pub client: AdminClient<HttpTransport>,
    pub store: SelectionStore,
}

pub async fn run(session: &Session, command: Command) -> Result<()> {
    let span = info_span!("command", exam = session.store.exam().as_str());
    dispatch(session, command).instrument(span).await
}

async fn dispatch(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Dashboard { range } => run_dashboard(session, range).await,
        Command::Subjects { action: None } => run_subjects(session).await,
        Command::Subjects {
            action: Some(SubjectAction::Add { name }),
        } => run_subject_add(session, name).await,
        Command::Topics {
            subject,
            action: None,
        } => run_topics(session, subject).await,
        Command::Topics {
            action: Some(TopicAction::Add { subject, name }),
            ..
        } => run_topic_add(session, subject, name).await,
        Command::Questions {
            subject,
            topic,
            action: None,
        } => run_questions(session, subject, topic).await,
        Command::Questions {
            action: Some(QuestionAction::Delete { id }),
            ..
        } => run_question_delete(session, &id).await,
        Command::Exams => run_exams(session).await,
        Command::Coupons => run_coupons(session).await,
        Command::Podcasts => run_podcasts(session).await,
        Command::Users {
            page,
            page_size,
            status,
            username,
        } => {
            let filters = UserFilters {
                page,
                page_size,
                status,
                role: Vec::new(),
                username,
            };
            run_users(session, filters).await
        }
        Command::AiSettings => run_ai_settings(session).await,
    }
}

async fn run_dashboard(session: &Session, range: DateRange) -> Result<()> {
    let dashboard = Dashboard::new(session.client.clone(), &session.store, range);
    dashboard.refresh().await;
    let tiles = dashboard.tiles();
    println!("{}", dashboard_report(dashboard.key(), &tiles));
    let failed = tiles
        .labels()
        .iter()
        .filter(|(_, label)| *label == "error")
        .count();
    if failed == tiles.labels().len() {
        return Err(anyhow!("every dashboard tile failed to load"));
    }
    Ok(())
}

async fn run_subjects(session: &Session) -> Result<()> {
    let subjects = session.client.subjects().await.context("load subjects")?;
    let subjects = filter_by_exam(subjects, session.store.exam());
    println!("{}", subjects_table(&subjects));
    Ok(())
}

async fn run_subject_add(session: &Session, name: String) -> Result<()> {
    let draft = SubjectDraft {
        exam: session
            .store
            .exam()
            .as_filter()
            .map(|exam| exam.as_str().to_string())
            .unwrap_or_default(),
        name,
    };
    let request = draft.validate().context("invalid subject")?;
    let subject = session
        .client
        .create_subject(&request)
        .await
        .context("create subject")?;
    info!(id = subject.id.as_str(), "created subject");
    println!("{}", subjects_table(std::slice::from_ref(&subject)));
    Ok(())
}

async fn run_topics(session: &Session, subject: Option<String>) -> Result<()> {
    let subject_id = subject.map(SubjectId::new).transpose()?;
    let (subjects, topics) = tokio::join!(
        session.client.subjects(),
        session.client.topics(subject_id.as_ref())
    );
    let subjects = subjects.context("load subjects")?;
    let topics = topics.context("load topics")?;
    let topics = filter_topics_by_exam(topics, &subjects, session.store.exam());
    println!("{}", topics_table(&topics, &subjects));
    Ok(())
}

async fn run_topic_add(session: &Session, subject: String, name: String) -> Result<()> {
    let request = TopicDraft {
        subject_id: subject,
        name,
    }
    .validate()
    .context("invalid topic")?;
    let subjects = session.client.subjects().await.context("load subjects")?;
    let parent = subjects
        .iter()
        .find(|candidate| candidate.id == request.subject_id)
        .ok_or_else(|| anyhow!("unknown subject {}", request.subject_id))?;
    if !session.store.exam().matches(parent.exam) {
        return Err(anyhow!(
            "subject {} belongs to {}, not {}",
            parent.name,
            parent.exam.label(),
            session.store.exam().label()
        ));
    }
    let topic = session
        .client
        .create_topic(&request)
        .await
        .context("create topic")?;
    info!(id = topic.id.as_str(), "created topic");
    println!("{}", topics_table(std::slice::from_ref(&topic), &subjects));
    Ok(())
}

async fn run_questions(
    session: &Session,
    subject: Option<String>,
    topic: Option<String>,
) -> Result<()> {
    let filters = QuestionFilters {
        exam: session.store.exam().as_filter(),
        subject_id: subject.map(SubjectId::new).transpose()?,
        topic_id: topic.map(TopicId::new).transpose()?,
    };
    let questions = session
        .client
        .questions(filters)
        .await
        .context("load questions")?;
    println!("{}", questions_table(&questions));
    Ok(())
}

async fn run_question_delete(session: &Session, id: &str) -> Result<()> {
    session
        .client
        .delete_question(id)
        .await
        .with_context(|| format!("delete question {id}"))?;
    info!(id, "deleted question");
    println!("Deleted question {id}");
    Ok(())
}

async fn run_exams(session: &Session) -> Result<()> {
    let exams = session
        .client
        .exams(session.store.exam().as_filter())
        .await
        .context("load exams")?;
    println!("{}", exams_table(&exams));
    Ok(())
}

async fn run_coupons(session: &Session) -> Result<()> {
    let coupons = session.client.coupons().await.context("load coupons")?;
    println!("{}", coupons_table(&coupons));
    Ok(())
}

async fn run_podcasts(session: &Session) -> Result<()> {
    let podcasts = session.client.podcasts().await.context("load podcasts")?;
    let podcasts = filter_by_exam(podcasts, session.store.exam());
    println!("{}", podcasts_table(&podcasts));
    Ok(())
}

async fn run_users(session: &Session, filters: UserFilters) -> Result<()> {
    let users = session.client.users(filters).await.context("load users")?;
    println!("{}", users_table(&users));
    let footer = users_footer(&users);
    if !footer.is_empty() {
        println!("{footer}");
    }
    Ok(())
}

async fn run_ai_settings(session: &Session) -> Result<()> {
    let settings = session
        .client
        .ai_settings()
        .await
        .context("load AI settings")?;
    println!("{}", ai_settings_table(&settings));
    Ok(())
}
