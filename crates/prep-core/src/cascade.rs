//! Exam → subject → topic dependent dropdowns.
//!
//! Each level is reset whenever its parent changes, at the point of the
//! change: a new exam clears subject and topic, a new subject clears the
//! topic. The topic dropdown stays disabled until a subject is chosen.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use prep_client::{AdminClient, Transport};
use prep_model::{ExamSelection, Subject, SubjectId, Topic, TopicId};
use serde::Serialize;
use tracing::debug;

use crate::derive::filter_by_exam;
use crate::error::{CoreError, Result};
use crate::selection::{SelectionStore, Subscription};

/// One dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Subjects of the selected exam, labelled `Anatomy (NEET PG)`.
pub fn subject_options(subjects: &[Subject], exam: ExamSelection) -> Vec<SelectOption> {
    filter_by_exam(subjects.to_vec(), exam)
        .into_iter()
        .map(|subject| SelectOption {
            label: format!("{} ({})", subject.name, subject.exam.label()),
            value: subject.id.as_str().to_string(),
        })
        .collect()
}

/// Exactly the topics of `subject_id`; nothing when no subject is chosen.
pub fn topic_options(topics: &[Topic], subject_id: Option<&SubjectId>) -> Vec<SelectOption> {
    let Some(subject_id) = subject_id else {
        return Vec::new();
    };
    topics
        .iter()
        .filter(|topic| &topic.subject_id == subject_id)
        .map(|topic| SelectOption {
            value: topic.id.as_str().to_string(),
            label: topic.name.clone(),
        })
        .collect()
}

// ============================================================================
// Selection state
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeSelection {
    exam: ExamSelection,
    subject: Option<SubjectId>,
    topic: Option<TopicId>,
}

impl CascadeSelection {
    pub fn new(exam: ExamSelection) -> Self {
        Self {
            exam,
            ..Self::default()
        }
    }

    pub fn exam(&self) -> ExamSelection {
        self.exam
    }

    pub fn subject(&self) -> Option<&SubjectId> {
        self.subject.as_ref()
    }

    pub fn topic(&self) -> Option<&TopicId> {
        self.topic.as_ref()
    }

    pub fn topic_enabled(&self) -> bool {
        self.subject.is_some()
    }

    /// Returns whether the exam changed; a change clears subject and topic.
    pub fn set_exam(&mut self, exam: ExamSelection) -> bool {
        if self.exam == exam {
            return false;
        }
        self.exam = exam;
        self.subject = None;
        self.topic = None;
        true
    }

    /// Choose `subject`. Picking a different subject clears the topic.
    pub fn select_subject(&mut self, subject: &Subject) -> Result<()> {
        if !self.exam.matches(subject.exam) {
            return Err(CoreError::SubjectOutsideExam(subject.id.to_string()));
        }
        if self.subject.as_ref() != Some(&subject.id) {
            self.topic = None;
            self.subject = Some(subject.id.clone());
        }
        Ok(())
    }

    pub fn clear_subject(&mut self) {
        self.subject = None;
        self.topic = None;
    }

    pub fn select_topic(&mut self, topic: &Topic) -> Result<()> {
        let Some(subject) = &self.subject else {
            return Err(CoreError::TopicWithoutSubject);
        };
        if &topic.subject_id != subject {
            return Err(CoreError::TopicOutsideSubject {
                topic: topic.id.to_string(),
                subject: subject.to_string(),
            });
        }
        self.topic = Some(topic.id.clone());
        Ok(())
    }

    pub fn clear_topic(&mut self) {
        self.topic = None;
    }
}

// ============================================================================
// Topic browser
// ============================================================================

/// Subject and topic pickers of the topics page, scoped by the exam in the
/// shared [`SelectionStore`].
///
/// The browser follows the store: an exam change resets the cascade and
/// drops the loaded topics before `set_exam` returns.
pub struct TopicBrowser<T> {
    client: AdminClient<T>,
    subjects: Vec<Subject>,
    state: Arc<Mutex<BrowserState>>,
    _subscription: Subscription,
}

struct BrowserState {
    selection: CascadeSelection,
    topics: Vec<Topic>,
    /// Subject whose topics are in `topics`; only set after a successful load.
    loaded_for: Option<SubjectId>,
}

impl BrowserState {
    fn retarget(&mut self, exam: ExamSelection) {
        if self.selection.set_exam(exam) {
            debug!(exam = exam.as_str(), "topic browser reset for new exam");
            self.topics.clear();
            self.loaded_for = None;
        }
    }
}

fn lock(state: &Mutex<BrowserState>) -> MutexGuard<'_, BrowserState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Transport + 'static> TopicBrowser<T> {
    /// Loads the subject list. No subject is preselected.
    pub async fn open(client: AdminClient<T>, store: &SelectionStore) -> Result<Self> {
        let subjects = client.subjects().await?;
        let state = Arc::new(Mutex::new(BrowserState {
            selection: CascadeSelection::new(store.exam()),
            topics: Vec::new(),
            loaded_for: None,
        }));
        let weak = Arc::downgrade(&state);
        let subscription = store.subscribe(move |exam| {
            if let Some(state) = weak.upgrade() {
                lock(&state).retarget(exam);
            }
        });
        debug!(
            exam = store.exam().as_str(),
            subjects = subjects.len(),
            "opened topic browser"
        );
        Ok(Self {
            client,
            subjects,
            state,
            _subscription: subscription,
        })
    }

    /// Snapshot of the current cascade.
    pub fn selection(&self) -> CascadeSelection {
        lock(&self.state).selection.clone()
    }

    pub fn subject_options(&self) -> Vec<SelectOption> {
        subject_options(&self.subjects, lock(&self.state).selection.exam())
    }

    pub fn topic_enabled(&self) -> bool {
        lock(&self.state).selection.topic_enabled()
    }

    pub fn topic_options(&self) -> Vec<SelectOption> {
        let state = lock(&self.state);
        topic_options(&state.topics, state.selection.subject())
    }

    /// Choose a subject by id and load its topics.
    ///
    /// The subject is only committed once its topics have loaded, so a failed
    /// load leaves the previous selection in place and can simply be retried.
    pub async fn select_subject(&self, id: &SubjectId) -> Result<()> {
        let subject = self
            .subjects
            .iter()
            .find(|subject| &subject.id == id)
            .ok_or_else(|| CoreError::SubjectOutsideExam(id.to_string()))?;
        let exam = {
            let mut state = lock(&self.state);
            if state.loaded_for.as_ref() == Some(id) {
                return state.selection.select_subject(subject);
            }
            state.selection.clone().select_subject(subject)?;
            state.selection.exam()
        };

        let topics = self.client.topics(Some(id)).await?;

        let mut state = lock(&self.state);
        if state.selection.exam() != exam {
            debug!(subject = id.as_str(), "discarding topics loaded for a previous exam");
            return Ok(());
        }
        state.selection.select_subject(subject)?;
        state.topics = topics;
        state.loaded_for = Some(id.clone());
        Ok(())
    }

    pub fn select_topic(&self, id: &TopicId) -> Result<()> {
        let mut state = lock(&self.state);
        let Some(topic) = state.topics.iter().find(|topic| &topic.id == id).cloned() else {
            return match state.selection.subject() {
                None => Err(CoreError::TopicWithoutSubject),
                Some(subject) => Err(CoreError::TopicOutsideSubject {
                    topic: id.to_string(),
                    subject: subject.to_string(),
                }),
            };
        };
        state.selection.select_topic(&topic)
    }
}
