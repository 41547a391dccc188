//! Process-wide exam selection.
//!
//! `SelectionStore` is a cheap, cloneable handle: every clone observes the
//! same value. `set_exam` notifies subscribers synchronously, after the
//! internal lock is released, so a subscriber may read or even set the
//! selection again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use prep_model::ExamSelection;
use tracing::debug;

type Listener = Arc<dyn Fn(ExamSelection) + Send + Sync>;

#[derive(Default)]
struct StoreState {
    exam: ExamSelection,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

fn lock(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Default)]
pub struct SelectionStore {
    state: Arc<Mutex<StoreState>>,
}

impl SelectionStore {
    /// New store holding `ExamSelection::All`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exam(&self) -> ExamSelection {
        lock(&self.state).exam
    }

    /// Store `next` and notify subscribers. Returns `false` (and notifies
    /// nobody) when `next` is already the current value.
    pub fn set_exam(&self, next: ExamSelection) -> bool {
        let listeners: Vec<Listener> = {
            let mut state = lock(&self.state);
            if state.exam == next {
                return false;
            }
            state.exam = next;
            state
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        debug!(
            exam = next.as_str(),
            subscribers = listeners.len(),
            "exam selection changed"
        );
        for listener in listeners {
            listener(next);
        }
        true
    }

    /// Register `listener`; it stays registered until the returned guard drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(
        &self,
        listener: impl Fn(ExamSelection) + Send + Sync + 'static,
    ) -> Subscription {
        let mut state = lock(&self.state);
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push((id, Arc::new(listener)));
        Subscription {
            state: Arc::downgrade(&self.state),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).listeners.len()
    }
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("SelectionStore")
            .field("exam", &state.exam)
            .field("subscribers", &state.listeners.len())
            .finish()
    }
}

/// Unsubscribes on drop.
pub struct Subscription {
    state: Weak<Mutex<StoreState>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            lock(&state).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
