//! Session — async driver around [`ViewState`].
//!
//! DESIGN
//! ======
//! Transitions stay synchronous and run to completion under one lock; only
//! the extraction call suspends. `send_chat_message` records the message,
//! spawns the call, and returns immediately so other intents keep flowing
//! while the assistant is pending.
//!
//! The spawned task holds a `Weak` to the state. If the session has been
//! dropped by the time the model replies, the upgrade fails and the result
//! is discarded. There is no cancellation: a live session always receives
//! the reply, even if the user has moved on.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::assistant::{self, AssistantConfig, AssistantError};
use crate::llm::LlmJson;
use crate::state::{Action, Notice, ViewState};

pub struct Session {
    state: Arc<Mutex<ViewState>>,
    llm: Option<Arc<dyn LlmJson>>,
    config: AssistantConfig,
}

impl Session {
    /// `llm` is `None` when no model is configured; chat messages then get
    /// the failure reply.
    #[must_use]
    pub fn new(state: ViewState, llm: Option<Arc<dyn LlmJson>>, config: AssistantConfig) -> Self {
        Self { state: Arc::new(Mutex::new(state)), llm, config }
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a synchronous transition.
    ///
    /// # Errors
    ///
    /// Forwards the [`Notice`] from [`ViewState::dispatch`].
    pub fn dispatch(&self, action: Action) -> Result<(), Notice> {
        self.lock().dispatch(action)
    }

    /// Read the current snapshot.
    pub fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.lock())
    }

    /// Record a chat message and start the extraction in the background.
    ///
    /// Must be called from within a Tokio runtime. The returned handle
    /// yields `true` once the reply has been applied, or `false` if the
    /// session was torn down first.
    ///
    /// # Errors
    ///
    /// Returns [`Notice::EmptyMessage`] or [`Notice::ChatBusy`]; nothing is
    /// sent in either case.
    pub fn send_chat_message(&self, text: impl Into<String>) -> Result<JoinHandle<bool>, Notice> {
        let query = text.into();
        self.dispatch(Action::ChatSubmitted(query.clone()))?;

        let weak = Arc::downgrade(&self.state);
        let llm = self.llm.clone();
        let config = self.config;
        info!(query_len = query.len(), "session: chat message sent");

        Ok(tokio::spawn(async move {
            let result = match llm {
                Some(llm) => assistant::extract(&*llm, &query, config).await,
                None => Err(AssistantError::NotConfigured),
            };
            deliver(&weak, result)
        }))
    }
}

fn deliver(weak: &Weak<Mutex<ViewState>>, result: Result<assistant::AiExtraction, AssistantError>) -> bool {
    let Some(state) = weak.upgrade() else {
        debug!(ok = result.is_ok(), "session: torn down, extraction discarded");
        return false;
    };
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    if let Err(notice) = state.dispatch(Action::ChatResolved(result)) {
        warn!(%notice, "session: chat resolution refused");
    }
    true
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
