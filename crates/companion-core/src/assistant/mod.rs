//! Assistant
//!
//! Sends a question to a [`TextGenerator`] and records the exchange in the
//! [`HistoryStore`]. Generation failures never propagate: they become the
//! stored answer instead.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::db::InteractionRecord;
use crate::error::Result;
use crate::history::HistoryStore;

/// Answer stored when the generator returns nothing
pub const NO_RESPONSE: &str = "No response received";

/// Remote generative-text service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply. `Ok(None)` means the service answered without text.
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}

/// Asks questions and records the answers
#[derive(Clone)]
pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
    history: HistoryStore,
}

impl Assistant {
    pub fn new(generator: Arc<dyn TextGenerator>, history: HistoryStore) -> Self {
        Self { generator, history }
    }

    /// Ask a question and wait for the recorded exchange.
    ///
    /// Only a failure to write the history record is returned as an error.
    pub async fn ask(&self, question: &str) -> Result<InteractionRecord> {
        let answer = match self.generator.generate(question).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!("Generator returned no text");
                NO_RESPONSE.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Generation failed");
                format!("Error: {}", e)
            }
        };

        self.history.append(question, answer).await
    }

    /// Ask a question in the background.
    ///
    /// Returns immediately; the exchange lands in the history feed when the
    /// generator answers.
    pub fn submit(&self, question: impl Into<String>) -> PendingAnswer {
        let assistant = self.clone();
        let question = question.into();
        PendingAnswer {
            handle: tokio::spawn(async move { assistant.ask(&question).await }),
        }
    }
}

/// Handle to a question submitted with [`Assistant::submit`].
///
/// Dropping it does not cancel the request.
pub struct PendingAnswer {
    handle: JoinHandle<Result<InteractionRecord>>,
}

impl PendingAnswer {
    /// Wait for the recorded exchange
    pub async fn wait(self) -> Result<InteractionRecord> {
        self.handle.await?
    }
}
