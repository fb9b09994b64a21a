// Shared fine-tuned model identifier
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-wide slot holding the id of the last successful fine-tuned model.
/// Written only by status checks, read by generation.
#[derive(Debug, Clone, Default)]
pub struct FineTunedModelCell {
    inner: Arc<RwLock<Option<String>>>,
}

impl FineTunedModelCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current model id, if any job has succeeded
    pub async fn get(&self) -> Option<String> {
        self.inner.read().await.clone()
    }

    /// Replace the model id
    pub async fn set(&self, model: impl Into<String>) {
        *self.inner.write().await = Some(model.into());
    }
}
