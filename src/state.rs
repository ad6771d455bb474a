//! Application State
//!
//! Global state the host application manages, containing the assistant
//! pipeline and its configuration. Construction is cheap; `initialize`
//! validates the configuration and wires the pipeline.

use std::sync::Arc;
use tokio::sync::RwLock;

use timeclerk_core::Role;
use timeclerk_llm::OpenAiCompatProvider;
use timeclerk_tools::TimesheetQueries;

use crate::models::settings::{AssistantConfig, AssistantConfigUpdate};
use crate::services::assistant::AssistantService;
use crate::utils::error::{AppError, AppResult};

/// Application state shared across request handlers.
pub struct AppState {
    /// Read-only query collaborator supplied by the host
    queries: Arc<dyn TimesheetQueries>,
    /// Current configuration
    config: RwLock<AssistantConfig>,
    /// The assistant pipeline, built at initialization
    assistant: RwLock<Option<Arc<AssistantService>>>,
}

impl AppState {
    /// Create a new uninitialized state.
    pub fn new(queries: Arc<dyn TimesheetQueries>, config: AssistantConfig) -> Self {
        Self {
            queries,
            config: RwLock::new(config),
            assistant: RwLock::new(None),
        }
    }

    /// Validate the configuration and build the assistant pipeline.
    pub async fn initialize(&self) -> AppResult<()> {
        let mut assistant = self.assistant.write().await;
        if assistant.is_some() {
            return Ok(());
        }
        let config = self.config.read().await.clone();
        *assistant = Some(Self::build_assistant(&config, self.queries.clone())?);
        tracing::info!(model = %config.provider.model, "assistant pipeline initialized");
        Ok(())
    }

    /// Whether the pipeline has been initialized.
    pub async fn is_initialized(&self) -> bool {
        self.assistant.read().await.is_some()
    }

    /// Get the assistant pipeline.
    pub async fn assistant(&self) -> AppResult<Arc<AssistantService>> {
        let guard = self.assistant.read().await;
        match &*guard {
            Some(assistant) => Ok(assistant.clone()),
            None => Err(AppError::internal("assistant not initialized")),
        }
    }

    /// Get the current configuration.
    pub async fn get_config(&self) -> AssistantConfig {
        self.config.read().await.clone()
    }

    /// Apply a partial configuration update and rebuild the pipeline.
    ///
    /// Rebuilding drops both caches, so stale replies never outlive a
    /// policy change.
    pub async fn update_config(&self, update: AssistantConfigUpdate) -> AppResult<AssistantConfig> {
        let mut config = self.config.write().await;
        let mut updated = config.clone();
        updated.apply_update(update);
        updated.validate().map_err(AppError::config)?;

        let mut assistant = self.assistant.write().await;
        if assistant.is_some() {
            *assistant = Some(Self::build_assistant(&updated, self.queries.clone())?);
        }
        *config = updated.clone();
        tracing::info!("assistant configuration updated");
        Ok(updated)
    }

    /// Check that the completion backend is reachable.
    pub async fn health_check(&self) -> AppResult<()> {
        self.assistant().await?.health_check().await
    }

    /// Drop every cached tool result and reply. Admin only.
    pub async fn clear_caches(&self, role: Role) -> AppResult<()> {
        self.assistant().await?.invalidate_caches(role)
    }

    fn build_assistant(
        config: &AssistantConfig,
        queries: Arc<dyn TimesheetQueries>,
    ) -> AppResult<Arc<AssistantService>> {
        config.validate().map_err(AppError::config)?;
        let provider = Arc::new(OpenAiCompatProvider::new(config.provider.clone()));
        Ok(Arc::new(AssistantService::new(
            provider,
            queries,
            config.clone(),
        )))
    }
}
