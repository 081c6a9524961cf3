// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory projection of the selectable model list.

use docmind_core::{ChatModel, DocmindError, PersistenceGateway};
use tracing::{debug, info};

/// The active model set as last fetched, plus the user's selection.
///
/// The selection is a pinned clone taken at selection time: a model that
/// goes inactive mid-session keeps working for that session, and the
/// stale name is passed to the backend, which is the authority on
/// rejecting it. No revalidation happens on send or on refresh.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Vec<ChatModel>,
    selected: Option<ChatModel>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The models as last fetched, all with `is_active = true`.
    pub fn models(&self) -> &[ChatModel] {
        &self.models
    }

    pub fn selected(&self) -> Option<&ChatModel> {
        self.selected.as_ref()
    }

    /// Fetches the active model set. The first entry becomes the default
    /// selection if nothing is selected yet; an existing selection is left
    /// alone. An empty active set leaves nothing selected, and sends
    /// degrade to a no-op until a model appears.
    pub async fn load_active(
        &mut self,
        gateway: &dyn PersistenceGateway,
    ) -> Result<(), DocmindError> {
        let models = gateway.list_models(true).await?;
        info!(count = models.len(), "active models loaded");
        self.models = models;
        if self.selected.is_none() {
            self.selected = self.models.first().cloned();
            if let Some(model) = &self.selected {
                debug!(model = model.display_name.as_str(), "default model selected");
            }
        }
        Ok(())
    }

    /// Pure reassignment of the selection.
    pub fn select(&mut self, model: &ChatModel) {
        debug!(model = model.display_name.as_str(), "model selected");
        self.selected = Some(model.clone());
    }
}
