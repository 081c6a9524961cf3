// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete conversation core -- session
//! store, orchestrator, model registry, upload coordinator -- over the
//! mock gateway and backend, and exposes every collaborator for
//! assertions.

use std::sync::Arc;

use docmind_chat::{
    MessageOrchestrator, ModelRegistry, SendOutcome, SendRequest, SessionStore, UploadCoordinator,
};
use docmind_core::{ChatModel, ChatSession, DocmindError};

use crate::capture::CaptureNotifier;
use crate::mock_backend::MockBackend;
use crate::mock_gateway::MockGateway;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    user_id: String,
    replies: Vec<String>,
    models: Vec<ChatModel>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            user_id: "test-user".to_string(),
            replies: Vec::new(),
            models: vec![ChatModel {
                id: "mock-model".to_string(),
                display_name: "Mock Model".to_string(),
                api_model_name: "mock-model-v1".to_string(),
                is_active: true,
            }],
        }
    }

    /// Act as a specific user id.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Pre-load backend replies.
    pub fn with_replies(mut self, replies: Vec<String>) -> Self {
        self.replies = replies;
        self
    }

    /// Replace the seeded model table (one active mock model by default).
    pub fn with_models(mut self, models: Vec<ChatModel>) -> Self {
        self.models = models;
        self
    }

    /// Build the harness: seed the mock store, load the active model set,
    /// and wire the core together.
    pub async fn build(self) -> Result<TestHarness, DocmindError> {
        let gateway = Arc::new(MockGateway::new());
        gateway.set_models(self.models);

        let backend = Arc::new(MockBackend::with_replies(self.replies));
        let notifier = Arc::new(CaptureNotifier::new());

        let orchestrator = Arc::new(MessageOrchestrator::new(
            gateway.clone(),
            backend.clone(),
            notifier.clone(),
        ));
        let uploader = UploadCoordinator::new(backend.clone(), notifier.clone());

        let mut registry = ModelRegistry::new();
        registry.load_active(gateway.as_ref()).await?;

        let mut store = SessionStore::new(self.user_id);
        store.refresh(gateway.as_ref()).await?;

        Ok(TestHarness {
            gateway,
            backend,
            notifier,
            orchestrator,
            uploader,
            store,
            registry,
        })
    }
}

/// A complete test environment over mock collaborators.
pub struct TestHarness {
    /// The in-memory persistence gateway.
    pub gateway: Arc<MockGateway>,
    /// The mock inference backend.
    pub backend: Arc<MockBackend>,
    /// Every notice the core surfaced.
    pub notifier: Arc<CaptureNotifier>,
    /// The orchestrator under test.
    pub orchestrator: Arc<MessageOrchestrator>,
    /// The upload coordinator under test.
    pub uploader: UploadCoordinator,
    /// The session store under test.
    pub store: SessionStore,
    /// The model registry under test.
    pub registry: ModelRegistry,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Create a session, make it current, and load its (empty) history.
    pub async fn open_session(&mut self) -> Result<ChatSession, DocmindError> {
        let session = self.store.create(self.gateway.as_ref()).await?;
        self.orchestrator.activate(&session).await?;
        Ok(session)
    }

    /// Send one message using the current session and selected model.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome, DocmindError> {
        self.send_message_with_web(text, false).await
    }

    /// Send one message with an explicit web-search flag.
    pub async fn send_message_with_web(
        &self,
        text: &str,
        use_web: bool,
    ) -> Result<SendOutcome, DocmindError> {
        self.orchestrator
            .send(SendRequest {
                text,
                session: self.store.current(),
                model: self.registry.selected(),
                use_web,
            })
            .await
    }
}
