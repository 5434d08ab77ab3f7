// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared application state.

use std::sync::Arc;

use crate::provider::{DevWalletProvider, WalletProvider};
use crate::rpc::approval::ApprovalController;
use crate::rpc::handlers::HandlerRegistry;
use crate::session::{Session, SessionRegistry, SessionTopic};

/// Application state shared across all request handlers. Cheap to clone;
/// every component is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub approvals: Arc<ApprovalController>,
    pub registry: Arc<HandlerRegistry>,
    pub provider: Arc<dyn WalletProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new()),
            approvals: Arc::new(ApprovalController::new()),
            registry: Arc::new(HandlerRegistry::new()),
            provider,
        }
    }

    /// Disconnects a session and settles everything it left behind: the
    /// session is removed first so no new request can defer against it,
    /// then its pending approvals are cancelled, which their waiting
    /// dispatch tasks observe as a rejection.
    pub fn teardown_session(&self, topic: &SessionTopic) -> Option<Session> {
        let session = self.sessions.disconnect(topic)?;
        let cancelled = self.approvals.cancel_session(topic);
        if cancelled > 0 {
            tracing::info!(%topic, cancelled, "cancelled pending approvals on disconnect");
        }
        Some(session)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(DevWalletProvider::new()))
    }
}
