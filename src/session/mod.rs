// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Connected dApp sessions.
//!
//! A session is the authorization boundary for inbound requests: every
//! RPC call arrives over a topic, and the topic must resolve to a live
//! session whose allow-list covers the method. Sessions live in memory;
//! disconnecting one also cancels its pending approvals (see
//! [`crate::state::AppState::teardown_session`]).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::rpc::method::RpcMethod;

/// Opaque identifier a dApp uses to address its session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct SessionTopic(pub String);

impl fmt::Display for SessionTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionTopic {
    fn from(topic: String) -> Self {
        Self(topic)
    }
}

impl From<&str> for SessionTopic {
    fn from(topic: &str) -> Self {
        Self(topic.to_string())
    }
}

/// Metadata the connecting dApp presents about itself. Shown to the
/// user on every approval prompt for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PeerMeta {
    pub name: String,
    /// Origin URL of the dApp. Must parse as an absolute URL.
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icons: Vec<String>,
}

/// A live dApp connection.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Session {
    pub topic: SessionTopic,
    pub peer: PeerMeta,
    /// Methods the user granted this session. Empty means unrestricted,
    /// which is how the wallet's own UI connects.
    pub approved_methods: Vec<RpcMethod>,
    pub connected_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session's allow-list covers `method`.
    pub fn allows(&self, method: RpcMethod) -> bool {
        self.approved_methods.is_empty() || self.approved_methods.contains(&method)
    }
}

/// In-memory registry of live sessions, keyed by topic.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionTopic, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionTopic, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new session and mints its topic.
    ///
    /// The peer URL must be absolute and the allow-list is deduplicated
    /// while keeping its order.
    pub fn connect(
        &self,
        peer: PeerMeta,
        approved_methods: Vec<RpcMethod>,
    ) -> Result<Session, ApiError> {
        Url::parse(&peer.url)
            .map_err(|_| ApiError::bad_request(format!("Invalid peer url: {}", peer.url)))?;

        let mut deduped = Vec::with_capacity(approved_methods.len());
        for method in approved_methods {
            if !deduped.contains(&method) {
                deduped.push(method);
            }
        }

        let session = Session {
            topic: SessionTopic(Uuid::new_v4().to_string()),
            peer,
            approved_methods: deduped,
            connected_at: Utc::now(),
        };
        self.lock().insert(session.topic.clone(), session.clone());
        tracing::info!(topic = %session.topic, peer = %session.peer.name, "session connected");
        Ok(session)
    }

    pub fn get(&self, topic: &SessionTopic) -> Option<Session> {
        self.lock().get(topic).cloned()
    }

    /// All live sessions, oldest first.
    pub fn list(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.lock().values().cloned().collect();
        sessions.sort_by_key(|session| session.connected_at);
        sessions
    }

    /// Removes the session, returning it if it was live.
    pub fn disconnect(&self, topic: &SessionTopic) -> Option<Session> {
        let removed = self.lock().remove(topic);
        if removed.is_some() {
            tracing::info!(%topic, "session disconnected");
        }
        removed
    }
}
