// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pending-approval bookkeeping.
//!
//! A deferred request moves through `AwaitingApproval` into exactly one
//! of `Resolved` or `Rejected`. The map entry for a request id exists
//! only while the request is awaiting its decision; [`ApprovalController::resolve`]
//! removes the entry before firing the resolver, so a second resolution
//! attempt finds nothing and fails instead of double-firing. A dropped
//! [`ApprovalTicket`] cleans its entry up, so an abandoned wait never
//! leaves a prompt behind.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::rpc::method::RpcMethod;
use crate::session::SessionTopic;

/// The user's verdict on a pending request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalDecision {
    /// Confirmed. `data` optionally replaces the prompt payload the
    /// request was deferred with, for prompts that let the user edit
    /// what gets executed.
    Approved { data: Option<Value> },
    /// Declined. Without a message this is the plain user rejection; a
    /// message turns it into an internal error carrying that message.
    Rejected { message: Option<String> },
}

/// What a handler hands to the approval surface when it defers a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalPrompt {
    /// One-line, human-readable description of the action.
    pub summary: String,
    /// Method-specific payload the prompt renders, and may hand back
    /// edited on approval.
    pub display: Value,
}

/// Failure to register or resolve a pending approval.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApprovalError {
    #[error("no approval is pending for request {0}")]
    NotPending(u64),
    #[error("request {0} is already awaiting approval")]
    AlreadyPending(u64),
    #[error("request {0} stopped waiting for its approval")]
    Abandoned(u64),
}

/// Snapshot of one pending request, for the approval surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingApproval {
    pub request_id: u64,
    pub session_topic: SessionTopic,
    pub method: RpcMethod,
    pub prompt: ApprovalPrompt,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct PendingEntry {
    session_topic: SessionTopic,
    method: RpcMethod,
    prompt: ApprovalPrompt,
    created_at: DateTime<Utc>,
    decided: oneshot::Sender<ApprovalDecision>,
    cancel: CancellationToken,
}

type PendingMap = Arc<Mutex<HashMap<u64, PendingEntry>>>;

fn lock(map: &PendingMap) -> MutexGuard<'_, HashMap<u64, PendingEntry>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the request-id to resolver map.
#[derive(Default)]
pub struct ApprovalController {
    pending: PendingMap,
}

impl ApprovalController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a deferred request and returns the ticket its dispatch
    /// task waits on. Fails when the id already has a pending entry.
    pub fn begin(
        &self,
        request_id: u64,
        session_topic: SessionTopic,
        method: RpcMethod,
        prompt: ApprovalPrompt,
    ) -> Result<ApprovalTicket, ApprovalError> {
        let (decided, decision) = oneshot::channel();
        let cancel = CancellationToken::new();

        match lock(&self.pending).entry(request_id) {
            Entry::Occupied(_) => return Err(ApprovalError::AlreadyPending(request_id)),
            Entry::Vacant(slot) => {
                slot.insert(PendingEntry {
                    session_topic,
                    method,
                    prompt,
                    created_at: Utc::now(),
                    decided,
                    cancel: cancel.clone(),
                });
            }
        }

        Ok(ApprovalTicket {
            request_id,
            decision,
            cancel,
            pending: Arc::clone(&self.pending),
        })
    }

    /// Delivers the user's decision to the waiting request.
    ///
    /// The entry is removed before the resolver fires, which is what
    /// makes resolution exactly-once: a concurrent or repeated attempt
    /// for the same id gets [`ApprovalError::NotPending`].
    pub fn resolve(&self, request_id: u64, decision: ApprovalDecision) -> Result<(), ApprovalError> {
        let entry = match lock(&self.pending).remove(&request_id) {
            Some(entry) => entry,
            None => {
                tracing::error!(request_id, "resolution for a request with no pending approval");
                return Err(ApprovalError::NotPending(request_id));
            }
        };

        if entry.decided.send(decision).is_err() {
            tracing::warn!(request_id, "approval resolved after the requester went away");
            return Err(ApprovalError::Abandoned(request_id));
        }
        Ok(())
    }

    /// Cancels every pending approval belonging to `topic`. Each
    /// waiting request settles as a plain rejection. Returns how many
    /// were cancelled.
    pub fn cancel_session(&self, topic: &SessionTopic) -> usize {
        let entries: Vec<PendingEntry> = {
            let mut pending = lock(&self.pending);
            let ids: Vec<u64> = pending
                .iter()
                .filter(|(_, entry)| &entry.session_topic == topic)
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| pending.remove(id)).collect()
        };

        for entry in &entries {
            entry.cancel.cancel();
        }
        entries.len()
    }

    /// Pending requests, oldest first.
    pub fn pending(&self) -> Vec<PendingApproval> {
        let mut snapshot: Vec<PendingApproval> = lock(&self.pending)
            .iter()
            .map(|(id, entry)| PendingApproval {
                request_id: *id,
                session_topic: entry.session_topic.clone(),
                method: entry.method,
                prompt: entry.prompt.clone(),
                created_at: entry.created_at,
            })
            .collect();
        snapshot.sort_by_key(|pending| pending.created_at);
        snapshot
    }
}

/// The waiting side of a deferred request. Exactly one decision comes
/// out of [`ApprovalTicket::wait`]; dropping the ticket without waiting
/// removes the pending entry.
#[derive(Debug)]
pub struct ApprovalTicket {
    request_id: u64,
    decision: oneshot::Receiver<ApprovalDecision>,
    cancel: CancellationToken,
    pending: PendingMap,
}

impl ApprovalTicket {
    /// Waits for the user's decision. Session teardown and a vanished
    /// resolver both settle as a plain rejection.
    pub async fn wait(mut self) -> ApprovalDecision {
        tokio::select! {
            decision = &mut self.decision => {
                decision.unwrap_or(ApprovalDecision::Rejected { message: None })
            }
            _ = self.cancel.cancelled() => ApprovalDecision::Rejected { message: None },
        }
    }
}

impl Drop for ApprovalTicket {
    fn drop(&mut self) {
        // No-op after resolve or cancel_session; removes the entry when
        // the waiting task was dropped mid-flight.
        lock(&self.pending).remove(&self.request_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prompt() -> ApprovalPrompt {
        ApprovalPrompt {
            summary: "Sign message".to_string(),
            display: json!({ "message": "hello" }),
        }
    }

    fn topic(name: &str) -> SessionTopic {
        SessionTopic::from(name)
    }

    fn begin(controller: &ApprovalController, id: u64, session: &str) -> ApprovalTicket {
        controller
            .begin(id, topic(session), RpcMethod::AvalancheSignMessage, prompt())
            .expect("no pending entry for id")
    }

    #[tokio::test]
    async fn approval_reaches_the_waiting_ticket() {
        let controller = ApprovalController::new();
        let ticket = begin(&controller, 1, "s1");

        controller
            .resolve(1, ApprovalDecision::Approved { data: None })
            .unwrap();

        assert_eq!(
            ticket.wait().await,
            ApprovalDecision::Approved { data: None }
        );
        assert!(controller.pending().is_empty());
    }

    #[tokio::test]
    async fn rejection_carries_the_optional_message() {
        let controller = ApprovalController::new();
        let ticket = begin(&controller, 1, "s1");

        controller
            .resolve(
                1,
                ApprovalDecision::Rejected {
                    message: Some("boom".to_string()),
                },
            )
            .unwrap();

        assert_eq!(
            ticket.wait().await,
            ApprovalDecision::Rejected {
                message: Some("boom".to_string())
            }
        );
    }

    #[tokio::test]
    async fn resolution_is_exactly_once() {
        let controller = ApprovalController::new();
        let ticket = begin(&controller, 7, "s1");

        controller
            .resolve(7, ApprovalDecision::Approved { data: None })
            .unwrap();
        let second = controller
            .resolve(7, ApprovalDecision::Rejected { message: None })
            .unwrap_err();

        assert_eq!(second, ApprovalError::NotPending(7));
        assert_eq!(
            ticket.wait().await,
            ApprovalDecision::Approved { data: None }
        );
    }

    #[tokio::test]
    async fn resolving_an_unknown_id_is_not_pending() {
        let controller = ApprovalController::new();
        let err = controller
            .resolve(99, ApprovalDecision::Approved { data: None })
            .unwrap_err();
        assert_eq!(err, ApprovalError::NotPending(99));
    }

    #[tokio::test]
    async fn duplicate_request_id_is_refused_while_pending() {
        let controller = ApprovalController::new();
        let _ticket = begin(&controller, 5, "s1");

        let err = controller
            .begin(5, topic("s1"), RpcMethod::EthSign, prompt())
            .unwrap_err();
        assert_eq!(err, ApprovalError::AlreadyPending(5));
    }

    #[tokio::test]
    async fn session_teardown_cancels_its_requests_only() {
        let controller = ApprovalController::new();
        let doomed = begin(&controller, 1, "closing");
        let kept = begin(&controller, 2, "staying");

        assert_eq!(controller.cancel_session(&topic("closing")), 1);

        assert_eq!(
            doomed.wait().await,
            ApprovalDecision::Rejected { message: None }
        );
        let still_pending = controller.pending();
        assert_eq!(still_pending.len(), 1);
        assert_eq!(still_pending[0].request_id, 2);
        drop(kept);
    }

    #[tokio::test]
    async fn dropped_ticket_cleans_up_its_entry() {
        let controller = ApprovalController::new();
        let ticket = begin(&controller, 3, "s1");
        drop(ticket);

        assert!(controller.pending().is_empty());
        let err = controller
            .resolve(3, ApprovalDecision::Approved { data: None })
            .unwrap_err();
        assert_eq!(err, ApprovalError::NotPending(3));
    }

    #[tokio::test]
    async fn pending_snapshot_is_oldest_first() {
        let controller = ApprovalController::new();
        let _first = begin(&controller, 10, "s1");
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let _second = begin(&controller, 4, "s1");

        let pending = controller.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].request_id, 10);
        assert_eq!(pending[1].request_id, 4);
        assert_eq!(pending[0].prompt.summary, "Sign message");
    }

    #[tokio::test]
    async fn approved_data_travels_to_the_ticket() {
        let controller = ApprovalController::new();
        let ticket = begin(&controller, 1, "s1");

        controller
            .resolve(
                1,
                ApprovalDecision::Approved {
                    data: Some(json!({ "edited": true })),
                },
            )
            .unwrap();

        match ticket.wait().await {
            ApprovalDecision::Approved { data: Some(data) } => {
                assert_eq!(data["edited"], true);
            }
            other => panic!("unexpected decision {other:?}"),
        }
    }
}
