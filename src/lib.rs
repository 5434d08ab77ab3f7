// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational dApp Gateway - Approval-Gated Wallet JSON-RPC Service
//!
//! This crate is the dApp-facing request pipeline of the Relational
//! wallet: it accepts WalletConnect-style JSON-RPC calls over connected
//! sessions, validates their parameters, gates sensitive operations
//! behind explicit user approval, and executes approved actions against
//! the wallet provider.
//!
//! ## Modules
//!
//! - `api` - HTTP surface (Axum): sessions, RPC submission, approvals
//! - `rpc` - JSON-RPC pipeline: methods, params, handlers, approvals
//! - `session` - dApp session registry and per-session allow-lists
//! - `provider` - wallet provider seam and the dev implementation
//! - `state` - shared application state wiring the above together

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod rpc;
pub mod session;
pub mod state;
