// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bank Auth Server - token-authenticated banking API
//!
//! Users log in for a short-lived access token and present it as a bearer
//! credential to manage their accounts and transfers.
//!
//! ## Modules
//!
//! - `token` - Token payload and the two token makers (sealed and JWT)
//! - `auth` - Bearer authentication middleware and payload extractor
//! - `api` - HTTP API handlers (Axum)
//! - `store` - In-memory users, accounts and transfers

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod ownership;
pub mod password;
pub mod state;
pub mod store;
pub mod token;
