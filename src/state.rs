// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::RwLock;

use crate::store::InMemoryStore;
use crate::token::Maker;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    /// Shared, immutable token maker chosen at startup.
    pub token_maker: Arc<dyn Maker>,
    pub access_token_duration: Duration,
}

impl AppState {
    pub fn new(
        store: InMemoryStore,
        token_maker: Arc<dyn Maker>,
        access_token_duration: Duration,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            token_maker,
            access_token_duration,
        }
    }
}
