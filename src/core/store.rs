//! Latest-wins holder for the loaded coverage data.
//!
//! Every load takes a ticket from [`CoverageStore::begin`]; only the result
//! carrying the most recently issued ticket is applied, so a slow, older load
//! can never overwrite a newer one.

use crate::core::etl::EtlEngine;
use crate::core::{CoverageData, Pipeline};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded {
        data: Arc<CoverageData>,
        loaded_at: DateTime<Utc>,
    },
    /// Raw message of whatever stopped the load.
    Failed { message: String },
}

impl LoadState {
    pub fn data(&self) -> Option<&CoverageData> {
        match self {
            LoadState::Loaded { data, .. } => Some(data.as_ref()),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
pub struct CoverageStore {
    latest: AtomicU64,
    state: RwLock<LoadState>,
}

impl CoverageStore {
    pub fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
            state: RwLock::new(LoadState::Idle),
        }
    }

    pub async fn begin(&self) -> LoadTicket {
        let mut state = self.state.write().await;
        *state = LoadState::Loading;
        LoadTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Applies `result` if `ticket` is still the latest; returns whether it was.
    pub async fn complete(&self, ticket: LoadTicket, result: Result<CoverageData>) -> bool {
        let mut state = self.state.write().await;
        if !self.is_current(ticket) {
            tracing::debug!("Discarding result of superseded load {}", ticket.0);
            return false;
        }

        *state = match result {
            Ok(data) => LoadState::Loaded {
                data: Arc::new(data),
                loaded_at: Utc::now(),
            },
            Err(e) => {
                tracing::error!("Load failed: {}", e);
                LoadState::Failed {
                    message: e.to_string(),
                }
            }
        };
        true
    }

    pub async fn refresh<P: Pipeline>(&self, engine: &EtlEngine<P>) -> bool {
        let ticket = self.begin().await;
        let result = engine.load_data().await;
        self.complete(ticket, result).await
    }

    pub async fn snapshot(&self) -> LoadState {
        self.state.read().await.clone()
    }
}

impl Default for CoverageStore {
    fn default() -> Self {
        Self::new()
    }
}
