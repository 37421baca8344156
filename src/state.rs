use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::rag::RagEngine;

/// Shared, immutable per-process state. Clients are constructed once in the
/// binaries (or tests) and injected here; nothing behind this is mutable, so
/// concurrent requests need no coordination.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub engine: RagEngine,
    #[allow(dead_code)]
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(settings: Arc<Settings>, engine: RagEngine) -> Arc<Self> {
        Arc::new(AppState {
            settings,
            engine,
            started_at: Utc::now(),
        })
    }
}
