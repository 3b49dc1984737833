use std::sync::Arc;

use service::stores::{ProfileRegistry, TransactionLedger};

/// Shared handler state: one store per collection, injected at startup.
#[derive(Clone)]
pub struct ServerState {
    pub profiles: Arc<dyn ProfileRegistry>,
    pub transactions: Arc<dyn TransactionLedger>,
}

impl ServerState {
    pub fn new(profiles: Arc<dyn ProfileRegistry>, transactions: Arc<dyn TransactionLedger>) -> Self {
        Self { profiles, transactions }
    }
}
