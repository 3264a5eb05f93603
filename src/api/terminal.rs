//! Stripe Terminal service.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::Result;

/// Service for Stripe Terminal card readers.
pub struct TerminalService {
    inner: Arc<ClientInner>,
}

impl TerminalService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// A connection token for Terminal hardware. Returns the raw response
    /// body.
    pub async fn connection_token(&self) -> Result<serde_json::Value> {
        self.inner.get("/stripe_terminal_connection_token").await
    }
}
