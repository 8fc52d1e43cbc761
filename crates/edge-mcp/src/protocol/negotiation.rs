//! `initialize` handling: builds the fixed capability reply.

use serde_json::Value;

use crate::config::ServerIdentity;
use crate::types::{InitializeParams, InitializeResult};

/// Build the `initialize` result, logging what the peer told us about itself.
///
/// The reply is the same whatever the peer sends; malformed params are logged only.
pub fn negotiate(params: Option<Value>, identity: &ServerIdentity) -> InitializeResult {
    let params: InitializeParams = match params.map(serde_json::from_value).transpose() {
        Ok(params) => params.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Ignoring malformed initialize params: {e}");
            InitializeParams::default()
        }
    };

    if let Some(requested) = params.protocol_version.as_deref() {
        if requested != identity.protocol_version {
            tracing::warn!(
                "Peer requested protocol version {requested}, we speak {}. Proceeding with ours.",
                identity.protocol_version
            );
        }
    }

    match &params.client_info {
        Some(info) => tracing::info!("Initialize from peer: {} v{}", info.name, info.version),
        None => tracing::info!("Initialize from anonymous peer"),
    }

    InitializeResult::new(
        &identity.protocol_version,
        &identity.name,
        &identity.version,
    )
}
