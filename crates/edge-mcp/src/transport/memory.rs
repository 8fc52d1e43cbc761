//! In-process transport driven by hand, for tests and simulations.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::{McpError, McpResult};

use super::{Endpoint, Transport, TransportEvent};

#[derive(Debug, Default)]
struct MemoryState {
    pending: VecDeque<TransportEvent>,
    sent: Vec<String>,
    dials: Vec<Endpoint>,
    closes: usize,
    /// A dial is in progress or the link is up.
    active: bool,
}

/// A scripted transport. Clones share state, so a test can keep a handle
/// while the connection manager owns the transport.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Complete the current dial successfully.
    pub fn accept(&self) {
        let mut state = self.state();
        state.active = true;
        state.pending.push_back(TransportEvent::Open);
    }

    /// Fail the current dial, or drop the live link.
    pub fn drop_link(&self) {
        let mut state = self.state();
        state.active = false;
        state.pending.push_back(TransportEvent::Close);
    }

    /// Deliver a text frame from the peer.
    pub fn push_text(&self, text: impl Into<String>) {
        self.push_event(TransportEvent::Text(text.into()));
    }

    pub fn push_event(&self, event: TransportEvent) {
        self.state().pending.push_back(event);
    }

    /// Frames sent so far, clearing the record.
    pub fn take_sent(&self) -> Vec<String> {
        std::mem::take(&mut self.state().sent)
    }

    /// Endpoints dialed so far.
    pub fn dials(&self) -> Vec<Endpoint> {
        self.state().dials.clone()
    }

    pub fn close_count(&self) -> usize {
        self.state().closes
    }
}

impl Transport for MemoryTransport {
    fn open(&mut self, endpoint: &Endpoint) -> McpResult<()> {
        let mut state = self.state();
        state.dials.push(endpoint.clone());
        state.active = true;
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> McpResult<()> {
        let mut state = self.state();
        if !state.active {
            return Err(McpError::Transport("No active link".to_string()));
        }
        state.sent.push(text.to_string());
        Ok(())
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        self.state().pending.drain(..).collect()
    }

    fn close(&mut self) {
        let mut state = self.state();
        state.active = false;
        state.closes += 1;
    }

    fn is_idle(&self) -> bool {
        !self.state().active
    }
}
