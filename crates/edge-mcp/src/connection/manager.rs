//! Connection state machine: dialing, liveness, and reconnection.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ConnectionConfig;
use crate::transport::{Endpoint, Transport, TransportEvent};
use crate::types::{McpError, McpResult};

use super::backoff::Backoff;
use super::clock::{Clock, SystemClock};

/// Connection status notification; `true` means connected.
pub type StatusCallback = Box<dyn FnMut(bool) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Owns the transport and drives the connection lifecycle from `tick()`.
pub struct ConnectionManager<T: Transport> {
    transport: T,
    clock: Arc<dyn Clock>,
    config: ConnectionConfig,
    endpoint: Option<Endpoint>,
    state: ConnectionState,
    backoff: Backoff,
    last_heartbeat: Option<Instant>,
    on_status: Option<StatusCallback>,
}

impl<T: Transport> ConnectionManager<T> {
    pub fn new(transport: T, config: ConnectionConfig) -> Self {
        Self::with_clock(transport, config, Arc::new(SystemClock))
    }

    pub fn with_clock(transport: T, config: ConnectionConfig, clock: Arc<dyn Clock>) -> Self {
        let backoff = Backoff::new(config.initial_backoff, config.max_backoff);
        Self {
            transport,
            clock,
            config,
            endpoint: None,
            state: ConnectionState::Disconnected,
            backoff,
            last_heartbeat: None,
            on_status: None,
        }
    }

    /// Set the callback notified on every connect/disconnect transition.
    pub fn set_status_callback(&mut self, callback: StatusCallback) {
        self.on_status = Some(callback);
    }

    /// Parse `endpoint` and start dialing it.
    ///
    /// Only a malformed endpoint is an error; dial failures show up later as
    /// transport events and are retried with backoff.
    pub fn connect(&mut self, endpoint: &str) -> McpResult<()> {
        let endpoint = Endpoint::parse(endpoint)?;

        if self.state == ConnectionState::Connected {
            self.disconnect();
        }
        self.backoff.reset();

        tracing::info!("Connecting to MCP endpoint: {endpoint}");
        if let Err(e) = self.transport.open(&endpoint) {
            tracing::warn!("Could not start dial to {endpoint}: {e}; will retry");
        }
        self.endpoint = Some(endpoint);
        Ok(())
    }

    /// Send a text frame. Fails with `NotConnected` unless connected.
    pub fn send(&mut self, message: &str) -> McpResult<()> {
        if self.state != ConnectionState::Connected {
            tracing::warn!("Not connected to the MCP endpoint, cannot send message");
            return Err(McpError::NotConnected);
        }
        tracing::debug!("Sending: {message}");
        self.transport.send_text(message)
    }

    /// Process transport events, then drive reconnection and heartbeat checks.
    ///
    /// Inbound text frames are handed to `on_text` together with the manager,
    /// so the handler can record heartbeats and send replies in place.
    pub fn tick<F>(&mut self, mut on_text: F)
    where
        F: FnMut(&mut Self, &str),
    {
        for event in self.transport.poll() {
            match event {
                TransportEvent::Open => self.handle_open(),
                TransportEvent::Close => self.handle_close(),
                TransportEvent::Text(text) => on_text(self, &text),
                TransportEvent::Binary(data) => {
                    tracing::info!("Ignoring binary frame of {} bytes", data.len());
                }
                TransportEvent::Error(reason) => {
                    tracing::warn!("Transport error: {reason}");
                }
            }
        }

        let now = self.clock.now();
        if self.state == ConnectionState::Disconnected {
            self.drive_reconnect(now);
        }
        self.check_heartbeat(now);
    }

    /// Drop the link. Safe to call repeatedly; notifies only on a real transition.
    ///
    /// Reconnection continues on later ticks; use [`shutdown`](Self::shutdown)
    /// to stop for good.
    pub fn disconnect(&mut self) {
        self.transport.close();
        self.last_heartbeat = None;
        if self.state == ConnectionState::Connected {
            self.state = ConnectionState::Disconnected;
            tracing::info!("Disconnected from MCP endpoint");
            self.notify(false);
        }
    }

    /// Disconnect and forget the endpoint so no reconnection is attempted.
    pub fn shutdown(&mut self) {
        self.disconnect();
        self.endpoint = None;
        self.backoff.reset();
    }

    /// Record an observed heartbeat at the current time.
    pub fn record_heartbeat(&mut self) {
        self.last_heartbeat = Some(self.clock.now());
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn last_heartbeat(&self) -> Option<Instant> {
        self.last_heartbeat
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn handle_open(&mut self) {
        if self.state == ConnectionState::Connected {
            tracing::debug!("Duplicate open event ignored");
            return;
        }
        self.state = ConnectionState::Connected;
        self.backoff.reset();
        tracing::info!("Connected to MCP endpoint");
        self.notify(true);
    }

    fn handle_close(&mut self) {
        if self.state != ConnectionState::Connected {
            tracing::debug!("Dial failed or link already down");
            return;
        }
        self.state = ConnectionState::Disconnected;
        self.last_heartbeat = None;
        tracing::info!("Connection to MCP endpoint lost");
        self.notify(false);
    }

    fn drive_reconnect(&mut self, now: Instant) {
        let Some(endpoint) = self.endpoint.as_ref() else {
            return;
        };
        if !self.backoff.try_attempt(now) {
            return;
        }

        tracing::info!(
            "Reconnecting (attempt {}, next wait {:.2}s)",
            self.backoff.attempts(),
            self.backoff.current().as_secs_f64()
        );

        if self.transport.is_idle() {
            if let Err(e) = self.transport.open(endpoint) {
                tracing::warn!("Could not start dial to {endpoint}: {e}");
            }
        }
    }

    fn check_heartbeat(&mut self, now: Instant) {
        if self.state != ConnectionState::Connected {
            return;
        }
        let Some(last) = self.last_heartbeat else {
            return;
        };
        let silence = now.saturating_duration_since(last);
        if silence > self.config.heartbeat_window {
            tracing::warn!(
                "No ping for {:.0}s, resetting connection",
                silence.as_secs_f64()
            );
            self.disconnect();
        }
    }

    fn notify(&mut self, connected: bool) {
        if let Some(callback) = self.on_status.as_mut() {
            callback(connected);
        }
    }
}
