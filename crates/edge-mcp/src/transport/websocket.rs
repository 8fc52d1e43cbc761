//! WebSocket transport built on tokio-tungstenite.
//!
//! Each dial runs on its own tokio task. The task forwards inbound frames
//! into an event channel and writes outbound text from a command channel;
//! `poll()` drains the event channel without blocking.

use futures_util::{SinkExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use crate::config::HeartbeatConfig;
use crate::types::{McpError, McpResult};

use super::{Endpoint, Transport, TransportEvent};

/// One dial and, if it succeeds, the link that follows.
struct Link {
    outbound: UnboundedSender<String>,
    events: UnboundedReceiver<TransportEvent>,
    task: JoinHandle<()>,
}

/// WebSocket transport with protocol-level ping keep-alive.
pub struct WebSocketTransport {
    runtime: Handle,
    heartbeat: HeartbeatConfig,
    link: Option<Link>,
    /// Events left over from a link that was replaced before being drained.
    backlog: Vec<TransportEvent>,
}

impl WebSocketTransport {
    pub fn new(runtime: Handle, heartbeat: HeartbeatConfig) -> Self {
        Self {
            runtime,
            heartbeat,
            link: None,
            backlog: Vec::new(),
        }
    }

    fn retire_link(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.task.abort();
            drain_into(&mut link.events, &mut self.backlog);
        }
    }
}

impl Transport for WebSocketTransport {
    fn open(&mut self, endpoint: &Endpoint) -> McpResult<()> {
        self.retire_link();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let url = endpoint.url();
        tracing::info!("Dialing WebSocket endpoint: {url}");

        let task = self.runtime.spawn(run_link(
            url,
            self.heartbeat.clone(),
            event_tx,
            outbound_rx,
        ));

        self.link = Some(Link {
            outbound: outbound_tx,
            events: event_rx,
            task,
        });
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> McpResult<()> {
        let link = self.link.as_ref().ok_or(McpError::NotConnected)?;
        link.outbound
            .send(text.to_string())
            .map_err(|_| McpError::Transport("WebSocket link closed".to_string()))
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        let mut events = std::mem::take(&mut self.backlog);
        if let Some(link) = self.link.as_mut() {
            let start = events.len();
            drain_into(&mut link.events, &mut events);
            // Close is the last event a link task sends, so the link is done
            // even if the task has not been reaped yet.
            if events[start..].contains(&TransportEvent::Close) {
                self.link = None;
            }
        }
        events
    }

    fn close(&mut self) {
        if let Some(link) = self.link.take() {
            tracing::debug!("Closing WebSocket link");
            link.task.abort();
        }
    }

    fn is_idle(&self) -> bool {
        self.link
            .as_ref()
            .map_or(true, |link| link.task.is_finished())
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        self.close();
    }
}

fn drain_into(events: &mut UnboundedReceiver<TransportEvent>, out: &mut Vec<TransportEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => out.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
        }
    }
}

async fn run_link(
    url: String,
    heartbeat: HeartbeatConfig,
    events: UnboundedSender<TransportEvent>,
    mut outbound: UnboundedReceiver<String>,
) {
    let stream = match tokio::time::timeout(heartbeat.connect_timeout, connect_async(url.as_str()))
        .await
    {
        Ok(Ok((stream, _response))) => stream,
        Ok(Err(e)) => {
            let _ = events.send(TransportEvent::Error(format!("WebSocket connection failed: {e}")));
            let _ = events.send(TransportEvent::Close);
            return;
        }
        Err(_) => {
            let _ = events.send(TransportEvent::Error(format!(
                "WebSocket connection timed out after {:?}",
                heartbeat.connect_timeout
            )));
            let _ = events.send(TransportEvent::Close);
            return;
        }
    };

    if events.send(TransportEvent::Open).is_err() {
        return;
    }

    let (mut sink, mut stream) = stream.split();
    let mut ping = tokio::time::interval(heartbeat.ping_interval);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_seen = Instant::now();

    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        last_seen = Instant::now();
                        if events.send(TransportEvent::Text(text)).is_err() {
                            break;
                        }
                    }
                    Some(Ok(WsMessage::Binary(data))) => {
                        last_seen = Instant::now();
                        if events.send(TransportEvent::Binary(data)).is_err() {
                            break;
                        }
                    }
                    Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {
                        last_seen = Instant::now();
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        tracing::info!("WebSocket closed by peer");
                        break;
                    }
                    Some(Ok(WsMessage::Frame(_))) => {}
                    Some(Err(e)) => {
                        let _ = events.send(TransportEvent::Error(format!("WebSocket error: {e}")));
                        break;
                    }
                }
            }

            message = outbound.recv() => {
                let Some(text) = message else { break };
                if let Err(e) = sink.send(WsMessage::Text(text)).await {
                    let _ = events.send(TransportEvent::Error(format!("WebSocket send failed: {e}")));
                    break;
                }
            }

            _ = ping.tick() => {
                if last_seen.elapsed() > heartbeat.disconnect_timeout {
                    tracing::warn!(
                        "Nothing received for {:?}, dropping WebSocket link",
                        heartbeat.disconnect_timeout
                    );
                    break;
                }
                if let Err(e) = sink.send(WsMessage::Ping(Vec::new())).await {
                    let _ = events.send(TransportEvent::Error(format!("WebSocket ping failed: {e}")));
                    break;
                }
            }
        }
    }

    // A dead peer may never drain the close frame.
    let _ = tokio::time::timeout(heartbeat.disconnect_timeout, sink.close()).await;
    let _ = events.send(TransportEvent::Close);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_idle_as_soon_as_close_is_polled() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut transport = WebSocketTransport::new(Handle::current(), HeartbeatConfig::default());
        let endpoint = Endpoint::parse(&format!("ws://127.0.0.1:{port}/")).unwrap();
        transport.open(&endpoint).unwrap();
        assert!(!transport.is_idle());

        let mut events = Vec::new();
        for _ in 0..500 {
            events.extend(transport.poll());
            if events.contains(&TransportEvent::Close) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(events.contains(&TransportEvent::Close), "refused dial must report Close");
        assert!(transport.is_idle());
        assert!(transport.send_text("late").is_err());
    }
}
