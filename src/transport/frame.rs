//! Channel-backed endpoint standing in for the embedded bridge frame.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{InboundMessage, RequestEnvelope, Transport};
use crate::error::BridgeError;

/// Host-side handle to the embedded bridge frame.
///
/// No browsing context exists here: whoever embeds the crate receives the
/// matching [`FramePort`] and pumps real `postMessage` traffic through it
/// (tests drive it directly). Dropping either side detaches the frame.
pub struct FrameHost {
    frame_url: String,
    outgoing: UnboundedSender<RequestEnvelope>,
    events: Option<UnboundedReceiver<InboundMessage>>,
}

/// Embedder side of the frame: consumes posted envelopes and injects events
/// observed on the page-level message channel.
pub struct FramePort {
    pub requests: UnboundedReceiver<RequestEnvelope>,
    events: UnboundedSender<InboundMessage>,
}

impl FrameHost {
    /// Creates the frame endpoint pointed at `frame_url`.
    pub fn attach(frame_url: impl Into<String>) -> (Self, FramePort) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (evt_tx, evt_rx) = mpsc::unbounded_channel();
        let host = FrameHost {
            frame_url: frame_url.into(),
            outgoing: out_tx,
            events: Some(evt_rx),
        };
        let port = FramePort {
            requests: out_rx,
            events: evt_tx,
        };
        (host, port)
    }

    pub fn frame_url(&self) -> &str {
        &self.frame_url
    }
}

#[async_trait]
impl Transport for FrameHost {
    async fn post(&self, envelope: RequestEnvelope) -> Result<(), BridgeError> {
        self.outgoing
            .send(envelope)
            .map_err(|_| BridgeError::Transport("bridge frame is detached".to_string()))
    }

    fn take_events(&mut self) -> Result<UnboundedReceiver<InboundMessage>, BridgeError> {
        self.events
            .take()
            .ok_or_else(|| BridgeError::Transport("frame event stream already taken".to_string()))
    }
}

impl FramePort {
    /// Delivers an event on the page-level channel, tagged with the origin
    /// the embedding page observed it from.
    pub fn deliver(&self, origin: impl Into<String>, data: Value) {
        // a closed channel just means the bridge is gone; nothing to report
        let _ = self.events.send(InboundMessage {
            origin: origin.into(),
            data,
        });
    }
}
