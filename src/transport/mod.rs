mod frame;
mod message;
mod origin;

pub use frame::{FrameHost, FramePort};
pub use message::{Action, InboundMessage, Reply, RequestEnvelope, FRAME_TARGET};
pub use origin::origin_of;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::BridgeError;

/// Boundary between the correlation core and whatever actually carries
/// messages to the bridge page, so the core can run against a fake.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Posts an envelope towards the frame. No target-origin restriction is
    /// applied on send; validation happens on replies only.
    async fn post(&self, envelope: RequestEnvelope) -> Result<(), BridgeError>;

    /// Hands over the stream of page-level message events. Called once, at
    /// bridge construction.
    fn take_events(&mut self) -> Result<UnboundedReceiver<InboundMessage>, BridgeError>;
}
