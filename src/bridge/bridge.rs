//! The correlation core: command methods over the frame transport.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, trace, warn};

use super::config::BridgeConfig;
use super::pending::{PendingGuard, PendingRequests};
use crate::error::BridgeError;
use crate::path::DerivationPath;
use crate::transport::{
    Action, FrameHost, FramePort, InboundMessage, Reply, RequestEnvelope, Transport, FRAME_TARGET,
};
use crate::types::{
    AppVersion, DerivedAddress, ExtendedPublicKey, InputTypeUtxo, SignTransactionResponse,
    TxOutput,
};

/// Client-side bridge to the Ledger Cardano app.
///
/// Commands are serialized into envelopes, posted through the transport to
/// the bridge page, and settled when a reply with a matching origin, request
/// id and action name comes back. Everything past the transport (USB/U2F,
/// the signing protocol itself) belongs to the bridge page.
pub struct LedgerBridge<T: Transport> {
    config: BridgeConfig,
    transport: T,
    pending: Arc<PendingRequests>,
    router: JoinHandle<()>,
}

impl LedgerBridge<FrameHost> {
    /// Creates a bridge backed by a frame endpoint at the configured URL,
    /// returning the embedder-side port along with it.
    pub fn connect(config: BridgeConfig) -> Result<(Self, FramePort), BridgeError> {
        config.validate()?;
        let (frame, port) = FrameHost::attach(config.frame_url());
        Ok((LedgerBridge::new(config, frame)?, port))
    }
}

impl<T: Transport> LedgerBridge<T> {
    /// Wires the bridge onto `transport` and starts routing replies.
    ///
    /// Must be called within a tokio runtime; the reply router runs as a
    /// spawned task until the bridge is disposed.
    pub fn new(config: BridgeConfig, mut transport: T) -> Result<Self, BridgeError> {
        config.validate()?;
        let events = transport.take_events()?;
        let pending = Arc::new(PendingRequests::default());
        let router = tokio::spawn(route_replies(
            events,
            Arc::clone(&pending),
            config.trusted_origin(),
        ));
        Ok(LedgerBridge {
            config,
            transport,
            pending,
            router,
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Version of the Cardano app running on the device.
    pub async fn get_version(&self) -> Result<AppVersion, BridgeError> {
        let payload = self.dispatch(Action::GetVersion, json!({})).await?;
        decode(Action::GetVersion, payload)
    }

    /// Extended public key at `path`.
    pub async fn get_extended_public_key(
        &self,
        path: DerivationPath,
    ) -> Result<ExtendedPublicKey, BridgeError> {
        let payload = self
            .dispatch(Action::GetExtendedPublicKey, json!({ "hdPath": path }))
            .await?;
        decode(Action::GetExtendedPublicKey, payload)
    }

    /// Address at `path`, derived on the device.
    pub async fn derive_address(&self, path: DerivationPath) -> Result<DerivedAddress, BridgeError> {
        let payload = self
            .dispatch(Action::DeriveAddress, json!({ "hdPath": path }))
            .await?;
        decode(Action::DeriveAddress, payload)
    }

    /// Has the device sign a transaction spending `inputs` into `outputs`.
    /// The device shows the transaction for confirmation, so this can stay
    /// in flight for as long as the user deliberates.
    pub async fn sign_transaction(
        &self,
        inputs: &[InputTypeUtxo],
        outputs: &[TxOutput],
    ) -> Result<SignTransactionResponse, BridgeError> {
        let payload = self
            .dispatch(
                Action::SignTransaction,
                json!({ "inputs": inputs, "outputs": outputs }),
            )
            .await?;
        decode(Action::SignTransaction, payload)
    }

    /// Tears the bridge down: the router stops and every in-flight request
    /// fails with [`BridgeError::Disposed`]. Also runs on drop.
    pub fn dispose(&self) {
        self.router.abort();
        self.pending.clear();
    }

    async fn dispatch(&self, action: Action, params: Value) -> Result<Value, BridgeError> {
        let (request_id, reply_rx) = self.pending.register(action);
        let _guard = PendingGuard::new(&self.pending, request_id);

        self.transport
            .post(RequestEnvelope {
                target: FRAME_TARGET.to_string(),
                action,
                request_id,
                params,
            })
            .await?;

        let reply = match self.config.timeout {
            Some(timeout) => match time::timeout(timeout, reply_rx).await {
                Ok(settled) => settled,
                Err(_) => return Err(BridgeError::Timeout { action, timeout }),
            },
            None => reply_rx.await,
        }
        .map_err(|_| BridgeError::Disposed)?;

        if reply.success {
            Ok(reply.payload)
        } else {
            Err(BridgeError::AppFailed { action })
        }
    }
}

impl<T: Transport> Drop for LedgerBridge<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn decode<R: serde::de::DeserializeOwned>(action: Action, payload: Value) -> Result<R, BridgeError> {
    serde_json::from_value(payload).map_err(|source| BridgeError::UnexpectedPayload { action, source })
}

/// Consumes the page-level event stream and settles pending requests.
///
/// Filtering order: origin first, then parseability, then request id, then
/// the `-reply` action suffix. A reply whose id matches but whose action
/// does not is dropped and the request stays pending.
async fn route_replies(
    mut events: UnboundedReceiver<InboundMessage>,
    pending: Arc<PendingRequests>,
    trusted_origin: String,
) {
    while let Some(event) = events.recv().await {
        if event.origin != trusted_origin {
            trace!(origin = %event.origin, "ignoring message from untrusted origin");
            continue;
        }
        let reply = match serde_json::from_value::<Reply>(event.data) {
            Ok(reply) => reply,
            Err(err) => {
                debug!(%err, "ignoring unparsable message from bridge origin");
                continue;
            }
        };
        let Some(expected) = pending.expected_action(reply.request_id) else {
            debug!(request_id = reply.request_id, "reply for unknown or finished request");
            continue;
        };
        if reply.action != expected.reply_action() {
            warn!(
                request_id = reply.request_id,
                action = %reply.action,
                expected = %expected.reply_action(),
                "reply action does not match pending request"
            );
            continue;
        }
        pending.settle(reply.request_id, reply);
    }
}
