use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tokio::time;

use ledger_cardano_bridge::transport::{FrameHost, FramePort};
use ledger_cardano_bridge::{
    AppVersion, BridgeConfig, BridgeError, DerivationPath, InputTypeUtxo, LedgerBridge, TxOutput,
};

const TRUSTED_ORIGIN: &str = "https://emurgo.github.io";

fn _attach(timeout: Option<Duration>) -> (LedgerBridge<FrameHost>, FramePort) {
    let config = BridgeConfig {
        timeout,
        ..BridgeConfig::default()
    };
    LedgerBridge::connect(config).unwrap()
}

#[tokio::test]
async fn test_get_version_resolves_with_payload() {
    let (bridge, mut port) = _attach(Some(Duration::from_secs(1)));

    let responder = tokio::spawn(async move {
        let req = port.requests.recv().await.unwrap();
        assert_eq!(req.target, "ledger-cardano-bridge");
        assert_eq!(req.action.as_str(), "ledger-get-version");
        port.deliver(
            TRUSTED_ORIGIN,
            json!({
                "action": "ledger-get-version-reply",
                "requestId": req.request_id,
                "success": true,
                "payload": { "major": 1, "minor": 0, "patch": 0 },
            }),
        );
        port
    });

    let version = bridge.get_version().await.unwrap();
    assert_eq!(
        version,
        AppVersion {
            major: 1,
            minor: 0,
            patch: 0
        }
    );
    responder.await.unwrap();
}

#[tokio::test]
async fn test_get_extended_public_key() -> Result<()> {
    let (bridge, mut port) = _attach(Some(Duration::from_secs(1)));

    let responder = tokio::spawn(async move {
        let req = port.requests.recv().await.unwrap();
        assert_eq!(req.action.as_str(), "ledger-get-extended-public-key");
        assert_eq!(
            req.params["hdPath"],
            json!([2147483692u32, 2147485463u32, 2147483653u32, 1, 3])
        );
        port.deliver(
            TRUSTED_ORIGIN,
            json!({
                "action": "ledger-get-extended-public-key-reply",
                "requestId": req.request_id,
                "success": true,
                "payload": { "publicKeyHex": "aa00", "chainCodeHex": "bb11" },
            }),
        );
        port
    });

    let xpub = bridge
        .get_extended_public_key(DerivationPath::bip44(5, true, 3))
        .await?;
    assert_eq!(xpub.public_key_hex, "aa00");
    assert_eq!(xpub.chain_code_hex, "bb11");
    responder.await.unwrap();
    Ok(())
}

#[tokio::test]
async fn test_untrusted_origin_never_settles() {
    let (bridge, mut port) = _attach(None);

    let responder = tokio::spawn(async move {
        let req = port.requests.recv().await.unwrap();
        port.deliver(
            "https://evil.example",
            json!({
                "action": "ledger-get-version-reply",
                "requestId": req.request_id,
                "success": true,
                "payload": { "major": 9, "minor": 9, "patch": 9 },
            }),
        );
        port
    });

    let pending = time::timeout(Duration::from_millis(100), bridge.get_version()).await;
    assert!(pending.is_err(), "forged reply must not settle the request");
    responder.await.unwrap();
}

#[tokio::test]
async fn test_failure_reply_rejects_with_operation_name() {
    let (bridge, mut port) = _attach(Some(Duration::from_secs(1)));

    let responder = tokio::spawn(async move {
        let req = port.requests.recv().await.unwrap();
        // any payload alongside success: false is discarded
        port.deliver(
            TRUSTED_ORIGIN,
            json!({
                "action": "ledger-derive-address-reply",
                "requestId": req.request_id,
                "success": false,
                "payload": { "detail": "device said no" },
            }),
        );
        port
    });

    let err = bridge
        .derive_address(DerivationPath::bip44(0, false, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::AppFailed { .. }));
    assert_eq!(err.to_string(), "Ledger: ledger-derive-address failed");
    responder.await.unwrap();
}

#[tokio::test]
async fn test_mismatched_action_leaves_request_pending() {
    let (bridge, mut port) = _attach(Some(Duration::from_secs(1)));

    let responder = tokio::spawn(async move {
        let req = port.requests.recv().await.unwrap();
        // right id, wrong action: must be ignored
        port.deliver(
            TRUSTED_ORIGIN,
            json!({
                "action": "ledger-derive-address-reply",
                "requestId": req.request_id,
                "success": true,
                "payload": { "address58": "nope" },
            }),
        );
        port.deliver(
            TRUSTED_ORIGIN,
            json!({
                "action": "ledger-get-version-reply",
                "requestId": req.request_id,
                "success": true,
                "payload": { "major": 2, "minor": 1, "patch": 0 },
            }),
        );
        port
    });

    let version = bridge.get_version().await.unwrap();
    assert_eq!(version.major, 2);
    responder.await.unwrap();
}

#[tokio::test]
async fn test_concurrent_calls_settle_by_request_id() {
    let (bridge, mut port) = _attach(Some(Duration::from_secs(1)));

    let responder = tokio::spawn(async move {
        let first = port.requests.recv().await.unwrap();
        let second = port.requests.recv().await.unwrap();
        // answer in reverse order; the echoed ids keep the calls apart
        port.deliver(
            TRUSTED_ORIGIN,
            json!({
                "action": "ledger-get-version-reply",
                "requestId": second.request_id,
                "success": true,
                "payload": { "major": 2, "minor": 0, "patch": 0 },
            }),
        );
        port.deliver(
            TRUSTED_ORIGIN,
            json!({
                "action": "ledger-get-version-reply",
                "requestId": first.request_id,
                "success": true,
                "payload": { "major": 1, "minor": 0, "patch": 0 },
            }),
        );
        port
    });

    let (first, second) = tokio::join!(bridge.get_version(), bridge.get_version());
    assert_eq!(first.unwrap().major, 1);
    assert_eq!(second.unwrap().major, 2);
    responder.await.unwrap();
}

#[tokio::test]
async fn test_timeout_rejects_when_frame_never_replies() {
    let (bridge, mut port) = _attach(Some(Duration::from_millis(50)));

    let err = bridge.get_version().await.unwrap_err();
    assert!(matches!(err, BridgeError::Timeout { .. }));
    // the envelope was still posted before the timeout hit
    assert!(port.requests.try_recv().is_ok());
}

#[tokio::test]
async fn test_dispose_fails_pending_requests() {
    let (bridge, mut port) = _attach(None);
    let bridge = Arc::new(bridge);

    let caller = {
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move { bridge.get_version().await })
    };
    // wait until the request is in flight before tearing down
    let _req = port.requests.recv().await.unwrap();
    bridge.dispose();

    let err = caller.await.unwrap().unwrap_err();
    assert!(matches!(err, BridgeError::Disposed));
}

#[tokio::test]
async fn test_sign_transaction_roundtrip() -> Result<()> {
    let (bridge, mut port) = _attach(Some(Duration::from_secs(1)));

    let responder = tokio::spawn(async move {
        let req = port.requests.recv().await.unwrap();
        assert_eq!(req.action.as_str(), "ledger-sign-transaction");
        assert_eq!(req.params["inputs"][0]["txDataHex"], "deadbeef");
        assert_eq!(req.params["inputs"][0]["outputIndex"], 0);
        assert_eq!(req.params["outputs"][0]["address58"], "Ae2tdPwUPEZdest");
        assert_eq!(req.params["outputs"][1]["path"][3], 1);
        port.deliver(
            TRUSTED_ORIGIN,
            json!({
                "action": "ledger-sign-transaction-reply",
                "requestId": req.request_id,
                "success": true,
                "payload": {
                    "txHashHex": "abcd",
                    "witnesses": [{
                        "path": [2147483692u32, 2147485463u32, 2147483648u32, 0, 0],
                        "witnessSignatureHex": "beef",
                    }],
                },
            }),
        );
        port
    });

    let inputs = vec![InputTypeUtxo {
        tx_data_hex: "deadbeef".to_string(),
        output_index: 0,
        path: DerivationPath::bip44(0, false, 0),
    }];
    let outputs = vec![
        TxOutput::Address {
            amount_str: "700000".to_string(),
            address58: "Ae2tdPwUPEZdest".to_string(),
        },
        TxOutput::Change {
            amount_str: "42".to_string(),
            path: DerivationPath::bip44(0, true, 1),
        },
    ];

    let signed = bridge.sign_transaction(&inputs, &outputs).await?;
    assert_eq!(signed.tx_hash_hex, "abcd");
    assert_eq!(signed.witnesses.len(), 1);
    assert_eq!(signed.witnesses[0].path, DerivationPath::bip44(0, false, 0));
    assert_eq!(signed.witnesses[0].witness_signature_hex, "beef");
    responder.await.unwrap();
    Ok(())
}
