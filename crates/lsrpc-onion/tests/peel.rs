//! Receiver-side walkthroughs: with oracle access to each hop's secret key,
//! an envelope peels layer by layer down to the original payload frame.

use lsrpc_crypto::{open, EphemeralKeypair};
use lsrpc_onion::{build_with_path, decode, Frame, RelayRoute, WrapperMeta};
use lsrpc_types::{CryptoError, Destination, Ed25519PublicKey, PathHop, Protocol, X25519PublicKey};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::collections::HashSet;

fn hop(keypair: &EphemeralKeypair, i: u8) -> PathHop {
    PathHop {
        ed25519_pubkey: Ed25519PublicKey::from_bytes([i; 32]),
        x25519_pubkey: *keypair.public(),
        ip: format!("10.0.0.{i}"),
        port: 22021,
    }
}

fn destination() -> Destination {
    Destination::new(
        "example.invalid",
        443,
        Protocol::Https,
        "/oxen/custom-endpoint/lsrpc",
    )
}

/// Opens one layer with the receiving hop's secret, returning the decoded
/// frame inside.
fn peel(blob: &[u8], sender_ephemeral: &X25519PublicKey, hop_kp: &EphemeralKeypair) -> Frame {
    let plain = open(blob, sender_ephemeral, hop_kp.secret()).expect("layer must authenticate");
    decode(&plain).expect("layer plaintext must be a frame")
}

#[test]
fn single_hop_envelope_decrypts_to_destination_frame() {
    let hop_kp = EphemeralKeypair::from_secret_bytes([5u8; 32]);
    let path = vec![hop(&hop_kp, 1)];
    let payload = json!({"method": "get_message", "params": {"msgId": "1757402775049"}});
    let payload_bytes = serde_json::to_vec(&payload).unwrap();

    let envelope = build_with_path(
        &payload,
        &destination(),
        &path,
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap();

    // Wrapper: u32_LE(blob len) || blob || {"ephemeral_key":...,"enc_type":"aes-gcm"}
    let wrapper = decode(&envelope.bytes).unwrap();
    let meta: WrapperMeta = serde_json::from_slice(&wrapper.tail).unwrap();
    assert_eq!(meta.ephemeral_key, envelope.entry_ephemeral_pub.to_hex());

    let sender_eph = X25519PublicKey::from_hex(&meta.ephemeral_key).unwrap();
    let layer = peel(&wrapper.inner, &sender_eph, &hop_kp);

    // Terminal routing carries the full HTTP target.
    assert_eq!(
        layer.tail,
        br#"{"host":"example.invalid","port":443,"protocol":"https","target":"/oxen/custom-endpoint/lsrpc"}"#
    );

    // Innermost frame: the payload plus the minimal destination annotation.
    let inner = decode(&layer.inner).unwrap();
    assert_eq!(inner.inner, payload_bytes);
    assert_eq!(inner.tail, br#"{"headers":{}}"#);
}

#[test]
fn three_hop_envelope_peels_in_order() {
    let kps: Vec<EphemeralKeypair> = (1..=3u8)
        .map(|i| EphemeralKeypair::from_secret_bytes([i * 11; 32]))
        .collect();
    let path: Vec<PathHop> = kps.iter().zip(1..).map(|(kp, i)| hop(kp, i)).collect();
    let payload = json!({"method": "store", "params": {"data": "aGVsbG8"}});

    let envelope = build_with_path(
        &payload,
        &destination(),
        &path,
        &mut StdRng::seed_from_u64(99),
    )
    .unwrap();

    let wrapper = decode(&envelope.bytes).unwrap();
    let mut blob = wrapper.inner;
    let mut sender_eph = envelope.entry_ephemeral_pub;
    let mut layer_sizes = vec![envelope.bytes.len(), blob.len()];

    // Hops 0 and 1 are relays: each learns only its successor.
    for i in 0..2 {
        let layer = peel(&blob, &sender_eph, &kps[i]);
        let route: RelayRoute = serde_json::from_slice(&layer.tail).unwrap();

        assert_eq!(route.destination, path[i + 1].ed25519_pubkey.to_hex());
        sender_eph = X25519PublicKey::from_hex(&route.ephemeral_key).unwrap();
        blob = layer.inner;
        layer_sizes.push(blob.len());
    }

    // Hop 2 is terminal: destination routing plus the payload frame.
    let layer = peel(&blob, &sender_eph, &kps[2]);
    let route: serde_json::Value = serde_json::from_slice(&layer.tail).unwrap();
    assert_eq!(route["host"], "example.invalid");
    assert_eq!(route["port"], 443);

    let inner = decode(&layer.inner).unwrap();
    assert_eq!(inner.inner, serde_json::to_vec(&payload).unwrap());
    layer_sizes.push(inner.inner.len());

    // Strictly shrinking as layers come off.
    for pair in layer_sizes.windows(2) {
        assert!(pair[0] > pair[1], "sizes must shrink: {layer_sizes:?}");
    }
}

#[test]
fn layer_ciphertext_length_is_plain_plus_overhead() {
    let hop_kp = EphemeralKeypair::from_secret_bytes([9u8; 32]);
    let path = vec![hop(&hop_kp, 1)];
    let payload = json!({});

    let envelope = build_with_path(
        &payload,
        &destination(),
        &path,
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();

    let wrapper = decode(&envelope.bytes).unwrap();
    let plain = open(
        &wrapper.inner,
        &envelope.entry_ephemeral_pub,
        hop_kp.secret(),
    )
    .unwrap();

    assert_eq!(wrapper.inner.len(), 12 + plain.len() + 16);
}

#[test]
fn tampered_layer_fails_authentication() {
    let hop_kp = EphemeralKeypair::from_secret_bytes([4u8; 32]);
    let path = vec![hop(&hop_kp, 1)];

    let envelope = build_with_path(
        &json!({"method": "ping"}),
        &destination(),
        &path,
        &mut StdRng::seed_from_u64(3),
    )
    .unwrap();

    let wrapper = decode(&envelope.bytes).unwrap();
    let mut blob = wrapper.inner;
    let mid = blob.len() / 2;
    blob[mid] ^= 0x40;

    let err = open(&blob, &envelope.entry_ephemeral_pub, hop_kp.secret()).unwrap_err();
    assert!(matches!(err, CryptoError::Auth));
}

#[test]
fn ephemeral_keys_never_repeat_across_builds() {
    let hop_kp = EphemeralKeypair::from_secret_bytes([8u8; 32]);
    let path = vec![hop(&hop_kp, 1)];
    let payload = json!({"method": "ping"});
    let mut rng = StdRng::seed_from_u64(1234);

    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let envelope = build_with_path(&payload, &destination(), &path, &mut rng).unwrap();
        assert!(
            seen.insert(envelope.entry_ephemeral_pub.to_hex()),
            "ephemeral key reused"
        );
    }
}

#[test]
fn empty_payload_builds() {
    let hop_kp = EphemeralKeypair::from_secret_bytes([2u8; 32]);
    let path = vec![hop(&hop_kp, 1)];

    let envelope = build_with_path(
        &json!({}),
        &destination(),
        &path,
        &mut StdRng::seed_from_u64(5),
    )
    .unwrap();

    let wrapper = decode(&envelope.bytes).unwrap();
    let layer = peel(&wrapper.inner, &envelope.entry_ephemeral_pub, &hop_kp);
    let inner = decode(&layer.inner).unwrap();

    assert_eq!(inner.inner, b"{}");
}
