//! Signature helpers over the shared secp256k1 context and ed25519-dalek.

use bitcoin::key::TapTweak;
use bitcoin::secp256k1::{ecdsa, schnorr, Keypair, Message, SecretKey};
use ed25519_dalek::{Signer, SigningKey};

use crate::crypto::secp;

/// RFC 6979 ECDSA over a 32-byte digest, normalized to low-S.
pub fn ecdsa_sign(digest: [u8; 32], secret: &SecretKey) -> ecdsa::Signature {
    let message = Message::from_digest(digest);
    let mut sig = secp().sign_ecdsa(&message, secret);
    // libsecp256k1 already emits low-S; keep it explicit for callers that serialize compact
    sig.normalize_s();
    sig
}

/// 64-byte `r ‖ s` (Cosmos style, no recovery id).
pub fn ecdsa_sign_compact(digest: [u8; 32], secret: &SecretKey) -> [u8; 64] {
    ecdsa_sign(digest, secret).serialize_compact()
}

/// Ensure ECDSA signature uses low-S value (s <= n/2) to avoid malleability.
pub fn ensure_low_s(compact_sig: &[u8; 64]) -> Option<[u8; 64]> {
    let mut sig = ecdsa::Signature::from_compact(compact_sig).ok()?;
    sig.normalize_s();
    Some(sig.serialize_compact())
}

/// BIP-340 Schnorr signature for a taproot key-path spend.
///
/// The internal key is tweaked with an empty merkle root before signing.
pub fn schnorr_sign_taproot(digest: [u8; 32], secret: &SecretKey) -> schnorr::Signature {
    let keypair = Keypair::from_secret_key(secp(), secret);
    let tweaked = keypair.tap_tweak(secp(), None);
    let message = Message::from_digest(digest);
    secp().sign_schnorr_no_aux_rand(&message, &tweaked.to_inner())
}

/// Deterministic ed25519 signature over raw message bytes.
pub fn ed25519_sign(message: &[u8], key: &SigningKey) -> [u8; 64] {
    key.sign(message).to_bytes()
}
