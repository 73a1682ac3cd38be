//! Process-wide secp256k1 context.
//!
//! libsecp256k1 contexts are expensive to build (precomputed tables) and immutable
//! once built, so one instance is created lazily and shared by every derivation,
//! tweak and signature in the crate.

use bitcoin::secp256k1::{All, Secp256k1};
use once_cell::sync::Lazy;

static SECP256K1: Lazy<Secp256k1<All>> = Lazy::new(|| {
    tracing::debug!("initializing secp256k1 context");
    Secp256k1::new()
});

/// Shared signing + verification context.
pub fn secp() -> &'static Secp256k1<All> {
    &SECP256K1
}
