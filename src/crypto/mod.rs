pub mod context;
pub mod hash;
pub mod signature_utils;

pub use self::context::secp;
pub use self::hash::{hash160, keccak256, sha256, sha256d};
