//! Result扩展工具
//!
//! 把第三方库的error转换为 [`SignerError`]，并记录日志，替代 unwrap/expect

use crate::core::errors::SignerError;

/// Which taxonomy bucket a foreign failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    InvalidInput,
    Derivation,
    Encoding,
    Signing,
}

impl ErrorClass {
    fn wrap(self, msg: String) -> SignerError {
        match self {
            ErrorClass::InvalidInput => SignerError::InvalidInput(msg),
            ErrorClass::Derivation => SignerError::Derivation(msg),
            ErrorClass::Encoding => SignerError::Encoding(msg),
            ErrorClass::Signing => SignerError::Signing(msg),
        }
    }
}

/// Result扩展trait
pub trait ResultExt<T> {
    /// Convert the failure into `class`, prefixing `context`, and log it at debug level.
    fn or_signer_err(self, class: ErrorClass, context: &str) -> Result<T, SignerError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn or_signer_err(self, class: ErrorClass, context: &str) -> Result<T, SignerError> {
        self.map_err(|e| {
            tracing::debug!("{} failed: {}", context, e);
            class.wrap(format!("{}: {}", context, e))
        })
    }
}

impl<T> ResultExt<T> for Option<T> {
    fn or_signer_err(self, class: ErrorClass, context: &str) -> Result<T, SignerError> {
        self.ok_or_else(|| {
            tracing::debug!("missing value: {}", context);
            class.wrap(context.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_maps_into_requested_class() {
        let r: Result<u8, String> = Err("boom".to_string());
        let err = r.or_signer_err(ErrorClass::Encoding, "decode payload").unwrap_err();
        assert_eq!(err, SignerError::Encoding("decode payload: boom".to_string()));
    }

    #[test]
    fn test_option_none_uses_context() {
        let none: Option<u8> = None;
        let err = none.or_signer_err(ErrorClass::Signing, "signer not found").unwrap_err();
        assert_eq!(err, SignerError::Signing("signer not found".to_string()));
        assert_eq!(Some(3u8).or_signer_err(ErrorClass::Signing, "unused").unwrap(), 3);
    }
}
