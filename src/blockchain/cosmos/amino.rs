//! Amino JSON 签名文档 (legacy `cosmos-sdk/MsgSend`)
//!
//! Sign bytes are the sorted-key compact JSON with `&`, `<`, `>` escaped, the
//! same bytes cosmjs `serializeSignDoc` produces. Struct fields below are
//! declared alphabetically so serde emits them already sorted.

use serde::Serialize;

use crate::core::errors::{Result, SignerError};

pub const MSG_SEND_TYPE: &str = "cosmos-sdk/MsgSend";
pub const PUBKEY_TYPE: &str = "tendermint/PubKeySecp256k1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AminoCoin {
    pub amount: String,
    pub denom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AminoFee {
    pub amount: Vec<AminoCoin>,
    pub gas: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MsgSendValue {
    pub amount: Vec<AminoCoin>,
    pub from_address: String,
    pub to_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AminoMsg {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub value: MsgSendValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StdSignDoc {
    pub account_number: String,
    pub chain_id: String,
    pub fee: AminoFee,
    pub memo: String,
    pub msgs: Vec<AminoMsg>,
    pub sequence: String,
}

impl StdSignDoc {
    /// Canonical bytes that get SHA-256 hashed and signed.
    pub fn sign_bytes(&self) -> Result<Vec<u8>> {
        let json = serde_json::to_string(self)
            .map_err(|e| SignerError::encoding(format!("amino sign doc serialization failed: {}", e)))?;
        Ok(escape_characters(&json).into_bytes())
    }
}

fn escape_characters(json: &str) -> String {
    json.replace('&', "\\u0026").replace('<', "\\u003c").replace('>', "\\u003e")
}

#[derive(Debug, Clone, Serialize)]
pub struct AminoPubKey {
    #[serde(rename = "type")]
    pub key_type: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StdSignature {
    pub pub_key: AminoPubKey,
    pub signature: String,
}

/// Broadcast envelope `{"tx":{msg,fee,signatures,memo},"mode":"sync"}`.
#[derive(Debug, Clone, Serialize)]
pub struct StdTx {
    pub msg: Vec<AminoMsg>,
    pub fee: AminoFee,
    pub signatures: Vec<StdSignature>,
    pub memo: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BroadcastTx {
    pub tx: StdTx,
    pub mode: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(amount: &str) -> AminoCoin {
        AminoCoin { amount: amount.into(), denom: "uatom".into() }
    }

    #[test]
    fn test_sign_bytes_sorted_compact() {
        let doc = StdSignDoc {
            account_number: "12".into(),
            chain_id: "cosmoshub-4".into(),
            fee: AminoFee { amount: vec![coin("5000")], gas: "200000".into() },
            memo: "hello".into(),
            msgs: vec![AminoMsg {
                msg_type: MSG_SEND_TYPE.into(),
                value: MsgSendValue {
                    amount: vec![coin("1500000")],
                    from_address: "cosmos1r9x50xmfcqyt0wmfxmfrl7fwtju90gzehhl5y6".into(),
                    to_address: "cosmos1s3ue4nzng0ghlf5xgkk4hzjzzlwxdemj9gflt4".into(),
                },
            }],
            sequence: "3".into(),
        };
        let expected = r#"{"account_number":"12","chain_id":"cosmoshub-4","fee":{"amount":[{"amount":"5000","denom":"uatom"}],"gas":"200000"},"memo":"hello","msgs":[{"type":"cosmos-sdk/MsgSend","value":{"amount":[{"amount":"1500000","denom":"uatom"}],"from_address":"cosmos1r9x50xmfcqyt0wmfxmfrl7fwtju90gzehhl5y6","to_address":"cosmos1s3ue4nzng0ghlf5xgkk4hzjzzlwxdemj9gflt4"}}],"sequence":"3"}"#;
        assert_eq!(String::from_utf8(doc.sign_bytes().unwrap()).unwrap(), expected);
    }

    #[test]
    fn test_html_characters_escaped() {
        assert_eq!(
            escape_characters(r#"{"memo":"a<b>&c"}"#),
            r#"{"memo":"a\u003cb\u003e\u0026c"}"#
        );
    }
}
