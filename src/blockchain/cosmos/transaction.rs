//! Cosmos `MsgSend` 构建和sign (Amino JSON / Protobuf Direct)

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::address;
use super::amino::{self, AminoCoin, AminoFee, AminoMsg, AminoPubKey, BroadcastTx, MsgSendValue, StdSignDoc, StdSignature, StdTx};
use super::proto::{self, Coin};
use crate::blockchain::traits::SignedTransaction;
use crate::core::amount::scale_amount;
use crate::core::config::CosmosConfig;
use crate::core::domain::{ChainId, Curve, KeyMaterial, Signers};
use crate::core::errors::{Result, SignerError};
use crate::crypto::sha256;
use crate::crypto::signature_utils::ecdsa_sign_compact;

/// Sign-doc flavour, chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignMode {
    /// Legacy Amino JSON, broadcast with `mode: "sync"`.
    #[default]
    Amino,
    /// Protobuf `SignDoc`, broadcast as `tx_bytes`.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CosmosTxParams {
    pub from: String,
    pub to: String,
    /// Human amount, scaled by `decimals`.
    pub amount: String,
    /// Human fee, scaled by `decimals`.
    pub fee: String,
    pub gas: u64,
    pub memo: String,
    pub chain_id: String,
    pub account_number: u64,
    pub sequence: u64,
    /// Overrides the configured denom.
    pub denom: Option<String>,
    /// Overrides the configured decimals.
    pub decimals: Option<u32>,
    pub mode: SignMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosmosUnsignedTx {
    pub mode: SignMode,
    pub prefix: String,
    pub chain_id: String,
    pub account_number: u64,
    pub sequence: u64,
    pub from: String,
    pub to: String,
    pub amount: Coin,
    pub fee: Coin,
    pub gas: u64,
    pub memo: String,
}

impl CosmosUnsignedTx {
    fn amino_msgs(&self) -> Vec<AminoMsg> {
        vec![AminoMsg {
            msg_type: amino::MSG_SEND_TYPE.to_string(),
            value: MsgSendValue {
                amount: vec![amino_coin(&self.amount)],
                from_address: self.from.clone(),
                to_address: self.to.clone(),
            },
        }]
    }

    fn amino_fee(&self) -> AminoFee {
        AminoFee { amount: vec![amino_coin(&self.fee)], gas: self.gas.to_string() }
    }

    pub fn amino_sign_doc(&self) -> StdSignDoc {
        StdSignDoc {
            account_number: self.account_number.to_string(),
            chain_id: self.chain_id.clone(),
            fee: self.amino_fee(),
            memo: self.memo.clone(),
            msgs: self.amino_msgs(),
            sequence: self.sequence.to_string(),
        }
    }

    /// Serialized `TxBody`; independent of the signer.
    pub fn body_bytes(&self) -> Vec<u8> {
        let send = proto::msg_send(&self.from, &self.to, std::slice::from_ref(&self.amount));
        let msg = proto::any(proto::MSG_SEND_TYPE_URL, &send);
        proto::tx_body(&[msg], &self.memo)
    }

    pub fn auth_info_bytes(&self, public_key: &[u8]) -> Vec<u8> {
        proto::auth_info(public_key, self.sequence, std::slice::from_ref(&self.fee), self.gas)
    }
}

fn amino_coin(coin: &Coin) -> AminoCoin {
    AminoCoin { amount: coin.amount.clone(), denom: coin.denom.clone() }
}

pub fn build(params: &CosmosTxParams, config: &CosmosConfig) -> Result<CosmosUnsignedTx> {
    if params.chain_id.is_empty() {
        return Err(SignerError::invalid_input("chain_id is required"));
    }
    for (name, addr) in [("from", &params.from), ("to", &params.to)] {
        address::decode(addr, &config.prefix)
            .map_err(|e| SignerError::invalid_input(format!("invalid {} address: {}", name, e)))?;
    }
    let decimals = params.decimals.unwrap_or(config.decimals);
    let denom = params.denom.clone().unwrap_or_else(|| config.denom.clone());
    if denom.is_empty() {
        return Err(SignerError::invalid_input("denom is required"));
    }
    let amount = scale_amount(&params.amount, decimals)?;
    let fee = scale_amount(&params.fee, decimals)?;
    debug!("cosmos MsgSend {} {} (fee {}) mode={:?}", amount, denom, fee, params.mode);

    Ok(CosmosUnsignedTx {
        mode: params.mode,
        prefix: config.prefix.clone(),
        chain_id: params.chain_id.clone(),
        account_number: params.account_number,
        sequence: params.sequence,
        from: params.from.clone(),
        to: params.to.clone(),
        amount: Coin { denom: denom.clone(), amount: amount.to_string() },
        fee: Coin { denom, amount: fee.to_string() },
        gas: params.gas,
        memo: params.memo.clone(),
    })
}

pub fn sign(unsigned: &CosmosUnsignedTx, keys: KeyMaterial<'_>) -> Result<SignedTransaction> {
    let signers = Signers::resolve(&keys, Curve::Secp256k1)?;
    let key = signers.primary()?;
    let own = address::encode(key.public_key(), &unsigned.prefix)?;
    if own != unsigned.from {
        return Err(SignerError::signing(format!(
            "from address {} does not belong to the signing key {}",
            unsigned.from, own
        )));
    }
    let secret = key.secp_secret_key()?;

    let (raw, hash) = match unsigned.mode {
        SignMode::Amino => {
            let doc = unsigned.amino_sign_doc();
            let sign_bytes = doc.sign_bytes()?;
            let signature = ecdsa_sign_compact(sha256(&sign_bytes), &secret);
            let tx = BroadcastTx {
                tx: StdTx {
                    msg: doc.msgs,
                    fee: doc.fee,
                    signatures: vec![StdSignature {
                        pub_key: AminoPubKey {
                            key_type: amino::PUBKEY_TYPE,
                            value: STANDARD.encode(key.public_key()),
                        },
                        signature: STANDARD.encode(signature),
                    }],
                    memo: doc.memo,
                },
                mode: "sync",
            };
            let raw = serde_json::to_string(&tx)
                .map_err(|e| SignerError::encoding(format!("amino tx serialization failed: {}", e)))?;
            (raw, hex::encode_upper(sha256(&sign_bytes)))
        }
        SignMode::Direct => {
            let body = unsigned.body_bytes();
            let auth_info = unsigned.auth_info_bytes(key.public_key());
            let doc = proto::sign_doc(&body, &auth_info, &unsigned.chain_id, unsigned.account_number);
            let signature = ecdsa_sign_compact(sha256(&doc), &secret);
            let tx_bytes = proto::tx_raw(&body, &auth_info, &signature);
            let raw = serde_json::json!({
                "tx_bytes": STANDARD.encode(&tx_bytes),
                "mode": "BROADCAST_MODE_SYNC",
            })
            .to_string();
            (raw, hex::encode_upper(sha256(&tx_bytes)))
        }
    };
    if raw.is_empty() {
        return Err(SignerError::signing("serialization produced empty output"));
    }
    info!("✅ cosmos transaction signed ({:?}), hash={}", unsigned.mode, hash);
    Ok(SignedTransaction { chain: ChainId::Cosmos, raw, hash })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::KeyPair;
    use pretty_assertions::assert_eq;

    const SK: &str = "2d687f974a2758d27843a0c4fc71304ee829994f5654ffd3b5a9dd2047f9dac3";
    const FROM: &str = "cosmos1r9x50xmfcqyt0wmfxmfrl7fwtju90gzehhl5y6";
    const TO: &str = "cosmos1s3ue4nzng0ghlf5xgkk4hzjzzlwxdemj9gflt4";

    fn params(mode: SignMode) -> CosmosTxParams {
        CosmosTxParams {
            from: FROM.into(),
            to: TO.into(),
            amount: "1.5".into(),
            fee: "0.005".into(),
            gas: 200_000,
            memo: "hello".into(),
            chain_id: "cosmoshub-4".into(),
            account_number: 12,
            sequence: 3,
            mode,
            ..Default::default()
        }
    }

    fn key() -> KeyPair {
        KeyPair::from_private_key_hex(SK, Curve::Secp256k1).unwrap()
    }

    #[test]
    fn test_amino_vector() {
        let unsigned = build(&params(SignMode::Amino), &CosmosConfig::default()).unwrap();
        let kp = key();
        let signed = sign(&unsigned, KeyMaterial::KeyPair(&kp)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&signed.raw).unwrap();
        assert_eq!(value["mode"], "sync");
        assert_eq!(value["tx"]["memo"], "hello");
        assert_eq!(value["tx"]["msg"][0]["type"], "cosmos-sdk/MsgSend");
        assert_eq!(value["tx"]["msg"][0]["value"]["amount"][0]["amount"], "1500000");
        assert_eq!(value["tx"]["fee"]["amount"][0]["amount"], "5000");
        assert_eq!(value["tx"]["fee"]["gas"], "200000");
        let sig = &value["tx"]["signatures"][0];
        assert_eq!(sig["pub_key"]["type"], "tendermint/PubKeySecp256k1");
        assert_eq!(sig["pub_key"]["value"], STANDARD.encode(kp.public_key()));
        assert_eq!(
            sig["signature"],
            "f4PFbfSFAlWGXThokUj5DcWYt6DbOJmK6oHD3rY6OXRV+Z5OsmMWbzEL0D5iwFS4HXtI4U9BupwWI0jS0jQGYg=="
        );
        // output object keeps broadcast field order
        assert!(signed.raw.starts_with(r#"{"tx":{"msg":"#));
    }

    #[test]
    fn test_direct_vector() {
        let unsigned = build(&params(SignMode::Direct), &CosmosConfig::default()).unwrap();
        assert_eq!(
            hex::encode(unsigned.body_bytes()),
            "0a90010a1c2f636f736d6f732e62616e6b2e763162657461312e4d736753656e6412700a2d636f736d6f73317239783530786d666371797430776d66786d66726c376677746a753930677a6568686c357936122d636f736d6f733173337565346e7a6e673067686c663578676b6b34687a6a7a7a6c777864656d6a3967666c74341a100a057561746f6d120731353030303030120568656c6c6f"
        );
        let kp = key();
        assert_eq!(
            hex::encode(unsigned.auth_info_bytes(kp.public_key())),
            "0a500a460a1f2f636f736d6f732e63727970746f2e736563703235366b312e5075624b657912230a21034e5261c47e339cc6650b7841f1d9490598a32306fd690dc8e0de9e25ae67784312040a020801180312130a0d0a057561746f6d12043530303010c09a0c"
        );
        let signed = sign(&unsigned, KeyMaterial::KeyPair(&kp)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&signed.raw).unwrap();
        assert_eq!(value["mode"], "BROADCAST_MODE_SYNC");
        let tx_bytes = "CpoBCpABChwvY29zbW9zLmJhbmsudjFiZXRhMS5Nc2dTZW5kEnAKLWNvc21vczFyOXg1MHhtZmNxeXQwd21meG1mcmw3Znd0anU5MGd6ZWhobDV5NhItY29zbW9zMXMzdWU0bnpuZzBnaGxmNXhna2s0aHpqenpsd3hkZW1qOWdmbHQ0GhAKBXVhdG9tEgcxNTAwMDAwEgVoZWxsbxJnClAKRgofL2Nvc21vcy5jcnlwdG8uc2VjcDI1NmsxLlB1YktleRIjCiEDTlJhxH4znMZlC3hB8dlJBZijIwb9aQ3I4N6eJa5neEMSBAoCCAEYAxITCg0KBXVhdG9tEgQ1MDAwEMCaDBpAHCOuHscEZLXGWDgtWJyrYDHQ//iJHRI8BJfEJ+sOkrBspK0QJNRjV4S33XhBHpPgEZXggg9nk6tjw9VZ/yPUbA==";
        assert_eq!(value["tx_bytes"], tx_bytes);
        let raw = STANDARD.decode(tx_bytes).unwrap();
        assert_eq!(signed.hash, hex::encode_upper(sha256(&raw)));
    }

    #[test]
    fn test_fractional_amount_rejected() {
        let bad = CosmosTxParams { amount: "0.0000001".into(), ..params(SignMode::Amino) };
        assert!(matches!(build(&bad, &CosmosConfig::default()), Err(SignerError::InvalidInput(_))));
        let bad_fee = CosmosTxParams { fee: "1.2345678".into(), ..params(SignMode::Direct) };
        assert!(matches!(build(&bad_fee, &CosmosConfig::default()), Err(SignerError::InvalidInput(_))));
    }

    #[test]
    fn test_from_must_belong_to_key() {
        let swapped = CosmosTxParams { from: TO.into(), to: FROM.into(), ..params(SignMode::Direct) };
        let unsigned = build(&swapped, &CosmosConfig::default()).unwrap();
        let kp = key();
        assert!(matches!(
            sign(&unsigned, KeyMaterial::KeyPair(&kp)),
            Err(SignerError::Signing(_))
        ));
    }

    #[test]
    fn test_rejects_foreign_prefix() {
        let config = CosmosConfig { prefix: "osmo".into(), ..CosmosConfig::default() };
        assert!(matches!(build(&params(SignMode::Amino), &config), Err(SignerError::InvalidInput(_))));
    }
}
