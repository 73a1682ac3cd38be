//! TON 转账: internal order message wrapped in a signed external message
//!
//! `build` resolves everything that does not depend on the key (destination,
//! amount, memo payload, send mode). The wallet StateInit and address depend on
//! the public key, so the external message is assembled in `sign`.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info};

use super::address::TonAddress;
use super::boc;
use super::cell::{Cell, CellBuilder};
use super::wallet::WalletContract;
use crate::blockchain::traits::SignedTransaction;
use crate::core::amount::scale_amount;
use crate::core::config::{TonConfig, TonWalletVersion};
use crate::core::domain::{ChainId, Curve, KeyMaterial, Signers};
use crate::core::errors::{Result, SignerError};
use crate::crypto::signature_utils::ed25519_sign;

/// First deployment message never expires.
const NO_EXPIRY: u32 = u32::MAX;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TonTxParams {
    /// Optional sender; when set it must match the signing wallet.
    pub from: Option<String>,
    pub to: String,
    /// Human amount in TON (or `decimals` units).
    pub amount: String,
    pub decimals: Option<u32>,
    pub memo: Option<String>,
    /// Current wallet seqno; 0 deploys the wallet with the transfer.
    pub seqno: u32,
    /// Unix expiry; required when `seqno > 0`.
    pub valid_until: Option<u32>,
    pub send_mode: Option<u8>,
    /// Internal message bounce flag. Off by default so a transfer to an
    /// undeployed wallet is credited instead of returned.
    pub bounce: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TonUnsignedTx {
    pub version: TonWalletVersion,
    pub workchain: i8,
    pub seqno: u32,
    pub valid_until: u32,
    pub send_mode: u8,
    /// Internal message carrying the transfer.
    pub order: Arc<Cell>,
    pub from: Option<TonAddress>,
}

/// Text comment payload: 32-bit zero opcode followed by the UTF-8 bytes.
fn comment_payload(memo: Option<&str>) -> Result<Cell> {
    let mut b = CellBuilder::new();
    if let Some(text) = memo.filter(|m| !m.is_empty()) {
        if text.len() > (super::cell::MAX_BITS - 32) / 8 {
            return Err(SignerError::invalid_input("ton memo longer than 123 bytes"));
        }
        b.store_uint(0, 32)?.store_bytes(text.as_bytes())?;
    }
    Ok(b.build())
}

/// `int_msg_info$0 ihr_disabled bounce bounced src dest value ihr_fee fwd_fee created_lt created_at`
fn internal_message(dest: &TonAddress, bounce: bool, amount: u128, payload: Cell) -> Result<Cell> {
    let mut b = CellBuilder::new();
    b.store_bit(false)?
        .store_bit(true)?
        .store_bit(bounce)?
        .store_bit(false)?
        .store_address(None)?
        .store_address(Some(dest))?
        .store_coins(amount)?
        .store_bit(false)? // extra currencies
        .store_coins(0)?
        .store_coins(0)?
        .store_uint(0, 64)?
        .store_uint(0, 32)?
        .store_bit(false)? // no state init
        .store_maybe_inline(payload)?;
    Ok(b.build())
}

pub fn build(params: &TonTxParams, config: &TonConfig) -> Result<TonUnsignedTx> {
    let to: TonAddress = params
        .to
        .parse()
        .map_err(|e| SignerError::invalid_input(format!("invalid ton destination {}: {}", params.to, e)))?;
    let from = params
        .from
        .as_deref()
        .filter(|f| !f.is_empty())
        .map(|f| {
            f.parse::<TonAddress>()
                .map_err(|e| SignerError::invalid_input(format!("invalid ton sender {}: {}", f, e)))
        })
        .transpose()?;
    let amount = scale_amount(&params.amount, params.decimals.unwrap_or(config.decimals))?;

    let valid_until = if params.seqno == 0 {
        NO_EXPIRY
    } else {
        params
            .valid_until
            .ok_or_else(|| SignerError::invalid_input("valid_until is required when seqno > 0"))?
    };

    // 目标地址的 bounceable 标志只影响显示, 不决定 bounce 位
    let order = internal_message(&to, params.bounce, amount, comment_payload(params.memo.as_deref())?)?;
    debug!(
        "ton order built: to={} amount={} bounce={} seqno={}",
        to.to_raw(),
        amount,
        params.bounce,
        params.seqno
    );
    Ok(TonUnsignedTx {
        version: config.wallet_version,
        workchain: config.workchain,
        seqno: params.seqno,
        valid_until,
        send_mode: params.send_mode.unwrap_or(config.send_mode),
        order: Arc::new(order),
        from,
    })
}

fn signing_message(unsigned: &TonUnsignedTx, wallet: &WalletContract) -> Result<Cell> {
    let mut b = CellBuilder::new();
    b.store_uint(wallet.wallet_id() as u64, 32)?
        .store_uint(unsigned.valid_until as u64, 32)?
        .store_uint(unsigned.seqno as u64, 32)?;
    if unsigned.version == TonWalletVersion::V4r2 {
        b.store_uint(0, 8)?; // simple send op
    }
    b.store_uint(unsigned.send_mode as u64, 8)?
        .store_ref(unsigned.order.clone())?;
    Ok(b.build())
}

/// `ext_in_msg_info$10 src:addr_none dest import_fee:0`, then StateInit on seqno 0, then body.
fn external_message(wallet: &WalletContract, address: &TonAddress, seqno: u32, body: Cell) -> Result<Cell> {
    let mut b = CellBuilder::new();
    b.store_uint(0b10, 2)?
        .store_address(None)?
        .store_address(Some(address))?
        .store_coins(0)?;
    if seqno == 0 {
        b.store_bit(true)?.store_maybe_inline(wallet.state_init()?)?;
    } else {
        b.store_bit(false)?;
    }
    b.store_maybe_inline(body)?;
    Ok(b.build())
}

pub fn sign(unsigned: &TonUnsignedTx, keys: KeyMaterial<'_>) -> Result<SignedTransaction> {
    let signers = Signers::resolve(&keys, Curve::Ed25519)?;
    let pair = signers.primary()?;
    let wallet = WalletContract::new(unsigned.version, unsigned.workchain, pair.public_key())?;
    let address = wallet.address()?;
    if let Some(from) = &unsigned.from {
        if !from.same_account(&address) {
            return Err(SignerError::signing(format!(
                "key controls {} but transaction is from {}",
                address.to_raw(),
                from.to_raw()
            )));
        }
    }

    let signing = signing_message(unsigned, &wallet)?;
    let signature = ed25519_sign(&signing.hash(), &pair.ed25519_signing_key()?);
    let mut body = CellBuilder::new();
    body.store_bytes(&signature)?.store_cell_contents(&signing)?;

    let message = Arc::new(external_message(&wallet, &address, unsigned.seqno, body.build())?);
    let raw = STANDARD.encode(boc::serialize(&message)?);
    let hash = STANDARD.encode(message.hash());
    info!("✅ ton transfer signed, wallet={} seqno={} hash={}", address.to_raw(), unsigned.seqno, hash);
    Ok(SignedTransaction { chain: ChainId::Ton, raw, hash })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::KeyPair;
    use pretty_assertions::assert_eq;

    const KEY: &str = "b0e4eb37bc5929491899d2a50f52f0a4613d3a48e56245267fdecff392ead89b";
    const WALLET: &str = "UQAUAHcUab66DpOV2GaT_QDuSagpMdIn0x6aMmO3_fPVM305";
    const TO: &str = "EQCQCLTvR0XYTyM0uxh_H8kLAR7u7v98pEKZKpbq8w2peuNY";

    fn params(seqno: u32) -> TonTxParams {
        TonTxParams {
            from: Some(WALLET.into()),
            to: TO.into(),
            amount: "0.1".into(),
            memo: Some("memo".into()),
            seqno,
            valid_until: Some(1_700_000_000),
            ..Default::default()
        }
    }

    fn sign_params(p: &TonTxParams) -> Result<SignedTransaction> {
        let unsigned = build(p, &TonConfig::default())?;
        let kp = KeyPair::from_private_key_hex(KEY, Curve::Ed25519)?;
        sign(&unsigned, KeyMaterial::KeyPair(&kp))
    }

    #[test]
    fn test_transfer_vector() {
        let signed = sign_params(&params(38_103_804)).unwrap();
        assert_eq!(signed.hash, "TH9Eaydqpg0nQLuutx9BqvFPCXsJgQEl14inN5LpRr0=");
        assert_eq!(
            signed.raw,
            "te6cckEBAgEAsgAB4YgAKADuKNN9dB0nK7DNJ/oB3JNQUmOkT6Y9NGTHb/vnqmYDRr0Uw/7RburJz0O/NAF4myfGPMuTW7lTHewyfHc7IU33JtOMheHeSSSJoVAoJmXKjGq26ISXDeGrNb7GCPGgaU1NGLsqn4gAEitX4AAcAQB4QgBIBFp3o6LsJ5GaXYw/j+SFgI93d3++UiFMlUt1eYbUvSAvrwgAAAAAAAAAAAAAAAAAAAAAAABtZW1vj7d/GA=="
        );
    }

    #[test]
    fn test_bounced_transfer_vector() {
        let signed = sign_params(&TonTxParams { bounce: true, ..params(38_103_804) }).unwrap();
        assert_eq!(signed.hash, "+Xy2/7/kcOWPFfDfdbEkH34+Q9cfXAJi0kd6n/7+Ncc=");
        assert_eq!(
            signed.raw,
            "te6cckEBAgEAsgAB4YgAKADuKNN9dB0nK7DNJ/oB3JNQUmOkT6Y9NGTHb/vnqmYC1AmEikalie7s1A64BDfUNNOYoAeOLczCLkMNPZ/OXwg7Uo+o8XX6fEfHKtnPBahc7HzMIlKFCm1SjnX7O3ZQAU1NGLsqn4gAEitX4AAcAQB4YgBIBFp3o6LsJ5GaXYw/j+SFgI93d3++UiFMlUt1eYbUvSAvrwgAAAAAAAAAAAAAAAAAAAAAAABtZW1vFLQ45A=="
        );
    }

    #[test]
    fn test_deploy_transfer_vector() {
        let signed = sign_params(&params(0)).unwrap();
        assert_eq!(signed.hash, "AhxRvAsJijwgtHFlVaNmV5xW6NdYeoA+OFpdxRlohxY=");
        assert_eq!(signed.raw, "te6cckECFwEAA7QAA+OIACgA7ijTfXQdJyuwzSf6AdyTUFJjpE+mPTRkx2/756pmEZVFfn6XbwyEbDC5jT/LPl9kRCrswufrC7rmbsEGHMf6xPw8tPrEwLAmEGARrfEWJiobusY+DJMW29iwvp1hkaDlNTRi/////+AAAAAAAHABFRYBFP8A9KQT9LzyyAsCAgEgAxACAUgEBwLm0AHQ0wMhcbCSXwTgItdJwSCSXwTgAtMfIYIQcGx1Z70ighBkc3RyvbCSXwXgA/pAMCD6RAHIygfL/8nQ7UTQgQFA1yH0BDBcgQEI9ApvoTGzkl8H4AXTP8glghBwbHVnupI4MOMNA4IQZHN0crqSXwbjDQUGAHgB+gD0BDD4J28iMFAKoSG+8uBQghBwbHVngx6xcIAYUATLBSbPFlj6Ahn0AMtpF8sfUmDLPyDJgED7AAYAilAEgQEI9Fkw7UTQgQFA1yDIAc8W9ADJ7VQBcrCOI4IQZHN0coMesXCAGFAFywVQA88WI/oCE8tqyx/LP8mAQPsAkl8D4gIBIAgPAgEgCQ4CAVgKCwA9sp37UTQgQFA1yH0BDACyMoHy//J0AGBAQj0Cm+hMYAIBIAwNABmtznaiaEAga5Drhf/AABmvHfaiaEAQa5DrhY/AABG4yX7UTQ1wsfgAWb0kK29qJoQICga5D6AhhHDUCAhHpJN9KZEM5pA+n/mDeBKAG3gQFImHFZ8xhAT48oMI1xgg0x/TH9MfAvgju/Jk7UTQ0x/TH9P/9ATRUUO68qFRUbryogX5AVQQZPkQ8qP4ACSkyMsfUkDLH1Iwy/9SEPQAye1U+A8B0wchwACfbFGTINdKltMH1AL7AOgw4CHAAeMAIcAC4wABwAORMOMNA6TIyx8Syx/L/xESExQAbtIH+gDU1CL5AAXIygcVy//J0Hd0gBjIywXLAiLPFlAF+gIUy2sSzMzJc/sAyEAUgQEI9FHypwIAcIEBCNcY+gDTP8hUIEeBAQj0UfKnghBub3RlcHSAGMjLBcsCUAbPFlAE+gIUy2oSyx/LP8lz+wACAGyBAQjXGPoA0z8wUiSBAQj0WfKnghBkc3RycHSAGMjLBcsCUAXPFlAD+gITy2rLHxLLP8lz+wAACvQAye1UAFEAAAAAKamjF35P33m/eFZrhbc3h+VzmrQwY1DXrRrcUL6cV/4hAr/MQAB4QgBIBFp3o6LsJ5GaXYw/j+SFgI93d3++UiFMlUt1eYbUvSAvrwgAAAAAAAAAAAAAAAAAAAAAAABtZW1vr09bcg==");
        // StateInit travels with the first message
        let root = boc::deserialize(&STANDARD.decode(&signed.raw).unwrap()).unwrap();
        assert!(root.refs().len() >= 2);
    }

    #[test]
    fn test_valid_until_required_after_deploy() {
        let p = TonTxParams { valid_until: None, ..params(5) };
        assert!(matches!(build(&p, &TonConfig::default()), Err(SignerError::InvalidInput(_))));
        let p = TonTxParams { valid_until: None, ..params(0) };
        assert_eq!(build(&p, &TonConfig::default()).unwrap().valid_until, u32::MAX);
    }

    #[test]
    fn test_sender_mismatch() {
        let p = TonTxParams {
            from: Some("EQAMWkBAA1eQMnENQUATBosiws6QtutWk8JDcFimanCemtae".into()),
            ..params(1)
        };
        assert!(matches!(sign_params(&p), Err(SignerError::Signing(_))));
    }

    #[test]
    fn test_destination_flag_does_not_set_bounce() {
        // EQ… 与 UQ… 指向同一账户, 默认都不 bounce
        let eq = build(&params(1), &TonConfig::default()).unwrap();
        let p = TonTxParams { to: "UQCQCLTvR0XYTyM0uxh_H8kLAR7u7v98pEKZKpbq8w2per6d".into(), ..params(1) };
        let uq = build(&p, &TonConfig::default()).unwrap();
        assert_eq!(eq.order.hash(), uq.order.hash());

        let bounced = build(&TonTxParams { bounce: true, ..params(1) }, &TonConfig::default()).unwrap();
        assert_ne!(eq.order.hash(), bounced.order.hash());
    }

    #[test]
    fn test_build_rejections() {
        let cfg = TonConfig::default();
        assert!(build(&TonTxParams { to: "not-an-address".into(), ..params(1) }, &cfg).is_err());
        assert!(build(&TonTxParams { amount: "0.0000000001".into(), ..params(1) }, &cfg).is_err());
        assert!(build(&TonTxParams { memo: Some("x".repeat(200)), ..params(1) }, &cfg).is_err());
    }
}
