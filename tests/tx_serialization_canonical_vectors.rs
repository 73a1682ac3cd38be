// Canonical transaction serialization and signing vectors for regression tests.
// Each test drives the public build -> sign pipeline with a fixed key and fixed
// chain state and asserts the broadcast encoding byte-for-byte. This protects
// against accidental changes to digest construction or wire serialization.

use multichain_signer::blockchain::cosmos::{CosmosTxParams, SignMode};
use multichain_signer::blockchain::ethereum::EthereumTxParams;
use multichain_signer::blockchain::solana::{SolanaOperation, SolanaTxParams};
use multichain_signer::blockchain::ton::TonTxParams;
use multichain_signer::{
    build_transaction, sign_transaction, ChainId, ChainTxParams, Curve, KeyMaterial, KeyPair, SignerConfig,
};
use pretty_assertions::assert_eq;

fn eth_base() -> EthereumTxParams {
    EthereumTxParams {
        nonce: 0,
        to: "0x1111111111111111111111111111111111111111".into(),
        gas_limit: 21_000,
        amount: "0.001".into(),
        ..Default::default()
    }
}

fn sign_eth(params: EthereumTxParams) -> String {
    let config = SignerConfig::default();
    let unsigned = build_transaction(ChainId::Ethereum, ChainTxParams::Ethereum(params), &config).unwrap();
    // Deterministic private key 0x0101..01
    let key = KeyPair::from_private_key(&[1u8; 32], Curve::Secp256k1).unwrap();
    sign_transaction(&unsigned, KeyMaterial::KeyPair(&key)).unwrap().raw
}

#[test]
fn canonical_eip1559_vector() {
    let raw = sign_eth(EthereumTxParams {
        max_fee_per_gas: Some(20_000_000_000),
        max_priority_fee_per_gas: Some(1_000_000_000),
        ..eth_base()
    });
    let canonical = "0x02f8720180843b9aca008504a817c80082520894111111111111111111111111111111111111111187038d7ea4c6800080c001a0691191bf06d248f41d30c17e4712b95e4b01998fdd97ec3b02784d7214002f7aa068c0c986842abcc69f3f79ea622e6c2e632b3a5ac90b6269f36a6bf7dcb92951";
    assert_eq!(canonical, raw);
}

#[test]
fn canonical_legacy_eip155_vector() {
    let raw = sign_eth(EthereumTxParams { gas_price: Some(20_000_000_000), ..eth_base() });
    let canonical = "0xf86b808504a817c80082520894111111111111111111111111111111111111111187038d7ea4c680008025a0bf102036c4c1d09b980801dd71748a55c56b9df26e9c0d4c95cdf3e33a27147fa075907e1ef77b1e1bfb8b708b671729fb41c5b4031ef1baca3a9ff70931d2880c";
    assert_eq!(canonical, raw);
}

#[test]
fn canonical_solana_transfer_vector() {
    let config = SignerConfig::default();
    let params = SolanaTxParams {
        from: "4wHd9tf4x4FkQ3JtgsMKyiEofEHSaZH5rYzfFKLvtESD".into(),
        operation: SolanaOperation::Transfer {
            to: "8F1hnqYwTYKQdQuJe7q4uNykyuf6P6gfbW69Q56Z1GQa".into(),
            amount: "0.001".into(),
        },
        recent_blockhash: "CSL1MJGUcDbgUEHh6fPsxum42vkhnQCh62whKjEiGwR3".into(),
        nonce_account: None,
    };
    let unsigned = build_transaction(ChainId::Solana, ChainTxParams::Solana(params), &config).unwrap();
    let key = KeyPair::from_private_key_hex(
        "55a70321542da0b6123f37180e61993d5769f0a5d727f9c817151c1270c29096",
        Curve::Ed25519,
    )
    .unwrap();
    let signed = sign_transaction(&unsigned, KeyMaterial::KeyPair(&key)).unwrap();
    assert_eq!(
        signed.raw,
        "AQqERcA9mdmByRIMvML+vSDBOHNYnyfoPbY0KT59eLFF3RH7qjXqIY64MSLYXYXve2R0CsLr/d9R3n+6PU09+QYBAAEDOns4dLpGe+a4HqNh49dFOvi4HIiu3SS1Ax/doLxxrTJrmLwp3XboqcdlUb3T/HCdvThyIf5spy7p7WEWS8WxEwAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAqe2RDTN3eKFxNkDx906pWO5DCZeIZ19os+FpfNqQF5IBAgIAAQwCAAAAQEIPAAAAAAA="
    );
}

#[test]
fn canonical_ton_v4r2_transfer_vector() {
    let config = SignerConfig::default();
    let params = TonTxParams {
        from: Some("UQAUAHcUab66DpOV2GaT_QDuSagpMdIn0x6aMmO3_fPVM305".into()),
        to: "EQCQCLTvR0XYTyM0uxh_H8kLAR7u7v98pEKZKpbq8w2peuNY".into(),
        amount: "0.1".into(),
        memo: Some("memo".into()),
        seqno: 38_103_804,
        valid_until: Some(1_700_000_000),
        ..Default::default()
    };
    let unsigned = build_transaction(ChainId::Ton, ChainTxParams::Ton(params), &config).unwrap();
    let key = KeyPair::from_private_key_hex(
        "b0e4eb37bc5929491899d2a50f52f0a4613d3a48e56245267fdecff392ead89b",
        Curve::Ed25519,
    )
    .unwrap();
    let signed = sign_transaction(&unsigned, KeyMaterial::KeyPair(&key)).unwrap();
    assert_eq!(signed.hash, "TH9Eaydqpg0nQLuutx9BqvFPCXsJgQEl14inN5LpRr0=");
    assert!(signed.raw.starts_with("te6cckEBAgEAsgAB4YgAKADuKNN9dB0nK7DNJ"));
}

#[test]
fn cosmos_direct_output_shape() {
    let config = SignerConfig::default();
    let key = KeyPair::from_private_key(&[1u8; 32], Curve::Secp256k1).unwrap();
    let from = multichain_signer::encode_address(
        key.public_key(),
        multichain_signer::AddressFormat::Cosmos,
        &config,
    )
    .unwrap();
    let params = CosmosTxParams {
        from: from.clone(),
        to: from,
        amount: "1".into(),
        fee: "0.005".into(),
        gas: 200_000,
        chain_id: "cosmoshub-4".into(),
        account_number: 7,
        sequence: 3,
        mode: SignMode::Direct,
        ..Default::default()
    };
    let unsigned = build_transaction(ChainId::Cosmos, ChainTxParams::Cosmos(params), &config).unwrap();
    let signed = sign_transaction(&unsigned, KeyMaterial::PrivateKey(&[1u8; 32])).unwrap();
    let body: serde_json::Value = serde_json::from_str(&signed.raw).unwrap();
    assert_eq!(body["mode"], "BROADCAST_MODE_SYNC");
    assert!(body["tx_bytes"].is_string());
    assert_eq!(signed.hash.len(), 64);
    assert_eq!(signed.hash, signed.hash.to_uppercase());
}
