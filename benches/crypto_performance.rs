//! 🔐 密码学性能基准测试 - 派生和签名不能慢
//!
//! 性能要求：
//! - seed → 账户密钥：< 10ms
//! - 签名交易：< 10ms
//! - 总流程：< 20ms

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use multichain_signer::blockchain::ethereum::EthereumTxParams;
use multichain_signer::blockchain::solana::{SolanaOperation, SolanaTxParams};
use multichain_signer::{
    build_transaction, derive_key, encode_address, sign_transaction, AddressFormat, ChainId, ChainTxParams, Curve,
    KeyMaterial, SignerConfig,
};

const SEED: [u8; 64] = [0x5a; 64];

/// 🔴 性能基准：seed → secp256k1 / ed25519 账户密钥
fn bench_key_derivation(c: &mut Criterion) {
    c.bench_function("derive_secp256k1_bip44", |b| {
        b.iter(|| derive_key(black_box(&SEED), black_box("m/44'/60'/0'/0/0"), Curve::Secp256k1).expect("derive"))
    });
    c.bench_function("derive_ed25519_slip10", |b| {
        b.iter(|| derive_key(black_box(&SEED), black_box("m/44'/501'/0'/0'"), Curve::Ed25519).expect("derive"))
    });
}

/// 🔴 性能基准：签名交易
fn bench_transaction_signing(c: &mut Criterion) {
    let config = SignerConfig::default();
    let eth_key = derive_key(&SEED, "m/44'/60'/0'/0/0", Curve::Secp256k1).expect("derive");
    let eth = build_transaction(
        ChainId::Ethereum,
        ChainTxParams::Ethereum(EthereumTxParams {
            to: "0x1111111111111111111111111111111111111111".into(),
            gas_limit: 21_000,
            max_fee_per_gas: Some(20_000_000_000),
            max_priority_fee_per_gas: Some(1_000_000_000),
            amount: "0.01".into(),
            ..Default::default()
        }),
        &config,
    )
    .expect("build");
    c.bench_function("sign_ethereum_eip1559", |b| {
        b.iter(|| sign_transaction(black_box(&eth), KeyMaterial::KeyPair(&eth_key)).expect("sign"))
    });

    let sol_key = derive_key(&SEED, "m/44'/501'/0'/0'", Curve::Ed25519).expect("derive");
    let from = encode_address(sol_key.public_key(), AddressFormat::Solana, &config).expect("address");
    let sol = build_transaction(
        ChainId::Solana,
        ChainTxParams::Solana(SolanaTxParams {
            from: from.clone(),
            operation: SolanaOperation::Transfer { to: from, amount: "0.5".into() },
            recent_blockhash: "CSL1MJGUcDbgUEHh6fPsxum42vkhnQCh62whKjEiGwR3".into(),
            nonce_account: None,
        }),
        &config,
    )
    .expect("build");
    c.bench_function("sign_solana_transfer", |b| {
        b.iter(|| sign_transaction(black_box(&sol), KeyMaterial::KeyPair(&sol_key)).expect("sign"))
    });
}

/// 🔴 性能基准：完整流程（seed → 派生 → 构建 → 签名）
fn bench_full_signing_flow(c: &mut Criterion) {
    let config = SignerConfig::default();
    c.bench_function("full_signing_flow", |b| {
        b.iter(|| {
            let key = derive_key(black_box(&SEED), "m/44'/60'/0'/0/0", Curve::Secp256k1).expect("derive");
            let unsigned = build_transaction(
                ChainId::Ethereum,
                ChainTxParams::Ethereum(EthereumTxParams {
                    to: "0x1111111111111111111111111111111111111111".into(),
                    gas_limit: 21_000,
                    gas_price: Some(1_000_000_000),
                    amount: "1".into(),
                    ..Default::default()
                }),
                &config,
            )
            .expect("build");
            sign_transaction(&unsigned, KeyMaterial::KeyPair(&key)).expect("sign")
        });
    });
}

criterion_group!(benches, bench_key_derivation, bench_transaction_signing, bench_full_signing_flow);
criterion_main!(benches);
