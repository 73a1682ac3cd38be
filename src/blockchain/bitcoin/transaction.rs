//! Bitcoin transaction构建和sign
//!
//! 支持 P2PKH、P2WPKH、P2SH-P2WPKH、P2TR 以及 P2SH / P2WSH / P2SH-P2WSH 多签输入。
//! 每个输入的花费类型由其address推断。

use std::str::FromStr;

use bitcoin::absolute::LockTime;
use bitcoin::blockdata::script::{Builder, PushBytesBuf};
use bitcoin::consensus::encode::serialize_hex;
use bitcoin::ecdsa::Signature as EcdsaSignature;
use bitcoin::hashes::Hash;
use bitcoin::sighash::{EcdsaSighashType, Prevouts, SighashCache, TapSighashType};
use bitcoin::taproot::Signature as TaprootSignature;
use bitcoin::transaction::Version;
use bitcoin::{Amount, Network, OutPoint, PublicKey, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use tracing::{debug, info};

use super::address::{self, ScriptKind};
use super::multisig::{MultisigPolicy, MultisigWrap};
use crate::blockchain::traits::SignedTransaction;
use crate::core::config::{BitcoinAddressKind, BitcoinConfig};
use crate::core::domain::{ChainId, Curve, KeyMaterial, KeyPair, Signers};
use crate::core::errors::{Result, SignerError};
use crate::core::result_ext::{ErrorClass, ResultExt};
use crate::crypto::signature_utils::{ecdsa_sign, schnorr_sign_taproot};

/// Multisig policy attached to a P2SH / P2WSH input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigInput {
    /// Hex compressed keys in redeem-script order.
    pub public_keys: Vec<String>,
    pub threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitcoinInput {
    pub address: String,
    pub txid: String,
    pub vout: u32,
    /// satoshis
    pub amount: u64,
    pub multisig: Option<MultisigInput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitcoinOutput {
    pub address: String,
    /// satoshis
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitcoinTxParams {
    pub inputs: Vec<BitcoinInput>,
    pub outputs: Vec<BitcoinOutput>,
    pub lock_time: Option<u32>,
}

/// How one input is unlocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpendKind {
    Single(BitcoinAddressKind),
    Multisig { policy: MultisigPolicy, wrap: MultisigWrap },
}

#[derive(Debug, Clone)]
pub struct BitcoinUnsignedTx {
    pub network: Network,
    pub tx: Transaction,
    pub prevouts: Vec<TxOut>,
    pub spends: Vec<SpendKind>,
}

impl BitcoinUnsignedTx {
    /// Inputs minus outputs; `None` when the totals overflow or outputs exceed inputs.
    pub fn fee(&self) -> Option<u64> {
        let total_in = self.prevouts.iter().try_fold(0u64, |acc, p| acc.checked_add(p.value.to_sat()))?;
        let total_out = self.tx.output.iter().try_fold(0u64, |acc, o| acc.checked_add(o.value.to_sat()))?;
        total_in.checked_sub(total_out)
    }
}

fn spend_kind(input: &BitcoinInput, script_pubkey: &ScriptBuf, kind: ScriptKind, network: Network) -> Result<SpendKind> {
    match (kind, &input.multisig) {
        (ScriptKind::P2pkh, None) => Ok(SpendKind::Single(BitcoinAddressKind::P2pkh)),
        (ScriptKind::P2wpkh, None) => Ok(SpendKind::Single(BitcoinAddressKind::P2wpkh)),
        (ScriptKind::P2tr, None) => Ok(SpendKind::Single(BitcoinAddressKind::P2tr)),
        (ScriptKind::P2sh, None) => Ok(SpendKind::Single(BitcoinAddressKind::P2shP2wpkh)),
        (ScriptKind::P2sh | ScriptKind::P2wsh, Some(ms)) => {
            let policy = MultisigPolicy::from_hex(&ms.public_keys, ms.threshold)?;
            let wrap = policy.wrap_for_script(script_pubkey, network).ok_or_else(|| {
                SignerError::invalid_input(format!(
                    "multisig keys do not produce input address {}",
                    input.address
                ))
            })?;
            Ok(SpendKind::Multisig { policy, wrap })
        }
        (ScriptKind::P2wsh, None) => Err(SignerError::invalid_input(format!(
            "P2WSH input {} needs its multisig policy",
            input.address
        ))),
        (_, Some(_)) => Err(SignerError::invalid_input(format!(
            "multisig policy given for non-script-hash input {}",
            input.address
        ))),
    }
}

/// Validate parameters and assemble the unsigned transaction.
pub fn build(params: &BitcoinTxParams, config: &BitcoinConfig) -> Result<BitcoinUnsignedTx> {
    let network = config.network()?;
    if params.inputs.is_empty() {
        return Err(SignerError::invalid_input("bitcoin transaction needs at least one input"));
    }
    if params.outputs.is_empty() {
        return Err(SignerError::invalid_input("bitcoin transaction needs at least one output"));
    }

    let mut tx_inputs = Vec::with_capacity(params.inputs.len());
    let mut prevouts = Vec::with_capacity(params.inputs.len());
    let mut spends = Vec::with_capacity(params.inputs.len());
    let mut total_in: u64 = 0;

    for input in &params.inputs {
        if input.address.is_empty() || input.txid.is_empty() {
            return Err(SignerError::invalid_input("Invalid input data"));
        }
        let decoded = address::decode(&input.address, network)?;
        let txid = Txid::from_str(&input.txid)
            .map_err(|e| SignerError::invalid_input(format!("invalid txid {}: {}", input.txid, e)))?;
        spends.push(spend_kind(input, &decoded.script_pubkey, decoded.kind, network)?);

        tx_inputs.push(TxIn {
            previous_output: OutPoint { txid, vout: input.vout },
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::new(),
        });
        prevouts.push(TxOut {
            value: Amount::from_sat(input.amount),
            script_pubkey: decoded.script_pubkey,
        });
        total_in = total_in
            .checked_add(input.amount)
            .ok_or_else(|| SignerError::invalid_input("input total overflows"))?;
    }

    let mut tx_outputs = Vec::with_capacity(params.outputs.len());
    let mut total_out: u64 = 0;
    for output in &params.outputs {
        if output.address.is_empty() {
            return Err(SignerError::invalid_input("Invalid output data"));
        }
        let addr = address::parse(&output.address, network)?;
        tx_outputs.push(TxOut {
            value: Amount::from_sat(output.amount),
            script_pubkey: addr.script_pubkey(),
        });
        total_out = total_out
            .checked_add(output.amount)
            .ok_or_else(|| SignerError::invalid_input("output total overflows"))?;
    }

    if total_in < total_out {
        return Err(SignerError::invalid_input(format!(
            "inputs ({} sat) do not cover outputs ({} sat)",
            total_in, total_out
        )));
    }

    let tx = Transaction {
        version: Version(config.tx_version),
        lock_time: LockTime::from_consensus(params.lock_time.unwrap_or(0)),
        input: tx_inputs,
        output: tx_outputs,
    };
    debug!(
        inputs = params.inputs.len(),
        outputs = params.outputs.len(),
        fee = total_in - total_out,
        "bitcoin transaction assembled"
    );
    Ok(BitcoinUnsignedTx { network, tx, prevouts, spends })
}

fn push_bytes(data: Vec<u8>) -> Result<PushBytesBuf> {
    PushBytesBuf::try_from(data).map_err(|_| SignerError::signing("script push exceeds size limit"))
}

fn ecdsa_sig_bytes(digest: [u8; 32], key: &KeyPair) -> Result<Vec<u8>> {
    let sig = ecdsa_sign(digest, &key.secp_secret_key()?);
    Ok(EcdsaSignature { sig, hash_ty: EcdsaSighashType::All }.to_vec())
}

/// Which of the supplied keys owns a single-key input.
fn owner<'k>(signers: &'k Signers<'_>, kind: BitcoinAddressKind, prevout: &TxOut, network: Network) -> Result<&'k KeyPair> {
    signers
        .all()
        .into_iter()
        .find(|kp| {
            address::address_for(kp.public_key(), kind, network)
                .map(|a| a.script_pubkey() == prevout.script_pubkey)
                .unwrap_or(false)
        })
        .ok_or_else(|| SignerError::signing(format!("no supplied key controls input script {}", prevout.script_pubkey)))
}

/// Keys for a multisig input, in redeem-script order, stopping at the threshold.
fn cosigners<'k>(signers: &'k Signers<'_>, policy: &MultisigPolicy) -> Result<Vec<&'k KeyPair>> {
    let chosen: Vec<&KeyPair> = policy
        .public_keys
        .iter()
        .filter_map(|pk| signers.find_by_public_key(&pk.to_bytes()))
        .take(policy.threshold)
        .collect();
    if chosen.len() < policy.threshold {
        return Err(SignerError::signing(format!(
            "multisig input needs {} signatures, only {} matching keys supplied",
            policy.threshold,
            chosen.len()
        )));
    }
    Ok(chosen)
}

/// Sign every input and serialize.
pub fn sign(unsigned: &BitcoinUnsignedTx, keys: KeyMaterial<'_>) -> Result<SignedTransaction> {
    let inputs = unsigned.tx.input.len();
    if unsigned.prevouts.len() != inputs || unsigned.spends.len() != inputs {
        return Err(SignerError::invalid_input(format!(
            "bitcoin transaction has {} inputs but {} prevouts and {} spend descriptions",
            inputs,
            unsigned.prevouts.len(),
            unsigned.spends.len()
        )));
    }
    let signers = Signers::resolve(&keys, Curve::Secp256k1)?;
    let network = unsigned.network;
    let mut cache = SighashCache::new(&unsigned.tx);

    // (script_sig, witness) per input, computed against the unsigned transaction
    let mut unlocks: Vec<(ScriptBuf, Witness)> = Vec::with_capacity(unsigned.spends.len());

    for (i, spend) in unsigned.spends.iter().enumerate() {
        let prevout = &unsigned.prevouts[i];
        let unlock = match spend {
            SpendKind::Single(kind) => {
                let key = owner(&signers, *kind, prevout, network)?;
                let pk = PublicKey::new(key.secp_public_key()?);
                match kind {
                    BitcoinAddressKind::P2pkh => {
                        let sighash = cache
                            .legacy_signature_hash(i, &prevout.script_pubkey, EcdsaSighashType::All.to_u32())
                            .or_signer_err(ErrorClass::Signing, "legacy sighash")?;
                        let sig = ecdsa_sig_bytes(sighash.to_byte_array(), key)?;
                        let script_sig = Builder::new().push_slice(push_bytes(sig)?).push_key(&pk).into_script();
                        (script_sig, Witness::new())
                    }
                    BitcoinAddressKind::P2wpkh | BitcoinAddressKind::P2shP2wpkh => {
                        let wpkh = pk
                            .wpubkey_hash()
                            .ok_or_else(|| SignerError::signing("segwit inputs need a compressed key"))?;
                        // P2SH-P2WPKH 的 redeem script 就是这个 witness program
                        let program = ScriptBuf::new_p2wpkh(&wpkh);
                        let sighash = cache
                            .p2wpkh_signature_hash(i, &program, prevout.value, EcdsaSighashType::All)
                            .or_signer_err(ErrorClass::Signing, "segwit sighash")?;
                        let sig = ecdsa_sig_bytes(sighash.to_byte_array(), key)?;
                        let witness = Witness::from_slice(&[sig, pk.to_bytes()]);
                        let script_sig = if *kind == BitcoinAddressKind::P2shP2wpkh {
                            Builder::new().push_slice(push_bytes(program.to_bytes())?).into_script()
                        } else {
                            ScriptBuf::new()
                        };
                        (script_sig, witness)
                    }
                    BitcoinAddressKind::P2tr => {
                        let sighash = cache
                            .taproot_key_spend_signature_hash(i, &Prevouts::All(&unsigned.prevouts), TapSighashType::Default)
                            .or_signer_err(ErrorClass::Signing, "taproot sighash")?;
                        let sig = schnorr_sign_taproot(sighash.to_byte_array(), &key.secp_secret_key()?);
                        let sig = TaprootSignature { sig, hash_ty: TapSighashType::Default };
                        (ScriptBuf::new(), Witness::from_slice(&[sig.to_vec()]))
                    }
                }
            }
            SpendKind::Multisig { policy, wrap } => {
                let redeem = policy.redeem_script();
                let keys = cosigners(&signers, policy)?;
                let digest = if wrap.is_segwit() {
                    cache
                        .p2wsh_signature_hash(i, &redeem, prevout.value, EcdsaSighashType::All)
                        .or_signer_err(ErrorClass::Signing, "segwit sighash")?
                        .to_byte_array()
                } else {
                    cache
                        .legacy_signature_hash(i, &redeem, EcdsaSighashType::All.to_u32())
                        .or_signer_err(ErrorClass::Signing, "legacy sighash")?
                        .to_byte_array()
                };
                let sigs = keys
                    .iter()
                    .map(|kp| ecdsa_sig_bytes(digest, kp))
                    .collect::<Result<Vec<_>>>()?;

                match wrap {
                    MultisigWrap::P2sh => {
                        // OP_0 <sig...> <redeemScript>
                        let mut builder = Builder::new().push_int(0);
                        for sig in sigs {
                            builder = builder.push_slice(push_bytes(sig)?);
                        }
                        let script_sig = builder.push_slice(push_bytes(redeem.to_bytes())?).into_script();
                        (script_sig, Witness::new())
                    }
                    MultisigWrap::P2wsh | MultisigWrap::P2shP2wsh => {
                        let mut items: Vec<Vec<u8>> = Vec::with_capacity(sigs.len() + 2);
                        items.push(Vec::new());
                        items.extend(sigs);
                        items.push(redeem.to_bytes());
                        let script_sig = if *wrap == MultisigWrap::P2shP2wsh {
                            let program = ScriptBuf::new_p2wsh(&redeem.wscript_hash());
                            Builder::new().push_slice(push_bytes(program.to_bytes())?).into_script()
                        } else {
                            ScriptBuf::new()
                        };
                        (script_sig, Witness::from_slice(&items))
                    }
                }
            }
        };
        unlocks.push(unlock);
    }

    let mut tx = unsigned.tx.clone();
    for (txin, (script_sig, witness)) in tx.input.iter_mut().zip(unlocks) {
        txin.script_sig = script_sig;
        txin.witness = witness;
    }

    let raw = serialize_hex(&tx);
    if raw.is_empty() {
        return Err(SignerError::signing("serialized transaction is empty"));
    }
    let txid = tx.txid().to_string();
    info!("✅ bitcoin transaction signed, txid={}", txid);
    Ok(SignedTransaction { chain: ChainId::Bitcoin, raw, hash: txid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bip44::{derive_key, DerivationPath};
    use pretty_assertions::assert_eq;

    const TXID: &str = "4b7d1f4c2f1e0c6b8e3a9d5f6c7b8a9e0d1c2b3a4f5e6d7c8b9a0f1e2d3c4b5a";
    const SK: [&str; 3] = [
        "60164bec9512d004af7f71e7ed868c8e9ac2cc6234d8b682037ec80547595f2e",
        "ca697706367d83864200e35c47e746b76a443b86781142bd7a76c21523f5d627",
        "e00a04f5f8ba78b8e83bc794ac6534e5967f6e0baf9e69b0858a54cbf9ac3cc9",
    ];

    fn key(i: usize) -> KeyPair {
        KeyPair::from_private_key_hex(SK[i], Curve::Secp256k1).unwrap()
    }

    fn outputs() -> Vec<BitcoinOutput> {
        vec![
            BitcoinOutput { address: "bc1qh7c8a0vxxks5pm3h734l8r7phnk22nan4le9q0".into(), amount: 60_000 },
            BitcoinOutput { address: "1H7AcqzvVQunYftUcJMxF9KUrFayEnf83T".into(), amount: 39_000 },
        ]
    }

    fn single_input(address: &str) -> BitcoinTxParams {
        BitcoinTxParams {
            inputs: vec![BitcoinInput {
                address: address.into(),
                txid: TXID.into(),
                vout: 1,
                amount: 100_000,
                multisig: None,
            }],
            outputs: outputs(),
            lock_time: None,
        }
    }

    #[test]
    fn test_p2pkh_signing_vector() {
        let unsigned = build(&single_input("1H7AcqzvVQunYftUcJMxF9KUrFayEnf83T"), &BitcoinConfig::default()).unwrap();
        assert_eq!(unsigned.fee(), Some(1_000));
        let kp = key(0);
        let signed = sign(&unsigned, KeyMaterial::KeyPair(&kp)).unwrap();
        assert_eq!(
            signed.raw,
            "02000000015a4b3c2d1e0f9a8b7c6d5e4f3a2b1c0d9e8a7b6c5f9d3a8e6b0c1e2f4c1f7d4b010000006b4830450221009081a878b5e09303497094a551b3340bba9b7e87e15c934204e2a260fe1e05190220564a4ad95e053a14cbee18039732109631c2f808989e720d4f2ca471b2ccdb620121030e93482fd0037d589b08c36bb22afc041338ba444f9f9d7ba129348f9be731c1ffffffff0260ea000000000000160014bfb07ebd8635a140ee37f46bf38fc1bceca54fb358980000000000001976a914b0ac897a759f944b925b08a11eeb82252d28e37688ac00000000"
        );
        assert_eq!(signed.hash, "c487a05d79a4fafae57fa921b3b343b65a34cf8a456660a099b996aa7ac46471");
    }

    #[test]
    fn test_p2wpkh_signing_vector() {
        let unsigned =
            build(&single_input("bc1qkzkgj7n4n72yhyjmpzs3a6uzy5kj3cmkad2dk7"), &BitcoinConfig::default()).unwrap();
        let raw = SK[0];
        let bytes = hex::decode(raw).unwrap();
        let signed = sign(&unsigned, KeyMaterial::PrivateKey(&bytes)).unwrap();
        assert_eq!(
            signed.raw,
            "020000000001015a4b3c2d1e0f9a8b7c6d5e4f3a2b1c0d9e8a7b6c5f9d3a8e6b0c1e2f4c1f7d4b0100000000ffffffff0260ea000000000000160014bfb07ebd8635a140ee37f46bf38fc1bceca54fb358980000000000001976a914b0ac897a759f944b925b08a11eeb82252d28e37688ac0247304402200a2daaf7b423de274ecfae9006ad9c7c1d30565a830ea9243d41b731b5a0086c02202e6ca12796eed4752279b38331ee2ba780e5c3c677aea9ddc2d495b44eb1bd6e0121030e93482fd0037d589b08c36bb22afc041338ba444f9f9d7ba129348f9be731c100000000"
        );
        assert_eq!(signed.hash, "5a9e54a3ae055dcb7d403dc0d80fedc8f2576bd9192b8d4a648265ec46adae6f");
    }

    #[test]
    fn test_p2wsh_multisig_signing_vector() {
        let mut params = single_input("bc1qv97ct30xmdv9stur6p99ryezefm9eetktjnq8fg3n8vx05rfwxmsa8m62d");
        params.inputs[0].multisig = Some(MultisigInput {
            public_keys: (0..3).map(|i| key(i).public_key_hex()).collect(),
            threshold: 2,
        });
        let unsigned = build(&params, &BitcoinConfig::default()).unwrap();
        assert!(matches!(
            unsigned.spends[0],
            SpendKind::Multisig { wrap: MultisigWrap::P2wsh, .. }
        ));

        // supplied out of order; signatures still follow the redeem script
        let keys = vec![key(2), key(0)];
        let signed = sign(&unsigned, KeyMaterial::KeyPairs(&keys)).unwrap();
        assert_eq!(
            signed.raw,
            "020000000001015a4b3c2d1e0f9a8b7c6d5e4f3a2b1c0d9e8a7b6c5f9d3a8e6b0c1e2f4c1f7d4b0100000000ffffffff0260ea000000000000160014bfb07ebd8635a140ee37f46bf38fc1bceca54fb358980000000000001976a914b0ac897a759f944b925b08a11eeb82252d28e37688ac0400483045022100f8f5cd68e88a75905f112850d6d26416c7c9807c8c6492d52ea0132495acf30a02202b9159910a3c624f7c74ee3d4d1a7d5cd67ff15fa3648f49905eb4005af8bcec014830450221009b17ff04c7050a4b95c050cdf69d799e05ada24837405fca55794133fbb3256302205daa46d58313556aa87b0a380c5f77c115b6dfb24b3e86cd9c3944825a7e0b5101695221030e93482fd0037d589b08c36bb22afc041338ba444f9f9d7ba129348f9be731c12102b3ddc0bc56ea5f5a94c103adee457681a27edb54a4e03d07f4604a8c573f12e921039a1cefe386d30db85e634baa1c55c04bb3d6f0008eb7379277263fde263e39ef53ae00000000"
        );
    }

    #[test]
    fn test_multisig_below_threshold_fails() {
        let mut params = single_input("3HVB4N9VZ6qRjdomqpa6EyvvdhapMMD3UF");
        params.inputs[0].multisig = Some(MultisigInput {
            public_keys: (0..3).map(|i| key(i).public_key_hex()).collect(),
            threshold: 2,
        });
        let unsigned = build(&params, &BitcoinConfig::default()).unwrap();
        let only_one = vec![key(1)];
        let err = sign(&unsigned, KeyMaterial::KeyPairs(&only_one)).unwrap_err();
        assert!(matches!(err, SignerError::Signing(_)));

        let two = vec![key(1), key(0)];
        let signed = sign(&unsigned, KeyMaterial::KeyPairs(&two)).unwrap();
        let tx: Transaction = bitcoin::consensus::encode::deserialize(&hex::decode(&signed.raw).unwrap()).unwrap();
        // OP_0 sig sig redeem
        assert_eq!(tx.input[0].script_sig.instructions().count(), 4);
        assert!(tx.input[0].witness.is_empty());
    }

    #[test]
    fn test_taproot_and_nested_inputs_verify() {
        let seed = [0x5au8; 32];
        let path: DerivationPath = "m/86'/0'/0'/0/0".parse().unwrap();
        let kp = derive_key(&seed, &path, Curve::Secp256k1).unwrap();
        let network = Network::Bitcoin;
        let p2tr = address::encode(kp.public_key(), BitcoinAddressKind::P2tr, network).unwrap();
        let nested = address::encode(kp.public_key(), BitcoinAddressKind::P2shP2wpkh, network).unwrap();

        let params = BitcoinTxParams {
            inputs: vec![
                BitcoinInput { address: p2tr, txid: TXID.into(), vout: 0, amount: 50_000, multisig: None },
                BitcoinInput { address: nested, txid: TXID.into(), vout: 2, amount: 50_000, multisig: None },
            ],
            outputs: outputs(),
            lock_time: Some(800_000),
        };
        let unsigned = build(&params, &BitcoinConfig::default()).unwrap();
        let signed = sign(&unsigned, KeyMaterial::KeyPair(&kp)).unwrap();
        let tx: Transaction = bitcoin::consensus::encode::deserialize(&hex::decode(&signed.raw).unwrap()).unwrap();

        assert_eq!(tx.lock_time, LockTime::from_consensus(800_000));
        assert_eq!(tx.input[0].witness.len(), 1);
        assert_eq!(tx.input[0].witness.nth(0).unwrap().len(), 64);
        assert!(tx.input[0].script_sig.is_empty());
        assert_eq!(tx.input[1].witness.len(), 2);
        assert_eq!(tx.input[1].script_sig.len(), 23);

        // schnorr signature verifies against the output key
        let mut cache = SighashCache::new(&unsigned.tx);
        let sighash = cache
            .taproot_key_spend_signature_hash(0, &Prevouts::All(&unsigned.prevouts), TapSighashType::Default)
            .unwrap();
        let sig = bitcoin::secp256k1::schnorr::Signature::from_slice(tx.input[0].witness.nth(0).unwrap()).unwrap();
        let output_key = bitcoin::secp256k1::XOnlyPublicKey::from_slice(&unsigned.prevouts[0].script_pubkey.as_bytes()[2..]).unwrap();
        assert!(crate::crypto::secp()
            .verify_schnorr(&sig, &bitcoin::secp256k1::Message::from_digest(sighash.to_byte_array()), &output_key)
            .is_ok());
    }

    #[test]
    fn test_build_rejections() {
        let config = BitcoinConfig::default();
        let mut params = single_input("1H7AcqzvVQunYftUcJMxF9KUrFayEnf83T");
        params.outputs[0].amount = 70_000;
        assert!(matches!(build(&params, &config), Err(SignerError::InvalidInput(_))));

        let mut params = single_input("1H7AcqzvVQunYftUcJMxF9KUrFayEnf83T");
        params.inputs[0].txid = "xyz".into();
        assert!(matches!(build(&params, &config), Err(SignerError::InvalidInput(_))));

        let params = single_input("mwd7uu5uJSM3KnN6KsLL54XoiFBg4JYX7o");
        assert!(matches!(build(&params, &config), Err(SignerError::InvalidInput(_))));

        let mut params = single_input("1H7AcqzvVQunYftUcJMxF9KUrFayEnf83T");
        params.inputs.clear();
        assert!(matches!(build(&params, &config), Err(SignerError::InvalidInput(_))));
    }

    #[test]
    fn test_sign_with_foreign_key_fails() {
        let unsigned = build(&single_input("1H7AcqzvVQunYftUcJMxF9KUrFayEnf83T"), &BitcoinConfig::default()).unwrap();
        let other = key(1);
        assert!(matches!(
            sign(&unsigned, KeyMaterial::KeyPair(&other)),
            Err(SignerError::Signing(_))
        ));
    }

    #[test]
    fn test_tx_version_from_config() {
        let config = BitcoinConfig { tx_version: 1, ..BitcoinConfig::default() };
        let unsigned = build(&single_input("1H7AcqzvVQunYftUcJMxF9KUrFayEnf83T"), &config).unwrap();
        assert_eq!(unsigned.tx.version, Version::ONE);
    }

    #[test]
    fn test_hand_built_tx_is_checked_before_signing() {
        let built = build(&single_input("1H7AcqzvVQunYftUcJMxF9KUrFayEnf83T"), &BitcoinConfig::default()).unwrap();
        let kp = key(0);

        let mut missing_prevout = built.clone();
        missing_prevout.prevouts.clear();
        assert!(matches!(
            sign(&missing_prevout, KeyMaterial::KeyPair(&kp)),
            Err(SignerError::InvalidInput(_))
        ));

        let mut extra_spend = built.clone();
        extra_spend.spends.push(SpendKind::Single(BitcoinAddressKind::P2pkh));
        assert!(matches!(
            sign(&extra_spend, KeyMaterial::KeyPair(&kp)),
            Err(SignerError::InvalidInput(_))
        ));

        // outputs above inputs: no fee instead of an underflow
        let mut overspent = built;
        overspent.tx.output[0].value = Amount::from_sat(200_000);
        assert_eq!(overspent.fee(), None);
    }
}
