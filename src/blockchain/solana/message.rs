//! Legacy message compilation and wire layout.
//!
//! Account keys are ordered fee payer first, then writable signers, readonly
//! signers, writable non-signers and readonly non-signers; each group sorted by key
//! bytes. Lengths use the compact-u16 encoding.

use std::collections::BTreeMap;

use super::address::Pubkey;
use super::instruction::Instruction;
use crate::core::errors::{Result, SignerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

pub fn encode_compact_u16(buf: &mut Vec<u8>, mut value: u16) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

fn compact_len(buf: &mut Vec<u8>, len: usize) -> Result<()> {
    let len = u16::try_from(len).map_err(|_| SignerError::encoding("solana message section too long"))?;
    encode_compact_u16(buf, len);
    Ok(())
}

impl Message {
    pub fn compile(instructions: &[Instruction], payer: &Pubkey, recent_blockhash: [u8; 32]) -> Result<Self> {
        if instructions.is_empty() {
            return Err(SignerError::invalid_input("solana transaction needs at least one instruction"));
        }
        // (is_signer, is_writable)
        let mut metas: BTreeMap<Pubkey, (bool, bool)> = BTreeMap::new();
        for ix in instructions {
            metas.entry(ix.program_id).or_insert((false, false));
            for account in &ix.accounts {
                let entry = metas.entry(account.pubkey).or_insert((false, false));
                entry.0 |= account.is_signer;
                entry.1 |= account.is_writable;
            }
        }
        metas.insert(*payer, (true, true));

        let group = |flags: (bool, bool)| -> Vec<Pubkey> {
            metas
                .iter()
                .filter(|(key, f)| **f == flags && **key != *payer)
                .map(|(key, _)| *key)
                .collect()
        };
        let writable_signers = group((true, true));
        let readonly_signers = group((true, false));
        let writable_unsigned = group((false, true));
        let readonly_unsigned = group((false, false));

        let mut account_keys = Vec::with_capacity(metas.len());
        account_keys.push(*payer);
        account_keys.extend(&writable_signers);
        account_keys.extend(&readonly_signers);
        account_keys.extend(&writable_unsigned);
        account_keys.extend(&readonly_unsigned);
        if account_keys.len() > usize::from(u8::MAX) + 1 {
            return Err(SignerError::invalid_input("too many accounts for one solana message"));
        }

        let header = MessageHeader {
            num_required_signatures: (1 + writable_signers.len() + readonly_signers.len()) as u8,
            num_readonly_signed_accounts: readonly_signers.len() as u8,
            num_readonly_unsigned_accounts: readonly_unsigned.len() as u8,
        };

        let index_of = |key: &Pubkey| -> Result<u8> {
            account_keys
                .iter()
                .position(|k| k == key)
                .map(|i| i as u8)
                .ok_or_else(|| SignerError::encoding(format!("account {} missing from message", key)))
        };
        let compiled = instructions
            .iter()
            .map(|ix| {
                Ok(CompiledInstruction {
                    program_id_index: index_of(&ix.program_id)?,
                    accounts: ix.accounts.iter().map(|a| index_of(&a.pubkey)).collect::<Result<_>>()?,
                    data: ix.data.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { header, account_keys, recent_blockhash, instructions: compiled })
    }

    /// Keys whose signatures the transaction carries, in signature order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..usize::from(self.header.num_required_signatures)]
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut buf = vec![
            self.header.num_required_signatures,
            self.header.num_readonly_signed_accounts,
            self.header.num_readonly_unsigned_accounts,
        ];
        compact_len(&mut buf, self.account_keys.len())?;
        for key in &self.account_keys {
            buf.extend_from_slice(&key.0);
        }
        buf.extend_from_slice(&self.recent_blockhash);
        compact_len(&mut buf, self.instructions.len())?;
        for ix in &self.instructions {
            buf.push(ix.program_id_index);
            compact_len(&mut buf, ix.accounts.len())?;
            buf.extend_from_slice(&ix.accounts);
            compact_len(&mut buf, ix.data.len())?;
            buf.extend_from_slice(&ix.data);
        }
        Ok(buf)
    }
}
