//! Instruction 构建: System Program、SPL Token、Associated Token Account

use super::address::Pubkey;
use crate::core::errors::Result;

pub const SYSTEM_PROGRAM: Pubkey = Pubkey([0u8; 32]);
pub const RECENT_BLOCKHASHES: Pubkey = Pubkey([
    6, 167, 213, 23, 25, 44, 86, 142, 224, 138, 132, 95, 115, 210, 151, 136,
    207, 3, 92, 49, 69, 178, 26, 179, 68, 216, 6, 46, 169, 64, 0, 0,
]);
pub const RENT: Pubkey = Pubkey([
    6, 167, 213, 23, 25, 44, 92, 81, 33, 140, 201, 76, 61, 74, 241, 127,
    88, 218, 238, 8, 155, 161, 253, 68, 227, 219, 217, 138, 0, 0, 0, 0,
]);
pub const TOKEN_PROGRAM: Pubkey = Pubkey([
    6, 221, 246, 225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172,
    30, 61, 180, 98, 48, 181, 163, 111, 224, 21, 105, 22, 138, 175, 0, 169,
]);
pub const ASSOCIATED_TOKEN_PROGRAM: Pubkey = Pubkey([
    140, 151, 37, 143, 78, 36, 137, 241, 187, 61, 16, 41, 20, 142, 13, 131,
    11, 90, 19, 153, 218, 255, 16, 132, 4, 142, 123, 216, 219, 233, 248, 89,
]);

/// Size of a system nonce account.
pub const NONCE_ACCOUNT_LENGTH: u64 = 80;

// SystemInstruction discriminants (u32 LE)
const SYS_CREATE_ACCOUNT: u32 = 0;
const SYS_TRANSFER: u32 = 2;
const SYS_ADVANCE_NONCE: u32 = 4;
const SYS_INITIALIZE_NONCE: u32 = 6;

const TOKEN_TRANSFER: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self { pubkey, is_signer, is_writable: true }
    }

    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self { pubkey, is_signer, is_writable: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

pub(crate) fn tagged(tag: u32) -> Vec<u8> {
    tag.to_le_bytes().to_vec()
}

pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = tagged(SYS_TRANSFER);
    data.extend_from_slice(&lamports.to_le_bytes());
    Instruction {
        program_id: SYSTEM_PROGRAM,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    }
}

pub fn create_account(from: &Pubkey, new_account: &Pubkey, lamports: u64, space: u64, owner: &Pubkey) -> Instruction {
    let mut data = tagged(SYS_CREATE_ACCOUNT);
    data.extend_from_slice(&lamports.to_le_bytes());
    data.extend_from_slice(&space.to_le_bytes());
    data.extend_from_slice(&owner.0);
    Instruction {
        program_id: SYSTEM_PROGRAM,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*new_account, true)],
        data,
    }
}

pub fn advance_nonce(nonce_account: &Pubkey, authority: &Pubkey) -> Instruction {
    Instruction {
        program_id: SYSTEM_PROGRAM,
        accounts: vec![
            AccountMeta::new(*nonce_account, false),
            AccountMeta::new_readonly(RECENT_BLOCKHASHES, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: tagged(SYS_ADVANCE_NONCE),
    }
}

pub fn initialize_nonce(nonce_account: &Pubkey, authority: &Pubkey) -> Instruction {
    let mut data = tagged(SYS_INITIALIZE_NONCE);
    data.extend_from_slice(&authority.0);
    Instruction {
        program_id: SYSTEM_PROGRAM,
        accounts: vec![
            AccountMeta::new(*nonce_account, false),
            AccountMeta::new_readonly(RECENT_BLOCKHASHES, false),
            AccountMeta::new_readonly(RENT, false),
        ],
        data,
    }
}

/// Associated token account of `owner` for `mint`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey> {
    let (address, _) =
        Pubkey::find_program_address(&[&owner.0, &TOKEN_PROGRAM.0, &mint.0], &ASSOCIATED_TOKEN_PROGRAM)?;
    Ok(address)
}

pub fn create_associated_token_account(payer: &Pubkey, ata: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*ata, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM, false),
        ],
        data: Vec::new(),
    }
}

/// SPL Token `Transfer` (unchecked amount, single owner).
pub fn token_transfer(source: &Pubkey, destination: &Pubkey, owner: &Pubkey, amount: u64) -> Instruction {
    let mut data = vec![TOKEN_TRANSFER];
    data.extend_from_slice(&amount.to_le_bytes());
    Instruction {
        program_id: TOKEN_PROGRAM,
        accounts: vec![
            AccountMeta::new(*source, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_ids_render() {
        assert_eq!(SYSTEM_PROGRAM.to_string(), "11111111111111111111111111111111");
        assert_eq!(RECENT_BLOCKHASHES.to_string(), "SysvarRecentB1ockHashes11111111111111111111");
        assert_eq!(RENT.to_string(), "SysvarRent111111111111111111111111111111111");
        assert_eq!(TOKEN_PROGRAM.to_string(), "TokenkegQfeZyiNwAJbNbGWPFXCWuBvf9Ss623VQ5DA");
        assert_eq!(ASSOCIATED_TOKEN_PROGRAM.to_string(), "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");
    }

    #[test]
    fn test_transfer_layout() {
        let ix = transfer(&Pubkey([1; 32]), &Pubkey([2; 32]), 1_000_000);
        assert_eq!(hex::encode(&ix.data), "0200000040420f0000000000");
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert!(!ix.accounts[1].is_signer && ix.accounts[1].is_writable);
    }

    #[test]
    fn test_recipient_ata() {
        let owner: Pubkey = "8F1hnqYwTYKQdQuJe7q4uNykyuf6P6gfbW69Q56Z1GQa".parse().unwrap();
        let mint: Pubkey = "6bkSpihx773QNWEz7mpvtv8A5d2qNu4sZVGP1ghMuJm3".parse().unwrap();
        assert_eq!(
            associated_token_address(&owner, &mint).unwrap().to_string(),
            "YXXD8Jtj79aApHSxuCWjZzQmN8J9dVsFZFwfs68MYM1"
        );
    }
}
