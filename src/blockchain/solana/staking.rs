//! Stake Program instructions
//!
//! 1. 创建质押账户 (createAccount + initialize)
//! 2. 委托给验证者 (delegate)
//! 3. 取消委托 (deactivate)
//! 4. 提取资金 (withdraw)

use super::address::Pubkey;
use super::instruction::{create_account, tagged, AccountMeta, Instruction, RENT};

pub const STAKE_PROGRAM: Pubkey = Pubkey([
    6, 161, 216, 23, 145, 55, 84, 42, 152, 52, 55, 189, 254, 42, 122, 178,
    85, 127, 83, 92, 138, 120, 114, 43, 104, 164, 157, 192, 0, 0, 0, 0,
]);
pub const STAKE_CONFIG: Pubkey = Pubkey([
    6, 161, 216, 23, 165, 2, 5, 11, 104, 7, 145, 230, 206, 109, 184, 142,
    30, 91, 113, 80, 246, 31, 198, 121, 10, 78, 180, 209, 0, 0, 0, 0,
]);
pub const CLOCK: Pubkey = Pubkey([
    6, 167, 213, 23, 24, 199, 116, 201, 40, 86, 99, 152, 105, 29, 94, 182,
    139, 94, 184, 163, 155, 75, 109, 92, 115, 85, 91, 33, 0, 0, 0, 0,
]);
pub const STAKE_HISTORY: Pubkey = Pubkey([
    6, 167, 213, 23, 25, 53, 132, 208, 254, 237, 155, 179, 67, 29, 19, 32,
    107, 229, 68, 40, 27, 87, 184, 86, 108, 197, 55, 95, 244, 0, 0, 0,
]);

/// Size of a stake account.
pub const STAKE_ACCOUNT_LENGTH: u64 = 200;

const STAKE_INITIALIZE: u32 = 0;
const STAKE_DELEGATE: u32 = 2;
const STAKE_WITHDRAW: u32 = 4;
const STAKE_DEACTIVATE: u32 = 5;

/// Staker and withdrawer authorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorized {
    pub staker: Pubkey,
    pub withdrawer: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lockup {
    pub unix_timestamp: i64,
    pub epoch: u64,
    pub custodian: Pubkey,
}

pub fn initialize(stake: &Pubkey, authorized: &Authorized, lockup: &Lockup) -> Instruction {
    let mut data = tagged(STAKE_INITIALIZE);
    data.extend_from_slice(&authorized.staker.0);
    data.extend_from_slice(&authorized.withdrawer.0);
    data.extend_from_slice(&lockup.unix_timestamp.to_le_bytes());
    data.extend_from_slice(&lockup.epoch.to_le_bytes());
    data.extend_from_slice(&lockup.custodian.0);
    Instruction {
        program_id: STAKE_PROGRAM,
        accounts: vec![AccountMeta::new(*stake, false), AccountMeta::new_readonly(RENT, false)],
        data,
    }
}

/// System createAccount owned by the stake program, then initialize.
pub fn create_account_instructions(
    from: &Pubkey,
    stake: &Pubkey,
    authorized: &Authorized,
    lockup: &Lockup,
    lamports: u64,
) -> Vec<Instruction> {
    vec![
        create_account(from, stake, lamports, STAKE_ACCOUNT_LENGTH, &STAKE_PROGRAM),
        initialize(stake, authorized, lockup),
    ]
}

pub fn delegate(stake: &Pubkey, authority: &Pubkey, vote: &Pubkey) -> Instruction {
    Instruction {
        program_id: STAKE_PROGRAM,
        accounts: vec![
            AccountMeta::new(*stake, false),
            AccountMeta::new_readonly(*vote, false),
            AccountMeta::new_readonly(CLOCK, false),
            AccountMeta::new_readonly(STAKE_HISTORY, false),
            AccountMeta::new_readonly(STAKE_CONFIG, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: tagged(STAKE_DELEGATE),
    }
}

pub fn deactivate(stake: &Pubkey, authority: &Pubkey) -> Instruction {
    Instruction {
        program_id: STAKE_PROGRAM,
        accounts: vec![
            AccountMeta::new(*stake, false),
            AccountMeta::new_readonly(CLOCK, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: tagged(STAKE_DEACTIVATE),
    }
}

pub fn withdraw(stake: &Pubkey, authority: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = tagged(STAKE_WITHDRAW);
    data.extend_from_slice(&lamports.to_le_bytes());
    Instruction {
        program_id: STAKE_PROGRAM,
        accounts: vec![
            AccountMeta::new(*stake, false),
            AccountMeta::new(*to, false),
            AccountMeta::new_readonly(CLOCK, false),
            AccountMeta::new_readonly(STAKE_HISTORY, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data,
    }
}
