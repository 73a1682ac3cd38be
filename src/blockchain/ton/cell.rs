//! TON cells: up to 1023 data bits and 4 references, hashed by their
//! standard representation.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::address::TonAddress;
use crate::core::errors::{Result, SignerError};
use crate::crypto::sha256;

pub const MAX_BITS: usize = 1023;
pub const MAX_REFS: usize = 4;

/// Ordinary (non-exotic, level 0) cell.
#[derive(Clone, Default)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
    hash: OnceCell<[u8; 32]>,
}

impl Cell {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Cell from raw bits (`data` holds at least `bit_len` bits, MSB first).
    pub fn from_parts(data: &[u8], bit_len: usize, refs: Vec<Arc<Cell>>) -> Result<Self> {
        if bit_len > MAX_BITS || refs.len() > MAX_REFS {
            return Err(SignerError::encoding("cell exceeds 1023 bits or 4 references"));
        }
        let bytes = bit_len.div_ceil(8);
        if data.len() < bytes {
            return Err(SignerError::encoding("cell data shorter than its bit length"));
        }
        let mut data = data[..bytes].to_vec();
        if bit_len % 8 != 0 {
            if let Some(last) = data.last_mut() {
                *last &= 0xFFu8 << (8 - bit_len % 8);
            }
        }
        Ok(Self { data, bit_len, refs, hash: OnceCell::new() })
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn refs(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    /// Descriptor bytes d1 (reference count) and d2 (data length class).
    pub fn descriptors(&self) -> [u8; 2] {
        [self.refs.len() as u8, (self.bit_len.div_ceil(8) + self.bit_len / 8) as u8]
    }

    /// Data bytes with the completion tag appended when not byte aligned.
    pub fn padded_data(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        let rem = self.bit_len % 8;
        if rem != 0 {
            if let Some(last) = out.last_mut() {
                *last |= 0x80 >> rem;
            }
        }
        out
    }

    pub fn depth(&self) -> u16 {
        self.refs.iter().map(|r| r.depth() + 1).max().unwrap_or(0)
    }

    /// SHA-256 of the standard cell representation.
    pub fn hash(&self) -> [u8; 32] {
        *self.hash.get_or_init(|| {
            let mut repr = Vec::with_capacity(2 + self.data.len() + self.refs.len() * 34);
            repr.extend_from_slice(&self.descriptors());
            repr.extend_from_slice(&self.padded_data());
            for r in &self.refs {
                repr.extend_from_slice(&r.depth().to_be_bytes());
            }
            for r in &self.refs {
                repr.extend_from_slice(&r.hash());
            }
            sha256(&repr)
        })
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash()
    }
}

impl Eq for Cell {}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("bits", &self.bit_len)
            .field("refs", &self.refs.len())
            .field("hash", &hex::encode(self.hash()))
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn refs_len(&self) -> usize {
        self.refs.len()
    }

    pub fn remaining_bits(&self) -> usize {
        MAX_BITS - self.bit_len
    }

    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self> {
        if self.bit_len >= MAX_BITS {
            return Err(SignerError::encoding("cell overflow: more than 1023 bits"));
        }
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            self.data[self.bit_len / 8] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
        Ok(self)
    }

    /// Big-endian unsigned integer in `bits` bits (at most 64).
    pub fn store_uint(&mut self, value: u64, bits: usize) -> Result<&mut Self> {
        if bits > 64 || (bits < 64 && value >> bits != 0) {
            return Err(SignerError::encoding(format!("{} does not fit in {} bits", value, bits)));
        }
        if self.remaining_bits() < bits {
            return Err(SignerError::encoding("cell overflow: more than 1023 bits"));
        }
        for i in (0..bits).rev() {
            self.store_bit((value >> i) & 1 == 1)?;
        }
        Ok(self)
    }

    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        if self.remaining_bits() < bytes.len() * 8 {
            return Err(SignerError::encoding("cell overflow: more than 1023 bits"));
        }
        for &b in bytes {
            self.store_uint(b as u64, 8)?;
        }
        Ok(self)
    }

    /// `Grams` / `VarUInteger 16`: 4-bit byte length, then the value.
    pub fn store_coins(&mut self, amount: u128) -> Result<&mut Self> {
        if amount == 0 {
            return self.store_uint(0, 4);
        }
        let len = 16 - (amount.leading_zeros() as usize / 8);
        if len > 15 {
            return Err(SignerError::encoding("coin amount exceeds 120 bits"));
        }
        self.store_uint(len as u64, 4)?;
        let be = amount.to_be_bytes();
        self.store_bytes(&be[16 - len..])
    }

    /// `MsgAddress`: `addr_none$00` or `addr_std$10` without anycast.
    pub fn store_address(&mut self, address: Option<&TonAddress>) -> Result<&mut Self> {
        match address {
            None => self.store_uint(0, 2),
            Some(addr) => {
                self.store_uint(0b100, 3)?
                    .store_uint(addr.workchain as u8 as u64, 8)?
                    .store_bytes(&addr.hash)
            }
        }
    }

    pub fn store_ref(&mut self, cell: Arc<Cell>) -> Result<&mut Self> {
        if self.refs.len() >= MAX_REFS {
            return Err(SignerError::encoding("cell overflow: more than 4 references"));
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// Append another cell's bits and references.
    pub fn store_cell_contents(&mut self, cell: &Cell) -> Result<&mut Self> {
        if self.remaining_bits() < cell.bit_len || self.refs.len() + cell.refs.len() > MAX_REFS {
            return Err(SignerError::encoding("cell overflow while appending"));
        }
        for i in 0..cell.bit_len {
            self.store_bit(cell.data[i / 8] & (0x80 >> (i % 8)) != 0)?;
        }
        for r in &cell.refs {
            self.store_ref(r.clone())?;
        }
        Ok(self)
    }

    /// Store `cell` inline (`0` + contents) when it fits, otherwise as a reference (`1`).
    pub fn store_maybe_inline(&mut self, cell: Cell) -> Result<&mut Self> {
        let fits = self.remaining_bits() > cell.bit_len && self.refs.len() + cell.refs.len() <= MAX_REFS;
        if fits {
            self.store_bit(false)?.store_cell_contents(&cell)
        } else {
            self.store_bit(true)?.store_ref(Arc::new(cell))
        }
    }

    pub fn build(&self) -> Cell {
        Cell {
            data: self.data.clone(),
            bit_len: self.bit_len,
            refs: self.refs.clone(),
            hash: OnceCell::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell_hash() {
        assert_eq!(
            hex::encode(Cell::empty().hash()),
            "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
        );
    }

    #[test]
    fn test_padding_and_descriptors() {
        let mut b = CellBuilder::new();
        b.store_uint(0b101, 3).unwrap();
        let cell = b.build();
        assert_eq!(cell.descriptors(), [0, 1]);
        assert_eq!(cell.padded_data(), vec![0b1011_0000]);

        let mut b = CellBuilder::new();
        b.store_bytes(&[0xAB]).unwrap();
        let aligned = b.build();
        assert_eq!(aligned.descriptors(), [0, 2]);
        assert_eq!(aligned.padded_data(), vec![0xAB]);
    }

    #[test]
    fn test_coins_encoding() {
        let mut b = CellBuilder::new();
        b.store_coins(0).unwrap();
        assert_eq!(b.bit_len(), 4);

        let mut b = CellBuilder::new();
        b.store_coins(100_000_000).unwrap();
        // 4 bytes: 0x05F5E100
        assert_eq!(b.bit_len(), 4 + 32);
        assert_eq!(b.build().padded_data(), vec![0x40, 0x5F, 0x5E, 0x10, 0x08]);
    }

    #[test]
    fn test_overflow_rejected() {
        let mut b = CellBuilder::new();
        b.store_bytes(&[0u8; 127]).unwrap();
        b.store_uint(0, 7).unwrap();
        assert!(b.store_bit(true).is_err());
        assert!(CellBuilder::new().store_uint(16, 4).is_err());

        let mut b = CellBuilder::new();
        for _ in 0..MAX_REFS {
            b.store_ref(Arc::new(Cell::empty())).unwrap();
        }
        assert!(b.store_ref(Arc::new(Cell::empty())).is_err());
    }

    #[test]
    fn test_inline_vs_ref() {
        let mut payload = CellBuilder::new();
        payload.store_bytes(&[1u8; 100]).unwrap();
        let payload = payload.build();

        let mut small = CellBuilder::new();
        small.store_maybe_inline(payload.clone()).unwrap();
        assert_eq!(small.bit_len(), 1 + 800);
        assert_eq!(small.refs_len(), 0);

        let mut full = CellBuilder::new();
        full.store_bytes(&[0u8; 60]).unwrap();
        full.store_maybe_inline(payload).unwrap();
        assert_eq!(full.bit_len(), 481);
        assert_eq!(full.refs_len(), 1);
    }
}
