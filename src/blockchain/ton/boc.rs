//! Bag of Cells (de)serialization.
//!
//! Serialization writes a single root without an index and with a CRC32C
//! trailer. Cells are ordered depth-first; a cell reached again from a parent
//! that sits later in the order is moved (with its subtree) to the end so every
//! reference points forward.

use std::collections::HashMap;
use std::sync::Arc;

use super::cell::Cell;
use super::crc::crc32c;
use crate::core::errors::{Result, SignerError};

const BOC_MAGIC: [u8; 4] = [0xB5, 0xEE, 0x9C, 0x72];

fn byte_len(value: usize) -> usize {
    let bits = usize::BITS - value.leading_zeros();
    (bits as usize).div_ceil(8).max(1)
}

fn write_uint(out: &mut Vec<u8>, value: usize, len: usize) {
    let be = (value as u64).to_be_bytes();
    out.extend_from_slice(&be[8 - len..]);
}

#[derive(Default)]
struct TopologicalOrder {
    cells: Vec<([u8; 32], Arc<Cell>)>,
    index: HashMap<[u8; 32], usize>,
}

impl TopologicalOrder {
    fn walk(&mut self, cell: &Arc<Cell>, parent: Option<[u8; 32]>) {
        let hash = cell.hash();
        if let Some(&existing) = self.index.get(&hash) {
            let parent_pos = parent.and_then(|p| self.index.get(&p).copied());
            if parent_pos.is_some_and(|p| p > existing) {
                self.move_to_end(hash);
            }
            return;
        }
        self.index.insert(hash, self.cells.len());
        self.cells.push((hash, cell.clone()));
        for child in cell.refs() {
            self.walk(child, Some(hash));
        }
    }

    fn move_to_end(&mut self, hash: [u8; 32]) {
        let Some(&target) = self.index.get(&hash) else {
            return;
        };
        for pos in self.index.values_mut() {
            if *pos > target {
                *pos -= 1;
            }
        }
        self.index.insert(hash, self.cells.len() - 1);
        let item = self.cells.remove(target);
        let children: Vec<[u8; 32]> = item.1.refs().iter().map(|c| c.hash()).collect();
        self.cells.push(item);
        for child in children {
            self.move_to_end(child);
        }
    }
}

/// Serialize `root` as a BOC with CRC32C and no index (`toBoc(false)`).
pub fn serialize(root: &Arc<Cell>) -> Result<Vec<u8>> {
    let mut order = TopologicalOrder::default();
    order.walk(root, None);

    let cell_count = order.cells.len();
    let size_bytes = byte_len(cell_count);
    let mut payload = Vec::new();
    for (_, cell) in &order.cells {
        payload.extend_from_slice(&cell.descriptors());
        payload.extend_from_slice(&cell.padded_data());
        for child in cell.refs() {
            let idx = order
                .index
                .get(&child.hash())
                .copied()
                .ok_or_else(|| SignerError::encoding("BOC reference to an unknown cell"))?;
            write_uint(&mut payload, idx, size_bytes);
        }
    }
    let offset_bytes = byte_len(payload.len());

    let mut out = Vec::with_capacity(payload.len() + 32);
    out.extend_from_slice(&BOC_MAGIC);
    // has_idx = 0, has_crc32c = 1, has_cache_bits = 0, flags = 0
    out.push(0x40 | size_bytes as u8);
    out.push(offset_bytes as u8);
    write_uint(&mut out, cell_count, size_bytes);
    write_uint(&mut out, 1, size_bytes); // roots
    write_uint(&mut out, 0, size_bytes); // absent
    write_uint(&mut out, payload.len(), offset_bytes);
    write_uint(&mut out, 0, size_bytes); // root index
    out.extend_from_slice(&payload);
    let crc = crc32c(&out);
    out.extend_from_slice(&crc.to_le_bytes());
    Ok(out)
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.data.len()).ok_or_else(|| {
            SignerError::encoding("BOC truncated")
        })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn uint(&mut self, n: usize) -> Result<usize> {
        Ok(self.take(n)?.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize))
    }
}

/// Parse a single-root BOC (ordinary cells only).
pub fn deserialize(boc: &[u8]) -> Result<Arc<Cell>> {
    let mut r = Reader { data: boc, pos: 0 };
    if r.take(4)? != BOC_MAGIC {
        return Err(SignerError::encoding("not a BOC: bad magic"));
    }
    let flags = r.uint(1)?;
    let has_idx = flags & 0x80 != 0;
    let has_crc = flags & 0x40 != 0;
    let size_bytes = flags & 0x07;
    let offset_bytes = r.uint(1)?;
    if size_bytes == 0 || size_bytes > 4 || offset_bytes == 0 || offset_bytes > 8 {
        return Err(SignerError::encoding("BOC header has invalid sizes"));
    }
    let cell_count = r.uint(size_bytes)?;
    let roots = r.uint(size_bytes)?;
    let _absent = r.uint(size_bytes)?;
    let _total_size = r.uint(offset_bytes)?;
    if roots != 1 {
        return Err(SignerError::encoding(format!("expected a single BOC root, got {}", roots)));
    }
    let root_index = r.uint(size_bytes)?;
    // 每个 cell 至少有 d1/d2 两个描述字节
    if cell_count == 0 || cell_count > (boc.len() - r.pos) / 2 {
        return Err(SignerError::encoding(format!(
            "BOC declares {} cells but has {} bytes left",
            cell_count,
            boc.len() - r.pos
        )));
    }
    if has_idx {
        r.take(cell_count.saturating_mul(offset_bytes))?;
    }

    let mut raw: Vec<(Vec<u8>, usize, Vec<usize>)> = Vec::with_capacity(cell_count);
    for i in 0..cell_count {
        let d1 = r.uint(1)?;
        let d2 = r.uint(1)?;
        if d1 & 0xF8 != 0 {
            return Err(SignerError::encoding("exotic or leveled cells are not supported"));
        }
        let ref_count = d1 & 0x07;
        let data_len = d2.div_ceil(2);
        let data = r.take(data_len)?.to_vec();
        let bit_len = if d2 % 2 == 1 {
            let last = data.last().copied().unwrap_or(0);
            if last == 0 {
                return Err(SignerError::encoding("BOC cell is missing its completion tag"));
            }
            data_len * 8 - last.trailing_zeros() as usize - 1
        } else {
            data_len * 8
        };
        let mut refs = Vec::with_capacity(ref_count);
        for _ in 0..ref_count {
            let idx = r.uint(size_bytes)?;
            if idx <= i || idx >= cell_count {
                return Err(SignerError::encoding("BOC reference must point forward"));
            }
            refs.push(idx);
        }
        raw.push((data, bit_len, refs));
    }
    if has_crc {
        let body_end = r.pos;
        let expected = u32::from_le_bytes(
            r.take(4)?.try_into().map_err(|_| SignerError::encoding("BOC truncated"))?,
        );
        if crc32c(&boc[..body_end]) != expected {
            return Err(SignerError::encoding("BOC CRC32C mismatch"));
        }
    }

    let mut cells: Vec<Option<Arc<Cell>>> = vec![None; cell_count];
    for i in (0..cell_count).rev() {
        let (data, bit_len, refs) = &raw[i];
        let children = refs
            .iter()
            .map(|&j| cells[j].clone().ok_or_else(|| SignerError::encoding("BOC reference unresolved")))
            .collect::<Result<Vec<_>>>()?;
        cells[i] = Some(Arc::new(Cell::from_parts(data, *bit_len, children)?));
    }
    cells
        .get(root_index)
        .cloned()
        .flatten()
        .ok_or_else(|| SignerError::encoding("BOC root index out of range"))
}
