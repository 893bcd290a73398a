//! CRC-32 verification, RFC 8794 § 11.3.1.
//!
//! A `CRC-32` element must be the first child of its master; its 4-byte
//! little-endian payload covers every following byte of the parent.

use log::warn;
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::reader::Source;
use crate::tree::{NodeId, Tree};
use crate::vint::EbmlId;

const BLOCK: usize = 4096;

/// Read a `CRC-32` element's declared value and, when the element sits in
/// first position, recompute the checksum over `[self.end + 1, parent.end]`.
/// The cursor is expected at the element's payload and is left one past its
/// end; the recomputation pass restores it.
pub(crate) fn read_and_verify<R: Read + Seek>(
    src: &mut Source<R>,
    tree: &Tree<EbmlId>,
    node: NodeId,
) -> Result<u32> {
    let payload_size = tree.node(node).payload_size;
    if payload_size != 4 {
        return Err(Error::InvalidCrcSize(payload_size));
    }
    let bytes = src.read_slice(4)?;
    let declared = u32::from_le_bytes(bytes.try_into().unwrap());

    let parent = tree.node(node).parent;
    if tree.node(parent).first_child != Some(node) {
        warn!(
            "CRC-32 at offset {} is not the first child of {}, skipping verification",
            tree.node(node).offset,
            tree.node(parent).id
        );
        return Ok(declared);
    }

    let start = tree.node(node).end + 1;
    let end = tree.node(parent).end;
    let computed = accumulate(src, start, end)?;
    if computed != declared {
        return Err(Error::InvalidCrc { declared, computed });
    }
    Ok(declared)
}

/// Stream `[start, end]` through the accumulator in fixed-size blocks,
/// restoring the cursor afterwards.
fn accumulate<R: Read + Seek>(src: &mut Source<R>, start: u64, end: u64) -> Result<u32> {
    let saved = src.position()?;
    src.set_position(start)?;

    let mut hasher = crc32fast::Hasher::new();
    let mut remaining = (end + 1).saturating_sub(start);
    let mut block = [0u8; BLOCK];
    while remaining > 0 {
        let n = remaining.min(BLOCK as u64) as usize;
        src.read_exact(&mut block[..n])?;
        hasher.update(&block[..n]);
        remaining -= n as u64;
    }

    src.set_position(saved)?;
    Ok(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn accumulate_restores_position() {
        let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let mut src = Source::new(Cursor::new(data.clone())).unwrap();
        src.set_position(17).unwrap();

        let computed = accumulate(&mut src, 100, 9_999).unwrap();
        assert_eq!(src.position().unwrap(), 17);
        assert_eq!(computed, crc32fast::hash(&data[100..]));
    }

    #[test]
    fn empty_range_is_zero() {
        let mut src = Source::new(Cursor::new(vec![0u8; 8])).unwrap();
        assert_eq!(accumulate(&mut src, 8, 7).unwrap(), 0);
    }
}
