//! Apple iTunes metadata under `moov.udta.meta.ilst`.
//!
//! Each child of `ilst` is a four-character tag holding a `data` atom, or
//! the non-standard `----` extension holding a `mean`/`name`/`data` triple.
//! The `data` payload is folded up into its tag node.

use log::warn;
use std::io::{Read, Seek};

use super::FourCC;
use crate::error::{Error, Result};
use crate::payload::{string_from_bytes, ItunesData, ItunesValue, Payload};
use crate::reader::Source;
use crate::tree::{Node, NodeId, Tree};

// Well-known `data` atom type codes; 0 (binary) is the fallback arm.
const TYPE_TEXT: u32 = 1;
const TYPE_JPEG: u32 = 13;
const TYPE_PNG: u32 = 14;

/// Walk the children of an `ilst` box, folding `data` atoms into their tags.
/// The cursor is expected at the `ilst` payload start and ends one past the
/// box end.
pub(super) fn parse_ilst<R: Read + Seek>(
    src: &mut Source<R>,
    tree: &mut Tree<FourCC>,
    ilst: NodeId,
) -> Result<()> {
    let ilst_end = tree.node(ilst).end;

    loop {
        let offset = src.position()?;
        if offset > ilst_end {
            break;
        }
        let tag = read_tag_header(src, ilst_end, offset)?;
        let node = tree.append_child(ilst, tag);
        if tree.node(node).id == FourCC::EXTENDED {
            parse_extended(src, tree, node)?;
        } else {
            parse_tag(src, tree, node)?;
        }
        src.set_position(tree.node(node).end + 1)?;
    }
    Ok(())
}

/// Read one plain `size`/`type` header inside `ilst`; extended sizes do not
/// occur in metadata tags.
fn read_tag_header<R: Read + Seek>(
    src: &mut Source<R>,
    outer_end: u64,
    offset: u64,
) -> Result<Node<FourCC>> {
    let size = u64::from(src.read_be_u32()?);
    let id = FourCC::from_u32(src.read_be_u32()?);
    if size < 8 {
        return Err(Error::WrongFileFormat);
    }
    if size > outer_end - offset + 1 {
        return Err(Error::FileEndedEarly);
    }
    Ok(Node::new(id, offset, size, offset + 8))
}

/// A standard tag: children walked in order, the `data` atom folded into
/// the tag's own payload.
fn parse_tag<R: Read + Seek>(
    src: &mut Source<R>,
    tree: &mut Tree<FourCC>,
    tag: NodeId,
) -> Result<()> {
    let tag_id = tree.node(tag).id;
    let tag_end = tree.node(tag).end;

    loop {
        let offset = src.position()?;
        if offset > tag_end {
            break;
        }
        let child = read_tag_header(src, tag_end, offset)?;
        let child_id = tree.append_child(tag, child);
        if tree.node(child_id).id == FourCC::DATA {
            let value = read_data(src, tree, child_id, tag_id)?;
            tree.node_mut(tag).payload = Payload::Itunes(value);
        } else {
            warn!("unexpected '{}' in '{}' tag", tree.node(child_id).id, tag_id);
        }
        src.set_position(tree.node(child_id).end + 1)?;
    }
    Ok(())
}

/// The `----` extension: a flat `mean`/`name`/`data` sequence. The walk is
/// strictly sequential; ordering carries the meaning, so nodes are linked
/// as encountered rather than rediscovered by range.
fn parse_extended<R: Read + Seek>(
    src: &mut Source<R>,
    tree: &mut Tree<FourCC>,
    tag: NodeId,
) -> Result<()> {
    let tag_end = tree.node(tag).end;

    loop {
        let offset = src.position()?;
        if offset > tag_end {
            break;
        }
        let child = read_tag_header(src, tag_end, offset)?;
        let child_id = tree.append_child(tag, child);
        match tree.node(child_id).id {
            FourCC::MEAN | FourCC::NAME => {
                // Version/flags word, then a bare ASCII string to box end.
                let payload_size = tree.node(child_id).payload_size;
                if payload_size < 4 {
                    return Err(Error::WrongFileFormat);
                }
                src.read_be_u32()?;
                let text = string_from_bytes(&src.read_slice(payload_size - 4)?)?;
                tree.node_mut(child_id).payload = Payload::String(text);
            }
            FourCC::DATA => {
                let value = read_data(src, tree, child_id, FourCC::EXTENDED)?;
                tree.node_mut(tag).payload = Payload::Itunes(value);
            }
            other => warn!("unexpected '{other}' in '----' tag"),
        }
        src.set_position(tree.node(child_id).end + 1)?;
    }
    Ok(())
}

/// Decode a `data` atom: `(type: u32be, subtype: u32be, value: bytes)`.
fn read_data<R: Read + Seek>(
    src: &mut Source<R>,
    tree: &Tree<FourCC>,
    data: NodeId,
    tag_id: FourCC,
) -> Result<ItunesValue> {
    let payload_size = tree.node(data).payload_size;
    if payload_size < 8 {
        return Err(Error::WrongFileFormat);
    }
    let type_code = src.read_be_u32()?;
    let subtype = src.read_be_u32()?;
    let bytes = src.read_slice(payload_size - 8)?;

    let data = match (tag_id, type_code) {
        (FourCC::TRKN, _) if bytes.len() >= 6 => ItunesData::Track {
            current: u16::from_be_bytes([bytes[2], bytes[3]]),
            total: u16::from_be_bytes([bytes[4], bytes[5]]),
        },
        (FourCC::DISK, _) if bytes.len() >= 6 => ItunesData::Disk {
            current: u16::from_be_bytes([bytes[2], bytes[3]]),
            total: u16::from_be_bytes([bytes[4], bytes[5]]),
        },
        (_, TYPE_JPEG) => ItunesData::Jpeg(bytes),
        (_, TYPE_PNG) => ItunesData::Png(bytes),
        (_, TYPE_TEXT) => ItunesData::Text(string_from_bytes(&bytes)?),
        _ => ItunesData::Binary(bytes),
    };
    Ok(ItunesValue {
        type_code,
        subtype,
        data,
    })
}
