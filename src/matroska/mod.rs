//! Matroska/WebM body engine: schema-driven recursive descent under
//! `Segment`.

pub mod schema;

use log::{debug, warn};
use std::io::{Read, Seek};

use crate::ebml::{crc, read_element_header, BodyOutcome, Document, EBML};
use crate::error::{Error, Result};
use crate::payload::{self, Payload, TrackType};
use crate::reader::Source;
use crate::tree::{Node, NodeId, Tree};
use crate::vint::EbmlId;
use crate::ParseOptions;

use schema::{Disposition, ElementKind};

/// Walk one Matroska body. The cursor is expected right after the EBML
/// header (or, when `resume` carries a node, one past a cluster boundary).
pub(crate) fn parse_body<R: Read + Seek>(
    src: &mut Source<R>,
    tree: &mut Tree<EbmlId>,
    doc: &mut Document,
    options: &ParseOptions,
    resume: Option<NodeId>,
) -> Result<BodyOutcome> {
    let segment = match resume {
        Some(_) => doc.body.ok_or(Error::MatroskaBodyRootWrongId)?,
        None => {
            let pos = src.position()?;
            if pos >= src.len() {
                return Err(Error::MatroskaBodyRootWrongId);
            }
            let eh = read_element_header(src)?;
            if eh.id == EBML {
                // Another document begins where the body was expected.
                src.set_position(pos)?;
                return Ok(BodyOutcome::NextDocument);
            }
            if eh.id != schema::SEGMENT {
                return Err(Error::MatroskaBodyRootWrongId);
            }
            if eh.size > src.len() - eh.offset {
                return Err(Error::FileEndedEarly);
            }
            let root = tree.root();
            let node = tree.append_child(
                root,
                Node::new(eh.id, eh.offset, eh.size, eh.payload_offset),
            );
            doc.body = Some(node);
            node
        }
    };
    let segment_end = tree.node(segment).end;

    let mut prev = resume.unwrap_or(segment);
    let mut open_cluster: Option<u64> = None;

    loop {
        let pos = src.position()?;
        if let Some(cluster_end) = open_cluster {
            if pos > cluster_end {
                open_cluster = None;
                if options.return_after_cluster {
                    return Ok(BodyOutcome::ClusterBoundary(prev));
                }
            }
        }
        if pos >= src.len() {
            return Ok(BodyOutcome::Eof);
        }
        if pos > segment_end {
            // Past the segment: back at the stream level.
            return Ok(BodyOutcome::NextDocument);
        }

        let eh = read_element_header(src)?;
        if u64::from(eh.size_width) > doc.max_size_length {
            return Err(Error::VIntOutOfRange);
        }
        let node = Node::new(eh.id, eh.offset, eh.size, eh.payload_offset);
        if node.end > segment_end {
            return Err(Error::FileEndedEarly);
        }
        let parent = tree.enclosing(prev, eh.offset);
        let node_id = tree.append_child(parent, node);

        if eh.id == schema::CLUSTER {
            if options.skip_clusters {
                src.set_position(tree.node(node_id).end + 1)?;
                if options.return_after_cluster {
                    return Ok(BodyOutcome::ClusterBoundary(node_id));
                }
            } else {
                open_cluster = Some(tree.node(node_id).end);
            }
        } else {
            dispatch(src, tree, node_id)?;
        }
        prev = node_id;
    }
}

/// Apply the schema row for one non-cluster element: intern, special-case,
/// or skip.
fn dispatch<R: Read + Seek>(
    src: &mut Source<R>,
    tree: &mut Tree<EbmlId>,
    node: NodeId,
) -> Result<()> {
    let id = tree.node(node).id;
    let size = tree.node(node).payload_size;

    // Parser-specific elements first.
    match id {
        schema::CRC32 => {
            let declared = crc::read_and_verify(src, tree, node)?;
            tree.node_mut(node).payload = Payload::Unsigned(u64::from(declared));
            return Ok(());
        }
        schema::SEEK_POSITION => return read_seek_position(src, tree, node),
        schema::TRACK_TYPE => return read_track_type(src, tree, node),
        schema::SEGMENT_UID | schema::PREV_UID | schema::NEXT_UID | schema::SEGMENT_FAMILY => {
            let uuid = payload::read_uuid(src, size)?;
            tree.node_mut(node).payload = Payload::Uuid(uuid);
            return Ok(());
        }
        schema::DATE_UTC => {
            let date = payload::read_matroska_date(src, size)?;
            tree.node_mut(node).payload = Payload::Date(date);
            return Ok(());
        }
        _ => {}
    }

    let Some(entry) = schema::lookup(id) else {
        warn!(
            "unknown element {id} ({size}B) at offset {}",
            tree.node(node).offset
        );
        return skip_payload(src, tree, node);
    };

    match entry.disposition {
        Disposition::Skip => {
            debug!("skipping {} ({size}B)", entry.name);
            skip_payload(src, tree, node)
        }
        Disposition::Intern | Disposition::Special => match entry.kind {
            // Masters carry no scalar payload; children resolve by range.
            ElementKind::Master => Ok(()),
            ElementKind::Unsigned => {
                let v = payload::read_unsigned(src, size)?;
                tree.node_mut(node).payload = Payload::Unsigned(v);
                Ok(())
            }
            ElementKind::Signed => {
                let v = payload::read_signed(src, size)?;
                tree.node_mut(node).payload = Payload::Signed(v);
                Ok(())
            }
            ElementKind::Float => {
                let v = payload::read_float(src, size)?;
                tree.node_mut(node).payload = Payload::Float(v);
                Ok(())
            }
            ElementKind::String => {
                let v = payload::read_string(src, size)?;
                tree.node_mut(node).payload = Payload::String(v);
                Ok(())
            }
            ElementKind::Utf8 => {
                let v = payload::read_utf8(src, size)?;
                tree.node_mut(node).payload = Payload::Utf8(v);
                Ok(())
            }
            ElementKind::Binary => {
                let v = payload::read_binary(src, size)?;
                tree.node_mut(node).payload = Payload::Binary(v);
                Ok(())
            }
            ElementKind::Date => {
                let v = payload::read_matroska_date(src, size)?;
                tree.node_mut(node).payload = Payload::Date(v);
                Ok(())
            }
            ElementKind::Uuid => {
                let v = payload::read_uuid(src, size)?;
                tree.node_mut(node).payload = Payload::Uuid(v);
                Ok(())
            }
            ElementKind::TrackType => read_track_type(src, tree, node),
        },
    }
}

/// `SeekPosition` is a byte offset relative to the start of the enclosing
/// `SeekHead`; the interned value is rebased to an absolute file offset.
fn read_seek_position<R: Read + Seek>(
    src: &mut Source<R>,
    tree: &mut Tree<EbmlId>,
    node: NodeId,
) -> Result<()> {
    let seek = tree.node(node).parent;
    let seek_head = tree.node(seek).parent;
    if tree.node(seek).id != schema::SEEK || tree.node(seek_head).id != schema::SEEK_HEAD {
        return Err(Error::MatroskaBrokenSeekPosition);
    }
    let relative = payload::read_unsigned(src, tree.node(node).payload_size)?;
    let base = tree.node(seek_head).offset;
    tree.node_mut(node).payload = Payload::Unsigned(base + relative);
    Ok(())
}

fn read_track_type<R: Read + Seek>(
    src: &mut Source<R>,
    tree: &mut Tree<EbmlId>,
    node: NodeId,
) -> Result<()> {
    let size = tree.node(node).payload_size;
    if size != 1 {
        return Err(Error::MatroskaTrackTypeInvalidLength(size));
    }
    let raw = payload::read_unsigned(src, 1)?;
    tree.node_mut(node).payload = match TrackType::from_raw(raw) {
        Some(t) => Payload::TrackType(t),
        None => {
            warn!("track type {raw} is not a known class");
            Payload::Unsigned(raw)
        }
    };
    Ok(())
}

fn skip_payload<R: Read + Seek>(
    src: &mut Source<R>,
    tree: &Tree<EbmlId>,
    node: NodeId,
) -> Result<()> {
    src.set_position(tree.node(node).end + 1)
}
