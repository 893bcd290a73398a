//! ISO Base Media File Format engine, ISO/IEC 14496-12.
//!
//! Boxes are discovered in file order; the parent of each new box is found
//! by walking ancestor links from the previously parsed node, which handles
//! containers closing at any depth without an explicit stack.

mod fourcc;
mod itunes;

pub use fourcc::FourCC;

use log::{debug, warn};
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::payload::{
    Edit, FileType, Fixed8_8, Fixed16_16, Handler, Language, MediaHeader, MovieHeader, Payload,
    TrackHeader, Uuid, rebase_mp4_date,
};
use crate::reader::Source;
use crate::tree::{Node, NodeId, Tree};
use crate::ParseOptions;

/// A decoded box header, before the node is linked into the tree.
#[derive(Debug, Clone, Copy)]
struct BoxHeader {
    id: FourCC,
    offset: u64,
    size: u64,
    payload_offset: u64,
    uuid: Option<Uuid>,
}

/// A parsed BMFF file: the box tree plus the handful of file-level
/// references captured during dispatch.
#[derive(Debug)]
pub struct BmffFile<R> {
    src: Source<R>,
    /// The box tree; root is synthetic and spans the whole file.
    pub tree: Tree<FourCC>,
    /// The `ftyp` box, possibly synthesized.
    pub ftyp: Option<NodeId>,
    pub moov: Option<NodeId>,
    pub mvhd: Option<NodeId>,
    pub mdat: Option<NodeId>,
    /// The `ilst` box, when metadata parsing was requested and found one.
    pub itunes_metadata: Option<NodeId>,
    /// Movie time scale out of `mvhd`, units per second.
    pub time_scale: u32,
}

impl BmffFile<std::fs::File> {
    /// Open a file from a path.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::from_source(Source::open(path)?))
    }
}

impl<R: Read + Seek> BmffFile<R> {
    /// Adopt an already-opened reader.
    pub fn new(reader: R) -> Result<Self> {
        let src = Source::new(reader)?;
        if src.is_empty() {
            return Err(Error::FileEmpty);
        }
        Ok(Self::from_source(src))
    }

    fn from_source(src: Source<R>) -> Self {
        let tree = Tree::with_root(FourCC::ROOT, src.len());
        Self {
            src,
            tree,
            ftyp: None,
            moov: None,
            mvhd: None,
            mdat: None,
            itunes_metadata: None,
            time_scale: 0,
        }
    }

    /// Walk the whole file into the box tree.
    pub fn parse(&mut self, options: &ParseOptions) -> Result<()> {
        let file_end = self.src.len();
        self.src.set_position(0)?;

        // A file without a leading ftyp gets a default one, ISO 14496-12
        // § 4.3: major brand mp41, minor version 0. The synthesized node has
        // size zero so it never claims file bytes.
        let first = self.peek_box_type()?;
        if first != FourCC::FTYP {
            let mut node = Node::new(FourCC::FTYP, 0, 0, 0);
            node.payload = Payload::FileType(FileType {
                major_brand: FourCC(*b"mp41"),
                minor_version: 0,
                compatible_brands: vec![FourCC(*b"mp41")],
            });
            let root = self.tree.root();
            self.ftyp = Some(self.tree.append_child(root, node));
            debug!("no leading ftyp, synthesized mp41 default");
        }

        let mut prev = self.tree.root();
        loop {
            let offset = self.src.position()?;
            if offset >= file_end {
                break;
            }
            let header = self.read_box_header(file_end)?;
            if header.size > file_end - header.offset {
                return Err(Error::FileEndedEarly);
            }

            let parent = self.tree.enclosing(prev, header.offset);
            let mut node = Node::new(header.id, header.offset, header.size, header.payload_offset);
            node.uuid = header.uuid;
            let node_id = self.tree.append_child(parent, node);

            self.dispatch(node_id, options)?;
            prev = node_id;
        }
        Ok(())
    }

    fn peek_box_type(&mut self) -> Result<FourCC> {
        let pos = self.src.position()?;
        self.src.set_position(pos + 4)?;
        let id = FourCC::from_u32(self.src.peek_be_u32()?);
        self.src.set_position(pos)?;
        Ok(id)
    }

    /// Decode one box header at the cursor: `u32` size, FourCC, then the
    /// optional 64-bit extended size (size == 1) and 16-byte extended type
    /// (`uuid` boxes). A size of zero runs to end of file.
    fn read_box_header(&mut self, file_end: u64) -> Result<BoxHeader> {
        let offset = self.src.position()?;
        let size32 = self.src.read_be_u32()?;
        let id = FourCC::from_u32(self.src.read_be_u32()?);

        let mut header_len = 8u64;
        let size = match size32 {
            0 => file_end - offset,
            1 => {
                header_len = 16;
                self.src.read_be_u64()?
            }
            s => u64::from(s),
        };

        let uuid = if id == FourCC::UUID {
            header_len += 16;
            let bytes = self.src.read_slice(16)?;
            Some(Uuid::from_bytes(bytes.try_into().unwrap()))
        } else {
            None
        };

        if size < header_len {
            return Err(Error::WrongFileFormat);
        }
        Ok(BoxHeader {
            id,
            offset,
            size,
            payload_offset: offset + header_len,
            uuid,
        })
    }

    fn dispatch(&mut self, node: NodeId, options: &ParseOptions) -> Result<()> {
        let id = self.tree.node(node).id;
        match &id.0 {
            b"ftyp" => self.read_ftyp(node),
            b"moov" => {
                self.moov = Some(node);
                Ok(())
            }
            b"udta" => {
                let parent_id = self.tree.node(self.tree.node(node).parent).id;
                if ![FourCC::MOOV, FourCC::MOOF, FourCC::TRAK, FourCC::TRAF].contains(&parent_id) {
                    return Err(Error::WrongFileFormat);
                }
                Ok(())
            }
            b"trak" | b"edts" | b"mdia" | b"minf" | b"moof" | b"traf" | b"meco" => Ok(()),
            b"mvhd" => self.read_mvhd(node),
            b"tkhd" => self.read_tkhd(node),
            b"mdhd" => self.read_mdhd(node),
            b"elst" => self.read_elst(node),
            b"hdlr" => self.read_hdlr(node),
            b"meta" => {
                // Versioned container: a version/flags word precedes the
                // child boxes.
                self.src.read_be_u32()?;
                Ok(())
            }
            b"ilst" => {
                if options.parse_metadata {
                    itunes::parse_ilst(&mut self.src, &mut self.tree, node)?;
                    self.itunes_metadata = Some(node);
                    Ok(())
                } else {
                    self.skip_payload(node)
                }
            }
            b"chpl" => self.read_chpl(node),
            b"mdat" => {
                self.mdat = Some(node);
                self.skip_payload(node)
            }
            b"free" => self.skip_payload(node),
            _ => {
                debug!(
                    "skipping '{}' [{}, {}]",
                    id,
                    self.tree.node(node).offset,
                    self.tree.node(node).end
                );
                self.skip_payload(node)
            }
        }
    }

    /// Advance the cursor one past the node's end without reading.
    fn skip_payload(&mut self, node: NodeId) -> Result<()> {
        self.src.set_position(self.tree.node(node).end + 1)
    }

    fn read_ftyp(&mut self, node: NodeId) -> Result<()> {
        if self.ftyp.is_some() {
            return Err(Error::FtypDuplicated);
        }
        let first_child = self.tree.node(self.tree.root()).first_child;
        if self.tree.node(node).parent != self.tree.root() || first_child != Some(node) {
            return Err(Error::FtypDuplicated);
        }

        let payload_size = self.tree.node(node).payload_size;
        if payload_size < 8 || payload_size % 4 != 0 {
            return Err(Error::FtypInvalidSize);
        }
        let major_brand = FourCC::from_u32(self.src.read_be_u32()?);
        let minor_version = self.src.read_be_u32()?;
        let brand_count = (payload_size - 8) / 4;
        let mut compatible_brands = Vec::with_capacity(brand_count as usize);
        for _ in 0..brand_count {
            compatible_brands.push(FourCC::from_u32(self.src.read_be_u32()?));
        }
        self.tree.node_mut(node).payload = Payload::FileType(FileType {
            major_brand,
            minor_version,
            compatible_brands,
        });
        self.ftyp = Some(node);
        Ok(())
    }

    fn read_mvhd(&mut self, node: NodeId) -> Result<()> {
        let payload_size = self.tree.node(node).payload_size;
        let version = self.src.read_u8()?;
        let _flags = self.src.read_be_u24()?;

        let (creation, modification, time_scale, duration) = match version {
            0 => {
                if payload_size != 100 {
                    return Err(Error::MvhdInvalidSize);
                }
                let c = u64::from(self.src.read_be_u32()?);
                let m = u64::from(self.src.read_be_u32()?);
                let ts = self.src.read_be_u32()?;
                let d = u64::from(self.src.read_be_u32()?);
                (c, m, ts, d)
            }
            1 => {
                if payload_size != 112 {
                    return Err(Error::MvhdInvalidSize);
                }
                let c = self.src.read_be_u64()?;
                let m = self.src.read_be_u64()?;
                let ts = self.src.read_be_u32()?;
                let d = self.src.read_be_u64()?;
                (c, m, ts, d)
            }
            v => return Err(Error::MvhdUnknownVersion(v)),
        };

        let rate = Fixed16_16(self.src.read_be_u32()?);
        let volume = Fixed8_8(self.src.read_be_u16()?);
        // reserved u16 + u32[2], matrix u32[9], pre_defined u32[6].
        let pos = self.src.position()?;
        self.src.set_position(pos + 2 + 8 + 36 + 24)?;
        let next_track_id = self.src.read_be_u32()?;

        self.tree.node_mut(node).payload = Payload::MovieHeader(MovieHeader {
            version,
            creation_time: rebase_mp4_date(creation),
            modification_time: rebase_mp4_date(modification),
            time_scale,
            duration,
            rate,
            volume,
            next_track_id,
        });
        self.time_scale = time_scale;
        self.mvhd = Some(node);
        Ok(())
    }

    fn read_tkhd(&mut self, node: NodeId) -> Result<()> {
        let payload_size = self.tree.node(node).payload_size;
        let version = self.src.read_u8()?;
        let _flags = self.src.read_be_u24()?;

        let (creation, modification, track_id, duration) = match version {
            0 => {
                if payload_size != 84 {
                    return Err(Error::TkhdInvalidSize);
                }
                let c = u64::from(self.src.read_be_u32()?);
                let m = u64::from(self.src.read_be_u32()?);
                let id = self.src.read_be_u32()?;
                self.src.read_be_u32()?; // reserved
                let d = u64::from(self.src.read_be_u32()?);
                (c, m, id, d)
            }
            1 => {
                if payload_size != 96 {
                    return Err(Error::TkhdInvalidSize);
                }
                let c = self.src.read_be_u64()?;
                let m = self.src.read_be_u64()?;
                let id = self.src.read_be_u32()?;
                self.src.read_be_u32()?; // reserved
                let d = self.src.read_be_u64()?;
                (c, m, id, d)
            }
            v => return Err(Error::TkhdUnknownVersion(v)),
        };

        self.src.read_be_u64()?; // reserved
        let layer = self.src.read_be_i16()?;
        let alternate_group = self.src.read_be_i16()?;
        let volume = Fixed8_8(self.src.read_be_u16()?);
        self.src.read_be_u16()?; // reserved
        let pos = self.src.position()?;
        self.src.set_position(pos + 36)?; // matrix
        let width = Fixed16_16(self.src.read_be_u32()?);
        let height = Fixed16_16(self.src.read_be_u32()?);

        self.tree.node_mut(node).payload = Payload::TrackHeader(TrackHeader {
            version,
            creation_time: rebase_mp4_date(creation),
            modification_time: rebase_mp4_date(modification),
            track_id,
            duration,
            layer,
            alternate_group,
            volume,
            width,
            height,
        });
        Ok(())
    }

    fn read_mdhd(&mut self, node: NodeId) -> Result<()> {
        let payload_size = self.tree.node(node).payload_size;
        let version = self.src.read_u8()?;
        let _flags = self.src.read_be_u24()?;

        let (creation, modification, time_scale, duration) = match version {
            0 => {
                if payload_size != 24 {
                    return Err(Error::MdhdInvalidSize);
                }
                let c = u64::from(self.src.read_be_u32()?);
                let m = u64::from(self.src.read_be_u32()?);
                let ts = self.src.read_be_u32()?;
                let d = u64::from(self.src.read_be_u32()?);
                (c, m, ts, d)
            }
            1 => {
                if payload_size != 36 {
                    return Err(Error::MdhdInvalidSize);
                }
                let c = self.src.read_be_u64()?;
                let m = self.src.read_be_u64()?;
                let ts = self.src.read_be_u32()?;
                let d = self.src.read_be_u64()?;
                (c, m, ts, d)
            }
            v => return Err(Error::MdhdUnknownVersion(v)),
        };

        // 15-bit packed ISO-639-2 code behind one pad bit.
        let language = Language::from_packed(self.src.read_be_u16()? & 0x7FFF);
        self.src.read_be_u16()?; // pre_defined

        self.tree.node_mut(node).payload = Payload::MediaHeader(MediaHeader {
            version,
            creation_time: rebase_mp4_date(creation),
            modification_time: rebase_mp4_date(modification),
            time_scale,
            duration,
            language,
        });
        Ok(())
    }

    fn read_elst(&mut self, node: NodeId) -> Result<()> {
        let payload_size = self.tree.node(node).payload_size;
        let version = self.src.read_u8()?;
        let _flags = self.src.read_be_u24()?;
        let entry_count = u64::from(self.src.read_be_u32()?);

        let entry_size = match version {
            0 => 12,
            1 => 20,
            v => return Err(Error::ElstUnknownVersion(v)),
        };
        if payload_size != 8 + entry_count * entry_size {
            return Err(Error::ElstInvalidSize);
        }

        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            let (segment_duration, media_time) = if version == 0 {
                (
                    u64::from(self.src.read_be_u32()?),
                    i64::from(self.src.read_be_i32()?),
                )
            } else {
                (self.src.read_be_u64()?, self.src.read_be_i64()?)
            };
            entries.push(Edit {
                segment_duration,
                media_time,
                media_rate_integer: self.src.read_be_i16()?,
                media_rate_fraction: self.src.read_be_i16()?,
            });
        }
        self.tree.node_mut(node).payload = Payload::EditList(entries);
        Ok(())
    }

    fn read_hdlr(&mut self, node: NodeId) -> Result<()> {
        let parent_id = self.tree.node(self.tree.node(node).parent).id;
        if parent_id != FourCC::MDIA && parent_id != FourCC::META {
            return Err(Error::HdlrUnexpectedParent);
        }

        let payload_size = self.tree.node(node).payload_size;
        if payload_size < 24 {
            return Err(Error::HdlrInvalidSize);
        }
        self.src.read_be_u32()?; // version/flags
        self.src.read_be_u32()?; // pre_defined
        let handler_type = FourCC::from_u32(self.src.read_be_u32()?);
        let pos = self.src.position()?;
        self.src.set_position(pos + 12)?; // reserved
        let name = crate::payload::string_from_bytes(&self.src.read_slice(payload_size - 24)?)?;

        self.tree.node_mut(node).payload = Payload::Handler(Handler { handler_type, name });
        Ok(())
    }

    fn read_chpl(&mut self, node: NodeId) -> Result<()> {
        let end = self.tree.node(node).end;
        let version = self.src.read_u8()?;
        let _flags = self.src.read_be_u24()?;

        let entry_count = match version {
            0 => u64::from(self.src.read_u8()?),
            1 => {
                self.src.read_u8()?; // reserved
                u64::from(self.src.read_be_u32()?)
            }
            v => return Err(Error::ChplUnknownVersion(v)),
        };

        let mut entries = Vec::with_capacity(entry_count.min(1024) as usize);
        for _ in 0..entry_count {
            let timestamp = self.src.read_be_i64()?;
            let title_size = self.src.read_u8()?;
            let title =
                crate::payload::utf8_from_bytes(&self.src.read_slice(u64::from(title_size))?);
            entries.push(crate::payload::ChapterEntry { timestamp, title });
        }

        // The entry list must land exactly on the declared box end.
        if self.src.position()? != end + 1 {
            warn!("chpl entries did not end at the box boundary");
            return Err(Error::ChplInvalidSize);
        }
        self.tree.node_mut(node).payload = Payload::ChapterList(entries);
        Ok(())
    }
}
