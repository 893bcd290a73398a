//! EBML envelope engine, RFC 8794: the fixed `EBML` header master and the
//! doctype-keyed body dispatch.
//!
//! A stream may carry several concatenated EBML documents; meeting another
//! `EBML` ID at the top level re-enters header parsing and appends a new
//! [`Document`].

pub(crate) mod crc;

use log::{debug, warn};
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::matroska;
use crate::payload::{self, Payload};
use crate::reader::Source;
use crate::tree::{Node, NodeId, Tree};
use crate::vint::{self, EbmlId};
use crate::ParseOptions;

pub(crate) const EBML: EbmlId = EbmlId(0x1A45_DFA3);
const EBML_VERSION: EbmlId = EbmlId(0x4286);
const EBML_READ_VERSION: EbmlId = EbmlId(0x42F7);
const EBML_MAX_ID_LENGTH: EbmlId = EbmlId(0x42F2);
const EBML_MAX_SIZE_LENGTH: EbmlId = EbmlId(0x42F3);
const DOC_TYPE: EbmlId = EbmlId(0x4282);
const DOC_TYPE_VERSION: EbmlId = EbmlId(0x4287);
const DOC_TYPE_READ_VERSION: EbmlId = EbmlId(0x4285);
const DOC_TYPE_EXTENSION: EbmlId = EbmlId(0x4281);
const DOC_TYPE_EXTENSION_NAME: EbmlId = EbmlId(0x4283);
const DOC_TYPE_EXTENSION_VERSION: EbmlId = EbmlId(0x4284);
pub(crate) const CRC32: EbmlId = EbmlId(0xBF);
pub(crate) const VOID: EbmlId = EbmlId(0xEC);

/// Tag carried by the synthetic root of an EBML tree.
const ROOT: EbmlId = EbmlId(0);

/// One EBML document: its header and body nodes plus the header-derived
/// fields, seeded with the RFC 8794 defaults.
#[derive(Debug)]
pub struct Document {
    /// The `EBML` header node.
    pub header: NodeId,
    /// The body root (`Segment` for Matroska), if the document has a body.
    pub body: Option<NodeId>,
    pub version: u64,
    pub read_version: u64,
    pub max_id_length: u64,
    pub max_size_length: u64,
    pub doctype: String,
    pub doctype_version: u64,
    pub doctype_read_version: u64,
}

impl Document {
    fn new(header: NodeId) -> Self {
        Self {
            header,
            body: None,
            version: 1,
            read_version: 1,
            max_id_length: 4,
            max_size_length: 8,
            doctype: String::new(),
            doctype_version: 1,
            doctype_read_version: 1,
        }
    }
}

/// How a body walk ended.
pub(crate) enum BodyOutcome {
    /// End of stream.
    Eof,
    /// Another top-level element begins; the caller re-enters header parsing.
    NextDocument,
    /// The cursor sits one past a completed cluster and the caller asked to
    /// stop there. Parsing resumes from the carried node.
    ClusterBoundary(NodeId),
}

/// A decoded element header, before the node is linked into the tree.
pub(crate) struct ElementHeader {
    pub id: EbmlId,
    pub offset: u64,
    pub size: u64,
    pub payload_offset: u64,
    /// Encoded width of the length VINT, checked against `EBMLMaxSizeLength`.
    pub size_width: u8,
}

/// Read one `[id][length]` element header at the cursor.
pub(crate) fn read_element_header<R: Read + Seek>(
    src: &mut Source<R>,
) -> Result<ElementHeader> {
    let offset = src.position()?;
    let id = vint::read_id(src)?;
    let length = vint::read_size(src)?;
    let header_len = u64::from(id.width()) + u64::from(length.width);
    Ok(ElementHeader {
        id,
        offset,
        size: header_len + length.value,
        payload_offset: offset + header_len,
        size_width: length.width,
    })
}

/// A parsed EBML file: the element tree plus one [`Document`] per
/// concatenated EBML stream found in the file.
#[derive(Debug)]
pub struct EbmlFile<R> {
    src: Source<R>,
    /// The element tree; root is synthetic and spans the whole file.
    pub tree: Tree<EbmlId>,
    /// Documents in stream order.
    pub documents: Vec<Document>,
    /// Mid-body continuation point after a cluster-boundary return.
    resume: Option<(usize, NodeId)>,
}

impl EbmlFile<std::fs::File> {
    /// Open a file from a path.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::from_source(Source::open(path)?))
    }
}

impl<R: Read + Seek> EbmlFile<R> {
    /// Adopt an already-opened reader.
    pub fn new(reader: R) -> Result<Self> {
        let src = Source::new(reader)?;
        if src.is_empty() {
            return Err(Error::FileEmpty);
        }
        Ok(Self::from_source(src))
    }

    fn from_source(src: Source<R>) -> Self {
        let tree = Tree::with_root(ROOT, src.len());
        Self {
            src,
            tree,
            documents: Vec::new(),
            resume: None,
        }
    }

    /// Walk the stream: header, then body, then any further concatenated
    /// documents. With [`ParseOptions::return_after_cluster`] set this
    /// returns at each cluster boundary; calling `parse` again continues.
    pub fn parse(&mut self, options: &ParseOptions) -> Result<()> {
        if let Some((idx, prev)) = self.resume.take() {
            match self.run_matroska_body(idx, Some(prev), options)? {
                BodyOutcome::ClusterBoundary(prev) => {
                    self.resume = Some((idx, prev));
                    return Ok(());
                }
                BodyOutcome::Eof => return Ok(()),
                BodyOutcome::NextDocument => {}
            }
        } else {
            self.src.set_position(0)?;
        }

        loop {
            if self.src.position()? >= self.src.len() {
                break;
            }
            let doc = self.parse_header()?;
            self.documents.push(doc);
            let idx = self.documents.len() - 1;

            let matroska_doc = matches!(
                self.documents[idx].doctype.as_str(),
                "matroska" | "webm"
            );
            let outcome = if matroska_doc {
                self.run_matroska_body(idx, None, options)?
            } else {
                self.run_generic_body(idx)?
            };
            match outcome {
                BodyOutcome::Eof => break,
                BodyOutcome::NextDocument => continue,
                BodyOutcome::ClusterBoundary(prev) => {
                    self.resume = Some((idx, prev));
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    fn run_matroska_body(
        &mut self,
        idx: usize,
        resume: Option<NodeId>,
        options: &ParseOptions,
    ) -> Result<BodyOutcome> {
        matroska::parse_body(
            &mut self.src,
            &mut self.tree,
            &mut self.documents[idx],
            options,
            resume,
        )
    }

    /// Read the fixed `EBML` master and intern its fields into a new
    /// [`Document`].
    fn parse_header(&mut self) -> Result<Document> {
        let offset = self.src.position()?;
        let id = vint::read_id(&mut self.src).map_err(|e| match e {
            Error::Io(_) => e,
            _ => Error::EbmlHeaderMissingOrCorrupt,
        })?;
        if id != EBML {
            return Err(Error::EbmlHeaderMissingOrCorrupt);
        }
        let length = vint::read_size(&mut self.src)?;
        let header_len = u64::from(id.width()) + u64::from(length.width);
        let total = header_len + length.value;
        if total > self.src.len() - offset {
            return Err(Error::FileEndedEarly);
        }

        let root = self.tree.root();
        let header = self
            .tree
            .append_child(root, Node::new(id, offset, total, offset + header_len));
        let header_end = self.tree.node(header).end;
        let mut doc = Document::new(header);

        let mut prev = header;
        loop {
            let pos = self.src.position()?;
            if pos > header_end {
                break;
            }
            let eh = read_element_header(&mut self.src)?;
            let parent = self.tree.enclosing(prev, eh.offset);
            let node = self.tree.append_child(
                parent,
                Node::new(eh.id, eh.offset, eh.size, eh.payload_offset),
            );
            if self.tree.node(node).end > header_end {
                return Err(Error::EbmlHeaderMissingOrCorrupt);
            }
            self.header_field(node, &mut doc)?;
            prev = node;
        }

        if doc.doctype.is_empty() {
            return Err(Error::DocTypeEmpty);
        }
        if doc.doctype_read_version > doc.doctype_version {
            return Err(Error::DocTypeReadVersionInvalid);
        }
        debug!(
            "EBML header: doctype '{}' v{} (read v{})",
            doc.doctype, doc.doctype_version, doc.doctype_read_version
        );
        Ok(doc)
    }

    /// Apply one header child to the document, enforcing field lengths and
    /// value bounds.
    fn header_field(&mut self, node: NodeId, doc: &mut Document) -> Result<()> {
        let id = self.tree.node(node).id;
        let size = self.tree.node(node).payload_size;

        let expect_len = |want: u64| {
            if size == want {
                Ok(())
            } else {
                Err(Error::EbmlHeaderUnexpectedFieldLength { id, length: size })
            }
        };

        match id {
            EBML => Err(Error::EbmlHeaderDuplicated),
            EBML_VERSION => {
                expect_len(1)?;
                let v = payload::read_unsigned(&mut self.src, size)?;
                self.tree.node_mut(node).payload = Payload::Unsigned(v);
                doc.version = v;
                if v != 1 {
                    return Err(Error::UnsupportedEbmlVersion(v));
                }
                Ok(())
            }
            EBML_READ_VERSION => {
                expect_len(1)?;
                let v = payload::read_unsigned(&mut self.src, size)?;
                self.tree.node_mut(node).payload = Payload::Unsigned(v);
                doc.read_version = v;
                if v > 1 {
                    return Err(Error::UnsupportedEbmlVersion(v));
                }
                Ok(())
            }
            EBML_MAX_ID_LENGTH => {
                expect_len(1)?;
                let v = payload::read_unsigned(&mut self.src, size)?;
                if !(4..=8).contains(&v) {
                    return Err(Error::MaxIdLengthInvalid(v));
                }
                self.tree.node_mut(node).payload = Payload::Unsigned(v);
                doc.max_id_length = v;
                Ok(())
            }
            EBML_MAX_SIZE_LENGTH => {
                expect_len(1)?;
                let v = payload::read_unsigned(&mut self.src, size)?;
                if !(1..=8).contains(&v) {
                    return Err(Error::MaxSizeInvalid(v));
                }
                self.tree.node_mut(node).payload = Payload::Unsigned(v);
                doc.max_size_length = v;
                Ok(())
            }
            DOC_TYPE => {
                if size == 0 {
                    return Err(Error::DocTypeEmpty);
                }
                if size > 1024 {
                    return Err(Error::DocTypeTooLong(size));
                }
                let s = payload::read_string(&mut self.src, size)?;
                if s.is_empty() {
                    return Err(Error::DocTypeEmpty);
                }
                doc.doctype = s.clone();
                self.tree.node_mut(node).payload = Payload::String(s);
                Ok(())
            }
            DOC_TYPE_VERSION => {
                expect_len(1)?;
                let v = payload::read_unsigned(&mut self.src, size)?;
                if v < 1 {
                    return Err(Error::DocTypeVersionInvalid);
                }
                self.tree.node_mut(node).payload = Payload::Unsigned(v);
                doc.doctype_version = v;
                Ok(())
            }
            DOC_TYPE_READ_VERSION => {
                expect_len(1)?;
                let v = payload::read_unsigned(&mut self.src, size)?;
                if v < 1 {
                    return Err(Error::DocTypeReadVersionInvalid);
                }
                self.tree.node_mut(node).payload = Payload::Unsigned(v);
                doc.doctype_read_version = v;
                Ok(())
            }
            // Master: descend, children resolve by range.
            DOC_TYPE_EXTENSION => Ok(()),
            DOC_TYPE_EXTENSION_NAME => {
                let s = payload::read_string(&mut self.src, size)?;
                self.tree.node_mut(node).payload = Payload::String(s);
                Ok(())
            }
            DOC_TYPE_EXTENSION_VERSION => {
                let v = payload::read_unsigned(&mut self.src, size)?;
                self.tree.node_mut(node).payload = Payload::Unsigned(v);
                Ok(())
            }
            CRC32 => {
                let declared = crc::read_and_verify(&mut self.src, &self.tree, node)?;
                self.tree.node_mut(node).payload = Payload::Unsigned(u64::from(declared));
                Ok(())
            }
            VOID => {
                debug!("skipping Void ({size}B) in EBML header");
                self.skip_payload(node)
            }
            other => {
                warn!("unknown element {other} ({size}B) in EBML header");
                self.skip_payload(node)
            }
        }
    }

    /// Body walk for doctypes this crate has no schema for: top-level
    /// elements become offset-only nodes, nothing is interned but CRC-32.
    fn run_generic_body(&mut self, idx: usize) -> Result<BodyOutcome> {
        loop {
            let pos = self.src.position()?;
            if pos >= self.src.len() {
                return Ok(BodyOutcome::Eof);
            }
            let eh = match read_element_header(&mut self.src) {
                Ok(eh) => eh,
                // A truncated top-level read ends the walk normally.
                Err(Error::FileEndedEarly) => return Ok(BodyOutcome::Eof),
                Err(e) => return Err(e),
            };
            if eh.id == EBML {
                self.src.set_position(pos)?;
                return Ok(BodyOutcome::NextDocument);
            }
            if eh.size > self.src.len() - eh.offset {
                return Err(Error::FileEndedEarly);
            }

            let root = self.tree.root();
            let node = self.tree.append_child(
                root,
                Node::new(eh.id, eh.offset, eh.size, eh.payload_offset),
            );
            if self.documents[idx].body.is_none() {
                self.documents[idx].body = Some(node);
            }
            if eh.id == CRC32 {
                let declared = crc::read_and_verify(&mut self.src, &self.tree, node)?;
                self.tree.node_mut(node).payload = Payload::Unsigned(u64::from(declared));
            } else {
                self.skip_payload(node)?;
            }
        }
    }

    /// Advance the cursor one past the node's end without reading.
    fn skip_payload(&mut self, node: NodeId) -> Result<()> {
        self.src.set_position(self.tree.node(node).end + 1)
    }
}
