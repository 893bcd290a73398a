#![doc = include_str!("../README.md")]

/// Error types for this crate.
mod error;
pub use error::*;

mod payload;
/// Random-access reading primitives.
pub mod reader;
mod tree;
mod vint;

/// ISO Base Media File Format (MP4/M4A/HEIF) engine.
pub mod bmff;
/// EBML envelope engine and document model.
pub mod ebml;
/// Matroska/WebM schema and body engine.
pub mod matroska;

pub use payload::*;
pub use tree::{Children, Iter, Node, NodeId, Tree, TypeTag};
pub use vint::{EbmlId, VInt};

/// Flags steering a parse run.
///
/// BMFF consults only `parse_metadata`; the cluster flags apply to Matroska
/// bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Descend into Apple iTunes metadata under `moov.udta.meta.ilst`.
    pub parse_metadata: bool,
    /// Record clusters as opaque extents without walking their contents.
    pub skip_clusters: bool,
    /// Return from `parse` whenever the cursor passes the end of a completed
    /// cluster; calling `parse` again continues from there.
    pub return_after_cluster: bool,
}

/// A prelude for common types.
pub mod prelude {
    pub use crate::bmff::{BmffFile, FourCC};
    pub use crate::ebml::{Document, EbmlFile};
    pub use crate::error::{Error, Result};
    pub use crate::payload::*;
    pub use crate::tree::{Node, NodeId, Tree, TypeTag};
    pub use crate::vint::{EbmlId, VInt};
    pub use crate::ParseOptions;
}
