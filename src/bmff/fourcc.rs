use std::fmt::{Debug, Display};

use crate::tree::TypeTag;

/// A four-byte box type tag, ISO 14496-12 § 4.2.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Tag of the synthetic file-spanning root node.
    pub const ROOT: FourCC = FourCC([0; 4]);

    pub const FTYP: FourCC = FourCC(*b"ftyp");
    pub const MOOV: FourCC = FourCC(*b"moov");
    pub const TRAK: FourCC = FourCC(*b"trak");
    pub const EDTS: FourCC = FourCC(*b"edts");
    pub const MDIA: FourCC = FourCC(*b"mdia");
    pub const MINF: FourCC = FourCC(*b"minf");
    pub const UDTA: FourCC = FourCC(*b"udta");
    pub const MOOF: FourCC = FourCC(*b"moof");
    pub const TRAF: FourCC = FourCC(*b"traf");
    pub const MECO: FourCC = FourCC(*b"meco");
    pub const MVHD: FourCC = FourCC(*b"mvhd");
    pub const TKHD: FourCC = FourCC(*b"tkhd");
    pub const MDHD: FourCC = FourCC(*b"mdhd");
    pub const ELST: FourCC = FourCC(*b"elst");
    pub const HDLR: FourCC = FourCC(*b"hdlr");
    pub const META: FourCC = FourCC(*b"meta");
    pub const ILST: FourCC = FourCC(*b"ilst");
    pub const CHPL: FourCC = FourCC(*b"chpl");
    pub const MDAT: FourCC = FourCC(*b"mdat");
    pub const FREE: FourCC = FourCC(*b"free");
    pub const UUID: FourCC = FourCC(*b"uuid");

    // iTunes metadata atoms under `moov.udta.meta.ilst`.
    pub const DATA: FourCC = FourCC(*b"data");
    pub const MEAN: FourCC = FourCC(*b"mean");
    pub const NAME: FourCC = FourCC(*b"name");
    pub const EXTENDED: FourCC = FourCC(*b"----");
    pub const TRKN: FourCC = FourCC(*b"trkn");
    pub const DISK: FourCC = FourCC(*b"disk");
    pub const COVR: FourCC = FourCC(*b"covr");

    pub fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl From<u32> for FourCC {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &byte in &self.0 {
            match byte {
                0x20..=0x7E => write!(f, "{}", byte as char)?,
                // The iTunes copyright-prefixed tags show up constantly.
                0xA9 => write!(f, "©")?,
                _ => write!(f, ".")?,
            }
        }
        Ok(())
    }
}

impl Debug for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FourCC({self})")
    }
}

impl TypeTag for FourCC {
    fn matches_name(&self, name: &str) -> bool {
        name.as_bytes() == self.0 || name == self.to_string()
    }
}
