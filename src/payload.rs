//! Decoded payload values and the length-scoped decoders that produce them.

use std::fmt::Display;
use std::io::{Read, Seek};

use crate::bmff::FourCC;
use crate::error::{Error, Result};
use crate::reader::Source;

/// Nanoseconds between 2001-01-01T00:00:00 UTC (the Matroska epoch) and the
/// Unix epoch.
const MKV_EPOCH_ADJUST_NS: i64 = 978_307_200 * 1_000_000_000;

/// Seconds between 1904-01-01T00:00:00 UTC (the classic QuickTime epoch) and
/// the Unix epoch: 24107 days, 17 of them leap days.
const MP4_EPOCH_ADJUST_S: i64 = -24_107 * 86_400;

/// 8.8 unsigned fixed-point, e.g. audio volume.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fixed8_8(pub u16);

/// 16.16 unsigned fixed-point, e.g. playback rate and pixel dimensions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fixed16_16(pub u32);

/// 2.30 unsigned fixed-point, used in transformation matrices.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fixed2_30(pub u32);

impl Fixed8_8 {
    pub fn to_f32(self) -> f32 {
        f32::from(self.0) / 256.0
    }
}

impl Fixed16_16 {
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / 65_536.0
    }
}

impl Fixed2_30 {
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / f64::from(1u32 << 30)
    }
}

/// An RFC 4122 UUID, unpacked into its five fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Uuid {
    pub time_low: u32,
    pub time_mid: u16,
    pub time_hi_and_version: u16,
    pub clock_seq: u16,
    pub node: [u8; 6],
}

impl Uuid {
    /// Unpack from the 16-byte wire form.
    pub fn from_bytes(b: [u8; 16]) -> Self {
        Self {
            time_low: u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
            time_mid: u16::from_be_bytes([b[4], b[5]]),
            time_hi_and_version: u16::from_be_bytes([b[6], b[7]]),
            clock_seq: u16::from_be_bytes([b[8], b[9]]),
            node: [b[10], b[11], b[12], b[13], b[14], b[15]],
        }
    }

    /// Repack into the 16-byte wire form.
    pub fn to_bytes(self) -> [u8; 16] {
        let mut b = [0u8; 16];
        b[0..4].copy_from_slice(&self.time_low.to_be_bytes());
        b[4..6].copy_from_slice(&self.time_mid.to_be_bytes());
        b[6..8].copy_from_slice(&self.time_hi_and_version.to_be_bytes());
        b[8..10].copy_from_slice(&self.clock_seq.to_be_bytes());
        b[10..16].copy_from_slice(&self.node);
        b
    }
}

impl Display for Uuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:04x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.time_low,
            self.time_mid,
            self.time_hi_and_version,
            self.clock_seq,
            self.node[0],
            self.node[1],
            self.node[2],
            self.node[3],
            self.node[4],
            self.node[5],
        )
    }
}

/// A packed ISO-639-2 language code, three lowercase letters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Language(pub [u8; 3]);

impl Language {
    /// Unpack from the 15-bit wire form: three 5-bit letters biased by 0x60.
    pub fn from_packed(code: u16) -> Self {
        let letter = |k: u16| 0x60 + ((code >> (5 * (2 - k))) & 0x1F) as u8;
        Self([letter(0), letter(1), letter(2)])
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matroska track class, from the one-byte `TrackType` element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackType {
    Video = 1,
    Audio = 2,
    Complex = 3,
    Logo = 16,
    Subtitle = 17,
    Buttons = 18,
    Control = 32,
    Metadata = 33,
}

impl TrackType {
    /// Map the wire value; unknown values yield `None` and are kept numeric.
    pub fn from_raw(value: u64) -> Option<Self> {
        Some(match value {
            1 => Self::Video,
            2 => Self::Audio,
            3 => Self::Complex,
            16 => Self::Logo,
            17 => Self::Subtitle,
            18 => Self::Buttons,
            32 => Self::Control,
            33 => Self::Metadata,
            _ => return None,
        })
    }
}

/// `ftyp` payload: brand identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileType {
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

/// `mvhd` payload, version-normalized to 64-bit times.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieHeader {
    pub version: u8,
    /// Unix-epoch nanoseconds.
    pub creation_time: i64,
    /// Unix-epoch nanoseconds.
    pub modification_time: i64,
    /// Time units per second for the whole presentation.
    pub time_scale: u32,
    pub duration: u64,
    pub rate: Fixed16_16,
    pub volume: Fixed8_8,
    pub next_track_id: u32,
}

/// `tkhd` payload, version-normalized to 64-bit times.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackHeader {
    pub version: u8,
    pub creation_time: i64,
    pub modification_time: i64,
    pub track_id: u32,
    pub duration: u64,
    pub layer: i16,
    pub alternate_group: i16,
    pub volume: Fixed8_8,
    pub width: Fixed16_16,
    pub height: Fixed16_16,
}

/// `mdhd` payload, version-normalized to 64-bit times.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaHeader {
    pub version: u8,
    pub creation_time: i64,
    pub modification_time: i64,
    pub time_scale: u32,
    pub duration: u64,
    pub language: Language,
}

/// One `elst` entry, version-normalized to 64-bit values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub segment_duration: u64,
    pub media_time: i64,
    pub media_rate_integer: i16,
    pub media_rate_fraction: i16,
}

/// `hdlr` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    pub handler_type: FourCC,
    pub name: String,
}

/// One `chpl` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterEntry {
    pub timestamp: i64,
    pub title: String,
}

/// Well-known iTunes `data` atom type codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItunesData {
    /// Type 0, or any unrecognized type code.
    Binary(Vec<u8>),
    /// Type 1.
    Text(String),
    /// Type 13.
    Jpeg(Vec<u8>),
    /// Type 14.
    Png(Vec<u8>),
    /// `trkn` packed pair.
    Track { current: u16, total: u16 },
    /// `disk` packed pair.
    Disk { current: u16, total: u16 },
}

/// An iTunes metadata value folded from a `data` atom into its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItunesValue {
    /// The `data` atom's type code.
    pub type_code: u32,
    /// The `data` atom's locale/subtype word.
    pub subtype: u32,
    pub data: ItunesData,
}

/// The decoded value attached to a node.
///
/// A closed sum over every value shape either container format interns.
/// Container and deliberately-skipped nodes carry [`Payload::None`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    /// Printable-ASCII string.
    String(String),
    Utf8(String),
    Binary(Vec<u8>),
    Uuid(Uuid),
    /// Unix-epoch nanoseconds.
    Date(i64),
    Language(Language),
    TrackType(TrackType),
    FileType(FileType),
    MovieHeader(MovieHeader),
    TrackHeader(TrackHeader),
    MediaHeader(MediaHeader),
    EditList(Vec<Edit>),
    Handler(Handler),
    ChapterList(Vec<ChapterEntry>),
    Itunes(ItunesValue),
}

impl Payload {
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Payload::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::String(s) | Payload::Utf8(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Payload::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Binary(b) => Some(b),
            _ => None,
        }
    }
}

/// Decode a big-endian unsigned integer of 0 to 8 bytes.
pub fn unsigned_from_bytes(buf: &[u8]) -> Result<u64> {
    if buf.len() > 8 {
        return Err(Error::UnsignedInvalidLength(buf.len() as u64));
    }
    let mut value = [0u8; 8];
    value[8 - buf.len()..].copy_from_slice(buf);
    Ok(u64::from_be_bytes(value))
}

/// Decode a big-endian two's-complement integer of 0 to 8 bytes,
/// sign-extending from the top bit of the first byte.
pub fn signed_from_bytes(buf: &[u8]) -> Result<i64> {
    if buf.len() > 8 {
        return Err(Error::SignedInvalidLength(buf.len() as u64));
    }
    if buf.is_empty() {
        return Ok(0);
    }
    let is_neg = (buf[0] & 0x80) != 0;
    let mut value = if is_neg { [0xFFu8; 8] } else { [0u8; 8] };
    value[8 - buf.len()..].copy_from_slice(buf);
    Ok(i64::from_be_bytes(value))
}

/// Decode a big-endian IEEE 754 float of 0, 4 or 8 bytes.
pub fn float_from_bytes(buf: &[u8]) -> Result<f64> {
    match buf.len() {
        0 => Ok(0.0),
        4 => Ok(f64::from(f32::from_be_bytes(buf.try_into().unwrap()))),
        8 => Ok(f64::from_be_bytes(buf.try_into().unwrap())),
        n => Err(Error::FloatInvalidLength(n as u64)),
    }
}

/// Decode a printable-ASCII string, truncated at the first NUL.
pub fn string_from_bytes(buf: &[u8]) -> Result<String> {
    if buf.iter().any(|&b| b != 0 && !(0x20..=0x7E).contains(&b)) {
        return Err(Error::UnprintableString);
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
}

/// Decode a UTF-8 string, truncated at the first NUL. Codepoints are not
/// validated beyond lossy replacement.
pub fn utf8_from_bytes(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

pub(crate) fn read_unsigned<R: Read + Seek>(src: &mut Source<R>, len: u64) -> Result<u64> {
    if len > 8 {
        return Err(Error::UnsignedInvalidLength(len));
    }
    unsigned_from_bytes(&src.read_slice(len)?)
}

pub(crate) fn read_signed<R: Read + Seek>(src: &mut Source<R>, len: u64) -> Result<i64> {
    if len > 8 {
        return Err(Error::SignedInvalidLength(len));
    }
    signed_from_bytes(&src.read_slice(len)?)
}

pub(crate) fn read_float<R: Read + Seek>(src: &mut Source<R>, len: u64) -> Result<f64> {
    match len {
        0 | 4 | 8 => float_from_bytes(&src.read_slice(len)?),
        n => Err(Error::FloatInvalidLength(n)),
    }
}

pub(crate) fn read_string<R: Read + Seek>(src: &mut Source<R>, len: u64) -> Result<String> {
    string_from_bytes(&src.read_slice(len)?)
}

pub(crate) fn read_utf8<R: Read + Seek>(src: &mut Source<R>, len: u64) -> Result<String> {
    Ok(utf8_from_bytes(&src.read_slice(len)?))
}

pub(crate) fn read_binary<R: Read + Seek>(src: &mut Source<R>, len: u64) -> Result<Vec<u8>> {
    src.read_slice(len)
}

/// Decode a 16-byte UUID; any other length is rejected.
pub(crate) fn read_uuid<R: Read + Seek>(src: &mut Source<R>, len: u64) -> Result<Uuid> {
    if len != 16 {
        return Err(Error::MatroskaSegmentUidInvalidLength(len));
    }
    let bytes = src.read_slice(16)?;
    Ok(Uuid::from_bytes(bytes.try_into().unwrap()))
}

/// Decode a Matroska date: signed nanoseconds since the 2001 epoch, rebased
/// to Unix-epoch nanoseconds.
pub(crate) fn read_matroska_date<R: Read + Seek>(src: &mut Source<R>, len: u64) -> Result<i64> {
    let ns = read_signed(src, len)?;
    Ok(ns.saturating_add(MKV_EPOCH_ADJUST_NS))
}

/// Rebase a 1904-epoch timestamp in seconds to Unix-epoch nanoseconds.
pub fn rebase_mp4_date(secs: u64) -> i64 {
    i64::try_from(secs)
        .unwrap_or(i64::MAX)
        .saturating_add(MP4_EPOCH_ADJUST_S)
        .saturating_mul(1_000_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_lengths() {
        let test_pair = [
            (vec![], 0u64),
            (vec![0u8], 0),
            (vec![1u8], 1),
            (vec![0xFF], 255),
            (vec![0x01, 0x00], 256),
            (vec![0xFF; 8], u64::MAX),
        ];
        for (encoded, decoded) in test_pair {
            assert_eq!(unsigned_from_bytes(&encoded).unwrap(), decoded);
        }
        assert!(matches!(
            unsigned_from_bytes(&[0u8; 9]),
            Err(Error::UnsignedInvalidLength(9))
        ));
    }

    #[test]
    fn signed_sign_extension() {
        let test_pair = [
            (vec![], 0i64),
            (vec![0x00], 0),
            (vec![0x7F], 127),
            (vec![0x80], -128),
            (vec![0xFF], -1),
            (vec![0xFF, 0x00], -256),
            (vec![0x01, 0x00], 256),
            (vec![0xFF; 8], -1),
        ];
        for (encoded, decoded) in test_pair {
            assert_eq!(signed_from_bytes(&encoded).unwrap(), decoded);
        }
    }

    #[test]
    fn float_lengths() {
        assert_eq!(float_from_bytes(&[]).unwrap(), 0.0);
        assert_eq!(
            float_from_bytes(&1.5f32.to_be_bytes()).unwrap(),
            f64::from(1.5f32)
        );
        assert_eq!(float_from_bytes(&(-0.25f64).to_be_bytes()).unwrap(), -0.25);
        assert!(matches!(
            float_from_bytes(&[0, 0, 0]),
            Err(Error::FloatInvalidLength(3))
        ));
    }

    #[test]
    fn strings_truncate_at_nul() {
        assert_eq!(string_from_bytes(b"matroska").unwrap(), "matroska");
        assert_eq!(string_from_bytes(b"webm\0\0\0").unwrap(), "webm");
        assert!(matches!(
            string_from_bytes(&[0x41, 0x07]),
            Err(Error::UnprintableString)
        ));
        assert_eq!(utf8_from_bytes("könig\0tail".as_bytes()), "könig");
    }

    #[test]
    fn uuid_round_trip() {
        let bytes: [u8; 16] = [
            0xd8, 0xfe, 0xc3, 0xd6, 0x1b, 0x0e, 0x48, 0x3c, 0x92, 0x97, 0x58, 0x28, 0x87, 0x7e,
            0xc4, 0x81,
        ];
        let uuid = Uuid::from_bytes(bytes);
        assert_eq!(uuid.time_low, 0xd8fe_c3d6);
        assert_eq!(uuid.time_mid, 0x1b0e);
        assert_eq!(uuid.to_bytes(), bytes);
        assert_eq!(
            uuid.to_string(),
            "d8fec3d6-1b0e-483c-9297-5828877ec481"
        );
    }

    #[test]
    fn language_unpacks() {
        // "und" = (21 << 10) | (14 << 5) | 4
        let code = (21u16 << 10) | (14 << 5) | 4;
        assert_eq!(Language::from_packed(code).as_str(), "und");
        // "eng"
        let code = (5u16 << 10) | (14 << 5) | 7;
        assert_eq!(Language::from_packed(code).as_str(), "eng");
    }

    #[test]
    fn epochs_rebase() {
        // 1970-01-01 in 1904-epoch seconds.
        assert_eq!(rebase_mp4_date(2_082_844_800), 0);
        // One hour later.
        assert_eq!(rebase_mp4_date(2_082_844_800 + 3600), 3_600_000_000_000);
    }

    #[test]
    fn fixed_point_scales() {
        assert_eq!(Fixed8_8(0x0100).to_f32(), 1.0);
        assert_eq!(Fixed8_8(0x0180).to_f32(), 1.5);
        assert_eq!(Fixed16_16(0x0001_0000).to_f64(), 1.0);
        assert_eq!(Fixed2_30(1 << 30).to_f64(), 1.0);
    }

    #[test]
    fn canonical_scalars_round_trip() {
        fn encode_unsigned(v: u64) -> Vec<u8> {
            let bytes = v.to_be_bytes();
            let first = bytes.iter().position(|&b| b != 0).unwrap_or(7);
            bytes[first..].to_vec()
        }
        fn encode_signed(v: i64) -> Vec<u8> {
            let bytes = v.to_be_bytes();
            let first = if v >= 0 {
                bytes.iter().position(|&b| b != 0).unwrap_or(7)
            } else {
                bytes.iter().position(|&b| b != 0xFF).unwrap_or(7)
            };
            let mut out = bytes[first..].to_vec();
            // The leading byte must keep the sign unambiguous.
            if v >= 0 && out[0] & 0x80 != 0 {
                out.insert(0, 0);
            }
            if v < 0 && out[0] & 0x80 == 0 {
                out.insert(0, 0xFF);
            }
            out
        }

        for encoded in [
            vec![0u8],
            vec![1],
            vec![0xFF],
            vec![1, 0],
            vec![1, 0, 0, 0],
            vec![0xFF; 8],
        ] {
            let decoded = unsigned_from_bytes(&encoded).unwrap();
            assert_eq!(encode_unsigned(decoded), encoded);
        }

        for encoded in [
            vec![0u8],
            vec![0x7F],
            vec![0x80],
            vec![0xFF, 0x00],
            vec![0x00, 0xFF],
            vec![0x01, 0x02, 0x03],
        ] {
            let decoded = signed_from_bytes(&encoded).unwrap();
            assert_eq!(encode_signed(decoded), encoded);
        }

        let single = 1.5f32.to_be_bytes().to_vec();
        let decoded = float_from_bytes(&single).unwrap();
        assert_eq!((decoded as f32).to_be_bytes().to_vec(), single);
        let double = 1.000000001f64.to_be_bytes().to_vec();
        let decoded = float_from_bytes(&double).unwrap();
        assert_eq!(decoded.to_be_bytes().to_vec(), double);

        let text = b"S_TEXT/UTF8".to_vec();
        assert_eq!(string_from_bytes(&text).unwrap().into_bytes(), text);
        assert_eq!(utf8_from_bytes("könig".as_bytes()).into_bytes(), "könig".as_bytes());
    }

    #[test]
    fn track_types_map() {
        assert_eq!(TrackType::from_raw(1), Some(TrackType::Video));
        assert_eq!(TrackType::from_raw(17), Some(TrackType::Subtitle));
        assert_eq!(TrackType::from_raw(33), Some(TrackType::Metadata));
        assert_eq!(TrackType::from_raw(4), None);
    }
}
