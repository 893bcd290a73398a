use crate::vint::EbmlId;

/// Error types for this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file to open does not exist.
    #[error("File not found")]
    FileNotFound,

    /// The file has zero length, nothing to parse.
    #[error("File is empty")]
    FileEmpty,

    /// A declared extent runs past the end of the file.
    #[error("File ended before the declared extent")]
    FileEndedEarly,

    /// I/O error, from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(std::io::Error),

    /// A box was found under a parent its specification forbids.
    #[error("Box found under a parent its specification forbids")]
    WrongFileFormat,

    /// More than one `ftyp` box, or one that is not the first box.
    #[error("Duplicate ftyp box")]
    FtypDuplicated,

    /// `ftyp` payload is shorter than its fixed prefix or not brand-aligned.
    #[error("ftyp payload size is not valid")]
    FtypInvalidSize,

    /// `hdlr` found outside `mdia` or `meta`.
    #[error("hdlr box under unexpected parent")]
    HdlrUnexpectedParent,

    /// `hdlr` payload too short for its fixed prefix.
    #[error("hdlr payload size is not valid")]
    HdlrInvalidSize,

    /// `mvhd` with a version other than 0 or 1.
    #[error("mvhd version {0} is not known")]
    MvhdUnknownVersion(u8),

    /// `mvhd` payload size does not match its version.
    #[error("mvhd payload size is not valid")]
    MvhdInvalidSize,

    /// `tkhd` with a version other than 0 or 1.
    #[error("tkhd version {0} is not known")]
    TkhdUnknownVersion(u8),

    /// `tkhd` payload size does not match its version.
    #[error("tkhd payload size is not valid")]
    TkhdInvalidSize,

    /// `mdhd` with a version other than 0 or 1.
    #[error("mdhd version {0} is not known")]
    MdhdUnknownVersion(u8),

    /// `mdhd` payload size does not match its version.
    #[error("mdhd payload size is not valid")]
    MdhdInvalidSize,

    /// `elst` with a version other than 0 or 1.
    #[error("elst version {0} is not known")]
    ElstUnknownVersion(u8),

    /// `elst` payload size does not match its declared entry count.
    #[error("elst payload size is not valid")]
    ElstInvalidSize,

    /// `chpl` with a version other than 0 or 1.
    #[error("chpl version {0} is not known")]
    ChplUnknownVersion(u8),

    /// `chpl` entries did not end exactly at the declared box end.
    #[error("chpl payload size is not valid")]
    ChplInvalidSize,

    /// The stream does not start with an `EBML` master element.
    #[error("EBML header missing or corrupt")]
    EbmlHeaderMissingOrCorrupt,

    /// A second `EBML` element inside the document being parsed.
    #[error("Duplicate EBML header")]
    EbmlHeaderDuplicated,

    /// A fixed-width EBML header field with the wrong declared length.
    #[error("EBML header field {id} has unexpected length {length}")]
    EbmlHeaderUnexpectedFieldLength {
        /// The offending field's element ID.
        id: EbmlId,
        /// The declared length in bytes.
        length: u64,
    },

    /// `EBMLVersion` above the version this reader understands.
    #[error("EBML version {0} is not supported")]
    UnsupportedEbmlVersion(u64),

    /// Empty or missing `DocType`.
    #[error("DocType is empty")]
    DocTypeEmpty,

    /// `DocType` longer than the 1024-byte bound.
    #[error("DocType length {0} exceeds 1024 bytes")]
    DocTypeTooLong(u64),

    /// `DocTypeVersion` of zero.
    #[error("DocTypeVersion is not valid")]
    DocTypeVersionInvalid,

    /// `DocTypeReadVersion` of zero, or above `DocTypeVersion`.
    #[error("DocTypeReadVersion is not valid")]
    DocTypeReadVersionInvalid,

    /// `EBMLMaxIDLength` outside `[4, 8]`.
    #[error("EBMLMaxIDLength {0} is outside [4, 8]")]
    MaxIdLengthInvalid(u64),

    /// `EBMLMaxSizeLength` outside `[1, 8]`.
    #[error("EBMLMaxSizeLength {0} is outside [1, 8]")]
    MaxSizeInvalid(u64),

    /// CRC-32 element whose payload is not exactly 4 bytes.
    #[error("CRC-32 element length {0} is not 4")]
    InvalidCrcSize(u64),

    /// Recomputed CRC-32 does not match the declared value.
    #[error("CRC-32 mismatch: declared {declared:#010X}, computed {computed:#010X}")]
    InvalidCrc {
        /// The checksum stored in the element.
        declared: u32,
        /// The checksum recomputed over the covered range.
        computed: u32,
    },

    /// Unsigned integer element longer than 8 bytes.
    #[error("Unsigned integer length {0} exceeds 8 bytes")]
    UnsignedInvalidLength(u64),

    /// Signed integer element longer than 8 bytes.
    #[error("Signed integer length {0} exceeds 8 bytes")]
    SignedInvalidLength(u64),

    /// Float element with a length other than 0, 4 or 8.
    #[error("Float length {0} is not 0, 4 or 8")]
    FloatInvalidLength(u64),

    /// A printable-ASCII string containing bytes outside `0x20..=0x7E`.
    #[error("String contains unprintable bytes")]
    UnprintableString,

    /// RFC 8794 reserved all-zero VINT.
    #[error("VINT with all-zero value bits")]
    VIntAllZeroes,

    /// RFC 8794 reserved all-one VINT.
    #[error("VINT with all-one value bits")]
    VIntAllOnes,

    /// VINT wider than 8 bytes.
    #[error("VINT wider than 8 bytes")]
    VIntOutOfRange,

    /// Matroska body whose first element is not `Segment`.
    #[error("Matroska body does not start with a Segment element")]
    MatroskaBodyRootWrongId,

    /// `SeekPosition` outside a `Seek` nested in a `SeekHead`.
    #[error("SeekPosition outside Seek/SeekHead")]
    MatroskaBrokenSeekPosition,

    /// Segment UID family element whose payload is not 16 bytes.
    #[error("Segment UID length {0} is not 16")]
    MatroskaSegmentUidInvalidLength(u64),

    /// `TrackType` element whose payload is not exactly 1 byte.
    #[error("TrackType length {0} is not 1")]
    MatroskaTrackTypeInvalidLength(u64),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::FileEndedEarly,
            _ => Error::Io(err),
        }
    }
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
