//! The Matroska/WebM element schema: per-ID type and disposition.
//!
//! Every known element ID maps to its value kind and to how the body engine
//! treats it: decode and intern, hand off to parser-specific handling, or
//! record the extent and skip the bytes. IDs absent from the table are
//! skipped with their offsets retained, so schema gaps are never fatal.

use crate::tree::TypeTag;
use crate::vint::EbmlId;

/// Value kind of a schema entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Master,
    Unsigned,
    Signed,
    Float,
    String,
    Utf8,
    Binary,
    Date,
    Uuid,
    TrackType,
}

/// What the body engine does with an element of this ID.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Decode with the kind's decoder and intern the value.
    Intern,
    /// Parser-specific handling.
    Special,
    /// Record offsets only; the payload bytes are never loaded.
    Skip,
}

/// One row of the schema table.
#[derive(Debug)]
pub struct SchemaEntry {
    /// Canonical element name, as in the Matroska specification.
    pub name: &'static str,
    pub kind: ElementKind,
    pub disposition: Disposition,
}

macro_rules! matroska_schema {
    ($($name:ident = $id:literal, $canon:literal, $kind:ident, $disp:ident;)*) => {
        paste::paste! {
            $(
                #[doc = concat!("The `", $canon, "` element.")]
                pub const [<$name:snake:upper>]: EbmlId = EbmlId($id);
            )*

            /// Look up the schema row for an element ID.
            pub fn lookup(id: EbmlId) -> Option<&'static SchemaEntry> {
                match id.0 {
                    $(
                        $id => Some(&SchemaEntry {
                            name: $canon,
                            kind: ElementKind::$kind,
                            disposition: Disposition::$disp,
                        }),
                    )*
                    _ => None,
                }
            }
        }
    };
}

matroska_schema! {
    // EBML envelope.
    Ebml                       = 0x1A45_DFA3, "EBML",                       Master,    Intern;
    EbmlVersion                = 0x4286,      "EBMLVersion",                Unsigned,  Intern;
    EbmlReadVersion            = 0x42F7,      "EBMLReadVersion",            Unsigned,  Intern;
    EbmlMaxIdLength            = 0x42F2,      "EBMLMaxIDLength",            Unsigned,  Intern;
    EbmlMaxSizeLength          = 0x42F3,      "EBMLMaxSizeLength",          Unsigned,  Intern;
    DocType                    = 0x4282,      "DocType",                    String,    Intern;
    DocTypeVersion             = 0x4287,      "DocTypeVersion",             Unsigned,  Intern;
    DocTypeReadVersion         = 0x4285,      "DocTypeReadVersion",         Unsigned,  Intern;
    DocTypeExtension           = 0x4281,      "DocTypeExtension",           Master,    Intern;
    DocTypeExtensionName       = 0x4283,      "DocTypeExtensionName",       String,    Intern;
    DocTypeExtensionVersion    = 0x4284,      "DocTypeExtensionVersion",    Unsigned,  Intern;
    Crc32                      = 0xBF,        "CRC-32",                     Binary,    Special;
    Void                       = 0xEC,        "Void",                       Binary,    Skip;

    // Segment.
    Segment                    = 0x1853_8067, "Segment",                    Master,    Special;

    // Meta seek information.
    SeekHead                   = 0x114D_9B74, "SeekHead",                   Master,    Intern;
    Seek                       = 0x4DBB,      "Seek",                       Master,    Intern;
    SeekId                     = 0x53AB,      "SeekID",                     Binary,    Intern;
    SeekPosition               = 0x53AC,      "SeekPosition",               Unsigned,  Special;

    // Segment information.
    Info                       = 0x1549_A966, "Info",                       Master,    Intern;
    SegmentUid                 = 0x73A4,      "SegmentUID",                 Uuid,      Special;
    SegmentFilename            = 0x7384,      "SegmentFilename",            Utf8,      Intern;
    PrevUid                    = 0x3CB9_23,   "PrevUID",                    Uuid,      Special;
    PrevFilename               = 0x3C83_AB,   "PrevFilename",               Utf8,      Intern;
    NextUid                    = 0x3EB9_23,   "NextUID",                    Uuid,      Special;
    NextFilename               = 0x3E83_BB,   "NextFilename",               Utf8,      Intern;
    SegmentFamily              = 0x4444,      "SegmentFamily",              Uuid,      Special;
    ChapterTranslate           = 0x6924,      "ChapterTranslate",           Master,    Intern;
    ChapterTranslateEditionUid = 0x69FC,      "ChapterTranslateEditionUID", Unsigned,  Intern;
    ChapterTranslateCodec      = 0x69BF,      "ChapterTranslateCodec",      Unsigned,  Intern;
    ChapterTranslateId         = 0x69A5,      "ChapterTranslateID",         Binary,    Intern;
    TimestampScale             = 0x2AD7_B1,   "TimestampScale",             Unsigned,  Intern;
    Duration                   = 0x4489,      "Duration",                   Float,     Intern;
    DateUtc                    = 0x4461,      "DateUTC",                    Date,      Special;
    Title                      = 0x7BA9,      "Title",                      Utf8,      Intern;
    MuxingApp                  = 0x4D80,      "MuxingApp",                  Utf8,      Intern;
    WritingApp                 = 0x5741,      "WritingApp",                 Utf8,      Intern;

    // Cluster.
    Cluster                    = 0x1F43_B675, "Cluster",                    Master,    Special;
    Timestamp                  = 0xE7,        "Timestamp",                  Unsigned,  Intern;
    SilentTracks               = 0x5854,      "SilentTracks",               Master,    Intern;
    SilentTrackNumber          = 0x58D7,      "SilentTrackNumber",          Unsigned,  Intern;
    Position                   = 0xA7,        "Position",                   Unsigned,  Intern;
    PrevSize                   = 0xAB,        "PrevSize",                   Unsigned,  Intern;
    SimpleBlock                = 0xA3,        "SimpleBlock",                Binary,    Skip;
    BlockGroup                 = 0xA0,        "BlockGroup",                 Master,    Intern;
    Block                      = 0xA1,        "Block",                      Binary,    Skip;
    BlockVirtual               = 0xA2,        "BlockVirtual",               Binary,    Skip;
    BlockAdditions             = 0x75A1,      "BlockAdditions",             Master,    Intern;
    BlockMore                  = 0xA6,        "BlockMore",                  Master,    Intern;
    BlockAddId                 = 0xEE,        "BlockAddID",                 Unsigned,  Intern;
    BlockAdditional            = 0xA5,        "BlockAdditional",            Binary,    Intern;
    BlockDuration              = 0x9B,        "BlockDuration",              Unsigned,  Intern;
    ReferencePriority          = 0xFA,        "ReferencePriority",          Unsigned,  Intern;
    ReferenceBlock             = 0xFB,        "ReferenceBlock",             Signed,    Intern;
    ReferenceVirtual           = 0xFD,        "ReferenceVirtual",           Signed,    Intern;
    CodecState                 = 0xA4,        "CodecState",                 Binary,    Intern;
    DiscardPadding             = 0x75A2,      "DiscardPadding",             Signed,    Intern;
    Slices                     = 0x8E,        "Slices",                     Master,    Intern;
    TimeSlice                  = 0xE8,        "TimeSlice",                  Master,    Intern;
    LaceNumber                 = 0xCC,        "LaceNumber",                 Unsigned,  Intern;
    FrameNumber                = 0xCD,        "FrameNumber",                Unsigned,  Intern;
    BlockAdditionId            = 0xCB,        "BlockAdditionID",            Unsigned,  Intern;
    Delay                      = 0xCE,        "Delay",                      Unsigned,  Intern;
    SliceDuration              = 0xCF,        "SliceDuration",              Unsigned,  Intern;
    ReferenceFrame             = 0xC8,        "ReferenceFrame",             Master,    Intern;
    ReferenceOffset            = 0xC9,        "ReferenceOffset",            Unsigned,  Intern;
    ReferenceTimestamp         = 0xCA,        "ReferenceTimestamp",         Unsigned,  Intern;
    EncryptedBlock             = 0xAF,        "EncryptedBlock",             Binary,    Intern;

    // Tracks.
    Tracks                     = 0x1654_AE6B, "Tracks",                     Master,    Intern;
    TrackEntry                 = 0xAE,        "TrackEntry",                 Master,    Intern;
    TrackNumber                = 0xD7,        "TrackNumber",                Unsigned,  Intern;
    TrackUid                   = 0x73C5,      "TrackUID",                   Unsigned,  Intern;
    TrackType                  = 0x83,        "TrackType",                  TrackType, Special;
    FlagEnabled                = 0xB9,        "FlagEnabled",                Unsigned,  Intern;
    FlagDefault                = 0x88,        "FlagDefault",                Unsigned,  Intern;
    FlagForced                 = 0x55AA,      "FlagForced",                 Unsigned,  Intern;
    FlagHearingImpaired        = 0x55AB,      "FlagHearingImpaired",        Unsigned,  Intern;
    FlagVisualImpaired         = 0x55AC,      "FlagVisualImpaired",         Unsigned,  Intern;
    FlagTextDescriptions       = 0x55AD,      "FlagTextDescriptions",       Unsigned,  Intern;
    FlagOriginal               = 0x55AE,      "FlagOriginal",               Unsigned,  Intern;
    FlagCommentary             = 0x55AF,      "FlagCommentary",             Unsigned,  Intern;
    FlagLacing                 = 0x9C,        "FlagLacing",                 Unsigned,  Intern;
    MinCache                   = 0x6DE7,      "MinCache",                   Unsigned,  Intern;
    MaxCache                   = 0x6DF8,      "MaxCache",                   Unsigned,  Intern;
    DefaultDuration            = 0x23E3_83,   "DefaultDuration",            Unsigned,  Intern;
    DefaultDecodedFieldDuration = 0x234E_7A,  "DefaultDecodedFieldDuration", Unsigned, Intern;
    TrackTimestampScale        = 0x2331_4F,   "TrackTimestampScale",        Float,     Intern;
    TrackOffset                = 0x537F,      "TrackOffset",                Signed,    Intern;
    MaxBlockAdditionId         = 0x55EE,      "MaxBlockAdditionID",         Unsigned,  Intern;
    BlockAdditionMapping       = 0x41E4,      "BlockAdditionMapping",       Master,    Intern;
    BlockAddIdValue            = 0x41F0,      "BlockAddIDValue",            Unsigned,  Intern;
    BlockAddIdName             = 0x41A4,      "BlockAddIDName",             String,    Intern;
    BlockAddIdType             = 0x41E7,      "BlockAddIDType",             Unsigned,  Intern;
    BlockAddIdExtraData        = 0x41ED,      "BlockAddIDExtraData",        Binary,    Intern;
    Name                       = 0x536E,      "Name",                       Utf8,      Intern;
    Language                   = 0x22B5_9C,   "Language",                   String,    Intern;
    LanguageBcp47              = 0x22B5_9D,   "LanguageBCP47",              String,    Intern;
    CodecId                    = 0x86,        "CodecID",                    String,    Intern;
    CodecPrivate               = 0x63A2,      "CodecPrivate",               Binary,    Skip;
    CodecName                  = 0x2586_88,   "CodecName",                  Utf8,      Intern;
    AttachmentLink             = 0x7446,      "AttachmentLink",             Unsigned,  Intern;
    CodecSettings              = 0x3A96_97,   "CodecSettings",              Utf8,      Intern;
    CodecInfoUrl               = 0x3B40_40,   "CodecInfoURL",               String,    Intern;
    CodecDownloadUrl           = 0x26B2_40,   "CodecDownloadURL",           String,    Intern;
    CodecDecodeAll             = 0xAA,        "CodecDecodeAll",             Unsigned,  Intern;
    TrackOverlay               = 0x6FAB,      "TrackOverlay",               Unsigned,  Intern;
    CodecDelay                 = 0x56AA,      "CodecDelay",                 Unsigned,  Intern;
    SeekPreRoll                = 0x56BB,      "SeekPreRoll",                Unsigned,  Intern;
    TrackTranslate             = 0x6624,      "TrackTranslate",             Master,    Intern;
    TrackTranslateEditionUid   = 0x66FC,      "TrackTranslateEditionUID",   Unsigned,  Intern;
    TrackTranslateCodec        = 0x66BF,      "TrackTranslateCodec",        Unsigned,  Intern;
    TrackTranslateTrackId      = 0x66A5,      "TrackTranslateTrackID",      Binary,    Intern;

    // Video settings.
    Video                      = 0xE0,        "Video",                      Master,    Intern;
    FlagInterlaced             = 0x9A,        "FlagInterlaced",             Unsigned,  Intern;
    FieldOrder                 = 0x9D,        "FieldOrder",                 Unsigned,  Intern;
    StereoMode                 = 0x53B8,      "StereoMode",                 Unsigned,  Intern;
    AlphaMode                  = 0x53C0,      "AlphaMode",                  Unsigned,  Intern;
    OldStereoMode              = 0x53B9,      "OldStereoMode",              Unsigned,  Intern;
    PixelWidth                 = 0xB0,        "PixelWidth",                 Unsigned,  Intern;
    PixelHeight                = 0xBA,        "PixelHeight",                Unsigned,  Intern;
    PixelCropBottom            = 0x54AA,      "PixelCropBottom",            Unsigned,  Intern;
    PixelCropTop               = 0x54BB,      "PixelCropTop",               Unsigned,  Intern;
    PixelCropLeft              = 0x54CC,      "PixelCropLeft",              Unsigned,  Intern;
    PixelCropRight             = 0x54DD,      "PixelCropRight",             Unsigned,  Intern;
    DisplayWidth               = 0x54B0,      "DisplayWidth",               Unsigned,  Intern;
    DisplayHeight              = 0x54BA,      "DisplayHeight",              Unsigned,  Intern;
    DisplayUnit                = 0x54B2,      "DisplayUnit",                Unsigned,  Intern;
    AspectRatioType            = 0x54B3,      "AspectRatioType",            Unsigned,  Intern;
    UncompressedFourcc         = 0x2EB5_24,   "UncompressedFourCC",         Binary,    Intern;
    GammaValue                 = 0x2FB5_23,   "GammaValue",                 Float,     Intern;
    FrameRate                  = 0x2383_E3,   "FrameRate",                  Float,     Intern;

    // Colour metadata.
    Colour                     = 0x55B0,      "Colour",                     Master,    Intern;
    MatrixCoefficients         = 0x55B1,      "MatrixCoefficients",         Unsigned,  Intern;
    BitsPerChannel             = 0x55B2,      "BitsPerChannel",             Unsigned,  Intern;
    ChromaSubsamplingHorz      = 0x55B3,      "ChromaSubsamplingHorz",      Unsigned,  Intern;
    ChromaSubsamplingVert      = 0x55B4,      "ChromaSubsamplingVert",      Unsigned,  Intern;
    CbSubsamplingHorz          = 0x55B5,      "CbSubsamplingHorz",          Unsigned,  Intern;
    CbSubsamplingVert          = 0x55B6,      "CbSubsamplingVert",          Unsigned,  Intern;
    ChromaSitingHorz           = 0x55B7,      "ChromaSitingHorz",           Unsigned,  Intern;
    ChromaSitingVert           = 0x55B8,      "ChromaSitingVert",           Unsigned,  Intern;
    Range                      = 0x55B9,      "Range",                      Unsigned,  Intern;
    TransferCharacteristics    = 0x55BA,      "TransferCharacteristics",    Unsigned,  Intern;
    Primaries                  = 0x55BB,      "Primaries",                  Unsigned,  Intern;
    MaxCll                     = 0x55BC,      "MaxCLL",                     Unsigned,  Intern;
    MaxFall                    = 0x55BD,      "MaxFALL",                    Unsigned,  Intern;
    MasteringMetadata          = 0x55D0,      "MasteringMetadata",          Master,    Intern;
    PrimaryRChromaticityX      = 0x55D1,      "PrimaryRChromaticityX",      Float,     Intern;
    PrimaryRChromaticityY      = 0x55D2,      "PrimaryRChromaticityY",      Float,     Intern;
    PrimaryGChromaticityX      = 0x55D3,      "PrimaryGChromaticityX",      Float,     Intern;
    PrimaryGChromaticityY      = 0x55D4,      "PrimaryGChromaticityY",      Float,     Intern;
    PrimaryBChromaticityX      = 0x55D5,      "PrimaryBChromaticityX",      Float,     Intern;
    PrimaryBChromaticityY      = 0x55D6,      "PrimaryBChromaticityY",      Float,     Intern;
    WhitePointChromaticityX    = 0x55D7,      "WhitePointChromaticityX",    Float,     Intern;
    WhitePointChromaticityY    = 0x55D8,      "WhitePointChromaticityY",    Float,     Intern;
    LuminanceMax               = 0x55D9,      "LuminanceMax",               Float,     Intern;
    LuminanceMin               = 0x55DA,      "LuminanceMin",               Float,     Intern;

    // Projection metadata.
    Projection                 = 0x7670,      "Projection",                 Master,    Intern;
    ProjectionType             = 0x7671,      "ProjectionType",             Unsigned,  Intern;
    ProjectionPrivate          = 0x7672,      "ProjectionPrivate",          Binary,    Skip;
    ProjectionPoseYaw          = 0x7673,      "ProjectionPoseYaw",          Float,     Intern;
    ProjectionPosePitch        = 0x7674,      "ProjectionPosePitch",        Float,     Intern;
    ProjectionPoseRoll         = 0x7675,      "ProjectionPoseRoll",         Float,     Intern;

    // Audio settings.
    Audio                      = 0xE1,        "Audio",                      Master,    Intern;
    SamplingFrequency          = 0xB5,        "SamplingFrequency",          Float,     Intern;
    OutputSamplingFrequency    = 0x78B5,      "OutputSamplingFrequency",    Float,     Intern;
    Channels                   = 0x9F,        "Channels",                   Unsigned,  Intern;
    ChannelPositions           = 0x7D7B,      "ChannelPositions",           Binary,    Intern;
    BitDepth                   = 0x6264,      "BitDepth",                   Unsigned,  Intern;
    Emphasis                   = 0x52F1,      "Emphasis",                   Unsigned,  Intern;

    // Track operation.
    TrackOperation             = 0xE2,        "TrackOperation",             Master,    Intern;
    TrackCombinePlanes         = 0xE3,        "TrackCombinePlanes",         Master,    Intern;
    TrackPlane                 = 0xE4,        "TrackPlane",                 Master,    Intern;
    TrackPlaneUid              = 0xE5,        "TrackPlaneUID",              Unsigned,  Intern;
    TrackPlaneType             = 0xE6,        "TrackPlaneType",             Unsigned,  Intern;
    TrackJoinBlocks            = 0xE9,        "TrackJoinBlocks",            Master,    Intern;
    TrackJoinUid               = 0xED,        "TrackJoinUID",               Unsigned,  Intern;
    TrickTrackUid              = 0xC0,        "TrickTrackUID",              Unsigned,  Intern;
    TrickTrackSegmentUid       = 0xC1,        "TrickTrackSegmentUID",       Binary,    Intern;
    TrickTrackFlag             = 0xC6,        "TrickTrackFlag",             Unsigned,  Intern;
    TrickMasterTrackUid        = 0xC7,        "TrickMasterTrackUID",        Unsigned,  Intern;
    TrickMasterTrackSegmentUid = 0xC4,        "TrickMasterTrackSegmentUID", Binary,    Intern;

    // Content encoding.
    ContentEncodings           = 0x6D80,      "ContentEncodings",           Master,    Intern;
    ContentEncoding            = 0x6240,      "ContentEncoding",            Master,    Intern;
    ContentEncodingOrder       = 0x5031,      "ContentEncodingOrder",       Unsigned,  Intern;
    ContentEncodingScope       = 0x5032,      "ContentEncodingScope",       Unsigned,  Intern;
    ContentEncodingType        = 0x5033,      "ContentEncodingType",        Unsigned,  Intern;
    ContentCompression         = 0x5034,      "ContentCompression",         Master,    Intern;
    ContentCompAlgo            = 0x4254,      "ContentCompAlgo",            Unsigned,  Intern;
    ContentCompSettings        = 0x4255,      "ContentCompSettings",        Binary,    Skip;
    ContentEncryption          = 0x5035,      "ContentEncryption",          Master,    Intern;
    ContentEncAlgo             = 0x47E1,      "ContentEncAlgo",             Unsigned,  Intern;
    ContentEncKeyId            = 0x47E2,      "ContentEncKeyID",            Binary,    Skip;
    ContentEncAesSettings      = 0x47E7,      "ContentEncAESSettings",      Master,    Intern;
    AesSettingsCipherMode      = 0x47E8,      "AESSettingsCipherMode",      Unsigned,  Intern;
    ContentSignature           = 0x47E3,      "ContentSignature",           Binary,    Intern;
    ContentSigKeyId            = 0x47E4,      "ContentSigKeyID",            Binary,    Intern;
    ContentSigAlgo             = 0x47E5,      "ContentSigAlgo",             Unsigned,  Intern;
    ContentSigHashAlgo         = 0x47E6,      "ContentSigHashAlgo",         Unsigned,  Intern;

    // Cueing data.
    Cues                       = 0x1C53_BB6B, "Cues",                       Master,    Intern;
    CuePoint                   = 0xBB,        "CuePoint",                   Master,    Intern;
    CueTime                    = 0xB3,        "CueTime",                    Unsigned,  Intern;
    CueTrackPositions          = 0xB7,        "CueTrackPositions",          Master,    Intern;
    CueTrack                   = 0xF7,        "CueTrack",                   Unsigned,  Intern;
    CueClusterPosition         = 0xF1,        "CueClusterPosition",         Unsigned,  Intern;
    CueRelativePosition        = 0xF0,        "CueRelativePosition",        Unsigned,  Intern;
    CueDuration                = 0xB2,        "CueDuration",                Unsigned,  Intern;
    CueBlockNumber             = 0x5378,      "CueBlockNumber",             Unsigned,  Intern;
    CueCodecState              = 0xEA,        "CueCodecState",              Unsigned,  Intern;
    CueReference               = 0xDB,        "CueReference",               Master,    Intern;
    CueRefTime                 = 0x96,        "CueRefTime",                 Unsigned,  Intern;
    CueRefCluster              = 0x97,        "CueRefCluster",              Unsigned,  Intern;
    CueRefNumber               = 0x535F,      "CueRefNumber",               Unsigned,  Intern;
    CueRefCodecState           = 0xEB,        "CueRefCodecState",           Unsigned,  Intern;

    // Attachments.
    Attachments                = 0x1941_A469, "Attachments",                Master,    Intern;
    AttachedFile               = 0x61A7,      "AttachedFile",               Master,    Intern;
    FileDescription            = 0x467E,      "FileDescription",            Utf8,      Intern;
    FileName                   = 0x466E,      "FileName",                   Utf8,      Intern;
    FileMediaType              = 0x4660,      "FileMediaType",              String,    Intern;
    FileData                   = 0x465C,      "FileData",                   Binary,    Skip;
    FileUid                    = 0x46AE,      "FileUID",                    Unsigned,  Intern;
    FileReferral               = 0x4675,      "FileReferral",               Binary,    Intern;
    FileUsedStartTime          = 0x4661,      "FileUsedStartTime",          Unsigned,  Intern;
    FileUsedEndTime            = 0x4662,      "FileUsedEndTime",            Unsigned,  Intern;

    // Chapters.
    Chapters                   = 0x1043_A770, "Chapters",                   Master,    Intern;
    EditionEntry               = 0x45B9,      "EditionEntry",               Master,    Intern;
    EditionUid                 = 0x45BC,      "EditionUID",                 Unsigned,  Intern;
    EditionFlagHidden          = 0x45BD,      "EditionFlagHidden",          Unsigned,  Intern;
    EditionFlagDefault         = 0x45DB,      "EditionFlagDefault",         Unsigned,  Intern;
    EditionFlagOrdered         = 0x45DD,      "EditionFlagOrdered",         Unsigned,  Intern;
    EditionDisplay             = 0x4520,      "EditionDisplay",             Master,    Intern;
    EditionString              = 0x4521,      "EditionString",              Utf8,      Intern;
    EditionLanguageIetf        = 0x45E4,      "EditionLanguageIETF",        String,    Intern;
    ChapterAtom                = 0xB6,        "ChapterAtom",                Master,    Intern;
    ChapterUid                 = 0x73C4,      "ChapterUID",                 Unsigned,  Intern;
    ChapterStringUid           = 0x5654,      "ChapterStringUID",           Utf8,      Intern;
    ChapterTimeStart           = 0x91,        "ChapterTimeStart",           Unsigned,  Intern;
    ChapterTimeEnd             = 0x92,        "ChapterTimeEnd",             Unsigned,  Intern;
    ChapterFlagHidden          = 0x98,        "ChapterFlagHidden",          Unsigned,  Intern;
    ChapterFlagEnabled         = 0x4598,      "ChapterFlagEnabled",         Unsigned,  Intern;
    ChapterSegmentUid          = 0x6E67,      "ChapterSegmentUID",          Binary,    Intern;
    ChapterSkipType            = 0x4588,      "ChapterSkipType",            Unsigned,  Intern;
    ChapterSegmentEditionUid   = 0x6EBC,      "ChapterSegmentEditionUID",   Unsigned,  Intern;
    ChapterPhysicalEquiv       = 0x63C3,      "ChapterPhysicalEquiv",       Unsigned,  Intern;
    ChapterTrack               = 0x8F,        "ChapterTrack",               Master,    Intern;
    ChapterTrackUid            = 0x89,        "ChapterTrackUID",            Unsigned,  Intern;
    ChapterDisplay             = 0x80,        "ChapterDisplay",             Master,    Intern;
    ChapString                 = 0x85,        "ChapString",                 Utf8,      Intern;
    ChapLanguage               = 0x437C,      "ChapLanguage",               String,    Intern;
    ChapLanguageBcp47          = 0x437D,      "ChapLanguageBCP47",          String,    Intern;
    ChapCountry                = 0x437E,      "ChapCountry",                String,    Intern;
    ChapProcess                = 0x6944,      "ChapProcess",                Master,    Intern;
    ChapProcessCodecId         = 0x6955,      "ChapProcessCodecID",         Unsigned,  Intern;
    ChapProcessPrivate         = 0x450D,      "ChapProcessPrivate",         Binary,    Intern;
    ChapProcessCommand         = 0x6911,      "ChapProcessCommand",         Master,    Intern;
    ChapProcessTime            = 0x6922,      "ChapProcessTime",            Unsigned,  Intern;
    ChapProcessData            = 0x6933,      "ChapProcessData",            Binary,    Intern;

    // Tagging.
    Tags                       = 0x1254_C367, "Tags",                       Master,    Intern;
    Tag                        = 0x7373,      "Tag",                        Master,    Intern;
    Targets                    = 0x63C0,      "Targets",                    Master,    Intern;
    TargetTypeValue            = 0x68CA,      "TargetTypeValue",            Unsigned,  Intern;
    TargetType                 = 0x63CA,      "TargetType",                 String,    Intern;
    TagTrackUid                = 0x63C5,      "TagTrackUID",                Unsigned,  Intern;
    TagEditionUid              = 0x63C9,      "TagEditionUID",              Unsigned,  Intern;
    TagChapterUid              = 0x63C4,      "TagChapterUID",              Unsigned,  Intern;
    TagAttachmentUid           = 0x63C6,      "TagAttachmentUID",           Unsigned,  Intern;
    SimpleTag                  = 0x67C8,      "SimpleTag",                  Master,    Intern;
    TagName                    = 0x45A3,      "TagName",                    Utf8,      Intern;
    TagLanguage                = 0x447A,      "TagLanguage",                String,    Intern;
    TagLanguageBcp47           = 0x447B,      "TagLanguageBCP47",           String,    Intern;
    TagDefault                 = 0x4484,      "TagDefault",                 Unsigned,  Intern;
    TagDefaultBogus            = 0x44B4,      "TagDefaultBogus",            Unsigned,  Intern;
    TagString                  = 0x4487,      "TagString",                  Utf8,      Intern;
    TagBinary                  = 0x4485,      "TagBinary",                  Binary,    Intern;
}

impl TypeTag for EbmlId {
    fn matches_name(&self, name: &str) -> bool {
        match lookup(*self) {
            Some(entry) => entry.name == name,
            None => name == self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_resolve() {
        assert_eq!(lookup(SEGMENT).unwrap().name, "Segment");
        assert_eq!(lookup(CODEC_ID).unwrap().kind, ElementKind::String);
        assert_eq!(lookup(TRACK_TYPE).unwrap().disposition, Disposition::Special);
        assert_eq!(lookup(SIMPLE_BLOCK).unwrap().disposition, Disposition::Skip);
        assert_eq!(lookup(CODEC_PRIVATE).unwrap().disposition, Disposition::Skip);
        assert_eq!(lookup(OUTPUT_SAMPLING_FREQUENCY).unwrap().kind, ElementKind::Float);
        assert!(lookup(EbmlId(0x7FFF_4242)).is_none());
    }

    #[test]
    fn uid_family_is_uuid_kind() {
        for id in [SEGMENT_UID, PREV_UID, NEXT_UID, SEGMENT_FAMILY] {
            let entry = lookup(id).unwrap();
            assert_eq!(entry.kind, ElementKind::Uuid);
            assert_eq!(entry.disposition, Disposition::Special);
        }
    }

    #[test]
    fn names_match_paths() {
        assert!(SEGMENT.matches_name("Segment"));
        assert!(CODEC_ID.matches_name("CodecID"));
        assert!(!CODEC_ID.matches_name("CodecId"));
        assert!(EbmlId(0xE7).matches_name("Timestamp"));
    }
}
