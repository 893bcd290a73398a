use boxtree::prelude::*;
use std::io::Cursor;

fn esize(n: u64) -> Vec<u8> {
    if n < 127 {
        vec![0x80 | n as u8]
    } else {
        let mut v = vec![0x01];
        v.extend_from_slice(&n.to_be_bytes()[1..]);
        v
    }
}

fn el(id: &[u8], body: &[u8]) -> Vec<u8> {
    let mut v = id.to_vec();
    v.extend_from_slice(&esize(body.len() as u64));
    v.extend_from_slice(body);
    v
}

fn uint(v: u64) -> Vec<u8> {
    let bytes = v.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    bytes[first..].to_vec()
}

const EBML_ID: &[u8] = &[0x1A, 0x45, 0xDF, 0xA3];
const DOC_TYPE: &[u8] = &[0x42, 0x82];
const DOC_TYPE_VERSION: &[u8] = &[0x42, 0x87];
const DOC_TYPE_READ_VERSION: &[u8] = &[0x42, 0x85];
const EBML_VERSION: &[u8] = &[0x42, 0x86];
const EBML_READ_VERSION: &[u8] = &[0x42, 0xF7];
const MAX_ID_LENGTH: &[u8] = &[0x42, 0xF2];
const MAX_SIZE_LENGTH: &[u8] = &[0x42, 0xF3];
const CRC: &[u8] = &[0xBF];
const VOID: &[u8] = &[0xEC];

fn header(doctype: &str) -> Vec<u8> {
    let body = [
        el(DOC_TYPE, doctype.as_bytes()),
        el(DOC_TYPE_VERSION, &uint(1)),
        el(DOC_TYPE_READ_VERSION, &uint(1)),
    ]
    .concat();
    el(EBML_ID, &body)
}

fn parse(data: Vec<u8>) -> EbmlFile<Cursor<Vec<u8>>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut file = EbmlFile::new(Cursor::new(data)).unwrap();
    file.parse(&ParseOptions::default()).unwrap();
    file
}

fn parse_err(data: Vec<u8>) -> Error {
    let mut file = EbmlFile::new(Cursor::new(data)).unwrap();
    file.parse(&ParseOptions::default()).unwrap_err()
}

#[test]
fn header_defaults_are_seeded() {
    let file = parse(header("tape"));
    assert_eq!(file.documents.len(), 1);
    let doc = &file.documents[0];
    assert_eq!(doc.version, 1);
    assert_eq!(doc.read_version, 1);
    assert_eq!(doc.max_id_length, 4);
    assert_eq!(doc.max_size_length, 8);
    assert_eq!(doc.doctype, "tape");
    assert_eq!(doc.doctype_version, 1);
    assert_eq!(doc.doctype_read_version, 1);
    assert!(doc.body.is_none());
}

#[test]
fn header_fields_are_interned() {
    let body = [
        el(EBML_VERSION, &uint(1)),
        el(EBML_READ_VERSION, &uint(1)),
        el(MAX_ID_LENGTH, &uint(4)),
        el(MAX_SIZE_LENGTH, &uint(8)),
        el(DOC_TYPE, b"matroska"),
        el(DOC_TYPE_VERSION, &uint(4)),
        el(DOC_TYPE_READ_VERSION, &uint(2)),
    ]
    .concat();
    let data = [el(EBML_ID, &body), el(&[0x18, 0x53, 0x80, 0x67], &[])].concat();

    let file = parse(data);
    let doc = &file.documents[0];
    assert_eq!(doc.doctype, "matroska");
    assert_eq!(doc.doctype_version, 4);
    assert_eq!(doc.doctype_read_version, 2);

    // Header children hang off the header node in file order.
    let kids: Vec<_> = file.tree.children(doc.header).collect();
    assert_eq!(kids.len(), 7);
    assert_eq!(
        file.tree.node(kids[4]).payload.as_str(),
        Some("matroska")
    );
    assert_eq!(file.tree.node(kids[5]).payload.as_unsigned(), Some(4));
}

#[test]
fn first_element_must_be_the_ebml_magic() {
    let data = el(&[0x18, 0x53, 0x80, 0x67], &[]);
    assert!(matches!(parse_err(data), Error::EbmlHeaderMissingOrCorrupt));

    let garbage = vec![0xFF, 0x00, 0x00, 0x00];
    assert!(matches!(
        parse_err(garbage),
        Error::EbmlHeaderMissingOrCorrupt
    ));
}

#[test]
fn header_field_bounds() {
    let with_field = |field: Vec<u8>| {
        let body = [field, el(DOC_TYPE, b"tape")].concat();
        el(EBML_ID, &body)
    };

    assert!(matches!(
        parse_err(with_field(el(EBML_VERSION, &[0, 2]))),
        Error::EbmlHeaderUnexpectedFieldLength { length: 2, .. }
    ));
    assert!(matches!(
        parse_err(with_field(el(EBML_VERSION, &uint(2)))),
        Error::UnsupportedEbmlVersion(2)
    ));
    assert!(matches!(
        parse_err(with_field(el(EBML_READ_VERSION, &uint(3)))),
        Error::UnsupportedEbmlVersion(3)
    ));
    assert!(matches!(
        parse_err(with_field(el(MAX_ID_LENGTH, &uint(3)))),
        Error::MaxIdLengthInvalid(3)
    ));
    assert!(matches!(
        parse_err(with_field(el(MAX_SIZE_LENGTH, &uint(9)))),
        Error::MaxSizeInvalid(9)
    ));
    assert!(matches!(
        parse_err(with_field(el(DOC_TYPE_VERSION, &uint(0)))),
        Error::DocTypeVersionInvalid
    ));
}

#[test]
fn doctype_validation() {
    // Absent entirely.
    let data = el(EBML_ID, &el(DOC_TYPE_VERSION, &uint(1)));
    assert!(matches!(parse_err(data), Error::DocTypeEmpty));

    // Declared but empty.
    let data = el(EBML_ID, &el(DOC_TYPE, &[]));
    assert!(matches!(parse_err(data), Error::DocTypeEmpty));

    // Longer than the 1024-byte bound.
    let long = vec![b'x'; 1025];
    let data = el(EBML_ID, &el(DOC_TYPE, &long));
    assert!(matches!(parse_err(data), Error::DocTypeTooLong(1025)));

    // Read version above the doctype version.
    let body = [
        el(DOC_TYPE, b"tape"),
        el(DOC_TYPE_VERSION, &uint(1)),
        el(DOC_TYPE_READ_VERSION, &uint(2)),
    ]
    .concat();
    assert!(matches!(
        parse_err(el(EBML_ID, &body)),
        Error::DocTypeReadVersionInvalid
    ));
}

#[test]
fn nested_ebml_magic_is_a_duplicate() {
    let body = [el(DOC_TYPE, b"tape"), el(EBML_ID, &[])].concat();
    assert!(matches!(
        parse_err(el(EBML_ID, &body)),
        Error::EbmlHeaderDuplicated
    ));
}

#[test]
fn void_is_recorded_but_skipped() {
    let body = [el(DOC_TYPE, b"tape"), el(VOID, &[0u8; 9])].concat();
    let file = parse(el(EBML_ID, &body));
    let doc = &file.documents[0];

    let kids: Vec<_> = file.tree.children(doc.header).collect();
    assert_eq!(kids.len(), 2);
    let void = file.tree.node(kids[1]);
    assert_eq!(void.payload_size, 9);
    assert!(matches!(void.payload, Payload::None));
}

#[test]
fn header_crc_is_verified() {
    let rest = [el(DOC_TYPE, b"tape"), el(DOC_TYPE_VERSION, &uint(1))].concat();
    let crc = crc32fast::hash(&rest);
    let body = [el(CRC, &crc.to_le_bytes()), rest.clone()].concat();
    let good = el(EBML_ID, &body);
    let file = parse(good.clone());
    let doc = &file.documents[0];
    let first = file.tree.children(doc.header).next().unwrap();
    assert_eq!(
        file.tree.node(first).payload.as_unsigned(),
        Some(u64::from(crc))
    );

    // One flipped byte inside the covered range.
    let mut bad = good;
    let n = bad.len();
    bad[n - 1] ^= 0x20;
    assert!(matches!(parse_err(bad), Error::InvalidCrc { .. }));

    // A CRC element of the wrong width.
    let body = [el(CRC, &[1, 2, 3, 4, 5]), el(DOC_TYPE, b"tape")].concat();
    assert!(matches!(
        parse_err(el(EBML_ID, &body)),
        Error::InvalidCrcSize(5)
    ));
}

#[test]
fn concatenated_documents() {
    // First document: unknown doctype, one opaque top-level element.
    let doc1 = [header("files"), el(&[0x4F, 0xFE], b"opaque payload")].concat();
    // Second document: another doctype, nothing else.
    let doc2 = header("tape");
    let data = [doc1, doc2].concat();

    let file = parse(data);
    assert_eq!(file.documents.len(), 2);
    assert_eq!(file.documents[0].doctype, "files");
    assert_eq!(file.documents[1].doctype, "tape");

    // The generic engine records the element without interning it.
    let body = file.documents[0].body.expect("body node");
    let node = file.tree.node(body);
    assert_eq!(node.id, EbmlId(0x4FFE));
    assert_eq!(node.payload_size, 14);
    assert!(matches!(node.payload, Payload::None));
    assert!(file.documents[1].body.is_none());

    // Top-level nodes sit at level 1 in document order.
    let levels: Vec<u32> = file
        .tree
        .children(file.tree.root())
        .map(|id| file.tree.node(id).level)
        .collect();
    assert_eq!(levels, vec![1, 1, 1]);
}

#[test]
fn empty_input_is_rejected() {
    assert!(matches!(
        EbmlFile::new(Cursor::new(Vec::new())),
        Err(Error::FileEmpty)
    ));
}
