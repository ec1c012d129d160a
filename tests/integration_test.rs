//! End-to-end tests over `.cub` files on disk

use std::fs;

use tempfile::TempDir;

use cubits::escape::deserialize_run;
use cubits::writer::encode_content;
use cubits::{
    encode_byte, load_document, save_document, Document, DocumentCodec, DocumentError,
    DocumentMetadata,
};

fn full_metadata() -> DocumentMetadata {
    let mut meta = DocumentMetadata::generated()
        .with_title("Quarterly notes")
        .with_author("R. Diaz")
        .with_description("Numbers, quotes \"and\" \\backslashes\\");
    meta.set_tags_from_csv("finance, q3, ");
    meta
}

#[test]
fn save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.cub");
    let text = "Total: 42\u{a3}\n\ttabbed \\x00 literal\n\u{0}\u{1}\u{ff}";
    let meta = full_metadata();

    save_document(&path, text, Some(&meta)).unwrap();
    let (loaded_text, loaded_meta) = load_document(&path).unwrap();

    assert_eq!(loaded_text, text);
    assert_eq!(loaded_meta, meta);
    assert_eq!(loaded_meta.tags, Some(vec!["finance".to_string(), "q3".to_string()]));
}

#[test]
fn saved_file_is_single_base64_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plain.cub");
    save_document(&path, &"lorem ipsum ".repeat(200), None).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(!raw.contains('\n'));
    assert!(raw
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')));
}

#[test]
fn default_metadata_is_generated_per_call() {
    let codec = DocumentCodec::new();
    let (_, first) = codec.decode(&codec.encode("a", None).unwrap()).unwrap();
    let (_, second) = codec.decode(&codec.encode("b", None).unwrap()).unwrap();

    assert_eq!(first.encoding.as_deref(), Some("UTF-8-CUBITs"));
    assert_eq!(second.encoding.as_deref(), Some("UTF-8-CUBITs"));
    assert!(first.title.is_none() && second.title.is_none());
}

#[test]
fn truncated_file_reports_failure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cut.cub");
    save_document(&path, "content that must not half-load", None).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    fs::write(&path, &raw[..raw.len() - 1]).unwrap();

    match load_document(&path) {
        Err(DocumentError::Decode(_)) => {}
        other => panic!("expected decode failure, got {:?}", other),
    }
}

#[test]
fn zero_byte_content_run() {
    let run = encode_byte(0x00);
    assert_eq!(run.len(), 24);
    for token in run.chunks(4) {
        assert_eq!(token[0], b'\\');
        assert_eq!(token[1], b'x');
        assert!(token[2..]
            .iter()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b)));
    }
    assert_eq!(deserialize_run(&run), vec![0u8; 6]);
}

#[test]
fn malformed_escape_inside_content() {
    let mut content = encode_content("ab").unwrap();
    content.extend_from_slice(b"\\xZZ");
    content.extend_from_slice(&encode_content("cd").unwrap());

    let values = deserialize_run(b"\\xZZ!");
    assert_eq!(values, vec![0, b'!']);

    let text = cubits::reader::decode_content(&content);
    assert_eq!(text, "ab\u{0}cd");
}

#[test]
fn metadata_edge_cases_round_trip() {
    let codec = DocumentCodec::new();
    let cases = [
        DocumentMetadata::new(),
        DocumentMetadata::new().with_tags(Vec::<String>::new()),
        DocumentMetadata::new()
            .with_title("")
            .with_description("emoji \u{1f600} and \u{4e2d}\u{6587} in metadata are fine"),
    ];

    for meta in cases {
        let doc = codec.encode("x", Some(&meta)).unwrap();
        let (_, decoded) = codec.decode(&doc).unwrap();
        assert_eq!(decoded, meta);
    }
}

#[test]
fn document_edit_cycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cycle.cub");

    let mut doc = Document::new();
    doc.set_text("draft 1");
    doc.save_to(&path).unwrap();
    let first_modified = doc.metadata().modified.clone();

    let mut reopened = Document::open(&path).unwrap();
    reopened.set_text("draft 2");
    reopened.metadata_mut().author = Some("editor".to_string());
    reopened.save().unwrap();

    let (text, meta) = load_document(&path).unwrap();
    assert_eq!(text, "draft 2");
    assert_eq!(meta.author.as_deref(), Some("editor"));
    assert_eq!(meta.created, doc.metadata().created);
    assert!(meta.modified.is_some());
    assert!(first_modified.is_some());
}
