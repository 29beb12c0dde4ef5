use std::io::Write;

use bencode_viewer::{
    build, decode, decode_file, decode_reader, encode, render_hex, Document, Error, FormatError,
    NodeKind, TreeNode, Value,
};

fn torrent() -> Vec<u8> {
    let mut t = Vec::new();
    t.extend_from_slice(b"d8:announce30:http://tracker.example.com/ann");
    t.extend_from_slice(b"13:announce-listll30:http://tracker.example.com/annee");
    t.extend_from_slice(b"7:comment4:test13:creation datei1456835405e");
    t.extend_from_slice(b"4:infod5:filesl");
    t.extend_from_slice(b"d6:lengthi12345e4:pathl3:dir5:a.txtee");
    t.extend_from_slice(b"d6:lengthi1e4:pathl5:b.binee");
    t.extend_from_slice(b"e4:name4:demo12:piece lengthi16384e6:pieces20:");
    t.extend_from_slice(&PIECES);
    t.extend_from_slice(b"ee");
    t
}

const PIECES: [u8; 20] = [
    0x9f, 0x00, 0xc3, 0x28, 0xff, 0x10, 0x20, 0x30, 0x40, 0x50, 0xa0, 0xb1, 0xc2, 0xd3, 0xe4,
    0xf5, 0x06, 0x17, 0x28, 0x39,
];

// Value node that follows the key node labelled `key`.
fn dict_value<'a>(node: &'a TreeNode, key: &str) -> &'a TreeNode {
    let index = node.children.iter().step_by(2).position(|k| k.label == key).unwrap();
    &node.children[index * 2 + 1]
}

fn dict_keys(node: &TreeNode) -> Vec<Vec<u8>> {
    node.children
        .iter()
        .step_by(2)
        .map(|k| k.raw.as_byte_string().unwrap().as_bytes().to_vec())
        .collect()
}

#[test]
fn decode_torrent_roundtrip() {
    let input = torrent();
    let value = decode(&input).unwrap();
    assert_eq!(input, encode(&value));

    let info = value.get(b"info").unwrap();
    assert_eq!(Some(16384), info.get(b"piece length").and_then(Value::as_integer));
    assert_eq!(20, info.get(b"pieces").and_then(Value::as_byte_string).unwrap().len());
}

#[test]
fn every_subtree_reencodes_to_its_source_bytes() {
    let input = torrent();
    let tree = build(&decode(&input).unwrap());
    for (path, node) in tree.walk() {
        let bytes = node.raw_bytes();
        let found = input.windows(bytes.len()).any(|w| w == bytes.as_slice());
        assert!(found, "node {:?} ({}) does not appear in the input", path, node.label);
    }
}

#[test]
fn dictionary_children_are_sorted() {
    let inputs: [&[u8]; 3] = [
        b"d1:bi1e1:ai2e1:ci3ee",
        b"d2:aai1e1:ai2e1:Zi3e1:zd1:yi0e1:xi0eee",
        b"d3:\xff\x00\x01i1e1:\x7fi2e0:i3ee",
    ];
    for input in inputs {
        for (_, node) in build(&decode(input).unwrap()).walk() {
            if node.kind != NodeKind::Dict {
                continue;
            }
            let keys = dict_keys(node);
            assert!(keys.windows(2).all(|w| w[0] < w[1]), "{:?}", keys);
            assert_eq!(node.raw.as_dict().unwrap().len() * 2, node.children.len());
        }
    }
}

#[test]
fn list_children_keep_input_order() {
    let node = build(&decode(b"li3ei1ei2e1:c1:a1:be").unwrap());
    let labels: Vec<&str> = node.children.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(vec!["3", "1", "2", "c", "a", "b"], labels);
}

#[test]
fn dictionary_children_alternate_key_and_value() {
    let node = build(&decode(b"d3:bar4:spam3:fooi42ee").unwrap());
    let children: Vec<(&str, NodeKind)> =
        node.children.iter().map(|c| (c.label.as_str(), c.kind)).collect();
    assert_eq!(
        vec![
            ("bar", NodeKind::String),
            ("spam", NodeKind::String),
            ("foo", NodeKind::String),
            ("42", NodeKind::Integer),
        ],
        children
    );
}

#[test]
fn malformed_input_is_rejected() {
    assert!(matches!(decode(b"i5"), Err(FormatError::EndOfFile { .. })));
    assert!(matches!(decode(b"5:ab"), Err(FormatError::EndOfFile { .. })));
    assert!(decode(b"d3:foo3:bar3:baz5:hellod").is_err());
    assert!(decode(b"d3:foo3:bare garbage").is_err());
}

#[test]
fn binary_pieces_render_as_hex() {
    let tree = build(&decode(&torrent()).unwrap());
    let info = dict_value(&tree, "info");
    assert_eq!("Dictionary (4 keys)", info.label);

    let pieces = dict_value(info, "pieces");
    assert_eq!(NodeKind::String, pieces.kind);
    assert_eq!("9F00C328FF1020304050A0B1C2D3E4F506172839", pieces.label);

    let files = dict_value(info, "files");
    assert_eq!("List (2 elements)", files.label);
    assert_eq!("a.txt", dict_value(&files.children[0], "path").children[1].label);
}

#[test]
fn creation_date_has_utc_hint() {
    let tree = build(&decode(&torrent()).unwrap());
    assert_eq!(
        Some("UTC: 2016-03-01T12:30:05".to_string()),
        dict_value(&tree, "creation date").utc_hint()
    );
    assert_eq!(None, dict_value(&tree, "comment").utc_hint());
}

#[test]
fn hex_dump_row_count() {
    let input = torrent();
    let dump = render_hex(&input);
    assert_eq!(input.len().div_ceil(16), dump.lines().count() - 1);
    assert_eq!(render_hex(&input), dump);
}

#[test]
fn load_from_file_and_reader() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&torrent()).unwrap();

    let from_file = decode_file(file.path()).unwrap();
    let from_reader = decode_reader(&torrent()[..]).unwrap();
    assert_eq!(from_file, from_reader);

    let doc = Document::open(file.path()).unwrap();
    assert_eq!(torrent().len(), doc.source_len);
    assert_eq!(&from_file, doc.value());
}

#[test]
fn unreadable_source_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.torrent");
    assert!(matches!(decode_file(&missing), Err(Error::Io(_))));
    assert!(matches!(Document::open(&missing), Err(Error::Io(_))));
}

#[test]
fn garbage_file_is_a_format_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"<html>not a torrent</html>").unwrap();
    let err = Document::open(file.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::Format(FormatError::UnexpectedByte { byte: b'<', offset: 0 })
    ));
}
