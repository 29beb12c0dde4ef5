//! Core of a bencode inspector: decode a bencoded byte stream into a [`Value`],
//! project it into a display [`TreeNode`] tree with sorted dictionary keys, and
//! render the raw bytes behind any node as a hex dump.
//!
//! ```
//! use bencode_viewer::{build, decode, render_hex};
//!
//! let value = decode(b"d3:bar4:spam3:fooi42ee").unwrap();
//! let tree = build(&value);
//! assert_eq!("Dictionary (2 keys)", tree.label);
//!
//! let labels: Vec<&str> = tree.children.iter().map(|c| c.label.as_str()).collect();
//! assert_eq!(vec!["bar", "spam", "foo", "42"], labels);
//!
//! assert!(render_hex(&tree.children[1].raw_bytes()).ends_with("4:spam\n"));
//! ```

pub mod bdecode;
pub mod bencode;
pub mod bytestring;
pub mod document;
pub mod error;
pub mod hexdump;
pub mod timestamp;
pub mod tree;

pub use bdecode::{decode, decode_file, decode_prefix, decode_reader, Value};
pub use bencode::encode;
pub use bytestring::{ByteString, ToByteString};
pub use document::Document;
pub use error::{Error, FormatError};
pub use hexdump::render as render_hex;
pub use tree::{build, NodeKind, NodePath, TreeNode};
