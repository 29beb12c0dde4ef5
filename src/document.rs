use std::fs;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::bdecode::{self, Value};
use crate::error::{self, FormatError};
use crate::tree::{self, NodePath, TreeNode};

/// One opened file: its decoded tree plus the size of the source.
///
/// A document is built in a single pass and never modified. Opening another
/// file means building a new `Document`; if that fails the caller still holds
/// the previous one untouched.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Document {
    pub source_len: usize,
    pub tree: TreeNode,
}

impl Document {
    pub fn from_bytes(bytes: &[u8]) -> Result<Document, FormatError> {
        let value = bdecode::decode(bytes)?;
        let tree = tree::build(&value);
        debug!("decoded {} bytes into {} nodes", bytes.len(), tree.count());
        Ok(Document {
            source_len: bytes.len(),
            tree,
        })
    }

    pub fn read<R: Read>(reader: R) -> error::Result<Document> {
        let bytes = bdecode::read_source(reader)?;
        Ok(Document::from_bytes(&bytes)?)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> error::Result<Document> {
        let path = path.as_ref();
        debug!("opening {}", path.display());
        let bytes = fs::read(path)?;
        Ok(Document::from_bytes(&bytes)?)
    }

    /// The decoded root value.
    pub fn value(&self) -> &Value {
        &self.tree.raw
    }

    pub fn node(&self, path: &NodePath) -> Option<&TreeNode> {
        self.tree.get(path.as_slice())
    }
}
