use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::bdecode::Value;
use crate::bencode;
use crate::hexdump;
use crate::timestamp;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum NodeKind {
    Integer,
    String,
    List,
    Dict,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            NodeKind::Integer => "integer",
            NodeKind::String => "string",
            NodeKind::List => "list",
            NodeKind::Dict => "dict",
        };
        f.write_str(name)
    }
}

impl From<&Value> for NodeKind {
    fn from(value: &Value) -> Self {
        match value {
            Value::Integer(_) => NodeKind::Integer,
            Value::ByteString(_) => NodeKind::String,
            Value::List(_) => NodeKind::List,
            Value::Dictionary(_) => NodeKind::Dict,
        }
    }
}

/// Display projection of a [`Value`]. Every node owns the value it was built
/// from, so the bytes behind any row can be regenerated on demand.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TreeNode {
    pub label: String,
    pub kind: NodeKind,
    pub raw: Value,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: String, raw: Value) -> TreeNode {
        TreeNode {
            label,
            kind: NodeKind::from(&raw),
            raw,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Follows child indices down from this node. An empty path is the node itself.
    pub fn get(&self, path: &[usize]) -> Option<&TreeNode> {
        path.iter().try_fold(self, |node, &index| node.children.get(index))
    }

    /// Bencoding of this node's value, byte for byte what it was decoded from.
    pub fn raw_bytes(&self) -> Vec<u8> {
        bencode::encode(&self.raw)
    }

    pub fn hex_dump(&self) -> String {
        hexdump::render(&self.raw_bytes())
    }

    /// `UTC: <time>` for integers that could be Unix timestamps
    /// (`0..=2147483647`), `None` for everything else.
    pub fn utc_hint(&self) -> Option<String> {
        match self.raw {
            Value::Integer(secs) => timestamp::utc_iso8601(secs).map(|t| format!("UTC: {}", t)),
            _ => None,
        }
    }

    /// Depth-first pre-order walk, yielding each node with its path from `self`.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(Vec::new(), self)],
        }
    }

    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }
}

pub struct Walk<'a> {
    stack: Vec<(Vec<usize>, &'a TreeNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (Vec<usize>, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for (index, child) in node.children.iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(index);
            self.stack.push((child_path, child));
        }
        Some((path, node))
    }
}

/// Builds the display tree for `value`.
///
/// Lists keep their order. Dictionary entries are sorted by key bytes and
/// each contributes two children, the key and then its value.
pub fn build(value: &Value) -> TreeNode {
    let node = build_node(value);
    trace!("built tree with {} nodes", node.count());
    node
}

fn build_node(value: &Value) -> TreeNode {
    match value {
        Value::Integer(i) => TreeNode::leaf(i.to_string(), value.clone()),
        Value::ByteString(bs) => TreeNode::leaf(bs.label(), value.clone()),
        Value::List(list) => TreeNode {
            label: format!("List ({} elements)", list.len()),
            kind: NodeKind::List,
            raw: value.clone(),
            children: list.iter().map(build_node).collect(),
        },
        Value::Dictionary(dict) => {
            let mut children = Vec::with_capacity(dict.len() * 2);
            for (key, val) in value.sorted_entries() {
                children.push(TreeNode::leaf(key.label(), Value::ByteString(key.clone())));
                children.push(build_node(val));
            }
            TreeNode {
                label: format!("Dictionary ({} keys)", dict.len()),
                kind: NodeKind::Dict,
                raw: value.clone(),
                children,
            }
        }
    }
}

/// A node address such as `0.3.1`: child indices separated by dots.
/// The empty string and `.` both address the root.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl FromStr for NodePath {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "." {
            return Ok(NodePath::default());
        }
        s.split('.')
            .map(str::parse)
            .collect::<Result<Vec<usize>, _>>()
            .map(NodePath)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(".");
        }
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}
