use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::info;

use bencode_viewer::{render_hex, Document, NodePath, TreeNode};

/// Labels longer than this are cut unless `--full` is given.
const LABEL_LIMIT: usize = 120;

#[derive(Parser, Debug)]
#[command(name = "bencode-viewer", author, version, about = "Inspect bencoded files", long_about = None)]
pub struct Cli {
    /// Raise the log level (-v debug, -vv trace). RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the decoded structure as an indented tree
    Tree {
        /// Bencoded file to open
        file: PathBuf,
        /// Do not print nodes deeper than this
        #[arg(long)]
        max_depth: Option<usize>,
        /// Show a UTC time next to integers that look like Unix timestamps
        #[arg(short, long)]
        timestamps: bool,
        /// Prefix every row with its node path, as accepted by `hex --node`
        #[arg(short, long)]
        paths: bool,
        /// Never shorten long labels
        #[arg(long)]
        full: bool,
    },
    /// Hex dump of the bencoded bytes of one node
    Hex {
        /// Bencoded file to open
        file: PathBuf,
        /// Node path such as 0.3.1 (child indices from the root)
        #[arg(short, long, default_value = ".")]
        node: NodePath,
    },
    /// Hex dump of a file as stored, without decoding it
    Dump {
        /// Any file
        file: PathBuf,
    },
}

#[derive(Debug, Default, Clone)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub timestamps: bool,
    pub paths: bool,
    pub full: bool,
}

pub fn run<W: Write>(command: &Command, out: &mut W) -> Result<()> {
    match command {
        Command::Tree {
            file,
            max_depth,
            timestamps,
            paths,
            full,
        } => {
            let doc = open(file)?;
            let options = TreeOptions {
                max_depth: *max_depth,
                timestamps: *timestamps,
                paths: *paths,
                full: *full,
            };
            write_tree(&doc.tree, &options, out)?;
        }
        Command::Hex { file, node } => {
            let doc = open(file)?;
            let target = doc
                .node(node)
                .with_context(|| format!("No node at path {} in {}", node, file.display()))?;
            out.write_all(target.hex_dump().as_bytes())?;
        }
        Command::Dump { file } => {
            let bytes =
                fs::read(file).with_context(|| format!("Could not open {}", file.display()))?;
            out.write_all(render_hex(&bytes).as_bytes())?;
        }
    }
    out.flush()?;
    Ok(())
}

fn open(file: &Path) -> Result<Document> {
    let doc = Document::open(file).with_context(|| format!("Could not open {}", file.display()))?;
    info!("opened {} ({} bytes)", file.display(), doc.source_len);
    Ok(doc)
}

pub fn write_tree<W: Write>(root: &TreeNode, options: &TreeOptions, out: &mut W) -> io::Result<()> {
    for (path, node) in root.walk() {
        if options.max_depth.is_some_and(|max| path.len() > max) {
            continue;
        }
        let indent = "  ".repeat(path.len());
        if options.paths {
            write!(out, "{}[{}] ", indent, NodePath(path))?;
        } else {
            write!(out, "{}", indent)?;
        }
        write!(out, "{}", display_label(&node.label, options.full))?;
        if options.timestamps {
            if let Some(hint) = node.utc_hint() {
                write!(out, "  ({})", hint)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

// Keeps every row on one line: control characters are escaped and, unless
// `full`, long labels are cut at LABEL_LIMIT characters.
fn display_label(label: &str, full: bool) -> String {
    let label = if label.chars().any(char::is_control) {
        format!("{:?}", label)
    } else {
        label.to_string()
    };
    if full || label.chars().count() <= LABEL_LIMIT {
        return label;
    }
    let cut: String = label.chars().take(LABEL_LIMIT).collect();
    format!("{}...", cut)
}
