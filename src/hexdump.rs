//! Fixed-layout hex dump: an offset column, sixteen hex columns split into two
//! groups of eight, and a printable-ASCII column.
//!
//! ```text
//! Offset   00 01 02 03 04 05 06 07  08 09 0A 0B 0C 0D 0E 0F   Text
//! 00000000 64 33 3A 62 61 72 34 3A  73 70 61 6D 33 3A 66 6F   d3:bar4:spam3:fo
//! 00000010 6F 69 34 32 65 65                                  oi42ee
//! ```

pub const HEADER: &str = "Offset   00 01 02 03 04 05 06 07  08 09 0A 0B 0C 0D 0E 0F   Text";

const ROW_LEN: usize = 16;
const GROUP_LEN: usize = 8;

/// Renders `bytes` as a hex dump. The output always starts with [`HEADER`]
/// and has one row per started block of sixteen bytes; every line, the last
/// one included, ends with a newline.
pub fn render(bytes: &[u8]) -> String {
    let rows = bytes.len().div_ceil(ROW_LEN);
    // header + newline, then offset, hex columns, gap and text per row
    let mut out = String::with_capacity((HEADER.len() + 1) * (rows + 1));
    out.push_str(HEADER);
    out.push('\n');
    for (row, chunk) in bytes.chunks(ROW_LEN).enumerate() {
        render_row(row * ROW_LEN, chunk, &mut out);
    }
    out
}

fn render_row(offset: usize, chunk: &[u8], out: &mut String) {
    out.push_str(&format!("{:08x}", offset));
    for column in 0..ROW_LEN {
        if column % GROUP_LEN == 0 {
            out.push(' ');
        }
        match chunk.get(column) {
            Some(byte) => out.push_str(&format!("{:02X} ", byte)),
            None => out.push_str("   "),
        }
    }
    out.push_str("  ");
    out.extend(chunk.iter().map(|&b| printable(b)));
    out.push('\n');
}

fn printable(byte: u8) -> char {
    if byte > 32 && byte < 127 {
        byte as char
    } else {
        '.'
    }
}
