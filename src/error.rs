use thiserror::Error;

use crate::bytestring::ByteString;

/// Why a byte stream was rejected as bencode. Every variant records the
/// offset into the input at which the problem was detected.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FormatError {
    #[error("Unexpected end of input at offset {offset}")]
    EndOfFile { offset: usize },
    #[error("Expected identifier '{expected}' at offset {offset}")]
    MissingIdentifier { expected: char, offset: usize },
    #[error("Unexpected byte 0x{byte:02x} at offset {offset}")]
    UnexpectedByte { byte: u8, offset: usize },
    #[error("Expected a number at offset {offset}")]
    NotANumber { offset: usize },
    #[error("Negative zero is not allowed at offset {offset}. Use 0 instead")]
    NegativeZero { offset: usize },
    #[error("Leading zeros are not allowed at offset {offset}")]
    LeadingZero { offset: usize },
    #[error("Number at offset {offset} does not fit in 64 bits")]
    IntegerOverflow { offset: usize },
    #[error("Negative string length is not allowed at offset {offset}")]
    NegativeStringLen { offset: usize },
    #[error("Dictionary key at offset {offset} is not a string")]
    KeyNotAString { offset: usize },
    #[error("Dictionary key '{key}' without value at offset {offset}")]
    KeyWithoutValue { key: ByteString, offset: usize },
    #[error("Duplicate dictionary key '{key}' at offset {offset}")]
    DuplicateKey { key: ByteString, offset: usize },
    #[error("Nesting deeper than {limit} levels at offset {offset}")]
    NestingTooDeep { limit: usize, offset: usize },
    #[error("Trailing data after value at offset {offset}")]
    TrailingData { offset: usize },
}

impl FormatError {
    pub fn offset(&self) -> usize {
        match self {
            FormatError::EndOfFile { offset }
            | FormatError::MissingIdentifier { offset, .. }
            | FormatError::UnexpectedByte { offset, .. }
            | FormatError::NotANumber { offset }
            | FormatError::NegativeZero { offset }
            | FormatError::LeadingZero { offset }
            | FormatError::IntegerOverflow { offset }
            | FormatError::NegativeStringLen { offset }
            | FormatError::KeyNotAString { offset }
            | FormatError::KeyWithoutValue { offset, .. }
            | FormatError::DuplicateKey { offset, .. }
            | FormatError::NestingTooDeep { offset, .. }
            | FormatError::TrailingData { offset } => *offset,
        }
    }
}

/// Failure to load a document: the source could not be read, or it was read
/// but is not bencode.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not a bencoded file: {0}")]
    Format(#[from] FormatError),
}

pub type Result<T> = std::result::Result<T, Error>;
