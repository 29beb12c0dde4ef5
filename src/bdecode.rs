use std::fs;
use std::io::{self, Read};
use std::path::Path;

use linked_hash_map::LinkedHashMap;
use log::{debug, trace};
use nom::character::complete::{char, digit1};
use nom::combinator::{map, opt};
use nom::error::{ErrorKind, ParseError};
use nom::multi::length_data;
use nom::sequence::{delimited, terminated};
use nom::IResult;

use crate::bytestring::ByteString;
use crate::error::{self, FormatError};

/// Containers nested deeper than this are rejected instead of recursing further.
pub const MAX_DEPTH: usize = 256;

/// A decoded bencode datum.
///
/// Dictionaries keep their keys in the order they were read, so re-encoding a
/// decoded value reproduces its input byte for byte. Use
/// [`Value::sorted_entries`] for the canonical (sorted) view.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Value {
    Integer(i64),
    ByteString(ByteString),
    List(Vec<Value>),
    Dictionary(LinkedHashMap<ByteString, Value>),
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::ByteString(ByteString(s.as_bytes().to_vec()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::ByteString(_) => "string",
            Value::List(_) => "list",
            Value::Dictionary(_) => "dict",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_byte_string(&self) -> Option<&ByteString> {
        match self {
            Value::ByteString(bs) => Some(bs),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&LinkedHashMap<ByteString, Value>> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Looks up `key` if this is a dictionary.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(&ByteString(key.to_vec()))
    }

    /// Dictionary entries in ascending byte order of their keys, whatever order
    /// they were read in. Empty for every other variant.
    pub fn sorted_entries(&self) -> Vec<(&ByteString, &Value)> {
        let mut entries: Vec<_> = match self {
            Value::Dictionary(dict) => dict.iter().collect(),
            _ => Vec::new(),
        };
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<ByteString> for Value {
    fn from(bs: ByteString) -> Self {
        Value::ByteString(bs)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list)
    }
}

impl From<LinkedHashMap<ByteString, Value>> for Value {
    fn from(dict: LinkedHashMap<ByteString, Value>) -> Self {
        Value::Dictionary(dict)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Cause {
    Nom(ErrorKind),
    Expected(char),
    UnexpectedByte(u8),
    NegativeZero,
    LeadingZero,
    IntegerOverflow,
    NegativeStringLen,
    KeyNotAString,
    KeyWithoutValue(ByteString),
    DuplicateKey(ByteString),
    NestingTooDeep,
}

// Parser error: the unconsumed input at the point of failure plus the cause.
// The offset is recovered from the input length once parsing has stopped.
#[derive(Debug, Clone, Eq, PartialEq)]
struct ParseFailure<'a> {
    input: &'a [u8],
    cause: Cause,
}

type ParseResult<'a, T> = IResult<&'a [u8], T, ParseFailure<'a>>;

impl<'a> ParseFailure<'a> {
    fn fail<T>(input: &'a [u8], cause: Cause) -> ParseResult<'a, T> {
        Err(nom::Err::Failure(ParseFailure { input, cause }))
    }

    fn into_format_error(self, source: &[u8]) -> FormatError {
        let offset = source.len() - self.input.len();
        let at_end = self.input.is_empty();
        match self.cause {
            Cause::Nom(ErrorKind::Digit) if !at_end => FormatError::NotANumber { offset },
            Cause::Expected(expected) if !at_end => {
                FormatError::MissingIdentifier { expected, offset }
            }
            Cause::Nom(_) | Cause::Expected(_) => FormatError::EndOfFile {
                offset: source.len(),
            },
            Cause::UnexpectedByte(byte) => FormatError::UnexpectedByte { byte, offset },
            Cause::NegativeZero => FormatError::NegativeZero { offset },
            Cause::LeadingZero => FormatError::LeadingZero { offset },
            Cause::IntegerOverflow => FormatError::IntegerOverflow { offset },
            Cause::NegativeStringLen => FormatError::NegativeStringLen { offset },
            Cause::KeyNotAString => FormatError::KeyNotAString { offset },
            Cause::KeyWithoutValue(key) => FormatError::KeyWithoutValue { key, offset },
            Cause::DuplicateKey(key) => FormatError::DuplicateKey { key, offset },
            Cause::NestingTooDeep => FormatError::NestingTooDeep {
                limit: MAX_DEPTH,
                offset,
            },
        }
    }
}

impl<'a> ParseError<&'a [u8]> for ParseFailure<'a> {
    fn from_error_kind(input: &'a [u8], kind: ErrorKind) -> Self {
        ParseFailure {
            input,
            cause: Cause::Nom(kind),
        }
    }

    fn append(_: &'a [u8], _: ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: &'a [u8], c: char) -> Self {
        ParseFailure {
            input,
            cause: Cause::Expected(c),
        }
    }
}

fn parse_value(input: &[u8], depth: usize) -> ParseResult<'_, Value> {
    if depth >= MAX_DEPTH {
        return ParseFailure::fail(input, Cause::NestingTooDeep);
    }
    match input.first() {
        Some(b'i') => map(parse_integer, Value::Integer)(input),
        Some(b'l') => {
            let (rest, list) = parse_list(input, depth)?;
            Ok((rest, Value::List(list)))
        }
        Some(b'd') => {
            let (rest, dict) = parse_dict(input, depth)?;
            Ok((rest, Value::Dictionary(dict)))
        }
        Some(b'0'..=b'9') | Some(b'-') => map(parse_byte_string, Value::ByteString)(input),
        Some(&byte) => ParseFailure::fail(input, Cause::UnexpectedByte(byte)),
        None => Err(nom::Err::Error(ParseFailure::from_error_kind(
            input,
            ErrorKind::Eof,
        ))),
    }
}

fn parse_integer(input: &[u8]) -> ParseResult<'_, i64> {
    delimited(char('i'), integer_literal, char('e'))(input)
}

fn integer_literal(input: &[u8]) -> ParseResult<'_, i64> {
    let (rest, sign) = opt(char('-'))(input)?;
    let negative = sign.is_some();
    let (rest, digits) = digit1(rest)?;
    if digits.first() == Some(&b'0') {
        if negative {
            return ParseFailure::fail(input, Cause::NegativeZero);
        }
        if digits.len() > 1 {
            return ParseFailure::fail(input, Cause::LeadingZero);
        }
    }
    // Accumulate towards the sign so that i64::MIN is representable.
    let value = digits.iter().try_fold(0i64, |acc, &d| {
        let d = i64::from(d - b'0');
        let acc = acc.checked_mul(10)?;
        if negative {
            acc.checked_sub(d)
        } else {
            acc.checked_add(d)
        }
    });
    match value {
        Some(value) => Ok((rest, value)),
        None => ParseFailure::fail(input, Cause::IntegerOverflow),
    }
}

fn length_literal(input: &[u8]) -> ParseResult<'_, usize> {
    if input.first() == Some(&b'-') {
        return ParseFailure::fail(input, Cause::NegativeStringLen);
    }
    let (rest, digits) = digit1(input)?;
    if digits.len() > 1 && digits.first() == Some(&b'0') {
        return ParseFailure::fail(input, Cause::LeadingZero);
    }
    let len = digits.iter().try_fold(0usize, |acc, &d| {
        acc.checked_mul(10)?.checked_add(usize::from(d - b'0'))
    });
    match len {
        Some(len) => Ok((rest, len)),
        None => ParseFailure::fail(input, Cause::IntegerOverflow),
    }
}

fn parse_byte_string(input: &[u8]) -> ParseResult<'_, ByteString> {
    map(length_data(terminated(length_literal, char(':'))), |bytes: &[u8]| {
        ByteString(bytes.to_vec())
    })(input)
}

fn parse_list(input: &[u8], depth: usize) -> ParseResult<'_, Vec<Value>> {
    let (mut rest, _) = char('l')(input)?;
    let mut list = Vec::new();
    while rest.first().filter(|&&c| c != b'e').is_some() {
        let (next, item) = parse_value(rest, depth + 1)?;
        list.push(item);
        rest = next;
    }
    let (rest, _) = char('e')(rest)?;
    Ok((rest, list))
}

fn parse_dict(input: &[u8], depth: usize) -> ParseResult<'_, LinkedHashMap<ByteString, Value>> {
    let (mut rest, _) = char('d')(input)?;
    let mut dict = LinkedHashMap::new();
    while let Some(&c) = rest.first().filter(|&&c| c != b'e') {
        if !c.is_ascii_digit() && c != b'-' {
            return ParseFailure::fail(rest, Cause::KeyNotAString);
        }
        let (after_key, key) = parse_byte_string(rest)?;
        if matches!(after_key.first(), None | Some(b'e')) {
            return ParseFailure::fail(after_key, Cause::KeyWithoutValue(key));
        }
        if dict.contains_key(&key) {
            return ParseFailure::fail(rest, Cause::DuplicateKey(key));
        }
        let (next, value) = parse_value(after_key, depth + 1)?;
        dict.insert(key, value);
        rest = next;
    }
    let (rest, _) = char('e')(rest)?;
    Ok((rest, dict))
}

/// Decodes the single value at the start of `bytes` and returns it together
/// with the number of bytes it occupied. Anything after it is left alone.
pub fn decode_prefix(bytes: &[u8]) -> Result<(Value, usize), FormatError> {
    match parse_value(bytes, 0) {
        Ok((rest, value)) => Ok((value, bytes.len() - rest.len())),
        Err(nom::Err::Incomplete(_)) => Err(FormatError::EndOfFile {
            offset: bytes.len(),
        }),
        Err(nom::Err::Error(failure)) | Err(nom::Err::Failure(failure)) => {
            Err(failure.into_format_error(bytes))
        }
    }
}

/// Decodes `bytes`, which must hold exactly one bencoded value.
pub fn decode(bytes: &[u8]) -> Result<Value, FormatError> {
    let (value, consumed) = decode_prefix(bytes)?;
    if consumed != bytes.len() {
        return Err(FormatError::TrailingData { offset: consumed });
    }
    trace!("decoded {} bytes into a {}", consumed, value.type_name());
    Ok(value)
}

/// Reads the whole source into memory, then decodes it.
/// Reads `reader` to the end. Decoding needs the whole source in memory.
pub(crate) fn read_source<R: Read>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

pub fn decode_reader<R: Read>(reader: R) -> error::Result<Value> {
    Ok(decode(&read_source(reader)?)?)
}

pub fn decode_file<P: AsRef<Path>>(path: P) -> error::Result<Value> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(decode(&bytes)?)
}
