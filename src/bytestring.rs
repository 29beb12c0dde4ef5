use std::fmt::Display;

// Raw bencode string. Not guaranteed to be valid UTF-8.
// Ordering is byte-lexicographic, which is the canonical dictionary key order.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
pub struct ByteString(pub Vec<u8>);

impl ByteString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Strict UTF-8 view of the bytes, `None` if they are not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Display text for the viewer: the string itself when it is valid UTF-8,
    /// otherwise every byte as two uppercase hex digits with no separator.
    pub fn label(&self) -> String {
        match self.as_str() {
            Some(s) => s.to_string(),
            None => hex::encode_upper(&self.0),
        }
    }
}

pub trait ToByteString {
    fn to_byte_string(&self) -> ByteString;
}

impl ToByteString for &str {
    fn to_byte_string(&self) -> ByteString {
        ByteString(self.as_bytes().to_vec())
    }
}

impl ToByteString for &[u8] {
    fn to_byte_string(&self) -> ByteString {
        ByteString(self.to_vec())
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        ByteString(bytes)
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for ByteString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn label_utf8() {
        assert_eq!("spam", "spam".to_byte_string().label());
        assert_eq!("", "".to_byte_string().label());
        assert_eq!("größe", "größe".to_byte_string().label());
    }

    #[test]
    fn label_falls_back_to_upper_hex() {
        let bs = [0xffu8, 0x00, 0xab, 0x10].as_slice().to_byte_string();
        assert_eq!("FF00AB10", bs.label());
        assert_eq!("FF00AB10", bs.to_string());
    }

    #[test]
    fn label_truncated_multibyte_sequence_is_hex() {
        // First two bytes of a three byte UTF-8 sequence.
        let bs = [b'a', 0xe2, 0x82].as_slice().to_byte_string();
        assert_eq!(None, bs.as_str());
        assert_eq!("61E282", bs.label());
    }

    #[test]
    fn ordering_is_bytewise() {
        let mut keys = vec![
            "foo".to_byte_string(),
            "Zed".to_byte_string(),
            "bar".to_byte_string(),
            "ba".to_byte_string(),
            [0xc3u8].as_slice().to_byte_string(),
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(ByteString::label).collect();
        assert_eq!(vec!["Zed", "ba", "bar", "foo", "C3"], labels);
    }
}
