use linked_hash_map::LinkedHashMap;

use crate::bdecode::Value;
use crate::bytestring::ByteString;

/// Serializes `value` back to bencode. Dictionary keys are written in the
/// order the value holds them, so `encode(&decode(x)?) == x`.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_type(value, &mut buf);
    buf
}

fn encode_type(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Integer(int) => encode_int(*int, buf),
        Value::ByteString(bytes) => encode_bytestring(bytes, buf),
        Value::List(list) => encode_list(list, buf),
        Value::Dictionary(dict) => encode_dict(dict, buf),
    };
}

fn encode_dict(dict: &LinkedHashMap<ByteString, Value>, buf: &mut Vec<u8>) {
    buf.push(b'd');
    for (key, val) in dict.iter() {
        encode_bytestring(key, buf);
        encode_type(val, buf);
    }
    buf.push(b'e');
}

fn encode_list(list: &[Value], buf: &mut Vec<u8>) {
    buf.push(b'l');
    for item in list {
        encode_type(item, buf);
    }
    buf.push(b'e')
}

fn encode_bytestring(bs: &ByteString, buf: &mut Vec<u8>) {
    encode_num(bs.len(), buf);
    buf.push(b':');
    buf.extend_from_slice(bs.as_bytes());
}

fn encode_int(int: i64, buf: &mut Vec<u8>) {
    buf.push(b'i');
    encode_num(int, buf);
    buf.push(b'e');
}

fn encode_num<N: ToString>(num: N, buf: &mut Vec<u8>) {
    buf.extend(num.to_string().bytes());
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bdecode::decode;
    use crate::bytestring::ToByteString;

    #[test]
    fn encode_integers() {
        let mut v = Vec::new();
        for int in [0, 1234, -123, i64::MAX, i64::MIN] {
            encode_int(int, &mut v);
        }
        assert_eq!(
            b"i0ei1234ei-123ei9223372036854775807ei-9223372036854775808e".to_vec(),
            v
        );
    }

    #[test]
    fn test_encode_bytestring() {
        let mut v = Vec::new();
        encode_bytestring(&"abcd".to_byte_string(), &mut v);
        assert_eq!(b"4:abcd".to_vec(), v);

        encode_bytestring(&"".to_byte_string(), &mut v);
        assert_eq!(b"4:abcd0:".to_vec(), v);

        encode_bytestring(&b"\n\r\t\x00\xff".as_slice().to_byte_string(), &mut v);
        assert_eq!(b"4:abcd0:5:\n\r\t\x00\xff".to_vec(), v);
    }

    #[test]
    fn encode_list_inner() {
        let v = encode(&Value::List(vec![
            Value::Integer(345),
            Value::List(vec![
                Value::string("inner"),
                Value::Integer(999),
                Value::List(vec![Value::Integer(10000)]),
            ]),
            Value::string("def"),
            Value::List(vec![]),
        ]));
        assert_eq!(b"li345el5:inneri999eli10000eee3:deflee".to_vec(), v);
    }

    #[test]
    fn encode_dict_keeps_insertion_order() {
        let mut dict = LinkedHashMap::new();
        dict.insert("item2".to_byte_string(), Value::string("value"));
        dict.insert("item1".to_byte_string(), Value::Integer(123));
        assert_eq!(b"d5:item25:value5:item1i123ee".to_vec(), encode(&Value::Dictionary(dict)));
        assert_eq!(b"de".to_vec(), encode(&Value::Dictionary(LinkedHashMap::new())));
    }

    #[test]
    fn roundtrip() {
        let inputs: [&[u8]; 6] = [
            b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee",
            b"d1:ad2:xyd20:abcdefghij0123456789i555eeee",
            b"d3:zoo1:a3:bar1:be",
            b"l0:i0ei-1ele3:\x00\x01\x02dee",
            b"i-9223372036854775808e",
            b"0:",
        ];
        for input in inputs {
            assert_eq!(input.to_vec(), encode(&decode(input).unwrap()));
        }
    }
}
