use crate::{ParseError, ParseResult};

const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const BASE64_VALUES: [i8; 256] = get_base64_map();

const fn get_base64_map() -> [i8; 256] {
    let mut res = [-1i8; 256];
    // `for in` is not allowed in const fn
    let mut idx = 0;
    while idx < 64 {
        res[BASE64_CHARS[idx] as usize] = idx as i8;
        idx += 1;
    }
    res
}

/// Appends base64 VLQ digits to a byte buffer.
///
/// A signed value is zig-zag transformed (sign bit in the least significant
/// bit) and emitted as 5-bit groups, least significant first, with bit 5 of
/// each non-final digit marking continuation.
#[derive(Debug)]
pub(crate) struct VlqEncoder<'a> {
    buf: &'a mut Vec<u8>,
}

impl<'a> VlqEncoder<'a> {
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        Self { buf }
    }

    pub fn encode(&mut self, value: i64) {
        let mut num = if value < 0 {
            (((-value) as u64) << 1) | 1
        } else {
            (value as u64) << 1
        };

        loop {
            let mut digit = (num & 0b11111) as usize;
            num >>= 5;
            if num != 0 {
                digit |= 1 << 5;
            }
            self.buf.push(BASE64_CHARS[digit]);
            if num == 0 {
                break;
            }
        }
    }
}

/// Decodes one segment (the run of digits between `;`/`,` separators) into
/// its VLQ values.
///
/// The segment grammar admits exactly 1, 4, or 5 values; anything else is
/// malformed, as are characters outside the base64 alphabet and dangling
/// continuation bits.
#[derive(Debug)]
pub(crate) struct VlqDecoder {
    buf: [i64; 5],
}

impl VlqDecoder {
    pub fn new() -> Self {
        Self { buf: [0; 5] }
    }

    pub fn decode(&mut self, segment: &str) -> ParseResult<&[i64]> {
        let mut len = 0;

        let mut cur_value: i64 = 0;
        let mut shift = 0;

        for byte in segment.bytes() {
            let value = BASE64_VALUES[byte as usize] as i64;
            if value < 0 {
                return Err(ParseError::MappingMalformed(segment.to_owned()));
            }

            // reject digits whose bits would be shifted out of an i64
            let val = value & 0b11111;
            let shifted = val
                .checked_shl(shift)
                .filter(|shifted| shifted >> shift == val)
                .ok_or_else(|| ParseError::MappingMalformed(segment.to_owned()))?;
            cur_value = cur_value
                .checked_add(shifted)
                .ok_or_else(|| ParseError::MappingMalformed(segment.to_owned()))?;
            shift += 5;

            if value & 0b100000 == 0 {
                if len > 4 {
                    return Err(ParseError::MappingMalformed(segment.to_owned()));
                }

                let is_negative = (cur_value & 1) == 1;
                cur_value >>= 1;
                if is_negative {
                    cur_value = -cur_value;
                }
                self.buf[len] = cur_value;
                len += 1;
                cur_value = 0;
                shift = 0;
            }
        }

        if shift != 0 || !matches!(len, 1 | 4 | 5) {
            Err(ParseError::MappingMalformed(segment.to_owned()))
        } else {
            Ok(&self.buf[..len])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{VlqDecoder, VlqEncoder};
    use crate::ParseError;

    fn encode_all(values: &[i64]) -> String {
        let mut buf = Vec::new();
        let mut encoder = VlqEncoder::new(&mut buf);
        for &num in values {
            encoder.encode(num);
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_vlq_vectors() {
        let cases: &[(&str, &[i64])] = &[
            ("A", &[0]),
            ("CuBwcO", &[1, 23, 456, 7]),
            ("AACKA", &[0, 0, 1, 5, 0]),
            ("IACIC", &[4, 0, 1, 4, 1]),
            ("MACTC", &[6, 0, 1, -9, 1]),
        ];

        let mut decoder = VlqDecoder::new();
        for (encoded, values) in cases {
            assert_eq!(&encode_all(values), encoded);
            assert_eq!(decoder.decode(encoded).unwrap(), *values);
        }
    }

    #[test]
    fn test_vlq_roundtrip() {
        let mut decoder = VlqDecoder::new();
        for v in -4096..=4096i64 {
            let encoded = encode_all(&[v]);
            assert!(encoded.bytes().all(|b| super::BASE64_VALUES[b as usize] >= 0));
            assert_eq!(decoder.decode(&encoded).unwrap(), &[v]);
        }
        for v in [i64::from(i32::MAX), i64::from(i32::MIN) + 1, 1 << 40] {
            assert_eq!(decoder.decode(&encode_all(&[v])).unwrap(), &[v]);
        }
    }

    #[test]
    fn test_vlq_decode_malformed() {
        let mut decoder = VlqDecoder::new();
        // 2 values
        assert!(matches!(
            decoder.decode("AA"),
            Err(ParseError::MappingMalformed(..))
        ));
        // dangling continuation bit
        assert!(matches!(
            decoder.decode("u"),
            Err(ParseError::MappingMalformed(..))
        ));
        // outside the base64 alphabet
        assert!(matches!(
            decoder.decode("A!AA"),
            Err(ParseError::MappingMalformed(..))
        ));
        assert!(matches!(
            decoder.decode("你好"),
            Err(ParseError::MappingMalformed(..))
        ));
        assert!(matches!(
            decoder.decode(""),
            Err(ParseError::MappingMalformed(..))
        ));
        // shift overflow
        assert!(matches!(
            decoder.decode("ggggggggggggggggA"),
            Err(ParseError::MappingMalformed(..))
        ));
        // 13th digit shifts bits past the top of an i64
        assert!(matches!(
            decoder.decode("////////////P"),
            Err(ParseError::MappingMalformed(..))
        ));
    }
}
