/// Text mode: UTF-8 bytes, 8 bits each, terminated by a NUL byte
pub struct TextDecoder;

impl TextDecoder {
    /// Decode bytes up to the first NUL.
    /// Returns (decoded_string, bits_consumed including the terminator), or
    /// `None` when no terminator is present or the bytes are not UTF-8.
    pub fn decode(bits: &[u8]) -> Option<(String, usize)> {
        let mut bytes = Vec::with_capacity(bits.len() / 8);

        for (i, chunk) in bits.chunks_exact(8).enumerate() {
            let byte = chunk.iter().fold(0u8, |acc, &b| (acc << 1) | (b & 1));
            if byte == 0 {
                let text = String::from_utf8(bytes).ok()?;
                return Some((text, (i + 1) * 8));
            }
            bytes.push(byte);
        }

        None
    }

    /// Encode text as UTF-8 bits followed by the NUL terminator
    pub fn encode(text: &str) -> Vec<u8> {
        let mut bits = Vec::with_capacity((text.len() + 1) * 8);
        for &byte in text.as_bytes().iter().chain(std::iter::once(&0u8)) {
            for i in (0..8).rev() {
                bits.push((byte >> i) & 1);
            }
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_decode() {
        // "HI" = 0x48 0x49, then NUL and trailing padding
        let mut bits = vec![
            0, 1, 0, 0, 1, 0, 0, 0, // H
            0, 1, 0, 0, 1, 0, 0, 1, // I
            0, 0, 0, 0, 0, 0, 0, 0, // NUL
        ];
        bits.extend_from_slice(&[1, 1, 0, 1]);
        let (decoded, used) = TextDecoder::decode(&bits).unwrap();
        assert_eq!(decoded, "HI");
        assert_eq!(used, 24);
    }

    #[test]
    fn test_multibyte_utf8() {
        let bits = TextDecoder::encode("三角 ✓");
        let (decoded, _) = TextDecoder::decode(&bits).unwrap();
        assert_eq!(decoded, "三角 ✓");
    }

    #[test]
    fn test_missing_terminator() {
        let mut bits = TextDecoder::encode("A");
        bits.truncate(8);
        assert!(TextDecoder::decode(&bits).is_none());
    }

    #[test]
    fn test_invalid_utf8() {
        // lone continuation byte 0x80
        let bits = vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(TextDecoder::decode(&bits).is_none());
    }
}
