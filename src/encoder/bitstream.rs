/// Payload to bitstream packing
use crate::decoder::modes::numeric::{LENGTH_BITS, MAX_DIGITS, NumericDecoder, push_uint};
use crate::decoder::modes::text::TextDecoder;
use crate::models::{BitDepth, SignMode};

/// True when the input can use numeric mode: one or more ASCII digits, no
/// more than the 10-bit length field can announce.
pub fn is_numeric(input: &str) -> bool {
    !input.is_empty() && input.len() <= MAX_DIGITS && input.bytes().all(|b| b.is_ascii_digit())
}

/// Sign prefix followed by the mode body
pub fn payload_bits(input: &str) -> (SignMode, Vec<u8>) {
    let mode = if is_numeric(input) {
        SignMode::Numeric
    } else {
        SignMode::Text
    };

    let mut bits = Vec::new();
    push_uint(&mut bits, mode.bits() as u32, 2);
    match mode {
        SignMode::Numeric => {
            push_uint(&mut bits, input.len() as u32, LENGTH_BITS);
            // digits already validated by is_numeric
            bits.extend(NumericDecoder::encode(input).unwrap_or_default());
        }
        SignMode::Text => bits.extend(TextDecoder::encode(input)),
    }
    (mode, bits)
}

/// Regroup bits into module values of `depth.bits()` bits each, zero padding
/// the tail to a whole module.
pub fn group_modules(bits: &[u8], depth: BitDepth) -> Vec<u8> {
    let width = depth.bits();
    bits.chunks(width)
        .map(|chunk| {
            let value = chunk.iter().fold(0u8, |acc, &b| (acc << 1) | (b & 1));
            value << (width - chunk.len())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Vec<u8> {
        s.bytes().map(|b| b - b'0').collect()
    }

    #[test]
    fn test_numeric_layout() {
        let (mode, stream) = payload_bits("123");
        assert_eq!(mode, SignMode::Numeric);
        assert_eq!(stream, bits("0000000000110001111011"));
        assert_eq!(stream.len(), 22);
    }

    #[test]
    fn test_text_layout() {
        let (mode, stream) = payload_bits("A");
        assert_eq!(mode, SignMode::Text);
        assert_eq!(stream, bits("010100000100000000"));
    }

    #[test]
    fn test_empty_is_text() {
        let (mode, stream) = payload_bits("");
        assert_eq!(mode, SignMode::Text);
        assert_eq!(stream.len(), 10);
    }

    #[test]
    fn test_long_digit_string_falls_back_to_text() {
        let digits = "7".repeat(MAX_DIGITS + 1);
        assert!(!is_numeric(&digits));
        assert!(is_numeric(&digits[..MAX_DIGITS]));
        assert_eq!(payload_bits(&digits).0, SignMode::Text);
    }

    #[test]
    fn test_group_pads_tail() {
        // 22 bits -> 8 modules of 3 bits, last one zero padded
        let (_, stream) = payload_bits("123");
        let modules = group_modules(&stream, BitDepth::Three);
        assert_eq!(modules.len(), 8);
        assert_eq!(modules, vec![0, 0, 0, 3, 0, 7, 5, 4]);
        assert_eq!(group_modules(&[1, 0, 1], BitDepth::Two), vec![2, 2]);
    }
}
