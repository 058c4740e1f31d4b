/// Numeric mode: groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
pub struct NumericDecoder;

/// Width of the digit count field
pub const LENGTH_BITS: usize = 10;

/// Largest digit count the length field can announce
pub const MAX_DIGITS: usize = (1 << LENGTH_BITS) - 1;

impl NumericDecoder {
    /// Decode `character_count` digits from the bit stream.
    /// Returns (decoded_string, bits_consumed)
    pub fn decode(bits: &[u8], character_count: usize) -> Option<(String, usize)> {
        let mut result = String::with_capacity(character_count);
        let mut bit_idx = 0;
        let mut chars_remaining = character_count;

        while chars_remaining > 0 {
            let group_size = chars_remaining.min(3);
            let bits_needed = group_width(group_size);

            if bit_idx + bits_needed > bits.len() {
                return None;
            }
            let value = read_uint(&bits[bit_idx..bit_idx + bits_needed]);

            let digits = match group_size {
                3 if value < 1000 => format!("{:03}", value),
                2 if value < 100 => format!("{:02}", value),
                1 if value < 10 => format!("{}", value),
                _ => return None,
            };

            result.push_str(&digits);
            bit_idx += bits_needed;
            chars_remaining -= group_size;
        }

        Some((result, bit_idx))
    }

    /// Encode a digit string (without length field). `None` for non-digits.
    pub fn encode(digits: &str) -> Option<Vec<u8>> {
        let mut bits = Vec::with_capacity(digits.len() / 3 * 10 + 7);
        for chunk in digits.as_bytes().chunks(3) {
            let mut value = 0u32;
            for &b in chunk {
                if !b.is_ascii_digit() {
                    return None;
                }
                value = value * 10 + (b - b'0') as u32;
            }
            push_uint(&mut bits, value, group_width(chunk.len()));
        }
        Some(bits)
    }
}

fn group_width(group_size: usize) -> usize {
    match group_size {
        3 => 10,
        2 => 7,
        _ => 4,
    }
}

/// Read an MSB-first unsigned integer from 0/1 bits
pub fn read_uint(bits: &[u8]) -> u32 {
    bits.iter().fold(0u32, |acc, &b| (acc << 1) | (b & 1) as u32)
}

/// Append `width` MSB-first bits of `value`
pub fn push_uint(out: &mut Vec<u8>, value: u32, width: usize) {
    for i in (0..width).rev() {
        out.push(((value >> i) & 1) as u8);
    }
}
