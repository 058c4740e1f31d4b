/// Module values back to a payload
use crate::decoder::modes::numeric::{LENGTH_BITS, NumericDecoder, read_uint};
use crate::decoder::modes::text::TextDecoder;
use crate::error::{Error, Result};
use crate::models::{BitDepth, Payload, SignMode};

/// Expands sampled module values into bits and dispatches on the sign mode
pub struct BitUnpacker;

impl BitUnpacker {
    /// Expand each module value into `depth.bits()` MSB-first bits
    pub fn expand(modules: &[u8], depth: BitDepth) -> Vec<u8> {
        let width = depth.bits();
        let mut bits = Vec::with_capacity(modules.len() * width);
        for &m in modules {
            for i in (0..width).rev() {
                bits.push((m >> i) & 1);
            }
        }
        bits
    }

    /// Decode the data modules of a symbol
    pub fn unpack(modules: &[u8], depth: BitDepth) -> Result<Payload> {
        let bits = Self::expand(modules, depth);
        if bits.len() < 2 {
            return Err(Error::CorruptPayload("stream shorter than sign"));
        }

        let sign = read_uint(&bits[..2]) as u8;
        let mode = SignMode::from_bits(sign).ok_or(Error::UnknownSignMode(sign))?;
        let body = &bits[2..];

        let content = match mode {
            SignMode::Numeric => {
                if body.len() < LENGTH_BITS {
                    return Err(Error::CorruptPayload("missing numeric length"));
                }
                let count = read_uint(&body[..LENGTH_BITS]) as usize;
                let (digits, _) = NumericDecoder::decode(&body[LENGTH_BITS..], count)
                    .ok_or(Error::CorruptPayload("numeric groups do not match length"))?;
                digits
            }
            SignMode::Text => {
                let (text, _) = TextDecoder::decode(body)
                    .ok_or(Error::CorruptPayload("text not terminated or not UTF-8"))?;
                text
            }
        };

        log::debug!("unpacked {:?} payload of {} chars", mode, content.chars().count());

        Ok(Payload {
            bits,
            content,
            mode,
        })
    }
}
