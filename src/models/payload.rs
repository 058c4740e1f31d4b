/// Two-bit payload type prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignMode {
    /// `00`: digits packed 3/2/1 at a time into 10/7/4-bit groups
    Numeric,
    /// `01`: UTF-8 bytes terminated by NUL
    Text,
}

impl SignMode {
    /// Mode from its 2-bit value
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b00 => Some(SignMode::Numeric),
            0b01 => Some(SignMode::Text),
            _ => None,
        }
    }

    /// 2-bit value of this mode
    pub fn bits(&self) -> u8 {
        match self {
            SignMode::Numeric => 0b00,
            SignMode::Text => 0b01,
        }
    }
}

/// A decoded payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Raw bitstream recovered from the modules, one bit per entry
    pub bits: Vec<u8>,
    /// Decoded content
    pub content: String,
    /// Mode the content was encoded with
    pub mode: SignMode,
}
