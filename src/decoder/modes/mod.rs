//! Payload mode codecs
//!
//! - Numeric: digit groups packed into 10/7/4-bit values behind a 10-bit count
//! - Text: UTF-8 bytes closed by a NUL terminator

pub mod numeric;
pub mod text;
