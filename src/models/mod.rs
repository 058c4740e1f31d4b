pub mod depth;
pub mod matrix;
pub mod payload;
pub mod point;
pub mod version;

pub use depth::{BitDepth, Rgb};
pub use matrix::BitMatrix;
pub use payload::{Payload, SignMode};
pub use point::{Point, PointI};
pub use version::Version;
