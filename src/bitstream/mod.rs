pub mod bitio;
pub mod golomb;

pub use bitio::{BitReader, BitWriter};
