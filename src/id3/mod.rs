// ID3v2.4 tag assembly for the trailing "ID3 " chunk
pub mod buffer;
pub mod frames;
pub mod v2;

pub use buffer::TagBuffer;
pub use v2::{Id3v2Builder, Id3v2Header, Id3v2Tag};
