pub mod access_unit;
pub mod data;
pub mod defaults;
pub mod motion;
pub mod params;
pub mod picture;
pub mod sequence;
pub mod transform;

pub use access_unit::{AccessUnit, AccessUnitParams};
pub use data::DataBlock;
pub use defaults::{CodecDefaults, DefaultResolver, StandardResolver};
pub use motion::{MotionData, MotionHeader};
pub use params::{
    BlockParams, ChromaFormat, CleanArea, CodingParams, FrameRate, FrameType, MotionParams,
    ParseParams, PixelAspect, ScanFormat, SignalRange, SourceParams, TransformParams, VideoFormat,
};
pub use picture::{CodingHeader, PictureHeader};
pub use sequence::SequenceHeader;
pub use transform::TransformHeader;

/// The composition discipline every header block follows: a block owns its
/// header bits and zero or more child sub-streams, reports its encoded size
/// recursively, and materializes its bytes as own header followed by every
/// child in declared order. `size()` and `collect()` are valid only after the
/// block's `output()` pass has run.
pub trait SyntaxBlock {
    /// Total encoded size in bytes, own header plus all children.
    fn size(&self) -> usize;

    /// Append own bytes, then every child's bytes, in declared order.
    fn collect(&self, out: &mut Vec<u8>);

    fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.collect(&mut out);
        out
    }
}
