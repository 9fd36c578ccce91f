//! Reference parameter objects that header blocks diff against.
//!
//! Every optional field on the wire is preceded by a presence flag; when the
//! flag is clear the decoder takes the value from the resolver, so both ends
//! must agree on the same resolver for a given stream.

use super::params::{
    ChromaFormat, CleanArea, CodingParams, FrameRate, FrameType, MotionParams, PixelAspect,
    ScanFormat, SourceParams, TransformParams, VideoFormat, BLOCK_PARAMS_PRESETS,
    SIGNAL_RANGE_PRESETS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecDefaults {
    pub source: SourceParams,
    pub coding: CodingParams,
    pub motion: MotionParams,
    pub transform: TransformParams,
}

/// The injectable collaborator producing the reference parameters each block
/// diffs against, keyed by video format, frame type and reference count.
pub trait DefaultResolver {
    fn source_defaults(&self, format: VideoFormat) -> SourceParams;

    fn coding_defaults(&self, format: VideoFormat, frame_type: FrameType, num_refs: u8)
        -> CodingParams;

    fn motion_defaults(&self, format: VideoFormat, num_refs: u8) -> MotionParams;

    fn transform_defaults(&self, format: VideoFormat, frame_type: FrameType) -> TransformParams;

    /// All reference parameters for one unit in a single call.
    fn resolve(&self, format: VideoFormat, frame_type: FrameType, num_refs: u8) -> CodecDefaults {
        CodecDefaults {
            source: self.source_defaults(format),
            coding: self.coding_defaults(format, frame_type, num_refs),
            motion: self.motion_defaults(format, num_refs),
            transform: self.transform_defaults(format, frame_type),
        }
    }
}

/// Table-driven resolver for the standard video formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardResolver;

impl StandardResolver {
    pub fn new() -> Self {
        Self
    }
}

struct FormatEntry {
    width: u32,
    height: u32,
    scan_format: ScanFormat,
    frame_rate: FrameRate,
    pixel_aspect: PixelAspect,
    signal_range_preset: usize,
    block_preset: usize,
}

fn format_entry(format: VideoFormat) -> FormatEntry {
    use ScanFormat::{Interlaced, Progressive};
    match format {
        VideoFormat::Custom => FormatEntry {
            width: 640,
            height: 480,
            scan_format: Progressive,
            frame_rate: FrameRate::new(30, 1),
            pixel_aspect: PixelAspect::new(1, 1),
            signal_range_preset: 0,
            block_preset: 1,
        },
        VideoFormat::Qsif => FormatEntry {
            width: 176,
            height: 120,
            scan_format: Progressive,
            frame_rate: FrameRate::new(15_000, 1001),
            pixel_aspect: PixelAspect::new(10, 11),
            signal_range_preset: 0,
            block_preset: 0,
        },
        VideoFormat::Qcif => FormatEntry {
            width: 176,
            height: 144,
            scan_format: Progressive,
            frame_rate: FrameRate::new(25, 2),
            pixel_aspect: PixelAspect::new(12, 11),
            signal_range_preset: 0,
            block_preset: 0,
        },
        VideoFormat::Sif => FormatEntry {
            width: 352,
            height: 240,
            scan_format: Progressive,
            frame_rate: FrameRate::new(15_000, 1001),
            pixel_aspect: PixelAspect::new(10, 11),
            signal_range_preset: 0,
            block_preset: 0,
        },
        VideoFormat::Cif => FormatEntry {
            width: 352,
            height: 288,
            scan_format: Progressive,
            frame_rate: FrameRate::new(25, 2),
            pixel_aspect: PixelAspect::new(12, 11),
            signal_range_preset: 0,
            block_preset: 0,
        },
        VideoFormat::Cif4 => FormatEntry {
            width: 704,
            height: 576,
            scan_format: Progressive,
            frame_rate: FrameRate::new(25, 2),
            pixel_aspect: PixelAspect::new(12, 11),
            signal_range_preset: 0,
            block_preset: 1,
        },
        VideoFormat::Sd480 => FormatEntry {
            width: 720,
            height: 480,
            scan_format: Interlaced,
            frame_rate: FrameRate::new(30_000, 1001),
            pixel_aspect: PixelAspect::new(10, 11),
            signal_range_preset: 1,
            block_preset: 1,
        },
        VideoFormat::Sd576 => FormatEntry {
            width: 720,
            height: 576,
            scan_format: Interlaced,
            frame_rate: FrameRate::new(25, 1),
            pixel_aspect: PixelAspect::new(12, 11),
            signal_range_preset: 1,
            block_preset: 1,
        },
        VideoFormat::Hd720 => FormatEntry {
            width: 1280,
            height: 720,
            scan_format: Progressive,
            frame_rate: FrameRate::new(50, 1),
            pixel_aspect: PixelAspect::new(1, 1),
            signal_range_preset: 1,
            block_preset: 2,
        },
        VideoFormat::Hd1080 => FormatEntry {
            width: 1920,
            height: 1080,
            scan_format: Interlaced,
            frame_rate: FrameRate::new(25, 1),
            pixel_aspect: PixelAspect::new(1, 1),
            signal_range_preset: 1,
            block_preset: 2,
        },
    }
}

impl DefaultResolver for StandardResolver {
    fn source_defaults(&self, format: VideoFormat) -> SourceParams {
        let e = format_entry(format);
        SourceParams {
            width: e.width,
            height: e.height,
            chroma_format: ChromaFormat::C420,
            scan_format: e.scan_format,
            frame_rate: e.frame_rate,
            pixel_aspect: e.pixel_aspect,
            clean_area: CleanArea {
                width: e.width,
                height: e.height,
                left_offset: 0,
                top_offset: 0,
            },
            signal_range: SIGNAL_RANGE_PRESETS[e.signal_range_preset],
            color_spec: 0,
        }
    }

    fn coding_defaults(
        &self,
        format: VideoFormat,
        _frame_type: FrameType,
        num_refs: u8,
    ) -> CodingParams {
        let e = format_entry(format);
        CodingParams {
            // Intra frames carry no vectors; inter defaults to half-pel.
            mv_precision: if num_refs == 0 { 0 } else { 1 },
            interlaced_coding: e.scan_format == ScanFormat::Interlaced,
        }
    }

    fn motion_defaults(&self, format: VideoFormat, _num_refs: u8) -> MotionParams {
        let e = format_entry(format);
        MotionParams {
            block: BLOCK_PARAMS_PRESETS[e.block_preset],
            prediction_mode: 0,
        }
    }

    fn transform_defaults(&self, _format: VideoFormat, frame_type: FrameType) -> TransformParams {
        TransformParams {
            wavelet_filter: match frame_type {
                FrameType::Intra => 0,
                FrameType::Inter => 1,
            },
            depth: 4,
            codeblock_mode: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_is_deterministic() {
        let r = StandardResolver::new();
        for idx in 0..=9 {
            let f = VideoFormat::from_index(idx).unwrap();
            assert_eq!(r.source_defaults(f), r.source_defaults(f));
            assert_eq!(
                r.coding_defaults(f, FrameType::Inter, 2),
                r.coding_defaults(f, FrameType::Inter, 2)
            );
        }
    }

    #[test]
    fn test_resolve_composes_all_defaults() {
        let r = StandardResolver::new();
        let d = r.resolve(VideoFormat::Hd720, FrameType::Inter, 1);
        assert_eq!(d.source, r.source_defaults(VideoFormat::Hd720));
        assert_eq!(d.coding, r.coding_defaults(VideoFormat::Hd720, FrameType::Inter, 1));
        assert_eq!(d.motion, r.motion_defaults(VideoFormat::Hd720, 1));
        assert_eq!(d.transform, r.transform_defaults(VideoFormat::Hd720, FrameType::Inter));
    }

    #[test]
    fn test_hd1080_defaults() {
        let r = StandardResolver::new();
        let src = r.source_defaults(VideoFormat::Hd1080);
        assert_eq!((src.width, src.height), (1920, 1080));
        assert_eq!(src.scan_format, ScanFormat::Interlaced);
        assert_eq!(src.signal_range, SIGNAL_RANGE_PRESETS[1]);
    }

    #[test]
    fn test_intra_frames_default_to_zero_precision() {
        let r = StandardResolver::new();
        let c = r.coding_defaults(VideoFormat::Cif, FrameType::Intra, 0);
        assert_eq!(c.mv_precision, 0);
        let c = r.coding_defaults(VideoFormat::Cif, FrameType::Inter, 1);
        assert_eq!(c.mv_precision, 1);
    }
}
