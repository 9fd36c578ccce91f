use crate::error::{WvError, WvResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum VideoFormat {
    Custom = 0,
    Qsif = 1,
    Qcif = 2,
    Sif = 3,
    Cif = 4,
    Cif4 = 5,
    Sd480 = 6,
    Sd576 = 7,
    Hd720 = 8,
    Hd1080 = 9,
}

impl VideoFormat {
    pub fn from_index(v: u32) -> WvResult<Self> {
        match v {
            0 => Ok(Self::Custom),
            1 => Ok(Self::Qsif),
            2 => Ok(Self::Qcif),
            3 => Ok(Self::Sif),
            4 => Ok(Self::Cif),
            5 => Ok(Self::Cif4),
            6 => Ok(Self::Sd480),
            7 => Ok(Self::Sd576),
            8 => Ok(Self::Hd720),
            9 => Ok(Self::Hd1080),
            _ => Err(WvError::FormatViolation {
                block: "sequence header",
                field: "video format",
                value: v as u64,
            }),
        }
    }

    pub fn index(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    Intra,
    Inter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChromaFormat {
    C444 = 0,
    C422 = 1,
    C420 = 2,
}

impl ChromaFormat {
    pub fn from_index(v: u32) -> WvResult<Self> {
        match v {
            0 => Ok(Self::C444),
            1 => Ok(Self::C422),
            2 => Ok(Self::C420),
            _ => Err(WvError::FormatViolation {
                block: "sequence header",
                field: "chroma format",
                value: v as u64,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ScanFormat {
    Progressive = 0,
    Interlaced = 1,
}

impl ScanFormat {
    pub fn from_index(v: u32) -> WvResult<Self> {
        match v {
            0 => Ok(Self::Progressive),
            1 => Ok(Self::Interlaced),
            _ => Err(WvError::FormatViolation {
                block: "sequence header",
                field: "scan format",
                value: v as u64,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

/// Canonical frame rates addressable by preset index; index 0 on the wire
/// means explicit numerator/denominator follow.
pub const FRAME_RATE_PRESETS: [FrameRate; 8] = [
    FrameRate::new(24_000, 1001),
    FrameRate::new(24, 1),
    FrameRate::new(25, 1),
    FrameRate::new(30_000, 1001),
    FrameRate::new(30, 1),
    FrameRate::new(50, 1),
    FrameRate::new(60_000, 1001),
    FrameRate::new(60, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelAspect {
    pub numerator: u32,
    pub denominator: u32,
}

impl PixelAspect {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

pub const PIXEL_ASPECT_PRESETS: [PixelAspect; 6] = [
    PixelAspect::new(1, 1),
    PixelAspect::new(10, 11),
    PixelAspect::new(12, 11),
    PixelAspect::new(40, 33),
    PixelAspect::new(16, 11),
    PixelAspect::new(4, 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanArea {
    pub width: u32,
    pub height: u32,
    pub left_offset: u32,
    pub top_offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRange {
    pub luma_offset: u32,
    pub luma_excursion: u32,
    pub chroma_offset: u32,
    pub chroma_excursion: u32,
}

impl SignalRange {
    pub const fn new(
        luma_offset: u32,
        luma_excursion: u32,
        chroma_offset: u32,
        chroma_excursion: u32,
    ) -> Self {
        Self {
            luma_offset,
            luma_excursion,
            chroma_offset,
            chroma_excursion,
        }
    }
}

pub const SIGNAL_RANGE_PRESETS: [SignalRange; 4] = [
    SignalRange::new(0, 255, 128, 255),
    SignalRange::new(16, 219, 128, 224),
    SignalRange::new(64, 876, 512, 896),
    SignalRange::new(256, 3504, 2048, 3584),
];

/// Source characteristics of the coded sequence. On the wire only the fields
/// differing from the base video format's defaults are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceParams {
    pub width: u32,
    pub height: u32,
    pub chroma_format: ChromaFormat,
    pub scan_format: ScanFormat,
    pub frame_rate: FrameRate,
    pub pixel_aspect: PixelAspect,
    pub clean_area: CleanArea,
    pub signal_range: SignalRange,
    pub color_spec: u32,
}

pub const COLOR_SPEC_COUNT: u32 = 5;

/// Parse/stream identification carried at the head of every sequence header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseParams {
    pub major_version: u32,
    pub minor_version: u32,
    pub profile: u32,
    pub level: u32,
}

impl Default for ParseParams {
    fn default() -> Self {
        Self {
            major_version: 2,
            minor_version: 0,
            profile: 0,
            level: 0,
        }
    }
}

/// Picture-level coding settings. Frame weighting and global motion are
/// defined by the format but unsupported by this codec revision: this layer
/// never encodes them non-default and rejects streams that flag them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingParams {
    /// Motion-vector precision in fractional-pel steps, 0..=3.
    pub mv_precision: u32,
    pub interlaced_coding: bool,
}

pub const MAX_MV_PRECISION: u32 = 3;

/// Motion-compensation block geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockParams {
    pub xblen: u32,
    pub yblen: u32,
    pub xbsep: u32,
    pub ybsep: u32,
}

impl BlockParams {
    pub const fn new(xblen: u32, yblen: u32, xbsep: u32, ybsep: u32) -> Self {
        Self {
            xblen,
            yblen,
            xbsep,
            ybsep,
        }
    }

    /// Preset index for this geometry, if it matches one of the canonical
    /// configurations. Wire index 0 is reserved for explicit custom values,
    /// so presets are numbered from 1.
    pub fn preset_index(&self) -> Option<u32> {
        BLOCK_PARAMS_PRESETS
            .iter()
            .position(|p| p == self)
            .map(|i| i as u32 + 1)
    }

    pub fn from_preset(index: u32) -> WvResult<Self> {
        if index == 0 || index > BLOCK_PARAMS_PRESETS.len() as u32 {
            return Err(WvError::FormatViolation {
                block: "motion header",
                field: "block params preset",
                value: index as u64,
            });
        }
        Ok(BLOCK_PARAMS_PRESETS[index as usize - 1])
    }

    pub fn validate(&self) -> WvResult<()> {
        let ok = self.xbsep > 0
            && self.ybsep > 0
            && self.xbsep <= self.xblen
            && self.ybsep <= self.yblen;
        if ok {
            Ok(())
        } else {
            Err(WvError::FormatViolation {
                block: "motion header",
                field: "block dimensions",
                value: ((self.xblen as u64) << 32) | self.yblen as u64,
            })
        }
    }
}

pub const BLOCK_PARAMS_PRESETS: [BlockParams; 4] = [
    BlockParams::new(8, 8, 4, 4),
    BlockParams::new(12, 12, 8, 8),
    BlockParams::new(16, 16, 12, 12),
    BlockParams::new(24, 24, 16, 16),
];

/// Motion-header settings beyond the per-vector entropy-coded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionParams {
    pub block: BlockParams,
    /// Which reference combination predicts a block, 0..=2.
    pub prediction_mode: u32,
}

pub const MAX_PREDICTION_MODE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformParams {
    /// Wavelet filter index, 0..=6.
    pub wavelet_filter: u32,
    /// Decomposition depth, 1..=6.
    pub depth: u32,
    /// 0 = single codeblock per subband, 1 = spatially partitioned.
    pub codeblock_mode: u32,
}

pub const MAX_WAVELET_FILTER: u32 = 6;
pub const MAX_TRANSFORM_DEPTH: u32 = 6;
