use super::defaults::DefaultResolver;
use super::params::{
    ChromaFormat, FrameRate, ParseParams, PixelAspect, ScanFormat, SignalRange, SourceParams,
    VideoFormat, COLOR_SPEC_COUNT, FRAME_RATE_PRESETS, PIXEL_ASPECT_PRESETS,
    SIGNAL_RANGE_PRESETS,
};
use super::SyntaxBlock;
use crate::bitstream::{BitReader, BitWriter};
use crate::error::{WvError, WvResult};

pub struct SequenceHeader {
    pub parse: ParseParams,
    pub video_format: VideoFormat,
    pub source: SourceParams,
    bits: BitWriter,
}

impl SequenceHeader {
    pub fn new(parse: ParseParams, video_format: VideoFormat, source: SourceParams) -> Self {
        Self {
            parse,
            video_format,
            source,
            bits: BitWriter::new(),
        }
    }

    pub fn output(&mut self, resolver: &dyn DefaultResolver) -> WvResult<()> {
        let defaults = resolver.source_defaults(self.video_format);
        let src = &self.source;
        if src.width == 0 || src.height == 0 {
            return Err(WvError::EncodingError(format!(
                "zero source dimensions: {}x{}",
                src.width, src.height
            )));
        }
        if src.frame_rate.numerator == 0 || src.frame_rate.denominator == 0 {
            return Err(WvError::EncodingError(format!(
                "zero frame rate term: {}/{}",
                src.frame_rate.numerator, src.frame_rate.denominator
            )));
        }
        if src.color_spec >= COLOR_SPEC_COUNT {
            return Err(WvError::EncodingError(format!(
                "color spec out of range: {}",
                src.color_spec
            )));
        }
        let mut bits = BitWriter::new();

        bits.write_golomb_u32(self.parse.major_version);
        bits.write_golomb_u32(self.parse.minor_version);
        bits.write_golomb_u32(self.parse.profile);
        bits.write_golomb_u32(self.parse.level);
        bits.write_golomb_u32(self.video_format.index());

        let custom_dims = src.width != defaults.width || src.height != defaults.height;
        bits.write_bit(custom_dims);
        if custom_dims {
            bits.write_golomb_u32(src.width);
            bits.write_golomb_u32(src.height);
        }

        let custom_chroma = src.chroma_format != defaults.chroma_format;
        bits.write_bit(custom_chroma);
        if custom_chroma {
            bits.write_golomb_u32(src.chroma_format as u32);
        }

        let custom_scan = src.scan_format != defaults.scan_format;
        bits.write_bit(custom_scan);
        if custom_scan {
            bits.write_golomb_u32(src.scan_format as u32);
        }

        let custom_rate = src.frame_rate != defaults.frame_rate;
        bits.write_bit(custom_rate);
        if custom_rate {
            match FRAME_RATE_PRESETS.iter().position(|p| *p == src.frame_rate) {
                Some(i) => bits.write_golomb_u32(i as u32 + 1),
                None => {
                    bits.write_golomb_u32(0);
                    bits.write_golomb_u32(src.frame_rate.numerator);
                    bits.write_golomb_u32(src.frame_rate.denominator);
                }
            }
        }

        let custom_aspect = src.pixel_aspect != defaults.pixel_aspect;
        bits.write_bit(custom_aspect);
        if custom_aspect {
            match PIXEL_ASPECT_PRESETS.iter().position(|p| *p == src.pixel_aspect) {
                Some(i) => bits.write_golomb_u32(i as u32 + 1),
                None => {
                    bits.write_golomb_u32(0);
                    bits.write_golomb_u32(src.pixel_aspect.numerator);
                    bits.write_golomb_u32(src.pixel_aspect.denominator);
                }
            }
        }

        let custom_clean = src.clean_area != defaults.clean_area;
        bits.write_bit(custom_clean);
        if custom_clean {
            bits.write_golomb_u32(src.clean_area.width);
            bits.write_golomb_u32(src.clean_area.height);
            bits.write_golomb_u32(src.clean_area.left_offset);
            bits.write_golomb_u32(src.clean_area.top_offset);
        }

        let custom_range = src.signal_range != defaults.signal_range;
        bits.write_bit(custom_range);
        if custom_range {
            match SIGNAL_RANGE_PRESETS.iter().position(|p| *p == src.signal_range) {
                Some(i) => bits.write_golomb_u32(i as u32 + 1),
                None => {
                    bits.write_golomb_u32(0);
                    bits.write_golomb_u32(src.signal_range.luma_offset);
                    bits.write_golomb_u32(src.signal_range.luma_excursion);
                    bits.write_golomb_u32(src.signal_range.chroma_offset);
                    bits.write_golomb_u32(src.signal_range.chroma_excursion);
                }
            }
        }

        let custom_spec = src.color_spec != defaults.color_spec;
        bits.write_bit(custom_spec);
        if custom_spec {
            bits.write_golomb_u32(src.color_spec);
        }

        bits.align();
        self.bits = bits;
        Ok(())
    }

    pub fn input(r: &mut BitReader<'_>, resolver: &dyn DefaultResolver) -> WvResult<Self> {
        let parse = ParseParams {
            major_version: r.read_golomb_u32()?,
            minor_version: r.read_golomb_u32()?,
            profile: r.read_golomb_u32()?,
            level: r.read_golomb_u32()?,
        };
        let video_format = VideoFormat::from_index(r.read_golomb_u32()?)?;
        let mut source = resolver.source_defaults(video_format);

        if r.read_bit() {
            source.width = r.read_golomb_u32()?;
            source.height = r.read_golomb_u32()?;
            if source.width == 0 || source.height == 0 {
                return Err(WvError::FormatViolation {
                    block: "sequence header",
                    field: "dimensions",
                    value: ((source.width as u64) << 32) | source.height as u64,
                });
            }
        }

        if r.read_bit() {
            source.chroma_format = ChromaFormat::from_index(r.read_golomb_u32()?)?;
        }

        if r.read_bit() {
            source.scan_format = ScanFormat::from_index(r.read_golomb_u32()?)?;
        }

        if r.read_bit() {
            let preset = r.read_golomb_u32()?;
            source.frame_rate = if preset == 0 {
                FrameRate {
                    numerator: r.read_golomb_u32()?,
                    denominator: r.read_golomb_u32()?,
                }
            } else {
                *FRAME_RATE_PRESETS.get(preset as usize - 1).ok_or(
                    WvError::FormatViolation {
                        block: "sequence header",
                        field: "frame rate preset",
                        value: preset as u64,
                    },
                )?
            };
            if source.frame_rate.numerator == 0 || source.frame_rate.denominator == 0 {
                return Err(WvError::FormatViolation {
                    block: "sequence header",
                    field: "frame rate",
                    value: source.frame_rate.denominator as u64,
                });
            }
        }

        if r.read_bit() {
            let preset = r.read_golomb_u32()?;
            source.pixel_aspect = if preset == 0 {
                PixelAspect {
                    numerator: r.read_golomb_u32()?,
                    denominator: r.read_golomb_u32()?,
                }
            } else {
                *PIXEL_ASPECT_PRESETS.get(preset as usize - 1).ok_or(
                    WvError::FormatViolation {
                        block: "sequence header",
                        field: "pixel aspect preset",
                        value: preset as u64,
                    },
                )?
            };
        }

        if r.read_bit() {
            source.clean_area.width = r.read_golomb_u32()?;
            source.clean_area.height = r.read_golomb_u32()?;
            source.clean_area.left_offset = r.read_golomb_u32()?;
            source.clean_area.top_offset = r.read_golomb_u32()?;
        }

        if r.read_bit() {
            let preset = r.read_golomb_u32()?;
            source.signal_range = if preset == 0 {
                SignalRange {
                    luma_offset: r.read_golomb_u32()?,
                    luma_excursion: r.read_golomb_u32()?,
                    chroma_offset: r.read_golomb_u32()?,
                    chroma_excursion: r.read_golomb_u32()?,
                }
            } else {
                *SIGNAL_RANGE_PRESETS.get(preset as usize - 1).ok_or(
                    WvError::FormatViolation {
                        block: "sequence header",
                        field: "signal range preset",
                        value: preset as u64,
                    },
                )?
            };
        }

        if r.read_bit() {
            let spec = r.read_golomb_u32()?;
            if spec >= COLOR_SPEC_COUNT {
                return Err(WvError::FormatViolation {
                    block: "sequence header",
                    field: "color spec",
                    value: spec as u64,
                });
            }
            source.color_spec = spec;
        }

        r.align();
        Ok(Self::new(parse, video_format, source))
    }
}

impl SyntaxBlock for SequenceHeader {
    fn size(&self) -> usize {
        self.bits.byte_size()
    }

    fn collect(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.bits.bytes());
    }
}
