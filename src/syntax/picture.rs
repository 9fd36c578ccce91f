use super::params::{CodingParams, FrameType, MAX_MV_PRECISION};
use super::SyntaxBlock;
use crate::bitstream::{BitReader, BitWriter};
use crate::error::{WvError, WvResult};

pub const MAX_REFERENCES: u32 = 2;

pub struct PictureHeader {
    pub picture_number: u32,
    /// Relative picture-number offsets to each reference, nonzero.
    pub ref_offsets: Vec<i32>,
    bits: BitWriter,
}

impl PictureHeader {
    pub fn new(picture_number: u32, ref_offsets: Vec<i32>) -> Self {
        Self {
            picture_number,
            ref_offsets,
            bits: BitWriter::new(),
        }
    }

    pub fn frame_type(&self) -> FrameType {
        if self.ref_offsets.is_empty() {
            FrameType::Intra
        } else {
            FrameType::Inter
        }
    }

    pub fn num_refs(&self) -> u8 {
        self.ref_offsets.len() as u8
    }

    pub fn output(&mut self) -> WvResult<()> {
        if self.ref_offsets.len() as u32 > MAX_REFERENCES {
            return Err(WvError::EncodingError(format!(
                "too many references: {}",
                self.ref_offsets.len()
            )));
        }
        let mut bits = BitWriter::new();
        bits.write_u32(self.picture_number);
        bits.write_golomb_u32(self.ref_offsets.len() as u32);
        for &offset in &self.ref_offsets {
            if offset == 0 {
                return Err(WvError::EncodingError("zero reference offset".into()));
            }
            bits.write_golomb_i32(offset);
        }
        bits.align();
        self.bits = bits;
        Ok(())
    }

    pub fn input(r: &mut BitReader<'_>) -> WvResult<Self> {
        let picture_number = r.read_u32()?;
        let num_refs = r.read_golomb_u32()?;
        if num_refs > MAX_REFERENCES {
            return Err(WvError::FormatViolation {
                block: "picture header",
                field: "reference count",
                value: num_refs as u64,
            });
        }
        let mut ref_offsets = Vec::with_capacity(num_refs as usize);
        for _ in 0..num_refs {
            let offset = r.read_golomb_i32()?;
            if offset == 0 {
                return Err(WvError::FormatViolation {
                    block: "picture header",
                    field: "reference offset",
                    value: 0,
                });
            }
            ref_offsets.push(offset);
        }
        r.align();
        Ok(Self::new(picture_number, ref_offsets))
    }
}

impl SyntaxBlock for PictureHeader {
    fn size(&self) -> usize {
        self.bits.byte_size()
    }

    fn collect(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.bits.bytes());
    }
}

/// Coding parameters, four optional groups in fixed order: motion-vector
/// precision, interlaced-coding mode, frame weighting, global motion. The
/// last two are defined by the format but unsupported in this revision; the
/// encoder never flags them and the decoder rejects the unit when flagged.
pub struct CodingHeader {
    pub coding: CodingParams,
    bits: BitWriter,
}

impl CodingHeader {
    pub fn new(coding: CodingParams) -> Self {
        Self {
            coding,
            bits: BitWriter::new(),
        }
    }

    pub fn output(&mut self, defaults: &CodingParams) -> WvResult<()> {
        if self.coding.mv_precision > MAX_MV_PRECISION {
            return Err(WvError::EncodingError(format!(
                "motion-vector precision out of range: {}",
                self.coding.mv_precision
            )));
        }
        let mut bits = BitWriter::new();

        let custom_precision = self.coding.mv_precision != defaults.mv_precision;
        bits.write_bit(custom_precision);
        if custom_precision {
            bits.write_golomb_u32(self.coding.mv_precision);
        }

        let custom_interlace = self.coding.interlaced_coding != defaults.interlaced_coding;
        bits.write_bit(custom_interlace);
        if custom_interlace {
            bits.write_bit(self.coding.interlaced_coding);
        }

        bits.write_bit(false); // frame weights, never non-default
        bits.write_bit(false); // global motion, never non-default

        bits.align();
        self.bits = bits;
        Ok(())
    }

    pub fn input(r: &mut BitReader<'_>, defaults: &CodingParams) -> WvResult<Self> {
        let mut coding = *defaults;

        if r.read_bit() {
            let precision = r.read_golomb_u32()?;
            if precision > MAX_MV_PRECISION {
                return Err(WvError::FormatViolation {
                    block: "coding header",
                    field: "motion-vector precision",
                    value: precision as u64,
                });
            }
            coding.mv_precision = precision;
        }

        if r.read_bit() {
            coding.interlaced_coding = r.read_bit();
        }

        if r.read_bit() {
            return Err(WvError::Unsupported {
                block: "coding header",
                feature: "custom frame weights",
            });
        }

        if r.read_bit() {
            return Err(WvError::Unsupported {
                block: "coding header",
                feature: "global motion",
            });
        }

        r.align();
        Ok(Self::new(coding))
    }
}

impl SyntaxBlock for CodingHeader {
    fn size(&self) -> usize {
        self.bits.byte_size()
    }

    fn collect(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.bits.bytes());
    }
}
