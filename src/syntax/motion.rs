//! Motion-vector header: block geometry and prediction settings, then the
//! per-field arithmetic-coded sub-streams.

use super::data::DataBlock;
use super::params::{BlockParams, MotionParams, MAX_PREDICTION_MODE};
use super::SyntaxBlock;
use crate::bitstream::{BitReader, BitWriter};
use crate::error::{WvError, WvResult};
use serde::{Deserialize, Serialize};

/// The entropy-coded payloads of one picture's motion data, one sub-stream
/// per coded field, produced and consumed by the motion collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotionData {
    pub splits: Vec<u8>,
    pub modes: Vec<u8>,
    pub mv_x: Vec<u8>,
    pub mv_y: Vec<u8>,
    pub dc_y: Vec<u8>,
    pub dc_u: Vec<u8>,
    pub dc_v: Vec<u8>,
}

pub struct MotionHeader {
    pub motion: MotionParams,
    bits: BitWriter,
    // Child sub-streams in declared wire order.
    splits: DataBlock,
    modes: DataBlock,
    mv_x: DataBlock,
    mv_y: DataBlock,
    dc_y: DataBlock,
    dc_u: DataBlock,
    dc_v: DataBlock,
}

impl MotionHeader {
    pub fn new(motion: MotionParams, data: MotionData) -> Self {
        Self {
            motion,
            bits: BitWriter::new(),
            splits: DataBlock::new(data.splits),
            modes: DataBlock::new(data.modes),
            mv_x: DataBlock::new(data.mv_x),
            mv_y: DataBlock::new(data.mv_y),
            dc_y: DataBlock::new(data.dc_y),
            dc_u: DataBlock::new(data.dc_u),
            dc_v: DataBlock::new(data.dc_v),
        }
    }

    pub fn data(&self) -> MotionData {
        MotionData {
            splits: self.splits.payload().to_vec(),
            modes: self.modes.payload().to_vec(),
            mv_x: self.mv_x.payload().to_vec(),
            mv_y: self.mv_y.payload().to_vec(),
            dc_y: self.dc_y.payload().to_vec(),
            dc_u: self.dc_u.payload().to_vec(),
            dc_v: self.dc_v.payload().to_vec(),
        }
    }

    fn children(&self) -> [&DataBlock; 7] {
        [
            &self.splits,
            &self.modes,
            &self.mv_x,
            &self.mv_y,
            &self.dc_y,
            &self.dc_u,
            &self.dc_v,
        ]
    }

    pub fn output(&mut self, defaults: &MotionParams) -> WvResult<()> {
        self.motion.block.validate()?;
        if self.motion.prediction_mode > MAX_PREDICTION_MODE {
            return Err(WvError::EncodingError(format!(
                "prediction mode out of range: {}",
                self.motion.prediction_mode
            )));
        }
        let mut bits = BitWriter::new();

        let custom_block = self.motion.block != defaults.block;
        bits.write_bit(custom_block);
        if custom_block {
            match self.motion.block.preset_index() {
                Some(preset) => bits.write_golomb_u32(preset),
                None => {
                    bits.write_golomb_u32(0);
                    bits.write_golomb_u32(self.motion.block.xblen);
                    bits.write_golomb_u32(self.motion.block.yblen);
                    bits.write_golomb_u32(self.motion.block.xbsep);
                    bits.write_golomb_u32(self.motion.block.ybsep);
                }
            }
        }

        let custom_mode = self.motion.prediction_mode != defaults.prediction_mode;
        bits.write_bit(custom_mode);
        if custom_mode {
            bits.write_golomb_u32(self.motion.prediction_mode);
        }

        bits.align();
        self.bits = bits;

        self.splits.output()?;
        self.modes.output()?;
        self.mv_x.output()?;
        self.mv_y.output()?;
        self.dc_y.output()?;
        self.dc_u.output()?;
        self.dc_v.output()?;
        Ok(())
    }

    pub fn input(r: &mut BitReader<'_>, defaults: &MotionParams) -> WvResult<Self> {
        let mut motion = *defaults;

        if r.read_bit() {
            let preset = r.read_golomb_u32()?;
            motion.block = if preset == 0 {
                let block = BlockParams {
                    xblen: r.read_golomb_u32()?,
                    yblen: r.read_golomb_u32()?,
                    xbsep: r.read_golomb_u32()?,
                    ybsep: r.read_golomb_u32()?,
                };
                block.validate()?;
                block
            } else {
                BlockParams::from_preset(preset)?
            };
        }

        if r.read_bit() {
            let mode = r.read_golomb_u32()?;
            if mode > MAX_PREDICTION_MODE {
                return Err(WvError::FormatViolation {
                    block: "motion header",
                    field: "prediction mode",
                    value: mode as u64,
                });
            }
            motion.prediction_mode = mode;
        }

        r.align();

        // One sub-stream per field; DC streams in Y, U, V order.
        let splits = DataBlock::input(r)?;
        let modes = DataBlock::input(r)?;
        let mv_x = DataBlock::input(r)?;
        let mv_y = DataBlock::input(r)?;
        let dc_y = DataBlock::input(r)?;
        let dc_u = DataBlock::input(r)?;
        let dc_v = DataBlock::input(r)?;

        Ok(Self {
            motion,
            bits: BitWriter::new(),
            splits,
            modes,
            mv_x,
            mv_y,
            dc_y,
            dc_u,
            dc_v,
        })
    }
}

impl SyntaxBlock for MotionHeader {
    fn size(&self) -> usize {
        self.bits.byte_size() + self.children().iter().map(|c| c.size()).sum::<usize>()
    }

    fn collect(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.bits.bytes());
        for child in self.children() {
            child.collect(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::params::BLOCK_PARAMS_PRESETS;

    fn sample_data() -> MotionData {
        MotionData {
            splits: vec![0x10, 0x20],
            modes: vec![0x30],
            mv_x: vec![0x40, 0x41, 0x42],
            mv_y: vec![0x50],
            dc_y: vec![0x60, 0x61],
            dc_u: vec![0x70],
            dc_v: vec![0x80, 0x81, 0x82],
        }
    }

    const DEFAULTS: MotionParams = MotionParams {
        block: BLOCK_PARAMS_PRESETS[1],
        prediction_mode: 0,
    };

    fn roundtrip(motion: MotionParams, data: MotionData) -> MotionHeader {
        let mut header = MotionHeader::new(motion, data);
        header.output(&DEFAULTS).unwrap();
        let bytes = header.bytes();
        assert_eq!(bytes.len(), header.size());

        let mut r = BitReader::new(&bytes);
        let back = MotionHeader::input(&mut r, &DEFAULTS).unwrap();
        assert_eq!(r.byte_size(), bytes.len());
        back
    }

    #[test]
    fn test_default_params_roundtrip() {
        let back = roundtrip(DEFAULTS, sample_data());
        assert_eq!(back.motion, DEFAULTS);
        assert_eq!(back.data(), sample_data());
    }

    #[test]
    fn test_preset_block_params_roundtrip() {
        let motion = MotionParams {
            block: BLOCK_PARAMS_PRESETS[3],
            prediction_mode: 2,
        };
        let back = roundtrip(motion, sample_data());
        assert_eq!(back.motion, motion);
    }

    #[test]
    fn test_custom_block_params_roundtrip() {
        let motion = MotionParams {
            block: BlockParams::new(20, 16, 10, 8),
            prediction_mode: 0,
        };
        let back = roundtrip(motion, MotionData::default());
        assert_eq!(back.motion, motion);
    }

    #[test]
    fn test_dc_streams_keep_component_order() {
        let mut data = sample_data();
        data.dc_y = vec![0xAA];
        data.dc_u = vec![0xBB];
        data.dc_v = vec![0xCC];
        let back = roundtrip(DEFAULTS, data);
        let d = back.data();
        assert_eq!(d.dc_y, vec![0xAA]);
        assert_eq!(d.dc_u, vec![0xBB]);
        assert_eq!(d.dc_v, vec![0xCC]);
    }

    #[test]
    fn test_bad_preset_index() {
        let mut bits = BitWriter::new();
        bits.write_bit(true); // non-default block params
        bits.write_golomb_u32(9); // no such preset
        bits.align();
        let data = bits.into_bytes();

        let mut r = BitReader::new(&data);
        assert!(matches!(
            MotionHeader::input(&mut r, &DEFAULTS),
            Err(WvError::FormatViolation { field: "block params preset", .. })
        ));
    }

    #[test]
    fn test_bad_prediction_mode() {
        let mut bits = BitWriter::new();
        bits.write_bit(false);
        bits.write_bit(true);
        bits.write_golomb_u32(3);
        bits.align();
        let data = bits.into_bytes();

        let mut r = BitReader::new(&data);
        assert!(matches!(
            MotionHeader::input(&mut r, &DEFAULTS),
            Err(WvError::FormatViolation { field: "prediction mode", .. })
        ));
    }
}
