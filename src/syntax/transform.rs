use super::data::DataBlock;
use super::params::{TransformParams, MAX_TRANSFORM_DEPTH, MAX_WAVELET_FILTER};
use super::SyntaxBlock;
use crate::bitstream::{BitReader, BitWriter};
use crate::error::{WvError, WvResult};

pub const NUM_COMPONENTS: usize = 3;

pub struct TransformHeader {
    pub transform: TransformParams,
    bits: BitWriter,
    /// Coefficient payloads, Y then U then V.
    components: Vec<DataBlock>,
}

impl TransformHeader {
    pub fn new(transform: TransformParams, components: Vec<Vec<u8>>) -> Self {
        Self {
            transform,
            bits: BitWriter::new(),
            components: components.into_iter().map(DataBlock::new).collect(),
        }
    }

    pub fn component_payloads(&self) -> Vec<Vec<u8>> {
        self.components
            .iter()
            .map(|c| c.payload().to_vec())
            .collect()
    }

    pub fn output(&mut self, defaults: &TransformParams) -> WvResult<()> {
        if self.components.len() != NUM_COMPONENTS {
            return Err(WvError::EncodingError(format!(
                "expected {} component payloads, got {}",
                NUM_COMPONENTS,
                self.components.len()
            )));
        }
        if self.transform.wavelet_filter > MAX_WAVELET_FILTER
            || self.transform.depth == 0
            || self.transform.depth > MAX_TRANSFORM_DEPTH
            || self.transform.codeblock_mode > 1
        {
            return Err(WvError::EncodingError(format!(
                "transform params out of range: {:?}",
                self.transform
            )));
        }
        let mut bits = BitWriter::new();

        // Whole-block elision: one flag covers every transform field.
        let non_default = self.transform != *defaults;
        bits.write_bit(non_default);
        if non_default {
            bits.write_golomb_u32(self.transform.wavelet_filter);

            let custom_depth = self.transform.depth != defaults.depth;
            bits.write_bit(custom_depth);
            if custom_depth {
                bits.write_golomb_u32(self.transform.depth);
            }

            let custom_cb = self.transform.codeblock_mode != defaults.codeblock_mode;
            bits.write_bit(custom_cb);
            if custom_cb {
                bits.write_golomb_u32(self.transform.codeblock_mode);
            }
        }

        bits.align();
        self.bits = bits;

        for component in &mut self.components {
            component.output()?;
        }
        Ok(())
    }

    pub fn input(r: &mut BitReader<'_>, defaults: &TransformParams) -> WvResult<Self> {
        let mut transform = *defaults;

        if r.read_bit() {
            let filter = r.read_golomb_u32()?;
            if filter > MAX_WAVELET_FILTER {
                return Err(WvError::FormatViolation {
                    block: "transform header",
                    field: "wavelet filter",
                    value: filter as u64,
                });
            }
            transform.wavelet_filter = filter;

            if r.read_bit() {
                let depth = r.read_golomb_u32()?;
                if depth == 0 || depth > MAX_TRANSFORM_DEPTH {
                    return Err(WvError::FormatViolation {
                        block: "transform header",
                        field: "transform depth",
                        value: depth as u64,
                    });
                }
                transform.depth = depth;
            }

            if r.read_bit() {
                let mode = r.read_golomb_u32()?;
                if mode > 1 {
                    return Err(WvError::FormatViolation {
                        block: "transform header",
                        field: "codeblock mode",
                        value: mode as u64,
                    });
                }
                transform.codeblock_mode = mode;
            }
        }

        r.align();

        let mut components = Vec::with_capacity(NUM_COMPONENTS);
        for _ in 0..NUM_COMPONENTS {
            components.push(DataBlock::input(r)?);
        }

        Ok(Self {
            transform,
            bits: BitWriter::new(),
            components,
        })
    }
}

impl SyntaxBlock for TransformHeader {
    fn size(&self) -> usize {
        self.bits.byte_size() + self.components.iter().map(|c| c.size()).sum::<usize>()
    }

    fn collect(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.bits.bytes());
        for component in &self.components {
            component.collect(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: TransformParams = TransformParams {
        wavelet_filter: 0,
        depth: 4,
        codeblock_mode: 0,
    };

    fn payloads() -> Vec<Vec<u8>> {
        vec![vec![1, 2, 3, 4], vec![5, 6], vec![7]]
    }

    fn roundtrip(transform: TransformParams) -> TransformHeader {
        let mut header = TransformHeader::new(transform, payloads());
        header.output(&DEFAULTS).unwrap();
        let bytes = header.bytes();
        assert_eq!(bytes.len(), header.size());

        let mut r = BitReader::new(&bytes);
        let back = TransformHeader::input(&mut r, &DEFAULTS).unwrap();
        assert_eq!(r.byte_size(), bytes.len());
        back
    }

    #[test]
    fn test_default_transform_is_single_flag() {
        let mut header = TransformHeader::new(DEFAULTS, payloads());
        header.output(&DEFAULTS).unwrap();
        // One zero flag bit aligned to a byte, then the three sub-streams.
        let child_bytes: usize = payloads().iter().map(|p| p.len() + 1).sum();
        assert_eq!(header.size(), 1 + child_bytes);

        let back = roundtrip(DEFAULTS);
        assert_eq!(back.transform, DEFAULTS);
        assert_eq!(back.component_payloads(), payloads());
    }

    #[test]
    fn test_non_default_transform_roundtrip() {
        let transform = TransformParams {
            wavelet_filter: 3,
            depth: 6,
            codeblock_mode: 1,
        };
        let back = roundtrip(transform);
        assert_eq!(back.transform, transform);
    }

    #[test]
    fn test_component_order_is_preserved() {
        let back = roundtrip(DEFAULTS);
        let payloads = back.component_payloads();
        assert_eq!(payloads[0], vec![1, 2, 3, 4]);
        assert_eq!(payloads[1], vec![5, 6]);
        assert_eq!(payloads[2], vec![7]);
    }

    #[test]
    fn test_bad_wavelet_filter() {
        let mut bits = BitWriter::new();
        bits.write_bit(true);
        bits.write_golomb_u32(7); // beyond MAX_WAVELET_FILTER
        bits.align();
        let data = bits.into_bytes();

        let mut r = BitReader::new(&data);
        assert!(matches!(
            TransformHeader::input(&mut r, &DEFAULTS),
            Err(WvError::FormatViolation { field: "wavelet filter", .. })
        ));
    }

    #[test]
    fn test_bad_depth() {
        let mut bits = BitWriter::new();
        bits.write_bit(true);
        bits.write_golomb_u32(2); // filter
        bits.write_bit(true);
        bits.write_golomb_u32(0); // zero depth
        bits.align();
        let data = bits.into_bytes();

        let mut r = BitReader::new(&data);
        assert!(matches!(
            TransformHeader::input(&mut r, &DEFAULTS),
            Err(WvError::FormatViolation { field: "transform depth", .. })
        ));
    }
}
