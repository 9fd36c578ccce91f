//! Access unit: the root block composing one coded picture and its headers.
//!
//! Every child block is preceded by its Golomb-coded byte length, so a
//! decoder can skip units it does not understand and the root can splice
//! lengths after sizing its children.

use super::defaults::DefaultResolver;
use super::motion::{MotionData, MotionHeader};
use super::params::{
    CodingParams, MotionParams, ParseParams, SourceParams, TransformParams, VideoFormat,
};
use super::picture::{CodingHeader, PictureHeader};
use super::sequence::SequenceHeader;
use super::transform::TransformHeader;
use super::SyntaxBlock;
use crate::bitstream::{BitReader, BitWriter};
use crate::error::{WvError, WvResult};
use serde::{Deserialize, Serialize};

/// Everything one access unit carries, as structured values. The entropy
/// payloads inside `motion` and `components` are produced by the pixel-domain
/// collaborators; this layer treats them as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessUnitParams {
    pub parse: ParseParams,
    pub video_format: VideoFormat,
    pub source: SourceParams,
    pub picture_number: u32,
    pub ref_offsets: Vec<i32>,
    pub coding: CodingParams,
    /// Present exactly when the picture has references.
    pub motion: Option<(MotionParams, MotionData)>,
    pub transform: TransformParams,
    /// Coefficient payloads, Y then U then V.
    pub components: Vec<Vec<u8>>,
}

pub struct AccessUnit {
    sequence: SequenceHeader,
    picture: PictureHeader,
    coding: CodingHeader,
    motion: Option<MotionHeader>,
    transform: TransformHeader,
    prefixes: Vec<Vec<u8>>,
}

fn length_prefix(len: usize) -> Vec<u8> {
    let mut bits = BitWriter::new();
    bits.write_golomb_u32(len as u32);
    bits.into_bytes()
}

impl AccessUnit {
    pub fn new(params: AccessUnitParams) -> WvResult<Self> {
        if params.motion.is_some() != !params.ref_offsets.is_empty() {
            return Err(WvError::EncodingError(
                "motion data must be present exactly for referenced pictures".into(),
            ));
        }
        Ok(Self {
            sequence: SequenceHeader::new(params.parse, params.video_format, params.source),
            picture: PictureHeader::new(params.picture_number, params.ref_offsets),
            coding: CodingHeader::new(params.coding),
            motion: params
                .motion
                .map(|(motion, data)| MotionHeader::new(motion, data)),
            transform: TransformHeader::new(params.transform, params.components),
            prefixes: Vec::new(),
        })
    }

    pub fn output(&mut self, resolver: &dyn DefaultResolver) -> WvResult<()> {
        let format = self.sequence.video_format;
        let frame_type = self.picture.frame_type();
        let num_refs = self.picture.num_refs();

        self.sequence.output(resolver)?;
        self.picture.output()?;
        self.coding
            .output(&resolver.coding_defaults(format, frame_type, num_refs))?;
        if let Some(motion) = &mut self.motion {
            motion.output(&resolver.motion_defaults(format, num_refs))?;
        }
        self.transform
            .output(&resolver.transform_defaults(format, frame_type))?;

        let mut prefixes = Vec::new();
        for child in self.children() {
            prefixes.push(length_prefix(child.size()));
        }
        self.prefixes = prefixes;
        Ok(())
    }

    fn children(&self) -> Vec<&dyn SyntaxBlock> {
        let mut children: Vec<&dyn SyntaxBlock> =
            vec![&self.sequence, &self.picture, &self.coding];
        if let Some(motion) = &self.motion {
            children.push(motion);
        }
        children.push(&self.transform);
        children
    }

    /// Decode one access unit, returning its structured parameters and the
    /// count of bytes consumed.
    pub fn input(
        r: &mut BitReader<'_>,
        resolver: &dyn DefaultResolver,
    ) -> WvResult<(AccessUnitParams, usize)> {
        let mut consumed = 0usize;

        // Reads one length prefix, then hands the rebased remainder to the
        // child so it starts at its own buffer origin.
        fn enter_child(r: &mut BitReader<'_>, consumed: &mut usize) -> WvResult<usize> {
            let len = r.read_golomb_u32()? as usize;
            r.align();
            let prefix = r.byte_size();
            r.remove_leading_bytes(prefix);
            *consumed += prefix;
            if r.remaining() < len {
                return Err(WvError::CorruptStream(format!(
                    "block length {} exceeds remaining {} bytes",
                    len,
                    r.remaining()
                )));
            }
            Ok(len)
        }

        fn leave_child(
            r: &mut BitReader<'_>,
            consumed: &mut usize,
            len: usize,
        ) -> WvResult<()> {
            if r.byte_size() != len {
                return Err(WvError::CorruptStream(format!(
                    "block declared {} bytes but decoded {}",
                    len,
                    r.byte_size()
                )));
            }
            r.remove_leading_bytes(len);
            *consumed += len;
            Ok(())
        }

        let len = enter_child(r, &mut consumed)?;
        let sequence = SequenceHeader::input(r, resolver)?;
        leave_child(r, &mut consumed, len)?;

        let len = enter_child(r, &mut consumed)?;
        let picture = PictureHeader::input(r)?;
        leave_child(r, &mut consumed, len)?;

        let format = sequence.video_format;
        let frame_type = picture.frame_type();
        let num_refs = picture.num_refs();

        let len = enter_child(r, &mut consumed)?;
        let coding =
            CodingHeader::input(r, &resolver.coding_defaults(format, frame_type, num_refs))?;
        leave_child(r, &mut consumed, len)?;

        let motion = if num_refs > 0 {
            let len = enter_child(r, &mut consumed)?;
            let header = MotionHeader::input(r, &resolver.motion_defaults(format, num_refs))?;
            leave_child(r, &mut consumed, len)?;
            Some((header.motion, header.data()))
        } else {
            None
        };

        let len = enter_child(r, &mut consumed)?;
        let transform =
            TransformHeader::input(r, &resolver.transform_defaults(format, frame_type))?;
        leave_child(r, &mut consumed, len)?;

        let params = AccessUnitParams {
            parse: sequence.parse,
            video_format: sequence.video_format,
            source: sequence.source,
            picture_number: picture.picture_number,
            ref_offsets: picture.ref_offsets.clone(),
            coding: coding.coding,
            motion,
            transform: transform.transform,
            components: transform.component_payloads(),
        };
        Ok((params, consumed))
    }
}

impl SyntaxBlock for AccessUnit {
    fn size(&self) -> usize {
        self.prefixes.iter().map(Vec::len).sum::<usize>()
            + self.children().iter().map(|c| c.size()).sum::<usize>()
    }

    fn collect(&self, out: &mut Vec<u8>) {
        for (prefix, child) in self.prefixes.iter().zip(self.children()) {
            out.extend_from_slice(prefix);
            child.collect(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::defaults::StandardResolver;
    use crate::syntax::params::{BlockParams, BLOCK_PARAMS_PRESETS};
    use crate::syntax::FrameType;

    fn intra_params(resolver: &StandardResolver) -> AccessUnitParams {
        AccessUnitParams {
            parse: ParseParams::default(),
            video_format: VideoFormat::Cif,
            source: resolver.source_defaults(VideoFormat::Cif),
            picture_number: 42,
            ref_offsets: Vec::new(),
            coding: resolver.coding_defaults(VideoFormat::Cif, FrameType::Intra, 0),
            motion: None,
            transform: resolver.transform_defaults(VideoFormat::Cif, FrameType::Intra),
            components: vec![vec![9, 8, 7], vec![6, 5], vec![4]],
        }
    }

    #[test]
    fn test_intra_roundtrip() {
        let resolver = StandardResolver::new();
        let params = intra_params(&resolver);

        let mut au = AccessUnit::new(params.clone()).unwrap();
        au.output(&resolver).unwrap();
        let data = au.bytes();
        assert_eq!(data.len(), au.size());

        let mut r = BitReader::new(&data);
        let (back, consumed) = AccessUnit::input(&mut r, &resolver).unwrap();
        assert_eq!(consumed, data.len());
        assert_eq!(back, params);
    }

    #[test]
    fn test_inter_roundtrip() {
        let resolver = StandardResolver::new();
        let mut params = intra_params(&resolver);
        params.ref_offsets = vec![-1];
        params.coding = resolver.coding_defaults(VideoFormat::Cif, FrameType::Inter, 1);
        params.transform = resolver.transform_defaults(VideoFormat::Cif, FrameType::Inter);
        params.motion = Some((
            MotionParams {
                block: BlockParams::new(18, 18, 9, 9),
                prediction_mode: 1,
            },
            MotionData {
                splits: vec![1],
                modes: vec![2, 3],
                mv_x: vec![4, 5, 6],
                mv_y: vec![7],
                dc_y: vec![8],
                dc_u: vec![9],
                dc_v: vec![10, 11],
            },
        ));

        let mut au = AccessUnit::new(params.clone()).unwrap();
        au.output(&resolver).unwrap();
        let data = au.bytes();

        let mut r = BitReader::new(&data);
        let (back, consumed) = AccessUnit::input(&mut r, &resolver).unwrap();
        assert_eq!(consumed, data.len());
        assert_eq!(back, params);
    }

    #[test]
    fn test_motion_presence_must_match_refs() {
        let resolver = StandardResolver::new();
        let mut params = intra_params(&resolver);
        params.motion = Some((
            MotionParams {
                block: BLOCK_PARAMS_PRESETS[0],
                prediction_mode: 0,
            },
            MotionData::default(),
        ));
        assert!(matches!(
            AccessUnit::new(params),
            Err(WvError::EncodingError(_))
        ));
    }

    #[test]
    fn test_decoder_consumes_only_one_unit() {
        let resolver = StandardResolver::new();
        let params = intra_params(&resolver);
        let mut au = AccessUnit::new(params.clone()).unwrap();
        au.output(&resolver).unwrap();
        let mut data = au.bytes();
        let unit_len = data.len();
        data.extend_from_slice(&[0xAB; 17]); // trailing bytes of the next unit

        let mut r = BitReader::new(&data);
        let (back, consumed) = AccessUnit::input(&mut r, &resolver).unwrap();
        assert_eq!(consumed, unit_len);
        assert_eq!(back, params);
    }

    #[test]
    fn test_truncated_unit_is_error() {
        let resolver = StandardResolver::new();
        let params = intra_params(&resolver);
        let mut au = AccessUnit::new(params).unwrap();
        au.output(&resolver).unwrap();
        let data = au.bytes();

        let mut r = BitReader::new(&data[..data.len() - 3]);
        assert!(AccessUnit::input(&mut r, &resolver).is_err());
    }
}
