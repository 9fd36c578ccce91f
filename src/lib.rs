pub mod bitstream;
pub mod decoder;
pub mod encoder;
pub mod entropy;
pub mod error;
pub mod syntax;

pub use bitstream::{BitReader, BitWriter};
pub use decoder::WvDecoder;
pub use encoder::WvEncoder;
pub use entropy::{ArithDecoder, ArithEncoder, Context, ContextSet};
pub use error::{WvError, WvResult};
pub use syntax::{
    AccessUnitParams, BlockParams, CodingParams, DefaultResolver, FrameType, MotionData,
    MotionParams, ParseParams, SourceParams, StandardResolver, SyntaxBlock, TransformParams,
    VideoFormat,
};

pub const VERSION: &str = "0.3.0";

#[cfg(test)]
mod tests {
    use super::*;

    fn base_params(format: VideoFormat) -> AccessUnitParams {
        let resolver = StandardResolver::new();
        AccessUnitParams {
            parse: ParseParams::default(),
            video_format: format,
            source: resolver.source_defaults(format),
            picture_number: 1,
            ref_offsets: Vec::new(),
            coding: resolver.coding_defaults(format, FrameType::Intra, 0),
            motion: None,
            transform: resolver.transform_defaults(format, FrameType::Intra),
            components: vec![Vec::new(), Vec::new(), Vec::new()],
        }
    }

    #[test]
    fn test_intra_unit_roundtrip() {
        let mut params = base_params(VideoFormat::Hd720);
        params.components = vec![vec![1, 2, 3], vec![4], vec![5, 6]];

        let encoded = WvEncoder::new().encode_access_unit(&params).unwrap();
        let (decoded, consumed) = WvDecoder::new().decode_access_unit(&encoded).unwrap();

        assert_eq!(consumed, encoded.len());
        assert_eq!(decoded, params);
    }

    #[test]
    fn test_inter_unit_with_arith_payloads() {
        let resolver = StandardResolver::new();
        let mut params = base_params(VideoFormat::Sd576);
        params.ref_offsets = vec![-1, 1];
        params.coding = resolver.coding_defaults(VideoFormat::Sd576, FrameType::Inter, 2);
        params.transform = resolver.transform_defaults(VideoFormat::Sd576, FrameType::Inter);

        // Arithmetic-code a vector field the way a motion collaborator would.
        let mv_bits: Vec<bool> = (0..600).map(|i| i % 5 == 0).collect();
        let seeds = [(10u16, 2u16)];
        let mut ctx = ContextSet::new(&seeds);
        let mut enc = ArithEncoder::new();
        for &bit in &mv_bits {
            enc.encode(bit, ctx.ctx_mut(0));
        }
        let mv_x = enc.flush();

        params.motion = Some((
            resolver.motion_defaults(VideoFormat::Sd576, 2),
            MotionData {
                mv_x: mv_x.clone(),
                ..MotionData::default()
            },
        ));
        params.components = vec![vec![0xAA; 40], vec![0xBB; 10], vec![0xCC; 10]];

        let encoded = WvEncoder::new().encode_access_unit(&params).unwrap();
        let (decoded, consumed) = WvDecoder::new().decode_access_unit(&encoded).unwrap();
        assert_eq!(consumed, encoded.len());
        assert_eq!(decoded, params);

        // The carried payload still arithmetic-decodes bit-exactly.
        let (_, data) = decoded.motion.unwrap();
        let mut ctx = ContextSet::new(&seeds);
        let mut dec = ArithDecoder::new(&data.mv_x);
        for (i, &bit) in mv_bits.iter().enumerate() {
            assert_eq!(dec.decode(ctx.ctx_mut(0)), bit, "mv bit {} diverged", i);
        }
    }

    #[test]
    fn test_all_default_unit_is_compact() {
        let params = base_params(VideoFormat::Cif);
        let encoded = WvEncoder::new().encode_access_unit(&params).unwrap();
        // Fully elided headers: every block collapses to flags and alignment.
        assert!(encoded.len() < 32, "default unit too large: {}", encoded.len());
    }

    #[test]
    fn test_unit_stream_iteration() {
        let encoder = WvEncoder::new();
        let decoder = WvDecoder::new();

        let mut stream = Vec::new();
        let mut originals = Vec::new();
        for n in 0..3u32 {
            let mut params = base_params(VideoFormat::Qcif);
            params.picture_number = n;
            params.components = vec![vec![n as u8; 5], Vec::new(), Vec::new()];
            stream.extend_from_slice(&encoder.encode_access_unit(&params).unwrap());
            originals.push(params);
        }

        let mut pos = 0;
        for original in &originals {
            let (decoded, consumed) = decoder.decode_access_unit(&stream[pos..]).unwrap();
            assert_eq!(decoded, *original);
            pos += consumed;
        }
        assert_eq!(pos, stream.len());
    }

    #[test]
    fn test_corrupt_stream_is_typed_error() {
        let params = base_params(VideoFormat::Cif);
        let mut encoded = WvEncoder::new().encode_access_unit(&params).unwrap();
        encoded.truncate(encoded.len() / 2);
        assert!(WvDecoder::new().decode_access_unit(&encoded).is_err());
    }
}
