use super::SyntaxBlock;
use crate::bitstream::{BitReader, BitWriter};
use crate::error::{WvError, WvResult};

/// A byte-aligned region whose length is Golomb-coded immediately before its
/// bytes. The payload is opaque to this layer; it is produced and consumed by
/// the arithmetic-coding collaborators.
pub struct DataBlock {
    payload: Vec<u8>,
    bits: BitWriter,
}

impl DataBlock {
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            bits: BitWriter::new(),
        }
    }

    pub fn output(&mut self) -> WvResult<()> {
        let mut bits = BitWriter::new();
        bits.write_golomb_u32(self.payload.len() as u32);
        bits.align();
        self.bits = bits;
        Ok(())
    }

    pub fn input(r: &mut BitReader<'_>) -> WvResult<Self> {
        let len = r.read_golomb_u32()? as usize;
        r.align();
        if r.remaining() < len {
            return Err(WvError::CorruptStream(format!(
                "data block length {} exceeds remaining {} bytes",
                len,
                r.remaining()
            )));
        }
        let mut payload = Vec::with_capacity(len);
        for _ in 0..len {
            payload.push(r.read_byte()?);
        }
        Ok(Self::new(payload))
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl SyntaxBlock for DataBlock {
    fn size(&self) -> usize {
        self.bits.byte_size() + self.payload.len()
    }

    fn collect(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.bits.bytes());
        out.extend_from_slice(&self.payload);
    }
}
