use crate::error::{WvError, WvResult};
use byteorder::{BigEndian, WriteBytesExt};

/// MSB-first bit writer over an owned, growable byte buffer.
///
/// Byte-granular operations require the writer to be aligned; callers align
/// explicitly with [`BitWriter::align`] at the protocol points that demand it.
pub struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    bits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            current: 0,
            bits: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.current = (self.current << 1) | (bit as u8);
        self.bits += 1;
        if self.bits == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.bits = 0;
        }
    }

    pub fn write_bits(&mut self, value: u32, count: u8) {
        for i in (0..count).rev() {
            self.write_bit((value >> i) & 1 != 0);
        }
    }

    /// Flush the partial byte, padding the unused low bits with zeros.
    pub fn align(&mut self) {
        if self.bits > 0 {
            self.current <<= 8 - self.bits;
            self.bytes.push(self.current);
            self.current = 0;
            self.bits = 0;
        }
    }

    pub fn is_aligned(&self) -> bool {
        self.bits == 0
    }

    pub fn write_byte(&mut self, byte: u8) {
        debug_assert!(self.is_aligned(), "write_byte on unaligned writer");
        self.bytes.push(byte);
    }

    pub fn write_u32(&mut self, value: u32) {
        debug_assert!(self.is_aligned(), "write_u32 on unaligned writer");
        self.bytes.write_u32::<BigEndian>(value).unwrap();
    }

    /// Bytes fully flushed so far; excludes any partial byte.
    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.align();
        self.bytes
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// MSB-first bit reader borrowing a byte buffer, sharing one position with
/// every nested block decoded from it.
///
/// Reading past the end yields zero bits; the composing syntax layer owns
/// length accounting and surfaces truncation as a typed error.
pub struct BitReader<'a> {
    bytes: &'a [u8],
    byte_pos: usize,
    bit_pos: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    pub fn read_bit(&mut self) -> bool {
        if self.byte_pos >= self.bytes.len() {
            return false;
        }
        let bit = (self.bytes[self.byte_pos] >> (7 - self.bit_pos)) & 1 != 0;
        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
        bit
    }

    pub fn read_bits(&mut self, count: u8) -> u32 {
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | (self.read_bit() as u32);
        }
        value
    }

    /// Discard the remaining bits of the current byte.
    pub fn align(&mut self) {
        if self.bit_pos > 0 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
    }

    pub fn is_aligned(&self) -> bool {
        self.bit_pos == 0
    }

    pub fn read_byte(&mut self) -> WvResult<u8> {
        debug_assert!(self.is_aligned(), "read_byte on unaligned reader");
        if self.byte_pos >= self.bytes.len() {
            return Err(WvError::CorruptStream("read past end of buffer".into()));
        }
        let b = self.bytes[self.byte_pos];
        self.byte_pos += 1;
        Ok(b)
    }

    pub fn read_u32(&mut self) -> WvResult<u32> {
        let mut value = 0u32;
        for _ in 0..4 {
            value = (value << 8) | self.read_byte()? as u32;
        }
        Ok(value)
    }

    /// Bytes fully consumed so far; excludes any partially read byte.
    pub fn byte_size(&self) -> usize {
        self.byte_pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.byte_pos.min(self.bytes.len())
    }

    /// Drop `n` already-consumed bytes and rebase the position, so a child
    /// block can treat the remainder as its own buffer start.
    pub fn remove_leading_bytes(&mut self, n: usize) {
        debug_assert!(self.is_aligned(), "remove_leading_bytes on unaligned reader");
        debug_assert!(n <= self.byte_pos, "removing bytes not yet consumed");
        self.bytes = &self.bytes[n..];
        self.byte_pos -= n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_roundtrip() {
        let mut w = BitWriter::new();
        let pattern = [true, false, true, true, false, false, true, false, true];
        for &b in &pattern {
            w.write_bit(b);
        }
        let data = w.into_bytes();
        assert_eq!(data.len(), 2);

        let mut r = BitReader::new(&data);
        for &b in &pattern {
            assert_eq!(r.read_bit(), b);
        }
    }

    #[test]
    fn test_align_pads_with_zeros() {
        for n in 1..=24usize {
            let mut w = BitWriter::new();
            for _ in 0..n {
                w.write_bit(true);
            }
            w.align();
            assert_eq!(w.byte_size(), n.div_ceil(8), "wrong size for {} bits", n);

            let last = *w.bytes().last().unwrap();
            let used = if n % 8 == 0 { 8 } else { n % 8 };
            assert_eq!(last & ((1u8 << (8 - used)) - 1), 0, "low bits not zero");
        }
    }

    #[test]
    fn test_byte_granular_fields() {
        let mut w = BitWriter::new();
        w.write_bit(true);
        w.align();
        w.write_byte(0xAB);
        w.write_u32(0xDEADBEEF);
        let data = w.into_bytes();
        assert_eq!(data.len(), 6);

        let mut r = BitReader::new(&data);
        assert!(r.read_bit());
        r.align();
        assert_eq!(r.read_byte().unwrap(), 0xAB);
        assert_eq!(r.read_u32().unwrap(), 0xDEADBEEF);
        assert_eq!(r.byte_size(), 6);
    }

    #[test]
    fn test_read_past_end() {
        let data = [0xFFu8];
        let mut r = BitReader::new(&data);
        assert_eq!(r.read_bits(8), 0xFF);
        assert!(!r.read_bit());
        assert!(r.read_byte().is_err());
    }

    #[test]
    fn test_remove_leading_bytes() {
        let data = [0x01u8, 0x02, 0x03, 0x04];
        let mut r = BitReader::new(&data);
        assert_eq!(r.read_byte().unwrap(), 0x01);
        assert_eq!(r.read_byte().unwrap(), 0x02);
        r.remove_leading_bytes(2);
        assert_eq!(r.byte_size(), 0);
        assert_eq!(r.remaining(), 2);
        assert_eq!(r.read_byte().unwrap(), 0x03);
    }
}
