//! Context-adaptive binary arithmetic coder.
//!
//! A renormalizing range coder with 16-bit low/high bounds and an underflow
//! counter for deferred bits across carry boundaries. The encoder and decoder
//! perform bit-for-bit identical arithmetic: same split computation, same
//! rounding, and the context update happens after coding on both sides. Any
//! divergence desynchronizes the stream silently, so symmetry here is the
//! governing invariant.

use super::context::Context;
use crate::bitstream::BitWriter;

const HALF: u32 = 0x8000;
const QUARTER: u32 = 0x4000;
const THREE_QUARTERS: u32 = 0xC000;

fn split_point(low: u32, high: u32, ctx: &Context) -> u32 {
    let area = high - low + 1;
    (area * ctx.prob_zero()) >> 16
}

pub struct ArithEncoder {
    low: u32,
    high: u32,
    underflow: u32,
    bits: BitWriter,
}

impl ArithEncoder {
    pub fn new() -> Self {
        Self {
            low: 0,
            high: 0xFFFF,
            underflow: 0,
            bits: BitWriter::new(),
        }
    }

    pub fn encode(&mut self, bit: bool, ctx: &mut Context) {
        let split = split_point(self.low, self.high, ctx);
        if bit {
            self.low += split;
        } else {
            self.high = self.low + split - 1;
        }
        ctx.update(bit);

        loop {
            if self.high < HALF {
                self.emit(false);
            } else if self.low >= HALF {
                self.emit(true);
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.underflow += 1;
                self.low -= QUARTER;
                self.high -= QUARTER;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
        }
    }

    fn emit(&mut self, bit: bool) {
        self.bits.write_bit(bit);
        for _ in 0..self.underflow {
            self.bits.write_bit(!bit);
        }
        self.underflow = 0;
    }

    /// Emit the final disambiguating bit plus any deferred underflow bits and
    /// byte-align the output.
    pub fn flush(mut self) -> Vec<u8> {
        self.underflow += 1;
        let bit = self.low >= QUARTER;
        self.emit(bit);
        self.bits.into_bytes()
    }
}

impl Default for ArithEncoder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ArithDecoder {
    low: u32,
    high: u32,
    code: u32,
    // Payload padded with two all-ones sentinel bytes so reads near
    // end-of-stream see deterministic bits.
    buf: Vec<u8>,
    byte_pos: usize,
    bit_pos: u8,
}

impl ArithDecoder {
    pub fn new(data: &[u8]) -> Self {
        let mut buf = Vec::with_capacity(data.len() + 2);
        buf.extend_from_slice(data);
        buf.extend_from_slice(&[0xFF, 0xFF]);
        let mut dec = Self {
            low: 0,
            high: 0xFFFF,
            code: 0,
            buf,
            byte_pos: 0,
            bit_pos: 0,
        };
        for _ in 0..16 {
            dec.code = (dec.code << 1) | dec.next_bit();
        }
        dec
    }

    fn next_bit(&mut self) -> u32 {
        let bit = if self.byte_pos < self.buf.len() {
            ((self.buf[self.byte_pos] >> (7 - self.bit_pos)) & 1) as u32
        } else {
            1
        };
        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
        bit
    }

    pub fn decode(&mut self, ctx: &mut Context) -> bool {
        let split = split_point(self.low, self.high, ctx);
        // Corrupt input can place code outside [low, high]; saturate
        // instead of wrapping.
        let bit = self.code.saturating_sub(self.low) >= split;
        if bit {
            self.low += split;
        } else {
            self.high = self.low + split - 1;
        }
        ctx.update(bit);

        loop {
            if self.high < HALF {
                // agreed zero bit, nothing to subtract
            } else if self.low >= HALF {
                self.low -= HALF;
                self.high -= HALF;
                self.code = self.code.saturating_sub(HALF);
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.low -= QUARTER;
                self.high -= QUARTER;
                self.code = self.code.saturating_sub(QUARTER);
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
            self.code = ((self.code << 1) & 0xFFFF) | self.next_bit();
        }
        bit
    }
}
