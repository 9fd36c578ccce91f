//! Exp-Golomb variable-length integer coding.
//!
//! An unsigned value `v` is coded as M zero bits, a terminating one bit, then
//! M info bits of `v - (2^M - 1)` least-significant first, where M is the
//! smallest count with `v < 2^(M+1) - 1`. The signed variant appends one sign
//! bit (one = positive) only when the magnitude is nonzero.

use super::bitio::{BitReader, BitWriter};
use crate::error::{WvError, WvResult};

/// Decode-time cap on the zero-bit prefix; exceeding it means corrupt input.
const MAX_PREFIX_ZEROS: u32 = 64;

impl BitWriter {
    pub fn write_golomb_u32(&mut self, v: u32) {
        let t = v as u64 + 1;
        let m = 63 - t.leading_zeros();
        for _ in 0..m {
            self.write_bit(false);
        }
        self.write_bit(true);
        let info = v as u64 - ((1u64 << m) - 1);
        for i in 0..m {
            self.write_bit((info >> i) & 1 != 0);
        }
    }

    pub fn write_golomb_i32(&mut self, v: i32) {
        self.write_golomb_u32(v.unsigned_abs());
        if v != 0 {
            self.write_bit(v > 0);
        }
    }
}

impl BitReader<'_> {
    pub fn read_golomb_u32(&mut self) -> WvResult<u32> {
        let mut m = 0u32;
        while !self.read_bit() {
            m += 1;
            if m > MAX_PREFIX_ZEROS {
                return Err(WvError::CorruptStream(
                    "exp-Golomb prefix run exceeds 64 zero bits".into(),
                ));
            }
        }
        let mut info = 0u64;
        for i in 0..m {
            if self.read_bit() {
                info |= 1u64 << i;
            }
        }
        let v = (1u128 << m) - 1 + info as u128;
        u32::try_from(v).map_err(|_| {
            WvError::CorruptStream("exp-Golomb value exceeds 32 bits".into())
        })
    }

    pub fn read_golomb_i32(&mut self) -> WvResult<i32> {
        let mag = self.read_golomb_u32()?;
        if mag == 0 {
            return Ok(0);
        }
        let positive = self.read_bit();
        Ok(if positive {
            mag as i32
        } else {
            -(mag as i32)
        })
    }
}
