use crate::bitstream::BitReader;
use crate::error::WvResult;
use crate::syntax::{AccessUnit, AccessUnitParams, DefaultResolver, StandardResolver};

/// Reconstructs structured access-unit parameters from the wire format.
pub struct WvDecoder<R: DefaultResolver = StandardResolver> {
    resolver: R,
}

impl WvDecoder<StandardResolver> {
    pub fn new() -> Self {
        Self {
            resolver: StandardResolver::new(),
        }
    }
}

impl<R: DefaultResolver> WvDecoder<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Decode one access unit from the front of `data`. Returns the decoded
    /// parameters and the number of bytes consumed, so a caller iterating a
    /// stream of units can advance its own cursor.
    pub fn decode_access_unit(&self, data: &[u8]) -> WvResult<(AccessUnitParams, usize)> {
        let mut reader = BitReader::new(data);
        AccessUnit::input(&mut reader, &self.resolver)
    }
}

impl Default for WvDecoder<StandardResolver> {
    fn default() -> Self {
        Self::new()
    }
}
