use crate::error::WvResult;
use crate::syntax::{AccessUnit, AccessUnitParams, DefaultResolver, StandardResolver, SyntaxBlock};

/// Serializes structured access-unit parameters into the wire format.
pub struct WvEncoder<R: DefaultResolver = StandardResolver> {
    resolver: R,
}

impl WvEncoder<StandardResolver> {
    pub fn new() -> Self {
        Self {
            resolver: StandardResolver::new(),
        }
    }
}

impl<R: DefaultResolver> WvEncoder<R> {
    /// Use a non-standard default resolver; the decoding side must be
    /// constructed with the same one.
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn encode_access_unit(&self, params: &AccessUnitParams) -> WvResult<Vec<u8>> {
        let mut unit = AccessUnit::new(params.clone())?;
        unit.output(&self.resolver)?;
        Ok(unit.bytes())
    }
}

impl Default for WvEncoder<StandardResolver> {
    fn default() -> Self {
        Self::new()
    }
}
