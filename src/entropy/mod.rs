pub mod arith;
pub mod context;

pub use arith::{ArithDecoder, ArithEncoder};
pub use context::{Context, ContextSet};
