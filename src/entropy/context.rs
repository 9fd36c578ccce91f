//! Adaptive probability contexts for the binary arithmetic coder.

use std::sync::OnceLock;

/// Reciprocal table: `RECIP[w] = 65536 / w` for w in 1..=255. Computed once
/// per process and shared read-only; converts a context's total weight to a
/// normalized probability without runtime division.
static RECIP: OnceLock<[u32; 256]> = OnceLock::new();

fn recip_table() -> &'static [u32; 256] {
    RECIP.get_or_init(|| {
        let mut table = [0u32; 256];
        for (w, entry) in table.iter_mut().enumerate().skip(1) {
            *entry = (1u32 << 16) / w as u32;
        }
        table
    })
}

/// One adaptive probability estimate.
///
/// Invariant: both counts stay >= 1 and their total stays <= 255, maintained
/// by halving with round-up when an update would overflow the total. The
/// encoder and decoder must update their contexts in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    num_zero: u16,
    num_one: u16,
}

impl Context {
    pub fn new(num_zero: u16, num_one: u16) -> Self {
        assert!(num_zero >= 1 && num_one >= 1, "context counts must be >= 1");
        assert!(num_zero + num_one <= 255, "context total must be <= 255");
        Self { num_zero, num_one }
    }

    /// Probability of a zero bit on a 16-bit scale.
    pub fn prob_zero(&self) -> u32 {
        let total = (self.num_zero + self.num_one) as usize;
        self.num_zero as u32 * recip_table()[total]
    }

    pub fn update(&mut self, bit: bool) {
        if bit {
            self.num_one += 1;
        } else {
            self.num_zero += 1;
        }
        if self.num_zero + self.num_one > 255 {
            self.num_zero = (self.num_zero + 1) >> 1;
            self.num_one = (self.num_one + 1) >> 1;
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// The context table a codec seeds its entropy coders with. Encoder and
/// decoder instances for one stream must start from identical seeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSet {
    contexts: Vec<Context>,
}

impl ContextSet {
    pub fn new(seeds: &[(u16, u16)]) -> Self {
        Self {
            contexts: seeds.iter().map(|&(z, o)| Context::new(z, o)).collect(),
        }
    }

    /// `n` contexts all starting at the even 1/1 estimate.
    pub fn uniform(n: usize) -> Self {
        Self {
            contexts: vec![Context::default(); n],
        }
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn ctx_mut(&mut self, index: usize) -> &mut Context {
        &mut self.contexts[index]
    }

    pub fn ctx(&self, index: usize) -> &Context {
        &self.contexts[index]
    }
}
