//! # Search Configuration
//!
//! All tunables of the optimizer live in [`SearchConfig`], which is passed
//! explicitly to the search driver and handed down to the components that
//! need it. There is no process-wide configuration state.

use std::time::Duration;

/// Tunable parameters for one search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Permit the stable undocumented opcodes (LAX, SAX, DCP, ISB, SLO,
    /// RLA, SRE, RRA) in both the enumerator alphabet and the interpreter.
    pub use_illegal_opcodes: bool,

    /// Skip flag comparison when judging candidates. Useful when the
    /// surrounding code recomputes flags anyway.
    pub ignore_output_flags: bool,

    /// Canonical constant slots available to immediate operands.
    pub max_const_slots: u8,

    /// Canonical memory slots available to absolute operands.
    pub max_memory_slots: u8,

    /// Canonical zero-page slots available to zero-page and indirect
    /// operands.
    pub max_zero_page_slots: u8,

    /// Upper bound on candidate length in bytes.
    pub max_sequence_bytes: usize,

    /// Upper bound on the number of test cases kept after sampling.
    pub max_test_cases: usize,

    /// Instruction budget per execution; candidates that loop forever fail
    /// with an execution-limit error instead of hanging the search.
    pub max_instructions: usize,

    /// How many bytes past the first verified candidate the speed search
    /// keeps exploring.
    pub speed_window: usize,

    /// Wall-clock budget for the whole search. `None` means unbounded.
    pub time_budget: Option<Duration>,

    /// Seed for the test-case sampling RNG. Fixed per search so reruns are
    /// reproducible.
    pub rng_seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            use_illegal_opcodes: false,
            ignore_output_flags: false,
            max_const_slots: 4,
            max_memory_slots: 4,
            max_zero_page_slots: 4,
            max_sequence_bytes: 32,
            max_test_cases: 128,
            max_instructions: 10_000,
            speed_window: 4,
            time_budget: None,
            rng_seed: 0x6502_6502,
        }
    }
}
