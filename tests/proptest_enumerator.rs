//! Property-based tests for the sequence enumerator.
//!
//! The counter must behave like a bijection: over any prefix of the
//! emission stream there are no duplicates, byte lengths never decrease,
//! and every emitted sequence decodes into whole instructions.

use std::collections::HashSet;

use opt6502::{
    Goal, OptimizationSpec, Region, SearchConfig, SequenceEnumerator, Value, OPCODE_TABLE,
};
use proptest::prelude::*;

fn spec_with_regions() -> OptimizationSpec {
    let mut spec = OptimizationSpec::new(Goal::Size, 0x1000);
    spec.input_regions
        .push(Region::new(0x0080, vec![Value::Any, Value::Any]));
    spec.output_regions
        .push(Region::new(0x0200, vec![Value::Exact(0x55), Value::Any]));
    spec
}

/// Every emitted sequence splits exactly into instructions.
fn decodes_cleanly(sequence: &[u8]) -> bool {
    let mut pos = 0;
    while pos < sequence.len() {
        pos += OPCODE_TABLE[sequence[pos] as usize].size_bytes as usize;
    }
    pos == sequence.len()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// No duplicates, non-decreasing sizes, and clean decoding over a
    /// prefix of the stream, across slot-count configurations.
    #[test]
    fn prop_prefix_is_unique_ordered_decodable(
        const_slots in 1u8..5,
        memory_slots in 1u8..5,
        zp_slots in 1u8..5,
        use_illegal in any::<bool>(),
    ) {
        let spec = spec_with_regions();
        let mut config = SearchConfig::default();
        config.max_const_slots = const_slots;
        config.max_memory_slots = memory_slots;
        config.max_zero_page_slots = zp_slots;
        config.use_illegal_opcodes = use_illegal;

        let mut enumerator = SequenceEnumerator::new(&spec, &config);
        let mut seen = HashSet::new();
        let mut last_len = 0;

        for _ in 0..3000 {
            let sequence = match enumerator.next() {
                Some(s) => s,
                None => break,
            };
            prop_assert!(sequence.len() >= last_len, "length decreased");
            last_len = sequence.len();
            prop_assert!(decodes_cleanly(&sequence));
            prop_assert!(
                seen.insert(sequence.clone()),
                "duplicate sequence {:02x?}",
                sequence
            );
        }
    }

    /// Resetting replays exactly the same stream.
    #[test]
    fn prop_reset_replays_stream(prefix in 1usize..500) {
        let spec = spec_with_regions();
        let config = SearchConfig::default();
        let mut enumerator = SequenceEnumerator::new(&spec, &config);

        let first: Vec<Vec<u8>> = (0..prefix).filter_map(|_| enumerator.next()).collect();
        enumerator.reset();
        let second: Vec<Vec<u8>> = (0..prefix).filter_map(|_| enumerator.next()).collect();

        prop_assert_eq!(first, second);
    }
}
