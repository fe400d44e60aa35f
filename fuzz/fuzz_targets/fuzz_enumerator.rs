//! Fuzz target for the sequence enumerator.
//!
//! Arbitrary slot configurations and region shapes must never make the
//! enumerator panic, emit a sequence that fails to decode, or emit
//! shrinking sizes.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use opt6502::{
    Goal, OptimizationSpec, Region, SearchConfig, SequenceEnumerator, Value, OPCODE_TABLE,
};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    const_slots: u8,
    memory_slots: u8,
    zp_slots: u8,
    use_illegal: bool,
    region_base: u16,
    region_len: u8,
    output_byte: u8,
    steps: u16,
}

fuzz_target!(|input: FuzzInput| {
    let mut spec = OptimizationSpec::new(Goal::Size, 0x1000);
    let len = (input.region_len as usize).max(1);
    if (input.region_base as usize) + len <= 0x10000 {
        spec.input_regions
            .push(Region::new(input.region_base, vec![Value::Any; len]));
    }
    spec.output_regions
        .push(Region::new(0x0200, vec![Value::Exact(input.output_byte)]));

    let mut config = SearchConfig::default();
    config.max_const_slots = input.const_slots.clamp(1, 8);
    config.max_memory_slots = input.memory_slots.clamp(1, 8);
    config.max_zero_page_slots = input.zp_slots.clamp(1, 8);
    config.use_illegal_opcodes = input.use_illegal;
    config.max_sequence_bytes = 6;

    let mut enumerator = SequenceEnumerator::new(&spec, &config);
    let mut last_len = 0;

    for _ in 0..input.steps.min(5000) {
        let sequence = match enumerator.next() {
            Some(s) => s,
            None => break,
        };

        assert!(sequence.len() >= last_len);
        last_len = sequence.len();

        // The emitted bytes decode into whole instructions.
        let mut pos = 0;
        while pos < sequence.len() {
            pos += OPCODE_TABLE[sequence[pos] as usize].size_bytes as usize;
        }
        assert_eq!(pos, sequence.len());
    }
});
