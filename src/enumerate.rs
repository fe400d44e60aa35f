//! # Canonical Sequence Enumeration
//!
//! The enumerator produces candidate byte sequences in non-decreasing total
//! byte length, and within one length in a fixed mixed-radix order, so that
//! the first verified candidate under the size goal is provably minimal.
//!
//! ## Alphabet and Slots
//!
//! Rather than enumerating raw operand bytes, each usable opcode carries a
//! small list of abstract *parameter slots* chosen by its addressing mode:
//!
//! - implied / accumulator / relative / indirect: a single NONE slot;
//! - immediate: one slot per canonical constant;
//! - absolute and absolute-indexed: one slot per canonical memory address;
//! - zero-page and indirect-indexed: one slot per canonical zero-page
//!   address.
//!
//! The [`Canonicalizer`] maps slot indices to concrete bytes. It is built
//! deterministically from the specification: memory slots are the output-
//! then input-region cell addresses in ascending order, zero-page slots are
//! the same restricted below 0x100, and constant slots are the distinct
//! EXACT bytes of the specification followed by the boundary defaults
//! {0, 1, 0xFF, 0x80, 0x7F}. This collapses the operand space to the
//! addresses and constants that can matter while covering every
//! structurally distinct program.
//!
//! ## Counter
//!
//! Internal state is an ordered list of `(slot, opcode)` index pairs - one
//! pair per instruction - advanced like a mixed-radix counter with the
//! lowest pair changing fastest. The slot digit's radix is the current
//! opcode's slot count; the opcode digit's radix is the alphabet size. When
//! the whole tuple overflows, the tuple grows by one instruction. An outer
//! byte-size cursor emits only tuples whose encoding is exactly the current
//! size, growing once the tuple space for that size is exhausted; this
//! keeps emission ordered by bytes, which the optimality argument needs.
//!
//! Relative branch operands carry no slots; they are canonicalized to the
//! forward offset that lands at the end of the sequence, so a taken branch
//! always stays within the candidate.

use tracing::trace;

use crate::addressing::AddressingMode;
use crate::config::SearchConfig;
use crate::opcodes::{usable_opcodes, Instruction, OPCODE_TABLE};
use crate::spec::OptimizationSpec;
use crate::value::Value;

/// The kind of parameter a slot stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotKind {
    /// No enumerated parameter (operand bytes are still emitted).
    None,

    /// Index into the canonical constants.
    Const(u8),

    /// Index into the canonical memory addresses.
    Memory(u8),

    /// Index into the canonical zero-page addresses.
    ZeroPage(u8),
}

/// One usable opcode with its enumerable parameter slots.
#[derive(Debug, Clone)]
struct AlphabetEntry {
    opcode: u8,
    slots: Vec<SlotKind>,
}

/// Deterministic slot-to-value table derived from a specification.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    constants: Vec<u8>,
    memory: Vec<u16>,
    zero_page: Vec<u8>,
}

impl Canonicalizer {
    /// Builds the table from the specification's regions and EXACT values,
    /// bounded by the configured slot counts.
    pub fn from_spec(spec: &OptimizationSpec, config: &SearchConfig) -> Self {
        let mut memory: Vec<u16> = Vec::new();
        for region in spec.output_regions.iter().chain(&spec.input_regions) {
            let mut cells: Vec<u16> = region.iter().map(|(addr, _)| addr).collect();
            cells.sort_unstable();
            for addr in cells {
                if !memory.contains(&addr) {
                    memory.push(addr);
                }
            }
        }
        let zero_page: Vec<u8> = memory
            .iter()
            .filter(|&&addr| addr < 0x100)
            .map(|&addr| addr as u8)
            .take(config.max_zero_page_slots as usize)
            .collect();
        memory.truncate(config.max_memory_slots as usize);

        let mut constants: Vec<u8> = Vec::new();
        let push_exact = |value: Value, constants: &mut Vec<u8>| {
            if let Value::Exact(v) = value {
                if !constants.contains(&v) {
                    constants.push(v);
                }
            }
        };
        for value in [
            spec.output_cpu.a,
            spec.output_cpu.x,
            spec.output_cpu.y,
            spec.output_cpu.sp,
        ] {
            push_exact(value, &mut constants);
        }
        for region in spec.output_regions.iter().chain(&spec.input_regions) {
            for (_, value) in region.iter() {
                push_exact(value, &mut constants);
            }
        }
        for value in [
            spec.input_cpu.a,
            spec.input_cpu.x,
            spec.input_cpu.y,
            spec.input_cpu.sp,
        ] {
            push_exact(value, &mut constants);
        }
        for default in [0x00, 0x01, 0xFF, 0x80, 0x7F] {
            if !constants.contains(&default) {
                constants.push(default);
            }
        }
        constants.truncate(config.max_const_slots as usize);

        Self {
            constants,
            memory,
            zero_page,
        }
    }

    pub fn constant_slots(&self) -> usize {
        self.constants.len()
    }

    pub fn memory_slots(&self) -> usize {
        self.memory.len()
    }

    pub fn zero_page_slots(&self) -> usize {
        self.zero_page.len()
    }

    pub fn constant(&self, index: u8) -> u8 {
        self.constants[index as usize]
    }

    pub fn memory_address(&self, index: u8) -> u16 {
        self.memory[index as usize]
    }

    pub fn zero_page_address(&self, index: u8) -> u8 {
        self.zero_page[index as usize]
    }
}

/// Resumable candidate generator.
///
/// # Examples
///
/// ```
/// use opt6502::{OptimizationSpec, Goal, SearchConfig, SequenceEnumerator, Value};
///
/// let mut spec = OptimizationSpec::new(Goal::Size, 0x1000);
/// spec.output_cpu.a = Value::Exact(0x07);
/// let config = SearchConfig::default();
///
/// let mut enumerator = SequenceEnumerator::new(&spec, &config);
/// let first = enumerator.next().unwrap();
/// assert_eq!(first.len(), 1); // sizes are non-decreasing from one byte
/// ```
pub struct SequenceEnumerator {
    alphabet: Vec<AlphabetEntry>,
    canonicalizer: Canonicalizer,

    /// `(slot, opcode)` index pairs, lowest pair fastest.
    pairs: Vec<(u8, u8)>,

    /// Byte size currently being emitted.
    current_size: usize,

    /// Upper bound on emitted byte size.
    max_size: usize,

    exhausted: bool,
}

impl SequenceEnumerator {
    /// Builds the enumerator for a specification: alphabet from the legal
    /// (and optionally illegal) opcodes, canonical table from the spec's
    /// regions and constants.
    pub fn new(spec: &OptimizationSpec, config: &SearchConfig) -> Self {
        let canonicalizer = Canonicalizer::from_spec(spec, config);
        let opcodes = usable_opcodes(config.use_illegal_opcodes);
        let alphabet = build_alphabet(&opcodes, &canonicalizer);

        let mut enumerator = Self {
            alphabet,
            canonicalizer,
            pairs: Vec::new(),
            current_size: 0,
            max_size: config.max_sequence_bytes,
            exhausted: false,
        };
        enumerator.reset();
        enumerator
    }

    /// Restarts enumeration from one-byte sequences.
    pub fn reset(&mut self) {
        self.pairs = vec![(0, 0)];
        self.current_size = 1;
        self.exhausted = self.alphabet.is_empty();
    }

    /// Truncates the outer size iteration. Enumeration continues in place;
    /// once the current size passes the bound, `next` returns `None`.
    pub fn set_max_length(&mut self, max_bytes: usize) {
        self.max_size = max_bytes;
    }

    /// Replaces the opcode alphabet and restarts. Opcodes whose addressing
    /// mode has no canonical slots available (for example absolute
    /// addressing in a specification without memory regions) are dropped.
    pub fn set_valid_opcodes(&mut self, opcodes: &[u8]) {
        self.alphabet = build_alphabet(opcodes, &self.canonicalizer);
        self.reset();
    }

    /// Produces the next candidate, or `None` when the bounded space is
    /// exhausted.
    pub fn next(&mut self) -> Option<Vec<u8>> {
        loop {
            if self.exhausted || self.current_size > self.max_size {
                return None;
            }

            // More instructions than bytes cannot fit the current size;
            // everything smaller was already emitted, so grow the size.
            if self.pairs.len() > self.current_size {
                self.current_size += 1;
                self.pairs = vec![(0, 0)];
                trace!(size = self.current_size, "enumerator advancing to next size");
                continue;
            }

            let size = self.tuple_size();
            if size == self.current_size && !self.should_prune() {
                let sequence = self.decode();
                self.advance();
                return Some(sequence);
            }

            self.advance();
        }
    }

    /// Encoded byte size of the current tuple.
    fn tuple_size(&self) -> usize {
        self.pairs
            .iter()
            .map(|&(_, opcode_i)| {
                OPCODE_TABLE[self.alphabet[opcode_i as usize].opcode as usize].size_bytes as usize
            })
            .sum()
    }

    /// Decodes the current tuple into bytes, resolving canonical slots.
    fn decode(&self) -> Vec<u8> {
        let total = self.tuple_size();
        let mut bytes = Vec::with_capacity(total);

        for &(slot_i, opcode_i) in &self.pairs {
            let entry = &self.alphabet[opcode_i as usize];
            let metadata = &OPCODE_TABLE[entry.opcode as usize];
            bytes.push(entry.opcode);

            let slot = entry.slots[slot_i as usize];
            match metadata.addressing_mode {
                AddressingMode::Implicit | AddressingMode::Accumulator => {}
                AddressingMode::Relative => {
                    // Canonical forward offset to the end of the sequence.
                    let after = bytes.len() + 1;
                    bytes.push((total - after) as u8);
                }
                AddressingMode::Immediate => match slot {
                    SlotKind::Const(i) => bytes.push(self.canonicalizer.constant(i)),
                    _ => bytes.push(0),
                },
                AddressingMode::ZeroPage
                | AddressingMode::ZeroPageX
                | AddressingMode::ZeroPageY
                | AddressingMode::IndirectX
                | AddressingMode::IndirectY => match slot {
                    SlotKind::ZeroPage(i) => bytes.push(self.canonicalizer.zero_page_address(i)),
                    _ => bytes.push(0),
                },
                AddressingMode::Absolute
                | AddressingMode::AbsoluteX
                | AddressingMode::AbsoluteY => match slot {
                    SlotKind::Memory(i) => {
                        let addr = self.canonicalizer.memory_address(i);
                        bytes.push((addr & 0xFF) as u8);
                        bytes.push((addr >> 8) as u8);
                    }
                    _ => {
                        bytes.push(0);
                        bytes.push(0);
                    }
                },
                AddressingMode::Indirect => {
                    // NONE slot: canonical zero operand.
                    bytes.push(0);
                    bytes.push(0);
                }
            }
        }

        bytes
    }

    /// Drops sequences that provably cannot be a best solution: all-NOP
    /// sequences and back-to-back immediate loads of the same register
    /// (the first load is dead).
    fn should_prune(&self) -> bool {
        let all_nop = self.pairs.iter().all(|&(_, opcode_i)| {
            OPCODE_TABLE[self.alphabet[opcode_i as usize].opcode as usize].instruction
                == Instruction::Nop
        });
        if all_nop {
            return true;
        }

        for window in self.pairs.windows(2) {
            let first = &OPCODE_TABLE[self.alphabet[window[0].1 as usize].opcode as usize];
            let second = &OPCODE_TABLE[self.alphabet[window[1].1 as usize].opcode as usize];
            let redundant_load = first.addressing_mode == AddressingMode::Immediate
                && second.addressing_mode == AddressingMode::Immediate
                && first.instruction == second.instruction
                && matches!(
                    first.instruction,
                    Instruction::Lda | Instruction::Ldx | Instruction::Ldy
                );
            if redundant_load {
                return true;
            }
        }

        false
    }

    /// Advances the mixed-radix counter by one step: lowest digit first,
    /// slot before opcode, carrying into longer tuples on overflow.
    fn advance(&mut self) {
        let positions = self.pairs.len() * 2;

        for i in 0..positions {
            let pair = i / 2;
            let is_opcode_digit = i % 2 == 1;

            let max = if is_opcode_digit {
                self.alphabet.len() - 1
            } else {
                let opcode_i = self.pairs[pair].1 as usize;
                self.alphabet[opcode_i].slots.len() - 1
            };

            let digit = if is_opcode_digit {
                self.pairs[pair].1
            } else {
                self.pairs[pair].0
            };

            if (digit as usize) < max {
                if is_opcode_digit {
                    self.pairs[pair].1 += 1;
                } else {
                    self.pairs[pair].0 += 1;
                }
                // Lower digits restart from zero.
                for lower in 0..pair {
                    self.pairs[lower] = (0, 0);
                }
                if is_opcode_digit {
                    self.pairs[pair].0 = 0;
                }
                return;
            }
        }

        // Full overflow: one more instruction, all digits reset.
        let len = self.pairs.len() + 1;
        self.pairs = vec![(0, 0); len];
    }
}

/// Pairs each usable opcode with its parameter slots; opcodes whose mode
/// has no canonical values available are dropped from the alphabet.
fn build_alphabet(opcodes: &[u8], canonicalizer: &Canonicalizer) -> Vec<AlphabetEntry> {
    let mut alphabet = Vec::with_capacity(opcodes.len());

    for &opcode in opcodes {
        let metadata = &OPCODE_TABLE[opcode as usize];
        let slots: Vec<SlotKind> = match metadata.addressing_mode {
            AddressingMode::Implicit
            | AddressingMode::Accumulator
            | AddressingMode::Relative
            | AddressingMode::Indirect => vec![SlotKind::None],
            AddressingMode::Immediate => (0..canonicalizer.constant_slots())
                .map(|i| SlotKind::Const(i as u8))
                .collect(),
            AddressingMode::Absolute | AddressingMode::AbsoluteX | AddressingMode::AbsoluteY => {
                (0..canonicalizer.memory_slots())
                    .map(|i| SlotKind::Memory(i as u8))
                    .collect()
            }
            AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY => (0..canonicalizer.zero_page_slots())
                .map(|i| SlotKind::ZeroPage(i as u8))
                .collect(),
        };

        if !slots.is_empty() {
            alphabet.push(AlphabetEntry { opcode, slots });
        }
    }

    alphabet
}
