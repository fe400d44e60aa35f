//! # Search Driver
//!
//! Orchestrates the enumerator, the verifier, and the transformation cache
//! into the superoptimization loop:
//!
//! ```text
//! while candidate <- enumerator.next():
//!     candidate <- subsequence_substitute(candidate)   # via the cache
//!     if verifier.verify(candidate):
//!         update the metric-best
//!         SIZE: return immediately (provably optimal)
//!         SPEED: clamp the enumerator to len + window and keep going
//!         record the transformation in the cache
//! ```
//!
//! Because candidates arrive in non-decreasing byte length and the size
//! metric *is* the length, the first verified candidate under the size
//! goal is a minimum-length solution. For speed no such ordering exists;
//! the driver returns the cycle-minimum seen within the bounded window.
//!
//! The search runs serially; the wall-clock budget is checked
//! cooperatively between candidates.

use std::time::Instant;

use tracing::{debug, info};

use crate::cache::{TransformationCache, TransformationKey};
use crate::config::SearchConfig;
use crate::cpu::{Cpu, Register};
use crate::enumerate::SequenceEnumerator;
use crate::error::{SearchError, SpecError};
use crate::memory::TrackedMemory;
use crate::opcodes::OPCODE_TABLE;
use crate::spec::{Goal, OptimizationSpec, Region};
use crate::value::Value;
use crate::verifier::{exact_input_memory, Verifier};

/// Callbacks for observing a running search. All methods have empty
/// defaults; implement the ones of interest.
pub trait ProgressListener {
    /// A new metric-best solution was found.
    fn on_new_best(&mut self, _solution: &[u8], _metric: u64, _sequences_tested: u64) {}

    /// Periodic progress: candidates tested, candidates verified, cache
    /// population.
    fn on_progress(&mut self, _sequences_tested: u64, _valid_found: u64, _cache_len: usize) {}
}

/// A verified search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// The winning byte sequence.
    pub bytes: Vec<u8>,

    /// Cycle count of the base-case run.
    pub cycles: u64,

    /// The metric value under the specification's goal.
    pub metric: u64,

    /// Candidates examined before this solution was returned.
    pub sequences_tested: u64,
}

/// The superoptimization search over one specification.
///
/// The specification is borrowed read-only for the whole search; the
/// driver owns every other component.
///
/// # Examples
///
/// ```
/// use opt6502::{Goal, OptimizationSpec, Search, SearchConfig, Value};
///
/// // Synthesize "A = 0" from scratch.
/// let mut spec = OptimizationSpec::new(Goal::Size, 0x1000);
/// spec.input_cpu.a = Value::Any;
/// spec.input_cpu.x = Value::Exact(0);
/// spec.input_cpu.y = Value::Exact(0);
/// spec.input_cpu.sp = Value::Exact(0xFF);
/// spec.input_flags.c = Value::Exact(0);
/// spec.input_flags.z = Value::Exact(0);
/// spec.input_flags.i = Value::Exact(0);
/// spec.input_flags.d = Value::Exact(0);
/// spec.input_flags.b = Value::Exact(0);
/// spec.input_flags.v = Value::Exact(0);
/// spec.input_flags.n = Value::Exact(0);
/// spec.output_cpu.a = Value::Exact(0x00);
///
/// let config = SearchConfig::default();
/// let mut search = Search::new(&spec, &config).unwrap();
/// let solution = search.optimize().unwrap();
/// // With X pinned to zero the search beats LDA #$00: one-byte TXA.
/// assert_eq!(solution.bytes, vec![0x8A]);
/// ```
pub struct Search<'a> {
    spec: &'a OptimizationSpec,
    config: &'a SearchConfig,
    verifier: Verifier<'a>,
    enumerator: SequenceEnumerator,
    cache: TransformationCache,
    listener: Option<Box<dyn ProgressListener + 'a>>,
}

impl<'a> Search<'a> {
    /// Prepares a search: validates the specification, generates test
    /// cases (including the EQU reference pass), and builds the
    /// enumeration alphabet.
    pub fn new(spec: &'a OptimizationSpec, config: &'a SearchConfig) -> Result<Self, SpecError> {
        let verifier = Verifier::new(spec, config)?;
        let enumerator = SequenceEnumerator::new(spec, config);
        Ok(Self {
            spec,
            config,
            verifier,
            enumerator,
            cache: TransformationCache::new(),
            listener: None,
        })
    }

    /// Installs a progress listener.
    pub fn set_progress_listener(&mut self, listener: Box<dyn ProgressListener + 'a>) {
        self.listener = Some(listener);
    }

    /// Restricts the enumeration alphabet to the given opcodes and
    /// restarts enumeration. Useful when the caller knows which
    /// instruction families can contribute.
    pub fn set_valid_opcodes(&mut self, opcodes: &[u8]) {
        self.enumerator.set_valid_opcodes(opcodes);
    }

    /// Access to the verifier, mainly for reporting on a found solution.
    pub fn verifier(&self) -> &Verifier<'a> {
        &self.verifier
    }

    /// Runs the search to completion, the deadline, or exhaustion.
    pub fn optimize(&mut self) -> Result<Solution, SearchError> {
        let deadline = self.config.time_budget.map(|b| Instant::now() + b);

        let mut best: Option<Solution> = None;
        let mut best_metric = u64::MAX;
        let mut sequences_tested: u64 = 0;
        let mut valid_found: u64 = 0;

        while let Some(candidate) = self.enumerator.next() {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    debug!(sequences_tested, "search deadline reached");
                    break;
                }
            }

            let candidate = self.substitute(candidate);
            sequences_tested += 1;

            if self.verifier.verify(&candidate) {
                valid_found += 1;

                let cycles = match self.verifier.cycles(&candidate) {
                    Some(c) => c,
                    None => continue,
                };
                let metric = match self.spec.goal {
                    Goal::Size => candidate.len() as u64,
                    Goal::Speed => cycles,
                };

                if metric < best_metric {
                    best_metric = metric;
                    let solution = Solution {
                        bytes: candidate.clone(),
                        cycles,
                        metric,
                        sequences_tested,
                    };
                    info!(
                        metric,
                        cycles,
                        bytes = candidate.len(),
                        sequences_tested,
                        "new best solution"
                    );
                    if let Some(listener) = self.listener.as_mut() {
                        listener.on_new_best(&candidate, metric, sequences_tested);
                    }

                    match self.spec.goal {
                        // Candidates arrive in non-decreasing size, so the
                        // first hit is minimal.
                        Goal::Size => return Ok(solution),
                        Goal::Speed => {
                            let window = (candidate.len() + self.config.speed_window)
                                .min(self.config.max_sequence_bytes);
                            self.enumerator.set_max_length(window);
                            best = Some(solution);
                        }
                    }
                }

                if let Some(key) = self.transformation_of(&candidate) {
                    self.cache.add(key, &candidate, cycles);
                }
            }

            if sequences_tested % 1000 == 0 {
                debug!(
                    sequences_tested,
                    valid_found,
                    cache = self.cache.len(),
                    "search progress"
                );
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_progress(sequences_tested, valid_found, self.cache.len());
                }
            }
        }

        if let Some(listener) = self.listener.as_mut() {
            listener.on_progress(sequences_tested, valid_found, self.cache.len());
        }

        best.ok_or(SearchError::NoSolution {
            max_bytes: self.config.max_sequence_bytes,
        })
    }

    /// Rewrites a candidate using cached transformations: the whole
    /// sequence first, then contiguous sub-ranges at instruction
    /// boundaries. Every replacement is strictly shorter, so substitution
    /// terminates.
    fn substitute(&self, sequence: Vec<u8>) -> Vec<u8> {
        if self.cache.is_empty() {
            return sequence;
        }

        let mut current = sequence;

        if let Some(key) = self.transformation_of(&current) {
            if let Some(better) = self.cache.find_optimal(&key, self.spec.goal) {
                if better.len() < current.len() {
                    current = better.to_vec();
                }
            }
        }

        'rescan: loop {
            let boundaries = instruction_boundaries(&current);
            if boundaries.len() <= 2 {
                return current;
            }

            for i in 0..boundaries.len() - 1 {
                for j in (i + 1)..boundaries.len() {
                    let (start, end) = (boundaries[i], boundaries[j]);
                    if end - start <= 2 {
                        continue;
                    }

                    let range = &current[start..end];
                    let key = match self.transformation_of(range) {
                        Some(k) => k,
                        None => continue,
                    };
                    if let Some(replacement) = self.cache.find_optimal(&key, self.spec.goal) {
                        if replacement.len() < end - start {
                            let mut rewritten =
                                Vec::with_capacity(current.len() - (end - start) + replacement.len());
                            rewritten.extend_from_slice(&current[..start]);
                            rewritten.extend_from_slice(replacement);
                            rewritten.extend_from_slice(&current[end..]);
                            current = rewritten;
                            continue 'rescan;
                        }
                    }
                }
            }

            return current;
        }
    }

    /// Computes the transformation a sequence realizes by executing it
    /// from the specification's EXACT input state. Returns `None` when the
    /// sequence cannot run to completion there.
    fn transformation_of(&self, sequence: &[u8]) -> Option<TransformationKey> {
        let mut mem = TrackedMemory::new();
        mem.set_input_regions(self.spec.input_regions.clone());
        mem.set_output_regions(self.spec.output_regions.clone());
        mem.add_input_region(Region::new(
            self.spec.run_address,
            vec![Value::Any; sequence.len().saturating_add(1)],
        ));

        let exact_bytes = exact_input_memory(self.spec);
        for (&addr, &byte) in &exact_bytes {
            mem.initialize(addr, byte);
        }
        for (i, &byte) in sequence.iter().enumerate() {
            mem.initialize(self.spec.run_address.wrapping_add(i as u16), byte);
        }

        let mut cpu = Cpu::new(self.config.use_illegal_opcodes);
        if let Value::Exact(v) = self.spec.input_cpu.a {
            cpu.set_a(v);
        }
        if let Value::Exact(v) = self.spec.input_cpu.x {
            cpu.set_x(v);
        }
        if let Value::Exact(v) = self.spec.input_cpu.y {
            cpu.set_y(v);
        }
        if let Value::Exact(v) = self.spec.input_cpu.sp {
            cpu.set_sp(v);
        }
        if let Value::Exact(v) = self.spec.input_flags.c {
            cpu.set_flag_c(v != 0);
        }
        if let Value::Exact(v) = self.spec.input_flags.z {
            cpu.set_flag_z(v != 0);
        }
        if let Value::Exact(v) = self.spec.input_flags.i {
            cpu.set_flag_i(v != 0);
        }
        if let Value::Exact(v) = self.spec.input_flags.d {
            cpu.set_flag_d(v != 0);
        }
        if let Value::Exact(v) = self.spec.input_flags.b {
            cpu.set_flag_b(v != 0);
        }
        if let Value::Exact(v) = self.spec.input_flags.v {
            cpu.set_flag_v(v != 0);
        }
        if let Value::Exact(v) = self.spec.input_flags.n {
            cpu.set_flag_n(v != 0);
        }

        let execution = cpu.execute(&mut mem, self.spec.run_address, self.config.max_instructions);
        if !execution.completed {
            return None;
        }

        let mut key = TransformationKey::default();

        if let Value::Exact(v) = self.spec.input_cpu.a {
            key.input.registers.insert(Register::A, v);
        }
        if let Value::Exact(v) = self.spec.input_cpu.x {
            key.input.registers.insert(Register::X, v);
        }
        if let Value::Exact(v) = self.spec.input_cpu.y {
            key.input.registers.insert(Register::Y, v);
        }
        if let Value::Exact(v) = self.spec.input_cpu.sp {
            key.input.registers.insert(Register::Sp, v);
        }
        key.input.memory = exact_bytes;

        key.output.registers.insert(Register::A, cpu.a());
        key.output.registers.insert(Register::X, cpu.x());
        key.output.registers.insert(Register::Y, cpu.y());
        key.output.registers.insert(Register::Sp, cpu.sp());
        for &addr in mem.writes() {
            key.output.memory.insert(addr, mem.peek(addr));
        }

        Some(key)
    }
}

/// Byte offsets of instruction starts within a sequence, including the
/// trailing end offset.
pub(crate) fn instruction_boundaries(sequence: &[u8]) -> Vec<usize> {
    let mut boundaries = vec![0];
    let mut pos = 0;
    while pos < sequence.len() {
        pos += OPCODE_TABLE[sequence[pos] as usize].size_bytes as usize;
        if pos <= sequence.len() {
            boundaries.push(pos);
        } else {
            break;
        }
    }
    boundaries
}
