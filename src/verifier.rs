//! # Candidate Verification
//!
//! The verifier judges a candidate byte sequence against every test case of
//! the specification. For each case it:
//!
//! 1. builds a fresh [`TrackedMemory`] with the specification's regions
//!    plus a fetch window over the installed candidate (one byte longer
//!    than the candidate, so falling off the end reads 0x00 and halts);
//! 2. seeds the case's input bytes and installs the candidate via
//!    `initialize`;
//! 3. sets the CPU from the case and executes from the run address;
//! 4. checks the final CPU, flags, and output memory against the contract,
//!    and that every written address lies in some output region.
//!
//! Verification is fail-fast: the first failing case rejects the
//! candidate. [`Verifier::verify_explain`] reports the same outcome as a
//! structured [`VerifyFailure`] naming the offending entity.

use std::collections::BTreeMap;

use crate::config::SearchConfig;
use crate::cpu::{Cpu, CpuState, Flag, Register};
use crate::error::{CpuError, SpecError};
use crate::memory::TrackedMemory;
use crate::spec::{OptimizationSpec, Region};
use crate::testgen::{generate_test_cases, TestCase};
use crate::value::Value;

/// The value class a failed entity was expected to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// The specification names this exact byte.
    Exact(u8),

    /// The entity had to keep its initial value (shown).
    Same(u8),

    /// The entity had to match the reference execution (shown).
    Reference(u8),
}

/// A structured description of why a candidate failed one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyFailure {
    /// Execution did not complete.
    Execution { case: usize, error: Option<CpuError> },

    /// A register ended with the wrong value.
    Register {
        case: usize,
        register: Register,
        observed: u8,
        expected: Expected,
    },

    /// A flag ended with the wrong value.
    Flag {
        case: usize,
        flag: Flag,
        observed: bool,
        expected: Expected,
    },

    /// An output memory byte ended with the wrong value.
    Memory {
        case: usize,
        address: u16,
        observed: u8,
        expected: Expected,
    },

    /// The candidate wrote an address outside every output region.
    UnauthorizedWrite { case: usize, address: u16 },
}

/// Verifies candidates against a specification.
///
/// Holds the specification by reference for the duration of the search and
/// owns the generated test cases.
pub struct Verifier<'a> {
    spec: &'a OptimizationSpec,
    config: &'a SearchConfig,
    cases: Vec<TestCase>,
}

impl<'a> Verifier<'a> {
    /// Validates the specification, generates its test cases, and runs the
    /// EQU reference pass when required.
    pub fn new(spec: &'a OptimizationSpec, config: &'a SearchConfig) -> Result<Self, SpecError> {
        spec.validate()?;
        let cases = generate_test_cases(spec, config)?;
        Ok(Self {
            spec,
            config,
            cases,
        })
    }

    /// The generated test cases (the base case is first).
    pub fn test_cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Returns true if the candidate satisfies every test case.
    pub fn verify(&self, sequence: &[u8]) -> bool {
        self.cases
            .iter()
            .enumerate()
            .all(|(index, case)| self.run_case(sequence, case, index).is_ok())
    }

    /// Like [`Verifier::verify`], but reports the first failure.
    pub fn verify_explain(&self, sequence: &[u8]) -> Result<(), VerifyFailure> {
        for (index, case) in self.cases.iter().enumerate() {
            self.run_case(sequence, case, index)?;
        }
        Ok(())
    }

    /// Cycle count of an isolated run against the base case, used as the
    /// speed metric and reported with the solution.
    pub fn cycles(&self, sequence: &[u8]) -> Option<u64> {
        let case = self.cases.first()?;
        let (_, _, execution) = self.execute_candidate(sequence, case);
        if execution.completed {
            Some(execution.cycles)
        } else {
            None
        }
    }

    /// Sets up memory for a candidate run over one test case and executes.
    fn execute_candidate(
        &self,
        sequence: &[u8],
        case: &TestCase,
    ) -> (Cpu, TrackedMemory, crate::cpu::Execution) {
        let mut mem = TrackedMemory::new();
        mem.set_input_regions(self.spec.input_regions.clone());
        mem.set_output_regions(self.spec.output_regions.clone());

        // Fetch window: candidate plus one trailing byte for the halting
        // BRK read.
        let window = sequence.len().saturating_add(1);
        mem.add_input_region(Region::new(
            self.spec.run_address,
            vec![Value::Any; window],
        ));

        // Read-only context blocks remain fetchable alongside the
        // candidate.
        for block in &self.spec.code_blocks {
            if block.base != self.spec.run_address && !block.bytes.is_empty() {
                let len = block.bytes.len().saturating_add(1);
                mem.add_input_region(Region::new(block.base, vec![Value::Any; len]));
                for (i, &byte) in block.bytes.iter().enumerate() {
                    mem.initialize(block.base.wrapping_add(i as u16), byte);
                }
            }
        }

        for (&addr, &byte) in &case.memory {
            mem.initialize(addr, byte);
        }
        for (i, &byte) in sequence.iter().enumerate() {
            mem.initialize(self.spec.run_address.wrapping_add(i as u16), byte);
        }

        let mut cpu = Cpu::new(self.config.use_illegal_opcodes);
        cpu.apply_state(&case.cpu);
        let execution = cpu.execute(&mut mem, self.spec.run_address, self.config.max_instructions);

        (cpu, mem, execution)
    }

    fn run_case(
        &self,
        sequence: &[u8],
        case: &TestCase,
        index: usize,
    ) -> Result<(), VerifyFailure> {
        let (cpu, mem, execution) = self.execute_candidate(sequence, case);

        if !execution.completed {
            return Err(VerifyFailure::Execution {
                case: index,
                error: execution.error,
            });
        }

        let final_state = cpu.snapshot();
        self.check_registers(&final_state, case, index)?;
        if !self.config.ignore_output_flags {
            self.check_flags(&final_state, case, index)?;
        }
        self.check_memory(&mem, case, index)?;
        self.check_writes(&mem, index)?;

        Ok(())
    }

    fn check_registers(
        &self,
        state: &CpuState,
        case: &TestCase,
        index: usize,
    ) -> Result<(), VerifyFailure> {
        let expectations = [
            (Register::A, self.spec.output_cpu.a),
            (Register::X, self.spec.output_cpu.x),
            (Register::Y, self.spec.output_cpu.y),
            (Register::Sp, self.spec.output_cpu.sp),
        ];

        for (register, value) in expectations {
            let observed = state.register(register);
            let expected = match value {
                Value::Exact(v) => Expected::Exact(v),
                Value::Same => Expected::Same(case.cpu.register(register)),
                Value::Any | Value::Equ => continue,
            };
            let want = match expected {
                Expected::Exact(v) | Expected::Same(v) | Expected::Reference(v) => v,
            };
            if observed != want {
                return Err(VerifyFailure::Register {
                    case: index,
                    register,
                    observed,
                    expected,
                });
            }
        }
        Ok(())
    }

    fn check_flags(
        &self,
        state: &CpuState,
        case: &TestCase,
        index: usize,
    ) -> Result<(), VerifyFailure> {
        let expectations = [
            (Flag::C, self.spec.output_flags.c),
            (Flag::Z, self.spec.output_flags.z),
            (Flag::I, self.spec.output_flags.i),
            (Flag::D, self.spec.output_flags.d),
            (Flag::B, self.spec.output_flags.b),
            (Flag::V, self.spec.output_flags.v),
            (Flag::N, self.spec.output_flags.n),
        ];

        for (flag, value) in expectations {
            let observed = state.flag(flag);
            let (want, expected) = match value {
                Value::Exact(v) => (v != 0, Expected::Exact(v)),
                Value::Same => {
                    let initial = case.cpu.flag(flag);
                    (initial, Expected::Same(initial as u8))
                }
                Value::Any | Value::Equ => continue,
            };
            if observed != want {
                return Err(VerifyFailure::Flag {
                    case: index,
                    flag,
                    observed,
                    expected,
                });
            }
        }
        Ok(())
    }

    fn check_memory(
        &self,
        mem: &TrackedMemory,
        case: &TestCase,
        index: usize,
    ) -> Result<(), VerifyFailure> {
        for region in &self.spec.output_regions {
            for (addr, value) in region.iter() {
                let expected = match value {
                    Value::Exact(v) => Expected::Exact(v),
                    Value::Same => Expected::Same(case.initial_byte(addr)),
                    Value::Equ => Expected::Reference(
                        case.equ_expected.get(&addr).copied().unwrap_or(0),
                    ),
                    Value::Any => continue,
                };
                let want = match expected {
                    Expected::Exact(v) | Expected::Same(v) | Expected::Reference(v) => v,
                };
                let observed = mem.peek(addr);
                if observed != want {
                    return Err(VerifyFailure::Memory {
                        case: index,
                        address: addr,
                        observed,
                        expected,
                    });
                }
            }
        }
        Ok(())
    }

    /// Every address in the final write set must lie in some output
    /// region. The memory policy already rejects stray writes during
    /// execution; this states the contract over the completed run.
    fn check_writes(&self, mem: &TrackedMemory, index: usize) -> Result<(), VerifyFailure> {
        for &addr in mem.writes() {
            let authorized = self
                .spec
                .output_regions
                .iter()
                .any(|r| r.contains(addr));
            if !authorized {
                return Err(VerifyFailure::UnauthorizedWrite {
                    case: index,
                    address: addr,
                });
            }
        }
        Ok(())
    }
}

/// Builds the memory image a candidate-independent execution needs: EXACT
/// input bytes only, code blocks installed, fetch windows over them.
///
/// Used by the search driver to extract transformation keys.
pub(crate) fn exact_input_memory(spec: &OptimizationSpec) -> BTreeMap<u16, u8> {
    let mut bytes = BTreeMap::new();
    for region in &spec.input_regions {
        for (addr, value) in region.iter() {
            if let Value::Exact(v) = value {
                bytes.insert(addr, v);
            }
        }
    }
    bytes
}
