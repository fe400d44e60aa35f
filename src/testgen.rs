//! # Test-Case Generation
//!
//! Expands a specification's ANY inputs into a finite, boundary-biased
//! sample of concrete inputs.
//!
//! ## Algorithm
//!
//! 1. Seed one base case from all EXACT inputs (unconstrained slots default
//!    to zero).
//! 2. For each ANY register, expand every current case over the boundary
//!    set {0, 1, 0x7F, 0x80, 0xFF}; ANY flags expand over {clear, set}.
//! 3. For each ANY input memory byte that affects output - the same address
//!    is EXACT, SAME, or EQU in some output region - expand over the
//!    boundary set.
//! 4. Whenever the working set outgrows its ceiling, and once more at the
//!    end against `max_test_cases`, keep the boundary-critical cases and
//!    fill the remainder by uniform sampling.
//!
//! The sampler is an `StdRng` seeded from the configuration, so the same
//! specification and seed always produce the same cases. The all-zeros base
//! case survives every reduction.
//!
//! ## EQU Reference Pass
//!
//! When any output cell is EQU, the code blocks' original bytes are
//! executed once per test case under the same input state; the bytes
//! captured at EQU-marked addresses become that case's expected outputs.
//! A failing reference run - or EQU together with a synthesis block - is a
//! fatal specification error.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::config::SearchConfig;
use crate::cpu::{Cpu, CpuState, Flag, Register};
use crate::error::SpecError;
use crate::memory::TrackedMemory;
use crate::spec::{OptimizationSpec, Region};
use crate::value::Value;

/// Boundary values used to exercise wildcard bytes.
pub const BOUNDARY_VALUES: [u8; 5] = [0x00, 0x01, 0x7F, 0x80, 0xFF];

/// One concrete instantiation of the specification's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Concrete initial registers and flags.
    pub cpu: CpuState,

    /// Concrete initial memory; addresses absent from the map read as zero.
    pub memory: BTreeMap<u16, u8>,

    /// Expected bytes at EQU-marked addresses, captured by the reference
    /// pass. Empty when the specification has no EQU outputs.
    pub equ_expected: BTreeMap<u16, u8>,
}

impl TestCase {
    /// The initial value of an address in this case (zero when unset).
    pub fn initial_byte(&self, addr: u16) -> u8 {
        self.memory.get(&addr).copied().unwrap_or(0)
    }
}

/// Generates the deterministic test-case set for a specification.
///
/// Runs the EQU reference pass when the specification requires one.
pub fn generate_test_cases(
    spec: &OptimizationSpec,
    config: &SearchConfig,
) -> Result<Vec<TestCase>, SpecError> {
    let mut rng = StdRng::seed_from_u64(config.rng_seed);

    // The working set may transiently exceed the final bound so that later
    // axes still get to vary before sampling cuts in.
    let ceiling = (config.max_test_cases * 4).max(256);

    let mut cases = vec![base_case(spec)];

    for reg in [Register::A, Register::X, Register::Y, Register::Sp] {
        if input_register_value(spec, reg).is_wildcard_like() {
            expand_register(&mut cases, reg);
            reduce(&mut cases, ceiling, &mut rng);
        }
    }

    for flag in [
        Flag::C,
        Flag::Z,
        Flag::I,
        Flag::D,
        Flag::B,
        Flag::V,
        Flag::N,
    ] {
        if input_flag_value(spec, flag).is_wildcard_like() {
            expand_flag(&mut cases, flag);
            reduce(&mut cases, ceiling, &mut rng);
        }
    }

    for region in &spec.input_regions {
        for (addr, value) in region.iter() {
            if value.is_wildcard_like() && affects_output(spec, addr) {
                expand_memory(&mut cases, addr);
                reduce(&mut cases, ceiling, &mut rng);
            }
        }
    }

    reduce(&mut cases, config.max_test_cases, &mut rng);

    debug!(cases = cases.len(), "generated test cases");

    if spec.has_equ_outputs() {
        run_reference_pass(spec, config, &mut cases)?;
    }

    Ok(cases)
}

/// Builds the base case: every EXACT input applied, everything else zero.
fn base_case(spec: &OptimizationSpec) -> TestCase {
    let mut cpu = CpuState::default();

    for reg in [Register::A, Register::X, Register::Y, Register::Sp] {
        if let Value::Exact(v) = input_register_value(spec, reg) {
            cpu.set_register(reg, v);
        }
    }
    for flag in [
        Flag::C,
        Flag::Z,
        Flag::I,
        Flag::D,
        Flag::B,
        Flag::V,
        Flag::N,
    ] {
        if let Value::Exact(v) = input_flag_value(spec, flag) {
            cpu.set_flag(flag, v != 0);
        }
    }

    let mut memory = BTreeMap::new();
    for region in &spec.input_regions {
        for (addr, value) in region.iter() {
            if let Value::Exact(v) = value {
                memory.insert(addr, v);
            }
        }
    }

    TestCase {
        cpu,
        memory,
        equ_expected: BTreeMap::new(),
    }
}

fn input_register_value(spec: &OptimizationSpec, reg: Register) -> Value {
    match reg {
        Register::A => spec.input_cpu.a,
        Register::X => spec.input_cpu.x,
        Register::Y => spec.input_cpu.y,
        Register::Sp => spec.input_cpu.sp,
    }
}

fn input_flag_value(spec: &OptimizationSpec, flag: Flag) -> Value {
    match flag {
        Flag::C => spec.input_flags.c,
        Flag::Z => spec.input_flags.z,
        Flag::I => spec.input_flags.i,
        Flag::D => spec.input_flags.d,
        Flag::B => spec.input_flags.b,
        Flag::V => spec.input_flags.v,
        Flag::N => spec.input_flags.n,
    }
}

/// True if the output side constrains this address in a way that depends
/// on the input byte: EXACT and SAME directly, EQU through the reference
/// execution.
fn affects_output(spec: &OptimizationSpec, addr: u16) -> bool {
    spec.output_regions.iter().any(|r| {
        matches!(
            r.value_at(addr),
            Some(Value::Exact(_)) | Some(Value::Same) | Some(Value::Equ)
        )
    })
}

fn expand_register(cases: &mut Vec<TestCase>, reg: Register) {
    let mut expanded = Vec::with_capacity(cases.len() * BOUNDARY_VALUES.len());
    for case in cases.iter() {
        for &value in &BOUNDARY_VALUES {
            let mut variant = case.clone();
            variant.cpu.set_register(reg, value);
            expanded.push(variant);
        }
    }
    *cases = expanded;
}

fn expand_flag(cases: &mut Vec<TestCase>, flag: Flag) {
    let mut expanded = Vec::with_capacity(cases.len() * 2);
    for case in cases.iter() {
        for value in [false, true] {
            let mut variant = case.clone();
            variant.cpu.set_flag(flag, value);
            expanded.push(variant);
        }
    }
    *cases = expanded;
}

fn expand_memory(cases: &mut Vec<TestCase>, addr: u16) {
    let mut expanded = Vec::with_capacity(cases.len() * BOUNDARY_VALUES.len());
    for case in cases.iter() {
        for &value in &BOUNDARY_VALUES {
            let mut variant = case.clone();
            variant.memory.insert(addr, value);
            expanded.push(variant);
        }
    }
    *cases = expanded;
}

/// True if any varied slot of the case holds a boundary extreme. Such
/// cases are preferred when the set must shrink.
fn is_critical(case: &TestCase) -> bool {
    const EXTREMES: [u8; 3] = [0x00, 0x80, 0xFF];
    EXTREMES.contains(&case.cpu.a)
        || EXTREMES.contains(&case.cpu.x)
        || EXTREMES.contains(&case.cpu.y)
        || case.memory.values().any(|v| EXTREMES.contains(v))
}

/// Shrinks the set to `bound`: element 0 (the base lineage) always stays,
/// critical cases are kept first, and the rest is filled by uniform
/// sampling.
fn reduce(cases: &mut Vec<TestCase>, bound: usize, rng: &mut StdRng) {
    if cases.len() <= bound {
        return;
    }

    let tail = cases.split_off(1);
    let (critical, other): (Vec<_>, Vec<_>) = tail.into_iter().partition(is_critical);

    let room = bound.saturating_sub(1);
    let mut kept: Vec<TestCase> = critical.into_iter().take(room).collect();

    if kept.len() < room {
        let mut sampled: Vec<TestCase> = other
            .choose_multiple(rng, room - kept.len())
            .cloned()
            .collect();
        kept.append(&mut sampled);
    }

    cases.append(&mut kept);
}

/// Executes the original code blocks once per test case and records the
/// bytes at EQU-marked addresses as that case's expected outputs.
fn run_reference_pass(
    spec: &OptimizationSpec,
    config: &SearchConfig,
    cases: &mut [TestCase],
) -> Result<(), SpecError> {
    let run_block = spec.run_block().ok_or_else(|| SpecError::ReferencePass {
        reason: "no code block at the run address".to_string(),
    })?;
    if run_block.is_synthesis() {
        return Err(SpecError::ReferencePass {
            reason: "EQU outputs require original bytes, but the run block is empty".to_string(),
        });
    }

    let equ_addresses: Vec<u16> = spec
        .output_regions
        .iter()
        .flat_map(|r| r.iter())
        .filter(|(_, v)| matches!(v, Value::Equ))
        .map(|(addr, _)| addr)
        .collect();

    for (index, case) in cases.iter_mut().enumerate() {
        let mut mem = TrackedMemory::new();
        mem.set_input_regions(spec.input_regions.clone());
        mem.set_output_regions(spec.output_regions.clone());

        for block in &spec.code_blocks {
            // The block bytes plus one trailing zero so a fall-through
            // fetch decodes BRK and halts.
            let window = block.bytes.len().saturating_add(1);
            mem.add_input_region(Region::new(block.base, vec![Value::Any; window]));
            for (i, &byte) in block.bytes.iter().enumerate() {
                mem.initialize(block.base.wrapping_add(i as u16), byte);
            }
        }

        for (&addr, &byte) in &case.memory {
            mem.initialize(addr, byte);
        }

        let mut cpu = Cpu::new(config.use_illegal_opcodes);
        cpu.apply_state(&case.cpu);
        let result = cpu.execute(&mut mem, spec.run_address, config.max_instructions);

        if !result.completed {
            let reason = match result.error {
                Some(e) => format!("test case {index}: {e}"),
                None => format!("test case {index}: did not complete"),
            };
            return Err(SpecError::ReferencePass { reason });
        }

        case.equ_expected = equ_addresses
            .iter()
            .map(|&addr| (addr, mem.peek(addr)))
            .collect();
    }

    debug!(
        cases = cases.len(),
        addresses = equ_addresses.len(),
        "reference pass complete"
    );

    Ok(())
}
