//! Verifier-level scenarios: the EQU memory copy, write confinement, and
//! structured failure records.

use opt6502::{
    BlockKind, CodeBlock, Goal, OptimizationSpec, Region, SearchConfig, Value, Verifier,
    VerifyFailure,
};

fn pinned_spec(goal: Goal) -> OptimizationSpec {
    let mut spec = OptimizationSpec::new(goal, 0x1000);
    spec.input_cpu.a = Value::Exact(0);
    spec.input_cpu.x = Value::Exact(0);
    spec.input_cpu.y = Value::Exact(0);
    spec.input_cpu.sp = Value::Exact(0xFF);
    spec.input_flags.c = Value::Exact(0);
    spec.input_flags.z = Value::Exact(0);
    spec.input_flags.i = Value::Exact(0);
    spec.input_flags.d = Value::Exact(0);
    spec.input_flags.b = Value::Exact(0);
    spec.input_flags.v = Value::Exact(0);
    spec.input_flags.n = Value::Exact(0);
    spec
}

/// The naive 128-byte indexed copy: LDY #0; loop: LDA $0200,Y;
/// STA $0300,Y; INY; CPY #$80; BNE loop.
const NAIVE_COPY: [u8; 13] = [
    0xA0, 0x00, 0xB9, 0x00, 0x02, 0x99, 0x00, 0x03, 0xC8, 0xC0, 0x80, 0xD0, 0xF5,
];

fn copy_spec(output_len: usize, exact_inputs: bool) -> OptimizationSpec {
    let mut spec = pinned_spec(Goal::Size);
    spec.input_cpu.y = Value::Any;
    let cells: Vec<Value> = (0..128u32)
        .map(|i| {
            if exact_inputs {
                Value::Exact((i * 7 + 1) as u8)
            } else {
                Value::Any
            }
        })
        .collect();
    spec.input_regions.push(Region::new(0x0200, cells));
    spec.output_regions
        .push(Region::new(0x0300, vec![Value::Equ; output_len]));
    spec.output_cpu.a = Value::Any;
    spec.output_cpu.y = Value::Any;
    spec.code_blocks.push(CodeBlock::new(
        0x1000,
        NAIVE_COPY.to_vec(),
        BlockKind::Regular,
    ));
    spec
}

#[test]
fn test_memory_copy_with_equ_verifies() -> anyhow::Result<()> {
    let spec = copy_spec(128, false);
    let config = SearchConfig::default();
    let verifier = Verifier::new(&spec, &config)?;

    assert!(verifier.verify(&NAIVE_COPY));
    Ok(())
}

#[test]
fn test_copy_that_stops_early_fails_equ() {
    let spec = copy_spec(128, true);
    let config = SearchConfig::default();
    let verifier = Verifier::new(&spec, &config).unwrap();

    // Same loop but copying only 0x7F bytes leaves $037F untouched, so it
    // still reads zero where the reference placed the final pattern byte.
    let mut short_copy = NAIVE_COPY;
    short_copy[10] = 0x7F; // CPY #$7F

    let failure = verifier.verify_explain(&short_copy).unwrap_err();
    match failure {
        VerifyFailure::Memory { address, observed, .. } => {
            assert_eq!(address, 0x037F);
            assert_eq!(observed, 0x00);
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn test_unauthorized_write_is_detected() {
    // Same shape as the copy scenario, but the output region omits the
    // last byte and asks for synthesized zeros instead of EQU (an EQU
    // contract could not even run its reference here: the original block
    // itself would violate the regions).
    let mut spec = pinned_spec(Goal::Size);
    spec.input_cpu.y = Value::Any;
    spec.input_regions
        .push(Region::new(0x0200, vec![Value::Any; 128]));
    spec.output_regions
        .push(Region::new(0x0300, vec![Value::Exact(0); 127]));
    spec.output_cpu.a = Value::Any;
    spec.output_cpu.y = Value::Any;
    spec.code_blocks
        .push(CodeBlock::new(0x1000, vec![], BlockKind::Regular));

    let config = SearchConfig::default();
    let verifier = Verifier::new(&spec, &config).unwrap();

    // The naive copy still writes $037F, which no output region grants.
    let failure = verifier.verify_explain(&NAIVE_COPY).unwrap_err();
    assert!(matches!(failure, VerifyFailure::Execution { .. }));
}

#[test]
fn test_failure_record_names_the_register() {
    let mut spec = pinned_spec(Goal::Size);
    spec.input_cpu.a = Value::Any;
    spec.output_cpu.a = Value::Exact(0x42);

    let config = SearchConfig::default();
    let verifier = Verifier::new(&spec, &config).unwrap();

    let failure = verifier.verify_explain(&[0xA9, 0x41]).unwrap_err();
    match failure {
        VerifyFailure::Register {
            register,
            observed,
            expected,
            ..
        } => {
            assert_eq!(register, opt6502::Register::A);
            assert_eq!(observed, 0x41);
            assert_eq!(expected, opt6502::Expected::Exact(0x42));
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn test_ignore_output_flags() {
    let mut spec = pinned_spec(Goal::Size);
    spec.input_cpu.a = Value::Any;
    spec.output_cpu.a = Value::Exact(0x00);
    spec.output_flags.z = Value::Exact(0); // LDA #$00 sets Z, violating this

    let config = SearchConfig::default();
    let verifier = Verifier::new(&spec, &config).unwrap();
    assert!(!verifier.verify(&[0xA9, 0x00]));

    let mut relaxed = SearchConfig::default();
    relaxed.ignore_output_flags = true;
    let verifier = Verifier::new(&spec, &relaxed).unwrap();
    assert!(verifier.verify(&[0xA9, 0x00]));
}
