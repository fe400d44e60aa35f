//! End-to-end search scenarios: the driver, enumerator, verifier, and
//! cache working together over real specifications.

use std::time::Duration;

use opt6502::{
    BlockKind, CodeBlock, Goal, OptimizationSpec, Region, Search, SearchConfig, SearchError, Value,
};

/// A specification with every input pinned EXACT; tests then relax the
/// axes they want the search to generalize over.
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

// ========== Constant Synthesis ==========

#[test]
fn test_constant_synthesis_is_size_optimal() {
    // A = ? in, A = 0 out, X and Y pinned nonzero so no one-byte transfer
    // trick applies: the optimum is a two-byte immediate.
    let mut spec = pinned_spec(Goal::Size);
    spec.input_cpu.a = Value::Any;
    spec.input_cpu.x = Value::Exact(3);
    spec.input_cpu.y = Value::Exact(3);
    spec.output_cpu.a = Value::Exact(0x00);

    let config = SearchConfig::default();
    let mut search = Search::new(&spec, &config).unwrap();
    let solution = search.optimize().unwrap();

    assert_eq!(solution.bytes.len(), 2);
    assert!(search.verifier().verify(&solution.bytes));
}

#[test]
fn test_constant_synthesis_finds_one_byte_trick() {
    // With X pinned to zero, TXA beats LDA #$00.
    let mut spec = pinned_spec(Goal::Size);
    spec.input_cpu.a = Value::Any;
    spec.output_cpu.a = Value::Exact(0x00);

    let config = SearchConfig::default();
    let mut search = Search::new(&spec, &config).unwrap();
    let solution = search.optimize().unwrap();

    assert_eq!(solution.bytes, vec![0x8A]); // TXA
}

// ========== Register Preservation ==========

#[test]
fn test_register_preservation() {
    let mut spec = pinned_spec(Goal::Size);
    spec.input_cpu.a = Value::Any;
    spec.input_cpu.x = Value::Any;
    spec.output_cpu.a = Value::Same;
    spec.output_cpu.x = Value::Exact(0x05);

    let config = SearchConfig::default();
    let mut search = Search::new(&spec, &config).unwrap();
    let solution = search.optimize().unwrap();

    // LDX #$05: A trivially satisfies SAME because nothing writes it.
    assert_eq!(solution.bytes, vec![0xA2, 0x05]);
}

// ========== 16-bit Increment via EQU ==========

#[test]
fn test_sixteen_bit_increment() -> anyhow::Result<()> {
    let mut spec = pinned_spec(Goal::Size);
    spec.input_regions
        .push(Region::new(0x0080, vec![Value::Any, Value::Any]));
    spec.output_regions
        .push(Region::new(0x0080, vec![Value::Equ, Value::Equ]));

    // Original: CLC; LDA $80; ADC #$01; STA $80; LDA $81; ADC #$00;
    // STA $81 - the straightforward 13-byte 16-bit increment.
    spec.code_blocks.push(CodeBlock::new(
        0x1000,
        vec![
            0x18, 0xA5, 0x80, 0x69, 0x01, 0x85, 0x80, 0xA5, 0x81, 0x69, 0x00, 0x85, 0x81,
        ],
        BlockKind::Regular,
    ));

    let mut config = SearchConfig::default();
    config.max_sequence_bytes = 6;
    let mut search = Search::new(&spec, &config)?;
    // INC/DEC, the loads/stores, branches, and CLC/ADC cover the space the
    // replacement lives in.
    search.set_valid_opcodes(&[0x18, 0xA5, 0x85, 0x69, 0xE6, 0xC6, 0xD0, 0xF0, 0xE8]);

    let solution = search.optimize()?;

    // INC $80; BNE +2; INC $81 or an equivalent six-byte rewrite.
    assert_eq!(solution.bytes.len(), 6);
    assert!(search.verifier().verify(&solution.bytes));
    // The rewrite must start by touching the low byte.
    assert_eq!(&solution.bytes[..2], &[0xE6, 0x80]);
    Ok(())
}

// ========== Speed Goal ==========

#[test]
fn test_speed_goal_returns_valid_solution() {
    let mut spec = pinned_spec(Goal::Speed);
    spec.input_cpu.a = Value::Any;
    spec.input_cpu.x = Value::Exact(3);
    spec.input_cpu.y = Value::Exact(3);
    spec.output_cpu.a = Value::Exact(0x00);

    let mut config = SearchConfig::default();
    config.max_sequence_bytes = 4;
    let mut search = Search::new(&spec, &config).unwrap();
    search.set_valid_opcodes(&[0xA9, 0x29, 0x0A, 0xEA]);
    let solution = search.optimize().unwrap();

    // An immediate load/AND is 2 cycles; nothing beats it.
    assert_eq!(solution.cycles, 2);
    assert!(search.verifier().verify(&solution.bytes));
}

// ========== No Solution ==========

#[test]
fn test_exhaustion_reports_no_solution() {
    let mut spec = pinned_spec(Goal::Size);
    spec.input_cpu.a = Value::Any;
    spec.output_cpu.a = Value::Exact(0x05);

    let mut config = SearchConfig::default();
    config.max_sequence_bytes = 4;
    let mut search = Search::new(&spec, &config).unwrap();
    // NOP alone can never set A.
    search.set_valid_opcodes(&[0xEA]);

    assert_eq!(
        search.optimize(),
        Err(SearchError::NoSolution { max_bytes: 4 })
    );
}

#[test]
fn test_deadline_reports_no_solution() {
    let mut spec = pinned_spec(Goal::Size);
    spec.input_cpu.a = Value::Any;
    spec.output_cpu.a = Value::Exact(0x05);

    let mut config = SearchConfig::default();
    config.time_budget = Some(Duration::ZERO);
    let mut search = Search::new(&spec, &config).unwrap();

    assert!(matches!(
        search.optimize(),
        Err(SearchError::NoSolution { .. })
    ));
}

// ========== Progress Reporting ==========

#[test]
fn test_progress_listener_sees_best_solution() {
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        bests: Rc<RefCell<Vec<(Vec<u8>, u64)>>>,
    }
    impl opt6502::ProgressListener for Recorder {
        fn on_new_best(&mut self, solution: &[u8], metric: u64, _tested: u64) {
            self.bests.borrow_mut().push((solution.to_vec(), metric));
        }
    }

    let mut spec = pinned_spec(Goal::Size);
    spec.input_cpu.a = Value::Any;
    spec.input_cpu.x = Value::Any;
    spec.output_cpu.a = Value::Same;
    spec.output_cpu.x = Value::Exact(0x05);

    let config = SearchConfig::default();
    let mut search = Search::new(&spec, &config).unwrap();

    let bests = Rc::new(RefCell::new(Vec::new()));
    search.set_progress_listener(Box::new(Recorder {
        bests: Rc::clone(&bests),
    }));
    let solution = search.optimize().unwrap();

    // The last reported best matches the returned solution.
    assert_eq!(bests.borrow().last().unwrap().0, solution.bytes);
}
