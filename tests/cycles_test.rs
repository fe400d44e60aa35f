//! Cycle accounting tests: base costs, indexed page-crossing penalties,
//! and branch-taken penalties.

use opt6502::{Cpu, Region, TrackedMemory, Value};

fn open_memory() -> TrackedMemory {
    let mut mem = TrackedMemory::new();
    mem.set_input_regions(vec![Region::new(0x0000, vec![Value::Any; 0x10000])]);
    mem.set_output_regions(vec![Region::new(0x0000, vec![Value::Any; 0x10000])]);
    mem
}

/// Executes a program at $1000 and returns the cycle count of the run.
fn cycles_of(program: &[u8], setup: impl FnOnce(&mut Cpu)) -> u64 {
    let mut mem = open_memory();
    for (i, &byte) in program.iter().enumerate() {
        mem.initialize(0x1000 + i as u16, byte);
    }
    let mut cpu = Cpu::new(false);
    setup(&mut cpu);
    let result = cpu.execute(&mut mem, 0x1000, 1000);
    assert!(
        result.completed,
        "program did not complete: {:?}",
        result.error
    );
    result.cycles
}

#[test]
fn test_base_cycles() {
    assert_eq!(cycles_of(&[0xA9, 0x01], |_| {}), 2); // LDA #
    assert_eq!(cycles_of(&[0xA5, 0x10], |_| {}), 3); // LDA zp
    assert_eq!(cycles_of(&[0xAD, 0x00, 0x20], |_| {}), 4); // LDA abs
    assert_eq!(cycles_of(&[0xE6, 0x10], |_| {}), 5); // INC zp
    assert_eq!(cycles_of(&[0x4C, 0x03, 0x10], |_| {}), 3); // JMP abs
}

#[test]
fn test_absolute_x_page_cross_penalty() {
    // LDA $12F0,X with X=0x10 crosses into page 0x13: 4 + 1 cycles.
    assert_eq!(cycles_of(&[0xBD, 0xF0, 0x12], |cpu| cpu.set_x(0x10)), 5);

    // With X=0x05 there is no crossing: 4 cycles.
    assert_eq!(cycles_of(&[0xBD, 0xF0, 0x12], |cpu| cpu.set_x(0x05)), 4);
}

#[test]
fn test_store_never_pays_page_penalty() {
    // STA $12F0,X always takes its base 5 cycles, crossing or not.
    assert_eq!(cycles_of(&[0x9D, 0xF0, 0x12], |cpu| cpu.set_x(0x10)), 5);
    assert_eq!(cycles_of(&[0x9D, 0xF0, 0x12], |cpu| cpu.set_x(0x05)), 5);
}

#[test]
fn test_indirect_y_page_cross_penalty() {
    let mut mem = open_memory();
    mem.initialize(0x0040, 0xF0);
    mem.initialize(0x0041, 0x12);
    mem.initialize(0x1000, 0xB1); // LDA ($40),Y
    mem.initialize(0x1001, 0x40);

    let mut cpu = Cpu::new(false);
    cpu.set_y(0x10); // 0x12F0 + 0x10 crosses
    let result = cpu.execute(&mut mem, 0x1000, 10);
    assert!(result.completed);
    assert_eq!(result.cycles, 6); // 5 + 1

    let mut mem = open_memory();
    mem.initialize(0x0040, 0xF0);
    mem.initialize(0x0041, 0x12);
    mem.initialize(0x1000, 0xB1);
    mem.initialize(0x1001, 0x40);
    let mut cpu = Cpu::new(false);
    cpu.set_y(0x05);
    let result = cpu.execute(&mut mem, 0x1000, 10);
    assert!(result.completed);
    assert_eq!(result.cycles, 5);
}

#[test]
fn test_branch_cycles() {
    // Not taken: base 2.
    assert_eq!(cycles_of(&[0xD0, 0x02, 0x00, 0x00], |cpu| cpu.set_flag_z(true)), 2);

    // Taken, same page: 2 + 1.
    assert_eq!(
        cycles_of(&[0xD0, 0x02, 0x00, 0x00], |cpu| cpu.set_flag_z(false)),
        3
    );
}

#[test]
fn test_branch_cross_page_penalty() {
    // Place a BNE near the end of a page so the taken target crosses.
    let mut mem = open_memory();
    mem.initialize(0x10FD, 0xD0); // BNE +2
    mem.initialize(0x10FE, 0x02);
    // Target 0x1101 is on a different page than 0x10FF.

    let mut cpu = Cpu::new(false);
    cpu.set_flag_z(false);
    let result = cpu.execute(&mut mem, 0x10FD, 10);
    assert!(result.completed);
    assert_eq!(result.cycles, 4); // 2 + 2
}

#[test]
fn test_rmw_absolute_x_is_constant_seven() {
    // ASL $12F0,X is 7 cycles regardless of crossing.
    assert_eq!(cycles_of(&[0x1E, 0xF0, 0x12], |cpu| cpu.set_x(0x10)), 7);
    assert_eq!(cycles_of(&[0x1E, 0xF0, 0x12], |cpu| cpu.set_x(0x00)), 7);
}

#[test]
fn test_halting_brk_charges_nothing() {
    // A lone NOP then fall-through BRK: only the NOP's 2 cycles count.
    assert_eq!(cycles_of(&[0xEA], |_| {}), 2);
}
