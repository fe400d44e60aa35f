//! Decimal-mode arithmetic tests.
//!
//! ADC and SBC with D=1 must reproduce NMOS behavior: the stored result
//! and the carry are BCD-adjusted, while N, V, and Z follow the
//! pre-adjusted binary result.

use opt6502::{Cpu, Region, TrackedMemory, Value};

fn open_memory() -> TrackedMemory {
    let mut mem = TrackedMemory::new();
    mem.set_input_regions(vec![Region::new(0x0000, vec![Value::Any; 0x10000])]);
    mem.set_output_regions(vec![Region::new(0x0000, vec![Value::Any; 0x10000])]);
    mem
}

/// Runs SED; ADC #imm with the given accumulator and carry-in.
fn bcd_adc(a: u8, operand: u8, carry: bool) -> (u8, bool) {
    let mut mem = open_memory();
    mem.initialize(0x1000, 0xF8); // SED
    mem.initialize(0x1001, 0x69); // ADC #
    mem.initialize(0x1002, operand);

    let mut cpu = Cpu::new(false);
    cpu.set_a(a);
    cpu.set_flag_c(carry);
    let result = cpu.execute(&mut mem, 0x1000, 10);
    assert!(result.completed);
    (cpu.a(), cpu.flag_c())
}

/// Runs SED; SBC #imm with the given accumulator and carry-in.
fn bcd_sbc(a: u8, operand: u8, carry: bool) -> (u8, bool) {
    let mut mem = open_memory();
    mem.initialize(0x1000, 0xF8); // SED
    mem.initialize(0x1001, 0xE9); // SBC #
    mem.initialize(0x1002, operand);

    let mut cpu = Cpu::new(false);
    cpu.set_a(a);
    cpu.set_flag_c(carry);
    let result = cpu.execute(&mut mem, 0x1000, 10);
    assert!(result.completed);
    (cpu.a(), cpu.flag_c())
}

#[test]
fn test_bcd_adc_simple() {
    assert_eq!(bcd_adc(0x12, 0x34, false), (0x46, false));
    assert_eq!(bcd_adc(0x05, 0x05, false), (0x10, false));
}

#[test]
fn test_bcd_adc_with_carry_in() {
    assert_eq!(bcd_adc(0x58, 0x46, true), (0x05, true)); // 58 + 46 + 1 = 105
}

#[test]
fn test_bcd_adc_carry_out() {
    assert_eq!(bcd_adc(0x81, 0x92, false), (0x73, true)); // 81 + 92 = 173
    assert_eq!(bcd_adc(0x99, 0x01, false), (0x00, true));
}

#[test]
fn test_bcd_adc_nibble_adjust() {
    assert_eq!(bcd_adc(0x09, 0x01, false), (0x10, false));
    assert_eq!(bcd_adc(0x0F, 0x01, false), (0x16, false)); // non-BCD operand quirk
}

#[test]
fn test_bcd_adc_zero_flag_follows_binary_result() {
    // 0x99 + 0x01 = 0x9A binary, adjusted to 0x00. Z tracks binary.
    let mut mem = open_memory();
    mem.initialize(0x1000, 0xF8);
    mem.initialize(0x1001, 0x69);
    mem.initialize(0x1002, 0x01);
    let mut cpu = Cpu::new(false);
    cpu.set_a(0x99);
    let result = cpu.execute(&mut mem, 0x1000, 10);
    assert!(result.completed);
    assert_eq!(cpu.a(), 0x00);
    assert!(!cpu.flag_z()); // binary 0x9A is nonzero
}

#[test]
fn test_bcd_sbc_simple() {
    assert_eq!(bcd_sbc(0x46, 0x12, true), (0x34, true));
    assert_eq!(bcd_sbc(0x40, 0x13, true), (0x27, true));
}

#[test]
fn test_bcd_sbc_borrow() {
    assert_eq!(bcd_sbc(0x32, 0x02, false), (0x29, true)); // minus borrow
    assert_eq!(bcd_sbc(0x12, 0x21, true), (0x91, false)); // result wraps
}

#[test]
fn test_binary_mode_unaffected() {
    // Same inputs without SED give plain binary arithmetic.
    let mut mem = open_memory();
    mem.initialize(0x1000, 0x69); // ADC #
    mem.initialize(0x1001, 0x34);
    let mut cpu = Cpu::new(false);
    cpu.set_a(0x12);
    let result = cpu.execute(&mut mem, 0x1000, 10);
    assert!(result.completed);
    assert_eq!(cpu.a(), 0x46); // same digits, but no adjustment needed
    assert!(!cpu.flag_c());

    let mut mem = open_memory();
    mem.initialize(0x1000, 0x69);
    mem.initialize(0x1001, 0x05);
    let mut cpu = Cpu::new(false);
    cpu.set_a(0x05);
    let result = cpu.execute(&mut mem, 0x1000, 10);
    assert!(result.completed);
    assert_eq!(cpu.a(), 0x0A); // binary, not 0x10
}
