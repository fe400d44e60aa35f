//! Property-based tests for interpreter invariants.
//!
//! These verify that instruction semantics match their arithmetic models
//! across all operand combinations, not just hand-picked cases.

use opt6502::{Cpu, Region, TrackedMemory, Value};
use proptest::prelude::*;

fn open_memory() -> TrackedMemory {
    let mut mem = TrackedMemory::new();
    mem.set_input_regions(vec![Region::new(0x0000, vec![Value::Any; 0x10000])]);
    mem.set_output_regions(vec![Region::new(0x0000, vec![Value::Any; 0x10000])]);
    mem
}

proptest! {
    /// Binary ADC matches the 16-bit model for every (A, M, C) triple.
    #[test]
    fn prop_adc_binary_model(a in any::<u8>(), m in any::<u8>(), c in any::<bool>()) {
        let mut mem = open_memory();
        mem.initialize(0x1000, 0x69); // ADC #
        mem.initialize(0x1001, m);

        let mut cpu = Cpu::new(false);
        cpu.set_a(a);
        cpu.set_flag_c(c);
        let result = cpu.execute(&mut mem, 0x1000, 10);
        prop_assert!(result.completed);

        let sum = a as u16 + m as u16 + c as u16;
        prop_assert_eq!(cpu.a(), sum as u8);
        prop_assert_eq!(cpu.flag_c(), sum > 0xFF);
        prop_assert_eq!(cpu.flag_z(), (sum & 0xFF) == 0);
        prop_assert_eq!(cpu.flag_n(), sum & 0x80 != 0);
        let overflow = ((a as u16 ^ sum) & (m as u16 ^ sum) & 0x80) != 0;
        prop_assert_eq!(cpu.flag_v(), overflow);
    }

    /// Binary SBC is ADC of the one's complement.
    #[test]
    fn prop_sbc_binary_model(a in any::<u8>(), m in any::<u8>(), c in any::<bool>()) {
        let mut mem = open_memory();
        mem.initialize(0x1000, 0xE9); // SBC #
        mem.initialize(0x1001, m);

        let mut cpu = Cpu::new(false);
        cpu.set_a(a);
        cpu.set_flag_c(c);
        let result = cpu.execute(&mut mem, 0x1000, 10);
        prop_assert!(result.completed);

        let sum = a as u16 + (m ^ 0xFF) as u16 + c as u16;
        prop_assert_eq!(cpu.a(), sum as u8);
        prop_assert_eq!(cpu.flag_c(), sum > 0xFF);
    }

    /// BCD ADC always produces a valid BCD result and the decimal carry
    /// for BCD operands.
    #[test]
    fn prop_bcd_adc_valid_digits(
        a_hi in 0u8..10, a_lo in 0u8..10,
        m_hi in 0u8..10, m_lo in 0u8..10,
        c in any::<bool>(),
    ) {
        let a = (a_hi << 4) | a_lo;
        let m = (m_hi << 4) | m_lo;

        let mut mem = open_memory();
        mem.initialize(0x1000, 0xF8); // SED
        mem.initialize(0x1001, 0x69); // ADC #
        mem.initialize(0x1002, m);

        let mut cpu = Cpu::new(false);
        cpu.set_a(a);
        cpu.set_flag_c(c);
        let result = cpu.execute(&mut mem, 0x1000, 10);
        prop_assert!(result.completed);

        let decimal_a = (a_hi * 10 + a_lo) as u16;
        let decimal_m = (m_hi * 10 + m_lo) as u16;
        let total = decimal_a + decimal_m + c as u16;

        let out = cpu.a();
        prop_assert!(out & 0x0F < 10, "low digit invalid: {:02x}", out);
        prop_assert!(out >> 4 < 10, "high digit invalid: {:02x}", out);
        let decimal_out = ((out >> 4) * 10 + (out & 0x0F)) as u16;
        prop_assert_eq!(decimal_out, total % 100);
        prop_assert_eq!(cpu.flag_c(), total > 99);
    }

    /// CMP never modifies the accumulator and models unsigned compare.
    #[test]
    fn prop_cmp_model(a in any::<u8>(), m in any::<u8>()) {
        let mut mem = open_memory();
        mem.initialize(0x1000, 0xC9); // CMP #
        mem.initialize(0x1001, m);

        let mut cpu = Cpu::new(false);
        cpu.set_a(a);
        let result = cpu.execute(&mut mem, 0x1000, 10);
        prop_assert!(result.completed);

        prop_assert_eq!(cpu.a(), a);
        prop_assert_eq!(cpu.flag_c(), a >= m);
        prop_assert_eq!(cpu.flag_z(), a == m);
        prop_assert_eq!(cpu.flag_n(), a.wrapping_sub(m) & 0x80 != 0);
    }

    /// Zero-page indexed addressing wraps within page zero.
    #[test]
    fn prop_zero_page_x_wraps(base in any::<u8>(), x in any::<u8>(), value in any::<u8>()) {
        let effective = base.wrapping_add(x) as u16;

        let mut mem = open_memory();
        mem.initialize(effective, value);
        mem.initialize(0x1000, 0xB5); // LDA zp,X
        mem.initialize(0x1001, base);

        let mut cpu = Cpu::new(false);
        cpu.set_x(x);
        let result = cpu.execute(&mut mem, 0x1000, 10);
        prop_assert!(result.completed);
        prop_assert_eq!(cpu.a(), value);
    }

    /// Packing and unpacking the status byte loses nothing but bit 5,
    /// which always reads as set.
    #[test]
    fn prop_status_round_trip(bits in any::<u8>()) {
        let mut cpu = Cpu::new(false);
        cpu.set_status(bits);
        prop_assert_eq!(cpu.status(), bits | 0b0010_0000);
    }

    /// Pushes followed by pulls restore both the value and the pointer,
    /// from any starting stack pointer.
    #[test]
    fn prop_stack_round_trip(sp in any::<u8>(), value in any::<u8>()) {
        let mut mem = open_memory();
        mem.initialize(0x1000, 0x48); // PHA
        mem.initialize(0x1001, 0xA9); // LDA #$00
        mem.initialize(0x1002, 0x00);
        mem.initialize(0x1003, 0x68); // PLA

        let mut cpu = Cpu::new(false);
        cpu.set_sp(sp);
        cpu.set_a(value);
        let result = cpu.execute(&mut mem, 0x1000, 10);
        prop_assert!(result.completed);
        prop_assert_eq!(cpu.a(), value);
        prop_assert_eq!(cpu.sp(), sp);
    }
}
