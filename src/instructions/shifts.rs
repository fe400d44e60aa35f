//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL, and ROR in both accumulator and memory
//! (read-modify-write) forms.

use crate::addressing::AddressingMode;
use crate::cpu::Cpu;
use crate::error::CpuError;
use crate::memory::MemoryBus;
use crate::opcodes::OPCODE_TABLE;

/// Applies a shift/rotate to the addressed operand (or the accumulator),
/// writes the result back, and returns it for flag updates.
fn modify<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
    f: impl FnOnce(&mut Cpu, u8) -> u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];

    if metadata.addressing_mode == AddressingMode::Accumulator {
        let result = f(cpu, cpu.a);
        cpu.a = result;
        cpu.update_zn(result);
    } else {
        let (addr, _) = cpu.effective_address(mem, metadata.addressing_mode)?;
        let value = cpu.load(mem, addr)?;
        let result = f(cpu, value);
        cpu.store(mem, addr, result)?;
        cpu.update_zn(result);
    }

    cpu.finish_instruction(opcode, false);
    Ok(())
}

/// Shifts left one bit; bit 7 lands in the carry. Shared with SLO.
pub(crate) fn shift_left(cpu: &mut Cpu, value: u8) -> u8 {
    cpu.flag_c = value & 0x80 != 0;
    value << 1
}

/// Shifts right one bit; bit 0 lands in the carry. Shared with SRE.
pub(crate) fn shift_right(cpu: &mut Cpu, value: u8) -> u8 {
    cpu.flag_c = value & 0x01 != 0;
    value >> 1
}

/// Rotates left through the carry. Shared with RLA.
pub(crate) fn rotate_left(cpu: &mut Cpu, value: u8) -> u8 {
    let carry_in = if cpu.flag_c { 1 } else { 0 };
    cpu.flag_c = value & 0x80 != 0;
    (value << 1) | carry_in
}

/// Rotates right through the carry. Shared with RRA.
pub(crate) fn rotate_right(cpu: &mut Cpu, value: u8) -> u8 {
    let carry_in = if cpu.flag_c { 0x80 } else { 0 };
    cpu.flag_c = value & 0x01 != 0;
    (value >> 1) | carry_in
}

/// Executes ASL (Arithmetic Shift Left).
pub(crate) fn execute_asl<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    modify(cpu, mem, opcode, shift_left)
}

/// Executes LSR (Logical Shift Right).
pub(crate) fn execute_lsr<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    modify(cpu, mem, opcode, shift_right)
}

/// Executes ROL (Rotate Left).
pub(crate) fn execute_rol<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    modify(cpu, mem, opcode, rotate_left)
}

/// Executes ROR (Rotate Right).
pub(crate) fn execute_ror<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    modify(cpu, mem, opcode, rotate_right)
}
