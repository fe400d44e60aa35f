//! # Stack Instructions
//!
//! PHA, PHP, PLA, and PLP. Pushes write to $0100+SP then decrement; pulls
//! increment then read; the pointer wraps within the stack page. The byte
//! PHP pushes always carries bit 4 (B) and bit 5 set.

use crate::cpu::Cpu;
use crate::error::CpuError;
use crate::memory::MemoryBus;

/// Executes PHA (Push Accumulator).
pub(crate) fn execute_pha<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let value = cpu.a;
    cpu.push8(mem, value)?;
    cpu.finish_instruction(opcode, false);
    Ok(())
}

/// Executes PHP (Push Processor Status).
///
/// The pushed byte has bit 4 forced set; the in-CPU B flag is untouched.
pub(crate) fn execute_php<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let value = cpu.status() | 0b0001_0000;
    cpu.push8(mem, value)?;
    cpu.finish_instruction(opcode, false);
    Ok(())
}

/// Executes PLA (Pull Accumulator).
pub(crate) fn execute_pla<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let value = cpu.pull8(mem)?;
    cpu.a = value;
    cpu.update_zn(value);
    cpu.finish_instruction(opcode, false);
    Ok(())
}

/// Executes PLP (Pull Processor Status).
pub(crate) fn execute_plp<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let value = cpu.pull8(mem)?;
    cpu.set_status(value);
    cpu.finish_instruction(opcode, false);
    Ok(())
}
