//! # Increment and Decrement Instructions
//!
//! INC/DEC on memory (read-modify-write) and the register forms
//! INX/INY/DEX/DEY.

use crate::cpu::Cpu;
use crate::error::CpuError;
use crate::memory::MemoryBus;
use crate::opcodes::OPCODE_TABLE;

/// Executes INC (Increment Memory).
pub(crate) fn execute_inc<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (addr, _) = cpu.effective_address(mem, metadata.addressing_mode)?;

    let result = cpu.load(mem, addr)?.wrapping_add(1);
    cpu.store(mem, addr, result)?;
    cpu.update_zn(result);

    cpu.finish_instruction(opcode, false);
    Ok(())
}

/// Executes DEC (Decrement Memory).
pub(crate) fn execute_dec<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (addr, _) = cpu.effective_address(mem, metadata.addressing_mode)?;

    let result = cpu.load(mem, addr)?.wrapping_sub(1);
    cpu.store(mem, addr, result)?;
    cpu.update_zn(result);

    cpu.finish_instruction(opcode, false);
    Ok(())
}

/// Executes INX (Increment X).
pub(crate) fn execute_inx(cpu: &mut Cpu, opcode: u8) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.update_zn(cpu.x);
    cpu.finish_instruction(opcode, false);
}

/// Executes INY (Increment Y).
pub(crate) fn execute_iny(cpu: &mut Cpu, opcode: u8) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.update_zn(cpu.y);
    cpu.finish_instruction(opcode, false);
}

/// Executes DEX (Decrement X).
pub(crate) fn execute_dex(cpu: &mut Cpu, opcode: u8) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.update_zn(cpu.x);
    cpu.finish_instruction(opcode, false);
}

/// Executes DEY (Decrement Y).
pub(crate) fn execute_dey(cpu: &mut Cpu, opcode: u8) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.update_zn(cpu.y);
    cpu.finish_instruction(opcode, false);
}
