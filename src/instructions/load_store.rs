//! # Load and Store Instructions
//!
//! LDA/LDX/LDY and STA/STX/STY. The loads pay the indexed page-crossing
//! penalty; the stores always charge their worst-case base cycles.

use crate::cpu::Cpu;
use crate::error::CpuError;
use crate::memory::MemoryBus;
use crate::opcodes::OPCODE_TABLE;

/// Executes LDA (Load Accumulator).
pub(crate) fn execute_lda<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.operand_value(mem, metadata.addressing_mode)?;

    cpu.a = value;
    cpu.update_zn(value);

    cpu.finish_instruction(opcode, page_crossed);
    Ok(())
}

/// Executes LDX (Load X).
pub(crate) fn execute_ldx<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.operand_value(mem, metadata.addressing_mode)?;

    cpu.x = value;
    cpu.update_zn(value);

    cpu.finish_instruction(opcode, page_crossed);
    Ok(())
}

/// Executes LDY (Load Y).
pub(crate) fn execute_ldy<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.operand_value(mem, metadata.addressing_mode)?;

    cpu.y = value;
    cpu.update_zn(value);

    cpu.finish_instruction(opcode, page_crossed);
    Ok(())
}

/// Executes STA (Store Accumulator).
pub(crate) fn execute_sta<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (addr, _) = cpu.effective_address(mem, metadata.addressing_mode)?;

    cpu.store(mem, addr, cpu.a)?;

    cpu.finish_instruction(opcode, false);
    Ok(())
}

/// Executes STX (Store X).
pub(crate) fn execute_stx<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (addr, _) = cpu.effective_address(mem, metadata.addressing_mode)?;

    cpu.store(mem, addr, cpu.x)?;

    cpu.finish_instruction(opcode, false);
    Ok(())
}

/// Executes STY (Store Y).
pub(crate) fn execute_sty<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (addr, _) = cpu.effective_address(mem, metadata.addressing_mode)?;

    cpu.store(mem, addr, cpu.y)?;

    cpu.finish_instruction(opcode, false);
    Ok(())
}
