//! # Control Flow Instructions
//!
//! JMP, JSR, RTS, RTI, and NOP. BRK does not appear here: the execution
//! loop treats a fetched BRK as the halt marker and never dispatches it.

use crate::addressing::AddressingMode;
use crate::cpu::Cpu;
use crate::error::CpuError;
use crate::memory::MemoryBus;
use crate::opcodes::OPCODE_TABLE;

/// Executes JMP (absolute or indirect).
///
/// The indirect form replicates the hardware bug: a pointer at `$xxFF`
/// fetches its high byte from `$xx00`.
pub(crate) fn execute_jmp<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (target, _) = cpu.effective_address(mem, metadata.addressing_mode)?;

    cpu.cycles += metadata.base_cycles as u64;
    cpu.pc = target;
    Ok(())
}

/// Executes JSR (Jump to Subroutine).
///
/// Pushes the address of the last byte of the JSR instruction; RTS adds
/// one on return.
pub(crate) fn execute_jsr<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (target, _) = cpu.effective_address(mem, metadata.addressing_mode)?;

    let return_address = cpu.pc.wrapping_add(2);
    cpu.push16(mem, return_address)?;

    cpu.cycles += metadata.base_cycles as u64;
    cpu.pc = target;
    Ok(())
}

/// Executes RTS (Return from Subroutine).
pub(crate) fn execute_rts<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];

    let return_address = cpu.pull16(mem)?;
    cpu.pc = return_address.wrapping_add(1);
    cpu.cycles += metadata.base_cycles as u64;
    Ok(())
}

/// Executes RTI (Return from Interrupt): restores flags then the PC.
pub(crate) fn execute_rti<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];

    let status = cpu.pull8(mem)?;
    cpu.set_status(status);
    cpu.pc = cpu.pull16(mem)?;
    cpu.cycles += metadata.base_cycles as u64;
    Ok(())
}

/// Executes NOP, including the multi-byte undocumented encodings.
///
/// The undocumented NOPs fetch their operand bytes and, for the
/// absolute,X forms, pay the page-crossing penalty; none of them read the
/// target address.
pub(crate) fn execute_nop<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];

    let page_crossed = match metadata.addressing_mode {
        AddressingMode::Implicit | AddressingMode::Accumulator | AddressingMode::Immediate => {
            false
        }
        mode => cpu.effective_address(mem, mode)?.1,
    };

    cpu.finish_instruction(opcode, page_crossed);
    Ok(())
}
