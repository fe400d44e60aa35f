//! # Stable Undocumented Instructions
//!
//! The commonly used illegal opcodes: LAX, SAX, and the six
//! read-modify-write-plus-ALU combinations (DCP, ISB, SLO, RLA, SRE, RRA).
//! Each combination performs its memory modification and then the paired
//! accumulator operation on the freshly written value. Their base cycle
//! costs already include the worst case, so none pay a page-cross penalty
//! except the LAX read flavors.

use crate::cpu::Cpu;
use crate::error::CpuError;
use crate::instructions::{alu, shifts};
use crate::memory::MemoryBus;
use crate::opcodes::OPCODE_TABLE;

/// Executes LAX (Load A and X).
pub(crate) fn execute_lax<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.operand_value(mem, metadata.addressing_mode)?;

    cpu.a = value;
    cpu.x = value;
    cpu.update_zn(value);

    cpu.finish_instruction(opcode, page_crossed);
    Ok(())
}

/// Executes SAX (Store A AND X). Flags are unaffected.
pub(crate) fn execute_sax<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (addr, _) = cpu.effective_address(mem, metadata.addressing_mode)?;

    let value = cpu.a & cpu.x;
    cpu.store(mem, addr, value)?;

    cpu.finish_instruction(opcode, false);
    Ok(())
}

/// Shared body for the modify-then-operate combinations.
fn combo<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
    modify: impl FnOnce(&mut Cpu, u8) -> u8,
    operate: impl FnOnce(&mut Cpu, u8),
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (addr, _) = cpu.effective_address(mem, metadata.addressing_mode)?;

    let value = cpu.load(mem, addr)?;
    let modified = modify(cpu, value);
    cpu.store(mem, addr, modified)?;
    operate(cpu, modified);

    cpu.finish_instruction(opcode, false);
    Ok(())
}

/// Executes DCP (DEC then CMP).
pub(crate) fn execute_dcp<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    combo(
        cpu,
        mem,
        opcode,
        |_, v| v.wrapping_sub(1),
        |cpu, v| {
            let a = cpu.a;
            alu::compare(cpu, a, v);
        },
    )
}

/// Executes ISB (INC then SBC), also known as ISC.
pub(crate) fn execute_isb<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    combo(
        cpu,
        mem,
        opcode,
        |_, v| v.wrapping_add(1),
        alu::subtract_with_carry,
    )
}

/// Executes SLO (ASL then ORA).
pub(crate) fn execute_slo<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    combo(cpu, mem, opcode, shifts::shift_left, |cpu, v| {
        cpu.a |= v;
        cpu.update_zn(cpu.a);
    })
}

/// Executes RLA (ROL then AND).
pub(crate) fn execute_rla<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    combo(cpu, mem, opcode, shifts::rotate_left, |cpu, v| {
        cpu.a &= v;
        cpu.update_zn(cpu.a);
    })
}

/// Executes SRE (LSR then EOR).
pub(crate) fn execute_sre<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    combo(cpu, mem, opcode, shifts::shift_right, |cpu, v| {
        cpu.a ^= v;
        cpu.update_zn(cpu.a);
    })
}

/// Executes RRA (ROR then ADC).
pub(crate) fn execute_rra<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    combo(cpu, mem, opcode, shifts::rotate_right, alu::add_with_carry)
}
