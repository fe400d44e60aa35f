//! # Branch Instructions
//!
//! The eight conditional branches. All use relative addressing with a
//! signed 8-bit offset measured from the byte after the operand.
//!
//! Cycle timing:
//! - 2 cycles if the branch is not taken
//! - 3 cycles if taken to the same page
//! - 4 cycles if taken across a page boundary

use crate::cpu::Cpu;
use crate::error::CpuError;
use crate::memory::MemoryBus;
use crate::opcodes::OPCODE_TABLE;

/// Shared branch body: reads the offset, applies the taken/cross-page
/// cycle penalties, and updates the PC.
fn branch<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
    taken: bool,
) -> Result<(), CpuError> {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let offset = cpu.load(mem, cpu.pc.wrapping_add(1))? as i8;

    let mut cycles = metadata.base_cycles as u64;
    let next = cpu.pc.wrapping_add(metadata.size_bytes as u16);

    if taken {
        let target = next.wrapping_add_signed(offset as i16);
        cycles += if (next & 0xFF00) != (target & 0xFF00) {
            2
        } else {
            1
        };
        cpu.pc = target;
    } else {
        cpu.pc = next;
    }

    cpu.cycles += cycles;
    Ok(())
}

/// Executes BCC (Branch if Carry Clear).
pub(crate) fn execute_bcc<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let taken = !cpu.flag_c;
    branch(cpu, mem, opcode, taken)
}

/// Executes BCS (Branch if Carry Set).
pub(crate) fn execute_bcs<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let taken = cpu.flag_c;
    branch(cpu, mem, opcode, taken)
}

/// Executes BEQ (Branch if Equal).
pub(crate) fn execute_beq<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let taken = cpu.flag_z;
    branch(cpu, mem, opcode, taken)
}

/// Executes BNE (Branch if Not Equal).
pub(crate) fn execute_bne<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let taken = !cpu.flag_z;
    branch(cpu, mem, opcode, taken)
}

/// Executes BMI (Branch if Minus).
pub(crate) fn execute_bmi<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let taken = cpu.flag_n;
    branch(cpu, mem, opcode, taken)
}

/// Executes BPL (Branch if Plus).
pub(crate) fn execute_bpl<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let taken = !cpu.flag_n;
    branch(cpu, mem, opcode, taken)
}

/// Executes BVC (Branch if Overflow Clear).
pub(crate) fn execute_bvc<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let taken = !cpu.flag_v;
    branch(cpu, mem, opcode, taken)
}

/// Executes BVS (Branch if Overflow Set).
pub(crate) fn execute_bvs<M: MemoryBus>(
    cpu: &mut Cpu,
    mem: &mut M,
    opcode: u8,
) -> Result<(), CpuError> {
    let taken = cpu.flag_v;
    branch(cpu, mem, opcode, taken)
}
