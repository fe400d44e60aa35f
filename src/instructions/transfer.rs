//! # Transfer Instructions
//!
//! Register-to-register transfers. All except TXS update Z and N from the
//! transferred value.

use crate::cpu::Cpu;

/// Executes TAX (Transfer A to X).
pub(crate) fn execute_tax(cpu: &mut Cpu, opcode: u8) {
    cpu.x = cpu.a;
    cpu.update_zn(cpu.x);
    cpu.finish_instruction(opcode, false);
}

/// Executes TAY (Transfer A to Y).
pub(crate) fn execute_tay(cpu: &mut Cpu, opcode: u8) {
    cpu.y = cpu.a;
    cpu.update_zn(cpu.y);
    cpu.finish_instruction(opcode, false);
}

/// Executes TXA (Transfer X to A).
pub(crate) fn execute_txa(cpu: &mut Cpu, opcode: u8) {
    cpu.a = cpu.x;
    cpu.update_zn(cpu.a);
    cpu.finish_instruction(opcode, false);
}

/// Executes TYA (Transfer Y to A).
pub(crate) fn execute_tya(cpu: &mut Cpu, opcode: u8) {
    cpu.a = cpu.y;
    cpu.update_zn(cpu.a);
    cpu.finish_instruction(opcode, false);
}

/// Executes TSX (Transfer SP to X).
pub(crate) fn execute_tsx(cpu: &mut Cpu, opcode: u8) {
    cpu.x = cpu.sp;
    cpu.update_zn(cpu.x);
    cpu.finish_instruction(opcode, false);
}

/// Executes TXS (Transfer X to SP). Flags are unaffected.
pub(crate) fn execute_txs(cpu: &mut Cpu, opcode: u8) {
    cpu.sp = cpu.x;
    cpu.finish_instruction(opcode, false);
}
