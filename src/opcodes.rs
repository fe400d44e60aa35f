//! # Opcode Metadata Table
//!
//! This module contains the complete 256-entry opcode metadata table that
//! serves as the single source of truth for all 6502 instruction
//! information: dispatch kind, addressing mode, base cycle cost, encoded
//! size, and legality class.
//!
//! The table covers:
//!
//! - **151 documented instructions** - official NMOS 6502 opcodes
//! - **the stable undocumented opcodes** - LAX, SAX, DCP, ISB, SLO, RLA,
//!   SRE, RRA (plus the extra NOP encodings and the duplicate SBC), usable
//!   when the configuration allows illegal instructions
//! - **unstable and jamming opcodes** - marked so the enumerator never
//!   emits them and the interpreter refuses them
//!
//! Base cycle costs exclude the dynamic penalties (page crossing, branch
//! taken); the interpreter adds those per §cycle rules in `cpu`.

use crate::addressing::AddressingMode;

/// Dispatch kind: which operation an opcode performs.
///
/// A closed enumeration rather than a string so the interpreter's dispatch
/// is a plain `match` the compiler can lay out as a jump table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
    Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
    Tsx, Txa, Txs, Tya,
    // Stable undocumented instructions.
    Lax, Sax, Dcp, Isb, Slo, Rla, Sre, Rra,
    // Processor lock-up; never executed.
    Jam,
}

impl Instruction {
    /// True for the read flavors that pay the +1 indexed page-crossing
    /// penalty (the store and read-modify-write flavors always pay the
    /// worst case through their base cycles).
    pub const fn page_penalty(self) -> bool {
        matches!(
            self,
            Instruction::Lda
                | Instruction::Ldx
                | Instruction::Ldy
                | Instruction::Ora
                | Instruction::And
                | Instruction::Eor
                | Instruction::Adc
                | Instruction::Sbc
                | Instruction::Cmp
                | Instruction::Lax
                | Instruction::Bit
                | Instruction::Nop
        )
    }
}

/// How trustworthy an opcode is, which decides who may use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Legality {
    /// Documented NMOS 6502 instruction.
    Legal,

    /// Undocumented but stable; usable when the configuration enables
    /// illegal instructions.
    Illegal,

    /// Undocumented with hardware-dependent behavior; executed like its
    /// closest stable relative when illegal instructions are enabled, but
    /// never offered to the enumerator.
    Unstable,

    /// Locks the processor. Always refused.
    Jam,
}

/// Metadata for a single 6502 opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Instruction mnemonic (e.g. "LDA", "SLO", "JAM").
    pub mnemonic: &'static str,

    /// Dispatch kind for the interpreter.
    pub instruction: Instruction,

    /// Addressing mode for this encoding.
    pub addressing_mode: AddressingMode,

    /// Base cycle cost before dynamic penalties.
    pub base_cycles: u8,

    /// Total instruction size in bytes (opcode + operands).
    pub size_bytes: u8,

    /// Legality class.
    pub legality: Legality,
}

const fn op(
    mnemonic: &'static str,
    instruction: Instruction,
    mode: AddressingMode,
    base_cycles: u8,
    legality: Legality,
) -> OpcodeMetadata {
    OpcodeMetadata {
        mnemonic,
        instruction,
        addressing_mode: mode,
        base_cycles,
        size_bytes: 1 + mode.operand_bytes(),
        legality,
    }
}

use AddressingMode::{
    Absolute as Abs, AbsoluteX as Abx, AbsoluteY as Aby, Accumulator as Acc, Immediate as Imm,
    Implicit as Imp, Indirect as Ind, IndirectX as Inx, IndirectY as Iny, Relative as Rel,
    ZeroPage as Zp, ZeroPageX as Zpx, ZeroPageY as Zpy,
};
use Instruction as I;
use Legality::{Illegal as Il, Jam as Jm, Legal as Lg, Unstable as Un};

/// Complete 256-entry opcode metadata table indexed by opcode byte value.
///
/// Cycle costs and mode assignments follow the NMOS 6502; the undocumented
/// rows are the commonly agreed stable set. `const` so the whole table is
/// laid out at compile time.
pub const OPCODE_TABLE: [OpcodeMetadata; 256] = [
    // 0x00 - 0x0F
    op("BRK", I::Brk, Imp, 7, Lg),
    op("ORA", I::Ora, Inx, 6, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("SLO", I::Slo, Inx, 8, Il),
    op("NOP", I::Nop, Zp, 3, Il),
    op("ORA", I::Ora, Zp, 3, Lg),
    op("ASL", I::Asl, Zp, 5, Lg),
    op("SLO", I::Slo, Zp, 5, Il),
    op("PHP", I::Php, Imp, 3, Lg),
    op("ORA", I::Ora, Imm, 2, Lg),
    op("ASL", I::Asl, Acc, 2, Lg),
    op("ANC", I::Nop, Imm, 2, Un),
    op("NOP", I::Nop, Abs, 4, Il),
    op("ORA", I::Ora, Abs, 4, Lg),
    op("ASL", I::Asl, Abs, 6, Lg),
    op("SLO", I::Slo, Abs, 6, Il),
    // 0x10 - 0x1F
    op("BPL", I::Bpl, Rel, 2, Lg),
    op("ORA", I::Ora, Iny, 5, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("SLO", I::Slo, Iny, 8, Il),
    op("NOP", I::Nop, Zpx, 4, Il),
    op("ORA", I::Ora, Zpx, 4, Lg),
    op("ASL", I::Asl, Zpx, 6, Lg),
    op("SLO", I::Slo, Zpx, 6, Il),
    op("CLC", I::Clc, Imp, 2, Lg),
    op("ORA", I::Ora, Aby, 4, Lg),
    op("NOP", I::Nop, Imp, 2, Il),
    op("SLO", I::Slo, Aby, 7, Il),
    op("NOP", I::Nop, Abx, 4, Il),
    op("ORA", I::Ora, Abx, 4, Lg),
    op("ASL", I::Asl, Abx, 7, Lg),
    op("SLO", I::Slo, Abx, 7, Il),
    // 0x20 - 0x2F
    op("JSR", I::Jsr, Abs, 6, Lg),
    op("AND", I::And, Inx, 6, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("RLA", I::Rla, Inx, 8, Il),
    op("BIT", I::Bit, Zp, 3, Lg),
    op("AND", I::And, Zp, 3, Lg),
    op("ROL", I::Rol, Zp, 5, Lg),
    op("RLA", I::Rla, Zp, 5, Il),
    op("PLP", I::Plp, Imp, 4, Lg),
    op("AND", I::And, Imm, 2, Lg),
    op("ROL", I::Rol, Acc, 2, Lg),
    op("ANC", I::Nop, Imm, 2, Un),
    op("BIT", I::Bit, Abs, 4, Lg),
    op("AND", I::And, Abs, 4, Lg),
    op("ROL", I::Rol, Abs, 6, Lg),
    op("RLA", I::Rla, Abs, 6, Il),
    // 0x30 - 0x3F
    op("BMI", I::Bmi, Rel, 2, Lg),
    op("AND", I::And, Iny, 5, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("RLA", I::Rla, Iny, 8, Il),
    op("NOP", I::Nop, Zpx, 4, Il),
    op("AND", I::And, Zpx, 4, Lg),
    op("ROL", I::Rol, Zpx, 6, Lg),
    op("RLA", I::Rla, Zpx, 6, Il),
    op("SEC", I::Sec, Imp, 2, Lg),
    op("AND", I::And, Aby, 4, Lg),
    op("NOP", I::Nop, Imp, 2, Il),
    op("RLA", I::Rla, Aby, 7, Il),
    op("NOP", I::Nop, Abx, 4, Il),
    op("AND", I::And, Abx, 4, Lg),
    op("ROL", I::Rol, Abx, 7, Lg),
    op("RLA", I::Rla, Abx, 7, Il),
    // 0x40 - 0x4F
    op("RTI", I::Rti, Imp, 6, Lg),
    op("EOR", I::Eor, Inx, 6, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("SRE", I::Sre, Inx, 8, Il),
    op("NOP", I::Nop, Zp, 3, Il),
    op("EOR", I::Eor, Zp, 3, Lg),
    op("LSR", I::Lsr, Zp, 5, Lg),
    op("SRE", I::Sre, Zp, 5, Il),
    op("PHA", I::Pha, Imp, 3, Lg),
    op("EOR", I::Eor, Imm, 2, Lg),
    op("LSR", I::Lsr, Acc, 2, Lg),
    op("ALR", I::Nop, Imm, 2, Un),
    op("JMP", I::Jmp, Abs, 3, Lg),
    op("EOR", I::Eor, Abs, 4, Lg),
    op("LSR", I::Lsr, Abs, 6, Lg),
    op("SRE", I::Sre, Abs, 6, Il),
    // 0x50 - 0x5F
    op("BVC", I::Bvc, Rel, 2, Lg),
    op("EOR", I::Eor, Iny, 5, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("SRE", I::Sre, Iny, 8, Il),
    op("NOP", I::Nop, Zpx, 4, Il),
    op("EOR", I::Eor, Zpx, 4, Lg),
    op("LSR", I::Lsr, Zpx, 6, Lg),
    op("SRE", I::Sre, Zpx, 6, Il),
    op("CLI", I::Cli, Imp, 2, Lg),
    op("EOR", I::Eor, Aby, 4, Lg),
    op("NOP", I::Nop, Imp, 2, Il),
    op("SRE", I::Sre, Aby, 7, Il),
    op("NOP", I::Nop, Abx, 4, Il),
    op("EOR", I::Eor, Abx, 4, Lg),
    op("LSR", I::Lsr, Abx, 7, Lg),
    op("SRE", I::Sre, Abx, 7, Il),
    // 0x60 - 0x6F
    op("RTS", I::Rts, Imp, 6, Lg),
    op("ADC", I::Adc, Inx, 6, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("RRA", I::Rra, Inx, 8, Il),
    op("NOP", I::Nop, Zp, 3, Il),
    op("ADC", I::Adc, Zp, 3, Lg),
    op("ROR", I::Ror, Zp, 5, Lg),
    op("RRA", I::Rra, Zp, 5, Il),
    op("PLA", I::Pla, Imp, 4, Lg),
    op("ADC", I::Adc, Imm, 2, Lg),
    op("ROR", I::Ror, Acc, 2, Lg),
    op("ARR", I::Nop, Imm, 2, Un),
    op("JMP", I::Jmp, Ind, 5, Lg),
    op("ADC", I::Adc, Abs, 4, Lg),
    op("ROR", I::Ror, Abs, 6, Lg),
    op("RRA", I::Rra, Abs, 6, Il),
    // 0x70 - 0x7F
    op("BVS", I::Bvs, Rel, 2, Lg),
    op("ADC", I::Adc, Iny, 5, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("RRA", I::Rra, Iny, 8, Il),
    op("NOP", I::Nop, Zpx, 4, Il),
    op("ADC", I::Adc, Zpx, 4, Lg),
    op("ROR", I::Ror, Zpx, 6, Lg),
    op("RRA", I::Rra, Zpx, 6, Il),
    op("SEI", I::Sei, Imp, 2, Lg),
    op("ADC", I::Adc, Aby, 4, Lg),
    op("NOP", I::Nop, Imp, 2, Il),
    op("RRA", I::Rra, Aby, 7, Il),
    op("NOP", I::Nop, Abx, 4, Il),
    op("ADC", I::Adc, Abx, 4, Lg),
    op("ROR", I::Ror, Abx, 7, Lg),
    op("RRA", I::Rra, Abx, 7, Il),
    // 0x80 - 0x8F
    op("NOP", I::Nop, Imm, 2, Il),
    op("STA", I::Sta, Inx, 6, Lg),
    op("NOP", I::Nop, Imm, 2, Il),
    op("SAX", I::Sax, Inx, 6, Il),
    op("STY", I::Sty, Zp, 3, Lg),
    op("STA", I::Sta, Zp, 3, Lg),
    op("STX", I::Stx, Zp, 3, Lg),
    op("SAX", I::Sax, Zp, 3, Il),
    op("DEY", I::Dey, Imp, 2, Lg),
    op("NOP", I::Nop, Imm, 2, Il),
    op("TXA", I::Txa, Imp, 2, Lg),
    op("XAA", I::Nop, Imm, 2, Un),
    op("STY", I::Sty, Abs, 4, Lg),
    op("STA", I::Sta, Abs, 4, Lg),
    op("STX", I::Stx, Abs, 4, Lg),
    op("SAX", I::Sax, Abs, 4, Il),
    // 0x90 - 0x9F
    op("BCC", I::Bcc, Rel, 2, Lg),
    op("STA", I::Sta, Iny, 6, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("AHX", I::Nop, Iny, 6, Un),
    op("STY", I::Sty, Zpx, 4, Lg),
    op("STA", I::Sta, Zpx, 4, Lg),
    op("STX", I::Stx, Zpy, 4, Lg),
    op("SAX", I::Sax, Zpy, 4, Il),
    op("TYA", I::Tya, Imp, 2, Lg),
    op("STA", I::Sta, Aby, 5, Lg),
    op("TXS", I::Txs, Imp, 2, Lg),
    op("TAS", I::Nop, Aby, 5, Un),
    op("SHY", I::Nop, Abx, 5, Un),
    op("STA", I::Sta, Abx, 5, Lg),
    op("SHX", I::Nop, Aby, 5, Un),
    op("AHX", I::Nop, Aby, 5, Un),
    // 0xA0 - 0xAF
    op("LDY", I::Ldy, Imm, 2, Lg),
    op("LDA", I::Lda, Inx, 6, Lg),
    op("LDX", I::Ldx, Imm, 2, Lg),
    op("LAX", I::Lax, Inx, 6, Il),
    op("LDY", I::Ldy, Zp, 3, Lg),
    op("LDA", I::Lda, Zp, 3, Lg),
    op("LDX", I::Ldx, Zp, 3, Lg),
    op("LAX", I::Lax, Zp, 3, Il),
    op("TAY", I::Tay, Imp, 2, Lg),
    op("LDA", I::Lda, Imm, 2, Lg),
    op("TAX", I::Tax, Imp, 2, Lg),
    op("LAX", I::Lax, Imm, 2, Un),
    op("LDY", I::Ldy, Abs, 4, Lg),
    op("LDA", I::Lda, Abs, 4, Lg),
    op("LDX", I::Ldx, Abs, 4, Lg),
    op("LAX", I::Lax, Abs, 4, Il),
    // 0xB0 - 0xBF
    op("BCS", I::Bcs, Rel, 2, Lg),
    op("LDA", I::Lda, Iny, 5, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("LAX", I::Lax, Iny, 5, Il),
    op("LDY", I::Ldy, Zpx, 4, Lg),
    op("LDA", I::Lda, Zpx, 4, Lg),
    op("LDX", I::Ldx, Zpy, 4, Lg),
    op("LAX", I::Lax, Zpy, 4, Il),
    op("CLV", I::Clv, Imp, 2, Lg),
    op("LDA", I::Lda, Aby, 4, Lg),
    op("TSX", I::Tsx, Imp, 2, Lg),
    op("LAS", I::Lax, Aby, 4, Un),
    op("LDY", I::Ldy, Abx, 4, Lg),
    op("LDA", I::Lda, Abx, 4, Lg),
    op("LDX", I::Ldx, Aby, 4, Lg),
    op("LAX", I::Lax, Aby, 4, Il),
    // 0xC0 - 0xCF
    op("CPY", I::Cpy, Imm, 2, Lg),
    op("CMP", I::Cmp, Inx, 6, Lg),
    op("NOP", I::Nop, Imm, 2, Il),
    op("DCP", I::Dcp, Inx, 8, Il),
    op("CPY", I::Cpy, Zp, 3, Lg),
    op("CMP", I::Cmp, Zp, 3, Lg),
    op("DEC", I::Dec, Zp, 5, Lg),
    op("DCP", I::Dcp, Zp, 5, Il),
    op("INY", I::Iny, Imp, 2, Lg),
    op("CMP", I::Cmp, Imm, 2, Lg),
    op("DEX", I::Dex, Imp, 2, Lg),
    op("AXS", I::Nop, Imm, 2, Un),
    op("CPY", I::Cpy, Abs, 4, Lg),
    op("CMP", I::Cmp, Abs, 4, Lg),
    op("DEC", I::Dec, Abs, 6, Lg),
    op("DCP", I::Dcp, Abs, 6, Il),
    // 0xD0 - 0xDF
    op("BNE", I::Bne, Rel, 2, Lg),
    op("CMP", I::Cmp, Iny, 5, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("DCP", I::Dcp, Iny, 8, Il),
    op("NOP", I::Nop, Zpx, 4, Il),
    op("CMP", I::Cmp, Zpx, 4, Lg),
    op("DEC", I::Dec, Zpx, 6, Lg),
    op("DCP", I::Dcp, Zpx, 6, Il),
    op("CLD", I::Cld, Imp, 2, Lg),
    op("CMP", I::Cmp, Aby, 4, Lg),
    op("NOP", I::Nop, Imp, 2, Il),
    op("DCP", I::Dcp, Aby, 7, Il),
    op("NOP", I::Nop, Abx, 4, Il),
    op("CMP", I::Cmp, Abx, 4, Lg),
    op("DEC", I::Dec, Abx, 7, Lg),
    op("DCP", I::Dcp, Abx, 7, Il),
    // 0xE0 - 0xEF
    op("CPX", I::Cpx, Imm, 2, Lg),
    op("SBC", I::Sbc, Inx, 6, Lg),
    op("NOP", I::Nop, Imm, 2, Il),
    op("ISB", I::Isb, Inx, 8, Il),
    op("CPX", I::Cpx, Zp, 3, Lg),
    op("SBC", I::Sbc, Zp, 3, Lg),
    op("INC", I::Inc, Zp, 5, Lg),
    op("ISB", I::Isb, Zp, 5, Il),
    op("INX", I::Inx, Imp, 2, Lg),
    op("SBC", I::Sbc, Imm, 2, Lg),
    op("NOP", I::Nop, Imp, 2, Lg),
    op("SBC", I::Sbc, Imm, 2, Il),
    op("CPX", I::Cpx, Abs, 4, Lg),
    op("SBC", I::Sbc, Abs, 4, Lg),
    op("INC", I::Inc, Abs, 6, Lg),
    op("ISB", I::Isb, Abs, 6, Il),
    // 0xF0 - 0xFF
    op("BEQ", I::Beq, Rel, 2, Lg),
    op("SBC", I::Sbc, Iny, 5, Lg),
    op("JAM", I::Jam, Imp, 2, Jm),
    op("ISB", I::Isb, Iny, 8, Il),
    op("NOP", I::Nop, Zpx, 4, Il),
    op("SBC", I::Sbc, Zpx, 4, Lg),
    op("INC", I::Inc, Zpx, 6, Lg),
    op("ISB", I::Isb, Zpx, 6, Il),
    op("SED", I::Sed, Imp, 2, Lg),
    op("SBC", I::Sbc, Aby, 4, Lg),
    op("NOP", I::Nop, Imp, 2, Il),
    op("ISB", I::Isb, Aby, 7, Il),
    op("NOP", I::Nop, Abx, 4, Il),
    op("SBC", I::Sbc, Abx, 4, Lg),
    op("INC", I::Inc, Abx, 7, Lg),
    op("ISB", I::Isb, Abx, 7, Il),
];

/// Returns every opcode byte whose legality class permits use by the
/// enumerator: documented instructions, plus the stable undocumented set
/// when `include_illegal` is true.
pub fn usable_opcodes(include_illegal: bool) -> Vec<u8> {
    OPCODE_TABLE
        .iter()
        .enumerate()
        .filter(|(_, m)| match m.legality {
            Legality::Legal => true,
            Legality::Illegal => include_illegal,
            Legality::Unstable | Legality::Jam => false,
        })
        .map(|(i, _)| i as u8)
        .collect()
}
