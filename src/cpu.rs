//! # CPU State and Execution
//!
//! This module contains the [`Cpu`] struct representing 6502 processor state
//! and the fetch-decode-execute loop used to run candidate sequences.
//!
//! ## Execution Model
//!
//! [`Cpu::execute`] runs instructions from a start address until one of:
//!
//! - a BRK opcode is fetched - the run is **complete**. BRK is the halt
//!   marker: uninitialized legal memory reads as zero, so a candidate that
//!   falls off its own end into the fetch window halts cleanly. The halting
//!   BRK contributes no cycles.
//! - the instruction budget is exhausted - `ExecutionLimit`, so looping
//!   candidates fail instead of hanging the search.
//! - an instruction cannot execute - an illegal opcode while illegal
//!   instructions are disabled, or a memory policy violation. The failing
//!   instruction does not count as executed.
//!
//! ## Cycle Accounting
//!
//! Each opcode charges its base cycle cost from the metadata table, plus:
//!
//! - +1 when an indexed read (`abs,X`, `abs,Y`, `(ind),Y`) crosses a page
//!   boundary, for the read-flavored instructions only;
//! - +1 for a branch taken within the same page, +2 for a branch taken
//!   across a page boundary.
//!
//! Decimal-mode ADC/SBC reproduce NMOS behavior: the stored result and the
//! carry are BCD-adjusted while N, V, and Z are computed from the
//! pre-adjusted binary result.

use crate::addressing::AddressingMode;
use crate::error::{CpuError, MemoryError};
use crate::memory::MemoryBus;
use crate::opcodes::{Instruction, Legality, OPCODE_TABLE};

/// The four 8-bit registers, named. Used by verification failure records
/// and by transformation cache projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Register {
    A,
    X,
    Y,
    Sp,
}

/// The seven status flags, named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    C,
    Z,
    I,
    D,
    B,
    V,
    N,
}

/// A plain snapshot of register and flag state, detached from any
/// execution machinery. Test cases carry one of these as the concrete
/// initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub c: bool,
    pub z: bool,
    pub i: bool,
    pub d: bool,
    pub b: bool,
    pub v: bool,
    pub n: bool,
}

impl Default for CpuState {
    fn default() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFF,
            pc: 0,
            c: false,
            z: false,
            i: false,
            d: false,
            b: false,
            v: false,
            n: false,
        }
    }
}

impl CpuState {
    /// Returns the named register.
    pub fn register(&self, name: Register) -> u8 {
        match name {
            Register::A => self.a,
            Register::X => self.x,
            Register::Y => self.y,
            Register::Sp => self.sp,
        }
    }

    /// Sets the named register.
    pub fn set_register(&mut self, name: Register, value: u8) {
        match name {
            Register::A => self.a = value,
            Register::X => self.x = value,
            Register::Y => self.y = value,
            Register::Sp => self.sp = value,
        }
    }

    /// Returns the named flag.
    pub fn flag(&self, name: Flag) -> bool {
        match name {
            Flag::C => self.c,
            Flag::Z => self.z,
            Flag::I => self.i,
            Flag::D => self.d,
            Flag::B => self.b,
            Flag::V => self.v,
            Flag::N => self.n,
        }
    }

    /// Sets the named flag.
    pub fn set_flag(&mut self, name: Flag, value: bool) {
        match name {
            Flag::C => self.c = value,
            Flag::Z => self.z = value,
            Flag::I => self.i = value,
            Flag::D => self.d = value,
            Flag::B => self.b = value,
            Flag::V => self.v = value,
            Flag::N => self.n = value,
        }
    }
}

/// Result of one call to [`Cpu::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Cycles consumed by this run.
    pub cycles: u64,

    /// Instructions executed to completion.
    pub instructions: u64,

    /// True if the run halted normally (BRK).
    pub completed: bool,

    /// The error that ended the run, if it did not complete.
    pub error: Option<CpuError>,
}

/// 6502 CPU state.
///
/// Registers and flags are plain fields; memory is borrowed per execution
/// rather than owned, because the verifier inspects the memory after every
/// run.
///
/// # Examples
///
/// ```
/// use opt6502::{Cpu, TrackedMemory, Region, Value};
///
/// let mut mem = TrackedMemory::new();
/// mem.set_input_regions(vec![Region::new(0x1000, vec![Value::Any; 4])]);
/// // LDA #$2A, then a zero byte: BRK halts the run.
/// mem.initialize(0x1000, 0xA9);
/// mem.initialize(0x1001, 0x2A);
///
/// let mut cpu = Cpu::new(false);
/// let result = cpu.execute(&mut mem, 0x1000, 100);
/// assert!(result.completed);
/// assert_eq!(cpu.a(), 0x2A);
/// assert_eq!(result.cycles, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Cpu {
    /// Accumulator register
    pub(crate) a: u8,

    /// X index register
    pub(crate) x: u8,

    /// Y index register
    pub(crate) y: u8,

    /// Program counter (address of next instruction)
    pub(crate) pc: u16,

    /// Stack pointer (0x0100 + sp gives the full stack address)
    pub(crate) sp: u8,

    /// Negative flag
    pub(crate) flag_n: bool,

    /// Overflow flag
    pub(crate) flag_v: bool,

    /// Break flag. Not driven by BRK/PHP (those force bit 4 only in the
    /// pushed byte); present so specifications can constrain it and PLP/RTI
    /// can restore it.
    pub(crate) flag_b: bool,

    /// Decimal mode flag
    pub(crate) flag_d: bool,

    /// Interrupt disable flag
    pub(crate) flag_i: bool,

    /// Zero flag
    pub(crate) flag_z: bool,

    /// Carry flag
    pub(crate) flag_c: bool,

    /// Total cycles executed
    pub(crate) cycles: u64,

    /// Whether the stable undocumented opcodes may execute.
    allow_illegal: bool,
}

impl Cpu {
    /// Creates a CPU in the power-on state with all registers zeroed and
    /// the stack pointer at 0xFF.
    pub fn new(allow_illegal: bool) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: 0xFF,
            flag_n: false,
            flag_v: false,
            flag_b: false,
            flag_d: false,
            flag_i: false,
            flag_z: false,
            flag_c: false,
            cycles: 0,
            allow_illegal,
        }
    }

    /// Runs instructions starting at `start_pc` until the candidate halts,
    /// fails, or exhausts `max_instructions`.
    pub fn execute<M: MemoryBus>(
        &mut self,
        mem: &mut M,
        start_pc: u16,
        max_instructions: usize,
    ) -> Execution {
        self.pc = start_pc;
        let start_cycles = self.cycles;

        let mut result = Execution {
            cycles: 0,
            instructions: 0,
            completed: false,
            error: None,
        };

        loop {
            if result.instructions as usize >= max_instructions {
                result.error = Some(CpuError::ExecutionLimit {
                    limit: max_instructions,
                });
                break;
            }

            match self.step(mem) {
                Ok(true) => {
                    result.completed = true;
                    break;
                }
                Ok(false) => result.instructions += 1,
                Err(e) => {
                    result.error = Some(e);
                    break;
                }
            }
        }

        result.cycles = self.cycles - start_cycles;
        result
    }

    /// Executes one instruction. Returns `Ok(true)` when a BRK halted the
    /// run.
    pub fn step<M: MemoryBus>(&mut self, mem: &mut M) -> Result<bool, CpuError> {
        let opcode = self.load(mem, self.pc)?;
        let metadata = &OPCODE_TABLE[opcode as usize];

        match metadata.legality {
            Legality::Legal => {}
            Legality::Illegal | Legality::Unstable if self.allow_illegal => {}
            _ => {
                return Err(CpuError::IllegalInstruction {
                    opcode,
                    pc: self.pc,
                })
            }
        }

        use crate::instructions::{
            alu, branches, control, flags, illegal, inc_dec, load_store, shifts, stack, transfer,
        };

        match metadata.instruction {
            // The halt marker: the run is complete, no cycles charged.
            Instruction::Brk => return Ok(true),

            Instruction::Adc => alu::execute_adc(self, mem, opcode)?,
            Instruction::And => alu::execute_and(self, mem, opcode)?,
            Instruction::Bit => alu::execute_bit(self, mem, opcode)?,
            Instruction::Cmp => alu::execute_cmp(self, mem, opcode)?,
            Instruction::Cpx => alu::execute_cpx(self, mem, opcode)?,
            Instruction::Cpy => alu::execute_cpy(self, mem, opcode)?,
            Instruction::Eor => alu::execute_eor(self, mem, opcode)?,
            Instruction::Ora => alu::execute_ora(self, mem, opcode)?,
            Instruction::Sbc => alu::execute_sbc(self, mem, opcode)?,

            Instruction::Bcc => branches::execute_bcc(self, mem, opcode)?,
            Instruction::Bcs => branches::execute_bcs(self, mem, opcode)?,
            Instruction::Beq => branches::execute_beq(self, mem, opcode)?,
            Instruction::Bmi => branches::execute_bmi(self, mem, opcode)?,
            Instruction::Bne => branches::execute_bne(self, mem, opcode)?,
            Instruction::Bpl => branches::execute_bpl(self, mem, opcode)?,
            Instruction::Bvc => branches::execute_bvc(self, mem, opcode)?,
            Instruction::Bvs => branches::execute_bvs(self, mem, opcode)?,

            Instruction::Jmp => control::execute_jmp(self, mem, opcode)?,
            Instruction::Jsr => control::execute_jsr(self, mem, opcode)?,
            Instruction::Rti => control::execute_rti(self, mem, opcode)?,
            Instruction::Rts => control::execute_rts(self, mem, opcode)?,
            Instruction::Nop => control::execute_nop(self, mem, opcode)?,

            Instruction::Clc => flags::execute_clc(self, opcode),
            Instruction::Cld => flags::execute_cld(self, opcode),
            Instruction::Cli => flags::execute_cli(self, opcode),
            Instruction::Clv => flags::execute_clv(self, opcode),
            Instruction::Sec => flags::execute_sec(self, opcode),
            Instruction::Sed => flags::execute_sed(self, opcode),
            Instruction::Sei => flags::execute_sei(self, opcode),

            Instruction::Dec => inc_dec::execute_dec(self, mem, opcode)?,
            Instruction::Dex => inc_dec::execute_dex(self, opcode),
            Instruction::Dey => inc_dec::execute_dey(self, opcode),
            Instruction::Inc => inc_dec::execute_inc(self, mem, opcode)?,
            Instruction::Inx => inc_dec::execute_inx(self, opcode),
            Instruction::Iny => inc_dec::execute_iny(self, opcode),

            Instruction::Lda => load_store::execute_lda(self, mem, opcode)?,
            Instruction::Ldx => load_store::execute_ldx(self, mem, opcode)?,
            Instruction::Ldy => load_store::execute_ldy(self, mem, opcode)?,
            Instruction::Sta => load_store::execute_sta(self, mem, opcode)?,
            Instruction::Stx => load_store::execute_stx(self, mem, opcode)?,
            Instruction::Sty => load_store::execute_sty(self, mem, opcode)?,

            Instruction::Asl => shifts::execute_asl(self, mem, opcode)?,
            Instruction::Lsr => shifts::execute_lsr(self, mem, opcode)?,
            Instruction::Rol => shifts::execute_rol(self, mem, opcode)?,
            Instruction::Ror => shifts::execute_ror(self, mem, opcode)?,

            Instruction::Pha => stack::execute_pha(self, mem, opcode)?,
            Instruction::Php => stack::execute_php(self, mem, opcode)?,
            Instruction::Pla => stack::execute_pla(self, mem, opcode)?,
            Instruction::Plp => stack::execute_plp(self, mem, opcode)?,

            Instruction::Tax => transfer::execute_tax(self, opcode),
            Instruction::Tay => transfer::execute_tay(self, opcode),
            Instruction::Tsx => transfer::execute_tsx(self, opcode),
            Instruction::Txa => transfer::execute_txa(self, opcode),
            Instruction::Txs => transfer::execute_txs(self, opcode),
            Instruction::Tya => transfer::execute_tya(self, opcode),

            Instruction::Lax => illegal::execute_lax(self, mem, opcode)?,
            Instruction::Sax => illegal::execute_sax(self, mem, opcode)?,
            Instruction::Dcp => illegal::execute_dcp(self, mem, opcode)?,
            Instruction::Isb => illegal::execute_isb(self, mem, opcode)?,
            Instruction::Slo => illegal::execute_slo(self, mem, opcode)?,
            Instruction::Rla => illegal::execute_rla(self, mem, opcode)?,
            Instruction::Sre => illegal::execute_sre(self, mem, opcode)?,
            Instruction::Rra => illegal::execute_rra(self, mem, opcode)?,

            Instruction::Jam => {
                return Err(CpuError::IllegalInstruction {
                    opcode,
                    pc: self.pc,
                })
            }
        }

        Ok(false)
    }

    /// Loads registers and flags from a snapshot.
    pub fn apply_state(&mut self, state: &CpuState) {
        self.a = state.a;
        self.x = state.x;
        self.y = state.y;
        self.sp = state.sp;
        self.pc = state.pc;
        self.flag_c = state.c;
        self.flag_z = state.z;
        self.flag_i = state.i;
        self.flag_d = state.d;
        self.flag_b = state.b;
        self.flag_v = state.v;
        self.flag_n = state.n;
    }

    /// Captures registers and flags as a snapshot.
    pub fn snapshot(&self) -> CpuState {
        CpuState {
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            pc: self.pc,
            c: self.flag_c,
            z: self.flag_z,
            i: self.flag_i,
            d: self.flag_d,
            b: self.flag_b,
            v: self.flag_v,
            n: self.flag_n,
        }
    }

    // ========== Register Accessors ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer value. The full stack address is
    /// 0x0100 + SP; the stack grows downward.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Returns total cycles executed since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns the status register packed as NV-BDIZC with bit 5 reading
    /// as 1.
    pub fn status(&self) -> u8 {
        let mut status: u8 = 0b0010_0000;
        if self.flag_n {
            status |= 0b1000_0000;
        }
        if self.flag_v {
            status |= 0b0100_0000;
        }
        if self.flag_b {
            status |= 0b0001_0000;
        }
        if self.flag_d {
            status |= 0b0000_1000;
        }
        if self.flag_i {
            status |= 0b0000_0100;
        }
        if self.flag_z {
            status |= 0b0000_0010;
        }
        if self.flag_c {
            status |= 0b0000_0001;
        }
        status
    }

    /// Unpacks a status byte into the individual flags.
    pub fn set_status(&mut self, value: u8) {
        self.flag_n = value & 0b1000_0000 != 0;
        self.flag_v = value & 0b0100_0000 != 0;
        self.flag_b = value & 0b0001_0000 != 0;
        self.flag_d = value & 0b0000_1000 != 0;
        self.flag_i = value & 0b0000_0100 != 0;
        self.flag_z = value & 0b0000_0010 != 0;
        self.flag_c = value & 0b0000_0001 != 0;
    }

    pub fn flag_n(&self) -> bool {
        self.flag_n
    }
    pub fn flag_v(&self) -> bool {
        self.flag_v
    }
    pub fn flag_b(&self) -> bool {
        self.flag_b
    }
    pub fn flag_d(&self) -> bool {
        self.flag_d
    }
    pub fn flag_i(&self) -> bool {
        self.flag_i
    }
    pub fn flag_z(&self) -> bool {
        self.flag_z
    }
    pub fn flag_c(&self) -> bool {
        self.flag_c
    }

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }
    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }
    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }
    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }
    pub fn set_flag_n(&mut self, value: bool) {
        self.flag_n = value;
    }
    pub fn set_flag_v(&mut self, value: bool) {
        self.flag_v = value;
    }
    pub fn set_flag_b(&mut self, value: bool) {
        self.flag_b = value;
    }
    pub fn set_flag_d(&mut self, value: bool) {
        self.flag_d = value;
    }
    pub fn set_flag_i(&mut self, value: bool) {
        self.flag_i = value;
    }
    pub fn set_flag_z(&mut self, value: bool) {
        self.flag_z = value;
    }
    pub fn set_flag_c(&mut self, value: bool) {
        self.flag_c = value;
    }

    // ========== Helpers for Instruction Implementations ==========

    /// Reads a byte, attaching the current PC to any policy violation.
    pub(crate) fn load<M: MemoryBus>(&self, mem: &mut M, addr: u16) -> Result<u8, CpuError> {
        mem.read(addr).map_err(|e| self.memory_error(e))
    }

    /// Writes a byte, attaching the current PC to any policy violation.
    pub(crate) fn store<M: MemoryBus>(
        &self,
        mem: &mut M,
        addr: u16,
        value: u8,
    ) -> Result<(), CpuError> {
        mem.write(addr, value).map_err(|e| self.memory_error(e))
    }

    fn memory_error(&self, source: MemoryError) -> CpuError {
        CpuError::Memory {
            pc: self.pc,
            source,
        }
    }

    /// Sets Z and N from a result value.
    pub(crate) fn update_zn(&mut self, value: u8) {
        self.flag_z = value == 0;
        self.flag_n = value & 0x80 != 0;
    }

    /// Resolves the effective address for a memory-operand addressing mode.
    ///
    /// Returns `(address, page_crossed)`; `page_crossed` is only ever true
    /// for the indexed modes that can incur the +1 read penalty.
    pub(crate) fn effective_address<M: MemoryBus>(
        &self,
        mem: &mut M,
        mode: AddressingMode,
    ) -> Result<(u16, bool), CpuError> {
        match mode {
            AddressingMode::Immediate => Ok((self.pc.wrapping_add(1), false)),
            AddressingMode::ZeroPage => {
                let addr = self.load(mem, self.pc.wrapping_add(1))? as u16;
                Ok((addr, false))
            }
            AddressingMode::ZeroPageX => {
                let base = self.load(mem, self.pc.wrapping_add(1))?;
                Ok((base.wrapping_add(self.x) as u16, false))
            }
            AddressingMode::ZeroPageY => {
                let base = self.load(mem, self.pc.wrapping_add(1))?;
                Ok((base.wrapping_add(self.y) as u16, false))
            }
            AddressingMode::Absolute => {
                let addr = self.load16(mem, self.pc.wrapping_add(1))?;
                Ok((addr, false))
            }
            AddressingMode::AbsoluteX => {
                let base = self.load16(mem, self.pc.wrapping_add(1))?;
                let addr = base.wrapping_add(self.x as u16);
                Ok((addr, (base & 0xFF00) != (addr & 0xFF00)))
            }
            AddressingMode::AbsoluteY => {
                let base = self.load16(mem, self.pc.wrapping_add(1))?;
                let addr = base.wrapping_add(self.y as u16);
                Ok((addr, (base & 0xFF00) != (addr & 0xFF00)))
            }
            AddressingMode::Indirect => {
                // Hardware bug: a pointer at $xxFF wraps within its page
                // when fetching the high byte.
                let pointer = self.load16(mem, self.pc.wrapping_add(1))?;
                let pointer_hi = (pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF);
                let lo = self.load(mem, pointer)? as u16;
                let hi = self.load(mem, pointer_hi)? as u16;
                Ok(((hi << 8) | lo, false))
            }
            AddressingMode::IndirectX => {
                let zp = self.load(mem, self.pc.wrapping_add(1))?.wrapping_add(self.x);
                let lo = self.load(mem, zp as u16)? as u16;
                let hi = self.load(mem, zp.wrapping_add(1) as u16)? as u16;
                Ok(((hi << 8) | lo, false))
            }
            AddressingMode::IndirectY => {
                let zp = self.load(mem, self.pc.wrapping_add(1))?;
                let lo = self.load(mem, zp as u16)? as u16;
                let hi = self.load(mem, zp.wrapping_add(1) as u16)? as u16;
                let base = (hi << 8) | lo;
                let addr = base.wrapping_add(self.y as u16);
                Ok((addr, (base & 0xFF00) != (addr & 0xFF00)))
            }
            AddressingMode::Implicit
            | AddressingMode::Accumulator
            | AddressingMode::Relative => {
                unreachable!("no effective address for {mode:?}")
            }
        }
    }

    /// Reads the operand value for a value-consuming instruction.
    ///
    /// Returns `(value, page_crossed)`.
    pub(crate) fn operand_value<M: MemoryBus>(
        &self,
        mem: &mut M,
        mode: AddressingMode,
    ) -> Result<(u8, bool), CpuError> {
        let (addr, crossed) = self.effective_address(mem, mode)?;
        Ok((self.load(mem, addr)?, crossed))
    }

    fn load16<M: MemoryBus>(&self, mem: &mut M, addr: u16) -> Result<u16, CpuError> {
        let lo = self.load(mem, addr)? as u16;
        let hi = self.load(mem, addr.wrapping_add(1))? as u16;
        Ok((hi << 8) | lo)
    }

    // ========== Stack Helpers ==========

    /// Pushes a byte; the pointer decrements after the write and wraps
    /// within the stack page.
    pub(crate) fn push8<M: MemoryBus>(&mut self, mem: &mut M, value: u8) -> Result<(), CpuError> {
        self.store(mem, 0x0100 | self.sp as u16, value)?;
        self.sp = self.sp.wrapping_sub(1);
        Ok(())
    }

    /// Pulls a byte; the pointer increments before the read and wraps
    /// within the stack page.
    pub(crate) fn pull8<M: MemoryBus>(&mut self, mem: &mut M) -> Result<u8, CpuError> {
        self.sp = self.sp.wrapping_add(1);
        self.load(mem, 0x0100 | self.sp as u16)
    }

    pub(crate) fn push16<M: MemoryBus>(&mut self, mem: &mut M, value: u16) -> Result<(), CpuError> {
        self.push8(mem, (value >> 8) as u8)?;
        self.push8(mem, (value & 0xFF) as u8)
    }

    pub(crate) fn pull16<M: MemoryBus>(&mut self, mem: &mut M) -> Result<u16, CpuError> {
        let lo = self.pull8(mem)? as u16;
        let hi = self.pull8(mem)? as u16;
        Ok((hi << 8) | lo)
    }

    /// Charges the base cycles for `opcode` plus the page-crossing penalty
    /// when this instruction is penalty-eligible, then advances the PC past
    /// the instruction.
    pub(crate) fn finish_instruction(&mut self, opcode: u8, page_crossed: bool) {
        let metadata = &OPCODE_TABLE[opcode as usize];
        let mut cycles = metadata.base_cycles as u64;
        if page_crossed && metadata.instruction.page_penalty() {
            cycles += 1;
        }
        self.cycles += cycles;
        self.pc = self.pc.wrapping_add(metadata.size_bytes as u16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Region;
    use crate::value::Value;
    use crate::TrackedMemory;

    fn open_memory() -> TrackedMemory {
        let mut mem = TrackedMemory::new();
        mem.set_input_regions(vec![Region::new(0x0000, vec![Value::Any; 0x10000])]);
        mem.set_output_regions(vec![Region::new(0x0000, vec![Value::Any; 0x10000])]);
        mem
    }

    #[test]
    fn test_power_on_state() {
        let cpu = Cpu::new(false);
        assert_eq!(cpu.a(), 0);
        assert_eq!(cpu.x(), 0);
        assert_eq!(cpu.y(), 0);
        assert_eq!(cpu.sp(), 0xFF);
        assert_eq!(cpu.cycles(), 0);
        assert!(!cpu.flag_c());
    }

    #[test]
    fn test_status_packing_round_trip() {
        let mut cpu = Cpu::new(false);
        cpu.set_flag_n(true);
        cpu.set_flag_z(true);
        cpu.set_flag_c(true);

        let status = cpu.status();
        assert_eq!(status & 0b0010_0000, 0b0010_0000); // bit 5 always set
        assert_eq!(status, 0b1010_0011);

        let mut other = Cpu::new(false);
        other.set_status(status);
        assert!(other.flag_n() && other.flag_z() && other.flag_c());
        assert!(!other.flag_v());
    }

    #[test]
    fn test_brk_halts_without_cycles() {
        let mut mem = open_memory();
        mem.initialize(0x1000, 0x00); // BRK

        let mut cpu = Cpu::new(false);
        let result = cpu.execute(&mut mem, 0x1000, 10);

        assert!(result.completed);
        assert_eq!(result.cycles, 0);
        assert_eq!(result.instructions, 0);
    }

    #[test]
    fn test_illegal_opcode_rejected_when_disabled() {
        let mut mem = open_memory();
        mem.initialize(0x1000, 0xA7); // LAX zp

        let mut cpu = Cpu::new(false);
        let result = cpu.execute(&mut mem, 0x1000, 10);
        assert_eq!(
            result.error,
            Some(CpuError::IllegalInstruction {
                opcode: 0xA7,
                pc: 0x1000
            })
        );

        let mut mem = open_memory();
        mem.initialize(0x1000, 0xA7);
        let mut cpu = Cpu::new(true);
        let result = cpu.execute(&mut mem, 0x1000, 10);
        assert!(result.completed);
    }

    #[test]
    fn test_jam_always_rejected() {
        let mut mem = open_memory();
        mem.initialize(0x1000, 0x02);

        let mut cpu = Cpu::new(true);
        let result = cpu.execute(&mut mem, 0x1000, 10);
        assert!(matches!(
            result.error,
            Some(CpuError::IllegalInstruction { opcode: 0x02, .. })
        ));
    }

    #[test]
    fn test_execution_limit() {
        let mut mem = open_memory();
        // JMP $1000: a tight infinite loop.
        mem.initialize(0x1000, 0x4C);
        mem.initialize(0x1001, 0x00);
        mem.initialize(0x1002, 0x10);

        let mut cpu = Cpu::new(false);
        let result = cpu.execute(&mut mem, 0x1000, 50);
        assert_eq!(result.error, Some(CpuError::ExecutionLimit { limit: 50 }));
        assert_eq!(result.instructions, 50);
    }

    #[test]
    fn test_read_violation_carries_pc() {
        let mut mem = TrackedMemory::new();
        mem.set_input_regions(vec![Region::new(0x1000, vec![Value::Any; 3])]);
        // LDA $80: reads outside the input regions.
        mem.initialize(0x1000, 0xA5);
        mem.initialize(0x1001, 0x80);

        let mut cpu = Cpu::new(false);
        let result = cpu.execute(&mut mem, 0x1000, 10);
        assert_eq!(
            result.error,
            Some(CpuError::Memory {
                pc: 0x1000,
                source: MemoryError::Read { address: 0x0080 }
            })
        );
    }
}
