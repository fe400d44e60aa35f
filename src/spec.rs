//! # Optimization Specification
//!
//! This module defines the [`OptimizationSpec`]: the declarative contract a
//! synthesized byte sequence must satisfy. A specification names the
//! optimization goal, the run address, the admissible initial CPU/flag/memory
//! states, the required final states, and the code blocks being replaced.
//!
//! A specification is constructed once, validated, and then borrowed
//! read-only by the verifier for the whole search.

use crate::error::SpecError;
use crate::value::Value;

/// What the search minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// Minimize the byte length of the sequence. The first verified
    /// candidate is provably optimal because candidates are enumerated in
    /// non-decreasing size.
    Size,

    /// Minimize the executed cycle count, tracked across a bounded window
    /// of lengths past the first verified candidate.
    Speed,
}

/// Constraints on the four 8-bit registers.
///
/// `PC` is not part of the contract; execution always starts at the run
/// address and ends wherever the candidate halts.
#[derive(Debug, Clone, Copy)]
pub struct CpuSpec {
    pub a: Value,
    pub x: Value,
    pub y: Value,
    pub sp: Value,
}

impl Default for CpuSpec {
    fn default() -> Self {
        Self {
            a: Value::Any,
            x: Value::Any,
            y: Value::Any,
            sp: Value::Any,
        }
    }
}

/// Constraints on the seven status flags.
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    pub c: Value,
    pub z: Value,
    pub i: Value,
    pub d: Value,
    pub b: Value,
    pub v: Value,
    pub n: Value,
}

impl Default for FlagSpec {
    fn default() -> Self {
        Self {
            c: Value::Any,
            z: Value::Any,
            i: Value::Any,
            d: Value::Any,
            b: Value::Any,
            v: Value::Any,
            n: Value::Any,
        }
    }
}

/// A contiguous run of value constraints starting at a base address.
///
/// Input regions define which bytes may be read and what they initially
/// hold; output regions define which bytes may be written and what they
/// must finally hold.
#[derive(Debug, Clone)]
pub struct Region {
    /// First address covered by the region.
    pub base: u16,

    /// One constraint per byte, in address order.
    pub cells: Vec<Value>,
}

impl Region {
    /// Creates a region from a base address and its cell constraints.
    pub fn new(base: u16, cells: Vec<Value>) -> Self {
        Self { base, cells }
    }

    /// Returns true if `addr` falls inside this region.
    pub fn contains(&self, addr: u16) -> bool {
        (addr as usize) >= (self.base as usize)
            && (addr as usize) < (self.base as usize) + self.cells.len()
    }

    /// Returns the constraint for `addr`, if the region covers it.
    pub fn value_at(&self, addr: u16) -> Option<Value> {
        if self.contains(addr) {
            Some(self.cells[(addr - self.base) as usize])
        } else {
            None
        }
    }

    /// Returns true if the region covers `addr` with an `Exact` constraint.
    pub fn requires_exact(&self, addr: u16) -> bool {
        matches!(self.value_at(addr), Some(Value::Exact(_)))
    }

    /// Iterates over `(address, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u16, Value)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| (self.base.wrapping_add(i as u16), *v))
    }
}

/// Whether a code block may be rewritten by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// The block is the subject of optimization.
    Regular,

    /// The block's bytes are fixed context the candidate must work around.
    ReadOnly,
}

/// A block of machine code named by the specification.
///
/// An empty payload denotes *synthesis*: there is no original code and the
/// search constructs the block from scratch.
#[derive(Debug, Clone)]
pub struct CodeBlock {
    /// Load address of the block.
    pub base: u16,

    /// Original bytes; empty for synthesis blocks.
    pub bytes: Vec<u8>,

    pub kind: BlockKind,
}

impl CodeBlock {
    pub fn new(base: u16, bytes: Vec<u8>, kind: BlockKind) -> Self {
        Self { base, bytes, kind }
    }

    /// Returns true if this block has no original payload.
    pub fn is_synthesis(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A complete optimization specification.
#[derive(Debug, Clone)]
pub struct OptimizationSpec {
    pub goal: Goal,

    /// Address execution starts from, for candidates and for the reference
    /// pass alike.
    pub run_address: u16,

    pub input_cpu: CpuSpec,
    pub input_flags: FlagSpec,
    pub input_regions: Vec<Region>,

    pub output_cpu: CpuSpec,
    pub output_flags: FlagSpec,
    pub output_regions: Vec<Region>,

    pub code_blocks: Vec<CodeBlock>,
}

impl OptimizationSpec {
    /// Creates an empty specification with wildcard states and the given
    /// goal and run address.
    pub fn new(goal: Goal, run_address: u16) -> Self {
        Self {
            goal,
            run_address,
            input_cpu: CpuSpec::default(),
            input_flags: FlagSpec::default(),
            input_regions: Vec::new(),
            output_cpu: CpuSpec::default(),
            output_flags: FlagSpec::default(),
            output_regions: Vec::new(),
            code_blocks: Vec::new(),
        }
    }

    /// Checks the structural invariants the search relies on.
    ///
    /// - every region fits inside the 16-bit address space;
    /// - no address is covered by two input regions or by two output
    ///   regions;
    /// - SAME/EQU appear only in output regions (the parser already rejects
    ///   them elsewhere, this guards hand-built specifications);
    /// - a run address is set.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`SpecError`].
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.run_address == 0 {
            return Err(SpecError::MissingRunAddress);
        }

        for region in self.input_regions.iter().chain(&self.output_regions) {
            let end = region.base as usize + region.cells.len();
            if end > 0x1_0000 {
                return Err(SpecError::RegionOverflow {
                    base: region.base,
                    len: region.cells.len(),
                });
            }
        }

        for block in &self.code_blocks {
            let end = block.base as usize + block.bytes.len();
            if end > 0x1_0000 {
                return Err(SpecError::RegionOverflow {
                    base: block.base,
                    len: block.bytes.len(),
                });
            }
        }

        Self::check_disjoint(&self.input_regions, "input")?;
        Self::check_disjoint(&self.output_regions, "output")?;

        for region in &self.input_regions {
            for (addr, value) in region.iter() {
                if matches!(value, Value::Same | Value::Equ) {
                    return Err(SpecError::InvalidValue {
                        text: format!("{value:?} at {addr:#06x}"),
                        reason: "SAME/EQU are only valid in outputs".to_string(),
                    });
                }
            }
        }
        for value in [
            self.input_cpu.a,
            self.input_cpu.x,
            self.input_cpu.y,
            self.input_cpu.sp,
            self.input_flags.c,
            self.input_flags.z,
            self.input_flags.i,
            self.input_flags.d,
            self.input_flags.b,
            self.input_flags.v,
            self.input_flags.n,
        ] {
            if matches!(value, Value::Same | Value::Equ) {
                return Err(SpecError::InvalidValue {
                    text: format!("{value:?}"),
                    reason: "SAME/EQU are only valid in outputs".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Returns true if any output cell is an EQU constraint, which obliges
    /// the verifier to run the reference pass.
    pub fn has_equ_outputs(&self) -> bool {
        self.output_regions
            .iter()
            .any(|r| r.cells.iter().any(|v| matches!(v, Value::Equ)))
    }

    /// Returns the code block containing the run address, if any.
    pub fn run_block(&self) -> Option<&CodeBlock> {
        self.code_blocks.iter().find(|b| {
            b.base == self.run_address
                || (b.base <= self.run_address
                    && (self.run_address as usize) < b.base as usize + b.bytes.len())
        })
    }

    fn check_disjoint(regions: &[Region], side: &'static str) -> Result<(), SpecError> {
        for (i, a) in regions.iter().enumerate() {
            for b in regions.iter().skip(i + 1) {
                let a_end = a.base as usize + a.cells.len();
                let b_end = b.base as usize + b.cells.len();
                if (a.base as usize) < b_end && (b.base as usize) < a_end {
                    let overlap = a.base.max(b.base);
                    return Err(SpecError::OverlappingRegions {
                        address: overlap,
                        side,
                    });
                }
            }
        }
        Ok(())
    }
}
