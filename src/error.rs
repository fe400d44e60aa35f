//! # Error Types
//!
//! This module contains the error types for the four failure domains of the
//! optimizer:
//!
//! - [`SpecError`] - a specification is malformed or cannot be prepared
//! - [`MemoryError`] - a candidate violated the memory access policy
//! - [`CpuError`] - a candidate could not be executed to completion
//! - [`SearchError`] - the search itself produced no result
//!
//! Memory and CPU errors are *local*: they are raised while judging a
//! candidate, caught by the verifier, and converted into an ordinary
//! test-case failure. Only [`SpecError`] and [`SearchError`] escape the
//! library interface.

use thiserror::Error;

/// Errors raised while constructing or preparing an optimization
/// specification.
///
/// All of these are fatal: a specification that fails to validate or whose
/// reference pass cannot be run describes no searchable problem.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SpecError {
    /// A value literal could not be parsed, or a SAME/EQU keyword appeared
    /// in an input position.
    #[error("invalid value {text:?}: {reason}")]
    InvalidValue { text: String, reason: String },

    /// A memory region extends past the top of the 16-bit address space.
    #[error("region at {base:#06x} with {len} bytes overflows the 16-bit address space")]
    RegionOverflow { base: u16, len: usize },

    /// Two input regions (or two output regions) cover the same address.
    #[error("address {address:#06x} is covered by more than one {side} region")]
    OverlappingRegions { address: u16, side: &'static str },

    /// The specification never set a run address.
    #[error("no run address set")]
    MissingRunAddress,

    /// The EQU reference pass could not be executed.
    #[error("reference pass failed: {reason}")]
    ReferencePass { reason: String },
}

/// Errors raised by [`TrackedMemory`](crate::TrackedMemory) when an access
/// falls outside the regions the specification declares.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum MemoryError {
    /// A read touched an address outside every input region.
    #[error("read from {address:#06x} outside all input regions")]
    Read { address: u16 },

    /// A write touched an address outside every output region, or modified
    /// a previously-read address that is not in both an input and an output
    /// region.
    #[error("write to {address:#06x} outside all output regions")]
    Write { address: u16 },
}

/// Errors that end a single execution of the interpreter.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CpuError {
    /// A disabled or unusable opcode was decoded.
    #[error("illegal opcode {opcode:#04x} at {pc:#06x}")]
    IllegalInstruction { opcode: u8, pc: u16 },

    /// The memory policy rejected an access made by an instruction.
    #[error("memory violation at {pc:#06x}: {source}")]
    Memory {
        pc: u16,
        #[source]
        source: MemoryError,
    },

    /// The instruction budget ran out before the candidate halted.
    #[error("execution limit of {limit} instructions reached")]
    ExecutionLimit { limit: usize },
}

/// Errors returned by the search driver.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SearchError {
    /// The enumerator was exhausted, or the deadline arrived, without any
    /// candidate passing verification.
    #[error("no valid sequence of at most {max_bytes} bytes found")]
    NoSolution { max_bytes: usize },
}
