//! # opt6502 - a 6502 Machine-Code Superoptimizer
//!
//! Given a declarative specification - an admissible initial CPU/memory
//! state, a required final state, and an optimization goal - this crate
//! discovers, by exhaustive enumeration and cycle-accurate verification, a
//! byte sequence that performs the transformation. Candidates are
//! enumerated in non-decreasing size, so the first verified sequence under
//! the size goal is provably minimal; under the speed goal the search
//! returns the cycle-minimum found within a bounded window past the first
//! hit.
//!
//! ## Quick Start
//!
//! ```rust
//! use opt6502::{Goal, OptimizationSpec, Search, SearchConfig, Value};
//!
//! // "Whatever A holds, X must end up 5 and A must be preserved."
//! let mut spec = OptimizationSpec::new(Goal::Size, 0x1000);
//! spec.input_cpu.a = Value::Any;
//! spec.input_cpu.x = Value::Exact(0);
//! spec.input_cpu.y = Value::Exact(0);
//! spec.input_cpu.sp = Value::Exact(0xFF);
//! spec.input_flags.c = Value::Exact(0);
//! spec.input_flags.z = Value::Exact(0);
//! spec.input_flags.i = Value::Exact(0);
//! spec.input_flags.d = Value::Exact(0);
//! spec.input_flags.b = Value::Exact(0);
//! spec.input_flags.v = Value::Exact(0);
//! spec.input_flags.n = Value::Exact(0);
//! spec.output_cpu.a = Value::Same;
//! spec.output_cpu.x = Value::Exact(0x05);
//!
//! let config = SearchConfig::default();
//! let mut search = Search::new(&spec, &config).unwrap();
//! let solution = search.optimize().unwrap();
//! assert_eq!(solution.bytes, vec![0xA2, 0x05]); // LDX #$05
//! ```
//!
//! ## Architecture
//!
//! - `value` / `spec` - the specification model: EXACT/ANY/SAME/EQU value
//!   classes over registers, flags, and memory regions
//! - `memory` - a sparse, access-tracked address space enforcing the
//!   specification's read/write region policy
//! - `cpu` + `opcodes` + `addressing` + `instructions` - a cycle-accurate
//!   NMOS 6502 interpreter with table-driven metadata, including the
//!   stable undocumented opcodes
//! - `testgen` - boundary-biased expansion of wildcard inputs into a
//!   deterministic test-case sample, plus the EQU reference pass
//! - `verifier` - multi-test-case equivalence checking with structured
//!   failure records
//! - `enumerate` - canonical-slot sequence enumeration in non-decreasing
//!   byte length
//! - `cache` - memoized transformations with independent size- and
//!   cycle-optimal slots
//! - `search` - the driver tying it all together
//!
//! Configuration is passed explicitly via [`SearchConfig`]; there is no
//! global state. Logging goes through the `tracing` facade.

pub mod addressing;
pub mod cache;
pub mod config;
pub mod cpu;
pub mod enumerate;
pub mod error;
pub mod memory;
pub mod opcodes;
pub mod search;
pub mod spec;
pub mod testgen;
pub mod value;
pub mod verifier;

// Internal instruction implementations (not part of the public API).
mod instructions;

// Re-export the public API.
pub use addressing::AddressingMode;
pub use cache::{StateProjection, TransformationCache, TransformationKey};
pub use config::SearchConfig;
pub use cpu::{Cpu, CpuState, Execution, Flag, Register};
pub use enumerate::{Canonicalizer, SequenceEnumerator};
pub use error::{CpuError, MemoryError, SearchError, SpecError};
pub use memory::{MemoryBus, TrackedMemory};
pub use opcodes::{usable_opcodes, Instruction, Legality, OpcodeMetadata, OPCODE_TABLE};
pub use search::{ProgressListener, Search, Solution};
pub use spec::{BlockKind, CodeBlock, CpuSpec, FlagSpec, Goal, OptimizationSpec, Region};
pub use testgen::{generate_test_cases, TestCase, BOUNDARY_VALUES};
pub use value::{Value, ValueContext};
pub use verifier::{Expected, Verifier, VerifyFailure};
