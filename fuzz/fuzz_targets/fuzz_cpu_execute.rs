//! Fuzz target for bounded program execution.
//!
//! Builds an arbitrary CPU state and memory image, then executes an
//! arbitrary program under the region policy. Whatever the input, the
//! interpreter must neither panic nor run unbounded.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use opt6502::{Cpu, Region, TrackedMemory, Value};

/// Arbitrary initial CPU state.
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    flag_c: bool,
    flag_z: bool,
    flag_i: bool,
    flag_d: bool,
    flag_b: bool,
    flag_v: bool,
    flag_n: bool,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    /// Program installed at the run address.
    program: Vec<u8>,
    /// Zero-page contents.
    zero_page: [u8; 256],
    /// Whether undocumented opcodes may execute.
    allow_illegal: bool,
    /// Whether the program region is also writable (self-modification).
    writable_code: bool,
}

fuzz_target!(|input: FuzzInput| {
    if input.program.len() > 64 {
        return;
    }

    let mut mem = TrackedMemory::new();
    mem.set_input_regions(vec![
        Region::new(0x0000, vec![Value::Any; 0x200]), // zero page + stack
        Region::new(0x1000, vec![Value::Any; input.program.len() + 1]),
    ]);
    let mut output_regions = vec![Region::new(0x0000, vec![Value::Any; 0x200])];
    if input.writable_code {
        output_regions.push(Region::new(0x1000, vec![Value::Any; input.program.len() + 1]));
    }
    mem.set_output_regions(output_regions);

    for (i, &byte) in input.zero_page.iter().enumerate() {
        mem.initialize(i as u16, byte);
    }
    for (i, &byte) in input.program.iter().enumerate() {
        mem.initialize(0x1000 + i as u16, byte);
    }

    let mut cpu = Cpu::new(input.allow_illegal);
    cpu.set_a(input.cpu_state.a);
    cpu.set_x(input.cpu_state.x);
    cpu.set_y(input.cpu_state.y);
    cpu.set_sp(input.cpu_state.sp);
    cpu.set_flag_c(input.cpu_state.flag_c);
    cpu.set_flag_z(input.cpu_state.flag_z);
    cpu.set_flag_i(input.cpu_state.flag_i);
    cpu.set_flag_d(input.cpu_state.flag_d);
    cpu.set_flag_b(input.cpu_state.flag_b);
    cpu.set_flag_v(input.cpu_state.flag_v);
    cpu.set_flag_n(input.cpu_state.flag_n);

    let result = cpu.execute(&mut mem, 0x1000, 1000);

    // The run always terminates one way or another.
    assert!(result.completed || result.error.is_some());
    // The instruction budget is honored.
    assert!(result.instructions <= 1000);
    // On a clean run every tracked write stayed inside the declared output
    // regions. (A rejected write is recorded before the error is raised,
    // so failed runs legitimately carry out-of-region addresses.)
    if result.error.is_none() {
        let code_end = 0x1000 + input.program.len() as u16 + 1;
        for &addr in mem.writes() {
            assert!(
                addr < 0x200 || (input.writable_code && (0x1000..code_end).contains(&addr))
            );
        }
    }
});
