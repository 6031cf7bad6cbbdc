//! Fuzz target for pulse-driven execution.
//!
//! Builds arbitrary register and memory contents, then drives the CPU through
//! a short burst of pulses, interrupts included, looking for panics.

#![no_main]

use arbitrary::Arbitrary;
use cpu6502::{Cpu, FlatMemory, MemoryBus, Status};
use libfuzzer_sys::fuzz_target;

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: u8,
}

/// Memory regions for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Program bytes at 0x8000
    program: [u8; 16],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
    /// Data at 0x4000 for absolute addressing
    main_memory: [u8; 256],
}

/// External events injected between pulses
#[derive(Debug, Arbitrary)]
enum Event {
    Pulse,
    Irq,
    Nmi,
    Reset,
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: FuzzMemory,
    events: Vec<Event>,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();

    // Reset, IRQ and NMI all land in the program
    for vector in [0xFFFA, 0xFFFC, 0xFFFE] {
        memory.load(vector, &[0x00, 0x80]);
    }
    memory.load(0x8000, &input.memory.program);
    memory.load(0x0000, &input.memory.zero_page);
    memory.load(0x0100, &input.memory.stack_page);
    memory.load(0x4000, &input.memory.main_memory);

    let mut cpu = Cpu::new().unwrap();
    cpu.connect_bus(memory);
    cpu.set_pc(0x8000);
    cpu.set_a(input.cpu_state.a);
    cpu.set_x(input.cpu_state.x);
    cpu.set_y(input.cpu_state.y);
    cpu.set_sp(input.cpu_state.sp);
    cpu.set_status(input.cpu_state.status);

    for event in input.events.iter().take(512) {
        let before = cpu.cycles();
        match event {
            Event::Pulse => {
                cpu.clock().unwrap();
                assert_eq!(cpu.cycles(), before + 1);
            }
            Event::Irq => cpu.irq().unwrap(),
            Event::Nmi => cpu.nmi().unwrap(),
            Event::Reset => {
                cpu.reset().unwrap();
                assert!(cpu.get_flag(Status::INTERRUPT_DISABLE));
                assert!(!cpu.interrupt_pending());
            }
        }
    }
});
