//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - JMP: Jump (absolute or indirect)
//! - JSR / RTS: Subroutine call and return
//! - BRK / RTI: Software interrupt and return from interrupt
//! - NOP: No operation, including the undocumented multi-byte forms

use crate::cpu::CpuState;
use crate::interrupts::IRQ_VECTOR;
use crate::{MemoryBus, Status};

/// Executes the JMP (Jump) instruction.
///
/// PC = effective address. In indirect mode the resolver has already applied
/// the NMOS page-wrap bug when reading the pointer.
pub(crate) fn execute_jmp(cpu: &mut CpuState) {
    cpu.pc = cpu.addr_abs;
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes the address of the last operand byte (PC - 1), high byte first,
/// then jumps. RTS undoes this by popping and adding one.
///
/// Bytes: 3
/// Cycles: 6
pub(crate) fn execute_jsr<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let return_address = cpu.pc.wrapping_sub(1);
    cpu.push_word(bus, return_address);
    cpu.pc = cpu.addr_abs;
}

/// Executes the RTS (Return from Subroutine) instruction.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    cpu.pc = cpu.pop_word(bus).wrapping_add(1);
}

/// Executes the RTI (Return from Interrupt) instruction.
///
/// Pops the status byte (B cleared, unused bit set) and then PC. Unlike RTS
/// the popped PC is used as is.
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let status = cpu.pop(bus);
    cpu.status = Status::pulled(status);
    cpu.pc = cpu.pop_word(bus);
}

/// Executes the BRK (Force Interrupt) instruction.
///
/// BRK is a two-byte instruction: the byte after the opcode is a padding
/// (signature) byte that is skipped on return.
///
/// - Pushes PC + 1 (opcode address + 2), high byte first
/// - Pushes status with B and the unused bit set
/// - Sets the interrupt-disable flag
/// - Loads PC from the IRQ/BRK vector at 0xFFFE/0xFFFF
///
/// Cycles: 7
pub(crate) fn execute_brk<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let return_address = cpu.pc.wrapping_add(1);
    let pushed_status = cpu.status.pushed_by_software();

    cpu.push_word(bus, return_address);
    cpu.push(bus, pushed_status);
    cpu.set_flag(Status::INTERRUPT_DISABLE, true);
    cpu.pc = bus.read_word(IRQ_VECTOR);
}

/// Executes NOP.
///
/// The undocumented forms with a memory operand still perform their read.
pub(crate) fn execute_nop<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    cpu.fetch(bus);
}
