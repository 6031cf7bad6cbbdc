//! # Load and Store Instructions
//!
//! This module implements register/memory transfers:
//! - LDA, LDX, LDY: Load register from memory (updates Z and N)
//! - STA, STX, STY: Store register to memory (no flags affected)
//!
//! Loads pay the page-crossing cycle on indexed modes; stores always take the
//! worst-case timing, which is already part of their base cycles.

use crate::cpu::CpuState;
use crate::MemoryBus;

/// Executes the LDA (Load Accumulator) instruction.
///
/// Flags affected:
/// - Z: Set if the loaded value is zero
/// - N: Set if bit 7 of the loaded value is set
pub(crate) fn execute_lda<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    cpu.a = cpu.fetch(bus);
    cpu.set_zn(cpu.a);
}

/// Executes the LDX (Load X Register) instruction.
pub(crate) fn execute_ldx<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    cpu.x = cpu.fetch(bus);
    cpu.set_zn(cpu.x);
}

/// Executes the LDY (Load Y Register) instruction.
pub(crate) fn execute_ldy<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    cpu.y = cpu.fetch(bus);
    cpu.set_zn(cpu.y);
}

/// Executes the STA (Store Accumulator) instruction.
pub(crate) fn execute_sta<M: MemoryBus>(cpu: &CpuState, bus: &mut M) {
    bus.write(cpu.addr_abs, cpu.a);
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn execute_stx<M: MemoryBus>(cpu: &CpuState, bus: &mut M) {
    bus.write(cpu.addr_abs, cpu.x);
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn execute_sty<M: MemoryBus>(cpu: &CpuState, bus: &mut M) {
    bus.write(cpu.addr_abs, cpu.y);
}
