//! # Stack Instructions
//!
//! This module implements stack operations:
//! - PHA: Push Accumulator
//! - PHP: Push Processor Status
//! - PLA: Pull Accumulator
//! - PLP: Pull Processor Status
//!
//! The stack lives in page 1 (0x0100-0x01FF) and grows downward. SP wraps
//! within the page on overflow and underflow.

use crate::cpu::CpuState;
use crate::{MemoryBus, Status};

/// Executes the PHA (Push Accumulator) instruction.
///
/// Cycles: 3. No flags affected.
pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let value = cpu.a;
    cpu.push(bus, value);
}

/// Executes the PHP (Push Processor Status) instruction.
///
/// The pushed copy has B and the unused bit set. The live register is
/// unchanged.
pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let value = cpu.status.pushed_by_software();
    cpu.push(bus, value);
}

/// Executes the PLA (Pull Accumulator) instruction.
///
/// Cycles: 4. Updates Z and N.
pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    cpu.a = cpu.pop(bus);
    cpu.set_zn(cpu.a);
}

/// Executes the PLP (Pull Processor Status) instruction.
///
/// B is cleared and the unused bit set on the way in, since neither exists as
/// a real flip-flop.
pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.pop(bus);
    cpu.status = Status::pulled(value);
}
