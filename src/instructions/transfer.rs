//! # Register Transfer Instructions
//!
//! This module implements register-to-register transfers:
//! - TAX, TAY: Accumulator to index register
//! - TXA, TYA: Index register to accumulator
//! - TSX: Stack pointer to X
//! - TXS: X to stack pointer
//!
//! All take 2 cycles and update Z and N from the destination, except TXS which
//! affects no flags.

use crate::cpu::CpuState;

pub(crate) fn execute_tax(cpu: &mut CpuState) {
    cpu.x = cpu.a;
    cpu.set_zn(cpu.x);
}

pub(crate) fn execute_tay(cpu: &mut CpuState) {
    cpu.y = cpu.a;
    cpu.set_zn(cpu.y);
}

pub(crate) fn execute_txa(cpu: &mut CpuState) {
    cpu.a = cpu.x;
    cpu.set_zn(cpu.a);
}

pub(crate) fn execute_tya(cpu: &mut CpuState) {
    cpu.a = cpu.y;
    cpu.set_zn(cpu.a);
}

pub(crate) fn execute_tsx(cpu: &mut CpuState) {
    cpu.x = cpu.sp;
    cpu.set_zn(cpu.x);
}

/// TXS is the only transfer that leaves the flags alone.
pub(crate) fn execute_txs(cpu: &mut CpuState) {
    cpu.sp = cpu.x;
}
