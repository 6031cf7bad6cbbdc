//! # Increment and Decrement Instructions
//!
//! - INC / DEC: Read-modify-write on memory
//! - INX / INY / DEX / DEY: Index registers
//!
//! All wrap at 8 bits and update Z and N. Carry and overflow are untouched.

use crate::cpu::CpuState;
use crate::instructions::read_modify_write;
use crate::MemoryBus;

/// Executes the INC (Increment Memory) instruction.
pub(crate) fn execute_inc<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let result = read_modify_write(cpu, bus, |_, value| value.wrapping_add(1));
    cpu.set_zn(result);
}

/// Executes the DEC (Decrement Memory) instruction.
pub(crate) fn execute_dec<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let result = read_modify_write(cpu, bus, |_, value| value.wrapping_sub(1));
    cpu.set_zn(result);
}

pub(crate) fn execute_inx(cpu: &mut CpuState) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.set_zn(cpu.x);
}

pub(crate) fn execute_iny(cpu: &mut CpuState) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.set_zn(cpu.y);
}

pub(crate) fn execute_dex(cpu: &mut CpuState) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.set_zn(cpu.x);
}

pub(crate) fn execute_dey(cpu: &mut CpuState) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.set_zn(cpu.y);
}
