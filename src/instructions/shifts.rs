//! # Shift and Rotate Instructions
//!
//! This module implements bit shift and rotate operations:
//! - ASL: Arithmetic Shift Left
//! - LSR: Logical Shift Right
//! - ROL: Rotate Left through carry
//! - ROR: Rotate Right through carry
//!
//! Each works on the accumulator (ACC mode) or on memory (read-modify-write).
//! The bit shifted out lands in C; Z and N follow the result.

use crate::cpu::CpuState;
use crate::instructions::read_modify_write;
use crate::{MemoryBus, Status};

pub(crate) fn execute_asl<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let result = read_modify_write(cpu, bus, shift_left);
    cpu.set_zn(result);
}

pub(crate) fn execute_lsr<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let result = read_modify_write(cpu, bus, shift_right);
    cpu.set_zn(result);
}

pub(crate) fn execute_rol<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let result = read_modify_write(cpu, bus, rotate_left);
    cpu.set_zn(result);
}

pub(crate) fn execute_ror<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let result = read_modify_write(cpu, bus, rotate_right);
    cpu.set_zn(result);
}

/// value << 1, old bit 7 into C.
pub(crate) fn shift_left(cpu: &mut CpuState, value: u8) -> u8 {
    cpu.set_flag(Status::CARRY, value & 0x80 != 0);
    value << 1
}

/// value >> 1, old bit 0 into C.
pub(crate) fn shift_right(cpu: &mut CpuState, value: u8) -> u8 {
    cpu.set_flag(Status::CARRY, value & 0x01 != 0);
    value >> 1
}

/// (value << 1) | C, old bit 7 into C.
pub(crate) fn rotate_left(cpu: &mut CpuState, value: u8) -> u8 {
    let carry_in = cpu.get_flag(Status::CARRY) as u8;
    cpu.set_flag(Status::CARRY, value & 0x80 != 0);
    (value << 1) | carry_in
}

/// (value >> 1) | (C << 7), old bit 0 into C.
pub(crate) fn rotate_right(cpu: &mut CpuState, value: u8) -> u8 {
    let carry_in = cpu.get_flag(Status::CARRY) as u8;
    cpu.set_flag(Status::CARRY, value & 0x01 != 0);
    (value >> 1) | (carry_in << 7)
}
