//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC: Add with Carry
//! - SBC: Subtract with Carry
//! - AND, ORA, EOR: Bitwise logic into the accumulator
//! - BIT: Bit test
//! - CMP, CPX, CPY: Compare register with memory
//!
//! ADC and SBC honour the decimal flag when the core is built with decimal
//! mode enabled. Decimal results follow the NMOS part: the result and carry
//! are correct BCD, N and V come from the intermediate high nibble, and Z
//! reflects the binary sum (ADC) or all flags reflect the binary difference
//! (SBC).

use crate::cpu::CpuState;
use crate::{MemoryBus, Status};

/// Executes the ADC (Add with Carry) instruction.
///
/// A = A + M + C
///
/// Flags affected:
/// - C: Set if the sum exceeds 0xFF (0x99 in decimal mode)
/// - Z: Set if result is zero
/// - V: Set if two operands of the same sign produced a result of the other sign
/// - N: Set if bit 7 of result is set
pub(crate) fn execute_adc<M: MemoryBus>(cpu: &mut CpuState, bus: &M, decimal_mode: bool) {
    let value = cpu.fetch(bus);
    add(cpu, value, decimal_mode);
}

/// Executes the SBC (Subtract with Carry) instruction.
///
/// A = A - M - (1 - C). Carry is the inverse of borrow: set if no borrow
/// occurred.
pub(crate) fn execute_sbc<M: MemoryBus>(cpu: &mut CpuState, bus: &M, decimal_mode: bool) {
    let value = cpu.fetch(bus);
    subtract(cpu, value, decimal_mode);
}

/// Adds `value` and carry into A, in BCD if enabled and D is set.
pub(crate) fn add(cpu: &mut CpuState, value: u8, decimal_mode: bool) {
    if decimal_mode && cpu.get_flag(Status::DECIMAL) {
        add_decimal(cpu, value);
    } else {
        add_binary(cpu, value);
    }
}

/// Subtracts `value` and borrow from A, in BCD if enabled and D is set.
pub(crate) fn subtract(cpu: &mut CpuState, value: u8, decimal_mode: bool) {
    if decimal_mode && cpu.get_flag(Status::DECIMAL) {
        subtract_decimal(cpu, value);
    } else {
        // In binary, A - M - !C is A + !M + C
        add_binary(cpu, !value);
    }
}

fn add_binary(cpu: &mut CpuState, value: u8) {
    let a = cpu.a;
    let carry_in = cpu.get_flag(Status::CARRY) as u16;

    let sum = a as u16 + value as u16 + carry_in;
    let result = sum as u8;

    cpu.set_flag(Status::CARRY, sum > 0xFF);
    // Both operands had the same sign but the result does not
    cpu.set_flag(Status::OVERFLOW, (a ^ result) & (value ^ result) & 0x80 != 0);
    cpu.set_zn(result);
    cpu.a = result;
}

fn add_decimal(cpu: &mut CpuState, value: u8) {
    let a = cpu.a;
    let carry_in = cpu.get_flag(Status::CARRY) as u8;

    let mut lo = (a & 0x0F) + (value & 0x0F) + carry_in;
    if lo > 0x09 {
        lo += 0x06;
    }
    let mut hi = (a >> 4) + (value >> 4) + u8::from(lo > 0x0F);

    cpu.set_flag(Status::ZERO, a.wrapping_add(value).wrapping_add(carry_in) == 0);
    cpu.set_flag(Status::NEGATIVE, hi & 0x08 != 0);
    cpu.set_flag(Status::OVERFLOW, !(a ^ value) & (a ^ (hi << 4)) & 0x80 != 0);

    if hi > 0x09 {
        hi += 0x06;
    }
    cpu.set_flag(Status::CARRY, hi > 0x0F);
    cpu.a = (hi << 4) | (lo & 0x0F);
}

fn subtract_decimal(cpu: &mut CpuState, value: u8) {
    let a = cpu.a;
    let borrow = !cpu.get_flag(Status::CARRY) as u8;

    // Flags come from the binary subtraction
    let diff = (a as u16).wrapping_sub(value as u16).wrapping_sub(borrow as u16);
    let binary = diff as u8;
    cpu.set_flag(Status::CARRY, diff < 0x100);
    cpu.set_flag(Status::OVERFLOW, (a ^ value) & (a ^ binary) & 0x80 != 0);
    cpu.set_zn(binary);

    let mut lo = (a & 0x0F) as i16 - (value & 0x0F) as i16 - borrow as i16;
    let mut hi = (a >> 4) as i16 - (value >> 4) as i16;
    if lo < 0 {
        lo -= 0x06;
        hi -= 1;
    }
    if hi < 0 {
        hi -= 0x06;
    }
    cpu.a = (((hi << 4) | (lo & 0x0F)) & 0xFF) as u8;
}

/// Executes the AND (Logical AND) instruction.
///
/// A = A & M. Updates Z and N.
pub(crate) fn execute_and<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    cpu.a &= value;
    cpu.set_zn(cpu.a);
}

/// Executes the ORA (Logical Inclusive OR) instruction.
///
/// A = A | M. Updates Z and N.
pub(crate) fn execute_ora<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    cpu.a |= value;
    cpu.set_zn(cpu.a);
}

/// Executes the EOR (Exclusive OR) instruction.
///
/// A = A ^ M. Updates Z and N.
pub(crate) fn execute_eor<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    cpu.a ^= value;
    cpu.set_zn(cpu.a);
}

/// Executes the BIT (Bit Test) instruction.
///
/// Flags affected:
/// - Z: Set if A & M is zero
/// - V: Copied from bit 6 of M
/// - N: Copied from bit 7 of M
///
/// A is not modified.
pub(crate) fn execute_bit<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    cpu.set_flag(Status::ZERO, cpu.a & value == 0);
    cpu.set_flag(Status::OVERFLOW, value & 0x40 != 0);
    cpu.set_flag(Status::NEGATIVE, value & 0x80 != 0);
}

/// Executes the CMP (Compare Accumulator) instruction.
pub(crate) fn execute_cmp<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    let register = cpu.a;
    compare(cpu, register, value);
}

/// Executes the CPX (Compare X Register) instruction.
pub(crate) fn execute_cpx<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    let register = cpu.x;
    compare(cpu, register, value);
}

/// Executes the CPY (Compare Y Register) instruction.
pub(crate) fn execute_cpy<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    let register = cpu.y;
    compare(cpu, register, value);
}

/// Compares `register` against `value` as if subtracting.
///
/// C is set if register >= value; Z and N come from the difference.
pub(crate) fn compare(cpu: &mut CpuState, register: u8, value: u8) {
    cpu.set_flag(Status::CARRY, register >= value);
    cpu.set_zn(register.wrapping_sub(value));
}
