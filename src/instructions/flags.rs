//! # Status Flag Manipulation Instructions
//!
//! This module implements instructions that directly modify processor status flags:
//! - CLC: Clear Carry Flag
//! - SEC: Set Carry Flag
//! - CLI: Clear Interrupt Disable
//! - SEI: Set Interrupt Disable
//! - CLV: Clear Overflow Flag
//! - CLD: Clear Decimal Mode
//! - SED: Set Decimal Mode
//!
//! These instructions use implied addressing mode and execute in 2 cycles.
//! No other flag is touched.

use crate::cpu::CpuState;
use crate::Status;

/// Executes the CLC (Clear Carry Flag) instruction.
pub(crate) fn execute_clc(cpu: &mut CpuState) {
    cpu.set_flag(Status::CARRY, false);
}

/// Executes the SEC (Set Carry Flag) instruction.
pub(crate) fn execute_sec(cpu: &mut CpuState) {
    cpu.set_flag(Status::CARRY, true);
}

/// Executes the CLI (Clear Interrupt Disable) instruction.
///
/// A pending IRQ is taken at the next instruction boundary.
pub(crate) fn execute_cli(cpu: &mut CpuState) {
    cpu.set_flag(Status::INTERRUPT_DISABLE, false);
}

/// Executes the SEI (Set Interrupt Disable) instruction.
pub(crate) fn execute_sei(cpu: &mut CpuState) {
    cpu.set_flag(Status::INTERRUPT_DISABLE, true);
}

/// Executes the CLD (Clear Decimal Mode) instruction.
pub(crate) fn execute_cld(cpu: &mut CpuState) {
    cpu.set_flag(Status::DECIMAL, false);
}

/// Executes the SED (Set Decimal Mode) instruction.
///
/// The flag is stored even when the core is built without decimal mode; ADC
/// and SBC just ignore it then.
pub(crate) fn execute_sed(cpu: &mut CpuState) {
    cpu.set_flag(Status::DECIMAL, true);
}

/// Executes the CLV (Clear Overflow Flag) instruction.
///
/// There is no SEV; V is only set by ADC, SBC, BIT, PLP and RTI.
pub(crate) fn execute_clv(cpu: &mut CpuState) {
    cpu.set_flag(Status::OVERFLOW, false);
}
