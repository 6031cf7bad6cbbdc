//! # Undocumented Instructions
//!
//! The NMOS 6502 decodes every byte. The opcodes missing from the documented
//! instruction set run combinations of documented micro-operations, and some
//! programs depend on them.
//!
//! - Read-modify-write combos: SLO, RLA, SRE, RRA, DCP, ISC
//! - Load/store combos: LAX, SAX, LAS
//! - Immediate combos: ANC, ALR, ARR, SBX
//! - Unstable on real silicon: ANE, LXA (modelled with magic constant 0xEE),
//!   SHA, SHX, SHY, TAS (the `H + 1` high-byte AND)
//! - JAM: locks the CPU until reset
//!
//! USBC (0xEB) is identical to SBC immediate and dispatches straight to it.

use log::warn;

use crate::cpu::CpuState;
use crate::instructions::alu::{add, compare, subtract};
use crate::instructions::read_modify_write;
use crate::instructions::shifts::{rotate_left, rotate_right, shift_left, shift_right};
use crate::{MemoryBus, Status};

/// Value the unstable ANE/LXA ORs into A before masking. Varies between
/// chips; 0xEE matches the most common one.
const UNSTABLE_MAGIC: u8 = 0xEE;

/// SLO: ASL memory, then ORA the result into A.
pub(crate) fn execute_slo<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let result = read_modify_write(cpu, bus, shift_left);
    cpu.a |= result;
    cpu.set_zn(cpu.a);
}

/// RLA: ROL memory, then AND the result into A.
pub(crate) fn execute_rla<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let result = read_modify_write(cpu, bus, rotate_left);
    cpu.a &= result;
    cpu.set_zn(cpu.a);
}

/// SRE: LSR memory, then EOR the result into A.
pub(crate) fn execute_sre<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let result = read_modify_write(cpu, bus, shift_right);
    cpu.a ^= result;
    cpu.set_zn(cpu.a);
}

/// RRA: ROR memory, then ADC the result. The carry out of the rotate feeds
/// the addition.
pub(crate) fn execute_rra<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M, decimal_mode: bool) {
    let result = read_modify_write(cpu, bus, rotate_right);
    add(cpu, result, decimal_mode);
}

/// SAX: store A & X. No flags.
pub(crate) fn execute_sax<M: MemoryBus>(cpu: &CpuState, bus: &mut M) {
    bus.write(cpu.addr_abs, cpu.a & cpu.x);
}

/// LAX: load A and X with the same value.
pub(crate) fn execute_lax<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    cpu.a = value;
    cpu.x = value;
    cpu.set_zn(value);
}

/// DCP: DEC memory, then CMP A with the result.
pub(crate) fn execute_dcp<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    let result = read_modify_write(cpu, bus, |_, value| value.wrapping_sub(1));
    let a = cpu.a;
    compare(cpu, a, result);
}

/// ISC: INC memory, then SBC the result.
pub(crate) fn execute_isc<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M, decimal_mode: bool) {
    let result = read_modify_write(cpu, bus, |_, value| value.wrapping_add(1));
    subtract(cpu, result, decimal_mode);
}

/// ANC: AND immediate, then copy N into C.
pub(crate) fn execute_anc<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    cpu.a &= value;
    cpu.set_zn(cpu.a);
    cpu.set_flag(Status::CARRY, cpu.a & 0x80 != 0);
}

/// ALR: AND immediate, then LSR A.
pub(crate) fn execute_alr<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    let anded = cpu.a & value;
    cpu.a = shift_right(cpu, anded);
    cpu.set_zn(cpu.a);
}

/// ARR: AND immediate, then ROR A.
///
/// C comes from bit 6 of the result and V from bit 6 XOR bit 5, since the
/// rotate goes through the adder. The decimal-mode variant is not modelled.
pub(crate) fn execute_arr<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    let carry_in = cpu.get_flag(Status::CARRY) as u8;
    let result = ((cpu.a & value) >> 1) | (carry_in << 7);

    cpu.a = result;
    cpu.set_zn(result);
    cpu.set_flag(Status::CARRY, result & 0x40 != 0);
    cpu.set_flag(Status::OVERFLOW, ((result >> 6) ^ (result >> 5)) & 0x01 != 0);
}

/// ANE (XAA): A = (A | magic) & X & imm.
pub(crate) fn execute_ane<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    cpu.a = (cpu.a | UNSTABLE_MAGIC) & cpu.x & value;
    cpu.set_zn(cpu.a);
}

/// LXA: A = X = (A | magic) & imm.
pub(crate) fn execute_lxa<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    let result = (cpu.a | UNSTABLE_MAGIC) & value;
    cpu.a = result;
    cpu.x = result;
    cpu.set_zn(result);
}

/// SBX (AXS): X = (A & X) - imm.
///
/// Sets C like CMP (no borrow) and updates Z and N. Ignores the decimal flag
/// and the incoming carry, and leaves V alone.
pub(crate) fn execute_sbx<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus);
    let anded = cpu.a & cpu.x;
    compare(cpu, anded, value);
    cpu.x = anded.wrapping_sub(value);
}

/// SHA (AHX): store A & X & (H + 1).
pub(crate) fn execute_sha<M: MemoryBus>(cpu: &CpuState, bus: &mut M) {
    store_high_and(cpu, bus, cpu.a & cpu.x, cpu.y);
}

/// SHX: store X & (H + 1). Absolute,Y only.
pub(crate) fn execute_shx<M: MemoryBus>(cpu: &CpuState, bus: &mut M) {
    store_high_and(cpu, bus, cpu.x, cpu.y);
}

/// SHY: store Y & (H + 1). Absolute,X only.
pub(crate) fn execute_shy<M: MemoryBus>(cpu: &CpuState, bus: &mut M) {
    store_high_and(cpu, bus, cpu.y, cpu.x);
}

/// TAS (SHS): SP = A & X, then store SP & (H + 1).
pub(crate) fn execute_tas<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M) {
    cpu.sp = cpu.a & cpu.x;
    store_high_and(cpu, bus, cpu.sp, cpu.y);
}

/// LAS (LAR): A = X = SP = memory & SP.
pub(crate) fn execute_las<M: MemoryBus>(cpu: &mut CpuState, bus: &M) {
    let value = cpu.fetch(bus) & cpu.sp;
    cpu.a = value;
    cpu.x = value;
    cpu.sp = value;
    cpu.set_zn(value);
}

/// JAM (KIL/HLT): locks the CPU.
///
/// PC is moved back onto the JAM opcode so every later fetch executes it
/// again; only reset recovers. The lock-up is logged once.
pub(crate) fn execute_jam(cpu: &mut CpuState) {
    cpu.pc = cpu.pc.wrapping_sub(1);
    if !cpu.jammed {
        cpu.jammed = true;
        warn!("CPU jammed by opcode {:02X} at {:04X}", cpu.opcode, cpu.pc);
    }
}

/// Shared store of SHA/SHX/SHY/TAS.
///
/// H is the high byte of the base address before indexing. When indexing
/// crossed a page the stored value also replaces the high byte of the target.
fn store_high_and<M: MemoryBus>(cpu: &CpuState, bus: &mut M, value: u8, index: u8) {
    let base = cpu.addr_abs.wrapping_sub(index as u16);
    let high = (base >> 8) as u8;
    let result = value & high.wrapping_add(1);

    let target = if cpu.page_crossed {
        ((result as u16) << 8) | (cpu.addr_abs & 0x00FF)
    } else {
        cpu.addr_abs
    };
    bus.write(target, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AddressingMode, FlatMemory};

    #[test]
    fn test_arr_flags() {
        let mut cpu = CpuState::default();
        cpu.a = 0xFF;
        cpu.mode = AddressingMode::Immediate;
        cpu.set_flag(Status::CARRY, true);

        let mut mem = FlatMemory::new();
        mem.write(0x0000, 0xC0);
        cpu.addr_abs = 0x0000;

        execute_arr(&mut cpu, &mem);
        // (0xC0 >> 1) | 0x80 = 0xE0: bit 6 set, bit 5 set
        assert_eq!(cpu.a, 0xE0);
        assert!(cpu.get_flag(Status::CARRY));
        assert!(!cpu.get_flag(Status::OVERFLOW));
        assert!(cpu.get_flag(Status::NEGATIVE));
    }

    #[test]
    fn test_jam_rewinds_pc() {
        let mut cpu = CpuState::default();
        cpu.pc = 0x0201;
        cpu.opcode = 0x02;

        execute_jam(&mut cpu);
        assert_eq!(cpu.pc, 0x0200);
        assert!(cpu.jammed);

        cpu.pc = 0x0201;
        execute_jam(&mut cpu);
        assert_eq!(cpu.pc, 0x0200);
    }
}
