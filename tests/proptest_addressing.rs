//! Property-based tests for effective-address resolution.
//!
//! Zero-page wraparound, page-crossing penalties and the indirect JMP bug,
//! checked over arbitrary operands and index registers.

use cpu6502::{Cpu, FlatMemory, MemoryBus};
use proptest::prelude::*;

/// Helper function to create a CPU with PC at 0x8000
fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    let mut cpu = Cpu::new().unwrap();
    cpu.connect_bus(memory);
    cpu.set_pc(0x8000);
    cpu
}

fn write(cpu: &mut Cpu<FlatMemory>, addr: u16, value: u8) {
    cpu.bus_mut().unwrap().write(addr, value);
}

fn crosses_page(base: u16, index: u8) -> bool {
    (base & 0xFF00) != (base.wrapping_add(index as u16) & 0xFF00)
}

// ========== Zero Page ==========

proptest! {
    /// Property: Zero page addressing reads from 0x00XX
    #[test]
    fn prop_zero_page_reads_page_zero(zp in 0u8..=255u8, value in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        write(&mut cpu, zp as u16, value);
        cpu.bus_mut().unwrap().load(0x8000, &[0xA5, zp]); // LDA zp

        prop_assert_eq!(cpu.step().unwrap(), 3);
        prop_assert_eq!(cpu.a(), value);
    }

    /// Property: Zero page,X never leaves page zero
    #[test]
    fn prop_zero_page_x_wraps(base in 0u8..=255u8, x in 0u8..=255u8, value in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_x(x);
        write(&mut cpu, base.wrapping_add(x) as u16, value);
        cpu.bus_mut().unwrap().load(0x8000, &[0xB5, base]); // LDA zp,X

        prop_assert_eq!(cpu.step().unwrap(), 4);
        prop_assert_eq!(cpu.a(), value);
    }

    /// Property: Zero page,Y never leaves page zero
    #[test]
    fn prop_zero_page_y_wraps(base in 0u8..=255u8, y in 0u8..=255u8, value in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_y(y);
        write(&mut cpu, base.wrapping_add(y) as u16, value);
        cpu.bus_mut().unwrap().load(0x8000, &[0xB6, base]); // LDX zp,Y

        prop_assert_eq!(cpu.step().unwrap(), 4);
        prop_assert_eq!(cpu.x(), value);
    }
}

// ========== Absolute Indexed ==========

proptest! {
    /// Property: Absolute,X loads from base + X and pays one cycle only on a page cross
    #[test]
    fn prop_absolute_x_penalty_iff_page_cross(
        base in 0x0200u16..0x7E00u16,
        x in 0u8..=255u8,
        value in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        cpu.set_x(x);
        write(&mut cpu, base.wrapping_add(x as u16), value);
        cpu.bus_mut()
            .unwrap()
            .load(0x8000, &[0xBD, base as u8, (base >> 8) as u8]); // LDA abs,X

        let expected = if crosses_page(base, x) { 5 } else { 4 };
        prop_assert_eq!(cpu.step().unwrap(), expected);
        prop_assert_eq!(cpu.a(), value);
    }

    /// Property: Absolute,Y loads from base + Y with the same penalty rule
    #[test]
    fn prop_absolute_y_penalty_iff_page_cross(
        base in 0x0200u16..0x7E00u16,
        y in 0u8..=255u8,
        value in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        cpu.set_y(y);
        write(&mut cpu, base.wrapping_add(y as u16), value);
        cpu.bus_mut()
            .unwrap()
            .load(0x8000, &[0xB9, base as u8, (base >> 8) as u8]); // LDA abs,Y

        let expected = if crosses_page(base, y) { 5 } else { 4 };
        prop_assert_eq!(cpu.step().unwrap(), expected);
        prop_assert_eq!(cpu.a(), value);
    }

    /// Property: Stores never pay the page-cross penalty
    #[test]
    fn prop_store_absolute_x_fixed_timing(base in 0x0200u16..0x7E00u16, x in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_x(x);
        cpu.set_a(0x5A);
        cpu.bus_mut()
            .unwrap()
            .load(0x8000, &[0x9D, base as u8, (base >> 8) as u8]); // STA abs,X

        prop_assert_eq!(cpu.step().unwrap(), 5);
        prop_assert_eq!(cpu.bus().unwrap().read(base.wrapping_add(x as u16)), 0x5A);
    }
}

// ========== Indirect ==========

proptest! {
    /// Property: (zp,X) reads its pointer from page zero, wrapping both bytes
    #[test]
    fn prop_indirect_x_pointer_wraps(
        zp in 0u8..=255u8,
        x in 0u8..=255u8,
        target in 0x0200u16..0x7F00u16,
        value in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        cpu.set_x(x);
        let ptr = zp.wrapping_add(x);
        write(&mut cpu, ptr as u16, target as u8);
        write(&mut cpu, ptr.wrapping_add(1) as u16, (target >> 8) as u8);
        write(&mut cpu, target, value);
        cpu.bus_mut().unwrap().load(0x8000, &[0xA1, zp]); // LDA (zp,X)

        prop_assert_eq!(cpu.step().unwrap(), 6);
        prop_assert_eq!(cpu.a(), value);
    }

    /// Property: (zp),Y adds Y after dereferencing and pays for a page cross
    #[test]
    fn prop_indirect_y_penalty_iff_page_cross(
        zp in 0u8..=255u8,
        base in 0x0200u16..0x7E00u16,
        y in 0u8..=255u8,
        value in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        cpu.set_y(y);
        write(&mut cpu, zp as u16, base as u8);
        write(&mut cpu, zp.wrapping_add(1) as u16, (base >> 8) as u8);
        let target = base.wrapping_add(y as u16);
        // Keep the data byte clear of the pointer
        prop_assume!(target > 0x00FF);
        write(&mut cpu, target, value);
        cpu.bus_mut().unwrap().load(0x8000, &[0xB1, zp]); // LDA (zp),Y

        let expected = if crosses_page(base, y) { 6 } else { 5 };
        prop_assert_eq!(cpu.step().unwrap(), expected);
        prop_assert_eq!(cpu.a(), value);
    }

    /// Property: JMP (ind) never carries into the pointer's high byte
    #[test]
    fn prop_jmp_indirect_stays_in_page(page in 0x02u8..0x7Fu8, low in 0u8..=255u8, lo in 0u8..=255u8, hi in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        let ptr = ((page as u16) << 8) | low as u16;
        let hi_addr = ((page as u16) << 8) | low.wrapping_add(1) as u16;
        write(&mut cpu, ptr, lo);
        write(&mut cpu, hi_addr, hi);
        cpu.bus_mut().unwrap().load(0x8000, &[0x6C, low, page]); // JMP (ind)

        prop_assert_eq!(cpu.step().unwrap(), 5);
        prop_assert_eq!(cpu.pc(), ((hi as u16) << 8) | lo as u16);
    }
}

// ========== Relative ==========

proptest! {
    /// Property: A taken branch lands at next PC + signed offset
    #[test]
    fn prop_branch_target(offset in 0u8..=255u8, start in 0x1000u16..0x7000u16) {
        let mut cpu = setup_cpu();
        cpu.set_pc(start);
        cpu.set_status(0x00);
        cpu.bus_mut().unwrap().load(start, &[0xD0, offset]); // BNE, Z clear

        let next = start.wrapping_add(2);
        let target = next.wrapping_add(offset as i8 as u16);
        let expected = if (next & 0xFF00) != (target & 0xFF00) { 4 } else { 3 };

        prop_assert_eq!(cpu.step().unwrap(), expected);
        prop_assert_eq!(cpu.pc(), target);
    }
}
