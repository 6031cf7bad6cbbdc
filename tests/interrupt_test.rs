//! Tests for IRQ and NMI entry, masking and latching.

use cpu6502::{Cpu, CpuError, FlatMemory, MemoryBus, Status};

/// Helper function to create a CPU with PC at 0x8000, SP at 0xFD, handlers at
/// 0x9000 (IRQ) and 0xA000 (NMI)
fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    memory.write(0xFFFE, 0x00);
    memory.write(0xFFFF, 0x90);
    memory.write(0xFFFA, 0x00);
    memory.write(0xFFFB, 0xA0);
    memory.load(0x9000, &[0xE8, 0x40]); // INX; RTI
    memory.load(0xA000, &[0xC8, 0x40]); // INY; RTI
    memory.load(0x8000, &[0xEA; 16]);
    let mut cpu = Cpu::new().unwrap();
    cpu.connect_bus(memory);
    cpu.set_pc(0x8000);
    cpu.set_sp(0xFD);
    cpu
}

fn peek(cpu: &Cpu<FlatMemory>, addr: u16) -> u8 {
    cpu.bus().unwrap().read(addr)
}

// ========== IRQ ==========

#[test]
fn test_irq_when_idle() {
    let mut cpu = setup_cpu();
    cpu.set_status((Status::CARRY | Status::BREAK).bits());

    cpu.irq().unwrap();

    assert_eq!(cpu.pc(), 0x9000);
    assert_eq!(cpu.sp(), 0xFA);
    assert_eq!(peek(&cpu, 0x01FD), 0x80);
    assert_eq!(peek(&cpu, 0x01FC), 0x00);
    // B clear, unused set in the pushed copy
    assert_eq!(peek(&cpu, 0x01FB), 0x21);
    assert!(cpu.flag_i());
    assert_eq!(cpu.remaining_cycles(), 7);
    assert_eq!(cpu.cycles(), 0);
}

#[test]
fn test_irq_sequence_takes_seven_pulses() {
    let mut cpu = setup_cpu();
    cpu.irq().unwrap();

    assert_eq!(cpu.step().unwrap(), 7);
    assert_eq!(cpu.pc(), 0x9000);

    cpu.step().unwrap(); // INX
    assert_eq!(cpu.x(), 0x01);
}

#[test]
fn test_masked_irq_changes_nothing() {
    let mut cpu = setup_cpu();
    cpu.set_flag(Status::INTERRUPT_DISABLE, true);
    let before = cpu.state().clone();

    cpu.irq().unwrap();

    assert_eq!(&before, cpu.state());
    assert_eq!(peek(&cpu, 0x01FD), 0x00);
    assert!(!cpu.interrupt_pending());
}

#[test]
fn test_irq_rti_round_trip() {
    let mut cpu = setup_cpu();
    cpu.set_status(Status::CARRY.bits());

    cpu.irq().unwrap();
    cpu.step().unwrap(); // entry
    cpu.step().unwrap(); // INX
    assert_eq!(cpu.step().unwrap(), 6); // RTI

    assert_eq!(cpu.pc(), 0x8000);
    assert_eq!(cpu.sp(), 0xFD);
    assert!(!cpu.flag_i());
    assert!(cpu.flag_c());
    assert_eq!(cpu.x(), 0x01);
}

// ========== NMI ==========

#[test]
fn test_nmi_ignores_interrupt_disable() {
    let mut cpu = setup_cpu();
    cpu.set_flag(Status::INTERRUPT_DISABLE, true);

    cpu.nmi().unwrap();

    assert_eq!(cpu.pc(), 0xA000);
    assert_eq!(cpu.remaining_cycles(), 7);
    assert_eq!(peek(&cpu, 0x01FD), 0x80);
    assert_eq!(peek(&cpu, 0x01FC), 0x00);
    assert_eq!(peek(&cpu, 0x01FB), 0x24);
    assert_eq!(cpu.sp(), 0xFA);
}

#[test]
fn test_nmi_handler_runs() {
    let mut cpu = setup_cpu();
    cpu.nmi().unwrap();

    assert_eq!(cpu.step().unwrap(), 7);
    cpu.step().unwrap(); // INY
    cpu.step().unwrap(); // RTI
    assert_eq!(cpu.y(), 0x01);
    assert_eq!(cpu.pc(), 0x8000);
}

// ========== Latching ==========

#[test]
fn test_irq_latched_while_busy() {
    let mut cpu = setup_cpu();

    cpu.clock().unwrap(); // NOP starts
    cpu.irq().unwrap();
    assert!(cpu.interrupt_pending());
    assert_eq!(cpu.pc(), 0x8001);

    cpu.clock().unwrap(); // NOP retires
    assert!(cpu.is_idle());
    assert_eq!(cpu.pc(), 0x8001);

    // Next idle pulse takes the interrupt instead of fetching
    cpu.clock().unwrap();
    assert_eq!(cpu.pc(), 0x9000);
    assert_eq!(cpu.remaining_cycles(), 6);
    assert!(!cpu.interrupt_pending());
    assert_eq!(peek(&cpu, 0x01FC), 0x01);
}

#[test]
fn test_nmi_wins_over_irq() {
    let mut cpu = setup_cpu();

    cpu.clock().unwrap();
    cpu.irq().unwrap();
    cpu.nmi().unwrap();
    cpu.step().unwrap();

    cpu.clock().unwrap();
    assert_eq!(cpu.pc(), 0xA000);

    // IRQ still latched but I is now set, so it is dropped at the next boundary
    cpu.step().unwrap(); // finish NMI entry
    cpu.step().unwrap(); // INY
    assert_eq!(cpu.y(), 0x01);
    assert_eq!(cpu.pc(), 0xA001);
    assert!(!cpu.interrupt_pending());
}

#[test]
fn test_latched_irq_dropped_if_masked_by_then() {
    let mut cpu = setup_cpu();
    cpu.bus_mut().unwrap().load(0x8000, &[0x78, 0xEA]); // SEI; NOP

    cpu.clock().unwrap(); // SEI executes on its first pulse
    cpu.irq().unwrap();
    cpu.step().unwrap();

    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x8002);
    assert!(!cpu.interrupt_pending());
}

#[test]
fn test_cli_lets_latched_irq_through() {
    let mut cpu = setup_cpu();
    cpu.bus_mut().unwrap().load(0x8000, &[0x58, 0xEA]); // CLI; NOP
    cpu.set_flag(Status::INTERRUPT_DISABLE, true);

    cpu.clock().unwrap();
    cpu.irq().unwrap();
    cpu.step().unwrap();

    cpu.clock().unwrap();
    assert_eq!(cpu.pc(), 0x9000);
}

// ========== Errors ==========

#[test]
fn test_interrupts_need_bus() {
    let mut cpu: Cpu<FlatMemory> = Cpu::new().unwrap();
    assert_eq!(cpu.irq(), Err(CpuError::BusNotConnected));
    assert_eq!(cpu.nmi(), Err(CpuError::BusNotConnected));
    assert!(!cpu.interrupt_pending());
}
