//! # Reset and Interrupts
//!
//! The three externally triggered entry points of the 6502:
//!
//! - **Reset**: loads PC from the reset vector and reinitializes registers. No
//!   stack writes.
//! - **IRQ**: maskable by the interrupt-disable flag.
//! - **NMI**: unconditional.
//!
//! IRQ and NMI share one sequence: push PC (high byte, then low byte), push the
//! status byte with B clear and the unused bit set, set interrupt-disable, and
//! load PC from the vector. Each sequence takes 7 cycles.
//!
//! Interrupts only start at an instruction boundary. Requests that arrive while
//! an instruction is in flight are latched and taken on the next idle pulse.

use log::{debug, trace};

use crate::cpu::CpuState;
use crate::{Cpu, CpuError, MemoryBus, Status};

/// Base address of the stack page.
pub const STACK_BASE: u16 = 0x0100;

/// Address of the NMI vector (low byte; high byte follows).
pub const NMI_VECTOR: u16 = 0xFFFA;

/// Address of the reset vector (low byte; high byte follows).
pub const RESET_VECTOR: u16 = 0xFFFC;

/// Address of the IRQ/BRK vector (low byte; high byte follows).
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles taken by the IRQ entry sequence.
pub const IRQ_CYCLES: u8 = 7;

/// Cycles taken by the NMI entry sequence.
pub const NMI_CYCLES: u8 = 7;

/// Hardware interrupt sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Irq,
    Nmi,
}

impl Kind {
    fn vector(self) -> u16 {
        match self {
            Kind::Irq => IRQ_VECTOR,
            Kind::Nmi => NMI_VECTOR,
        }
    }

    fn cycles(self) -> u8 {
        match self {
            Kind::Irq => IRQ_CYCLES,
            Kind::Nmi => NMI_CYCLES,
        }
    }
}

/// Runs the hardware interrupt entry sequence and returns its cycle cost.
pub(crate) fn enter<M: MemoryBus>(cpu: &mut CpuState, bus: &mut M, kind: Kind) -> u8 {
    let return_address = cpu.pc;
    let pushed_status = cpu.status.pushed_by_hardware();

    cpu.push_word(bus, return_address);
    cpu.push(bus, pushed_status);
    cpu.set_flag(Status::INTERRUPT_DISABLE, true);
    cpu.pc = bus.read_word(kind.vector());

    trace!(
        "{:?} taken: return {:04X}, P pushed {:02X}, handler {:04X}",
        kind,
        return_address,
        pushed_status,
        cpu.pc
    );

    kind.cycles()
}

impl<M: MemoryBus> Cpu<M> {
    /// Resets the CPU.
    ///
    /// - PC is loaded from the reset vector at 0xFFFC/0xFFFD (little-endian)
    /// - A, X, Y are zeroed
    /// - SP is set to 0xFD
    /// - Status becomes interrupt-disable | unused, everything else clear
    /// - The reset sequence occupies `CpuConfig::reset_cycles` pulses
    ///
    /// Reset is abortive: it may be called at any time, abandons any
    /// instruction in flight and drops latched interrupt requests. Nothing is
    /// written to the stack.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::BusNotConnected`] if no bus is attached.
    ///
    /// # Examples
    ///
    /// ```
    /// use cpu6502::{Cpu, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFC, 0x00);
    /// mem.write(0xFFFD, 0xC0);
    ///
    /// let mut cpu = Cpu::new().unwrap();
    /// cpu.connect_bus(mem);
    /// cpu.set_a(0x55);
    /// cpu.reset().unwrap();
    ///
    /// assert_eq!(cpu.pc(), 0xC000);
    /// assert_eq!(cpu.a(), 0x00);
    /// assert_eq!(cpu.sp(), 0xFD);
    /// assert_eq!(cpu.status(), 0x24);
    /// assert_eq!(cpu.remaining_cycles(), 7);
    /// ```
    pub fn reset(&mut self) -> Result<(), CpuError> {
        let reset_cycles = self.config().reset_cycles;
        let bus = self.bus.as_ref().ok_or(CpuError::BusNotConnected)?;
        let cpu = &mut self.state;

        cpu.pc = bus.read_word(RESET_VECTOR);
        cpu.a = 0x00;
        cpu.x = 0x00;
        cpu.y = 0x00;
        cpu.sp = 0xFD;
        cpu.status = Status::INTERRUPT_DISABLE | Status::UNUSED;

        cpu.fetched = 0x00;
        cpu.addr_abs = 0x0000;
        cpu.addr_rel = 0x0000;
        cpu.page_crossed = false;
        cpu.jammed = false;
        cpu.remaining = reset_cycles;

        self.pending_nmi = false;
        self.pending_irq = false;

        debug!("reset: PC={:04X}", self.state.pc);
        Ok(())
    }

    /// Requests a maskable interrupt.
    ///
    /// When idle and the interrupt-disable flag is clear, the interrupt is taken
    /// immediately and the CPU becomes busy for 7 cycles. When idle and the flag
    /// is set, nothing happens at all. When an instruction is in flight the
    /// request is latched and taken at the next instruction boundary, provided
    /// interrupt-disable is clear by then. A jammed CPU ignores the request.
    ///
    /// For a level-triggered line shared by devices, implement
    /// [`MemoryBus::irq_active`] instead; the CPU polls it at every boundary.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::BusNotConnected`] if no bus is attached.
    pub fn irq(&mut self) -> Result<(), CpuError> {
        let bus = self.bus.as_mut().ok_or(CpuError::BusNotConnected)?;

        if self.state.jammed {
            trace!("IRQ ignored: CPU jammed");
            return Ok(());
        }

        if self.state.remaining > 0 {
            trace!("IRQ latched until instruction boundary");
            self.pending_irq = true;
            return Ok(());
        }

        if self.state.get_flag(Status::INTERRUPT_DISABLE) {
            trace!("IRQ ignored: interrupt disable set");
            return Ok(());
        }

        let cycles = enter(&mut self.state, bus, Kind::Irq);
        self.state.remaining = cycles;
        Ok(())
    }

    /// Requests a non-maskable interrupt.
    ///
    /// Same sequence as [`Cpu::irq`] but ignores the interrupt-disable flag and
    /// vectors through 0xFFFA/0xFFFB. Latched if an instruction is in flight.
    /// A jammed CPU ignores it; only [`Cpu::reset`] recovers.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::BusNotConnected`] if no bus is attached.
    pub fn nmi(&mut self) -> Result<(), CpuError> {
        let bus = self.bus.as_mut().ok_or(CpuError::BusNotConnected)?;

        if self.state.jammed {
            trace!("NMI ignored: CPU jammed");
            return Ok(());
        }

        if self.state.remaining > 0 {
            trace!("NMI latched until instruction boundary");
            self.pending_nmi = true;
            return Ok(());
        }

        let cycles = enter(&mut self.state, bus, Kind::Nmi);
        self.state.remaining = cycles;
        Ok(())
    }

    /// True if an IRQ or NMI has been latched and not yet taken.
    pub fn interrupt_pending(&self) -> bool {
        self.pending_irq || self.pending_nmi
    }
}
