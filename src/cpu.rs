//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the 6502 processor and the
//! per-pulse fetch-decode-execute engine.
//!
//! ## CPU State
//!
//! The CPU maintains a single state record ([`CpuState`]):
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of next byte to fetch
//! - **Stack pointer** (SP): 8-bit offset into stack page (0x0100-0x01FF)
//! - **Status flags**: packed [`Status`] byte
//! - **Instruction in flight**: opcode, fetched operand, resolved addresses,
//!   remaining cycles
//! - **Cycle counter**: u64 monotonically increasing pulse count
//!
//! ## Execution Model
//!
//! - `clock()`: One clock pulse. Idle pulses start the next instruction (or an
//!   interrupt sequence); busy pulses count the current one down.
//! - `step()`: Pulse until the current instruction has retired
//! - `run_for_cycles()`: Pulse a fixed number of times

use log::{debug, trace};

use crate::addressing::{self, AddressingMode};
use crate::interrupts::{self, STACK_BASE};
use crate::{instructions, CpuConfig, CpuError, MemoryBus, OpcodeTable, Status};

/// Registers, flags and in-flight instruction state of the 6502.
///
/// Cloneable and comparable so that callers can snapshot the CPU and check what
/// an operation changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuState {
    /// Accumulator register
    pub(crate) a: u8,

    /// X index register
    pub(crate) x: u8,

    /// Y index register
    pub(crate) y: u8,

    /// Stack pointer (0x0100 + sp gives full stack address)
    pub(crate) sp: u8,

    /// Program counter (address of next byte to fetch)
    pub(crate) pc: u16,

    /// Processor status register
    pub(crate) status: Status,

    /// Operand latched by the last `fetch`
    pub(crate) fetched: u8,

    /// Effective address produced by the resolver
    pub(crate) addr_abs: u16,

    /// Sign-extended branch displacement produced by the resolver
    pub(crate) addr_rel: u16,

    /// Opcode of the instruction in flight
    pub(crate) opcode: u8,

    /// Addressing mode of the instruction in flight
    pub(crate) mode: AddressingMode,

    /// Whether the resolver's indexed address crossed a page
    pub(crate) page_crossed: bool,

    /// Pulses left before the CPU is idle again
    pub(crate) remaining: u8,

    /// Set once a JAM opcode has locked the CPU; cleared by reset
    pub(crate) jammed: bool,

    /// Total pulses since construction
    pub(crate) cycles: u64,
}

impl Default for CpuState {
    /// Power-on state: everything zero except SP = 0xFF.
    fn default() -> Self {
        Self {
            a: 0x00,
            x: 0x00,
            y: 0x00,
            sp: 0xFF,
            pc: 0x0000,
            status: Status::empty(),
            fetched: 0x00,
            addr_abs: 0x0000,
            addr_rel: 0x0000,
            opcode: 0x00,
            mode: AddressingMode::Implicit,
            page_crossed: false,
            remaining: 0,
            jammed: false,
            cycles: 0,
        }
    }
}

impl CpuState {
    /// Reads one status bit.
    pub fn get_flag(&self, flag: Status) -> bool {
        self.status.contains(flag)
    }

    /// Sets or clears one status bit.
    pub fn set_flag(&mut self, flag: Status, value: bool) {
        self.status.set(flag, value);
    }

    /// Updates Z and N from a result byte.
    pub(crate) fn set_zn(&mut self, value: u8) {
        self.status.set(Status::ZERO, value == 0);
        self.status.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    /// Latches the instruction's operand: memory at the effective address, or
    /// A for accumulator/implied modes.
    pub(crate) fn fetch<M: MemoryBus>(&mut self, bus: &M) -> u8 {
        if !self.mode.is_register_only() {
            self.fetched = bus.read(self.addr_abs);
        }
        self.fetched
    }

    /// Writes to the stack page and moves SP down, wrapping within the page.
    pub(crate) fn push<M: MemoryBus>(&mut self, bus: &mut M, value: u8) {
        bus.write(STACK_BASE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    /// Moves SP up, wrapping within the page, and reads the stack page.
    pub(crate) fn pop<M: MemoryBus>(&mut self, bus: &M) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE | self.sp as u16)
    }

    /// Pushes high byte then low byte.
    pub(crate) fn push_word<M: MemoryBus>(&mut self, bus: &mut M, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, value as u8);
    }

    /// Pops low byte then high byte.
    pub(crate) fn pop_word<M: MemoryBus>(&mut self, bus: &M) -> u16 {
        let lo = self.pop(bus) as u16;
        let hi = self.pop(bus) as u16;
        (hi << 8) | lo
    }

    /// Accumulator.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// X index register.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Y index register.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Stack pointer (offset into page 0x01).
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Program counter.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Status register as a flag set.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Opcode of the most recently started instruction.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Effective address of the most recently started instruction.
    pub fn addr_abs(&self) -> u16 {
        self.addr_abs
    }

    /// Pulses left before the CPU is idle again.
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// True if a JAM opcode has locked the CPU.
    pub fn jammed(&self) -> bool {
        self.jammed
    }

    /// Total pulses since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

/// 6502 CPU.
///
/// Generic over the memory implementation via the `MemoryBus` trait. The bus is
/// attached after construction with [`Cpu::connect_bus`] and must be attached
/// before the CPU is clocked or interrupted; otherwise those calls return
/// [`CpuError::BusNotConnected`].
///
/// # Examples
///
/// ```
/// use cpu6502::{Cpu, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00);
/// memory.write(0xFFFD, 0x80);
///
/// let mut cpu = Cpu::new().unwrap();
/// cpu.connect_bus(memory);
/// cpu.reset().unwrap();
///
/// assert_eq!(cpu.pc(), 0x8000);
/// assert_eq!(cpu.sp(), 0xFD);
/// assert!(cpu.flag_i());
/// ```
pub struct Cpu<M: MemoryBus> {
    pub(crate) state: CpuState,

    /// Decode table, read-only after construction
    table: OpcodeTable,

    config: CpuConfig,

    /// Memory bus implementation, attached late
    pub(crate) bus: Option<M>,

    /// NMI requested while an instruction was in flight
    pub(crate) pending_nmi: bool,

    /// IRQ requested while an instruction was in flight
    pub(crate) pending_irq: bool,
}

impl<M: MemoryBus> Cpu<M> {
    /// Creates a CPU with the default configuration (built-in NMOS matrix,
    /// decimal mode enabled).
    ///
    /// The CPU starts in the power-on state: A, X, Y, PC and status zero,
    /// SP = 0xFF, idle. Attach a bus and call [`Cpu::reset`] to boot it.
    pub fn new() -> Result<Self, CpuError> {
        Self::with_config(CpuConfig::default())
    }

    /// Creates a CPU from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::Matrix`] if `config.opcode_matrix` cannot be parsed
    /// into a complete decode table.
    ///
    /// # Examples
    ///
    /// ```
    /// use cpu6502::{Cpu, CpuConfig, CpuError, FlatMemory};
    ///
    /// let config = CpuConfig {
    ///     opcode_matrix: "0_ | BRK IMP 7".into(),
    ///     ..CpuConfig::default()
    /// };
    /// let result: Result<Cpu<FlatMemory>, _> = Cpu::with_config(config);
    /// assert!(matches!(result, Err(CpuError::Matrix(_))));
    /// ```
    pub fn with_config(config: CpuConfig) -> Result<Self, CpuError> {
        let table = OpcodeTable::parse(&config.opcode_matrix)?;
        debug!(
            "6502 core built: decimal_mode={}, reset_cycles={}",
            config.decimal_mode, config.reset_cycles
        );

        Ok(Self {
            state: CpuState::default(),
            table,
            config,
            bus: None,
            pending_nmi: false,
            pending_irq: false,
        })
    }

    /// Attaches the memory bus, replacing any previous one.
    pub fn connect_bus(&mut self, bus: M) {
        if self.bus.replace(bus).is_some() {
            debug!("memory bus replaced");
        } else {
            debug!("memory bus attached");
        }
    }

    /// Detaches and returns the memory bus.
    pub fn disconnect_bus(&mut self) -> Option<M> {
        self.bus.take()
    }

    /// Returns a reference to the attached bus, if any.
    pub fn bus(&self) -> Option<&M> {
        self.bus.as_ref()
    }

    /// Returns a mutable reference to the attached bus, if any.
    pub fn bus_mut(&mut self) -> Option<&mut M> {
        self.bus.as_mut()
    }

    /// Executes one clock pulse.
    ///
    /// If the CPU is idle, this pulse starts the next unit of work, in priority
    /// order:
    /// 1. A latched NMI
    /// 2. An IRQ (latched, or the bus's IRQ line) if interrupt-disable is clear
    /// 3. The instruction at PC: fetch opcode, decode, resolve operand, execute,
    ///    and charge `base + page penalty + branch penalty` cycles
    ///
    /// A jammed CPU skips 1 and 2 and re-executes the JAM at PC.
    ///
    /// The starting pulse is the first of those cycles. Every other pulse only
    /// counts down, so an instruction costing `n` cycles spans exactly `n` calls.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::BusNotConnected`] if no bus is attached; the CPU state
    /// is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use cpu6502::{Cpu, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0x0000, 0xEA); // NOP, 2 cycles
    ///
    /// let mut cpu = Cpu::new().unwrap();
    /// cpu.connect_bus(mem);
    ///
    /// cpu.clock().unwrap();
    /// assert_eq!(cpu.pc(), 0x0001);
    /// assert_eq!(cpu.remaining_cycles(), 1);
    ///
    /// cpu.clock().unwrap();
    /// assert!(cpu.is_idle());
    /// assert_eq!(cpu.cycles(), 2);
    /// ```
    pub fn clock(&mut self) -> Result<(), CpuError> {
        let bus = self.bus.as_mut().ok_or(CpuError::BusNotConnected)?;
        let cpu = &mut self.state;

        if cpu.remaining == 0 {
            cpu.remaining = if cpu.jammed {
                // Only reset leaves a JAM; interrupts are not serviced
                execute_next(cpu, bus, &self.table, self.config.decimal_mode)
            } else if std::mem::take(&mut self.pending_nmi) {
                interrupts::enter(cpu, bus, interrupts::Kind::Nmi)
            } else if (std::mem::take(&mut self.pending_irq) || bus.irq_active())
                && !cpu.get_flag(Status::INTERRUPT_DISABLE)
            {
                interrupts::enter(cpu, bus, interrupts::Kind::Irq)
            } else {
                execute_next(cpu, bus, &self.table, self.config.decimal_mode)
            };
        }

        cpu.remaining = cpu.remaining.saturating_sub(1);
        cpu.cycles += 1;
        Ok(())
    }

    /// Pulses until the current instruction (or the next one, if idle) has
    /// retired. Returns the number of pulses consumed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cpu6502::{Cpu, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.load(0x0000, &[0xA9, 0x42]); // LDA #$42
    ///
    /// let mut cpu = Cpu::new().unwrap();
    /// cpu.connect_bus(mem);
    ///
    /// assert_eq!(cpu.step().unwrap(), 2);
    /// assert_eq!(cpu.a(), 0x42);
    /// ```
    pub fn step(&mut self) -> Result<u32, CpuError> {
        let mut pulses = 0;
        loop {
            self.clock()?;
            pulses += 1;
            if self.state.remaining == 0 {
                return Ok(pulses);
            }
        }
    }

    /// Runs the CPU for a specified number of clock pulses.
    ///
    /// This is useful for frame-locked execution models where the CPU must run
    /// for an exact number of cycles per frame (e.g., 29780 cycles for 60Hz NTSC).
    /// Unlike instruction-granular stepping the budget is met exactly; an
    /// instruction may be left in flight at the end.
    ///
    /// Returns the number of pulses executed.
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> Result<u64, CpuError> {
        let start_cycles = self.state.cycles;
        for _ in 0..cycle_budget {
            self.clock()?;
        }
        Ok(self.state.cycles - start_cycles)
    }

    // ========== Engine State ==========

    /// True when no instruction or interrupt sequence is in flight.
    pub fn is_idle(&self) -> bool {
        self.state.remaining == 0
    }

    /// Pulses left before the CPU is idle again.
    pub fn remaining_cycles(&self) -> u8 {
        self.state.remaining
    }

    /// Returns the total number of clock pulses since construction.
    pub fn cycles(&self) -> u64 {
        self.state.cycles
    }

    /// True if a JAM opcode has locked the CPU. Only [`Cpu::reset`] recovers.
    pub fn is_jammed(&self) -> bool {
        self.state.jammed
    }

    /// Full register and in-flight state.
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// The decode table built at construction.
    pub fn opcode_table(&self) -> &OpcodeTable {
        &self.table
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.state.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.state.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.state.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    /// Returns the stack pointer value.
    ///
    /// Note: The full stack address is 0x0100 + SP. The stack grows downward from 0x01FF.
    pub fn sp(&self) -> u8 {
        self.state.sp
    }

    /// Returns the status register as a packed byte.
    ///
    /// Bit layout (NV-BDIZC):
    /// - Bit 7: N (Negative)
    /// - Bit 6: V (Overflow)
    /// - Bit 5: (unused)
    /// - Bit 4: B (Break)
    /// - Bit 3: D (Decimal)
    /// - Bit 2: I (Interrupt Disable)
    /// - Bit 1: Z (Zero)
    /// - Bit 0: C (Carry)
    pub fn status(&self) -> u8 {
        self.state.status.bits()
    }

    /// Reads one status bit.
    pub fn get_flag(&self, flag: Status) -> bool {
        self.state.get_flag(flag)
    }

    // ========== Status Flag Getters ==========

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.get_flag(Status::NEGATIVE)
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.get_flag(Status::OVERFLOW)
    }

    /// Returns true if the Break flag is set.
    pub fn flag_b(&self) -> bool {
        self.get_flag(Status::BREAK)
    }

    /// Returns true if the Decimal mode flag is set.
    pub fn flag_d(&self) -> bool {
        self.get_flag(Status::DECIMAL)
    }

    /// Returns true if the Interrupt Disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.get_flag(Status::INTERRUPT_DISABLE)
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.get_flag(Status::ZERO)
    }

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.get_flag(Status::CARRY)
    }

    // ========== Register Setters ==========
    //
    // For test setup and embedders that load a machine state directly.

    pub fn set_a(&mut self, value: u8) {
        self.state.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.state.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.state.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.state.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.state.sp = value;
    }

    /// Replaces the whole status byte.
    pub fn set_status(&mut self, value: u8) {
        self.state.status = Status::from_bits_retain(value);
    }

    /// Sets or clears one status bit.
    pub fn set_flag(&mut self, flag: Status, value: bool) {
        self.state.set_flag(flag, value);
    }
}

/// Fetches, decodes and executes the instruction at PC. Returns its total cost.
fn execute_next<M: MemoryBus>(
    cpu: &mut CpuState,
    bus: &mut M,
    table: &OpcodeTable,
    decimal_mode: bool,
) -> u8 {
    let pc = cpu.pc;
    let opcode = bus.read(pc);
    cpu.opcode = opcode;
    cpu.pc = pc.wrapping_add(1);

    let instruction = *table.get(opcode);
    trace!(
        "{:04X}  {:02X}  {:<4} {:<4} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        pc,
        opcode,
        instruction.mnemonic,
        instruction.addressing_mode,
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.status.bits(),
        cpu.sp,
        cpu.cycles
    );

    let page_penalty = addressing::resolve(cpu, bus, instruction.addressing_mode);
    let branch_penalty = instructions::execute(instruction.mnemonic, cpu, bus, decimal_mode);

    let page_penalty = if instruction.mnemonic.pays_page_penalty() {
        page_penalty
    } else {
        0
    };

    instruction
        .base_cycles
        .saturating_add(page_penalty)
        .saturating_add(branch_penalty)
}
