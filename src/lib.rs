//! # 6502 CPU Emulator Core
//!
//! A pulse-driven, cycle-accurate NMOS 6502 CPU core.
//!
//! This crate provides the instruction-execution core of a 6502-family emulator:
//! the register file and flag semantics, a 256-entry opcode table parsed from a
//! declarative matrix, the thirteen addressing-mode resolvers, a per-clock-pulse
//! step engine, and the reset/IRQ/NMI entry points. Memory, video, audio and any
//! harness stay on the embedder's side of the [`MemoryBus`] trait.
//!
//! ## Quick Start
//!
//! ```rust
//! use cpu6502::{Cpu, FlatMemory, MemoryBus};
//!
//! let mut memory = FlatMemory::new();
//! memory.write(0xFFFC, 0x00); // Reset vector low byte
//! memory.write(0xFFFD, 0x80); // Reset vector high byte
//! memory.load(0x8000, &[0xA9, 0x10]); // LDA #$10
//!
//! let mut cpu = Cpu::new().unwrap();
//! cpu.connect_bus(memory);
//! cpu.reset().unwrap();
//! assert_eq!(cpu.pc(), 0x8000);
//!
//! // Reset occupies 7 pulses, LDA #imm another 2.
//! cpu.run_for_cycles(7 + 2).unwrap();
//! assert_eq!(cpu.a(), 0x10);
//! assert!(cpu.is_idle());
//! ```
//!
//! ## Execution Model
//!
//! Each call to [`Cpu::clock`] is one clock pulse. The pulse that finds the CPU
//! idle fetches, decodes and executes a whole instruction and charges its full
//! cycle cost; the pulses after it only count that cost down. Interrupts are
//! taken only at instruction boundaries.
//!
//! ## Modules
//!
//! - `cpu` - CPU state, step engine and register access
//! - `interrupts` - reset, IRQ and NMI sequences
//! - `memory` - MemoryBus trait and FlatMemory
//! - `opcodes` - Opcode matrix parser and decode table
//! - `addressing` - Addressing modes and the operand resolver
//! - `flags` - Status register bit set

use std::borrow::Cow;

use thiserror::Error;

pub mod addressing;
pub mod cpu;
pub mod flags;
pub mod interrupts;
pub mod memory;
pub mod opcodes;

// Internal instruction implementations (not part of public API)
mod instructions;

// Re-export public API
pub use addressing::AddressingMode;
pub use cpu::{Cpu, CpuState};
pub use flags::Status;
pub use interrupts::{IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR, STACK_BASE};
pub use memory::{FlatMemory, MemoryBus};
pub use opcodes::{Instruction, Mnemonic, OpcodeTable, OPCODE_MATRIX};

/// Construction options for [`Cpu`].
///
/// # Examples
///
/// ```
/// use cpu6502::{Cpu, CpuConfig, FlatMemory};
///
/// // A Ricoh 2A03-style core: decimal flag stored but ignored by ADC/SBC.
/// let config = CpuConfig {
///     decimal_mode: false,
///     ..CpuConfig::default()
/// };
/// let cpu: Cpu<FlatMemory> = Cpu::with_config(config).unwrap();
/// assert!(!cpu.config().decimal_mode);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuConfig {
    /// Opcode matrix parsed into the decode table at construction.
    pub opcode_matrix: Cow<'static, str>,

    /// Whether ADC/SBC honour the decimal flag (NMOS 6502) or always work in
    /// binary (2A03).
    pub decimal_mode: bool,

    /// Cycles the reset sequence occupies. References disagree between 7 and 8.
    pub reset_cycles: u8,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            opcode_matrix: Cow::Borrowed(OPCODE_MATRIX),
            decimal_mode: true,
            reset_cycles: 7,
        }
    }
}

/// Errors raised while parsing an opcode matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// A row label is not a single hex digit followed by `_`.
    #[error("line {line}: row label `{label}` is not of the form `H_`")]
    RowLabel { line: usize, label: String },

    /// The same high nibble was given twice.
    #[error("row {row:X}_ appears more than once")]
    DuplicateRow { row: u8 },

    /// A high nibble never appeared, leaving sixteen opcodes unmapped.
    #[error("row {row:X}_ is missing")]
    MissingRow { row: u8 },

    /// A row did not have exactly sixteen cells.
    #[error("row {row:X}_ has {found} cells, expected 16")]
    ColumnCount { row: u8, found: usize },

    /// A cell is not `MNEMONIC MODE CYCLES`.
    #[error("opcode 0x{opcode:02X}: malformed cell `{cell}`")]
    MalformedCell { opcode: u8, cell: String },

    /// The mnemonic token is not one the core can execute.
    #[error("opcode 0x{opcode:02X}: unknown mnemonic `{token}`")]
    UnknownMnemonic { opcode: u8, token: String },

    /// The addressing-mode token is not one of the thirteen known modes.
    #[error("opcode 0x{opcode:02X}: unknown addressing mode `{token}`")]
    UnknownAddressingMode { opcode: u8, token: String },

    /// The cycle count is not an integer in 1..=255.
    #[error("opcode 0x{opcode:02X}: invalid cycle count `{token}`")]
    InvalidCycles { opcode: u8, token: String },
}

/// Errors that can occur while constructing or driving the CPU.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    /// The opcode matrix could not be turned into a decode table. The CPU was
    /// never built.
    #[error("invalid opcode matrix: {0}")]
    Matrix(#[from] MatrixError),

    /// The CPU was driven before a memory bus was attached with
    /// [`Cpu::connect_bus`].
    #[error("no memory bus attached")]
    BusNotConnected,
}
