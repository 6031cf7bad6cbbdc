//! # Addressing Modes
//!
//! This module defines the 13 addressing modes supported by the 6502 processor
//! and the resolver that turns the bytes following an opcode into an effective
//! address.
//!
//! The resolver runs after the opcode has been fetched and PC points at the first
//! operand byte. It consumes 0, 1 or 2 operand bytes, leaves the effective address
//! in `addr_abs` (or the branch displacement in `addr_rel`), and reports whether
//! an indexed address crossed a page boundary.

use crate::cpu::CpuState;
use crate::MemoryBus;

/// 6502 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implicit, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLC, RTS, NOP
    Implicit,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: LSR A, ROL A, ASL A
    Accumulator,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10 (load immediate value 0x10 into accumulator)
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80 (load from address 0x0080)
    ZeroPage,

    /// Zero page address indexed by X register.
    ///
    /// Example: LDA $80,X (load from address 0x0080 + X, wraps within zero page)
    ZeroPageX,

    /// Zero page address indexed by Y register.
    ///
    /// Example: LDX $80,Y (load from address 0x0080 + Y, wraps within zero page)
    ZeroPageY,

    /// Signed 8-bit offset for branch instructions.
    ///
    /// Example: BEQ label (offset is relative to the address after the operand)
    Relative,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234 (jump to address 0x1234)
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Example: LDA $1234,X (load from address 0x1234 + X)
    /// May incur +1 cycle penalty if page boundary is crossed.
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Example: LDA $1234,Y (load from address 0x1234 + Y)
    /// May incur +1 cycle penalty if page boundary is crossed.
    AbsoluteY,

    /// Indirect jump through 16-bit pointer.
    ///
    /// Example: JMP ($FFFC) (jump to address stored at 0xFFFC/0xFFFD)
    /// Only used by JMP instruction.
    Indirect,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X)
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y
    /// May incur +1 cycle penalty if page boundary is crossed.
    IndirectY,
}

impl AddressingMode {
    /// All thirteen modes, in declaration order.
    pub const ALL: [AddressingMode; 13] = [
        AddressingMode::Implicit,
        AddressingMode::Accumulator,
        AddressingMode::Immediate,
        AddressingMode::ZeroPage,
        AddressingMode::ZeroPageX,
        AddressingMode::ZeroPageY,
        AddressingMode::Relative,
        AddressingMode::Absolute,
        AddressingMode::AbsoluteX,
        AddressingMode::AbsoluteY,
        AddressingMode::Indirect,
        AddressingMode::IndirectX,
        AddressingMode::IndirectY,
    ];

    /// Parses an opcode matrix token (`IMM`, `ZPX`, `INDY`, ...).
    ///
    /// # Examples
    ///
    /// ```
    /// use cpu6502::AddressingMode;
    ///
    /// assert_eq!(AddressingMode::from_token("ABSX"), Some(AddressingMode::AbsoluteX));
    /// assert_eq!(AddressingMode::from_token("abs"), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        let mode = match token {
            "IMM" => AddressingMode::Immediate,
            "ZP" => AddressingMode::ZeroPage,
            "ZPX" => AddressingMode::ZeroPageX,
            "ZPY" => AddressingMode::ZeroPageY,
            "ABS" => AddressingMode::Absolute,
            "ABSX" => AddressingMode::AbsoluteX,
            "ABSY" => AddressingMode::AbsoluteY,
            "IND" => AddressingMode::Indirect,
            "INDX" => AddressingMode::IndirectX,
            "INDY" => AddressingMode::IndirectY,
            "REL" => AddressingMode::Relative,
            "ACC" => AddressingMode::Accumulator,
            "IMP" => AddressingMode::Implicit,
            _ => return None,
        };
        Some(mode)
    }

    /// The matrix token for this mode; inverse of [`AddressingMode::from_token`].
    pub fn token(self) -> &'static str {
        match self {
            AddressingMode::Immediate => "IMM",
            AddressingMode::ZeroPage => "ZP",
            AddressingMode::ZeroPageX => "ZPX",
            AddressingMode::ZeroPageY => "ZPY",
            AddressingMode::Absolute => "ABS",
            AddressingMode::AbsoluteX => "ABSX",
            AddressingMode::AbsoluteY => "ABSY",
            AddressingMode::Indirect => "IND",
            AddressingMode::IndirectX => "INDX",
            AddressingMode::IndirectY => "INDY",
            AddressingMode::Relative => "REL",
            AddressingMode::Accumulator => "ACC",
            AddressingMode::Implicit => "IMP",
        }
    }

    /// Number of operand bytes following the opcode (0, 1 or 2).
    pub fn operand_bytes(self) -> u8 {
        match self {
            AddressingMode::Implicit | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }

    /// True for modes with no memory operand; the instruction works on A or nothing.
    pub fn is_register_only(self) -> bool {
        matches!(self, AddressingMode::Implicit | AddressingMode::Accumulator)
    }
}

impl std::fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Reads the byte at PC and advances PC.
fn next_byte<M: MemoryBus>(cpu: &mut CpuState, bus: &M) -> u8 {
    let value = bus.read(cpu.pc);
    cpu.pc = cpu.pc.wrapping_add(1);
    value
}

/// Reads a little-endian word at PC and advances PC by two.
fn next_word<M: MemoryBus>(cpu: &mut CpuState, bus: &M) -> u16 {
    let lo = next_byte(cpu, bus) as u16;
    let hi = next_byte(cpu, bus) as u16;
    (hi << 8) | lo
}

/// Reads a pointer from the zero page; the high byte wraps to 0x00 after 0xFF.
fn zero_page_word<M: MemoryBus>(bus: &M, ptr: u8) -> u16 {
    let lo = bus.read(ptr as u16) as u16;
    let hi = bus.read(ptr.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// Adds an index to a base address and reports whether the high byte changed.
fn index(base: u16, by: u8) -> (u16, bool) {
    let addr = base.wrapping_add(by as u16);
    (addr, (addr & 0xFF00) != (base & 0xFF00))
}

/// Resolves the operand for `mode`, consuming operand bytes at PC.
///
/// Leaves the effective address in `cpu.addr_abs` (for Relative, the sign-extended
/// displacement in `cpu.addr_rel`). For Accumulator and Implicit modes the
/// accumulator is latched into `cpu.fetched` instead.
///
/// Returns 1 when an indexed address crossed a page boundary (AbsoluteX,
/// AbsoluteY, IndirectY), otherwise 0. Whether that cycle is actually charged
/// is up to the instruction.
pub(crate) fn resolve<M: MemoryBus>(cpu: &mut CpuState, bus: &M, mode: AddressingMode) -> u8 {
    cpu.mode = mode;
    cpu.page_crossed = false;

    match mode {
        AddressingMode::Implicit | AddressingMode::Accumulator => {
            cpu.fetched = cpu.a;
        }
        AddressingMode::Immediate => {
            cpu.addr_abs = cpu.pc;
            cpu.pc = cpu.pc.wrapping_add(1);
        }
        AddressingMode::ZeroPage => {
            cpu.addr_abs = next_byte(cpu, bus) as u16;
        }
        AddressingMode::ZeroPageX => {
            cpu.addr_abs = next_byte(cpu, bus).wrapping_add(cpu.x) as u16;
        }
        AddressingMode::ZeroPageY => {
            cpu.addr_abs = next_byte(cpu, bus).wrapping_add(cpu.y) as u16;
        }
        AddressingMode::Relative => {
            let offset = next_byte(cpu, bus) as i8;
            cpu.addr_rel = offset as i16 as u16;
        }
        AddressingMode::Absolute => {
            cpu.addr_abs = next_word(cpu, bus);
        }
        AddressingMode::AbsoluteX => {
            let base = next_word(cpu, bus);
            (cpu.addr_abs, cpu.page_crossed) = index(base, cpu.x);
        }
        AddressingMode::AbsoluteY => {
            let base = next_word(cpu, bus);
            (cpu.addr_abs, cpu.page_crossed) = index(base, cpu.y);
        }
        AddressingMode::Indirect => {
            let ptr = next_word(cpu, bus);
            // NMOS bug: the pointer's high byte is fetched without carrying
            // into the page, so JMP ($10FF) reads $10FF and $1000.
            let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
            let lo = bus.read(ptr) as u16;
            let hi = bus.read(hi_addr) as u16;
            cpu.addr_abs = (hi << 8) | lo;
        }
        AddressingMode::IndirectX => {
            let ptr = next_byte(cpu, bus).wrapping_add(cpu.x);
            cpu.addr_abs = zero_page_word(bus, ptr);
        }
        AddressingMode::IndirectY => {
            let ptr = next_byte(cpu, bus);
            let base = zero_page_word(bus, ptr);
            (cpu.addr_abs, cpu.page_crossed) = index(base, cpu.y);
        }
    }

    cpu.page_crossed as u8
}
