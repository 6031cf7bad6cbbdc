//! # 6502 Instruction Implementations
//!
//! This module contains the implementations of all 6502 instructions, organized by category.
//! Each instruction is a standalone function over the CPU state and the bus; by the time it
//! runs, the addressing-mode resolver has already consumed the operand bytes and left the
//! effective address (or the accumulator, for register-only modes) ready to `fetch`.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT)
//! - **branches**: Conditional branch instructions (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, RTI, BRK, NOP)
//! - **stack**: Stack operations (PHA, PHP, PLA, PLP)
//! - **flags**: Status flag manipulation (CLC, SEC, CLI, SEI, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)
//! - **undocumented**: Stable and unstable illegal opcodes, JAM

pub(crate) mod alu;
pub(crate) mod branches;
pub(crate) mod control;
pub(crate) mod flags;
pub(crate) mod inc_dec;
pub(crate) mod load_store;
pub(crate) mod shifts;
pub(crate) mod stack;
pub(crate) mod transfer;
pub(crate) mod undocumented;

use crate::cpu::CpuState;
use crate::{AddressingMode, MemoryBus, Mnemonic};

/// Runs the semantics of `mnemonic` against the resolved operand.
///
/// Returns the extra cycles the instruction itself adds: 1 for a taken branch,
/// 2 for a taken branch to another page, otherwise 0.
pub(crate) fn execute<M: MemoryBus>(
    mnemonic: Mnemonic,
    cpu: &mut CpuState,
    bus: &mut M,
    decimal_mode: bool,
) -> u8 {
    match mnemonic {
        Mnemonic::Bcc
        | Mnemonic::Bcs
        | Mnemonic::Beq
        | Mnemonic::Bne
        | Mnemonic::Bmi
        | Mnemonic::Bpl
        | Mnemonic::Bvc
        | Mnemonic::Bvs => return branches::execute_branch(cpu, mnemonic),

        Mnemonic::Adc => alu::execute_adc(cpu, bus, decimal_mode),
        Mnemonic::Sbc => alu::execute_sbc(cpu, bus, decimal_mode),
        Mnemonic::And => alu::execute_and(cpu, bus),
        Mnemonic::Ora => alu::execute_ora(cpu, bus),
        Mnemonic::Eor => alu::execute_eor(cpu, bus),
        Mnemonic::Bit => alu::execute_bit(cpu, bus),
        Mnemonic::Cmp => alu::execute_cmp(cpu, bus),
        Mnemonic::Cpx => alu::execute_cpx(cpu, bus),
        Mnemonic::Cpy => alu::execute_cpy(cpu, bus),

        Mnemonic::Asl => shifts::execute_asl(cpu, bus),
        Mnemonic::Lsr => shifts::execute_lsr(cpu, bus),
        Mnemonic::Rol => shifts::execute_rol(cpu, bus),
        Mnemonic::Ror => shifts::execute_ror(cpu, bus),

        Mnemonic::Lda => load_store::execute_lda(cpu, bus),
        Mnemonic::Ldx => load_store::execute_ldx(cpu, bus),
        Mnemonic::Ldy => load_store::execute_ldy(cpu, bus),
        Mnemonic::Sta => load_store::execute_sta(cpu, bus),
        Mnemonic::Stx => load_store::execute_stx(cpu, bus),
        Mnemonic::Sty => load_store::execute_sty(cpu, bus),

        Mnemonic::Inc => inc_dec::execute_inc(cpu, bus),
        Mnemonic::Dec => inc_dec::execute_dec(cpu, bus),
        Mnemonic::Inx => inc_dec::execute_inx(cpu),
        Mnemonic::Iny => inc_dec::execute_iny(cpu),
        Mnemonic::Dex => inc_dec::execute_dex(cpu),
        Mnemonic::Dey => inc_dec::execute_dey(cpu),

        Mnemonic::Jmp => control::execute_jmp(cpu),
        Mnemonic::Jsr => control::execute_jsr(cpu, bus),
        Mnemonic::Rts => control::execute_rts(cpu, bus),
        Mnemonic::Rti => control::execute_rti(cpu, bus),
        Mnemonic::Brk => control::execute_brk(cpu, bus),
        Mnemonic::Nop => control::execute_nop(cpu, bus),

        Mnemonic::Pha => stack::execute_pha(cpu, bus),
        Mnemonic::Php => stack::execute_php(cpu, bus),
        Mnemonic::Pla => stack::execute_pla(cpu, bus),
        Mnemonic::Plp => stack::execute_plp(cpu, bus),

        Mnemonic::Clc => flags::execute_clc(cpu),
        Mnemonic::Sec => flags::execute_sec(cpu),
        Mnemonic::Cli => flags::execute_cli(cpu),
        Mnemonic::Sei => flags::execute_sei(cpu),
        Mnemonic::Cld => flags::execute_cld(cpu),
        Mnemonic::Sed => flags::execute_sed(cpu),
        Mnemonic::Clv => flags::execute_clv(cpu),

        Mnemonic::Tax => transfer::execute_tax(cpu),
        Mnemonic::Tay => transfer::execute_tay(cpu),
        Mnemonic::Txa => transfer::execute_txa(cpu),
        Mnemonic::Tya => transfer::execute_tya(cpu),
        Mnemonic::Tsx => transfer::execute_tsx(cpu),
        Mnemonic::Txs => transfer::execute_txs(cpu),

        Mnemonic::Slo => undocumented::execute_slo(cpu, bus),
        Mnemonic::Rla => undocumented::execute_rla(cpu, bus),
        Mnemonic::Sre => undocumented::execute_sre(cpu, bus),
        Mnemonic::Rra => undocumented::execute_rra(cpu, bus, decimal_mode),
        Mnemonic::Sax => undocumented::execute_sax(cpu, bus),
        Mnemonic::Lax => undocumented::execute_lax(cpu, bus),
        Mnemonic::Dcp => undocumented::execute_dcp(cpu, bus),
        Mnemonic::Isc => undocumented::execute_isc(cpu, bus, decimal_mode),
        Mnemonic::Anc => undocumented::execute_anc(cpu, bus),
        Mnemonic::Alr => undocumented::execute_alr(cpu, bus),
        Mnemonic::Arr => undocumented::execute_arr(cpu, bus),
        Mnemonic::Ane => undocumented::execute_ane(cpu, bus),
        Mnemonic::Lxa => undocumented::execute_lxa(cpu, bus),
        Mnemonic::Sbx => undocumented::execute_sbx(cpu, bus),
        Mnemonic::Usbc => alu::execute_sbc(cpu, bus, decimal_mode),
        Mnemonic::Sha => undocumented::execute_sha(cpu, bus),
        Mnemonic::Shx => undocumented::execute_shx(cpu, bus),
        Mnemonic::Shy => undocumented::execute_shy(cpu, bus),
        Mnemonic::Tas => undocumented::execute_tas(cpu, bus),
        Mnemonic::Las => undocumented::execute_las(cpu, bus),
        Mnemonic::Jam => undocumented::execute_jam(cpu),
    }

    0
}

/// Read-modify-write helper shared by shifts, INC/DEC and their undocumented
/// combinations.
///
/// Applies `op` to the operand and writes the result back: to A in accumulator
/// mode, otherwise to memory. Memory targets see the NMOS double write (the
/// unmodified value first, then the result). Returns the result.
pub(crate) fn read_modify_write<M: MemoryBus>(
    cpu: &mut CpuState,
    bus: &mut M,
    op: impl FnOnce(&mut CpuState, u8) -> u8,
) -> u8 {
    let value = cpu.fetch(bus);
    let result = op(cpu, value);

    if cpu.mode == AddressingMode::Accumulator {
        cpu.a = result;
    } else {
        bus.write(cpu.addr_abs, value);
        bus.write(cpu.addr_abs, result);
    }

    result
}
