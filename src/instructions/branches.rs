//! # Branch Instructions
//!
//! This module implements the conditional branch operations:
//! - BCC / BCS: Branch on Carry Clear / Set
//! - BNE / BEQ: Branch on Zero Clear / Set
//! - BPL / BMI: Branch on Negative Clear / Set
//! - BVC / BVS: Branch on Overflow Clear / Set
//!
//! All branch instructions use relative addressing with a signed 8-bit offset.
//! Cycle timing varies based on whether the branch is taken and whether a page boundary is crossed.

use crate::cpu::CpuState;
use crate::{Mnemonic, Status};

/// Executes a conditional branch.
///
/// The displacement is relative to the address following the operand (which is
/// where PC already points).
///
/// Cycle timing:
/// - base cycles if branch not taken
/// - +1 if branch taken to same page
/// - +2 if branch taken to different page
///
/// No flags are affected. Returns the extra cycles.
pub(crate) fn execute_branch(cpu: &mut CpuState, mnemonic: Mnemonic) -> u8 {
    let (flag, wanted) = match mnemonic {
        Mnemonic::Bcc => (Status::CARRY, false),
        Mnemonic::Bcs => (Status::CARRY, true),
        Mnemonic::Bne => (Status::ZERO, false),
        Mnemonic::Beq => (Status::ZERO, true),
        Mnemonic::Bpl => (Status::NEGATIVE, false),
        Mnemonic::Bmi => (Status::NEGATIVE, true),
        Mnemonic::Bvc => (Status::OVERFLOW, false),
        Mnemonic::Bvs => (Status::OVERFLOW, true),
        _ => return 0,
    };

    if cpu.get_flag(flag) != wanted {
        return 0;
    }

    let pc_after_instruction = cpu.pc;
    let target_pc = pc_after_instruction.wrapping_add(cpu.addr_rel);
    cpu.addr_abs = target_pc;
    cpu.pc = target_pc;

    if (pc_after_instruction & 0xFF00) != (target_pc & 0xFF00) {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backward_branch_across_page() {
        let mut cpu = CpuState::default();
        cpu.pc = 0x0302;
        cpu.addr_rel = (-4i8) as i16 as u16;

        assert_eq!(execute_branch(&mut cpu, Mnemonic::Bne), 2);
        assert_eq!(cpu.pc, 0x02FE);
    }

    #[test]
    fn test_not_taken_leaves_pc() {
        let mut cpu = CpuState::default();
        cpu.pc = 0x0302;
        cpu.addr_rel = 0x0010;

        assert_eq!(execute_branch(&mut cpu, Mnemonic::Beq), 0);
        assert_eq!(cpu.pc, 0x0302);
    }
}
