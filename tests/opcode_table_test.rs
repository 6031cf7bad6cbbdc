//! Tests for the opcode decode table built from the opcode matrix.

use cpu6502::{
    AddressingMode, Cpu, CpuConfig, FlatMemory, MatrixError, MemoryBus, Mnemonic, OpcodeTable,
    OPCODE_MATRIX,
};

fn table() -> OpcodeTable {
    OpcodeTable::nmos().unwrap()
}

// ========== Table Completeness ==========

#[test]
fn test_table_has_256_entries() {
    let table = table();
    assert_eq!(table.iter().count(), 256);

    for (index, (opcode, _)) in table.iter().enumerate() {
        assert_eq!(opcode as usize, index);
    }
}

#[test]
fn test_every_entry_has_positive_cycles() {
    for (opcode, instruction) in table().iter() {
        assert!(
            instruction.base_cycles >= 1,
            "opcode {:02X} has zero base cycles",
            opcode
        );
    }
}

#[test]
fn test_documented_and_undocumented_counts() {
    let table = table();
    let documented = table
        .iter()
        .filter(|(_, i)| !i.mnemonic.is_undocumented())
        .count();
    let nops = table
        .iter()
        .filter(|(_, i)| i.mnemonic == Mnemonic::Nop)
        .count();

    // 151 documented opcodes plus the 27 undocumented NOP forms
    assert_eq!(documented, 151 + 27);
    assert_eq!(nops, 28);
}

#[test]
fn test_all_modes_used() {
    let table = table();
    for mode in AddressingMode::ALL {
        assert!(
            table.iter().any(|(_, i)| i.addressing_mode == mode),
            "{} never used",
            mode
        );
    }
}

// ========== Spot Checks ==========

#[test]
fn test_spot_check_entries() {
    let table = table();

    let cases: [(u8, Mnemonic, AddressingMode, u8); 12] = [
        (0x00, Mnemonic::Brk, AddressingMode::Implicit, 7),
        (0x0A, Mnemonic::Asl, AddressingMode::Accumulator, 2),
        (0x20, Mnemonic::Jsr, AddressingMode::Absolute, 6),
        (0x6C, Mnemonic::Jmp, AddressingMode::Indirect, 5),
        (0x91, Mnemonic::Sta, AddressingMode::IndirectY, 6),
        (0xA1, Mnemonic::Lda, AddressingMode::IndirectX, 6),
        (0xA9, Mnemonic::Lda, AddressingMode::Immediate, 2),
        (0xB6, Mnemonic::Ldx, AddressingMode::ZeroPageY, 4),
        (0xD0, Mnemonic::Bne, AddressingMode::Relative, 2),
        (0xEB, Mnemonic::Usbc, AddressingMode::Immediate, 2),
        (0x02, Mnemonic::Jam, AddressingMode::Implicit, 2),
        (0xA7, Mnemonic::Lax, AddressingMode::ZeroPage, 3),
    ];

    for (opcode, mnemonic, mode, cycles) in cases {
        let instruction = table[opcode];
        assert_eq!(instruction.mnemonic, mnemonic, "opcode {:02X}", opcode);
        assert_eq!(instruction.addressing_mode, mode, "opcode {:02X}", opcode);
        assert_eq!(instruction.base_cycles, cycles, "opcode {:02X}", opcode);
    }
}

#[test]
fn test_instruction_sizes() {
    let table = table();
    assert_eq!(table[0xEA].size_bytes(), 1);
    assert_eq!(table[0xA9].size_bytes(), 2);
    assert_eq!(table[0xF0].size_bytes(), 2);
    assert_eq!(table[0x4C].size_bytes(), 3);
    assert_eq!(table[0x6C].size_bytes(), 3);
}

#[test]
fn test_mnemonic_tokens() {
    for &mnemonic in Mnemonic::ALL {
        assert_eq!(Mnemonic::from_token(mnemonic.as_str()), Some(mnemonic));
        assert_eq!(mnemonic.to_string(), mnemonic.as_str());
    }
    assert_eq!(Mnemonic::from_token("lda"), None);
}

#[test]
fn test_from_str_matches_parse() {
    let parsed: OpcodeTable = OPCODE_MATRIX.parse().unwrap();
    assert_eq!(parsed, table());
}

// ========== Custom Matrices ==========

#[test]
fn test_custom_matrix_changes_timing() {
    let config = CpuConfig {
        opcode_matrix: OPCODE_MATRIX.replace("LDA IMM 2", "LDA IMM 3").into(),
        ..CpuConfig::default()
    };
    let mut cpu: Cpu<FlatMemory> = Cpu::with_config(config).unwrap();
    let mut memory = FlatMemory::new();
    memory.load(0x0000, &[0xA9, 0x42]);
    cpu.connect_bus(memory);

    assert_eq!(cpu.step().unwrap(), 3);
    assert_eq!(cpu.a(), 0x42);
}

#[test]
fn test_custom_matrix_changes_semantics() {
    // Remap 0x1A from NOP to INX
    let matrix = OPCODE_MATRIX.replace("| NOP IMP 2 | SLO ABSY 7", "| INX IMP 2 | SLO ABSY 7");
    let table = OpcodeTable::parse(&matrix).unwrap();
    assert_eq!(table[0x1A].mnemonic, Mnemonic::Inx);
    assert_eq!(table[0xEA].mnemonic, Mnemonic::Nop);

    let mut cpu: Cpu<FlatMemory> = Cpu::with_config(CpuConfig {
        opcode_matrix: matrix.into(),
        ..CpuConfig::default()
    })
    .unwrap();
    let mut memory = FlatMemory::new();
    memory.write(0x0000, 0x1A);
    cpu.connect_bus(memory);

    cpu.step().unwrap();
    assert_eq!(cpu.x(), 0x01);
}

#[test]
fn test_comments_and_blank_lines_ignored() {
    let matrix = format!("# header\n\n{}\n   \n# trailer\n", OPCODE_MATRIX);
    assert_eq!(OpcodeTable::parse(&matrix).unwrap(), table());
}

// ========== Parse Errors ==========

#[test]
fn test_unknown_addressing_mode_rejected() {
    let matrix = OPCODE_MATRIX.replace("JMP IND 5", "JMP INDIRECT 5");
    assert_eq!(
        OpcodeTable::parse(&matrix),
        Err(MatrixError::UnknownAddressingMode {
            opcode: 0x6C,
            token: "INDIRECT".to_string(),
        })
    );
}

#[test]
fn test_unknown_mnemonic_rejected() {
    let matrix = OPCODE_MATRIX.replace("BRK IMP 7", "XYZ IMP 7");
    assert_eq!(
        OpcodeTable::parse(&matrix),
        Err(MatrixError::UnknownMnemonic {
            opcode: 0x00,
            token: "XYZ".to_string(),
        })
    );
}

#[test]
fn test_zero_cycles_rejected() {
    let matrix = OPCODE_MATRIX.replace("JSR ABS 6", "JSR ABS 0");
    assert_eq!(
        OpcodeTable::parse(&matrix),
        Err(MatrixError::InvalidCycles {
            opcode: 0x20,
            token: "0".to_string(),
        })
    );
}

#[test]
fn test_missing_row_rejected() {
    let matrix: String = OPCODE_MATRIX
        .lines()
        .filter(|line| !line.starts_with("7_"))
        .map(|line| format!("{}\n", line))
        .collect();
    assert_eq!(
        OpcodeTable::parse(&matrix),
        Err(MatrixError::MissingRow { row: 7 })
    );
}

#[test]
fn test_duplicate_row_rejected() {
    let first_row = OPCODE_MATRIX
        .lines()
        .find(|line| line.starts_with("0_"))
        .unwrap();
    let matrix = format!("{}\n{}", OPCODE_MATRIX, first_row);
    assert_eq!(
        OpcodeTable::parse(&matrix),
        Err(MatrixError::DuplicateRow { row: 0 })
    );
}

#[test]
fn test_short_row_rejected() {
    let matrix = OPCODE_MATRIX.replace(" | ISC ABSX 7", "");
    assert_eq!(
        OpcodeTable::parse(&matrix),
        Err(MatrixError::ColumnCount { row: 0xF, found: 15 })
    );
}

#[test]
fn test_long_row_rejected_before_cells_parse() {
    // The extra cell is malformed; the row length is still what gets reported
    let matrix = OPCODE_MATRIX.replacen("SLO ABS 6\n", "SLO ABS 6 | ???\n", 1);
    assert_eq!(
        OpcodeTable::parse(&matrix),
        Err(MatrixError::ColumnCount { row: 0, found: 17 })
    );

    let matrix = OPCODE_MATRIX.replacen("SLO ABS 6\n", "SLO ABS 6 | NOP IMP 2\n", 1);
    assert_eq!(
        OpcodeTable::parse(&matrix),
        Err(MatrixError::ColumnCount { row: 0, found: 17 })
    );
}
