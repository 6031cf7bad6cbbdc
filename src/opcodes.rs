//! # Opcode Table
//!
//! This module builds the 256-entry opcode table that serves as the single source
//! of truth for instruction decoding. The table is not hand-written Rust: it is
//! parsed at CPU construction time from a declarative 16x16 matrix
//! ([`OPCODE_MATRIX`]), one text row per high nibble of the opcode.
//!
//! ## Matrix Format
//!
//! ```text
//! # comment
//! 0_ | BRK IMP 7 | ORA INDX 6 | ... sixteen cells ...
//! ```
//!
//! Each cell is `MNEMONIC MODE CYCLES`. The row label is the opcode's high
//! nibble in hex; the cell's position is the low nibble. Every one of the
//! sixteen rows must appear exactly once.
//!
//! The built-in matrix covers the whole NMOS 6502: 151 documented opcodes and the
//! 105 undocumented ones under their conventional names, so every byte value
//! decodes to something.

use crate::{AddressingMode, MatrixError};

macro_rules! mnemonics {
    ($($(#[$doc:meta])* $variant:ident => $text:literal,)*) => {
        /// Instruction mnemonic. Doubles as the dispatch tag for the
        /// operation handler.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Mnemonic {
            $($(#[$doc])* $variant,)*
        }

        impl Mnemonic {
            /// Every mnemonic the core knows how to execute.
            pub const ALL: &'static [Mnemonic] = &[$(Mnemonic::$variant,)*];

            /// Parses a matrix mnemonic token (upper case).
            pub fn from_token(token: &str) -> Option<Self> {
                match token {
                    $($text => Some(Mnemonic::$variant),)*
                    _ => None,
                }
            }

            /// The three/four-letter assembler name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Mnemonic::$variant => $text,)*
                }
            }
        }
    };
}

mnemonics! {
    Adc => "ADC",
    And => "AND",
    Asl => "ASL",
    Bcc => "BCC",
    Bcs => "BCS",
    Beq => "BEQ",
    Bit => "BIT",
    Bmi => "BMI",
    Bne => "BNE",
    Bpl => "BPL",
    Brk => "BRK",
    Bvc => "BVC",
    Bvs => "BVS",
    Clc => "CLC",
    Cld => "CLD",
    Cli => "CLI",
    Clv => "CLV",
    Cmp => "CMP",
    Cpx => "CPX",
    Cpy => "CPY",
    Dec => "DEC",
    Dex => "DEX",
    Dey => "DEY",
    Eor => "EOR",
    Inc => "INC",
    Inx => "INX",
    Iny => "INY",
    Jmp => "JMP",
    Jsr => "JSR",
    Lda => "LDA",
    Ldx => "LDX",
    Ldy => "LDY",
    Lsr => "LSR",
    Nop => "NOP",
    Ora => "ORA",
    Pha => "PHA",
    Php => "PHP",
    Pla => "PLA",
    Plp => "PLP",
    Rol => "ROL",
    Ror => "ROR",
    Rti => "RTI",
    Rts => "RTS",
    Sbc => "SBC",
    Sec => "SEC",
    Sed => "SED",
    Sei => "SEI",
    Sta => "STA",
    Stx => "STX",
    Sty => "STY",
    Tax => "TAX",
    Tay => "TAY",
    Tsx => "TSX",
    Txa => "TXA",
    Txs => "TXS",
    Tya => "TYA",
    /// ASL memory, then ORA with the result.
    Slo => "SLO",
    /// ROL memory, then AND with the result.
    Rla => "RLA",
    /// LSR memory, then EOR with the result.
    Sre => "SRE",
    /// ROR memory, then ADC with the result.
    Rra => "RRA",
    /// Store A & X.
    Sax => "SAX",
    /// Load A and X with the same value.
    Lax => "LAX",
    /// DEC memory, then CMP with the result.
    Dcp => "DCP",
    /// INC memory, then SBC with the result.
    Isc => "ISC",
    /// AND immediate, carry copied from bit 7.
    Anc => "ANC",
    /// AND immediate, then LSR A.
    Alr => "ALR",
    /// AND immediate, then ROR A with odd C/V.
    Arr => "ARR",
    /// Unstable: A = (A | magic) & X & imm.
    Ane => "ANE",
    /// Unstable: A = X = (A | magic) & imm.
    Lxa => "LXA",
    /// X = (A & X) - imm, without borrow.
    Sbx => "SBX",
    /// Undocumented duplicate of SBC immediate.
    Usbc => "USBC",
    /// Store A & X & (H + 1).
    Sha => "SHA",
    /// Store X & (H + 1).
    Shx => "SHX",
    /// Store Y & (H + 1).
    Shy => "SHY",
    /// SP = A & X, then store SP & (H + 1).
    Tas => "TAS",
    /// A = X = SP = memory & SP.
    Las => "LAS",
    /// Halts the processor until reset.
    Jam => "JAM",
}

impl Mnemonic {
    /// Read-type instructions spend an extra cycle when an indexed address
    /// crosses a page. Stores and read-modify-write instructions always pay
    /// it, so it is already part of their base cost.
    pub fn pays_page_penalty(self) -> bool {
        matches!(
            self,
            Mnemonic::Adc
                | Mnemonic::And
                | Mnemonic::Cmp
                | Mnemonic::Eor
                | Mnemonic::Lda
                | Mnemonic::Ldx
                | Mnemonic::Ldy
                | Mnemonic::Ora
                | Mnemonic::Sbc
                | Mnemonic::Lax
                | Mnemonic::Las
                | Mnemonic::Nop
        )
    }

    /// True for the conditional branches.
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Mnemonic::Bcc
                | Mnemonic::Bcs
                | Mnemonic::Beq
                | Mnemonic::Bmi
                | Mnemonic::Bne
                | Mnemonic::Bpl
                | Mnemonic::Bvc
                | Mnemonic::Bvs
        )
    }

    /// True for opcodes that are not part of the documented NMOS instruction set.
    pub fn is_undocumented(self) -> bool {
        matches!(
            self,
            Mnemonic::Slo
                | Mnemonic::Rla
                | Mnemonic::Sre
                | Mnemonic::Rra
                | Mnemonic::Sax
                | Mnemonic::Lax
                | Mnemonic::Dcp
                | Mnemonic::Isc
                | Mnemonic::Anc
                | Mnemonic::Alr
                | Mnemonic::Arr
                | Mnemonic::Ane
                | Mnemonic::Lxa
                | Mnemonic::Sbx
                | Mnemonic::Usbc
                | Mnemonic::Sha
                | Mnemonic::Shx
                | Mnemonic::Shy
                | Mnemonic::Tas
                | Mnemonic::Las
                | Mnemonic::Jam
        )
    }
}

impl std::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded description of one opcode.
///
/// # Examples
///
/// ```
/// use cpu6502::{AddressingMode, Mnemonic, OpcodeTable};
///
/// let table = OpcodeTable::nmos().unwrap();
/// let lda_imm = table.get(0xA9);
/// assert_eq!(lda_imm.mnemonic, Mnemonic::Lda);
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.base_cycles, 2);
/// assert_eq!(lda_imm.size_bytes(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Instruction mnemonic; selects the operation handler.
    pub mnemonic: Mnemonic,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Base cycle cost (before page crossing and branch penalties). Always >= 1.
    pub base_cycles: u8,
}

impl Instruction {
    /// Total instruction size in bytes (opcode + operands).
    pub fn size_bytes(&self) -> u8 {
        1 + self.addressing_mode.operand_bytes()
    }
}

/// The 256-entry decode table, indexed by opcode byte.
///
/// Built once from a matrix and read-only afterwards. Every byte value maps to
/// exactly one [`Instruction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeTable {
    // Always exactly 256 entries; `parse` refuses to build anything else.
    entries: Box<[Instruction]>,
}

impl OpcodeTable {
    /// Parses an opcode matrix (see the module docs for the format).
    ///
    /// # Errors
    ///
    /// Returns a [`MatrixError`] naming the offending row or opcode when a row
    /// label is malformed or repeated, a row is missing, a row does not have
    /// exactly sixteen cells, or a cell has an unknown mnemonic, unknown
    /// addressing-mode token or invalid cycle count.
    pub fn parse(matrix: &str) -> Result<Self, MatrixError> {
        let mut rows: [Option<[Instruction; 16]>; 16] = [None; 16];

        for (index, line) in matrix.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('|').map(str::trim);
            let label = fields.next().unwrap_or_default();
            let hi = parse_row_label(label).ok_or_else(|| MatrixError::RowLabel {
                line: index + 1,
                label: label.to_string(),
            })?;

            if rows[hi as usize].is_some() {
                return Err(MatrixError::DuplicateRow { row: hi });
            }

            let fields: Vec<&str> = fields.collect();
            if fields.len() != 16 {
                return Err(MatrixError::ColumnCount {
                    row: hi,
                    found: fields.len(),
                });
            }

            let cells = fields
                .iter()
                .enumerate()
                .map(|(lo, cell)| parse_cell((hi << 4) | lo as u8, cell))
                .collect::<Result<Vec<_>, _>>()?;
            let cells: [Instruction; 16] =
                cells
                    .try_into()
                    .map_err(|cells: Vec<Instruction>| MatrixError::ColumnCount {
                        row: hi,
                        found: cells.len(),
                    })?;

            rows[hi as usize] = Some(cells);
        }

        let mut entries = Vec::with_capacity(256);
        for (hi, row) in rows.into_iter().enumerate() {
            let row = row.ok_or(MatrixError::MissingRow { row: hi as u8 })?;
            entries.extend_from_slice(&row);
        }

        Ok(Self {
            entries: entries.into_boxed_slice(),
        })
    }

    /// Parses the built-in NMOS 6502 matrix.
    pub fn nmos() -> Result<Self, MatrixError> {
        Self::parse(OPCODE_MATRIX)
    }

    /// Looks up the descriptor for an opcode byte.
    pub fn get(&self, opcode: u8) -> &Instruction {
        &self.entries[opcode as usize]
    }

    /// Iterates `(opcode, descriptor)` pairs in opcode order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Instruction)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(opcode, instruction)| (opcode as u8, instruction))
    }
}

impl std::ops::Index<u8> for OpcodeTable {
    type Output = Instruction;

    fn index(&self, opcode: u8) -> &Instruction {
        self.get(opcode)
    }
}

impl std::str::FromStr for OpcodeTable {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `"A_"` -> `Some(0xA)`.
fn parse_row_label(label: &str) -> Option<u8> {
    let digit = label.strip_suffix('_')?;
    if digit.len() != 1 {
        return None;
    }
    u8::from_str_radix(digit, 16).ok()
}

fn parse_cell(opcode: u8, cell: &str) -> Result<Instruction, MatrixError> {
    let tokens: Vec<&str> = cell.split_whitespace().collect();
    let [mnemonic, mode, cycles] = tokens.as_slice() else {
        return Err(MatrixError::MalformedCell {
            opcode,
            cell: cell.to_string(),
        });
    };

    let mnemonic = Mnemonic::from_token(mnemonic).ok_or_else(|| MatrixError::UnknownMnemonic {
        opcode,
        token: mnemonic.to_string(),
    })?;
    let addressing_mode =
        AddressingMode::from_token(mode).ok_or_else(|| MatrixError::UnknownAddressingMode {
            opcode,
            token: mode.to_string(),
        })?;
    let base_cycles = cycles
        .parse::<u8>()
        .ok()
        .filter(|&c| c > 0)
        .ok_or_else(|| MatrixError::InvalidCycles {
            opcode,
            token: cycles.to_string(),
        })?;

    Ok(Instruction {
        mnemonic,
        addressing_mode,
        base_cycles,
    })
}

/// NMOS 6502 opcode matrix.
///
/// Cycle counts exclude page-crossing and branch penalties. JAM has no
/// meaningful timing on hardware; it is listed with 2 cycles per fetch.
pub const OPCODE_MATRIX: &str = "
# NMOS 6502 - rows are the high nibble, columns the low nibble 0..F
0_ | BRK IMP 7 | ORA INDX 6 | JAM IMP 2 | SLO INDX 8 | NOP ZP 3  | ORA ZP 3  | ASL ZP 5  | SLO ZP 5  | PHP IMP 3 | ORA IMM 2  | ASL ACC 2 | ANC IMM 2  | NOP ABS 4  | ORA ABS 4  | ASL ABS 6  | SLO ABS 6
1_ | BPL REL 2 | ORA INDY 5 | JAM IMP 2 | SLO INDY 8 | NOP ZPX 4 | ORA ZPX 4 | ASL ZPX 6 | SLO ZPX 6 | CLC IMP 2 | ORA ABSY 4 | NOP IMP 2 | SLO ABSY 7 | NOP ABSX 4 | ORA ABSX 4 | ASL ABSX 7 | SLO ABSX 7
2_ | JSR ABS 6 | AND INDX 6 | JAM IMP 2 | RLA INDX 8 | BIT ZP 3  | AND ZP 3  | ROL ZP 5  | RLA ZP 5  | PLP IMP 4 | AND IMM 2  | ROL ACC 2 | ANC IMM 2  | BIT ABS 4  | AND ABS 4  | ROL ABS 6  | RLA ABS 6
3_ | BMI REL 2 | AND INDY 5 | JAM IMP 2 | RLA INDY 8 | NOP ZPX 4 | AND ZPX 4 | ROL ZPX 6 | RLA ZPX 6 | SEC IMP 2 | AND ABSY 4 | NOP IMP 2 | RLA ABSY 7 | NOP ABSX 4 | AND ABSX 4 | ROL ABSX 7 | RLA ABSX 7
4_ | RTI IMP 6 | EOR INDX 6 | JAM IMP 2 | SRE INDX 8 | NOP ZP 3  | EOR ZP 3  | LSR ZP 5  | SRE ZP 5  | PHA IMP 3 | EOR IMM 2  | LSR ACC 2 | ALR IMM 2  | JMP ABS 3  | EOR ABS 4  | LSR ABS 6  | SRE ABS 6
5_ | BVC REL 2 | EOR INDY 5 | JAM IMP 2 | SRE INDY 8 | NOP ZPX 4 | EOR ZPX 4 | LSR ZPX 6 | SRE ZPX 6 | CLI IMP 2 | EOR ABSY 4 | NOP IMP 2 | SRE ABSY 7 | NOP ABSX 4 | EOR ABSX 4 | LSR ABSX 7 | SRE ABSX 7
6_ | RTS IMP 6 | ADC INDX 6 | JAM IMP 2 | RRA INDX 8 | NOP ZP 3  | ADC ZP 3  | ROR ZP 5  | RRA ZP 5  | PLA IMP 4 | ADC IMM 2  | ROR ACC 2 | ARR IMM 2  | JMP IND 5  | ADC ABS 4  | ROR ABS 6  | RRA ABS 6
7_ | BVS REL 2 | ADC INDY 5 | JAM IMP 2 | RRA INDY 8 | NOP ZPX 4 | ADC ZPX 4 | ROR ZPX 6 | RRA ZPX 6 | SEI IMP 2 | ADC ABSY 4 | NOP IMP 2 | RRA ABSY 7 | NOP ABSX 4 | ADC ABSX 4 | ROR ABSX 7 | RRA ABSX 7
8_ | NOP IMM 2 | STA INDX 6 | NOP IMM 2 | SAX INDX 6 | STY ZP 3  | STA ZP 3  | STX ZP 3  | SAX ZP 3  | DEY IMP 2 | NOP IMM 2  | TXA IMP 2 | ANE IMM 2  | STY ABS 4  | STA ABS 4  | STX ABS 4  | SAX ABS 4
9_ | BCC REL 2 | STA INDY 6 | JAM IMP 2 | SHA INDY 6 | STY ZPX 4 | STA ZPX 4 | STX ZPY 4 | SAX ZPY 4 | TYA IMP 2 | STA ABSY 5 | TXS IMP 2 | TAS ABSY 5 | SHY ABSX 5 | STA ABSX 5 | SHX ABSY 5 | SHA ABSY 5
A_ | LDY IMM 2 | LDA INDX 6 | LDX IMM 2 | LAX INDX 6 | LDY ZP 3  | LDA ZP 3  | LDX ZP 3  | LAX ZP 3  | TAY IMP 2 | LDA IMM 2  | TAX IMP 2 | LXA IMM 2  | LDY ABS 4  | LDA ABS 4  | LDX ABS 4  | LAX ABS 4
B_ | BCS REL 2 | LDA INDY 5 | JAM IMP 2 | LAX INDY 5 | LDY ZPX 4 | LDA ZPX 4 | LDX ZPY 4 | LAX ZPY 4 | CLV IMP 2 | LDA ABSY 4 | TSX IMP 2 | LAS ABSY 4 | LDY ABSX 4 | LDA ABSX 4 | LDX ABSY 4 | LAX ABSY 4
C_ | CPY IMM 2 | CMP INDX 6 | NOP IMM 2 | DCP INDX 8 | CPY ZP 3  | CMP ZP 3  | DEC ZP 5  | DCP ZP 5  | INY IMP 2 | CMP IMM 2  | DEX IMP 2 | SBX IMM 2  | CPY ABS 4  | CMP ABS 4  | DEC ABS 6  | DCP ABS 6
D_ | BNE REL 2 | CMP INDY 5 | JAM IMP 2 | DCP INDY 8 | NOP ZPX 4 | CMP ZPX 4 | DEC ZPX 6 | DCP ZPX 6 | CLD IMP 2 | CMP ABSY 4 | NOP IMP 2 | DCP ABSY 7 | NOP ABSX 4 | CMP ABSX 4 | DEC ABSX 7 | DCP ABSX 7
E_ | CPX IMM 2 | SBC INDX 6 | NOP IMM 2 | ISC INDX 8 | CPX ZP 3  | SBC ZP 3  | INC ZP 5  | ISC ZP 5  | INX IMP 2 | SBC IMM 2  | NOP IMP 2 | USBC IMM 2 | CPX ABS 4  | SBC ABS 4  | INC ABS 6  | ISC ABS 6
F_ | BEQ REL 2 | SBC INDY 5 | JAM IMP 2 | ISC INDY 8 | NOP ZPX 4 | SBC ZPX 4 | INC ZPX 6 | ISC ZPX 6 | SED IMP 2 | SBC ABSY 4 | NOP IMP 2 | ISC ABSY 7 | NOP ABSX 4 | SBC ABSX 4 | INC ABSX 7 | ISC ABSX 7
";
