//! Fuzz target for the opcode matrix parser.
//!
//! Arbitrary text must either parse into a full 256-entry table or return a
//! `MatrixError`; it must never panic.

#![no_main]

use cpu6502::OpcodeTable;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|matrix: &str| {
    if let Ok(table) = OpcodeTable::parse(matrix) {
        assert_eq!(table.iter().count(), 256);
        for (_, instruction) in table.iter() {
            assert!(instruction.base_cycles >= 1);
        }
    }
});
