//! # Status Register
//!
//! The 6502 keeps its condition codes in a single 8-bit register (P). Every
//! bit is stored, including the two that have no latch on real silicon
//! (B and the unused bit 5), because they become visible whenever the
//! register is pushed to the stack.

use bitflags::bitflags;

bitflags! {
    /// Processor status register (P).
    ///
    /// | Bit | Mask | Name                | Meaning                                   |
    /// |-----|------|---------------------|-------------------------------------------|
    /// | 7   | 0x80 | `NEGATIVE`          | Bit 7 of the last result                  |
    /// | 6   | 0x40 | `OVERFLOW`          | Signed overflow                           |
    /// | 5   | 0x20 | `UNUSED`            | Reads back as 1                           |
    /// | 4   | 0x10 | `BREAK`             | Set in bytes pushed by BRK/PHP            |
    /// | 3   | 0x08 | `DECIMAL`           | BCD arithmetic for ADC/SBC                |
    /// | 2   | 0x04 | `INTERRUPT_DISABLE` | Masks IRQ (not NMI)                       |
    /// | 1   | 0x02 | `ZERO`              | Last result was zero                      |
    /// | 0   | 0x01 | `CARRY`             | Unsigned carry / not-borrow               |
    ///
    /// # Examples
    ///
    /// ```
    /// use cpu6502::Status;
    ///
    /// let p = Status::from_bits_retain(0x24);
    /// assert!(p.contains(Status::INTERRUPT_DISABLE | Status::UNUSED));
    /// assert!(!p.contains(Status::CARRY));
    /// ```
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        const CARRY = 0b0000_0001;
        const ZERO = 0b0000_0010;
        const INTERRUPT_DISABLE = 0b0000_0100;
        const DECIMAL = 0b0000_1000;
        const BREAK = 0b0001_0000;
        const UNUSED = 0b0010_0000;
        const OVERFLOW = 0b0100_0000;
        const NEGATIVE = 0b1000_0000;
    }
}

impl Status {
    /// Status as it appears after a pull (PLP/RTI): B has no latch and the
    /// unused bit always reads back as 1.
    pub(crate) fn pulled(byte: u8) -> Self {
        (Self::from_bits_retain(byte) - Self::BREAK) | Self::UNUSED
    }

    /// Status byte pushed by BRK and PHP (B and unused both set).
    pub(crate) fn pushed_by_software(self) -> u8 {
        (self | Self::BREAK | Self::UNUSED).bits()
    }

    /// Status byte pushed by a hardware interrupt (B clear, unused set).
    pub(crate) fn pushed_by_hardware(self) -> u8 {
        ((self - Self::BREAK) | Self::UNUSED).bits()
    }
}
