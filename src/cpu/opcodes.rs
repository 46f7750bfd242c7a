//! Static descriptor table for all 256 opcode bytes.
//!
//! Covers the full documented 6502 instruction set plus the
//! undocumented opcodes (JAM, SLO, ANC, the NOP variants, RLA, RRA,
//! SRE, SAX, LAX, DCP, ISB, SBX, LAS, LXA, ALR, ARR, ANE, TAS, SHA,
//! SHX, SHY, USBC). Indexed directly by the opcode byte; the table is
//! the single source of truth for instruction length and base cycle
//! counts, shared by the CPU dispatcher, the assembler, and the trace
//! formatter.
//!
//! Full reference: http://www.6502.org/tutorials/6502opcodes.html and
//! https://www.nesdev.org/wiki/CPU_unofficial_opcodes

use std::fmt;
use std::str::FromStr;

/// How an opcode's operand bytes become an effective address.
///
/// Accumulator forms of the shift/rotate instructions use `Implied`
/// (single-byte instructions with no memory operand).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand.
    Implied,
    /// The operand byte is the value itself.
    Immediate,
    /// One-byte address into the first page.
    Zeropage,
    /// Zero-page address plus X, wrapping within the page.
    ZeropageX,
    /// Zero-page address plus Y, wrapping within the page.
    ZeropageY,
    /// Full two-byte address.
    Absolute,
    /// Absolute address plus X.
    AbsoluteX,
    /// Absolute address plus Y.
    AbsoluteY,
    /// Signed one-byte offset from the next instruction.
    Relative,
    /// Two-byte address of a pointer (JMP only).
    Indirect,
    /// Zero-page pointer at (operand + X).
    IndirectX,
    /// Zero-page pointer at operand, plus Y after dereference.
    IndirectY,
}

/// Logical operation names, documented and undocumented.
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    ADC, AND, ASL, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS,
    CLC, CLD, CLI, CLV, CMP, CPX, CPY, DEC, DEX, DEY, EOR, INC, INX,
    INY, JMP, JSR, LDA, LDX, LDY, LSR, NOP, ORA, PHA, PHP, PLA, PLP,
    ROL, ROR, RTI, RTS, SBC, SEC, SED, SEI, STA, STX, STY, TAX, TAY,
    TSX, TXA, TXS, TYA,
    // Undocumented
    ALR, ANC, ANE, ARR, DCP, ISB, JAM, LAS, LAX, LXA, RLA, RRA, SAX,
    SBX, SHA, SHX, SHY, SLO, SRE, TAS, USBC,
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Mnemonic {
    type Err = ();

    #[rustfmt::skip]
    fn from_str(s: &str) -> Result<Self, ()> {
        use Mnemonic::*;
        Ok(match s {
            "ADC" => ADC, "AND" => AND, "ASL" => ASL, "BCC" => BCC,
            "BCS" => BCS, "BEQ" => BEQ, "BIT" => BIT, "BMI" => BMI,
            "BNE" => BNE, "BPL" => BPL, "BRK" => BRK, "BVC" => BVC,
            "BVS" => BVS, "CLC" => CLC, "CLD" => CLD, "CLI" => CLI,
            "CLV" => CLV, "CMP" => CMP, "CPX" => CPX, "CPY" => CPY,
            "DEC" => DEC, "DEX" => DEX, "DEY" => DEY, "EOR" => EOR,
            "INC" => INC, "INX" => INX, "INY" => INY, "JMP" => JMP,
            "JSR" => JSR, "LDA" => LDA, "LDX" => LDX, "LDY" => LDY,
            "LSR" => LSR, "NOP" => NOP, "ORA" => ORA, "PHA" => PHA,
            "PHP" => PHP, "PLA" => PLA, "PLP" => PLP, "ROL" => ROL,
            "ROR" => ROR, "RTI" => RTI, "RTS" => RTS, "SBC" => SBC,
            "SEC" => SEC, "SED" => SED, "SEI" => SEI, "STA" => STA,
            "STX" => STX, "STY" => STY, "TAX" => TAX, "TAY" => TAY,
            "TSX" => TSX, "TXA" => TXA, "TXS" => TXS, "TYA" => TYA,
            "ALR" => ALR, "ANC" => ANC, "ANE" => ANE, "ARR" => ARR,
            "DCP" => DCP, "ISB" => ISB, "JAM" => JAM, "LAS" => LAS,
            "LAX" => LAX, "LXA" => LXA, "RLA" => RLA, "RRA" => RRA,
            "SAX" => SAX, "SBX" => SBX, "SHA" => SHA, "SHX" => SHX,
            "SHY" => SHY, "SLO" => SLO, "SRE" => SRE, "TAS" => TAS,
            "USBC" => USBC,
            _ => return Err(()),
        })
    }
}

/// Not part of the documented instruction set.
pub const ILLEGAL: u8 = 1;
/// Result depends on analog chip state; real behavior varies by unit.
pub const UNSTABLE: u8 = 2;
/// Unstable even between runs on the same unit.
pub const HIGHLY_UNSTABLE: u8 = 4;
/// Crossing a page boundary during operand resolution costs one cycle.
pub const PAGE_CROSS: u8 = 8;

/// One entry of the instruction table.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    /// The machine-code byte; equals this entry's table index.
    pub code: u8,
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    /// Total instruction length in bytes (opcode + operands).
    pub len: u8,
    /// Base cycle count, before page-cross and branch penalties.
    pub cycles: u8,
    pub flags: u8,
}

impl Opcode {
    pub fn is_illegal(&self) -> bool {
        self.flags & ILLEGAL != 0
    }

    pub fn adds_cycle_on_page_cross(&self) -> bool {
        self.flags & PAGE_CROSS != 0
    }
}

const fn op(
    code: u8,
    mnemonic: Mnemonic,
    mode: AddressingMode,
    len: u8,
    cycles: u8,
    flags: u8,
) -> Opcode {
    Opcode {
        code,
        mnemonic,
        mode,
        len,
        cycles,
        flags,
    }
}

use AddressingMode::*;
use Mnemonic::*;

/// The complete table, one descriptor per possible first byte.
///
/// Lengths and cycle counts reproduce the datasheet; a few entries for
/// highly unstable opcodes (0xAB, 0xB2) carry the odd lengths real
/// sixth-generation dumps report for them.
#[rustfmt::skip]
pub static OPCODES: [Opcode; 256] = [
    op(0x00, BRK, Implied, 1, 7, 0),
    op(0x01, ORA, IndirectX, 2, 6, 0),
    op(0x02, JAM, Immediate, 1, 0, ILLEGAL),
    op(0x03, SLO, IndirectX, 2, 8, ILLEGAL),
    op(0x04, NOP, Zeropage, 2, 3, ILLEGAL),
    op(0x05, ORA, Zeropage, 2, 3, 0),
    op(0x06, ASL, Zeropage, 2, 5, 0),
    op(0x07, SLO, Zeropage, 2, 5, ILLEGAL),
    op(0x08, PHP, Implied, 1, 3, 0),
    op(0x09, ORA, Immediate, 2, 2, 0),
    op(0x0A, ASL, Implied, 1, 2, 0),
    op(0x0B, ANC, Immediate, 2, 2, ILLEGAL),
    op(0x0C, NOP, Absolute, 3, 4, ILLEGAL),
    op(0x0D, ORA, Absolute, 3, 4, 0),
    op(0x0E, ASL, Absolute, 3, 6, 0),
    op(0x0F, SLO, Absolute, 3, 6, ILLEGAL),
    op(0x10, BPL, Relative, 2, 2, 0),
    op(0x11, ORA, IndirectY, 2, 5, PAGE_CROSS),
    op(0x12, JAM, Immediate, 1, 0, ILLEGAL),
    op(0x13, SLO, IndirectY, 2, 8, ILLEGAL),
    op(0x14, NOP, ZeropageX, 2, 4, ILLEGAL),
    op(0x15, ORA, ZeropageX, 2, 4, 0),
    op(0x16, ASL, ZeropageX, 2, 6, 0),
    op(0x17, SLO, ZeropageX, 2, 6, ILLEGAL),
    op(0x18, CLC, Implied, 1, 2, 0),
    op(0x19, ORA, AbsoluteY, 3, 4, PAGE_CROSS),
    op(0x1A, NOP, Implied, 1, 2, ILLEGAL),
    op(0x1B, SLO, AbsoluteY, 3, 7, ILLEGAL),
    op(0x1C, NOP, AbsoluteX, 3, 4, ILLEGAL | PAGE_CROSS),
    op(0x1D, ORA, AbsoluteX, 3, 4, PAGE_CROSS),
    op(0x1E, ASL, AbsoluteX, 3, 7, 0),
    op(0x1F, SLO, AbsoluteX, 3, 7, ILLEGAL),
    op(0x20, JSR, Absolute, 3, 6, 0),
    op(0x21, AND, IndirectX, 2, 6, 0),
    op(0x22, JAM, Immediate, 1, 0, ILLEGAL),
    op(0x23, RLA, IndirectX, 2, 8, ILLEGAL),
    op(0x24, BIT, Zeropage, 2, 3, 0),
    op(0x25, AND, Zeropage, 2, 3, 0),
    op(0x26, ROL, Zeropage, 2, 5, 0),
    op(0x27, RLA, Zeropage, 2, 5, ILLEGAL),
    op(0x28, PLP, Implied, 1, 4, 0),
    op(0x29, AND, Immediate, 2, 2, 0),
    op(0x2A, ROL, Implied, 1, 2, 0),
    op(0x2B, ANC, Immediate, 2, 2, ILLEGAL),
    op(0x2C, BIT, Absolute, 3, 4, 0),
    op(0x2D, AND, Absolute, 3, 4, 0),
    op(0x2E, ROL, Absolute, 3, 6, 0),
    op(0x2F, RLA, Absolute, 3, 6, ILLEGAL),
    op(0x30, BMI, Relative, 2, 2, 0),
    op(0x31, AND, IndirectY, 2, 5, PAGE_CROSS),
    op(0x32, JAM, Immediate, 1, 0, ILLEGAL),
    op(0x33, RLA, IndirectY, 2, 8, ILLEGAL),
    op(0x34, NOP, ZeropageX, 2, 4, ILLEGAL),
    op(0x35, AND, ZeropageX, 2, 4, 0),
    op(0x36, ROL, ZeropageX, 2, 6, 0),
    op(0x37, RLA, ZeropageX, 2, 6, ILLEGAL),
    op(0x38, SEC, Implied, 1, 2, 0),
    op(0x39, AND, AbsoluteY, 3, 4, PAGE_CROSS),
    op(0x3A, NOP, Implied, 1, 2, ILLEGAL),
    op(0x3B, RLA, AbsoluteY, 3, 7, ILLEGAL),
    op(0x3C, NOP, AbsoluteX, 3, 4, ILLEGAL | PAGE_CROSS),
    op(0x3D, AND, AbsoluteX, 3, 4, PAGE_CROSS),
    op(0x3E, ROL, AbsoluteX, 3, 7, 0),
    op(0x3F, RLA, AbsoluteX, 3, 7, ILLEGAL),
    op(0x40, RTI, Implied, 1, 6, 0),
    op(0x41, EOR, IndirectX, 2, 6, 0),
    op(0x42, JAM, Immediate, 1, 0, ILLEGAL),
    op(0x43, SRE, IndirectX, 2, 8, ILLEGAL),
    op(0x44, NOP, Zeropage, 2, 3, ILLEGAL),
    op(0x45, EOR, Zeropage, 2, 3, 0),
    op(0x46, LSR, Zeropage, 2, 5, 0),
    op(0x47, SRE, Zeropage, 2, 5, ILLEGAL),
    op(0x48, PHA, Implied, 1, 3, 0),
    op(0x49, EOR, Immediate, 2, 2, 0),
    op(0x4A, LSR, Implied, 1, 2, 0),
    op(0x4B, ALR, Immediate, 2, 2, ILLEGAL),
    op(0x4C, JMP, Absolute, 3, 3, 0),
    op(0x4D, EOR, Absolute, 3, 4, 0),
    op(0x4E, LSR, Absolute, 3, 6, 0),
    op(0x4F, SRE, Absolute, 3, 6, ILLEGAL),
    op(0x50, BVC, Relative, 2, 2, 0),
    op(0x51, EOR, IndirectY, 2, 5, PAGE_CROSS),
    op(0x52, JAM, Immediate, 1, 0, ILLEGAL),
    op(0x53, SRE, IndirectY, 2, 8, ILLEGAL),
    op(0x54, NOP, ZeropageX, 2, 4, ILLEGAL),
    op(0x55, EOR, ZeropageX, 2, 4, 0),
    op(0x56, LSR, ZeropageX, 2, 6, 0),
    op(0x57, SRE, ZeropageX, 2, 6, ILLEGAL),
    op(0x58, CLI, Implied, 1, 2, 0),
    op(0x59, EOR, AbsoluteY, 3, 4, PAGE_CROSS),
    op(0x5A, NOP, Implied, 1, 2, ILLEGAL),
    op(0x5B, SRE, AbsoluteY, 3, 7, ILLEGAL),
    op(0x5C, NOP, AbsoluteX, 3, 4, ILLEGAL | PAGE_CROSS),
    op(0x5D, EOR, AbsoluteX, 3, 4, PAGE_CROSS),
    op(0x5E, LSR, AbsoluteX, 3, 7, 0),
    op(0x5F, SRE, AbsoluteX, 3, 7, ILLEGAL),
    op(0x60, RTS, Implied, 1, 6, 0),
    op(0x61, ADC, IndirectX, 2, 6, 0),
    op(0x62, JAM, Immediate, 1, 0, ILLEGAL),
    op(0x63, RRA, IndirectX, 2, 8, ILLEGAL),
    op(0x64, NOP, Zeropage, 2, 3, ILLEGAL),
    op(0x65, ADC, Zeropage, 2, 3, 0),
    op(0x66, ROR, Zeropage, 2, 5, 0),
    op(0x67, RRA, Zeropage, 2, 5, ILLEGAL),
    op(0x68, PLA, Implied, 1, 4, 0),
    op(0x69, ADC, Immediate, 2, 2, 0),
    op(0x6A, ROR, Implied, 1, 2, 0),
    op(0x6B, ARR, Immediate, 2, 2, ILLEGAL),
    op(0x6C, JMP, Indirect, 3, 5, 0),
    op(0x6D, ADC, Absolute, 3, 4, 0),
    op(0x6E, ROR, Absolute, 3, 6, 0),
    op(0x6F, RRA, Absolute, 3, 6, ILLEGAL),
    op(0x70, BVS, Relative, 2, 2, 0),
    op(0x71, ADC, IndirectY, 2, 5, PAGE_CROSS),
    op(0x72, JAM, Immediate, 1, 0, ILLEGAL),
    op(0x73, RRA, IndirectY, 2, 8, ILLEGAL),
    op(0x74, NOP, ZeropageX, 2, 4, ILLEGAL),
    op(0x75, ADC, ZeropageX, 2, 4, 0),
    op(0x76, ROR, ZeropageX, 2, 6, 0),
    op(0x77, RRA, ZeropageX, 2, 6, ILLEGAL),
    op(0x78, SEI, Implied, 1, 2, 0),
    op(0x79, ADC, AbsoluteY, 3, 4, PAGE_CROSS),
    op(0x7A, NOP, Implied, 1, 2, ILLEGAL),
    op(0x7B, RRA, AbsoluteY, 3, 7, ILLEGAL),
    op(0x7C, NOP, AbsoluteX, 3, 4, ILLEGAL | PAGE_CROSS),
    op(0x7D, ADC, AbsoluteX, 3, 4, PAGE_CROSS),
    op(0x7E, ROR, AbsoluteX, 3, 7, 0),
    op(0x7F, RRA, AbsoluteX, 3, 7, ILLEGAL),
    op(0x80, NOP, Immediate, 2, 2, ILLEGAL),
    op(0x81, STA, IndirectX, 2, 6, 0),
    op(0x82, NOP, Immediate, 2, 2, ILLEGAL),
    op(0x83, SAX, IndirectX, 2, 6, ILLEGAL),
    op(0x84, STY, Zeropage, 2, 3, 0),
    op(0x85, STA, Zeropage, 2, 3, 0),
    op(0x86, STX, Zeropage, 2, 3, 0),
    op(0x87, SAX, Zeropage, 2, 3, ILLEGAL),
    op(0x88, DEY, Implied, 1, 2, 0),
    op(0x89, NOP, Immediate, 2, 2, ILLEGAL),
    op(0x8A, TXA, Implied, 1, 2, 0),
    op(0x8B, ANE, Immediate, 2, 2, ILLEGAL | HIGHLY_UNSTABLE),
    op(0x8C, STY, Absolute, 3, 4, 0),
    op(0x8D, STA, Absolute, 3, 4, 0),
    op(0x8E, STX, Absolute, 3, 4, 0),
    op(0x8F, SAX, Absolute, 3, 4, ILLEGAL),
    op(0x90, BCC, Relative, 2, 2, 0),
    op(0x91, STA, IndirectY, 2, 6, 0),
    op(0x92, JAM, Immediate, 1, 0, ILLEGAL),
    op(0x93, SHA, IndirectY, 2, 6, ILLEGAL | UNSTABLE),
    op(0x94, STY, ZeropageX, 2, 4, 0),
    op(0x95, STA, ZeropageX, 2, 4, 0),
    op(0x96, STX, ZeropageY, 2, 4, 0),
    op(0x97, SAX, ZeropageY, 2, 4, ILLEGAL),
    op(0x98, TYA, Implied, 1, 2, 0),
    op(0x99, STA, AbsoluteY, 3, 5, 0),
    op(0x9A, TXS, Implied, 1, 2, 0),
    op(0x9B, TAS, AbsoluteY, 3, 5, ILLEGAL | UNSTABLE),
    op(0x9C, SHY, AbsoluteX, 3, 5, ILLEGAL | UNSTABLE),
    op(0x9D, STA, AbsoluteX, 3, 5, 0),
    op(0x9E, SHX, AbsoluteY, 3, 5, ILLEGAL | UNSTABLE),
    op(0x9F, SHA, AbsoluteY, 3, 5, ILLEGAL | UNSTABLE),
    op(0xA0, LDY, Immediate, 2, 2, 0),
    op(0xA1, LDA, IndirectX, 2, 6, 0),
    op(0xA2, LDX, Immediate, 2, 2, 0),
    op(0xA3, LAX, IndirectX, 2, 6, ILLEGAL),
    op(0xA4, LDY, Zeropage, 2, 3, 0),
    op(0xA5, LDA, Zeropage, 2, 3, 0),
    op(0xA6, LDX, Zeropage, 2, 3, 0),
    op(0xA7, LAX, Zeropage, 2, 3, ILLEGAL),
    op(0xA8, TAY, Implied, 1, 2, 0),
    op(0xA9, LDA, Immediate, 2, 2, 0),
    op(0xAA, TAX, Implied, 1, 2, 0),
    op(0xAB, LXA, Immediate, 1, 2, ILLEGAL | HIGHLY_UNSTABLE),
    op(0xAC, LDY, Absolute, 3, 4, 0),
    op(0xAD, LDA, Absolute, 3, 4, 0),
    op(0xAE, LDX, Absolute, 3, 4, 0),
    op(0xAF, LAX, Absolute, 3, 4, ILLEGAL),
    op(0xB0, BCS, Relative, 2, 2, 0),
    op(0xB1, LDA, IndirectY, 2, 5, PAGE_CROSS),
    op(0xB2, SHA, Immediate, 1, 0, ILLEGAL | UNSTABLE),
    op(0xB3, LAX, IndirectY, 2, 5, ILLEGAL | PAGE_CROSS),
    op(0xB4, LDY, ZeropageX, 2, 4, 0),
    op(0xB5, LDA, ZeropageX, 2, 4, 0),
    op(0xB6, LDX, ZeropageY, 2, 4, 0),
    op(0xB7, LAX, ZeropageY, 2, 4, ILLEGAL),
    op(0xB8, CLV, Implied, 1, 2, 0),
    op(0xB9, LDA, AbsoluteY, 3, 4, PAGE_CROSS),
    op(0xBA, TSX, Implied, 1, 2, 0),
    op(0xBB, LAS, AbsoluteY, 3, 4, ILLEGAL),
    op(0xBC, LDY, AbsoluteX, 3, 4, PAGE_CROSS),
    op(0xBD, LDA, AbsoluteX, 3, 4, PAGE_CROSS),
    op(0xBE, LDX, AbsoluteY, 3, 4, PAGE_CROSS),
    op(0xBF, LAX, AbsoluteY, 3, 4, ILLEGAL | PAGE_CROSS),
    op(0xC0, CPY, Immediate, 2, 2, 0),
    op(0xC1, CMP, IndirectX, 2, 6, 0),
    op(0xC2, NOP, Immediate, 2, 2, ILLEGAL),
    op(0xC3, DCP, IndirectX, 2, 8, ILLEGAL),
    op(0xC4, CPY, Zeropage, 2, 3, 0),
    op(0xC5, CMP, Zeropage, 2, 3, 0),
    op(0xC6, DEC, Zeropage, 2, 5, 0),
    op(0xC7, DCP, Zeropage, 2, 5, ILLEGAL),
    op(0xC8, INY, Implied, 1, 2, 0),
    op(0xC9, CMP, Immediate, 2, 2, 0),
    op(0xCA, DEX, Implied, 1, 2, 0),
    op(0xCB, SBX, Immediate, 2, 2, ILLEGAL),
    op(0xCC, CPY, Absolute, 3, 4, 0),
    op(0xCD, CMP, Absolute, 3, 4, 0),
    op(0xCE, DEC, Absolute, 3, 6, 0),
    op(0xCF, DCP, Absolute, 3, 6, ILLEGAL),
    op(0xD0, BNE, Relative, 2, 2, 0),
    op(0xD1, CMP, IndirectY, 2, 5, PAGE_CROSS),
    op(0xD2, JAM, Immediate, 1, 0, ILLEGAL),
    op(0xD3, DCP, IndirectY, 2, 8, ILLEGAL),
    op(0xD4, NOP, ZeropageX, 2, 4, ILLEGAL),
    op(0xD5, CMP, ZeropageX, 2, 4, 0),
    op(0xD6, DEC, ZeropageX, 2, 6, 0),
    op(0xD7, DCP, ZeropageX, 2, 6, ILLEGAL),
    op(0xD8, CLD, Implied, 1, 2, 0),
    op(0xD9, CMP, AbsoluteY, 3, 4, PAGE_CROSS),
    op(0xDA, NOP, Implied, 1, 2, ILLEGAL),
    op(0xDB, DCP, AbsoluteY, 3, 7, ILLEGAL),
    op(0xDC, NOP, AbsoluteX, 3, 4, ILLEGAL | PAGE_CROSS),
    op(0xDD, CMP, AbsoluteX, 3, 4, PAGE_CROSS),
    op(0xDE, DEC, AbsoluteX, 3, 7, 0),
    op(0xDF, DCP, AbsoluteX, 3, 7, ILLEGAL),
    op(0xE0, CPX, Immediate, 2, 2, 0),
    op(0xE1, SBC, IndirectX, 2, 6, 0),
    op(0xE2, NOP, Immediate, 2, 2, ILLEGAL),
    op(0xE3, ISB, IndirectX, 2, 8, ILLEGAL),
    op(0xE4, CPX, Zeropage, 2, 3, 0),
    op(0xE5, SBC, Zeropage, 2, 3, 0),
    op(0xE6, INC, Zeropage, 2, 5, 0),
    op(0xE7, ISB, Zeropage, 2, 5, ILLEGAL),
    op(0xE8, INX, Implied, 1, 2, 0),
    op(0xE9, SBC, Immediate, 2, 2, 0),
    op(0xEA, NOP, Implied, 1, 2, 0),
    op(0xEB, USBC, Immediate, 2, 2, ILLEGAL),
    op(0xEC, CPX, Absolute, 3, 4, 0),
    op(0xED, SBC, Absolute, 3, 4, 0),
    op(0xEE, INC, Absolute, 3, 6, 0),
    op(0xEF, ISB, Absolute, 3, 6, ILLEGAL),
    op(0xF0, BEQ, Relative, 2, 2, 0),
    op(0xF1, SBC, IndirectY, 2, 5, PAGE_CROSS),
    op(0xF2, JAM, Immediate, 1, 0, ILLEGAL),
    op(0xF3, ISB, IndirectY, 2, 8, ILLEGAL),
    op(0xF4, NOP, ZeropageX, 2, 4, ILLEGAL),
    op(0xF5, SBC, ZeropageX, 2, 4, 0),
    op(0xF6, INC, ZeropageX, 2, 6, 0),
    op(0xF7, ISB, ZeropageX, 2, 6, ILLEGAL),
    op(0xF8, SED, Implied, 1, 2, 0),
    op(0xF9, SBC, AbsoluteY, 3, 4, PAGE_CROSS),
    op(0xFA, NOP, Implied, 1, 2, ILLEGAL),
    op(0xFB, ISB, AbsoluteY, 3, 7, ILLEGAL),
    op(0xFC, NOP, AbsoluteX, 3, 4, ILLEGAL | PAGE_CROSS),
    op(0xFD, SBC, AbsoluteX, 3, 4, PAGE_CROSS),
    op(0xFE, INC, AbsoluteX, 3, 7, 0),
    op(0xFF, ISB, AbsoluteX, 3, 7, ILLEGAL),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_matches_index() {
        for (i, opcode) in OPCODES.iter().enumerate() {
            assert_eq!(opcode.code as usize, i);
        }
    }

    #[test]
    fn lengths_are_sane() {
        for opcode in OPCODES.iter() {
            assert!((1..=3).contains(&opcode.len), "opcode {:02X}", opcode.code);
        }
    }

    #[test]
    fn documented_opcodes_are_not_flagged_illegal() {
        for code in [0xA9u8, 0x8D, 0x4C, 0x00, 0xEA, 0x69, 0xC9, 0xF0] {
            assert!(!OPCODES[code as usize].is_illegal(), "{code:02X}");
        }
    }

    #[test]
    fn undocumented_opcodes_are_flagged_illegal() {
        for code in [0x02u8, 0x03, 0x1A, 0x8B, 0xAB, 0xCB, 0xEB] {
            assert!(OPCODES[code as usize].is_illegal(), "{code:02X}");
        }
    }

    #[test]
    fn page_cross_flag_marks_indexed_loads() {
        assert!(OPCODES[0xBD].adds_cycle_on_page_cross()); // LDA abs,X
        assert!(OPCODES[0xB1].adds_cycle_on_page_cross()); // LDA (zp),Y
        assert!(!OPCODES[0x9D].adds_cycle_on_page_cross()); // STA abs,X
        assert!(!OPCODES[0x91].adds_cycle_on_page_cross()); // STA (zp),Y
    }

    #[test]
    fn mnemonic_parses_from_canonical_spelling() {
        assert_eq!("LDA".parse::<Mnemonic>(), Ok(Mnemonic::LDA));
        assert_eq!("USBC".parse::<Mnemonic>(), Ok(Mnemonic::USBC));
        assert!("XYZ".parse::<Mnemonic>().is_err());
    }
}
