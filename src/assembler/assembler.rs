//! Two-pass assembly: resolve opcodes and label addresses, then emit
//! the byte stream.
//!
//! Pass 1 walks the parsed instructions with a simulated PC starting
//! at [`ORIGIN`], picking each instruction's opcode so its length is
//! known and recording the PC of attached labels. Pass 2 emits opcode
//! and operand bytes; label references become absolute little-endian
//! addresses, or signed offsets from the following instruction for
//! branches.

use std::collections::HashMap;

use crate::assembler::parser::{parse, Instruction, Operand, OperandKind, Value};
use crate::assembler::scanner::Scanner;
use crate::assembler::ParseError;
use crate::cpu::opcodes::{AddressingMode, Opcode, OPCODES};

/// Assembled programs load at the start of PRG ROM.
pub const ORIGIN: u16 = 0x8000;

pub fn assemble(input: &str) -> Result<Vec<u8>, ParseError> {
    let mut scanner = Scanner::new(input)?;
    let program = parse(&mut scanner)?;

    // Pass 1: fix every instruction's opcode and collect label
    // addresses.
    let mut labels: HashMap<&str, u16> = HashMap::new();
    let mut resolved: Vec<(&Instruction, &'static Opcode, u16)> = Vec::new();
    let mut pc = ORIGIN;
    for instruction in &program.instructions {
        let opcode = lookup_opcode(instruction)?;
        if let Some(label) = &instruction.label {
            labels.insert(label, pc);
        }
        resolved.push((instruction, opcode, pc));
        pc = pc.wrapping_add(u16::from(opcode.len));
    }

    // Pass 2: emit.
    let mut out = Vec::new();
    for (instruction, opcode, pc) in resolved {
        out.push(opcode.code);
        match opcode.len {
            2 => out.push(operand_byte(instruction, opcode, pc, &labels)?),
            3 => {
                let word = operand_word(instruction, &labels)?;
                out.push((word & 0xFF) as u8);
                out.push((word >> 8) as u8);
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Pick the descriptor whose mnemonic and addressing mode fit the
/// instruction's operand shape. First matching table entry wins.
fn lookup_opcode(instruction: &Instruction) -> Result<&'static Opcode, ParseError> {
    for opcode in OPCODES.iter() {
        if opcode.mnemonic != instruction.mnemonic {
            continue;
        }
        let compatible = match &instruction.operand {
            None => opcode.mode == AddressingMode::Implied,
            Some(operand) => mode_compatible(operand, opcode.mode),
        };
        if compatible {
            return Ok(opcode);
        }
    }
    Err(ParseError::InvalidMode(instruction.mnemonic.to_string()))
}

fn mode_compatible(operand: &Operand, mode: AddressingMode) -> bool {
    use AddressingMode as A;
    use OperandKind as K;
    match (operand.kind, &operand.value) {
        (K::Immediate, Value::Byte(_)) => mode == A::Immediate,
        (K::Immediate, _) => false,
        // An 8-bit direct operand is a zero-page address, or the raw
        // offset of a branch. Identifier operands resolve as 16-bit
        // absolute targets, which branch emission turns into offsets.
        (K::Direct, Value::Byte(_)) => mode == A::Zeropage || mode == A::Relative,
        (K::Direct, Value::Word(_)) => mode == A::Absolute,
        (K::Direct, Value::Label(_)) => mode == A::Absolute || mode == A::Relative,
        (K::DirectX, Value::Byte(_)) => mode == A::ZeropageX,
        (K::DirectX, _) => mode == A::AbsoluteX,
        (K::DirectY, Value::Byte(_)) => mode == A::ZeropageY,
        (K::DirectY, _) => mode == A::AbsoluteY,
        (K::Indirect, Value::Word(_)) => mode == A::Indirect,
        (K::Indirect, _) => false,
        (K::IndirectX, Value::Byte(_)) => mode == A::IndirectX,
        (K::IndirectX, _) => false,
        (K::IndirectY, Value::Byte(_)) => mode == A::IndirectY,
        (K::IndirectY, _) => false,
    }
}

fn operand_byte(
    instruction: &Instruction,
    opcode: &Opcode,
    pc: u16,
    labels: &HashMap<&str, u16>,
) -> Result<u8, ParseError> {
    let operand = instruction.operand.as_ref().expect("length-2 opcode");
    match &operand.value {
        Value::Byte(byte) => Ok(*byte),
        Value::Label(name) => {
            // Only branches admit a label in a one-byte operand; emit
            // the offset from the end of this instruction.
            debug_assert_eq!(opcode.mode, AddressingMode::Relative);
            let target = resolve(name, labels)?;
            let offset = i32::from(target) - i32::from(pc.wrapping_add(2));
            if !(-128..=127).contains(&offset) {
                return Err(ParseError::BranchOutOfRange(name.clone()));
            }
            Ok(offset as i8 as u8)
        }
        Value::Word(_) => unreachable!("16-bit value never resolves to a 2-byte opcode"),
    }
}

fn operand_word(
    instruction: &Instruction,
    labels: &HashMap<&str, u16>,
) -> Result<u16, ParseError> {
    let operand = instruction.operand.as_ref().expect("length-3 opcode");
    match &operand.value {
        Value::Word(word) => Ok(*word),
        Value::Label(name) => resolve(name, labels),
        Value::Byte(_) => unreachable!("8-bit value never resolves to a 3-byte opcode"),
    }
}

fn resolve(name: &str, labels: &HashMap<&str, u16>) -> Result<u16, ParseError> {
    labels
        .get(name)
        .copied()
        .ok_or_else(|| ParseError::UnresolvedLabel(name.to_string()))
}
