//! Parser for the assembler's line grammar.
//!
//! ```text
//! program     = { eol | instruction }
//! instruction = [label ":"] mnemonic [operand] eol
//! operand     = "#" value
//!             | value [",X" | ",Y"]
//!             | "(" value ")" [",Y"]
//!             | "(" value ",X" ")"
//! value       = hex | identifier
//! ```

use crate::assembler::scanner::{Scanner, Token};
use crate::assembler::ParseError;
use crate::cpu::opcodes::Mnemonic;

/// The syntactic shape of an operand, before addressing-mode
/// resolution against the instruction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Immediate,
    Direct,
    DirectX,
    DirectY,
    Indirect,
    IndirectX,
    IndirectY,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Byte(u8),
    Word(u16),
    /// A label reference, resolved in the assembler's second pass.
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub kind: OperandKind,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub label: Option<String>,
    pub mnemonic: Mnemonic,
    pub operand: Option<Operand>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

pub fn parse(scanner: &mut Scanner) -> Result<Program, ParseError> {
    let mut instructions = Vec::new();
    while scanner.has_input() {
        if matches!(scanner.peek(), Token::Eol) {
            // Skip blank lines.
            scanner.advance()?;
            continue;
        }
        instructions.push(instruction(scanner)?);
    }
    Ok(Program { instructions })
}

fn instruction(scanner: &mut Scanner) -> Result<Instruction, ParseError> {
    let label = if matches!(scanner.peek(), Token::Label(_)) {
        let Token::Label(name) = scanner.advance()? else {
            unreachable!();
        };
        Some(name)
    } else {
        None
    };

    let mnemonic = match scanner.advance()? {
        Token::Mnemonic(mnemonic) => mnemonic,
        Token::Ident(name) => return Err(ParseError::InvalidMnemonic(name)),
        other => {
            return Err(ParseError::UnexpectedToken {
                expected: "a mnemonic",
                found: format!("{other:?}"),
            })
        }
    };

    if matches!(scanner.peek(), Token::Eol) {
        scanner.advance()?;
        return Ok(Instruction {
            label,
            mnemonic,
            operand: None,
        });
    }

    let operand = operand(scanner)?;
    expect_eol(scanner)?;
    Ok(Instruction {
        label,
        mnemonic,
        operand: Some(operand),
    })
}

fn operand(scanner: &mut Scanner) -> Result<Operand, ParseError> {
    match scanner.advance()? {
        Token::Pound => {
            let value = expect_value(scanner)?;
            Ok(Operand {
                kind: OperandKind::Immediate,
                value,
            })
        }
        Token::ParenOpen => {
            let value = expect_value(scanner)?;
            if matches!(scanner.peek(), Token::IndexX) {
                scanner.advance()?;
                expect_paren_close(scanner)?;
                Ok(Operand {
                    kind: OperandKind::IndirectX,
                    value,
                })
            } else {
                expect_paren_close(scanner)?;
                if matches!(scanner.peek(), Token::IndexY) {
                    scanner.advance()?;
                    Ok(Operand {
                        kind: OperandKind::IndirectY,
                        value,
                    })
                } else {
                    Ok(Operand {
                        kind: OperandKind::Indirect,
                        value,
                    })
                }
            }
        }
        Token::Hex8(byte) => Ok(Operand {
            kind: direct_kind(scanner)?,
            value: Value::Byte(byte),
        }),
        Token::Hex16(word) => Ok(Operand {
            kind: direct_kind(scanner)?,
            value: Value::Word(word),
        }),
        Token::Ident(name) => Ok(Operand {
            kind: direct_kind(scanner)?,
            value: Value::Label(name),
        }),
        other => Err(ParseError::UnexpectedToken {
            expected: "an operand (#value, $hex, (indirect), or identifier)",
            found: format!("{other:?}"),
        }),
    }
}

fn direct_kind(scanner: &mut Scanner) -> Result<OperandKind, ParseError> {
    Ok(match scanner.peek() {
        Token::IndexX => {
            scanner.advance()?;
            OperandKind::DirectX
        }
        Token::IndexY => {
            scanner.advance()?;
            OperandKind::DirectY
        }
        _ => OperandKind::Direct,
    })
}

fn expect_value(scanner: &mut Scanner) -> Result<Value, ParseError> {
    match scanner.advance()? {
        Token::Hex8(byte) => Ok(Value::Byte(byte)),
        Token::Hex16(word) => Ok(Value::Word(word)),
        other => Err(ParseError::UnexpectedToken {
            expected: "a hexadecimal value",
            found: format!("{other:?}"),
        }),
    }
}

fn expect_paren_close(scanner: &mut Scanner) -> Result<(), ParseError> {
    match scanner.advance()? {
        Token::ParenClose => Ok(()),
        other => Err(ParseError::UnexpectedToken {
            expected: "')'",
            found: format!("{other:?}"),
        }),
    }
}

fn expect_eol(scanner: &mut Scanner) -> Result<(), ParseError> {
    match scanner.advance()? {
        Token::Eol => Ok(()),
        other => Err(ParseError::UnexpectedToken {
            expected: "end of line",
            found: format!("{other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(input: &str) -> Result<Program, ParseError> {
        parse(&mut Scanner::new(input)?)
    }

    #[test]
    fn empty_program() {
        assert_eq!(parse_str("").unwrap().instructions, vec![]);
        assert_eq!(parse_str(" \n ").unwrap().instructions, vec![]);
    }

    #[test]
    fn implied_instruction() {
        let program = parse_str("BRK").unwrap();
        assert_eq!(
            program.instructions,
            vec![Instruction {
                label: None,
                mnemonic: Mnemonic::BRK,
                operand: None,
            }]
        );
    }

    #[test]
    fn immediate_operand() {
        let program = parse_str("LDA #$05").unwrap();
        assert_eq!(
            program.instructions[0].operand,
            Some(Operand {
                kind: OperandKind::Immediate,
                value: Value::Byte(0x05),
            })
        );
    }

    #[test]
    fn indirect_forms() {
        let forms = [
            ("JMP ($0605)", OperandKind::Indirect),
            ("LDA ($05,X)", OperandKind::IndirectX),
            ("LDA ($05),Y", OperandKind::IndirectY),
        ];
        for (source, kind) in forms {
            let program = parse_str(source).unwrap();
            assert_eq!(program.instructions[0].operand.as_ref().unwrap().kind, kind);
        }
    }

    #[test]
    fn labeled_instruction() {
        let program = parse_str("start: INX").unwrap();
        assert_eq!(program.instructions[0].label.as_deref(), Some("start"));
    }

    #[test]
    fn label_reference_operand() {
        let program = parse_str("JMP start").unwrap();
        assert_eq!(
            program.instructions[0].operand,
            Some(Operand {
                kind: OperandKind::Direct,
                value: Value::Label("start".into()),
            })
        );
    }

    #[test]
    fn unknown_mnemonic() {
        assert_eq!(
            parse_str("LSD #$05"),
            Err(ParseError::InvalidMnemonic("LSD".into()))
        );
    }

    #[test]
    fn trailing_junk_is_rejected() {
        assert!(matches!(
            parse_str("LDA #$05 #$06"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }
}
