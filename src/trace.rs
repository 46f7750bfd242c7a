//! Human-readable execution trace in the nestest log format.
//!
//! One fixed-width line per call, describing the instruction under PC
//! and the machine state before it executes:
//!
//! ```text
//! C72E  86 00     STX $00 = 00                    A:00 X:05 Y:00 P:26 SP:FB PPU:  2,110 CYC:47
//! ```
//!
//! Illegal mnemonics are prefixed with `*`. The disassembled operand
//! shows resolved effective addresses after `@` and the byte at the
//! effective address after `=`. All memory inspection goes through
//! [`crate::bus::Bus::peek`] so tracing never disturbs PPU state.

use crate::bus::Bus;
use crate::cpu::opcodes::{AddressingMode, Mnemonic, OPCODES};
use crate::nes::Nes;

/// Format the machine state as one trace line.
pub fn trace(nes: &Nes) -> String {
    format!(
        "{:04X}  {:<8} {:<32} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PPU:{:>3},{:>3} CYC:{}",
        nes.cpu.pc,
        raw_bytes(nes),
        disassembly(nes),
        nes.cpu.a,
        nes.cpu.x,
        nes.cpu.y,
        nes.cpu.flags.bits(),
        nes.cpu.sp,
        nes.cpu.bus.ppu.scanline,
        nes.cpu.bus.ppu.cycle,
        nes.cpu.cycles,
    )
}

fn peek(nes: &Nes, addr: u16) -> u8 {
    nes.cpu.bus.peek(addr)
}

fn peek16_zeropage(nes: &Nes, addr: u8) -> u16 {
    let lo = u16::from(peek(nes, u16::from(addr)));
    let hi = u16::from(peek(nes, u16::from(addr.wrapping_add(1))));
    hi << 8 | lo
}

/// The instruction's raw bytes, e.g. `20 76 F9`.
fn raw_bytes(nes: &Nes) -> String {
    let pc = nes.cpu.pc;
    let opcode = &OPCODES[peek(nes, pc) as usize];
    match opcode.len {
        1 => format!("{:02X}", peek(nes, pc)),
        2 => format!("{:02X} {:02X}", peek(nes, pc), peek(nes, pc.wrapping_add(1))),
        _ => format!(
            "{:02X} {:02X} {:02X}",
            peek(nes, pc),
            peek(nes, pc.wrapping_add(1)),
            peek(nes, pc.wrapping_add(2))
        ),
    }
}

/// The assembly rendering, e.g. `LDA ($89),Y = 0300 @ 0300 = 89`.
fn disassembly(nes: &Nes) -> String {
    let pc = nes.cpu.pc;
    let opcode = &OPCODES[peek(nes, pc) as usize];

    let mut out = if opcode.is_illegal() {
        format!("*{} ", opcode.mnemonic)
    } else {
        format!(" {} ", opcode.mnemonic)
    };

    match opcode.mode {
        AddressingMode::Implied => {
            // Accumulator forms of the shifts spell out their operand.
            if matches!(opcode.code, 0x0A | 0x4A | 0x2A | 0x6A) {
                out.push('A');
            }
        }
        AddressingMode::Immediate => {
            out += &format!("#${:02X}", peek(nes, pc.wrapping_add(1)));
        }
        AddressingMode::Zeropage => {
            let operand = peek(nes, pc.wrapping_add(1));
            let value = peek(nes, u16::from(operand));
            out += &format!("${operand:02X} = {value:02X}");
        }
        AddressingMode::ZeropageX => {
            let operand = peek(nes, pc.wrapping_add(1));
            let addr = operand.wrapping_add(nes.cpu.x);
            let value = peek(nes, u16::from(addr));
            out += &format!("${operand:02X},X @ {addr:02X} = {value:02X}");
        }
        AddressingMode::ZeropageY => {
            let operand = peek(nes, pc.wrapping_add(1));
            let addr = operand.wrapping_add(nes.cpu.y);
            let value = peek(nes, u16::from(addr));
            out += &format!("${operand:02X},Y @ {addr:02X} = {value:02X}");
        }
        AddressingMode::Relative => {
            let offset = peek(nes, pc.wrapping_add(1)) as i8;
            let target = pc.wrapping_add(2).wrapping_add(offset as u16);
            out += &format!("${target:04X}");
        }
        AddressingMode::IndirectX => {
            let operand = peek(nes, pc.wrapping_add(1));
            let reference = operand.wrapping_add(nes.cpu.x);
            let addr = peek16_zeropage(nes, reference);
            let value = peek(nes, addr);
            out += &format!("(${operand:02X},X) @ {reference:02X} = {addr:04X} = {value:02X}");
        }
        AddressingMode::IndirectY => {
            let operand = peek(nes, pc.wrapping_add(1));
            let reference = peek16_zeropage(nes, operand);
            let addr = reference.wrapping_add(u16::from(nes.cpu.y));
            let value = peek(nes, addr);
            out += &format!("(${operand:02X}),Y = {reference:04X} @ {addr:04X} = {value:02X}");
        }
        AddressingMode::Indirect => {
            let operand = u16::from(peek(nes, pc.wrapping_add(1)))
                | u16::from(peek(nes, pc.wrapping_add(2))) << 8;
            let lo = u16::from(peek(nes, operand));
            // Same page-wrap quirk the CPU has for JMP (ind).
            let hi = if operand & 0xFF == 0xFF {
                u16::from(peek(nes, operand & 0xFF00))
            } else {
                u16::from(peek(nes, operand.wrapping_add(1)))
            };
            let addr = hi << 8 | lo;
            out += &format!("(${operand:04X}) = {addr:04X}");
        }
        AddressingMode::Absolute => {
            let operand = u16::from(peek(nes, pc.wrapping_add(1)))
                | u16::from(peek(nes, pc.wrapping_add(2))) << 8;
            // Jump targets are addresses, not memory operands.
            if matches!(opcode.mnemonic, Mnemonic::JMP | Mnemonic::JSR) {
                out += &format!("${operand:04X}");
            } else {
                let value = peek(nes, operand);
                out += &format!("${operand:04X} = {value:02X}");
            }
        }
        AddressingMode::AbsoluteX => {
            let operand = u16::from(peek(nes, pc.wrapping_add(1)))
                | u16::from(peek(nes, pc.wrapping_add(2))) << 8;
            let addr = operand.wrapping_add(u16::from(nes.cpu.x));
            let value = peek(nes, addr);
            out += &format!("${operand:04X},X @ {addr:04X} = {value:02X}");
        }
        AddressingMode::AbsoluteY => {
            let operand = u16::from(peek(nes, pc.wrapping_add(1)))
                | u16::from(peek(nes, pc.wrapping_add(2))) << 8;
            let addr = operand.wrapping_add(u16::from(nes.cpu.y));
            let value = peek(nes, addr);
            out += &format!("${operand:04X},Y @ {addr:04X} = {value:02X}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;

    fn nes() -> Nes {
        Nes::new(&Cartridge::default())
    }

    #[test]
    fn registers_and_counters() {
        let mut nes = nes();
        nes.cpu.pc = 0x1234;
        nes.cpu.a = 1;
        nes.cpu.x = 2;
        nes.cpu.y = 3;
        nes.cpu.flags.interrupt_disable = false;
        nes.cpu.flags.carry = true;
        nes.cpu.sp = 0xFA;
        nes.cpu.cycles = 654321;
        nes.cpu.bus.ppu.scanline = 50;
        nes.cpu.bus.ppu.cycle = 7;

        assert_eq!(
            trace(&nes),
            "1234  00        BRK                             A:01 X:02 Y:03 P:21 \
             SP:FA PPU: 50,  7 CYC:654321"
        );
    }

    #[test]
    fn illegal_instruction_is_starred() {
        let mut nes = nes();
        nes.cpu.pc = 0;
        nes.cpu.write(0x0000, 0x1A);

        assert_eq!(
            trace(&nes),
            "0000  1A       *NOP                             A:00 X:00 Y:00 P:24 \
             SP:FD PPU:  0,  0 CYC:0"
        );
    }

    #[test]
    fn accumulator_shift_prints_a() {
        let mut nes = nes();
        nes.cpu.pc = 0;
        nes.cpu.write(0x0000, 0x0A);

        assert!(trace(&nes).contains(" ASL A "));
    }

    #[test]
    fn disassembled_operands_by_mode() {
        let mut nes = nes();
        nes.cpu.pc = 0;
        nes.cpu.x = 1;
        nes.cpu.y = 1;

        // Pointer at 0x10 -> 0x0122, and bytes behind it.
        nes.cpu.write(0x10, 0x22);
        nes.cpu.write(0x11, 0x01);
        nes.cpu.write(0x0122, 0x33);
        nes.cpu.write(0x0123, 0x34);

        let suffix = "A:00 X:01 Y:01 P:24 SP:FD PPU:  0,  0 CYC:0";
        let cases: &[(&[u8], &str)] = &[
            (&[0xA5, 0x10], "A5 10     LDA $10 = 22                   "),
            (&[0xB5, 0x0F], "B5 0F     LDA $0F,X @ 10 = 22            "),
            (&[0xAD, 0x10, 0x00], "AD 10 00  LDA $0010 = 22                 "),
            (&[0xBD, 0x0F, 0x00], "BD 0F 00  LDA $000F,X @ 0010 = 22        "),
            (&[0xB9, 0x0F, 0x00], "B9 0F 00  LDA $000F,Y @ 0010 = 22        "),
            (&[0xA1, 0x0F], "A1 0F     LDA ($0F,X) @ 10 = 0122 = 33   "),
            (&[0xB1, 0x10], "B1 10     LDA ($10),Y = 0122 @ 0123 = 34 "),
            (&[0xF0, 0x10], "F0 10     BEQ $0012                      "),
            (&[0x4C, 0x34, 0x12], "4C 34 12  JMP $1234                      "),
            (&[0x20, 0x34, 0x12], "20 34 12  JSR $1234                      "),
            (&[0xA9, 0x07], "A9 07     LDA #$07                       "),
        ];
        for (bytes, middle) in cases {
            for (i, byte) in bytes.iter().enumerate() {
                nes.cpu.write(i as u16, *byte);
            }
            assert_eq!(trace(&nes), format!("0000  {middle} {suffix}"));
        }
    }

    #[test]
    fn indirect_jmp_shows_page_wrapped_pointer() {
        let mut nes = nes();
        nes.cpu.pc = 0;
        nes.cpu.write(0x0000, 0x6C);
        nes.cpu.write(0x0001, 0xFF);
        nes.cpu.write(0x0002, 0x02);
        // Pointer high byte comes from 0x0200, not 0x0300.
        nes.cpu.write(0x02FF, 0x00);
        nes.cpu.write(0x0200, 0x90);

        assert!(trace(&nes).contains(" JMP ($02FF) = 9000"));
    }
}
