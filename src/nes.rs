//! The composite machine: CPU wired to the NES bus, with the PPU
//! clocked at three dots per CPU cycle.
//!
//! The host drives emulation by calling [`Nes::step`] in a loop and
//! presenting the PPU framebuffer whenever the scanline counter wraps
//! (one full frame). All state lives in this single value; there is no
//! shared mutable state and nothing blocks.

use crate::bus::NesBus;
use crate::cartridge::Cartridge;
use crate::cpu::cpu::Cpu;

pub struct Nes {
    pub cpu: Cpu<NesBus>,
}

impl Nes {
    pub fn new(cart: &Cartridge) -> Self {
        Nes {
            cpu: Cpu::new(NesBus::new(cart)),
        }
    }

    pub fn reset(&mut self) {
        let before = self.cpu.cycles;
        self.cpu.reset();
        let elapsed = self.cpu.cycles - before;
        self.cpu.bus.ppu.tick(elapsed as usize * 3);
    }

    /// Run one CPU step (instruction or interrupt service) and advance
    /// the PPU by three dots per elapsed CPU cycle. The PPU's NMI
    /// latch, raised during a previous step's ticks, is moved onto the
    /// CPU's NMI line first, so the interrupt is taken at this
    /// instruction boundary.
    pub fn step(&mut self) {
        if self.cpu.bus.ppu.nmi_pending {
            self.cpu.bus.ppu.nmi_pending = false;
            self.cpu.nmi_pending = true;
        }
        let before = self.cpu.cycles;
        self.cpu.step();
        let elapsed = self.cpu.cycles - before;
        self.cpu.bus.ppu.tick(elapsed as usize * 3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;

    fn nes_with_program(code: &str) -> Nes {
        let program = crate::assembler::assemble(code).unwrap();
        let mut cart = Cartridge::default();
        cart.write_prg(0x8000, &program);
        let mut nes = Nes::new(&cart);
        nes.reset();
        nes
    }

    #[test]
    fn reset_vectors_to_prg_start() {
        let nes = nes_with_program("NOP");
        assert_eq!(nes.cpu.pc, 0x8000);
        assert_eq!(nes.cpu.sp, 0xFD);
        assert!(nes.cpu.flags.interrupt_disable);
    }

    #[test]
    fn ppu_advances_three_dots_per_cpu_cycle() {
        let mut nes = nes_with_program("LDA #$05 \n LDA $00FF,X");
        let dots_before = dots(&nes);
        nes.step(); // 2 cycles
        assert_eq!(dots(&nes) - dots_before, 2 * 3);
        let dots_before = dots(&nes);
        nes.step(); // 4 cycles, no page cross with X=0
        assert_eq!(dots(&nes) - dots_before, 4 * 3);
    }

    fn dots(nes: &Nes) -> usize {
        nes.cpu.bus.ppu.scanline as usize * 341 + nes.cpu.bus.ppu.cycle
    }

    #[test]
    fn vblank_nmi_is_latched_into_the_cpu() {
        // Enable NMI generation in CTRL, then spin; the handler at the
        // NMI vector (0x8008) increments X.
        let program = crate::assembler::assemble(
            "      LDA #$80 \n\
                   STA $2000 \n\
             loop: JMP loop \n\
                   INX",
        )
        .unwrap();
        let mut cart = Cartridge::default();
        cart.write_prg(0x8000, &program);
        cart.prg[0xFFFA - 0x8000] = 0x08;
        cart.prg[0xFFFB - 0x8000] = 0x80;
        let mut nes = Nes::new(&cart);
        nes.reset();

        // One frame's worth of steps comfortably reaches vblank.
        for _ in 0..15_000 {
            nes.step();
            if nes.cpu.x > 0 {
                break;
            }
        }
        assert_eq!(nes.cpu.x, 1);
    }

    #[test]
    fn scanline_wraps_once_per_frame() {
        let mut nes = nes_with_program("loop: JMP loop");
        let mut wraps = 0;
        let mut prev = nes.cpu.bus.ppu.scanline;
        // 262 * 341 / 3 cycles per frame, 3 cycles per JMP step.
        for _ in 0..12_000 {
            nes.step();
            let scanline = nes.cpu.bus.ppu.scanline;
            if scanline < prev {
                wraps += 1;
            }
            prev = scanline;
        }
        assert_eq!(wraps, 1);
    }
}
