//! CPU memory bus.
//!
//! The CPU is generic over [`Bus`], so the same core runs against the
//! real NES address decode ([`NesBus`]) or a flat 64 KiB RAM
//! ([`RamBus`]) used by tests and small assembler-driven programs.
//!
//! NES CPU memory map ([CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map)):
//!
//! ```text
//! 0xFFFF -----------------
//!        |    PRG ROM    |  16 KiB carts mirror into the upper half
//! 0x8000 -----------------
//!        |   open bus    |
//! 0x4020 -----------------
//!        | APU + IO regs |  0x4014 OAM DMA, 0x4016 gamepad
//! 0x4000 -----------------
//!        | PPU registers |  8 registers, mirrored every 8 bytes
//! 0x2000 -----------------
//!        |     WRAM      |  2 KiB, mirrored every 0x0800
//! 0x0000 -----------------
//! ```

use log::{debug, warn};

use crate::apu::Apu;
use crate::cartridge::Cartridge;
use crate::gamepad::Gamepad;
use crate::ppu::ppu::Ppu;

pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);

    /// Side-effect-free read, used by the trace formatter. Must never
    /// mutate device state (a real `read` of PPUSTATUS clears the
    /// vblank latch; `peek` must not).
    fn peek(&self, addr: u16) -> u8;
}

/// Flat RAM covering the whole address space, no devices, no
/// validation. The CPU test suite runs on this.
pub struct RamBus {
    pub ram: Box<[u8; 0x10000]>,
}

impl RamBus {
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; 0x10000]),
        }
    }
}

impl Default for RamBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for RamBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.ram[addr as usize] = data;
    }

    fn peek(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }
}

/// The NES address decode: WRAM, PPU registers, APU shadow, gamepad,
/// and PRG ROM.
pub struct NesBus {
    pub wram: [u8; 0x800],
    pub ppu: Ppu,
    pub apu: Apu,
    pub gamepad: Gamepad,
    prg: Vec<u8>,
}

impl NesBus {
    pub fn new(cart: &Cartridge) -> Self {
        Self {
            wram: [0; 0x800],
            ppu: Ppu::with_cartridge(cart),
            apu: Apu::new(),
            gamepad: Gamepad::new(),
            prg: cart.prg.clone(),
        }
    }

    // The WRAM bus only decodes 11 address bits, which mirrors the
    // 2 KiB four times through 0x1FFF.
    fn wram_index(addr: u16) -> usize {
        (addr & 0x07FF) as usize
    }

    fn prg_read(&self, addr: u16) -> u8 {
        if self.prg.is_empty() {
            return 0;
        }
        let mut offset = (addr - 0x8000) as usize;
        if offset >= self.prg.len() {
            offset %= self.prg.len();
        }
        self.prg[offset]
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.wram[Self::wram_index(addr)],
            0x2000..=0x3FFF => self.ppu.read(0x2000 + (addr & 0x0007)),
            0x4014 => 0,
            0x4016 => self.gamepad.read() as u8,
            0x4000..=0x4017 => self.apu.read(addr),
            0x8000..=0xFFFF => self.prg_read(addr),
            _ => {
                debug!("open bus read at {addr:04X}");
                0
            }
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0x0000..=0x1FFF => self.wram[Self::wram_index(addr)] = data,
            0x2000..=0x3FFF => self.ppu.write(0x2000 + (addr & 0x0007), data),
            // OAM DMA is serviced instantly by games via OAMDATA here;
            // the 513-cycle block transfer is not modeled.
            0x4014 => debug!("OAM DMA write ignored (data {data:02X})"),
            0x4016 => self.gamepad.write(data),
            0x4000..=0x4017 => self.apu.write(addr, data),
            0x8000..=0xFFFF => warn!("write into PRG ROM at {addr:04X} ignored"),
            _ => debug!("open bus write at {addr:04X} (data {data:02X})"),
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.wram[Self::wram_index(addr)],
            0x2000..=0x3FFF => self.ppu.peek(0x2000 + (addr & 0x0007)),
            0x4016 => 0,
            0x4000..=0x4017 => self.apu.peek(addr),
            0x8000..=0xFFFF => self.prg_read(addr),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;

    fn bus_with_prg(prg: Vec<u8>) -> NesBus {
        let mut cart = Cartridge::default();
        cart.prg = prg;
        NesBus::new(&cart)
    }

    #[test]
    fn wram_read_back() {
        let mut bus = bus_with_prg(vec![]);
        bus.write(0x05, 0x06);
        assert_eq!(bus.read(0x05), 0x06);
    }

    #[test]
    fn wram_mirrors_every_0x800() {
        let mut bus = bus_with_prg(vec![]);
        bus.write(0x0005, 0x06);
        assert_eq!(bus.read(0x0805), 0x06);
        assert_eq!(bus.read(0x1005), 0x06);
        assert_eq!(bus.read(0x1805), 0x06);
    }

    #[test]
    fn prg_16k_mirrors_into_upper_bank() {
        let mut prg = vec![0; 0x4000];
        prg[0x05] = 0x06;
        let mut bus = bus_with_prg(prg);
        assert_eq!(bus.read(0x8005), 0x06);
        assert_eq!(bus.read(0xC005), 0x06);
    }

    #[test]
    fn prg_32k_has_no_mirror() {
        let mut prg = vec![0; 0x8000];
        prg[0x4005] = 0x06;
        let mut bus = bus_with_prg(prg);
        assert_eq!(bus.read(0xC005), 0x06);
        assert_eq!(bus.read(0x8005), 0x00);
    }

    #[test]
    fn prg_write_is_ignored() {
        let mut prg = vec![0; 0x4000];
        prg[0x05] = 0x06;
        let mut bus = bus_with_prg(prg);
        bus.write(0x8005, 0xFF);
        assert_eq!(bus.read(0x8005), 0x06);
    }

    #[test]
    fn apu_shadow_stores_writes() {
        let mut bus = bus_with_prg(vec![]);
        bus.write(0x4015, 0x0F);
        assert_eq!(bus.read(0x4015), 0x0F);
    }

    #[test]
    fn open_bus_reads_zero() {
        let mut bus = bus_with_prg(vec![]);
        assert_eq!(bus.read(0x5000), 0);
        bus.write(0x5000, 0xAA);
        assert_eq!(bus.read(0x5000), 0);
    }

    #[test]
    fn ppu_registers_mirror_every_8_bytes() {
        let mut bus = bus_with_prg(vec![]);
        bus.write(0x2006, 0x20);
        bus.write(0x200E, 0x11); // mirror of 0x2006
        bus.write(0x3FFF, 0x05); // mirror of 0x2007
        assert_eq!(bus.ppu.vram[0x11], 0x05);
    }

    #[test]
    fn status_read_through_bus_clears_vblank() {
        let mut bus = bus_with_prg(vec![]);
        bus.ppu.tick(242 * 341);
        assert_ne!(bus.read(0x2002) & 0x80, 0);
        assert_eq!(bus.read(0x2002) & 0x80, 0);
    }

    #[test]
    fn peek_does_not_clear_vblank() {
        let mut bus = bus_with_prg(vec![]);
        bus.ppu.tick(242 * 341);
        bus.peek(0x2002);
        assert_ne!(bus.read(0x2002) & 0x80, 0);
    }
}
