//! PPU (Picture Processing Unit) emulation.
//!
//! See [PPU](https://www.nesdev.org/wiki/PPU) and
//! [PPU registers](https://www.nesdev.org/wiki/PPU_registers). Handles
//! the eight memory-mapped registers with their IO-databus semantics,
//! 341-dot scanlines with 262 scanlines per frame, the vblank NMI, and
//! background/sprite rendering into an indexed framebuffer.

pub mod palette;
pub mod ppu;
