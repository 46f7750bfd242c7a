//! Emulator entry point.
//!
//! Loads a cartridge and runs the machine with a display window.
//! Usage: `famicore path/to/game.nes`
//!
//! The core produces a 256×240 framebuffer of palette indices once per
//! frame (detected as a scanline wrap); this binary maps it through the
//! fixed 64-entry NES palette and presents it with `minifb`. Keyboard
//! state is latched into the gamepad between frames: Z/X are A/B,
//! Shift is Select, Enter is Start, arrows are the d-pad.

use std::env;
use std::process::ExitCode;

use minifb::{Key, Window, WindowOptions};

use famicore::cartridge::Cartridge;
use famicore::nes::Nes;
use famicore::ppu::palette::NES_PALETTE;
use famicore::ppu::ppu::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

fn apply_keys(nes: &mut Nes, window: &Window) {
    let pad = &mut nes.cpu.bus.gamepad;
    pad.btn_a = window.is_key_down(Key::Z);
    pad.btn_b = window.is_key_down(Key::X);
    pad.btn_select = window.is_key_down(Key::LeftShift) || window.is_key_down(Key::RightShift);
    pad.btn_start = window.is_key_down(Key::Enter);
    pad.btn_up = window.is_key_down(Key::Up);
    pad.btn_down = window.is_key_down(Key::Down);
    pad.btn_left = window.is_key_down(Key::Left);
    pad.btn_right = window.is_key_down(Key::Right);
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: famicore <rom.nes>");
        return ExitCode::FAILURE;
    };

    let cartridge = match Cartridge::load(&path) {
        Ok(cartridge) => cartridge,
        Err(err) => {
            eprintln!("failed to load {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut nes = Nes::new(&cartridge);
    nes.reset();

    let mut window = Window::new(
        &format!("{path} - famicore"),
        DISPLAY_WIDTH,
        DISPLAY_HEIGHT,
        WindowOptions {
            resize: true,
            scale: minifb::Scale::X2,
            scale_mode: minifb::ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        },
    )
    .expect("failed to create window");
    window.set_target_fps(60);

    let mut pixels = vec![0u32; DISPLAY_WIDTH * DISPLAY_HEIGHT];
    let mut scanline = nes.cpu.bus.ppu.scanline;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        // Run until the scanline counter wraps: one full frame.
        loop {
            nes.step();
            if nes.cpu.halted {
                eprintln!("CPU jammed at {:04X}", nes.cpu.pc);
                return ExitCode::FAILURE;
            }
            let current = nes.cpu.bus.ppu.scanline;
            let wrapped = current < scanline;
            scanline = current;
            if wrapped {
                break;
            }
        }

        for (out, &index) in pixels.iter_mut().zip(nes.cpu.bus.ppu.frame.iter()) {
            *out = NES_PALETTE[(index & 0x3F) as usize];
        }
        window
            .update_with_buffer(&pixels, DISPLAY_WIDTH, DISPLAY_HEIGHT)
            .expect("failed to update window");

        apply_keys(&mut nes, &window);
    }

    ExitCode::SUCCESS
}
