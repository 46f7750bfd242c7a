//! iNES 1.0 ROM dumps ([iNES](https://www.nesdev.org/wiki/INES)).
//!
//! A dump has four sections:
//!
//! ```text
//! Header      16 bytes
//! Trainer     512 bytes (optional)
//! PRG ROM     byte 4 x 16 KiB
//! CHR ROM     byte 5 x 8 KiB
//! ```
//!
//! Header byte 6: bit 0 vertical mirroring, bit 1 battery RAM, bit 2
//! trainer present, bit 3 four-screen VRAM, bits 4-7 mapper low nibble.
//! Header byte 7: bits 2-3 iNES version (must be 0 for 1.0), bits 4-7
//! mapper high nibble. Only mapper 0 (NROM, fixed banks) is supported.

use std::fs;
use std::path::Path;

use thiserror::Error;

const MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];
const HEADER_LEN: usize = 16;
const TRAINER_LEN: usize = 512;
const PRG_PAGE: usize = 16 * 1024;
const CHR_PAGE: usize = 8 * 1024;

/// How the cartridge wires the PPU's two nametable KiBs across the
/// four logical nametables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mirroring {
    #[default]
    Vertical,
    Horizontal,
    FourScreen,
}

#[derive(Debug, Error)]
pub enum RomError {
    #[error("short read: wanted {wanted} bytes of {section}, got {got}")]
    ShortRead {
        section: &'static str,
        wanted: usize,
        got: usize,
    },
    #[error("missing NES magic in header")]
    BadMagic,
    #[error("unsupported mapper {0}")]
    UnsupportedMapper(u8),
    #[error("unsupported iNES version {0}")]
    UnsupportedVersion(u8),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An immutable ROM image. PRG is read by the CPU bus at
/// 0x8000-0xFFFF, CHR by the PPU as pattern tables.
#[derive(Debug, Clone, Default)]
pub struct Cartridge {
    pub prg: Vec<u8>,
    pub chr: Vec<u8>,
    pub mapper: u8,
    pub mirroring: Mirroring,
}

impl Cartridge {
    /// Parse an iNES 1.0 dump.
    pub fn from_bytes(data: &[u8]) -> Result<Self, RomError> {
        if data.len() < HEADER_LEN {
            return Err(RomError::ShortRead {
                section: "header",
                wanted: HEADER_LEN,
                got: data.len(),
            });
        }
        let header = &data[..HEADER_LEN];
        if header[..4] != MAGIC {
            return Err(RomError::BadMagic);
        }

        let mapper = (header[7] & 0xF0) | (header[6] >> 4);
        if mapper != 0 {
            return Err(RomError::UnsupportedMapper(mapper));
        }
        let ines_ver = (header[7] >> 2) & 0b11;
        if ines_ver != 0 {
            return Err(RomError::UnsupportedVersion(ines_ver));
        }

        let mirroring = if header[6] & 0b1000 != 0 {
            Mirroring::FourScreen
        } else if header[6] & 0b0001 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let prg_len = header[4] as usize * PRG_PAGE;
        let chr_len = header[5] as usize * CHR_PAGE;
        let trainer = header[6] & 0b0100 != 0;
        let prg_start = HEADER_LEN + if trainer { TRAINER_LEN } else { 0 };

        let section = |start: usize, len: usize, name: &'static str| {
            data.get(start..start + len)
                .map(|bytes| bytes.to_vec())
                .ok_or(RomError::ShortRead {
                    section: name,
                    wanted: len,
                    got: data.len().saturating_sub(start),
                })
        };
        let prg = section(prg_start, prg_len, "PRG ROM")?;
        let chr = section(prg_start + prg_len, chr_len, "CHR ROM")?;

        Ok(Cartridge {
            prg,
            chr,
            mapper,
            mirroring,
        })
    }

    /// Read and parse a `.nes` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        Self::from_bytes(&fs::read(path)?)
    }

    /// Test helper: append program bytes into PRG, pad to `size`
    /// (0x4000 for a mirrored cartridge or 0x8000), and point the
    /// reset vector at 0x8000.
    pub fn write_prg(&mut self, size: usize, prg: &[u8]) {
        self.prg.extend_from_slice(prg);
        self.prg.resize(size, 0);
        self.prg[0xFFFC - 0x8000] = 0x00;
        self.prg[0xFFFC - 0x8000 + 1] = 0x80;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Image {
        prg_pages: u8,
        chr_pages: u8,
        mapper: u8,
        four_screen: bool,
        trainer: bool,
        vertical: bool,
        ines_ver: u8,
        prg: Vec<u8>,
        chr: Vec<u8>,
    }

    impl Default for Image {
        fn default() -> Self {
            Image {
                prg_pages: 0,
                chr_pages: 0,
                mapper: 0,
                four_screen: false,
                trainer: false,
                vertical: false,
                ines_ver: 0,
                prg: vec![],
                chr: vec![],
            }
        }
    }

    impl Image {
        fn bytes(&self) -> Vec<u8> {
            let mut out = MAGIC.to_vec();
            out.push(self.prg_pages);
            out.push(self.chr_pages);
            out.push(
                (self.mapper & 0x0F) << 4
                    | (self.four_screen as u8) << 3
                    | (self.trainer as u8) << 2
                    | self.vertical as u8,
            );
            out.push((self.mapper & 0xF0) | self.ines_ver << 2);
            out.extend_from_slice(&[0; 8]);
            if self.trainer {
                out.extend_from_slice(&[0; 512]);
            }
            out.extend_from_slice(&self.prg);
            out.extend_from_slice(&self.chr);
            out
        }
    }

    #[test]
    fn parses_minimal_dump() {
        assert!(Cartridge::from_bytes(&Image::default().bytes()).is_ok());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            Cartridge::from_bytes(&[]),
            Err(RomError::ShortRead { .. })
        ));
    }

    #[test]
    fn rejects_bad_magic() {
        let header: Vec<u8> = (0u8..16).collect();
        assert!(matches!(
            Cartridge::from_bytes(&header),
            Err(RomError::BadMagic)
        ));
    }

    #[test]
    fn rejects_unsupported_mapper() {
        let image = Image {
            mapper: 1,
            ..Image::default()
        };
        assert!(matches!(
            Cartridge::from_bytes(&image.bytes()),
            Err(RomError::UnsupportedMapper(1))
        ));
    }

    #[test]
    fn rejects_ines_2() {
        let image = Image {
            ines_ver: 0b10,
            ..Image::default()
        };
        assert!(matches!(
            Cartridge::from_bytes(&image.bytes()),
            Err(RomError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn mirroring_from_flags() {
        let vertical = Image {
            vertical: true,
            ..Image::default()
        };
        let cart = Cartridge::from_bytes(&vertical.bytes()).unwrap();
        assert_eq!(cart.mirroring, Mirroring::Vertical);

        let horizontal = Image::default();
        let cart = Cartridge::from_bytes(&horizontal.bytes()).unwrap();
        assert_eq!(cart.mirroring, Mirroring::Horizontal);

        // Four-screen wins over the vertical bit.
        let four = Image {
            vertical: true,
            four_screen: true,
            ..Image::default()
        };
        let cart = Cartridge::from_bytes(&four.bytes()).unwrap();
        assert_eq!(cart.mirroring, Mirroring::FourScreen);
    }

    #[test]
    fn rejects_truncated_prg() {
        let image = Image {
            prg_pages: 1,
            prg: vec![0x10],
            ..Image::default()
        };
        assert!(matches!(
            Cartridge::from_bytes(&image.bytes()),
            Err(RomError::ShortRead { .. })
        ));
    }

    #[test]
    fn rejects_truncated_chr() {
        let image = Image {
            chr_pages: 1,
            chr: vec![0x10],
            ..Image::default()
        };
        assert!(matches!(
            Cartridge::from_bytes(&image.bytes()),
            Err(RomError::ShortRead { .. })
        ));
    }

    #[test]
    fn reads_prg_payload() {
        let prg = vec![0x10; 2 * PRG_PAGE];
        let image = Image {
            prg_pages: 2,
            prg: prg.clone(),
            ..Image::default()
        };
        let cart = Cartridge::from_bytes(&image.bytes()).unwrap();
        assert_eq!(cart.prg, prg);
    }

    #[test]
    fn reads_chr_payload_after_trainer() {
        let chr = vec![0x22; CHR_PAGE];
        let image = Image {
            chr_pages: 1,
            trainer: true,
            chr: chr.clone(),
            ..Image::default()
        };
        let cart = Cartridge::from_bytes(&image.bytes()).unwrap();
        assert_eq!(cart.chr, chr);
    }

    #[test]
    fn write_prg_sets_reset_vector() {
        let mut cart = Cartridge::default();
        cart.write_prg(0x8000, &[0xA9, 0x05]);
        assert_eq!(cart.prg.len(), 0x8000);
        assert_eq!(cart.prg[0], 0xA9);
        assert_eq!(cart.prg[0xFFFC - 0x8000], 0x00);
        assert_eq!(cart.prg[0xFFFD - 0x8000], 0x80);
    }
}
