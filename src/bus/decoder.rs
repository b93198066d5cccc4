/*!
Address decoder: pure mapping from a 24-bit bus address to a physical
region and translated offset, for the LoROM cartridge layout.

LoROM bank map (bank ranges inclusive):
- $00-$3F / $80-$BF:
    $0000-$1FFF  WRAM (low mirror, offset unchanged)
    $2100-$21FF  PPU1/APU window ($2140-$2143 are the four APU ports)
    $3000-$3FFF  cartridge-specific (not handled by this core)
    $4000-$40FF  legacy joypad registers
    $4200-$44FF  PPU2/DMA registers (not handled by this core)
    $6000-$7FFF  cartridge-specific
    $8000-$FFFF  ROM, rom_addr = (bank & 0x7F) * 0x8000 + (offset - 0x8000)
- $40-$6F / $C0-$EF: ROM over the whole bank, same formula
- $70-$7D / $F0-$FD: $0000-$7FFF SRAM, else ROM
- $7E-$7F: WRAM, addr = bank:offset - 0x7E0000
- $FE-$FF: $0000-$7FFF SRAM (mirrored formula), else ROM

The alternate HiROM interleaving is rejected when the decoder is built;
`decode` itself is total and deterministic over every (bank, offset).
*/

use crate::cartridge::RomLayout;
use crate::error::RomError;

/// Result of decoding one bus address: the physical region plus the
/// offset translated into that region's backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapped {
    /// Work RAM, linear offset into the 128 KiB array.
    Wram(u32),
    /// Cartridge save RAM, linear offset.
    Sram(u32),
    /// Cartridge ROM, linear offset into the usable image.
    Rom(u32),
    /// One of the four APU communication ports (0..=3).
    ApuPort(u8),
    /// Legacy joypad register window ($4000-$40FF).
    LegacyPad,
    /// PPU / DMA register space, not handled by this core.
    PpuDma,
    /// Cartridge-specific expansion space, not handled by this core.
    CartSpecific,
    /// Address with no backing store.
    Unmapped,
}

/// LoROM address decoder. Construction fails for any layout other than
/// LoROM so a mis-detected cartridge can never be silently mis-decoded.
#[derive(Debug, Clone, Copy)]
pub struct AddressDecoder {
    _layout: RomLayout,
}

impl AddressDecoder {
    pub fn new(layout: RomLayout) -> Result<Self, RomError> {
        match layout {
            RomLayout::LoRom => Ok(Self { _layout: layout }),
            RomLayout::HiRom => Err(RomError::HiRomUnsupported),
            RomLayout::Unknown(b) => Err(RomError::UnsupportedLayout(b)),
        }
    }

    /// Decode a 24-bit address into (region, translated offset).
    #[inline]
    pub fn decode(&self, addr: u32) -> Mapped {
        let bank = (addr >> 16) as u8;
        let offset = addr as u16;
        decode_lorom(bank, offset)
    }
}

/// Pure LoROM decode over (bank, offset).
pub fn decode_lorom(bank: u8, offset: u16) -> Mapped {
    match bank {
        0x00..=0x3F | 0x80..=0xBF => match offset {
            0x0000..=0x1FFF => Mapped::Wram(offset as u32),
            0x2140..=0x2143 => Mapped::ApuPort((offset - 0x2140) as u8),
            0x2100..=0x21FF => Mapped::PpuDma,
            0x3000..=0x3FFF => Mapped::CartSpecific,
            0x4000..=0x40FF => Mapped::LegacyPad,
            0x4200..=0x44FF => Mapped::PpuDma,
            0x6000..=0x7FFF => Mapped::CartSpecific,
            0x8000..=0xFFFF => Mapped::Rom(rom_offset(bank, offset)),
            _ => Mapped::Unmapped,
        },
        0x40..=0x6F | 0xC0..=0xEF => Mapped::Rom(rom_offset(bank, offset)),
        0x70..=0x7D | 0xF0..=0xFD | 0xFE..=0xFF => {
            if offset <= 0x7FFF {
                Mapped::Sram(sram_offset(bank, offset))
            } else {
                Mapped::Rom(rom_offset(bank, offset))
            }
        }
        0x7E..=0x7F => Mapped::Wram(((bank as u32) << 16 | offset as u32) - 0x7E0000),
    }
}

/// ROM translation shared by every ROM-mapped bank range.
///
/// Banks that reach here with offset < 0x8000 always have (bank & 0x7F)
/// >= 0x40, so the subtraction cannot underflow.
#[inline]
fn rom_offset(bank: u8, offset: u16) -> u32 {
    ((bank & 0x7F) as u32) * 0x8000 + offset as u32 - 0x8000
}

/// SRAM translation: $70-$7D map linearly from zero; the $F0-$FD and
/// $FE-$FF mirrors continue the same image around a 0x70000 pivot.
#[inline]
fn sram_offset(bank: u8, offset: u16) -> u32 {
    if (0x70..=0x7D).contains(&bank) {
        ((bank - 0x70) as u32) * 0x8000 + offset as u32
    } else {
        (0x70000 + (bank as i32 - 0xFE) * 0x8000 + offset as i32) as u32
    }
}
