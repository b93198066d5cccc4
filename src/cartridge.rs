/*!
Cartridge module: SNES ROM image loading and header metadata.

Detection pipeline
- Copier header: images whose length is not a multiple of 1024 carry a
  512-byte copier prefix, skipped before any interpretation.
- Header autodetection: the 16-bit wrapping byte sum of the usable image
  is compared against the checksum stored in the header candidate at
  0xFFC0 (HiROM position) first, then 0x7FC0 (LoROM position). If
  neither matches, the image is rejected.
- The layout byte inside the detected header (0x20/0x30 LoROM,
  0x21/0x31 HiROM) drives decoder selection later; this module only
  reports it.

The header also carries the two interrupt vector sets (native and
emulation). The CPU seeds its program counter from the emulation RESET
vector at power-up and reads the native NMI vector on `nmi()` delivery.
*/

use std::fmt;
use std::path::Path;

use crate::error::RomError;

const HEADER_LEN: usize = 64;
const HIROM_HEADER_OFFSET: usize = 0xFFC0;
const LOROM_HEADER_OFFSET: usize = 0x7FC0;
const COPIER_HEADER_LEN: usize = 512;

/// Cartridge address-mapping convention declared by the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomLayout {
    LoRom,
    HiRom,
    Unknown(u8),
}

impl RomLayout {
    fn from_byte(b: u8) -> Self {
        match b {
            0x20 | 0x30 => RomLayout::LoRom,
            0x21 | 0x31 => RomLayout::HiRom,
            other => RomLayout::Unknown(other),
        }
    }
}

impl fmt::Display for RomLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RomLayout::LoRom => write!(f, "LoROM"),
            RomLayout::HiRom => write!(f, "HiROM"),
            RomLayout::Unknown(b) => write!(f, "unknown (0x{:02X})", b),
        }
    }
}

/// One set of interrupt vectors; the header stores a native-mode set and
/// an emulation-mode set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptVectors {
    pub cop: u16,
    pub brk: u16,
    pub abort: u16,
    pub nmi: u16,
    pub reset: u16,
    pub irq: u16,
}

impl InterruptVectors {
    fn parse(bytes: &[u8]) -> Self {
        Self {
            cop: read_le_u16(bytes, 0),
            brk: read_le_u16(bytes, 2),
            abort: read_le_u16(bytes, 4),
            nmi: read_le_u16(bytes, 6),
            reset: read_le_u16(bytes, 8),
            irq: read_le_u16(bytes, 10),
        }
    }
}

/// Parsed cartridge header (the 64-byte block at the detected offset).
#[derive(Debug, Clone)]
pub struct Header {
    pub title: String,
    pub rom_layout: u8,
    pub cartridge_type: u8,
    pub rom_size_byte: u8,
    pub ram_size_byte: u8,
    pub country_code: u8,
    pub licensee_code: u8,
    pub version_number: u8,
    pub checksum_complement: u16,
    pub checksum: u16,
    pub native_vectors: InterruptVectors,
    pub emulation_vectors: InterruptVectors,
}

impl Header {
    fn parse(block: &[u8]) -> Self {
        let title = block[0..21]
            .iter()
            .map(|&b| if (0x20..0x7F).contains(&b) { b as char } else { ' ' })
            .collect::<String>()
            .trim_end()
            .to_string();
        Self {
            title,
            rom_layout: block[21],
            cartridge_type: block[22],
            rom_size_byte: block[23],
            ram_size_byte: block[24],
            country_code: block[25],
            licensee_code: block[26],
            version_number: block[27],
            checksum_complement: read_le_u16(block, 28),
            checksum: read_le_u16(block, 30),
            // Two unknown 32-bit words bracket the native vector set.
            native_vectors: InterruptVectors::parse(&block[36..48]),
            emulation_vectors: InterruptVectors::parse(&block[52..64]),
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Game title : {}", self.title)?;
        writeln!(f, "ROM layout : {}", RomLayout::from_byte(self.rom_layout))?;
        writeln!(f, "Cartridge type : 0x{:02X}", self.cartridge_type)?;
        writeln!(f, "ROM size : 0x{:X} bytes", 0x400u32 << self.rom_size_byte)?;
        writeln!(f, "RAM size : 0x{:X} bytes", 0x400u32 << self.ram_size_byte)?;
        writeln!(f, "Country code : 0x{:02X}", self.country_code)?;
        writeln!(f, "Licensee code : 0x{:02X}", self.licensee_code)?;
        write!(f, "Version number : 0x{:02X}", self.version_number)
    }
}

/// Loaded cartridge: the usable image (copier header already stripped)
/// plus its parsed header.
#[derive(Debug)]
pub struct Cartridge {
    header: Header,
    data: Vec<u8>,
}

impl Cartridge {
    /// Parse a cartridge from raw file bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RomError> {
        let usable = if bytes.len() % 1024 != 0 {
            if bytes.len() <= COPIER_HEADER_LEN {
                return Err(RomError::TooSmall(bytes.len()));
            }
            &bytes[COPIER_HEADER_LEN..]
        } else {
            bytes
        };
        if usable.len() < LOROM_HEADER_OFFSET + HEADER_LEN {
            return Err(RomError::TooSmall(usable.len()));
        }

        let computed = checksum(usable);
        let header = [HIROM_HEADER_OFFSET, LOROM_HEADER_OFFSET]
            .into_iter()
            .filter(|&off| usable.len() >= off + HEADER_LEN)
            .map(|off| Header::parse(&usable[off..off + HEADER_LEN]))
            .find(|h| h.checksum == computed)
            .ok_or(RomError::HeaderNotFound)?;

        Ok(Self {
            header,
            data: usable.to_vec(),
        })
    }

    /// Load a cartridge from a file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let bytes = std::fs::read(path).map_err(|e| RomError::Io(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Byte read over the usable image. Reads past the end are soft and
    /// return 0 (open-bus style).
    #[inline]
    pub fn read(&self, offset: u32) -> u8 {
        self.data.get(offset as usize).copied().unwrap_or(0)
    }

    /// Layout convention declared by the header's layout byte.
    #[inline]
    pub fn layout(&self) -> RomLayout {
        RomLayout::from_byte(self.header.rom_layout)
    }

    /// Declared save-RAM size in bytes.
    #[inline]
    pub fn sram_size(&self) -> usize {
        0x400usize << self.header.ram_size_byte
    }

    #[inline]
    pub fn native_vectors(&self) -> InterruptVectors {
        self.header.native_vectors
    }

    #[inline]
    pub fn emulation_vectors(&self) -> InterruptVectors {
        self.header.emulation_vectors
    }
}

/// 16-bit wrapping byte sum over the usable image.
fn checksum(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |acc, &b| acc.wrapping_add(b as u16))
}

#[inline]
fn read_le_u16(buf: &[u8], offset: usize) -> u16 {
    (buf[offset] as u16) | ((buf[offset + 1] as u16) << 8)
}
