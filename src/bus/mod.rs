/*!
Bus module: facade and focused submodules.

Overview
- decoder: pure LoROM address decoding into a `Mapped` region sum type.
- ram: flat byte stores for WRAM (128 KiB) and header-sized SRAM.
- The `Bus` facade in this module owns the cartridge and both RAM
  stores, holds the CPU-side handle to the APU port pair, and dispatches
  byte reads/writes through the decoder.

Soft-failure policy
- ROM writes are rejected and logged, never applied.
- Reads from unhandled regions (legacy pad, PPU/DMA, cartridge-specific,
  unmapped) return 0 and log; writes there are dropped and logged.
  These never halt emulation.
*/

pub mod decoder;
pub mod ram;

pub use decoder::{AddressDecoder, Mapped, decode_lorom};
pub use ram::Ram;

use std::sync::Arc;

use crate::apu::ApuPorts;
use crate::cartridge::Cartridge;
use crate::error::RomError;

/// System bus: routes 24-bit addresses to ROM, SRAM, WRAM, or the APU
/// communication ports. Region-to-backing-store association is fixed for
/// the lifetime of the instance.
#[derive(Debug)]
pub struct Bus {
    cartridge: Cartridge,
    decoder: AddressDecoder,
    wram: Ram,
    sram: Ram,
    apu_ports: Arc<ApuPorts>,
}

impl Bus {
    /// Build a bus over a cartridge. Fails for any cartridge layout the
    /// decoder does not support, which prevents CPU start.
    pub fn new(cartridge: Cartridge, apu_ports: Arc<ApuPorts>) -> Result<Self, RomError> {
        let decoder = AddressDecoder::new(cartridge.layout())?;
        let sram = Ram::new("sram", cartridge.sram_size());
        Ok(Self {
            cartridge,
            decoder,
            wram: Ram::wram(),
            sram,
            apu_ports,
        })
    }

    #[inline]
    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    /// Read one byte from the 24-bit address space.
    pub fn read(&mut self, addr: u32) -> u8 {
        match self.decoder.decode(addr) {
            Mapped::Rom(offset) => self.cartridge.read(offset),
            Mapped::Sram(offset) => self.sram.read(offset),
            Mapped::Wram(offset) => self.wram.read(offset),
            Mapped::ApuPort(port) => self.apu_ports.cpu_read(port),
            other => {
                eprintln!("bus: read from unhandled region {:?} (addr 0x{:06X})", other, addr);
                0
            }
        }
    }

    /// Write one byte to the 24-bit address space.
    pub fn write(&mut self, addr: u32, value: u8) {
        match self.decoder.decode(addr) {
            Mapped::Rom(_) => {
                eprintln!("bus: write to ROM ignored (addr 0x{:06X})", addr);
            }
            Mapped::Sram(offset) => self.sram.write(offset, value),
            Mapped::Wram(offset) => self.wram.write(offset, value),
            Mapped::ApuPort(port) => self.apu_ports.cpu_write(port, value),
            other => {
                eprintln!(
                    "bus: write to unhandled region {:?} dropped (addr 0x{:06X}, data 0x{:02X})",
                    other, addr, value
                );
            }
        }
    }

    /// Read a little-endian 16-bit word.
    #[inline]
    pub fn read_word(&mut self, addr: u32) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Read a little-endian 24-bit value (used by long pointer modes).
    #[inline]
    pub fn read_long(&mut self, addr: u32) -> u32 {
        let lo = self.read(addr) as u32;
        let mid = self.read(addr.wrapping_add(1)) as u32;
        let hi = self.read(addr.wrapping_add(2)) as u32;
        (hi << 16) | (mid << 8) | lo
    }
}
