#![doc = r#"
Arsnes library crate.

This crate exposes the emulator core modules for use by binaries and tests.

Modules:
- apu: CPU-side APU communication ports and the upload-handshake bridge thread
- bus: LoROM address decoder plus the bus facade over ROM/WRAM/SRAM/APU ports
- cartridge: SNES ROM loader (copier-header strip, checksum autodetect, vectors)
- cpu: 65c816 CPU core (facade + state + table + dispatch + execute modules)
- error: ROM loading and APU protocol error types
- snes: whole-system assembly and power sequencing

In tests, shared LoROM image builders are available under `crate::test_utils`.
"#]

// Core emulator modules
pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod error;
pub mod snes;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use cartridge::Cartridge;
pub use cpu::core::Cpu;
pub use snes::Snes;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
