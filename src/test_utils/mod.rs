//! Shared test utilities for building minimal LoROM cartridge images.
//!
//! These helpers de-duplicate image construction across tests in the CPU,
//! Bus, and Cartridge modules. They produce a 64 KiB image with a valid
//! header at 0x7FC0 so checksum autodetection lands on the LoROM
//! position.
//!
//! Layout of the built image:
//! - program bytes at ROM offset (reset - 0x8000), visible at $00:8000+
//!   for the default reset of 0x8000
//! - header at 0x7FC0: title, layout byte, ROM/RAM size bytes, checksum
//! - emulation vectors at 0x7FF4 (RESET at 0x7FFC), native at 0x7FE4
//!
//! The stored checksum uses the fix-point property of the checksum /
//! complement pair: writing value v and !v contributes a constant 0x1FE
//! to the byte sum, so the sum computed with placeholders stays valid
//! after the real checksum is patched in. The HiROM candidate bytes at
//! 0xFFDE are forced to the complement of the real sum so detection can
//! never land on 0xFFC0.

#![allow(dead_code)]

use std::sync::Arc;

use crate::apu::ApuPorts;
use crate::bus::Bus;
use crate::cartridge::Cartridge;

/// LoROM layout byte.
pub const LOROM_LAYOUT: u8 = 0x20;
/// HiROM layout byte (for rejection tests).
pub const HIROM_LAYOUT: u8 = 0x21;

const IMAGE_SIZE: usize = 0x10000;
const HEADER: usize = 0x7FC0;

/// Knobs for image construction beyond the common defaults.
pub struct TestImage<'a> {
    pub program: &'a [u8],
    pub reset: u16,
    pub layout: u8,
    pub title: &'a str,
    pub ram_size_byte: u8,
    pub nmi: u16,
}

impl Default for TestImage<'_> {
    fn default() -> Self {
        Self {
            program: &[0xEA],
            reset: 0x8000,
            layout: LOROM_LAYOUT,
            title: "TEST",
            ram_size_byte: 1,
            nmi: 0x8000,
        }
    }
}

/// Build a 64 KiB image with the given program, reset vector, and layout
/// byte; everything else uses defaults.
pub fn build_lorom_image(program: &[u8], reset: u16, layout: u8) -> Vec<u8> {
    build_lorom_image_with(TestImage {
        program,
        reset,
        layout,
        ..Default::default()
    })
}

/// Build a 64 KiB image from a full `TestImage` description.
pub fn build_lorom_image_with(spec: TestImage<'_>) -> Vec<u8> {
    assert!(spec.reset >= 0x8000, "program must live in the ROM half");
    let mut image = vec![0u8; IMAGE_SIZE];

    let start = (spec.reset - 0x8000) as usize;
    assert!(
        start + spec.program.len() <= HEADER,
        "program overlaps the header area"
    );
    image[start..start + spec.program.len()].copy_from_slice(spec.program);

    // Title: 21 bytes, space padded.
    let title_bytes = spec.title.as_bytes();
    assert!(title_bytes.len() <= 21, "title too long");
    image[HEADER..HEADER + 21].fill(b' ');
    image[HEADER..HEADER + title_bytes.len()].copy_from_slice(title_bytes);

    image[HEADER + 21] = spec.layout;
    image[HEADER + 22] = 0x00; // cartridge type
    image[HEADER + 23] = 6; // 0x400 << 6 = 64 KiB ROM
    image[HEADER + 24] = spec.ram_size_byte;
    image[HEADER + 25] = 0x01; // country
    image[HEADER + 26] = 0x00; // licensee
    image[HEADER + 27] = 0x00; // version

    // Native vectors at +36, emulation vectors at +52 (cop, brk, abort,
    // nmi, reset, irq).
    write_le_u16(&mut image, HEADER + 36 + 6, spec.nmi);
    write_le_u16(&mut image, HEADER + 36 + 8, spec.reset);
    write_le_u16(&mut image, HEADER + 52 + 6, spec.nmi);
    write_le_u16(&mut image, HEADER + 52 + 8, spec.reset);

    // Checksum fix-point: placeholders first, then patch in the real sum.
    // The HiROM candidate position gets its own placeholder pair so it
    // can be spoiled afterwards without disturbing the byte sum.
    write_le_u16(&mut image, HEADER + 28, 0xFFFF);
    write_le_u16(&mut image, HEADER + 30, 0x0000);
    write_le_u16(&mut image, 0xFFC0 + 28, 0xFFFF);
    write_le_u16(&mut image, 0xFFC0 + 30, 0x0000);
    let sum = image
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(b as u16));
    write_le_u16(&mut image, HEADER + 28, !sum);
    write_le_u16(&mut image, HEADER + 30, sum);

    // Spoil the HiROM candidate with the complement pair reversed; the
    // pair still contributes 0x1FE, and !sum never equals sum.
    write_le_u16(&mut image, 0xFFC0 + 28, sum);
    write_le_u16(&mut image, 0xFFC0 + 30, !sum);

    image
}

/// Build a bus over a default LoROM image holding `program` at $00:8000.
pub fn build_test_bus(program: &[u8]) -> Bus {
    build_test_bus_with_ports(program).0
}

/// Same as `build_test_bus`, also handing back the APU port pair so
/// tests can observe the co-processor side.
pub fn build_test_bus_with_ports(program: &[u8]) -> (Bus, Arc<ApuPorts>) {
    let image = build_lorom_image(program, 0x8000, LOROM_LAYOUT);
    let cart = Cartridge::from_bytes(&image).expect("test image must parse");
    let ports = Arc::new(ApuPorts::new());
    let bus = Bus::new(cart, ports.clone()).expect("test image is LoROM");
    (bus, ports)
}

#[inline]
fn write_le_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset] = (value & 0x00FF) as u8;
    buf[offset + 1] = (value >> 8) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_image_checksum_is_consistent() {
        let image = build_lorom_image(&[0xA9, 0x05], 0x8000, LOROM_LAYOUT);
        let sum = image
            .iter()
            .fold(0u16, |acc, &b| acc.wrapping_add(b as u16));
        let stored = (image[HEADER + 30] as u16) | ((image[HEADER + 31] as u16) << 8);
        assert_eq!(sum, stored);
        // HiROM candidate must not match.
        let hirom = (image[0xFFDE] as u16) | ((image[0xFFDF] as u16) << 8);
        assert_ne!(hirom, sum);
    }

    #[test]
    fn image_parses_and_exposes_program() {
        let image = build_lorom_image(&[0xA9, 0x05], 0x8000, LOROM_LAYOUT);
        let cart = Cartridge::from_bytes(&image).expect("parse");
        assert_eq!(cart.read(0), 0xA9);
        assert_eq!(cart.emulation_vectors().reset, 0x8000);
    }

    #[test]
    fn custom_reset_places_program() {
        let image = build_lorom_image(&[0x42], 0x9000, LOROM_LAYOUT);
        let cart = Cartridge::from_bytes(&image).expect("parse");
        assert_eq!(cart.read(0x1000), 0x42);
        assert_eq!(cart.emulation_vectors().reset, 0x9000);
    }
}
