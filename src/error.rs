/*!
Error types for cartridge loading and the APU handshake protocol.

Fatal conditions surface as `Err` values through these enums. Soft
conditions (reads from unmapped space, writes to ROM) are logged to
stderr at the point of occurrence and never reach this module.
*/

use thiserror::Error;

/// Errors raised while loading or validating a cartridge image.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RomError {
    #[error("ROM image too small: {0} bytes")]
    TooSmall(usize),

    #[error("no header found: checksum matches neither 0xFFC0 nor 0x7FC0 candidate")]
    HeaderNotFound,

    #[error("unsupported memory layout byte 0x{0:02X} (only LoROM is supported)")]
    UnsupportedLayout(u8),

    #[error("HiROM cartridges are not supported")]
    HiRomUnsupported,

    #[error("I/O error reading ROM: {0}")]
    Io(String),
}

/// Errors raised by the APU handshake state machine.
///
/// Any of these halts the APU thread; the CPU side keeps running and
/// simply sees frozen output ports.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApuProtocolError {
    #[error(
        "unclassifiable handshake cookie 0x{cookie:02X} (ports {ports:02X?}, state {state:?})"
    )]
    BadCookie {
        cookie: u8,
        ports: [u8; 4],
        state: crate::apu::ApuState,
    },
}
