/*!
state.rs - Canonical 65c816 CPU architectural state (registers + flags) and
inline-friendly helpers.

Overview
========
`CpuState` is the single authoritative owner for all architecturally visible
registers and execution control booleans. It intentionally excludes:
  - Bus / memory logic
  - Instruction decode / dispatch logic
  - Timing / cycle accounting
Those live in higher layers (dispatch, execute, bus modules).

Register widths
===============
The accumulator and index registers are 8 or 16 bits wide at runtime:
  - M flag set (or emulation mode) => 8-bit accumulator
  - X flag set (or emulation mode) => 8-bit X/Y, high bytes held at zero
  - emulation mode additionally pins the stack pointer's high byte to 0x01
Width-aware setters (`set_a`, `set_x`, `set_y`) write at the current width
and update Z/N from the written portion. Flag-mask mutators (`force_status`,
`set_flag_mask`, `clear_flag_mask`) apply the resize side effects.

65c816 Status Register Bit Layout (for reference)
=================================================
Bit: 7 6 5 4 3 2 1 0
     N V M X D I Z C
Where:
  N = NEGATIVE
  V = OVERFLOW
  M = MEMORY_8  (accumulator/memory width select, native mode only)
  X = INDEX_8   (index register width select, native mode only)
  D = DECIMAL   (BCD arithmetic; not supported, reported when requested)
  I = IRQ_DISABLE
  Z = ZERO
  C = CARRY
*/

use crate::bus::Bus;

/// Processor status flag bit masks (canonical definitions).
pub const CARRY: u8 = 0b0000_0001;
pub const ZERO: u8 = 0b0000_0010;
pub const IRQ_DISABLE: u8 = 0b0000_0100;
pub const DECIMAL: u8 = 0b0000_1000;
pub const INDEX_8: u8 = 0b0001_0000;
pub const MEMORY_8: u8 = 0b0010_0000;
pub const OVERFLOW: u8 = 0b0100_0000;
pub const NEGATIVE: u8 = 0b1000_0000;

/// Pure architectural register / flag container for the 65c816 CPU.
///
/// Fields are exposed for the dispatch/execute layers; prefer method access
/// over direct field mutation so width and flag invariants hold.
#[derive(Debug, Clone, Copy)]
pub struct CpuState {
    pub a: u16,
    pub x: u16,
    pub y: u16,
    pub dp: u16,
    pub sp: u16,
    pub pc: u16,
    pub pbr: u8,
    pub dbr: u8,
    pub status: u8,
    pub emulation: bool,
    decimal_reported: bool,
    unimplemented_reported: u8,
}

impl Default for CpuState {
    fn default() -> Self {
        // Power-up state: registers cleared, emulation mode, stack in page 1.
        Self {
            a: 0,
            x: 0,
            y: 0,
            dp: 0,
            sp: 0x0100,
            pc: 0,
            pbr: 0,
            dbr: 0,
            status: 0,
            emulation: true,
            decimal_reported: false,
            unimplemented_reported: 0,
        }
    }
}

impl CpuState {
    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    /// Create a new CPU state using power-up defaults (emulation mode).
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Width queries
    // ---------------------------------------------------------------------

    /// True when the accumulator operates at 8 bits.
    #[inline]
    pub fn a_is_8bit(&self) -> bool {
        self.emulation || self.is_flag_set(MEMORY_8)
    }

    /// True when the index registers operate at 8 bits.
    #[inline]
    pub fn index_is_8bit(&self) -> bool {
        self.emulation || self.is_flag_set(INDEX_8)
    }

    // ---------------------------------------------------------------------
    // Basic Accessors (Read)
    // ---------------------------------------------------------------------
    #[inline]
    pub fn a(&self) -> u16 {
        self.a
    }
    #[inline]
    pub fn x(&self) -> u16 {
        self.x
    }
    #[inline]
    pub fn y(&self) -> u16 {
        self.y
    }
    #[inline]
    pub fn dp(&self) -> u16 {
        self.dp
    }
    #[inline]
    pub fn sp(&self) -> u16 {
        self.sp
    }
    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc
    }
    #[inline]
    pub fn pbr(&self) -> u8 {
        self.pbr
    }
    #[inline]
    pub fn dbr(&self) -> u8 {
        self.dbr
    }
    #[inline]
    pub fn status(&self) -> u8 {
        self.status
    }
    #[inline]
    pub fn emulation(&self) -> bool {
        self.emulation
    }

    /// Accumulator truncated to its current width.
    #[inline]
    pub fn a_sized(&self) -> u16 {
        if self.a_is_8bit() { self.a & 0x00FF } else { self.a }
    }

    /// X truncated to its current width.
    #[inline]
    pub fn x_sized(&self) -> u16 {
        if self.index_is_8bit() { self.x & 0x00FF } else { self.x }
    }

    /// Y truncated to its current width.
    #[inline]
    pub fn y_sized(&self) -> u16 {
        if self.index_is_8bit() { self.y & 0x00FF } else { self.y }
    }

    /// Program bank shifted into 24-bit address position.
    #[inline]
    pub fn pbr_base(&self) -> u32 {
        (self.pbr as u32) << 16
    }

    /// Data bank shifted into 24-bit address position.
    #[inline]
    pub fn dbr_base(&self) -> u32 {
        (self.dbr as u32) << 16
    }

    // ---------------------------------------------------------------------
    // Width-aware register mutators (update Z/N at the written width)
    // ---------------------------------------------------------------------

    /// Write the accumulator at its current width and update Z/N.
    ///
    /// At 8 bits the high byte is preserved (the hidden B accumulator).
    #[inline]
    pub fn set_a(&mut self, v: u16) {
        if self.a_is_8bit() {
            self.a = (self.a & 0xFF00) | (v & 0x00FF);
            self.update_zn8(v as u8);
        } else {
            self.a = v;
            self.update_zn16(v);
        }
    }

    /// Write the full 16-bit accumulator unconditionally and update Z/N
    /// from the 16-bit value (TCD/TDC/TSC/XBA semantics).
    #[inline]
    pub fn set_a16(&mut self, v: u16) {
        self.a = v;
        self.update_zn16(v);
    }

    /// Write X at its current width and update Z/N. An 8-bit write keeps
    /// the high byte at zero.
    #[inline]
    pub fn set_x(&mut self, v: u16) {
        if self.index_is_8bit() {
            self.x = v & 0x00FF;
            self.update_zn8(v as u8);
        } else {
            self.x = v;
            self.update_zn16(v);
        }
    }

    /// Write Y at its current width and update Z/N.
    #[inline]
    pub fn set_y(&mut self, v: u16) {
        if self.index_is_8bit() {
            self.y = v & 0x00FF;
            self.update_zn8(v as u8);
        } else {
            self.y = v;
            self.update_zn16(v);
        }
    }

    /// Write the direct-page register (always 16-bit) and update Z/N.
    #[inline]
    pub fn set_dp(&mut self, v: u16) {
        self.dp = v;
        self.update_zn16(v);
    }

    /// Write the data-bank register and update Z/N from the byte.
    #[inline]
    pub fn set_dbr(&mut self, v: u8) {
        self.dbr = v;
        self.update_zn8(v);
    }

    /// Write the stack pointer at its current width. In emulation mode the
    /// high byte stays pinned at 0x01. No flags are affected.
    #[inline]
    pub fn set_sp(&mut self, v: u16) {
        if self.emulation {
            self.sp = 0x0100 | (v & 0x00FF);
        } else {
            self.sp = v;
        }
    }

    #[inline]
    pub fn set_pc(&mut self, v: u16) {
        self.pc = v;
    }
    #[inline]
    pub fn set_pbr(&mut self, v: u8) {
        self.pbr = v;
    }

    // ---------------------------------------------------------------------
    // Program Counter Helpers
    // ---------------------------------------------------------------------

    /// Advance PC by `delta` (wrapping at 16 bits; the program bank does
    /// not increment on wrap).
    #[inline]
    pub fn advance_pc(&mut self, delta: u16) {
        self.pc = self.pc.wrapping_add(delta);
    }

    // ---------------------------------------------------------------------
    // Flag Operations
    // ---------------------------------------------------------------------

    /// Return true if a status flag (bit mask) is set.
    #[inline]
    pub fn is_flag_set(&self, mask: u8) -> bool {
        (self.status & mask) != 0
    }

    /// Assign a flag bit based on boolean `value`.
    #[inline]
    pub fn assign_flag(&mut self, mask: u8, value: bool) {
        if value {
            self.status |= mask;
        } else {
            self.status &= !mask;
        }
    }

    /// Update ZERO + NEGATIVE from an 8-bit result.
    #[inline]
    pub fn update_zn8(&mut self, result: u8) {
        self.assign_flag(ZERO, result == 0);
        self.assign_flag(NEGATIVE, (result & 0x80) != 0);
    }

    /// Update ZERO + NEGATIVE from a 16-bit result.
    #[inline]
    pub fn update_zn16(&mut self, result: u16) {
        self.assign_flag(ZERO, result == 0);
        self.assign_flag(NEGATIVE, (result & 0x8000) != 0);
    }

    /// Update ZERO + NEGATIVE from a result at the accumulator's width.
    #[inline]
    pub fn update_zn_a_width(&mut self, result: u16) {
        if self.a_is_8bit() {
            self.update_zn8(result as u8);
        } else {
            self.update_zn16(result);
        }
    }

    /// Set status bits from a mask (SEP). Setting INDEX_8 truncates the
    /// index registers' high bytes; setting DECIMAL raises the
    /// unsupported-feature report.
    pub fn set_flag_mask(&mut self, mask: u8) {
        self.status |= mask;
        if mask & INDEX_8 != 0 {
            self.x &= 0x00FF;
            self.y &= 0x00FF;
        }
        if mask & DECIMAL != 0 {
            self.report_decimal_mode();
        }
    }

    /// Clear status bits from a mask (REP). In emulation mode the M/X
    /// width selections remain effectively 8-bit regardless of the bits.
    #[inline]
    pub fn clear_flag_mask(&mut self, mask: u8) {
        self.status &= !mask;
    }

    /// Overwrite the whole status byte (PLP / RTI), applying the INDEX_8
    /// truncation side effect.
    pub fn force_status(&mut self, v: u8) {
        self.status = v;
        if v & INDEX_8 != 0 {
            self.x &= 0x00FF;
            self.y &= 0x00FF;
        }
    }

    // ---------------------------------------------------------------------
    // Emulation / native transitions (XCE)
    // ---------------------------------------------------------------------

    /// Enter emulation mode: carry cleared, stack pointer forced into page
    /// 1, index registers truncated to 8 bits.
    pub fn enter_emulation(&mut self) {
        self.emulation = true;
        self.assign_flag(CARRY, false);
        self.sp = 0x0100 | (self.sp & 0x00FF);
        self.x &= 0x00FF;
        self.y &= 0x00FF;
    }

    /// Leave emulation mode (enter native): carry set, and M/X set so all
    /// register widths start at 8 bits until software widens them.
    pub fn leave_emulation(&mut self) {
        self.emulation = false;
        self.set_flag_mask(CARRY | MEMORY_8 | INDEX_8);
    }

    // ---------------------------------------------------------------------
    // Stack Helpers
    // ---------------------------------------------------------------------
    //
    // The stack lives in bank 0. SP post-decrements on push and
    // pre-increments on pull; the decrement/increment wraps at the stack
    // pointer's current width (within page 1 in emulation mode).

    #[inline]
    fn sp_dec(&mut self) {
        if self.emulation {
            self.sp = 0x0100 | ((self.sp as u8).wrapping_sub(1) as u16);
        } else {
            self.sp = self.sp.wrapping_sub(1);
        }
    }

    #[inline]
    fn sp_inc(&mut self) {
        if self.emulation {
            self.sp = 0x0100 | ((self.sp as u8).wrapping_add(1) as u16);
        } else {
            self.sp = self.sp.wrapping_add(1);
        }
    }

    /// Push a byte onto the stack.
    #[inline]
    pub fn push_u8(&mut self, bus: &mut Bus, value: u8) {
        bus.write(self.sp as u32, value);
        self.sp_dec();
    }

    /// Pull (pop) a byte from the stack.
    #[inline]
    pub fn pull_u8(&mut self, bus: &mut Bus) -> u8 {
        self.sp_inc();
        bus.read(self.sp as u32)
    }

    /// Push a 16-bit value, high byte first (return address / PHD order).
    #[inline]
    pub fn push_u16(&mut self, bus: &mut Bus, value: u16) {
        self.push_u8(bus, (value >> 8) as u8);
        self.push_u8(bus, value as u8);
    }

    /// Pull a 16-bit value, low byte first.
    #[inline]
    pub fn pull_u16(&mut self, bus: &mut Bus) -> u16 {
        let lo = self.pull_u8(bus) as u16;
        let hi = self.pull_u8(bus) as u16;
        (hi << 8) | lo
    }

    // ---------------------------------------------------------------------
    // Unsupported-feature reporting
    // ---------------------------------------------------------------------

    /// Report a decimal (BCD) arithmetic request once. Non-fatal; the
    /// requesting instruction computes a binary result instead.
    pub fn report_decimal_mode(&mut self) {
        if !self.decimal_reported {
            self.decimal_reported = true;
            eprintln!("cpu: decimal (BCD) arithmetic mode is not supported; using binary results");
        }
    }

    /// Report an instruction that executes as a distinguishable no-op.
    /// Each mnemonic (identified by `bit`) is reported at most once.
    pub fn report_unimplemented(&mut self, bit: u8, name: &'static str) {
        if self.unimplemented_reported & (1 << bit) == 0 {
            self.unimplemented_reported |= 1 << bit;
            eprintln!("cpu: {name} is not implemented; treated as a no-op");
        }
    }
}
