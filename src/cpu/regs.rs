/*!
regs.rs - CpuRegs trait providing a generic register + flag manipulation
interface for 65c816 execution / dispatch.

The trait does NOT include:
  - Stack push/pull
  - Instruction fetch helpers
  - Bus access of any kind

Memory, stack, and fetch operations remain explicit at call sites via
`&mut Bus` to avoid over-borrowing and to keep trait implementations
simple; generic stack helpers in `execute` are built from `sp`/`set_sp`
(whose emulation-mode page pinning yields the correct wrap behavior).

Design goals:
1. Small surface area: only what instruction helpers require.
2. Static dispatch via generics (no trait objects) in hot paths.
3. Default methods for composites reduce duplication across implementors.
4. Method names mirror `CpuState` methods to keep call sites mechanical.
*/

use crate::cpu::state::{CpuState, NEGATIVE, ZERO};

/// Trait exposing the 65c816 architectural register + flag API needed by
/// instruction semantic and dispatch code.
///
/// ALL mutating methods take &mut self, enabling generic call sites:
///   fn op<C: CpuRegs>(cpu: &mut C) { ... }
pub trait CpuRegs {
    // ---------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------
    fn a(&self) -> u16;
    fn x(&self) -> u16;
    fn y(&self) -> u16;
    fn dp(&self) -> u16;
    fn sp(&self) -> u16;
    fn pc(&self) -> u16;
    fn pbr(&self) -> u8;
    fn dbr(&self) -> u8;
    fn status(&self) -> u8;
    fn emulation(&self) -> bool;

    fn a_is_8bit(&self) -> bool;
    fn index_is_8bit(&self) -> bool;

    /// Accumulator / index values truncated to their current width.
    fn a_sized(&self) -> u16;
    fn x_sized(&self) -> u16;
    fn y_sized(&self) -> u16;

    /// Program / data bank shifted into 24-bit address position.
    #[inline]
    fn pbr_base(&self) -> u32 {
        (self.pbr() as u32) << 16
    }
    #[inline]
    fn dbr_base(&self) -> u32 {
        (self.dbr() as u32) << 16
    }

    // ---------------------------------------------------------------------
    // Mutators
    // ---------------------------------------------------------------------
    fn set_a(&mut self, v: u16);
    fn set_a16(&mut self, v: u16);
    fn set_x(&mut self, v: u16);
    fn set_y(&mut self, v: u16);
    fn set_dp(&mut self, v: u16);
    fn set_dbr(&mut self, v: u8);
    fn set_sp(&mut self, v: u16);
    fn set_pc(&mut self, v: u16);
    fn set_pbr(&mut self, v: u8);

    /// Advance PC by `delta` (wrapping at 16 bits).
    fn advance_pc(&mut self, delta: u16);

    // ---------------------------------------------------------------------
    // Flag operations
    // ---------------------------------------------------------------------
    fn is_flag_set(&self, mask: u8) -> bool;
    fn assign_flag(&mut self, mask: u8, value: bool);

    /// SEP / REP / PLP-style masked and forced status writes, including
    /// the register-width resize side effects.
    fn set_flag_mask(&mut self, mask: u8);
    fn clear_flag_mask(&mut self, mask: u8);
    fn force_status(&mut self, v: u8);

    /// XCE transitions.
    fn enter_emulation(&mut self);
    fn leave_emulation(&mut self);

    /// Non-fatal unsupported-feature report for decimal arithmetic.
    fn report_decimal_mode(&mut self);

    /// One-shot report for instructions that execute as distinguishable
    /// no-ops; `bit` identifies the mnemonic in the report latch.
    fn report_unimplemented(&mut self, bit: u8, name: &'static str);

    // ---------------------------------------------------------------------
    // Composites (defaults)
    // ---------------------------------------------------------------------
    #[inline]
    fn update_zn8(&mut self, result: u8) {
        self.assign_flag(ZERO, result == 0);
        self.assign_flag(NEGATIVE, (result & 0x80) != 0);
    }

    #[inline]
    fn update_zn16(&mut self, result: u16) {
        self.assign_flag(ZERO, result == 0);
        self.assign_flag(NEGATIVE, (result & 0x8000) != 0);
    }

    #[inline]
    fn update_zn_a_width(&mut self, result: u16) {
        if self.a_is_8bit() {
            self.update_zn8(result as u8);
        } else {
            self.update_zn16(result);
        }
    }
}

// -------------------------------------------------------------------------
// Implementation: CpuState (canonical)
// -------------------------------------------------------------------------

impl CpuRegs for CpuState {
    #[inline]
    fn a(&self) -> u16 {
        self.a()
    }
    #[inline]
    fn x(&self) -> u16 {
        self.x()
    }
    #[inline]
    fn y(&self) -> u16 {
        self.y()
    }
    #[inline]
    fn dp(&self) -> u16 {
        self.dp()
    }
    #[inline]
    fn sp(&self) -> u16 {
        self.sp()
    }
    #[inline]
    fn pc(&self) -> u16 {
        self.pc()
    }
    #[inline]
    fn pbr(&self) -> u8 {
        self.pbr()
    }
    #[inline]
    fn dbr(&self) -> u8 {
        self.dbr()
    }
    #[inline]
    fn status(&self) -> u8 {
        self.status()
    }
    #[inline]
    fn emulation(&self) -> bool {
        self.emulation()
    }

    #[inline]
    fn a_is_8bit(&self) -> bool {
        self.a_is_8bit()
    }
    #[inline]
    fn index_is_8bit(&self) -> bool {
        self.index_is_8bit()
    }
    #[inline]
    fn a_sized(&self) -> u16 {
        self.a_sized()
    }
    #[inline]
    fn x_sized(&self) -> u16 {
        self.x_sized()
    }
    #[inline]
    fn y_sized(&self) -> u16 {
        self.y_sized()
    }

    #[inline]
    fn set_a(&mut self, v: u16) {
        self.set_a(v);
    }
    #[inline]
    fn set_a16(&mut self, v: u16) {
        self.set_a16(v);
    }
    #[inline]
    fn set_x(&mut self, v: u16) {
        self.set_x(v);
    }
    #[inline]
    fn set_y(&mut self, v: u16) {
        self.set_y(v);
    }
    #[inline]
    fn set_dp(&mut self, v: u16) {
        self.set_dp(v);
    }
    #[inline]
    fn set_dbr(&mut self, v: u8) {
        self.set_dbr(v);
    }
    #[inline]
    fn set_sp(&mut self, v: u16) {
        self.set_sp(v);
    }
    #[inline]
    fn set_pc(&mut self, v: u16) {
        self.set_pc(v);
    }
    #[inline]
    fn set_pbr(&mut self, v: u8) {
        self.set_pbr(v);
    }

    #[inline]
    fn advance_pc(&mut self, delta: u16) {
        self.advance_pc(delta);
    }

    #[inline]
    fn is_flag_set(&self, mask: u8) -> bool {
        self.is_flag_set(mask)
    }
    #[inline]
    fn assign_flag(&mut self, mask: u8, value: bool) {
        self.assign_flag(mask, value);
    }
    #[inline]
    fn set_flag_mask(&mut self, mask: u8) {
        self.set_flag_mask(mask);
    }
    #[inline]
    fn clear_flag_mask(&mut self, mask: u8) {
        self.clear_flag_mask(mask);
    }
    #[inline]
    fn force_status(&mut self, v: u8) {
        self.force_status(v);
    }

    #[inline]
    fn enter_emulation(&mut self) {
        self.enter_emulation();
    }
    #[inline]
    fn leave_emulation(&mut self) {
        self.leave_emulation();
    }

    #[inline]
    fn report_decimal_mode(&mut self) {
        self.report_decimal_mode();
    }

    #[inline]
    fn report_unimplemented(&mut self, bit: u8, name: &'static str) {
        self.report_unimplemented(bit, name);
    }

    // update_zn8 / update_zn16 / update_zn_a_width use default implementations
}
