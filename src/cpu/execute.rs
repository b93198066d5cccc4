/*!
execute.rs - 65c816 instruction semantic helpers (ALU, flags, stack, RMW)

Purpose
=======
Centralize side-effect logic for instructions so the dispatch family
modules share a single implementation of the width-aware primitives:
  - sized memory reads/writes (8 or 16 bits, little-endian)
  - operand fetch from a resolved `EffectiveAddress`
  - stack push/pull built on `sp`/`set_sp` (whose emulation-mode page
    pinning yields the correct wrap behavior)
  - ALU cores: adc/sbc/compare, logical ops, shifts and rotates

Design Notes
============
- Helpers rely only on the `CpuRegs` API plus an explicit `&mut Bus`
  where memory is touched.
- The `wide` parameter is the instruction's operating width: the M width
  for accumulator/memory ops, the X width for index ops. Callers pass
  `!cpu.a_is_8bit()` or `!cpu.index_is_8bit()`.
- Decimal (BCD) mode is not implemented. ADC/SBC report the first
  request and compute binary results.
*/

use crate::bus::Bus;
use crate::cpu::addressing::EffectiveAddress;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, DECIMAL, OVERFLOW};

// ---------------------------------------------------------------------------
// Sized memory access
// ---------------------------------------------------------------------------

/// Read an 8- or 16-bit little-endian value.
#[inline]
pub(crate) fn read_sized(bus: &mut Bus, addr: u32, wide: bool) -> u16 {
    if wide {
        bus.read_word(addr)
    } else {
        bus.read(addr) as u16
    }
}

/// Write an 8- or 16-bit little-endian value.
#[inline]
pub(crate) fn write_sized(bus: &mut Bus, addr: u32, value: u16, wide: bool) {
    bus.write(addr, value as u8);
    if wide {
        bus.write(addr.wrapping_add(1), (value >> 8) as u8);
    }
}

/// Fetch the operand value for a resolved effective address at the given
/// width. `Immediate` carries its value; `Accumulator` reads A.
pub(crate) fn fetch_data<C: CpuRegs>(
    cpu: &C,
    bus: &mut Bus,
    ea: EffectiveAddress,
    wide: bool,
) -> u16 {
    match ea {
        EffectiveAddress::Immediate(v) => {
            if wide {
                v
            } else {
                v & 0x00FF
            }
        }
        EffectiveAddress::Accumulator => cpu.a_sized(),
        EffectiveAddress::Simple(addr) | EffectiveAddress::Stack(addr) => {
            read_sized(bus, addr, wide)
        }
        EffectiveAddress::None | EffectiveAddress::BlockMove { .. } => 0,
    }
}

/// Store a read-modify-write result back to where it came from and update
/// Z/N at the operating width. Accumulator targets go through `set_a`.
pub(crate) fn store_rmw<C: CpuRegs>(
    cpu: &mut C,
    bus: &mut Bus,
    ea: EffectiveAddress,
    value: u16,
    wide: bool,
) {
    match ea {
        EffectiveAddress::Accumulator => cpu.set_a(value),
        EffectiveAddress::Simple(addr) | EffectiveAddress::Stack(addr) => {
            write_sized(bus, addr, value, wide);
            if wide {
                cpu.update_zn16(value);
            } else {
                cpu.update_zn8(value as u8);
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Stack helpers (bank 0; SP post-decrements on push, pre-increments on pull)
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn push8<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, value: u8) {
    bus.write(cpu.sp() as u32, value);
    cpu.set_sp(cpu.sp().wrapping_sub(1));
}

#[inline]
pub(crate) fn pull8<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u8 {
    cpu.set_sp(cpu.sp().wrapping_add(1));
    bus.read(cpu.sp() as u32)
}

/// Push a 16-bit value, high byte first (return-address order).
#[inline]
pub(crate) fn push16<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, value: u16) {
    push8(cpu, bus, (value >> 8) as u8);
    push8(cpu, bus, value as u8);
}

/// Pull a 16-bit value, low byte first.
#[inline]
pub(crate) fn pull16<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u16 {
    let lo = pull8(cpu, bus) as u16;
    let hi = pull8(cpu, bus) as u16;
    (hi << 8) | lo
}

// ---------------------------------------------------------------------------
// Arithmetic cores
// ---------------------------------------------------------------------------

/// ADC: A += value + C at the accumulator width. Sets C on unsigned
/// carry-out and V on signed overflow.
pub(crate) fn adc<C: CpuRegs>(cpu: &mut C, value: u16) {
    if cpu.is_flag_set(DECIMAL) {
        cpu.report_decimal_mode();
    }
    let wide = !cpu.a_is_8bit();
    let (mask, sign) = width_mask(wide);
    let a = cpu.a_sized() as u32;
    let v = value as u32 & mask;
    let carry_in = cpu.is_flag_set(CARRY) as u32;
    let sum = a + v + carry_in;
    let result = (sum & mask) as u16;
    cpu.assign_flag(CARRY, sum > mask);
    let overflow = (!(a ^ v) & (a ^ sum) & sign) != 0;
    cpu.assign_flag(OVERFLOW, overflow);
    cpu.set_a(result);
}

/// SBC: A -= value + !C at the accumulator width. C is set when no
/// borrow occurred.
pub(crate) fn sbc<C: CpuRegs>(cpu: &mut C, value: u16) {
    if cpu.is_flag_set(DECIMAL) {
        cpu.report_decimal_mode();
    }
    let wide = !cpu.a_is_8bit();
    let (mask, sign) = width_mask(wide);
    let a = cpu.a_sized() as u32;
    let v = value as u32 & mask;
    let borrow = (!cpu.is_flag_set(CARRY)) as u32;
    let diff = a.wrapping_sub(v).wrapping_sub(borrow);
    let result = (diff & mask) as u16;
    cpu.assign_flag(CARRY, a >= v + borrow);
    let overflow = ((a ^ v) & (a ^ diff) & sign) != 0;
    cpu.assign_flag(OVERFLOW, overflow);
    cpu.set_a(result);
}

/// CMP/CPX/CPY core: Z/N come from the subtraction result at the
/// operating width, C from the unsigned comparison.
pub(crate) fn compare<C: CpuRegs>(cpu: &mut C, register: u16, value: u16, wide: bool) {
    let (mask, _) = width_mask(wide);
    let r = register as u32 & mask;
    let v = value as u32 & mask;
    let diff = (r.wrapping_sub(v) & mask) as u16;
    cpu.assign_flag(CARRY, r >= v);
    if wide {
        cpu.update_zn16(diff);
    } else {
        cpu.update_zn8(diff as u8);
    }
}

// ---------------------------------------------------------------------------
// Shift / rotate cores (value in, value out; caller stores via store_rmw)
// ---------------------------------------------------------------------------

/// ASL: C takes the old high bit.
pub(crate) fn asl_value<C: CpuRegs>(cpu: &mut C, value: u16, wide: bool) -> u16 {
    let (mask, sign) = width_mask(wide);
    cpu.assign_flag(CARRY, (value as u32 & sign) != 0);
    ((value as u32) << 1 & mask) as u16
}

/// LSR: C takes the old low bit.
pub(crate) fn lsr_value<C: CpuRegs>(cpu: &mut C, value: u16, wide: bool) -> u16 {
    let (mask, _) = width_mask(wide);
    cpu.assign_flag(CARRY, (value & 1) != 0);
    ((value as u32 & mask) >> 1) as u16
}

/// ROL: rotate left through carry.
pub(crate) fn rol_value<C: CpuRegs>(cpu: &mut C, value: u16, wide: bool) -> u16 {
    let (mask, sign) = width_mask(wide);
    let carry_in = cpu.is_flag_set(CARRY) as u32;
    cpu.assign_flag(CARRY, (value as u32 & sign) != 0);
    (((value as u32) << 1 | carry_in) & mask) as u16
}

/// ROR: rotate right through carry.
pub(crate) fn ror_value<C: CpuRegs>(cpu: &mut C, value: u16, wide: bool) -> u16 {
    let (mask, sign) = width_mask(wide);
    let carry_in = cpu.is_flag_set(CARRY) as u32;
    cpu.assign_flag(CARRY, (value & 1) != 0);
    (((value as u32 & mask) >> 1) | (carry_in * sign)) as u16
}

/// (mask, sign bit) for the operating width.
#[inline]
pub(crate) fn width_mask(wide: bool) -> (u32, u32) {
    if wide {
        (0xFFFF, 0x8000)
    } else {
        (0x00FF, 0x0080)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::{CpuState, INDEX_8, MEMORY_8, NEGATIVE, ZERO};
    use crate::test_utils::build_test_bus;

    fn native16() -> CpuState {
        let mut cpu = CpuState::default();
        cpu.leave_emulation();
        cpu.clear_flag_mask(MEMORY_8 | INDEX_8);
        cpu
    }

    #[test]
    fn adc_8bit_carry_and_overflow() {
        let mut cpu = CpuState::default();
        cpu.set_a(0x7F);
        adc(&mut cpu, 0x01);
        assert_eq!(cpu.a_sized(), 0x80);
        assert!(cpu.is_flag_set(OVERFLOW));
        assert!(!cpu.is_flag_set(CARRY));
        assert!(cpu.is_flag_set(NEGATIVE));

        cpu.set_a(0xFF);
        cpu.assign_flag(CARRY, false);
        cpu.assign_flag(OVERFLOW, false);
        adc(&mut cpu, 0x01);
        assert_eq!(cpu.a_sized(), 0x00);
        assert!(cpu.is_flag_set(CARRY));
        assert!(cpu.is_flag_set(ZERO));
        assert!(!cpu.is_flag_set(OVERFLOW));
    }

    #[test]
    fn adc_16bit_signed_overflow() {
        let mut cpu = native16();
        cpu.set_a(0x7FFF);
        cpu.assign_flag(CARRY, false);
        adc(&mut cpu, 0x0001);
        assert_eq!(cpu.a_sized(), 0x8000);
        assert!(cpu.is_flag_set(OVERFLOW));
        assert!(!cpu.is_flag_set(CARRY));
        assert!(cpu.is_flag_set(NEGATIVE));
    }

    #[test]
    fn adc_uses_carry_in() {
        let mut cpu = CpuState::default();
        cpu.set_a(0x10);
        cpu.assign_flag(CARRY, true);
        adc(&mut cpu, 0x05);
        assert_eq!(cpu.a_sized(), 0x16);
    }

    #[test]
    fn sbc_borrow_semantics() {
        let mut cpu = CpuState::default();
        cpu.set_a(0x10);
        cpu.assign_flag(CARRY, true);
        sbc(&mut cpu, 0x01);
        assert_eq!(cpu.a_sized(), 0x0F);
        assert!(cpu.is_flag_set(CARRY));

        cpu.set_a(0x00);
        cpu.assign_flag(CARRY, true);
        sbc(&mut cpu, 0x01);
        assert_eq!(cpu.a_sized(), 0xFF);
        // Borrow occurred.
        assert!(!cpu.is_flag_set(CARRY));
    }

    #[test]
    fn compare_sets_flags_from_difference() {
        let mut cpu = CpuState::default();
        compare(&mut cpu, 0x40, 0x40, false);
        assert!(cpu.is_flag_set(ZERO));
        assert!(cpu.is_flag_set(CARRY));
        compare(&mut cpu, 0x10, 0x20, false);
        assert!(!cpu.is_flag_set(ZERO));
        assert!(!cpu.is_flag_set(CARRY));
        assert!(cpu.is_flag_set(NEGATIVE));
        compare(&mut cpu, 0x1234, 0x1234, true);
        assert!(cpu.is_flag_set(ZERO));
    }

    #[test]
    fn shifts_move_bits_through_carry() {
        let mut cpu = CpuState::default();
        let v = asl_value(&mut cpu, 0x81, false);
        assert_eq!(v, 0x02);
        assert!(cpu.is_flag_set(CARRY));

        let v = rol_value(&mut cpu, 0x01, false);
        // Carry from the ASL rotates in.
        assert_eq!(v, 0x03);
        assert!(!cpu.is_flag_set(CARRY));

        let v = lsr_value(&mut cpu, 0x01, false);
        assert_eq!(v, 0x00);
        assert!(cpu.is_flag_set(CARRY));

        let v = ror_value(&mut cpu, 0x00, false);
        assert_eq!(v, 0x80);
        assert!(!cpu.is_flag_set(CARRY));
    }

    #[test]
    fn wide_shift_uses_bit_15() {
        let mut cpu = native16();
        let v = asl_value(&mut cpu, 0x8000, true);
        assert_eq!(v, 0x0000);
        assert!(cpu.is_flag_set(CARRY));
    }

    #[test]
    fn stack_helpers_round_trip() {
        let mut cpu = CpuState::default();
        let mut bus = build_test_bus(&[0xEA]);
        let sp0 = cpu.sp();
        push16(&mut cpu, &mut bus, 0xBEEF);
        assert_eq!(pull16(&mut cpu, &mut bus), 0xBEEF);
        assert_eq!(cpu.sp(), sp0);
    }

    #[test]
    fn fetch_data_widths() {
        let cpu = CpuState::default();
        let mut bus = build_test_bus(&[0xEA]);
        bus.write(0x000300, 0x34);
        bus.write(0x000301, 0x12);
        assert_eq!(
            fetch_data(&cpu, &mut bus, EffectiveAddress::Simple(0x000300), false),
            0x0034
        );
        assert_eq!(
            fetch_data(&cpu, &mut bus, EffectiveAddress::Simple(0x000300), true),
            0x1234
        );
        assert_eq!(
            fetch_data(&cpu, &mut bus, EffectiveAddress::Immediate(0x1234), false),
            0x0034
        );
    }

    #[test]
    fn store_rmw_writes_and_flags() {
        let mut cpu = native16();
        let mut bus = build_test_bus(&[0xEA]);
        store_rmw(&mut cpu, &mut bus, EffectiveAddress::Simple(0x000400), 0x8001, true);
        assert_eq!(bus.read_word(0x000400), 0x8001);
        assert!(cpu.is_flag_set(NEGATIVE));
        assert!(!cpu.is_flag_set(ZERO));
    }
}
