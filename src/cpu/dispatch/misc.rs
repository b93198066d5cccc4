/*!
misc.rs - Transfers / stack / flag family handler.

Overview
========
Handles the register-to-register transfers, the push/pull group, the
individual flag instructions, SEP/REP, XBA, and XCE.

Width notes
===========
- Pushes and pulls of A/X/Y follow the register's current width.
- PHD/PLD and the push-effective-address group (PEA/PEI/PER) are always
  16-bit; PHB/PHK/PHP/PLB/PLP are always 8-bit.
- TXS and TCS write the stack pointer without touching flags; emulation
  mode keeps its high byte pinned.
- XCE exchanges carry with the emulation flag, applying the register
  resize rules of the mode being entered.
*/

use crate::bus::Bus;
use crate::cpu::addressing::EffectiveAddress;
use crate::cpu::execute::{pull8, pull16, push8, push16};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, DECIMAL, IRQ_DISABLE, OVERFLOW};
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle<C: CpuRegs>(
    info: &OpInfo,
    ea: EffectiveAddress,
    cpu: &mut C,
    bus: &mut Bus,
) -> bool {
    match info.mnemonic {
        // ----- transfers ---------------------------------------------------
        Mnemonic::Tax => cpu.set_x(cpu.a()),
        Mnemonic::Tay => cpu.set_y(cpu.a()),
        Mnemonic::Txa => cpu.set_a(cpu.x()),
        Mnemonic::Tya => cpu.set_a(cpu.y()),
        Mnemonic::Txy => cpu.set_y(cpu.x()),
        Mnemonic::Tyx => cpu.set_x(cpu.y()),
        Mnemonic::Tsx => cpu.set_x(cpu.sp()),
        Mnemonic::Txs => cpu.set_sp(cpu.x()),
        Mnemonic::Tcd => cpu.set_dp(cpu.a()),
        Mnemonic::Tcs => cpu.set_sp(cpu.a()),
        Mnemonic::Tdc => cpu.set_a16(cpu.dp()),
        Mnemonic::Tsc => cpu.set_a16(cpu.sp()),
        Mnemonic::Xba => {
            let a = cpu.a();
            cpu.set_a16(a.rotate_left(8));
            // Z/N reflect the new low byte.
            cpu.update_zn8((a >> 8) as u8);
        }

        // ----- stack pushes ------------------------------------------------
        Mnemonic::Pha => {
            let (wide, v) = (!cpu.a_is_8bit(), cpu.a_sized());
            push_sized(cpu, bus, v, wide);
        }
        Mnemonic::Phx => {
            let (wide, v) = (!cpu.index_is_8bit(), cpu.x_sized());
            push_sized(cpu, bus, v, wide);
        }
        Mnemonic::Phy => {
            let (wide, v) = (!cpu.index_is_8bit(), cpu.y_sized());
            push_sized(cpu, bus, v, wide);
        }
        Mnemonic::Phb => {
            let v = cpu.dbr();
            push8(cpu, bus, v);
        }
        Mnemonic::Phk => {
            let v = cpu.pbr();
            push8(cpu, bus, v);
        }
        Mnemonic::Phd => {
            let v = cpu.dp();
            push16(cpu, bus, v);
        }
        Mnemonic::Php => {
            let v = cpu.status();
            push8(cpu, bus, v);
        }

        // ----- stack pulls -------------------------------------------------
        Mnemonic::Pla => {
            let v = if cpu.a_is_8bit() {
                pull8(cpu, bus) as u16
            } else {
                pull16(cpu, bus)
            };
            cpu.set_a(v);
        }
        Mnemonic::Plx => {
            let v = if cpu.index_is_8bit() {
                pull8(cpu, bus) as u16
            } else {
                pull16(cpu, bus)
            };
            cpu.set_x(v);
        }
        Mnemonic::Ply => {
            let v = if cpu.index_is_8bit() {
                pull8(cpu, bus) as u16
            } else {
                pull16(cpu, bus)
            };
            cpu.set_y(v);
        }
        Mnemonic::Plb => {
            let v = pull8(cpu, bus);
            cpu.set_dbr(v);
        }
        Mnemonic::Pld => {
            let v = pull16(cpu, bus);
            cpu.set_dp(v);
        }
        Mnemonic::Plp => {
            let v = pull8(cpu, bus);
            cpu.force_status(v);
        }

        // ----- push effective address --------------------------------------
        Mnemonic::Pea | Mnemonic::Pei | Mnemonic::Per => {
            if let Some(v) = ea.address() {
                push16(cpu, bus, v as u16);
            }
        }

        // ----- flag instructions -------------------------------------------
        Mnemonic::Clc => cpu.assign_flag(CARRY, false),
        Mnemonic::Sec => cpu.assign_flag(CARRY, true),
        Mnemonic::Cli => cpu.assign_flag(IRQ_DISABLE, false),
        Mnemonic::Sei => cpu.assign_flag(IRQ_DISABLE, true),
        Mnemonic::Clv => cpu.assign_flag(OVERFLOW, false),
        Mnemonic::Cld => cpu.assign_flag(DECIMAL, false),
        Mnemonic::Sed => cpu.set_flag_mask(DECIMAL),
        Mnemonic::Rep => {
            if let EffectiveAddress::Immediate(mask) = ea {
                cpu.clear_flag_mask(mask as u8);
            }
        }
        Mnemonic::Sep => {
            if let EffectiveAddress::Immediate(mask) = ea {
                cpu.set_flag_mask(mask as u8);
            }
        }
        Mnemonic::Xce => {
            let carry = cpu.is_flag_set(CARRY);
            if carry != cpu.emulation() {
                if carry {
                    cpu.enter_emulation();
                } else {
                    cpu.leave_emulation();
                }
            }
        }
        _ => return false,
    }
    true
}

/// Push a register value at its operating width.
#[inline]
fn push_sized<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, value: u16, wide: bool) {
    if wide {
        push16(cpu, bus, value);
    } else {
        push8(cpu, bus, value as u8);
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu::dispatch::step;
    use crate::cpu::state::{CARRY, CpuState, INDEX_8, MEMORY_8, NEGATIVE, ZERO};
    use crate::test_utils::build_test_bus;

    fn setup(program: &[u8]) -> (CpuState, crate::bus::Bus) {
        let bus = build_test_bus(program);
        let mut cpu = CpuState::default();
        cpu.set_pc(0x8000);
        (cpu, bus)
    }

    #[test]
    fn pha_pla_round_trip() {
        let (mut cpu, mut bus) = setup(&[0x48, 0xA9, 0x00, 0x68]);
        cpu.set_a(0x5A);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert!(cpu.is_flag_set(ZERO));
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a_sized(), 0x5A);
        assert!(!cpu.is_flag_set(ZERO));
    }

    #[test]
    fn wide_push_pull_keeps_sixteen_bits() {
        let (mut cpu, mut bus) = setup(&[0x48, 0xA9, 0x00, 0x00, 0x68]);
        cpu.leave_emulation();
        cpu.clear_flag_mask(MEMORY_8 | INDEX_8);
        cpu.set_a(0xBEEF);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a(), 0xBEEF);
    }

    #[test]
    fn pea_pushes_the_operand_itself() {
        let (mut cpu, mut bus) = setup(&[0xF4, 0x34, 0x12]);
        cpu.set_sp(0x01FD);
        let sp0 = cpu.sp();
        step(&mut cpu, &mut bus);
        assert_eq!(bus.read(sp0 as u32), 0x12);
        assert_eq!(bus.read(sp0 as u32 - 1), 0x34);
    }

    #[test]
    fn transfers_between_banks_and_pointers() {
        let (mut cpu, mut bus) = setup(&[0x5B, 0x7B]);
        cpu.leave_emulation();
        cpu.clear_flag_mask(MEMORY_8);
        cpu.set_a(0x1234);
        // TCD copies A into the direct page register.
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.dp(), 0x1234);
        cpu.set_a(0x0000);
        // TDC copies it back, full 16 bits regardless of M.
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a(), 0x1234);
    }

    #[test]
    fn txs_does_not_touch_flags() {
        let (mut cpu, mut bus) = setup(&[0x9A]);
        cpu.set_x(0x80);
        let status = cpu.status();
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.sp() & 0x00FF, 0x0080);
        assert_eq!(cpu.status(), status);
    }

    #[test]
    fn xba_swaps_and_flags_follow_low_byte() {
        let (mut cpu, mut bus) = setup(&[0xEB]);
        cpu.leave_emulation();
        cpu.clear_flag_mask(MEMORY_8);
        cpu.set_a(0x80FF);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a(), 0xFF80);
        assert!(cpu.is_flag_set(NEGATIVE));
    }

    #[test]
    fn sep_rep_adjust_widths() {
        let (mut cpu, mut bus) = setup(&[0xE2, 0x20, 0xC2, 0x20]);
        cpu.leave_emulation();
        cpu.clear_flag_mask(MEMORY_8);
        step(&mut cpu, &mut bus);
        assert!(cpu.a_is_8bit());
        step(&mut cpu, &mut bus);
        assert!(!cpu.a_is_8bit());
    }

    #[test]
    fn xce_round_trip_restores_emulation() {
        let (mut cpu, mut bus) = setup(&[0x18, 0xFB, 0x38, 0xFB]);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert!(!cpu.emulation());
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert!(cpu.emulation());
        assert!(!cpu.is_flag_set(CARRY));
    }
}
