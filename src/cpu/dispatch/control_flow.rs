/*!
control_flow.rs - Jump / call / return family handler, plus the system
instructions that execute as distinguishable no-ops.

JMP installs both the program bank and PC from the resolved target, so
long and indirect-long forms switch banks while in-bank forms are
unchanged. JSR pushes the address of its last operand byte; RTS/RTL
add one back on return.

Software interrupts (BRK/COP), the wait/stop pair, and the block-move
pair are outside the implemented feature set. Each consumes its operand
bytes, reports once on stderr, and otherwise does nothing.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{AddressingMode, EffectiveAddress};
use crate::cpu::execute::{pull8, pull16, push16};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Mnemonic, OpInfo};

// Report-latch bit assignments for the no-op instructions.
const BIT_BRK: u8 = 0;
const BIT_COP: u8 = 1;
const BIT_WAI: u8 = 2;
const BIT_STP: u8 = 3;
const BIT_WDM: u8 = 4;
const BIT_MVN: u8 = 5;
const BIT_MVP: u8 = 6;

pub(super) fn handle<C: CpuRegs>(
    info: &OpInfo,
    ea: EffectiveAddress,
    cpu: &mut C,
    bus: &mut Bus,
) -> bool {
    match info.mnemonic {
        Mnemonic::Jmp => {
            if let Some(target) = ea.address() {
                cpu.set_pbr((target >> 16) as u8);
                cpu.set_pc(target as u16);
            }
        }
        Mnemonic::Jsr => {
            if let Some(target) = ea.address() {
                let ret = cpu.pc().wrapping_sub(1);
                push16(cpu, bus, ret);
                if info.mode == AddressingMode::AbsoluteLong {
                    cpu.set_pbr((target >> 16) as u8);
                }
                cpu.set_pc(target as u16);
            }
        }
        Mnemonic::Rts => {
            let ret = pull16(cpu, bus);
            cpu.set_pc(ret.wrapping_add(1));
        }
        Mnemonic::Rtl => {
            let ret = pull16(cpu, bus);
            let bank = pull8(cpu, bus);
            cpu.set_pc(ret.wrapping_add(1));
            cpu.set_pbr(bank);
        }
        Mnemonic::Rti => {
            let pc = pull16(cpu, bus);
            let bank = pull8(cpu, bus);
            let status = pull8(cpu, bus);
            cpu.set_pc(pc);
            cpu.set_pbr(bank);
            cpu.force_status(status);
        }
        Mnemonic::Brk => cpu.report_unimplemented(BIT_BRK, "BRK"),
        Mnemonic::Cop => cpu.report_unimplemented(BIT_COP, "COP"),
        Mnemonic::Wai => cpu.report_unimplemented(BIT_WAI, "WAI"),
        Mnemonic::Stp => cpu.report_unimplemented(BIT_STP, "STP"),
        Mnemonic::Wdm => cpu.report_unimplemented(BIT_WDM, "WDM"),
        Mnemonic::Mvn => cpu.report_unimplemented(BIT_MVN, "MVN"),
        Mnemonic::Mvp => cpu.report_unimplemented(BIT_MVP, "MVP"),
        Mnemonic::Nop => {}
        _ => return false,
    }
    true
}
