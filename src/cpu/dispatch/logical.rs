/*!
logical.rs - Logical and bit-test family handler (AND/ORA/EOR/BIT/TRB/TSB).

BIT computes Z from `A & value`; the non-immediate forms additionally
copy the operand's top two bits into N and V. TRB/TSB test `value & A`
for Z and then clear or set the accumulator's bits in memory without
touching N.
*/

use crate::bus::Bus;
use crate::cpu::addressing::EffectiveAddress;
use crate::cpu::execute::{fetch_data, read_sized, width_mask, write_sized};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{NEGATIVE, OVERFLOW, ZERO};
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle<C: CpuRegs>(
    info: &OpInfo,
    ea: EffectiveAddress,
    cpu: &mut C,
    bus: &mut Bus,
) -> bool {
    let wide = !cpu.a_is_8bit();
    match info.mnemonic {
        Mnemonic::And => {
            let v = fetch_data(cpu, bus, ea, wide);
            cpu.set_a(cpu.a_sized() & v);
        }
        Mnemonic::Ora => {
            let v = fetch_data(cpu, bus, ea, wide);
            cpu.set_a(cpu.a_sized() | v);
        }
        Mnemonic::Eor => {
            let v = fetch_data(cpu, bus, ea, wide);
            cpu.set_a(cpu.a_sized() ^ v);
        }
        Mnemonic::Bit => {
            let v = fetch_data(cpu, bus, ea, wide);
            cpu.assign_flag(ZERO, (cpu.a_sized() & v) == 0);
            if !matches!(ea, EffectiveAddress::Immediate(_)) {
                let (_, sign) = width_mask(wide);
                cpu.assign_flag(NEGATIVE, (v as u32 & sign) != 0);
                cpu.assign_flag(OVERFLOW, (v as u32 & (sign >> 1)) != 0);
            }
        }
        Mnemonic::Trb => {
            if let Some(addr) = ea.address() {
                let v = read_sized(bus, addr, wide);
                cpu.assign_flag(ZERO, (v & cpu.a_sized()) == 0);
                write_sized(bus, addr, v & !cpu.a_sized(), wide);
            }
        }
        Mnemonic::Tsb => {
            if let Some(addr) = ea.address() {
                let v = read_sized(bus, addr, wide);
                cpu.assign_flag(ZERO, (v & cpu.a_sized()) == 0);
                write_sized(bus, addr, v | cpu.a_sized(), wide);
            }
        }
        _ => return false,
    }
    true
}
