/*!
load_store.rs - Load / store family handler.

Loads write the destination register at its current width and update
Z/N through the width-aware setters. Stores write memory at the
register's width and leave the flags untouched. STZ writes zero at the
accumulator width.
*/

use crate::bus::Bus;
use crate::cpu::addressing::EffectiveAddress;
use crate::cpu::execute::{fetch_data, write_sized};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle<C: CpuRegs>(
    info: &OpInfo,
    ea: EffectiveAddress,
    cpu: &mut C,
    bus: &mut Bus,
) -> bool {
    match info.mnemonic {
        Mnemonic::Lda => {
            let wide = !cpu.a_is_8bit();
            let v = fetch_data(cpu, bus, ea, wide);
            cpu.set_a(v);
        }
        Mnemonic::Ldx => {
            let wide = !cpu.index_is_8bit();
            let v = fetch_data(cpu, bus, ea, wide);
            cpu.set_x(v);
        }
        Mnemonic::Ldy => {
            let wide = !cpu.index_is_8bit();
            let v = fetch_data(cpu, bus, ea, wide);
            cpu.set_y(v);
        }
        Mnemonic::Sta => {
            if let Some(addr) = ea.address() {
                write_sized(bus, addr, cpu.a_sized(), !cpu.a_is_8bit());
            }
        }
        Mnemonic::Stx => {
            if let Some(addr) = ea.address() {
                write_sized(bus, addr, cpu.x_sized(), !cpu.index_is_8bit());
            }
        }
        Mnemonic::Sty => {
            if let Some(addr) = ea.address() {
                write_sized(bus, addr, cpu.y_sized(), !cpu.index_is_8bit());
            }
        }
        Mnemonic::Stz => {
            if let Some(addr) = ea.address() {
                write_sized(bus, addr, 0, !cpu.a_is_8bit());
            }
        }
        _ => return false,
    }
    true
}
