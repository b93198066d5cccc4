/*!
compare.rs - CMP / CPX / CPY family handler.

Z and N come from the subtraction result at the register's operating
width; C is the unsigned register >= operand test. The accumulator is
never written.
*/

use crate::bus::Bus;
use crate::cpu::addressing::EffectiveAddress;
use crate::cpu::execute::{compare, fetch_data};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle<C: CpuRegs>(
    info: &OpInfo,
    ea: EffectiveAddress,
    cpu: &mut C,
    bus: &mut Bus,
) -> bool {
    match info.mnemonic {
        Mnemonic::Cmp => {
            let wide = !cpu.a_is_8bit();
            let v = fetch_data(cpu, bus, ea, wide);
            let a = cpu.a_sized();
            compare(cpu, a, v, wide);
        }
        Mnemonic::Cpx => {
            let wide = !cpu.index_is_8bit();
            let v = fetch_data(cpu, bus, ea, wide);
            let x = cpu.x_sized();
            compare(cpu, x, v, wide);
        }
        Mnemonic::Cpy => {
            let wide = !cpu.index_is_8bit();
            let v = fetch_data(cpu, bus, ea, wide);
            let y = cpu.y_sized();
            compare(cpu, y, v, wide);
        }
        _ => return false,
    }
    true
}
