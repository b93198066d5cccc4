/*!
rmw.rs - Shift / rotate / increment / decrement family handler.

Memory forms read at the accumulator width, transform, and write back
through `store_rmw`, which updates Z/N from the stored value.
Accumulator forms go through the width-aware `set_a`. INX/INY/DEX/DEY
operate at the index width via the width-aware index setters.
*/

use crate::bus::Bus;
use crate::cpu::addressing::EffectiveAddress;
use crate::cpu::execute::{
    asl_value, fetch_data, lsr_value, rol_value, ror_value, store_rmw, width_mask,
};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle<C: CpuRegs>(
    info: &OpInfo,
    ea: EffectiveAddress,
    cpu: &mut C,
    bus: &mut Bus,
) -> bool {
    let wide = !cpu.a_is_8bit();
    match info.mnemonic {
        Mnemonic::Asl => {
            let v = fetch_data(cpu, bus, ea, wide);
            let r = asl_value(cpu, v, wide);
            store_rmw(cpu, bus, ea, r, wide);
        }
        Mnemonic::Lsr => {
            let v = fetch_data(cpu, bus, ea, wide);
            let r = lsr_value(cpu, v, wide);
            store_rmw(cpu, bus, ea, r, wide);
        }
        Mnemonic::Rol => {
            let v = fetch_data(cpu, bus, ea, wide);
            let r = rol_value(cpu, v, wide);
            store_rmw(cpu, bus, ea, r, wide);
        }
        Mnemonic::Ror => {
            let v = fetch_data(cpu, bus, ea, wide);
            let r = ror_value(cpu, v, wide);
            store_rmw(cpu, bus, ea, r, wide);
        }
        Mnemonic::Inc => {
            let (mask, _) = width_mask(wide);
            let v = fetch_data(cpu, bus, ea, wide);
            store_rmw(cpu, bus, ea, (v as u32 + 1 & mask) as u16, wide);
        }
        Mnemonic::Dec => {
            let (mask, _) = width_mask(wide);
            let v = fetch_data(cpu, bus, ea, wide);
            store_rmw(cpu, bus, ea, ((v as u32).wrapping_sub(1) & mask) as u16, wide);
        }
        Mnemonic::Inx => cpu.set_x(cpu.x_sized().wrapping_add(1)),
        Mnemonic::Iny => cpu.set_y(cpu.y_sized().wrapping_add(1)),
        Mnemonic::Dex => cpu.set_x(cpu.x_sized().wrapping_sub(1)),
        Mnemonic::Dey => cpu.set_y(cpu.y_sized().wrapping_sub(1)),
        _ => return false,
    }
    true
}
