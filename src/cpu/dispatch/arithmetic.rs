/*!
arithmetic.rs - ADC / SBC family handler.

Both fetch their operand at the accumulator width and delegate to the
ALU cores in `execute`. Decimal mode is reported (once) and the binary
result is used.
*/

use crate::bus::Bus;
use crate::cpu::addressing::EffectiveAddress;
use crate::cpu::execute::{adc, fetch_data, sbc};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle<C: CpuRegs>(
    info: &OpInfo,
    ea: EffectiveAddress,
    cpu: &mut C,
    bus: &mut Bus,
) -> bool {
    match info.mnemonic {
        Mnemonic::Adc => {
            let v = fetch_data(cpu, bus, ea, !cpu.a_is_8bit());
            adc(cpu, v);
        }
        Mnemonic::Sbc => {
            let v = fetch_data(cpu, bus, ea, !cpu.a_is_8bit());
            sbc(cpu, v);
        }
        _ => return false,
    }
    true
}
