/*!
branches.rs - Relative branch family handler.

The resolver already turned the displacement into an absolute target in
the current program bank; a taken branch just installs the low 16 bits
as the new PC. BRA/BRL are unconditional.
*/

use crate::cpu::addressing::EffectiveAddress;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, NEGATIVE, OVERFLOW, ZERO};
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle<C: CpuRegs>(info: &OpInfo, ea: EffectiveAddress, cpu: &mut C) -> bool {
    let taken = match info.mnemonic {
        Mnemonic::Bcc => !cpu.is_flag_set(CARRY),
        Mnemonic::Bcs => cpu.is_flag_set(CARRY),
        Mnemonic::Bne => !cpu.is_flag_set(ZERO),
        Mnemonic::Beq => cpu.is_flag_set(ZERO),
        Mnemonic::Bpl => !cpu.is_flag_set(NEGATIVE),
        Mnemonic::Bmi => cpu.is_flag_set(NEGATIVE),
        Mnemonic::Bvc => !cpu.is_flag_set(OVERFLOW),
        Mnemonic::Bvs => cpu.is_flag_set(OVERFLOW),
        Mnemonic::Bra | Mnemonic::Brl => true,
        _ => return false,
    };
    if taken
        && let Some(target) = ea.address()
    {
        cpu.set_pc(target as u16);
    }
    true
}
