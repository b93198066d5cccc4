/*!
table.rs - Immutable 256-entry opcode table.

Each entry maps an opcode byte to (mnemonic, addressing mode, base cycle
cost). The table is a plain static array indexed by the opcode byte;
dispatch never mutates it.

Cycle counts are base costs only. Cycle-accurate timing (page-cross and
width penalties) is out of scope; `step` reports the base cost so a
driver can do coarse throttling.
*/

use crate::cpu::addressing::AddressingMode;

/// Instruction mnemonics of the 65c816.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Bra, Brk, Brl, Bvc,
    Bvs, Clc, Cld, Cli, Clv, Cmp, Cop, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc,
    Inx, Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Mvn, Mvp, Nop, Ora, Pea, Pei,
    Per, Pha, Phb, Phd, Phk, Php, Phx, Phy, Pla, Plb, Pld, Plp, Plx, Ply,
    Rep, Rol, Ror, Rti, Rtl, Rts, Sbc, Sec, Sed, Sei, Sep, Sta, Stp, Stx,
    Sty, Stz, Tax, Tay, Tcd, Tcs, Tdc, Trb, Tsb, Tsc, Tsx, Txa, Txs, Txy,
    Tya, Tyx, Wai, Wdm, Xba, Xce,
}

impl Mnemonic {
    /// Immediate operand width follows the M flag for these.
    #[inline]
    pub fn uses_memory_width(self) -> bool {
        matches!(
            self,
            Mnemonic::Ora
                | Mnemonic::And
                | Mnemonic::Eor
                | Mnemonic::Adc
                | Mnemonic::Bit
                | Mnemonic::Lda
                | Mnemonic::Cmp
                | Mnemonic::Sbc
        )
    }

    /// Immediate operand width follows the X flag for these.
    #[inline]
    pub fn uses_index_width(self) -> bool {
        matches!(
            self,
            Mnemonic::Ldx | Mnemonic::Ldy | Mnemonic::Cpx | Mnemonic::Cpy
        )
    }

    /// SEP/REP take a 1-byte flag mask regardless of register widths.
    #[inline]
    pub fn is_flag_mask(self) -> bool {
        matches!(self, Mnemonic::Sep | Mnemonic::Rep)
    }

    /// Control-transfer mnemonics resolve absolute operands against the
    /// program bank instead of the data bank.
    #[inline]
    pub fn is_control_transfer(self) -> bool {
        matches!(self, Mnemonic::Jmp | Mnemonic::Jsr)
    }
}

/// One opcode table entry.
#[derive(Debug, Clone, Copy)]
pub struct OpInfo {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub cycles: u8,
}

const fn op(mnemonic: Mnemonic, mode: AddressingMode, cycles: u8) -> OpInfo {
    OpInfo {
        mnemonic,
        mode,
        cycles,
    }
}

use AddressingMode::*;
use Mnemonic::*;

/// The full opcode map, indexed by the opcode byte.
#[rustfmt::skip]
pub static OPCODES: [OpInfo; 256] = [
    // 0x00
    op(Brk, StackInterrupt, 7),
    op(Ora, DirectPageIndexedIndirectX, 6),
    op(Cop, StackInterrupt, 7),
    op(Ora, StackRelative, 4),
    op(Tsb, DirectPage, 5),
    op(Ora, DirectPage, 3),
    op(Asl, DirectPage, 5),
    op(Ora, DirectPageIndirectLong, 6),
    op(Php, StackPush, 3),
    op(Ora, Immediate, 2),
    op(Asl, Accumulator, 2),
    op(Phd, StackPush, 4),
    op(Tsb, Absolute, 6),
    op(Ora, Absolute, 4),
    op(Asl, Absolute, 6),
    op(Ora, AbsoluteLong, 5),
    // 0x10
    op(Bpl, PcRelative, 2),
    op(Ora, DirectPageIndirectIndexedY, 6),
    op(Ora, DirectPageIndirect, 5),
    op(Ora, StackRelativeIndirectIndexedY, 7),
    op(Trb, DirectPage, 5),
    op(Ora, DirectPageIndexedX, 4),
    op(Asl, DirectPageIndexedX, 6),
    op(Ora, DirectPageIndirectLongIndexedY, 4),
    op(Clc, Implied, 2),
    op(Ora, AbsoluteIndexedY, 4),
    op(Inc, Accumulator, 2),
    op(Tcs, Implied, 2),
    op(Trb, Absolute, 6),
    op(Ora, AbsoluteIndexedX, 4),
    op(Asl, AbsoluteIndexedX, 7),
    op(Ora, AbsoluteLongIndexedX, 5),
    // 0x20
    op(Jsr, Absolute, 6),
    op(And, DirectPageIndexedIndirectX, 6),
    op(Jsr, AbsoluteLong, 8),
    op(And, StackRelative, 4),
    op(Bit, DirectPage, 3),
    op(And, DirectPage, 3),
    op(Rol, DirectPage, 5),
    op(And, DirectPageIndirectLong, 6),
    op(Plp, StackPull, 4),
    op(And, Immediate, 2),
    op(Rol, Accumulator, 2),
    op(Pld, StackPull, 5),
    op(Bit, Absolute, 4),
    op(And, Absolute, 4),
    op(Rol, Absolute, 6),
    op(And, AbsoluteLong, 5),
    // 0x30
    op(Bmi, PcRelative, 2),
    op(And, DirectPageIndirectIndexedY, 5),
    op(And, DirectPageIndirect, 5),
    op(And, StackRelativeIndirectIndexedY, 7),
    op(Bit, DirectPageIndexedX, 4),
    op(And, DirectPageIndexedX, 4),
    op(Rol, DirectPageIndexedX, 6),
    op(And, DirectPageIndirectLongIndexedY, 6),
    op(Sec, Implied, 2),
    op(And, AbsoluteIndexedY, 4),
    op(Dec, Accumulator, 2),
    op(Tsc, Implied, 2),
    op(Bit, AbsoluteIndexedX, 4),
    op(And, AbsoluteIndexedX, 4),
    op(Rol, AbsoluteIndexedX, 7),
    op(And, AbsoluteLongIndexedX, 5),
    // 0x40
    op(Rti, StackRti, 6),
    op(Eor, DirectPageIndexedIndirectX, 6),
    op(Wdm, PcRelative, 2),
    op(Eor, StackRelative, 4),
    op(Mvp, BlockMove, 4),
    op(Eor, DirectPage, 3),
    op(Lsr, DirectPage, 5),
    op(Eor, DirectPageIndirectLong, 6),
    op(Pha, StackPush, 3),
    op(Eor, Immediate, 2),
    op(Lsr, Accumulator, 2),
    op(Phk, StackPush, 3),
    op(Jmp, Absolute, 3),
    op(Eor, Absolute, 4),
    op(Lsr, Absolute, 6),
    op(Eor, AbsoluteLong, 5),
    // 0x50
    op(Bvc, PcRelative, 2),
    op(Eor, DirectPageIndirectIndexedY, 5),
    op(Eor, DirectPageIndirect, 5),
    op(Eor, StackRelativeIndirectIndexedY, 7),
    op(Mvn, BlockMove, 2),
    op(Eor, DirectPageIndexedX, 4),
    op(Lsr, DirectPageIndexedX, 6),
    op(Eor, DirectPageIndirectLongIndexedY, 6),
    op(Cli, Implied, 2),
    op(Eor, AbsoluteIndexedY, 4),
    op(Phy, StackPush, 3),
    op(Tcd, Implied, 2),
    op(Jmp, AbsoluteLong, 4),
    op(Eor, AbsoluteIndexedX, 4),
    op(Lsr, AbsoluteIndexedX, 7),
    op(Eor, AbsoluteLongIndexedX, 5),
    // 0x60
    op(Rts, StackRts, 6),
    op(Adc, DirectPageIndexedIndirectX, 6),
    op(Per, StackPcRelativeLong, 6),
    op(Adc, StackRelative, 4),
    op(Stz, DirectPage, 3),
    op(Adc, DirectPage, 3),
    op(Ror, DirectPage, 5),
    op(Adc, DirectPageIndirectLong, 6),
    op(Pla, StackPull, 4),
    op(Adc, Immediate, 2),
    op(Ror, Accumulator, 2),
    op(Rtl, StackRtl, 6),
    op(Jmp, AbsoluteIndirect, 5),
    op(Adc, Absolute, 4),
    op(Ror, Absolute, 6),
    op(Adc, AbsoluteLong, 5),
    // 0x70
    op(Bvs, PcRelative, 2),
    op(Adc, DirectPageIndirectIndexedY, 5),
    op(Adc, DirectPageIndirect, 5),
    op(Adc, StackRelativeIndirectIndexedY, 7),
    op(Stz, DirectPageIndexedX, 4),
    op(Adc, DirectPageIndexedX, 4),
    op(Ror, DirectPageIndexedX, 6),
    op(Adc, DirectPageIndirectLongIndexedY, 6),
    op(Sei, Implied, 2),
    op(Adc, AbsoluteIndexedY, 4),
    op(Ply, StackPull, 4),
    op(Tdc, Implied, 2),
    op(Jmp, AbsoluteIndexedIndirect, 6),
    op(Adc, AbsoluteIndexedX, 4),
    op(Ror, AbsoluteIndexedX, 7),
    op(Adc, AbsoluteLongIndexedX, 5),
    // 0x80
    op(Bra, PcRelative, 3),
    op(Sta, DirectPageIndexedIndirectX, 6),
    op(Brl, PcRelativeLong, 4),
    op(Sta, StackRelative, 4),
    op(Sty, DirectPage, 3),
    op(Sta, DirectPage, 3),
    op(Stx, DirectPage, 3),
    op(Sta, DirectPageIndirectLong, 6),
    op(Dey, Implied, 2),
    op(Bit, Immediate, 2),
    op(Txa, Implied, 2),
    op(Phb, StackPush, 3),
    op(Sty, Absolute, 4),
    op(Sta, Absolute, 4),
    op(Stx, Absolute, 4),
    op(Sta, AbsoluteLong, 5),
    // 0x90
    op(Bcc, PcRelative, 2),
    op(Sta, DirectPageIndirectIndexedY, 6),
    op(Sta, DirectPageIndirect, 5),
    op(Sta, StackRelativeIndirectIndexedY, 7),
    op(Sty, DirectPageIndexedX, 4),
    op(Sta, DirectPageIndexedX, 4),
    op(Stx, DirectPageIndexedY, 4),
    op(Sta, DirectPageIndirectLongIndexedY, 6),
    op(Tya, Implied, 2),
    op(Sta, AbsoluteIndexedY, 5),
    op(Txs, Implied, 2),
    op(Txy, Implied, 2),
    op(Stz, Absolute, 4),
    op(Sta, AbsoluteIndexedX, 5),
    op(Stz, AbsoluteIndexedX, 5),
    op(Sta, AbsoluteLongIndexedX, 6),
    // 0xA0
    op(Ldy, Immediate, 2),
    op(Lda, DirectPageIndexedIndirectX, 6),
    op(Ldx, Immediate, 2),
    op(Lda, StackRelative, 4),
    op(Ldy, DirectPage, 3),
    op(Lda, DirectPage, 3),
    op(Ldx, DirectPage, 3),
    op(Lda, DirectPageIndirectLong, 6),
    op(Tay, Implied, 2),
    op(Lda, Immediate, 2),
    op(Tax, Implied, 2),
    op(Plb, StackPull, 4),
    op(Ldy, Absolute, 4),
    op(Lda, Absolute, 4),
    op(Ldx, Absolute, 4),
    op(Lda, AbsoluteLong, 6),
    // 0xB0
    op(Bcs, PcRelative, 2),
    op(Lda, DirectPageIndirectIndexedY, 5),
    op(Lda, DirectPageIndirect, 5),
    op(Lda, StackRelativeIndirectIndexedY, 7),
    op(Ldy, DirectPageIndexedX, 4),
    op(Lda, DirectPageIndexedX, 4),
    op(Ldx, DirectPageIndexedY, 6),
    op(Lda, DirectPageIndirectLongIndexedY, 6),
    op(Clv, Implied, 2),
    op(Lda, AbsoluteIndexedY, 4),
    op(Tsx, Implied, 2),
    op(Tyx, Implied, 2),
    op(Ldy, AbsoluteIndexedX, 4),
    op(Lda, AbsoluteIndexedX, 4),
    op(Ldx, AbsoluteIndexedY, 4),
    op(Lda, AbsoluteLongIndexedX, 6),
    // 0xC0
    op(Cpy, Immediate, 2),
    op(Cmp, DirectPageIndexedIndirectX, 6),
    op(Rep, Immediate, 3),
    op(Cmp, StackRelative, 4),
    op(Cpy, DirectPage, 3),
    op(Cmp, DirectPage, 3),
    op(Dec, DirectPage, 5),
    op(Cmp, DirectPageIndirectLong, 6),
    op(Iny, Implied, 2),
    op(Cmp, Immediate, 2),
    op(Dex, Implied, 2),
    op(Wai, Implied, 3),
    op(Cpy, Absolute, 4),
    op(Cmp, Absolute, 4),
    op(Dec, Absolute, 6),
    op(Cmp, AbsoluteLong, 6),
    // 0xD0
    op(Bne, PcRelative, 2),
    op(Cmp, DirectPageIndirectIndexedY, 5),
    op(Cmp, DirectPageIndirect, 5),
    op(Cmp, StackRelativeIndirectIndexedY, 7),
    op(Pei, StackDirectPageIndirect, 6),
    op(Cmp, DirectPageIndexedX, 4),
    op(Dec, DirectPageIndexedX, 6),
    op(Cmp, DirectPageIndirectLongIndexedY, 6),
    op(Cld, Implied, 2),
    op(Cmp, AbsoluteIndexedY, 4),
    op(Phx, StackPush, 3),
    op(Stp, Implied, 3),
    op(Jmp, AbsoluteIndirectLong, 6),
    op(Cmp, AbsoluteIndexedX, 7),
    op(Dec, AbsoluteIndexedX, 6),
    op(Cmp, AbsoluteLongIndexedX, 5),
    // 0xE0
    op(Cpx, Immediate, 2),
    op(Sbc, DirectPageIndexedIndirectX, 6),
    op(Sep, Immediate, 3),
    op(Sbc, StackRelative, 3),
    op(Cpx, DirectPage, 3),
    op(Sbc, DirectPage, 3),
    op(Inc, DirectPage, 5),
    op(Sbc, DirectPageIndirectLong, 6),
    op(Inx, Implied, 2),
    op(Sbc, Immediate, 2),
    op(Nop, Implied, 2),
    op(Xba, Implied, 3),
    op(Cpx, Absolute, 4),
    op(Sbc, Absolute, 4),
    op(Inc, Absolute, 6),
    op(Sbc, AbsoluteLong, 5),
    // 0xF0
    op(Beq, PcRelative, 2),
    op(Sbc, DirectPageIndirectIndexedY, 5),
    op(Sbc, DirectPageIndirect, 5),
    op(Sbc, StackRelativeIndirectIndexedY, 7),
    op(Pea, StackAbsolute, 5),
    op(Sbc, DirectPageIndexedX, 4),
    op(Inc, DirectPageIndexedX, 6),
    op(Sbc, DirectPageIndirectLongIndexedY, 6),
    op(Sed, Implied, 2),
    op(Sbc, AbsoluteIndexedY, 4),
    op(Plx, StackPull, 4),
    op(Xce, Implied, 2),
    op(Jsr, AbsoluteIndexedIndirect, 8),
    op(Sbc, AbsoluteIndexedX, 4),
    op(Inc, AbsoluteIndexedX, 7),
    op(Sbc, AbsoluteLongIndexedX, 5),
];
