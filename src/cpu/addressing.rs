/*!
addressing.rs - 65c816 addressing modes, operand sizing, and resolution.

Overview
========
Provides the two pure pieces of the fetch/decode pipeline:
- `AddressingMode::operand_len` computes how many operand bytes follow
  the opcode. Immediate width depends on the mnemonic and the current
  M/X flags; emulation mode forces 1-byte immediates.
- `resolve` turns the little-endian operand into an `EffectiveAddress`,
  performing any indirection reads through the bus.

Scope & Responsibilities
========================
- Pure address resolution only; no instruction semantics.
- Direct-page pointers live in bank 0. Absolute operands take the data
  bank, or the program bank for control-transfer mnemonics.
- Stack-flavored modes tag their result `Stack` so push-effective-address
  instructions (PEA/PEI/PER) can be told apart from plain loads.

Caller Assumptions
==================
- The operand bytes have already been fetched and PC advanced past
  them; relative displacements are applied to the post-fetch PC.
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Mnemonic;

/// The addressing modes of the 65c816.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Immediate,
    Absolute,
    AbsoluteLong,
    AbsoluteIndexedX,
    AbsoluteIndexedY,
    AbsoluteLongIndexedX,
    AbsoluteIndirect,
    AbsoluteIndexedIndirect,
    AbsoluteIndirectLong,
    DirectPage,
    DirectPageIndexedX,
    DirectPageIndexedY,
    DirectPageIndexedIndirectX,
    DirectPageIndirect,
    DirectPageIndirectLong,
    DirectPageIndirectIndexedY,
    DirectPageIndirectLongIndexedY,
    StackRelative,
    StackRelativeIndirectIndexedY,
    Accumulator,
    PcRelative,
    PcRelativeLong,
    Implied,
    StackInterrupt,
    StackPull,
    StackPush,
    StackRti,
    StackRtl,
    StackRts,
    StackAbsolute,
    StackDirectPageIndirect,
    StackPcRelativeLong,
    BlockMove,
}

/// Resolved operand location for one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveAddress {
    /// No operand location (implied and stack-only modes).
    None,
    /// A 24-bit memory address.
    Simple(u32),
    /// A 24-bit memory address produced by a stack-flavored mode.
    Stack(u32),
    /// The accumulator itself.
    Accumulator,
    /// An immediate value carried in the instruction stream.
    Immediate(u16),
    /// Source/destination/count snapshot for the block-move pair.
    BlockMove { src: u32, dest: u32, count: u32 },
}

impl EffectiveAddress {
    /// The memory address, for modes that resolved to one.
    #[inline]
    pub fn address(self) -> Option<u32> {
        match self {
            EffectiveAddress::Simple(a) | EffectiveAddress::Stack(a) => Some(a),
            _ => None,
        }
    }
}

impl AddressingMode {
    /// Number of operand bytes following the opcode (0 to 3).
    pub fn operand_len<C: CpuRegs>(self, cpu: &C, mnemonic: Mnemonic) -> u16 {
        use AddressingMode::*;
        match self {
            Accumulator | Implied | StackPull | StackPush | StackRti | StackRtl | StackRts => 0,
            DirectPage
            | DirectPageIndexedX
            | DirectPageIndexedY
            | DirectPageIndexedIndirectX
            | DirectPageIndirect
            | DirectPageIndirectLong
            | DirectPageIndirectIndexedY
            | DirectPageIndirectLongIndexedY
            | PcRelative
            | StackDirectPageIndirect
            | StackInterrupt
            | StackRelative
            | StackRelativeIndirectIndexedY => 1,
            Absolute
            | AbsoluteIndexedX
            | AbsoluteIndexedY
            | AbsoluteIndirect
            | AbsoluteIndexedIndirect
            | AbsoluteIndirectLong
            | BlockMove
            | PcRelativeLong
            | StackAbsolute
            | StackPcRelativeLong => 2,
            AbsoluteLong | AbsoluteLongIndexedX => 3,
            Immediate => {
                if mnemonic.is_flag_mask() {
                    1
                } else if mnemonic.uses_memory_width() {
                    if cpu.a_is_8bit() { 1 } else { 2 }
                } else if mnemonic.uses_index_width() {
                    if cpu.index_is_8bit() { 1 } else { 2 }
                } else if cpu.emulation() {
                    1
                } else {
                    2
                }
            }
        }
    }
}

/// Resolve an already-fetched operand into an effective address.
///
/// `operand` holds the little-endian operand bytes (unused bytes zero).
pub(crate) fn resolve<C: CpuRegs>(
    cpu: &mut C,
    bus: &mut Bus,
    mode: AddressingMode,
    mnemonic: Mnemonic,
    operand: u32,
) -> EffectiveAddress {
    use AddressingMode::*;
    match mode {
        Immediate => EffectiveAddress::Immediate(operand as u16),
        Accumulator => EffectiveAddress::Accumulator,
        Implied | StackInterrupt | StackPull | StackPush | StackRti | StackRtl | StackRts => {
            EffectiveAddress::None
        }

        Absolute => {
            let bank = if mnemonic.is_control_transfer() {
                cpu.pbr_base()
            } else {
                cpu.dbr_base()
            };
            EffectiveAddress::Simple(bank + operand)
        }
        AbsoluteIndexedX => {
            EffectiveAddress::Simple(cpu.dbr_base() + operand + cpu.x_sized() as u32)
        }
        AbsoluteIndexedY => {
            EffectiveAddress::Simple(cpu.dbr_base() + operand + cpu.y_sized() as u32)
        }
        AbsoluteLong => EffectiveAddress::Simple(operand),
        AbsoluteLongIndexedX => EffectiveAddress::Simple(operand + cpu.x_sized() as u32),
        AbsoluteIndirect => {
            // Pointer lives in bank 0; target joins the program bank.
            let target = bus.read_word(operand) as u32;
            EffectiveAddress::Simple(cpu.pbr_base() + target)
        }
        AbsoluteIndexedIndirect => {
            let ptr = cpu.pbr_base() + operand + cpu.x_sized() as u32;
            let target = bus.read_word(ptr) as u32;
            EffectiveAddress::Simple(cpu.pbr_base() + target)
        }
        AbsoluteIndirectLong => EffectiveAddress::Simple(bus.read_long(operand)),

        DirectPage => EffectiveAddress::Simple(cpu.dp() as u32 + operand),
        DirectPageIndexedX => {
            EffectiveAddress::Simple(cpu.dp() as u32 + operand + cpu.x_sized() as u32)
        }
        DirectPageIndexedY => {
            EffectiveAddress::Simple(cpu.dp() as u32 + operand + cpu.y_sized() as u32)
        }
        DirectPageIndexedIndirectX => {
            let ptr = cpu.dp() as u32 + operand + cpu.x_sized() as u32;
            let target = bus.read_word(ptr) as u32;
            EffectiveAddress::Simple(cpu.dbr_base() + target)
        }
        DirectPageIndirect => {
            let ptr = cpu.dp() as u32 + operand;
            let target = bus.read_word(ptr) as u32;
            EffectiveAddress::Simple(cpu.dbr_base() + target)
        }
        DirectPageIndirectLong => {
            let ptr = cpu.dp() as u32 + operand;
            EffectiveAddress::Simple(bus.read_long(ptr))
        }
        DirectPageIndirectIndexedY => {
            let ptr = cpu.dp() as u32 + operand;
            let target = bus.read_word(ptr) as u32;
            EffectiveAddress::Simple(cpu.dbr_base() + target + cpu.y_sized() as u32)
        }
        DirectPageIndirectLongIndexedY => {
            let ptr = cpu.dp() as u32 + operand;
            let target = bus.read_long(ptr);
            EffectiveAddress::Simple(cpu.dbr_base() + target + cpu.y_sized() as u32)
        }

        StackRelative => EffectiveAddress::Stack(cpu.sp() as u32 + operand),
        StackRelativeIndirectIndexedY => {
            let ptr = cpu.sp() as u32 + operand;
            let target = bus.read_word(ptr) as u32;
            EffectiveAddress::Stack(cpu.dbr_base() + target + cpu.y_sized() as u32)
        }
        StackAbsolute => EffectiveAddress::Stack(operand),
        StackDirectPageIndirect => {
            let ptr = cpu.dp() as u32 + operand;
            let target = bus.read_word(ptr) as u32;
            EffectiveAddress::Stack(cpu.dbr_base() + target)
        }
        StackPcRelativeLong => EffectiveAddress::Stack(pc_relative_long(cpu, operand)),

        PcRelative => {
            let disp = operand as u8 as i8 as i16 as u16;
            let target = cpu.pc().wrapping_add(disp);
            EffectiveAddress::Simple(cpu.pbr_base() | target as u32)
        }
        PcRelativeLong => EffectiveAddress::Simple(pc_relative_long(cpu, operand)),

        BlockMove => EffectiveAddress::BlockMove {
            src: cpu.x_sized() as u32,
            dest: cpu.y_sized() as u32,
            count: cpu.a() as u32 + 1,
        },
    }
}

#[inline]
fn pc_relative_long<C: CpuRegs>(cpu: &C, operand: u32) -> u32 {
    let target = cpu.pc().wrapping_add(operand as u16);
    cpu.pbr_base() | target as u32
}
