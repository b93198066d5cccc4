/*!
core::Cpu - 65c816 CPU facade wrapping `CpuState`.

`Cpu` owns the architectural state and exposes the operations a system
driver needs: reset (seed PC from the emulation RESET vector), single
step, and NMI delivery from the native vector table. Register access for
inspection goes through `state()`; the debugger uses it to print the
register file after each step.
*/

use std::fmt;

use crate::bus::Bus;
use crate::cpu::dispatch;
use crate::cpu::state::CpuState;

#[derive(Debug, Clone)]
pub struct Cpu {
    state: CpuState,
}

impl Cpu {
    /// Construct a new CPU with power-up defaults (emulation mode).
    pub fn new() -> Self {
        Self {
            state: CpuState::new(),
        }
    }

    /// Immutable view of the register file (inspection / testing).
    #[inline]
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Mutable access to the register file (tests and tooling).
    #[inline]
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// Reset to power-up defaults and seed PC from the cartridge's
    /// emulation-mode RESET vector. The CPU starts in emulation mode
    /// with the stack in page 1.
    pub fn reset(&mut self, bus: &mut Bus) {
        self.state = CpuState::new();
        let reset = bus.cartridge().emulation_vectors().reset;
        self.state.set_pc(reset);
    }

    /// Execute one instruction and return the cycles consumed.
    pub fn step(&mut self, bus: &mut Bus) -> u32 {
        dispatch::step(&mut self.state, bus)
    }

    /// Deliver a non-maskable interrupt: control transfers to the
    /// native-mode NMI vector in bank 0.
    pub fn nmi(&mut self, bus: &mut Bus) {
        let vector = bus.cartridge().native_vectors().nmi;
        self.state.set_pbr(0);
        self.state.set_pc(vector);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Cpu {
    /// Register dump in the debugger's one-per-line format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.state;
        writeln!(f, "A  = 0x{:04X}", s.a())?;
        writeln!(f, "X  = 0x{:04X}", s.x())?;
        writeln!(f, "Y  = 0x{:04X}", s.y())?;
        writeln!(f, "DP = 0x{:04X}", s.dp())?;
        writeln!(f, "SP = 0x{:04X}", s.sp())?;
        writeln!(f, "PC = 0x{:02X}:{:04X}", s.pbr(), s.pc())?;
        writeln!(f, "DB = 0x{:02X}", s.dbr())?;
        write!(
            f,
            "P  = 0x{:02X} ({})",
            s.status(),
            if s.emulation() { "emulation" } else { "native" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestImage, build_lorom_image_with};
    use crate::{apu::ApuPorts, cartridge::Cartridge};
    use std::sync::Arc;

    fn setup_with(spec: TestImage<'_>) -> (Cpu, Bus) {
        let image = build_lorom_image_with(spec);
        let cart = Cartridge::from_bytes(&image).expect("parse");
        let mut bus = Bus::new(cart, Arc::new(ApuPorts::new())).expect("lorom");
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        (cpu, bus)
    }

    #[test]
    fn reset_seeds_pc_from_emulation_vector() {
        let (cpu, _bus) = setup_with(TestImage {
            program: &[0xEA],
            reset: 0x8123,
            ..Default::default()
        });
        assert_eq!(cpu.state().pc(), 0x8123);
        assert!(cpu.state().emulation());
        assert_eq!(cpu.state().sp(), 0x0100);
    }

    #[test]
    fn step_executes_from_reset() {
        let (mut cpu, mut bus) = setup_with(TestImage {
            program: &[0xA9, 0x42],
            ..Default::default()
        });
        let cycles = cpu.step(&mut bus);
        assert_eq!(cycles, 2);
        assert_eq!(cpu.state().a_sized(), 0x42);
    }

    #[test]
    fn nmi_jumps_to_native_vector() {
        let (mut cpu, mut bus) = setup_with(TestImage {
            program: &[0xEA],
            nmi: 0x9100,
            ..Default::default()
        });
        cpu.nmi(&mut bus);
        assert_eq!(cpu.state().pc(), 0x9100);
        assert_eq!(cpu.state().pbr(), 0x00);
    }

    #[test]
    fn display_includes_register_file() {
        let (cpu, _bus) = setup_with(TestImage::default());
        let dump = cpu.to_string();
        assert!(dump.contains("A  = 0x0000"));
        assert!(dump.contains("PC = 0x00:8000"));
        assert!(dump.contains("emulation"));
    }
}
