/*!
Snes module: whole-system assembly and power sequencing.

Power-up order matters: the bus must exist (it validates the cartridge
layout) before the CPU resets from the emulation RESET vector, and the
APU bridge thread starts last so its ready signature is observable as
soon as `power_up` returns. Power-down stops the bridge thread and joins
it; dropping the system does the same.
*/

use std::sync::Arc;

use crate::apu::{Apu, ApuPorts};
use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use crate::error::RomError;

/// The assembled console: CPU, bus, and the APU bridge thread.
pub struct Snes {
    bus: Bus,
    cpu: Cpu,
    apu: Apu,
}

impl Snes {
    /// Power up the console around a loaded cartridge. Fails if the bus
    /// rejects the cartridge's address layout.
    pub fn power_up(cartridge: Cartridge) -> Result<Self, RomError> {
        let ports = Arc::new(ApuPorts::new());
        let mut bus = Bus::new(cartridge, ports.clone())?;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        let apu = Apu::power_up(ports);
        Ok(Self { bus, cpu, apu })
    }

    /// Execute one CPU instruction; returns the cycles consumed.
    #[inline]
    pub fn step(&mut self) -> u32 {
        self.cpu.step(&mut self.bus)
    }

    /// Deliver a non-maskable interrupt to the CPU.
    #[inline]
    pub fn nmi(&mut self) {
        self.cpu.nmi(&mut self.bus);
    }

    #[inline]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    #[inline]
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Current 24-bit program address (`program_bank:pc`).
    #[inline]
    pub fn program_address(&self) -> u32 {
        let s = self.cpu.state();
        s.pbr_base() | s.pc() as u32
    }

    /// Stop the APU bridge thread. Idempotent; also runs on drop.
    pub fn power_down(&mut self) {
        self.apu.power_down();
    }
}
