/*!
cpu::mod - Public facade for the 65c816 CPU core.

Module layout:

```text
    state.rs        - Architectural register file, flags, width rules.
    regs.rs         - `CpuRegs` trait for generic instruction helpers.
    addressing.rs   - Addressing mode enum, operand sizing, resolution.
    table.rs        - 256-entry opcode table (mnemonic, mode, cycles).
    execute.rs      - Instruction semantic helpers (ALU, stack, RMW).
    dispatch/       - Per-family handlers and the single-step orchestrator.
    core/           - `Cpu` facade (reset, step, nmi, register dump).
```

The public surface is the `Cpu` facade plus `CpuState` and the flag
constants for tests and tooling. Internal module organization may evolve.
*/

pub mod addressing;
pub mod core;
pub mod dispatch;
pub mod execute;
pub mod regs;
pub mod state;
pub mod table;

pub use crate::cpu::core::Cpu;
pub use crate::cpu::regs::CpuRegs;
pub use crate::cpu::state::{
    CARRY, CpuState, DECIMAL, INDEX_8, IRQ_DISABLE, MEMORY_8, NEGATIVE, OVERFLOW, ZERO,
};
