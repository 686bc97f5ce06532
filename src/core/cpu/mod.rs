// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 pstation contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! MIPS R3000A interpreter.
//!
//! Models the load-delay slot and branch-delay slot explicitly as the
//! one-slot queue / flag spec §9's design notes call for, rather than
//! leaving them implicit in "next instruction" scheduling.

use crate::core::error::Result;
use crate::core::memory::Bus;

mod cop0;
pub mod decode;
mod instructions;
#[cfg(test)]
mod tests;

pub use cop0::ExceptionCause;
use cop0::Cop0;
pub use decode::Instruction;

#[derive(Debug, Clone, Copy)]
struct LoadDelay {
    reg: u8,
    value: u32,
}

/// MIPS R3000A core: 32 GPRs (r0 hardwired to zero), HI/LO, PC/next-PC, the
/// branch-delay flag, one pending load, and COP0.
pub struct Cpu {
    regs: [u32; 32],
    pc: u32,
    next_pc: u32,
    hi: u32,
    lo: u32,
    cop0: Cop0,
    load_delay: Option<LoadDelay>,
    in_branch_delay: bool,
    current_instruction: u32,
}

/// BIOS entry point; the CPU fetches its first instruction from here.
pub const RESET_VECTOR: u32 = 0xBFC0_0000;

impl Cpu {
    pub fn new() -> Self {
        Self {
            regs: [0u32; 32],
            pc: RESET_VECTOR,
            next_pc: RESET_VECTOR.wrapping_add(4),
            hi: 0,
            lo: 0,
            cop0: Cop0::new(),
            load_delay: None,
            in_branch_delay: false,
            current_instruction: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline(always)]
    pub fn reg(&self, index: u8) -> u32 {
        if index == 0 {
            0
        } else {
            self.regs[index as usize]
        }
    }

    #[inline(always)]
    pub fn set_reg(&mut self, index: u8, value: u32) {
        if index != 0 {
            self.regs[index as usize] = value;
        }
    }

    /// Address of the next instruction `step` will fetch.
    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn hi(&self) -> u32 {
        self.hi
    }

    pub fn lo(&self) -> u32 {
        self.lo
    }

    pub fn in_delay_slot(&self) -> bool {
        self.in_branch_delay
    }

    pub fn sr(&self) -> u32 {
        self.cop0.regs[Cop0::SR]
    }

    pub fn cause(&self) -> u32 {
        self.cop0.regs[Cop0::CAUSE]
    }

    pub fn epc(&self) -> u32 {
        self.cop0.regs[Cop0::EPC]
    }

    /// Write `SR` directly; used to arm `IEc`/`IM` bits in tests and by a
    /// debugger attaching to a running core.
    pub fn set_sr(&mut self, value: u32) {
        self.cop0.regs[Cop0::SR] = value;
    }

    /// Set PC/next-PC directly, used when a loaded executable specifies an
    /// entry point.
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
        self.next_pc = pc.wrapping_add(4);
    }

    /// Schedule a load's result to become visible only after the
    /// instruction following this one has executed (spec §3/§4.2) — the
    /// one-slot load-delay queue. Resolution itself happens in `step`,
    /// once that following instruction has had its chance to read the
    /// stale value; this just records what's due.
    fn set_reg_delayed(&mut self, index: u8, value: u32) {
        self.load_delay = if index != 0 { Some(LoadDelay { reg: index, value }) } else { None };
    }

    /// Execute exactly one instruction, including interrupt sampling at the
    /// instruction boundary (spec §4.2, §5: never mid-instruction).
    pub fn step(&mut self, bus: &mut Bus) -> Result<()> {
        if self.should_take_interrupt(bus) {
            // `exception` expects `self.pc` to already point one past the
            // faulting instruction (true for every other call site, which
            // fire mid-dispatch after the fetch/advance below). Here we're
            // at the top of `step`, before that advance, so nudge it first;
            // `exception` overwrites `pc` before returning regardless.
            self.pc = self.pc.wrapping_add(4);
            self.exception(ExceptionCause::Interrupt);
            return Ok(());
        }

        let was_in_delay_slot = self.in_branch_delay;
        self.in_branch_delay = false;

        let fetch_pc = self.pc;
        if fetch_pc & 0x3 != 0 {
            self.exception(ExceptionCause::BusErrorInstruction);
            return Ok(());
        }
        let instruction = bus.fetch32(fetch_pc)?;
        self.current_instruction = instruction;

        self.pc = self.next_pc;
        self.next_pc = self.next_pc.wrapping_add(4);

        // A load queued by the *previous* instruction is due now, but must
        // not be written to `regs` until after this instruction's own reads
        // have resolved against the stale value (the load-delay slot).
        let due = self.load_delay.take();

        bus.set_cache_isolated(self.cop0.cache_isolated());
        instructions::execute(self, bus, Instruction(instruction), was_in_delay_slot)?;

        if let Some(delay) = due {
            let superseded = matches!(&self.load_delay, Some(fresh) if fresh.reg == delay.reg);
            if !superseded {
                self.set_reg(delay.reg, delay.value);
            }
        }

        Ok(())
    }

    /// Enter an architectural exception: push the mode stack, latch CAUSE
    /// and EPC, and vector PC to the exception handler (spec §4.2).
    pub(crate) fn exception(&mut self, cause: ExceptionCause) {
        self.cop0.enter_exception();
        self.cop0.set_cause(cause, self.in_branch_delay);

        let faulting_pc = if self.in_branch_delay {
            self.pc.wrapping_sub(8)
        } else {
            self.pc.wrapping_sub(4)
        };
        self.cop0.regs[Cop0::EPC] = faulting_pc;

        let handler = self.cop0.exception_vector();
        log::trace!(
            "exception {:?} at EPC=0x{:08X} -> 0x{:08X} (bd={})",
            cause,
            faulting_pc,
            handler,
            self.in_branch_delay
        );

        self.pc = handler;
        self.next_pc = handler.wrapping_add(4);
        self.in_branch_delay = false;
        self.load_delay = None;
    }

    fn should_take_interrupt(&mut self, bus: &Bus) -> bool {
        let pending = bus.is_interrupt_pending();
        self.cop0.set_ip2(pending);
        pending && self.cop0.external_interrupts_enabled()
    }

    /// A load/store at a misaligned address is architecturally an
    /// address-error exception, never a host error (spec §3).
    fn address_error(&mut self, store: bool) {
        let cause = if store {
            ExceptionCause::AddressErrorStore
        } else {
            ExceptionCause::AddressErrorLoad
        };
        self.exception(cause);
    }

    pub fn dump_registers(&self) {
        println!("PC: 0x{:08X}  HI: 0x{:08X}  LO: 0x{:08X}", self.pc(), self.hi, self.lo);
        for i in 0..32 {
            if i % 4 == 0 {
                println!();
            }
            print!("r{:<2}: 0x{:08X}  ", i, self.reg(i));
        }
        println!();
        println!(
            "SR: 0x{:08X}  CAUSE: 0x{:08X}  EPC: 0x{:08X}",
            self.cop0.regs[Cop0::SR],
            self.cop0.regs[Cop0::CAUSE],
            self.cop0.regs[Cop0::EPC]
        );
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
