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

//! Conditional branches. The offset is relative to the delay-slot
//! instruction's address, which at dispatch time is already `cpu.pc`
//! (`step` advances `pc`/`next_pc` before calling into the dispatcher).

use super::super::decode::Instruction;
use super::super::Cpu;

const LINK_REG: u8 = 31;

fn take(cpu: &mut Cpu, i: Instruction) -> bool {
    let offset = i.imm_se() << 2;
    cpu.next_pc = cpu.pc.wrapping_add(offset);
    true
}

pub fn beq(cpu: &mut Cpu, i: Instruction) -> bool {
    if cpu.reg(i.rs()) == cpu.reg(i.rt()) {
        take(cpu, i)
    } else {
        false
    }
}

pub fn bne(cpu: &mut Cpu, i: Instruction) -> bool {
    if cpu.reg(i.rs()) != cpu.reg(i.rt()) {
        take(cpu, i)
    } else {
        false
    }
}

pub fn blez(cpu: &mut Cpu, i: Instruction) -> bool {
    if (cpu.reg(i.rs()) as i32) <= 0 {
        take(cpu, i)
    } else {
        false
    }
}

pub fn bgtz(cpu: &mut Cpu, i: Instruction) -> bool {
    if (cpu.reg(i.rs()) as i32) > 0 {
        take(cpu, i)
    } else {
        false
    }
}

/// `BLTZ`/`BGEZ`/`BLTZAL`/`BGEZAL`: all share primary opcode 0x01 and are
/// distinguished by the `rt` field (bit 0 selects GEZ vs LTZ, bit 4 selects
/// the link variant).
pub fn bcond(cpu: &mut Cpu, i: Instruction) -> bool {
    let rt = i.rt();
    let is_gez = rt & 0x01 != 0;
    let link = rt & 0x10 != 0;
    let value = cpu.reg(i.rs()) as i32;
    let condition = if is_gez { value >= 0 } else { value < 0 };

    if link {
        cpu.set_reg(LINK_REG, cpu.next_pc);
    }
    if condition {
        take(cpu, i)
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu_at(pc: u32) -> Cpu {
        let mut cpu = Cpu::new();
        cpu.set_pc(pc);
        cpu
    }

    #[test]
    fn beq_taken_redirects_next_pc_and_marks_delay_slot() {
        let mut cpu = cpu_at(0x8000_0000);
        cpu.set_reg(1, 5);
        cpu.set_reg(2, 5);
        // step() would have advanced pc to 0x8000_0004 before dispatch.
        cpu.set_pc(0x8000_0004);
        let i = Instruction((0x04 << 26) | (1 << 21) | (2 << 16) | 0x0010);
        assert!(beq(&mut cpu, i));
        assert_eq!(cpu.next_pc, 0x8000_0004u32.wrapping_add(0x40));
    }

    #[test]
    fn beq_not_taken_does_not_redirect() {
        let mut cpu = cpu_at(0x8000_0004);
        cpu.set_reg(1, 1);
        cpu.set_reg(2, 2);
        let i = Instruction((0x04 << 26) | (1 << 21) | (2 << 16) | 0x0010);
        let before = cpu.next_pc;
        assert!(!beq(&mut cpu, i));
        assert_eq!(cpu.next_pc, before);
    }

    #[test]
    fn bgezal_links_return_address_even_when_not_taken() {
        let mut cpu = cpu_at(0x8000_0004);
        cpu.set_reg(1, u32::MAX); // negative as i32
        let i = Instruction((0x01 << 26) | (1 << 21) | (0x11 << 16));
        let link_target = cpu.next_pc;
        assert!(!bcond(&mut cpu, i));
        assert_eq!(cpu.reg(LINK_REG), link_target);
    }
}
