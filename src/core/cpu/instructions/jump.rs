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

//! Unconditional jumps. A misaligned `JR`/`JALR` target is caught by the
//! fetch-time alignment check the next time `step` runs, not here.

use super::super::decode::Instruction;
use super::super::Cpu;

pub fn j(cpu: &mut Cpu, i: Instruction) -> bool {
    cpu.next_pc = (cpu.pc & 0xF000_0000) | (i.target() << 2);
    true
}

pub fn jal(cpu: &mut Cpu, i: Instruction) -> bool {
    let return_address = cpu.next_pc;
    j(cpu, i);
    cpu.set_reg(31, return_address);
    true
}

pub fn jr(cpu: &mut Cpu, i: Instruction) -> bool {
    cpu.next_pc = cpu.reg(i.rs());
    true
}

pub fn jalr(cpu: &mut Cpu, i: Instruction) -> bool {
    let return_address = cpu.next_pc;
    cpu.next_pc = cpu.reg(i.rs());
    cpu.set_reg(i.rd(), return_address);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j_masks_into_current_256mb_segment() {
        let mut cpu = Cpu::new();
        cpu.set_pc(0x9000_0004);
        let i = Instruction((0x02 << 26) | 0x0000_1000);
        assert!(j(&mut cpu, i));
        assert_eq!(cpu.next_pc, 0x9000_4000);
    }

    #[test]
    fn jal_links_return_address() {
        let mut cpu = Cpu::new();
        cpu.set_pc(0x8000_0004);
        let return_address = cpu.next_pc;
        let i = Instruction((0x03 << 26) | 0x0000_0000);
        assert!(jal(&mut cpu, i));
        assert_eq!(cpu.reg(31), return_address);
    }

    #[test]
    fn jalr_defaults_to_explicit_rd() {
        let mut cpu = Cpu::new();
        cpu.set_reg(8, 0x8001_2340);
        cpu.set_pc(0x8000_0004);
        let return_address = cpu.next_pc;
        let i = Instruction((8 << 21) | (9 << 11) | 0x09);
        assert!(jalr(&mut cpu, i));
        assert_eq!(cpu.next_pc, 0x8001_2340);
        assert_eq!(cpu.reg(9), return_address);
    }
}
