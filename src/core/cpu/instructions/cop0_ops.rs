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

//! `COP0` moves and `RFE`. `MFC0`/`MTC0` are distinguished by the `rs`
//! field (the COP0 sub-opcode); `RFE` shares `rs=0b10000` with the rest of
//! the "CO" class and is picked out by its `funct`.

use super::super::cop0::Cop0;
use super::super::decode::Instruction;
use super::super::Cpu;

const MFC0: u32 = 0b00000;
const MTC0: u32 = 0b00100;
const CO: u32 = 0b10000;
const RFE_FUNCT: u32 = 0b01_0000;

/// `CAUSE`'s only host-writable bits are the two software-interrupt pending
/// bits (IP0/IP1); the rest reflect hardware state MTC0 cannot forge.
const CAUSE_WRITABLE: u32 = 0b11 << 8;

pub fn execute(cpu: &mut Cpu, i: Instruction) {
    match i.cop_op() {
        MFC0 => {
            let value = cpu.cop0.regs[i.rd() as usize];
            cpu.set_reg(i.rt(), value);
        }
        MTC0 => {
            let value = cpu.reg(i.rt());
            let index = i.rd() as usize;
            if index == Cop0::CAUSE {
                let cause = cpu.cop0.regs[Cop0::CAUSE];
                cpu.cop0.regs[Cop0::CAUSE] =
                    (cause & !CAUSE_WRITABLE) | (value & CAUSE_WRITABLE);
            } else {
                cpu.cop0.regs[index] = value;
            }
        }
        CO if i.funct() == RFE_FUNCT => cpu.cop0.return_from_exception(),
        _ => super::exception::reserved(cpu),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mfc0(rd: u8, rt: u8) -> Instruction {
        Instruction((0x10 << 26) | (rd as u32) << 11 | (rt as u32) << 16)
    }

    fn mtc0(rd: u8, rt: u8) -> Instruction {
        Instruction((0x10 << 26) | (MTC0 << 21) | (rt as u32) << 16 | (rd as u32) << 11)
    }

    #[test]
    fn mtc0_to_sr_is_a_plain_store() {
        let mut cpu = Cpu::new();
        cpu.set_reg(4, 0);
        execute(&mut cpu, mtc0(Cop0::SR as u8, 4));
        assert_eq!(cpu.cop0.regs[Cop0::SR], 0);
    }

    #[test]
    fn mtc0_to_cause_only_touches_software_interrupt_bits() {
        let mut cpu = Cpu::new();
        cpu.cop0.regs[Cop0::CAUSE] = 1 << 10; // IP2 set by hardware
        cpu.set_reg(4, 0xFFFF_FFFF);
        execute(&mut cpu, mtc0(Cop0::CAUSE as u8, 4));
        assert_eq!(cpu.cop0.regs[Cop0::CAUSE], (1 << 10) | CAUSE_WRITABLE);
    }

    #[test]
    fn mfc0_reads_back_what_was_written() {
        let mut cpu = Cpu::new();
        cpu.cop0.regs[Cop0::EPC] = 0x8000_1234;
        execute(&mut cpu, mfc0(Cop0::EPC as u8, 5));
        assert_eq!(cpu.reg(5), 0x8000_1234);
    }
}
