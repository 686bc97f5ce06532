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

//! Fixed- and variable-shift instructions. Variable shifts use only the
//! low 5 bits of the shift-amount register, per the MIPS I ISA.

use super::super::decode::Instruction;
use super::super::Cpu;

pub fn sll(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rd(), cpu.reg(i.rt()) << i.shamt());
}

pub fn srl(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rd(), cpu.reg(i.rt()) >> i.shamt());
}

pub fn sra(cpu: &mut Cpu, i: Instruction) {
    let result = (cpu.reg(i.rt()) as i32) >> i.shamt();
    cpu.set_reg(i.rd(), result as u32);
}

pub fn sllv(cpu: &mut Cpu, i: Instruction) {
    let shamt = cpu.reg(i.rs()) & 0x1F;
    cpu.set_reg(i.rd(), cpu.reg(i.rt()) << shamt);
}

pub fn srlv(cpu: &mut Cpu, i: Instruction) {
    let shamt = cpu.reg(i.rs()) & 0x1F;
    cpu.set_reg(i.rd(), cpu.reg(i.rt()) >> shamt);
}

pub fn srav(cpu: &mut Cpu, i: Instruction) {
    let shamt = cpu.reg(i.rs()) & 0x1F;
    let result = (cpu.reg(i.rt()) as i32) >> shamt;
    cpu.set_reg(i.rd(), result as u32);
}
