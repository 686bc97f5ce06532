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

//! Bitwise logic.

use super::super::decode::Instruction;
use super::super::Cpu;

pub fn and(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rd(), cpu.reg(i.rs()) & cpu.reg(i.rt()));
}

pub fn or(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rd(), cpu.reg(i.rs()) | cpu.reg(i.rt()));
}

pub fn xor(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rd(), cpu.reg(i.rs()) ^ cpu.reg(i.rt()));
}

pub fn nor(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rd(), !(cpu.reg(i.rs()) | cpu.reg(i.rt())));
}

pub fn andi(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rt(), cpu.reg(i.rs()) & i.imm16());
}

pub fn ori(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rt(), cpu.reg(i.rs()) | i.imm16());
}

pub fn xori(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rt(), cpu.reg(i.rs()) ^ i.imm16());
}

/// `LUI rt, imm`: load the immediate into the upper half, lower half zero.
pub fn lui(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rt(), i.imm16() << 16);
}
