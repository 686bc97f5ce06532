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

//! Integer arithmetic and set-less-than. `ADD`/`ADDI`/`SUB` trap on signed
//! overflow (spec §4.2); their `U`-suffixed siblings wrap silently.

use super::super::cop0::ExceptionCause;
use super::super::decode::Instruction;
use super::super::Cpu;

pub fn add(cpu: &mut Cpu, i: Instruction) {
    let a = cpu.reg(i.rs()) as i32;
    let b = cpu.reg(i.rt()) as i32;
    match a.checked_add(b) {
        Some(result) => cpu.set_reg(i.rd(), result as u32),
        None => cpu.exception(ExceptionCause::Overflow),
    }
}

pub fn addu(cpu: &mut Cpu, i: Instruction) {
    let result = cpu.reg(i.rs()).wrapping_add(cpu.reg(i.rt()));
    cpu.set_reg(i.rd(), result);
}

pub fn sub(cpu: &mut Cpu, i: Instruction) {
    let a = cpu.reg(i.rs()) as i32;
    let b = cpu.reg(i.rt()) as i32;
    match a.checked_sub(b) {
        Some(result) => cpu.set_reg(i.rd(), result as u32),
        None => cpu.exception(ExceptionCause::Overflow),
    }
}

pub fn subu(cpu: &mut Cpu, i: Instruction) {
    let result = cpu.reg(i.rs()).wrapping_sub(cpu.reg(i.rt()));
    cpu.set_reg(i.rd(), result);
}

pub fn addi(cpu: &mut Cpu, i: Instruction) {
    let a = cpu.reg(i.rs()) as i32;
    let b = i.imm_se() as i32;
    match a.checked_add(b) {
        Some(result) => cpu.set_reg(i.rt(), result as u32),
        None => cpu.exception(ExceptionCause::Overflow),
    }
}

pub fn addiu(cpu: &mut Cpu, i: Instruction) {
    let result = cpu.reg(i.rs()).wrapping_add(i.imm_se());
    cpu.set_reg(i.rt(), result);
}

pub fn slt(cpu: &mut Cpu, i: Instruction) {
    let a = cpu.reg(i.rs()) as i32;
    let b = cpu.reg(i.rt()) as i32;
    cpu.set_reg(i.rd(), (a < b) as u32);
}

pub fn sltu(cpu: &mut Cpu, i: Instruction) {
    let result = cpu.reg(i.rs()) < cpu.reg(i.rt());
    cpu.set_reg(i.rd(), result as u32);
}

pub fn slti(cpu: &mut Cpu, i: Instruction) {
    let a = cpu.reg(i.rs()) as i32;
    let b = i.imm_se() as i32;
    cpu.set_reg(i.rt(), (a < b) as u32);
}

pub fn sltiu(cpu: &mut Cpu, i: Instruction) {
    let result = cpu.reg(i.rs()) < i.imm_se();
    cpu.set_reg(i.rt(), result as u32);
}
