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

//! `MULT`/`DIV` family and the `HI`/`LO` accessors. Divide-by-zero never
//! traps on the R3000A; it produces the documented saturated quotient and
//! the dividend as remainder instead (spec §4.2).

use super::super::decode::Instruction;
use super::super::Cpu;

pub fn mfhi(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rd(), cpu.hi());
}

pub fn mthi(cpu: &mut Cpu, i: Instruction) {
    cpu.hi = cpu.reg(i.rs());
}

pub fn mflo(cpu: &mut Cpu, i: Instruction) {
    cpu.set_reg(i.rd(), cpu.lo());
}

pub fn mtlo(cpu: &mut Cpu, i: Instruction) {
    cpu.lo = cpu.reg(i.rs());
}

pub fn mult(cpu: &mut Cpu, i: Instruction) {
    let a = cpu.reg(i.rs()) as i32 as i64;
    let b = cpu.reg(i.rt()) as i32 as i64;
    let result = (a * b) as u64;
    cpu.hi = (result >> 32) as u32;
    cpu.lo = result as u32;
}

pub fn multu(cpu: &mut Cpu, i: Instruction) {
    let a = cpu.reg(i.rs()) as u64;
    let b = cpu.reg(i.rt()) as u64;
    let result = a * b;
    cpu.hi = (result >> 32) as u32;
    cpu.lo = result as u32;
}

pub fn div(cpu: &mut Cpu, i: Instruction) {
    let n = cpu.reg(i.rs()) as i32;
    let d = cpu.reg(i.rt()) as i32;

    if d == 0 {
        cpu.hi = n as u32;
        cpu.lo = if n >= 0 { 0xFFFF_FFFF } else { 1 };
    } else if n == i32::MIN && d == -1 {
        cpu.hi = 0;
        cpu.lo = i32::MIN as u32;
    } else {
        cpu.hi = (n % d) as u32;
        cpu.lo = (n / d) as u32;
    }
}

pub fn divu(cpu: &mut Cpu, i: Instruction) {
    let n = cpu.reg(i.rs());
    let d = cpu.reg(i.rt());

    if d == 0 {
        cpu.hi = n;
        cpu.lo = 0xFFFF_FFFF;
    } else {
        cpu.hi = n % d;
        cpu.lo = n / d;
    }
}
