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

//! Loads and stores. `LB`/`LH`/`LW`/their unsigned forms, `LWL`/`LWR` and
//! their store counterparts. When `COP0.SR.IsC` is set the `Bus` itself
//! discards stores and zeroes reads (spec §4.1); these functions don't
//! need to know about it, they just call through to `Bus`.
//!
//! Loads resolve through `set_reg_delayed`: the fetched value is not
//! visible to the following instruction (spec §3). `LWL`/`LWR` still
//! count as loads for that purpose even though they never fault on
//! misalignment.

use super::super::decode::Instruction;
use super::super::Cpu;
use crate::core::error::Result;
use crate::core::memory::Bus;

fn addr(cpu: &Cpu, i: Instruction) -> u32 {
    cpu.reg(i.rs()).wrapping_add(i.imm_se())
}

pub fn lb(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    let value = bus.read8(address)? as i8 as i32 as u32;
    cpu.set_reg_delayed(i.rt(), value);
    Ok(())
}

pub fn lbu(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    let value = bus.read8(address)? as u32;
    cpu.set_reg_delayed(i.rt(), value);
    Ok(())
}

pub fn lh(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    if address & 0x1 != 0 {
        cpu.address_error(false);
        return Ok(());
    }
    let value = bus.read16(address)? as i16 as i32 as u32;
    cpu.set_reg_delayed(i.rt(), value);
    Ok(())
}

pub fn lhu(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    if address & 0x1 != 0 {
        cpu.address_error(false);
        return Ok(());
    }
    let value = bus.read16(address)? as u32;
    cpu.set_reg_delayed(i.rt(), value);
    Ok(())
}

pub fn lw(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    if address & 0x3 != 0 {
        cpu.address_error(false);
        return Ok(());
    }
    let value = bus.read32(address)?;
    cpu.set_reg_delayed(i.rt(), value);
    Ok(())
}

pub fn sb(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    bus.write8(address, cpu.reg(i.rt()) as u8)
}

pub fn sh(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    if address & 0x1 != 0 {
        cpu.address_error(true);
        return Ok(());
    }
    bus.write16(address, cpu.reg(i.rt()) as u16)
}

pub fn sw(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    if address & 0x3 != 0 {
        cpu.address_error(true);
        return Ok(());
    }
    bus.write32(address, cpu.reg(i.rt()))
}

pub fn lwl(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    let aligned = bus.read32(address & !0x3)?;
    let current = cpu.reg(i.rt());
    let value = match address & 0x3 {
        0 => (current & 0x00FF_FFFF) | (aligned << 24),
        1 => (current & 0x0000_FFFF) | (aligned << 16),
        2 => (current & 0x0000_00FF) | (aligned << 8),
        3 => aligned,
        _ => unreachable!(),
    };
    cpu.set_reg_delayed(i.rt(), value);
    Ok(())
}

pub fn lwr(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    let aligned = bus.read32(address & !0x3)?;
    let current = cpu.reg(i.rt());
    let value = match address & 0x3 {
        0 => aligned,
        1 => (current & 0xFF00_0000) | (aligned >> 8),
        2 => (current & 0xFFFF_0000) | (aligned >> 16),
        3 => (current & 0xFFFF_FF00) | (aligned >> 24),
        _ => unreachable!(),
    };
    cpu.set_reg_delayed(i.rt(), value);
    Ok(())
}

pub fn swl(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    let aligned_addr = address & !0x3;
    let mem = bus.read32(aligned_addr)?;
    let rt = cpu.reg(i.rt());
    let value = match address & 0x3 {
        0 => (mem & 0xFFFF_FF00) | (rt >> 24),
        1 => (mem & 0xFFFF_0000) | (rt >> 16),
        2 => (mem & 0xFF00_0000) | (rt >> 8),
        3 => rt,
        _ => unreachable!(),
    };
    bus.write32(aligned_addr, value)
}

pub fn swr(cpu: &mut Cpu, bus: &mut Bus, i: Instruction) -> Result<()> {
    let address = addr(cpu, i);
    let aligned_addr = address & !0x3;
    let mem = bus.read32(aligned_addr)?;
    let rt = cpu.reg(i.rt());
    let value = match address & 0x3 {
        0 => rt,
        1 => (mem & 0x0000_00FF) | (rt << 8),
        2 => (mem & 0x0000_FFFF) | (rt << 16),
        3 => (mem & 0x00FF_FFFF) | (rt << 24),
        _ => unreachable!(),
    };
    bus.write32(aligned_addr, value)
}
