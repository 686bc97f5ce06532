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

//! Opcode dispatch for the MIPS I subset spec §4.2 requires.

mod arithmetic;
mod branch;
mod cop0_ops;
mod exception;
mod jump;
mod load_store;
mod logical;
mod multiply;
mod shift;

use super::cop0::ExceptionCause;
use super::decode::Instruction;
use super::Cpu;
use crate::core::error::Result;
use crate::core::memory::Bus;

/// Primary opcode field values used by the dispatcher.
mod op {
    pub const SPECIAL: u32 = 0x00;
    pub const BCOND: u32 = 0x01;
    pub const J: u32 = 0x02;
    pub const JAL: u32 = 0x03;
    pub const BEQ: u32 = 0x04;
    pub const BNE: u32 = 0x05;
    pub const BLEZ: u32 = 0x06;
    pub const BGTZ: u32 = 0x07;
    pub const ADDI: u32 = 0x08;
    pub const ADDIU: u32 = 0x09;
    pub const SLTI: u32 = 0x0A;
    pub const SLTIU: u32 = 0x0B;
    pub const ANDI: u32 = 0x0C;
    pub const ORI: u32 = 0x0D;
    pub const XORI: u32 = 0x0E;
    pub const LUI: u32 = 0x0F;
    pub const COP0: u32 = 0x10;
    pub const COP1: u32 = 0x11;
    pub const COP2: u32 = 0x12;
    pub const LB: u32 = 0x20;
    pub const LH: u32 = 0x21;
    pub const LWL: u32 = 0x22;
    pub const LW: u32 = 0x23;
    pub const LBU: u32 = 0x24;
    pub const LHU: u32 = 0x25;
    pub const LWR: u32 = 0x26;
    pub const SB: u32 = 0x28;
    pub const SH: u32 = 0x29;
    pub const SWL: u32 = 0x2A;
    pub const SW: u32 = 0x2B;
    pub const SWR: u32 = 0x2E;
}

/// `SPECIAL` (op=0) funct field values.
mod funct {
    pub const SLL: u32 = 0x00;
    pub const SRL: u32 = 0x02;
    pub const SRA: u32 = 0x03;
    pub const SLLV: u32 = 0x04;
    pub const SRLV: u32 = 0x06;
    pub const SRAV: u32 = 0x07;
    pub const JR: u32 = 0x08;
    pub const JALR: u32 = 0x09;
    pub const SYSCALL: u32 = 0x0C;
    pub const BREAK: u32 = 0x0D;
    pub const MFHI: u32 = 0x10;
    pub const MTHI: u32 = 0x11;
    pub const MFLO: u32 = 0x12;
    pub const MTLO: u32 = 0x13;
    pub const MULT: u32 = 0x18;
    pub const MULTU: u32 = 0x19;
    pub const DIV: u32 = 0x1A;
    pub const DIVU: u32 = 0x1B;
    pub const ADD: u32 = 0x20;
    pub const ADDU: u32 = 0x21;
    pub const SUB: u32 = 0x22;
    pub const SUBU: u32 = 0x23;
    pub const AND: u32 = 0x24;
    pub const OR: u32 = 0x25;
    pub const XOR: u32 = 0x26;
    pub const NOR: u32 = 0x27;
    pub const SLT: u32 = 0x2A;
    pub const SLTU: u32 = 0x2B;
}

/// Execute one already-fetched instruction. `in_branch_delay` is whether
/// *this* instruction occupies a branch-delay slot, needed by `cpu.exception`
/// if this instruction itself faults. Every branch/jump function returns
/// whether it redirected `next_pc`; that becomes the `in_branch_delay` seen
/// by the following `step` call, since the instruction right after a taken
/// branch is, by definition, the delay slot.
pub(super) fn execute(
    cpu: &mut Cpu,
    bus: &mut Bus,
    i: Instruction,
    in_branch_delay: bool,
) -> Result<()> {
    cpu.in_branch_delay = in_branch_delay;

    let branched = match i.op() {
        op::SPECIAL => execute_special(cpu, i),
        op::BCOND => branch::bcond(cpu, i),
        op::J => jump::j(cpu, i),
        op::JAL => jump::jal(cpu, i),
        op::BEQ => branch::beq(cpu, i),
        op::BNE => branch::bne(cpu, i),
        op::BLEZ => branch::blez(cpu, i),
        op::BGTZ => branch::bgtz(cpu, i),
        op::ADDI => { arithmetic::addi(cpu, i); false }
        op::ADDIU => { arithmetic::addiu(cpu, i); false }
        op::SLTI => { arithmetic::slti(cpu, i); false }
        op::SLTIU => { arithmetic::sltiu(cpu, i); false }
        op::ANDI => { logical::andi(cpu, i); false }
        op::ORI => { logical::ori(cpu, i); false }
        op::XORI => { logical::xori(cpu, i); false }
        op::LUI => { logical::lui(cpu, i); false }
        op::COP0 => { cop0_ops::execute(cpu, i); false }
        // COP1/COP2 (the GTE) are both unimplemented; real BIOS code probes
        // for their presence and expects CoprocessorUnusable, not a
        // reserved-instruction trap.
        op::COP1 | op::COP2 => { exception::coprocessor_unusable(cpu); false }
        op::LB => { load_store::lb(cpu, bus, i)?; false }
        op::LH => { load_store::lh(cpu, bus, i)?; false }
        op::LWL => { load_store::lwl(cpu, bus, i)?; false }
        op::LW => { load_store::lw(cpu, bus, i)?; false }
        op::LBU => { load_store::lbu(cpu, bus, i)?; false }
        op::LHU => { load_store::lhu(cpu, bus, i)?; false }
        op::LWR => { load_store::lwr(cpu, bus, i)?; false }
        op::SB => { load_store::sb(cpu, bus, i)?; false }
        op::SH => { load_store::sh(cpu, bus, i)?; false }
        op::SWL => { load_store::swl(cpu, bus, i)?; false }
        op::SW => { load_store::sw(cpu, bus, i)?; false }
        op::SWR => { load_store::swr(cpu, bus, i)?; false }
        _ => { exception::reserved(cpu); false }
    };

    cpu.in_branch_delay = branched;
    Ok(())
}

fn execute_special(cpu: &mut Cpu, i: Instruction) -> bool {
    match i.funct() {
        funct::SLL => { shift::sll(cpu, i); false }
        funct::SRL => { shift::srl(cpu, i); false }
        funct::SRA => { shift::sra(cpu, i); false }
        funct::SLLV => { shift::sllv(cpu, i); false }
        funct::SRLV => { shift::srlv(cpu, i); false }
        funct::SRAV => { shift::srav(cpu, i); false }
        funct::JR => jump::jr(cpu, i),
        funct::JALR => jump::jalr(cpu, i),
        funct::SYSCALL => { exception::syscall(cpu); false }
        funct::BREAK => { exception::breakpoint(cpu); false }
        funct::MFHI => { multiply::mfhi(cpu, i); false }
        funct::MTHI => { multiply::mthi(cpu, i); false }
        funct::MFLO => { multiply::mflo(cpu, i); false }
        funct::MTLO => { multiply::mtlo(cpu, i); false }
        funct::MULT => { multiply::mult(cpu, i); false }
        funct::MULTU => { multiply::multu(cpu, i); false }
        funct::DIV => { multiply::div(cpu, i); false }
        funct::DIVU => { multiply::divu(cpu, i); false }
        funct::ADD => { arithmetic::add(cpu, i); false }
        funct::ADDU => { arithmetic::addu(cpu, i); false }
        funct::SUB => { arithmetic::sub(cpu, i); false }
        funct::SUBU => { arithmetic::subu(cpu, i); false }
        funct::AND => { logical::and(cpu, i); false }
        funct::OR => { logical::or(cpu, i); false }
        funct::XOR => { logical::xor(cpu, i); false }
        funct::NOR => { logical::nor(cpu, i); false }
        funct::SLT => { arithmetic::slt(cpu, i); false }
        funct::SLTU => { arithmetic::sltu(cpu, i); false }
        _ => { exception::reserved(cpu); false }
    }
}
