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

//! Integration tests driving `Cpu::step` against a real `Bus`/RAM, plus
//! property tests for the invariants named in spec §8.

use proptest::prelude::*;

use super::Cpu;
use crate::core::interrupt::{line, InterruptController};
use crate::core::memory::Bus;

mod op {
    pub const ADDIU: u32 = 0x09;
    pub const BEQ: u32 = 0x04;
    pub const LW: u32 = 0x23;
}

mod funct {
    pub const ADDU: u32 = 0x21;
}

fn addiu(rt: u8, rs: u8, imm: u16) -> u32 {
    (op::ADDIU << 26) | (rs as u32) << 21 | (rt as u32) << 16 | imm as u32
}

fn beq(rs: u8, rt: u8, offset: i16) -> u32 {
    (op::BEQ << 26) | (rs as u32) << 21 | (rt as u32) << 16 | (offset as u16 as u32)
}

fn lw(rt: u8, rs: u8, offset: i16) -> u32 {
    (op::LW << 26) | (rs as u32) << 21 | (rt as u32) << 16 | (offset as u16 as u32)
}

fn addu(rd: u8, rs: u8, rt: u8) -> u32 {
    (rs as u32) << 21 | (rt as u32) << 16 | (rd as u32) << 11 | funct::ADDU
}

/// A CPU parked at RAM address 0 instead of the BIOS reset vector, so tests
/// can write a small program directly into RAM.
fn cpu_in_ram() -> (Cpu, Bus) {
    let mut cpu = Cpu::new();
    cpu.set_pc(0);
    (cpu, Bus::new())
}

fn load_program(bus: &mut Bus, base: u32, words: &[u32]) {
    for (i, word) in words.iter().enumerate() {
        bus.write32(base + i as u32 * 4, *word).unwrap();
    }
}

#[test]
fn zero_register_stays_zero_even_when_targeted() {
    let (mut cpu, mut bus) = cpu_in_ram();
    load_program(&mut bus, 0, &[addiu(0, 0, 5)]);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.reg(0), 0);
}

#[test]
fn delay_slot_instruction_always_executes_once_before_branch_lands() {
    let (mut cpu, mut bus) = cpu_in_ram();
    load_program(
        &mut bus,
        0,
        &[
            beq(0, 0, 2),      // 0: branch to word 3 (PC 12), always taken
            addiu(1, 0, 1),    // 4: delay slot, must run exactly once
            addiu(1, 0, 99),   // 8: must be skipped
            addiu(2, 0, 2),    // 12: branch target
        ],
    );

    cpu.step(&mut bus).unwrap(); // BEQ
    cpu.step(&mut bus).unwrap(); // delay slot
    assert_eq!(cpu.reg(1), 1);

    cpu.step(&mut bus).unwrap(); // branch target, not the skipped instruction
    assert_eq!(cpu.pc(), 16);
    assert_eq!(cpu.reg(1), 1, "the skipped instruction must not have run");
    assert_eq!(cpu.reg(2), 2);
}

#[test]
fn load_delay_slot_hides_the_loaded_value_for_one_instruction() {
    let (mut cpu, mut bus) = cpu_in_ram();
    bus.write32(0x1000, 0x1234_5678).unwrap();
    load_program(
        &mut bus,
        0,
        &[
            addiu(1, 0, 0xAAAA),  // 0: r1 = 0xAAAA (the "prior" value)
            addiu(2, 0, 0x1000),  // 4: r2 = 0x1000 (load address)
            lw(1, 2, 0),          // 8: r1 <- MEM[0x1000], not yet visible
            addu(3, 1, 0),        // 12: delay slot, must still see old r1
            addu(4, 1, 0),        // 16: must see the freshly loaded r1
        ],
    );

    for _ in 0..3 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(cpu.reg(1), 0xAAAA, "load result must not be visible yet");

    cpu.step(&mut bus).unwrap(); // ADDU r3, r1, r0
    assert_eq!(cpu.reg(3), 0xAAAA, "delay-slot instruction must see the stale value");

    cpu.step(&mut bus).unwrap(); // ADDU r4, r1, r0
    assert_eq!(cpu.reg(1), 0x1234_5678);
    assert_eq!(cpu.reg(4), 0x1234_5678, "the following instruction must see the new value");
}

#[test]
fn exception_entry_and_rfe_round_trips_sr_and_preserves_epc() {
    let (mut cpu, mut bus) = cpu_in_ram();
    load_program(&mut bus, 0, &[0x0000_000C]); // SYSCALL
    cpu.set_sr(0b01); // IEc=1, KUc=0
    let sr_before = cpu.sr();

    cpu.step(&mut bus).unwrap();
    assert_ne!(cpu.sr(), sr_before, "exception entry must push the mode stack");
    let epc = cpu.epc();
    assert_eq!(epc, 0, "EPC must point at the faulting SYSCALL");

    // RFE: COP0 rs=0b10000, funct=0b010000
    let rfe = (0x10u32 << 26) | (0b10000 << 21) | 0b01_0000;
    load_program(&mut bus, cpu.pc(), &[rfe]);
    cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.sr(), sr_before);
    assert_eq!(cpu.epc(), epc, "RFE does not touch EPC");
}

#[test]
fn pending_external_interrupt_vectors_to_the_general_exception_handler() {
    let (mut cpu, mut bus) = cpu_in_ram();
    let interrupt = std::rc::Rc::new(std::cell::RefCell::new(InterruptController::new()));
    interrupt.borrow_mut().write_mask(line::VBLANK as u32);
    interrupt.borrow_mut().request(line::VBLANK);
    bus.set_interrupt_controller(interrupt);

    cpu.set_sr(0b01); // IEc=1
    cpu.set_sr(cpu.sr() | (1 << 10)); // IM[2]=1, unmasks the hardware interrupt line
    load_program(&mut bus, 0, &[addiu(1, 0, 1)]);

    let pc_before = cpu.pc();
    cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.pc(), 0x8000_0080);
    assert_eq!(cpu.epc(), pc_before);
    assert_eq!(cpu.reg(1), 0, "the interrupted instruction must not have executed");
}

proptest! {
    #[test]
    fn addiu_into_r0_is_always_a_no_op(imm in any::<u16>()) {
        let (mut cpu, mut bus) = cpu_in_ram();
        load_program(&mut bus, 0, &[addiu(0, 0, imm)]);
        cpu.step(&mut bus).unwrap();
        prop_assert_eq!(cpu.reg(0), 0);
    }

    #[test]
    fn load_into_any_register_is_invisible_to_the_very_next_instruction(
        rt in 1u8..29,
        initial in any::<u32>(),
        loaded in any::<u32>(),
    ) {
        const BASE_REG: u8 = 29;
        const OBSERVER_REG: u8 = 30;
        prop_assume!(rt != BASE_REG && rt != OBSERVER_REG);

        let (mut cpu, mut bus) = cpu_in_ram();
        bus.write32(0x1000, loaded).unwrap();
        cpu.set_reg(rt, initial);
        load_program(
            &mut bus,
            0,
            &[
                addiu(BASE_REG, 0, 0x1000),
                lw(rt, BASE_REG, 0),
                addu(OBSERVER_REG, rt, 0),
            ],
        );

        cpu.step(&mut bus).unwrap(); // set up base address
        cpu.step(&mut bus).unwrap(); // LW
        cpu.step(&mut bus).unwrap(); // delay slot read
        prop_assert_eq!(cpu.reg(OBSERVER_REG), initial);
    }
}
