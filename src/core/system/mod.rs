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

//! Wires every device to the interconnect and drives the frame loop
//! (spec §5): run the CPU for one frame's worth of cycles, stepping the
//! timers and CD-ROM alongside it, then raise VBLANK and hand the display
//! to the rasterizer.

pub mod exe;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::core::cdrom::Cdrom;
use crate::core::controller::{ControllerPort, HostInput};
use crate::core::cpu::Cpu;
use crate::core::dma::Dma;
use crate::core::error::Result;
use crate::core::gpu::rasterizer::Rasterizer;
use crate::core::gpu::Gpu;
use crate::core::interrupt::{line, InterruptController};
use crate::core::memory::Bus;
use crate::core::timer::Timers;

/// NTSC PSX system clock (33.8688 MHz) divided by 60 fields/sec, rounded.
/// Cycle-exact scheduling is out of scope (spec §1); this only needs to be
/// close enough that one call to `run_frame` corresponds to one video
/// field for guest code polling VBLANK.
pub const CYCLES_PER_FRAME: u32 = 33_868_800 / 60;

pub struct System {
    cpu: Cpu,
    bus: Bus,
    gpu: Rc<RefCell<Gpu>>,
    interrupt: Rc<RefCell<InterruptController>>,
    dma: Rc<RefCell<Dma>>,
    cdrom: Rc<RefCell<Cdrom>>,
    timers: Rc<RefCell<Timers>>,
    controller: Rc<RefCell<ControllerPort>>,
}

impl System {
    pub fn new(rasterizer: Box<dyn Rasterizer>) -> Self {
        let gpu = Rc::new(RefCell::new(Gpu::new(rasterizer)));
        let interrupt = Rc::new(RefCell::new(InterruptController::new()));
        let dma = Rc::new(RefCell::new(Dma::new()));
        let cdrom = Rc::new(RefCell::new(Cdrom::new()));
        let timers = Rc::new(RefCell::new(Timers::new()));
        let controller = Rc::new(RefCell::new(ControllerPort::new()));

        let mut bus = Bus::new();
        bus.set_gpu(gpu.clone());
        bus.set_interrupt_controller(interrupt.clone());
        bus.set_dma(dma.clone());
        bus.set_cdrom(cdrom.clone());
        bus.set_timers(timers.clone());
        bus.set_controller(controller.clone());

        Self {
            cpu: Cpu::new(),
            bus,
            gpu,
            interrupt,
            dma,
            cdrom,
            timers,
            controller,
        }
    }

    pub fn load_bios(&mut self, path: &Path) -> Result<()> {
        self.bus.load_bios(path)
    }

    pub fn set_rasterizer(&mut self, rasterizer: Box<dyn Rasterizer>) {
        self.gpu.borrow_mut().set_rasterizer(rasterizer);
    }

    pub fn set_controller_input(&mut self, input: Box<dyn HostInput>) {
        self.controller.borrow_mut().set_input(input);
    }

    /// Loads a `.EXE` directly into RAM and points the CPU at its entry
    /// point, bypassing the BIOS shell (SPEC_FULL.md §B). Mirrors what the
    /// real BIOS's `Exec` does for a `cdrom:\...exe` boot target, minus the
    /// CD-ROM round trip.
    pub fn load_executable(&mut self, path: &Path) -> Result<()> {
        let executable = exe::Executable::load(path)?;
        self.bus.write_ram_slice(executable.load_address, &executable.data)?;
        self.cpu.set_pc(executable.entry_pc);
        self.cpu.set_reg(28, executable.initial_gp);
        if executable.initial_sp_base != 0 {
            self.cpu
                .set_reg(29, executable.initial_sp_base.wrapping_add(executable.initial_sp_offset));
            self.cpu
                .set_reg(30, executable.initial_sp_base.wrapping_add(executable.initial_sp_offset));
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
        self.gpu.borrow_mut().reset();
        self.interrupt.borrow_mut().reset();
        self.dma.borrow_mut().reset();
        self.cdrom.borrow_mut().reset();
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Runs roughly one video field's worth of CPU instructions, stepping
    /// the timers and CD-ROM every cycle, then raises VBLANK and presents
    /// the frame through the rasterizer.
    pub fn run_frame(&mut self) -> Result<()> {
        let mut cycles_run = 0u32;
        while cycles_run < CYCLES_PER_FRAME {
            self.cpu.step(&mut self.bus)?;
            self.step_peripherals(1);
            cycles_run += 1;
        }

        self.gpu.borrow_mut().enter_vblank();
        self.interrupt.borrow_mut().request(line::VBLANK);
        Ok(())
    }

    fn step_peripherals(&mut self, cycles: u32) {
        let fired = self.timers.borrow_mut().step(cycles);
        if fired != 0 {
            let mut ic = self.interrupt.borrow_mut();
            if fired & (1 << 0) != 0 {
                ic.request(line::TIMER0);
            }
            if fired & (1 << 1) != 0 {
                ic.request(line::TIMER1);
            }
            if fired & (1 << 2) != 0 {
                ic.request(line::TIMER2);
            }
        }

        self.cdrom.borrow_mut().step();
        if self.cdrom.borrow().interrupt_pending() {
            self.interrupt.borrow_mut().request(line::CDROM);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gpu::rasterizer::NullRasterizer;

    fn headless_system() -> System {
        System::new(Box::new(NullRasterizer))
    }

    #[test]
    fn boots_to_bios_reset_vector_without_a_bios_image() {
        let system = headless_system();
        assert_eq!(system.cpu().pc(), crate::core::cpu::RESET_VECTOR);
    }

    #[test]
    fn loading_an_executable_sets_pc_gp_and_sp() {
        let mut system = headless_system();
        let mut header = vec![0u8; 2048];
        header[0..8].copy_from_slice(b"PS-X EXE");
        header[0x10..0x14].copy_from_slice(&0x8001_0000u32.to_le_bytes());
        header[0x14..0x18].copy_from_slice(&0x0001_0800u32.to_le_bytes());
        header[0x18..0x1C].copy_from_slice(&0x8001_0000u32.to_le_bytes());
        header[0x1C..0x20].copy_from_slice(&4u32.to_le_bytes());
        header[0x30..0x34].copy_from_slice(&0x801F_FF00u32.to_le_bytes());
        header.extend_from_slice(&[1, 2, 3, 4]);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, &header).unwrap();

        system.load_executable(file.path()).unwrap();
        assert_eq!(system.cpu().pc(), 0x8001_0000);
    }
}
