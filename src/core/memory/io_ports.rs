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

//! Device register dispatch within the I/O window
//! (`0x1F80_1000..=0x1F9F_FFFF`).
//!
//! Each device is an optional shared handle; an absent device answers with
//! the documented stub value rather than erroring, since plenty of guest
//! code probes registers before deciding whether to use them.

use super::Bus;
use crate::core::error::Result;

impl Bus {
    pub(super) fn read_io8(&self, paddr: u32) -> Result<u8> {
        match paddr {
            Self::CDROM_INDEX | Self::CDROM_REG1 | Self::CDROM_REG2 | Self::CDROM_REG3 => {
                Ok(self
                    .cdrom
                    .as_ref()
                    .map(|c| c.borrow_mut().read_register((paddr - Self::CDROM_INDEX) as u8))
                    .unwrap_or(0x18))
            }
            _ => Ok((self.read_io32(paddr & !0x3)? >> ((paddr & 0x3) * 8)) as u8),
        }
    }

    pub(super) fn write_io8(&mut self, paddr: u32, value: u8) -> Result<()> {
        match paddr {
            Self::CDROM_INDEX | Self::CDROM_REG1 | Self::CDROM_REG2 | Self::CDROM_REG3 => {
                if let Some(cdrom) = &self.cdrom {
                    cdrom
                        .borrow_mut()
                        .write_register((paddr - Self::CDROM_INDEX) as u8, value)?;
                }
                Ok(())
            }
            _ => {
                log::trace!("ignored byte write 0x{value:02X} at 0x{paddr:08X}");
                Ok(())
            }
        }
    }

    pub(super) fn read_io16(&self, paddr: u32) -> Result<u16> {
        match paddr {
            Self::JOY_STAT => Ok(self.joy_stat()),
            Self::JOY_MODE => Ok(0),
            Self::JOY_CTRL => Ok(0),
            Self::JOY_BAUD => Ok(0),
            Self::I_STAT => Ok(self.read_interrupt(Self::I_STAT) as u16),
            Self::I_MASK => Ok(self.read_interrupt(Self::I_MASK) as u16),
            p if (Self::TIMER_BASE..=Self::TIMER_END).contains(&p) => {
                Ok(self.read_timer_register(p) as u16)
            }
            _ => Ok((self.read_io32(paddr & !0x3)? >> ((paddr & 0x3) * 8)) as u16),
        }
    }

    pub(super) fn write_io16(&mut self, paddr: u32, value: u16) -> Result<()> {
        match paddr {
            Self::JOY_DATA => {
                if let Some(controller) = &self.controller {
                    controller.borrow_mut().write_data(value as u8);
                }
                Ok(())
            }
            Self::JOY_MODE | Self::JOY_CTRL | Self::JOY_BAUD => Ok(()),
            Self::I_STAT => {
                self.write_interrupt_status(value as u32);
                Ok(())
            }
            Self::I_MASK => {
                self.write_interrupt_mask(value as u32);
                Ok(())
            }
            p if (Self::TIMER_BASE..=Self::TIMER_END).contains(&p) => {
                self.write_timer_register(p, value as u32);
                Ok(())
            }
            _ => {
                log::trace!("ignored halfword write 0x{value:04X} at 0x{paddr:08X}");
                Ok(())
            }
        }
    }

    pub(super) fn read_io32(&self, paddr: u32) -> Result<u32> {
        match paddr {
            0x1F80_1000..=0x1F80_1020 => Ok(0),
            Self::JOY_DATA => Ok(self
                .controller
                .as_ref()
                .map(|c| c.borrow().read_data() as u32)
                .unwrap_or(0xFFFF_FFFF)),
            Self::GP0 => Ok(self.gpu.as_ref().map(|g| g.borrow().read_gpuread()).unwrap_or(0)),
            Self::GP1 => Ok(self.gpu.as_ref().map(|g| g.borrow().read_status()).unwrap_or(0x1C00_0000)),
            Self::I_STAT => Ok(self.read_interrupt(Self::I_STAT)),
            Self::I_MASK => Ok(self.read_interrupt(Self::I_MASK)),
            p if (Self::DMA_BASE..Self::DMA_DPCR).contains(&p) => Ok(self.read_dma_channel(p)),
            Self::DMA_DPCR => Ok(self.dma.as_ref().map(|d| d.borrow().control()).unwrap_or(0x0765_4321)),
            Self::DMA_DICR => Ok(self.dma.as_ref().map(|d| d.borrow().interrupt()).unwrap_or(0)),
            p if (Self::TIMER_BASE..=Self::TIMER_END).contains(&p) => Ok(self.read_timer_register(p)),
            _ => {
                log::trace!("unmapped word read at 0x{paddr:08X}, returning 0");
                Ok(0)
            }
        }
    }

    pub(super) fn write_io32(&mut self, paddr: u32, value: u32) -> Result<()> {
        match paddr {
            0x1F80_1000..=0x1F80_1020 => Ok(()),
            Self::GP0 => {
                if let Some(gpu) = &self.gpu {
                    gpu.borrow_mut().write_gp0(value);
                }
                Ok(())
            }
            Self::GP1 => {
                if let Some(gpu) = &self.gpu {
                    gpu.borrow_mut().write_gp1(value);
                }
                Ok(())
            }
            Self::I_STAT => {
                self.write_interrupt_status(value);
                Ok(())
            }
            Self::I_MASK => {
                self.write_interrupt_mask(value);
                Ok(())
            }
            p if (Self::DMA_BASE..Self::DMA_DPCR).contains(&p) => {
                self.write_dma_channel(p, value);
                self.run_active_dma_channels();
                Ok(())
            }
            Self::DMA_DPCR => {
                if let Some(dma) = &self.dma {
                    dma.borrow_mut().set_control(value);
                }
                Ok(())
            }
            Self::DMA_DICR => {
                if let Some(dma) = &self.dma {
                    dma.borrow_mut().set_interrupt(value);
                }
                Ok(())
            }
            p if (Self::TIMER_BASE..=Self::TIMER_END).contains(&p) => {
                self.write_timer_register(p, value);
                Ok(())
            }
            _ => {
                log::debug!("ignored word write 0x{value:08X} at 0x{paddr:08X}");
                Ok(())
            }
        }
    }

    fn joy_stat(&self) -> u16 {
        self.controller
            .as_ref()
            .map(|c| c.borrow().status())
            .unwrap_or(0x0005)
    }

    fn read_interrupt(&self, register: u32) -> u32 {
        let Some(ic) = &self.interrupt else { return 0 };
        if register == Self::I_STAT {
            ic.borrow().read_status()
        } else {
            ic.borrow().read_mask()
        }
    }

    fn write_interrupt_status(&mut self, value: u32) {
        if let Some(ic) = &self.interrupt {
            ic.borrow_mut().write_status(value);
        }
    }

    fn write_interrupt_mask(&mut self, value: u32) {
        if let Some(ic) = &self.interrupt {
            ic.borrow_mut().write_mask(value);
        }
    }

    fn read_timer_register(&self, paddr: u32) -> u32 {
        let Some(timers) = &self.timers else { return 0 };
        let index = ((paddr - Self::TIMER_BASE) / 0x10) as usize;
        let reg = (paddr - Self::TIMER_BASE) % 0x10;
        timers.borrow().read(index, reg)
    }

    fn write_timer_register(&mut self, paddr: u32, value: u32) {
        let Some(timers) = &self.timers else { return };
        let index = ((paddr - Self::TIMER_BASE) / 0x10) as usize;
        let reg = (paddr - Self::TIMER_BASE) % 0x10;
        timers.borrow_mut().write(index, reg, value);
    }

    fn read_dma_channel(&self, paddr: u32) -> u32 {
        let Some(dma) = &self.dma else { return 0 };
        let channel = ((paddr - Self::DMA_BASE) / 0x10) as usize;
        let reg = (paddr - Self::DMA_BASE) % 0x10;
        dma.borrow().read_channel(channel, reg)
    }

    fn write_dma_channel(&mut self, paddr: u32, value: u32) {
        let Some(dma) = &self.dma else { return };
        let channel = ((paddr - Self::DMA_BASE) / 0x10) as usize;
        let reg = (paddr - Self::DMA_BASE) % 0x10;
        dma.borrow_mut().write_channel(channel, reg, value);
    }

    /// Services every channel the write to `control` just made active,
    /// lowest-channel-number first, until none remain — the single-threaded
    /// cooperative model means a channel transfer completes synchronously
    /// within the triggering store.
    fn run_active_dma_channels(&mut self) {
        let Some(dma) = self.dma.clone() else { return };
        loop {
            let channel = dma.borrow().next_active_channel();
            let Some(channel) = channel else { break };
            dma.borrow_mut().service(channel, self);
        }
        let fired = dma.borrow_mut().interrupt_request_pending();
        if fired {
            if let Some(ic) = &self.interrupt {
                ic.borrow_mut().request(crate::core::interrupt::line::DMA);
            }
        }
    }
}
