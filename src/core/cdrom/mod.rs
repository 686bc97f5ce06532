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

//! The CD-ROM register façade: command/parameter/response/data FIFOs and
//! interrupt delivery. Disc mechanics and XA-ADPCM decoding are out of
//! scope (spec §1) — `ReadN` latches a placeholder sector's worth of
//! bytes into the data FIFO rather than reading a real disc image, but the
//! FIFO itself, and the DMA channel that drains it, behave as on hardware.
//!
//! Four indexed byte registers behind `CDROM_INDEX` (`0x1F80_1800`..=`0x1F80_1803`).
//! A command written at index 0 offset +1 produces an immediate INT3
//! status response; commands that take real hardware multiple revolutions
//! (`ReadN`, `SeekL`, `Init`, `Pause`) additionally queue a second
//! interrupt, delivered the next time [`Cdrom::step`] runs (spec §B, open
//! question (b): timing is "observable within one frame", not cycle-exact).

mod commands;

use crate::core::error::Result;
use commands::Command;

const FIFO_CAPACITY: usize = 16;
/// Bytes latched into the data FIFO per `ReadN` sector (Mode 2 Form 1 data
/// size); disc mechanics are out of scope (spec §1), so the bytes
/// themselves are a placeholder, but the FIFO a DMA transfer drains is not.
const SECTOR_DATA_SIZE: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    /// INT1: data ready (used after `ReadN`).
    DataReady = 1,
    /// INT2: command complete / second-stage acknowledge.
    Complete = 2,
    /// INT3: first-stage acknowledge.
    Acknowledge = 3,
    /// INT5: command error.
    Error = 5,
}

pub struct Cdrom {
    index: u8,
    parameter_fifo: Vec<u8>,
    response_fifo: Vec<u8>,
    data_fifo: std::collections::VecDeque<u8>,
    interrupt_enable: u8,
    interrupt_flag: u8,
    status: u8,
    queued_second_response: Option<(u32, Vec<u8>, InterruptKind)>,
}

impl Cdrom {
    const STATUS_MOTOR_ON: u8 = 1 << 1;

    pub fn new() -> Self {
        Self {
            index: 0,
            parameter_fifo: Vec::new(),
            response_fifo: Vec::new(),
            data_fifo: std::collections::VecDeque::new(),
            interrupt_enable: 0,
            interrupt_flag: 0,
            status: Self::STATUS_MOTOR_ON,
            queued_second_response: None,
        }
    }

    pub fn read_register(&mut self, offset: u8) -> u8 {
        match (offset, self.index) {
            (0, _) => self.status_register(),
            (1, _) => self.pop_response(),
            (2, _) => 0,
            (3, 0) | (3, 2) => self.interrupt_enable,
            (3, _) => self.interrupt_flag | 0xE0,
            _ => 0xFF,
        }
    }

    pub fn write_register(&mut self, offset: u8, value: u8) -> Result<()> {
        match (offset, self.index) {
            (0, _) => self.index = value & 0x3,
            (1, 0) => self.execute(value)?,
            (1, _) => self.parameter_fifo_push(value),
            (2, 0) => self.parameter_fifo_push(value),
            (2, 1) => self.interrupt_enable = value & 0x1F,
            (2, _) => {}
            (3, 1) => self.acknowledge_interrupts(value),
            (3, 2) => {
                if value & 0x40 != 0 {
                    self.parameter_fifo.clear();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn parameter_fifo_push(&mut self, value: u8) {
        if self.parameter_fifo.len() < FIFO_CAPACITY {
            self.parameter_fifo.push(value);
        }
    }

    fn pop_response(&mut self) -> u8 {
        if self.response_fifo.is_empty() {
            0
        } else {
            self.response_fifo.remove(0)
        }
    }

    fn acknowledge_interrupts(&mut self, value: u8) {
        self.interrupt_flag &= !(value & 0x1F);
    }

    fn status_register(&self) -> u8 {
        let mut status = self.index;
        if self.parameter_fifo.is_empty() {
            status |= 1 << 3;
        }
        if self.parameter_fifo.len() < FIFO_CAPACITY {
            status |= 1 << 4;
        }
        if !self.response_fifo.is_empty() {
            status |= 1 << 5;
        }
        status
    }

    fn execute(&mut self, opcode: u8) -> Result<()> {
        let params = std::mem::take(&mut self.parameter_fifo);
        let command = Command::decode(opcode);
        let (immediate, delayed) = command.run(&params, self.status)?;
        self.push_response(immediate.bytes, immediate.kind);
        if let Some(second) = delayed {
            self.queued_second_response = Some((second.delay_ticks, second.bytes, second.kind));
        }
        Ok(())
    }

    fn push_response(&mut self, bytes: Vec<u8>, kind: InterruptKind) {
        for byte in bytes {
            if self.response_fifo.len() < FIFO_CAPACITY {
                self.response_fifo.push(byte);
            }
        }
        self.interrupt_flag = kind as u8;
    }

    /// Advances queued second-stage responses by one system tick; call
    /// once per `System::run_frame` iteration (or more often for tighter
    /// fidelity — timing here is explicitly unconstrained, spec §9 (b)).
    pub fn step(&mut self) {
        if let Some((remaining, bytes, kind)) = self.queued_second_response.take() {
            if remaining == 0 {
                if kind == InterruptKind::DataReady {
                    self.latch_sector_data();
                }
                self.push_response(bytes, kind);
            } else {
                self.queued_second_response = Some((remaining - 1, bytes, kind));
            }
        }
    }

    /// `ReadN`'s real hardware behavior once a sector has been read off
    /// disc: the data FIFO is (re)filled so the following DMA transfer has
    /// something to drain. Sector contents are a placeholder (spec §1).
    fn latch_sector_data(&mut self) {
        self.data_fifo.clear();
        self.data_fifo.extend(std::iter::repeat(0u8).take(SECTOR_DATA_SIZE));
    }

    /// Pulls one little-endian word off the data FIFO for the CD-ROM DMA
    /// channel; hardware returns zero once the FIFO runs dry.
    pub fn pop_data_word(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        for byte in &mut bytes {
            *byte = self.data_fifo.pop_front().unwrap_or(0);
        }
        u32::from_le_bytes(bytes)
    }

    /// True while an enabled interrupt flag is latched; the caller (the
    /// bus's DMA/IRQ servicing path) is responsible for forwarding this to
    /// the interrupt controller and must debounce repeats itself.
    pub fn interrupt_pending(&self) -> bool {
        self.interrupt_flag & self.interrupt_enable != 0
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Cdrom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(cdrom: &mut Cdrom, index: u8) {
        cdrom.write_register(0, index).unwrap();
    }

    #[test]
    fn getstat_answers_immediately_with_int3() {
        let mut cdrom = Cdrom::new();
        select(&mut cdrom, 0);
        cdrom.write_register(1, 0x01).unwrap();
        assert_eq!(cdrom.read_register(1), Cdrom::STATUS_MOTOR_ON);
        assert_eq!(cdrom.interrupt_flag, InterruptKind::Acknowledge as u8);
    }

    #[test]
    fn readn_queues_a_second_interrupt() {
        let mut cdrom = Cdrom::new();
        select(&mut cdrom, 0);
        cdrom.write_register(1, 0x06).unwrap();
        let _ = cdrom.read_register(1);
        select(&mut cdrom, 1);
        cdrom.write_register(2, 0x1F).unwrap(); // enable all IRQ kinds
        assert!(cdrom.queued_second_response.is_some());
        for _ in 0..200 {
            cdrom.step();
        }
        assert_eq!(cdrom.interrupt_flag, InterruptKind::DataReady as u8);
    }

    #[test]
    fn readn_completion_fills_the_data_fifo_for_dma_to_drain() {
        let mut cdrom = Cdrom::new();
        select(&mut cdrom, 0);
        cdrom.write_register(1, 0x06).unwrap(); // ReadN
        for _ in 0..200 {
            cdrom.step();
        }
        assert_eq!(cdrom.data_fifo.len(), SECTOR_DATA_SIZE);
        assert_eq!(cdrom.pop_data_word(), 0);
        assert_eq!(cdrom.data_fifo.len(), SECTOR_DATA_SIZE - 4);
    }

    #[test]
    fn unknown_command_is_host_fatal() {
        let mut cdrom = Cdrom::new();
        select(&mut cdrom, 0);
        assert!(cdrom.write_register(1, 0xFF).is_err());
    }
}
