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

//! The interrupt controller aggregates 11 device IRQ lines into the CPU's
//! single external-interrupt pending bit.
//!
//! Two 11-bit registers: `status` (latched, level-sensitive) and `mask`.
//! A source calls [`InterruptController::request`] to latch its line;
//! a write to `I_STAT` acknowledges bits that are 0 in the write value and
//! leaves bits that are 1 untouched. `is_pending` is `(status & mask) != 0`.

/// Bit position of each interrupt source within `status`/`mask`.
pub mod line {
    pub const VBLANK: u16 = 1 << 0;
    pub const GPU: u16 = 1 << 1;
    pub const CDROM: u16 = 1 << 2;
    pub const DMA: u16 = 1 << 3;
    pub const TIMER0: u16 = 1 << 4;
    pub const TIMER1: u16 = 1 << 5;
    pub const TIMER2: u16 = 1 << 6;
    pub const CONTROLLER: u16 = 1 << 7;
    pub const SIO: u16 = 1 << 8;
    pub const SPU: u16 = 1 << 9;
    pub const LIGHTPEN: u16 = 1 << 10;
}

pub struct InterruptController {
    status: u16,
    mask: u16,
}

impl InterruptController {
    pub fn new() -> Self {
        Self { status: 0, mask: 0 }
    }

    /// Latch `lines` into `status`. Called by a device at the moment it
    /// wants to signal the CPU, not when the CPU observes it.
    pub fn request(&mut self, lines: u16) {
        self.status |= lines;
        log::trace!("irq request 0x{lines:04X}, status=0x{:04X}", self.status);
    }

    pub fn is_pending(&self) -> bool {
        (self.status & self.mask) != 0
    }

    pub fn read_status(&self) -> u32 {
        self.status as u32
    }

    /// Acknowledge: a 0 bit in `value` clears the matching status bit, a 1
    /// bit leaves it set.
    pub fn write_status(&mut self, value: u32) {
        self.status &= value as u16;
    }

    pub fn read_mask(&self) -> u32 {
        self.mask as u32
    }

    pub fn write_mask(&mut self, value: u32) {
        self.mask = value as u16;
    }

    pub fn reset(&mut self) {
        self.status = 0;
        self.mask = 0;
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latching_then_partial_ack_keeps_unacked_bits() {
        let mut ic = InterruptController::new();
        ic.request(line::VBLANK | line::TIMER0);
        ic.write_status(!(line::VBLANK as u32));
        assert_eq!(ic.read_status(), line::TIMER0 as u32);
    }

    #[test]
    fn pending_requires_both_status_and_mask() {
        let mut ic = InterruptController::new();
        ic.request(line::VBLANK);
        assert!(!ic.is_pending());
        ic.write_mask(line::VBLANK as u32);
        assert!(ic.is_pending());
    }

    #[test]
    fn write_one_bit_clears_it() {
        let mut ic = InterruptController::new();
        ic.request(line::CDROM);
        ic.write_status(!(line::CDROM as u32));
        assert_eq!(ic.read_status(), 0);
    }
}
