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

//! The SIO-style controller/memory-card port.
//!
//! `ControllerPort` owns the JOY_DATA/JOY_STAT/JOY_MODE/JOY_CTRL/JOY_BAUD
//! register block. It never reads host input itself — it polls whatever
//! implements [`HostInput`], so the core has no dependency on a concrete
//! windowing/input backend (spec §B).

/// Active-low button bit positions of the standard digital pad response.
pub mod buttons {
    pub const SELECT: u16 = 1 << 0;
    pub const L3: u16 = 1 << 1;
    pub const R3: u16 = 1 << 2;
    pub const START: u16 = 1 << 3;
    pub const UP: u16 = 1 << 4;
    pub const RIGHT: u16 = 1 << 5;
    pub const DOWN: u16 = 1 << 6;
    pub const LEFT: u16 = 1 << 7;
    pub const L2: u16 = 1 << 8;
    pub const R2: u16 = 1 << 9;
    pub const L1: u16 = 1 << 10;
    pub const R1: u16 = 1 << 11;
    pub const TRIANGLE: u16 = 1 << 12;
    pub const CIRCLE: u16 = 1 << 13;
    pub const CROSS: u16 = 1 << 14;
    pub const SQUARE: u16 = 1 << 15;
}

/// The frontend's input backend implements this; the core only ever polls
/// the active-low button bitfield it returns.
pub trait HostInput {
    fn buttons(&self) -> u16;
}

/// An input source that never has anything pressed, used before a frontend
/// is attached and in headless tests.
pub struct NoInput;

impl HostInput for NoInput {
    fn buttons(&self) -> u16 {
        0xFFFF
    }
}

const DIGITAL_PAD_ID: u8 = 0x41;
const DIGITAL_PAD_ID_HI: u8 = 0x5A;

pub struct ControllerPort {
    response: Vec<u8>,
    rx_index: usize,
    ack: bool,
    input: Box<dyn HostInput>,
}

impl ControllerPort {
    pub fn new() -> Self {
        Self {
            response: Vec::new(),
            rx_index: 0,
            ack: false,
            input: Box::new(NoInput),
        }
    }

    pub fn set_input(&mut self, input: Box<dyn HostInput>) {
        self.input = input;
    }

    /// JOY_STAT: bit 0 TX ready, bit 1 RX FIFO not empty, bit 2 TX finished,
    /// bit 7 ACK input level.
    pub fn status(&self) -> u16 {
        let mut status = 0x0005u16;
        if !self.response.is_empty() {
            status |= 1 << 1;
        }
        if self.ack {
            status |= 1 << 7;
        }
        status
    }

    /// Writing JOY_DATA clocks one byte out to the pad and, on the first
    /// byte of a transfer (the command 0x01), latches a fresh digital-pad
    /// response built from the current host button state.
    pub fn write_data(&mut self, command: u8) {
        if self.response.is_empty() {
            if command == 0x01 {
                let buttons = self.input.buttons();
                self.response = vec![
                    0xFF,
                    DIGITAL_PAD_ID,
                    DIGITAL_PAD_ID_HI,
                    (buttons & 0xFF) as u8,
                    (buttons >> 8) as u8,
                ];
                self.rx_index = 0;
                self.ack = true;
            }
            return;
        }
        self.rx_index += 1;
        if self.rx_index >= self.response.len() {
            self.response.clear();
            self.rx_index = 0;
            self.ack = false;
        }
    }

    /// Reads the byte the pad is currently presenting on JOY_DATA.
    pub fn read_data(&self) -> u8 {
        self.response.get(self.rx_index).copied().unwrap_or(0xFF)
    }
}

impl Default for ControllerPort {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedInput(u16);
    impl HostInput for FixedInput {
        fn buttons(&self) -> u16 {
            self.0
        }
    }

    #[test]
    fn select_command_latches_digital_pad_response() {
        let mut port = ControllerPort::new();
        port.set_input(Box::new(FixedInput(!buttons::CROSS)));
        port.write_data(0x01);
        assert_eq!(port.read_data(), 0xFF);
        port.write_data(0x42);
        assert_eq!(port.read_data(), DIGITAL_PAD_ID);
        port.write_data(0x00);
        assert_eq!(port.read_data(), DIGITAL_PAD_ID_HI);
        port.write_data(0x00);
        let low = port.read_data();
        assert_eq!(low & (buttons::CROSS as u8), 0);
    }

    #[test]
    fn status_reports_rx_not_empty_while_response_pending() {
        let mut port = ControllerPort::new();
        assert_eq!(port.status() & (1 << 1), 0);
        port.write_data(0x01);
        assert_ne!(port.status() & (1 << 1), 0);
    }
}
