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

//! Bit-packed GPU register state (spec §9: represented as integers with
//! accessor functions, not host-native bit-field records).

#[derive(Debug, Clone, Copy, Default)]
pub struct DrawMode {
    pub texture_page_x_base: u16,
    pub texture_page_y_base: u16,
    pub semi_transparency: u8,
    pub texture_depth: u8,
    pub dithering: bool,
    pub draw_to_display: bool,
    pub texture_disable: bool,
    pub texture_x_flip: bool,
    pub texture_y_flip: bool,
}

impl DrawMode {
    pub fn from_gp0(value: u32) -> Self {
        Self {
            texture_page_x_base: (value & 0xF) as u16,
            texture_page_y_base: ((value >> 4) & 0x1) as u16,
            semi_transparency: ((value >> 5) & 0x3) as u8,
            texture_depth: ((value >> 7) & 0x3) as u8,
            dithering: value & (1 << 9) != 0,
            draw_to_display: value & (1 << 10) != 0,
            texture_disable: value & (1 << 11) != 0,
            texture_x_flip: value & (1 << 12) != 0,
            texture_y_flip: value & (1 << 13) != 0,
        }
    }

    /// The low 9 bits of GPUSTAT mirror this register directly.
    pub fn status_bits(&self) -> u32 {
        self.texture_page_x_base as u32
            | (self.texture_page_y_base as u32) << 4
            | (self.semi_transparency as u32) << 5
            | (self.texture_depth as u32) << 7
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DrawingArea {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Default for DrawingArea {
    fn default() -> Self {
        Self { left: 0, top: 0, right: 1023, bottom: 511 }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DrawingOffset {
    pub x: i16,
    pub y: i16,
}

impl DrawingOffset {
    /// 11-bit signed X/Y, sign-extended from bit 10 (spec §4.5).
    pub fn from_gp0(value: u32) -> Self {
        Self {
            x: sign_extend_11(value & 0x7FF),
            y: sign_extend_11((value >> 11) & 0x7FF),
        }
    }
}

fn sign_extend_11(value: u32) -> i16 {
    ((value << 5) as i16) >> 5
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextureWindow {
    pub mask_x: u8,
    pub mask_y: u8,
    pub offset_x: u8,
    pub offset_y: u8,
}

impl TextureWindow {
    pub fn from_gp0(value: u32) -> Self {
        Self {
            mask_x: (value & 0x1F) as u8,
            mask_y: ((value >> 5) & 0x1F) as u8,
            offset_x: ((value >> 10) & 0x1F) as u8,
            offset_y: ((value >> 15) & 0x1F) as u8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaDirection {
    Off,
    Fifo,
    CpuToGp0,
    VramToCpu,
}

impl DmaDirection {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0 => DmaDirection::Off,
            1 => DmaDirection::Fifo,
            2 => DmaDirection::CpuToGp0,
            _ => DmaDirection::VramToCpu,
        }
    }

    fn bits(self) -> u32 {
        match self {
            DmaDirection::Off => 0,
            DmaDirection::Fifo => 1,
            DmaDirection::CpuToGp0 => 2,
            DmaDirection::VramToCpu => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayMode {
    pub horizontal_resolution: u8,
    pub vertical_resolution: u8,
    pub video_mode_pal: bool,
    pub color_depth_24bit: bool,
    pub interlaced: bool,
}

impl DisplayMode {
    pub fn from_gp1(value: u32) -> Self {
        Self {
            horizontal_resolution: (value & 0x3) as u8 | (((value >> 6) & 0x1) << 2) as u8,
            vertical_resolution: ((value >> 2) & 0x1) as u8,
            video_mode_pal: value & (1 << 3) != 0,
            color_depth_24bit: value & (1 << 4) != 0,
            interlaced: value & (1 << 5) != 0,
        }
    }

    fn status_bits(&self) -> u32 {
        let hres = (self.horizontal_resolution & 0x3) as u32
            | (((self.horizontal_resolution >> 2) & 0x1) as u32) << 6;
        hres
            | (self.vertical_resolution as u32) << 2
            | (self.video_mode_pal as u32) << 3
            | (self.color_depth_24bit as u32) << 4
            | (self.interlaced as u32) << 5
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayArea {
    pub vram_x: u16,
    pub vram_y: u16,
}

/// GPUSTAT is assembled fresh from the pieces of state above (spec §4.5) —
/// never stored as an opaque integer, since every field is independently
/// mutated by a different GP0/GP1 command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Status {
    pub draw_mode: DrawMode,
    pub display_mode: DisplayMode,
    pub dma_direction: DmaDirection,
    pub display_disabled: bool,
    pub interrupt_request: bool,
    pub dma_request: bool,
    pub ready_to_receive_command: bool,
    pub ready_to_send_vram: bool,
    pub ready_to_receive_dma: bool,
    pub odd_line: bool,
    pub mask_while_drawing: bool,
    pub draw_pixels_with_mask: bool,
}

impl Default for DmaDirection {
    fn default() -> Self {
        DmaDirection::Off
    }
}

impl Status {
    pub fn assemble(&self) -> u32 {
        let mut value = self.draw_mode.status_bits();
        if self.draw_pixels_with_mask {
            value |= 1 << 11;
        }
        if self.mask_while_drawing {
            value |= 1 << 12;
        }
        value |= self.display_mode.status_bits() << 17;
        if self.display_disabled {
            value |= 1 << 23;
        }
        if self.interrupt_request {
            value |= 1 << 24;
        }
        if self.dma_request {
            value |= 1 << 25;
        }
        value |= 1 << 26; // ready to receive command
        value |= 1 << 27; // ready to send VRAM to CPU
        value |= 1 << 28; // ready to receive DMA block
        value |= self.dma_direction.bits() << 29;
        if self.odd_line {
            value |= 1 << 31;
        }
        // Bit 25's meaning is derived from DMA direction, spec §4.5.
        let dma_ready_bit = match self.dma_direction {
            DmaDirection::Off => false,
            DmaDirection::Fifo => true,
            DmaDirection::CpuToGp0 => true,  // mirrors bit 28, always 1
            DmaDirection::VramToCpu => true, // mirrors bit 27, always 1
        };
        if dma_ready_bit {
            value |= 1 << 25;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_offset_sign_extends_from_bit_ten() {
        let offset = DrawingOffset::from_gp0(0x7FF | (0x400 << 11));
        assert_eq!(offset.x, -1);
        assert_eq!(offset.y, -1024);
    }

    #[test]
    fn gpustat_readiness_bits_are_always_set_while_idle() {
        let status = Status::default();
        let bits = status.assemble();
        assert_ne!(bits & (1 << 26), 0);
        assert_ne!(bits & (1 << 27), 0);
        assert_ne!(bits & (1 << 28), 0);
    }

    #[test]
    fn draw_mode_from_gp0_0x200_matches_spec_example() {
        let mode = DrawMode::from_gp0(0x0000_0200);
        assert_eq!(mode.texture_page_x_base, 0);
        assert_eq!(mode.texture_page_y_base, 1);
        assert_eq!(mode.semi_transparency, 0);
        assert_eq!(mode.texture_depth, 0);
        let mut status = Status::default();
        status.draw_mode = mode;
        assert_eq!(status.assemble() & 0x1FF, 0x110);
    }
}
