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

//! GP1 display/control commands. Unlike GP0, every GP1 command is a
//! single word (spec §4.5) — no buffering required.

use super::registers::{DisplayMode, DmaDirection};
use super::Gpu;

pub(super) fn execute(gpu: &mut Gpu, value: u32) {
    let opcode = (value >> 24) as u8;
    match opcode {
        0x00 => gpu.reset(),
        0x01 => gpu.command_buffer.clear(),
        0x02 => gpu.status.interrupt_request = false,
        0x03 => gpu.status.display_disabled = value & 0x1 != 0,
        0x04 => gpu.status.dma_direction = DmaDirection::from_bits(value),
        0x05 => {
            gpu.display_area.vram_x = (value & 0x3FF) as u16;
            gpu.display_area.vram_y = ((value >> 10) & 0x1FF) as u16;
        }
        0x06 | 0x07 => {} // horizontal/vertical display range, timing only
        0x08 => gpu.status.display_mode = DisplayMode::from_gp1(value),
        0x10 => gpu.gpuread_latch = gpu_info(gpu, value & 0x7),
        _ => log::warn!("unhandled GP1 opcode 0x{opcode:02X}"),
    }
}

fn gpu_info(gpu: &Gpu, index: u32) -> u32 {
    match index {
        2 => {
            let window = gpu.texture_window;
            window.mask_x as u32
                | (window.mask_y as u32) << 5
                | (window.offset_x as u32) << 10
                | (window.offset_y as u32) << 15
        }
        3 => (gpu.drawing_area.top as u32) << 10 | gpu.drawing_area.left as u32,
        4 => (gpu.drawing_area.bottom as u32) << 10 | gpu.drawing_area.right as u32,
        5 => {
            (gpu.drawing_offset.x as u32 & 0x7FF) | ((gpu.drawing_offset.y as u32 & 0x7FF) << 11)
        }
        _ => 0,
    }
}
