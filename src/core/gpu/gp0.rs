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

//! GP0 rendering/state command decode (spec §4.5).
//!
//! Polygon word counts follow the real hardware's opcode bit layout:
//! bit1 semi-transparency, bit2 textured, bit3 quad (vs triangle), bit4
//! Gouraud-shaded. A shaded vertex after the first carries its own color
//! word; a textured vertex carries a texcoord/page word.

use super::registers::{DrawMode, DrawingArea, DrawingOffset, TextureWindow};
use super::rasterizer::{Color, PolygonOptions, RectOptions, Vertex};
use super::Gpu;

pub(super) const POLYLINE_TERMINATOR: u32 = 0x5000_5000;

/// How many more words (including the one just buffered) a command needs
/// before it can be dispatched. `None` means "still accumulating" (used
/// for polylines, which are terminated by a sentinel rather than a count).
pub(super) fn fixed_word_count(opcode: u8, first_word: u32) -> Option<u32> {
    match opcode {
        0x00 => Some(1),
        0x01 => Some(1),
        0x02 => Some(3),
        0x1F => Some(1),
        0x20..=0x3F => Some(polygon_word_count(opcode)),
        0x40..=0x5F if opcode & 0x08 == 0 => Some(if opcode & 0x10 != 0 { 3 } else { 2 }),
        0x40..=0x5F => None, // polyline, variable length terminated by sentinel
        0x60..=0x7F => Some(rectangle_word_count(opcode)),
        0x80 => Some(4),
        0xA0 => Some(3 + payload_words(first_word)),
        0xC0 => Some(3),
        0xE1..=0xE6 => Some(1),
        _ => Some(1),
    }
}

fn polygon_word_count(opcode: u8) -> u32 {
    let textured = opcode & 0x04 != 0;
    let quad = opcode & 0x08 != 0;
    let shaded = opcode & 0x10 != 0;
    let vertices = if quad { 4 } else { 3 };
    let mut words = 1; // command + first color
    for vertex in 0..vertices {
        words += 1; // xy
        if textured {
            words += 1;
        }
        if shaded && vertex + 1 < vertices {
            words += 1; // subsequent vertices carry their own color word
        }
    }
    words
}

fn rectangle_word_count(opcode: u8) -> u32 {
    let textured = opcode & 0x04 != 0;
    let size_variant = (opcode >> 3) & 0x3;
    let mut words = 2; // command+color, then vertex xy
    if textured {
        words += 1;
    }
    if size_variant == 0 {
        words += 1; // variable size word
    }
    words
}

/// `CPU -> VRAM` image loads (0xA0) carry a 3-word header (command,
/// destination, size) followed by `ceil(w*h/2)` packed-halfword payload
/// words.
fn payload_words(_first_word: u32) -> u32 {
    // The real word count depends on the size word, which is not yet
    // buffered when this is first called for word 0; `Gpu::push_gp0`
    // recomputes it once the header is complete (see `header_payload_words`).
    0
}

pub(super) fn header_payload_words(size_word: u32) -> u32 {
    let width = (size_word & 0xFFFF) as u32;
    let height = ((size_word >> 16) & 0xFFFF) as u32;
    let halfwords = width.max(1) * height.max(1);
    (halfwords + 1) / 2
}

pub(super) fn execute(gpu: &mut Gpu, buffer: &[u32]) {
    let opcode = (buffer[0] >> 24) as u8;
    match opcode {
        0x00 | 0x01 | 0x1F => {}
        0x02 => fill_rect(gpu, buffer),
        0x20..=0x3F => polygon(gpu, buffer, opcode),
        0x40..=0x5F => line(gpu, buffer, opcode),
        0x60..=0x7F => rectangle(gpu, buffer, opcode),
        0x80 => vram_copy(gpu, buffer),
        0xA0 => vram_load(gpu, buffer),
        0xC0 => vram_store(gpu, buffer),
        0xE1 => {
            gpu.status.draw_mode = DrawMode::from_gp0(buffer[0]);
        }
        0xE2 => {
            gpu.texture_window = TextureWindow::from_gp0(buffer[0]);
        }
        0xE3 => {
            gpu.drawing_area.left = (buffer[0] & 0x3FF) as u16;
            gpu.drawing_area.top = ((buffer[0] >> 10) & 0x1FF) as u16;
            sync_drawing_area(gpu);
        }
        0xE4 => {
            gpu.drawing_area.right = (buffer[0] & 0x3FF) as u16;
            gpu.drawing_area.bottom = ((buffer[0] >> 10) & 0x1FF) as u16;
            sync_drawing_area(gpu);
        }
        0xE5 => {
            gpu.drawing_offset = DrawingOffset::from_gp0(buffer[0]);
        }
        0xE6 => {
            gpu.status.draw_pixels_with_mask = buffer[0] & 0x1 != 0;
            gpu.status.mask_while_drawing = buffer[0] & 0x2 != 0;
        }
        _ => log::warn!("unhandled GP0 opcode 0x{opcode:02X}"),
    }
}

fn sync_drawing_area(gpu: &mut Gpu) {
    let area: DrawingArea = gpu.drawing_area;
    gpu.rasterizer
        .set_drawing_area(area.left, area.top, area.right, area.bottom);
}

fn fill_rect(gpu: &mut Gpu, buffer: &[u32]) {
    let color = Color::from_bgr24(buffer[0]);
    let top_left = Vertex {
        x: (buffer[1] & 0xFFFF) as i16,
        y: ((buffer[1] >> 16) & 0xFFFF) as i16,
    };
    let size = (
        (buffer[2] & 0xFFFF) as u16,
        ((buffer[2] >> 16) & 0xFFFF) as u16,
    );
    gpu.rasterizer.fill_rect(top_left, size, color);
}

fn polygon(gpu: &mut Gpu, buffer: &[u32], opcode: u8) {
    let textured = opcode & 0x04 != 0;
    let quad = opcode & 0x08 != 0;
    let shaded = opcode & 0x10 != 0;
    let count = if quad { 4 } else { 3 };

    let base_color = Color::from_bgr24(buffer[0]);
    let mut colors = vec![base_color; count];
    let mut vertices = vec![Vertex::default(); count];
    let mut texcoords = vec![(0u8, 0u8); count];
    let mut texture_page = 0u16;
    let mut clut = 0u16;

    let mut cursor = 1;
    for i in 0..count {
        if shaded && i > 0 {
            colors[i] = Color::from_bgr24(buffer[cursor]);
            cursor += 1;
        }
        let xy = buffer[cursor];
        cursor += 1;
        vertices[i] = Vertex {
            x: sign_extend_11(xy & 0xFFFF),
            y: sign_extend_11((xy >> 16) & 0xFFFF),
        };
        if textured {
            let tex = buffer[cursor];
            cursor += 1;
            texcoords[i] = ((tex & 0xFF) as u8, ((tex >> 8) & 0xFF) as u8);
            if i == 0 {
                clut = ((tex >> 16) & 0xFFFF) as u16;
            } else if i == 1 {
                texture_page = ((tex >> 16) & 0xFFFF) as u16;
            }
        }
    }

    gpu.rasterizer.push_polygon(
        &vertices,
        &colors,
        &texcoords,
        PolygonOptions {
            textured,
            shaded,
            semi_transparent: opcode & 0x02 != 0,
            texture_page,
            clut,
        },
    );
}

fn line(gpu: &mut Gpu, buffer: &[u32], opcode: u8) {
    let shaded = opcode & 0x10 != 0;
    let semi_transparent = opcode & 0x02 != 0;
    let base_color = Color::from_bgr24(buffer[0]);

    let mut colors = Vec::new();
    let mut vertices = Vec::new();
    let mut cursor = 1;
    let mut current_color = base_color;
    while cursor < buffer.len() {
        if buffer[cursor] == POLYLINE_TERMINATOR {
            break;
        }
        if shaded && cursor > 1 {
            current_color = Color::from_bgr24(buffer[cursor]);
            cursor += 1;
            if cursor >= buffer.len() {
                break;
            }
        }
        let xy = buffer[cursor];
        cursor += 1;
        vertices.push(Vertex {
            x: sign_extend_11(xy & 0xFFFF),
            y: sign_extend_11((xy >> 16) & 0xFFFF),
        });
        colors.push(current_color);
    }

    gpu.rasterizer.push_line(&vertices, &colors, semi_transparent);
}

fn rectangle(gpu: &mut Gpu, buffer: &[u32], opcode: u8) {
    let textured = opcode & 0x04 != 0;
    let semi_transparent = opcode & 0x02 != 0;
    let size_variant = (opcode >> 3) & 0x3;

    let color = Color::from_bgr24(buffer[0]);
    let xy = buffer[1];
    let top_left = Vertex {
        x: sign_extend_11(xy & 0xFFFF),
        y: sign_extend_11((xy >> 16) & 0xFFFF),
    };

    let mut cursor = 2;
    let mut texcoord = (0u8, 0u8);
    let mut texture_page = 0u16;
    let mut clut = 0u16;
    if textured {
        let tex = buffer[cursor];
        cursor += 1;
        texcoord = ((tex & 0xFF) as u8, ((tex >> 8) & 0xFF) as u8);
        clut = ((tex >> 16) & 0xFFFF) as u16;
        texture_page = gpu.status.draw_mode.status_bits() as u16;
    }

    let size = match size_variant {
        1 => (1, 1),
        2 => (8, 8),
        3 => (16, 16),
        _ => {
            let word = buffer[cursor];
            (
                (word & 0xFFFF) as u16,
                ((word >> 16) & 0xFFFF) as u16,
            )
        }
    };

    gpu.rasterizer.push_rect(
        top_left,
        size,
        color,
        texcoord,
        RectOptions {
            textured,
            semi_transparent,
            texture_page,
            clut,
        },
    );
}

fn vram_copy(gpu: &mut Gpu, buffer: &[u32]) {
    let src = (
        (buffer[1] & 0xFFFF) as u16,
        ((buffer[1] >> 16) & 0xFFFF) as u16,
    );
    let dst = (
        (buffer[2] & 0xFFFF) as u16,
        ((buffer[2] >> 16) & 0xFFFF) as u16,
    );
    let size = (
        (buffer[3] & 0xFFFF) as u16,
        ((buffer[3] >> 16) & 0xFFFF) as u16,
    );
    gpu.rasterizer.vram_copy(src, dst, size);
}

fn vram_load(gpu: &mut Gpu, buffer: &[u32]) {
    let dst = (
        (buffer[1] & 0xFFFF) as u16,
        ((buffer[1] >> 16) & 0xFFFF) as u16,
    );
    let size = (
        (buffer[2] & 0xFFFF) as u16,
        ((buffer[2] >> 16) & 0xFFFF) as u16,
    );
    let mut pixels = Vec::with_capacity(buffer.len().saturating_sub(3) * 2);
    for word in &buffer[3..] {
        pixels.push((word & 0xFFFF) as u16);
        pixels.push(((word >> 16) & 0xFFFF) as u16);
    }
    gpu.rasterizer.vram_write(dst.0, dst.1, size.0, size.1, &pixels);
}

fn vram_store(gpu: &mut Gpu, buffer: &[u32]) {
    let src = (
        (buffer[1] & 0xFFFF) as u16,
        ((buffer[1] >> 16) & 0xFFFF) as u16,
    );
    let size = (
        (buffer[2] & 0xFFFF) as u16,
        ((buffer[2] >> 16) & 0xFFFF) as u16,
    );
    let pixels = gpu.rasterizer.vram_read(src.0, src.1, size.0, size.1);
    gpu.begin_image_store(pixels);
}

fn sign_extend_11(value: u32) -> i16 {
    ((value << 5) as i16) >> 5
}
