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

//! The `Rasterizer` trait is the GPU's only outward-facing collaborator
//! (spec §4.5): "this specification does not constrain its pixel output,
//! only the command it receives." Everything upstream of this file decodes
//! GP0/GP1 commands and VRAM windows; everything downstream of it is a
//! rendering backend's problem.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vertex {
    pub x: i16,
    pub y: i16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn from_bgr24(word: u32) -> Self {
        Self {
            r: (word & 0xFF) as u8,
            g: ((word >> 8) & 0xFF) as u8,
            b: ((word >> 16) & 0xFF) as u8,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonOptions {
    pub textured: bool,
    pub shaded: bool,
    pub semi_transparent: bool,
    pub texture_page: u16,
    pub clut: u16,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RectOptions {
    pub textured: bool,
    pub semi_transparent: bool,
    pub texture_page: u16,
    pub clut: u16,
}

/// A rasterizer receives fully-decoded drawing primitives and VRAM
/// transfers; it owns pixel storage and presentation entirely on its own.
pub trait Rasterizer {
    fn push_polygon(
        &mut self,
        vertices: &[Vertex],
        colors: &[Color],
        texcoords: &[(u8, u8)],
        options: PolygonOptions,
    );

    fn push_line(&mut self, vertices: &[Vertex], colors: &[Color], semi_transparent: bool);

    fn fill_rect(&mut self, top_left: Vertex, size: (u16, u16), color: Color);

    fn push_rect(
        &mut self,
        top_left: Vertex,
        size: (u16, u16),
        color: Color,
        texcoord: (u8, u8),
        options: RectOptions,
    );

    fn vram_write(&mut self, x: u16, y: u16, width: u16, height: u16, pixels: &[u16]);

    fn vram_read(&mut self, x: u16, y: u16, width: u16, height: u16) -> Vec<u16>;

    fn vram_copy(&mut self, src: (u16, u16), dst: (u16, u16), size: (u16, u16));

    fn set_drawing_area(&mut self, left: u16, top: u16, right: u16, bottom: u16);

    /// Called once per `Gpu::enter_vblank` with the current display
    /// parameters; a headless rasterizer can simply ignore it.
    fn display(&mut self, vram_x: u16, vram_y: u16, horizontal_resolution: u8, vertical_resolution: u8);
}

/// Discards every command; used by tests and by a host that has not yet
/// attached a real rendering backend.
#[derive(Debug, Default)]
pub struct NullRasterizer;

impl Rasterizer for NullRasterizer {
    fn push_polygon(
        &mut self,
        _vertices: &[Vertex],
        _colors: &[Color],
        _texcoords: &[(u8, u8)],
        _options: PolygonOptions,
    ) {
    }

    fn push_line(&mut self, _vertices: &[Vertex], _colors: &[Color], _semi_transparent: bool) {}

    fn fill_rect(&mut self, _top_left: Vertex, _size: (u16, u16), _color: Color) {}

    fn push_rect(
        &mut self,
        _top_left: Vertex,
        _size: (u16, u16),
        _color: Color,
        _texcoord: (u8, u8),
        _options: RectOptions,
    ) {
    }

    fn vram_write(&mut self, _x: u16, _y: u16, _width: u16, _height: u16, _pixels: &[u16]) {}

    fn vram_read(&mut self, _x: u16, _y: u16, width: u16, height: u16) -> Vec<u16> {
        vec![0; width as usize * height as usize]
    }

    fn vram_copy(&mut self, _src: (u16, u16), _dst: (u16, u16), _size: (u16, u16)) {}

    fn set_drawing_area(&mut self, _left: u16, _top: u16, _right: u16, _bottom: u16) {}

    fn display(&mut self, _vram_x: u16, _vram_y: u16, _horizontal_resolution: u8, _vertical_resolution: u8) {}
}
