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

//! wgpu presentation plus a software [`Rasterizer`] backed by a 1024x512
//! VRAM buffer. This is one concrete collaborator behind the GPU's trait
//! boundary (spec §4.5) — the core never references wgpu directly.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use winit::window::Window;

use crate::core::gpu::rasterizer::{Color, PolygonOptions, RectOptions, Rasterizer, Vertex};

pub struct RenderContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    pub async fn new(window: &Arc<Window>) -> Result<Self, String> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| format!("failed to create surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("no suitable GPU adapter: {e}"))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("pstation device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| format!("failed to create device: {e}"))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        log::info!(
            "initialized wgpu context: {}x{}, format {:?}",
            surface_config.width,
            surface_config.height,
            surface_format
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.surface_config.width = width;
            self.surface_config.height = height;
            self.surface.configure(&self.device, &self.surface_config);
        }
    }
}

/// Software rasterizer over a flat 1024x512 VRAM buffer (native PSX
/// dimensions). Polygons are filled with their first vertex's color —
/// Gouraud interpolation and texture sampling are not modeled, since the
/// trait boundary only requires *some* correct pixel output (spec §4.5).
pub struct VramRasterizer {
    vram: Vec<u16>,
    drawing_area: (u16, u16, u16, u16),
}

impl VramRasterizer {
    pub const WIDTH: usize = 1024;
    pub const HEIGHT: usize = 512;

    pub fn new() -> Self {
        Self {
            vram: vec![0; Self::WIDTH * Self::HEIGHT],
            drawing_area: (0, 0, 1023, 511),
        }
    }

    pub fn vram(&self) -> &[u16] {
        &self.vram
    }

    fn clip(&self, x: i32, y: i32) -> bool {
        let (left, top, right, bottom) = self.drawing_area;
        x >= left as i32 && x <= right as i32 && y >= top as i32 && y <= bottom as i32
    }

    fn put(&mut self, x: i32, y: i32, color: Color) {
        if !self.clip(x, y) || x < 0 || y < 0 || x as usize >= Self::WIDTH || y as usize >= Self::HEIGHT {
            return;
        }
        self.vram[y as usize * Self::WIDTH + x as usize] = to_rgb555(color);
    }

    fn fill_triangle(&mut self, v: &[Vertex; 3], color: Color) {
        let min_x = v.iter().map(|p| p.x).min().unwrap().max(0);
        let max_x = v.iter().map(|p| p.x).max().unwrap();
        let min_y = v.iter().map(|p| p.y).min().unwrap().max(0);
        let max_y = v.iter().map(|p| p.y).max().unwrap();

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if inside_triangle(v, x, y) {
                    self.put(x as i32, y as i32, color);
                }
            }
        }
    }
}

impl Default for VramRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn edge(a: Vertex, b: Vertex, x: i16, y: i16) -> i32 {
    (b.x as i32 - a.x as i32) * (y as i32 - a.y as i32) - (b.y as i32 - a.y as i32) * (x as i32 - a.x as i32)
}

fn inside_triangle(v: &[Vertex; 3], x: i16, y: i16) -> bool {
    let d0 = edge(v[0], v[1], x, y);
    let d1 = edge(v[1], v[2], x, y);
    let d2 = edge(v[2], v[0], x, y);
    let has_neg = d0 < 0 || d1 < 0 || d2 < 0;
    let has_pos = d0 > 0 || d1 > 0 || d2 > 0;
    !(has_neg && has_pos)
}

fn to_rgb555(color: Color) -> u16 {
    ((color.r as u16 >> 3) & 0x1F)
        | (((color.g as u16 >> 3) & 0x1F) << 5)
        | (((color.b as u16 >> 3) & 0x1F) << 10)
}

fn from_rgb555(pixel: u16) -> [u8; 4] {
    let r = ((pixel & 0x1F) << 3) as u8;
    let g = (((pixel >> 5) & 0x1F) << 3) as u8;
    let b = (((pixel >> 10) & 0x1F) << 3) as u8;
    [r, g, b, 0xFF]
}

/// Converts the current VRAM contents to packed RGBA8 for upload to a
/// wgpu texture.
pub fn vram_to_rgba8(vram: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(vram.len() * 4);
    for &pixel in vram {
        out.extend_from_slice(&from_rgb555(pixel));
    }
    out
}

impl Rasterizer for VramRasterizer {
    fn push_polygon(
        &mut self,
        vertices: &[Vertex],
        colors: &[Color],
        _texcoords: &[(u8, u8)],
        _options: PolygonOptions,
    ) {
        if vertices.len() < 3 {
            return;
        }
        self.fill_triangle(&[vertices[0], vertices[1], vertices[2]], colors[0]);
        if vertices.len() == 4 {
            self.fill_triangle(&[vertices[1], vertices[2], vertices[3]], colors[0]);
        }
    }

    fn push_line(&mut self, vertices: &[Vertex], colors: &[Color], _semi_transparent: bool) {
        for pair in vertices.windows(2) {
            draw_line(self, pair[0], pair[1], colors[0]);
        }
    }

    fn fill_rect(&mut self, top_left: Vertex, size: (u16, u16), color: Color) {
        for y in 0..size.1 as i32 {
            for x in 0..size.0 as i32 {
                self.put(top_left.x as i32 + x, top_left.y as i32 + y, color);
            }
        }
    }

    fn push_rect(
        &mut self,
        top_left: Vertex,
        size: (u16, u16),
        color: Color,
        _texcoord: (u8, u8),
        _options: RectOptions,
    ) {
        self.fill_rect(top_left, size, color);
    }

    fn vram_write(&mut self, x: u16, y: u16, width: u16, height: u16, pixels: &[u16]) {
        for row in 0..height as usize {
            for col in 0..width as usize {
                let index = row * width as usize + col;
                if index >= pixels.len() {
                    continue;
                }
                let dst_x = (x as usize + col) % Self::WIDTH;
                let dst_y = (y as usize + row) % Self::HEIGHT;
                self.vram[dst_y * Self::WIDTH + dst_x] = pixels[index];
            }
        }
    }

    fn vram_read(&mut self, x: u16, y: u16, width: u16, height: u16) -> Vec<u16> {
        let mut out = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height as usize {
            for col in 0..width as usize {
                let sx = (x as usize + col) % Self::WIDTH;
                let sy = (y as usize + row) % Self::HEIGHT;
                out.push(self.vram[sy * Self::WIDTH + sx]);
            }
        }
        out
    }

    fn vram_copy(&mut self, src: (u16, u16), dst: (u16, u16), size: (u16, u16)) {
        let pixels = self.vram_read(src.0, src.1, size.0, size.1);
        self.vram_write(dst.0, dst.1, size.0, size.1, &pixels);
    }

    fn set_drawing_area(&mut self, left: u16, top: u16, right: u16, bottom: u16) {
        self.drawing_area = (left, top, right, bottom);
    }

    fn display(&mut self, _vram_x: u16, _vram_y: u16, _horizontal_resolution: u8, _vertical_resolution: u8) {
        // Presentation to the wgpu surface happens in `Application::redraw`,
        // which calls `vram()` directly; nothing to do here.
    }
}

/// Lets the host keep its own handle to the VRAM buffer (for presenting
/// to the wgpu surface) while the core's `Gpu` drives the same buffer
/// through the `Rasterizer` trait — the same shared-handle pattern the
/// bus uses for its own devices.
pub struct SharedRasterizer(pub Rc<RefCell<VramRasterizer>>);

impl Rasterizer for SharedRasterizer {
    fn push_polygon(
        &mut self,
        vertices: &[Vertex],
        colors: &[Color],
        texcoords: &[(u8, u8)],
        options: PolygonOptions,
    ) {
        self.0.borrow_mut().push_polygon(vertices, colors, texcoords, options);
    }

    fn push_line(&mut self, vertices: &[Vertex], colors: &[Color], semi_transparent: bool) {
        self.0.borrow_mut().push_line(vertices, colors, semi_transparent);
    }

    fn fill_rect(&mut self, top_left: Vertex, size: (u16, u16), color: Color) {
        self.0.borrow_mut().fill_rect(top_left, size, color);
    }

    fn push_rect(
        &mut self,
        top_left: Vertex,
        size: (u16, u16),
        color: Color,
        texcoord: (u8, u8),
        options: RectOptions,
    ) {
        self.0.borrow_mut().push_rect(top_left, size, color, texcoord, options);
    }

    fn vram_write(&mut self, x: u16, y: u16, width: u16, height: u16, pixels: &[u16]) {
        self.0.borrow_mut().vram_write(x, y, width, height, pixels);
    }

    fn vram_read(&mut self, x: u16, y: u16, width: u16, height: u16) -> Vec<u16> {
        self.0.borrow_mut().vram_read(x, y, width, height)
    }

    fn vram_copy(&mut self, src: (u16, u16), dst: (u16, u16), size: (u16, u16)) {
        self.0.borrow_mut().vram_copy(src, dst, size);
    }

    fn set_drawing_area(&mut self, left: u16, top: u16, right: u16, bottom: u16) {
        self.0.borrow_mut().set_drawing_area(left, top, right, bottom);
    }

    fn display(&mut self, vram_x: u16, vram_y: u16, horizontal_resolution: u8, vertical_resolution: u8) {
        self.0
            .borrow_mut()
            .display(vram_x, vram_y, horizontal_resolution, vertical_resolution);
    }
}

fn draw_line(target: &mut VramRasterizer, a: Vertex, b: Vertex, color: Color) {
    let (mut x0, mut y0) = (a.x as i32, a.y as i32);
    let (x1, y1) = (b.x as i32, b.y as i32);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        target.put(x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_writes_pixels_within_bounds() {
        let mut rasterizer = VramRasterizer::new();
        rasterizer.fill_rect(Vertex { x: 2, y: 2 }, (4, 4), Color { r: 255, g: 0, b: 0 });
        assert_ne!(rasterizer.vram()[2 * VramRasterizer::WIDTH + 2], 0);
    }

    #[test]
    fn vram_write_then_read_round_trips() {
        let mut rasterizer = VramRasterizer::new();
        let pixels = vec![0x1234u16; 16];
        rasterizer.vram_write(0, 0, 4, 4, &pixels);
        let read_back = rasterizer.vram_read(0, 0, 4, 4);
        assert_eq!(read_back, pixels);
    }

    #[test]
    fn drawing_area_clips_fills_outside_it() {
        let mut rasterizer = VramRasterizer::new();
        rasterizer.set_drawing_area(10, 10, 20, 20);
        rasterizer.fill_rect(Vertex { x: 0, y: 0 }, (4, 4), Color { r: 255, g: 255, b: 255 });
        assert_eq!(rasterizer.vram()[0], 0);
    }
}
