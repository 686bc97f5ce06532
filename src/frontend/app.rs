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

//! The winit [`ApplicationHandler`]: owns the window, the wgpu/egui
//! presentation stack, and the [`System`] it drives at 60 fields/sec.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::system::System;
use crate::frontend::frame_timer::FrameTimer;
use crate::frontend::input::{InputHandler, SharedInput};
use crate::frontend::renderer::{vram_to_rgba8, RenderContext, SharedRasterizer, VramRasterizer};

/// Owns the live `System` once a BIOS is loaded; absent until `resumed`.
struct Emulation {
    system: System,
    vram: Rc<RefCell<VramRasterizer>>,
}

pub struct Application {
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    egui_ctx: egui::Context,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    vram_texture: Option<egui::TextureHandle>,
    emulation: Option<Emulation>,
    frame_timer: FrameTimer,
    paused: bool,
    bios_path: PathBuf,
    exe_path: Option<PathBuf>,
    input_handler: Rc<RefCell<InputHandler>>,
    exit_requested: bool,
}

impl Application {
    pub fn new(bios_path: PathBuf, exe_path: Option<PathBuf>) -> Self {
        Self {
            window: None,
            render_context: None,
            egui_ctx: egui::Context::default(),
            egui_state: None,
            egui_renderer: None,
            vram_texture: None,
            emulation: None,
            frame_timer: FrameTimer::new(60),
            paused: false,
            bios_path,
            exe_path,
            input_handler: Rc::new(RefCell::new(InputHandler::new())),
            exit_requested: false,
        }
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("emulation {}", if self.paused { "paused" } else { "resumed" });
    }

    fn step_frame(&mut self) {
        if !self.paused {
            return;
        }
        self.run_one_frame();
    }

    fn reset(&mut self) {
        if let Some(emulation) = &mut self.emulation {
            emulation.system.reset();
            log::info!("system reset");
        }
    }

    fn run_one_frame(&mut self) {
        let Some(emulation) = &mut self.emulation else {
            return;
        };
        if let Err(err) = emulation.system.run_frame() {
            log::error!("emulation error, pausing: {err}");
            self.paused = true;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn render(&mut self) -> Result<(), String> {
        let window = self.window.as_ref().ok_or("window not initialized")?;
        let render_context = self.render_context.as_mut().ok_or("render context not initialized")?;
        let egui_state = self.egui_state.as_mut().ok_or("egui state not initialized")?;
        let egui_renderer = self.egui_renderer.as_mut().ok_or("egui renderer not initialized")?;

        let output = match render_context.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                render_context.resize(render_context.surface_config.width, render_context.surface_config.height);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timeout while acquiring frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err("surface out of memory while acquiring frame".to_string());
            }
            Err(e) => return Err(format!("failed to get surface texture: {e:?}")),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(emulation) = &self.emulation {
            let rgba = vram_to_rgba8(emulation.vram.borrow().vram());
            let image = egui::ColorImage::from_rgba_unmultiplied([1024, 512], &rgba);
            match &mut self.vram_texture {
                Some(handle) => handle.set(image, egui::TextureOptions::NEAREST),
                None => {
                    self.vram_texture =
                        Some(self.egui_ctx.load_texture("vram", image, egui::TextureOptions::NEAREST));
                }
            }
        }

        let raw_input = egui_state.take_egui_input(window);
        let paused = self.paused;
        let fps = self.frame_timer.fps();
        let pc = self.emulation.as_ref().map(|e| e.system.cpu().pc());
        let vram_texture = self.vram_texture.clone();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::TopBottomPanel::top("hud").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!("fps: {fps:.1}"));
                    ui.separator();
                    ui.label(if paused { "paused" } else { "running" });
                    if let Some(pc) = pc {
                        ui.separator();
                        ui.label(format!("pc: 0x{pc:08x}"));
                    }
                    ui.separator();
                    ui.label("space=pause f10=step f5=reset");
                });
            });
            egui::CentralPanel::default().show(ctx, |ui| {
                if let Some(texture) = &vram_texture {
                    ui.add(egui::Image::new(texture).shrink_to_fit());
                } else {
                    ui.label("no BIOS loaded");
                }
            });
        });

        egui_state.handle_platform_output(window, full_output.platform_output);
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&render_context.device, &render_context.queue, *id, delta);
        }

        let mut encoder = render_context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("pstation encoder") });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [render_context.surface_config.width, render_context.surface_config.height],
            pixels_per_point: full_output.pixels_per_point,
        };
        egui_renderer.update_buffers(
            &render_context.device,
            &render_context.queue,
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("pstation egui pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        render_context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl ApplicationHandler for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("pstation")
            .with_inner_size(winit::dpi::LogicalSize::new(1024, 560))
            .with_resizable(true);
        let window = Arc::new(event_loop.create_window(window_attributes).expect("failed to create window"));

        let render_context = pollster::block_on(RenderContext::new(&window)).expect("failed to create renderer");

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&render_context.device, render_context.surface_config.format, egui_wgpu::RendererOptions::default());

        let vram = Rc::new(RefCell::new(VramRasterizer::new()));
        let mut system = System::new(Box::new(SharedRasterizer(vram.clone())));
        system.set_controller_input(Box::new(SharedInput(self.input_handler.clone())));
        if let Err(err) = system.load_bios(&self.bios_path) {
            log::error!("failed to load BIOS from {:?}: {err}", self.bios_path);
            panic!("cannot start emulator without a valid BIOS image");
        }
        if let Some(exe_path) = &self.exe_path {
            if let Err(err) = system.load_executable(exe_path) {
                log::error!("failed to load executable {:?}: {err}", exe_path);
            }
        }
        system.reset();

        self.window = Some(window);
        self.render_context = Some(render_context);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);
        self.emulation = Some(Emulation { system, vram });

        log::info!("application initialized");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(render_context) = &mut self.render_context {
                    render_context.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    let pressed = event.state.is_pressed();
                    if pressed {
                        match key_code {
                            KeyCode::Space => {
                                self.toggle_pause();
                                return;
                            }
                            KeyCode::F10 => {
                                self.step_frame();
                                return;
                            }
                            KeyCode::F5 => {
                                self.reset();
                                return;
                            }
                            _ => {}
                        }
                    }
                    self.input_handler.borrow_mut().set_key_state(key_code, pressed);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.render() {
                    log::error!("render error: {err}");
                    event_loop.exit();
                }
            }
            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.paused && self.frame_timer.should_run_frame() {
            self.run_one_frame();
            self.frame_timer.tick();
        }

        event_loop.set_control_flow(if self.paused {
            winit::event_loop::ControlFlow::Wait
        } else {
            winit::event_loop::ControlFlow::WaitUntil(self.frame_timer.next_frame_instant())
        });
    }
}
