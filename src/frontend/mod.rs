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

//! The host: a winit/wgpu window, an egui debug HUD, and the concrete
//! [`crate::core::gpu::Rasterizer`] that presents VRAM to the screen.
//!
//! Nothing in `core` depends on this module; it is one possible host
//! among others the trait boundary permits.

pub mod app;
pub mod frame_timer;
pub mod input;
pub mod renderer;

pub use app::Application;
pub use frame_timer::FrameTimer;
pub use renderer::RenderContext;
