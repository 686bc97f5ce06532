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

//! pstation: a PlayStation (PSX) emulator core.
//!
//! # Architecture
//!
//! - [`core::cpu`]: MIPS R3000A interpreter with load-delay and
//!   branch-delay slot modeling and the COP0 exception machine.
//! - [`core::memory`]: the interconnect that decodes physical addresses
//!   into RAM, scratchpad, BIOS ROM, and device register windows.
//! - [`core::interrupt`]: the 11-line interrupt controller.
//! - [`core::dma`]: the 7-channel block/linked-list DMA engine.
//! - [`core::gpu`]: the GP0/GP1 command processor and the [`core::gpu::Rasterizer`]
//!   trait boundary to a host rasterizer.
//! - [`core::cdrom`], [`core::timer`], [`core::controller`]: narrower
//!   register-surface peripherals.
//! - [`core::system`]: wires every device together and drives the
//!   CPU-instruction / device-step / VBLANK frame loop.
//!
//! All fallible core operations return [`core::error::Result<T>`].

pub mod core;
pub mod frontend;

pub use core::error::{EmulatorError, Result};
