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

//! Host-side error plane.
//!
//! Architectural exceptions (load/store address errors, overflow, syscall,
//! ...) are not represented here: they are routed through COP0 as ordinary
//! guest-visible control flow (see [`crate::core::cpu::ExceptionCause`]) and
//! never escape as an `Err`. `EmulatorError` is reserved for conditions the
//! guest could not have observed on real hardware — host bugs or
//! unsupported behavior — which this emulator treats as fatal.

use thiserror::Error;

/// Crate-wide result alias for fallible core operations.
pub type Result<T> = std::result::Result<T, EmulatorError>;

#[derive(Debug, Error)]
pub enum EmulatorError {
    #[error("BIOS image not found at {0}")]
    BiosNotFound(String),

    #[error("invalid BIOS size: expected {expected} bytes, got {got}")]
    InvalidBiosSize { expected: usize, got: usize },

    #[error("unaligned {size}-byte access at 0x{address:08X}")]
    UnalignedAccess { address: u32, size: u32 },

    #[error("access to unmapped address 0x{address:08X}")]
    InvalidMemoryAccess { address: u32 },

    #[error("{size}-bit access width not supported by device at 0x{address:08X}")]
    InvalidAccessWidth { address: u32, size: u32 },

    #[error("unhandled GP0 opcode 0x{opcode:02X}")]
    UnhandledGp0Opcode { opcode: u8 },

    #[error("unhandled DMA direction/port combination on channel {channel} (direction={direction}, sync={sync})")]
    UnhandledDmaTransfer {
        channel: u8,
        direction: u8,
        sync: u8,
    },

    #[error("unknown CD-ROM command 0x{0:02X}")]
    UnknownCdromCommand(u8),

    #[error("not a PS-X EXE: bad magic")]
    InvalidExecutable,

    #[error("executable too large to fit in RAM: {0} bytes")]
    ExecutableTooLarge(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
