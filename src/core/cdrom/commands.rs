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

//! The minimal command set the BIOS shell actually issues (spec §4.6,
//! §B): `Test`, `GetStat`, `GetID`, `Setloc`, `SeekL`, `ReadN`, `Pause`,
//! `Init`, `ReadTOC`. Each decides its immediate (INT3) response and an
//! optional second (delayed) response.

use super::InterruptKind;
use crate::core::error::{EmulatorError, Result};

pub struct Response {
    pub bytes: Vec<u8>,
    pub kind: InterruptKind,
}

pub struct DelayedResponse {
    pub delay_ticks: u32,
    pub bytes: Vec<u8>,
    pub kind: InterruptKind,
}

pub enum Command {
    GetStat,
    Setloc,
    ReadN,
    Pause,
    Init,
    SeekL,
    Test,
    GetId,
    ReadToc,
    Unknown(u8),
}

impl Command {
    pub fn decode(opcode: u8) -> Self {
        match opcode {
            0x01 => Command::GetStat,
            0x02 => Command::Setloc,
            0x06 => Command::ReadN,
            0x09 => Command::Pause,
            0x0A => Command::Init,
            0x15 => Command::SeekL,
            0x19 => Command::Test,
            0x1A => Command::GetId,
            0x1E => Command::ReadToc,
            other => Command::Unknown(other),
        }
    }

    /// Runs the command against the current status byte, returning the
    /// immediate INT3 acknowledge and an optional delayed second response.
    /// An opcode outside the supported set is host-side fatal (spec §7):
    /// the guest BIOS never issues one, so seeing one means the front end
    /// is desynchronized from the command stream.
    pub fn run(&self, params: &[u8], status: u8) -> Result<(Response, Option<DelayedResponse>)> {
        Ok(match self {
            Command::GetStat => (ack(vec![status]), None),
            Command::Setloc => (ack(vec![status]), None),
            Command::Test => (
                ack(match params.first() {
                    Some(0x20) => vec![0x94, 0x09, 0x19, 0xC0], // bios date stub
                    _ => vec![status],
                }),
                None,
            ),
            Command::GetId => (
                ack(vec![status]),
                Some(DelayedResponse {
                    delay_ticks: 64,
                    bytes: vec![0x02, 0x00, 0x20, 0x00, b'S', b'C', b'E', b'A'],
                    kind: InterruptKind::Complete,
                }),
            ),
            Command::ReadN | Command::SeekL => (
                ack(vec![status]),
                Some(DelayedResponse {
                    delay_ticks: 128,
                    bytes: vec![status],
                    kind: InterruptKind::DataReady,
                }),
            ),
            Command::Pause | Command::Init => (
                ack(vec![status]),
                Some(DelayedResponse {
                    delay_ticks: 64,
                    bytes: vec![status],
                    kind: InterruptKind::Complete,
                }),
            ),
            Command::ReadToc => (
                ack(vec![status]),
                Some(DelayedResponse {
                    delay_ticks: 64,
                    bytes: vec![status],
                    kind: InterruptKind::Complete,
                }),
            ),
            Command::Unknown(opcode) => return Err(EmulatorError::UnknownCdromCommand(*opcode)),
        })
    }
}

fn ack(bytes: Vec<u8>) -> Response {
    Response {
        bytes,
        kind: InterruptKind::Acknowledge,
    }
}
