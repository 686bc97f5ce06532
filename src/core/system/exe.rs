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

//! PS-X EXE loader (SPEC_FULL.md §B supplement).
//!
//! The format is a fixed 2KiB header: an 8-byte `PS-X EXE` magic, the
//! initial PC and `$gp`, the RAM load address and length, and the initial
//! stack base/offset. Everything past the header is the raw text section,
//! copied verbatim into RAM at the load address.

use std::fs;
use std::path::Path;

use crate::core::error::{EmulatorError, Result};

const HEADER_SIZE: usize = 2048;
const MAGIC: &[u8; 8] = b"PS-X EXE";

pub struct Executable {
    pub entry_pc: u32,
    pub initial_gp: u32,
    pub load_address: u32,
    pub initial_sp_base: u32,
    pub initial_sp_offset: u32,
    pub data: Vec<u8>,
}

impl Executable {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        if bytes.len() < HEADER_SIZE || &bytes[0..8] != MAGIC {
            return Err(EmulatorError::InvalidExecutable);
        }

        let read_u32 = |offset: usize| -> u32 {
            u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
        };

        let entry_pc = read_u32(0x10);
        let initial_gp = read_u32(0x14);
        let load_address = read_u32(0x18);
        let file_size = read_u32(0x1C) as usize;
        let initial_sp_base = read_u32(0x30);
        let initial_sp_offset = read_u32(0x34);

        if load_address as usize + file_size > 0x0020_0000 + HEADER_SIZE {
            return Err(EmulatorError::ExecutableTooLarge(file_size));
        }

        let data_start = HEADER_SIZE;
        let data_end = (data_start + file_size).min(bytes.len());
        let data = bytes[data_start..data_end].to_vec();

        Ok(Self {
            entry_pc,
            initial_gp,
            load_address,
            initial_sp_base,
            initial_sp_offset,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_exe(entry: u32, load_addr: u32, text: &[u8]) -> Vec<u8> {
        let mut header = vec![0u8; HEADER_SIZE];
        header[0..8].copy_from_slice(MAGIC);
        header[0x10..0x14].copy_from_slice(&entry.to_le_bytes());
        header[0x14..0x18].copy_from_slice(&0u32.to_le_bytes());
        header[0x18..0x1C].copy_from_slice(&load_addr.to_le_bytes());
        header[0x1C..0x20].copy_from_slice(&(text.len() as u32).to_le_bytes());
        header[0x30..0x34].copy_from_slice(&0x801F_FF00u32.to_le_bytes());
        header[0x34..0x38].copy_from_slice(&0u32.to_le_bytes());
        let mut out = header;
        out.extend_from_slice(text);
        out
    }

    #[test]
    fn rejects_bad_magic() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; HEADER_SIZE]).unwrap();
        assert!(Executable::load(file.path()).is_err());
    }

    #[test]
    fn parses_header_and_text_section() {
        let bytes = build_exe(0x8001_0000, 0x8001_0000, &[0xDE, 0xAD, 0xBE, 0xEF]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();

        let exe = Executable::load(file.path()).unwrap();
        assert_eq!(exe.entry_pc, 0x8001_0000);
        assert_eq!(exe.load_address, 0x8001_0000);
        assert_eq!(exe.data, vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(exe.initial_sp_base, 0x801F_FF00);
    }
}
