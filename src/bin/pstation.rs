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

//! CLI entry point: parses arguments, loads configuration, and hands off
//! to the winit event loop.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use winit::event_loop::EventLoop;

use pstation::core::config::Config;
use pstation::frontend::Application;

/// A PlayStation (PSX) emulator.
#[derive(Parser, Debug)]
#[command(name = "pstation", version, about)]
struct Cli {
    /// Guest program to run directly, bypassing the BIOS shell (a raw
    /// PS-X EXE). Without this, the BIOS boots to its own menu.
    program: Option<PathBuf>,

    /// Path to a PSX BIOS image.
    #[arg(long, default_value = "SCPH1001.BIN")]
    bios: PathBuf,

    /// Path to the TOML configuration file.
    #[arg(long, default_value = "pstation.toml")]
    config: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load config {:?}: {err}", cli.config);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter())).init();

    log::info!("starting pstation (bios={:?})", cli.bios);

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("failed to create event loop: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = Application::new(cli.bios, cli.program);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("event loop exited with error: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
