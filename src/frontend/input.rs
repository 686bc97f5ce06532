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

//! Keyboard-to-digital-pad mapping. Implements
//! [`crate::core::controller::HostInput`] so the core never depends on
//! winit directly.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use winit::keyboard::KeyCode;

use crate::core::controller::{buttons, HostInput};

fn default_mapping() -> HashMap<KeyCode, u16> {
    HashMap::from([
        (KeyCode::ArrowUp, buttons::UP),
        (KeyCode::ArrowDown, buttons::DOWN),
        (KeyCode::ArrowLeft, buttons::LEFT),
        (KeyCode::ArrowRight, buttons::RIGHT),
        (KeyCode::KeyI, buttons::TRIANGLE),
        (KeyCode::KeyL, buttons::CIRCLE),
        (KeyCode::KeyK, buttons::CROSS),
        (KeyCode::KeyJ, buttons::SQUARE),
        (KeyCode::KeyQ, buttons::L1),
        (KeyCode::KeyE, buttons::R1),
        (KeyCode::Digit1, buttons::L2),
        (KeyCode::Digit3, buttons::R2),
        (KeyCode::Enter, buttons::START),
        (KeyCode::ShiftRight, buttons::SELECT),
    ])
}

/// Tracks which mapped keys are currently held; `buttons()` assembles the
/// active-low bitfield the controller port expects.
pub struct InputHandler {
    mapping: HashMap<KeyCode, u16>,
    held: u16,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            mapping: default_mapping(),
            held: 0,
        }
    }

    pub fn set_key_state(&mut self, key: KeyCode, pressed: bool) {
        let Some(&button) = self.mapping.get(&key) else {
            return;
        };
        if pressed {
            self.held |= button;
        } else {
            self.held &= !button;
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl HostInput for InputHandler {
    fn buttons(&self) -> u16 {
        !self.held
    }
}

/// Lets the controller port poll the same `InputHandler` the window event
/// loop updates, mirroring the `SharedRasterizer` handle the GPU uses.
pub struct SharedInput(pub Rc<RefCell<InputHandler>>);

impl HostInput for SharedInput {
    fn buttons(&self) -> u16 {
        self.0.borrow().buttons()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpressed_keys_report_all_buttons_released() {
        let handler = InputHandler::new();
        assert_eq!(handler.buttons(), 0xFFFF);
    }

    #[test]
    fn pressing_a_mapped_key_clears_its_bit() {
        let mut handler = InputHandler::new();
        handler.set_key_state(KeyCode::KeyK, true);
        assert_eq!(handler.buttons() & buttons::CROSS, 0);
        handler.set_key_state(KeyCode::KeyK, false);
        assert_ne!(handler.buttons() & buttons::CROSS, 0);
    }
}
