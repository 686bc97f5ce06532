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

//! The three hardware timers. Each has a 16-bit counter, a mode register,
//! and a target value; reaching the target or 0xFFFF can reset the counter
//! and/or raise an IRQ.
//!
//! Register block, 16 bytes per timer starting at `0x1F80_1100`:
//! `+0x0` counter, `+0x4` mode, `+0x8` target.
//!
//! This does not model the GPU dot clock or Hblank edges precisely (out of
//! scope, spec §1 non-goals on cycle-exact timing) — "pixel clock"/"hblank"
//! sources tick at the same rate as the system clock source, which is
//! enough for guest code that only checks target/overflow IRQs.

/// Selects what a timer counts against, per spec §A.1 (supplemented detail
/// the distilled spec didn't enumerate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    SystemClock,
    /// Timer 0's dot clock or timer 1's Hblank, approximated as 1:1 with
    /// the system clock.
    Alternate,
    /// Timer 2 only: system clock divided by 8.
    SystemClockDiv8,
}

#[derive(Debug, Clone, Default)]
struct TimerMode {
    sync_enable: bool,
    sync_mode: u8,
    reset_on_target: bool,
    irq_on_target: bool,
    irq_on_max: bool,
    irq_repeat: bool,
    irq_toggle: bool,
    clock_source_bits: u8,
    reached_target: bool,
    reached_max: bool,
    irq_latched: bool,
}

impl TimerMode {
    fn from_bits(bits: u16) -> Self {
        Self {
            sync_enable: bits & 1 != 0,
            sync_mode: ((bits >> 1) & 0x3) as u8,
            reset_on_target: bits & (1 << 3) != 0,
            irq_on_target: bits & (1 << 4) != 0,
            irq_on_max: bits & (1 << 5) != 0,
            irq_repeat: bits & (1 << 6) != 0,
            irq_toggle: bits & (1 << 7) != 0,
            clock_source_bits: ((bits >> 8) & 0x3) as u8,
            reached_target: false,
            reached_max: false,
            irq_latched: false,
        }
    }

    fn to_bits(&self) -> u16 {
        let mut bits = 0u16;
        if self.sync_enable {
            bits |= 1;
        }
        bits |= (self.sync_mode as u16) << 1;
        if self.reset_on_target {
            bits |= 1 << 3;
        }
        if self.irq_on_target {
            bits |= 1 << 4;
        }
        if self.irq_on_max {
            bits |= 1 << 5;
        }
        if self.irq_repeat {
            bits |= 1 << 6;
        }
        if self.irq_toggle {
            bits |= 1 << 7;
        }
        bits |= (self.clock_source_bits as u16) << 8;
        if self.irq_latched {
            bits |= 1 << 10;
        }
        if self.reached_target {
            bits |= 1 << 11;
        }
        if self.reached_max {
            bits |= 1 << 12;
        }
        bits
    }
}

pub struct Timer {
    index: usize,
    counter: u16,
    mode: TimerMode,
    target: u16,
}

impl Timer {
    fn new(index: usize) -> Self {
        Self {
            index,
            counter: 0,
            mode: TimerMode::default(),
            target: 0,
        }
    }

    pub fn clock_source(&self) -> ClockSource {
        match (self.index, self.mode.clock_source_bits) {
            (2, 2) | (2, 3) => ClockSource::SystemClockDiv8,
            (0, 1) | (0, 3) | (1, 1) | (1, 3) => ClockSource::Alternate,
            _ => ClockSource::SystemClock,
        }
    }

    /// Advances the counter by `cycles` system clocks, wrapping the divide
    /// for `SystemClockDiv8`. Returns `true` if this tick should raise the
    /// timer's IRQ line.
    fn tick(&mut self, cycles: u32) -> bool {
        let step = match self.clock_source() {
            ClockSource::SystemClockDiv8 => cycles / 8,
            _ => cycles,
        };
        if step == 0 {
            return false;
        }
        let mut irq = false;
        for _ in 0..step {
            let next = self.counter.wrapping_add(1);
            if self.counter == self.target {
                self.mode.reached_target = true;
                if self.mode.irq_on_target {
                    irq = true;
                }
                if self.mode.reset_on_target {
                    self.counter = 0;
                    continue;
                }
            }
            if self.counter == 0xFFFF {
                self.mode.reached_max = true;
                if self.mode.irq_on_max {
                    irq = true;
                }
            }
            self.counter = next;
        }
        if irq {
            self.mode.irq_latched = true;
        }
        irq
    }

    fn read(&self, reg: u32) -> u32 {
        match reg {
            0x0 => self.counter as u32,
            0x4 => self.mode.to_bits() as u32,
            0x8 => self.target as u32,
            _ => 0,
        }
    }

    fn write(&mut self, reg: u32, value: u32) {
        match reg {
            0x0 => self.counter = value as u16,
            0x4 => {
                self.mode = TimerMode::from_bits(value as u16);
                self.counter = 0;
            }
            0x8 => self.target = value as u16,
            _ => {}
        }
    }
}

pub struct Timers {
    channels: [Timer; 3],
}

impl Timers {
    pub fn new() -> Self {
        Self {
            channels: [Timer::new(0), Timer::new(1), Timer::new(2)],
        }
    }

    pub fn read(&self, index: usize, reg: u32) -> u32 {
        self.channels[index].read(reg)
    }

    pub fn write(&mut self, index: usize, reg: u32, value: u32) {
        self.channels[index].write(reg, value);
    }

    /// Advances all three timers by `cycles` and returns the bit mask
    /// (TIMER0/TIMER1/TIMER2, spec §3 line assignment) of channels whose
    /// IRQ fired this tick.
    pub fn step(&mut self, cycles: u32) -> u16 {
        let mut fired = 0u16;
        for (i, timer) in self.channels.iter_mut().enumerate() {
            if timer.tick(cycles) {
                fired |= 1 << i;
            }
        }
        fired
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_sets_reached_max_and_irq_when_enabled() {
        let mut timers = Timers::new();
        timers.write(0, 0x4, 1 << 5); // irq_on_max
        timers.write(0, 0x0, 0xFFFE);
        let fired = timers.step(2);
        assert_ne!(fired & 1, 0);
        assert_eq!(timers.read(0, 0x0), 0);
    }

    #[test]
    fn reset_on_target_wraps_the_counter() {
        let mut timers = Timers::new();
        timers.write(1, 0x8, 10);
        timers.write(1, 0x4, (1 << 3) | (1 << 4)); // reset_on_target, irq_on_target
        timers.write(1, 0x0, 9);
        let fired = timers.step(1);
        assert_ne!(fired & (1 << 1), 0);
        assert_eq!(timers.read(1, 0x0), 0);
    }

    #[test]
    fn timer2_div8_clock_source_ticks_slower() {
        let mut timers = Timers::new();
        timers.write(2, 0x4, 1 << 9); // clock source bit 1 set -> div8
        timers.step(7);
        assert_eq!(timers.read(2, 0x0), 0);
        timers.step(1);
        assert_eq!(timers.read(2, 0x0), 1);
    }
}
