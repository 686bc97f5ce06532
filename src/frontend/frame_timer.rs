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

//! Paces `System::run_frame` calls to 60 fields/sec and tracks a rolling
//! FPS counter for the debug HUD.

use std::time::{Duration, Instant};

pub struct FrameTimer {
    target_frame_time: Duration,
    last_frame: Instant,
    fps: f32,
    fps_start: Instant,
    fps_frame_count: u64,
}

impl FrameTimer {
    pub fn new(target_fps: u32) -> Self {
        assert!(target_fps > 0, "target_fps must be greater than 0");
        let now = Instant::now();
        Self {
            target_frame_time: Duration::from_nanos(1_000_000_000 / target_fps as u64),
            last_frame: now,
            fps: 0.0,
            fps_start: now,
            fps_frame_count: 0,
        }
    }

    /// Call immediately after running a frame; updates the FPS counter
    /// roughly once per second rather than on every frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.fps_frame_count += 1;
        let fps_elapsed = now.duration_since(self.fps_start);
        if fps_elapsed >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_start = now;
        }
        self.last_frame = now;
    }

    #[inline(always)]
    pub fn should_run_frame(&self) -> bool {
        Instant::now().duration_since(self.last_frame) >= self.target_frame_time
    }

    #[inline(always)]
    pub fn next_frame_instant(&self) -> Instant {
        self.last_frame + self.target_frame_time
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_always_due() {
        let timer = FrameTimer::new(60);
        assert!(timer.should_run_frame());
    }

    #[test]
    fn fps_starts_at_zero() {
        let timer = FrameTimer::new(60);
        assert_eq!(timer.fps(), 0.0);
    }

    #[test]
    #[should_panic]
    fn zero_target_fps_panics() {
        FrameTimer::new(0);
    }
}
