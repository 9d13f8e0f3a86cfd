use bevy_ecs::prelude::Resource;

pub const DEFAULT_FIXED_STEP: f32 = 0.02;
pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 8;

/// Variable frame clock.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}

/// Fixed-step physics clock. Frame time is accumulated and spent in whole steps.
#[derive(Resource, Clone, Copy, Debug)]
pub struct FixedTime {
    /// Seconds per physics tick.
    pub step: f32,
    pub accumulator: f32,
    /// Ticks run since start.
    pub ticks: u64,
    pub max_steps_per_frame: u32,
}

impl Default for FixedTime {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_STEP)
    }
}

impl FixedTime {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            ticks: 0,
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
        }
    }

    pub fn with_max_steps_per_frame(mut self, max_steps: u32) -> Self {
        self.max_steps_per_frame = max_steps;
        self
    }

    /// Add frame time and return how many whole steps are due.
    ///
    /// Steps beyond `max_steps_per_frame` are dropped along with their time.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut due = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            due += 1;
        }
        if due > self.max_steps_per_frame {
            log::warn!(
                "Fixed step overrun: {} steps due, running {}",
                due,
                self.max_steps_per_frame
            );
            due = self.max_steps_per_frame;
        }
        due
    }

    /// Seconds of simulated time so far.
    pub fn elapsed(&self) -> f32 {
        self.ticks as f32 * self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_spends_whole_steps() {
        let mut fixed = FixedTime::new(0.25);
        assert_eq!(fixed.accumulate(0.1), 0);
        assert_eq!(fixed.accumulate(0.2), 1);
        assert!((fixed.accumulator - 0.05).abs() < 1e-6);
        assert_eq!(fixed.accumulate(0.5), 2);
    }

    #[test]
    fn accumulate_caps_steps_per_frame() {
        let mut fixed = FixedTime::new(0.25).with_max_steps_per_frame(2);
        assert_eq!(fixed.accumulate(2.0), 2);
        assert!(fixed.accumulator < 0.25);
    }

    #[test]
    fn negative_frame_time_is_ignored() {
        let mut fixed = FixedTime::new(0.25);
        assert_eq!(fixed.accumulate(-1.0), 0);
        assert_eq!(fixed.accumulator, 0.0);
    }
}
