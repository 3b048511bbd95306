//! Pre-play countdown timer

use serde::{Deserialize, Serialize};

use crate::config::CountdownConfig;

/// Counts from `start_value` down to 0 ("GO"), then reports -1 and goes idle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    start_value: i32,
    step_time: f32,
    /// Current value; negative when idle
    current: i32,
    elapsed: f32,
}

impl Countdown {
    pub fn new(config: &CountdownConfig) -> Self {
        Self {
            start_value: config.start_value,
            step_time: config.step_time,
            current: -1,
            elapsed: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.current >= 0
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    /// Restart from the top; returns the first value to report
    pub fn start(&mut self) -> i32 {
        self.current = self.start_value;
        self.elapsed = 0.0;
        self.current
    }

    /// Advance the timer; returns the new value when a step completes.
    /// At most one step per call, the overshoot carries into the next one.
    pub fn update(&mut self, elapsed: f32) -> Option<i32> {
        if !self.is_running() {
            return None;
        }
        self.elapsed += elapsed;
        if self.elapsed >= self.step_time {
            self.elapsed -= self.step_time;
            self.current -= 1;
            Some(self.current)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(countdown: &mut Countdown, frames: usize, elapsed: f32) -> Vec<i32> {
        (0..frames).filter_map(|_| countdown.update(elapsed)).collect()
    }

    #[test]
    fn test_idle_until_started() {
        let mut countdown = Countdown::new(&CountdownConfig::default());
        assert!(!countdown.is_running());
        assert!(run(&mut countdown, 500, 1.0).is_empty());
    }

    #[test]
    fn test_counts_down_once_per_second() {
        let mut countdown = Countdown::new(&CountdownConfig::default());
        assert_eq!(countdown.start(), 3);
        assert!(run(&mut countdown, 59, 1.0).is_empty());
        assert_eq!(countdown.update(1.0), Some(2));
        assert_eq!(run(&mut countdown, 180, 1.0), vec![1, 0, -1]);
        assert!(!countdown.is_running());
        assert_eq!(countdown.update(1000.0), None);
    }

    #[test]
    fn test_overshoot_carries_over() {
        let mut countdown = Countdown::new(&CountdownConfig {
            start_value: 2,
            step_time: 10.0,
        });
        countdown.start();
        // A long frame yields only one step but banks the rest
        assert_eq!(countdown.update(25.0), Some(1));
        assert_eq!(countdown.update(0.0), Some(0));
        assert_eq!(countdown.update(0.0), None);
        assert_eq!(countdown.update(5.0), Some(-1));
    }

    #[test]
    fn test_restart_resets_timer() {
        let mut countdown = Countdown::new(&CountdownConfig::default());
        countdown.start();
        run(&mut countdown, 90, 1.0);
        assert_eq!(countdown.current(), 2);
        assert_eq!(countdown.start(), 3);
        assert!(run(&mut countdown, 59, 1.0).is_empty());
    }
}
