/// Counts how long the viewer has gone without user input.
#[derive(Clone, Debug, PartialEq)]
pub struct IdleClock {
    pub idle: f64,
    pub delay: f64,
}

impl Default for IdleClock {
    fn default() -> Self {
        Self { idle: 0.0, delay: 3.0 }
    }
}

impl IdleClock {
    pub fn new(delay_seconds: f64) -> Self {
        Self {
            idle: 0.0,
            delay: delay_seconds,
        }
    }

    /// Called whenever the user touches the view
    pub fn reset(&mut self) {
        self.idle = 0.0;
    }

    /// Advances the clock by `dt` seconds and returns the part of `dt` that
    /// falls after the idle delay expired (zero while still waiting).
    pub fn advance(&mut self, dt: f64) -> f64 {
        let before = self.idle;
        self.idle += dt.max(0.0);
        if self.idle <= self.delay {
            0.0
        } else {
            self.idle - before.max(self.delay)
        }
    }

    pub fn is_idle(&self) -> bool {
        self.idle >= self.delay
    }
}
