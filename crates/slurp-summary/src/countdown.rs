/// Message-count autosave trigger.
///
/// Starts at `wait`; each tick decrements. The tick that finds it already at
/// zero resets it to `wait` and reports that a save is due, so the first
/// signal arrives on call `wait + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveCountdown {
    wait: u32,
    remaining: u32,
}

impl SaveCountdown {
    pub fn new(wait: u32) -> Self {
        Self {
            wait,
            remaining: wait,
        }
    }

    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            self.remaining = self.wait;
            true
        } else {
            self.remaining -= 1;
            false
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}
