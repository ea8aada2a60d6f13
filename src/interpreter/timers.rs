/// Delay and sound timers. Both count down by one per tick and stop at zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// The host should be sounding a tone while this holds.
    pub fn buzzer_active(&self) -> bool {
        self.sound > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_floors_at_zero() {
        let mut t = Timers { delay: 1, sound: 2 };
        t.tick();
        assert_eq!(t, Timers { delay: 0, sound: 1 });
        assert!(t.buzzer_active());
        t.tick();
        t.tick();
        assert_eq!(t, Timers { delay: 0, sound: 0 });
        assert!(!t.buzzer_active());
    }
}
