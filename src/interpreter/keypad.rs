use super::error::MachineError;

pub const KEY_COUNT: usize = 16;

/// Hex keypad state. Written by the host, read by EX9E, EXA1 and FX0A.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn set(&mut self, key: u8, pressed: bool) -> Result<(), MachineError> {
        let slot = self
            .keys
            .get_mut(key as usize)
            .ok_or(MachineError::InvalidKey(key))?;
        *slot = pressed;
        Ok(())
    }

    pub fn is_pressed(&self, key: u8) -> Result<bool, MachineError> {
        self.keys
            .get(key as usize)
            .copied()
            .ok_or(MachineError::InvalidKey(key))
    }

    /// Lowest-numbered key currently held down.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&k| k).map(|k| k as u8)
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }
}
