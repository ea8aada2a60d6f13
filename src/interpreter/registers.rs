use super::memory::PROGRAM_START;

/// Index of the flags register (carry, borrow, collision).
pub const VF: usize = 0xF;

/// V0-VF, the index register and the program counter.
///
/// `i` is a plain 16-bit value and may point anywhere; it is only validated
/// when something dereferences it through [`super::memory::Memory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registers {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
}

impl Registers {
    pub fn new() -> Registers {
        Registers {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
        }
    }

    pub fn reset(&mut self) {
        *self = Registers::new();
    }

    pub fn set_flag(&mut self, set: bool) {
        self.v[VF] = set as u8;
    }
}

impl Default for Registers {
    fn default() -> Registers {
        Registers::new()
    }
}
