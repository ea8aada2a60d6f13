use super::error::MachineError;

pub const STACK_DEPTH: usize = 16;

/// Return addresses for 2NNN/00EE. Overflow and underflow are errors rather
/// than wrapping into neighbouring state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallStack {
    frames: [u16; STACK_DEPTH],
    sp: usize,
}

impl CallStack {
    pub fn new() -> CallStack {
        CallStack {
            frames: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = CallStack::new();
    }

    /// Push the caller's address; `target` is only used to report overflow.
    pub fn push(&mut self, addr: u16, target: u16) -> Result<(), MachineError> {
        let slot = self
            .frames
            .get_mut(self.sp)
            .ok_or(MachineError::StackOverflow { target })?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, MachineError> {
        if self.sp == 0 {
            return Err(MachineError::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.frames[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }

    pub fn frames(&self) -> &[u16] {
        &self.frames[..self.sp]
    }
}

impl Default for CallStack {
    fn default() -> CallStack {
        CallStack::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut s = CallStack::new();
        s.push(0x200, 0x300).unwrap();
        s.push(0x302, 0x400).unwrap();
        assert_eq!(s.frames(), &[0x200, 0x302]);
        assert_eq!(s.pop(), Ok(0x302));
        assert_eq!(s.pop(), Ok(0x200));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn test_overflow_on_seventeenth_push() {
        let mut s = CallStack::new();
        for n in 0..STACK_DEPTH as u16 {
            s.push(0x200 + n * 2, 0x200).unwrap();
        }
        assert_eq!(
            s.push(0x220, 0x200),
            Err(MachineError::StackOverflow { target: 0x200 })
        );
        assert_eq!(s.depth(), STACK_DEPTH);
    }

    #[test]
    fn test_underflow() {
        let mut s = CallStack::new();
        assert_eq!(s.pop(), Err(MachineError::StackUnderflow));
    }
}
