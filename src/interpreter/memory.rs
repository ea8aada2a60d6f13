use super::error::{MachineError, RomError};

/// How much RAM we have.
pub const MEMORY_SIZE: usize = 4096;

/// Where programs are loaded and where the program counter starts.
pub const PROGRAM_START: u16 = 0x200;

/// Largest ROM that fits between `PROGRAM_START` and the top of RAM.
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Bytes per font glyph; FX29 multiplies by this.
pub const GLYPH_SIZE: u16 = 5;

pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Flat 4K address space.
///
/// 0x000-0x04F  font glyphs 0-F, read only once initialised
/// 0x050-0x1FF  unused (the interpreter lived here on the COSMAC VIP)
/// 0x200-0xFFF  program and work RAM
///
/// Every access is bounds checked; addresses derived from `I` can run past the
/// end of RAM and those surface as [`MachineError::OutOfBounds`].
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    pub fn new() -> Memory {
        let mut memory = Memory {
            bytes: Box::new([0; MEMORY_SIZE]),
        };
        memory.reset();
        memory
    }

    /// Zero everything and bake the font back in at address 0.
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        self.bytes[..FONT.len()].copy_from_slice(&FONT);
    }

    /// Copy a program to `PROGRAM_START`.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), RomError> {
        if program.len() > MAX_ROM_SIZE {
            return Err(RomError::TooLarge {
                size: program.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn read(&self, addr: usize) -> Result<u8, MachineError> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(MachineError::OutOfBounds { address: addr })
    }

    /// Big-endian two-byte word at `addr`.
    pub fn read_word(&self, addr: usize) -> Result<u16, MachineError> {
        let hi = self.read(addr)?;
        let lo = self.read(addr + 1)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8], MachineError> {
        let end = Self::end_of(addr, len)?;
        Ok(&self.bytes[addr..end])
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<(), MachineError> {
        self.slice_mut(addr, 1)?[0] = value;
        Ok(())
    }

    /// Writable window of RAM. Rejects anything overlapping the font.
    pub fn slice_mut(&mut self, addr: usize, len: usize) -> Result<&mut [u8], MachineError> {
        let end = Self::end_of(addr, len)?;
        if len > 0 && addr < FONT.len() {
            return Err(MachineError::ReservedWrite { address: addr });
        }
        Ok(&mut self.bytes[addr..end])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    fn end_of(addr: usize, len: usize) -> Result<usize, MachineError> {
        match addr.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(end),
            _ => Err(MachineError::OutOfBounds {
                address: addr.saturating_add(len).saturating_sub(1).max(addr),
            }),
        }
    }
}

impl Default for Memory {
    fn default() -> Memory {
        Memory::new()
    }
}
