pub mod display;
pub mod error;
pub mod keypad;
pub mod memory;
pub mod opcode;
mod ops;
pub mod quirks;
pub mod registers;
pub mod stack;
pub mod timers;

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use log::{info, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

use self::{
    display::Framebuffer,
    error::{MachineError, RomError},
    keypad::Keypad,
    memory::Memory,
    opcode::Opcode,
    ops::Flow,
    quirks::Quirks,
    registers::Registers,
    stack::CallStack,
    timers::Timers,
};

/// The whole machine. Every opcode handler gets exclusive access to this and
/// nothing else, so there is no state outside of it.
pub struct Interpreter {
    pub(crate) memory: Memory,
    pub(crate) registers: Registers,
    pub(crate) stack: CallStack,
    pub(crate) display: Framebuffer,
    pub(crate) timers: Timers,
    pub(crate) keypad: Keypad,
    pub(crate) quirks: Quirks,
    rng: StdRng,
    rom_loaded: bool,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter::build(Quirks::default(), StdRng::from_entropy())
    }

    pub fn with_quirks(quirks: Quirks) -> Interpreter {
        Interpreter::build(quirks, StdRng::from_entropy())
    }

    /// Deterministic CXNN results, for tests and replays.
    pub fn with_seed(quirks: Quirks, seed: u64) -> Interpreter {
        Interpreter::build(quirks, StdRng::seed_from_u64(seed))
    }

    fn build(quirks: Quirks, rng: StdRng) -> Interpreter {
        Interpreter {
            memory: Memory::new(),
            registers: Registers::new(),
            stack: CallStack::new(),
            display: Framebuffer::new(),
            timers: Timers::default(),
            keypad: Keypad::default(),
            quirks,
            rng,
            rom_loaded: false,
        }
    }

    /// Power-on state: zeroed RAM with the font at 0, PC at 0x200, everything
    /// else cleared. The loaded program is gone afterwards.
    pub fn initialize(&mut self) {
        self.memory.reset();
        self.registers.reset();
        self.stack.reset();
        self.display.reset();
        self.timers = Timers::default();
        self.keypad.reset();
        self.rom_loaded = false;
        info!("RESET");
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), RomError> {
        self.memory.load_program(rom)?;
        self.rom_loaded = true;
        info!("LOADED ROM, SIZE: {}", rom.len());
        Ok(())
    }

    /// Read a ROM from disk and load it. The file is closed before this
    /// returns, whatever the outcome.
    pub fn load_rom_file(&mut self, path: impl AsRef<Path>) -> Result<(), RomError> {
        let path = path.as_ref();
        let rom = {
            let mut file = File::open(path).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => RomError::NotFound(path.to_path_buf()),
                _ => RomError::Read(e),
            })?;
            let mut rom = Vec::new();
            file.read_to_end(&mut rom)?;
            rom
        };
        info!("READ ROM {}", path.display());
        self.load_rom(&rom)
    }

    /// One fetch/decode/execute followed by one timer tick. Returns whether
    /// the framebuffer changed.
    pub fn step(&mut self) -> Result<bool, MachineError> {
        let redraw = self.cycle()?;
        self.tick_timers();
        Ok(redraw)
    }

    /// One fetch/decode/execute without touching the timers, for hosts that
    /// tick them on their own clock.
    ///
    /// A faulting instruction leaves the machine as it was before the fetch.
    pub fn cycle(&mut self) -> Result<bool, MachineError> {
        if !self.rom_loaded {
            return Err(MachineError::NoProgram);
        }

        let pc = self.registers.pc;
        let opcode = Opcode(self.memory.read_word(pc as usize)?);
        trace!("FETCH {:?}, PC = {:#05X}", opcode, pc);

        self.registers.pc = match ops::execute(self, opcode)? {
            Flow::Next => pc.wrapping_add(2),
            Flow::Skip => pc.wrapping_add(4),
            Flow::Jump(addr) => addr,
            Flow::Wait => pc,
        };
        Ok(self.display.take_redraw())
    }

    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<(), MachineError> {
        self.keypad.set(key, pressed)
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.display
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    pub fn buzzer_active(&self) -> bool {
        self.timers.buzzer_active()
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn is_rom_loaded(&self) -> bool {
        self.rom_loaded
    }

    pub(crate) fn random_byte(&mut self) -> u8 {
        self.rng.gen()
    }
}

impl Default for Interpreter {
    fn default() -> Interpreter {
        Interpreter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(program: &[u8]) -> Interpreter {
        let mut vm = Interpreter::with_seed(Quirks::default(), 8);
        vm.load_rom(program).unwrap();
        vm
    }

    #[test]
    fn test_step_before_load() {
        let mut vm = Interpreter::new();
        assert_eq!(vm.step(), Err(MachineError::NoProgram));
        assert_eq!(vm.registers().pc, 0x200);
    }

    #[test]
    fn test_failed_load_leaves_machine_unloaded() {
        let mut vm = Interpreter::new();
        assert!(vm.load_rom(&[0; 3585]).is_err());
        assert!(!vm.is_rom_loaded());
        assert_eq!(vm.step(), Err(MachineError::NoProgram));
    }

    #[test]
    fn test_initialize_unloads_program() {
        let mut vm = run(&[0x60, 0x42]);
        vm.step().unwrap();
        vm.set_key(3, true).unwrap();
        vm.initialize();
        assert!(!vm.is_rom_loaded());
        assert_eq!(vm.registers(), &Registers::new());
        assert_eq!(vm.memory().read(0x200), Ok(0));
        assert_eq!(vm.keypad().first_pressed(), None);
    }

    #[test]
    fn test_cycle_leaves_timers_alone() {
        // V2 = 5, delay = V2, then spin on 0x204
        let mut vm = run(&[0x62, 0x05, 0xF2, 0x15, 0x12, 0x04]);
        vm.cycle().unwrap();
        vm.cycle().unwrap();
        vm.cycle().unwrap();
        assert_eq!(vm.delay_timer(), 5);
        vm.tick_timers();
        assert_eq!(vm.delay_timer(), 4);
    }

    #[test]
    fn test_fetch_past_end_of_memory() {
        let mut vm = run(&[0x1F, 0xFF]); // jump to 0xFFF
        vm.step().unwrap();
        assert_eq!(vm.step(), Err(MachineError::OutOfBounds { address: 0x1000 }));
        assert_eq!(vm.registers().pc, 0xFFF);
    }

    #[test]
    fn test_load_missing_file() {
        let mut vm = Interpreter::new();
        let err = vm.load_rom_file("does/not/exist.ch8").unwrap_err();
        assert!(matches!(err, RomError::NotFound(_)));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join("chip8_vm_load_file_test.ch8");
        std::fs::write(&path, [0x00, 0xE0]).unwrap();
        let mut vm = Interpreter::new();
        vm.load_rom_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(vm.memory().read_word(0x200), Ok(0x00E0));
        assert_eq!(vm.step(), Ok(true));
    }
}
