//! A CHIP-8 interpreter core.
//!
//! The core owns memory, registers, the call stack, timers, the framebuffer and
//! the key state. A host drives it by loading a ROM and calling
//! [`Interpreter::step`] at whatever cadence it likes, reading the framebuffer
//! back whenever a step reports a redraw.

pub mod interpreter;

pub use interpreter::{
    display::{Framebuffer, HEIGHT, WIDTH},
    error::{MachineError, RomError},
    quirks::Quirks,
    Interpreter,
};
