use std::time::Duration;

use chip8_base::{Display, Keys, Pixel};
use chip8_vm::Interpreter;
use log::{debug, error};

/// Drives the interpreter core from the `chip8_base` window loop.
///
/// The window calls `step` at `speed()`; the delay and sound timers are ticked
/// every `cycles_per_tick` of those calls so that they stay near `timer_hz`
/// whatever the clock speed.
pub struct Host {
    vm: Interpreter,
    clock_speed: u64,
    cycles_per_tick: u64,
    cycles: u64,
    buzzing: bool,
    halted: bool,
}

impl Host {
    pub fn new(vm: Interpreter, clock_speed: u64, timer_hz: u64) -> Host {
        let clock_speed = clock_speed.max(1);
        Host {
            vm,
            clock_speed,
            cycles_per_tick: (clock_speed / timer_hz.max(1)).max(1),
            cycles: 0,
            buzzing: false,
            halted: false,
        }
    }

    fn display(&self) -> Display {
        let mut display = [[Pixel::Black; 64]; 32];
        for (y, row) in self.vm.framebuffer().rows().enumerate() {
            for (x, &lit) in row.iter().enumerate() {
                if lit {
                    display[y][x] = Pixel::White;
                }
            }
        }
        display
    }
}

impl chip8_base::Interpreter for Host {
    fn step(&mut self, keys: &Keys) -> Option<Display> {
        if self.halted {
            return None;
        }

        for (key, &pressed) in keys.iter().enumerate() {
            if let Err(e) = self.vm.set_key(key as u8, pressed) {
                error!("KEY {}: {}", key, e);
            }
        }

        let redraw = match self.vm.cycle() {
            Ok(redraw) => redraw,
            Err(e) => {
                error!("HALT at {:#05X}: {}", self.vm.registers().pc, e);
                self.halted = true;
                return None;
            }
        };

        self.cycles += 1;
        if self.cycles % self.cycles_per_tick == 0 {
            self.vm.tick_timers();
        }

        let buzzing = self.vm.buzzer_active();
        if buzzing != self.buzzing {
            debug!("BUZZER {}", if buzzing { "ON" } else { "OFF" });
            self.buzzing = buzzing;
        }

        if redraw {
            Some(self.display())
        } else {
            None
        }
    }

    fn speed(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.clock_speed)
    }

    fn buzzer_active(&self) -> bool {
        !self.halted && self.vm.buzzer_active()
    }
}

