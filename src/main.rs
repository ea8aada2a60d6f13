use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};

use chip8_vm::{Interpreter, Quirks};
use host::Host;

mod host;

const DEFAULT_CLOCK_SPEED: u64 = 700;
const DEFAULT_TIMER_HZ: u64 = 60;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
struct Args {
    #[arg(help = "Path to the ROM file to run")]
    rom: PathBuf,

    #[arg(short, long, default_value_t = DEFAULT_CLOCK_SPEED, help = "Instructions per second")]
    clock_speed: u64,

    #[arg(short, long, default_value_t = DEFAULT_TIMER_HZ, help = "Delay/sound timer rate in Hz")]
    timer_hz: u64,

    #[arg(long, help = "FX55/FX65 advance I past the registers, as on the COSMAC VIP")]
    vip_index_quirk: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let quirks = if args.vip_index_quirk {
        Quirks::cosmac_vip()
    } else {
        Quirks::default()
    };
    let mut interpreter = Interpreter::with_quirks(quirks);

    if let Err(e) = interpreter.load_rom_file(&args.rom) {
        error!("{}", e);
        eprintln!("chip8: {}", e);
        process::exit(1);
    }

    info!("STARTING CHIP-8 at {} Hz", args.clock_speed);
    chip8_base::run(Host::new(interpreter, args.clock_speed, args.timer_hz))
}
