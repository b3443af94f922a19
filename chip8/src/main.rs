use std::path::PathBuf;

use clap::Parser;

mod keymap;
mod run;

#[derive(Debug, Parser)]
#[command(version, about = "A CHIP-8 virtual machine")]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Size multiplier for each logical pixel
    #[arg(short, long, default_value_t = 10)]
    scale: usize,

    /// CPU cycles executed per rendered frame
    #[arg(short, long, default_value_t = 7)]
    cycles_per_frame: u32,

    /// Halt on unknown opcodes instead of skipping them
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    run::run(&args.rom, args.scale, args.cycles_per_frame, args.strict)
}
