use clap::Parser;
use marquee_core::core::machine::Machine;
use marquee_machines::registry;
use marquee_machines::PacmanSystem;

mod emulator;
mod input;
mod rom_path;

/// SDL presentation shell for the Pac-Man board emulation.
#[derive(Parser)]
#[command(name = "marquee")]
struct Args {
    /// ROM directory, ZIP archive, or single program image.
    rom_path: Option<String>,

    /// Run the built-in test program; needs no ROM files.
    #[arg(long)]
    test: bool,

    /// Integer window scale factor.
    #[arg(long, default_value_t = 3)]
    scale: u32,
}

fn main() {
    let args = Args::parse();

    let mut machine: Box<dyn Machine> = if args.test {
        Box::new(PacmanSystem::test_program())
    } else {
        let rom_path = args.rom_path.unwrap_or_else(|| {
            eprintln!("A ROM path is required unless --test is given");
            std::process::exit(2);
        });

        let entry = registry::find("pacman").unwrap_or_else(|| {
            eprintln!(
                "machine 'pacman' is not registered; known machines: {}",
                registry::names().join(", ")
            );
            std::process::exit(1);
        });
        let rom_set = rom_path::load_rom_set(entry.rom_name, &rom_path).unwrap_or_else(|e| {
            eprintln!("Failed to load ROMs: {e}");
            std::process::exit(1);
        });
        entry.build(&rom_set).unwrap_or_else(|e| {
            eprintln!("Failed to initialize machine: {e}");
            std::process::exit(1);
        })
    };

    let key_map = input::default_key_map(machine.input_map());
    machine.reset();
    if let Err(e) = emulator::run(machine.as_mut(), &key_map, args.scale) {
        eprintln!("display error: {e}");
        std::process::exit(1);
    }
}
