use marquee_core::core::machine::Machine;
use marquee_core::core::Bus;
use marquee_machines::pacman::{board, PacmanSystem, SCREEN_HEIGHT, SCREEN_WIDTH};
use marquee_machines::rom_loader::RomSet;

fn monolithic_machine(program: &[u8]) -> PacmanSystem {
    let rom_set = RomSet::from_slices(&[("pacman.rom", program)]);
    PacmanSystem::from_rom_set(&rom_set).unwrap()
}

// =================================================================
// Machine trait
// =================================================================

#[test]
fn test_display_size() {
    let sys = PacmanSystem::test_program();
    assert_eq!(sys.display_size(), (224, 288));
}

#[test]
fn test_input_map_has_all_buttons() {
    let sys = PacmanSystem::test_program();
    let map = sys.input_map();
    assert_eq!(map.len(), 11);
    for button in map {
        assert!(!button.name.is_empty());
    }
}

#[test]
fn test_render_frame_correct_size() {
    let sys = PacmanSystem::test_program();
    let (w, h) = sys.display_size();
    let mut buffer = vec![0u8; (w * h * 3) as usize];
    sys.render_frame(&mut buffer); // Should not panic
}

// =================================================================
// Memory map
// =================================================================

#[test]
fn test_rom_is_immutable() {
    let mut sys = monolithic_machine(&[0x00, 0x11, 0x22]);
    let board = sys.board_mut();
    board.write(0x0001, 0x99);
    assert_eq!(board.read(0x0001), 0x11);
}

#[test]
fn test_work_ram_round_trip() {
    let mut sys = PacmanSystem::test_program();
    let board = sys.board_mut();
    board.write(0x4000, 0x12);
    board.write(0x4FFF, 0x34);
    assert_eq!(board.read(0x4000), 0x12);
    assert_eq!(board.read(0x4FFF), 0x34);
}

#[test]
fn test_video_planes_round_trip() {
    let mut sys = PacmanSystem::test_program();
    let board = sys.board_mut();
    board.write(0x5000, 0x0A);
    board.write(0x53FF, 0x0B);
    board.write(0x5400, 0x0C);
    board.write(0x57FF, 0x0D);
    assert_eq!(board.read(0x5000), 0x0A);
    assert_eq!(board.read(0x53FF), 0x0B);
    assert_eq!(board.read(0x5400), 0x0C);
    assert_eq!(board.read(0x57FF), 0x0D);
}

#[test]
fn test_unmapped_reads_open_bus() {
    let mut sys = PacmanSystem::test_program();
    let board = sys.board_mut();
    assert_eq!(board.read(0x6000), 0xFF);
    assert_eq!(board.read(0xFFFF), 0xFF);
    board.write(0x6000, 0x55); // dropped
    assert_eq!(board.read(0x6000), 0xFF);
}

#[test]
fn test_tile_write_reads_through_accessor() {
    let mut sys = PacmanSystem::test_program();
    let board = sys.board_mut();
    board.write(0x5000 + 5 * 32 + 3, 0x42);
    assert_eq!(board.tile(5 * 32 + 3), 0x42);
}

#[test]
fn test_watchdog_strobe_and_dsw2_split() {
    let mut sys = PacmanSystem::test_program();
    let board = sys.board_mut();
    board.set_dsw2(0xA5);
    board.tick_watchdog();
    board.tick_watchdog();
    assert_eq!(board.watchdog(), 2);
    // Memory write through the I/O page above the video planes.
    board.write(0x58C0, 0x00);
    assert_eq!(board.watchdog(), 0);
    assert_eq!(board.io_read(board::PORT_DSW2), 0xA5, "reads see DSW2");
}

// =================================================================
// End-to-end execution
// =================================================================

#[test]
fn test_di_halt_sleeps_forever() {
    let mut sys = monolithic_machine(&[0xF3, 0x76]); // DI; HALT
    sys.run_frame();
    sys.run_frame();
    assert!(sys.cpu().halted);
    assert_eq!(sys.cpu().pc, 0x0001, "PC parks on the halt opcode");
}

#[test]
fn test_reset_restores_power_on_state() {
    let mut sys = monolithic_machine(&[0xF3, 0x76]);
    sys.board_mut().write(0x4000, 0x77);
    sys.run_frame();
    assert!(sys.cpu().halted);

    sys.reset();
    assert!(!sys.cpu().halted);
    assert_eq!(sys.cpu().pc, 0x0000);
    assert_eq!(sys.board_mut().read(0x4000), 0x00, "work RAM cleared");
    assert_eq!(sys.board_mut().read(0x0000), 0xF3, "ROM survives reset");
}

#[test]
fn test_frame_interrupt_counts_frames() {
    let mut sys = PacmanSystem::test_program();
    // Frame 1 runs the setup and halts; each frame boundary then wakes
    // the handler, which bumps A during the following frame.
    sys.run_frame();
    sys.run_frame();
    sys.run_frame();
    assert_eq!(sys.cpu().a, 2);
    assert_eq!(sys.cpu().pc, 0x0038, "the boundary interrupt just fired");
}

#[test]
fn test_test_program_arms_irq_latch() {
    let mut sys = PacmanSystem::test_program();
    sys.run_frame();
    assert!(sys.board().irq_enabled(), "setup wrote the enable latch");
}

#[test]
fn test_test_program_renders_greeting() {
    let mut sys = PacmanSystem::test_program();
    sys.run_frame();

    let mut buffer = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
    sys.render_frame(&mut buffer);

    // First letter lands at tile (8, 17); the H glyph's top row is
    // 0xC3, so the tile's leftmost pixel is lit and the third is not.
    let pixel = |x: usize, y: usize| {
        let off = (y * SCREEN_WIDTH + x) * 3;
        (buffer[off], buffer[off + 1], buffer[off + 2])
    };
    let lit = sys.board().palette_entry(0x06);
    assert_eq!(pixel(8 * 8, 17 * 8), lit);
    assert_eq!(pixel(8 * 8 + 2, 17 * 8), (0, 0, 0));
}

#[test]
fn test_input_latches_active_low() {
    let mut sys = PacmanSystem::test_program();
    let before = sys.board_mut().io_read(board::PORT_IN0);
    assert_eq!(before, 0xFF, "all released at power-on");

    sys.set_input(marquee_machines::pacman::INPUT_P1_LEFT, true);
    assert_eq!(sys.board_mut().io_read(board::PORT_IN0), 0xFD);

    sys.set_input(marquee_machines::pacman::INPUT_P1_LEFT, false);
    assert_eq!(sys.board_mut().io_read(board::PORT_IN0), 0xFF);
}

// =================================================================
// Asset loading
// =================================================================

#[test]
fn test_short_program_chunk_padded_with_ff() {
    let chunk = vec![0x00u8; 0x800]; // half a chip
    let full = vec![0x00u8; 0x1000];
    let rom_set = RomSet::from_slices(&[
        ("pacman.6e", &chunk),
        ("pacman.6f", &full),
        ("pacman.6h", &full),
        ("pacman.6j", &full),
    ]);
    let mut sys = PacmanSystem::from_rom_set(&rom_set).unwrap();
    let board = sys.board_mut();
    assert_eq!(board.read(0x07FF), 0x00);
    assert_eq!(board.read(0x0800), 0xFF, "padding starts where the file ends");
}

#[test]
fn test_missing_program_chunk_fails() {
    let full = vec![0x00u8; 0x1000];
    let rom_set = RomSet::from_slices(&[("pacman.6e", &full), ("pacman.6f", &full)]);
    assert!(PacmanSystem::from_rom_set(&rom_set).is_err());
}

#[test]
fn test_palette_prom_decodes_red_weight() {
    let mut prom = vec![0u8; 32];
    prom[1] = 0x01;
    let chunk = vec![0x76u8; 0x1000];
    let rom_set = RomSet::from_slices(&[
        ("pacman.6e", &chunk),
        ("pacman.6f", &chunk),
        ("pacman.6h", &chunk),
        ("pacman.6j", &chunk),
        ("82s123.7f", &prom),
    ]);
    let sys = PacmanSystem::from_rom_set(&rom_set).unwrap();
    assert_eq!(sys.board().palette_entry(1), (0x21, 0, 0));
}

#[test]
fn test_missing_gfx_keeps_placeholders() {
    let chunk = vec![0x76u8; 0x1000];
    let rom_set = RomSet::from_slices(&[
        ("pacman.6e", &chunk),
        ("pacman.6f", &chunk),
        ("pacman.6h", &chunk),
        ("pacman.6j", &chunk),
    ]);
    let sys = PacmanSystem::from_rom_set(&rom_set).unwrap();
    // Placeholder palette entry 7 is white.
    assert_eq!(sys.board().palette_entry(7), (0xFF, 0xFF, 0xFF));
}
