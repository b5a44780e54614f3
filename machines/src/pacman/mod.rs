//! Pac-Man arcade machine (Namco/Midway, 1980).
//!
//! Z80 @ 3.072 MHz, 16KB program store, a 28x36 tile playfield with eight
//! 16x16 sprites, and a single periodic interrupt raised at each frame
//! boundary. Sound registers are latched but never synthesized.

pub mod board;
pub mod roms;
mod video;

pub use board::Board;
pub use video::{SCREEN_HEIGHT, SCREEN_WIDTH};

use marquee_core::core::machine::{InputButton, Machine};
use marquee_core::core::IrqController;
use marquee_core::cpu::Z80;

use crate::registry::MachineEntry;
use crate::rom_loader::{RomLoadError, RomSet};

/// CPU cycles per video frame: 3,072,000 Hz / 60 Hz.
pub const FRAME_CYCLES: u32 = 51_200;

// ---------------------------------------------------------------------------
// Input button IDs
// ---------------------------------------------------------------------------
pub const INPUT_P1_UP: u8 = 0;
pub const INPUT_P1_LEFT: u8 = 1;
pub const INPUT_P1_RIGHT: u8 = 2;
pub const INPUT_P1_DOWN: u8 = 3;
pub const INPUT_COIN: u8 = 4;
pub const INPUT_P1_START: u8 = 5;
pub const INPUT_P2_START: u8 = 6;
pub const INPUT_P2_UP: u8 = 7;
pub const INPUT_P2_LEFT: u8 = 8;
pub const INPUT_P2_RIGHT: u8 = 9;
pub const INPUT_P2_DOWN: u8 = 10;

#[rustfmt::skip]
const PACMAN_INPUT_MAP: &[InputButton] = &[
    InputButton { id: INPUT_P1_UP, name: "P1 Up" },
    InputButton { id: INPUT_P1_LEFT, name: "P1 Left" },
    InputButton { id: INPUT_P1_RIGHT, name: "P1 Right" },
    InputButton { id: INPUT_P1_DOWN, name: "P1 Down" },
    InputButton { id: INPUT_COIN, name: "Coin" },
    InputButton { id: INPUT_P1_START, name: "P1 Start" },
    InputButton { id: INPUT_P2_START, name: "P2 Start" },
    InputButton { id: INPUT_P2_UP, name: "P2 Up" },
    InputButton { id: INPUT_P2_LEFT, name: "P2 Left" },
    InputButton { id: INPUT_P2_RIGHT, name: "P2 Right" },
    InputButton { id: INPUT_P2_DOWN, name: "P2 Down" },
];

/// The complete machine: CPU, interrupt controller, and board.
pub struct PacmanSystem {
    cpu: Z80,
    irq: IrqController,
    board: Board,
}

impl PacmanSystem {
    /// Build the machine from a loaded ROM set.
    pub fn from_rom_set(rom_set: &RomSet) -> Result<Self, RomLoadError> {
        let mut board = Board::new();
        roms::load_into(&mut board, rom_set)?;
        Ok(Self {
            cpu: Z80::new(),
            irq: IrqController::new(),
            board,
        })
    }

    /// Build the machine around the built-in synthetic program; needs no
    /// assets on disk and renders with the placeholder glyph set.
    pub fn test_program() -> Self {
        let mut board = Board::new();
        board.rom.copy_from_slice(&build_test_program());
        Self {
            cpu: Z80::new(),
            irq: IrqController::new(),
            board,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn cpu(&self) -> &Z80 {
        &self.cpu
    }
}

impl Machine for PacmanSystem {
    fn display_size(&self) -> (u32, u32) {
        (SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32)
    }

    fn run_frame(&mut self) {
        self.cpu
            .run_frame(&mut self.board, &mut self.irq, FRAME_CYCLES);
        self.board.tick_watchdog();
    }

    fn render_frame(&self, buffer: &mut [u8]) {
        self.board.render(buffer);
    }

    fn set_input(&mut self, button: u8, pressed: bool) {
        match button {
            // IN0: joystick bits 0-3, starts 5-6, coin 7 (active-low)
            INPUT_P1_UP => self.board.set_in0_bit(0, pressed),
            INPUT_P1_LEFT => self.board.set_in0_bit(1, pressed),
            INPUT_P1_RIGHT => self.board.set_in0_bit(2, pressed),
            INPUT_P1_DOWN => self.board.set_in0_bit(3, pressed),
            INPUT_P1_START => self.board.set_in0_bit(5, pressed),
            INPUT_P2_START => self.board.set_in0_bit(6, pressed),
            INPUT_COIN => self.board.set_in0_bit(7, pressed),

            // IN1: second joystick bits 0-3 (active-low)
            INPUT_P2_UP => self.board.set_in1_bit(0, pressed),
            INPUT_P2_LEFT => self.board.set_in1_bit(1, pressed),
            INPUT_P2_RIGHT => self.board.set_in1_bit(2, pressed),
            INPUT_P2_DOWN => self.board.set_in1_bit(3, pressed),

            _ => {}
        }
    }

    fn input_map(&self) -> &[InputButton] {
        PACMAN_INPUT_MAP
    }

    fn reset(&mut self) {
        self.cpu.reset();
        self.irq.clear();
        self.board.reset();
    }
}

fn create(rom_set: &RomSet) -> Result<Box<dyn Machine>, RomLoadError> {
    Ok(Box::new(PacmanSystem::from_rom_set(rom_set)?))
}

inventory::submit! {
    MachineEntry::new("pacman", "pacman", create)
}

/// Hand-assembled 16KB program image for running without assets.
///
/// Sets up a stack in work RAM, writes a greeting into the tile planes
/// using the placeholder letter glyphs, then enables interrupts and
/// sleeps; the frame-boundary interrupt bumps A once per frame and the
/// main loop re-enters HALT.
fn build_test_program() -> [u8; board::ROM_SIZE] {
    let mut rom = [0xFF; board::ROM_SIZE];

    // Placeholder glyph numbers: H=1 E=2 L=3 O=4 W=5 R=6 D=7, blank=0.
    const MESSAGE: [u8; 11] = [1, 2, 3, 3, 4, 0, 5, 4, 6, 3, 7];
    const ROW: u16 = 17;
    const FIRST_COL: u16 = 8;
    const COLOR: u8 = 0x06;

    fn emit(rom: &mut [u8; board::ROM_SIZE], p: &mut usize, bytes: &[u8]) {
        rom[*p..*p + bytes.len()].copy_from_slice(bytes);
        *p += bytes.len();
    }

    let mut p = 0usize;
    emit(&mut rom, &mut p, &[0xF3]); // DI
    emit(&mut rom, &mut p, &[0x31, 0xF0, 0x4F]); // LD SP,4FF0h
    emit(&mut rom, &mut p, &[0xC3, 0x40, 0x00]); // JP 0040h

    // Frame interrupt handler at 0038h: count frames in A.
    rom[0x0038] = 0x3C; // INC A
    rom[0x0039] = 0xFB; // EI
    rom[0x003A] = 0xC9; // RET

    p = 0x0040;
    for (i, &glyph) in MESSAGE.iter().enumerate() {
        let index = ROW * 32 + FIRST_COL + i as u16;
        let tile_addr = 0x5000 + index;
        let attr_addr = 0x5400 + index;
        emit(&mut rom, &mut p, &[0x3E, glyph]); // LD A,glyph
        emit(
            &mut rom,
            &mut p,
            &[0x32, tile_addr as u8, (tile_addr >> 8) as u8], // LD (tile),A
        );
        emit(&mut rom, &mut p, &[0x3E, COLOR]); // LD A,color
        emit(
            &mut rom,
            &mut p,
            &[0x32, attr_addr as u8, (attr_addr >> 8) as u8], // LD (attr),A
        );
    }

    emit(&mut rom, &mut p, &[0x3E, 0x01]); // LD A,1
    emit(&mut rom, &mut p, &[0x32, 0x00, 0x58]); // LD (5800h),A  ; irq-enable latch
    emit(&mut rom, &mut p, &[0xAF]); // XOR A         ; frame counter
    emit(&mut rom, &mut p, &[0xED, 0x56]); // IM 1
    emit(&mut rom, &mut p, &[0xFB]); // EI
    emit(&mut rom, &mut p, &[0x76]); // HALT
    emit(&mut rom, &mut p, &[0x18, 0xFD]); // JR -3         ; back onto the HALT

    rom
}
