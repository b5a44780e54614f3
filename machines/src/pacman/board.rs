//! Pac-Man board: memory map and I/O register file.
//!
//! The CPU sees one 64KB address space routed through an ordered region
//! list; the first matching region wins. The I/O page overlaps the two
//! video planes, so memory accesses only reach the register file above
//! 0x57FF, while Z80 `IN`/`OUT` instructions always address it directly
//! by the low address byte.

use marquee_core::core::Bus;

/// Program store, four 4KB chips.
pub const ROM_SIZE: usize = 0x4000;
/// Work store; the last 16 bytes are the sprite attribute table.
pub const WORK_SIZE: usize = 0x1000;
/// One tile plane (index or attribute).
pub const PLANE_SIZE: usize = 0x400;

/// Sprite attribute table offset within the work store (0x4FF0).
pub const SPRITE_TABLE: usize = 0xFF0;

// I/O register offsets, write side.
pub const PORT_IRQ_ENABLE: u8 = 0x00;
pub const PORT_SOUND_ENABLE: u8 = 0x01;
pub const PORT_FLIP_SCREEN: u8 = 0x03;
pub const PORT_LAMP1: u8 = 0x04;
pub const PORT_LAMP2: u8 = 0x05;
pub const PORT_COIN_LOCKOUT: u8 = 0x06;
pub const PORT_COIN_COUNTER: u8 = 0x07;
pub const PORT_SOUND_BASE: u8 = 0x40;
pub const PORT_SPRITE_BASE: u8 = 0x60;
pub const PORT_WATCHDOG: u8 = 0xC0;

// I/O register offsets, read side. 0xC0 is DSW2 on reads and the
// watchdog strobe on writes; the two never share storage.
pub const PORT_IN0: u8 = 0x00;
pub const PORT_IN1: u8 = 0x40;
pub const PORT_DSW1: u8 = 0x80;
pub const PORT_DSW2: u8 = 0xC0;

#[derive(Clone, Copy)]
enum Region {
    Rom,
    TileIndex,
    TileAttr,
    Work,
    Io,
}

/// Ordered routing table; the first range containing the address wins.
/// The video planes shadow the low half of the I/O page.
const REGIONS: [(u16, u16, Region); 5] = [
    (0x0000, 0x3FFF, Region::Rom),
    (0x5000, 0x53FF, Region::TileIndex),
    (0x5400, 0x57FF, Region::TileAttr),
    (0x4000, 0x4FFF, Region::Work),
    (0x5000, 0x5FFF, Region::Io),
];

fn route(addr: u16) -> Option<Region> {
    REGIONS
        .iter()
        .find(|&&(start, end, _)| addr >= start && addr <= end)
        .map(|&(_, _, region)| region)
}

/// The board the CPU is socketed into: ROM, RAM, video planes, pattern
/// tables, palette, and the 256-entry I/O register file.
pub struct Board {
    pub(super) rom: Box<[u8; ROM_SIZE]>,
    pub(super) work: Box<[u8; WORK_SIZE]>,
    pub(super) tile_index: [u8; PLANE_SIZE],
    pub(super) tile_attr: [u8; PLANE_SIZE],

    // Decoded graphics assets (see `roms`): 256 glyphs x 8 row bytes,
    // 64 sprite entries x 16 bytes, 256 RGB palette entries.
    pub(super) charset: Box<[u8; 256 * 8]>,
    pub(super) sprite_patterns: Box<[u8; 64 * 16]>,
    pub(super) palette: [(u8, u8, u8); 256],

    // I/O register file. Named registers live beside the generic array;
    // reads and writes at one offset may address different hardware.
    pub(super) ports: [u8; 256],
    pub(super) irq_enabled: bool,
    pub(super) sound_enabled: bool,
    pub(super) flip_screen: bool,
    pub(super) lamp1: bool,
    pub(super) lamp2: bool,
    pub(super) coin_lockout: bool,
    pub(super) coin_counter: bool,
    pub(super) watchdog: u32,

    // Input snapshots, active-low (0xFF = everything released).
    pub(super) in0: u8,
    pub(super) in1: u8,
    pub(super) dsw1: u8,
    pub(super) dsw2: u8,
}

impl Board {
    pub fn new() -> Self {
        let mut board = Self {
            rom: Box::new([0xFF; ROM_SIZE]),
            work: Box::new([0; WORK_SIZE]),
            tile_index: [0; PLANE_SIZE],
            tile_attr: [0; PLANE_SIZE],
            charset: Box::new([0; 256 * 8]),
            sprite_patterns: Box::new([0; 64 * 16]),
            palette: [(0, 0, 0); 256],
            ports: [0; 256],
            irq_enabled: false,
            sound_enabled: false,
            flip_screen: false,
            lamp1: false,
            lamp2: false,
            coin_lockout: false,
            coin_counter: false,
            watchdog: 0,
            in0: 0xFF,
            in1: 0xFF,
            // 1 coin/1 credit, 3 lives, 10000 bonus, normal difficulty
            dsw1: 0xC9,
            dsw2: 0xFF,
        };
        super::roms::install_placeholders(&mut board);
        board
    }

    /// Clear volatile state; ROM, pattern tables, and palette survive.
    pub fn reset(&mut self) {
        self.work.fill(0);
        self.tile_index.fill(0);
        self.tile_attr.fill(0);
        self.ports.fill(0);
        self.irq_enabled = false;
        self.sound_enabled = false;
        self.flip_screen = false;
        self.lamp1 = false;
        self.lamp2 = false;
        self.coin_lockout = false;
        self.coin_counter = false;
        self.watchdog = 0;
        self.in0 = 0xFF;
        self.in1 = 0xFF;
    }

    fn io_read_port(&self, port: u8) -> u8 {
        match port {
            PORT_IN0 => self.in0,
            PORT_IN1 => self.in1,
            PORT_DSW1 => self.dsw1,
            PORT_DSW2 => self.dsw2,
            _ => self.ports[port as usize],
        }
    }

    fn io_write_port(&mut self, port: u8, data: u8) {
        match port {
            PORT_IRQ_ENABLE => self.irq_enabled = data & 1 != 0,
            PORT_SOUND_ENABLE => self.sound_enabled = data & 1 != 0,
            PORT_FLIP_SCREEN => self.flip_screen = data & 1 != 0,
            PORT_LAMP1 => self.lamp1 = data & 1 != 0,
            PORT_LAMP2 => self.lamp2 = data & 1 != 0,
            PORT_COIN_LOCKOUT => self.coin_lockout = data & 1 != 0,
            PORT_COIN_COUNTER => self.coin_counter = data & 1 != 0,
            PORT_WATCHDOG => {
                self.watchdog = 0;
                return;
            }
            // 0x40-0x5F sound voices and 0x60-0x6F sprite coordinates
            // are stored only; the rasterizer reads the latter back.
            _ => {}
        }
        self.ports[port as usize] = data;
    }

    /// Interrupt-enable latch (write offset 0x00).
    pub fn irq_enabled(&self) -> bool {
        self.irq_enabled
    }

    /// Sound-enable latch (write offset 0x01). Voices are latched but not
    /// synthesized, so this only gates what a mixer would read.
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn flip_screen(&self) -> bool {
        self.flip_screen
    }

    pub fn lamps(&self) -> (bool, bool) {
        (self.lamp1, self.lamp2)
    }

    pub fn coin_lockout(&self) -> bool {
        self.coin_lockout
    }

    pub fn coin_counter(&self) -> bool {
        self.coin_counter
    }

    /// Frames since the watchdog strobe was last written.
    pub fn watchdog(&self) -> u32 {
        self.watchdog
    }

    /// Bump the watchdog counter; called once per frame by the machine.
    pub fn tick_watchdog(&mut self) {
        self.watchdog = self.watchdog.saturating_add(1);
    }

    pub fn tile(&self, index: usize) -> u8 {
        self.tile_index[index]
    }

    pub fn tile_attr(&self, index: usize) -> u8 {
        self.tile_attr[index]
    }

    /// Sprite attribute pair (glyph/flip byte, color byte).
    pub fn sprite_attrs(&self, sprite: usize) -> (u8, u8) {
        let base = SPRITE_TABLE + sprite * 2;
        (self.work[base], self.work[base + 1])
    }

    /// Sprite coordinate pair from the I/O register file.
    pub fn sprite_coords(&self, sprite: usize) -> (u8, u8) {
        let base = PORT_SPRITE_BASE as usize + sprite * 2;
        (self.ports[base], self.ports[base + 1])
    }

    /// Decoded RGB palette entry.
    pub fn palette_entry(&self, index: usize) -> (u8, u8, u8) {
        self.palette[index]
    }

    pub fn set_dsw1(&mut self, value: u8) {
        self.dsw1 = value;
    }

    pub fn set_dsw2(&mut self, value: u8) {
        self.dsw2 = value;
    }

    /// Latch or release an IN0 bit (active-low).
    pub fn set_in0_bit(&mut self, bit: u8, pressed: bool) {
        set_bit_active_low(&mut self.in0, bit, pressed);
    }

    /// Latch or release an IN1 bit (active-low).
    pub fn set_in1_bit(&mut self, bit: u8, pressed: bool) {
        set_bit_active_low(&mut self.in1, bit, pressed);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Board {
    fn read(&mut self, addr: u16) -> u8 {
        match route(addr) {
            Some(Region::Rom) => self.rom[addr as usize],
            Some(Region::TileIndex) => self.tile_index[(addr - 0x5000) as usize],
            Some(Region::TileAttr) => self.tile_attr[(addr - 0x5400) as usize],
            Some(Region::Work) => self.work[(addr - 0x4000) as usize],
            Some(Region::Io) => self.io_read_port(addr as u8),
            None => 0xFF, // open bus
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        match route(addr) {
            Some(Region::Rom) | None => {} // dropped
            Some(Region::TileIndex) => self.tile_index[(addr - 0x5000) as usize] = data,
            Some(Region::TileAttr) => self.tile_attr[(addr - 0x5400) as usize] = data,
            Some(Region::Work) => self.work[(addr - 0x4000) as usize] = data,
            Some(Region::Io) => self.io_write_port(addr as u8, data),
        }
    }

    fn io_read(&mut self, port: u8) -> u8 {
        self.io_read_port(port)
    }

    fn io_write(&mut self, port: u8, data: u8) {
        self.io_write_port(port, data);
    }

    /// Only the program store holds executable code.
    fn valid_jump_target(&self, addr: u16) -> bool {
        (addr as usize) < ROM_SIZE
    }
}

/// Active-low bit manipulation: clear bit on press, set bit on release.
fn set_bit_active_low(reg: &mut u8, bit: u8, pressed: bool) {
    if pressed {
        *reg &= !(1 << bit);
    } else {
        *reg |= 1 << bit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_planes_shadow_io_page() {
        let mut board = Board::new();
        board.write(0x5000, 0x42);
        assert_eq!(board.tile(0), 0x42);
        assert!(
            !board.irq_enabled(),
            "memory write to 0x5000 lands in the tile plane, not the latch"
        );
        board.io_write(PORT_IRQ_ENABLE, 1);
        assert!(board.irq_enabled(), "port write reaches the latch directly");
    }

    #[test]
    fn io_page_reachable_above_planes() {
        let mut board = Board::new();
        // 0x58C0 falls past both planes; low byte 0xC0 is the watchdog.
        board.watchdog = 7;
        board.write(0x58C0, 0);
        assert_eq!(board.watchdog(), 0);
    }

    #[test]
    fn sound_enable_latch_reads_back() {
        let mut board = Board::new();
        assert!(!board.sound_enabled());
        board.io_write(PORT_SOUND_ENABLE, 1);
        assert!(board.sound_enabled());
        // Only bit 0 counts.
        board.io_write(PORT_SOUND_ENABLE, 0xFE);
        assert!(!board.sound_enabled());
    }

    #[test]
    fn watchdog_write_does_not_disturb_dsw2_read() {
        let mut board = Board::new();
        board.set_dsw2(0x5A);
        board.io_write(PORT_WATCHDOG, 0xFF);
        assert_eq!(board.io_read(PORT_DSW2), 0x5A);
    }
}
