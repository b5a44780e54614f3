//! Pac-Man ROM set definitions and asset decoding.
//!
//! The program store is mandatory; graphics and the palette PROM fall back
//! to deterministic built-in placeholders so the synthetic test program can
//! run without any assets on disk.

use crate::rom_loader::{RomEntry, RomLoadError, RomRegion, RomSet};

use super::board::Board;

/// Program ROM: 16KB at 0x0000-0x3FFF (four 4KB chips, "pacman" set).
pub static PROGRAM_ROM: RomRegion = RomRegion {
    size: 0x4000,
    entries: &[
        RomEntry {
            name: "pacman.6e",
            size: 0x1000,
            offset: 0x0000,
        },
        RomEntry {
            name: "pacman.6f",
            size: 0x1000,
            offset: 0x1000,
        },
        RomEntry {
            name: "pacman.6h",
            size: 0x1000,
            offset: 0x2000,
        },
        RomEntry {
            name: "pacman.6j",
            size: 0x1000,
            offset: 0x3000,
        },
    ],
};

/// Tile pattern ROM filename (4KB, 16 bytes per glyph).
pub const TILE_ROM: &str = "pacman.5e";
/// Sprite pattern ROM filename (4KB, 16 bytes per entry used).
pub const SPRITE_ROM: &str = "pacman.5f";
/// Palette PROM filename (32 bytes).
pub const PALETTE_PROM: &str = "82s123.7f";

/// Resistor-ladder DAC weights for the palette PROM, smallest bit first.
const COLOR_WEIGHTS: [u8; 3] = [0x21, 0x47, 0x97];

/// Load the program store and whatever graphics assets the set carries.
///
/// A missing program chunk aborts with `Err`; missing graphics or palette
/// files keep the placeholders installed by [`Board::new`].
pub fn load_into(board: &mut Board, rom_set: &RomSet) -> Result<(), RomLoadError> {
    let program = load_program(rom_set)?;
    board.rom.copy_from_slice(&program);

    match rom_set.get(TILE_ROM) {
        Some(raw) => transcode_tiles(raw, &mut board.charset[..]),
        None => eprintln!("rom: {TILE_ROM} not found, using placeholder glyphs"),
    }

    match rom_set.get(SPRITE_ROM) {
        Some(raw) => transcode_sprites(raw, &mut board.sprite_patterns[..]),
        None => eprintln!("rom: {SPRITE_ROM} not found, using placeholder sprites"),
    }

    match rom_set.get(PALETTE_PROM) {
        Some(prom) => decode_palette(prom, &mut board.palette),
        None => eprintln!("rom: {PALETTE_PROM} not found, using placeholder palette"),
    }

    Ok(())
}

/// Assemble the 16KB program store: the four-chunk set when present,
/// otherwise a single monolithic image (the only file in the set).
fn load_program(rom_set: &RomSet) -> Result<Vec<u8>, RomLoadError> {
    match PROGRAM_ROM.load(rom_set) {
        Ok(program) => Ok(program),
        Err(RomLoadError::MissingFile(name)) => {
            let names = rom_set.file_names();
            if let [only] = names[..] {
                let data = rom_set.require(only)?;
                if data.len() > PROGRAM_ROM.size {
                    return Err(RomLoadError::Oversized {
                        file: only.to_string(),
                        expected: PROGRAM_ROM.size,
                        actual: data.len(),
                    });
                }
                let mut program = vec![0xFFu8; PROGRAM_ROM.size];
                program[..data.len()].copy_from_slice(data);
                Ok(program)
            } else {
                Err(RomLoadError::MissingFile(name))
            }
        }
        Err(e) => Err(e),
    }
}

/// Transcode the tile ROM's 16-bytes-per-glyph layout into the internal
/// 8-bytes-per-glyph (one byte per row, MSB leftmost) table.
fn transcode_tiles(raw: &[u8], charset: &mut [u8]) {
    for glyph in 0..256 {
        for row in 0..8 {
            charset[glyph * 8 + row] = raw.get(glyph * 16 + row).copied().unwrap_or(0xFF);
        }
    }
}

/// Transcode the sprite ROM into the 64-entry x 16-byte sprite table.
fn transcode_sprites(raw: &[u8], patterns: &mut [u8]) {
    for entry in 0..64 {
        for byte in 0..16 {
            patterns[entry * 16 + byte] = raw.get(entry * 16 + byte).copied().unwrap_or(0xFF);
        }
    }
}

/// Decode one palette PROM byte through the resistor ladder:
/// red bits 0-2, green bits 3-5, blue bits 6-7 (the two highest weights).
pub fn decode_palette_entry(value: u8) -> (u8, u8, u8) {
    let channel3 = |shift: u8| {
        COLOR_WEIGHTS
            .iter()
            .enumerate()
            .map(|(bit, &w)| ((value >> (shift + bit as u8)) & 1) * w)
            .sum::<u8>()
    };
    let r = channel3(0);
    let g = channel3(3);
    let b = ((value >> 6) & 1) * COLOR_WEIGHTS[1] + ((value >> 7) & 1) * COLOR_WEIGHTS[2];
    (r, g, b)
}

fn decode_palette(prom: &[u8], palette: &mut [(u8, u8, u8); 256]) {
    for (i, slot) in palette.iter_mut().take(32).enumerate() {
        *slot = decode_palette_entry(prom.get(i).copied().unwrap_or(0));
    }
}

/// Install the built-in placeholder assets: a recognizable glyph set,
/// cleared sprite patterns, and a primary-color palette.
pub fn install_placeholders(board: &mut Board) {
    board.charset.fill(0);

    // Glyphs 1-7 spell out block letters; glyph 0 stays blank.
    const LETTERS: [[u8; 8]; 7] = [
        // H
        [0xC3, 0xC3, 0xC3, 0xFF, 0xFF, 0xC3, 0xC3, 0xC3],
        // E
        [0xFF, 0xFF, 0xC0, 0xFF, 0xFF, 0xC0, 0xFF, 0xFF],
        // L
        [0xC0, 0xC0, 0xC0, 0xC0, 0xC0, 0xC0, 0xFF, 0xFF],
        // O
        [0x7E, 0xFF, 0xC3, 0xC3, 0xC3, 0xC3, 0xFF, 0x7E],
        // W
        [0xC3, 0xC3, 0xC3, 0xC3, 0xDB, 0xFF, 0x66, 0x24],
        // R
        [0xFC, 0xFE, 0xC3, 0xFE, 0xFC, 0xDE, 0xCF, 0xC7],
        // D
        [0xFC, 0xFE, 0xC3, 0xC3, 0xC3, 0xC3, 0xFE, 0xFC],
    ];
    for (n, rows) in LETTERS.iter().enumerate() {
        board.charset[(n + 1) * 8..(n + 2) * 8].copy_from_slice(rows);
    }
    // Everything past the letters gets a diagonal stripe pattern.
    for glyph in 8..256 {
        for row in 0..8 {
            board.charset[glyph * 8 + row] = if (glyph + row) % 8 == 0 { 0xFF } else { 0x00 };
        }
    }

    board.sprite_patterns.fill(0);

    for (i, slot) in board.palette.iter_mut().enumerate() {
        *slot = (
            if i & 4 != 0 { 0xFF } else { 0 },
            if i & 2 != 0 { 0xFF } else { 0 },
            if i & 1 != 0 { 0xFF } else { 0 },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_entry_smallest_red_weight() {
        assert_eq!(decode_palette_entry(0x01), (0x21, 0, 0));
    }

    #[test]
    fn palette_entry_full_channels() {
        // All three red bits sum to 0x21 + 0x47 + 0x97 = 0xFF.
        assert_eq!(decode_palette_entry(0x07), (0xFF, 0, 0));
        assert_eq!(decode_palette_entry(0x38), (0, 0xFF, 0));
        // Blue has only the two highest weights.
        assert_eq!(decode_palette_entry(0xC0), (0, 0, 0x47 + 0x97));
    }

    #[test]
    fn tile_transcode_takes_first_half_of_each_symbol() {
        let mut raw = vec![0u8; 0x1000];
        raw[3 * 16] = 0xAB; // glyph 3, row 0
        raw[3 * 16 + 7] = 0xCD; // glyph 3, row 7
        raw[3 * 16 + 8] = 0xEE; // second half, not part of the glyph
        let mut charset = [0u8; 256 * 8];
        transcode_tiles(&raw, &mut charset);
        assert_eq!(charset[3 * 8], 0xAB);
        assert_eq!(charset[3 * 8 + 7], 0xCD);
    }

    #[test]
    fn short_tile_rom_pads_with_ff() {
        let raw = vec![0u8; 16]; // only glyph 0 present
        let mut charset = [0u8; 256 * 8];
        transcode_tiles(&raw, &mut charset);
        assert_eq!(charset[0], 0x00);
        assert_eq!(charset[8], 0xFF, "missing glyph data reads as blank EPROM");
    }

    #[test]
    fn monolithic_program_image_accepted() {
        let image = vec![0x76u8; 0x4000]; // HALT everywhere
        let rom_set = RomSet::from_slices(&[("pacman.rom", &image)]);
        let program = load_program(&rom_set).unwrap();
        assert_eq!(program.len(), 0x4000);
        assert_eq!(program[0], 0x76);
    }

    #[test]
    fn short_monolithic_image_padded() {
        let rom_set = RomSet::from_slices(&[("pacman.rom", &[0x00, 0x76])]);
        let program = load_program(&rom_set).unwrap();
        assert_eq!(program[1], 0x76);
        assert_eq!(program[2], 0xFF);
    }

    #[test]
    fn missing_chunk_fails_with_multiple_files() {
        let rom_set = RomSet::from_slices(&[
            ("pacman.6e", &[0u8; 0x1000]),
            ("pacman.6f", &[0u8; 0x1000]),
        ]);
        assert!(matches!(
            load_program(&rom_set),
            Err(RomLoadError::MissingFile(_))
        ));
    }
}
