//! Tile and sprite rasterizer.
//!
//! One full-frame pass: the 28x36 tile grid first, then the eight sprites
//! composited over it, highest sprite number first so sprite 0 lands on
//! top. Glyphs are 1bpp, one byte per row, MSB leftmost; a set bit draws
//! the attribute color and clear bits leave the backdrop.

use super::board::{Board, PLANE_SIZE};

pub const SCREEN_WIDTH: usize = 224;
pub const SCREEN_HEIGHT: usize = 288;

const TILE_COLUMNS: usize = 28;
const TILE_ROWS: usize = 36;
const TILE_SIZE: usize = 8;

const MAX_SPRITES: usize = 8;
const SPRITE_SIZE: i32 = 16;

impl Board {
    /// Render the current video state into an RGB24 buffer
    /// (`SCREEN_WIDTH * SCREEN_HEIGHT * 3` bytes, row-major).
    pub fn render(&self, buffer: &mut [u8]) {
        buffer[..SCREEN_WIDTH * SCREEN_HEIGHT * 3].fill(0);

        let flip = self.flip_screen;

        // The tile plane is laid out 32 columns wide; rows past the 1KB
        // plane stay blank.
        for ty in 0..TILE_ROWS {
            for tx in 0..TILE_COLUMNS {
                let index = ty * 32 + tx;
                if index >= PLANE_SIZE {
                    continue;
                }
                let glyph = self.tile_index[index];
                let color = self.tile_attr[index];

                let (sx, sy) = if flip {
                    (
                        (TILE_COLUMNS - 1 - tx) * TILE_SIZE,
                        (TILE_ROWS - 1 - ty) * TILE_SIZE,
                    )
                } else {
                    (tx * TILE_SIZE, ty * TILE_SIZE)
                };
                self.draw_glyph(buffer, sx as i32, sy as i32, glyph, color);
            }
        }

        for sprite in (0..MAX_SPRITES).rev() {
            let (attr0, attr1) = self.sprite_attrs(sprite);
            let glyph = attr0 >> 2;
            let mut flip_y = attr0 & 0x01 != 0;
            let mut flip_x = attr0 & 0x02 != 0;
            let color = attr1 & 0x3F;

            let (coord_x, coord_y) = self.sprite_coords(sprite);
            // The hardware positions sprites 16 pixels left of the latched X.
            let mut x = i32::from(coord_x) - 16;
            let mut y = i32::from(coord_y);

            if flip {
                x = SCREEN_WIDTH as i32 - x - SPRITE_SIZE;
                y = SCREEN_HEIGHT as i32 - y - SPRITE_SIZE;
                flip_x = !flip_x;
                flip_y = !flip_y;
            }

            if x > -SPRITE_SIZE
                && x < SCREEN_WIDTH as i32
                && y > -SPRITE_SIZE
                && y < SCREEN_HEIGHT as i32
            {
                self.draw_sprite(buffer, x, y, glyph, color, flip_x, flip_y);
            }
        }
    }

    fn draw_glyph(&self, buffer: &mut [u8], x: i32, y: i32, glyph: u8, color: u8) {
        let base = glyph as usize * 8;
        let rgb = self.palette[(color & 0x0F) as usize];

        for (cy, &row) in self.charset[base..base + 8].iter().enumerate() {
            for cx in 0..8 {
                if row & (0x80 >> cx) != 0 {
                    put_pixel(buffer, x + cx, y + cy as i32, rgb);
                }
            }
        }
    }

    /// A 16x16 sprite is four 8x8 tiles read out of the flat pattern
    /// table; reads past the table (possible for the last entries) see
    /// empty pattern data.
    fn draw_sprite(
        &self,
        buffer: &mut [u8],
        x: i32,
        y: i32,
        glyph: u8,
        color: u8,
        flip_x: bool,
        flip_y: bool,
    ) {
        let base = glyph as usize * 16;
        let rgb = self.palette[(color & 0x0F) as usize];

        for sy in 0..16usize {
            let yo = if flip_y { 15 - sy } else { sy };
            let tile_y = yo / 8;
            let tile_row = yo % 8;

            for sx in 0..16usize {
                let xo = if flip_x { 15 - sx } else { sx };
                let tile_x = xo / 8;
                let tile_col = xo % 8;

                let tile = tile_y * 2 + tile_x;
                let byte = self
                    .sprite_patterns
                    .get(base + tile * 8 + tile_row)
                    .copied()
                    .unwrap_or(0);

                if byte & (0x80 >> tile_col) != 0 {
                    put_pixel(buffer, x + sx as i32, y + sy as i32, rgb);
                }
            }
        }
    }
}

fn put_pixel(buffer: &mut [u8], x: i32, y: i32, rgb: (u8, u8, u8)) {
    if x < 0 || x >= SCREEN_WIDTH as i32 || y < 0 || y >= SCREEN_HEIGHT as i32 {
        return;
    }
    let offset = (y as usize * SCREEN_WIDTH + x as usize) * 3;
    buffer[offset] = rgb.0;
    buffer[offset + 1] = rgb.1;
    buffer[offset + 2] = rgb.2;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacman::board::SPRITE_TABLE;

    fn pixel(buffer: &[u8], x: usize, y: usize) -> (u8, u8, u8) {
        let off = (y * SCREEN_WIDTH + x) * 3;
        (buffer[off], buffer[off + 1], buffer[off + 2])
    }

    fn framebuffer() -> Vec<u8> {
        vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3]
    }

    #[test]
    fn tile_pixels_follow_glyph_rows() {
        let mut board = Board::new();
        // A solid-top glyph in slot 9 at tile (2, 3), palette entry 6.
        board.charset[9 * 8] = 0xFF;
        board.tile_index[3 * 32 + 2] = 9;
        board.tile_attr[3 * 32 + 2] = 0x06;
        let expected = board.palette[6];

        let mut buffer = framebuffer();
        board.render(&mut buffer);

        for cx in 0..8 {
            assert_eq!(pixel(&buffer, 16 + cx, 24), expected);
        }
        assert_eq!(pixel(&buffer, 16, 25), (0, 0, 0), "second row is clear");
    }

    #[test]
    fn clear_bits_leave_backdrop() {
        let mut board = Board::new();
        board.charset[9 * 8] = 0xC3; // 11000011
        board.tile_index[0] = 9;
        board.tile_attr[0] = 0x07;

        let mut buffer = framebuffer();
        board.render(&mut buffer);

        assert_ne!(pixel(&buffer, 0, 0), (0, 0, 0));
        assert_eq!(pixel(&buffer, 2, 0), (0, 0, 0));
        assert_eq!(pixel(&buffer, 5, 0), (0, 0, 0));
        assert_ne!(pixel(&buffer, 7, 0), (0, 0, 0));
    }

    #[test]
    fn sprite_draws_with_x_offset() {
        let mut board = Board::new();
        // Sprite glyph 1, upper-left tile, top row fully set.
        board.sprite_patterns[16] = 0xFF;
        board.work[SPRITE_TABLE] = 1 << 2;
        board.work[SPRITE_TABLE + 1] = 0x03;
        board.ports[0x60] = 100; // X latch; drawn at 100 - 16
        board.ports[0x61] = 50;

        let mut buffer = framebuffer();
        board.render(&mut buffer);

        let expected = board.palette[3];
        for sx in 0..8 {
            assert_eq!(pixel(&buffer, 84 + sx, 50), expected);
        }
        assert_eq!(pixel(&buffer, 100, 50), (0, 0, 0), "latched X itself is empty");
    }

    #[test]
    fn sprite_y_flip_moves_top_row_to_bottom() {
        let mut board = Board::new();
        board.sprite_patterns[16] = 0xFF; // top row of the upper-left tile
        board.work[SPRITE_TABLE] = (1 << 2) | 0x01; // Y flip
        board.work[SPRITE_TABLE + 1] = 0x03;
        board.ports[0x60] = 32;
        board.ports[0x61] = 40;

        let mut buffer = framebuffer();
        board.render(&mut buffer);

        assert_eq!(pixel(&buffer, 16, 40), (0, 0, 0));
        assert_ne!(pixel(&buffer, 16, 55), (0, 0, 0), "row lands 15 lines down");
    }

    #[test]
    fn screen_flip_mirrors_tiles() {
        let mut board = Board::new();
        board.charset[9 * 8] = 0x80; // single pixel, top-left of the glyph
        board.tile_index[0] = 9;
        board.tile_attr[0] = 0x07;
        board.flip_screen = true;

        let mut buffer = framebuffer();
        board.render(&mut buffer);

        // Tile (0,0) renders at the opposite corner; the glyph itself is
        // not mirrored, so its set pixel stays at the tile's top-left.
        assert_ne!(pixel(&buffer, 27 * 8, 35 * 8), (0, 0, 0));
        assert_eq!(pixel(&buffer, 0, 0), (0, 0, 0));
    }

    #[test]
    fn lower_numbered_sprite_wins_overlap() {
        let mut board = Board::new();
        board.sprite_patterns[16] = 0xFF; // glyph 1
        board.sprite_patterns[32] = 0xFF; // glyph 2
        // Sprite 0 and sprite 1 at the same spot, different colors.
        board.work[SPRITE_TABLE] = 1 << 2;
        board.work[SPRITE_TABLE + 1] = 0x03;
        board.work[SPRITE_TABLE + 2] = 2 << 2;
        board.work[SPRITE_TABLE + 3] = 0x05;
        board.ports[0x60] = 64;
        board.ports[0x61] = 64;
        board.ports[0x62] = 64;
        board.ports[0x63] = 64;

        let mut buffer = framebuffer();
        board.render(&mut buffer);

        assert_eq!(pixel(&buffer, 48, 64), board.palette[3]);
    }
}

