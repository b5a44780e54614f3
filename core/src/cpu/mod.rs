pub mod z80;

pub use z80::{Flag, Z80};
