pub mod pacman;
pub mod registry;
pub mod rom_loader;

pub use pacman::PacmanSystem;
