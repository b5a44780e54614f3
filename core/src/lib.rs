pub mod core;
pub mod cpu;

pub mod prelude {
    pub use crate::core::machine::{InputButton, Machine};
    pub use crate::core::{Bus, IrqController};
    pub use crate::cpu::Z80;
}
