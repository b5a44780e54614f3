pub mod bus;
pub mod irq;
pub mod machine;

pub use bus::Bus;
pub use irq::IrqController;
pub use machine::{InputButton, Machine};
