/// Single-line maskable interrupt controller.
///
/// Tracks at most one pending request. A request raised while the CPU's
/// main enable latch is clear is dropped on the floor, not queued —
/// matching the board's 74LS74-style flip-flop, which only latches the
/// vertical-blank pulse when interrupts are armed.
#[derive(Debug, Default)]
pub struct IrqController {
    pending: bool,
}

/// Service-routine entry for interrupt modes 0 and 1. In mode 0 the
/// peripheral drives 0xFF (RST 38h) onto the data bus, so both modes land
/// at the same address.
pub const MODE01_VECTOR: u16 = 0x0038;

/// Acceptance cost in cycles per interrupt mode.
pub fn accept_cost(im: u8) -> u64 {
    match im {
        0 => 11,
        1 => 13,
        _ => 19,
    }
}

impl IrqController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise an interrupt request. `enabled` is the CPU's main enable
    /// latch at request time; a masked request is dropped.
    pub fn request(&mut self, enabled: bool) {
        if enabled {
            self.pending = true;
        }
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request, if any. Called by the CPU the instant
    /// it accepts the interrupt.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending = false;
    }
}
