//! The contract between an emulated cabinet and whatever presents it.

/// One button a machine exposes. IDs are machine-chosen and only need to
/// be unique within that machine's [`input_map`](Machine::input_map).
#[derive(Clone, Copy, Debug)]
pub struct InputButton {
    pub id: u8,
    /// Display name, also used for default key bindings ("P1 Left", "Coin").
    pub name: &'static str,
}

/// A complete emulated cabinet, driven one video frame at a time.
///
/// The presentation shell owns the pacing: once per display refresh it
/// forwards any queued input, calls [`run_frame`](Self::run_frame), and
/// rasterizes. Implementations latch button state internally, so event
/// order within a frame does not matter and no event is lost between
/// frames.
pub trait Machine {
    /// Native resolution in pixels, (width, height).
    fn display_size(&self) -> (u32, u32);

    /// Advance the machine by one frame's worth of CPU time and raise
    /// whatever periodic interrupt the board ties to the frame boundary.
    fn run_frame(&mut self);

    /// Rasterize the current video state into `buffer` as packed RGB24,
    /// row-major from the top-left. `buffer` must hold at least
    /// [`framebuffer_len`](Self::framebuffer_len) bytes.
    fn render_frame(&self, buffer: &mut [u8]);

    /// Latch a button press or release. `button` is an ID from
    /// [`input_map`](Self::input_map); unknown IDs are ignored.
    fn set_input(&mut self, button: u8, pressed: bool);

    /// The buttons this machine accepts.
    fn input_map(&self) -> &[InputButton];

    /// Return to the power-on state. Loaded ROMs and decoded assets
    /// survive; everything volatile does not.
    fn reset(&mut self);

    /// Byte length of an RGB24 framebuffer at the native resolution.
    fn framebuffer_len(&self) -> usize {
        let (width, height) = self.display_size();
        (width * height * 3) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSize(u32, u32);

    impl Machine for FixedSize {
        fn display_size(&self) -> (u32, u32) {
            (self.0, self.1)
        }
        fn run_frame(&mut self) {}
        fn render_frame(&self, _buffer: &mut [u8]) {}
        fn set_input(&mut self, _button: u8, _pressed: bool) {}
        fn input_map(&self) -> &[InputButton] {
            &[]
        }
        fn reset(&mut self) {}
    }

    #[test]
    fn framebuffer_len_is_three_bytes_per_pixel() {
        assert_eq!(FixedSize(224, 288).framebuffer_len(), 224 * 288 * 3);
        assert_eq!(FixedSize(1, 1).framebuffer_len(), 3);
    }
}
