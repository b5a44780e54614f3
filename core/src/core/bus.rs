/// Byte-wide bus interface between a CPU and the board it is socketed into.
///
/// Memory and I/O port space are separate, as on the Z80: `IN`/`OUT`
/// instructions go through `io_read`/`io_write` with the low address byte
/// as the port number, everything else through `read`/`write`.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);

    /// Read from I/O port space. Defaults to open bus.
    fn io_read(&mut self, port: u8) -> u8 {
        let _ = port;
        0xFF
    }

    /// Write to I/O port space. Defaults to no device.
    fn io_write(&mut self, port: u8, data: u8) {
        let _ = (port, data);
    }

    /// Whether `addr` is a legal destination for a control transfer.
    ///
    /// Boards that restrict code execution to their program store override
    /// this; the CPU rejects jump/call/return targets it refuses, as a
    /// guard against runaway execution. The default accepts everything so
    /// plain test memory can run code anywhere.
    fn valid_jump_target(&self, addr: u16) -> bool {
        let _ = addr;
        true
    }

    /// 16-bit read: two 8-bit accesses, low byte first.
    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from(lo) | (u16::from(hi) << 8)
    }

    /// 16-bit write: two 8-bit accesses, low byte first.
    fn write_word(&mut self, addr: u16, data: u16) {
        self.write(addr, data as u8);
        self.write(addr.wrapping_add(1), (data >> 8) as u8);
    }
}
