use marquee_core::core::Bus;

/// Minimal bus for testing: flat 64KB read/write memory plus a 256-byte
/// port file, no peripherals.
pub struct TestBus {
    pub memory: [u8; 0x10000],
    pub ports: [u8; 256],
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            memory: [0; 0x10000],
            ports: [0; 256],
        }
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + data.len()].copy_from_slice(data);
    }
}

impl Bus for TestBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.memory[addr as usize] = data;
    }

    fn io_read(&mut self, port: u8) -> u8 {
        self.ports[port as usize]
    }

    fn io_write(&mut self, port: u8, data: u8) {
        self.ports[port as usize] = data;
    }
}
