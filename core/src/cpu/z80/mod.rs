mod cb;
mod ed;
mod exec;
pub mod table;

use crate::core::bus::Bus;
use crate::core::irq::{self, IrqController};

use table::{IndexMode, Op, OPCODES};

#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum Flag {
    C = 0x01,  // Carry
    N = 0x02,  // Add/Subtract
    PV = 0x04, // Parity/Overflow
    X = 0x08,  // Unused (copy of bit 3)
    H = 0x10,  // Half Carry
    Y = 0x20,  // Unused (copy of bit 5)
    Z = 0x40,  // Zero
    S = 0x80,  // Sign
}

/// Architectural reset value for the stack pointer: top of work RAM.
pub const RESET_SP: u16 = 0xF000;

/// Cheapest instruction the core can execute: a lone M1 fetch (NOP).
/// Bounds how many instructions one frame's cycle budget can admit.
pub const MIN_INSTRUCTION_CYCLES: u32 = 4;

/// Instruction-stepped Z80 core.
///
/// One `step_instruction` call runs a whole instruction; per-opcode costs
/// come from the dense descriptor table in [`table`]. `run_frame` drives
/// the core for a frame's cycle budget and raises the periodic
/// frame-boundary interrupt through the [`IrqController`].
pub struct Z80 {
    // Registers
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    // Shadow registers
    pub a_prime: u8,
    pub f_prime: u8,
    pub b_prime: u8,
    pub c_prime: u8,
    pub d_prime: u8,
    pub e_prime: u8,
    pub h_prime: u8,
    pub l_prime: u8,
    // Index & special registers
    pub ix: u16,
    pub iy: u16,
    pub i: u8,
    pub r: u8,
    pub sp: u16,
    pub pc: u16,

    // Interrupt state
    pub iff1: bool,
    pub iff2: bool,
    pub im: u8,
    pub halted: bool,
    pub cycles: u64,

    // Per-instruction decode state
    pub(crate) index: IndexMode,
    pub(crate) disp: Option<i8>,
    pub(crate) ei_delay: bool,
}

impl Default for Z80 {
    fn default() -> Self {
        Self::new()
    }
}

impl Z80 {
    pub fn new() -> Self {
        Self {
            a: 0,
            f: Flag::X as u8 | Flag::Y as u8,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            a_prime: 0,
            f_prime: 0,
            b_prime: 0,
            c_prime: 0,
            d_prime: 0,
            e_prime: 0,
            h_prime: 0,
            l_prime: 0,
            ix: 0,
            iy: 0,
            i: 0,
            r: 0,
            sp: RESET_SP,
            pc: 0,
            iff1: false,
            iff2: false,
            im: 0,
            halted: false,
            cycles: 0,
            index: IndexMode::Hl,
            disp: None,
            ei_delay: false,
        }
    }

    /// Reseed every register to its architectural reset value, regardless
    /// of prior state. The two unused flag bits carry their power-on
    /// pattern so raw flag-byte inspection sees them set.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // Helpers for 16-bit register pair access
    pub fn bc(&self) -> u16 { (u16::from(self.b) << 8) | u16::from(self.c) }
    pub fn set_bc(&mut self, val: u16) { self.b = (val >> 8) as u8; self.c = val as u8; }

    pub fn de(&self) -> u16 { (u16::from(self.d) << 8) | u16::from(self.e) }
    pub fn set_de(&mut self, val: u16) { self.d = (val >> 8) as u8; self.e = val as u8; }

    pub fn hl(&self) -> u16 { (u16::from(self.h) << 8) | u16::from(self.l) }
    pub fn set_hl(&mut self, val: u16) { self.h = (val >> 8) as u8; self.l = val as u8; }

    pub fn af(&self) -> u16 { (u16::from(self.a) << 8) | u16::from(self.f) }
    pub fn set_af(&mut self, val: u16) { self.a = (val >> 8) as u8; self.f = val as u8; }

    pub fn flag(&self, flag: Flag) -> bool {
        self.f & flag as u8 != 0
    }

    pub(crate) fn fetch_byte<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u8 {
        let val = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        val
    }

    pub(crate) fn fetch_word<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from(lo) | (u16::from(hi) << 8)
    }

    /// Opcode fetch: an M1 cycle, so the refresh register ticks.
    pub(crate) fn fetch_opcode<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u8 {
        self.bump_r();
        self.fetch_byte(bus)
    }

    /// Refresh register increment: low 7 bits count, bit 7 is preserved.
    pub(crate) fn bump_r(&mut self) {
        self.r = (self.r & 0x80) | (self.r.wrapping_add(1) & 0x7F);
    }

    pub(crate) fn push<B: Bus + ?Sized>(&mut self, bus: &mut B, val: u16) {
        self.sp = self.sp.wrapping_sub(2);
        bus.write_word(self.sp, val);
    }

    pub(crate) fn pop<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u16 {
        let val = bus.read_word(self.sp);
        self.sp = self.sp.wrapping_add(2);
        val
    }

    /// Load `target` into PC if the bus accepts it as code; otherwise
    /// reject the transfer, park PC at 0 and halt. The guard exists to
    /// stop runaway execution from garbage jump vectors, not to mirror
    /// hardware.
    pub(crate) fn transfer_control<B: Bus + ?Sized>(&mut self, bus: &B, target: u16) {
        if bus.valid_jump_target(target) {
            self.pc = target;
        } else {
            eprintln!("z80: rejecting control transfer to {target:#06X}; halting");
            self.pc = 0;
            self.halted = true;
        }
    }

    /// Execute one instruction (or service a pending interrupt at the
    /// boundary). A halted CPU burns a minimal 4-cycle NOP but stays
    /// eligible for interrupt service.
    pub fn step_instruction<B: Bus + ?Sized>(&mut self, bus: &mut B, irq: &mut IrqController) {
        if self.ei_delay {
            // EI shields exactly one following instruction.
            self.ei_delay = false;
        } else if self.iff1 && irq.pending() {
            self.accept_interrupt(bus, irq);
            return;
        }

        if self.halted {
            self.cycles += 4;
            return;
        }

        let opcode = self.fetch_opcode(bus);
        let instr = OPCODES[opcode as usize];
        self.cycles += u64::from(instr.cycles);
        self.execute(instr.op, bus);

        self.index = IndexMode::Hl;
        self.disp = None;
    }

    /// Run instructions until `cycle_budget` cycles have elapsed this
    /// frame, then raise the periodic frame-boundary interrupt if the
    /// main enable latch is set. Returns the cycles actually executed.
    ///
    /// The instruction ceiling is a stuck-clock guard. Every opcode in
    /// the descriptor table costs at least [`MIN_INSTRUCTION_CYCLES`],
    /// so a healthy core exhausts the budget within
    /// `budget / MIN_INSTRUCTION_CYCLES + 1` steps; the ceiling only
    /// trips if an instruction charges nothing, in which case the frame
    /// is abandoned with a warning instead of spinning forever.
    pub fn run_frame<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        irq: &mut IrqController,
        cycle_budget: u32,
    ) -> u64 {
        let start = self.cycles;
        let ceiling = u64::from(cycle_budget / MIN_INSTRUCTION_CYCLES) + 1;
        let mut executed: u64 = 0;

        while self.cycles.wrapping_sub(start) < u64::from(cycle_budget) {
            if executed >= ceiling {
                eprintln!(
                    "z80: {executed} instructions without exhausting the frame budget; abandoning frame"
                );
                break;
            }
            self.step_instruction(bus, irq);
            executed += 1;
        }

        // Vertical-blank interrupt, tied to the frame boundary. The
        // request is offered for acceptance immediately so a HALTed main
        // loop wakes before the next frame starts.
        if self.iff1 {
            irq.request(self.iff1);
            self.accept_interrupt(bus, irq);
        }

        self.cycles.wrapping_sub(start)
    }

    /// Interrupt acceptance: clear the request and both enable latches,
    /// resume a halted CPU past its HALT opcode, push PC and enter the
    /// service routine per the current interrupt mode.
    fn accept_interrupt<B: Bus + ?Sized>(&mut self, bus: &mut B, irq: &mut IrqController) {
        if !irq.take() {
            return;
        }
        self.iff1 = false;
        self.iff2 = false;
        if self.halted {
            self.pc = self.pc.wrapping_add(1);
            self.halted = false;
        }
        self.cycles += irq::accept_cost(self.im);
        let target = match self.im {
            // Modes 0 and 1: the peripheral drives RST 38h.
            0 | 1 => irq::MODE01_VECTOR,
            // Mode 2: vector table entry at (I << 8) | 0xFF.
            _ => {
                let table = (u16::from(self.i) << 8) | 0x00FF;
                bus.read_word(table)
            }
        };
        self.push(bus, self.pc);
        self.transfer_control(bus, target);
    }

    pub(crate) fn indexed(&self) -> bool {
        self.index != IndexMode::Hl
    }

    /// Effective address of the (HL)/(IX+d)/(IY+d) memory operand. The
    /// displacement byte is fetched at most once per instruction.
    pub(crate) fn mem_operand_addr<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u16 {
        match self.index {
            IndexMode::Hl => self.hl(),
            IndexMode::Ix => {
                let d = self.displacement(bus);
                self.ix.wrapping_add(d)
            }
            IndexMode::Iy => {
                let d = self.displacement(bus);
                self.iy.wrapping_add(d)
            }
        }
    }

    fn displacement<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u16 {
        let d = match self.disp {
            Some(d) => d,
            None => {
                let d = self.fetch_byte(bus) as i8;
                self.disp = Some(d);
                d
            }
        };
        d as i16 as u16
    }

    /// Under DD/FD, an indexed opcode chain keeps consuming prefix bytes
    /// (4 cycles each) until a real opcode arrives.
    pub(crate) fn execute_prefixed<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        loop {
            let opcode = self.fetch_opcode(bus);
            let instr = OPCODES[opcode as usize];
            self.cycles += u64::from(instr.cycles);
            match instr.op {
                Op::PrefixDd => self.index = IndexMode::Ix,
                Op::PrefixFd => self.index = IndexMode::Iy,
                op => {
                    self.execute(op, bus);
                    return;
                }
            }
        }
    }
}
