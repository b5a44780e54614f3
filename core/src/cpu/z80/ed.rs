//! ED-prefixed instructions: I/O through the C port, 16-bit carry
//! arithmetic, block transfers and the interrupt plumbing. Cycle costs
//! are full documented totals including the ED fetch.

use crate::core::bus::Bus;

use super::exec::parity;
use super::table::R16;
use super::{Flag, Z80};

pub(super) fn execute<B: Bus + ?Sized>(cpu: &mut Z80, bus: &mut B) {
    let opcode = cpu.fetch_opcode(bus);
    let rp = [R16::Bc, R16::De, R16::Hl, R16::Sp][((opcode >> 4) & 0x03) as usize];

    match opcode {
        // IN r,(C); the r=6 form only sets flags.
        0x40 | 0x48 | 0x50 | 0x58 | 0x60 | 0x68 | 0x70 | 0x78 => {
            let val = bus.io_read(cpu.c);
            match (opcode >> 3) & 0x07 {
                0 => cpu.b = val,
                1 => cpu.c = val,
                2 => cpu.d = val,
                3 => cpu.e = val,
                4 => cpu.h = val,
                5 => cpu.l = val,
                6 => {}
                _ => cpu.a = val,
            }
            let mut f = cpu.f & Flag::C as u8;
            if val == 0 {
                f |= Flag::Z as u8;
            }
            f |= val & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
            if parity(val) {
                f |= Flag::PV as u8;
            }
            cpu.f = f;
            cpu.cycles += 12;
        }
        // OUT (C),r; the r=6 form drives zero.
        0x41 | 0x49 | 0x51 | 0x59 | 0x61 | 0x69 | 0x71 | 0x79 => {
            let val = match (opcode >> 3) & 0x07 {
                0 => cpu.b,
                1 => cpu.c,
                2 => cpu.d,
                3 => cpu.e,
                4 => cpu.h,
                5 => cpu.l,
                6 => 0,
                _ => cpu.a,
            };
            bus.io_write(cpu.c, val);
            cpu.cycles += 12;
        }

        // SBC HL,rp / ADC HL,rp
        0x42 | 0x52 | 0x62 | 0x72 => {
            let val = cpu.get_rp(rp);
            sbc16(cpu, val);
            cpu.cycles += 15;
        }
        0x4A | 0x5A | 0x6A | 0x7A => {
            let val = cpu.get_rp(rp);
            adc16(cpu, val);
            cpu.cycles += 15;
        }

        // LD (nn),rp / LD rp,(nn)
        0x43 | 0x53 | 0x63 | 0x73 => {
            let addr = cpu.fetch_word(bus);
            let val = cpu.get_rp(rp);
            bus.write_word(addr, val);
            cpu.cycles += 20;
        }
        0x4B | 0x5B | 0x6B | 0x7B => {
            let addr = cpu.fetch_word(bus);
            let val = bus.read_word(addr);
            cpu.set_rp(rp, val);
            cpu.cycles += 20;
        }

        // NEG (documented opcode plus its undocumented aliases)
        0x44 | 0x4C | 0x54 | 0x5C | 0x64 | 0x6C | 0x74 | 0x7C => {
            let val = cpu.a;
            cpu.a = 0;
            cpu.sub_a(val, false);
            cpu.cycles += 8;
        }

        // RETN / RETI: both restore the enable latch from its shadow.
        0x45 | 0x4D | 0x55 | 0x5D | 0x65 | 0x6D | 0x75 | 0x7D => {
            cpu.iff1 = cpu.iff2;
            let target = cpu.pop(bus);
            cpu.transfer_control(bus, target);
            cpu.cycles += 14;
        }

        // IM 0/1/2 (with undocumented aliases)
        0x46 | 0x4E | 0x66 | 0x6E => {
            cpu.im = 0;
            cpu.cycles += 8;
        }
        0x56 | 0x76 => {
            cpu.im = 1;
            cpu.cycles += 8;
        }
        0x5E | 0x7E => {
            cpu.im = 2;
            cpu.cycles += 8;
        }

        0x47 => {
            cpu.i = cpu.a;
            cpu.cycles += 9;
        }
        0x4F => {
            cpu.r = cpu.a;
            cpu.cycles += 9;
        }
        0x57 => {
            let val = cpu.i;
            cpu.a = val;
            ir_load_flags(cpu, val);
            cpu.cycles += 9;
        }
        0x5F => {
            let val = cpu.r;
            cpu.a = val;
            ir_load_flags(cpu, val);
            cpu.cycles += 9;
        }

        // RRD / RLD: nibble rotation through (HL).
        0x67 => {
            let mem = bus.read(cpu.hl());
            let result = (mem >> 4) | (cpu.a << 4);
            cpu.a = (cpu.a & 0xF0) | (mem & 0x0F);
            bus.write(cpu.hl(), result);
            rotate_digit_flags(cpu);
            cpu.cycles += 18;
        }
        0x6F => {
            let mem = bus.read(cpu.hl());
            let result = (mem << 4) | (cpu.a & 0x0F);
            cpu.a = (cpu.a & 0xF0) | (mem >> 4);
            bus.write(cpu.hl(), result);
            rotate_digit_flags(cpu);
            cpu.cycles += 18;
        }

        // Block transfer/search/IO. The repeating forms run one
        // iteration and rewind PC over the prefix pair while work
        // remains, so interrupts land between iterations.
        0xA0 => {
            block_transfer(cpu, bus, 1);
            cpu.cycles += 16;
        }
        0xA8 => {
            block_transfer(cpu, bus, -1);
            cpu.cycles += 16;
        }
        0xB0 => {
            block_transfer(cpu, bus, 1);
            let more = cpu.bc() != 0;
            repeat(cpu, more);
        }
        0xB8 => {
            block_transfer(cpu, bus, -1);
            let more = cpu.bc() != 0;
            repeat(cpu, more);
        }
        0xA1 => {
            block_compare(cpu, bus, 1);
            cpu.cycles += 16;
        }
        0xA9 => {
            block_compare(cpu, bus, -1);
            cpu.cycles += 16;
        }
        0xB1 => {
            block_compare(cpu, bus, 1);
            let more = cpu.bc() != 0 && !cpu.flag(Flag::Z);
            repeat(cpu, more);
        }
        0xB9 => {
            block_compare(cpu, bus, -1);
            let more = cpu.bc() != 0 && !cpu.flag(Flag::Z);
            repeat(cpu, more);
        }
        0xA2 => {
            block_in(cpu, bus, 1);
            cpu.cycles += 16;
        }
        0xAA => {
            block_in(cpu, bus, -1);
            cpu.cycles += 16;
        }
        0xB2 => {
            block_in(cpu, bus, 1);
            let more = cpu.b != 0;
            repeat(cpu, more);
        }
        0xBA => {
            block_in(cpu, bus, -1);
            let more = cpu.b != 0;
            repeat(cpu, more);
        }
        0xA3 => {
            block_out(cpu, bus, 1);
            cpu.cycles += 16;
        }
        0xAB => {
            block_out(cpu, bus, -1);
            cpu.cycles += 16;
        }
        0xB3 => {
            block_out(cpu, bus, 1);
            let more = cpu.b != 0;
            repeat(cpu, more);
        }
        0xBB => {
            block_out(cpu, bus, -1);
            let more = cpu.b != 0;
            repeat(cpu, more);
        }

        // Every other ED opcode is a two-byte NOP.
        _ => cpu.cycles += 8,
    }
}

fn repeat(cpu: &mut Z80, more: bool) {
    if more {
        cpu.pc = cpu.pc.wrapping_sub(2);
        cpu.cycles += 21;
    } else {
        cpu.cycles += 16;
    }
}

fn ir_load_flags(cpu: &mut Z80, val: u8) {
    let mut f = cpu.f & Flag::C as u8;
    if val == 0 {
        f |= Flag::Z as u8;
    }
    f |= val & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
    if cpu.iff2 {
        f |= Flag::PV as u8;
    }
    cpu.f = f;
}

fn rotate_digit_flags(cpu: &mut Z80) {
    let val = cpu.a;
    let mut f = cpu.f & Flag::C as u8;
    if val == 0 {
        f |= Flag::Z as u8;
    }
    f |= val & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
    if parity(val) {
        f |= Flag::PV as u8;
    }
    cpu.f = f;
}

fn adc16(cpu: &mut Z80, val: u16) {
    let carry = u16::from(cpu.flag(Flag::C));
    let lhs = cpu.hl();
    let result = lhs.wrapping_add(val).wrapping_add(carry);
    let mut f = 0;
    if result == 0 {
        f |= Flag::Z as u8;
    }
    f |= ((result >> 8) as u8) & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
    if u32::from(lhs) + u32::from(val) + u32::from(carry) > 0xFFFF {
        f |= Flag::C as u8;
    }
    if (lhs & 0x0FFF) + (val & 0x0FFF) + carry > 0x0FFF {
        f |= Flag::H as u8;
    }
    if (lhs ^ result) & (val ^ result) & 0x8000 != 0 {
        f |= Flag::PV as u8;
    }
    cpu.set_hl(result);
    cpu.f = f;
}

fn sbc16(cpu: &mut Z80, val: u16) {
    let carry = u16::from(cpu.flag(Flag::C));
    let lhs = cpu.hl();
    let result = lhs.wrapping_sub(val).wrapping_sub(carry);
    let mut f = Flag::N as u8;
    if result == 0 {
        f |= Flag::Z as u8;
    }
    f |= ((result >> 8) as u8) & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
    if u32::from(lhs) < u32::from(val) + u32::from(carry) {
        f |= Flag::C as u8;
    }
    if (lhs & 0x0FFF) < (val & 0x0FFF) + carry {
        f |= Flag::H as u8;
    }
    if (lhs ^ val) & (lhs ^ result) & 0x8000 != 0 {
        f |= Flag::PV as u8;
    }
    cpu.set_hl(result);
    cpu.f = f;
}

fn block_transfer<B: Bus + ?Sized>(cpu: &mut Z80, bus: &mut B, dir: i16) {
    let val = bus.read(cpu.hl());
    bus.write(cpu.de(), val);
    cpu.set_hl(cpu.hl().wrapping_add(dir as u16));
    cpu.set_de(cpu.de().wrapping_add(dir as u16));
    cpu.set_bc(cpu.bc().wrapping_sub(1));
    let n = val.wrapping_add(cpu.a);
    let mut f = cpu.f & (Flag::S as u8 | Flag::Z as u8 | Flag::C as u8);
    if cpu.bc() != 0 {
        f |= Flag::PV as u8;
    }
    // The copy bits come from A + transferred byte: bit 3 as-is, bit 1
    // shifted up into bit 5.
    f |= n & Flag::X as u8;
    f |= (n & 0x02) << 4;
    cpu.f = f;
}

fn block_compare<B: Bus + ?Sized>(cpu: &mut Z80, bus: &mut B, dir: i16) {
    let val = bus.read(cpu.hl());
    cpu.set_hl(cpu.hl().wrapping_add(dir as u16));
    cpu.set_bc(cpu.bc().wrapping_sub(1));
    let result = cpu.a.wrapping_sub(val);
    let half = (cpu.a & 0x0F) < (val & 0x0F);
    let mut f = (cpu.f & Flag::C as u8) | Flag::N as u8;
    if result == 0 {
        f |= Flag::Z as u8;
    }
    f |= result & Flag::S as u8;
    if half {
        f |= Flag::H as u8;
    }
    if cpu.bc() != 0 {
        f |= Flag::PV as u8;
    }
    let n = result.wrapping_sub(u8::from(half));
    f |= n & Flag::X as u8;
    f |= (n & 0x02) << 4;
    cpu.f = f;
}

fn block_in<B: Bus + ?Sized>(cpu: &mut Z80, bus: &mut B, dir: i16) {
    let val = bus.io_read(cpu.c);
    bus.write(cpu.hl(), val);
    cpu.set_hl(cpu.hl().wrapping_add(dir as u16));
    cpu.b = cpu.b.wrapping_sub(1);
    block_io_flags(cpu);
}

fn block_out<B: Bus + ?Sized>(cpu: &mut Z80, bus: &mut B, dir: i16) {
    let val = bus.read(cpu.hl());
    cpu.b = cpu.b.wrapping_sub(1);
    bus.io_write(cpu.c, val);
    cpu.set_hl(cpu.hl().wrapping_add(dir as u16));
    block_io_flags(cpu);
}

/// Sign, zero and the copy bits track the decremented counter; N is
/// always set. The exotic H/P/C behavior of the block I/O group is not
/// modeled.
fn block_io_flags(cpu: &mut Z80) {
    let b = cpu.b;
    let mut f = (cpu.f & Flag::C as u8) | Flag::N as u8;
    if b == 0 {
        f |= Flag::Z as u8;
    }
    f |= b & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
    cpu.f = f;
}
