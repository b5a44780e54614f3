//! CB-prefixed instructions: rotates, shifts and bit operations.
//!
//! Cycle costs here are full documented totals including the CB fetch.
//! In indexed mode the DD/FD prefix has already been charged 4, so the
//! indexed totals below are 4 short of the documented figures.

use crate::core::bus::Bus;

use super::exec::parity;
use super::table::R8;
use super::{Flag, Z80};

const R_TABLE: [R8; 8] = [R8::B, R8::C, R8::D, R8::E, R8::H, R8::L, R8::MemHl, R8::A];

pub(super) fn execute<B: Bus + ?Sized>(cpu: &mut Z80, bus: &mut B) {
    // Indexed form is DD CB d op: the displacement precedes the
    // sub-opcode, and the sub-opcode fetch is a data read (no refresh).
    let indexed = cpu.indexed();
    let addr = if indexed {
        Some(cpu.mem_operand_addr(bus))
    } else {
        cpu.bump_r();
        None
    };
    let opcode = cpu.fetch_byte(bus);

    let bit = (opcode >> 3) & 0x07;
    let operand = R_TABLE[(opcode & 0x07) as usize];
    // The indexed forms always work on memory, whatever the r field says.
    let mem = indexed || operand == R8::MemHl;

    let read = |cpu: &mut Z80, bus: &mut B| -> u8 {
        match addr {
            Some(addr) => bus.read(addr),
            None => cpu.get_r8(bus, operand),
        }
    };
    let write = |cpu: &mut Z80, bus: &mut B, val: u8| match addr {
        Some(addr) => bus.write(addr, val),
        None => cpu.set_r8(bus, operand, val),
    };

    match opcode >> 6 {
        // Rotates and shifts
        0 => {
            let val = read(cpu, bus);
            let old_carry = u8::from(cpu.flag(Flag::C));
            let (result, carry) = match bit {
                0 => ((val << 1) | (val >> 7), val & 0x80 != 0), // RLC
                1 => ((val >> 1) | (val << 7), val & 0x01 != 0), // RRC
                2 => ((val << 1) | old_carry, val & 0x80 != 0),  // RL
                3 => ((val >> 1) | (old_carry << 7), val & 0x01 != 0), // RR
                4 => (val << 1, val & 0x80 != 0),                // SLA
                5 => ((val >> 1) | (val & 0x80), val & 0x01 != 0), // SRA
                6 => ((val << 1) | 0x01, val & 0x80 != 0),       // SLL
                _ => (val >> 1, val & 0x01 != 0),                // SRL
            };
            write(cpu, bus, result);
            let mut f = 0;
            if carry {
                f |= Flag::C as u8;
            }
            if result == 0 {
                f |= Flag::Z as u8;
            }
            f |= result & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
            if parity(result) {
                f |= Flag::PV as u8;
            }
            cpu.f = f;
            cpu.cycles += shift_cost(indexed, mem);
        }
        // BIT b,r
        1 => {
            let val = read(cpu, bus);
            let set = val & (1 << bit) != 0;
            let mut f = (cpu.f & Flag::C as u8) | Flag::H as u8;
            if !set {
                f |= Flag::Z as u8 | Flag::PV as u8;
            }
            if bit == 7 && set {
                f |= Flag::S as u8;
            }
            f |= val & (Flag::X as u8 | Flag::Y as u8);
            cpu.f = f;
            cpu.cycles += bit_cost(indexed, mem);
        }
        // RES b,r
        2 => {
            let val = read(cpu, bus) & !(1 << bit);
            write(cpu, bus, val);
            cpu.cycles += shift_cost(indexed, mem);
        }
        // SET b,r
        _ => {
            let val = read(cpu, bus) | (1 << bit);
            write(cpu, bus, val);
            cpu.cycles += shift_cost(indexed, mem);
        }
    }
}

fn shift_cost(indexed: bool, mem: bool) -> u64 {
    match (indexed, mem) {
        (true, _) => 19,
        (false, true) => 15,
        (false, false) => 8,
    }
}

fn bit_cost(indexed: bool, mem: bool) -> u64 {
    match (indexed, mem) {
        (true, _) => 16,
        (false, true) => 12,
        (false, false) => 8,
    }
}
