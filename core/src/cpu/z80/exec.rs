//! Execution of the base instruction set plus the flag-computation
//! helpers shared with the CB/ED handlers.

use crate::core::bus::Bus;

use super::table::{AluOp, Cond, IndexMode, Op, R16, R16Stack, R8};
use super::{Flag, Z80};

pub(crate) fn parity(val: u8) -> bool {
    val.count_ones() % 2 == 0
}

impl Z80 {
    pub(crate) fn execute<B: Bus + ?Sized>(&mut self, op: Op, bus: &mut B) {
        match op {
            Op::Nop => {}
            Op::Halt => {
                // PC stays on the HALT opcode until an interrupt resumes
                // execution past it.
                self.halted = true;
                self.pc = self.pc.wrapping_sub(1);
            }
            Op::Di => {
                self.iff1 = false;
                self.iff2 = false;
            }
            Op::Ei => {
                self.iff1 = true;
                self.iff2 = true;
                self.ei_delay = true;
            }

            Op::LdRR(dst, src) => {
                if dst == R8::MemHl || src == R8::MemHl {
                    // H and L stay the real registers when the other
                    // operand is the indexed memory cell.
                    let val = self.get_r8_raw(bus, src);
                    self.set_r8_raw(bus, dst, val);
                    if self.indexed() {
                        self.cycles += 8;
                    }
                } else {
                    let val = self.get_r8(bus, src);
                    self.set_r8(bus, dst, val);
                }
            }
            Op::LdRN(dst) => {
                if dst == R8::MemHl {
                    // Displacement byte precedes the immediate.
                    let addr = self.mem_operand_addr(bus);
                    let n = self.fetch_byte(bus);
                    bus.write(addr, n);
                    if self.indexed() {
                        self.cycles += 5;
                    }
                } else {
                    let n = self.fetch_byte(bus);
                    self.set_r8(bus, dst, n);
                }
            }
            Op::LdABc => self.a = bus.read(self.bc()),
            Op::LdADe => self.a = bus.read(self.de()),
            Op::LdBcA => bus.write(self.bc(), self.a),
            Op::LdDeA => bus.write(self.de(), self.a),
            Op::LdANn => {
                let addr = self.fetch_word(bus);
                self.a = bus.read(addr);
            }
            Op::LdNnA => {
                let addr = self.fetch_word(bus);
                bus.write(addr, self.a);
            }

            Op::LdRpNn(rp) => {
                let val = self.fetch_word(bus);
                self.set_rp(rp, val);
            }
            Op::LdHlInd => {
                let addr = self.fetch_word(bus);
                let val = bus.read_word(addr);
                self.set_rp(R16::Hl, val);
            }
            Op::LdIndHl => {
                let addr = self.fetch_word(bus);
                let val = self.get_rp(R16::Hl);
                bus.write_word(addr, val);
            }
            Op::LdSpHl => self.sp = self.get_rp(R16::Hl),
            Op::Push(q) => {
                let val = self.get_rp_stack(q);
                self.push(bus, val);
            }
            Op::Pop(q) => {
                let val = self.pop(bus);
                self.set_rp_stack(q, val);
            }

            Op::ExAfAf => {
                std::mem::swap(&mut self.a, &mut self.a_prime);
                std::mem::swap(&mut self.f, &mut self.f_prime);
            }
            Op::Exx => {
                std::mem::swap(&mut self.b, &mut self.b_prime);
                std::mem::swap(&mut self.c, &mut self.c_prime);
                std::mem::swap(&mut self.d, &mut self.d_prime);
                std::mem::swap(&mut self.e, &mut self.e_prime);
                std::mem::swap(&mut self.h, &mut self.h_prime);
                std::mem::swap(&mut self.l, &mut self.l_prime);
            }
            // EX DE,HL always swaps the real HL, prefix or not.
            Op::ExDeHl => {
                std::mem::swap(&mut self.d, &mut self.h);
                std::mem::swap(&mut self.e, &mut self.l);
            }
            Op::ExSpHl => {
                let mem = bus.read_word(self.sp);
                let reg = self.get_rp(R16::Hl);
                bus.write_word(self.sp, reg);
                self.set_rp(R16::Hl, mem);
            }

            Op::Alu(alu, src) => {
                let val = self.get_r8(bus, src);
                if src == R8::MemHl && self.indexed() {
                    self.cycles += 8;
                }
                self.alu_a(alu, val);
            }
            Op::AluN(alu) => {
                let val = self.fetch_byte(bus);
                self.alu_a(alu, val);
            }
            Op::IncR(r) => {
                let val = self.get_r8(bus, r);
                let result = self.inc_val(val);
                self.set_r8(bus, r, result);
                if r == R8::MemHl && self.indexed() {
                    self.cycles += 8;
                }
            }
            Op::DecR(r) => {
                let val = self.get_r8(bus, r);
                let result = self.dec_val(val);
                self.set_r8(bus, r, result);
                if r == R8::MemHl && self.indexed() {
                    self.cycles += 8;
                }
            }

            Op::IncRp(rp) => {
                let val = self.get_rp(rp).wrapping_add(1);
                self.set_rp(rp, val);
            }
            Op::DecRp(rp) => {
                let val = self.get_rp(rp).wrapping_sub(1);
                self.set_rp(rp, val);
            }
            Op::AddHlRp(rp) => {
                let lhs = self.get_rp(R16::Hl);
                let rhs = self.get_rp(rp);
                let result = self.add16(lhs, rhs);
                self.set_rp(R16::Hl, result);
            }

            Op::Rlca => {
                let carry = self.a >> 7;
                self.a = (self.a << 1) | carry;
                self.rot_a_flags(carry != 0);
            }
            Op::Rrca => {
                let carry = self.a & 0x01;
                self.a = (self.a >> 1) | (carry << 7);
                self.rot_a_flags(carry != 0);
            }
            Op::Rla => {
                let carry = self.a >> 7;
                self.a = (self.a << 1) | u8::from(self.flag(Flag::C));
                self.rot_a_flags(carry != 0);
            }
            Op::Rra => {
                let carry = self.a & 0x01;
                self.a = (self.a >> 1) | (u8::from(self.flag(Flag::C)) << 7);
                self.rot_a_flags(carry != 0);
            }
            Op::Daa => self.daa(),
            Op::Cpl => {
                self.a = !self.a;
                self.f |= Flag::H as u8 | Flag::N as u8;
                self.f &= !(Flag::X as u8 | Flag::Y as u8);
                self.f |= self.a & (Flag::X as u8 | Flag::Y as u8);
            }
            Op::Scf => {
                self.f &= Flag::S as u8 | Flag::Z as u8 | Flag::PV as u8;
                self.f |= Flag::C as u8;
                self.f |= self.a & (Flag::X as u8 | Flag::Y as u8);
            }
            Op::Ccf => {
                let old_carry = self.flag(Flag::C);
                self.f &= Flag::S as u8 | Flag::Z as u8 | Flag::PV as u8;
                if old_carry {
                    self.f |= Flag::H as u8;
                } else {
                    self.f |= Flag::C as u8;
                }
                self.f |= self.a & (Flag::X as u8 | Flag::Y as u8);
            }

            Op::JpNn => {
                let target = self.fetch_word(bus);
                self.transfer_control(bus, target);
            }
            Op::JpCc(cc) => {
                let target = self.fetch_word(bus);
                if self.cond(cc) {
                    self.transfer_control(bus, target);
                }
            }
            Op::JpHl => {
                let target = self.get_rp(R16::Hl);
                self.transfer_control(bus, target);
            }
            Op::JrE => {
                let offset = self.fetch_byte(bus) as i8;
                let target = self.pc.wrapping_add(offset as i16 as u16);
                self.transfer_control(bus, target);
            }
            Op::JrCc(cc) => {
                let offset = self.fetch_byte(bus) as i8;
                if self.cond(cc) {
                    self.cycles += 5;
                    let target = self.pc.wrapping_add(offset as i16 as u16);
                    self.transfer_control(bus, target);
                }
            }
            Op::Djnz => {
                let offset = self.fetch_byte(bus) as i8;
                self.b = self.b.wrapping_sub(1);
                if self.b != 0 {
                    self.cycles += 5;
                    let target = self.pc.wrapping_add(offset as i16 as u16);
                    self.transfer_control(bus, target);
                }
            }
            Op::CallNn => {
                let target = self.fetch_word(bus);
                self.push(bus, self.pc);
                self.transfer_control(bus, target);
            }
            Op::CallCc(cc) => {
                let target = self.fetch_word(bus);
                if self.cond(cc) {
                    self.cycles += 7;
                    self.push(bus, self.pc);
                    self.transfer_control(bus, target);
                }
            }
            Op::Ret => {
                let target = self.pop(bus);
                self.transfer_control(bus, target);
            }
            Op::RetCc(cc) => {
                if self.cond(cc) {
                    self.cycles += 6;
                    let target = self.pop(bus);
                    self.transfer_control(bus, target);
                }
            }
            Op::Rst(vector) => {
                self.push(bus, self.pc);
                self.transfer_control(bus, u16::from(vector));
            }

            Op::InAN => {
                let port = self.fetch_byte(bus);
                self.a = bus.io_read(port);
            }
            Op::OutNA => {
                let port = self.fetch_byte(bus);
                bus.io_write(port, self.a);
            }

            Op::PrefixCb => super::cb::execute(self, bus),
            Op::PrefixEd => {
                // An index prefix in front of ED has no effect.
                self.index = IndexMode::Hl;
                self.disp = None;
                super::ed::execute(self, bus);
            }
            Op::PrefixDd => {
                self.index = IndexMode::Ix;
                self.execute_prefixed(bus);
            }
            Op::PrefixFd => {
                self.index = IndexMode::Iy;
                self.execute_prefixed(bus);
            }
        }
    }

    pub(crate) fn cond(&self, cc: Cond) -> bool {
        match cc {
            Cond::Nz => !self.flag(Flag::Z),
            Cond::Z => self.flag(Flag::Z),
            Cond::Nc => !self.flag(Flag::C),
            Cond::C => self.flag(Flag::C),
            Cond::Po => !self.flag(Flag::PV),
            Cond::Pe => self.flag(Flag::PV),
            Cond::P => !self.flag(Flag::S),
            Cond::M => self.flag(Flag::S),
        }
    }

    /// 8-bit operand read with index substitution: H/L become IXH/IXL
    /// (IYH/IYL) under a prefix, (HL) becomes (IX+d)/(IY+d).
    pub(crate) fn get_r8<B: Bus + ?Sized>(&mut self, bus: &mut B, r: R8) -> u8 {
        match r {
            R8::B => self.b,
            R8::C => self.c,
            R8::D => self.d,
            R8::E => self.e,
            R8::H => match self.index {
                IndexMode::Hl => self.h,
                IndexMode::Ix => (self.ix >> 8) as u8,
                IndexMode::Iy => (self.iy >> 8) as u8,
            },
            R8::L => match self.index {
                IndexMode::Hl => self.l,
                IndexMode::Ix => self.ix as u8,
                IndexMode::Iy => self.iy as u8,
            },
            R8::MemHl => {
                let addr = self.mem_operand_addr(bus);
                bus.read(addr)
            }
            R8::A => self.a,
        }
    }

    pub(crate) fn set_r8<B: Bus + ?Sized>(&mut self, bus: &mut B, r: R8, val: u8) {
        match r {
            R8::B => self.b = val,
            R8::C => self.c = val,
            R8::D => self.d = val,
            R8::E => self.e = val,
            R8::H => match self.index {
                IndexMode::Hl => self.h = val,
                IndexMode::Ix => self.ix = (self.ix & 0x00FF) | (u16::from(val) << 8),
                IndexMode::Iy => self.iy = (self.iy & 0x00FF) | (u16::from(val) << 8),
            },
            R8::L => match self.index {
                IndexMode::Hl => self.l = val,
                IndexMode::Ix => self.ix = (self.ix & 0xFF00) | u16::from(val),
                IndexMode::Iy => self.iy = (self.iy & 0xFF00) | u16::from(val),
            },
            R8::MemHl => {
                let addr = self.mem_operand_addr(bus);
                bus.write(addr, val);
            }
            R8::A => self.a = val,
        }
    }

    /// Like `get_r8`, but H/L are never substituted. Used by LD variants
    /// that pair a plain register with the indexed memory operand.
    pub(crate) fn get_r8_raw<B: Bus + ?Sized>(&mut self, bus: &mut B, r: R8) -> u8 {
        match r {
            R8::H => self.h,
            R8::L => self.l,
            _ => self.get_r8(bus, r),
        }
    }

    pub(crate) fn set_r8_raw<B: Bus + ?Sized>(&mut self, bus: &mut B, r: R8, val: u8) {
        match r {
            R8::H => self.h = val,
            R8::L => self.l = val,
            _ => self.set_r8(bus, r, val),
        }
    }

    pub(crate) fn get_rp(&self, rp: R16) -> u16 {
        match rp {
            R16::Bc => self.bc(),
            R16::De => self.de(),
            R16::Hl => match self.index {
                IndexMode::Hl => self.hl(),
                IndexMode::Ix => self.ix,
                IndexMode::Iy => self.iy,
            },
            R16::Sp => self.sp,
        }
    }

    pub(crate) fn set_rp(&mut self, rp: R16, val: u16) {
        match rp {
            R16::Bc => self.set_bc(val),
            R16::De => self.set_de(val),
            R16::Hl => match self.index {
                IndexMode::Hl => self.set_hl(val),
                IndexMode::Ix => self.ix = val,
                IndexMode::Iy => self.iy = val,
            },
            R16::Sp => self.sp = val,
        }
    }

    fn get_rp_stack(&self, rp: R16Stack) -> u16 {
        match rp {
            R16Stack::Bc => self.bc(),
            R16Stack::De => self.de(),
            R16Stack::Hl => self.get_rp(R16::Hl),
            R16Stack::Af => self.af(),
        }
    }

    fn set_rp_stack(&mut self, rp: R16Stack, val: u16) {
        match rp {
            R16Stack::Bc => self.set_bc(val),
            R16Stack::De => self.set_de(val),
            R16Stack::Hl => self.set_rp(R16::Hl, val),
            R16Stack::Af => self.set_af(val),
        }
    }

    fn alu_a(&mut self, op: AluOp, val: u8) {
        match op {
            AluOp::Add => self.add_a(val, false),
            AluOp::Adc => {
                let carry = self.flag(Flag::C);
                self.add_a(val, carry);
            }
            AluOp::Sub => self.sub_a(val, false),
            AluOp::Sbc => {
                let carry = self.flag(Flag::C);
                self.sub_a(val, carry);
            }
            AluOp::And => {
                self.a &= val;
                self.logic_flags(self.a, true);
            }
            AluOp::Xor => {
                self.a ^= val;
                self.logic_flags(self.a, false);
            }
            AluOp::Or => {
                self.a |= val;
                self.logic_flags(self.a, false);
            }
            AluOp::Cp => self.cp_a(val),
        }
    }

    pub(crate) fn add_a(&mut self, val: u8, carry_in: bool) {
        let carry = u8::from(carry_in);
        let a = self.a;
        let result = a.wrapping_add(val).wrapping_add(carry);
        let mut f = 0;
        if result == 0 {
            f |= Flag::Z as u8;
        }
        f |= result & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
        if u16::from(a) + u16::from(val) + u16::from(carry) > 0xFF {
            f |= Flag::C as u8;
        }
        if (a & 0x0F) + (val & 0x0F) + carry > 0x0F {
            f |= Flag::H as u8;
        }
        if (a ^ result) & (val ^ result) & 0x80 != 0 {
            f |= Flag::PV as u8;
        }
        self.a = result;
        self.f = f;
    }

    fn sub_flags(&mut self, val: u8, carry_in: bool) -> u8 {
        let carry = u8::from(carry_in);
        let a = self.a;
        let result = a.wrapping_sub(val).wrapping_sub(carry);
        let mut f = Flag::N as u8;
        if result == 0 {
            f |= Flag::Z as u8;
        }
        f |= result & Flag::S as u8;
        if u16::from(a) < u16::from(val) + u16::from(carry) {
            f |= Flag::C as u8;
        }
        if (a & 0x0F) < (val & 0x0F) + carry {
            f |= Flag::H as u8;
        }
        if (a ^ val) & (a ^ result) & 0x80 != 0 {
            f |= Flag::PV as u8;
        }
        self.f = f;
        result
    }

    pub(crate) fn sub_a(&mut self, val: u8, carry_in: bool) {
        let result = self.sub_flags(val, carry_in);
        self.f |= result & (Flag::X as u8 | Flag::Y as u8);
        self.a = result;
    }

    /// CP is a subtract that discards the result; the copy bits come from
    /// the operand, not the difference.
    pub(crate) fn cp_a(&mut self, val: u8) {
        let _ = self.sub_flags(val, false);
        self.f |= val & (Flag::X as u8 | Flag::Y as u8);
    }

    pub(crate) fn logic_flags(&mut self, result: u8, is_and: bool) {
        let mut f = 0;
        if result == 0 {
            f |= Flag::Z as u8;
        }
        f |= result & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
        if is_and {
            f |= Flag::H as u8;
        }
        if parity(result) {
            f |= Flag::PV as u8;
        }
        self.f = f;
    }

    pub(crate) fn inc_val(&mut self, val: u8) -> u8 {
        let result = val.wrapping_add(1);
        let mut f = self.f & Flag::C as u8;
        if result == 0 {
            f |= Flag::Z as u8;
        }
        f |= result & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
        if val & 0x0F == 0x0F {
            f |= Flag::H as u8;
        }
        if val == 0x7F {
            f |= Flag::PV as u8;
        }
        self.f = f;
        result
    }

    pub(crate) fn dec_val(&mut self, val: u8) -> u8 {
        let result = val.wrapping_sub(1);
        let mut f = (self.f & Flag::C as u8) | Flag::N as u8;
        if result == 0 {
            f |= Flag::Z as u8;
        }
        f |= result & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
        if val & 0x0F == 0 {
            f |= Flag::H as u8;
        }
        if val == 0x80 {
            f |= Flag::PV as u8;
        }
        self.f = f;
        result
    }

    /// 16-bit add for ADD HL,rp: only C, H, N and the copy bits change.
    pub(crate) fn add16(&mut self, lhs: u16, rhs: u16) -> u16 {
        let result = lhs.wrapping_add(rhs);
        let mut f = self.f & (Flag::S as u8 | Flag::Z as u8 | Flag::PV as u8);
        if u32::from(lhs) + u32::from(rhs) > 0xFFFF {
            f |= Flag::C as u8;
        }
        if (lhs & 0x0FFF) + (rhs & 0x0FFF) > 0x0FFF {
            f |= Flag::H as u8;
        }
        f |= ((result >> 8) as u8) & (Flag::X as u8 | Flag::Y as u8);
        self.f = f;
        result
    }

    /// Accumulator rotate flags: S, Z and P/V survive; the copy bits track
    /// the rotated accumulator.
    fn rot_a_flags(&mut self, carry: bool) {
        self.f &= Flag::S as u8 | Flag::Z as u8 | Flag::PV as u8;
        if carry {
            self.f |= Flag::C as u8;
        }
        self.f |= self.a & (Flag::X as u8 | Flag::Y as u8);
    }

    fn daa(&mut self) {
        let a = self.a;
        let n = self.flag(Flag::N);
        let mut correction = 0u8;
        let mut carry = self.flag(Flag::C);
        if self.flag(Flag::H) || (!n && a & 0x0F > 0x09) {
            correction |= 0x06;
        }
        if carry || a > 0x99 {
            correction |= 0x60;
            carry = true;
        }
        let result = if n {
            a.wrapping_sub(correction)
        } else {
            a.wrapping_add(correction)
        };
        let mut f = self.f & Flag::N as u8;
        if carry {
            f |= Flag::C as u8;
        }
        f |= (a ^ result) & Flag::H as u8;
        if result == 0 {
            f |= Flag::Z as u8;
        }
        f |= result & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
        if parity(result) {
            f |= Flag::PV as u8;
        }
        self.a = result;
        self.f = f;
    }
}
