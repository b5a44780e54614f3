//! Dense opcode descriptor table for the base (unprefixed) instruction set.
//!
//! Each entry pairs an operation tag with its base cycle cost. Conditional
//! instructions carry the not-taken cost; the executor adds the taken
//! surcharge. Prefix entries carry only the prefix fetch cost (DD/FD) or
//! zero (CB/ED, whose handlers charge full documented totals).

/// Active index-register substitution, set by a DD/FD prefix for the
/// remainder of the current instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IndexMode {
    Hl,
    Ix,
    Iy,
}

/// 8-bit operand in the standard r encoding. `MemHl` is the (HL) memory
/// operand, which a DD/FD prefix turns into (IX+d)/(IY+d).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum R8 {
    B,
    C,
    D,
    E,
    H,
    L,
    MemHl,
    A,
}

/// 16-bit register pair in the dd/ss encoding. `Hl` follows the active
/// index mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum R16 {
    Bc,
    De,
    Hl,
    Sp,
}

/// 16-bit register pair in the qq (PUSH/POP) encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum R16Stack {
    Bc,
    De,
    Hl,
    Af,
}

/// Condition code in the cc encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cond {
    Nz,
    Z,
    Nc,
    C,
    Po,
    Pe,
    P,
    M,
}

/// The eight accumulator ALU operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Nop,
    Halt,
    Di,
    Ei,

    // 8-bit loads
    LdRR(R8, R8),
    LdRN(R8),
    LdABc,
    LdADe,
    LdBcA,
    LdDeA,
    LdANn,
    LdNnA,

    // 16-bit loads
    LdRpNn(R16),
    LdHlInd,
    LdIndHl,
    LdSpHl,
    Push(R16Stack),
    Pop(R16Stack),

    // Exchanges
    ExAfAf,
    Exx,
    ExDeHl,
    ExSpHl,

    // 8-bit arithmetic & logic
    Alu(AluOp, R8),
    AluN(AluOp),
    IncR(R8),
    DecR(R8),

    // 16-bit arithmetic
    IncRp(R16),
    DecRp(R16),
    AddHlRp(R16),

    // Accumulator rotates & flag ops
    Rlca,
    Rrca,
    Rla,
    Rra,
    Daa,
    Cpl,
    Scf,
    Ccf,

    // Control transfer
    JpNn,
    JpCc(Cond),
    JpHl,
    JrE,
    JrCc(Cond),
    Djnz,
    CallNn,
    CallCc(Cond),
    Ret,
    RetCc(Cond),
    Rst(u8),

    // I/O
    InAN,
    OutNA,

    // Prefixes
    PrefixCb,
    PrefixEd,
    PrefixDd,
    PrefixFd,
}

#[derive(Copy, Clone, Debug)]
pub struct Instr {
    pub op: Op,
    pub cycles: u8,
}

const fn i(op: Op, cycles: u8) -> Instr {
    Instr { op, cycles }
}

use AluOp::*;
use Cond::*;
use Op::*;
use R16 as P;
use R16Stack as Q;
use R8::*;
// `C` is both a register and a condition; the explicit import makes bare
// `C` mean the register, and condition sites spell `Cond::C`.
use R8::C;

#[rustfmt::skip]
pub static OPCODES: [Instr; 256] = [
    // 0x00
    i(Nop, 4),            i(LdRpNn(P::Bc), 10), i(LdBcA, 7),          i(IncRp(P::Bc), 6),
    i(IncR(B), 4),        i(DecR(B), 4),        i(LdRN(B), 7),        i(Rlca, 4),
    i(ExAfAf, 4),         i(AddHlRp(P::Bc), 11),i(LdABc, 7),          i(DecRp(P::Bc), 6),
    i(IncR(C), 4),        i(DecR(C), 4),        i(LdRN(C), 7),        i(Rrca, 4),
    // 0x10
    i(Djnz, 8),           i(LdRpNn(P::De), 10), i(LdDeA, 7),          i(IncRp(P::De), 6),
    i(IncR(D), 4),        i(DecR(D), 4),        i(LdRN(D), 7),        i(Rla, 4),
    i(JrE, 12),           i(AddHlRp(P::De), 11),i(LdADe, 7),          i(DecRp(P::De), 6),
    i(IncR(E), 4),        i(DecR(E), 4),        i(LdRN(E), 7),        i(Rra, 4),
    // 0x20
    i(JrCc(Nz), 7),       i(LdRpNn(P::Hl), 10), i(LdIndHl, 16),       i(IncRp(P::Hl), 6),
    i(IncR(H), 4),        i(DecR(H), 4),        i(LdRN(H), 7),        i(Daa, 4),
    i(JrCc(Z), 7),        i(AddHlRp(P::Hl), 11),i(LdHlInd, 16),       i(DecRp(P::Hl), 6),
    i(IncR(L), 4),        i(DecR(L), 4),        i(LdRN(L), 7),        i(Cpl, 4),
    // 0x30
    i(JrCc(Nc), 7),       i(LdRpNn(P::Sp), 10), i(LdNnA, 13),         i(IncRp(P::Sp), 6),
    i(IncR(MemHl), 11),   i(DecR(MemHl), 11),   i(LdRN(MemHl), 10),   i(Scf, 4),
    i(JrCc(Cond::C), 7),  i(AddHlRp(P::Sp), 11),i(LdANn, 13),         i(DecRp(P::Sp), 6),
    i(IncR(A), 4),        i(DecR(A), 4),        i(LdRN(A), 7),        i(Ccf, 4),
    // 0x40
    i(LdRR(B, B), 4),     i(LdRR(B, C), 4),     i(LdRR(B, D), 4),     i(LdRR(B, E), 4),
    i(LdRR(B, H), 4),     i(LdRR(B, L), 4),     i(LdRR(B, MemHl), 7), i(LdRR(B, A), 4),
    i(LdRR(C, B), 4),     i(LdRR(C, C), 4),     i(LdRR(C, D), 4),     i(LdRR(C, E), 4),
    i(LdRR(C, H), 4),     i(LdRR(C, L), 4),     i(LdRR(C, MemHl), 7), i(LdRR(C, A), 4),
    // 0x50
    i(LdRR(D, B), 4),     i(LdRR(D, C), 4),     i(LdRR(D, D), 4),     i(LdRR(D, E), 4),
    i(LdRR(D, H), 4),     i(LdRR(D, L), 4),     i(LdRR(D, MemHl), 7), i(LdRR(D, A), 4),
    i(LdRR(E, B), 4),     i(LdRR(E, C), 4),     i(LdRR(E, D), 4),     i(LdRR(E, E), 4),
    i(LdRR(E, H), 4),     i(LdRR(E, L), 4),     i(LdRR(E, MemHl), 7), i(LdRR(E, A), 4),
    // 0x60
    i(LdRR(H, B), 4),     i(LdRR(H, C), 4),     i(LdRR(H, D), 4),     i(LdRR(H, E), 4),
    i(LdRR(H, H), 4),     i(LdRR(H, L), 4),     i(LdRR(H, MemHl), 7), i(LdRR(H, A), 4),
    i(LdRR(L, B), 4),     i(LdRR(L, C), 4),     i(LdRR(L, D), 4),     i(LdRR(L, E), 4),
    i(LdRR(L, H), 4),     i(LdRR(L, L), 4),     i(LdRR(L, MemHl), 7), i(LdRR(L, A), 4),
    // 0x70
    i(LdRR(MemHl, B), 7), i(LdRR(MemHl, C), 7), i(LdRR(MemHl, D), 7), i(LdRR(MemHl, E), 7),
    i(LdRR(MemHl, H), 7), i(LdRR(MemHl, L), 7), i(Halt, 4),           i(LdRR(MemHl, A), 7),
    i(LdRR(A, B), 4),     i(LdRR(A, C), 4),     i(LdRR(A, D), 4),     i(LdRR(A, E), 4),
    i(LdRR(A, H), 4),     i(LdRR(A, L), 4),     i(LdRR(A, MemHl), 7), i(LdRR(A, A), 4),
    // 0x80
    i(Alu(Add, B), 4),    i(Alu(Add, C), 4),    i(Alu(Add, D), 4),    i(Alu(Add, E), 4),
    i(Alu(Add, H), 4),    i(Alu(Add, L), 4),    i(Alu(Add, MemHl), 7),i(Alu(Add, A), 4),
    i(Alu(Adc, B), 4),    i(Alu(Adc, C), 4),    i(Alu(Adc, D), 4),    i(Alu(Adc, E), 4),
    i(Alu(Adc, H), 4),    i(Alu(Adc, L), 4),    i(Alu(Adc, MemHl), 7),i(Alu(Adc, A), 4),
    // 0x90
    i(Alu(Sub, B), 4),    i(Alu(Sub, C), 4),    i(Alu(Sub, D), 4),    i(Alu(Sub, E), 4),
    i(Alu(Sub, H), 4),    i(Alu(Sub, L), 4),    i(Alu(Sub, MemHl), 7),i(Alu(Sub, A), 4),
    i(Alu(Sbc, B), 4),    i(Alu(Sbc, C), 4),    i(Alu(Sbc, D), 4),    i(Alu(Sbc, E), 4),
    i(Alu(Sbc, H), 4),    i(Alu(Sbc, L), 4),    i(Alu(Sbc, MemHl), 7),i(Alu(Sbc, A), 4),
    // 0xA0
    i(Alu(And, B), 4),    i(Alu(And, C), 4),    i(Alu(And, D), 4),    i(Alu(And, E), 4),
    i(Alu(And, H), 4),    i(Alu(And, L), 4),    i(Alu(And, MemHl), 7),i(Alu(And, A), 4),
    i(Alu(Xor, B), 4),    i(Alu(Xor, C), 4),    i(Alu(Xor, D), 4),    i(Alu(Xor, E), 4),
    i(Alu(Xor, H), 4),    i(Alu(Xor, L), 4),    i(Alu(Xor, MemHl), 7),i(Alu(Xor, A), 4),
    // 0xB0
    i(Alu(Or, B), 4),     i(Alu(Or, C), 4),     i(Alu(Or, D), 4),     i(Alu(Or, E), 4),
    i(Alu(Or, H), 4),     i(Alu(Or, L), 4),     i(Alu(Or, MemHl), 7), i(Alu(Or, A), 4),
    i(Alu(Cp, B), 4),     i(Alu(Cp, C), 4),     i(Alu(Cp, D), 4),     i(Alu(Cp, E), 4),
    i(Alu(Cp, H), 4),     i(Alu(Cp, L), 4),     i(Alu(Cp, MemHl), 7), i(Alu(Cp, A), 4),
    // 0xC0
    i(RetCc(Nz), 5),      i(Pop(Q::Bc), 10),    i(JpCc(Nz), 10),      i(JpNn, 10),
    i(CallCc(Nz), 10),    i(Push(Q::Bc), 11),   i(AluN(Add), 7),      i(Rst(0x00), 11),
    i(RetCc(Z), 5),       i(Ret, 10),           i(JpCc(Z), 10),       i(PrefixCb, 0),
    i(CallCc(Z), 10),     i(CallNn, 17),        i(AluN(Adc), 7),      i(Rst(0x08), 11),
    // 0xD0
    i(RetCc(Nc), 5),      i(Pop(Q::De), 10),    i(JpCc(Nc), 10),      i(OutNA, 11),
    i(CallCc(Nc), 10),    i(Push(Q::De), 11),   i(AluN(Sub), 7),      i(Rst(0x10), 11),
    i(RetCc(Cond::C), 5), i(Exx, 4),            i(JpCc(Cond::C), 10), i(InAN, 11),
    i(CallCc(Cond::C), 10),i(PrefixDd, 4),       i(AluN(Sbc), 7),      i(Rst(0x18), 11),
    // 0xE0
    i(RetCc(Po), 5),      i(Pop(Q::Hl), 10),    i(JpCc(Po), 10),      i(ExSpHl, 19),
    i(CallCc(Po), 10),    i(Push(Q::Hl), 11),   i(AluN(And), 7),      i(Rst(0x20), 11),
    i(RetCc(Pe), 5),      i(JpHl, 4),           i(JpCc(Pe), 10),      i(ExDeHl, 4),
    i(CallCc(Pe), 10),    i(PrefixEd, 0),       i(AluN(Xor), 7),      i(Rst(0x28), 11),
    // 0xF0
    i(RetCc(P), 5),       i(Pop(Q::Af), 10),    i(JpCc(P), 10),       i(Di, 4),
    i(CallCc(P), 10),     i(Push(Q::Af), 11),   i(AluN(Or), 7),       i(Rst(0x30), 11),
    i(RetCc(M), 5),       i(LdSpHl, 6),         i(JpCc(M), 10),       i(Ei, 4),
    i(CallCc(M), 10),     i(PrefixFd, 4),       i(AluN(Cp), 7),       i(Rst(0x38), 11),
];
