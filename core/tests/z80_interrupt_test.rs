use marquee_core::core::IrqController;
use marquee_core::cpu::Z80;
mod common;
use common::TestBus;

fn step(cpu: &mut Z80, bus: &mut TestBus, irq: &mut IrqController) -> u64 {
    let before = cpu.cycles;
    cpu.step_instruction(bus, irq);
    cpu.cycles - before
}

// --- Mode 1 acceptance ---

#[test]
fn test_im1_acceptance() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    let mut irq = IrqController::new();
    cpu.pc = 0x0100;
    cpu.sp = 0x8000;
    cpu.im = 1;
    cpu.iff1 = true;
    cpu.iff2 = true;
    irq.request(cpu.iff1);

    let cycles = step(&mut cpu, &mut bus, &mut irq);
    assert_eq!(cycles, 13, "mode 1 acceptance should be 13 T-states");
    assert_eq!(cpu.pc, 0x0038, "mode 1 enters at 0038h");
    assert_eq!(cpu.sp, 0x7FFE);
    assert_eq!(bus.memory[0x7FFE], 0x00, "pushed PC low byte");
    assert_eq!(bus.memory[0x7FFF], 0x01, "pushed PC high byte");
    assert!(!cpu.iff1, "acceptance clears IFF1");
    assert!(!cpu.iff2, "acceptance clears IFF2");
    assert!(!irq.pending(), "the request is consumed");
}

#[test]
fn test_im0_acceptance_cost() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    let mut irq = IrqController::new();
    cpu.pc = 0x0100;
    cpu.sp = 0x8000;
    cpu.im = 0;
    cpu.iff1 = true;
    irq.request(true);

    let cycles = step(&mut cpu, &mut bus, &mut irq);
    assert_eq!(cycles, 11, "mode 0 acceptance should be 11 T-states");
    assert_eq!(cpu.pc, 0x0038, "the board drives RST 38h in mode 0");
}

// --- Mode 2 vector fetch ---

#[test]
fn test_im2_vector_fetch() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    let mut irq = IrqController::new();
    cpu.pc = 0x0200;
    cpu.sp = 0x8000;
    cpu.im = 2;
    cpu.i = 0x3F;
    cpu.iff1 = true;
    // Vector table entry at 3FFFh.
    bus.memory[0x3FFF] = 0x00;
    bus.memory[0x4000] = 0x12;
    irq.request(true);

    let cycles = step(&mut cpu, &mut bus, &mut irq);
    assert_eq!(cycles, 19, "mode 2 acceptance should be 19 T-states");
    assert_eq!(cpu.pc, 0x1200, "PC loads the fetched vector");
    assert_eq!(bus.memory[0x7FFE], 0x00);
    assert_eq!(bus.memory[0x7FFF], 0x02);
}

// --- Masking ---

#[test]
fn test_request_while_masked_is_dropped() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    let mut irq = IrqController::new();
    cpu.pc = 0x0100;
    cpu.iff1 = false;
    bus.load(0x0100, &[0x00]); // NOP
    irq.request(cpu.iff1);

    step(&mut cpu, &mut bus, &mut irq);
    assert_eq!(cpu.pc, 0x0101, "no interrupt, plain execution");
    assert!(!irq.pending(), "the masked request was never latched");
}

#[test]
fn test_pending_waits_for_iff1() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    let mut irq = IrqController::new();
    cpu.pc = 0x0100;
    cpu.sp = 0x8000;
    cpu.im = 1;
    cpu.iff1 = true;
    irq.request(true);
    cpu.iff1 = false; // disabled again before the boundary

    bus.load(0x0100, &[0x00, 0xFB, 0x00]); // NOP; EI; NOP
    step(&mut cpu, &mut bus, &mut irq);
    assert_eq!(cpu.pc, 0x0101, "pending but masked: not serviced");
    assert!(irq.pending(), "the latched request stays pending");

    step(&mut cpu, &mut bus, &mut irq); // EI
    step(&mut cpu, &mut bus, &mut irq); // shielded NOP
    let cycles = step(&mut cpu, &mut bus, &mut irq);
    assert_eq!(cycles, 13);
    assert_eq!(cpu.pc, 0x0038, "serviced once IFF1 re-arms");
}

// --- EI delay ---

#[test]
fn test_ei_shields_one_instruction() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    let mut irq = IrqController::new();
    cpu.pc = 0x0100;
    cpu.sp = 0x8000;
    cpu.im = 1;
    bus.load(0x0100, &[0xFB, 0xC9]); // EI; RET
    bus.memory[0x8000] = 0x00;
    bus.memory[0x8001] = 0x20;

    step(&mut cpu, &mut bus, &mut irq); // EI
    irq.request(cpu.iff1);

    // The instruction after EI must run before the interrupt is taken,
    // so a RET guarding an interrupt-enable epilogue completes first.
    step(&mut cpu, &mut bus, &mut irq);
    assert_eq!(cpu.pc, 0x2000, "RET ran despite the pending request");

    let cycles = step(&mut cpu, &mut bus, &mut irq);
    assert_eq!(cycles, 13);
    assert_eq!(cpu.pc, 0x0038, "interrupt lands after the shield");
}

// --- HALT interaction ---

#[test]
fn test_interrupt_wakes_halted_cpu() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    let mut irq = IrqController::new();
    cpu.pc = 0x0100;
    cpu.sp = 0x8000;
    cpu.im = 1;
    cpu.iff1 = true;
    cpu.iff2 = true;
    bus.load(0x0100, &[0x76]); // HALT

    step(&mut cpu, &mut bus, &mut irq);
    assert!(cpu.halted);
    assert_eq!(cpu.pc, 0x0100);

    irq.request(cpu.iff1);
    step(&mut cpu, &mut bus, &mut irq);
    assert!(!cpu.halted, "acceptance resumes the CPU");
    assert_eq!(cpu.pc, 0x0038);
    assert_eq!(
        bus.memory[0x7FFE], 0x01,
        "the pushed resume address is past the HALT opcode"
    );
    assert_eq!(bus.memory[0x7FFF], 0x01);
}

#[test]
fn test_halted_cpu_with_di_stays_halted() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    let mut irq = IrqController::new();
    cpu.pc = 0x0100;
    bus.load(0x0100, &[0xF3, 0x76]); // DI; HALT

    step(&mut cpu, &mut bus, &mut irq);
    step(&mut cpu, &mut bus, &mut irq);
    assert!(cpu.halted);

    irq.request(cpu.iff1); // dropped: latch is clear
    for _ in 0..10 {
        step(&mut cpu, &mut bus, &mut irq);
    }
    assert!(cpu.halted, "nothing can wake a DI'd HALT");
    assert_eq!(cpu.pc, 0x0101);
}
