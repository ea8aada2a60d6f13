//! Opcode dispatch.
//!
//! Decoding is two table lookups: the top nibble picks an entry in `CLASSES`;
//! the classes that pack several instructions (0, 8, E, F) then look up their
//! sub-opcode in a second table. Each handler mutates the machine and says
//! where the program counter goes next.

use log::warn;

use super::{
    error::MachineError,
    memory::GLYPH_SIZE,
    opcode::Opcode,
    registers::VF,
    Interpreter,
};

/// What happens to PC once a handler returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Next,
    Skip,
    Jump(u16),
    /// Re-run the same instruction on the next cycle.
    Wait,
}

impl Flow {
    fn skip_if(cond: bool) -> Flow {
        if cond {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

type Handler = fn(&mut Interpreter, Opcode) -> Result<Flow, MachineError>;

const CLASSES: [Handler; 16] = [
    system, jp, call, se_byte, sne_byte, se_reg, ld_byte, add_byte, alu, sne_reg, ld_i, jp_v0,
    rnd, drw, keys, misc,
];

const ALU: [Handler; 16] = [
    ld_reg, or, and, xor, add_reg, sub, shr, subn, unknown, unknown, unknown, unknown, unknown,
    unknown, shl, unknown,
];

const SYSTEM: &[(u16, Handler)] = &[(0x0E0, cls), (0x0EE, ret)];

const KEYS: &[(u8, Handler)] = &[(0x9E, skp), (0xA1, sknp)];

const MISC: &[(u8, Handler)] = &[
    (0x07, ld_vx_dt),
    (0x0A, ld_vx_k),
    (0x15, ld_dt_vx),
    (0x18, ld_st_vx),
    (0x1E, add_i),
    (0x29, ld_f),
    (0x33, ld_b),
    (0x55, ld_mem_vx),
    (0x65, ld_vx_mem),
];

pub(crate) fn execute(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    CLASSES[op.class() as usize](vm, op)
}

fn lookup<K: PartialEq>(table: &[(K, Handler)], key: K) -> Handler {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|&(_, handler)| handler)
        .unwrap_or(unknown)
}

fn unknown(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    warn!("UNKNOWN OPCODE {:?} at {:#05X}", op, vm.registers.pc);
    Ok(Flow::Next)
}

// 0NNN: 00E0 and 00EE; machine-code routines are not supported.
fn system(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    lookup(SYSTEM, op.nnn())(vm, op)
}

fn alu(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    ALU[op.n() as usize](vm, op)
}

fn keys(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    lookup(KEYS, op.nn())(vm, op)
}

fn misc(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    lookup(MISC, op.nn())(vm, op)
}

// 00E0
fn cls(vm: &mut Interpreter, _op: Opcode) -> Result<Flow, MachineError> {
    vm.display.clear();
    Ok(Flow::Next)
}

// 00EE: back to the call site, then past it.
fn ret(vm: &mut Interpreter, _op: Opcode) -> Result<Flow, MachineError> {
    let addr = vm.stack.pop()?;
    Ok(Flow::Jump(addr.wrapping_add(2)))
}

// 1NNN
fn jp(_vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    Ok(Flow::Jump(op.nnn()))
}

// 2NNN: the stack holds the address of the call itself.
fn call(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    vm.stack.push(vm.registers.pc, op.nnn())?;
    Ok(Flow::Jump(op.nnn()))
}

// 3XNN
fn se_byte(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    Ok(Flow::skip_if(vm.registers.v[op.x()] == op.nn()))
}

// 4XNN
fn sne_byte(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    Ok(Flow::skip_if(vm.registers.v[op.x()] != op.nn()))
}

// 5XY0
fn se_reg(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    if op.n() != 0 {
        return unknown(vm, op);
    }
    let v = &vm.registers.v;
    Ok(Flow::skip_if(v[op.x()] == v[op.y()]))
}

// 6XNN
fn ld_byte(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    vm.registers.v[op.x()] = op.nn();
    Ok(Flow::Next)
}

// 7XNN: no carry flag.
fn add_byte(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let v = &mut vm.registers.v;
    v[op.x()] = v[op.x()].wrapping_add(op.nn());
    Ok(Flow::Next)
}

// 8XY0
fn ld_reg(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let v = &mut vm.registers.v;
    v[op.x()] = v[op.y()];
    Ok(Flow::Next)
}

// 8XY1
fn or(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let v = &mut vm.registers.v;
    v[op.x()] |= v[op.y()];
    Ok(Flow::Next)
}

// 8XY2
fn and(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let v = &mut vm.registers.v;
    v[op.x()] &= v[op.y()];
    Ok(Flow::Next)
}

// 8XY3
fn xor(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let v = &mut vm.registers.v;
    v[op.x()] ^= v[op.y()];
    Ok(Flow::Next)
}

// The 8XY4-8XYE group writes VF before the result, so with X or Y = F the
// arithmetic sees the new flag.

// 8XY4
fn add_reg(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let (vx, vy) = (vm.registers.v[op.x()], vm.registers.v[op.y()]);
    vm.registers.set_flag(vx.checked_add(vy).is_none());
    let v = &mut vm.registers.v;
    v[op.x()] = v[op.x()].wrapping_add(v[op.y()]);
    Ok(Flow::Next)
}

// 8XY5: VF = NOT borrow.
fn sub(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let (vx, vy) = (vm.registers.v[op.x()], vm.registers.v[op.y()]);
    vm.registers.set_flag(vy <= vx);
    let v = &mut vm.registers.v;
    v[op.x()] = v[op.x()].wrapping_sub(v[op.y()]);
    Ok(Flow::Next)
}

// 8XY6: shifts VX in place; VY is ignored.
fn shr(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let v = &mut vm.registers.v;
    v[VF] = v[op.x()] & 0x1;
    v[op.x()] >>= 1;
    Ok(Flow::Next)
}

// 8XY7: VF = NOT borrow.
fn subn(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let (vx, vy) = (vm.registers.v[op.x()], vm.registers.v[op.y()]);
    vm.registers.set_flag(vx <= vy);
    let v = &mut vm.registers.v;
    v[op.x()] = v[op.y()].wrapping_sub(v[op.x()]);
    Ok(Flow::Next)
}

// 8XYE
fn shl(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let v = &mut vm.registers.v;
    v[VF] = v[op.x()] >> 7;
    v[op.x()] <<= 1;
    Ok(Flow::Next)
}

// 9XY0
fn sne_reg(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    if op.n() != 0 {
        return unknown(vm, op);
    }
    let v = &vm.registers.v;
    Ok(Flow::skip_if(v[op.x()] != v[op.y()]))
}

// ANNN
fn ld_i(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    vm.registers.i = op.nnn();
    Ok(Flow::Next)
}

// BNNN
fn jp_v0(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    Ok(Flow::Jump(op.nnn() + vm.registers.v[0] as u16))
}

// CXNN
fn rnd(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    vm.registers.v[op.x()] = vm.random_byte() & op.nn();
    Ok(Flow::Next)
}

// DXYN: N rows from I, XORed at (VX, VY). VF is cleared before the
// coordinates are read.
fn drw(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let sprite = vm
        .memory
        .slice(vm.registers.i as usize, op.n() as usize)?;

    vm.registers.v[VF] = 0;
    let x = vm.registers.v[op.x()] as usize;
    let y = vm.registers.v[op.y()] as usize;

    let mut collision = false;
    for (row, &bits) in sprite.iter().enumerate() {
        collision |= vm.display.draw_row(x, y + row, bits);
    }
    vm.registers.set_flag(collision);
    vm.display.touch();
    Ok(Flow::Next)
}

// EX9E
fn skp(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let pressed = vm.keypad.is_pressed(vm.registers.v[op.x()])?;
    Ok(Flow::skip_if(pressed))
}

// EXA1
fn sknp(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let pressed = vm.keypad.is_pressed(vm.registers.v[op.x()])?;
    Ok(Flow::skip_if(!pressed))
}

// FX07
fn ld_vx_dt(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    vm.registers.v[op.x()] = vm.timers.delay;
    Ok(Flow::Next)
}

// FX0A: polls; PC stays put until a key is down.
fn ld_vx_k(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    match vm.keypad.first_pressed() {
        Some(key) => {
            vm.registers.v[op.x()] = key;
            Ok(Flow::Next)
        }
        None => Ok(Flow::Wait),
    }
}

// FX15
fn ld_dt_vx(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    vm.timers.delay = vm.registers.v[op.x()];
    Ok(Flow::Next)
}

// FX18
fn ld_st_vx(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    vm.timers.sound = vm.registers.v[op.x()];
    Ok(Flow::Next)
}

// FX1E: no overflow flag.
fn add_i(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let r = &mut vm.registers;
    r.i = r.i.wrapping_add(r.v[op.x()] as u16);
    Ok(Flow::Next)
}

// FX29
fn ld_f(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    vm.registers.i = vm.registers.v[op.x()] as u16 * GLYPH_SIZE;
    Ok(Flow::Next)
}

// FX33
fn ld_b(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let value = vm.registers.v[op.x()];
    let digits = vm.memory.slice_mut(vm.registers.i as usize, 3)?;
    digits.copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
    Ok(Flow::Next)
}

// FX55
fn ld_mem_vx(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let count = op.x() + 1;
    vm.memory
        .slice_mut(vm.registers.i as usize, count)?
        .copy_from_slice(&vm.registers.v[..count]);
    advance_index(vm, count);
    Ok(Flow::Next)
}

// FX65
fn ld_vx_mem(vm: &mut Interpreter, op: Opcode) -> Result<Flow, MachineError> {
    let count = op.x() + 1;
    let src = vm.memory.slice(vm.registers.i as usize, count)?;
    vm.registers.v[..count].copy_from_slice(src);
    advance_index(vm, count);
    Ok(Flow::Next)
}

fn advance_index(vm: &mut Interpreter, count: usize) {
    if vm.quirks.load_store_increments_index {
        vm.registers.i = vm.registers.i.wrapping_add(count as u16);
    }
}
