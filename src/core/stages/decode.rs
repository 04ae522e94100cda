//! Instruction decode: builds the control-signal vocabulary for one
//! instruction, reads its source operands out of the register file, and
//! detects the load-use hazard.

use crate::core::pipeline::hazards::need_stall_load_use;
use crate::core::pipeline::latches::IdExLatch;
use crate::core::pipeline::signals::{
    AluOp, BranchType, ControlSignals, HaltKind, InstCategory, MemWidth, OpASrc, OpBSrc,
};
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::{Cpu, ExOutcome};
use crate::isa::decoder::Decoded;
use crate::isa::{decode as decode_bits, opcodes::*};

/// Runs decode for this cycle. Returns `true` if IF/ID and the PC must
/// freeze (a load-use stall); the EX-driven freeze (`ex.hold_id_ex`) is
/// reported back to fetch via the same return value. EX already accounts
/// for its own stall reasons (`stalls_mem`, `stalls_mul`, `stalls_div`), so
/// this does not add to those buckets again.
pub fn tick(cpu: &mut Cpu, ex: &ExOutcome) -> bool {
    if ex.redirect.is_some() {
        cpu.if_id.flush();
        cpu.id_ex.flush();
        return false;
    }

    if ex.hold_id_ex {
        return true;
    }

    if !cpu.if_id.valid {
        cpu.id_ex = IdExLatch::bubble();
        return false;
    }

    let d = decode_bits(cpu.if_id.inst);
    let (ctrl, rs1_used, rs2_used) = decode_table(&d);

    let load_use = need_stall_load_use(
        cpu.ex_mem.valid,
        cpu.ex_mem.ctrl.mem_read,
        cpu.ex_mem.rd,
        d.rs1,
        d.rs2,
        (rs1_used, rs2_used),
    );
    if load_use {
        cpu.id_ex = IdExLatch::bubble();
        cpu.stats.stalls_data += 1;
        return true;
    }

    cpu.id_ex = IdExLatch {
        pc: cpu.if_id.pc,
        rs1: d.rs1,
        rs2: d.rs2,
        rd: d.rd,
        rs1_used,
        rs2_used,
        rv1: cpu.regs.read(d.rs1),
        rv2: cpu.regs.read(d.rs2),
        imm: select_imm(&d),
        ctrl,
        pred_taken: cpu.if_id.pred_taken,
        pred_target: cpu.if_id.pred_target,
        valid: true,
        mul_div_dispatched: false,
    };
    false
}

fn select_imm(d: &Decoded) -> u32 {
    match d.opcode {
        OP_LOAD | OP_IMM | OP_JALR => d.imm_i,
        OP_STORE => d.imm_s,
        OP_BRANCH => d.imm_b,
        OP_AUIPC | OP_LUI => d.imm_u,
        OP_JAL => d.imm_j,
        _ => 0,
    }
}

/// Builds control signals and source-register usage for one decoded
/// instruction. An unrecognized opcode produces `ControlSignals::default()`,
/// which behaves as a NOP.
fn decode_table(d: &Decoded) -> (ControlSignals, bool, bool) {
    match d.opcode {
        OP_LUI => (
            ControlSignals {
                reg_write: true,
                a_src: OpASrc::Reg1,
                b_src: OpBSrc::Imm,
                alu: AluOp::Add,
                category: InstCategory::Alu,
                ..Default::default()
            },
            false,
            false,
        ),
        OP_AUIPC => (
            ControlSignals {
                reg_write: true,
                a_src: OpASrc::Pc,
                b_src: OpBSrc::Imm,
                alu: AluOp::Add,
                category: InstCategory::Alu,
                ..Default::default()
            },
            false,
            false,
        ),
        OP_JAL => (
            ControlSignals {
                reg_write: true,
                a_src: OpASrc::Pc,
                b_src: OpBSrc::Four,
                alu: AluOp::Add,
                branch_type: BranchType::Jal,
                is_link: true,
                category: InstCategory::Branch,
                ..Default::default()
            },
            false,
            false,
        ),
        OP_JALR => (
            ControlSignals {
                reg_write: true,
                a_src: OpASrc::Pc,
                b_src: OpBSrc::Four,
                alu: AluOp::Add,
                branch_type: BranchType::Jalr,
                is_link: true,
                category: InstCategory::Branch,
                ..Default::default()
            },
            true,
            false,
        ),
        OP_BRANCH => {
            let branch_type = match d.funct3 {
                funct3::BEQ => BranchType::Beq,
                funct3::BNE => BranchType::Bne,
                funct3::BLT => BranchType::Blt,
                funct3::BGE => BranchType::Bge,
                funct3::BLTU => BranchType::Bltu,
                funct3::BGEU => BranchType::Bgeu,
                _ => BranchType::None,
            };
            (
                ControlSignals {
                    branch_type,
                    category: InstCategory::Branch,
                    ..Default::default()
                },
                true,
                true,
            )
        }
        OP_LOAD => {
            let (width, unsigned_load) = match d.funct3 {
                funct3::LB => (MemWidth::Byte, false),
                funct3::LBU => (MemWidth::Byte, true),
                funct3::LH => (MemWidth::Half, false),
                funct3::LHU => (MemWidth::Half, true),
                funct3::LW => (MemWidth::Word, false),
                _ => (MemWidth::Nop, false),
            };
            (
                ControlSignals {
                    reg_write: true,
                    mem_read: true,
                    width,
                    unsigned_load,
                    a_src: OpASrc::Reg1,
                    b_src: OpBSrc::Imm,
                    alu: AluOp::Add,
                    category: InstCategory::Load,
                    ..Default::default()
                },
                true,
                false,
            )
        }
        OP_STORE => {
            let width = match d.funct3 {
                funct3::SB => MemWidth::Byte,
                funct3::SH => MemWidth::Half,
                funct3::SW => MemWidth::Word,
                _ => MemWidth::Nop,
            };
            let halt = if d.raw == crate::common::SENTINEL_HALT_INSTRUCTION {
                HaltKind::Sentinel
            } else {
                HaltKind::None
            };
            (
                ControlSignals {
                    mem_write: true,
                    width,
                    a_src: OpASrc::Reg1,
                    b_src: OpBSrc::Imm,
                    alu: AluOp::Add,
                    category: InstCategory::Store,
                    halt,
                    ..Default::default()
                },
                true,
                true,
            )
        }
        OP_IMM => {
            let alu = match d.funct3 {
                funct3::ADD_SUB => AluOp::Add,
                funct3::SLT => AluOp::Slt,
                funct3::SLTU => AluOp::Sltu,
                funct3::XOR => AluOp::Xor,
                funct3::OR => AluOp::Or,
                funct3::AND => AluOp::And,
                funct3::SLL => AluOp::Sll,
                funct3::SRL_SRA => {
                    if d.funct7 == funct7::ALT {
                        AluOp::Sra
                    } else {
                        AluOp::Srl
                    }
                }
                _ => AluOp::Add,
            };
            (
                ControlSignals {
                    reg_write: true,
                    a_src: OpASrc::Reg1,
                    b_src: OpBSrc::Imm,
                    alu,
                    category: InstCategory::Alu,
                    ..Default::default()
                },
                true,
                false,
            )
        }
        OP_REG => {
            let alu = match (d.funct7, d.funct3) {
                (funct7::ALT, funct3::ADD_SUB) => AluOp::Sub,
                (funct7::ALT, funct3::SRL_SRA) => AluOp::Sra,
                (funct7::MULDIV, funct3::MUL) => AluOp::Mul,
                (funct7::MULDIV, funct3::MULH) => AluOp::Mulh,
                (funct7::MULDIV, funct3::MULHSU) => AluOp::Mulhsu,
                (funct7::MULDIV, funct3::MULHU) => AluOp::Mulhu,
                (funct7::MULDIV, funct3::DIV) => AluOp::Div,
                (funct7::MULDIV, funct3::DIVU) => AluOp::Divu,
                (funct7::MULDIV, funct3::REM) => AluOp::Rem,
                (funct7::MULDIV, funct3::REMU) => AluOp::Remu,
                (_, funct3::ADD_SUB) => AluOp::Add,
                (_, funct3::SLL) => AluOp::Sll,
                (_, funct3::SLT) => AluOp::Slt,
                (_, funct3::SLTU) => AluOp::Sltu,
                (_, funct3::XOR) => AluOp::Xor,
                (_, funct3::SRL_SRA) => AluOp::Srl,
                (_, funct3::OR) => AluOp::Or,
                (_, funct3::AND) => AluOp::And,
                _ => AluOp::Add,
            };
            let category = if alu.is_multiply() {
                InstCategory::Mul
            } else if alu.is_divide() {
                InstCategory::Div
            } else {
                InstCategory::Alu
            };
            (
                ControlSignals {
                    reg_write: true,
                    a_src: OpASrc::Reg1,
                    b_src: OpBSrc::Reg2,
                    alu,
                    category,
                    ..Default::default()
                },
                true,
                true,
            )
        }
        OP_SYSTEM => {
            let halt = match d.raw {
                crate::common::ECALL_INSTRUCTION => HaltKind::Ecall,
                crate::common::EBREAK_INSTRUCTION => HaltKind::Ebreak,
                _ => HaltKind::None,
            };
            (
                ControlSignals {
                    category: InstCategory::System,
                    halt,
                    ..Default::default()
                },
                false,
                false,
            )
        }
        _ => (ControlSignals::default(), false, false),
    }
}
