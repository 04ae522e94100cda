//! Pipeline control signals.
//!
//! Defines the control vocabulary that flows through the pipeline from
//! decode onward: ALU operation, operand source muxes, memory access shape,
//! branch classification, and the halt tag. A decode-table miss always
//! produces `ControlSignals::default()`, which behaves as a NOP.

/// ALU operation, or a multiply/divide variant dispatched to the
/// multi-cycle units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AluOp {
    /// Default value (also used by NOP).
    #[default]
    Add,
    Sub,
    Sll,
    Slt,
    Sltu,
    Xor,
    Srl,
    Sra,
    Or,
    And,
    Mul,
    Mulh,
    Mulhsu,
    Mulhu,
    Div,
    Divu,
    Rem,
    Remu,
}

impl AluOp {
    /// True for any RV32M multiply variant.
    pub fn is_multiply(self) -> bool {
        matches!(self, AluOp::Mul | AluOp::Mulh | AluOp::Mulhsu | AluOp::Mulhu)
    }

    /// True for any RV32M divide/remainder variant.
    pub fn is_divide(self) -> bool {
        matches!(self, AluOp::Div | AluOp::Divu | AluOp::Rem | AluOp::Remu)
    }
}

/// Memory access width for load and store operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MemWidth {
    /// No memory operation.
    #[default]
    Nop,
    Byte,
    Half,
    Word,
}

/// Source for ALU operand A.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OpASrc {
    /// Use rs1's value.
    #[default]
    Reg1,
    /// Use the instruction's own PC (AUIPC, JAL/JALR link targets).
    Pc,
}

/// Source for ALU operand B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OpBSrc {
    /// Use the sign-extended immediate.
    #[default]
    Imm,
    /// Use rs2's value.
    Reg2,
    /// Use the constant 4 (PC+4 link value for JAL/JALR).
    Four,
}

/// Branch/jump classification consumed by the EX-stage resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BranchType {
    #[default]
    None,
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,
    Jal,
    Jalr,
}

impl BranchType {
    pub fn is_conditional(self) -> bool {
        matches!(
            self,
            BranchType::Beq
                | BranchType::Bne
                | BranchType::Blt
                | BranchType::Bge
                | BranchType::Bltu
                | BranchType::Bgeu
        )
    }
}

/// Which halt token (if any) a decoded instruction represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HaltKind {
    #[default]
    None,
    Ecall,
    Ebreak,
    Sentinel,
}

/// Coarse instruction-mix bucket, carried through to WB purely for stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InstCategory {
    #[default]
    Alu,
    Load,
    Store,
    Branch,
    System,
    Mul,
    Div,
}

/// Control signals generated during instruction decode and threaded through
/// EX, MEM, and WB.
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlSignals {
    /// Enable write to the destination register.
    pub reg_write: bool,
    /// This is a load (mem_width gives the access shape).
    pub mem_read: bool,
    /// This is a store.
    pub mem_write: bool,
    /// Width of the memory access, if any.
    pub width: MemWidth,
    /// Load should be zero-extended (vs sign-extended).
    pub unsigned_load: bool,
    /// ALU operation to perform.
    pub alu: AluOp,
    /// Source selection for ALU operand A.
    pub a_src: OpASrc,
    /// Source selection for ALU operand B.
    pub b_src: OpBSrc,
    /// Branch/jump classification.
    pub branch_type: BranchType,
    /// This instruction's writeback value is PC+4 (JAL/JALR link).
    pub is_link: bool,
    /// Halt classification, if any.
    pub halt: HaltKind,
    /// Instruction-mix bucket, for stats only.
    pub category: InstCategory,
}
