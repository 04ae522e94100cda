//! The five-stage in-order pipeline core: register file, unified memory
//! arbiter, branch predictor, multiply/divide units, and the per-cycle
//! `Cpu::tick` driver that threads them together.
//!
//! `tick` evaluates the five stages in reverse pipeline order (WB, MEM, EX,
//! ID, IF) within a single function call. Because every inter-stage latch is
//! a plain value overwritten at most once per stage per cycle, running the
//! *consumer* of a latch before its *producer* lets each stage read "last
//! cycle's" value and then freely overwrite it for the next cycle, with no
//! separate double-buffering required.

pub mod pipeline;
pub mod regfile;
pub mod stages;
pub mod units;

use crate::common::{SimError, SimResult};
use crate::config::Config;
use crate::memory::{Arbiter, ArbiterResult, Sram};
use crate::stats::SimStats;

use pipeline::latches::{ExMemLatch, IdExLatch, IfIdLatch, MemWbLatch};
use regfile::RegisterFile;
use units::{BranchPredictor, Divider, Multiplier};

/// Everything the EX stage hands back to decode and fetch: whether IF/ID
/// and the PC must freeze this cycle, and a one-shot redirect target.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExOutcome {
    /// EX cannot accept a new instruction this cycle (multiply/divide still
    /// draining, or the memory arbiter still servicing a sub-word store).
    pub hold_id_ex: bool,
    /// Set when a branch/jump resolved to a target other than what was
    /// predicted; fetch must redirect the PC and both IF/ID and ID/EX must
    /// be flushed.
    pub redirect: Option<u32>,
}

/// The simulated CPU: architectural state, the pipeline latches, and the
/// multi-cycle units that hang off the EX stage.
pub struct Cpu {
    pub pc: u32,
    pub regs: RegisterFile,
    pub memory: Arbiter,
    pub predictor: BranchPredictor,
    pub multiplier: Multiplier,
    pub divider: Divider,

    pub if_id: IfIdLatch,
    pub id_ex: IdExLatch,
    pub ex_mem: ExMemLatch,
    pub mem_wb: MemWbLatch,

    /// The WB-stage bypass register: the (rd, value) WB committed *last*
    /// cycle, one hop further back than the MEM/WB latch itself.
    pub wb_bypass: Option<(usize, u32)>,
    pending_wb_bypass: Option<(usize, u32)>,

    /// What the memory arbiter did with this cycle's fetch request; set by
    /// the memory-access stage (which shares the single port) and consumed
    /// by fetch afterward.
    pub(crate) pending_fetch: ArbiterResult,

    pub halted: bool,
    pub cycle: u64,
    pub cycle_limit: u64,
    pub trace: bool,

    pub stats: SimStats,
}

impl Cpu {
    pub fn new(config: &Config) -> Self {
        let depth_words = config.memory.depth_words();
        Self {
            pc: 0,
            regs: RegisterFile::new(config.memory.depth_log),
            memory: Arbiter::new(Sram::new(depth_words)),
            predictor: BranchPredictor::new(config.predictor.btb_size, config.predictor.ghr_bits),
            multiplier: Multiplier::new(),
            divider: Divider::new(),
            if_id: IfIdLatch::default(),
            id_ex: IdExLatch::default(),
            ex_mem: ExMemLatch::default(),
            mem_wb: MemWbLatch::default(),
            wb_bypass: None,
            pending_wb_bypass: None,
            pending_fetch: ArbiterResult::default(),
            halted: false,
            cycle: 0,
            cycle_limit: config.general.cycle_limit,
            trace: config.general.trace,
            stats: SimStats::default(),
        }
    }

    /// Loads a hex memory image into the unified SRAM at word address 0.
    pub fn load_image(&mut self, path: &str) -> SimResult<()> {
        self.memory.sram_mut().load_hex_image(path)
    }

    /// Advances the pipeline by one cycle.
    pub fn tick(&mut self) -> SimResult<()> {
        self.cycle += 1;
        self.stats.cycles = self.cycle;

        stages::write_back::tick(self);
        stages::memory_access::tick(self);
        let ex_outcome = stages::execute::tick(self);
        let freeze = stages::decode::tick(self, &ex_outcome);
        stages::fetch::tick(self, &ex_outcome, freeze);

        self.wb_bypass = self.pending_wb_bypass.take();

        if !self.halted && self.cycle >= self.cycle_limit {
            return Err(SimError::CycleLimitReached { cycles: self.cycle });
        }
        Ok(())
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Snapshot of the register file, for the final halt report.
    pub fn register_dump(&self) -> [u32; 32] {
        self.regs.dump()
    }

    pub(crate) fn commit_wb_bypass(&mut self, rd: usize, value: u32) {
        self.pending_wb_bypass = Some((rd, value));
    }
}
