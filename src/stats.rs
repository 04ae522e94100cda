//! Simulation statistics collection and reporting.
//!
//! Tracks instruction-mix counts, branch prediction accuracy, and stall
//! breakdown, printed once the run halts or hits its cycle limit.

use std::time::Instant;

/// Simulation statistics structure tracking all performance metrics.
pub struct SimStats {
    start_time: Instant,
    pub cycles: u64,
    pub instructions_retired: u64,

    pub inst_load: u64,
    pub inst_store: u64,
    pub inst_branch: u64,
    pub inst_alu: u64,
    pub inst_system: u64,
    pub inst_mul: u64,
    pub inst_div: u64,

    pub branch_predictions: u64,
    pub branch_mispredictions: u64,

    pub stalls_mem: u64,
    pub stalls_control: u64,
    pub stalls_data: u64,
    pub stalls_mul: u64,
    pub stalls_div: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_alu: 0,
            inst_system: 0,
            inst_mul: 0,
            inst_div: 0,
            branch_predictions: 0,
            branch_mispredictions: 0,
            stalls_mem: 0,
            stalls_control: 0,
            stalls_data: 0,
            stalls_mul: 0,
            stalls_div: 0,
        }
    }
}

impl SimStats {
    /// Prints a formatted summary of all simulation statistics.
    pub fn print(&self) {
        let duration = self.start_time.elapsed();
        let seconds = duration.as_secs_f64();

        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let instr = if self.instructions_retired == 0 {
            1
        } else {
            self.instructions_retired
        };

        let ipc = self.instructions_retired as f64 / cyc as f64;
        let cpi = cyc as f64 / instr as f64;
        let mips = (self.instructions_retired as f64 / seconds) / 1_000_000.0;
        let khz = (self.cycles as f64 / seconds) / 1000.0;

        println!("\n==========================================================");
        println!("RV32IM PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {:.2} kHz", khz);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_ipc                  {:.4}", ipc);
        println!("sim_cpi                  {:.4}", cpi);
        println!("sim_mips                 {:.2}", mips);
        println!("----------------------------------------------------------");
        println!("STALL BREAKDOWN");
        println!(
            "  stalls.memory          {} ({:.2}%)",
            self.stalls_mem,
            (self.stalls_mem as f64 / cyc as f64) * 100.0
        );
        println!(
            "  stalls.control         {} ({:.2}%)",
            self.stalls_control,
            (self.stalls_control as f64 / cyc as f64) * 100.0
        );
        println!(
            "  stalls.data            {} ({:.2}%)",
            self.stalls_data,
            (self.stalls_data as f64 / cyc as f64) * 100.0
        );
        println!(
            "  stalls.mul             {} ({:.2}%)",
            self.stalls_mul,
            (self.stalls_mul as f64 / cyc as f64) * 100.0
        );
        println!(
            "  stalls.div             {} ({:.2}%)",
            self.stalls_div,
            (self.stalls_div as f64 / cyc as f64) * 100.0
        );
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        let total_inst = instr as f64;
        println!(
            "  op.alu                 {} ({:.2}%)",
            self.inst_alu,
            (self.inst_alu as f64 / total_inst) * 100.0
        );
        println!(
            "  op.load                {} ({:.2}%)",
            self.inst_load,
            (self.inst_load as f64 / total_inst) * 100.0
        );
        println!(
            "  op.store               {} ({:.2}%)",
            self.inst_store,
            (self.inst_store as f64 / total_inst) * 100.0
        );
        println!(
            "  op.branch              {} ({:.2}%)",
            self.inst_branch,
            (self.inst_branch as f64 / total_inst) * 100.0
        );
        println!(
            "  op.system              {} ({:.2}%)",
            self.inst_system,
            (self.inst_system as f64 / total_inst) * 100.0
        );
        println!(
            "  op.mul                 {} ({:.2}%)",
            self.inst_mul,
            (self.inst_mul as f64 / total_inst) * 100.0
        );
        println!(
            "  op.div                 {} ({:.2}%)",
            self.inst_div,
            (self.inst_div as f64 / total_inst) * 100.0
        );
        println!("----------------------------------------------------------");
        println!("BRANCH PREDICTION");
        let bp_total = self.branch_predictions;
        let bp_miss = self.branch_mispredictions;
        let bp_acc = if bp_total > 0 {
            100.0 * (1.0 - (bp_miss as f64 / bp_total as f64))
        } else {
            0.0
        };
        println!("  bp.lookups             {}", bp_total);
        println!("  bp.mispredicts         {}", bp_miss);
        println!("  bp.accuracy            {:.2}%", bp_acc);
        println!("==========================================================");
    }
}
