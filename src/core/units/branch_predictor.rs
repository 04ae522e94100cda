//! Branch prediction: a direct-mapped BTB plus a tournament direction
//! predictor (bimodal + gshare, arbitrated by a chooser table).

/// One BTB entry. An invalid entry never produces a hit.
#[derive(Clone, Copy, Debug, Default)]
struct BtbEntry {
    valid: bool,
    tag: u32,
    target: u32,
}

/// Direct-mapped branch target buffer, indexed by a slice of the PC and
/// tagged with the full PC to rule out aliasing.
struct Btb {
    entries: Vec<BtbEntry>,
    index_bits: u32,
}

impl Btb {
    fn new(size: usize) -> Self {
        Self {
            entries: vec![BtbEntry::default(); size],
            index_bits: size.trailing_zeros(),
        }
    }

    fn index(&self, pc: u32) -> usize {
        ((pc >> 2) & ((1 << self.index_bits) - 1)) as usize
    }

    fn predict(&self, pc: u32) -> Option<u32> {
        let entry = &self.entries[self.index(pc)];
        if entry.valid && entry.tag == pc {
            Some(entry.target)
        } else {
            None
        }
    }

    fn update(&mut self, pc: u32, target: u32) {
        let idx = self.index(pc);
        self.entries[idx] = BtbEntry {
            valid: true,
            tag: pc,
            target,
        };
    }
}

/// A saturating 2-bit counter.
#[derive(Clone, Copy, Debug)]
struct Counter2(u8);

impl Counter2 {
    fn taken(self) -> bool {
        self.0 >= 2
    }

    fn bump(&mut self, taken: bool) {
        if taken {
            self.0 = (self.0 + 1).min(3);
        } else {
            self.0 = self.0.saturating_sub(1);
        }
    }
}

/// Tournament direction predictor: bimodal and gshare sub-predictors
/// arbitrated by a chooser table, all indexed by the same PC slice.
pub struct BranchPredictor {
    btb: Btb,
    bimodal: Vec<Counter2>,
    gshare: Vec<Counter2>,
    chooser: Vec<Counter2>,
    ghr: u32,
    ghr_bits: usize,
    index_bits: u32,
}

/// Outcome of consulting the predictor in IF.
#[derive(Clone, Copy, Debug)]
pub struct Prediction {
    pub taken: bool,
    pub target: Option<u32>,
}

impl BranchPredictor {
    pub fn new(btb_size: usize, ghr_bits: usize) -> Self {
        let table_size = btb_size;
        Self {
            btb: Btb::new(btb_size),
            bimodal: vec![Counter2(2); table_size],
            gshare: vec![Counter2(2); table_size],
            chooser: vec![Counter2(1); table_size],
            ghr: 0,
            ghr_bits,
            index_bits: table_size.trailing_zeros(),
        }
    }

    fn bimodal_index(&self, pc: u32) -> usize {
        ((pc >> 2) & ((1 << self.index_bits) - 1)) as usize
    }

    fn gshare_index(&self, pc: u32) -> usize {
        let mask = (1u32 << self.index_bits) - 1;
        let ghr_mask = (1u32 << self.ghr_bits.min(32)) - 1;
        (self.bimodal_index(pc) as u32 ^ (self.ghr & ghr_mask & mask)) as usize
    }

    /// Consults the BTB and direction predictor for the instruction at `pc`.
    pub fn predict(&self, pc: u32) -> Prediction {
        let target = self.btb.predict(pc);
        let bi = self.bimodal_index(pc);
        let gi = self.gshare_index(pc);
        let use_gshare = self.chooser[bi].taken();
        let direction_taken = if use_gshare {
            self.gshare[gi].taken()
        } else {
            self.bimodal[bi].taken()
        };
        Prediction {
            taken: target.is_some() && direction_taken,
            target,
        }
    }

    /// Updates every table after a branch resolves in EX.
    pub fn resolve(&mut self, pc: u32, taken: bool, target: u32) {
        if taken {
            self.btb.update(pc, target);
        }

        let bi = self.bimodal_index(pc);
        let gi = self.gshare_index(pc);
        let bimodal_correct = self.bimodal[bi].taken() == taken;
        let gshare_correct = self.gshare[gi].taken() == taken;

        self.bimodal[bi].bump(taken);
        self.gshare[gi].bump(taken);

        if gshare_correct && !bimodal_correct {
            self.chooser[bi].bump(true);
        } else if bimodal_correct && !gshare_correct {
            self.chooser[bi].bump(false);
        }

        self.ghr = (self.ghr << 1) | (taken as u32);
    }
}
