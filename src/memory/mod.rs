//! Unified single-port memory: one word-addressed SRAM shared by
//! instruction fetch and data access, multiplexed through an [`Arbiter`].
//!
//! The arbiter is the only coordination mechanism between IF and MEM; there
//! is no cache, so every access completes deterministically in one or two
//! cycles (the extra cycle for sub-word stores, realized as a read-modify-write).

use crate::common::{SimError, SimResult, MMIO_THRESHOLD};
use std::fs;

/// Width of a data access. Instruction fetch is always word-width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessWidth {
    Byte,
    Half,
    Word,
}

/// A data load request presented to the arbiter for this cycle.
#[derive(Debug, Clone, Copy)]
pub struct LoadRequest {
    pub byte_addr: u32,
}

/// A data store request presented to the arbiter for this cycle.
#[derive(Debug, Clone, Copy)]
pub struct StoreRequest {
    pub byte_addr: u32,
    pub value: u32,
    pub width: AccessWidth,
}

/// What the arbiter made visible to IF and MEM after resolving this cycle's
/// contention.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArbiterResult {
    /// Word fetched for IF, if fetch won arbitration.
    pub fetch_data: Option<u32>,
    /// True if IF's fetch request lost arbitration and must be reissued.
    pub fetch_stalled: bool,
    /// Data loaded for MEM, if a load request was present and served.
    pub load_data: Option<u32>,
    /// True while a sub-word store's read-modify-write is still in flight;
    /// the hazard unit stalls EX on this.
    pub store_busy: bool,
    /// A completed write whose address was at or above [`MMIO_THRESHOLD`].
    pub mmio_write: Option<(u32, u32)>,
}

/// The word-addressable backing store. No cache, no miss handling: every
/// access is a direct array index.
pub struct Sram {
    words: Vec<u32>,
}

impl Sram {
    pub fn new(depth_words: usize) -> Self {
        Self {
            words: vec![0; depth_words],
        }
    }

    pub fn depth_words(&self) -> usize {
        self.words.len()
    }

    pub fn read_word(&self, word_addr: u32) -> u32 {
        self.words[word_addr as usize % self.words.len()]
    }

    pub fn write_word(&mut self, word_addr: u32, value: u32) {
        let len = self.words.len();
        self.words[word_addr as usize % len] = value;
    }

    /// Loads a hex memory image (one 8-hex-digit little-endian word per
    /// line) starting at word address 0.
    pub fn load_hex_image(&mut self, path: &str) -> SimResult<()> {
        let text = fs::read_to_string(path)?;
        let mut word_addr = 0usize;
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.len() != 8 || !line.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(SimError::MalformedImageLine {
                    path: path.to_string(),
                    line_no: line_no + 1,
                    text: line.to_string(),
                });
            }
            if word_addr >= self.words.len() {
                return Err(SimError::ImageTooLarge {
                    words: word_addr + 1,
                    capacity: self.words.len(),
                });
            }
            let value = u32::from_str_radix(line, 16).map_err(|_| SimError::MalformedImageLine {
                path: path.to_string(),
                line_no: line_no + 1,
                text: line.to_string(),
            })?;
            self.words[word_addr] = value;
            word_addr += 1;
        }
        Ok(())
    }
}

struct PendingStore {
    word_addr: u32,
    old_word: u32,
    byte_addr: u32,
    value: u32,
    width: AccessWidth,
}

/// Mediates IF and MEM access to the single [`Sram`] port.
///
/// Arbitration priority, highest first: completing a sub-word store's
/// read-modify-write, a load, starting a new store, instruction fetch.
pub struct Arbiter {
    sram: Sram,
    pending_store: Option<PendingStore>,
}

impl Arbiter {
    pub fn new(sram: Sram) -> Self {
        Self {
            sram,
            pending_store: None,
        }
    }

    pub fn sram(&self) -> &Sram {
        &self.sram
    }

    pub fn sram_mut(&mut self) -> &mut Sram {
        &mut self.sram
    }

    /// Resolves one cycle's contention between a fetch request, a load
    /// request, and a store request, applying the priority order from the
    /// module doc comment.
    pub fn cycle(
        &mut self,
        fetch_addr: Option<u32>,
        load: Option<LoadRequest>,
        store: Option<StoreRequest>,
    ) -> ArbiterResult {
        let mut result = ArbiterResult::default();

        if let Some(pending) = self.pending_store.take() {
            let merged = merge_store(pending.old_word, pending.byte_addr, pending.value, pending.width);
            self.sram.write_word(pending.word_addr, merged);
            if pending.byte_addr >= MMIO_THRESHOLD {
                result.mmio_write = Some((pending.byte_addr, pending.value));
            }
            result.fetch_stalled = fetch_addr.is_some();
            return result;
        }

        if let Some(req) = load {
            let word_addr = req.byte_addr >> 2;
            result.load_data = Some(self.sram.read_word(word_addr));
            result.fetch_stalled = fetch_addr.is_some();
            return result;
        }

        if let Some(req) = store {
            let word_addr = req.byte_addr >> 2;
            if req.width == AccessWidth::Word {
                self.sram.write_word(word_addr, req.value);
                if req.byte_addr >= MMIO_THRESHOLD {
                    result.mmio_write = Some((req.byte_addr, req.value));
                }
            } else {
                let old_word = self.sram.read_word(word_addr);
                self.pending_store = Some(PendingStore {
                    word_addr,
                    old_word,
                    byte_addr: req.byte_addr,
                    value: req.value,
                    width: req.width,
                });
                result.store_busy = true;
            }
            result.fetch_stalled = fetch_addr.is_some();
            return result;
        }

        if let Some(addr) = fetch_addr {
            let word_addr = addr >> 2;
            result.fetch_data = Some(self.sram.read_word(word_addr));
        }

        result
    }

    /// True while a sub-word store's read-modify-write has not yet
    /// completed; the hazard unit consumes this to hold EX.
    pub fn store_in_flight(&self) -> bool {
        self.pending_store.is_some()
    }
}

fn merge_store(old_word: u32, byte_addr: u32, value: u32, width: AccessWidth) -> u32 {
    let shift = (byte_addr & 0x3) * 8;
    match width {
        AccessWidth::Byte => {
            let mask = 0xFFu32 << shift;
            (old_word & !mask) | ((value & 0xFF) << shift)
        }
        AccessWidth::Half => {
            let mask = 0xFFFFu32 << shift;
            (old_word & !mask) | ((value & 0xFFFF) << shift)
        }
        AccessWidth::Word => value,
    }
}

/// Aligns and sign/zero-extends a raw 32-bit word read from memory into the
/// requested load width, per the byte address's low two bits.
pub fn extend_load(raw_word: u32, byte_addr: u32, width: AccessWidth, unsigned: bool) -> u32 {
    let shift = (byte_addr & 0x3) * 8;
    match width {
        AccessWidth::Byte => {
            let byte = ((raw_word >> shift) & 0xFF) as u8;
            if unsigned {
                byte as u32
            } else {
                (byte as i8) as i32 as u32
            }
        }
        AccessWidth::Half => {
            let half_shift = byte_addr & 0x2;
            let half = ((raw_word >> (half_shift * 8)) & 0xFFFF) as u16;
            if unsigned {
                half as u32
            } else {
                (half as i16) as i32 as u32
            }
        }
        AccessWidth::Word => raw_word,
    }
}
