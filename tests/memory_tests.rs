//! Tests for the unified SRAM and its single-port arbiter.

use rv32im_pipeline_sim::common::{SimError, MMIO_THRESHOLD};
use rv32im_pipeline_sim::memory::{extend_load, AccessWidth, Arbiter, LoadRequest, Sram, StoreRequest};
use std::io::Write;

fn arbiter(depth_words: usize) -> Arbiter {
    Arbiter::new(Sram::new(depth_words))
}

#[test]
fn test_fetch_only_serves_word() {
    let mut a = arbiter(16);
    a.sram_mut().write_word(4, 0xABCD_1234);

    let r = a.cycle(Some(16), None, None);
    assert_eq!(r.fetch_data, Some(0xABCD_1234));
    assert!(!r.fetch_stalled);
}

#[test]
fn test_load_wins_over_fetch() {
    let mut a = arbiter(16);
    a.sram_mut().write_word(2, 0x1111_2222);

    let r = a.cycle(Some(16), Some(LoadRequest { byte_addr: 8 }), None);
    assert_eq!(r.load_data, Some(0x1111_2222));
    assert!(r.fetch_data.is_none());
    assert!(r.fetch_stalled);
}

#[test]
fn test_word_store_completes_in_one_cycle() {
    let mut a = arbiter(16);
    let store = StoreRequest {
        byte_addr: 12,
        value: 0xDEAD_BEEF,
        width: AccessWidth::Word,
    };
    let r = a.cycle(None, None, Some(store));
    assert!(!r.store_busy);
    assert!(!a.store_in_flight());
    assert_eq!(a.sram().read_word(3), 0xDEAD_BEEF);
}

#[test]
fn test_sub_word_store_spans_two_cycles() {
    let mut a = arbiter(16);
    a.sram_mut().write_word(0, 0xFFFF_FFFF);

    let store = StoreRequest {
        byte_addr: 1,
        value: 0x00,
        width: AccessWidth::Byte,
    };
    let r1 = a.cycle(None, None, Some(store));
    assert!(r1.store_busy);
    assert!(a.store_in_flight());
    // The word must not be mutated until the second phase.
    assert_eq!(a.sram().read_word(0), 0xFFFF_FFFF);

    let r2 = a.cycle(None, None, None);
    assert!(!r2.store_busy);
    assert!(!a.store_in_flight());
    assert_eq!(a.sram().read_word(0), 0xFFFF_00FF);
}

#[test]
fn test_pending_store_completion_takes_priority_over_new_requests() {
    let mut a = arbiter(16);
    a.sram_mut().write_word(5, 0x1234_5678);
    let store = StoreRequest {
        byte_addr: 20,
        value: 0xAB,
        width: AccessWidth::Byte,
    };
    a.cycle(None, None, Some(store));

    // A fetch and a load both present the next cycle; the pending RMW must
    // still finish first, and both the fetch and load are denied.
    let r = a.cycle(Some(0), Some(LoadRequest { byte_addr: 20 }), None);
    assert!(r.fetch_stalled);
    assert!(r.fetch_data.is_none());
    assert!(r.load_data.is_none());
    assert!(!a.store_in_flight());
}

#[test]
fn test_mmio_write_reported_at_threshold() {
    let mut a = arbiter(16);
    let store = StoreRequest {
        byte_addr: MMIO_THRESHOLD,
        value: 0x42,
        width: AccessWidth::Word,
    };
    let r = a.cycle(None, None, Some(store));
    assert_eq!(r.mmio_write, Some((MMIO_THRESHOLD, 0x42)));
}

#[test]
fn test_mmio_write_reported_for_subword_store_on_completion_cycle() {
    let mut a = arbiter(16);
    let store = StoreRequest {
        byte_addr: MMIO_THRESHOLD + 1,
        value: 0x7,
        width: AccessWidth::Byte,
    };
    let r1 = a.cycle(None, None, Some(store));
    assert!(r1.mmio_write.is_none());
    let r2 = a.cycle(None, None, None);
    assert_eq!(r2.mmio_write, Some((MMIO_THRESHOLD + 1, 0x7)));
}

#[test]
fn test_extend_load_byte_signed_and_unsigned() {
    let word = 0xFFFF_FF80;
    assert_eq!(extend_load(word, 0, AccessWidth::Byte, false), 0xFFFF_FF80);
    assert_eq!(extend_load(word, 0, AccessWidth::Byte, true), 0x0000_0080);
}

#[test]
fn test_extend_load_half_signed_and_unsigned() {
    let word = 0x8000_0001;
    assert_eq!(extend_load(word, 2, AccessWidth::Half, false), 0xFFFF_8000);
    assert_eq!(extend_load(word, 2, AccessWidth::Half, true), 0x0000_8000);
    assert_eq!(extend_load(word, 0, AccessWidth::Half, true), 0x0000_0001);
}

#[test]
fn test_extend_load_word_passthrough() {
    assert_eq!(extend_load(0x1234_5678, 0, AccessWidth::Word, false), 0x1234_5678);
}

#[test]
fn test_extend_load_every_byte_offset() {
    let word = 0xAABB_CCDD;
    assert_eq!(extend_load(word, 0, AccessWidth::Byte, true), 0xDD);
    assert_eq!(extend_load(word, 1, AccessWidth::Byte, true), 0xCC);
    assert_eq!(extend_load(word, 2, AccessWidth::Byte, true), 0xBB);
    assert_eq!(extend_load(word, 3, AccessWidth::Byte, true), 0xAA);
}

#[test]
fn test_load_hex_image_populates_sram() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "00000013").unwrap();
    writeln!(file, "deadbeef").unwrap();
    file.flush().unwrap();

    let mut sram = Sram::new(16);
    sram.load_hex_image(file.path().to_str().unwrap()).unwrap();
    assert_eq!(sram.read_word(0), 0x0000_0013);
    assert_eq!(sram.read_word(1), 0xDEAD_BEEF);
}

#[test]
fn test_load_hex_image_rejects_malformed_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "0000001").unwrap();
    file.flush().unwrap();

    let mut sram = Sram::new(16);
    let err = sram.load_hex_image(file.path().to_str().unwrap()).unwrap_err();
    assert!(matches!(err, SimError::MalformedImageLine { .. }));
}

#[test]
fn test_load_hex_image_rejects_oversized_image() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for _ in 0..4 {
        writeln!(file, "00000013").unwrap();
    }
    file.flush().unwrap();

    let mut sram = Sram::new(2);
    let err = sram.load_hex_image(file.path().to_str().unwrap()).unwrap_err();
    assert!(matches!(err, SimError::ImageTooLarge { .. }));
}
