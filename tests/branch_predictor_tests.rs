//! Tests for the BTB + tournament (bimodal/gshare/chooser) branch predictor.

use rv32im_pipeline_sim::core::units::BranchPredictor;

#[test]
fn test_no_btb_entry_predicts_not_taken() {
    let bp = BranchPredictor::new(64, 6);
    let pred = bp.predict(0x1000);
    assert!(!pred.taken);
    assert!(pred.target.is_none());
}

#[test]
fn test_resolve_populates_btb() {
    let mut bp = BranchPredictor::new(64, 6);
    bp.resolve(0x1000, true, 0x2000);

    let pred = bp.predict(0x1000);
    assert_eq!(pred.target, Some(0x2000));
}

#[test]
fn test_repeated_taken_converges_to_taken_prediction() {
    let mut bp = BranchPredictor::new(64, 6);
    for _ in 0..4 {
        bp.resolve(0x1000, true, 0x2000);
    }

    let pred = bp.predict(0x1000);
    assert!(pred.taken);
    assert_eq!(pred.target, Some(0x2000));
}

#[test]
fn test_btb_tag_miss_on_address_alias() {
    let mut bp = BranchPredictor::new(64, 6);
    bp.resolve(0x1000, true, 0x2000);

    // Same BTB index (same low index bits), different full tag.
    let aliased_pc = 0x1000 + (64 * 4);
    let pred = bp.predict(aliased_pc);
    assert!(pred.target.is_none());
}

#[test]
fn test_counter_saturation_survives_one_miss() {
    let mut bp = BranchPredictor::new(64, 6);
    for _ in 0..10 {
        bp.resolve(0x1000, true, 0x2000);
    }
    bp.resolve(0x1000, false, 0x2000);

    // A single miss should not flip a saturated 2-bit counter to not-taken.
    let pred = bp.predict(0x1000);
    assert!(pred.taken);
}

#[test]
fn test_global_history_distinguishes_gshare_contexts() {
    let mut bp = BranchPredictor::new(64, 6);
    // Warm the same PC differently depending on recent global history.
    for _ in 0..6 {
        bp.resolve(0x2000, true, 0x3000);
    }
    let pred = bp.predict(0x2000);
    assert!(pred.taken);
}
