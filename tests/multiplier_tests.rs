//! Tests for the 3-stage Wallace-tree multiplier shift-register pipeline.

use rv32im_pipeline_sim::core::pipeline::latches::IdExLatch;
use rv32im_pipeline_sim::core::pipeline::signals::AluOp;
use rv32im_pipeline_sim::core::units::Multiplier;

fn source(rd: usize) -> IdExLatch {
    IdExLatch {
        rd,
        valid: true,
        ..Default::default()
    }
}

#[test]
fn test_mul_low_bits() {
    assert_eq!(Multiplier::compute(AluOp::Mul, 6, 7), 42);
    assert_eq!(Multiplier::compute(AluOp::Mul, 0xFFFF_FFFF, 2), 0xFFFF_FFFE);
}

#[test]
fn test_mulh_signed_signed() {
    // -1 * -1 = 1, high half is 0.
    assert_eq!(Multiplier::compute(AluOp::Mulh, 0xFFFF_FFFF, 0xFFFF_FFFF), 0);
}

#[test]
fn test_mulhsu_signed_unsigned() {
    // -1 (signed) * 2 (unsigned) == -2 as a 64-bit product; high half is all ones.
    assert_eq!(
        Multiplier::compute(AluOp::Mulhsu, 0xFFFF_FFFF, 2),
        0xFFFF_FFFF
    );
}

#[test]
fn test_mulhu_unsigned_unsigned() {
    assert_eq!(
        Multiplier::compute(AluOp::Mulhu, 0xFFFF_FFFF, 0xFFFF_FFFF),
        0xFFFF_FFFE
    );
}

#[test]
#[should_panic]
fn test_compute_panics_on_non_multiply_op() {
    Multiplier::compute(AluOp::Add, 1, 2);
}

#[test]
fn test_latency_is_three_cycles() {
    let mut m = Multiplier::new();
    assert!(m.tick(Some((source(5), 42))).is_none());
    assert!(m.busy());
    assert!(m.tick(None).is_none());
    assert!(m.tick(None).is_none());
    let result = m.tick(None).expect("result must retire on the 4th tick");
    assert_eq!(result.value, 42);
    assert_eq!(result.source.rd, 5);
    assert!(!m.busy());
}

#[test]
fn test_busy_while_any_stage_occupied() {
    let mut m = Multiplier::new();
    assert!(!m.busy());
    m.tick(Some((source(1), 1)));
    assert!(m.busy());
    m.tick(None);
    assert!(m.busy());
    m.tick(None);
    assert!(m.busy());
    m.tick(None);
    assert!(!m.busy());
}

#[test]
fn test_back_to_back_dispatch_pipelines_without_stalling() {
    let mut m = Multiplier::new();
    m.tick(Some((source(1), 10)));
    m.tick(Some((source(2), 20)));
    m.tick(Some((source(3), 30)));
    let r1 = m.tick(Some((source(4), 40))).unwrap();
    assert_eq!((r1.source.rd, r1.value), (1, 10));
    let r2 = m.tick(None).unwrap();
    assert_eq!((r2.source.rd, r2.value), (2, 20));
    let r3 = m.tick(None).unwrap();
    assert_eq!((r3.source.rd, r3.value), (3, 30));
    let r4 = m.tick(None).unwrap();
    assert_eq!((r4.source.rd, r4.value), (4, 40));
}
