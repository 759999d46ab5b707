use tile_runner::vector::*;
use tile_runner::GameError;

use proptest::prelude::*;

// ── plus / times ──────────────────────────────────────────────────────────────

#[test]
fn plus_adds_components() {
    let a = Vector::new(1.0, 2.0);
    let b = Vector::new(0.5, -4.0);
    assert_eq!(a.plus(b), Vector::new(1.5, -2.0));
}

#[test]
fn times_scales_components() {
    let a = Vector::new(3.0, -2.0);
    assert_eq!(a.times(2.0), Vector::new(6.0, -4.0));
    assert_eq!(a.times(-1.0), Vector::new(-3.0, 2.0));
    assert_eq!(a.times(0.0), Vector::new(0.0, -0.0));
}

#[test]
fn operations_leave_operands_untouched() {
    let a = Vector::new(1.0, 1.0);
    let b = Vector::new(2.0, 3.0);
    let _ = a.plus(b);
    let _ = a.times(5.0);
    assert_eq!(a, Vector::new(1.0, 1.0));
    assert_eq!(b, Vector::new(2.0, 3.0));
}

#[test]
fn operators_match_named_methods() {
    let a = Vector::new(1.5, -2.0);
    let b = Vector::new(4.0, 0.25);
    assert_eq!(a + b, a.plus(b));
    assert_eq!(a * 3.0, a.times(3.0));
    assert_eq!(-a, a.times(-1.0));
}

#[test]
fn default_is_origin() {
    assert_eq!(Vector::default(), Vector::ZERO);
    assert_eq!(Vector::from((2.0, 3.0)), Vector::new(2.0, 3.0));
}

// ── validation ───────────────────────────────────────────────────────────────

#[test]
fn checked_rejects_non_finite_components() {
    assert!(Vector::checked(1.0, 2.0, "test").is_ok());
    assert_eq!(
        Vector::checked(f64::NAN, 0.0, "test"),
        Err(GameError::TypeInvalid { what: "test" })
    );
    assert!(Vector::checked(0.0, f64::INFINITY, "test").is_err());
}

#[test]
fn display_is_readable() {
    assert_eq!(Vector::new(1.0, -0.5).to_string(), "(1, -0.5)");
}

// ── properties ───────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn plus_is_component_wise(
        ax in -1.0e6f64..1.0e6, ay in -1.0e6f64..1.0e6,
        bx in -1.0e6f64..1.0e6, by in -1.0e6f64..1.0e6,
    ) {
        let a = Vector::new(ax, ay);
        let b = Vector::new(bx, by);
        prop_assert_eq!(a.plus(b), Vector::new(ax + bx, ay + by));
        prop_assert_eq!(a.plus(b), b.plus(a));
    }

    #[test]
    fn times_is_component_wise(
        x in -1.0e6f64..1.0e6, y in -1.0e6f64..1.0e6, k in -100.0f64..100.0,
    ) {
        let a = Vector::new(x, y);
        prop_assert_eq!(a.times(k), Vector::new(x * k, y * k));
    }
}
