use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::engine::core::read::aggregate::exact_sum::ExactSum;

fn sum_of(values: &[f64]) -> ExactSum {
    let mut sum = ExactSum::new();
    for v in values {
        assert!(sum.add(*v));
    }
    sum
}

#[test]
fn empty_sum_is_zero() {
    assert_eq!(ExactSum::new().value(), 0.0);
}

#[test]
fn keeps_low_order_bits_that_plain_addition_drops() {
    assert_eq!(sum_of(&[1e16, 1.0, -1e16, 1.0]).value(), 2.0);
    assert_eq!(sum_of(&[0.1; 10]).value(), 1.0);
    assert_eq!(sum_of(&[1e100, 1.0, -1e100, 1e-100]).value(), 1.0);
}

#[test]
fn value_is_independent_of_insertion_order() {
    let mut values = vec![1e16, -1e16, 0.1, 0.2, 0.3, 1e-12, -7.5, 3e10, -3e10, 1.0];
    let expected = sum_of(&values).value();

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        values.shuffle(&mut rng);
        assert_eq!(sum_of(&values).value(), expected);

        // split, sum each side, then merge
        let (left, right) = values.split_at(values.len() / 3);
        let mut merged = sum_of(right);
        assert!(merged.merge(&sum_of(left)));
        assert_eq!(merged.value(), expected);
    }
}

#[test]
fn rounds_half_to_even_across_partials() {
    // 1 + 2^-53 + 2^-106: the tail breaks the tie upward
    let tail = f64::powi(2.0, -106);
    let half_ulp = f64::powi(2.0, -53);
    assert_eq!(sum_of(&[1.0, half_ulp, tail]).value(), 1.0 + f64::EPSILON);
    assert_eq!(sum_of(&[1.0, half_ulp]).value(), 1.0);
}

#[test]
fn non_finite_inputs_dominate() {
    assert_eq!(sum_of(&[1.0, f64::INFINITY, 2.0]).value(), f64::INFINITY);
    assert!(sum_of(&[f64::INFINITY, f64::NEG_INFINITY]).value().is_nan());
    assert!(sum_of(&[f64::NAN, 1.0]).value().is_nan());
}

#[test]
fn finite_overflow_is_reported() {
    let mut sum = ExactSum::new();
    assert!(sum.add(f64::MAX));
    assert!(!sum.add(f64::MAX));
}
