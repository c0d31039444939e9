/// Floating-point sum kept exactly as a list of non-overlapping partials
/// (Shewchuk), rounded once when read.
///
/// The rounded value depends only on the multiset of inputs, never on the
/// order they were added or merged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExactSum {
    // Non-overlapping, increasing magnitude
    partials: Vec<f64>,
    // Running sum of non-finite inputs (0.0, +-inf or NaN)
    special: f64,
}

impl ExactSum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `x` exactly. Returns `false` when a finite intermediate
    /// overflows f64, after which the sum must be discarded.
    #[must_use]
    pub fn add(&mut self, x: f64) -> bool {
        if !x.is_finite() {
            self.special += x;
            return true;
        }

        let mut x = x;
        let mut kept = 0;
        for j in 0..self.partials.len() {
            let mut y = self.partials[j];
            if x.abs() < y.abs() {
                std::mem::swap(&mut x, &mut y);
            }
            let hi = x + y;
            if !hi.is_finite() {
                return false;
            }
            let lo = y - (hi - x);
            if lo != 0.0 {
                self.partials[kept] = lo;
                kept += 1;
            }
            x = hi;
        }
        self.partials.truncate(kept);
        self.partials.push(x);
        true
    }

    /// Folds `other` in exactly. Same overflow contract as `add`.
    #[must_use]
    pub fn merge(&mut self, other: &ExactSum) -> bool {
        self.special += other.special;
        other.partials.iter().all(|p| self.add(*p))
    }

    /// The exact sum, correctly rounded to f64.
    pub fn value(&self) -> f64 {
        if self.special != 0.0 {
            return self.special;
        }

        let Some(mut n) = self.partials.len().checked_sub(1) else {
            return 0.0;
        };
        let mut hi = self.partials[n];
        let mut lo = 0.0;
        while n > 0 {
            let x = hi;
            n -= 1;
            let y = self.partials[n];
            hi = x + y;
            lo = y - (hi - x);
            if lo != 0.0 {
                break;
            }
        }

        // Round half-even across the remaining partials
        if n > 0 {
            let next = self.partials[n - 1];
            if (lo < 0.0 && next < 0.0) || (lo > 0.0 && next > 0.0) {
                let y = lo * 2.0;
                let x = hi + y;
                if y == x - hi {
                    hi = x;
                }
            }
        }
        hi
    }
}
