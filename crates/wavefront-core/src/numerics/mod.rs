use num_complex::Complex64;

/// Bounds for comparing two complex field samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericTolerance {
    pub abs_tol: f64,
    pub rel_tol: f64,
}

impl NumericTolerance {
    pub const fn new(abs_tol: f64, rel_tol: f64) -> Self {
        Self { abs_tol, rel_tol }
    }

    /// Accepts `actual` when its distance to `baseline` in the complex plane
    /// is within `abs_tol` or within `rel_tol * |baseline|`.
    pub fn accepts_complex(&self, baseline: Complex64, actual: Complex64) -> bool {
        let distance = (actual - baseline).norm();
        distance <= self.abs_tol || distance <= self.rel_tol * baseline.norm()
    }
}
