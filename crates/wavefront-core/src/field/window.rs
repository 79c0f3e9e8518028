use crate::domain::{WavefrontError, WavefrontResult};
use serde::{Deserialize, Serialize};

/// Longitudinal sub-sampling window with Python slice semantics.
///
/// `None` start means the first slice, `None` end means one past the last,
/// negative bounds count from the end. The step defaults to 1 and must be
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SliceWindow {
    #[serde(default)]
    pub start: Option<isize>,
    #[serde(default)]
    pub end: Option<isize>,
    #[serde(default)]
    pub step: Option<isize>,
}

impl SliceWindow {
    pub const fn new(start: Option<isize>, end: Option<isize>, step: Option<isize>) -> Self {
        Self { start, end, step }
    }

    pub const fn full() -> Self {
        Self::new(None, None, None)
    }

    pub const fn is_full(&self) -> bool {
        self.start.is_none() && self.end.is_none() && matches!(self.step, None | Some(1))
    }

    /// Normalize against an axis of `len` slices.
    pub fn resolve(&self, len: usize) -> WavefrontResult<ResolvedWindow> {
        let step = self.step.unwrap_or(1);
        if step <= 0 {
            return Err(WavefrontError::InvalidWindow {
                reason: format!("step must be a positive integer, got {step}"),
            });
        }

        let start = self.start.map_or(0, |value| clamp_index(value, len));
        let end = self.end.map_or(len, |value| clamp_index(value, len));
        let step = step.unsigned_abs();
        let count = if end > start {
            (end - start).div_ceil(step)
        } else {
            0
        };

        Ok(ResolvedWindow { start, step, count })
    }
}

fn clamp_index(value: isize, len: usize) -> usize {
    if value < 0 {
        len.saturating_sub(value.unsigned_abs())
    } else {
        value.unsigned_abs().min(len)
    }
}

/// Concrete window over an axis: `count` indices `start, start + step, ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub start: usize,
    pub step: usize,
    pub count: usize,
}

impl ResolvedWindow {
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Last selected index.
    pub fn last(&self) -> Option<usize> {
        (self.count > 0).then(|| self.start + (self.count - 1) * self.step)
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).map(move |offset| self.start + offset * self.step)
    }
}
