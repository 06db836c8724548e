use serde::Serialize;

use crate::error::{ResolveError, Result};

/// Number of `f64` slots one interval occupies in a packed buffer.
pub const STRIDE: usize = 3;

/// A label's occupied vertical span plus the weight of the slice it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
    /// Floored and non-negative.
    pub weight: f64,
}

impl Interval {
    /// Build an interval from raw geometry.
    ///
    /// Bounds given in the wrong order are swapped. The weight is floored; a
    /// negative or NaN weight becomes 0. NaN bounds are kept as-is so the
    /// resolver can reject them.
    pub fn new(lower: f64, upper: f64, weight: f64) -> Self {
        let (lower, upper) = if lower > upper {
            (upper, lower)
        } else {
            (lower, upper)
        };
        Self {
            lower,
            upper,
            weight: if weight > 0.0 { weight.floor() } else { 0.0 },
        }
    }

    /// Read slot group `index` of a packed buffer.
    ///
    /// Unlike [`Interval::new`] this does not repair anything: inverted or NaN
    /// bounds and NaN or negative weights are reported as errors.
    pub fn from_slots(index: usize, slots: &[f64]) -> Result<Self> {
        let [lower, upper, weight] = <[f64; STRIDE]>::try_from(slots).map_err(|_| {
            ResolveError::BufferStride {
                len: slots.len(),
                stride: STRIDE,
            }
        })?;
        if lower.is_nan() || upper.is_nan() {
            return Err(ResolveError::NanBound { index });
        }
        if lower > upper {
            return Err(ResolveError::Inverted {
                index,
                lower,
                upper,
            });
        }
        if weight.is_nan() || weight < 0.0 {
            return Err(ResolveError::InvalidWeight { index, weight });
        }
        Ok(Self {
            lower,
            upper,
            weight: weight.floor(),
        })
    }

    /// Half-open overlap test: spans that merely touch at an endpoint do not
    /// overlap.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.lower < other.upper && other.lower < self.upper
    }

    pub fn height(&self) -> f64 {
        self.upper - self.lower
    }

    pub(crate) fn write_slots(&self, out: &mut Vec<f64>) {
        out.push(self.lower);
        out.push(self.upper);
        out.push(self.weight);
    }
}
