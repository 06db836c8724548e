use thiserror::Error;

/// Contract violations detected while resolving a packed interval buffer.
///
/// Every variant is a caller bug: the resolver never coerces bad input and
/// never writes a partial mask.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("packed buffer length {len} is not a multiple of {stride}")]
    BufferStride { len: usize, stride: usize },

    #[error("keep mask has {actual} cells but {expected} were expected")]
    MaskLength { expected: usize, actual: usize },

    #[error("interval {index} has a NaN bound")]
    NanBound { index: usize },

    #[error("interval {index} is inverted: lower {lower} > upper {upper}")]
    Inverted { index: usize, lower: f64, upper: f64 },

    #[error("interval {index} has invalid weight {weight}")]
    InvalidWeight { index: usize, weight: f64 },
}

pub type Result<T> = std::result::Result<T, ResolveError>;
