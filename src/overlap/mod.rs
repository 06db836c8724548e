//! Label overlap resolution.
//!
//! Every label is reduced to an [`Interval`]: the vertical span it occupies
//! and the weight of its slice. One side's intervals are packed into a flat
//! `f64` buffer of `(lower, upper, weight)` triples, [`resolve`] writes a
//! parallel `u8` keep mask, and [`filter`] applies the mask back onto the
//! labels.
//!
//! ```
//! use pie_labels::overlap::{Interval, encode, filter, resolve};
//!
//! let labels = [("cactus", 0.0, 50.0), ("belief", 5.0, 30.0), ("ray", 20.0, 10.0)];
//! let buffer = encode(&labels, |(_, y, value)| Interval::new(*y, y + 10.0, *value));
//! let mut mask = buffer.new_mask();
//! resolve(buffer.as_slice(), &mut mask).unwrap();
//!
//! let kept: Vec<_> = filter(labels.iter(), &mask).unwrap();
//! assert_eq!(kept.len(), 2);
//! assert_eq!(kept[0].0, "cactus");
//! assert_eq!(kept[1].0, "ray");
//! ```
//!
//! Nothing here keeps state between calls; each frame is resolved from
//! scratch.

pub mod decode;
pub mod encode;
pub mod interval;
pub mod remover;
pub mod resolve;

pub use decode::{filter, kept_indices};
pub use encode::{PackedBuffer, encode};
pub use interval::{Interval, STRIDE};
pub use remover::LabelRemover;
pub use resolve::{DROP, KEEP, Strategy, resolve, resolve_with};
