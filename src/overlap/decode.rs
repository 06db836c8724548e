use crate::error::{ResolveError, Result};

/// Keep the items whose mask cell is non-zero, in their original order.
pub fn filter<I>(items: I, mask: &[u8]) -> Result<Vec<I::Item>>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
{
    let items = items.into_iter();
    if items.len() != mask.len() {
        return Err(ResolveError::MaskLength {
            expected: items.len(),
            actual: mask.len(),
        });
    }
    Ok(items
        .zip(mask)
        .filter(|(_, cell)| **cell > 0)
        .map(|(item, _)| item)
        .collect())
}

/// Positions of the kept cells.
pub fn kept_indices(mask: &[u8]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter(|(_, cell)| **cell > 0)
        .map(|(idx, _)| idx)
        .collect()
}
