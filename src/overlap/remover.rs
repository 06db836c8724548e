use std::collections::BTreeMap;

use super::decode::filter;
use super::encode::encode;
use super::interval::Interval;
use super::resolve::{Strategy, resolve_with};
use crate::error::Result;

/// Encode, resolve and decode in one call.
///
/// Holds no state besides the strategy, so one remover can serve every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelRemover {
    pub strategy: Strategy,
}

impl LabelRemover {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    /// Items of a single overlap domain that survive resolution.
    pub fn retain<'a, T, F>(&self, items: &'a [T], accessor: F) -> Result<Vec<&'a T>>
    where
        F: Fn(&T) -> Interval,
    {
        let buffer = encode(items, accessor);
        let mut mask = buffer.new_mask();
        resolve_with(buffer.as_slice(), &mut mask, self.strategy)?;
        filter(items.iter(), &mask)
    }

    /// Split `items` into independent domains and resolve each one on its own.
    ///
    /// Intervals from different domains never compete. The result lists the
    /// kept items domain by domain (in key order), and in original order
    /// within a domain.
    pub fn retain_by_domain<'a, T, K, D, F>(
        &self,
        items: &'a [T],
        domain_of: D,
        accessor: F,
    ) -> Result<Vec<&'a T>>
    where
        K: Ord,
        D: Fn(&T) -> K,
        F: Fn(&T) -> Interval,
    {
        let mut domains: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
        for item in items {
            domains.entry(domain_of(item)).or_default().push(item);
        }

        let mut kept = Vec::with_capacity(items.len());
        for members in domains.values() {
            let survivors = self.retain(members, |item: &&T| accessor(*item))?;
            kept.extend(survivors.into_iter().copied());
        }
        Ok(kept)
    }
}
