use super::interval::{Interval, STRIDE};

/// Flat `(lower, upper, weight)` triples for the intervals of one side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedBuffer {
    slots: Vec<f64>,
}

impl PackedBuffer {
    pub fn with_capacity(intervals: usize) -> Self {
        Self {
            slots: Vec::with_capacity(intervals * STRIDE),
        }
    }

    pub fn push(&mut self, interval: &Interval) {
        interval.write_slots(&mut self.slots);
    }

    /// Number of intervals held.
    pub fn len(&self) -> usize {
        self.slots.len() / STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.slots
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.slots
    }

    /// A zeroed keep mask sized for this buffer.
    pub fn new_mask(&self) -> Vec<u8> {
        vec![0; self.len()]
    }
}

impl FromIterator<Interval> for PackedBuffer {
    fn from_iter<T: IntoIterator<Item = Interval>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut buffer = PackedBuffer::with_capacity(iter.size_hint().0);
        for interval in iter {
            buffer.push(&interval);
        }
        buffer
    }
}

/// Pack the interval of every item, in item order.
pub fn encode<T, F>(items: &[T], accessor: F) -> PackedBuffer
where
    F: Fn(&T) -> Interval,
{
    let mut buffer = PackedBuffer::with_capacity(items.len());
    for item in items {
        buffer.push(&accessor(item));
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label {
        y: f64,
        value: f64,
    }

    #[test]
    fn encodes_in_item_order() {
        let labels = [
            Label { y: 5.0, value: 12.6 },
            Label { y: -3.0, value: 4.0 },
        ];
        let buffer = encode(&labels, |label| {
            Interval::new(label.y, label.y + 36.0, label.value)
        });
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.as_slice(), &[5.0, 41.0, 12.0, -3.0, 33.0, 4.0]);
    }

    #[test]
    fn empty_input_gives_empty_buffer() {
        let labels: [Label; 0] = [];
        let buffer = encode(&labels, |label| Interval::new(label.y, label.y, label.value));
        assert!(buffer.is_empty());
        assert!(buffer.new_mask().is_empty());
    }

    #[test]
    fn collects_from_intervals() {
        let buffer: PackedBuffer = [Interval::new(1.0, 2.0, 3.0)].into_iter().collect();
        assert_eq!(buffer.into_inner(), vec![1.0, 2.0, 3.0]);
    }
}
