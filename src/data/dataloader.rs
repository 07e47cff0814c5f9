use rand::seq::SliceRandom;
use rand::Rng;

/// Iterator over mini-batches of sample indices.
///
/// When `shuffle` is true the index order is randomly permuted once on
/// construction. The last batch may be shorter than `batch_size`.
pub struct DataLoader {
    order: Vec<usize>,
    batch_size: usize,
    index: usize,
}

impl DataLoader {
    /// Create a loader over `0..len`. A `batch_size` of zero is treated as one.
    pub fn new<R: Rng + ?Sized>(len: usize, batch_size: usize, shuffle: bool, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        if shuffle {
            order.shuffle(rng);
        }
        Self {
            order,
            batch_size: batch_size.max(1),
            index: 0,
        }
    }
}

impl Iterator for DataLoader {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.order.len() {
            return None;
        }
        let end = (self.index + self.batch_size).min(self.order.len());
        let batch = self.order[self.index..end].to_vec();
        self.index = end;
        Some(batch)
    }
}

/// Collect every batch for one pass over `0..len`.
pub fn batch_indices<R: Rng + ?Sized>(
    len: usize,
    batch_size: usize,
    shuffle: bool,
    rng: &mut R,
) -> Vec<Vec<usize>> {
    DataLoader::new(len, batch_size, shuffle, rng).collect()
}
