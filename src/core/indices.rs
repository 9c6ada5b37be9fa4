use hashbrown::HashMap;

use crate::compound::Compound;

/// Row positions grouped by key.
pub type VecIndex<K> = HashMap<K, Vec<usize>>;

/// Row positions ordered by monoisotopic mass, for binary-searched range scans.
#[derive(Debug, Default)]
pub struct MassIndex {
    entries: Vec<(f64, usize)>,
}

impl MassIndex {
    /// Sorts the positions of `rows` by mass.
    pub fn build(rows: &[Compound]) -> Self {
        let mut entries: Vec<(f64, usize)> = rows
            .iter()
            .enumerate()
            .map(|(pos, c)| (c.monoisotopic_mass, pos))
            .collect();
        entries.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        Self { entries }
    }

    /// Entries with `low <= mass <= high`.
    pub fn range(&self, low: f64, high: f64) -> &[(f64, usize)] {
        let start = self.entries.partition_point(|(m, _)| *m < low);
        let end = self.entries.partition_point(|(m, _)| *m <= high);
        if end <= start {
            return &[];
        }
        &self.entries[start..end]
    }

    /// Smallest indexed mass.
    pub fn lightest(&self) -> Option<f64> {
        self.entries.first().map(|(m, _)| *m)
    }

    /// Largest indexed mass.
    pub fn heaviest(&self) -> Option<f64> {
        self.entries.last().map(|(m, _)| *m)
    }
}
