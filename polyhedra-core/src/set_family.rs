use crate::types::{RowId, RowSet};

/// Ordered family of equally-sized bitsets, one per node.
///
/// This is the value type for every incidence and adjacency relation: set `i` holds the
/// members related to node `i`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SetFamily {
    set_capacity: usize,
    sets: Vec<RowSet>,
}

#[derive(Clone, Debug)]
pub struct SetFamilyBuilder {
    set_capacity: usize,
    sets: Vec<RowSet>,
}

/// Rows split by how they sit in an incidence family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncidenceClasses {
    /// Rows whose face is empty, contained in another row's face, or declared linear.
    pub redundant: RowSet,
    /// Rows incident to every output node.
    pub dominant: RowSet,
}

impl SetFamily {
    pub fn new(family_size: usize, set_capacity: usize) -> Self {
        SetFamilyBuilder::new(family_size, set_capacity).build()
    }

    pub fn from_sets(set_capacity: usize, mut sets: Vec<RowSet>) -> Self {
        for set in &mut sets {
            if set.len() != set_capacity {
                set.resize(set_capacity);
            }
        }
        Self { set_capacity, sets }
    }

    pub fn builder(family_size: usize, set_capacity: usize) -> SetFamilyBuilder {
        SetFamilyBuilder::new(family_size, set_capacity)
    }

    pub fn family_size(&self) -> usize {
        self.sets.len()
    }

    pub fn set_capacity(&self) -> usize {
        self.set_capacity
    }

    pub fn sets(&self) -> &[RowSet] {
        &self.sets
    }

    pub fn set(&self, index: usize) -> Option<&RowSet> {
        self.sets.get(index)
    }

    /// True when every set is empty.
    pub fn is_empty(&self) -> bool {
        self.sets.iter().all(RowSet::is_empty)
    }

    pub fn to_index_lists(&self) -> Vec<Vec<usize>> {
        self.sets.iter().map(RowSet::to_indices).collect()
    }

    pub fn transpose(&self) -> Self {
        let mut out = SetFamily::builder(self.set_capacity, self.family_size());
        for (idx, set) in self.sets.iter().enumerate() {
            for member in set.iter() {
                out.insert_into_set(member.as_index(), RowId::new(idx));
            }
        }
        out.build()
    }

    /// Square family where `j ∈ S[i]` iff `i ∈ S[j]`.
    pub fn is_symmetric(&self) -> bool {
        if self.set_capacity != self.family_size() {
            return false;
        }
        self.sets.iter().enumerate().all(|(i, set)| {
            set.iter()
                .all(|j| self.sets[j.as_index()].contains(RowId::new(i)))
        })
    }

    /// Classifies input rows from their incidence sets against the output rows.
    ///
    /// Rows are scanned from the back, so among rows with identical incidence the earliest
    /// survives. Rows in `linearity` are always reported redundant.
    pub fn classify_input_incidence(
        &self,
        linearity: &RowSet,
        output_rows: usize,
    ) -> IncidenceClasses {
        let size = self.family_size();
        let mut dominant = RowSet::new(size);
        let mut redundant = RowSet::new(size);
        let cards: Vec<usize> = self.sets.iter().map(RowSet::cardinality).collect();

        for (idx, &card) in cards.iter().enumerate() {
            if card == output_rows {
                dominant.insert(idx);
            }
        }

        for idx in (0..size).rev() {
            let current = &self.sets[idx];
            if current.is_empty() {
                redundant.insert(idx);
                continue;
            }
            let covered = (0..size).any(|other| {
                other != idx
                    && !redundant.contains(other)
                    && !dominant.contains(other)
                    && cards[other] >= cards[idx]
                    && current.subset_of(&self.sets[other])
            });
            if covered {
                redundant.insert(idx);
            }
        }

        for row in linearity.iter() {
            if row.as_index() < size {
                redundant.insert(row);
            }
        }

        IncidenceClasses {
            redundant,
            dominant,
        }
    }
}

impl SetFamilyBuilder {
    pub fn new(family_size: usize, set_capacity: usize) -> Self {
        Self {
            set_capacity,
            sets: vec![RowSet::new(set_capacity); family_size],
        }
    }

    pub fn family_size(&self) -> usize {
        self.sets.len()
    }

    pub fn set_capacity(&self) -> usize {
        self.set_capacity
    }

    pub fn replace_set(&mut self, set_idx: usize, mut set: RowSet) {
        debug_assert!(set_idx < self.sets.len(), "set index out of bounds");
        if set.len() != self.set_capacity {
            set.resize(self.set_capacity);
        }
        self.sets[set_idx] = set;
    }

    pub fn insert_into_set(&mut self, set_idx: usize, value: RowId) {
        debug_assert!(set_idx < self.sets.len(), "set index out of bounds");
        self.sets[set_idx].insert(value);
    }

    pub fn build(self) -> SetFamily {
        SetFamily {
            set_capacity: self.set_capacity,
            sets: self.sets,
        }
    }
}

/// A family of sorted index lists over a fixed universe.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ListFamily {
    sets: Vec<Vec<usize>>,
    universe: usize,
}

impl ListFamily {
    pub fn new(mut sets: Vec<Vec<usize>>, universe: usize) -> Self {
        for s in &mut sets {
            s.sort_unstable();
            s.dedup();
        }
        Self { sets, universe }
    }

    pub fn from_sorted_sets(sets: Vec<Vec<usize>>, universe: usize) -> Self {
        debug_assert!(sets.iter().all(|s| s.windows(2).all(|w| w[0] < w[1])));
        debug_assert!(sets.iter().all(|s| s.iter().all(|&x| x < universe)));
        Self { sets, universe }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    #[inline]
    pub fn universe_size(&self) -> usize {
        self.universe
    }

    #[inline]
    pub fn set(&self, idx: usize) -> Option<&[usize]> {
        self.sets.get(idx).map(Vec::as_slice)
    }

    #[inline]
    pub fn sets(&self) -> &[Vec<usize>] {
        &self.sets
    }

    #[inline]
    pub fn into_sets(self) -> Vec<Vec<usize>> {
        self.sets
    }
}

impl From<&SetFamily> for ListFamily {
    fn from(family: &SetFamily) -> Self {
        ListFamily::from_sorted_sets(family.to_index_lists(), family.set_capacity())
    }
}

impl From<ListFamily> for SetFamily {
    fn from(family: ListFamily) -> Self {
        let ListFamily { sets, universe } = family;
        let sets = sets
            .iter()
            .map(|s| RowSet::from_indices(universe, s))
            .collect();
        SetFamily::from_sets(universe, sets)
    }
}
