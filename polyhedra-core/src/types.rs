use std::fmt;
use std::str::FromStr;

pub type Row = usize;
pub type Col = usize;

/// Maps each original row to its new position, or a negative value when the row was removed.
pub type RowIndex = Vec<isize>;

const WORD_BITS: usize = u64::BITS as usize;

#[inline(always)]
fn word_count(len: usize) -> usize {
    len.div_ceil(WORD_BITS)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RowId(usize);

impl RowId {
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline(always)]
    pub const fn as_index(self) -> usize {
        self.0
    }
}

impl From<usize> for RowId {
    #[inline(always)]
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl From<RowId> for usize {
    #[inline(always)]
    fn from(value: RowId) -> Self {
        value.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed-domain bitset over row indices `0..len`.
///
/// `len()` is the size of the domain, `cardinality()` the number of members.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RowSet {
    len: usize,
    words: Vec<u64>,
}

impl RowSet {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            words: vec![0; word_count(len)],
        }
    }

    pub fn full(len: usize) -> Self {
        let mut set = Self::new(len);
        for w in &mut set.words {
            *w = u64::MAX;
        }
        set.trim_tail();
        set
    }

    pub fn from_indices(len: usize, indices: &[usize]) -> Self {
        let mut set = Self::new(len);
        for &idx in indices {
            set.insert(idx);
        }
        set
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the set has no members (regardless of its domain size).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn contains(&self, id: impl Into<RowId>) -> bool {
        let idx = id.into().as_index();
        if idx >= self.len {
            return false;
        }
        self.words[idx / WORD_BITS] & (1u64 << (idx % WORD_BITS)) != 0
    }

    #[inline]
    pub fn insert(&mut self, id: impl Into<RowId>) {
        let idx = id.into().as_index();
        assert!(
            idx < self.len,
            "row index out of range (index={idx}, len={})",
            self.len
        );
        self.words[idx / WORD_BITS] |= 1u64 << (idx % WORD_BITS);
    }

    #[inline]
    pub fn remove(&mut self, id: impl Into<RowId>) {
        let idx = id.into().as_index();
        if idx < self.len {
            self.words[idx / WORD_BITS] &= !(1u64 << (idx % WORD_BITS));
        }
    }

    pub fn clear(&mut self) {
        for w in &mut self.words {
            *w = 0;
        }
    }

    /// Changes the domain size, dropping members that fall outside it.
    pub fn resize(&mut self, len: usize) {
        self.len = len;
        self.words.resize(word_count(len), 0);
        self.trim_tail();
    }

    pub fn copy_from(&mut self, other: &RowSet) {
        self.len = other.len;
        self.words.clear();
        self.words.extend_from_slice(&other.words);
    }

    pub fn union_inplace(&mut self, other: &RowSet) {
        debug_assert_eq!(self.len, other.len, "row set domain mismatch");
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }

    pub fn intersection_inplace(&mut self, other: &RowSet) {
        debug_assert_eq!(self.len, other.len, "row set domain mismatch");
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= *b;
        }
    }

    pub fn difference_inplace(&mut self, other: &RowSet) {
        debug_assert_eq!(self.len, other.len, "row set domain mismatch");
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= !*b;
        }
    }

    pub fn intersection(&self, other: &RowSet) -> RowSet {
        let mut out = self.clone();
        out.intersection_inplace(other);
        out
    }

    pub fn intersection_count(&self, other: &RowSet) -> usize {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    pub fn subset_of(&self, other: &RowSet) -> bool {
        self.words
            .iter()
            .zip(other.words.iter().chain(std::iter::repeat(&0)))
            .all(|(a, b)| a & !b == 0)
    }

    pub fn complement(&self) -> RowSet {
        let mut out = self.clone();
        for w in &mut out.words {
            *w = !*w;
        }
        out.trim_tail();
        out
    }

    pub fn first(&self) -> Option<RowId> {
        self.iter().next()
    }

    pub fn iter(&self) -> SetIter<'_> {
        SetIter {
            set: self,
            next: 0,
            complement: false,
        }
    }

    pub fn to_indices(&self) -> Vec<usize> {
        self.iter().raw().collect()
    }

    fn trim_tail(&mut self) {
        let rem = self.len % WORD_BITS;
        if rem != 0
            && let Some(last) = self.words.last_mut()
        {
            *last &= (1u64 << rem) - 1;
        }
    }
}

impl fmt::Debug for RowSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().raw()).finish()
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = RowId;
    type IntoIter = SetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over the members (or non-members) of a [`RowSet`].
#[derive(Clone, Debug)]
pub struct SetIter<'a> {
    set: &'a RowSet,
    next: usize,
    complement: bool,
}

impl<'a> SetIter<'a> {
    /// Iterates the indices missing from the set instead.
    pub fn complement(self) -> SetIter<'a> {
        SetIter {
            complement: !self.complement,
            ..self
        }
    }

    pub fn raw(self) -> impl Iterator<Item = usize> + 'a {
        self.map(RowId::as_index)
    }
}

impl Iterator for SetIter<'_> {
    type Item = RowId;

    fn next(&mut self) -> Option<RowId> {
        while self.next < self.set.len {
            let idx = self.next;
            let word = self.set.words[idx / WORD_BITS];
            let word = if self.complement { !word } else { word };
            let shifted = word >> (idx % WORD_BITS);
            if shifted == 0 {
                self.next = (idx / WORD_BITS + 1) * WORD_BITS;
                continue;
            }
            let hit = idx + shifted.trailing_zeros() as usize;
            if hit >= self.set.len {
                self.next = self.set.len;
                return None;
            }
            self.next = hit + 1;
            return Some(RowId::new(hit));
        }
        None
    }
}

/// Which side of the H/V duality a matrix describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RepresentationKind {
    Inequality,
    Generator,
}

impl RepresentationKind {
    pub fn dual(self) -> Self {
        match self {
            RepresentationKind::Inequality => RepresentationKind::Generator,
            RepresentationKind::Generator => RepresentationKind::Inequality,
        }
    }

    /// Header line used by the cdd text format.
    pub fn header(self) -> &'static str {
        match self {
            RepresentationKind::Inequality => "H-representation",
            RepresentationKind::Generator => "V-representation",
        }
    }
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownRepresentation(pub String);

impl fmt::Display for UnknownRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown representation `{}`", self.0)
    }
}

impl std::error::Error for UnknownRepresentation {}

impl FromStr for RepresentationKind {
    type Err = UnknownRepresentation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "h-representation" | "inequality" | "inequalities" => {
                Ok(RepresentationKind::Inequality)
            }
            "v" | "v-representation" | "generator" | "generators" => {
                Ok(RepresentationKind::Generator)
            }
            _ => Err(UnknownRepresentation(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ComputationStatus {
    InProgress,
    AllFound,
    RegionEmpty,
}

#[cfg(test)]
mod tests {
    use super::{RepresentationKind, RowId, RowSet};

    #[test]
    fn iteration_crosses_word_boundaries() {
        let set = RowSet::from_indices(130, &[0, 63, 64, 129]);
        assert_eq!(set.to_indices(), vec![0, 63, 64, 129]);
        assert_eq!(set.cardinality(), 4);
        assert_eq!(set.iter().complement().count(), 126);
    }

    #[test]
    fn complement_respects_domain() {
        let set = RowSet::from_indices(5, &[1, 3]);
        assert_eq!(set.complement().to_indices(), vec![0, 2, 4]);
        assert_eq!(
            set.iter().complement().raw().collect::<Vec<_>>(),
            vec![0, 2, 4]
        );
        assert_eq!(RowSet::full(5).cardinality(), 5);
    }

    #[test]
    fn subset_and_resize() {
        let mut a = RowSet::from_indices(8, &[1, 2]);
        let b = RowSet::from_indices(8, &[1, 2, 5]);
        assert!(a.subset_of(&b));
        assert!(!b.subset_of(&a));
        a.resize(2);
        assert_eq!(a.to_indices(), vec![1]);
        assert!(!a.contains(RowId::new(2)));
    }

    #[test]
    fn representation_kind_parses_cdd_headers() {
        assert_eq!(
            "H-representation".parse::<RepresentationKind>(),
            Ok(RepresentationKind::Inequality)
        );
        assert_eq!(
            "v".parse::<RepresentationKind>(),
            Ok(RepresentationKind::Generator)
        );
        assert!("x".parse::<RepresentationKind>().is_err());
        assert_eq!(
            RepresentationKind::Inequality.dual(),
            RepresentationKind::Generator
        );
    }
}
