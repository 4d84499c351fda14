use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};

use polyhedra_core::types::RowSet;
use smallvec::SmallVec;

use crate::dd::ray::RayId;

#[derive(Clone, Copy, Debug, Default)]
struct BuildIdentityHasher;

/// Keys are already hashes; pass them through unchanged.
#[derive(Clone, Copy, Debug, Default)]
struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        debug_assert_eq!(bytes.len(), 8, "IdentityHasher expects u64 keys");
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        self.0 = u64::from_ne_bytes(arr);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }
}

impl BuildHasher for BuildIdentityHasher {
    type Hasher = IdentityHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher(0)
    }
}

type Bucket = SmallVec<[RayId; 4]>;

/// Active rays bucketed by a hash of their zero set, used to find duplicate rays.
#[derive(Clone, Debug)]
pub(crate) struct RayZeroSetIndex {
    hasher: ahash::RandomState,
    map: HashMap<u64, Bucket, BuildIdentityHasher>,
}

impl Default for RayZeroSetIndex {
    fn default() -> Self {
        Self {
            hasher: ahash::RandomState::with_seeds(
                0x243f_6a88_85a3_08d3,
                0x1319_8a2e_0370_7344,
                0xa409_3822_299f_31d0,
                0x082e_fa98_ec4e_6c89,
            ),
            map: HashMap::default(),
        }
    }
}

impl RayZeroSetIndex {
    pub(crate) fn signature(&self, zero_set: &RowSet) -> u64 {
        self.hasher.hash_one(zero_set)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }

    pub(crate) fn register(&mut self, id: RayId, sig: u64) {
        self.map.entry(sig).or_default().push(id);
    }

    pub(crate) fn unregister(&mut self, id: RayId, sig: u64) {
        let Some(bucket) = self.map.get_mut(&sig) else {
            return;
        };
        if let Some(pos) = bucket.iter().position(|&x| x == id) {
            bucket.swap_remove(pos);
        }
        if bucket.is_empty() {
            self.map.remove(&sig);
        }
    }

    #[inline]
    pub(crate) fn candidates(&self, sig: u64) -> &[RayId] {
        self.map.get(&sig).map_or(&[], SmallVec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::RayZeroSetIndex;
    use crate::dd::ray::RayId;
    use polyhedra_core::types::RowSet;

    #[test]
    fn equal_zero_sets_share_a_bucket() {
        let mut index = RayZeroSetIndex::default();
        let a = RowSet::from_indices(70, &[1, 65]);
        let b = RowSet::from_indices(70, &[1, 65]);
        let sig = index.signature(&a);
        assert_eq!(sig, index.signature(&b));
        index.register(RayId(0), sig);
        index.register(RayId(4), sig);
        index.unregister(RayId(0), sig);
        assert_eq!(index.candidates(sig), &[RayId(4)]);
        index.unregister(RayId(4), sig);
        assert!(index.candidates(sig).is_empty());
    }
}
