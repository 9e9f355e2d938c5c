use bitvec::prelude::*;

use super::NumNodes;
use std::fmt;

/// Fixed-size set of vertices with a cached cardinality.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BitSet {
    cardinality: NumNodes,
    bits: BitVec,
}

impl BitSet {
    pub fn new(size: NumNodes) -> Self {
        Self {
            cardinality: 0,
            bits: bitvec![0; size as usize],
        }
    }

    pub fn new_all_set(size: NumNodes) -> Self {
        Self {
            cardinality: size,
            bits: bitvec![1; size as usize],
        }
    }

    /// Sets bit `idx` and returns its previous value.
    pub fn set_bit(&mut self, idx: NumNodes) -> bool {
        let prev = self.bits.replace(idx as usize, true);
        self.cardinality += !prev as NumNodes;
        prev
    }

    /// Clears bit `idx` and returns its previous value.
    pub fn unset_bit(&mut self, idx: NumNodes) -> bool {
        let prev = self.bits.replace(idx as usize, false);
        self.cardinality -= prev as NumNodes;
        prev
    }

    pub fn set_bits(&mut self, bits: impl IntoIterator<Item = NumNodes>) {
        for b in bits {
            self.set_bit(b);
        }
    }

    pub fn get_bit(&self, idx: NumNodes) -> bool {
        self.bits[idx as usize]
    }

    pub fn cardinality(&self) -> NumNodes {
        self.cardinality
    }

    pub fn len(&self) -> NumNodes {
        self.bits.len() as NumNodes
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn are_all_set(&self) -> bool {
        self.cardinality as usize == self.bits.len()
    }

    pub fn iter_set_bits(&self) -> impl Iterator<Item = NumNodes> + '_ {
        self.bits.iter_ones().map(|i| i as NumNodes)
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter_set_bits()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_unset() {
        let mut bs = BitSet::new(70);
        assert_eq!(bs.cardinality(), 0);
        assert!(!bs.set_bit(3));
        assert!(bs.set_bit(3));
        assert!(!bs.set_bit(64));
        assert_eq!(bs.cardinality(), 2);
        assert!(bs.get_bit(3) && bs.get_bit(64));

        assert!(bs.unset_bit(3));
        assert!(!bs.unset_bit(3));
        assert_eq!(bs.cardinality(), 1);
        assert_eq!(bs.iter_set_bits().collect::<Vec<_>>(), vec![64]);
    }

    #[test]
    fn all_set() {
        let mut bs = BitSet::new(5);
        assert!(!bs.are_all_set());
        bs.set_bits(0..5);
        assert!(bs.are_all_set());
        assert_eq!(bs, BitSet::new_all_set(5));
    }
}
