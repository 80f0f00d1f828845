//! 触控点编号集合
//!
//! 每个 tracking_id 占一位，遍历顺序固定为从小到大

use std::fmt;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IdSet(u64);

impl IdSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// 超出 64 位的编号直接忽略
    pub fn insert(&mut self, id: usize) {
        if id < u64::BITS as usize {
            self.0 |= 1 << id;
        }
    }

    pub fn contains(&self, id: usize) -> bool {
        id < u64::BITS as usize && (self.0 >> id) & 1 == 1
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn intersection(&self, other: IdSet) -> IdSet {
        IdSet(self.0 & other.0)
    }

    pub fn difference(&self, other: IdSet) -> IdSet {
        IdSet(self.0 & !other.0)
    }

    pub fn is_subset(&self, other: IdSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn iter(&self) -> IdIter {
        IdIter(self.0)
    }
}

impl fmt::Debug for IdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<usize> for IdSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = IdSet::empty();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl IntoIterator for IdSet {
    type Item = usize;
    type IntoIter = IdIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 从最低位开始依次取出置位的编号
pub struct IdIter(u64);

impl Iterator for IdIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }
        let id = self.0.trailing_zeros() as usize;
        // 清除最低位
        self.0 &= self.0 - 1;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for IdIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterate_ascending() {
        let set: IdSet = [9, 0, 63, 4].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 4, 9, 63]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn ignore_out_of_range() {
        let mut set = IdSet::empty();
        set.insert(64);
        set.insert(200);
        assert!(set.is_empty());
        assert!(!set.contains(64));
    }

    #[test]
    fn set_operations() {
        let a: IdSet = [1, 2, 3].into_iter().collect();
        let b: IdSet = [2, 3, 4].into_iter().collect();
        assert_eq!(a.intersection(b).iter().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(a.difference(b).iter().collect::<Vec<_>>(), vec![1]);
        assert!(a.intersection(b).is_subset(a));
        assert!(!a.is_subset(b));
    }
}
