/// Set of category indices backed by a bitset.
///
/// Indices refer to positions in a `CategoryDimension`.
///
/// Ordering contract:
/// - Iteration yields indices in ascending order, i.e. dimension order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    words: Vec<u64>,
    len: usize,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut s = Self::new();
        for i in indices {
            s.insert(i);
        }
        s
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        let (word, bit) = word_bit(index);
        self.words
            .get(word)
            .is_some_and(|w| (w & (1u64 << bit)) != 0)
    }

    /// Returns `true` if the set changed.
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, bit) = word_bit(index);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        let w = &mut self.words[word];
        if (*w & mask) != 0 {
            return false;
        }
        *w |= mask;
        self.len += 1;
        true
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, index: usize) -> bool {
        let (word, bit) = word_bit(index);
        let Some(w) = self.words.get_mut(word) else {
            return false;
        };
        let mask = 1u64 << bit;
        if (*w & mask) == 0 {
            return false;
        }
        *w &= !mask;
        self.len -= 1;
        true
    }

    /// Flips membership; returns whether `index` is now in the set.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.remove(index) {
            false
        } else {
            self.insert(index);
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &w)| {
            (0..64usize)
                .filter(move |bit| (w & (1u64 << bit)) != 0)
                .map(move |bit| wi * 64 + bit)
        })
    }
}

fn word_bit(index: usize) -> (usize, u32) {
    (index / 64, (index % 64) as u32)
}

#[cfg(test)]
mod tests {
    use super::CategorySet;

    #[test]
    fn insert_remove_contains_and_len() {
        let mut s = CategorySet::new();
        assert!(s.is_empty());
        assert!(s.insert(3));
        assert!(!s.insert(3));
        assert!(s.contains(3));
        assert_eq!(s.len(), 1);
        assert!(s.remove(3));
        assert!(!s.remove(3));
        assert!(!s.remove(500));
        assert!(s.is_empty());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut s = CategorySet::from_indices([1, 4]);
        assert!(!s.toggle(4));
        assert!(s.toggle(9));
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![1, 9]);
    }

    #[test]
    fn iter_is_sorted_across_words() {
        let s = CategorySet::from_indices([65, 2, 10]);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![2, 10, 65]);
        let mut s = s;
        s.clear();
        assert_eq!(s.iter().count(), 0);
    }
}
