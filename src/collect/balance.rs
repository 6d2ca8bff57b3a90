use std::collections::BTreeMap;

/// Running per-class counters sharing one target. A counter never exceeds
/// the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBalance {
    counts: BTreeMap<String, usize>,
    target: usize,
}

impl ClassBalance {
    pub fn new<I, S>(classes: I, target: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            counts: classes.into_iter().map(|class| (class.into(), 0)).collect(),
            target,
        }
    }

    /// Seeds a known class with an existing count, clamped to the target.
    /// Returns false for classes this balance does not track.
    pub fn seed(&mut self, class: &str, count: usize) -> bool {
        match self.counts.get_mut(class) {
            Some(slot) => {
                *slot = count.min(self.target);
                true
            }
            None => false,
        }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn count(&self, class: &str) -> usize {
        self.counts.get(class).copied().unwrap_or(0)
    }

    pub fn has_room(&self, class: &str) -> bool {
        self.counts
            .get(class)
            .is_some_and(|count| *count < self.target)
    }

    pub fn try_increment(&mut self, class: &str) -> bool {
        match self.counts.get_mut(class) {
            Some(count) if *count < self.target => {
                *count += 1;
                true
            }
            _ => false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.counts.values().all(|count| *count >= self.target)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }
}
