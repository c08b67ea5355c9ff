/// Name of the implicit group that always contains every particle.
pub const ALL_GROUP: &str = "all";

/// A named, ordered set of particle indices selected for integration.
///
/// Groups let distinct dynamics run on disjoint subsets of the same system. The index
/// list is validated on insertion into a [`ParticleSystem`](super::system::ParticleSystem)
/// (in range, no duplicates) and never changes while a step is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    indices: Vec<usize>,
}

impl Group {
    pub fn new(name: &str, indices: Vec<usize>) -> Self {
        Self {
            name: name.to_string(),
            indices,
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Returns a membership mask of length `size` with `true` at every index in the group.
    pub fn mask(&self, size: usize) -> Vec<bool> {
        let mut mask = vec![false; size];
        for &i in &self.indices {
            if i < size {
                mask[i] = true;
            }
        }
        mask
    }

    pub(crate) fn push(&mut self, index: usize) {
        self.indices.push(index);
    }
}
