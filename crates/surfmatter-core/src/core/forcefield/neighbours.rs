use kiddo::{ImmutableKdTree, SquaredEuclidean};
use nalgebra::Point3;

/// Fixed-cutoff neighbour search backed by a k-d tree.
///
/// Pairs are reported once, as `(i, j)` with `i < j`, sorted so that the order does not
/// depend on the tree layout.
#[derive(Debug, Clone)]
pub struct NeighbourList {
    cutoff: f64,
    pairs: Vec<(usize, usize)>,
}

impl NeighbourList {
    pub fn build(positions: &[Point3<f64>], cutoff: f64) -> Self {
        if positions.len() < 2 || !(cutoff > 0.0) {
            return Self {
                cutoff,
                pairs: Vec::new(),
            };
        }

        let points: Vec<[f64; 3]> = positions.iter().map(|p| [p.x, p.y, p.z]).collect();
        // The immutable tree tolerates many points sharing a coordinate, as on a flat plane.
        let kdtree: ImmutableKdTree<f64, 3> = ImmutableKdTree::new_from_slice(&points);
        let cutoff_sq = cutoff * cutoff;

        let mut pairs = Vec::new();
        for (i, point) in points.iter().enumerate() {
            for neighbour in kdtree.within_unsorted::<SquaredEuclidean>(point, cutoff_sq) {
                let j = neighbour.item as usize;
                if j > i && (positions[j] - positions[i]).norm_squared() < cutoff_sq {
                    pairs.push((i, j));
                }
            }
        }
        pairs.sort_unstable();

        Self { cutoff, pairs }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
