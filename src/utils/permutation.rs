use crate::graph::Color;
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniform bijection over the colors `1..=k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPermutation(Vec<Color>);

impl ColorPermutation {
    pub fn generate(k: u32, rng: &mut impl Rng) -> Self {
        let mut values: Vec<Color> = (1..=k).collect();
        values.shuffle(rng);
        ColorPermutation(values)
    }

    /// Image of `color`, or `None` outside `1..=k`.
    pub fn apply(&self, color: Color) -> Option<Color> {
        let index = color.checked_sub(1)? as usize;
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn permutation_is_a_bijection() {
        let mut rng = StdRng::seed_from_u64(5);
        let perm = ColorPermutation::generate(6, &mut rng);
        let mut images: Vec<_> = (1..=6).map(|c| perm.apply(c).unwrap()).collect();
        images.sort_unstable();
        assert_eq!(images, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(perm.apply(0), None);
        assert_eq!(perm.apply(7), None);
    }

    #[test]
    fn every_arrangement_of_three_colors_appears() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..600 {
            let perm = ColorPermutation::generate(3, &mut rng);
            seen.insert((perm.apply(1), perm.apply(2), perm.apply(3)));
        }
        assert_eq!(seen.len(), 6);
    }
}
