use rand::Rng;

use super::*;

pub trait GnpGenerator: Sized {
    /// Generates a Gilbert `G(n,p)` graph: n nodes, each of the
    /// `n(n-1)/2` possible edges present independently with probability p.
    fn random_gnp<R: Rng>(rng: &mut R, n: Node, p: f64) -> Self;
}

impl<G> GnpGenerator for G
where
    G: GraphNew + GraphEdgeEditing,
{
    fn random_gnp<R: Rng>(rng: &mut R, n: Node, p: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&p));
        let mut result = Self::new(n);

        for u in 0..n {
            for v in (u + 1)..n {
                if rng.gen_bool(p) {
                    result.add_edge(u, v);
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn edge_count_matches_density() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x5eed);

        for p in [0.05, 0.2, 0.5] {
            let repeats = 50;
            let n = 60;

            let mean_edges = (0..repeats)
                .map(|_| AdjArray::random_gnp(&mut rng, n, p).number_of_edges() as f64)
                .sum::<f64>()
                / repeats as f64;

            let expected = p * (n as f64) * ((n - 1) as f64) / 2.0;
            assert!((0.75 * expected..1.25 * expected).contains(&mean_edges));
        }
    }

    #[test]
    fn extreme_probabilities() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        assert_eq!(AdjArray::random_gnp(&mut rng, 20, 0.0).number_of_edges(), 0);
        assert_eq!(
            AdjArray::random_gnp(&mut rng, 20, 1.0).number_of_edges(),
            20 * 19 / 2
        );
    }
}
