//! Exact score distributions for *p-value* computation.
//!
//! This module computes the distribution of the scores that a window drawn
//! from the background model reaches with a [`ScoringMatrix`]. Starting from
//! a single score of `0.0` with probability `1.0`, every position of the
//! matrix is convolved with the background frequencies, merging identical
//! scores together. The resulting buckets are sorted by decreasing score,
//! which is the order used to select thresholds and compute *p-values*.
//!
//! The number of buckets grows as `K^L` in the worst case, for a motif of
//! length `L` over `K` background symbols. A [`Resolution::Granular`]
//! distribution merges scores on a fixed grid instead, which bounds the
//! number of buckets by the score range divided by the granularity.
//!
//! # Example
//! ```
//! # use motifscan::*;
//! # let counts = CountMatrix::<Dna>::from_sequences(
//! #  ["GTTGACCT", "GTTGATCC"]
//! #        .into_iter()
//! #        .map(|s| EncodedSequence::encode(s).unwrap()),
//! # )
//! # .unwrap();
//! # let pssm = counts.to_freq(0.1).to_scoring(&Background::uniform()).unwrap();
//! // Compute the exact distribution of scores for a `ScoringMatrix`
//! let dist = pssm.to_score_distribution();
//!
//! // Get the score threshold corresponding to a *p-value* of 1e-3
//! let threshold = dist.threshold(1e-3).unwrap();
//!
//! // Get the *p-value* for that threshold
//! let pvalue = dist.pvalue(threshold);
//! assert!(pvalue <= 1e-3);
//! ```

use std::collections::HashMap;

use log::debug;
use log::warn;

#[cfg(feature = "sampling")]
use rand::distributions::Distribution;

use crate::abc::Alphabet;
use crate::abc::Symbol;
use crate::err::ScanError;

use super::ScoringMatrix;

#[cfg(feature = "fnv")]
type ScoreHasher = fnv::FnvBuildHasher;
#[cfg(not(feature = "fnv"))]
type ScoreHasher = std::collections::hash_map::RandomState;

/// The map used to merge scores, keyed by [`Resolution::key`].
type ScoreMap = HashMap<u64, (f64, f64), ScoreHasher>;

/// The number of exact buckets above which a warning is emitted.
const BUCKET_WARNING: usize = 1_000_000;

// --- Resolution --------------------------------------------------------------

/// The resolution at which scores are merged into distribution buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Resolution {
    /// Merge scores only when they are exactly equal.
    #[default]
    Exact,
    /// Merge scores falling onto the same multiple of the given granularity.
    ///
    /// *p-values* are exact for a scoring matrix discretized with
    /// [`ScoringMatrix::discretize`] using the same granularity, which
    /// differs from the input matrix by at most half the granularity
    /// at every position.
    Granular(f64),
}

impl Resolution {
    /// Check the resolution can be used to build a distribution.
    pub fn validate(&self) -> Result<(), ScanError> {
        match *self {
            Resolution::Exact => Ok(()),
            Resolution::Granular(g) if g > 0.0 && g.is_finite() => Ok(()),
            Resolution::Granular(g) => Err(ScanError::InvalidGranularity(g)),
        }
    }

    /// Get the representative score of the bucket `score` falls into.
    #[inline]
    pub fn quantize(&self, score: f64) -> f64 {
        match *self {
            // `-0.0` and `0.0` must share a bucket
            Resolution::Exact => score + 0.0,
            Resolution::Granular(g) => (score / g).round() * g,
        }
    }

    /// Get the hash key of a quantized score.
    #[inline]
    fn key(&self, quantized: f64) -> u64 {
        match *self {
            Resolution::Exact => quantized.to_bits(),
            Resolution::Granular(g) => (quantized / g).round() as i64 as u64,
        }
    }
}

// --- ScoreDistribution -------------------------------------------------------

/// The distribution of the scores of a [`ScoringMatrix`] under its background.
#[derive(Debug, Clone)]
pub struct ScoreDistribution<A: Alphabet> {
    /// The resolution the buckets were merged with.
    resolution: Resolution,
    /// The `(score, probability)` buckets, by decreasing score.
    buckets: Vec<(f64, f64)>,
    alphabet: std::marker::PhantomData<A>,
}

impl<A: Alphabet> ScoreDistribution<A> {
    /// Compute the exact score distribution of a scoring matrix.
    pub fn new<S: AsRef<ScoringMatrix<A>>>(pssm: S) -> Self {
        Self::build(pssm.as_ref(), Resolution::Exact)
    }

    /// Compute the score distribution of a scoring matrix at a given resolution.
    pub fn with_resolution<S: AsRef<ScoringMatrix<A>>>(
        pssm: S,
        resolution: Resolution,
    ) -> Result<Self, ScanError> {
        resolution.validate()?;
        Ok(Self::build(pssm.as_ref(), resolution))
    }

    fn build(pssm: &ScoringMatrix<A>, resolution: Resolution) -> Self {
        let background = pssm.background();
        let symbols = background
            .symbols()
            .map(|s| (s.as_index(), background[s]))
            .collect::<Vec<_>>();

        let mut current = ScoreMap::default();
        current.insert(resolution.key(0.0), (0.0, 1.0));

        for row in pssm.matrix().iter() {
            let mut next =
                ScoreMap::with_capacity_and_hasher(current.len() * symbols.len(), Default::default());
            for &(j, frequency) in symbols.iter() {
                for &(score, probability) in current.values() {
                    let s = resolution.quantize(score + row[j]);
                    next.entry(resolution.key(s)).or_insert((s, 0.0)).1 += probability * frequency;
                }
            }
            if resolution == Resolution::Exact
                && current.len() <= BUCKET_WARNING
                && next.len() > BUCKET_WARNING
            {
                warn!(
                    "exact score distribution exceeds {} buckets, consider a granular resolution",
                    BUCKET_WARNING
                );
            }
            current = next;
        }

        let mut buckets = current.into_values().collect::<Vec<_>>();
        buckets.sort_unstable_by(|x, y| y.0.total_cmp(&x.0));
        debug!(
            "computed score distribution with {} buckets for a motif of length {}",
            buckets.len(),
            pssm.len()
        );

        Self {
            resolution,
            buckets,
            alphabet: std::marker::PhantomData,
        }
    }

    /// The resolution the distribution was computed with.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// The `(score, probability)` buckets, sorted by decreasing score.
    #[inline]
    pub fn buckets(&self) -> &[(f64, f64)] {
        &self.buckets
    }

    /// Iterate over the `(score, probability)` buckets by decreasing score.
    #[inline]
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, (f64, f64)>> {
        self.buckets.iter().copied()
    }

    /// The number of distinct scores in the distribution.
    #[inline]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check whether the distribution has no bucket.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// The total probability of the distribution, one up to rounding errors.
    pub fn total(&self) -> f64 {
        self.buckets.iter().map(|&(_, p)| p).sum()
    }

    /// The highest reachable score.
    pub fn max_score(&self) -> f64 {
        self.buckets
            .first()
            .map(|&(s, _)| s)
            .unwrap_or(f64::NEG_INFINITY)
    }

    /// The lowest finite reachable score, if any.
    pub fn min_score(&self) -> Option<f64> {
        self.buckets
            .iter()
            .rev()
            .map(|&(s, _)| s)
            .find(|s| s.is_finite())
    }

    /// Get the minimum *p-value* attainable, i.e. the probability of the
    /// highest score.
    pub fn min_pvalue(&self) -> f64 {
        self.buckets.first().map(|&(_, p)| p).unwrap_or(1.0)
    }

    /// Get the representative score of the bucket `score` falls into.
    #[inline]
    pub fn quantize(&self, score: f64) -> f64 {
        self.resolution.quantize(score)
    }

    /// Get the score threshold for a given *p-value*.
    ///
    /// Buckets are consumed by decreasing score while their cumulated
    /// probability does not exceed `pvalue`; the threshold is the score of
    /// the last bucket consumed. Every score at or above the threshold has
    /// a *p-value* lower or equal to `pvalue`.
    ///
    /// # Errors
    /// Returns [`ScanError::InvalidPvalue`] if `pvalue` is not in `(0, 1)`,
    /// and [`ScanError::IndistinguishableMotif`] if even the highest score
    /// is more probable than `pvalue`.
    pub fn threshold(&self, pvalue: f64) -> Result<f64, ScanError> {
        check_pvalue(pvalue)?;
        let mut threshold = None;
        let mut cumulative = 0.0;
        for &(score, probability) in self.buckets.iter() {
            if cumulative + probability > pvalue {
                break;
            }
            threshold = Some(score);
            cumulative += probability;
        }
        threshold.ok_or(ScanError::IndistinguishableMotif {
            pvalue,
            min_pvalue: self.min_pvalue(),
        })
    }

    /// Get the *p-value* for the given score.
    ///
    /// This is the probability of reaching a score at least as high as
    /// `score` under the background model. It is exact for scores obtained
    /// from windows scored with the same matrix.
    pub fn pvalue(&self, score: f64) -> f64 {
        let score = self.quantize(score);
        let mut pvalue = 0.0;
        for &(s, probability) in self.buckets.iter() {
            if s < score {
                break;
            }
            pvalue += probability;
        }
        pvalue
    }
}

impl<A: Alphabet> From<&'_ ScoringMatrix<A>> for ScoreDistribution<A> {
    fn from(pssm: &'_ ScoringMatrix<A>) -> Self {
        Self::new(pssm)
    }
}

#[cfg(feature = "sampling")]
impl<A: Alphabet> Distribution<f64> for ScoreDistribution<A> {
    /// Draw a score with its background probability.
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let x: f64 = rng.gen();
        let mut cumulative = 0.0;
        for &(score, probability) in self.buckets.iter() {
            cumulative += probability;
            if x < cumulative {
                return score;
            }
        }
        self.buckets
            .last()
            .map(|&(s, _)| s)
            .unwrap_or(f64::NEG_INFINITY)
    }
}

/// Check that a *p-value* lies in the open interval `(0, 1)`.
pub(crate) fn check_pvalue(pvalue: f64) -> Result<(), ScanError> {
    if pvalue > 0.0 && pvalue < 1.0 {
        Ok(())
    } else {
        Err(ScanError::InvalidPvalue(pvalue))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::abc::Background;
    use crate::abc::Dna;
    use crate::dense::DenseMatrix;
    use crate::pwm::CountMatrix;
    use crate::pwm::FrequencyMatrix;
    use crate::seq::EncodedSequence;

    macro_rules! assert_almost_eq {
        ($x:expr, $y:expr, places = $places:expr) => {{
            assert_eq!(
                ($x * 10.0_f64.powi($places)).round(),
                ($y * 10.0_f64.powi($places)).round(),
            )
        }};
    }

    /// Build a fully conserved `AC` motif over a uniform background.
    fn build_ac() -> ScoringMatrix<Dna> {
        CountMatrix::from_sequences([EncodedSequence::<Dna>::encode("AC").unwrap()])
            .unwrap()
            .to_freq(0.0)
            .to_scoring(&Background::uniform())
            .unwrap()
    }

    /// Build the first `length` positions of a degenerate motif with a skewed background.
    fn build_degenerate_prefix(length: usize) -> ScoringMatrix<Dna> {
        #[rustfmt::skip]
        let freqs = DenseMatrix::from_rows([
            //A    C    T    G    N
            [0.7, 0.1, 0.1, 0.1, 0.0],
            [0.0, 0.5, 0.5, 0.0, 0.0],
            [0.2, 0.3, 0.1, 0.4, 0.0],
            [0.1, 0.1, 0.1, 0.7, 0.0],
        ].into_iter().take(length).collect::<Vec<_>>());
        let bg = Background::new([0.3, 0.2, 0.3, 0.2, 0.0]).unwrap();
        FrequencyMatrix::<Dna>::new(freqs)
            .unwrap()
            .to_scoring(&bg)
            .unwrap()
    }

    fn build_degenerate() -> ScoringMatrix<Dna> {
        build_degenerate_prefix(4)
    }

    #[test]
    fn conserved_buckets() {
        let dist = build_ac().to_score_distribution();
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.buckets()[0], (4.0, 0.0625));
        assert_eq!(dist.buckets()[1], (f64::NEG_INFINITY, 0.9375));
        assert_eq!(dist.max_score(), 4.0);
        assert_eq!(dist.min_score(), Some(4.0));
        assert_eq!(dist.min_pvalue(), 0.0625);
    }

    #[test]
    fn empty_matrix() {
        let pssm = FrequencyMatrix::<Dna>::new(DenseMatrix::new(0))
            .unwrap()
            .to_scoring(&Background::uniform())
            .unwrap();
        let dist = ScoreDistribution::new(&pssm);
        assert_eq!(dist.buckets(), &[(0.0, 1.0)]);
        assert!(matches!(
            dist.threshold(0.5),
            Err(ScanError::IndistinguishableMotif { .. })
        ));
    }

    #[test]
    fn total_probability() {
        for length in 1..=4 {
            let dist = build_degenerate_prefix(length).to_score_distribution();
            assert_almost_eq!(dist.total(), 1.0, places = 12);
        }
    }

    #[test]
    fn sorted_descending() {
        let dist = build_degenerate().to_score_distribution();
        assert!(dist.len() > 1);
        for pair in dist.buckets().windows(2) {
            assert!(pair[0].0 > pair[1].0);
        }
    }

    #[test]
    fn negative_infinity_is_tracked() {
        // the second position gives no chance to A or G
        let dist = build_degenerate().to_score_distribution();
        let (score, probability) = *dist.buckets().last().unwrap();
        assert_eq!(score, f64::NEG_INFINITY);
        assert_almost_eq!(probability, 0.5, places = 12);
    }

    #[test]
    fn threshold_not_discriminative() {
        let dist = build_ac().to_score_distribution();
        let err = dist.threshold(0.05).unwrap_err();
        assert_eq!(
            err,
            ScanError::IndistinguishableMotif {
                pvalue: 0.05,
                min_pvalue: 0.0625
            }
        );
    }

    #[test]
    fn threshold_conserved() {
        let dist = build_ac().to_score_distribution();
        assert_eq!(dist.threshold(0.1).unwrap(), 4.0);
        assert_eq!(dist.threshold(0.0625).unwrap(), 4.0);
        assert_eq!(dist.pvalue(4.0), 0.0625);
    }

    #[test]
    fn threshold_invalid_pvalue() {
        let dist = build_ac().to_score_distribution();
        for p in [0.0, 1.0, -0.5, 2.0, f64::NAN] {
            assert!(matches!(
                dist.threshold(p),
                Err(ScanError::InvalidPvalue(_))
            ));
        }
    }

    #[test]
    fn threshold_strict_boundary() {
        // a bucket that brings the cumulated mass exactly to `pvalue` is consumed
        let pssm = FrequencyMatrix::<Dna>::new(DenseMatrix::from_rows([[
            0.5, 0.5, 0.0, 0.0, 0.0,
        ]]))
        .unwrap()
        .to_scoring(&Background::uniform())
        .unwrap();
        let dist = pssm.to_score_distribution();
        assert_eq!(dist.buckets()[0], (1.0, 0.5));
        assert_eq!(dist.threshold(0.5).unwrap(), 1.0);
    }

    #[test]
    fn threshold_monotonic() {
        let dist = build_degenerate().to_score_distribution();
        let mut last = f64::NEG_INFINITY;
        for p in [0.5, 0.2, 0.1, 0.05, 0.02, 0.01, 0.005] {
            let t = dist.threshold(p).unwrap();
            assert!(t >= last, "threshold {} < {} at p={}", t, last, p);
            assert!(dist.pvalue(t) <= p);
            last = t;
        }
    }

    #[test]
    fn pvalue_survival() {
        let dist = build_degenerate().to_score_distribution();
        let mut cumulative = 0.0;
        for &(score, probability) in dist.buckets() {
            cumulative += probability;
            assert_eq!(dist.pvalue(score), cumulative);
        }
        assert_eq!(dist.pvalue(dist.max_score() + 1.0), 0.0);
        assert_almost_eq!(dist.pvalue(f64::NEG_INFINITY), 1.0, places = 12);
    }

    #[test]
    fn pvalue_of_window() {
        let pssm = build_degenerate();
        let dist = pssm.to_score_distribution();
        let window = EncodedSequence::<Dna>::encode("ACGG").unwrap();
        let score = pssm.score(&window);
        assert!(dist.buckets().iter().any(|&(s, _)| s == score));
        let expected: f64 = dist
            .buckets()
            .iter()
            .take_while(|&&(s, _)| s >= score)
            .map(|&(_, p)| p)
            .sum();
        assert_eq!(dist.pvalue(score), expected);
    }

    #[test]
    fn granular_resolution() {
        let pssm = build_degenerate().discretize(0.25).unwrap();
        let exact = ScoreDistribution::new(&pssm);
        let granular = ScoreDistribution::with_resolution(&pssm, Resolution::Granular(0.25)).unwrap();
        assert!(granular.len() <= exact.len());
        assert_almost_eq!(granular.total(), 1.0, places = 12);
        for &(score, _) in granular.buckets().iter().filter(|(s, _)| s.is_finite()) {
            assert_eq!((score / 0.25).fract(), 0.0);
        }
        let window = EncodedSequence::<Dna>::encode("ATCG").unwrap();
        let score = pssm.score(&window);
        assert_almost_eq!(granular.pvalue(score), exact.pvalue(score), places = 12);
    }

    #[test]
    fn granular_invalid() {
        let pssm = build_degenerate();
        for g in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            assert!(ScoreDistribution::with_resolution(&pssm, Resolution::Granular(g)).is_err());
        }
    }

    #[test]
    fn signed_zero_merged() {
        let res = Resolution::Exact;
        assert_eq!(res.key(res.quantize(-0.0)), res.key(res.quantize(0.0)));
    }

    #[cfg(feature = "sampling")]
    #[test]
    fn sample_scores() {
        use rand::SeedableRng;
        let dist = build_ac().to_score_distribution();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let n = 10_000;
        let hits = (0..n)
            .map(|_| dist.sample(&mut rng))
            .filter(|&s| s == 4.0)
            .count();
        assert!(hits > 400 && hits < 850, "sampled {} hits", hits);
    }
}
