//! Position weight matrices: counts, probabilities and log-odds scores.

use std::ops::Index;

use super::abc::Alphabet;
use super::abc::Background;
use super::abc::Pseudocounts;
use super::abc::Symbol;
use super::dense::DenseMatrix;
use super::err::InvalidData;
use super::err::ScanError;
use super::seq::EncodedSequence;

pub mod dist;

// --- CountMatrix -------------------------------------------------------------

/// A matrix storing symbol occurences at each position.
#[derive(Clone, Debug)]
pub struct CountMatrix<A: Alphabet> {
    /// The alphabet of the count matrix.
    alphabet: std::marker::PhantomData<A>,
    /// The actual counts for each position of the motif.
    data: DenseMatrix<u32, A::K>,
    /// The number of sequences from which this count matrix was obtained.
    n: u32,
}

impl<A: Alphabet> CountMatrix<A> {
    /// Create a new count matrix without checking the contents.
    fn new_unchecked(data: DenseMatrix<u32, A::K>, n: u32) -> Self {
        Self {
            alphabet: std::marker::PhantomData,
            n,
            data,
        }
    }

    /// Create a new count matrix from the given data.
    ///
    /// Counts must come from sequences of the same length, so every row
    /// must sum to the same number of sequences.
    pub fn new(data: DenseMatrix<u32, A::K>) -> Result<Self, InvalidData> {
        let mut sums = data.iter().map(|row| row.iter().sum::<u32>());
        let n = sums.next().unwrap_or(0);
        if sums.all(|s| s == n) {
            Ok(Self::new_unchecked(data, n))
        } else {
            Err(InvalidData)
        }
    }

    /// Create a new count matrix from the given aligned sequences.
    ///
    /// All sequences must have the same length.
    pub fn from_sequences<I>(sequences: I) -> Result<Self, InvalidData>
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<EncodedSequence<A>>,
    {
        let mut n = 0;
        let mut data: Option<DenseMatrix<u32, A::K>> = None;
        for seq in sequences {
            let seq = seq.as_ref();
            let d = data.get_or_insert_with(|| DenseMatrix::new(seq.len()));
            if seq.len() != d.rows() {
                return Err(InvalidData);
            }
            for (i, x) in seq.iter().enumerate() {
                d[i][x.as_index()] += 1;
            }
            n += 1;
        }
        Ok(Self::new_unchecked(
            data.unwrap_or_else(|| DenseMatrix::new(0)),
            n,
        ))
    }

    /// Build a probability matrix from this count matrix using pseudo-counts.
    ///
    /// A position without any count nor pseudocount keeps null probabilities.
    pub fn to_freq<P>(&self, pseudo: P) -> FrequencyMatrix<A>
    where
        P: Into<Pseudocounts<A>>,
    {
        let p = pseudo.into();
        let mut probas = DenseMatrix::new(self.data.rows());
        for (src, dst) in self.data.iter().zip(probas.iter_mut()) {
            for (j, &x) in src.iter().enumerate() {
                dst[j] = x as f64 + p.counts()[j];
            }
            let s: f64 = dst.iter().sum();
            if s > 0.0 {
                for x in dst.iter_mut() {
                    *x /= s;
                }
            }
        }
        FrequencyMatrix { data: probas }
    }

    /// The raw counts from the count matrix.
    #[inline]
    pub fn counts(&self) -> &DenseMatrix<u32, A::K> {
        &self.data
    }

    /// The number of sequences the counts were obtained from.
    #[inline]
    pub fn sequences(&self) -> u32 {
        self.n
    }
}

impl<A: Alphabet> FromIterator<EncodedSequence<A>> for Result<CountMatrix<A>, InvalidData> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = EncodedSequence<A>>,
    {
        CountMatrix::from_sequences(iter)
    }
}

// --- FrequencyMatrix ---------------------------------------------------------

/// A matrix storing symbol probabilities at each position.
///
/// This is the position probability matrix describing a motif: row `i`
/// holds the probability of observing each symbol at position `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyMatrix<A: Alphabet> {
    data: DenseMatrix<f64, A::K>,
}

impl<A: Alphabet> FrequencyMatrix<A> {
    /// Create a new frequency matrix from the given probabilities.
    ///
    /// Every value must be a probability, rows are not required to sum
    /// to one.
    pub fn new(data: DenseMatrix<f64, A::K>) -> Result<Self, InvalidData> {
        if data.iter().flatten().all(|x| (0.0..=1.0).contains(x)) {
            Ok(Self { data })
        } else {
            Err(InvalidData)
        }
    }

    /// The length of the motif encoded in this matrix.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.rows()
    }

    /// Check whether the matrix has no position.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.rows() == 0
    }

    /// The raw probabilities of the matrix.
    #[inline]
    pub fn matrix(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }

    /// Convert to a scoring matrix using the given background frequencies.
    ///
    /// Each probability `p` of symbol `x` becomes `log2(p / background[x])`,
    /// or negative infinity when `p` is zero.
    ///
    /// # Errors
    /// Returns [`ScanError::UndefinedBackground`] for the first symbol with a
    /// nonzero probability but no usable background frequency, i.e. a zero
    /// frequency or one so small the score overflows.
    pub fn to_scoring(&self, background: &Background<A>) -> Result<ScoringMatrix<A>, ScanError> {
        let mut data = DenseMatrix::new(self.data.rows());
        for (i, (src, dst)) in self.data.iter().zip(data.iter_mut()).enumerate() {
            for (&symbol, (&p, w)) in A::symbols().iter().zip(src.iter().zip(dst.iter_mut())) {
                if p == 0.0 {
                    *w = f64::NEG_INFINITY;
                    continue;
                }
                let score = if background.contains(symbol) {
                    (p / background[symbol]).log2()
                } else {
                    f64::NAN
                };
                if !score.is_finite() {
                    return Err(ScanError::undefined_background(i, symbol.as_char()));
                }
                *w = score;
            }
        }
        Ok(ScoringMatrix {
            background: background.clone(),
            data,
        })
    }

    /// Get the most probable symbol at each position.
    ///
    /// Ties are broken in favour of the first symbol of the alphabet.
    pub fn consensus(&self) -> EncodedSequence<A> {
        self.data
            .iter()
            .map(|row| {
                let mut best = 0;
                for (j, &p) in row.iter().enumerate() {
                    if p > row[best] {
                        best = j;
                    }
                }
                A::symbols()[best]
            })
            .collect()
    }
}

impl<A: Alphabet> Index<usize> for FrequencyMatrix<A> {
    type Output = [f64];
    #[inline]
    fn index(&self, index: usize) -> &[f64] {
        &self.data[index]
    }
}

impl<A: Alphabet> AsRef<DenseMatrix<f64, A::K>> for FrequencyMatrix<A> {
    fn as_ref(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }
}

// --- ScoringMatrix -----------------------------------------------------------

/// A matrix storing log-odds scores of symbol occurences at each position.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoringMatrix<A: Alphabet> {
    background: Background<A>,
    data: DenseMatrix<f64, A::K>,
}

impl<A: Alphabet> ScoringMatrix<A> {
    /// The length of the motif encoded in this scoring matrix.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.rows()
    }

    /// Check whether the matrix has no position.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.rows() == 0
    }

    /// The log-odds scores of the matrix.
    #[inline]
    pub fn matrix(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }

    /// The background frequencies the scores were computed with.
    #[inline]
    pub fn background(&self) -> &Background<A> {
        &self.background
    }

    /// Compute the score of a window of exactly `self.len()` symbols.
    ///
    /// Scores are accumulated from `0.0` in position order, which is the
    /// order used to build a [`ScoreDistribution`](dist::ScoreDistribution),
    /// so the result can be looked up in the distribution exactly.
    #[inline]
    pub fn score<S: AsRef<[A::Symbol]>>(&self, window: S) -> f64 {
        let window = window.as_ref();
        debug_assert_eq!(window.len(), self.len());
        self.data
            .iter()
            .zip(window)
            .fold(0.0, |score, (row, s)| score + row[s.as_index()])
    }

    /// The highest score reachable with background symbols.
    pub fn max_score(&self) -> f64 {
        self.data
            .iter()
            .map(|row| {
                self.background
                    .symbols()
                    .map(|s| row[s.as_index()])
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .sum()
    }

    /// The lowest score reachable with background symbols.
    pub fn min_score(&self) -> f64 {
        self.data
            .iter()
            .map(|row| {
                self.background
                    .symbols()
                    .map(|s| row[s.as_index()])
                    .fold(f64::INFINITY, f64::min)
            })
            .sum()
    }

    /// Round every finite score to the nearest multiple of `granularity`.
    ///
    /// Scores of impossible symbols stay negative infinity.
    pub fn discretize(&self, granularity: f64) -> Result<Self, ScanError> {
        if !(granularity > 0.0 && granularity.is_finite()) {
            return Err(ScanError::InvalidGranularity(granularity));
        }
        let mut data = self.data.clone();
        for w in data.iter_mut().flatten() {
            if w.is_finite() {
                *w = (*w / granularity).round() * granularity;
            }
        }
        Ok(Self {
            background: self.background.clone(),
            data,
        })
    }

    /// Compute the exact distribution of scores under the background model.
    pub fn to_score_distribution(&self) -> dist::ScoreDistribution<A> {
        dist::ScoreDistribution::new(self)
    }
}

impl<A: Alphabet> Index<usize> for ScoringMatrix<A> {
    type Output = [f64];
    #[inline]
    fn index(&self, index: usize) -> &[f64] {
        &self.data[index]
    }
}

impl<A: Alphabet> AsRef<ScoringMatrix<A>> for ScoringMatrix<A> {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl<A: Alphabet> AsRef<DenseMatrix<f64, A::K>> for ScoringMatrix<A> {
    fn as_ref(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }
}
