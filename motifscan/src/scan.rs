//! Lazy scanner reporting significant motif occurrences in a sequence.
use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::str::CharIndices;

use log::debug;
use log::trace;

use super::abc::Alphabet;
use super::abc::Background;
use super::abc::Symbol;
use super::err::ScanError;
use super::pwm::dist::check_pvalue;
use super::pwm::dist::Resolution;
use super::pwm::dist::ScoreDistribution;
use super::pwm::FrequencyMatrix;
use super::pwm::ScoringMatrix;

/// A hit describing a significant window somewhere in the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'s> {
    pvalue: f64,
    position: usize,
    window: &'s str,
    score: f64,
}

impl<'s> Hit<'s> {
    /// Create a new hit.
    pub fn new(pvalue: f64, position: usize, window: &'s str, score: f64) -> Self {
        Self {
            pvalue,
            position,
            window,
            score,
        }
    }

    /// The probability of a background window scoring at least as high.
    #[inline]
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// The start position of the window in the sequence.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The contents of the window.
    #[inline]
    pub fn window(&self) -> &'s str {
        self.window
    }

    /// The log-odds score of the window.
    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }
}

impl<'s> From<Hit<'s>> for (f64, usize, &'s str) {
    fn from(hit: Hit<'s>) -> Self {
        (hit.pvalue, hit.position, hit.window)
    }
}

// --- MotifScanner ------------------------------------------------------------

/// A sequence to be searched for motif occurrences.
///
/// # Example
/// ```
/// # use motifscan::*;
/// let ppm = CountMatrix::<Dna>::from_sequences([
///     EncodedSequence::encode("TATAAT").unwrap(),
///     EncodedSequence::encode("TATACT").unwrap(),
/// ])
/// .unwrap()
/// .to_freq(0.1);
/// let background = Background::uniform();
///
/// let hits = MotifScanner::new("GCGCTATAATGCNNTATACTGC")
///     .scan(1e-3, &background, &ppm)
///     .unwrap()
///     .map(|hit| hit.position())
///     .collect::<Vec<_>>();
/// assert_eq!(hits, vec![4, 14]);
/// ```
#[derive(Debug, Clone)]
pub struct MotifScanner<'s> {
    sequence: &'s str,
    resolution: Resolution,
}

impl<'s> MotifScanner<'s> {
    /// Create a new scanner for the given sequence.
    pub fn new(sequence: &'s str) -> Self {
        Self {
            sequence,
            resolution: Resolution::Exact,
        }
    }

    /// The sequence being searched.
    #[inline]
    pub fn sequence(&self) -> &'s str {
        self.sequence
    }

    /// Change the resolution of the score distribution.
    pub fn resolution(&mut self, resolution: Resolution) -> &mut Self {
        self.resolution = resolution;
        self
    }

    /// Scan the sequence for windows significant at the given *p-value*.
    ///
    /// The scoring matrix, the score distribution and the threshold are
    /// computed before returning, so any error is reported here and the
    /// returned iterator cannot fail.
    pub fn scan<A: Alphabet>(
        &self,
        pvalue: f64,
        background: &Background<A>,
        ppm: &FrequencyMatrix<A>,
    ) -> Result<Scanner<'s, A>, ScanError> {
        check_pvalue(pvalue)?;
        self.resolution.validate()?;

        let mut pssm = ppm.to_scoring(background)?;
        if let Resolution::Granular(granularity) = self.resolution {
            pssm = pssm.discretize(granularity)?;
        }
        let distribution = ScoreDistribution::with_resolution(&pssm, self.resolution)?;
        let threshold = distribution.threshold(pvalue)?;
        debug!(
            "scanning {} bytes with a motif of length {} (threshold={}, p-value={})",
            self.sequence.len(),
            pssm.len(),
            threshold,
            pvalue
        );

        Ok(Scanner {
            sequence: self.sequence,
            chars: self.sequence.char_indices(),
            ring: VecDeque::with_capacity(pssm.len()),
            window: Vec::with_capacity(pssm.len()),
            pssm,
            distribution,
            threshold,
            position: 0,
        })
    }
}

/// Scan a sequence for windows significant at the given *p-value*.
///
/// This is a shorthand for [`MotifScanner::scan`] with an exact score
/// distribution.
pub fn scan<'s, A: Alphabet>(
    sequence: &'s str,
    pvalue: f64,
    background: &Background<A>,
    ppm: &FrequencyMatrix<A>,
) -> Result<Scanner<'s, A>, ScanError> {
    MotifScanner::new(sequence).scan(pvalue, background, ppm)
}

// --- Scanner -----------------------------------------------------------------

/// An iterator over the significant windows of a sequence.
///
/// Windows are visited by increasing position, counted in characters. A
/// window is skipped when it contains a character that is not a symbol of
/// the alphabet, or a symbol absent from the background. A window is
/// reported when its score reaches the threshold selected for the
/// requested *p-value*.
#[derive(Debug, Clone)]
pub struct Scanner<'s, A: Alphabet> {
    sequence: &'s str,
    chars: CharIndices<'s>,
    pssm: ScoringMatrix<A>,
    distribution: ScoreDistribution<A>,
    threshold: f64,
    /// The number of characters read so far.
    position: usize,
    /// Byte offset and decoded symbol of the last characters read.
    ring: VecDeque<(usize, Option<A::Symbol>)>,
    window: Vec<A::Symbol>,
}

impl<'s, A: Alphabet> Scanner<'s, A> {
    /// The score threshold hits must reach.
    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The score distribution used to compute *p-values*.
    #[inline]
    pub fn distribution(&self) -> &ScoreDistribution<A> {
        &self.distribution
    }

    /// The scoring matrix used to score windows.
    #[inline]
    pub fn matrix(&self) -> &ScoringMatrix<A> {
        &self.pssm
    }

    /// Decode a character, or `None` if it cannot be scored.
    #[inline]
    fn decode(&self, c: char) -> Option<A::Symbol> {
        A::Symbol::from_char(c)
            .ok()
            .filter(|&s| self.pssm.background().contains(s))
    }

    /// Copy the symbols of the ring into the window buffer, or return `false`.
    fn fill_window(&mut self) -> bool {
        self.window.clear();
        for &(_, symbol) in self.ring.iter() {
            match symbol {
                Some(s) => self.window.push(s),
                None => return false,
            }
        }
        true
    }
}

impl<'s, A: Alphabet> Iterator for Scanner<'s, A> {
    type Item = Hit<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        let length = self.pssm.len();
        if length == 0 {
            return None;
        }
        while let Some((offset, c)) = self.chars.next() {
            let symbol = self.decode(c);
            if self.ring.len() == length {
                self.ring.pop_front();
            }
            self.ring.push_back((offset, symbol));
            self.position += 1;
            if self.ring.len() < length {
                continue;
            }

            let position = self.position - length;
            if !self.fill_window() {
                trace!("skipping invalid window at position {}", position);
                continue;
            }

            let score = self.pssm.score(&self.window);
            if self.distribution.quantize(score) >= self.threshold {
                let pvalue = self.distribution.pvalue(score);
                let start = self.ring.front().map(|&(o, _)| o).unwrap_or(offset);
                let sequence = self.sequence;
                let window = &sequence[start..offset + c.len_utf8()];
                trace!(
                    "hit at position {} (score={}, p-value={})",
                    position,
                    score,
                    pvalue
                );
                return Some(Hit::new(pvalue, position, window, score));
            }
        }
        None
    }
}

impl<'s, A: Alphabet> FusedIterator for Scanner<'s, A> {}
