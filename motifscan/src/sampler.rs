//! Random sampling of symbols and sequences from a background model.

use rand::distributions::Distribution;
use rand::Rng;
use rand_distr::WeightedIndex;

use super::abc::Alphabet;
use super::abc::Background;
use super::err::InvalidData;
use super::seq::EncodedSequence;

/// A distribution drawing symbols with their background frequencies.
#[derive(Debug, Clone)]
pub struct BackgroundSampler<A: Alphabet> {
    index: WeightedIndex<f64>,
    alphabet: std::marker::PhantomData<A>,
}

impl<A: Alphabet> BackgroundSampler<A> {
    /// Create a new sampler for the given background.
    pub fn new(background: &Background<A>) -> Result<Self, InvalidData> {
        let index = WeightedIndex::new(background.frequencies()).map_err(|_| InvalidData)?;
        Ok(Self {
            index,
            alphabet: std::marker::PhantomData,
        })
    }
}

impl<A: Alphabet> Distribution<A::Symbol> for BackgroundSampler<A> {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> A::Symbol {
        A::symbols()[self.index.sample(rng)]
    }
}

impl<A: Alphabet> Background<A> {
    /// Get a sampler drawing symbols from this background.
    pub fn sampler(&self) -> Result<BackgroundSampler<A>, InvalidData> {
        BackgroundSampler::new(self)
    }
}

impl<A: Alphabet> EncodedSequence<A> {
    /// Draw a random sequence of the given length from a background.
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        background: &Background<A>,
        length: usize,
    ) -> Result<Self, InvalidData> {
        let sampler = background.sampler()?;
        Ok((0..length).map(|_| sampler.sample(rng)).collect())
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::abc::Dna;
    use crate::abc::Nucleotide;

    #[test]
    fn test_sample_skips_absent_symbols() {
        let bg = Background::<Dna>::from_symbols([(Nucleotide::A, 0.5), (Nucleotide::T, 0.5)])
            .unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let seq = EncodedSequence::sample(&mut rng, &bg, 1000).unwrap();
        assert_eq!(seq.len(), 1000);
        assert!(seq.iter().all(|&s| s == Nucleotide::A || s == Nucleotide::T));
        assert!(seq.iter().any(|&s| s == Nucleotide::A));
        assert!(seq.iter().any(|&s| s == Nucleotide::T));
    }

    #[test]
    fn test_sample_frequencies() {
        let bg = Background::<Dna>::new([0.1, 0.2, 0.3, 0.4, 0.0]).unwrap();
        let sampler = bg.sampler().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0usize; 5];
        for _ in 0..20_000 {
            let s: Nucleotide = sampler.sample(&mut rng);
            counts[s as usize] += 1;
        }
        assert_eq!(counts[Nucleotide::N as usize], 0);
        assert!(counts[Nucleotide::A as usize] < counts[Nucleotide::G as usize]);
        assert!(counts[Nucleotide::G as usize] > 7_000);
    }
}
