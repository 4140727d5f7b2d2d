//! Sequences of alphabet symbols.
//!
//! Scanning works directly on text, so [`EncodedSequence`] is mostly used to
//! describe motif sites and to generate random background sequences.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::ops::Index;
use std::str::FromStr;

use super::abc::Alphabet;
use super::abc::Symbol;
use super::err::InvalidSymbol;

// --- EncodedSequence ---------------------------------------------------------

/// A sequence of symbols from the alphabet `A`.
#[derive(Clone, Debug)]
pub struct EncodedSequence<A: Alphabet> {
    symbols: Vec<A::Symbol>,
    alphabet: std::marker::PhantomData<A>,
}

impl<A: Alphabet> EncodedSequence<A> {
    /// Wrap a vector of symbols.
    pub fn new(symbols: Vec<A::Symbol>) -> Self {
        Self {
            symbols,
            alphabet: std::marker::PhantomData,
        }
    }

    /// Parse a textual sequence, failing on the first unknown character.
    ///
    /// # Example
    /// ```
    /// # use motifscan::*;
    /// let seq = EncodedSequence::<Dna>::encode("GATTACA").unwrap();
    /// assert_eq!(seq.len(), 7);
    /// assert_eq!(EncodedSequence::<Dna>::encode("GATUACA").unwrap_err(), InvalidSymbol('U'));
    /// ```
    pub fn encode<S: AsRef<str>>(sequence: S) -> Result<Self, InvalidSymbol> {
        let text = sequence.as_ref();
        let mut symbols = Vec::with_capacity(text.len());
        for c in text.chars() {
            symbols.push(A::Symbol::from_char(c)?);
        }
        Ok(Self::new(symbols))
    }

    /// The number of symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check whether the sequence has no symbol.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over the symbols.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, A::Symbol> {
        self.symbols.iter()
    }
}

impl<A: Alphabet> AsRef<EncodedSequence<A>> for EncodedSequence<A> {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl<A: Alphabet> AsRef<[A::Symbol]> for EncodedSequence<A> {
    fn as_ref(&self) -> &[A::Symbol] {
        &self.symbols
    }
}

impl<A: Alphabet> Display for EncodedSequence<A> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        self.symbols
            .iter()
            .try_for_each(|s| write!(f, "{}", s.as_char()))
    }
}

impl<A: Alphabet> FromStr for EncodedSequence<A> {
    type Err = InvalidSymbol;
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::encode(text)
    }
}

impl<A: Alphabet> FromIterator<A::Symbol> for EncodedSequence<A> {
    fn from_iter<I: IntoIterator<Item = A::Symbol>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<A: Alphabet> Index<usize> for EncodedSequence<A> {
    type Output = A::Symbol;
    #[inline]
    fn index(&self, index: usize) -> &A::Symbol {
        &self.symbols[index]
    }
}

impl<A, S> PartialEq<S> for EncodedSequence<A>
where
    A: Alphabet,
    S: AsRef<[A::Symbol]>,
{
    fn eq(&self, other: &S) -> bool {
        self.symbols.as_slice() == other.as_ref()
    }
}
