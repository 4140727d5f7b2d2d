//! Digital encoding for biological sequences using an alphabet.

use std::fmt::Debug;
use std::ops::Index;

use generic_array::ArrayLength;
use generic_array::GenericArray;
use typenum::consts::U21;
use typenum::consts::U5;
use typenum::marker_traits::Unsigned;

use super::err::InvalidData;
use super::err::InvalidSymbol;
use super::num::StrictlyPositive;

/// The tolerance allowed on the sum of background frequencies.
const FREQUENCY_TOLERANCE: f64 = 1e-6;

// --- Symbol ------------------------------------------------------------------

/// A symbol from a biological alphabet.
pub trait Symbol: Default + Sized + Copy + Eq + Debug {
    /// View this symbol as a zero-based index.
    fn as_index(&self) -> usize;
    /// View this symbol as a string character.
    fn as_char(&self) -> char {
        self.as_ascii() as char
    }
    /// Parse a string character into a symbol.
    fn from_char(c: char) -> Result<Self, InvalidSymbol> {
        if c.is_ascii() {
            Self::from_ascii(c as u8)
        } else {
            Err(InvalidSymbol(c))
        }
    }
    /// View this symbol as an ASCII charater.
    fn as_ascii(&self) -> u8;
    /// Parse an ASCII character into a symbol.
    fn from_ascii(c: u8) -> Result<Self, InvalidSymbol>;
}

// --- Alphabet ----------------------------------------------------------------

/// A biological alphabet with associated metadata.
pub trait Alphabet: Debug + Copy + Default + 'static {
    type Symbol: Symbol;
    type K: StrictlyPositive + ArrayLength + Debug;

    /// Get the default symbol for this alphabet.
    fn default_symbol() -> Self::Symbol {
        Default::default()
    }

    /// Get all the symbols of this alphabet, ordered by index.
    fn symbols() -> &'static [Self::Symbol];

    /// Get a string with all symbols from this alphabet.
    fn as_str() -> &'static str;
}

/// Declare an alphabet type together with its symbol enum.
///
/// Symbols must be listed in index order, starting from zero.
macro_rules! alphabet {
    (
        $(#[$alphabet_meta:meta])*
        $alphabet:ident ($K:ty) => $(#[$symbol_meta:meta])* $symbol:ident {
            $( $(#[$variant_meta:meta])* $variant:ident = $index:literal => $ascii:literal, )*
        }
        default = $default:ident
    ) => {
        $(#[$alphabet_meta])*
        #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $alphabet;

        impl Alphabet for $alphabet {
            type Symbol = $symbol;
            type K = $K;

            fn symbols() -> &'static [$symbol] {
                &[ $( $symbol::$variant, )* ]
            }

            fn as_str() -> &'static str {
                concat!( $( stringify!($variant), )* )
            }
        }

        $(#[$symbol_meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $symbol {
            $( $(#[$variant_meta])* $variant = $index, )*
        }

        impl Default for $symbol {
            fn default() -> Self {
                $symbol::$default
            }
        }

        impl From<$symbol> for char {
            fn from(s: $symbol) -> char {
                s.as_char()
            }
        }

        impl Symbol for $symbol {
            #[inline]
            fn as_index(&self) -> usize {
                *self as usize
            }

            #[inline]
            fn as_ascii(&self) -> u8 {
                match self {
                    $( $symbol::$variant => $ascii, )*
                }
            }

            #[inline]
            fn from_ascii(c: u8) -> Result<Self, InvalidSymbol> {
                match c {
                    $( $ascii => Ok($symbol::$variant), )*
                    _ => Err(InvalidSymbol(c as char)),
                }
            }
        }
    };
}

// --- DNA ---------------------------------------------------------------------

alphabet! {
    /// The standard DNA alphabet composed of 4 deoxyribonucleotides and a wildcard.
    Dna (U5) =>
    /// A deoxyribonucleotide.
    Nucleotide {
        /// Adenine.
        A = 0 => b'A',
        /// Cytosine.
        C = 1 => b'C',
        /// Thymine.
        T = 2 => b'T',
        /// Guanine.
        G = 3 => b'G',
        /// Unknown base.
        N = 4 => b'N',
    }
    default = N
}

// --- Protein -----------------------------------------------------------------

alphabet! {
    /// The standard protein alphabet composed of 20 residues and a wildcard.
    Protein (U21) =>
    /// A proteinogenic amino acid.
    AminoAcid {
        A = 0 => b'A',
        C = 1 => b'C',
        D = 2 => b'D',
        E = 3 => b'E',
        F = 4 => b'F',
        G = 5 => b'G',
        H = 6 => b'H',
        I = 7 => b'I',
        K = 8 => b'K',
        L = 9 => b'L',
        M = 10 => b'M',
        N = 11 => b'N',
        P = 12 => b'P',
        Q = 13 => b'Q',
        R = 14 => b'R',
        S = 15 => b'S',
        T = 16 => b'T',
        V = 17 => b'V',
        W = 18 => b'W',
        Y = 19 => b'Y',
        /// Unknown residue.
        X = 20 => b'X',
    }
    default = X
}

// --- Background --------------------------------------------------------------

/// The background frequencies for an alphabet.
///
/// A symbol with a zero frequency is not part of the background: it cannot
/// be drawn at random, and windows containing it are never scored.
#[derive(Clone, Debug, PartialEq)]
pub struct Background<A: Alphabet> {
    frequencies: GenericArray<f64, A::K>,
    alphabet: std::marker::PhantomData<A>,
}

impl<A: Alphabet> Background<A> {
    /// Create a new background with the given frequencies.
    ///
    /// The array must contain valid frequencies, i.e. real numbers between
    /// zero and one that sum to one.
    pub fn new<F>(frequencies: F) -> Result<Self, InvalidData>
    where
        F: Into<GenericArray<f64, A::K>>,
    {
        let frequencies = frequencies.into();
        let mut sum = 0.0;
        for &f in frequencies.iter() {
            if !(0.0..=1.0).contains(&f) {
                return Err(InvalidData);
            }
            sum += f;
        }
        if (sum - 1.0).abs() > FREQUENCY_TOLERANCE {
            return Err(InvalidData);
        }
        Ok(Self {
            frequencies,
            alphabet: std::marker::PhantomData,
        })
    }

    /// Create a new background from a mapping of symbols to frequencies.
    ///
    /// Symbols missing from the mapping are absent from the background.
    /// A symbol given more than once is rejected.
    ///
    /// # Example
    /// ```
    /// # use motifscan::abc::*;
    /// let bg = Background::<Dna>::from_symbols([
    ///     (Nucleotide::A, 0.3),
    ///     (Nucleotide::C, 0.2),
    ///     (Nucleotide::G, 0.2),
    ///     (Nucleotide::T, 0.3),
    /// ]).unwrap();
    /// assert!(bg.contains(Nucleotide::A));
    /// assert!(!bg.contains(Nucleotide::N));
    /// ```
    pub fn from_symbols<I>(frequencies: I) -> Result<Self, InvalidData>
    where
        I: IntoIterator<Item = (A::Symbol, f64)>,
    {
        let mut data = GenericArray::<f64, A::K>::default();
        let mut seen = GenericArray::<bool, A::K>::default();
        for (symbol, f) in frequencies {
            let i = symbol.as_index();
            if seen[i] {
                return Err(InvalidData);
            }
            seen[i] = true;
            data[i] = f;
        }
        Self::new(data)
    }

    /// Create a new background with uniform frequencies.
    ///
    /// The non-default symbols from the alphabet `A` will be initialized
    /// with a frequency of `1/(K-1)`, while the default symbol will remain
    /// with a zero frequency.
    ///
    /// # Note
    /// The `Default` implementation for `Background` uses uniform frequencies.
    ///
    /// # Example
    /// ```
    /// # use motifscan::abc::*;
    /// let bg = Background::<Dna>::uniform();
    /// assert_eq!(bg.frequencies(), &[0.25, 0.25, 0.25, 0.25, 0.0]);
    /// ```
    pub fn uniform() -> Self {
        let k = A::K::USIZE;
        let wildcard = A::default_symbol().as_index();
        let frequencies = (0..k)
            .map(|i| if i != wildcard { 1.0 / ((k - 1) as f64) } else { 0.0 })
            .collect();
        Self {
            frequencies,
            alphabet: std::marker::PhantomData,
        }
    }

    /// A reference to the raw background frequencies.
    #[inline]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// The background frequency of the given symbol.
    #[inline]
    pub fn frequency(&self, symbol: A::Symbol) -> f64 {
        self.frequencies[symbol.as_index()]
    }

    /// Check whether the given symbol is part of the background.
    #[inline]
    pub fn contains(&self, symbol: A::Symbol) -> bool {
        self.frequency(symbol) > 0.0
    }

    /// Iterate over the symbols with a nonzero background frequency.
    pub fn symbols(&self) -> impl Iterator<Item = A::Symbol> + '_ {
        A::symbols().iter().copied().filter(|&s| self.contains(s))
    }
}

impl<A: Alphabet> Index<A::Symbol> for Background<A> {
    type Output = f64;
    #[inline]
    fn index(&self, symbol: A::Symbol) -> &f64 {
        &self.frequencies[symbol.as_index()]
    }
}

impl<A: Alphabet> AsRef<[f64]> for Background<A> {
    fn as_ref(&self) -> &[f64] {
        self.frequencies()
    }
}

impl<A: Alphabet> Default for Background<A> {
    fn default() -> Self {
        Self::uniform()
    }
}

// --- Pseudocounts ------------------------------------------------------------

/// A structure for storing the pseudocounts over an alphabet.
#[derive(Clone, Debug, PartialEq)]
pub struct Pseudocounts<A: Alphabet> {
    counts: GenericArray<f64, A::K>,
    alphabet: std::marker::PhantomData<A>,
}

impl<A: Alphabet> Pseudocounts<A> {
    /// The pseudocount of each symbol, in alphabet order.
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }
}

impl<A: Alphabet> Default for Pseudocounts<A> {
    fn default() -> Self {
        Self::from(0.0)
    }
}

impl<A: Alphabet> From<GenericArray<f64, A::K>> for Pseudocounts<A> {
    fn from(counts: GenericArray<f64, A::K>) -> Self {
        Self {
            alphabet: std::marker::PhantomData,
            counts,
        }
    }
}

impl<A: Alphabet> From<f64> for Pseudocounts<A> {
    /// Use the same pseudocount for every symbol except the wildcard.
    fn from(count: f64) -> Self {
        let wildcard = A::default_symbol().as_index();
        let counts = (0..A::K::USIZE)
            .map(|i| if i != wildcard { count } else { 0.0 })
            .collect();
        Self {
            counts,
            alphabet: std::marker::PhantomData,
        }
    }
}
