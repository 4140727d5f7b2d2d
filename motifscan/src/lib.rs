#![doc = include_str!("../README.md")]

extern crate generic_array;
extern crate typenum;

pub mod abc;
pub mod dense;
pub mod err;
pub mod num;
pub mod pwm;
#[cfg(feature = "sampling")]
pub mod sampler;
pub mod scan;
pub mod seq;

pub use abc::Alphabet;
pub use abc::AminoAcid;
pub use abc::Background;
pub use abc::Dna;
pub use abc::Nucleotide;
pub use abc::Protein;
pub use abc::Pseudocounts;
pub use abc::Symbol;
pub use dense::DenseMatrix;
pub use err::InvalidData;
pub use err::InvalidSymbol;
pub use err::ScanError;
pub use pwm::dist::Resolution;
pub use pwm::dist::ScoreDistribution;
pub use pwm::CountMatrix;
pub use pwm::FrequencyMatrix;
pub use pwm::ScoringMatrix;
pub use scan::scan;
pub use scan::Hit;
pub use scan::MotifScanner;
pub use scan::Scanner;
pub use seq::EncodedSequence;
