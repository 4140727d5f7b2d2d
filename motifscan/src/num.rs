//! Re-exports for the `typenum` crate, with extra utilities.

#[doc(no_inline)]
pub use typenum::*;

#[doc(no_inline)]
pub use generic_array::ArrayLength;

/// A marker trait for type numbers that are strictly positive.
pub trait StrictlyPositive: Unsigned + NonZero {}

impl<N: Unsigned + NonZero> StrictlyPositive for N {}
