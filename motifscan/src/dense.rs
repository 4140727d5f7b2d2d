//! Dense row-major matrix storage with a type-level column count.

use std::fmt::Debug;
use std::fmt::Error as FmtError;
use std::fmt::Formatter;
use std::iter::FusedIterator;
use std::ops::Index;
use std::ops::IndexMut;
use std::slice::ChunksExact;
use std::slice::ChunksExactMut;

use typenum::marker_traits::NonZero;
use typenum::marker_traits::Unsigned;

// --- DenseMatrix -------------------------------------------------------------

/// A dense matrix with a constant number of columns.
///
/// Rows are stored contiguously, so a row can be borrowed as a slice of
/// exactly `C::USIZE` elements.
#[derive(Clone, PartialEq)]
pub struct DenseMatrix<T: Default + Copy, C: Unsigned + NonZero> {
    data: Vec<T>,
    rows: usize,
    _columns: std::marker::PhantomData<C>,
}

impl<T: Default + Copy, C: Unsigned + NonZero> DenseMatrix<T, C> {
    /// Create a new matrix with the given number of rows, filled with defaults.
    pub fn new(rows: usize) -> Self {
        Self {
            data: vec![T::default(); rows * C::USIZE],
            rows,
            _columns: std::marker::PhantomData,
        }
    }

    /// Create a new dense matrix from an iterable of rows.
    ///
    /// # Panics
    ///
    /// Panics if any of the rows does not have the number of elements
    /// corresponding to the dense matrix columns.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<[T]>,
    {
        let mut data = Vec::new();
        let mut n = 0;
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), C::USIZE, "row {} has the wrong length", n);
            data.extend_from_slice(row);
            n += 1;
        }
        Self {
            data,
            rows: n,
            _columns: std::marker::PhantomData,
        }
    }

    /// The number of columns of the matrix.
    #[inline]
    pub const fn columns(&self) -> usize {
        C::USIZE
    }

    /// The number of rows of the matrix.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Iterate over the rows of the matrix.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.data.chunks_exact(C::USIZE))
    }

    /// Returns an iterator that allows modifying each row.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut(self.data.chunks_exact_mut(C::USIZE))
    }
}

impl<T: Default + Copy + Debug, C: Unsigned + NonZero> Debug for DenseMatrix<T, C> {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Default + Copy, C: Unsigned + NonZero> Index<usize> for DenseMatrix<T, C> {
    type Output = [T];
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        let start = index * C::USIZE;
        &self.data[start..start + C::USIZE]
    }
}

impl<T: Default + Copy, C: Unsigned + NonZero> IndexMut<usize> for DenseMatrix<T, C> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let start = index * C::USIZE;
        &mut self.data[start..start + C::USIZE]
    }
}

impl<'a, T: Default + Copy, C: Unsigned + NonZero> IntoIterator for &'a DenseMatrix<T, C> {
    type Item = &'a [T];
    type IntoIter = Iter<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Default + Copy, C: Unsigned + NonZero> IntoIterator for &'a mut DenseMatrix<T, C> {
    type Item = &'a mut [T];
    type IntoIter = IterMut<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// --- Iter --------------------------------------------------------------------

/// An iterator over the rows of a [`DenseMatrix`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T>(ChunksExact<'a, T>);

/// An iterator over the mutable rows of a [`DenseMatrix`].
#[derive(Debug)]
pub struct IterMut<'a, T>(ChunksExactMut<'a, T>);

macro_rules! iterator {
    ($t:ident, $($item:tt)*) => {
        impl<'a, T> Iterator for $t<'a, T> {
            type Item = &'a $($item)*;
            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.0.next()
            }
            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.0.size_hint()
            }
        }

        impl<'a, T> ExactSizeIterator for $t<'a, T> {}

        impl<'a, T> FusedIterator for $t<'a, T> {}

        impl<'a, T> DoubleEndedIterator for $t<'a, T> {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.0.next_back()
            }
        }
    };
}

iterator!(Iter, [T]);
iterator!(IterMut, mut [T]);
