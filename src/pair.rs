//! Two-slot values carried by zipped and map-like sequences.

use std::fmt;

use crate::Sequence;

/// An immutable two-element tuple holding values of independent types.
///
/// `Pair` is the element type of zipped sequences and of map-like sequences
/// built with [`from_map`](crate::from_map).
///
/// # Examples
///
/// ```rust
/// use pullseq::Pair;
///
/// let p = Pair::new(1, "one");
/// assert_eq!(*p.a(), 1);
/// assert_eq!(p.swap(), Pair::new("one", 1));
/// assert_eq!(p.to_string(), "(1, one)");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair<A, B> {
    a: A,
    b: B,
}

impl<A, B> Pair<A, B> {
    /// Creates a pair from its two values.
    #[inline]
    pub const fn new(a: A, b: B) -> Self {
        Pair { a, b }
    }

    /// Returns a reference to the first value.
    #[inline]
    pub const fn a(&self) -> &A {
        &self.a
    }

    /// Returns a reference to the second value.
    #[inline]
    pub const fn b(&self) -> &B {
        &self.b
    }

    /// Consumes the pair, returning both values in order.
    ///
    /// ```rust
    /// use pullseq::Pair;
    ///
    /// let (a, b) = Pair::new('x', 2.5).into_parts();
    /// assert_eq!((a, b), ('x', 2.5));
    /// ```
    #[inline]
    pub fn into_parts(self) -> (A, B) {
        (self.a, self.b)
    }

    /// Consumes the pair, returning the first value.
    #[inline]
    pub fn into_a(self) -> A {
        self.a
    }

    /// Consumes the pair, returning the second value.
    #[inline]
    pub fn into_b(self) -> B {
        self.b
    }

    /// Returns a new pair with the values swapped.
    #[inline]
    pub fn swap(self) -> Pair<B, A> {
        Pair::new(self.b, self.a)
    }

    /// Converts from `&Pair<A, B>` to `Pair<&A, &B>`.
    #[inline]
    pub const fn as_ref(&self) -> Pair<&A, &B> {
        Pair::new(&self.a, &self.b)
    }
}

impl<A, B> From<(A, B)> for Pair<A, B> {
    fn from((a, b): (A, B)) -> Self {
        Pair::new(a, b)
    }
}

impl<A, B> From<Pair<A, B>> for (A, B) {
    fn from(p: Pair<A, B>) -> Self {
        p.into_parts()
    }
}

impl<A: fmt::Display, B: fmt::Display> fmt::Display for Pair<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

impl<A, B> Sequence<Pair<A, B>>
where
    A: Send + 'static,
    B: Send + 'static,
{
    /// Keep only the first value of every pair.
    pub fn firsts(&self) -> Sequence<A> {
        self.map(Pair::into_a)
    }

    /// Keep only the second value of every pair.
    pub fn seconds(&self) -> Sequence<B> {
        self.map(Pair::into_b)
    }

    /// Swap the values of every pair.
    pub fn swapped(&self) -> Sequence<Pair<B, A>> {
        self.map(Pair::swap)
    }
}
