//! Counting and stepping sources.

use std::{fmt::Display, ops::AddAssign};

use crate::{Error, Sequence};

/// Primitive numbers that can drive [`counter`] and [`range`].
pub trait Number:
    Copy + PartialOrd + AddAssign + Default + Display + Send + Sync + 'static
{
    /// The increment used by [`counter`].
    const ONE: Self;
}

macro_rules! impl_number {
    ($one:literal => $($t:ty),+) => {
        $(impl Number for $t {
            const ONE: Self = $one;
        })+
    };
}

impl_number!(1 => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_number!(1.0 => f32, f64);

/// An endless sequence counting up by one from `start`.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let s = counter(10_u8).limit(3);
/// assert_eq!(s.to_vec().unwrap(), vec![10, 11, 12]);
/// ```
pub fn counter<T: Number>(start: T) -> Sequence<T> {
    Sequence::generate(move |f| {
        let mut i = start;
        loop {
            f(i)?;
            i += T::ONE;
        }
    })
}

/// The numbers `start, start + step, ...` that are below `stop`.
///
/// An empty sequence when `start >= stop`. A step that is not positive would
/// never get anywhere, so the sequence fails with [`Error::InvalidStep`]
/// instead.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// assert_eq!(range(0, 10, 3).to_vec().unwrap(), vec![0, 3, 6, 9]);
/// assert_eq!(range(0.0, 1.0, 0.25).count(), Ok(4));
/// assert!(range(0, 10, 0).count().is_err());
/// ```
pub fn range<T: Number>(start: T, stop: T, step: T) -> Sequence<T> {
    // Written so that NaN is rejected too.
    if !(step > T::default()) {
        return crate::failing(Error::InvalidStep(step.to_string()));
    }

    Sequence::generate(move |f| {
        let mut i = start;
        while i < stop {
            f(i)?;
            i += step;
        }
        Ok(())
    })
}

/// The states of a deterministic process.
///
/// Yields `initial`, then keeps applying `step` to the latest state and
/// yielding what it returns, until it returns `None`.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let collatz = simulate(6_u32, |&n| match n {
///     1 => None,
///     n if n % 2 == 0 => Some(n / 2),
///     n => Some(3 * n + 1),
/// });
/// assert_eq!(collatz.to_vec().unwrap(), vec![6, 3, 10, 5, 16, 8, 4, 2, 1]);
/// ```
///
/// If `step` is not deterministic, mark the result with
/// [`volatile`](Sequence::volatile).
pub fn simulate<T, F>(initial: T, step: F) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T) -> Option<T> + Send + Sync + 'static,
{
    Sequence::generate(move |f| {
        let mut state = initial.clone();
        loop {
            let next = step(&state);
            f(state)?;
            match next {
                Some(s) => state = s,
                None => return Ok(()),
            }
        }
    })
}
