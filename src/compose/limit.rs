//! Ending traversals early.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{Error, Sequence};

impl<T: 'static> Sequence<T> {
    /// Deliver at most `n` elements.
    ///
    /// The upstream is asked to stop right after the `n`th element, so no
    /// element past the limit is ever produced. With `n == 0` the upstream is
    /// still started and stopped at its first element.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// assert_eq!(counter(1).limit(3).to_vec().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn limit(&self, n: usize) -> Self {
        let upstream = self.clone();
        self.derive(move |g| {
            let seen = AtomicUsize::new(0);
            upstream.traverse(&|t| {
                let position = seen.fetch_add(1, Ordering::Relaxed) + 1;
                if position > n {
                    return Err(Error::Stop);
                }
                g(t)?;
                if position == n { Err(Error::Stop) } else { Ok(()) }
            })
        })
    }

    /// Deliver elements while `pred` holds, then stop.
    pub fn take_while<F>(&self, pred: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let upstream = self.clone();
        self.derive(move |g| upstream.traverse(&|t| if pred(&t) { g(t) } else { Err(Error::Stop) }))
    }

    /// Deliver elements until `pred` first holds; that element is dropped.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// let words = from_vec(vec!["a", "b", "END", "c"]).until(|w| *w == "END");
    /// assert_eq!(words.to_vec().unwrap(), vec!["a", "b"]);
    /// ```
    pub fn until<F>(&self, pred: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.take_while(move |t| !pred(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{counter, from_vec, range};
    use std::sync::Arc;

    #[test]
    fn test_limit_does_not_overdraw() {
        let produced = Arc::new(AtomicUsize::new(0));
        let s = {
            let produced = Arc::clone(&produced);
            counter(0_u32).inspect(move |_, _| {
                produced.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        };

        assert_eq!(s.limit(5).count(), Ok(5));
        assert_eq!(produced.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_limit_longer_than_input() {
        assert_eq!(range(0, 3, 1).limit(10).to_vec().unwrap(), vec![0, 1, 2]);
        assert_eq!(range(0, 3, 1).limit(0).count(), Ok(0));
    }

    #[test]
    fn test_limit_restarts_per_traversal() {
        let s = from_vec(vec![1, 2, 3]).limit(2);
        assert_eq!(s.to_vec().unwrap(), vec![1, 2]);
        assert_eq!(s.to_vec().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_take_while_and_until() {
        let below = counter(0).take_while(|&i| i * i < 20);
        assert_eq!(below.to_vec().unwrap(), vec![0, 1, 2, 3, 4]);

        let before_five = counter(0).until(|&i| i == 5);
        assert_eq!(before_five.sum(), Ok(10));
    }

    #[test]
    fn test_limit_passes_source_error() {
        let boom = Error::msg("boom");
        let failing = {
            let boom = boom.clone();
            Sequence::generate(move |f| {
                f(1)?;
                Err(boom.clone())
            })
        };
        assert_eq!(failing.limit(5).count(), Err(boom));
        // The limit is reached before the failure.
        assert_eq!(failing.limit(1).count(), Ok(1));
    }
}
