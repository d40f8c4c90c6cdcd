//! Element-wise transformations.
//!
//! Each combinator here wraps the upstream traversal with a consumer that
//! converts, drops or expands elements before passing them on. They keep the
//! volatile and async traits of their input.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::{Error, Flow, Sequence};

impl<T: 'static> Sequence<T> {
    /// Transform every element.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// let lengths = from_vec(vec!["a", "bcd", "ef"]).map(str::len);
    /// assert_eq!(lengths.to_vec().unwrap(), vec![1, 3, 2]);
    /// ```
    pub fn map<U, F>(&self, f: F) -> Sequence<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let upstream = self.clone();
        self.derive(move |g| upstream.traverse(&|t| g(f(t))))
    }

    /// Transform every element with a conversion that may fail.
    ///
    /// The first failure ends the traversal.
    pub fn try_map<U, F>(&self, f: F) -> Sequence<U>
    where
        U: 'static,
        F: Fn(T) -> Result<U, Error> + Send + Sync + 'static,
    {
        let upstream = self.clone();
        self.derive(move |g| upstream.traverse(&|t| g(f(t)?)))
    }

    /// Transform elements, dropping those that map to `None`.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// let parsed = from_vec(vec!["1", "x", "3"]).filter_map(|s| s.parse::<i32>().ok());
    /// assert_eq!(parsed.to_vec().unwrap(), vec![1, 3]);
    /// ```
    pub fn filter_map<U, F>(&self, f: F) -> Sequence<U>
    where
        U: 'static,
        F: Fn(T) -> Option<U> + Send + Sync + 'static,
    {
        let upstream = self.clone();
        self.derive(move |g| {
            upstream.traverse(&|t| match f(t) {
                Some(u) => g(u),
                None => Ok(()),
            })
        })
    }

    /// Keep only the elements that satisfy `pred`.
    pub fn filter<F>(&self, pred: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let upstream = self.clone();
        self.derive(move |g| upstream.traverse(&|t| if pred(&t) { g(t) } else { Ok(()) }))
    }

    /// [`filter`](Self::filter) with a predicate that may fail.
    pub fn try_filter<F>(&self, pred: F) -> Self
    where
        F: Fn(&T) -> Result<bool, Error> + Send + Sync + 'static,
    {
        let upstream = self.clone();
        self.derive(move |g| upstream.traverse(&|t| if pred(&t)? { g(t) } else { Ok(()) }))
    }

    /// Turn every element into any number of outputs.
    ///
    /// `f` receives each element together with an emitter, and may call the
    /// emitter as often as it likes. Once downstream stops or fails, further
    /// emitted values are discarded. A downstream signal takes precedence
    /// over whatever `f` returns.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// let doubled = from_vec(vec![1, 2]).emit(|x, out| {
    ///     out(x);
    ///     out(x);
    ///     Ok(())
    /// });
    /// assert_eq!(doubled.to_vec().unwrap(), vec![1, 1, 2, 2]);
    /// ```
    pub fn emit<U, F>(&self, f: F) -> Sequence<U>
    where
        U: 'static,
        F: Fn(T, &mut dyn FnMut(U)) -> Flow + Send + Sync + 'static,
    {
        let upstream = self.clone();
        self.derive(move |g| {
            upstream.traverse(&|t| {
                let mut downstream = Ok(());
                let produced = f(t, &mut |u| {
                    if downstream.is_ok() {
                        downstream = g(u);
                    }
                });
                downstream.and(produced)
            })
        })
    }

    /// Look at every element on its way past, along with its position.
    ///
    /// Returning an error from `f` ends the traversal before the element is
    /// delivered. Positions restart at zero on every traversal.
    pub fn inspect<F>(&self, f: F) -> Self
    where
        F: Fn(usize, &T) -> Flow + Send + Sync + 'static,
    {
        let upstream = self.clone();
        self.derive(move |g| {
            let position = AtomicUsize::new(0);
            upstream.traverse(&|t| {
                f(position.fetch_add(1, Ordering::Relaxed), &t)?;
                g(t)
            })
        })
    }

    /// Running accumulation.
    ///
    /// Every element is combined with the accumulator, and the new
    /// accumulator value is what gets delivered. The accumulator starts over
    /// from `initial` on every traversal.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// let totals = from_vec(vec![1, 2, 3, 4]).scan(0, |acc, x| acc + x);
    /// assert_eq!(totals.to_vec().unwrap(), vec![1, 3, 6, 10]);
    /// ```
    pub fn scan<U, F>(&self, initial: U, op: F) -> Sequence<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&U, T) -> U + Send + Sync + 'static,
    {
        let upstream = self.clone();
        self.derive(move |g| {
            let acc = Mutex::new(initial.clone());
            upstream.traverse(&|t| {
                let next = {
                    let mut acc = acc.lock();
                    *acc = op(&acc, t);
                    acc.clone()
                };
                g(next)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, from_vec, range};

    #[test]
    fn test_map_changes_type() {
        let s = range(1, 4, 1).map(|i| format!("#{i}"));
        assert_eq!(s.to_vec().unwrap(), vec!["#1", "#2", "#3"]);
    }

    #[test]
    fn test_try_map_stops_at_first_failure() {
        let s = from_vec(vec!["1", "2", "x", "4"]).try_map(|s| s.parse::<i32>().map_err(Error::wrap));
        let mut seen = Vec::new();
        let outcome = s.for_each(|i| seen.push(i));
        assert!(outcome.is_err());
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_filter_and_try_filter() {
        let evens = range(0, 10, 1).filter(|i| i % 2 == 0);
        assert_eq!(evens.to_vec().unwrap(), vec![0, 2, 4, 6, 8]);

        let boom = Error::msg("boom");
        let failing = {
            let boom = boom.clone();
            range(0, 10, 1).try_filter(move |&i| if i < 3 { Ok(true) } else { Err(boom.clone()) })
        };
        assert_eq!(failing.count(), Err(boom));
    }

    #[test]
    fn test_emit_discards_after_stop() {
        let expanded = from_vec(vec![3, 2]).emit(|n, out| {
            for i in 0..n {
                out(i);
            }
            Ok(())
        });
        assert_eq!(expanded.to_vec().unwrap(), vec![0, 1, 2, 0, 1]);
        assert_eq!(expanded.limit(2).to_vec().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_emit_reports_processor_error() {
        let boom = Error::msg("boom");
        let s = {
            let boom = boom.clone();
            from_vec(vec![1, 2]).emit(move |x: i32, out| {
                out(x);
                if x == 2 { Err(boom.clone()) } else { Ok(()) }
            })
        };
        let mut seen = Vec::new();
        assert_eq!(s.for_each(|x| seen.push(x)), Err(boom));
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_inspect_positions_restart() {
        use parking_lot::Mutex;
        use std::sync::Arc;

        let log = Arc::new(Mutex::new(Vec::new()));
        let s = {
            let log = Arc::clone(&log);
            from_vec(vec!['a', 'b']).inspect(move |i, c| {
                log.lock().push((i, *c));
                Ok(())
            })
        };
        s.count().unwrap();
        s.count().unwrap();
        assert_eq!(
            *log.lock(),
            vec![(0, 'a'), (1, 'b'), (0, 'a'), (1, 'b')]
        );
    }

    #[test]
    fn test_scan_restarts_each_traversal() {
        let s = range(1, 5, 1).scan(1, |acc, x| acc * x);
        assert_eq!(s.to_vec().unwrap(), vec![1, 2, 6, 24]);
        assert_eq!(s.to_vec().unwrap(), vec![1, 2, 6, 24]);
    }

    #[test]
    fn test_map_keeps_flags() {
        let s = range(0, 4, 1).async_pool(2).map(|i| i + 1);
        assert!(s.is_async());
        assert!(s.is_volatile());
        let mut got = s.to_vec().unwrap();
        got.sort_unstable();
        assert_eq!(got, vec![1, 2, 3, 4]);
    }
}
