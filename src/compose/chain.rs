use crate::Sequence;

/// Traverse several sequences one after another.
///
/// The result is volatile if any input is, and async if any input is.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let all = concat(vec![from_vec(vec![1, 2]), empty(), single(3)]);
/// assert_eq!(all.to_vec().unwrap(), vec![1, 2, 3]);
/// ```
pub fn concat<T: 'static>(seqs: Vec<Sequence<T>>) -> Sequence<T> {
    let volatile = seqs.iter().any(Sequence::is_volatile);
    let is_async = seqs.iter().any(Sequence::is_async);
    Sequence::generate(move |f| {
        for seq in &seqs {
            seq.traverse(f)?;
        }
        Ok(())
    })
    .set_volatile(volatile)
    .set_async(is_async)
}

impl<T: 'static> Sequence<T> {
    /// This sequence followed by `other`.
    pub fn chain(&self, other: &Sequence<T>) -> Self {
        concat(vec![self.clone(), other.clone()])
    }
}

impl<T: Send + 'static> Sequence<Sequence<T>> {
    /// Traverse every inner sequence in turn.
    ///
    /// Inner sequences are serialized with [`sync`](crate::sync), since their
    /// traits are only known once they arrive.
    pub fn concat_all(&self) -> Sequence<T> {
        let upstream = self.clone();
        self.derive(move |g| upstream.traverse(&|inner: Sequence<T>| inner.sync().traverse(g)))
    }
}

impl<I> Sequence<I>
where
    I: IntoIterator + 'static,
    I::Item: 'static,
{
    /// Deliver the items of every element in turn.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// let rows = from_vec(vec![vec![1, 2], vec![], vec![3]]);
    /// assert_eq!(rows.flatten().to_vec().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn flatten(&self) -> Sequence<I::Item> {
        let upstream = self.clone();
        self.derive(move |g| {
            upstream.traverse(&|items: I| {
                for item in items {
                    g(item)?;
                }
                Ok(())
            })
        })
    }
}
