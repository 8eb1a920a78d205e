//! Lazy operators
//!
//! Each operator wraps its upstream in a new [`Sequence`] that pulls from
//! upstream only when it is itself pulled. One item is in flight at a time:
//! item `i + 1` is not requested before item `i` has been fully processed.

use std::future::{IntoFuture, ready};

use crate::adapter::{IntoSequence, Sequence};
use crate::error::Result;

impl<'a, T: Send + 'a> Sequence<'a, T> {
    /// Project every item through `selector(item, index)`.
    pub fn map<U, F, Fut>(self, mut selector: F) -> Sequence<'a, U>
    where
        U: Send + 'a,
        F: FnMut(T, usize) -> Fut + Send + 'a,
        Fut: IntoFuture<Output = Result<U>> + Send + 'a,
        Fut::IntoFuture: Send + 'a,
    {
        let mut upstream = self;
        let out = async_stream::try_stream! {
            let mut index = 0usize;
            while let Some(item) = upstream.next().await? {
                let value = selector(item, index).await?;
                index += 1;
                yield value;
            }
        };
        Sequence::generated(out)
    }

    /// Flatten one level of a sequence of sequences.
    pub fn many(self) -> Sequence<'a, T::Item>
    where
        T: IntoSequence<'a>,
    {
        self.many_by(|outer, _| ready(Ok(outer)))
    }

    /// Alias of [`Sequence::many`].
    pub fn flatten(self) -> Sequence<'a, T::Item>
    where
        T: IntoSequence<'a>,
    {
        self.many()
    }

    /// Flatten the sequences returned by `items_selector(outer, index)`.
    ///
    /// Each inner sequence is drained completely before the next outer item
    /// is pulled.
    pub fn many_by<S, F, Fut>(self, mut items_selector: F) -> Sequence<'a, S::Item>
    where
        S: IntoSequence<'a> + Send + 'a,
        F: FnMut(T, usize) -> Fut + Send + 'a,
        Fut: IntoFuture<Output = Result<S>> + Send + 'a,
        Fut::IntoFuture: Send + 'a,
    {
        let mut outer_items = self;
        let out = async_stream::try_stream! {
            let mut index = 0usize;
            while let Some(outer) = outer_items.next().await? {
                let inner_items = items_selector(outer, index).await?;
                index += 1;
                let mut inner = inner_items.into_sequence()?;
                while let Some(value) = inner.next().await? {
                    yield value;
                }
            }
        };
        Sequence::generated(out)
    }

    /// Flatten with both selectors: the inner sequence comes from
    /// `items_selector(outer, index)` and every inner item is projected
    /// through `value_selector(inner, outer)`.
    pub fn many_with<S, U, Fi, FutI, Fv, FutV>(
        self,
        mut items_selector: Fi,
        mut value_selector: Fv,
    ) -> Sequence<'a, U>
    where
        T: Clone,
        S: IntoSequence<'a> + Send + 'a,
        U: Send + 'a,
        Fi: FnMut(T, usize) -> FutI + Send + 'a,
        FutI: IntoFuture<Output = Result<S>> + Send + 'a,
        FutI::IntoFuture: Send + 'a,
        Fv: FnMut(S::Item, T) -> FutV + Send + 'a,
        FutV: IntoFuture<Output = Result<U>> + Send + 'a,
        FutV::IntoFuture: Send + 'a,
    {
        let mut outer_items = self;
        let out = async_stream::try_stream! {
            let mut index = 0usize;
            while let Some(outer) = outer_items.next().await? {
                let selected = items_selector(outer.clone(), index);
                let inner_items = selected.await?;
                index += 1;
                let mut inner = inner_items.into_sequence()?;
                while let Some(item) = inner.next().await? {
                    let projected = value_selector(item, outer.clone());
                    let value = projected.await?;
                    yield value;
                }
            }
        };
        Sequence::generated(out)
    }

    /// This sequence followed by each of `others`, in order.
    ///
    /// Every other source is adapted when the concatenation reaches it.
    pub fn concat<I, S>(self, others: I) -> Sequence<'a, T>
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: Send + 'a,
        S: IntoSequence<'a, Item = T> + Send + 'a,
    {
        let rest = others.into_iter().map(IntoSequence::into_sequence);
        Sequence::from_iterable(std::iter::once(Ok(self)).chain(rest))
            .map(|part, _| ready(part))
            .many()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::{Deferred, defer};
    use crate::adapter::SequenceKind;
    use crate::error::Error;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn map_pulls_one_item_per_output() {
        let pulled = Arc::new(Mutex::new(Vec::new()));
        let log = pulled.clone();
        let source = Sequence::from_iterable((0..5).inspect(move |i| log.lock().unwrap().push(*i)));

        let mut mapped = source.map(|x, i| async move { Ok(x * 10 + i) });
        assert_eq!(mapped.next().await.unwrap(), Some(0));
        assert_eq!(mapped.next().await.unwrap(), Some(11));
        assert_eq!(*pulled.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn many_keeps_outer_then_inner_order() {
        let rows = Sequence::from_iterable(vec![vec![1, 2], vec![], vec![3]]);
        let flat = rows.many().to_array().await.unwrap();
        assert_eq!(flat, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn many_with_passes_outer_to_value_selector() {
        let words = Sequence::from_iterable(vec!["ab", "c"]);
        let out = words
            .many_with(
                |word, _| defer(move || word.chars().collect::<Vec<_>>()),
                |ch, word| Deferred::ready(format!("{word}:{ch}")),
            )
            .to_array()
            .await
            .unwrap();
        assert_eq!(out, vec!["ab:a", "ab:b", "c:c"]);
    }

    #[tokio::test]
    async fn many_with_accepts_outer_items_that_are_not_sync() {
        let cells = Sequence::from_iterable(vec![Cell::new(1), Cell::new(2)]);
        let out = cells
            .many_with(
                |cell, _| ready(Ok(vec![cell.get(); 2])),
                |n, cell| ready(Ok(n + cell.get())),
            )
            .to_array()
            .await
            .unwrap();
        assert_eq!(out, vec![2, 2, 4, 4]);
    }

    #[tokio::test]
    async fn operator_output_is_a_pull_sequence() {
        let source = Sequence::from_iterable(vec![1]);
        assert_eq!(source.kind(), SequenceKind::Sync);
        let mapped = source.map(|x, _| ready(Ok(x)));
        assert_eq!(mapped.kind(), SequenceKind::Pull);
        assert_eq!(mapped.many_by(|x, _| ready(Ok([x]))).kind(), SequenceKind::Pull);
    }

    #[tokio::test]
    async fn many_reports_unsupported_inner_values() {
        let rows = Sequence::from_iterable(vec![serde_json::json!([1]), serde_json::json!(2)]);
        let mut flat = rows.many();
        assert_eq!(flat.next().await.unwrap(), Some(serde_json::json!(1)));
        let err = flat.next().await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedSequence { ref kind } if kind == "number"));
    }

    #[tokio::test]
    async fn concat_mixes_protocols() {
        let head = Sequence::from_iterable(vec![1, 2]);
        let tail = Sequence::from_stream(futures::stream::iter(vec![3, 4]));
        let all = head
            .concat([tail, Sequence::empty(), Sequence::from_iterable([5])])
            .to_array()
            .await
            .unwrap();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
    }
}
