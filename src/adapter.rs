//! Sequence Adapter
//!
//! Turns any supported source into the canonical pull handle, [`Sequence`].
//! Sources are resolved by capability, first match wins:
//!
//! 1. a value that already is a pull iterator (`Sequence`) is returned as is;
//! 2. async sources (`Stream`s) are wrapped through [`Sequence::from_stream`]
//!    or [`Sequence::from_try_stream`];
//! 3. sync sources (collections, iterators) are wrapped through
//!    [`Sequence::from_iterable`].
//!
//! Dynamic values (`serde_json::Value`) are probed at runtime and fail with
//! [`Error::UnsupportedSequence`] when they offer no iteration capability.

use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{BoxStream, FusedStream};
use futures_util::{Stream, StreamExt};
use serde_json::Value;

use crate::error::{Error, Result};

/// Which capability the adapter used to obtain a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    /// Produced by an operator or handed over as an existing pull handle
    Pull,
    /// Backed by an async stream
    Async,
    /// Backed by a sync collection or iterator
    Sync,
}

/// Canonical pull handle over items of type `T`.
///
/// `next` yields `Ok(Some(item))` until the source is exhausted, then
/// `Ok(None)` forever. A failed pull is reported once and the sequence is
/// exhausted afterwards.
pub struct Sequence<'a, T> {
    inner: Option<BoxStream<'a, Result<T>>>,
    kind: SequenceKind,
}

impl<'a, T> Sequence<'a, T> {
    pub(crate) fn from_boxed(stream: BoxStream<'a, Result<T>>, kind: SequenceKind) -> Self {
        tracing::trace!(kind = ?kind, "adapted sequence");
        Self {
            inner: Some(stream),
            kind,
        }
    }

    /// Capability the sequence was adapted from.
    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    /// Whether the sequence has reported exhaustion or failure.
    pub fn is_exhausted(&self) -> bool {
        self.inner.is_none()
    }

    /// Pull the next item.
    pub async fn next(&mut self) -> Result<Option<T>> {
        StreamExt::next(self).await.transpose()
    }
}

impl<'a, T: Send + 'a> Sequence<'a, T> {
    /// A sequence that is exhausted from the start.
    pub fn empty() -> Self {
        Self::from_boxed(futures::stream::empty().boxed(), SequenceKind::Sync)
    }

    /// Adapt a sync collection or iterator. Items are pulled lazily.
    pub fn from_iterable<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'a,
    {
        let stream = futures::stream::iter(items.into_iter().map(Ok));
        Self::from_boxed(stream.boxed(), SequenceKind::Sync)
    }

    /// Adapt an async stream whose pulls cannot fail.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = T> + Send + 'a,
    {
        Self::from_boxed(stream.map(Ok).boxed(), SequenceKind::Async)
    }

    /// Adapt an async stream whose pulls may fail.
    ///
    /// An `Err` item is reported as [`Error::Upstream`].
    pub fn from_try_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = std::result::Result<T, E>> + Send + 'a,
        E: Into<crate::error::BoxError>,
    {
        let stream = stream.map(|item| item.map_err(Error::upstream));
        Self::from_boxed(stream.boxed(), SequenceKind::Async)
    }

    /// Wrap a generated pipeline stage.
    pub(crate) fn generated<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<T>> + Send + 'a,
    {
        Self::from_boxed(stream.boxed(), SequenceKind::Pull)
    }
}

impl<T> Stream for Sequence<'_, T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };

        match inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(item))) => Poll::Ready(Some(Ok(item))),
            Poll::Ready(Some(Err(err))) => {
                this.inner = None;
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                this.inner = None;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> FusedStream for Sequence<'_, T> {
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

impl<T> fmt::Debug for Sequence<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("kind", &self.kind)
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}

/// Conversion into the canonical [`Sequence`] pull handle.
pub trait IntoSequence<'a>: Sized {
    type Item: Send + 'a;

    fn into_sequence(self) -> Result<Sequence<'a, Self::Item>>;
}

impl<'a, T: Send + 'a> IntoSequence<'a> for Sequence<'a, T> {
    type Item = T;

    fn into_sequence(self) -> Result<Sequence<'a, T>> {
        Ok(self)
    }
}

impl<'a, T: Send + 'a> IntoSequence<'a> for Vec<T> {
    type Item = T;

    fn into_sequence(self) -> Result<Sequence<'a, T>> {
        Ok(Sequence::from_iterable(self))
    }
}

impl<'a, T: Send + 'a> IntoSequence<'a> for VecDeque<T> {
    type Item = T;

    fn into_sequence(self) -> Result<Sequence<'a, T>> {
        Ok(Sequence::from_iterable(self))
    }
}

impl<'a, T: Send + 'a, const N: usize> IntoSequence<'a> for [T; N] {
    type Item = T;

    fn into_sequence(self) -> Result<Sequence<'a, T>> {
        Ok(Sequence::from_iterable(self))
    }
}

impl<'a, T: Clone + Send + Sync + 'a> IntoSequence<'a> for &'a [T] {
    type Item = T;

    fn into_sequence(self) -> Result<Sequence<'a, T>> {
        Ok(Sequence::from_iterable(self.iter().cloned()))
    }
}

impl<'a, T: Send + 'a> IntoSequence<'a> for Option<T> {
    type Item = T;

    fn into_sequence(self) -> Result<Sequence<'a, T>> {
        Ok(Sequence::from_iterable(self))
    }
}

impl<'a> IntoSequence<'a> for Value {
    type Item = Value;

    fn into_sequence(self) -> Result<Sequence<'a, Value>> {
        match self {
            Value::Array(items) => items.into_sequence(),
            other => Err(Error::unsupported(json_kind(&other))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn pulls_until_exhausted_and_stays_exhausted() {
        let mut seq = vec![1, 2].into_sequence().unwrap();
        assert_eq!(seq.kind(), SequenceKind::Sync);
        assert_eq!(seq.next().await.unwrap(), Some(1));
        assert_eq!(seq.next().await.unwrap(), Some(2));
        assert_eq!(seq.next().await.unwrap(), None);
        assert!(seq.is_exhausted());
        assert_eq!(seq.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn existing_sequence_is_returned_unchanged() {
        let seq = Sequence::from_stream(futures::stream::iter(vec!['a', 'b']));
        let mut adapted = seq.into_sequence().unwrap();
        assert_eq!(adapted.kind(), SequenceKind::Async);
        assert_eq!(adapted.next().await.unwrap(), Some('a'));
    }

    #[tokio::test]
    async fn failed_pull_is_reported_once() {
        let source = futures::stream::iter(vec![Ok(1), Err("disk gone"), Ok(3)]);
        let mut seq = Sequence::from_try_stream(source);
        assert_eq!(seq.next().await.unwrap(), Some(1));
        let err = seq.next().await.unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(seq.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn json_arrays_adapt_and_scalars_are_rejected() {
        let mut seq = json!([1, "two"]).into_sequence().unwrap();
        assert_eq!(seq.next().await.unwrap(), Some(json!(1)));
        assert_eq!(seq.next().await.unwrap(), Some(json!("two")));

        for (value, kind) in [
            (json!(null), "null"),
            (json!(7), "number"),
            (json!("abc"), "string"),
            (json!({"a": 1}), "object"),
        ] {
            match value.into_sequence() {
                Err(Error::UnsupportedSequence { kind: got }) => assert_eq!(got, kind),
                other => panic!("expected unsupported sequence, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn borrowed_slices_clone_their_items() {
        let names = vec!["ada".to_string(), "grace".to_string()];
        let mut seq = names.as_slice().into_sequence().unwrap();
        assert_eq!(seq.next().await.unwrap().as_deref(), Some("ada"));
        assert_eq!(names.len(), 2);
    }

    #[tokio::test]
    async fn terminated_sequences_can_be_selected_over() {
        let mut left = Sequence::from_iterable(vec![1, 2]);
        let mut right = Sequence::from_stream(futures::stream::iter(vec![10]));
        let mut seen = Vec::new();
        loop {
            futures::select! {
                item = left.select_next_some() => seen.push(item.unwrap()),
                item = right.select_next_some() => seen.push(item.unwrap()),
                complete => break,
            }
        }
        seen.sort();
        assert_eq!(seen, vec![1, 2, 10]);
        assert!(left.is_terminated());
        assert!(right.is_terminated());
    }

    #[traced_test]
    #[tokio::test]
    async fn adaptation_is_traced_with_its_kind() {
        let _seq = [1, 2, 3].into_sequence().unwrap();
        assert!(logs_contain("adapted sequence"));
        assert!(logs_contain("kind=Sync"));
    }
}
