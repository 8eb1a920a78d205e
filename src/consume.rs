//! Eager consumers
//!
//! Terminal operations that drive the pull chain and return a concrete
//! result. Only [`Sequence::first`] and [`Sequence::first_where`] stop early;
//! everything else drains the source.

use std::future::IntoFuture;

use crate::adapter::Sequence;
use crate::error::Result;

impl<'a, T: Send + 'a> Sequence<'a, T> {
    /// Collect every item in pull order.
    pub async fn to_array(mut self) -> Result<Vec<T>> {
        let mut result = Vec::new();
        while let Some(item) = self.next().await? {
            result.push(item);
        }
        tracing::trace!(items = result.len(), "sequence collected");
        Ok(result)
    }

    /// Run `handler(item, index)` for every item, awaiting each call before
    /// the next pull. Whatever the handler resolves to is discarded.
    pub async fn each<R, F, Fut>(mut self, mut handler: F) -> Result<()>
    where
        F: FnMut(T, usize) -> Fut,
        Fut: IntoFuture<Output = Result<R>>,
    {
        let mut index = 0usize;
        while let Some(item) = self.next().await? {
            handler(item, index).await?;
            index += 1;
        }
        tracing::trace!(items = index, "sequence drained");
        Ok(())
    }

    /// Fold without a seed: the first item becomes the accumulator as is,
    /// folding starts at index 1. `None` for an empty source.
    pub async fn reduce<F, Fut>(mut self, mut reducer: F) -> Result<Option<T>>
    where
        F: FnMut(T, T, usize) -> Fut,
        Fut: IntoFuture<Output = Result<T>>,
    {
        let Some(mut accumulator) = self.next().await? else {
            return Ok(None);
        };

        let mut index = 1usize;
        while let Some(item) = self.next().await? {
            accumulator = reducer(accumulator, item, index).await?;
            index += 1;
        }
        Ok(Some(accumulator))
    }

    /// Fold every item into `seed`, which is awaited before the first pull.
    pub async fn reduce_with<A, S, F, Fut>(mut self, seed: S, mut reducer: F) -> Result<A>
    where
        S: IntoFuture<Output = Result<A>>,
        F: FnMut(A, T, usize) -> Fut,
        Fut: IntoFuture<Output = Result<A>>,
    {
        let mut accumulator = seed.await?;
        let mut index = 0usize;
        while let Some(item) = self.next().await? {
            accumulator = reducer(accumulator, item, index).await?;
            index += 1;
        }
        Ok(accumulator)
    }

    /// The first item, pulling nothing beyond it.
    pub async fn first(mut self) -> Result<Option<T>> {
        self.next().await
    }

    /// The first item for which `predicate(item, index)` resolves to `true`.
    ///
    /// The predicate result is awaited like every other callback. Pulling
    /// stops at the first match.
    pub async fn first_where<F, Fut>(mut self, mut predicate: F) -> Result<Option<T>>
    where
        F: FnMut(&T, usize) -> Fut,
        Fut: IntoFuture<Output = Result<bool>>,
    {
        let mut index = 0usize;
        while let Some(item) = self.next().await? {
            if predicate(&item, index).await? {
                return Ok(Some(item));
            }
            index += 1;
        }
        Ok(None)
    }

    /// The last item. Always drains the source.
    pub async fn last(mut self) -> Result<Option<T>> {
        let mut last = None;
        while let Some(item) = self.next().await? {
            last = Some(item);
        }
        Ok(last)
    }

    /// The last item for which `predicate(item, index)` resolves to `true`.
    /// Always drains the source.
    pub async fn last_where<F, Fut>(mut self, mut predicate: F) -> Result<Option<T>>
    where
        F: FnMut(&T, usize) -> Fut,
        Fut: IntoFuture<Output = Result<bool>>,
    {
        let mut last = None;
        let mut index = 0usize;
        while let Some(item) = self.next().await? {
            if predicate(&item, index).await? {
                last = Some(item);
            }
            index += 1;
        }
        Ok(last)
    }
}
