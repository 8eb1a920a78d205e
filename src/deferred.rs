//! Deferred values
//!
//! Callbacks hand their result back as anything that can be awaited. Async
//! blocks cover the deferred case; [`Deferred`] also covers the plain case,
//! so a single closure can return either branch.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures_util::FutureExt;

use crate::error::{Error, Result};

/// A value that is either already available or still pending.
pub enum Deferred<'a, T> {
    Ready(Option<Result<T>>),
    Pending(BoxFuture<'a, Result<T>>),
}

impl<'a, T> Deferred<'a, T> {
    /// A value that is available immediately.
    pub fn ready(value: T) -> Self {
        Self::Ready(Some(Ok(value)))
    }

    /// A failure that is available immediately.
    pub fn failed(err: Error) -> Self {
        Self::Ready(Some(Err(err)))
    }

    /// A value produced by a future.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'a,
    {
        Self::Pending(future.boxed())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl<T> From<T> for Deferred<'_, T> {
    fn from(value: T) -> Self {
        Self::ready(value)
    }
}

// The ready slot is moved out, never pinned in place.
impl<T> Unpin for Deferred<'_, T> {}

impl<T> Future for Deferred<'_, T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.get_mut() {
            Deferred::Ready(slot) => {
                Poll::Ready(slot.take().expect("Deferred polled after completion"))
            }
            Deferred::Pending(future) => future.as_mut().poll(cx),
        }
    }
}

/// Produce `f()` on a later scheduler turn.
pub fn defer<'a, T, F>(f: F) -> Deferred<'a, T>
where
    T: Send + 'a,
    F: FnOnce() -> T + Send + 'a,
{
    Deferred::pending(async move {
        tokio::task::yield_now().await;
        Ok(f())
    })
}
