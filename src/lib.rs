//! # asynq: pipelines over any sequence
//!
//! Chain lazy steps over plain collections, sync iterators and async streams,
//! then drive the chain to a result. Callbacks may answer immediately or
//! later; both are awaited the same way.
//!
//! ## Building Blocks
//!
//! - **[`Sequence`]**: the canonical pull handle every source is adapted to
//! - **[`IntoSequence`]**: the adapter; fails with
//!   [`Error::UnsupportedSequence`] for values that cannot be iterated
//! - **[`Deferred`]**: a callback result that is either ready or pending
//!
//! ## Operators
//!
//! **Lazy** (return a new `Sequence`): `map`, `many`, `many_by`,
//! `many_with`, `flatten`, `concat`.
//!
//! **Eager** (drive the chain): `to_array`, `each`, `reduce`, `reduce_with`,
//! `first`, `first_where`, `last`, `last_where`, and `group` / `group_with`,
//! which drain first and then yield `(key, values)` pairs lazily.
//!
//! ## Example
//!
//! ```rust,ignore
//! use asynq::{Deferred, defer};
//!
//! let doubled = asynq::from(vec![1, 2, 3])?
//!     .map(|x, _| defer(move || x * 2))
//!     .to_array()
//!     .await?;
//! assert_eq!(doubled, vec![2, 4, 6]);
//!
//! let rows = asynq::from(vec![vec![1, 2], vec![3]])?
//!     .many_by(|row, _| async move { Ok(row) })
//!     .reduce_with(Deferred::ready(0), |acc, x, _| Deferred::ready(acc + x))
//!     .await?;
//! assert_eq!(rows, 6);
//! ```

mod adapter;
mod consume;
mod deferred;
mod error;
mod group;
mod lazy;
pub mod telemetry;

pub use adapter::{IntoSequence, Sequence, SequenceKind};
pub use deferred::{Deferred, defer};
pub use error::{BoxError, Error, Result};
pub use group::Groups;

/// Adapt any supported source into a [`Sequence`].
pub fn from<'a, S>(source: S) -> Result<Sequence<'a, S::Item>>
where
    S: IntoSequence<'a>,
{
    source.into_sequence()
}

/// A sequence with no items.
pub fn empty<'a, T: Send + 'a>() -> Sequence<'a, T> {
    Sequence::empty()
}
