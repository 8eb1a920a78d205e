//! Grouping
//!
//! `group` is not a streaming operator: it drains its whole source into a
//! [`Groups`] accumulator first, then hands the groups out lazily as
//! `(key, values)` pairs in first-occurrence order of the keys.

use std::future::{IntoFuture, ready};
use std::hash::Hash;

use indexmap::IndexMap;
use indexmap::map::IntoIter;
use serde::Serialize;

use crate::adapter::{IntoSequence, Sequence};
use crate::error::Result;

/// Groups keyed by first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Groups<K: Hash + Eq, V> {
    entries: IndexMap<K, Vec<V>>,
}

impl<K: Hash + Eq, V> Groups<K, V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Append `value` to the group for `key`, creating the group at the end
    /// if the key has not been seen before.
    pub fn push(&mut self, key: K, value: V) {
        self.entries.entry(key).or_default().push(value);
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&[V]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}

impl<K: Hash + Eq, V> Default for Groups<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> IntoIterator for Groups<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = IntoIter<K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K, V> IntoSequence<'a> for Groups<K, V>
where
    K: Hash + Eq + Send + 'a,
    V: Send + 'a,
{
    type Item = (K, Vec<V>);

    fn into_sequence(self) -> Result<Sequence<'a, (K, Vec<V>)>> {
        Ok(Sequence::from_iterable(self))
    }
}

impl<'a, T: Send + 'a> Sequence<'a, T> {
    /// Drain the sequence into [`Groups`], computing `key_selector(&item)`
    /// then `value_selector(item)` for every item.
    pub async fn collect_groups<K, V, Fk, FutK, Fv, FutV>(
        mut self,
        mut key_selector: Fk,
        mut value_selector: Fv,
    ) -> Result<Groups<K, V>>
    where
        K: Hash + Eq,
        Fk: FnMut(&T) -> FutK,
        FutK: IntoFuture<Output = Result<K>>,
        Fv: FnMut(T) -> FutV,
        FutV: IntoFuture<Output = Result<V>>,
    {
        let mut groups = Groups::new();
        let mut items = 0usize;
        while let Some(item) = self.next().await? {
            let key = key_selector(&item).await?;
            let value = value_selector(item).await?;
            groups.push(key, value);
            items += 1;
        }
        tracing::debug!(groups = groups.len(), items, "grouped sequence");
        Ok(groups)
    }

    /// Group items by `key_selector(&item)`.
    ///
    /// The source is drained before the returned sequence yields anything.
    pub async fn group<K, Fk, FutK>(self, key_selector: Fk) -> Result<Sequence<'a, (K, Vec<T>)>>
    where
        K: Hash + Eq + Send + 'a,
        Fk: FnMut(&T) -> FutK,
        FutK: IntoFuture<Output = Result<K>>,
    {
        self.group_with(key_selector, |item| ready(Ok(item))).await
    }

    /// Group `value_selector(item)` by `key_selector(&item)`.
    pub async fn group_with<K, V, Fk, FutK, Fv, FutV>(
        self,
        key_selector: Fk,
        value_selector: Fv,
    ) -> Result<Sequence<'a, (K, Vec<V>)>>
    where
        K: Hash + Eq + Send + 'a,
        V: Send + 'a,
        Fk: FnMut(&T) -> FutK,
        FutK: IntoFuture<Output = Result<K>>,
        Fv: FnMut(T) -> FutV,
        FutV: IntoFuture<Output = Result<V>>,
    {
        self.collect_groups(key_selector, value_selector)
            .await?
            .into_sequence()
    }
}
