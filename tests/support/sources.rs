//! Test sources: the same items behind each supported iteration protocol

#![allow(dead_code)]

use asynq::Sequence;
use std::sync::{Arc, Mutex};

/// A plain collection
pub fn collection<T: Send + 'static>(items: Vec<T>) -> Sequence<'static, T> {
    asynq::from(items).expect("collections are iterable")
}

/// A sync iterator that produces items on demand
pub fn sync_generator<T: Send + 'static>(items: Vec<T>) -> Sequence<'static, T> {
    let mut items = items.into_iter();
    Sequence::from_iterable(std::iter::from_fn(move || items.next()))
}

/// An async stream that yields to the scheduler before every item
pub fn async_generator<T: Send + 'static>(items: Vec<T>) -> Sequence<'static, T> {
    Sequence::from_stream(async_stream::stream! {
        for item in items {
            tokio::task::yield_now().await;
            yield item;
        }
    })
}

/// All three protocols, labelled for assertion messages
pub fn every_protocol<T: Clone + Send + 'static>(
    items: Vec<T>,
) -> Vec<(&'static str, Sequence<'static, T>)> {
    vec![
        ("collection", collection(items.clone())),
        ("sync generator", sync_generator(items.clone())),
        ("async generator", async_generator(items)),
    ]
}

/// A sync source that panics when pulled past its first item
pub fn panics_after_first<T: Send + 'static>(first: T) -> Sequence<'static, T> {
    Sequence::from_iterable(
        std::iter::once(first).chain(std::iter::from_fn(|| panic!("pulled past the first item"))),
    )
}

/// An async source whose second pull fails
pub fn fails_after_first<T: Send + 'static>(first: T) -> Sequence<'static, T> {
    Sequence::from_try_stream(async_stream::stream! {
        yield Ok(first);
        yield Err("pulled past the first item");
    })
}

/// A source that records every item it hands out
pub fn recorded<T: Clone + Send + 'static>(
    items: Vec<T>,
    log: Arc<Mutex<Vec<String>>>,
) -> Sequence<'static, T>
where
    T: std::fmt::Debug,
{
    let mut items = items.into_iter();
    Sequence::from_iterable(std::iter::from_fn(move || {
        let item = items.next()?;
        log.lock().unwrap().push(format!("pull {item:?}"));
        Some(item)
    }))
}
