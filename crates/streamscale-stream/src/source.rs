//! Pull interface shared by every stage
//!
//! A stage reads from an upstream [`Source`] and is itself a `Source` for
//! the next stage. The same stage object therefore works nested inside
//! another stage (inline pull chain) or pumped by a thread into a bounded
//! channel whose receiving end is again a `Source`.

use crate::{StreamError, StreamResult};
use crossbeam_channel::Receiver;

/// An ordered, lossless stream of items.
pub trait Source {
    type Item;

    /// Next item, blocking if necessary; `None` once the stream has ended.
    fn read(&mut self) -> StreamResult<Option<Self::Item>>;
}

impl<S: Source + ?Sized> Source for &mut S {
    type Item = S::Item;

    fn read(&mut self) -> StreamResult<Option<S::Item>> {
        (**self).read()
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    type Item = S::Item;

    fn read(&mut self) -> StreamResult<Option<S::Item>> {
        (**self).read()
    }
}

/// A disconnected channel reads as end of stream.
impl<T> Source for Receiver<T> {
    type Item = T;

    fn read(&mut self) -> StreamResult<Option<T>> {
        Ok(self.recv().ok())
    }
}

/// Adapts any iterator into a [`Source`].
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    iter: I,
}

impl<I: Iterator> Source for IterSource<I> {
    type Item = I::Item;

    fn read(&mut self) -> StreamResult<Option<I::Item>> {
        Ok(self.iter.next())
    }
}

/// Wrap an iterable as a [`Source`].
pub fn from_iter<I: IntoIterator>(items: I) -> IterSource<I::IntoIter> {
    IterSource {
        iter: items.into_iter(),
    }
}

/// Read one item that the stage cannot do without.
pub(crate) fn require<S: Source + ?Sized>(
    source: &mut S,
    stage: &'static str,
) -> StreamResult<S::Item> {
    source
        .read()?
        .ok_or(StreamError::UnexpectedEndOfStream { stage })
}

/// Read a source to its end, stopping at the first error.
pub fn drain<S: Source>(source: S) -> StreamResult<Vec<S::Item>> {
    Items::new(source).collect()
}

/// Iterator view of a [`Source`]; stops after the first error.
pub struct Items<S> {
    source: S,
    failed: bool,
}

impl<S> Items<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            failed: false,
        }
    }
}

impl<S: Source> Iterator for Items<S> {
    type Item = StreamResult<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.source.read() {
            Ok(item) => item.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_source_ends_with_none() {
        let mut s = from_iter([1, 2]);
        assert_eq!(s.read().unwrap(), Some(1));
        assert_eq!(s.read().unwrap(), Some(2));
        assert_eq!(s.read().unwrap(), None);
    }

    #[test]
    fn test_require_reports_stage() {
        let mut s = from_iter(Vec::<u8>::new());
        let err = require(&mut s, "unpack").unwrap_err();
        assert!(matches!(
            err,
            StreamError::UnexpectedEndOfStream { stage: "unpack" }
        ));
    }

    #[test]
    fn test_receiver_disconnect_is_end() {
        let (tx, mut rx) = crossbeam_channel::bounded(2);
        tx.send(7u32).unwrap();
        drop(tx);
        assert_eq!(rx.read().unwrap(), Some(7));
        assert_eq!(rx.read().unwrap(), None);
    }

    /// Yields one item, then fails on every later read.
    struct FailsAfterOne {
        reads: u32,
    }

    impl Source for FailsAfterOne {
        type Item = u8;

        fn read(&mut self) -> StreamResult<Option<u8>> {
            self.reads += 1;
            match self.reads {
                1 => Ok(Some(9)),
                _ => Err(StreamError::UnexpectedEndOfStream { stage: "unpack" }),
            }
        }
    }

    #[test]
    fn test_drain_stops_at_first_error() {
        let mut src = FailsAfterOne { reads: 0 };
        let err = drain(&mut src).unwrap_err();
        assert!(matches!(
            err,
            StreamError::UnexpectedEndOfStream { stage: "unpack" }
        ));
        assert_eq!(src.reads, 2);
    }

    #[test]
    fn test_drain_and_items() {
        assert_eq!(drain(from_iter(0..4)).unwrap(), vec![0, 1, 2, 3]);
        let collected: StreamResult<Vec<_>> = Items::new(from_iter(0..3)).collect();
        assert_eq!(collected.unwrap(), vec![0, 1, 2]);
    }
}
