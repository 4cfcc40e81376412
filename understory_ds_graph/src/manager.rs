// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract between the scheduler and the owner of the actual storage.

/// Owner of data structure payloads, driven by the scheduler.
///
/// The scheduler never touches payloads. It only tells the manager when to
/// build, release, pin or shrink a kind. Every call is synchronous and must
/// not re-enter the scheduler.
///
/// # Protection
///
/// A protected kind has more than one outstanding consumer. While protected,
/// a consumer must not mutate or move the kind's storage; once unprotected,
/// its single remaining consumer may reuse the storage in place.
///
/// # Example
///
/// A manager that only counts constructions:
///
/// ```
/// use core::convert::Infallible;
/// use understory_ds_graph::Manager;
///
/// #[derive(Default)]
/// struct Counter {
///     built: usize,
/// }
///
/// impl Manager<char> for Counter {
///     type Error = Infallible;
///
///     fn ensure_provider(&mut self, _kind: char) -> Result<(), Infallible> {
///         Ok(())
///     }
///     fn construct(&mut self, _kind: char, _compressed: bool) -> Result<(), Infallible> {
///         self.built += 1;
///         Ok(())
///     }
///     fn discard(&mut self, _kind: char, _intermediate: bool) {}
///     fn protect(&mut self, _kind: char) {}
///     fn unprotect(&mut self, _kind: char) {}
///     fn compress(&mut self, _kind: char) -> Result<(), Infallible> {
///         Ok(())
///     }
/// }
/// ```
pub trait Manager<K> {
    /// Error returned by fallible operations.
    type Error: core::error::Error + 'static;

    /// Makes sure a provider instance for `kind` exists.
    ///
    /// Called during the request phase, possibly several times per kind.
    fn ensure_provider(&mut self, kind: K) -> Result<(), Self::Error>;

    /// Materializes `kind`.
    ///
    /// All requirements of `kind` are live when this is called. With
    /// `compressed` set, the result must be produced at its minimal width.
    fn construct(&mut self, kind: K, compressed: bool) -> Result<(), Self::Error>;

    /// Releases the storage of `kind`.
    ///
    /// `intermediate` is set when `kind` was not requested by the client.
    fn discard(&mut self, kind: K, intermediate: bool);

    /// Forbids in-place mutation of `kind`.
    fn protect(&mut self, kind: K);

    /// Allows the single remaining consumer of `kind` to reuse it in place.
    fn unprotect(&mut self, kind: K);

    /// Shrinks `kind` to its minimal representation without changing its value.
    fn compress(&mut self, kind: K) -> Result<(), Self::Error>;
}

impl<K, M> Manager<K> for &mut M
where
    M: Manager<K> + ?Sized,
{
    type Error = M::Error;

    fn ensure_provider(&mut self, kind: K) -> Result<(), Self::Error> {
        (**self).ensure_provider(kind)
    }

    fn construct(&mut self, kind: K, compressed: bool) -> Result<(), Self::Error> {
        (**self).construct(kind, compressed)
    }

    fn discard(&mut self, kind: K, intermediate: bool) {
        (**self).discard(kind, intermediate);
    }

    fn protect(&mut self, kind: K) {
        (**self).protect(kind);
    }

    fn unprotect(&mut self, kind: K) {
        (**self).unprotect(kind);
    }

    fn compress(&mut self, kind: K) -> Result<(), Self::Error> {
        (**self).compress(kind)
    }
}
