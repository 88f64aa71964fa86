//! The range-read seam between byte consumers and object stores.

use crate::error::{RemoteError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Reads byte ranges of a single object.
///
/// Implementations return exactly `length` bytes starting at `position`, or
/// fail. An object shorter than `position + length` yields
/// [`RemoteError::ShortRead`].
#[async_trait]
pub trait RangeRead: Send + Sync {
    async fn read(&self, length: usize, position: u64) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: RangeRead + ?Sized> RangeRead for Arc<T> {
    async fn read(&self, length: usize, position: u64) -> Result<Vec<u8>> {
        (**self).read(length, position).await
    }
}

#[async_trait]
impl<T: RangeRead + ?Sized> RangeRead for Box<T> {
    async fn read(&self, length: usize, position: u64) -> Result<Vec<u8>> {
        (**self).read(length, position).await
    }
}

/// Adapter turning an async closure into a [`RangeRead`].
pub struct FnRangeRead<F>(F);

/// Wrap `read(length, position)` as a [`RangeRead`].
///
/// ```
/// use soul_remote::{range_fn, RangeRead};
///
/// # async fn example() -> soul_remote::Result<()> {
/// let data = std::sync::Arc::new(b"fLaC".to_vec());
/// let reader = range_fn(move |length, position| {
///     let data = data.clone();
///     async move { soul_remote::slice_range(&data, length, position) }
/// });
/// assert_eq!(reader.read(2, 2).await?, b"aC");
/// # Ok(())
/// # }
/// ```
pub fn range_fn<F, Fut>(read: F) -> FnRangeRead<F>
where
    F: Fn(usize, u64) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
{
    FnRangeRead(read)
}

#[async_trait]
impl<F, Fut> RangeRead for FnRangeRead<F>
where
    F: Fn(usize, u64) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
{
    async fn read(&self, length: usize, position: u64) -> Result<Vec<u8>> {
        (self.0)(length, position).await
    }
}

/// Copy `length` bytes at `position` out of an in-memory object.
pub fn slice_range(data: &[u8], length: usize, position: u64) -> Result<Vec<u8>> {
    let start = usize::try_from(position).unwrap_or(usize::MAX).min(data.len());
    let end = start.saturating_add(length).min(data.len());

    if end - start < length {
        return Err(RemoteError::ShortRead {
            position,
            requested: length,
            received: end - start,
        });
    }

    Ok(data[start..end].to_vec())
}
