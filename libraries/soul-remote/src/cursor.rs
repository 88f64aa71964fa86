//! Sequential typed reads over a lazily fetched remote object.

use crate::error::{RemoteError, Result};
use crate::range::RangeRead;
use tracing::debug;

/// Smallest range requested from the reader (128 KiB).
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 128 * 1024;

/// Buffering token reader over a [`RangeRead`].
///
/// Bytes are fetched on demand and appended to an in-memory window that only
/// grows. Every extraction first makes sure the window covers
/// `position + width`, fetching at least `min_chunk_size` bytes per round
/// trip so small fields don't each cost a request.
///
/// Multi-byte integers are big-endian except [`ByteCursor::u32_le`]. FLAC
/// frames its blocks big-endian while the embedded Vorbis comment uses
/// little-endian lengths, so both widths are needed side by side.
pub struct ByteCursor<R> {
    reader: R,
    buffer: Vec<u8>,
    position: usize,
    min_chunk_size: usize,
    fetches: usize,
}

impl<R: RangeRead> ByteCursor<R> {
    /// Create a cursor at offset 0 using the default chunk size.
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_MIN_CHUNK_SIZE)
    }

    /// Create a cursor with a custom minimum fetch size (at least 1 byte).
    pub fn with_chunk_size(reader: R, min_chunk_size: usize) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            position: 0,
            min_chunk_size: min_chunk_size.max(1),
            fetches: 0,
        }
    }

    /// Current absolute read offset.
    pub fn position(&self) -> u64 {
        self.position as u64
    }

    /// Number of bytes fetched so far.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Number of range reads issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    pub fn min_chunk_size(&self) -> usize {
        self.min_chunk_size
    }

    /// Make sure at least `count` unread bytes are buffered.
    pub async fn ensure_available(&mut self, count: usize) -> Result<()> {
        let needed = self.position.saturating_add(count);

        while self.buffer.len() < needed {
            let chunk_size = count.max(self.min_chunk_size);
            let offset = self.buffer.len() as u64;

            let chunk = self.reader.read(chunk_size, offset).await?;
            if chunk.len() != chunk_size {
                return Err(RemoteError::ShortRead {
                    position: offset,
                    requested: chunk_size,
                    received: chunk.len(),
                });
            }

            self.buffer.reserve(chunk.len());
            self.buffer.extend_from_slice(&chunk);
            self.fetches += 1;

            debug!(
                offset,
                chunk_size,
                buffered = self.buffer.len(),
                "Fetched range"
            );
        }

        Ok(())
    }

    /// Advance by `count` bytes without returning them.
    pub async fn skip(&mut self, count: usize) -> Result<()> {
        self.ensure_available(count).await?;
        self.position += count;
        Ok(())
    }

    /// Next `count` bytes verbatim.
    pub async fn bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.ensure_available(count).await?;
        let out = self.buffer[self.position..self.position + count].to_vec();
        self.position += count;
        Ok(out)
    }

    /// Next `count` bytes as text, one character per byte.
    pub async fn text(&mut self, count: usize) -> Result<String> {
        self.ensure_available(count).await?;
        let out = self.buffer[self.position..self.position + count]
            .iter()
            .map(|&b| char::from(b))
            .collect();
        self.position += count;
        Ok(out)
    }

    pub async fn u8(&mut self) -> Result<u8> {
        let [a] = self.take::<1>().await?;
        Ok(a)
    }

    /// Big-endian 16-bit integer.
    pub async fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.take::<2>().await?))
    }

    /// Big-endian 24-bit integer.
    pub async fn u24(&mut self) -> Result<u32> {
        let [a, b, c] = self.take::<3>().await?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    /// Little-endian 32-bit integer.
    pub async fn u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take::<4>().await?))
    }

    /// Big-endian 32-bit integer.
    pub async fn u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take::<4>().await?))
    }

    async fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure_available(N).await?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buffer[self.position..self.position + N]);
        self.position += N;
        Ok(out)
    }

    /// Give back the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::slice_range;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct RecordingReader {
        data: Vec<u8>,
        calls: Mutex<Vec<(usize, u64)>>,
        reads: AtomicUsize,
    }

    impl RecordingReader {
        fn new(data: Vec<u8>) -> Self {
            Self {
                data,
                calls: Mutex::new(Vec::new()),
                reads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RangeRead for RecordingReader {
        async fn read(&self, length: usize, position: u64) -> Result<Vec<u8>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push((length, position));
            slice_range(&self.data, length, position)
        }
    }

    #[tokio::test]
    async fn integer_widths_and_endianness() {
        let data = vec![
            0xAB, // u8
            0x01, 0x02, // u16 BE
            0x01, 0x02, 0x03, // u24 BE
            0x00, 0x01, 0x00, 0x00, // u32 LE = 256
            0x00, 0x00, 0x01, 0x00, // u32 BE = 256
        ];
        let mut cursor = ByteCursor::with_chunk_size(RecordingReader::new(data), 1);

        assert_eq!(cursor.u8().await.unwrap(), 0xAB);
        assert_eq!(cursor.u16().await.unwrap(), 0x0102);
        assert_eq!(cursor.u24().await.unwrap(), 0x010203);
        assert_eq!(cursor.u32_le().await.unwrap(), 256);
        assert_eq!(cursor.u32_be().await.unwrap(), 256);
        assert_eq!(cursor.position(), 14);
    }

    #[tokio::test]
    async fn text_is_one_char_per_byte() {
        let data = vec![b'f', b'L', b'a', b'C', 0xE9];
        let mut cursor = ByteCursor::with_chunk_size(RecordingReader::new(data), 1);

        assert_eq!(cursor.text(4).await.unwrap(), "fLaC");
        let accented = cursor.text(1).await.unwrap();
        assert_eq!(accented, "\u{e9}");
        assert_eq!(accented.chars().count(), 1);
    }

    #[tokio::test]
    async fn fetches_at_least_min_chunk_from_buffer_end() {
        let reader = RecordingReader::new((0..=255u8).collect());
        let mut cursor = ByteCursor::with_chunk_size(reader, 64);

        cursor.u8().await.unwrap();
        cursor.skip(63).await.unwrap();
        assert_eq!(cursor.fetch_count(), 1);

        // Request larger than the chunk size is fetched in one go
        let block = cursor.bytes(100).await.unwrap();
        assert_eq!(block[0], 64);
        assert_eq!(cursor.fetch_count(), 2);

        let reader = cursor.into_inner();
        let calls = reader.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(64, 0), (100, 64)]);
    }

    #[tokio::test]
    async fn skip_still_fetches() {
        let reader = RecordingReader::new(vec![0; 32]);
        let mut cursor = ByteCursor::with_chunk_size(reader, 8);

        cursor.skip(20).await.unwrap();
        assert_eq!(cursor.position(), 20);
        assert!(cursor.buffered_len() >= 20);
        assert!(cursor.fetch_count() >= 1);
    }

    #[tokio::test]
    async fn short_chunk_is_an_error() {
        let reader = RecordingReader::new(vec![b'f', b'L', b'a']);
        let mut cursor = ByteCursor::with_chunk_size(reader, 1);

        let err = cursor.text(4).await.unwrap_err();
        match err {
            RemoteError::ShortRead {
                position,
                requested,
                received,
            } => {
                assert_eq!(position, 0);
                assert_eq!(requested, 4);
                assert_eq!(received, 3);
            }
            other => panic!("Expected ShortRead, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn default_chunk_over_small_object_fails() {
        let reader = RecordingReader::new(vec![0; 16]);
        let mut cursor = ByteCursor::new(reader);

        assert_eq!(cursor.min_chunk_size(), DEFAULT_MIN_CHUNK_SIZE);
        assert!(cursor.u8().await.unwrap_err().is_short_read());
    }

    #[tokio::test]
    async fn zero_chunk_size_is_clamped() {
        let reader = RecordingReader::new(vec![7; 4]);
        let mut cursor = ByteCursor::with_chunk_size(reader, 0);

        assert_eq!(cursor.min_chunk_size(), 1);
        assert_eq!(cursor.u8().await.unwrap(), 7);
    }
}
