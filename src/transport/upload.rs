//! Upload stream error capture.
//!
//! While the pipeline streams upload content, a local read failure and a
//! network failure both come back as the same opaque request error. The
//! stream is therefore wrapped so that any `io::Error` raised by the local
//! reader is captured into a slot before being surfaced to the HTTP body;
//! after the request returns, the upload path checks the slot and re-raises
//! the original local error instead of the generic transport one.

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;

type Slot = Arc<Mutex<Option<io::Error>>>;

/// Handle to the error captured by a [`MarkedStream`], held by the call site
/// that knows how to re-raise it.
#[derive(Debug, Clone)]
pub(crate) struct CapturedReadError {
    slot: Slot,
}

impl CapturedReadError {
    /// Take the captured local read error, if the stream raised one.
    pub(crate) fn take(&self) -> Option<io::Error> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// A byte stream that records the first read error it encounters.
///
/// The error handed onward to the HTTP client is a copy carrying the same
/// kind and message; the original is parked in the slot for the caller.
#[derive(Debug)]
pub(crate) struct MarkedStream<S> {
    inner: S,
    slot: Slot,
}

impl<S> MarkedStream<S> {
    pub(crate) fn new(inner: S) -> (Self, CapturedReadError) {
        let slot: Slot = Arc::new(Mutex::new(None));
        let captured = CapturedReadError { slot: slot.clone() };
        (MarkedStream { inner, slot }, captured)
    }
}

impl<S> Stream for MarkedStream<S>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
{
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Err(original))) => {
                let surfaced = io::Error::new(original.kind(), original.to_string());
                *this.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(original);
                Poll::Ready(Some(Err(surfaced)))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_passes_data_through_untouched() {
        let source = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"world")),
        ]);
        let (stream, captured) = MarkedStream::new(source);
        let chunks: Vec<_> = stream.collect().await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.is_ok()));
        assert!(captured.take().is_none());
    }

    #[tokio::test]
    async fn test_captures_read_error() {
        let source = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "file vanished")),
        ]);
        let (stream, captured) = MarkedStream::new(source);
        let chunks: Vec<_> = stream.collect().await;
        assert!(chunks[0].is_ok());
        assert!(chunks[1].is_err());

        let original = captured.take().expect("error should be captured");
        assert_eq!(original.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(original.to_string(), "file vanished");
        // Only taken once.
        assert!(captured.take().is_none());
    }
}
