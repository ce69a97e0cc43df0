//! Passive HTTP/2 frame capture, grounded in the teacher's
//! `fingerprinting::extractor::CapturingStream<S>`: wraps `poll_read`,
//! buffers what passes through (bounded by `max_capture`), and derives the
//! Akamai fingerprint inline without altering a single byte seen by the
//! real connection driver underneath.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::sync::watch;
use tracing::debug;

use crate::fingerprint::http2::{akamai, frame};
use crate::fingerprint::http2::Http2Fingerprint;
use crate::telemetry::Metrics;

pub struct Http2CapturingStream<S> {
    inner: S,
    buffer: Vec<u8>,
    max_capture: usize,
    extracted: Arc<AtomicBool>,
    tx: watch::Sender<Option<Http2Fingerprint>>,
    metrics: Option<Arc<Metrics>>,
}

impl<S> Http2CapturingStream<S> {
    pub fn new(
        inner: S,
        max_capture: usize,
        tx: watch::Sender<Option<Http2Fingerprint>>,
        metrics: Option<Arc<Metrics>>,
    ) -> (Self, Arc<AtomicBool>) {
        let extracted = Arc::new(AtomicBool::new(false));
        (
            Http2CapturingStream {
                inner,
                buffer: Vec::with_capacity(max_capture.min(64 * 1024)),
                max_capture,
                extracted: extracted.clone(),
                tx,
                metrics,
            },
            extracted,
        )
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for Http2CapturingStream<S> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let before = buf.filled().len();
        let result = Pin::new(&mut self.inner).poll_read(cx, buf);
        let after = buf.filled().len();

        if after > before && !self.extracted.load(Ordering::Relaxed) {
            let chunk = &buf.filled()[before..after];
            let room = self.max_capture.saturating_sub(self.buffer.len());
            let take = chunk.len().min(room);
            if take > 0 {
                self.buffer.extend_from_slice(&chunk[..take]);
            }

            if let Ok(frames) = frame::intercept(&self.buffer) {
                if frames.header_block.is_some() {
                    let fp = akamai::build_fingerprint(frames);
                    debug!(akamai = %fp.akamai, "HTTP/2 fingerprint captured");
                    let _ = self.tx.send(Some(fp));
                    self.extracted.store(true, Ordering::Relaxed);
                    if let Some(ref m) = self.metrics {
                        m.http2_fingerprints_extracted_total.add(1, &[]);
                    }
                }
            }
        }

        result
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for Http2CapturingStream<S> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        data: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, data)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        if !self.extracted.load(Ordering::Relaxed) {
            if let Some(ref m) = self.metrics {
                m.http2_fingerprint_failures_total.add(1, &[]);
            }
        }
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}
