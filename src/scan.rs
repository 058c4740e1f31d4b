//! Helpers for scanning a stream of captured frames.
//!
//! Decoding itself is synchronous and shares no state, so callers may run
//! it on any thread. [`FrameGate`] keeps only the freshest result when
//! frames are decoded concurrently; [`decode_batch`] decodes independent
//! frames in parallel.

use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::decoder::config::DecodeConfig;
use crate::error::{Error, Result};
use crate::pipeline::{Decoded, ImageView, decode_image};

/// Sequence number handed out for one captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameTicket(u64);

impl FrameTicket {
    /// Capture order, starting at 1
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Latest-wins gate for concurrently decoded frames.
///
/// Each captured frame takes a ticket. A result is accepted only when no
/// newer frame's result has been accepted already, so stale decodes that
/// finish late are dropped instead of queued.
#[derive(Debug, Default)]
pub struct FrameGate {
    issued: AtomicU64,
    accepted: AtomicU64,
}

impl FrameGate {
    /// Empty gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a newly captured frame
    pub fn begin(&self) -> FrameTicket {
        FrameTicket(self.issued.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// True while no newer frame has been captured. Workers may check this
    /// before starting an expensive decode.
    pub fn is_current(&self, ticket: FrameTicket) -> bool {
        self.issued.load(Ordering::Acquire) == ticket.0
    }

    /// True when a result for this ticket would still be accepted
    pub fn is_fresh(&self, ticket: FrameTicket) -> bool {
        self.accepted.load(Ordering::Acquire) < ticket.0
    }

    /// Offer a finished result. Returns it back when accepted, `None` when a
    /// newer frame already delivered.
    pub fn offer<T>(&self, ticket: FrameTicket, result: T) -> Option<T> {
        let mut seen = self.accepted.load(Ordering::Acquire);
        loop {
            if seen >= ticket.0 {
                log::trace!("dropping stale frame {} (have {})", ticket.0, seen);
                return None;
            }
            match self
                .accepted
                .compare_exchange(seen, ticket.0, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Some(result),
                Err(actual) => seen = actual,
            }
        }
    }

    /// Sequence of the last accepted frame
    pub fn latest_accepted(&self) -> Option<u64> {
        match self.accepted.load(Ordering::Acquire) {
            0 => None,
            n => Some(n),
        }
    }
}

/// Decode one frame, mapping "no symbol" to `Ok(None)`
pub fn decode_frame(image: &ImageView<'_>, config: &DecodeConfig) -> Result<Option<Decoded>> {
    match decode_image(image, config) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(Error::SymbolNotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Decode independent frames in parallel, results in input order
pub fn decode_batch(images: &[ImageView<'_>], config: &DecodeConfig) -> Vec<Result<Option<Decoded>>> {
    images.par_iter().map(|image| decode_frame(image, config)).collect()
}
