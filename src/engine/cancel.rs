// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Cooperative cancellation for long reloads.
//!
//! The engine only checks a [`CancelToken`] between sub-steps. Deciding
//! that a reload is stale is the caller's job, which [`ReloadGate`] does
//! with a latest-wins generation counter.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token nobody holds a second handle to; it can never fire.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> CoreResult<()> {
        if self.is_cancelled() {
            Err(CoreError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReloadTicket {
    generation: u64,
    pub token: CancelToken,
}

/// Hands out reload tickets for one view. Starting a new reload cancels
/// the previous one, and only the newest ticket may publish its result.
#[derive(Debug, Default)]
pub struct ReloadGate {
    state: Mutex<(u64, Option<CancelToken>)>,
}

impl ReloadGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> ReloadTicket {
        let mut st = self.state.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(prev) = st.1.take() {
            prev.cancel();
        }
        st.0 += 1;
        let token = CancelToken::new();
        st.1 = Some(token.clone());
        ReloadTicket {
            generation: st.0,
            token,
        }
    }

    pub fn is_current(&self, ticket: &ReloadTicket) -> bool {
        let st = self.state.lock().unwrap_or_else(|p| p.into_inner());
        st.0 == ticket.generation && !ticket.token.is_cancelled()
    }

    /// Runs `apply` with `value` only if `ticket` is still the newest
    /// reload. The gate stays locked while `apply` runs, so a `begin()` from
    /// another thread cannot slip in between the check and the publish.
    pub fn commit<T>(&self, ticket: &ReloadTicket, value: T, apply: impl FnOnce(T)) -> bool {
        let st = self.state.lock().unwrap_or_else(|p| p.into_inner());
        if st.0 != ticket.generation || ticket.token.is_cancelled() {
            return false;
        }
        apply(value);
        true
    }
}
