// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transient notice stack (connect/disconnect, config problems).
//!
//! Notices are keyed by `(kind, title)`: pushing a notice whose key is already
//! live refreshes it in place instead of stacking a duplicate, so a flapping
//! connection yields one entry, not dozens.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    /// Informational.
    Info,
    /// Needs attention.
    Warn,
    /// Something failed.
    Error,
}

/// Identifier handed back by [`ToastQueue::push`].
pub type ToastId = u64;

#[derive(Debug, Clone)]
struct Toast {
    id: ToastId,
    kind: ToastKind,
    title: String,
    body: Option<String>,
    created: Instant,
    ttl: Duration,
}

impl Toast {
    fn alive(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) < self.ttl
    }
}

/// Render-ready view of a live notice.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastView {
    /// Identifier.
    pub id: ToastId,
    /// Severity.
    pub kind: ToastKind,
    /// Headline.
    pub title: String,
    /// Optional detail line.
    pub body: Option<String>,
    /// Remaining lifetime, 1.0 when fresh down to 0.0 at expiry.
    pub remaining: f32,
}

/// Bounded notice queue with per-entry TTL.
#[derive(Debug)]
pub struct ToastQueue {
    entries: VecDeque<Toast>,
    capacity: usize,
    next_id: ToastId,
}

impl ToastQueue {
    /// Queue holding at most `capacity` notices (oldest evicted first).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    /// Add or refresh a notice.
    pub fn push(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        body: Option<String>,
        ttl: Duration,
        now: Instant,
    ) -> ToastId {
        let title = title.into();
        if let Some(live) = self
            .entries
            .iter_mut()
            .find(|t| t.kind == kind && t.title == title && t.alive(now))
        {
            live.body = body;
            live.created = now;
            live.ttl = ttl;
            return live.id;
        }

        let id = self.next_id;
        self.next_id += 1;
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Toast {
            id,
            kind,
            title,
            body,
            created: now,
            ttl,
        });
        id
    }

    /// Remove a notice early.
    pub fn dismiss(&mut self, id: ToastId) {
        self.entries.retain(|t| t.id != id);
    }

    /// Drop expired notices; call once per frame.
    pub fn prune(&mut self, now: Instant) {
        self.entries.retain(|t| t.alive(now));
    }

    /// Live notices, oldest first.
    pub fn visible(&self, now: Instant) -> Vec<ToastView> {
        self.entries
            .iter()
            .filter(|t| t.alive(now))
            .map(|t| {
                let age = now.saturating_duration_since(t.created).as_secs_f32();
                ToastView {
                    id: t.id,
                    kind: t.kind,
                    title: t.title.clone(),
                    body: t.body.clone(),
                    remaining: (1.0 - age / t.ttl.as_secs_f32()).clamp(0.0, 1.0),
                }
            })
            .collect()
    }

    /// Number of stored notices (live or not yet pruned).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
