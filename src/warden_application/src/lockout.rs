use std::sync::Arc;

use dashmap::DashMap;
use warden_core::{
    Clock, IpBlockEntry, LoginAttemptRecord, SecurityConfig, SecurityEvent, SecurityEventSink,
    chrono_span,
};

/// Decision returned from [`LockoutTracker::record_failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureDecision {
    pub locked: bool,
    pub attempts_remaining: u32,
}

/// Per-identifier failed-attempt counting with time-boxed lockout, plus
/// operator-reversible hard blocks layered above it. Owns both tables;
/// absence of a record is equivalent to zero failures, and lookups never
/// fail.
pub struct LockoutTracker {
    attempts: DashMap<String, LoginAttemptRecord>,
    blocks: DashMap<String, IpBlockEntry>,
    config: Arc<SecurityConfig>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn SecurityEventSink>,
}

impl LockoutTracker {
    pub fn new(
        config: Arc<SecurityConfig>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn SecurityEventSink>,
    ) -> Self {
        Self {
            attempts: DashMap::new(),
            blocks: DashMap::new(),
            config,
            clock,
            events,
        }
    }

    #[tracing::instrument(name = "LockoutTracker::record_failure", skip(self))]
    pub fn record_failure(&self, identifier: &str) -> FailureDecision {
        let now = self.clock.now();
        let max = self.config.max_login_attempts;
        let mut escalate = false;
        let decision = {
            let mut entry = self
                .attempts
                .entry(identifier.to_string())
                .or_insert_with(|| LoginAttemptRecord::new(identifier, now));
            let record = entry.value_mut();

            // A stale lock must not keep counting against the fresh window.
            if record.locked_until.is_some_and(|until| now > until) {
                record.failure_count = 0;
                record.locked_until = None;
            }

            record.failure_count += 1;
            record.last_attempt_at = now;

            let locked = record.failure_count >= max;
            if locked && record.locked_until.is_none() {
                record.locked_until = Some(now + chrono_span(self.config.lockout_duration));
                record.lockout_cycles += 1;
                escalate = record.lockout_cycles >= self.config.hard_block_after_lockouts;
                tracing::warn!(
                    identifier,
                    cycles = record.lockout_cycles,
                    "identifier locked out"
                );
                self.events.emit(SecurityEvent::AuthLocked {
                    identifier: identifier.to_string(),
                    reason: "max-attempts".to_string(),
                    timestamp: now,
                });
            }

            FailureDecision {
                locked,
                attempts_remaining: max.saturating_sub(record.failure_count),
            }
        };

        if escalate {
            self.block(identifier, "repeated lockouts");
        }
        decision
    }

    /// A success wipes the record, lockout cycles included.
    pub fn record_success(&self, identifier: &str) {
        self.attempts.remove(identifier);
    }

    /// Expired locks are reset before evaluation, so one stale record cannot
    /// keep blocking a retrying client past its lockout window.
    pub fn is_locked(&self, identifier: &str) -> bool {
        let now = self.clock.now();
        let Some(mut record) = self.attempts.get_mut(identifier) else {
            return false;
        };
        match record.locked_until {
            Some(until) if now > until => {
                record.failure_count = 0;
                record.locked_until = None;
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// OTP-path cooldown: a time-boxed lock that does not count toward
    /// hard-block escalation.
    pub fn impose_cooldown(&self, identifier: &str, duration: std::time::Duration) {
        let now = self.clock.now();
        let mut entry = self
            .attempts
            .entry(identifier.to_string())
            .or_insert_with(|| LoginAttemptRecord::new(identifier, now));
        entry.locked_until = Some(now + chrono_span(duration));
        entry.last_attempt_at = now;
        self.events.emit(SecurityEvent::AuthLocked {
            identifier: identifier.to_string(),
            reason: "otp-cooldown".to_string(),
            timestamp: now,
        });
    }

    pub fn block(&self, identifier: &str, reason: &str) {
        let now = self.clock.now();
        tracing::warn!(identifier, reason, "identifier hard-blocked");
        self.blocks.insert(
            identifier.to_string(),
            IpBlockEntry {
                ip: identifier.to_string(),
                reason: reason.to_string(),
                blocked_at: now,
            },
        );
    }

    /// Returns whether a block entry existed.
    pub fn unblock(&self, identifier: &str) -> bool {
        self.blocks.remove(identifier).is_some()
    }

    pub fn is_blocked(&self, identifier: &str) -> bool {
        self.blocks.contains_key(identifier)
    }

    /// Lockouts currently in force; expired ones do not count.
    pub fn active_lockouts(&self) -> usize {
        let now = self.clock.now();
        self.attempts
            .iter()
            .filter(|record| record.locked_until.is_some_and(|until| now <= until))
            .count()
    }

    pub fn blocked_count(&self) -> usize {
        self.blocks.len()
    }
}
