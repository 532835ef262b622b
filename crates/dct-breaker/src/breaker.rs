//! Circuit breaker state machine.
//!
//! Grounded directly on this workspace's existing load-balancer circuit
//! breaker: a `Mutex`-guarded state enum plus atomic counters, callers
//! pass in the current time rather than the breaker reading the clock
//! itself. This version adds `halfOpenMaxAttempts` and synchronous
//! state-change listeners, neither of which the original needed.

use crate::error::CircuitError;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub reset_timeout_ms: u64,
    pub half_open_max_attempts: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout_ms: 30_000,
            half_open_max_attempts: 3,
        }
    }
}

type Listener = Box<dyn Fn(CircuitState, CircuitState) + Send + Sync>;

pub struct CircuitBreaker {
    label: String,
    config: CircuitBreakerConfig,
    state: Mutex<CircuitState>,
    failures: AtomicU32,
    half_open_successes: AtomicU32,
    half_open_attempts: AtomicU32,
    last_failure_ms: AtomicU64,
    listeners: RwLock<Vec<Listener>>,
}

impl CircuitBreaker {
    pub fn new(label: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            label: label.into(),
            config,
            state: Mutex::new(CircuitState::Closed),
            failures: AtomicU32::new(0),
            half_open_successes: AtomicU32::new(0),
            half_open_attempts: AtomicU32::new(0),
            last_failure_ms: AtomicU64::new(0),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn state(&self) -> CircuitState {
        *self.state.lock()
    }

    pub fn on_state_change<F>(&self, listener: F)
    where
        F: Fn(CircuitState, CircuitState) + Send + Sync + 'static,
    {
        self.listeners.write().push(Box::new(listener));
    }

    fn transition(&self, guard: &mut CircuitState, to: CircuitState) {
        let from = *guard;
        if from == to {
            return;
        }
        *guard = to;
        tracing::info!(breaker = %self.label, ?from, ?to, "circuit breaker transition");
        for listener in self.listeners.read().iter() {
            listener(from, to);
        }
    }

    /// Lazily moves OPEN -> HALF_OPEN once the reset timeout has
    /// elapsed, and reports whether a call is currently allowed.
    pub fn allow(&self, now_ms: u64) -> bool {
        let mut guard = self.state.lock();
        match *guard {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => {
                self.half_open_attempts.load(Ordering::SeqCst) < self.config.half_open_max_attempts
            }
            CircuitState::Open => {
                let last = self.last_failure_ms.load(Ordering::SeqCst);
                if now_ms.saturating_sub(last) >= self.config.reset_timeout_ms {
                    self.half_open_attempts.store(0, Ordering::SeqCst);
                    self.half_open_successes.store(0, Ordering::SeqCst);
                    self.transition(&mut guard, CircuitState::HalfOpen);
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut guard = self.state.lock();
        match *guard {
            CircuitState::Closed => {
                self.failures.store(0, Ordering::SeqCst);
            }
            CircuitState::HalfOpen => {
                let attempts = self.half_open_attempts.fetch_add(1, Ordering::SeqCst) + 1;
                let successes = self.half_open_successes.fetch_add(1, Ordering::SeqCst) + 1;
                if successes >= 1 && attempts == 1 {
                    // first successful attempt in HALF_OPEN closes immediately
                    self.failures.store(0, Ordering::SeqCst);
                    self.half_open_attempts.store(0, Ordering::SeqCst);
                    self.half_open_successes.store(0, Ordering::SeqCst);
                    self.transition(&mut guard, CircuitState::Closed);
                } else if attempts >= self.config.half_open_max_attempts {
                    if successes >= 1 {
                        self.failures.store(0, Ordering::SeqCst);
                        self.transition(&mut guard, CircuitState::Closed);
                    } else {
                        self.transition(&mut guard, CircuitState::Open);
                    }
                    self.half_open_attempts.store(0, Ordering::SeqCst);
                    self.half_open_successes.store(0, Ordering::SeqCst);
                }
            }
            CircuitState::Open => {}
        }
    }

    pub fn record_failure(&self, now_ms: u64) {
        let mut guard = self.state.lock();
        self.last_failure_ms.store(now_ms, Ordering::SeqCst);
        match *guard {
            CircuitState::Closed => {
                let failures = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
                if failures >= self.config.failure_threshold {
                    self.transition(&mut guard, CircuitState::Open);
                }
            }
            CircuitState::HalfOpen => {
                self.half_open_attempts.store(0, Ordering::SeqCst);
                self.half_open_successes.store(0, Ordering::SeqCst);
                self.transition(&mut guard, CircuitState::Open);
            }
            CircuitState::Open => {}
        }
    }

    pub fn force_reset(&self) {
        let mut guard = self.state.lock();
        self.failures.store(0, Ordering::SeqCst);
        self.half_open_attempts.store(0, Ordering::SeqCst);
        self.half_open_successes.store(0, Ordering::SeqCst);
        self.transition(&mut guard, CircuitState::Closed);
    }

    /// Run `f` if the breaker allows it, recording the outcome.
    pub fn execute<T, E: std::fmt::Display + std::fmt::Debug>(
        &self,
        now_ms: u64,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, CircuitError<E>> {
        if !self.allow(now_ms) {
            return Err(CircuitError::CircuitOpen);
        }
        match f() {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                self.record_failure(now_ms);
                Err(CircuitError::Inner(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_threshold: 3,
                reset_timeout_ms: 1000,
                half_open_max_attempts: 2,
            },
        )
    }

    #[test]
    fn opens_after_threshold_consecutive_failures() {
        let b = breaker();
        b.record_failure(0);
        b.record_failure(0);
        assert_eq!(b.state(), CircuitState::Closed);
        b.record_failure(0);
        assert_eq!(b.state(), CircuitState::Open);
    }

    #[test]
    fn stays_open_before_reset_timeout_elapses() {
        let b = breaker();
        for _ in 0..3 {
            b.record_failure(100);
        }
        assert!(!b.allow(500));
        assert_eq!(b.state(), CircuitState::Open);
    }

    #[test]
    fn moves_to_half_open_after_reset_timeout() {
        let b = breaker();
        for _ in 0..3 {
            b.record_failure(0);
        }
        assert!(b.allow(1000));
        assert_eq!(b.state(), CircuitState::HalfOpen);
    }

    #[test]
    fn first_success_in_half_open_closes_the_breaker() {
        let b = breaker();
        for _ in 0..3 {
            b.record_failure(0);
        }
        b.allow(1000);
        b.record_success();
        assert_eq!(b.state(), CircuitState::Closed);
    }

    #[test]
    fn any_failure_in_half_open_reopens() {
        let b = breaker();
        for _ in 0..3 {
            b.record_failure(0);
        }
        b.allow(1000);
        b.record_failure(1000);
        assert_eq!(b.state(), CircuitState::Open);
    }

    #[test]
    fn listeners_fire_synchronously_on_real_transitions_only() {
        let b = breaker();
        let count = std::sync::Arc::new(AtomicU32::new(0));
        let c = count.clone();
        b.on_state_change(move |_from, _to| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        b.record_failure(0);
        b.record_failure(0);
        assert_eq!(count.load(Ordering::SeqCst), 0, "no transition yet");
        b.record_failure(0);
        assert_eq!(count.load(Ordering::SeqCst), 1, "CLOSED -> OPEN fired once");
    }

    #[test]
    fn force_reset_always_returns_to_closed() {
        let b = breaker();
        for _ in 0..3 {
            b.record_failure(0);
        }
        assert_eq!(b.state(), CircuitState::Open);
        b.force_reset();
        assert_eq!(b.state(), CircuitState::Closed);
    }

    #[test]
    fn execute_refuses_when_open_with_a_distinguishable_error() {
        let b = breaker();
        for _ in 0..3 {
            b.record_failure(0);
        }
        let result: Result<(), CircuitError<&str>> = b.execute(100, || Ok(()));
        assert!(matches!(result, Err(CircuitError::CircuitOpen)));
    }

    #[test]
    fn execute_propagates_inner_error_and_records_failure() {
        let b = breaker();
        let result: Result<(), CircuitError<&str>> = b.execute(0, || Err("boom"));
        assert!(matches!(result, Err(CircuitError::Inner("boom"))));
    }
}
