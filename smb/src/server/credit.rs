//! Per-session credit ledger and the server-wide credit grant algorithm.
//!
//! Credits are SMB2's flow-control currency: one credit funds one
//! minimal-sized outstanding request. Every request declares a
//! `credit_charge` (consumption) and a `credit_request` (desired grant);
//! the manager tracks consumption on request start and computes a grant
//! on response.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreditStrategy {
    Fixed,
    Echo,
    #[default]
    Adaptive,
}

/// A single session's flow-control state.
#[derive(Debug, Default)]
pub struct CreditLedger {
    granted: AtomicU32,
    consumed: AtomicU32,
    outstanding_requests: AtomicU32,
}

impl CreditLedger {
    pub fn new(initial_grant: u32) -> Self {
        Self {
            granted: AtomicU32::new(initial_grant),
            consumed: AtomicU32::new(0),
            outstanding_requests: AtomicU32::new(0),
        }
    }

    pub fn granted(&self) -> u32 {
        self.granted.load(Ordering::Acquire)
    }

    pub fn outstanding(&self) -> i64 {
        self.granted.load(Ordering::Acquire) as i64 - self.consumed.load(Ordering::Acquire) as i64
    }

    pub fn outstanding_requests(&self) -> u32 {
        self.outstanding_requests.load(Ordering::Acquire)
    }

    /// Records the arrival of a request: consumes `credit_charge` credits
    /// and marks one more request outstanding on this session.
    pub fn begin_request(&self, credit_charge: u16) {
        self.consumed.fetch_add(credit_charge.max(1) as u32, Ordering::AcqRel);
        self.outstanding_requests.fetch_add(1, Ordering::AcqRel);
    }

    /// Records a grant computed for the response to a request that has
    /// already called [`begin_request`](Self::begin_request); credits
    /// cannot be returned twice for the same request.
    pub fn complete_request(&self, grant: u16) {
        self.granted.fetch_add(grant as u32, Ordering::AcqRel);
        self.outstanding_requests.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Server-wide counters consulted by the adaptive strategy's load factor.
#[derive(Debug, Default)]
pub struct ServerLedger {
    active_requests: AtomicU32,
    total_grants: AtomicU64,
    total_operations: AtomicU64,
}

impl ServerLedger {
    pub fn active_requests(&self) -> u32 {
        self.active_requests.load(Ordering::Acquire)
    }

    pub fn request_started(&self) {
        self.active_requests.fetch_add(1, Ordering::AcqRel);
        self.total_operations.fetch_add(1, Ordering::AcqRel);
    }

    pub fn request_finished(&self, grant: u16) {
        self.active_requests.fetch_sub(1, Ordering::AcqRel);
        self.total_grants.fetch_add(grant as u64, Ordering::AcqRel);
    }

    pub fn total_grants(&self) -> u64 {
        self.total_grants.load(Ordering::Acquire)
    }

    pub fn total_operations(&self) -> u64 {
        self.total_operations.load(Ordering::Acquire)
    }
}

/// Parameters the three strategies clamp and scale against; mirrors the
/// tunable subset of [`crate::server::config::LiveSettings`].
#[derive(Debug, Clone, Copy)]
pub struct CreditPolicy {
    pub strategy: CreditStrategy,
    pub min_grant: u16,
    pub max_grant: u16,
    pub initial_grant: u16,
    pub max_session_credits: u16,
    pub load_high: u32,
    pub load_low: u32,
    pub aggressive_threshold: u32,
}

/// Computes the number of credits to grant in response to a request,
/// given the session is known to still exist. Callers whose session has
/// already been deleted should skip this and grant 1 credit directly
/// (the "session deleted" guarantee lives at the call site, not here,
/// since this function has no way to represent "no session").
pub fn grant_credits(
    policy: &CreditPolicy,
    ledger: &CreditLedger,
    server: &ServerLedger,
    credit_request: u16,
) -> u16 {
    match policy.strategy {
        CreditStrategy::Fixed => policy.initial_grant,
        CreditStrategy::Echo => {
            if credit_request == 0 {
                policy.initial_grant
            } else {
                credit_request.clamp(policy.min_grant, policy.max_grant)
            }
        }
        CreditStrategy::Adaptive => adaptive_grant(policy, ledger, server, credit_request),
    }
}

fn adaptive_grant(policy: &CreditPolicy, ledger: &CreditLedger, server: &ServerLedger, credit_request: u16) -> u16 {
    let mut grant = policy.initial_grant as f64;

    let active_requests = server.active_requests() as f64;
    if active_requests > policy.load_high as f64 {
        let factor = (policy.load_high as f64 / active_requests).max(0.25);
        grant *= factor;
    } else if active_requests < policy.load_low as f64 {
        grant *= 1.5;
    }

    let outstanding_requests = ledger.outstanding_requests() as f64;
    if outstanding_requests > policy.aggressive_threshold as f64 {
        let factor = (policy.aggressive_threshold as f64 / outstanding_requests).max(0.5);
        grant *= factor;
    }

    let outstanding = ledger.outstanding().max(0) as f64;
    let half_window = policy.max_session_credits as f64 / 2.0;
    if outstanding > half_window {
        let factor = (policy.max_session_credits as f64 / (2.0 * outstanding)).max(0.5);
        grant *= factor;
    }

    let mut grant = grant.floor() as i64;
    grant = grant.clamp(policy.min_grant as i64, policy.max_grant as i64);

    if credit_request != 0 && (credit_request as i64) < grant {
        grant = (credit_request as i64).max(policy.min_grant as i64);
    }

    grant as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CreditPolicy {
        CreditPolicy {
            strategy: CreditStrategy::Adaptive,
            min_grant: 16,
            max_grant: 8192,
            initial_grant: 256,
            max_session_credits: 65535,
            load_high: 1000,
            load_low: 100,
            aggressive_threshold: 256,
        }
    }

    #[test]
    fn adaptive_grant_matches_worked_example() {
        let policy = policy();
        let ledger = CreditLedger::new(0);
        for _ in 0..500 {
            ledger.begin_request(1);
        }
        let server = ServerLedger::default();
        for _ in 0..2000 {
            server.request_started();
        }

        let grant = grant_credits(&policy, &ledger, &server, 512);
        assert_eq!(grant, 65);
    }

    #[test]
    fn fixed_strategy_always_grants_initial() {
        let mut policy = policy();
        policy.strategy = CreditStrategy::Fixed;
        let ledger = CreditLedger::new(0);
        let server = ServerLedger::default();
        assert_eq!(grant_credits(&policy, &ledger, &server, 9999), 256);
    }

    #[test]
    fn echo_strategy_clamps_request() {
        let mut policy = policy();
        policy.strategy = CreditStrategy::Echo;
        let ledger = CreditLedger::new(0);
        let server = ServerLedger::default();
        assert_eq!(grant_credits(&policy, &ledger, &server, 0), 256);
        assert_eq!(grant_credits(&policy, &ledger, &server, 99999), 8192);
        assert_eq!(grant_credits(&policy, &ledger, &server, 4), 16);
    }

    #[test]
    fn ledger_tracks_outstanding_within_bounds() {
        let ledger = CreditLedger::new(16);
        ledger.begin_request(4);
        assert_eq!(ledger.outstanding(), -4);
        ledger.complete_request(8);
        assert_eq!(ledger.outstanding(), 20);
        assert_eq!(ledger.outstanding_requests(), 0);
    }
}
