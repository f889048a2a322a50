//! Metrics for the simulated gateway chain.

use ::metrics::{Counter, counter};

/// Gateway chain metrics. Counters are no-ops until a recorder is installed.
#[derive(Clone)]
pub struct GatewayMetrics {
    /// Transactions whose effects were committed
    pub transactions_committed: Counter,

    /// Transactions rolled back by a revert
    pub transactions_reverted: Counter,

    /// Withdrawals that reached the L2-to-L1 messenger
    pub withdrawals_initiated: Counter,

    /// Deposits minted on L2
    pub deposits_finalized: Counter,
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self {
            transactions_committed: counter!("arb_gateway_transactions_committed"),
            transactions_reverted: counter!("arb_gateway_transactions_reverted"),
            withdrawals_initiated: counter!("arb_gateway_withdrawals_initiated"),
            deposits_finalized: counter!("arb_gateway_deposits_finalized"),
        }
    }
}

impl std::fmt::Debug for GatewayMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayMetrics").finish_non_exhaustive()
    }
}

impl GatewayMetrics {
    #[inline]
    pub fn record_committed(&self) {
        self.transactions_committed.increment(1);
    }

    #[inline]
    pub fn record_reverted(&self) {
        self.transactions_reverted.increment(1);
    }

    #[inline]
    pub fn record_withdrawals(&self, count: u64) {
        self.withdrawals_initiated.increment(count);
    }

    #[inline]
    pub fn record_deposits(&self, count: u64) {
        self.deposits_finalized.increment(count);
    }
}
