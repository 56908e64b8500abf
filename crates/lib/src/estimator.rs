use crate::{
    account::TokenAccountRecord,
    client::LedgerReader,
    constant::TOKEN_ACCOUNT_SIZE,
    error::SweepError,
    events::{EngineEvent, EventSink},
};
use rust_decimal::Decimal;

/// Rent recoverable by closing the currently empty accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReclaimEstimate {
    pub empty_accounts: usize,
    pub lamports: u64,
}

impl ReclaimEstimate {
    /// The estimate in SOL, exact.
    pub fn sol(&self) -> Decimal {
        lamports_to_sol(self.lamports)
    }
}

/// One native unit is 10^9 base units; the conversion stays in decimal
/// arithmetic so the displayed value is exact.
pub fn lamports_to_sol(lamports: u64) -> Decimal {
    Decimal::from_i128_with_scale(lamports as i128, 9).normalize()
}

/// `rent_minimum × |empty records|`, in lamports. Pure.
pub fn estimate_reclaim_lamports(records: &[TokenAccountRecord], rent_minimum: u64) -> u64 {
    let empty = records.iter().filter(|r| r.is_empty()).count() as u64;
    rent_minimum.saturating_mul(empty)
}

/// Fetches the rent-exemption minimum for the fixed token account size and
/// computes the estimate for `records`.
pub async fn estimate_reclaim(
    reader: &dyn LedgerReader,
    records: &[TokenAccountRecord],
    events: &EventSink,
) -> Result<ReclaimEstimate, SweepError> {
    let rent_minimum = reader
        .minimum_rent_exemption(TOKEN_ACCOUNT_SIZE)
        .await
        .map_err(|e| SweepError::EstimationFailed(e.to_string()))?;

    let estimate = ReclaimEstimate {
        empty_accounts: records.iter().filter(|r| r.is_empty()).count(),
        lamports: estimate_reclaim_lamports(records, rent_minimum),
    };
    events.emit(EngineEvent::EstimateUpdated {
        lamports: estimate.lamports,
        sol: estimate.sol(),
    });
    Ok(estimate)
}
