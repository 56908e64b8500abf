use crate::{
    account::TokenAccountRecord,
    client::LedgerReader,
    error::SweepError,
    events::{EngineEvent, EventSink},
    token::ProgramVariant,
};
use solana_sdk::pubkey::Pubkey;

/// Owns the in-memory record set. A scan replaces it wholesale on success;
/// a failed scan leaves the previous set untouched, so readers never see a
/// partially updated view.
#[derive(Default)]
pub struct AccountScanner {
    records: Vec<TokenAccountRecord>,
}

impl AccountScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TokenAccountRecord] {
        &self.records
    }

    /// Drops the record set, e.g. when the connected wallet changes.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Fetches every token account `owner` holds under both program
    /// variants and replaces the record set. The two reads are independent
    /// and issued concurrently; results concatenate in variant enumeration
    /// order, then network response order.
    pub async fn scan(
        &mut self,
        reader: &dyn LedgerReader,
        owner: Pubkey,
        events: &EventSink,
    ) -> Result<usize, SweepError> {
        events.emit(EngineEvent::ScanStarted);

        let (classic, extended) = futures::try_join!(
            reader.token_accounts_by_owner(owner, ProgramVariant::Token),
            reader.token_accounts_by_owner(owner, ProgramVariant::Token2022),
        )
        .map_err(|e| SweepError::ScanFailed(e.to_string()))?;

        let mut fresh = Vec::with_capacity(classic.len() + extended.len());
        for (variant, keyed_accounts) in
            [(ProgramVariant::Token, classic), (ProgramVariant::Token2022, extended)]
        {
            for keyed in keyed_accounts {
                match TokenAccountRecord::from_keyed_account(&keyed, variant) {
                    Some(record) => fresh.push(record),
                    None => log::debug!("skipping unparseable token account {}", keyed.pubkey),
                }
            }
        }

        self.records = fresh;
        events.emit(EngineEvent::ScanCompleted { accounts: self.records.len() });
        Ok(self.records.len())
    }
}
