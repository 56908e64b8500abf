use crate::{account::TokenAccountRecord, constant::BATCH_SIZE, error::SweepError};
use solana_sdk::{pubkey::Pubkey, transaction::Transaction};

/// One group of records and the unsigned transaction that closes them.
pub struct Batch {
    pub records: Vec<TokenAccountRecord>,
    pub transaction: Transaction,
}

/// Ordered partition of a target record set into transactions of at most
/// [`BATCH_SIZE`] close instructions each. Transient; rebuilt from a fresh
/// scan for every bulk action.
pub struct BatchPlan {
    pub batches: Vec<Batch>,
}

impl BatchPlan {
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn total_accounts(&self) -> usize {
        self.batches.iter().map(|b| b.records.len()).sum()
    }
}

/// Partitions `records` positionally into contiguous groups of at most
/// [`BATCH_SIZE`] and builds one transaction per group, one close
/// instruction per record, instruction order matching record order. The
/// owner is both authority and rent destination. Blockhashes are left unset;
/// the sequencer stamps a fresh one immediately before each submission.
pub fn build_close_plan(
    records: &[TokenAccountRecord],
    owner: &Pubkey,
) -> Result<BatchPlan, SweepError> {
    let mut batches = Vec::with_capacity(records.len().div_ceil(BATCH_SIZE));

    for group in records.chunks(BATCH_SIZE) {
        let mut instructions = Vec::with_capacity(group.len());
        for record in group {
            instructions.push(record.program.close_account_instruction(
                &record.address,
                owner,
                owner,
            )?);
        }
        batches.push(Batch {
            records: group.to_vec(),
            transaction: Transaction::new_with_payer(&instructions, Some(owner)),
        });
    }

    Ok(BatchPlan { batches })
}
