use crate::error::SweepError;
use serde::{Deserialize, Serialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

/// The two mutually incompatible token program implementations an account
/// can belong to. The variant decides which instruction encoder applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgramVariant {
    /// Classic SPL Token program
    Token,
    /// Token-2022 (extensions) program
    Token2022,
}

impl ProgramVariant {
    /// Enumeration order is the scan order; record sets concatenate in it.
    pub const ALL: [ProgramVariant; 2] = [ProgramVariant::Token, ProgramVariant::Token2022];

    pub fn program_id(&self) -> Pubkey {
        match self {
            ProgramVariant::Token => spl_token_interface::id(),
            ProgramVariant::Token2022 => spl_token_2022_interface::id(),
        }
    }

    pub fn from_program_id(program_id: &Pubkey) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.program_id() == *program_id)
    }

    /// Close instruction for `account`, refunding its lamports to
    /// `destination`. The owner signs.
    pub fn close_account_instruction(
        &self,
        account: &Pubkey,
        destination: &Pubkey,
        owner: &Pubkey,
    ) -> Result<Instruction, SweepError> {
        let ix = match self {
            ProgramVariant::Token => spl_token_interface::instruction::close_account(
                &self.program_id(),
                account,
                destination,
                owner,
                &[owner],
            )?,
            ProgramVariant::Token2022 => spl_token_2022_interface::instruction::close_account(
                &self.program_id(),
                account,
                destination,
                owner,
                &[owner],
            )?,
        };
        Ok(ix)
    }

    /// Burn instruction for `amount` base units. Token-2022 requires the
    /// decimals-checked form; the classic program takes the unchecked one.
    pub fn burn_instruction(
        &self,
        account: &Pubkey,
        mint: &Pubkey,
        owner: &Pubkey,
        amount: u64,
        decimals: u8,
    ) -> Result<Instruction, SweepError> {
        let ix = match self {
            ProgramVariant::Token => spl_token_interface::instruction::burn(
                &self.program_id(),
                account,
                mint,
                owner,
                &[owner],
                amount,
            )?,
            ProgramVariant::Token2022 => spl_token_2022_interface::instruction::burn_checked(
                &self.program_id(),
                account,
                mint,
                owner,
                &[owner],
                amount,
                decimals,
            )?,
        };
        Ok(ix)
    }
}
