use crate::token::ProgramVariant;
use rust_decimal::Decimal;
use solana_account_decoder::UiAccountData;
use solana_client::rpc_response::RpcKeyedAccount;
use solana_sdk::pubkey::Pubkey;

/// Normalized view of one on-chain token account owned by the wallet.
///
/// `raw_amount` is the exact base-unit balance; it is the only value
/// eligibility and instruction encoding ever look at. The human-scaled
/// amount is derived on demand and exists for presentation only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccountRecord {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub raw_amount: u64,
    pub decimals: u8,
    pub program: ProgramVariant,
}

impl TokenAccountRecord {
    /// An account is eligible for closing iff its base-unit balance is zero.
    pub fn is_empty(&self) -> bool {
        self.raw_amount == 0
    }

    /// `raw_amount / 10^decimals`, exact. Presentation only.
    pub fn display_amount(&self) -> Decimal {
        Decimal::try_from_i128_with_scale(self.raw_amount as i128, u32::from(self.decimals))
            .unwrap_or_default()
            .normalize()
    }

    /// Builds a record from one `getTokenAccountsByOwner` entry.
    ///
    /// The RPC is asked for `jsonParsed` data; the base-unit amount arrives
    /// as a decimal string and is parsed straight to `u64`, never through a
    /// float. Entries the node could not parse (or that are missing fields)
    /// yield `None` and are skipped by the scanner.
    pub fn from_keyed_account(
        keyed: &RpcKeyedAccount,
        program: ProgramVariant,
    ) -> Option<Self> {
        let UiAccountData::Json(parsed) = &keyed.account.data else {
            return None;
        };

        let info = parsed.parsed.get("info")?;
        let mint = info.get("mint")?.as_str()?.parse().ok()?;
        let token_amount = info.get("tokenAmount")?;
        let raw_amount = token_amount.get("amount")?.as_str()?.parse().ok()?;
        let decimals = u8::try_from(token_amount.get("decimals")?.as_u64()?).ok()?;
        let address = keyed.pubkey.parse().ok()?;

        Some(Self { address, mint, raw_amount, decimals, program })
    }
}
