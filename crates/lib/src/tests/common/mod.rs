//! Shared test fixtures: canned RPC responses and record builders.

use crate::{account::TokenAccountRecord, token::ProgramVariant};
use serde_json::json;
use solana_client::rpc_response::RpcKeyedAccount;
use solana_sdk::pubkey::Pubkey;

/// A `getTokenAccountsByOwner` entry shaped exactly like the node's
/// `jsonParsed` response, built through serde so the test payloads stay
/// honest about the wire format.
pub fn token_account_response(
    address: &Pubkey,
    mint: &Pubkey,
    amount: u64,
    decimals: u8,
) -> RpcKeyedAccount {
    let ui_amount = amount as f64 / 10f64.powi(i32::from(decimals));
    let value = json!({
        "pubkey": address.to_string(),
        "account": {
            "lamports": 2_039_280u64,
            "owner": ProgramVariant::Token.program_id().to_string(),
            "executable": false,
            "rentEpoch": 0u64,
            "space": 165u64,
            "data": {
                "program": "spl-token",
                "space": 165u64,
                "parsed": {
                    "type": "account",
                    "info": {
                        "mint": mint.to_string(),
                        "owner": Pubkey::new_unique().to_string(),
                        "state": "initialized",
                        "isNative": false,
                        "tokenAmount": {
                            "amount": amount.to_string(),
                            "decimals": decimals,
                            "uiAmount": ui_amount,
                            "uiAmountString": ui_amount.to_string(),
                        },
                    },
                },
            },
        },
    });

    serde_json::from_value(value).expect("valid RpcKeyedAccount fixture")
}

/// Record builder for tests that do not care about addresses.
pub fn record_with_amount(
    raw_amount: u64,
    decimals: u8,
    program: ProgramVariant,
) -> TokenAccountRecord {
    TokenAccountRecord {
        address: Pubkey::new_unique(),
        mint: Pubkey::new_unique(),
        raw_amount,
        decimals,
        program,
    }
}
