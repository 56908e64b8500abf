use crate::{account::TokenAccountRecord, error::SweepError};
use rust_decimal::Decimal;
use solana_sdk::{pubkey::Pubkey, transaction::Transaction};

/// `floor(amount × 10^decimals)` as an exact integer.
///
/// The computation runs on the decimal's integer mantissa, so amounts whose
/// scaled product has no exact binary representation (`0.1 × 10^6`) still
/// convert exactly. `amount` must be positive.
pub fn burn_base_units(amount: Decimal, decimals: u8) -> Result<u64, SweepError> {
    if amount <= Decimal::ZERO {
        return Err(SweepError::ValidationError(
            "burn amount must be greater than zero".to_string(),
        ));
    }

    let mantissa = amount.mantissa();
    let scale = amount.scale();

    let base_units = if u32::from(decimals) >= scale {
        10i128
            .checked_pow(u32::from(decimals) - scale)
            .and_then(|multiplier| mantissa.checked_mul(multiplier))
            .ok_or_else(|| {
                SweepError::ValidationError("burn amount out of range".to_string())
            })?
    } else {
        // truncating division floors, since the mantissa is positive here
        mantissa / 10i128.pow(scale - u32::from(decimals))
    };

    u64::try_from(base_units)
        .map_err(|_| SweepError::ValidationError("burn amount out of range".to_string()))
}

/// Validates `amount` against the account's balance and builds the
/// single-instruction burn transaction for it. Returns the transaction and
/// the exact base-unit amount it encodes.
///
/// Burning is destructive and irreversible; callers surface an explicit
/// warning before dispatching the result.
pub fn build_burn_transaction(
    record: &TokenAccountRecord,
    owner: &Pubkey,
    amount: Decimal,
) -> Result<(Transaction, u64), SweepError> {
    if amount <= Decimal::ZERO {
        return Err(SweepError::ValidationError(
            "burn amount must be greater than zero".to_string(),
        ));
    }
    if amount > record.display_amount() {
        return Err(SweepError::ValidationError(format!(
            "burn amount {amount} exceeds account balance {}",
            record.display_amount()
        )));
    }

    let base_units = burn_base_units(amount, record.decimals)?;
    let instruction = record.program.burn_instruction(
        &record.address,
        &record.mint,
        owner,
        base_units,
        record.decimals,
    )?;

    Ok((Transaction::new_with_payer(&[instruction], Some(owner)), base_units))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::record_with_amount;
    use crate::token::ProgramVariant;
    use rust_decimal_macros::dec;

    #[test]
    fn test_base_units_exact_across_decimals() {
        // decimals = 0
        assert_eq!(burn_base_units(dec!(7), 0).unwrap(), 7);
        assert_eq!(burn_base_units(dec!(7.9), 0).unwrap(), 7);

        // decimals = 6
        assert_eq!(burn_base_units(dec!(1.5), 6).unwrap(), 1_500_000);
        assert_eq!(burn_base_units(dec!(0.1), 6).unwrap(), 100_000);
        assert_eq!(burn_base_units(dec!(0.000001), 6).unwrap(), 1);

        // decimals = 9
        assert_eq!(burn_base_units(dec!(0.1), 9).unwrap(), 100_000_000);
        assert_eq!(burn_base_units(dec!(2.000000001), 9).unwrap(), 2_000_000_001);
    }

    #[test]
    fn test_base_units_floor_sub_unit_fractions() {
        // fractions finer than the mint's scale floor away
        assert_eq!(burn_base_units(dec!(0.0000014), 6).unwrap(), 1);
        assert_eq!(burn_base_units(dec!(0.0000009), 6).unwrap(), 0);
    }

    #[test]
    fn test_base_units_rejects_non_positive() {
        assert!(matches!(
            burn_base_units(dec!(0), 6),
            Err(SweepError::ValidationError(_))
        ));
        assert!(matches!(
            burn_base_units(dec!(-1.5), 6),
            Err(SweepError::ValidationError(_))
        ));
    }

    #[test]
    fn test_base_units_rejects_u64_overflow() {
        assert!(matches!(
            burn_base_units(dec!(18446744073709.551616), 6),
            Err(SweepError::ValidationError(_))
        ));
    }

    #[test]
    fn test_build_rejects_amount_over_balance() {
        let record = record_with_amount(1_500_000, 6, ProgramVariant::Token);
        let owner = Pubkey::new_unique();

        let err = build_burn_transaction(&record, &owner, dec!(1.500001)).unwrap_err();
        assert!(matches!(err, SweepError::ValidationError(_)));
    }

    #[test]
    fn test_build_allows_full_balance() {
        let record = record_with_amount(1_500_000, 6, ProgramVariant::Token);
        let owner = Pubkey::new_unique();

        let (_, base_units) = build_burn_transaction(&record, &owner, dec!(1.5)).unwrap();
        assert_eq!(base_units, record.raw_amount);
    }

    #[test]
    fn test_build_encodes_unchecked_burn_on_classic() {
        let record = record_with_amount(2_000_000, 6, ProgramVariant::Token);
        let owner = Pubkey::new_unique();

        let (transaction, base_units) =
            build_burn_transaction(&record, &owner, dec!(1.5)).unwrap();
        assert_eq!(base_units, 1_500_000);

        let message = &transaction.message;
        assert_eq!(message.instructions.len(), 1);
        let ix = &message.instructions[0];
        assert_eq!(
            message.account_keys[ix.program_id_index as usize],
            ProgramVariant::Token.program_id()
        );
        // Burn discriminant, no decimals byte
        assert_eq!(ix.data[0], 8);
        assert_eq!(ix.data.len(), 9);
    }

    #[test]
    fn test_build_encodes_checked_burn_on_token_2022() {
        let record = record_with_amount(2_000_000, 6, ProgramVariant::Token2022);
        let owner = Pubkey::new_unique();

        let (transaction, base_units) =
            build_burn_transaction(&record, &owner, dec!(1.5)).unwrap();
        assert_eq!(base_units, 1_500_000);

        let message = &transaction.message;
        let ix = &message.instructions[0];
        assert_eq!(
            message.account_keys[ix.program_id_index as usize],
            ProgramVariant::Token2022.program_id()
        );
        // BurnChecked discriminant with trailing decimals byte
        assert_eq!(ix.data[0], 15);
        assert_eq!(ix.data[9], 6);
    }

    #[test]
    fn test_build_rejects_zero_without_touching_the_record() {
        let record = record_with_amount(0, 6, ProgramVariant::Token);
        let owner = Pubkey::new_unique();
        assert!(build_burn_transaction(&record, &owner, dec!(0)).is_err());
    }
}
