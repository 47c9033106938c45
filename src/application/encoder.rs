use crate::domain::address::Address;
use crate::domain::transaction::TransferInstruction;
use crate::error::{PayrollError, Result};
use rust_decimal::Decimal;

/// Selector of `transfer(address,uint256)`.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

const WORD: usize = 32;
/// Selector plus two ABI words.
pub const TRANSFER_CALL_LEN: usize = 4 + 2 * WORD;

/// Converts a human amount into the token's smallest unit without rounding.
///
/// Fails if `amount` is negative, has more fractional digits than
/// `decimals`, or does not fit in 128 bits once scaled.
pub fn to_smallest_unit(amount: Decimal, decimals: u32) -> Result<u128> {
    if amount < Decimal::ZERO {
        return Err(PayrollError::Encoding(format!(
            "amount {amount} is negative"
        )));
    }
    let normalized = amount.normalize();
    let scale = normalized.scale();
    if scale > decimals {
        return Err(PayrollError::Encoding(format!(
            "amount {amount} has more than {decimals} decimal places"
        )));
    }
    let mantissa = normalized.mantissa().unsigned_abs();
    10u128
        .checked_pow(decimals - scale)
        .and_then(|factor| mantissa.checked_mul(factor))
        .ok_or_else(|| {
            PayrollError::Encoding(format!(
                "amount {amount} overflows at {decimals} decimal places"
            ))
        })
}

/// Builds the call data for transferring `amount` tokens to `recipient`.
pub fn encode_transfer(recipient: &str, amount: Decimal, decimals: u32) -> Result<Vec<u8>> {
    let recipient: Address = recipient.parse()?;
    let amount = to_smallest_unit(amount, decimals)?;
    Ok(encode_call(&recipient, amount))
}

fn encode_call(recipient: &Address, amount: u128) -> Vec<u8> {
    let mut data = Vec::with_capacity(TRANSFER_CALL_LEN);
    data.extend_from_slice(&TRANSFER_SELECTOR);
    data.extend_from_slice(&[0u8; WORD - Address::LEN]);
    data.extend_from_slice(recipient.as_bytes());
    data.extend_from_slice(&[0u8; WORD - 16]);
    data.extend_from_slice(&amount.to_be_bytes());
    data
}

impl TransferInstruction {
    pub fn new(
        contract_address: Address,
        recipient: &str,
        amount: Decimal,
        decimals: u32,
    ) -> Result<Self> {
        Ok(Self {
            contract_address,
            recipient: recipient.parse()?,
            amount: to_smallest_unit(amount, decimals)?,
        })
    }

    pub fn call_data(&self) -> Vec<u8> {
        encode_call(&self.recipient, self.amount)
    }

    /// Parses call data produced by [`TransferInstruction::call_data`].
    pub fn decode(contract_address: Address, data: &[u8]) -> Result<Self> {
        if data.len() != TRANSFER_CALL_LEN {
            return Err(PayrollError::Encoding(format!(
                "transfer call data must be {TRANSFER_CALL_LEN} bytes, got {}",
                data.len()
            )));
        }
        let (selector, words) = data.split_at(4);
        if selector != TRANSFER_SELECTOR {
            return Err(PayrollError::Encoding(format!(
                "unexpected selector 0x{}",
                hex::encode(selector)
            )));
        }
        let (recipient_word, amount_word) = words.split_at(WORD);
        let (recipient_pad, recipient) = recipient_word.split_at(WORD - Address::LEN);
        let (amount_pad, amount) = amount_word.split_at(WORD - 16);
        if recipient_pad.iter().chain(amount_pad).any(|b| *b != 0) {
            return Err(PayrollError::Encoding(
                "non-zero padding in transfer call data".to_string(),
            ));
        }

        let mut recipient_bytes = [0u8; 20];
        recipient_bytes.copy_from_slice(recipient);
        let mut amount_bytes = [0u8; 16];
        amount_bytes.copy_from_slice(amount);

        Ok(Self {
            contract_address,
            recipient: Address::from_bytes(recipient_bytes),
            amount: u128::from_be_bytes(amount_bytes),
        })
    }
}
