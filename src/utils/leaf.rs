use crate::error::{DropError, Result};
use alloy_primitives::{hex, Address, U256};

/// Length of an encoded leaf: 20 address bytes followed by a 32-byte amount.
pub const LEAF_LEN: usize = 20 + 32;

/// Encodes a recipient into the byte string committed to by the tree.
///
/// The address comes first, then the amount as an unsigned big-endian 32-byte
/// word. There is no delimiter and no length prefix, so the layout matches
/// `abi.encodePacked(address, uint256)` on the verifier side.
///
/// # Examples
///
/// ```
/// use alloy_primitives::{Address, U256};
/// use merkle_drop::utils::leaf::{encode_leaf, LEAF_LEN};
///
/// let leaf = encode_leaf(&Address::repeat_byte(0xaa), U256::from(100));
/// assert_eq!(leaf.len(), LEAF_LEN);
/// assert_eq!(leaf[..20], [0xaa; 20]);
/// assert_eq!(leaf[LEAF_LEN - 1], 100);
/// ```
pub fn encode_leaf(address: &Address, amount: U256) -> [u8; LEAF_LEN] {
    let mut leaf = [0u8; LEAF_LEN];
    leaf[..20].copy_from_slice(address.as_slice());
    leaf[20..].copy_from_slice(&amount.to_be_bytes::<32>());
    leaf
}

/// Parses an address from its textual hex form.
///
/// The `0x` prefix is optional and checksum casing is accepted but not
/// enforced. The decoded value must be exactly 20 bytes.
///
/// # Errors
///
/// Returns [`DropError::InvalidAddress`] for non-hex input and
/// [`DropError::AddressLength`] when the decoded length is not 20.
pub fn parse_address(text: &str) -> Result<Address> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|_| DropError::InvalidAddress(text.to_string()))?;
    if bytes.len() != 20 {
        return Err(DropError::AddressLength(bytes.len()));
    }
    Ok(Address::from_slice(&bytes))
}

/// Parses a non-negative amount, either decimal or `0x`-prefixed hex.
///
/// # Errors
///
/// Returns [`DropError::InvalidAmount`] for anything that is not a plain
/// unsigned integer (signs, fractions, exponents, empty strings) and
/// [`DropError::AmountOverflow`] when the value needs more than 256 bits.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use merkle_drop::utils::leaf::parse_amount;
///
/// assert_eq!(parse_amount("250").unwrap(), U256::from(250));
/// assert_eq!(parse_amount("0xfa").unwrap(), U256::from(250));
/// assert!(parse_amount("-1").is_err());
/// ```
pub fn parse_amount(text: &str) -> Result<U256> {
    let trimmed = text.trim();
    let (digits, radix) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex_digits) => (hex_digits, 16),
        None => (trimmed, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(DropError::InvalidAmount(text.to_string()));
    }
    // Every character is a valid digit, so the only way left to fail is overflow.
    U256::from_str_radix(digits, radix as u64)
        .map_err(|_| DropError::AmountOverflow(trimmed.to_string()))
}
