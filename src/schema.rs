//! JSON shapes read and written at the edge of the pipeline.
//!
//! Input is an object mapping addresses to cumulative amounts:
//!
//! ```json
//! { "0xaaaa…": "100", "0xbbbb…": 250 }
//! ```
//!
//! Output is the distribution artifact:
//!
//! ```json
//! { "root": "0x…", "data": [{ "address": "0x…", "amount": "100", "proof": ["0x…"] }] }
//! ```

use crate::distribution::{Claim, Distribution, Recipient};
use crate::error::{DropError, Result};
use crate::tree::LeafOrder;
use crate::utils::leaf::{parse_address, parse_amount};
use alloy_primitives::{B256, U256};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// The recipients of a distribution, in the order the input listed them.
///
/// Amounts may be JSON integers of any size or strings (decimal, or `0x`
/// hex). Repeated keys are kept so that [`Distribution::generate`] can
/// reject them instead of one silently replacing the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionInput {
    recipients: Vec<Recipient>,
}

impl DistributionInput {
    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn into_distribution(self, order: LeafOrder) -> Result<Distribution> {
        Distribution::generate(&self.recipients, order)
    }
}

impl From<Vec<Recipient>> for DistributionInput {
    fn from(recipients: Vec<Recipient>) -> Self {
        Self { recipients }
    }
}

impl<'de> Deserialize<'de> for DistributionInput {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(InputVisitor)
    }
}

struct InputVisitor;

impl<'de> Visitor<'de> for InputVisitor {
    type Value = DistributionInput;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping addresses to amounts")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut recipients = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<String>()? {
            let value: Value = map.next_value()?;
            let address = parse_address(&key).map_err(de::Error::custom)?;
            let amount = amount_from_json(&value)
                .map_err(|err| de::Error::custom(format!("{key}: {err}")))?;
            recipients.push(Recipient::new(address, amount));
        }
        Ok(DistributionInput { recipients })
    }
}

fn amount_from_json(value: &Value) -> Result<U256> {
    match value {
        // Numbers keep their source text, so nothing has gone through an f64.
        Value::Number(number) => parse_amount(&number.to_string()),
        Value::String(text) => parse_amount(text),
        other => Err(DropError::InvalidAmount(other.to_string())),
    }
}

/// The persisted distribution artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionFile {
    pub root: B256,
    pub data: Vec<Claim>,
}

impl From<&Distribution> for DistributionFile {
    fn from(distribution: &Distribution) -> Self {
        Self {
            root: distribution.root(),
            data: distribution.claims().to_vec(),
        }
    }
}

impl From<DistributionFile> for Distribution {
    fn from(file: DistributionFile) -> Self {
        Distribution::from_parts(file.root, file.data)
    }
}

/// Addresses as EIP-55 checksummed strings; any casing is accepted back.
pub(crate) mod checksum_address {
    use crate::utils::leaf::parse_address;
    use alloy_primitives::Address;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&address.to_checksum(None))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_address(&text).map_err(de::Error::custom)
    }
}

/// Amounts as decimal strings, so values above 2^53 survive any JSON reader.
pub(crate) mod decimal_amount {
    use crate::utils::leaf::parse_amount;
    use alloy_primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_amount(&text).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, Address};

    const TWO_RECIPIENTS: &str = r#"{
        "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb": 250,
        "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa": "100"
    }"#;

    #[test]
    fn test_input_keeps_enumeration_order() {
        let input: DistributionInput = serde_json::from_str(TWO_RECIPIENTS).unwrap();
        assert_eq!(
            input.recipients(),
            &[
                Recipient::new(Address::repeat_byte(0xbb), U256::from(250)),
                Recipient::new(Address::repeat_byte(0xaa), U256::from(100)),
            ]
        );
    }

    #[test]
    fn test_input_big_number_is_exact() {
        let json = r#"{"0x1111111111111111111111111111111111111111": 123456789012345678901234567890}"#;
        let input: DistributionInput = serde_json::from_str(json).unwrap();
        assert_eq!(
            input.recipients()[0].amount.to_string(),
            "123456789012345678901234567890"
        );
    }

    #[test]
    fn test_input_hex_string_amount() {
        let json = r#"{"0x1111111111111111111111111111111111111111": "0xde0b6b3a7640000"}"#;
        let input: DistributionInput = serde_json::from_str(json).unwrap();
        assert_eq!(
            input.recipients()[0].amount,
            U256::from(1_000_000_000_000_000_000_u64)
        );
    }

    #[test]
    fn test_input_rejects_malformed_entries() {
        let cases = [
            r#"{"0x1234": 1}"#,
            r#"{"0x1111111111111111111111111111111111111111": -1}"#,
            r#"{"0x1111111111111111111111111111111111111111": 1.5}"#,
            r#"{"0x1111111111111111111111111111111111111111": 1e18}"#,
            r#"{"0x1111111111111111111111111111111111111111": null}"#,
            r#"{"0x1111111111111111111111111111111111111111": [1]}"#,
            r#"["0x1111111111111111111111111111111111111111"]"#,
        ];
        for json in cases {
            assert!(
                serde_json::from_str::<DistributionInput>(json).is_err(),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn test_input_error_names_the_address() {
        let json = r#"{"0x1111111111111111111111111111111111111111": "lots"}"#;
        let err = serde_json::from_str::<DistributionInput>(json).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("0x1111111111111111111111111111111111111111: Invalid amount"));
    }

    #[test]
    fn test_input_overflowing_amount() {
        let json = format!(
            r#"{{"0x1111111111111111111111111111111111111111": {}0}}"#,
            U256::MAX
        );
        let err = serde_json::from_str::<DistributionInput>(&json).unwrap_err();
        assert!(err.to_string().contains("does not fit in 256 bits"));
    }

    #[test]
    fn test_input_duplicate_keys_surface() {
        let json = r#"{
            "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa": 1,
            "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA": 2
        }"#;
        let input: DistributionInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.recipients().len(), 2);
        assert_eq!(
            input.into_distribution(LeafOrder::Sorted),
            Err(DropError::DuplicateAddress(Address::repeat_byte(0xaa)))
        );
    }

    #[test]
    fn test_empty_input() {
        let input: DistributionInput = serde_json::from_str("{}").unwrap();
        assert_eq!(
            input.into_distribution(LeafOrder::Sorted),
            Err(DropError::EmptyTree)
        );
    }

    #[test]
    fn test_output_shape() {
        let input: DistributionInput = serde_json::from_str(TWO_RECIPIENTS).unwrap();
        let distribution = input.into_distribution(LeafOrder::Sorted).unwrap();
        let value = serde_json::to_value(DistributionFile::from(&distribution)).unwrap();

        assert_eq!(
            value["root"],
            "0x471950fc4299f92b404893391a8fd10b9e412ed3fb9b0497456f10bb244941ad"
        );
        assert_eq!(
            value["data"][0]["address"],
            "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB"
        );
        assert_eq!(value["data"][0]["amount"], "250");
        assert_eq!(
            value["data"][0]["proof"][0],
            "0x1e95027f46eef0cc2297e2eb36304b1c740b3a1b5cfa702b1463e3742c3ce039"
        );
        assert_eq!(value["data"][1]["amount"], "100");
    }

    #[test]
    fn test_output_round_trip_keeps_claims_verifiable() {
        let huge = U256::from(u128::MAX) * U256::from(1_000_u64);
        let recipients = vec![
            Recipient::new(address!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"), huge),
            Recipient::new(Address::repeat_byte(0x01), U256::from(7)),
            Recipient::new(Address::repeat_byte(0x02), U256::ZERO),
        ];
        let distribution = DistributionInput::from(recipients)
            .into_distribution(LeafOrder::Insertion)
            .unwrap();

        let json = serde_json::to_string(&DistributionFile::from(&distribution)).unwrap();
        assert!(json.contains(&format!("\"amount\":\"{huge}\"")));

        let file: DistributionFile = serde_json::from_str(&json).unwrap();
        let restored = Distribution::from(file);
        assert_eq!(restored, distribution);
        assert!(restored.verify_all());
    }

    #[test]
    fn test_output_rejects_bad_proof_digest() {
        let json = r#"{
            "root": "0x471950fc4299f92b404893391a8fd10b9e412ed3fb9b0497456f10bb244941ad",
            "data": [{ "address": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "amount": "100", "proof": ["0x1234"] }]
        }"#;
        assert!(serde_json::from_str::<DistributionFile>(json).is_err());
    }

    #[test]
    fn test_output_accepts_lowercase_address() {
        let json = r#"{
            "root": "0x471950fc4299f92b404893391a8fd10b9e412ed3fb9b0497456f10bb244941ad",
            "data": [{
                "address": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "amount": "100",
                "proof": ["0xfd67164f6f7d24fdf933b7f4495878da5afe6a7386c190338f7d07305744d450"]
            }]
        }"#;
        let file: DistributionFile = serde_json::from_str(json).unwrap();
        assert_eq!(
            file.root,
            b256!("471950fc4299f92b404893391a8fd10b9e412ed3fb9b0497456f10bb244941ad")
        );
        assert!(Distribution::from(file).verify_all());
    }
}
