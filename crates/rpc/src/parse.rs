//! Projection of raw contract objects into domain records.
//!
//! The fullnode renders Move values loosely: `u64` as decimal strings, `ID` as a plain address,
//! `UID` as `{ "id": .. }`, `Option<T>` as the value or `null`, and enums either as their textual
//! form, an ordinal, or `{ "variant": .. }`. The accessors here accept all of those.

use std::str::FromStr;

use jamii_types::{
    Address, Coin, Contribution, Group, Loan, LoanStatus, ObjectId, Proposal, ProposalStatus,
    ProposalType, UnknownVariant,
};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{CoinRecord, SuiObjectResponse, SuiParsedData};

/// An error returned when an object cannot be projected into a record.
#[derive(Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum FieldError {
    #[error("object response has no data")]
    MissingData,

    #[error("object {0} has no move content")]
    NotMoveObject(ObjectId),

    #[error("missing field `{0}`")]
    Missing(&'static str),

    #[error("field `{field}` has unexpected value {value}")]
    Invalid { field: &'static str, value: String },

    #[error("field `{field}`: {source}")]
    Variant { field: &'static str, source: UnknownVariant },
}

/// Typed accessors over the fields of a Move object.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    /// Wrap a field map.
    #[must_use]
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self(fields)
    }

    fn get(&self, name: &'static str) -> Option<&'a Value> {
        self.0.get(name).filter(|value| !value.is_null())
    }

    fn required(&self, name: &'static str) -> Result<&'a Value, FieldError> {
        self.get(name).ok_or(FieldError::Missing(name))
    }

    /// A string field.
    pub fn string(&self, name: &'static str) -> Result<String, FieldError> {
        match self.required(name)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(invalid(name, other)),
        }
    }

    /// A string field that defaults to empty when absent.
    pub fn string_or_default(&self, name: &'static str) -> Result<String, FieldError> {
        match self.get(name) {
            None => Ok(String::new()),
            Some(_) => self.string(name),
        }
    }

    /// A `u64` field rendered as a number or a decimal string.
    pub fn u64(&self, name: &'static str) -> Result<u64, FieldError> {
        let value = self.required(name)?;
        match value {
            Value::Number(n) => n.as_u64().ok_or_else(|| invalid(name, value)),
            Value::String(s) => s.parse().map_err(|_| invalid(name, value)),
            _ => Err(invalid(name, value)),
        }
    }

    /// An optional `u64` field; absent and `null` both map to `None`.
    pub fn optional_u64(&self, name: &'static str) -> Result<Option<u64>, FieldError> {
        match self.get(name) {
            None => Ok(None),
            Some(_) => self.u64(name).map(Some),
        }
    }

    /// A boolean field.
    pub fn bool(&self, name: &'static str) -> Result<bool, FieldError> {
        let value = self.required(name)?;
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => s.parse().map_err(|_| invalid(name, value)),
            _ => Err(invalid(name, value)),
        }
    }

    /// An address or object id field, rendered as a string or as a `UID` struct.
    pub fn address(&self, name: &'static str) -> Result<Address, FieldError> {
        let value = self.required(name)?;
        parse_address(value).ok_or_else(|| invalid(name, value))
    }

    /// An optional list of addresses, rendered as an array or as a `VecSet` struct.
    pub fn optional_addresses(
        &self,
        name: &'static str,
    ) -> Result<Option<Vec<Address>>, FieldError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let items = match value {
            Value::Array(items) => items,
            Value::Object(map) => match map.get("fields").and_then(|f| f.get("contents")) {
                Some(Value::Array(items)) => items,
                _ => return Err(invalid(name, value)),
            },
            _ => return Err(invalid(name, value)),
        };
        items
            .iter()
            .map(|item| parse_address(item).ok_or_else(|| invalid(name, item)))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// A tagged enum field rendered as text, an ordinal, or `{ "variant": .. }`.
    pub fn variant<T>(&self, name: &'static str) -> Result<T, FieldError>
    where
        T: FromStr<Err = UnknownVariant> + TryFrom<u8, Error = UnknownVariant>,
    {
        let value = self.required(name)?;
        let parsed = match value {
            Value::String(s) => T::from_str(s),
            Value::Number(n) => {
                let ordinal = n
                    .as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| invalid(name, value))?;
                T::try_from(ordinal)
            }
            Value::Object(map) => match map.get("variant") {
                Some(Value::String(variant)) => T::from_str(&to_snake_case(variant)),
                _ => return Err(invalid(name, value)),
            },
            _ => return Err(invalid(name, value)),
        };
        parsed.map_err(|source| FieldError::Variant { field: name, source })
    }
}

fn invalid(field: &'static str, value: &Value) -> FieldError {
    FieldError::Invalid { field, value: value.to_string() }
}

fn parse_address(value: &Value) -> Option<Address> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Object(map) => map.get("id").and_then(parse_address),
        _ => None,
    }
}

fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Returns the object id and fields of a Move object response.
pub fn move_fields(response: &SuiObjectResponse) -> Result<(ObjectId, Fields<'_>), FieldError> {
    let data = response.data.as_ref().ok_or(FieldError::MissingData)?;
    match &data.content {
        Some(SuiParsedData::MoveObject { fields, .. }) => Ok((data.object_id, Fields::new(fields))),
        _ => Err(FieldError::NotMoveObject(data.object_id)),
    }
}

/// Projects a `Group` object.
pub fn parse_group(response: &SuiObjectResponse) -> Result<Group, FieldError> {
    let (id, fields) = move_fields(response)?;
    Ok(Group {
        id,
        name: fields.string("name")?,
        description: fields.string("description")?,
        creator: fields.address("creator")?,
        member_count: fields.u64("member_count")?,
        max_members: fields.u64("max_members")?,
        total_balance: fields.u64("total_balance")?,
        min_contribution: fields.u64("min_contribution")?,
        loan_ratio: fields.u64("loan_ratio")?,
        kyc_required: fields.bool("kyc_required")?,
        is_active: fields.bool("is_active")?,
        created_at: fields.u64("created_at")?,
        category: fields.string_or_default("category")?,
        location: fields.string_or_default("location")?,
        members: fields.optional_addresses("members")?,
    })
}

/// Projects a `Loan` object.
pub fn parse_loan(response: &SuiObjectResponse) -> Result<Loan, FieldError> {
    let (id, fields) = move_fields(response)?;
    Ok(Loan {
        id,
        group_id: fields.address("group_id")?,
        borrower: fields.address("borrower")?,
        amount: fields.u64("amount")?,
        purpose: fields.string("purpose")?,
        status: fields.variant::<LoanStatus>("status")?,
        created_at: fields.u64("created_at")?,
        due_date: fields.optional_u64("due_date")?,
    })
}

/// Projects a `Proposal` object.
pub fn parse_proposal(response: &SuiObjectResponse) -> Result<Proposal, FieldError> {
    let (id, fields) = move_fields(response)?;
    Ok(Proposal {
        id,
        group_id: fields.address("group_id")?,
        proposer: fields.address("proposer")?,
        proposal_type: fields.variant::<ProposalType>("proposal_type")?,
        description: fields.string("description")?,
        votes_for: fields.u64("votes_for")?,
        votes_against: fields.u64("votes_against")?,
        status: fields.variant::<ProposalStatus>("status")?,
        deadline: fields.u64("deadline")?,
    })
}

/// Projects a `Contribution` object.
pub fn parse_contribution(response: &SuiObjectResponse) -> Result<Contribution, FieldError> {
    let (id, fields) = move_fields(response)?;
    Ok(Contribution {
        id,
        group_id: fields.address("group_id")?,
        contributor: fields.address("contributor")?,
        amount: fields.u64("amount")?,
        timestamp: fields.u64("timestamp")?,
    })
}

impl From<CoinRecord> for Coin {
    fn from(record: CoinRecord) -> Self {
        Coin {
            coin_object_id: record.coin_object_id,
            coin_type: record.coin_type,
            balance: record.balance,
            version: record.version,
            digest: record.digest,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(id: &str, fields: Value) -> SuiObjectResponse {
        serde_json::from_value(json!({
            "data": {
                "objectId": id,
                "type": "0x1::jamiifund::Object",
                "content": {
                    "dataType": "moveObject",
                    "type": "0x1::jamiifund::Object",
                    "hasPublicTransfer": true,
                    "fields": fields
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_group() {
        let response = object(
            "0xa1",
            json!({
                "id": { "id": "0xa1" },
                "name": "Tech Professionals Savings",
                "description": "Monthly savings for developers",
                "creator": "0xc0",
                "member_count": "12",
                "max_members": 20,
                "total_balance": "5000000000",
                "min_contribution": "100000000000",
                "loan_ratio": "50",
                "kyc_required": true,
                "is_active": true,
                "created_at": "1705312800000",
                "members": ["0xc0", "0xc1"]
            }),
        );

        let group = parse_group(&response).unwrap();
        assert_eq!(group.id, "0xa1".parse().unwrap());
        assert_eq!(group.member_count, 12);
        assert_eq!(group.max_members, 20);
        assert_eq!(group.total_balance, 5_000_000_000);
        assert!(group.kyc_required);
        assert_eq!(group.category, "");
        assert_eq!(group.location, "");
        assert_eq!(group.members.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_parse_loan_with_string_and_ordinal_status() {
        let fields = |status: Value| {
            json!({
                "group_id": "0xa1",
                "borrower": "0xb0",
                "amount": "1500000000000",
                "purpose": "inventory",
                "status": status,
                "created_at": "1705312800000",
                "due_date": null
            })
        };

        let loan = parse_loan(&object("0x10", fields(json!("active")))).unwrap();
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.due_date, None);

        let loan = parse_loan(&object("0x10", fields(json!(3)))).unwrap();
        assert_eq!(loan.status, LoanStatus::Repaid);

        let loan = parse_loan(&object("0x10", fields(json!({ "variant": "Defaulted" })))).unwrap();
        assert_eq!(loan.status, LoanStatus::Defaulted);

        let err = parse_loan(&object("0x10", fields(json!("closed")))).unwrap_err();
        assert!(matches!(err, FieldError::Variant { field: "status", .. }));
    }

    #[test]
    fn test_parse_proposal_snake_cases_move_variants() {
        let response = object(
            "0x20",
            json!({
                "group_id": "0xa1",
                "proposer": "0xb0",
                "proposal_type": { "variant": "RuleChange", "fields": {} },
                "description": "raise minimum contribution",
                "votes_for": "1200",
                "votes_against": "800",
                "status": "active",
                "deadline": "1705579200000"
            }),
        );
        let proposal = parse_proposal(&response).unwrap();
        assert_eq!(proposal.proposal_type, ProposalType::RuleChange);
        assert_eq!(proposal.total_votes(), 2000);
    }

    #[test]
    fn test_parse_reports_missing_and_invalid_fields() {
        let response = object("0x30", json!({ "group_id": "0xa1" }));
        assert_eq!(parse_contribution(&response).unwrap_err(), FieldError::Missing("contributor"));

        let response = object(
            "0x30",
            json!({ "group_id": "0xa1", "contributor": "0xb0", "amount": "lots", "timestamp": 1 }),
        );
        assert!(matches!(
            parse_contribution(&response).unwrap_err(),
            FieldError::Invalid { field: "amount", .. }
        ));
    }

    #[test]
    fn test_parse_requires_move_content() {
        let response: SuiObjectResponse =
            serde_json::from_value(json!({ "data": { "objectId": "0x40" } })).unwrap();
        assert!(matches!(parse_group(&response), Err(FieldError::NotMoveObject(_))));

        let response: SuiObjectResponse =
            serde_json::from_value(json!({ "error": { "code": "notExists" } })).unwrap();
        assert_eq!(parse_group(&response).unwrap_err(), FieldError::MissingData);
    }

    #[test]
    fn test_vec_set_members() {
        let response = object(
            "0x50",
            json!({
                "members": {
                    "type": "0x2::vec_set::VecSet<address>",
                    "fields": { "contents": ["0x1"] }
                }
            }),
        );
        let (_, fields) = move_fields(&response).unwrap();
        let members = fields.optional_addresses("members").unwrap();
        assert_eq!(members, Some(vec!["0x1".parse().unwrap()]));
    }
}
