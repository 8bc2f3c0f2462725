//! Canonical CBOR encoding for deterministic payloads.
//!
//! Follows RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are u64 milliseconds)
//!
//! Arrays keep insertion order, so commands and signatures appear in the
//! order they were appended. Decoding rejects any input that does not
//! re-encode to exactly the same bytes.

use ciborium::value::Value;

use crate::command::{Command, CommandKind};
use crate::crypto::{PublicKey, Sha3Hash, Signature};
use crate::error::CoreError;
use crate::query::{Query, QueryKind, QueryRequest};
use crate::signed::SignatureEntry;
use crate::transaction::Transaction;
use crate::types::Envelope;

/// Current payload format version.
pub const PAYLOAD_VERSION: u64 = 1;

/// Payload field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const VERSION: u64 = 0;
    pub const CREATOR: u64 = 1;
    pub const CREATED_TIME: u64 = 2;
    /// Quorum for transactions, counter for queries.
    pub const SEQUENCE: u64 = 3;
    /// Command list for transactions, request map for queries.
    pub const BODY: u64 = 4;

    /// Variant tag inside a command or request map. Fields follow from 1.
    pub const KIND: u64 = 0;

    pub const SIGNED_PAYLOAD: u64 = 1;
    pub const SIGNED_HASH: u64 = 2;
    pub const SIGNED_SIGNATURES: u64 = 3;

    pub const SIG_PUBLIC_KEY: u64 = 0;
    pub const SIG_SIGNATURE: u64 = 1;
}

/// Encode a transaction to its canonical payload bytes.
pub fn transaction_payload(tx: &Transaction) -> Vec<u8> {
    let commands = tx.commands().iter().map(command_to_value).collect();
    let value = envelope_map(
        tx.envelope(),
        u64::from(tx.quorum()),
        Value::Array(commands),
    );
    encode_cbor_value_canonical(&value)
}

/// Encode a query to its canonical payload bytes.
pub fn query_payload(query: &Query) -> Vec<u8> {
    let value = envelope_map(query.envelope(), query.counter(), request_to_value(query.request()));
    encode_cbor_value_canonical(&value)
}

/// Encode a signed artifact: payload, its digest, and the signature list.
pub fn signed_bytes(payload: &[u8], hash: &Sha3Hash, signatures: &[SignatureEntry]) -> Vec<u8> {
    let sigs = signatures
        .iter()
        .map(|entry| {
            Value::Map(vec![
                (uint(keys::SIG_PUBLIC_KEY), bytes(entry.public_key.as_bytes())),
                (uint(keys::SIG_SIGNATURE), bytes(entry.signature.as_bytes())),
            ])
        })
        .collect();

    let value = Value::Map(vec![
        (uint(keys::VERSION), uint(PAYLOAD_VERSION)),
        (uint(keys::SIGNED_PAYLOAD), bytes(payload)),
        (uint(keys::SIGNED_HASH), bytes(hash.as_bytes())),
        (uint(keys::SIGNED_SIGNATURES), Value::Array(sigs)),
    ]);
    encode_cbor_value_canonical(&value)
}

fn envelope_map(envelope: &Envelope, sequence: u64, body: Value) -> Value {
    Value::Map(vec![
        (uint(keys::VERSION), uint(PAYLOAD_VERSION)),
        (uint(keys::CREATOR), text(&envelope.creator_account_id)),
        (uint(keys::CREATED_TIME), uint(envelope.created_time)),
        (uint(keys::SEQUENCE), uint(sequence)),
        (uint(keys::BODY), body),
    ])
}

/// Build a variant map: key 0 is the tag, fields follow from key 1.
fn variant(tag: u16, fields: Vec<Value>) -> Value {
    let mut entries = Vec::with_capacity(fields.len() + 1);
    entries.push((uint(keys::KIND), uint(u64::from(tag))));
    for (i, field) in fields.into_iter().enumerate() {
        entries.push((uint(i as u64 + 1), field));
    }
    Value::Map(entries)
}

fn command_to_value(command: &Command) -> Value {
    let tag = command.kind().to_u16();
    let fields = match command {
        Command::AddPeer {
            address,
            public_key,
        } => vec![text(address), bytes(public_key)],
        Command::AddSignatory {
            account_id,
            public_key,
        }
        | Command::RemoveSignatory {
            account_id,
            public_key,
        } => vec![text(account_id), bytes(public_key)],
        Command::CreateAccount {
            account_name,
            domain_id,
            public_key,
        } => vec![text(account_name), text(domain_id), bytes(public_key)],
        Command::CreateDomain {
            domain_id,
            default_role,
        } => vec![text(domain_id), text(default_role)],
        Command::CreateAsset {
            asset_name,
            domain_id,
            precision,
        } => vec![text(asset_name), text(domain_id), uint(u64::from(*precision))],
        Command::CreateRole {
            role_name,
            permissions,
        } => vec![
            text(role_name),
            Value::Array(permissions.iter().map(|p| text(p)).collect()),
        ],
        Command::AddAssetQuantity {
            account_id,
            asset_id,
            amount,
        }
        | Command::SubtractAssetQuantity {
            account_id,
            asset_id,
            amount,
        } => vec![text(account_id), text(asset_id), text(amount)],
        Command::TransferAsset {
            src_account_id,
            dest_account_id,
            asset_id,
            description,
            amount,
        } => vec![
            text(src_account_id),
            text(dest_account_id),
            text(asset_id),
            text(description),
            text(amount),
        ],
        Command::SetAccountDetail {
            account_id,
            key,
            value,
        } => vec![text(account_id), text(key), text(value)],
        Command::SetAccountQuorum { account_id, quorum } => {
            vec![text(account_id), uint(u64::from(*quorum))]
        }
        Command::AppendRole {
            account_id,
            role_name,
        }
        | Command::DetachRole {
            account_id,
            role_name,
        } => vec![text(account_id), text(role_name)],
        Command::GrantPermission {
            account_id,
            permission,
        }
        | Command::RevokePermission {
            account_id,
            permission,
        } => vec![text(account_id), text(permission)],
    };
    variant(tag, fields)
}

fn request_to_value(request: &QueryRequest) -> Value {
    let tag = request.kind().to_u16();
    let fields = match request {
        QueryRequest::GetAccount { account_id }
        | QueryRequest::GetSignatories { account_id }
        | QueryRequest::GetAccountTransactions { account_id } => vec![text(account_id)],
        QueryRequest::GetAccountAssetTransactions {
            account_id,
            asset_id,
        }
        | QueryRequest::GetAccountAssets {
            account_id,
            asset_id,
        } => vec![text(account_id), text(asset_id)],
        QueryRequest::GetAccountDetail { account_id, key } => {
            let key = match key {
                Some(k) => text(k),
                None => Value::Null,
            };
            vec![text(account_id), key]
        }
        QueryRequest::GetRoles => Vec::new(),
        QueryRequest::GetRolePermissions { role_id } => vec![text(role_id)],
        QueryRequest::GetAssetInfo { asset_id } => vec![text(asset_id)],
        QueryRequest::GetTransactions { hashes } => {
            vec![Value::Array(hashes.iter().map(|h| bytes(h)).collect())]
        }
    };
    variant(tag, fields)
}

fn uint(n: u64) -> Value {
    Value::Integer(n.into())
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn bytes(b: &[u8]) -> Value {
    Value::Bytes(b.to_vec())
}

/// Encode a CBOR Value to canonical bytes.
fn encode_cbor_value_canonical(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value);
    buf
}

/// Recursively encode a CBOR value.
///
/// Only values built from typed transactions and queries reach here.
/// Decoding re-encodes from the typed value, so floats and tags read off
/// the wire are rejected by the byte comparison and never encoded.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr),
        Value::Map(entries) => encode_map_canonical(buf, entries),
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Float(_) => panic!("floats not supported in canonical encoding"),
        Value::Tag(..) => panic!("tags not supported in canonical encoding"),
        _ => panic!("unsupported CBOR value type"),
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n = i128::from(i);

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item);
    }
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, key_value_pairs.len() as u64);
    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a transaction from canonical payload bytes.
///
/// The result is structurally sound but not field-validated; run it through
/// [`crate::validation::FieldValidator`] before trusting it.
pub fn decode_transaction(bytes: &[u8]) -> Result<Transaction, CoreError> {
    let value = read_value(bytes)?;
    let map = MapReader::new(&value, "transaction")?;
    let (envelope, quorum) = read_envelope(&map)?;
    let quorum = u32::try_from(quorum)
        .map_err(|_| CoreError::MalformedPayload(format!("quorum {} out of range", quorum)))?;

    let commands = map
        .array(keys::BODY)?
        .iter()
        .map(value_to_command)
        .collect::<Result<Vec<_>, _>>()?;

    let tx = Transaction::new(envelope, quorum, commands);
    ensure_canonical(bytes, &transaction_payload(&tx))?;
    Ok(tx)
}

/// Decode a query from canonical payload bytes.
pub fn decode_query(bytes: &[u8]) -> Result<Query, CoreError> {
    let value = read_value(bytes)?;
    let map = MapReader::new(&value, "query")?;
    let (envelope, counter) = read_envelope(&map)?;
    let request = value_to_request(map.value(keys::BODY)?)?;

    let query = Query::new(envelope, counter, request);
    ensure_canonical(bytes, &query_payload(&query))?;
    Ok(query)
}

/// Decoded parts of a signed artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParts {
    pub payload: Vec<u8>,
    pub hash: Sha3Hash,
    pub signatures: Vec<SignatureEntry>,
}

/// Decode a signed artifact into its parts.
///
/// Checks that the carried digest matches the payload. Signatures are not
/// verified here.
pub fn decode_signed(bytes: &[u8]) -> Result<SignedParts, CoreError> {
    let value = read_value(bytes)?;
    let map = MapReader::new(&value, "signed artifact")?;
    check_version(&map)?;

    let payload = map.bytes(keys::SIGNED_PAYLOAD)?.to_vec();
    let hash_bytes: [u8; 32] = map
        .bytes(keys::SIGNED_HASH)?
        .try_into()
        .map_err(|_| CoreError::MalformedPayload("hash must be 32 bytes".into()))?;
    let hash = Sha3Hash::from_bytes(hash_bytes);
    if hash != Sha3Hash::hash(&payload) {
        return Err(CoreError::MalformedPayload(
            "hash does not match payload".into(),
        ));
    }

    let mut signatures = Vec::new();
    for item in map.array(keys::SIGNED_SIGNATURES)? {
        let entry = MapReader::new(item, "signature")?;
        signatures.push(SignatureEntry {
            public_key: PublicKey::from_slice(entry.bytes(keys::SIG_PUBLIC_KEY)?)?,
            signature: Signature::from_slice(entry.bytes(keys::SIG_SIGNATURE)?)?,
        });
    }

    ensure_canonical(bytes, &signed_bytes(&payload, &hash, &signatures))?;
    Ok(SignedParts {
        payload,
        hash,
        signatures,
    })
}

fn read_value(bytes: &[u8]) -> Result<Value, CoreError> {
    let cursor = std::io::Cursor::new(bytes);
    ciborium::from_reader(cursor).map_err(|e| CoreError::DecodingError(e.to_string()))
}

fn ensure_canonical(input: &[u8], reencoded: &[u8]) -> Result<(), CoreError> {
    if input == reencoded {
        Ok(())
    } else {
        Err(CoreError::NonCanonical)
    }
}

fn check_version(map: &MapReader<'_>) -> Result<(), CoreError> {
    let version = map.uint(keys::VERSION)?;
    if version != PAYLOAD_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }
    Ok(())
}

fn read_envelope(map: &MapReader<'_>) -> Result<(Envelope, u64), CoreError> {
    check_version(map)?;
    let envelope = Envelope::new(map.text(keys::CREATOR)?, map.uint(keys::CREATED_TIME)?);
    Ok((envelope, map.uint(keys::SEQUENCE)?))
}

fn value_to_command(value: &Value) -> Result<Command, CoreError> {
    let m = MapReader::new(value, "command")?;
    let tag = m.uint(keys::KIND)?;
    let kind = u16::try_from(tag)
        .ok()
        .and_then(CommandKind::from_u16)
        .ok_or_else(|| CoreError::MalformedPayload(format!("unknown command kind: {}", tag)))?;

    let command = match kind {
        CommandKind::AddPeer => Command::AddPeer {
            address: m.text(1)?,
            public_key: m.bytes(2)?.to_vec(),
        },
        CommandKind::AddSignatory => Command::AddSignatory {
            account_id: m.text(1)?,
            public_key: m.bytes(2)?.to_vec(),
        },
        CommandKind::RemoveSignatory => Command::RemoveSignatory {
            account_id: m.text(1)?,
            public_key: m.bytes(2)?.to_vec(),
        },
        CommandKind::CreateAccount => Command::CreateAccount {
            account_name: m.text(1)?,
            domain_id: m.text(2)?,
            public_key: m.bytes(3)?.to_vec(),
        },
        CommandKind::CreateDomain => Command::CreateDomain {
            domain_id: m.text(1)?,
            default_role: m.text(2)?,
        },
        CommandKind::CreateAsset => Command::CreateAsset {
            asset_name: m.text(1)?,
            domain_id: m.text(2)?,
            precision: m.small_uint(3)?,
        },
        CommandKind::CreateRole => Command::CreateRole {
            role_name: m.text(1)?,
            permissions: m
                .array(2)?
                .iter()
                .map(|v| as_text(v, "permission"))
                .collect::<Result<_, _>>()?,
        },
        CommandKind::AddAssetQuantity => Command::AddAssetQuantity {
            account_id: m.text(1)?,
            asset_id: m.text(2)?,
            amount: m.text(3)?,
        },
        CommandKind::SubtractAssetQuantity => Command::SubtractAssetQuantity {
            account_id: m.text(1)?,
            asset_id: m.text(2)?,
            amount: m.text(3)?,
        },
        CommandKind::TransferAsset => Command::TransferAsset {
            src_account_id: m.text(1)?,
            dest_account_id: m.text(2)?,
            asset_id: m.text(3)?,
            description: m.text(4)?,
            amount: m.text(5)?,
        },
        CommandKind::SetAccountDetail => Command::SetAccountDetail {
            account_id: m.text(1)?,
            key: m.text(2)?,
            value: m.text(3)?,
        },
        CommandKind::SetAccountQuorum => Command::SetAccountQuorum {
            account_id: m.text(1)?,
            quorum: m.small_uint(2)?,
        },
        CommandKind::AppendRole => Command::AppendRole {
            account_id: m.text(1)?,
            role_name: m.text(2)?,
        },
        CommandKind::DetachRole => Command::DetachRole {
            account_id: m.text(1)?,
            role_name: m.text(2)?,
        },
        CommandKind::GrantPermission => Command::GrantPermission {
            account_id: m.text(1)?,
            permission: m.text(2)?,
        },
        CommandKind::RevokePermission => Command::RevokePermission {
            account_id: m.text(1)?,
            permission: m.text(2)?,
        },
    };
    Ok(command)
}

fn value_to_request(value: &Value) -> Result<QueryRequest, CoreError> {
    let m = MapReader::new(value, "query request")?;
    let tag = m.uint(keys::KIND)?;
    let kind = u16::try_from(tag)
        .ok()
        .and_then(QueryKind::from_u16)
        .ok_or_else(|| CoreError::MalformedPayload(format!("unknown query kind: {}", tag)))?;

    let request = match kind {
        QueryKind::GetAccount => QueryRequest::GetAccount {
            account_id: m.text(1)?,
        },
        QueryKind::GetSignatories => QueryRequest::GetSignatories {
            account_id: m.text(1)?,
        },
        QueryKind::GetAccountTransactions => QueryRequest::GetAccountTransactions {
            account_id: m.text(1)?,
        },
        QueryKind::GetAccountAssetTransactions => QueryRequest::GetAccountAssetTransactions {
            account_id: m.text(1)?,
            asset_id: m.text(2)?,
        },
        QueryKind::GetAccountAssets => QueryRequest::GetAccountAssets {
            account_id: m.text(1)?,
            asset_id: m.text(2)?,
        },
        QueryKind::GetAccountDetail => QueryRequest::GetAccountDetail {
            account_id: m.text(1)?,
            key: match m.value(2)? {
                Value::Null => None,
                other => Some(as_text(other, "detail key")?),
            },
        },
        QueryKind::GetRoles => QueryRequest::GetRoles,
        QueryKind::GetRolePermissions => QueryRequest::GetRolePermissions {
            role_id: m.text(1)?,
        },
        QueryKind::GetAssetInfo => QueryRequest::GetAssetInfo {
            asset_id: m.text(1)?,
        },
        QueryKind::GetTransactions => QueryRequest::GetTransactions {
            hashes: m
                .array(1)?
                .iter()
                .map(|v| match v {
                    Value::Bytes(b) => Ok(b.clone()),
                    _ => Err(CoreError::MalformedPayload("hash must be bytes".into())),
                })
                .collect::<Result<_, _>>()?,
        },
    };
    Ok(request)
}

fn as_text(value: &Value, what: &str) -> Result<String, CoreError> {
    match value {
        Value::Text(s) => Ok(s.clone()),
        _ => Err(CoreError::MalformedPayload(format!("{} must be text", what))),
    }
}

/// Typed access to an integer-keyed CBOR map.
struct MapReader<'a> {
    what: &'static str,
    entries: &'a [(Value, Value)],
}

impl<'a> MapReader<'a> {
    fn new(value: &'a Value, what: &'static str) -> Result<Self, CoreError> {
        match value {
            Value::Map(entries) => Ok(Self { what, entries }),
            _ => Err(CoreError::MalformedPayload(format!("{}: expected map", what))),
        }
    }

    fn value(&self, key: u64) -> Result<&'a Value, CoreError> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))
            .map(|(_, v)| v)
            .ok_or_else(|| self.invalid(key))
    }

    fn invalid(&self, key: u64) -> CoreError {
        CoreError::MalformedPayload(format!("{}: missing or invalid field {}", self.what, key))
    }

    fn uint(&self, key: u64) -> Result<u64, CoreError> {
        match self.value(key)? {
            Value::Integer(i) => u64::try_from(*i).map_err(|_| self.invalid(key)),
            _ => Err(self.invalid(key)),
        }
    }

    fn small_uint<T: TryFrom<u64>>(&self, key: u64) -> Result<T, CoreError> {
        T::try_from(self.uint(key)?).map_err(|_| self.invalid(key))
    }

    fn text(&self, key: u64) -> Result<String, CoreError> {
        match self.value(key)? {
            Value::Text(s) => Ok(s.clone()),
            _ => Err(self.invalid(key)),
        }
    }

    fn bytes(&self, key: u64) -> Result<&'a [u8], CoreError> {
        match self.value(key)? {
            Value::Bytes(b) => Ok(b.as_slice()),
            _ => Err(self.invalid(key)),
        }
    }

    fn array(&self, key: u64) -> Result<&'a [Value], CoreError> {
        match self.value(key)? {
            Value::Array(a) => Ok(a.as_slice()),
            _ => Err(self.invalid(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use proptest::prelude::*;

    fn sample_tx() -> Transaction {
        let pk = Keypair::from_seed(&[3u8; 32]).public_key();
        Transaction::new(
            Envelope::new("admin@test", 1_700_000_000_000),
            2,
            vec![
                Command::CreateDomain {
                    domain_id: "test".into(),
                    default_role: "user".into(),
                },
                Command::CreateAccount {
                    account_name: "alice".into(),
                    domain_id: "test".into(),
                    public_key: pk.as_bytes().to_vec(),
                },
                Command::CreateRole {
                    role_name: "reader".into(),
                    permissions: vec!["can_read_assets".into(), "can_get_roles".into()],
                },
                Command::TransferAsset {
                    src_account_id: "admin@test".into(),
                    dest_account_id: "alice@test".into(),
                    asset_id: "coin#test".into(),
                    description: "payday".into(),
                    amount: "10.50".into(),
                },
                Command::SetAccountQuorum {
                    account_id: "alice@test".into(),
                    quorum: 3,
                },
            ],
        )
    }

    #[test]
    fn test_transaction_roundtrip() {
        let tx = sample_tx();
        let bytes = transaction_payload(&tx);
        let decoded = decode_transaction(&bytes).unwrap();
        assert_eq!(tx, decoded);
    }

    #[test]
    fn test_query_roundtrip_with_optional_key() {
        for key in [None, Some("age".to_string())] {
            let q = Query::new(
                Envelope::new("admin@test", 42),
                7,
                QueryRequest::GetAccountDetail {
                    account_id: "alice@test".into(),
                    key,
                },
            );
            let decoded = decode_query(&query_payload(&q)).unwrap();
            assert_eq!(q, decoded);
        }
    }

    #[test]
    fn test_canonical_deterministic() {
        let tx = sample_tx();
        assert_eq!(transaction_payload(&tx), transaction_payload(&tx.clone()));
    }

    #[test]
    fn test_command_order_is_preserved() {
        let tx = sample_tx();
        let mut reversed = tx.commands().to_vec();
        reversed.reverse();
        let other = Transaction::new(tx.envelope().clone(), tx.quorum(), reversed);
        assert_ne!(transaction_payload(&tx), transaction_payload(&other));
    }

    #[test]
    fn test_map_keys_sorted() {
        let entries = vec![(uint(3), uint(1)), (uint(0), uint(2)), (uint(1), uint(3))];
        let bytes = encode_cbor_value_canonical(&Value::Map(entries));
        // a3 = map(3), keys 00, 01, 03 in order
        assert_eq!(bytes, vec![0xa3, 0x00, 0x02, 0x01, 0x03, 0x03, 0x01]);
    }

    #[test]
    fn test_integer_encoding_minimal() {
        let mut buf = Vec::new();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 0x18]);

        buf.clear();
        encode_uint(&mut buf, 0, 1_700_000_000_000);
        assert_eq!(buf[0], 0x1b);
        assert_eq!(buf.len(), 9);
    }

    #[test]
    fn test_reject_non_canonical() {
        let tx = sample_tx();
        let mut bytes = transaction_payload(&tx);
        // Trailing garbage does not re-encode to the same bytes.
        bytes.push(0x00);
        assert_eq!(decode_transaction(&bytes), Err(CoreError::NonCanonical));
    }

    #[test]
    fn test_reject_unsorted_map() {
        // {1: "a@b", 0: 1, ...} is well-formed CBOR but not canonical.
        let value = Value::Map(vec![
            (uint(keys::CREATOR), text("a@b")),
            (uint(keys::VERSION), uint(PAYLOAD_VERSION)),
            (uint(keys::CREATED_TIME), uint(1)),
            (uint(keys::SEQUENCE), uint(1)),
            (uint(keys::BODY), Value::Array(vec![])),
        ]);
        let mut bytes = Vec::new();
        ciborium::into_writer(&value, &mut bytes).unwrap();
        assert_eq!(decode_transaction(&bytes), Err(CoreError::NonCanonical));
    }

    #[test]
    fn test_reject_wrong_version() {
        let value = Value::Map(vec![
            (uint(keys::VERSION), uint(99)),
            (uint(keys::CREATOR), text("a@b")),
            (uint(keys::CREATED_TIME), uint(1)),
            (uint(keys::SEQUENCE), uint(1)),
            (uint(keys::BODY), Value::Array(vec![])),
        ]);
        let bytes = encode_cbor_value_canonical(&value);
        assert_eq!(
            decode_transaction(&bytes),
            Err(CoreError::UnsupportedVersion(99))
        );
    }

    #[test]
    fn test_reject_unknown_command_kind() {
        let value = Value::Map(vec![
            (uint(keys::VERSION), uint(PAYLOAD_VERSION)),
            (uint(keys::CREATOR), text("a@b")),
            (uint(keys::CREATED_TIME), uint(1)),
            (uint(keys::SEQUENCE), uint(1)),
            (uint(keys::BODY), Value::Array(vec![variant(0x7777, vec![])])),
        ]);
        let bytes = encode_cbor_value_canonical(&value);
        assert!(matches!(
            decode_transaction(&bytes),
            Err(CoreError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_reject_float_field() {
        let mut value = read_value(&transaction_payload(&sample_tx())).unwrap();
        if let Value::Map(entries) = &mut value {
            entries.push((uint(5), Value::Float(1.5)));
        }
        let mut bytes = Vec::new();
        ciborium::into_writer(&value, &mut bytes).unwrap();
        assert!(decode_transaction(&bytes).is_err());
    }

    #[test]
    #[should_panic(expected = "floats not supported")]
    fn test_encode_float_panics() {
        encode_cbor_value_canonical(&Value::Float(0.5));
    }

    #[test]
    fn test_reject_garbage() {
        assert!(decode_transaction(&[]).is_err());
        assert!(decode_transaction(&[0xff, 0x00]).is_err());
        assert!(decode_query(b"not cbor at all").is_err());
    }

    #[test]
    fn test_signed_roundtrip() {
        let tx = sample_tx();
        let payload = transaction_payload(&tx);
        let hash = Sha3Hash::hash(&payload);
        let kp = Keypair::from_seed(&[9u8; 32]);
        let sigs = vec![SignatureEntry {
            public_key: kp.public_key(),
            signature: kp.sign(hash.as_bytes()),
        }];
        let bytes = signed_bytes(&payload, &hash, &sigs);
        let parts = decode_signed(&bytes).unwrap();
        assert_eq!(parts.payload, payload);
        assert_eq!(parts.hash, hash);
        assert_eq!(parts.signatures, sigs);
    }

    #[test]
    fn test_signed_hash_mismatch() {
        let payload = transaction_payload(&sample_tx());
        let wrong = Sha3Hash::hash(b"something else");
        let bytes = signed_bytes(&payload, &wrong, &[]);
        assert!(matches!(
            decode_signed(&bytes),
            Err(CoreError::MalformedPayload(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_amount_text_roundtrip(amount in "[0-9]{0,10}\\.?[0-9]{1,10}", ts in any::<u64>()) {
            let tx = Transaction::new(
                Envelope::new("admin@test", ts),
                1,
                vec![Command::AddAssetQuantity {
                    account_id: "admin@test".into(),
                    asset_id: "coin#test".into(),
                    amount,
                }],
            );
            let decoded = decode_transaction(&transaction_payload(&tx)).unwrap();
            prop_assert_eq!(tx, decoded);
        }
    }
}
