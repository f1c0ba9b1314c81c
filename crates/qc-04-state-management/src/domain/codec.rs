//! # Secure Account Binary Codec
//!
//! Versioned little-endian layout for the secure-account entity:
//!
//! ```text
//! [typeId:u16]?            only when serialized as a root value
//! [version:u8]             SECURE_ACCOUNT_VERSION
//! [baseVersion:u8][accountType:u16]
//! [id:str][hash:str][timestamp:u64][name:str]
//! [nextTransferAmount:u64][nextTransferTime:u64][nonce:u32]
//! ```
//!
//! Strings are a `u32` byte length followed by UTF-8 bytes. The decoder
//! rejects any version newer than it understands and checks the remaining
//! length before every read.

use shared_types::U256;

use super::{AccountType, CodecError, SecureAccount};

/// Root type identifier written ahead of a self-describing secure account.
pub const TYPE_ID_SECURE_ACCOUNT: u16 = 24;

/// Current secure-account layout version.
pub const SECURE_ACCOUNT_VERSION: u8 = 1;

/// Current base-account header version.
pub const BASE_ACCOUNT_VERSION: u8 = 1;

/// Smallest possible body after the base header: three empty strings plus
/// the fixed-width fields.
pub const MIN_SECURE_ACCOUNT_BODY: usize = 4 + 4 + 8 + 4 + 8 + 8 + 4;

/// Append-only little-endian writer.
#[derive(Debug, Default)]
pub struct BufferWriter {
    buf: Vec<u8>,
}

impl BufferWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_string(&mut self, field: &'static str, v: &str) -> Result<(), CodecError> {
        let len = u32::try_from(v.len()).map_err(|_| CodecError::ValueOutOfRange { field })?;
        self.write_u32(len);
        self.buf.extend_from_slice(v.as_bytes());
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Bounds-checked little-endian reader.
#[derive(Debug)]
pub struct BufferReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BufferReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Fail unless at least `needed` bytes are left.
    pub fn ensure(&self, needed: usize) -> Result<(), CodecError> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(CodecError::UnexpectedEnd { remaining, needed });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.take()?))
    }

    pub fn read_string(&mut self, field: &'static str) -> Result<String, CodecError> {
        let len = self.read_u32()? as usize;
        self.ensure(len)?;
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8 { field })
    }
}

/// Write `account` into `w`, prefixed with its type identifier when `root`.
pub fn serialize_secure_account(
    w: &mut BufferWriter,
    account: &SecureAccount,
    root: bool,
) -> Result<(), CodecError> {
    // Narrow first so a failed encode leaves nothing half-written.
    let amount = u64_from_u256(account.next_transfer_amount, "nextTransferAmount")?;
    let nonce = u32::try_from(account.nonce)
        .map_err(|_| CodecError::ValueOutOfRange { field: "nonce" })?;

    if root {
        w.write_u16(TYPE_ID_SECURE_ACCOUNT);
    }
    w.write_u8(SECURE_ACCOUNT_VERSION);
    w.write_u8(BASE_ACCOUNT_VERSION);
    w.write_u16(AccountType::SecureAccount.into());
    w.write_string("id", &account.id)?;
    w.write_string("hash", &account.hash)?;
    w.write_u64(account.timestamp);
    w.write_string("name", &account.name)?;
    w.write_u64(amount);
    w.write_u64(account.next_transfer_time);
    w.write_u32(nonce);
    Ok(())
}

/// Read a secure account from `r`. When `root`, the leading type identifier
/// is consumed and checked.
pub fn deserialize_secure_account(
    r: &mut BufferReader<'_>,
    root: bool,
) -> Result<SecureAccount, CodecError> {
    if root {
        let type_id = r.read_u16()?;
        if type_id != TYPE_ID_SECURE_ACCOUNT {
            return Err(CodecError::UnknownTypeIdentifier(type_id));
        }
    }

    let version = r.read_u8()?;
    if version > SECURE_ACCOUNT_VERSION {
        return Err(CodecError::VersionMismatch {
            entity: "SecureAccount",
            found: version,
            supported: SECURE_ACCOUNT_VERSION,
        });
    }

    let base_version = r.read_u8()?;
    if base_version > BASE_ACCOUNT_VERSION {
        return Err(CodecError::VersionMismatch {
            entity: "BaseAccount",
            found: base_version,
            supported: BASE_ACCOUNT_VERSION,
        });
    }
    let account_type = r.read_u16()?;
    if account_type != u16::from(AccountType::SecureAccount) {
        return Err(CodecError::UnexpectedAccountType(account_type));
    }

    r.ensure(MIN_SECURE_ACCOUNT_BODY)?;
    let id = r.read_string("id")?;
    let hash = r.read_string("hash")?;
    let timestamp = r.read_u64()?;
    let name = r.read_string("name")?;
    let next_transfer_amount = U256::from(r.read_u64()?);
    let next_transfer_time = r.read_u64()?;
    let nonce = u64::from(r.read_u32()?);

    Ok(SecureAccount {
        id,
        hash,
        timestamp,
        name,
        next_transfer_amount,
        next_transfer_time,
        nonce,
    })
}

/// Encode to a fresh buffer.
pub fn encode_secure_account(account: &SecureAccount, root: bool) -> Result<Vec<u8>, CodecError> {
    let mut w = BufferWriter::new();
    serialize_secure_account(&mut w, account, root)?;
    Ok(w.into_bytes())
}

/// Decode from a byte slice.
pub fn decode_secure_account(bytes: &[u8], root: bool) -> Result<SecureAccount, CodecError> {
    deserialize_secure_account(&mut BufferReader::new(bytes), root)
}

fn u64_from_u256(value: U256, field: &'static str) -> Result<u64, CodecError> {
    if value > U256::from(u64::MAX) {
        return Err(CodecError::ValueOutOfRange { field });
    }
    Ok(value.low_u64())
}
