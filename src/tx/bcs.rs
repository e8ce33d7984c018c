//! BCS encoding for the pure argument types the contract takes.

use crate::core::error::TaisenResult;
use crate::core::ids;

pub fn u64(value: u64) -> Vec<u8> { value.to_le_bytes().to_vec() }

pub fn bool(value: bool) -> Vec<u8> { vec![u8::from(value)] }

/// `vector<u8>` / `String`: ULEB128 length, then the bytes
pub fn string(value: &str) -> Vec<u8> {
    let mut out = uleb128(value.len() as u64);
    out.extend_from_slice(value.as_bytes());
    out
}

pub fn address(value: &str) -> TaisenResult<Vec<u8>> { Ok(ids::to_bytes(value)?.to_vec()) }

fn uleb128(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(2);
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}
