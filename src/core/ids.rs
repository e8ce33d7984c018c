//! Sui object ids and addresses.
//!
//! Both are 32-byte values written as `0x` + hex. The chain accepts short
//! forms (`0x2`), so comparisons go through [`normalize`].

use crate::core::error::{TaisenError, TaisenResult};

const ID_HEX_LEN: usize = 64;

/// Normalize to `0x` + 64 lowercase hex digits.
pub fn normalize(id: &str) -> TaisenResult<String> {
    let trimmed = id.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if body.is_empty() || body.len() > ID_HEX_LEN {
        return Err(TaisenError::InvalidInput(format!("bad object id length: {}", id)));
    }
    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TaisenError::InvalidInput(format!("bad object id: {}", id)));
    }
    Ok(format!("0x{:0>64}", body.to_ascii_lowercase()))
}

/// Raw 32 bytes of an id or address.
pub fn to_bytes(id: &str) -> TaisenResult<[u8; 32]> {
    let normalized = normalize(id)?;
    let raw = hex::decode(&normalized[2..]).map_err(|e| TaisenError::InvalidInput(e.to_string()))?;
    raw.try_into()
        .map_err(|_| TaisenError::InvalidInput(format!("bad object id: {}", id)))
}

/// Loose equality: both sides normalized, unparsable ids compare verbatim.
pub fn same(a: &str, b: &str) -> bool {
    match (normalize(a), normalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// `0x1234...abcd`; short values pass through unchanged.
pub fn truncate(address: &str) -> String {
    if address.len() < 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_short_ids() {
        assert_eq!(normalize("0x2").unwrap(), format!("0x{}2", "0".repeat(63)));
        assert_eq!(normalize("0xAB").unwrap(), format!("0x{}ab", "0".repeat(62)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(normalize("").is_err());
        assert!(normalize("0x").is_err());
        assert!(normalize("0xzz").is_err());
        assert!(normalize(&format!("0x{}", "a".repeat(65))).is_err());
    }

    #[test]
    fn same_ignores_padding_and_case() {
        assert!(same("0x2", &format!("0x{}2", "0".repeat(63))));
        assert!(same("0xABC", "0xabc"));
        assert!(!same("0x1", "0x2"));
    }

    #[test]
    fn truncates_long_addresses() {
        let addr = format!("0x{}", "ab".repeat(32));
        assert_eq!(truncate(&addr), "0xabab...abab");
        assert_eq!(truncate("0x1234"), "0x1234");
    }

    #[test]
    fn bytes_are_big_endian_padded() {
        let bytes = to_bytes("0x2").unwrap();
        assert_eq!(bytes[31], 2);
        assert!(bytes[..31].iter().all(|b| *b == 0));
    }
}
