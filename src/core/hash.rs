use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Stable identifier for a history record, derived from the record kind
/// and the normalized input so repeated submissions collapse into one row.
pub fn record_id(kind: &str, input: &str) -> String {
    let normalized = input.trim().to_lowercase();
    format!("rec_{}", sha256_hex(format!("{kind}|{normalized}").as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_ignores_case_and_surrounding_whitespace() {
        let a = record_id("text", "  O PIX será taxado ");
        let b = record_id("text", "o pix será taxado");
        assert_eq!(a, b);
    }

    #[test]
    fn record_id_separates_kinds() {
        assert_ne!(record_id("text", "x"), record_id("link", "x"));
    }
}
