use sha2::{Digest, Sha256};
use totalline_label::ReceiptRecord;

/// Encode a raw 32-byte hash as a lowercase hex string (64 chars).
pub fn to_hex(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Content key of a record: SHA-256 over the OCR text and total.
///
/// Fields are length-prefixed so `("ab", "c")` and `("a", "bc")` hash differently.
pub fn record_key(record: &ReceiptRecord) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for field in [&record.ocr_text, &record.total] {
        hasher.update((field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }
    hasher.finalize().into()
}
