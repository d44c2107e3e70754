//! Outbox event-key derivation, delivery status names, and retry backoff.
//!
//! The event key makes enqueues idempotent: the same (deal, emission instant)
//! pair always derives the same key, and the outbox table enforces
//! `UNIQUE (automation_id, event_key)`. Re-running an emission therefore
//! inserts nothing new.

/// Delivery not yet attempted, or waiting for its next retry window.
pub const STATUS_PENDING: &str = "pending";
/// Delivered with an HTTP 2xx response.
pub const STATUS_SENT: &str = "sent";
/// All attempts exhausted without a 2xx response.
pub const STATUS_FAILED: &str = "failed";

/// Total delivery attempts per outbox record (first try plus retries).
pub const MAX_DELIVERY_ATTEMPTS: i16 = 4;

/// Backoff applied after each failed attempt, in seconds.
pub const RETRY_BACKOFF_SECS: [i64; 3] = [60, 300, 1500];

/// Derive the idempotency key for an event emitted for `entity_id` at
/// `emitted_at_ms` (Unix milliseconds). 16 lowercase hex characters.
pub fn event_key(entity_id: i64, emitted_at_ms: i64) -> String {
    let input = format!("{entity_id}:{emitted_at_ms}");
    format!("{:016x}", fnv1a64(input.as_bytes()))
}

/// Delay before the next attempt given how many attempts have been made,
/// or `None` when the record is out of attempts.
pub fn retry_delay_secs(attempts_made: i16) -> Option<i64> {
    if attempts_made >= MAX_DELIVERY_ATTEMPTS {
        return None;
    }
    let idx = (attempts_made.max(1) - 1) as usize;
    Some(RETRY_BACKOFF_SECS[idx.min(RETRY_BACKOFF_SECS.len() - 1)])
}

/// FNV-1a, 64-bit.
fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET_BASIS;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_key_is_deterministic() {
        let a = event_key(42, 1_760_000_000_000);
        let b = event_key(42, 1_760_000_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn event_key_varies_with_entity_and_instant() {
        let base = event_key(42, 1_760_000_000_000);
        assert_ne!(base, event_key(43, 1_760_000_000_000));
        assert_ne!(base, event_key(42, 1_760_000_000_001));
    }

    #[test]
    fn event_key_is_sixteen_hex_chars() {
        let key = event_key(7, 123_456_789);
        assert_eq!(key.len(), 16);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn fnv1a64_matches_known_vectors() {
        // Reference values for the 64-bit FNV-1a test vectors.
        assert_eq!(fnv1a64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a64(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a64(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn backoff_schedule_escalates_then_stops() {
        assert_eq!(retry_delay_secs(1), Some(60));
        assert_eq!(retry_delay_secs(2), Some(300));
        assert_eq!(retry_delay_secs(3), Some(1500));
        assert_eq!(retry_delay_secs(4), None);
        assert_eq!(retry_delay_secs(9), None);
    }
}
