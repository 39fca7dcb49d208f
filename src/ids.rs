// Opaque id generation for bookings and freshly registered identities

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

// `{prefix}-{unix millis}-{sequence}`; the process-wide sequence keeps ids
// unique even when several are generated within the same millisecond
pub fn generate_id(prefix: &str) -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_within_a_burst() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_id("booking")).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_id_carries_prefix() {
        assert!(generate_id("user-new").starts_with("user-new-"));
    }
}
