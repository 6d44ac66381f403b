//! Time helpers
//!
//! All persisted timestamps are Unix millis. Repositories stamp rows
//! themselves; handlers never pass wall-clock values in.

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_recent() {
        // sanity bound: after 2020-01-01 and before 2100-01-01
        let now = now_millis();
        assert!(now > 1_577_836_800_000);
        assert!(now < 4_102_444_800_000);
    }
}
