use time::OffsetDateTime;

/// Current instant in UTC, the only offset stored.
pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_utc() {
        assert!(now_utc().offset().is_utc());
    }
}
