//! Utility functions for id generation and timestamp handling.

pub mod timestamps;
mod uuid_utils;

pub use timestamps::{clock_timestamp, format_clock, now_utc, Timestamp};
pub use uuid_utils::generate_uuid;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uuid_is_valid() {
        let id = generate_uuid();
        assert_eq!(id.get_version_num(), 4);
    }
}
