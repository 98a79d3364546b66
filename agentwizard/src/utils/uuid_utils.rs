//! UUID helpers for log entries and runs.

use uuid::Uuid;

/// Generates a new UUID v4.
#[must_use]
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<Uuid> = (0..1000).map(|_| generate_uuid()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
