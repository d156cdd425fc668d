use uuid::Uuid;

/// Short display-only transaction id: the first 8 hex digits of a v4 UUID,
/// uppercased. These ids exist for humans reading chat messages; uniqueness
/// is not enforced anywhere.
pub fn transaction_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_shape() {
        let id = transaction_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, id.to_uppercase());
    }

    #[test]
    fn test_ids_vary() {
        assert_ne!(transaction_id(), transaction_id());
    }
}
