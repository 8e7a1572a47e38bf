/// Identifiers are PostgreSQL BIGSERIAL values (items) or foreign ids handed
/// to us by the identity and space services (users, spaces, blocks).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
