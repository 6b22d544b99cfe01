//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for vote, watchlist and friendship rows.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are lexicographically sortable and shorter than UUIDs when
    /// represented as strings.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a random name for stored files.
    #[must_use]
    pub fn generate_file_name(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
