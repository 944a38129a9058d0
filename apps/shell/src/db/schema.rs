//! SQLite schema definitions.

/// Key under which the current deck is stored.
pub const DECK_KEY: &str = "qaData";

/// Single key-value object store.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS qa_store (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
