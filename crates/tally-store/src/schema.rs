//! `SQLite` schema for the log document table.

/// Applied on every open.
pub const PRAGMAS: &str = "PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;";

/// One document per log entry. `details` and `metadata` hold sanitized
/// JSON text; `user_id` stores the `'anonymous'` sentinel instead of NULL
/// so equality filters stay usable; `level_num` mirrors the level's rank
/// for indexed severity queries.
pub const CREATE_TABLES: &str = "CREATE TABLE IF NOT EXISTS logs (
    id TEXT PRIMARY KEY,
    timestamp TEXT NOT NULL,
    level TEXT NOT NULL,
    level_num INTEGER NOT NULL,
    category TEXT NOT NULL,
    action TEXT NOT NULL,
    message TEXT NOT NULL DEFAULT '',
    user_id TEXT NOT NULL DEFAULT 'anonymous',
    details TEXT,
    metadata TEXT
);
CREATE INDEX IF NOT EXISTS idx_logs_timestamp ON logs(timestamp);
CREATE INDEX IF NOT EXISTS idx_logs_level_num ON logs(level_num);
CREATE INDEX IF NOT EXISTS idx_logs_category ON logs(category);
CREATE INDEX IF NOT EXISTS idx_logs_user ON logs(user_id);";
