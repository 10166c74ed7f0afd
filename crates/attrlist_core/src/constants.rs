//! Shared constants used across attrlist crates.

/// Environment variable naming the attribute document path.
pub const ENV_DOC_PATH: &str = "ATTRLIST_DOC_PATH";
/// Environment variable naming the optional schema file.
pub const ENV_SCHEMA_PATH: &str = "ATTRLIST_SCHEMA_PATH";
/// Environment flag enabling a backup copy before each document write.
pub const ENV_AUTO_BACKUP: &str = "ATTRLIST_AUTO_BACKUP";
/// Environment flag enabling strict schema validation.
pub const ENV_STRICT: &str = "ATTRLIST_STRICT";

/// Default document file name inside the cache directory.
pub const DEFAULT_DOC_FILE_NAME: &str = "attributes.json";

/// Extension appended to the document path for its advisory lock file.
pub const DOC_LOCK_EXTENSION: &str = "lock";
/// Extension appended to the document path for in-flight writes.
pub const DOC_TMP_EXTENSION: &str = "tmp";

/// Default first number assigned by renumbering.
pub const DEFAULT_RENUMBER_START: usize = 1;
/// Default zero-padding width used by renumbering (`01`, `02`, ...).
pub const DEFAULT_RENUMBER_WIDTH: usize = 2;
/// Largest zero-padding width a renumbering may request.
pub const MAX_RENUMBER_WIDTH: usize = 32;
