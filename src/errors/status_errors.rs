use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HealStatusError {
    // The snapshot source could not be opened or read.
    #[error("Unable to read heal status snapshot from '{0}'")]
    SnapshotUnreadable(String),

    // The snapshot was read but is not a valid background heal state.
    #[error("Malformed heal status snapshot: {0}")]
    SnapshotMalformed(String),

    // The requested storage class is neither STANDARD nor REDUCED_REDUNDANCY.
    #[error("Unknown storage class '{0}', expected STANDARD or REDUCED_REDUNDANCY")]
    UnknownStorageClass(String),

    // Parity value is not an integer nor in the `EC:<n>` scheme.
    #[error("Invalid parity value '{0}'")]
    InvalidParity(String),

    #[error("Invalid log level '{0}'")]
    InvalidLogLevel(String),

    #[error("Invalid value '{value}' for config key '{key}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("Invalid config key '{0}'")]
    InvalidConfigKey(String),
}
