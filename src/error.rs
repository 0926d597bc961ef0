//! Error types for the simulation core
//!
//! Context operations never fail (out-of-envelope access degrades to sentinels),
//! so the only hard failures are data/configuration errors.

use thiserror::Error;

/// Errors surfaced by material construction and level persistence.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown material type: {0:?}")]
    UnknownMaterial(String),

    #[error("level I/O failed: {0}")]
    LevelIo(#[from] std::io::Error),

    #[error("failed to encode level: {0}")]
    LevelEncode(#[from] ron::Error),

    #[error("failed to decode level: {0}")]
    LevelDecode(#[from] ron::error::SpannedError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_material_message() {
        let err = SimError::UnknownMaterial("Plasma".to_string());
        assert_eq!(err.to_string(), "unknown material type: \"Plasma\"");
    }
}
