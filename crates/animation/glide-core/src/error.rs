//! Error types for registration and configuration.
//!
//! Only configuration-time problems are errors. Anything that goes wrong
//! while ticking (stale targets, unsupported kinds) is absorbed per record.

use crate::ids::TargetId;
use crate::value::ValueKind;

/// Configuration and registration errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GlideError {
    /// Target is not (or no longer) valid at registration time.
    #[error("Invalid target: {target:?}")]
    InvalidTarget { target: TargetId },

    /// Records must name the property they drive.
    #[error("Record has an empty property identifier")]
    EmptyProperty,

    /// The target does not expose the requested property.
    #[error("Unknown property '{property}' on target {target:?}")]
    UnknownProperty { target: TargetId, property: String },

    /// A record needs at least one segment to play.
    #[error("Record has no segments")]
    NoSegments,

    /// Start/end kinds disagree, or disagree with the rest of the record.
    #[error("Value kind mismatch in segment {segment}: expected {expected:?}, got {actual:?}")]
    KindMismatch {
        segment: usize,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Refused under the Ignore conflict policy.
    #[error("Property '{property}' on target {target:?} is already animated")]
    Conflict { target: TargetId, property: String },

    /// The easing lookup table was torn down and not rebuilt.
    #[error("Easing table is not initialized")]
    EasingNotInitialized,

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },
}

impl GlideError {
    /// Coarse category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidTarget { .. }
            | Self::EmptyProperty
            | Self::UnknownProperty { .. }
            | Self::NoSegments
            | Self::KindMismatch { .. } => "registration",
            Self::Conflict { .. } => "conflict",
            Self::EasingNotInitialized => "easing",
            Self::InvalidConfig { .. } => "config",
        }
    }
}

impl From<serde_json::Error> for GlideError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, GlideError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(GlideError::NoSegments.category(), "registration");
        assert_eq!(
            GlideError::Conflict {
                target: TargetId(1),
                property: "x".into()
            }
            .category(),
            "conflict"
        );
        assert_eq!(GlideError::EasingNotInitialized.category(), "easing");
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err: GlideError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GlideError::InvalidConfig { .. }));
    }

    #[test]
    fn display_mentions_property() {
        let err = GlideError::UnknownProperty {
            target: TargetId(7),
            property: "alpha".into(),
        };
        assert!(err.to_string().contains("alpha"));
    }
}
