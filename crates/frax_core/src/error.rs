use thiserror::Error;

/// Failures surfaced by the framework. Nothing here is retried internally.
#[derive(Debug, Error)]
pub enum FraxError {
    /// A texture or animated image could not be read, decoded or uploaded.
    #[error("failed to load resource '{source_id}': {reason}")]
    ResourceLoad { source_id: String, reason: String },

    /// A sprite was constructed with a zero, negative or non-finite size.
    #[error("invalid sprite geometry: {width}x{height} (width and height must be finite and > 0)")]
    InvalidGeometry { width: f32, height: f32 },

    /// Window, event loop or audio device bring-up failed.
    #[error("platform error: {0}")]
    Platform(String),

    #[error("gpu error: {0}")]
    Gpu(String),

    #[error("config error: {0}")]
    Config(String),
}

impl FraxError {
    pub fn resource_load(source_id: &str, reason: impl std::fmt::Display) -> Self {
        Self::ResourceLoad {
            source_id: source_id.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = FraxError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_load_names_the_source() {
        let err = FraxError::resource_load("assets/missing.png", "not found");
        let msg = err.to_string();
        assert!(msg.contains("assets/missing.png"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn invalid_geometry_reports_dimensions() {
        let err = FraxError::InvalidGeometry {
            width: 0.0,
            height: -3.0,
        };
        assert!(err.to_string().contains("0x-3"));
    }
}
