//! Terrain parameter and command errors.

/// Errors raised while interpreting terrain parameters or parameter commands.
///
/// These are configuration errors: they are reported before any generation
/// work starts, so a rejected command never touches the current terrain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// The noise selector does not name a known noise family.
    #[error("unknown noise kind `{0}` (expected `open_simplex` or `worley`)")]
    UnknownNoiseKind(String),

    /// The distance metric does not name a known metric.
    #[error("unknown distance metric `{0}` (expected `euclidean` or `manhattan`)")]
    UnknownDistanceMetric(String),

    /// The parameter command targets a field that does not exist.
    #[error("unknown terrain parameter `{0}`")]
    UnknownParameter(String),

    /// The value could not be parsed for the targeted field.
    #[error("invalid value `{value}` for terrain parameter `{field}`")]
    InvalidValue {
        /// Field the value was meant for.
        field: &'static str,
        /// The rejected raw value.
        value: String,
    },

    /// A color string was not of the form `#rrggbb`.
    #[error("invalid color `{0}` (expected `#rrggbb`)")]
    InvalidColor(String),
}
