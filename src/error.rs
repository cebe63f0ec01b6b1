use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("data unavailable for `{key}`: {reason}")]
    DataUnavailable { key: String, reason: String },

    #[error("unsupported chart kind: `{0}`")]
    UnsupportedChartKind(String),

    #[error("missing field: `{0}`")]
    MissingField(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl DashboardError {
    pub(crate) fn data_unavailable(key: &str, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }
}
