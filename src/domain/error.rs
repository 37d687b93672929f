//! Domain error types.

use std::fmt;

/// Broker resource a fetch was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchResource {
    Accounts,
    Trades,
    Positions,
    Orders,
}

impl fmt::Display for FetchResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchResource::Accounts => write!(f, "accounts"),
            FetchResource::Trades => write!(f, "trades"),
            FetchResource::Positions => write!(f, "positions"),
            FetchResource::Orders => write!(f, "orders"),
        }
    }
}

/// Whether a failure must stop the rest of a bar's action batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Informational,
}

/// Top-level error type for signaltrader.
#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("broker connection failed: {reason}")]
    Connectivity { reason: String },

    #[error("failed to fetch {resource}: {reason}")]
    DataFetch {
        resource: FetchResource,
        reason: String,
    },

    #[error("order placement failed: {reason}")]
    OrderPlacement { reason: String },

    #[error("order modification failed for {order_id}: {reason}")]
    OrderModification { order_id: String, reason: String },

    #[error("order deletion failed for {order_id}: {reason}")]
    OrderDeletion { order_id: String, reason: String },

    #[error("no response for order {order_id}")]
    OrderNoResponse { order_id: String },

    #[error("order already placed: {order_id}")]
    OrderAlreadyPlaced { order_id: String },

    #[error("position not closed after {attempts} verification attempt(s): {reason}")]
    PositionNotClosed { attempts: u32, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to read report {path}: {reason}")]
    ReportRead { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TraderError {
    /// Informational failures are logged and the batch continues; all others abort it.
    pub fn severity(&self) -> Severity {
        match self {
            TraderError::DataFetch { .. } | TraderError::OrderAlreadyPlaced { .. } => {
                Severity::Informational
            }
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl From<&TraderError> for std::process::ExitCode {
    fn from(err: &TraderError) -> Self {
        let code: u8 = match err {
            TraderError::Io(_) => 1,
            TraderError::ConfigParse { .. }
            | TraderError::ConfigMissing { .. }
            | TraderError::ConfigInvalid { .. } => 2,
            TraderError::ReportRead { .. } | TraderError::DataFetch { .. } => 3,
            TraderError::Connectivity { .. }
            | TraderError::OrderPlacement { .. }
            | TraderError::OrderModification { .. }
            | TraderError::OrderDeletion { .. }
            | TraderError::OrderNoResponse { .. }
            | TraderError::OrderAlreadyPlaced { .. } => 4,
            TraderError::PositionNotClosed { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
