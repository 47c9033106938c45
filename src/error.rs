use thiserror::Error;

pub type Result<T> = std::result::Result<T, PayrollError>;

/// Failures raised while talking to the wallet service.
///
/// These are transport-level; the application wraps them into the
/// [`PayrollError`] variant of the operation that hit them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("wallet service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response from wallet service: {0}")]
    UnexpectedResponse(String),
}

#[derive(Error, Debug)]
pub enum PayrollError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Account resolution failed: {0}")]
    AccountResolution(#[source] WalletError),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Transaction submission failed: {0}")]
    TransactionSubmission(#[source] WalletError),
    #[error("Balance query failed: {0}")]
    BalanceQuery(String),
    #[error("A payroll batch is already running on this disburser")]
    BatchInProgress,
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for PayrollError {
    fn from(err: config::ConfigError) -> Self {
        PayrollError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_configuration() {
        let err: PayrollError = config::ConfigError::NotFound("api_url".into()).into();
        assert!(matches!(err, PayrollError::Configuration(_)));
    }

    #[test]
    fn test_wallet_error_is_kept_in_message() {
        let err = PayrollError::TransactionSubmission(WalletError::Rejected {
            status: 429,
            message: "rate limited".into(),
        });
        assert_eq!(
            err.to_string(),
            "Transaction submission failed: wallet service rejected the request (429): rate limited"
        );
    }
}
