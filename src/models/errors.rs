//! Centralized Error Handling Module
//!
//! Every failure carries a unique code so logs and API responses can be
//! grepped and monitored.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - EXPLORER_xxx: explorer lookup errors
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Explorer Errors
    // ============================================
    /// Request never got a response (connect, DNS, timeout)
    ExplorerNetwork,
    /// Request timed out
    ExplorerTimeout,
    /// Non-2xx HTTP status
    ExplorerHttpStatus,
    /// HTTP 429 from the explorer
    ExplorerRateLimited,
    /// Body could not be parsed into the expected shape
    ExplorerInvalidPayload,
    /// Explorer answered with status "0"
    ExplorerProviderError,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,
    /// Resource not found
    ApiNotFound,
    /// Request exceeded the server timeout
    ApiTimeout,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
    /// Unsupported chain ID
    ConfigUnsupportedChain,

    // ============================================
    // Input Errors
    // ============================================
    /// Invalid EVM address
    InvalidAddress,
    /// Scan signals outside their domain
    InvalidScanInput,

    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExplorerNetwork => "EXPLORER_NETWORK",
            Self::ExplorerTimeout => "EXPLORER_TIMEOUT",
            Self::ExplorerHttpStatus => "EXPLORER_HTTP_STATUS",
            Self::ExplorerRateLimited => "EXPLORER_RATE_LIMITED",
            Self::ExplorerInvalidPayload => "EXPLORER_INVALID_PAYLOAD",
            Self::ExplorerProviderError => "EXPLORER_PROVIDER_ERROR",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",
            Self::ApiNotFound => "API_NOT_FOUND",
            Self::ApiTimeout => "API_TIMEOUT",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::ConfigUnsupportedChain => "CFG_UNSUPPORTED_CHAIN",

            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::InvalidScanInput => "INVALID_SCAN_INPUT",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest
            | Self::InvalidAddress
            | Self::InvalidScanInput
            | Self::ConfigUnsupportedChain => 400,
            Self::ApiNotFound => 404,
            Self::ApiRateLimited => 429,
            Self::ExplorerNetwork
            | Self::ExplorerHttpStatus
            | Self::ExplorerRateLimited
            | Self::ExplorerInvalidPayload
            | Self::ExplorerProviderError => 502,
            Self::ExplorerTimeout | Self::ApiTimeout => 504,
            _ => 500,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ExplorerNetwork | Self::ExplorerTimeout | Self::ExplorerRateLimited
        )
    }
}

/// Why an explorer lookup failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// No response: connection refused, DNS, TLS, timeout
    Network { message: String, timed_out: bool },
    /// Explorer answered with a non-2xx status
    HttpStatus { status: u16 },
    /// Body is not the JSON shape we expect
    InvalidPayload { message: String },
    /// Explorer answered `status: "0"` with an error message
    Provider { message: String },
}

impl LookupFailure {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network { timed_out: true, .. } => ErrorCode::ExplorerTimeout,
            Self::Network { .. } => ErrorCode::ExplorerNetwork,
            Self::HttpStatus { status: 429 } => ErrorCode::ExplorerRateLimited,
            Self::HttpStatus { .. } => ErrorCode::ExplorerHttpStatus,
            Self::InvalidPayload { .. } => ErrorCode::ExplorerInvalidPayload,
            Self::Provider { .. } => ErrorCode::ExplorerProviderError,
        }
    }

    /// Network failures, 429 and 5xx are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::HttpStatus { status } => *status == 429 || *status >= 500,
            Self::InvalidPayload { .. } | Self::Provider { .. } => false,
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network { message, timed_out: true } => write!(f, "explorer request timed out: {}", message),
            Self::Network { message, .. } => write!(f, "explorer request failed: {}", message),
            Self::HttpStatus { status } => write!(f, "explorer returned HTTP {}", status),
            Self::InvalidPayload { message } => write!(f, "unparseable explorer response: {}", message),
            Self::Provider { message } => write!(f, "explorer rejected request: {}", message),
        }
    }
}

impl std::error::Error for LookupFailure {}

impl From<reqwest::Error> for LookupFailure {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::HttpStatus {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::invalid_payload(err.to_string())
        } else {
            Self::Network {
                message: err.to_string(),
                timed_out: err.is_timeout(),
            }
        }
    }
}

impl From<serde_json::Error> for LookupFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_payload(err.to_string())
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Invalid EVM address
    pub fn invalid_address(address: &str) -> Self {
        Self::new(
            ErrorCode::InvalidAddress,
            format!("Invalid address format: {}", address),
        )
    }

    /// Scan input outside its domain
    pub fn invalid_scan_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidScanInput, msg)
    }

    /// Unsupported chain
    pub fn unsupported_chain(chain_id: u64) -> Self {
        Self::new(
            ErrorCode::ConfigUnsupportedChain,
            format!("Unsupported chain_id: {}", chain_id),
        )
    }

    /// Invalid configuration value
    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }

    /// Client exceeded its request budget
    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self::new(
            ErrorCode::ApiRateLimited,
            format!("Rate limit exceeded. Retry after {} seconds", retry_after_secs),
        )
    }

    /// No route for this path
    pub fn not_found(path: &str) -> Self {
        Self::new(ErrorCode::ApiNotFound, format!("No route for {}", path))
    }

    /// Request ran past the server timeout
    pub fn request_timeout(timeout: std::time::Duration) -> Self {
        Self::new(
            ErrorCode::ApiTimeout,
            format!("Request exceeded {}ms", timeout.as_millis()),
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<LookupFailure> for AppError {
    fn from(err: LookupFailure) -> Self {
        let code = err.code();
        Self::with_source(code, err.to_string(), err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::ApiBadRequest, "JSON parse error", err)
    }
}
