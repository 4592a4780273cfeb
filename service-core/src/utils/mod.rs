pub mod retry;
pub mod signature;

pub use retry::{RetryConfig, RetryableError, retry_with_backoff, retry_with_backoff_using};
pub use signature::{
    DEFAULT_TOLERANCE_SECONDS, SignatureError, SignatureHeader, check_signature,
    check_signature_at, verify_signature,
};
