use crate::routing::ProviderError;

/// Classify a transport error; timeouts stay distinguishable for callers.
pub(super) fn from_reqwest(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_decode() {
        ProviderError::Decode(err.to_string())
    } else {
        ProviderError::Http(err.to_string())
    }
}
