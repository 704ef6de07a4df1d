//! JSON codec boundary contract.

use faultline_domain::JsonFailure;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Reads and writes JSON bodies, reporting failures as typed [`JsonFailure`]s.
///
/// Decode failures carry the navigation path to the failing element when the
/// codec can recover it; encode failures are always
/// [`JsonFailureKind::Generation`](faultline_domain::JsonFailureKind::Generation).
pub trait JsonCodecPort: Send + Sync {
    /// Decode a request body into `T`.
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, JsonFailure>;

    /// Encode a response value into a JSON document.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<serde_json::Value, JsonFailure>;
}
