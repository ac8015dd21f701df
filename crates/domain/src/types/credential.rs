//! Session credential with automatic memory zeroization

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Shared secret sent with every save request.
///
/// The underlying memory is zeroed on drop. `Debug` and `Display` never
/// reveal the value. Not serializable; [`crate::SavePayload`] copies the
/// exposed value into the request body.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    inner: String,
}

impl Credential {
    /// Wrap a secret. Returns `None` for an empty string, which the prompt
    /// collaborator uses to signal cancellation.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let inner = secret.into();
        if inner.is_empty() {
            None
        } else {
            Some(Self { inner })
        }
    }

    /// Expose the secret for the request body.
    ///
    /// The returned value should not be stored or logged.
    pub fn expose(&self) -> &str {
        &self.inner
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(self.inner.as_bytes(), other.inner.as_bytes())
    }
}

impl Eq for Credential {}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}
