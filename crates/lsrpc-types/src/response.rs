use std::fmt;

/// The entry hop's HTTP response, surfaced verbatim. The body is whatever
/// came back up the chain; no decryption is attempted here.
#[derive(Clone, PartialEq, Eq)]
pub struct OnionResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl OnionResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8, where the caller knows the response is textual.
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

impl fmt::Debug for OnionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OnionResponse(status={}, {} headers, {} body bytes)",
            self.status,
            self.headers.len(),
            self.body.len()
        )
    }
}
