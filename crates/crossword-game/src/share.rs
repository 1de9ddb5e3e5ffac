//! Opaque compression collaborator for shareable links.

/// Compresses serialized state into a link-safe token and back.
///
/// The concrete codec lives outside this workspace; the store only relies
/// on `decompress` being the inverse of `compress` and on damaged tokens
/// coming back as `None` instead of panicking.
pub trait ShareCodec {
    /// Compresses `text` into a token that can ride in a query parameter.
    fn compress(&self, text: &str) -> String;
    /// Recovers the text behind `token`. `None` when the token is damaged
    /// or was produced by an incompatible codec.
    fn decompress(&self, token: &str) -> Option<String>;
}

/// Identity codec, standing in for the external compressor in tests and
/// headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCodec;

impl ShareCodec for PassthroughCodec {
    fn compress(&self, text: &str) -> String {
        text.to_string()
    }

    fn decompress(&self, token: &str) -> Option<String> {
        Some(token.to_string())
    }
}
