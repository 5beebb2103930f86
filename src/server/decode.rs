//! Payload decoding for received byte chunks

use encoding_rs::GBK;

/// Decode step applied to every received chunk before it is persisted.
///
/// Implementations return `None` when the bytes are not valid in the target
/// encoding; the session discards such chunks without closing the connection.
pub trait PayloadDecoder: Send + Sync {
    /// Decode a raw chunk into text, or `None` if the bytes are malformed
    fn decode(&self, bytes: &[u8]) -> Option<String>;
}

/// Strict GBK decoder for legacy appliance telemetry.
#[derive(Debug, Clone, Copy, Default)]
pub struct GbkDecoder;

impl PayloadDecoder for GbkDecoder {
    fn decode(&self, bytes: &[u8]) -> Option<String> {
        let (text, had_errors) = GBK.decode_without_bom_handling(bytes);
        if had_errors {
            None
        } else {
            Some(text.into_owned())
        }
    }
}
