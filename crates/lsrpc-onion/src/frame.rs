use lsrpc_types::FrameError;

/// Upper bound on a single frame. The wire format itself imposes no limit;
/// this cap resists hostile length prefixes while leaving room for a 10 MiB
/// payload plus per-layer overhead.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// A decoded layer container: `u32_LE(size) || inner || tail`. The tail is
/// the UTF-8 JSON routing block of that layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub inner: Vec<u8>,
    pub tail: Vec<u8>,
}

/// Encodes `u32_LE(inner.len()) || inner || tail`.
pub fn encode(inner: &[u8], tail: &[u8]) -> Result<Vec<u8>, FrameError> {
    let total = 4 + inner.len() + tail.len();
    if total > MAX_FRAME_SIZE {
        return Err(FrameError::TooLarge(total));
    }

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&(inner.len() as u32).to_le_bytes());
    out.extend_from_slice(inner);
    out.extend_from_slice(tail);
    Ok(out)
}

/// Splits a frame back into inner blob and routing tail.
pub fn decode(bytes: &[u8]) -> Result<Frame, FrameError> {
    if bytes.len() > MAX_FRAME_SIZE {
        return Err(FrameError::TooLarge(bytes.len()));
    }
    if bytes.len() < 4 {
        return Err(FrameError::Truncated {
            needed: 4,
            available: bytes.len(),
        });
    }

    let size = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    if bytes.len() < 4 + size {
        return Err(FrameError::Truncated {
            needed: 4 + size,
            available: bytes.len(),
        });
    }

    Ok(Frame {
        inner: bytes[4..4 + size].to_vec(),
        tail: bytes[4 + size..].to_vec(),
    })
}
