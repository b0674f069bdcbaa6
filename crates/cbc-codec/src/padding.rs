use crate::{BLOCK_SIZE, error::CodecError};

/// Pads `data` to a multiple of [`BLOCK_SIZE`].
///
/// Every pad byte carries the pad length, and block aligned input receives a
/// full block, so `0 < pad_len <= BLOCK_SIZE` always holds.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - (data.len() % BLOCK_SIZE);
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    // pad_len is at most BLOCK_SIZE (16), always fits in a byte
    out.resize(data.len() + pad_len, pad_len as u8);
    out
}

/// Strips padding added by [`pad`], verifying every pad byte.
pub fn unpad(data: &[u8]) -> Result<&[u8], CodecError> {
    let Some(&last) = data.last() else {
        return Err(CodecError::InvalidPadding {
            reason: "input is empty",
        });
    };

    let pad_len = usize::from(last);
    if pad_len == 0 || pad_len > data.len() {
        return Err(CodecError::InvalidPadding {
            reason: "pad length out of range",
        });
    }

    let (body, tail) = data.split_at(data.len() - pad_len);
    if tail.iter().any(|&b| b != last) {
        return Err(CodecError::InvalidPadding {
            reason: "pad bytes do not match pad length",
        });
    }

    Ok(body)
}
