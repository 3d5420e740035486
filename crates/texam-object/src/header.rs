use crate::{ObjectError, ObjectKind};

/// Parse a stored-object header.
///
/// The header is `"<kind> <len>\0"`. Returns `(kind, payload_len, header_len)`
/// where `header_len` includes the terminator.
pub fn parse_header(data: &[u8]) -> Result<(ObjectKind, usize, usize), ObjectError> {
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| ObjectError::InvalidHeader("missing null terminator".into()))?;

    let header = &data[..nul];
    let space = header
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| ObjectError::InvalidHeader("missing space in header".into()))?;

    let kind = ObjectKind::from_bytes(&header[..space])?;

    let len_bytes = &header[space + 1..];
    // Plain decimal only: no sign, no leading zeros.
    let canonical = !len_bytes.is_empty()
        && len_bytes.iter().all(u8::is_ascii_digit)
        && (len_bytes == b"0" || len_bytes[0] != b'0');
    let len_str = String::from_utf8_lossy(len_bytes);
    let len = canonical
        .then(|| len_str.parse::<usize>().ok())
        .flatten()
        .ok_or_else(|| ObjectError::InvalidHeader(format!("invalid length: {len_str}")))?;

    Ok((kind, len, nul + 1))
}

/// Encode a stored-object header.
pub fn write_header(kind: ObjectKind, payload_len: usize) -> Vec<u8> {
    format!("{} {}\0", kind, payload_len).into_bytes()
}
