// ============================================================
// ENCODING DETECTION
// ============================================================
// Pick a text encoding for raw file bytes and decode strictly

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::domain::error::{AppError, Result};

/// Bytes inspected when deciding between UTF-8 and the 8-bit fallback
pub const SAMPLE_BYTES: usize = 64 * 1024;

/// How the encoding was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    Explicit,
    ByteOrderMark,
    Utf8Sample,
    Fallback,
}

#[derive(Debug, Clone, Copy)]
pub struct DetectedEncoding {
    pub encoding: &'static Encoding,
    pub source: EncodingSource,
    /// Length of a byte order mark to skip before decoding
    pub bom_len: usize,
}

/// Resolve a WHATWG encoding label such as `utf-8`, `latin1` or `cp1252`
pub fn resolve_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| AppError::LoadError(format!("Unknown encoding label: {}", label)))
}

/// Encoding used when the sample is not valid UTF-8
pub fn default_fallback() -> &'static Encoding {
    WINDOWS_1252
}

/// Detect the encoding of `bytes` by sampling them
pub fn detect(bytes: &[u8], fallback: &'static Encoding) -> DetectedEncoding {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return DetectedEncoding {
            encoding,
            source: EncodingSource::ByteOrderMark,
            bom_len,
        };
    }

    let truncated = bytes.len() > SAMPLE_BYTES;
    let sample = &bytes[..bytes.len().min(SAMPLE_BYTES)];
    let valid_up_to = Encoding::utf8_valid_up_to(sample);

    // A multi-byte sequence cut by the sample boundary is still valid UTF-8
    let looks_utf8 = valid_up_to == sample.len() || (truncated && sample.len() - valid_up_to < 4);

    if looks_utf8 {
        DetectedEncoding {
            encoding: UTF_8,
            source: EncodingSource::Utf8Sample,
            bom_len: 0,
        }
    } else {
        DetectedEncoding {
            encoding: fallback,
            source: EncodingSource::Fallback,
            bom_len: 0,
        }
    }
}

/// Use an explicitly requested encoding, still skipping its own BOM if present
pub fn explicit(bytes: &[u8], encoding: &'static Encoding) -> DetectedEncoding {
    let bom_len = match Encoding::for_bom(bytes) {
        Some((bom_encoding, len)) if bom_encoding == encoding => len,
        _ => 0,
    };

    DetectedEncoding {
        encoding,
        source: EncodingSource::Explicit,
        bom_len,
    }
}

/// Decode without replacement characters; malformed input or binary content fails
pub fn decode(bytes: &[u8], detected: &DetectedEncoding) -> Result<String> {
    let body = &bytes[detected.bom_len.min(bytes.len())..];

    let text = detected
        .encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            AppError::LoadError(format!(
                "Content is not valid {}",
                detected.encoding.name()
            ))
        })?;

    if let Some((offset, ch)) = text
        .char_indices()
        .find(|(_, c)| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
    {
        return Err(AppError::LoadError(format!(
            "Content decoded as {} contains binary data (U+{:04X} at byte {})",
            detected.encoding.name(),
            ch as u32,
            offset
        )));
    }

    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::UTF_16LE;

    #[test]
    fn test_detect_utf8() {
        let detected = detect("name\nJosé\n".as_bytes(), WINDOWS_1252);
        assert_eq!(detected.encoding, UTF_8);
        assert_eq!(detected.source, EncodingSource::Utf8Sample);
    }

    #[test]
    fn test_detect_falls_back_for_latin1_bytes() {
        let bytes = b"name\nJos\xe9\n";
        let detected = detect(bytes, WINDOWS_1252);
        assert_eq!(detected.encoding, WINDOWS_1252);
        assert_eq!(detected.source, EncodingSource::Fallback);
        assert_eq!(decode(bytes, &detected).unwrap(), "name\nJosé\n");
    }

    #[test]
    fn test_detect_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "a,b\n1,x\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        let detected = detect(&bytes, WINDOWS_1252);
        assert_eq!(detected.encoding, UTF_16LE);
        assert_eq!(detected.bom_len, 2);
        assert_eq!(decode(&bytes, &detected).unwrap(), "a,b\n1,x\n");
    }

    #[test]
    fn test_truncated_sample_boundary_still_utf8() {
        let mut bytes = vec![b'a'; SAMPLE_BYTES - 1];
        bytes.extend_from_slice("é".as_bytes());
        bytes.extend_from_slice(b"\n");

        assert_eq!(detect(&bytes, WINDOWS_1252).encoding, UTF_8);
    }

    #[test]
    fn test_resolve_label() {
        assert_eq!(resolve_label("latin1").unwrap(), WINDOWS_1252);
        assert_eq!(resolve_label(" UTF-8 ").unwrap(), UTF_8);
        assert!(matches!(resolve_label("klingon"), Err(AppError::LoadError(_))));
    }

    #[test]
    fn test_strict_utf8_rejects_malformed_bytes() {
        let bytes = b"a,b\n\xff\xfe\xfd,1\n";
        let detected = explicit(bytes, UTF_8);
        assert!(matches!(decode(bytes, &detected), Err(AppError::LoadError(_))));
    }

    #[test]
    fn test_binary_content_is_rejected() {
        let bytes = b"a,b\n\x00\x9d,\x81\n";
        let detected = detect(bytes, WINDOWS_1252);
        assert_eq!(detected.source, EncodingSource::Fallback);
        assert!(matches!(decode(bytes, &detected), Err(AppError::LoadError(_))));
    }
}
