//! Binary image header sniffing
//!
//! Reads pixel dimensions straight out of JPEG and PNG headers without a
//! full decode. Every failure (unsupported type, truncated stream, bad
//! signature) is reported as `None`; nothing here panics or errors.

/// Pixel dimensions read from an image header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Eight-byte PNG file signature
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Smallest buffer holding the signature plus the IHDR width and height
const PNG_MIN_LEN: usize = 24;

/// Sniff dimensions from raw bytes, dispatching on the declared MIME type
///
/// Only declared types containing `jpeg`/`jpg` or `png` are attempted.
#[must_use]
pub fn sniff_dimensions(bytes: &[u8], declared_mime: &str) -> Option<Dimensions> {
    let mime = declared_mime.to_ascii_lowercase();
    if mime.contains("jpeg") || mime.contains("jpg") {
        jpeg_dimensions(bytes)
    } else if mime.contains("png") {
        png_dimensions(bytes)
    } else {
        None
    }
}

/// Check whether a MIME type is one the sniffer understands
#[must_use]
pub fn is_sniffable(declared_mime: &str) -> bool {
    let mime = declared_mime.to_ascii_lowercase();
    mime.contains("jpeg") || mime.contains("jpg") || mime.contains("png")
}

/// Read width/height from the IHDR chunk of a PNG
///
/// IHDR is always the first chunk, so width sits at offset 16 and height at
/// offset 20, both big-endian u32.
#[must_use]
pub fn png_dimensions(bytes: &[u8]) -> Option<Dimensions> {
    if bytes.len() < PNG_MIN_LEN || bytes.get(..8)? != PNG_SIGNATURE {
        return None;
    }
    Some(Dimensions {
        width: read_u32_be(bytes, 16)?,
        height: read_u32_be(bytes, 20)?,
    })
}

/// Walk JPEG segments looking for the first Start-Of-Frame marker
///
/// Scanning starts after the SOI marker at offset 2. SOF0-SOF3 (`0xC0`-`0xC3`)
/// carry `length(2) precision(1) height(2) width(2)` after the marker.
/// A position that does not hold `0xFF` ends the scan.
#[must_use]
pub fn jpeg_dimensions(bytes: &[u8]) -> Option<Dimensions> {
    let mut offset: usize = 2;

    while offset < bytes.len() {
        if *bytes.get(offset)? != 0xFF {
            return None;
        }
        let marker = *bytes.get(offset.checked_add(1)?)?;

        if (0xC0..=0xC3).contains(&marker) {
            let height = read_u16_be(bytes, offset.checked_add(5)?)?;
            let width = read_u16_be(bytes, offset.checked_add(7)?)?;
            return Some(Dimensions {
                width: u32::from(width),
                height: u32::from(height),
            });
        }

        let segment_len = read_u16_be(bytes, offset.checked_add(2)?)?;
        offset = offset.checked_add(2)?.checked_add(usize::from(segment_len))?;
    }

    None
}

fn read_u16_be(bytes: &[u8], at: usize) -> Option<u16> {
    let raw: [u8; 2] = bytes.get(at..at.checked_add(2)?)?.try_into().ok()?;
    Some(u16::from_be_bytes(raw))
}

fn read_u32_be(bytes: &[u8], at: usize) -> Option<u32> {
    let raw: [u8; 4] = bytes.get(at..at.checked_add(4)?)?.try_into().ok()?;
    Some(u32::from_be_bytes(raw))
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Minimal PNG: signature + IHDR with the given dimensions
    pub fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes
    }

    /// Minimal JPEG: SOI, an APP0 segment, then a SOF segment with the given marker
    pub fn jpeg(sof_marker: u8, width: u16, height: u16) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        bytes.extend_from_slice(b"JFIF\0");
        bytes.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
        bytes.extend_from_slice(&[0xFF, sof_marker, 0x00, 0x11, 0x08]);
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        bytes
    }
}
