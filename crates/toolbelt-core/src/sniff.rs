//! Content-type detection from leading bytes
//!
//! Classifies payloads by magic-byte signatures over at most the first 512
//! bytes, following the MIME sniffing rules browsers apply: BOM-tagged text,
//! HTML tag patterns, a signature table for common image/audio/video/archive
//! formats, and a text-vs-binary fallback. Client-supplied type claims play
//! no part here.

/// Number of leading bytes consulted.
pub const SNIFF_LEN: usize = 512;

/// Sniff the content type of `data` from its leading bytes.
///
/// Always returns a valid MIME type; `application/octet-stream` when the
/// window contains binary-class bytes and nothing matched, otherwise
/// `text/plain; charset=utf-8`.
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    for signature in SIGNATURES {
        if let Some(content_type) = signature.matches(data) {
            return content_type;
        }
    }

    if data.iter().any(|&b| is_binary_byte(b)) {
        "application/octet-stream"
    } else {
        "text/plain; charset=utf-8"
    }
}

enum Signature {
    /// Literal prefix match.
    Exact {
        pattern: &'static [u8],
        content_type: &'static str,
    },
    /// Byte-wise match under a mask, optionally after leading whitespace.
    Masked {
        mask: &'static [u8],
        pattern: &'static [u8],
        skip_ws: bool,
        content_type: &'static str,
    },
    /// Case-insensitive HTML tag followed by a tag terminator.
    Html { tag: &'static [u8] },
    /// ISO base media file format box carrying an mp4 brand.
    Mp4,
}

static SIGNATURES: &[Signature] = &[
    Signature::Html {
        tag: b"<!DOCTYPE HTML",
    },
    Signature::Html { tag: b"<HTML" },
    Signature::Html { tag: b"<HEAD" },
    Signature::Html { tag: b"<SCRIPT" },
    Signature::Html { tag: b"<IFRAME" },
    Signature::Html { tag: b"<H1" },
    Signature::Html { tag: b"<DIV" },
    Signature::Html { tag: b"<FONT" },
    Signature::Html { tag: b"<TABLE" },
    Signature::Html { tag: b"<A" },
    Signature::Html { tag: b"<STYLE" },
    Signature::Html { tag: b"<TITLE" },
    Signature::Html { tag: b"<B" },
    Signature::Html { tag: b"<BODY" },
    Signature::Html { tag: b"<BR" },
    Signature::Html { tag: b"<P" },
    Signature::Html { tag: b"<!--" },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF",
        pattern: b"<?xml",
        skip_ws: true,
        content_type: "text/xml; charset=utf-8",
    },
    Signature::Exact {
        pattern: b"%PDF-",
        content_type: "application/pdf",
    },
    Signature::Exact {
        pattern: b"%!PS-Adobe-",
        content_type: "application/postscript",
    },
    // Unicode byte-order marks
    Signature::Masked {
        mask: b"\xFF\xFF\x00\x00",
        pattern: b"\xFE\xFF\x00\x00",
        skip_ws: false,
        content_type: "text/plain; charset=utf-16be",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\x00\x00",
        pattern: b"\xFF\xFE\x00\x00",
        skip_ws: false,
        content_type: "text/plain; charset=utf-16le",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\x00",
        pattern: b"\xEF\xBB\xBF\x00",
        skip_ws: false,
        content_type: "text/plain; charset=utf-8",
    },
    // Images
    Signature::Exact {
        pattern: b"GIF87a",
        content_type: "image/gif",
    },
    Signature::Exact {
        pattern: b"GIF89a",
        content_type: "image/gif",
    },
    Signature::Exact {
        pattern: b"\x89PNG\x0D\x0A\x1A\x0A",
        content_type: "image/png",
    },
    Signature::Exact {
        pattern: b"\xFF\xD8\xFF",
        content_type: "image/jpeg",
    },
    Signature::Exact {
        pattern: b"BM",
        content_type: "image/bmp",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
        skip_ws: false,
        content_type: "image/webp",
    },
    Signature::Exact {
        pattern: b"\x00\x00\x01\x00",
        content_type: "image/x-icon",
    },
    Signature::Exact {
        pattern: b"\x00\x00\x02\x00",
        content_type: "image/x-icon",
    },
    // Audio and video
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"FORM\x00\x00\x00\x00AIFF",
        skip_ws: false,
        content_type: "audio/aiff",
    },
    Signature::Exact {
        pattern: b"ID3",
        content_type: "audio/mpeg",
    },
    Signature::Exact {
        pattern: b"OggS\x00",
        content_type: "application/ogg",
    },
    Signature::Exact {
        pattern: b"MThd\x00\x00\x00\x06",
        content_type: "audio/midi",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WAVE",
        skip_ws: false,
        content_type: "audio/wave",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00AVI ",
        skip_ws: false,
        content_type: "video/avi",
    },
    Signature::Mp4,
    Signature::Exact {
        pattern: b"\x1A\x45\xDF\xA3",
        content_type: "video/webm",
    },
    // Archives
    Signature::Exact {
        pattern: b"Rar!\x1A\x07\x00",
        content_type: "application/x-rar-compressed",
    },
    Signature::Exact {
        pattern: b"Rar!\x1A\x07\x01\x00",
        content_type: "application/x-rar-compressed",
    },
    Signature::Exact {
        pattern: b"PK\x03\x04",
        content_type: "application/zip",
    },
    Signature::Exact {
        pattern: b"\x1F\x8B\x08",
        content_type: "application/x-gzip",
    },
    Signature::Exact {
        pattern: b"\x00asm",
        content_type: "application/wasm",
    },
];

impl Signature {
    fn matches(&self, data: &[u8]) -> Option<&'static str> {
        match self {
            Signature::Exact {
                pattern,
                content_type,
            } => data.starts_with(pattern).then_some(*content_type),
            Signature::Masked {
                mask,
                pattern,
                skip_ws,
                content_type,
            } => {
                let data = if *skip_ws { trim_ws(data) } else { data };
                if data.len() < mask.len() {
                    return None;
                }
                mask.iter()
                    .zip(pattern.iter())
                    .zip(data.iter())
                    .all(|((&m, &p), &b)| b & m == p)
                    .then_some(*content_type)
            }
            Signature::Html { tag } => {
                let data = trim_ws(data);
                if data.len() < tag.len() + 1 {
                    return None;
                }
                if !data[..tag.len()].eq_ignore_ascii_case(tag) {
                    return None;
                }
                // A tag terminator must follow, or this is not markup.
                matches!(data[tag.len()], b' ' | b'>').then_some("text/html; charset=utf-8")
            }
            Signature::Mp4 => sniff_mp4(data),
        }
    }
}

fn sniff_mp4(data: &[u8]) -> Option<&'static str> {
    if data.len() < 12 {
        return None;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if box_size % 4 != 0 || data.len() < box_size || &data[4..8] != b"ftyp" {
        return None;
    }
    let mut offset = 8;
    while offset + 3 <= box_size {
        // Bytes 12..16 hold the minor version, not a brand.
        if offset == 12 {
            offset += 4;
            continue;
        }
        if data[offset..offset + 3].eq_ignore_ascii_case(b"mp4") {
            return Some("video/mp4");
        }
        offset += 4;
    }
    None
}

fn trim_ws(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|&b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

fn is_binary_byte(b: u8) -> bool {
    b <= 0x08 || b == 0x0B || (0x0E..=0x1A).contains(&b) || (0x1C..=0x1F).contains(&b)
}
