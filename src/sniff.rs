//! Content-based format sniffing.
//!
//! Classification reads leading bytes only — never the filename, extension,
//! or a declared content type. An input whose signature bytes are missing is
//! unsupported even if the rest of its structure would decode. Archive
//! formats are recognized on purpose so they can be skipped up front instead
//! of erroring deep inside a demuxer.

use crate::types::Family;

/// How many leading bytes the sniffer may need. The only probe that looks
/// past the first few bytes is the Matroska DocType scan.
pub const SNIFF_LEN: usize = 4096;

/// Concrete container/codec signature matched from leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
    /// Any ISO-BMFF brand (`ftyp`), plus bare-atom QuickTime files.
    Mp4,
    Webm,
    Matroska,
    Ogg,
    Mp3,
    Flac,
    Avi,
    Asf,
    Flv,
    Zip,
    Rar,
    SevenZip,
}

impl FileKind {
    /// Decode family this kind dispatches to; `None` for formats that are
    /// recognized but explicitly excluded (archives).
    pub fn family(self) -> Option<Family> {
        match self {
            Self::Jpeg | Self::Png | Self::Webp | Self::Bmp => Some(Family::Image),
            Self::Gif => Some(Family::AnimatedImage),
            Self::Mp3 | Self::Flac => Some(Family::Audio),
            Self::Mp4 | Self::Webm | Self::Matroska | Self::Ogg | Self::Avi | Self::Asf
            | Self::Flv => Some(Family::Video),
            Self::Zip | Self::Rar | Self::SevenZip => None,
        }
    }

    /// Stable lowercase identifier used in
    /// [`SourceMeta::container`](crate::types::SourceMeta) and log events.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Matroska => "matroska",
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Avi => "avi",
            Self::Asf => "asf",
            Self::Flv => "flv",
            Self::Zip => "zip",
            Self::Rar => "rar",
            Self::SevenZip => "7z",
        }
    }

    /// Image-crate format for kinds the picture backend decodes directly.
    pub(crate) fn image_format(self) -> Option<image::ImageFormat> {
        match self {
            Self::Jpeg => Some(image::ImageFormat::Jpeg),
            Self::Png => Some(image::ImageFormat::Png),
            Self::Gif => Some(image::ImageFormat::Gif),
            Self::Webp => Some(image::ImageFormat::WebP),
            Self::Bmp => Some(image::ImageFormat::Bmp),
            _ => None,
        }
    }
}

/// Classify leading bytes into a [`FileKind`], or `None` when no signature
/// matches.
pub fn sniff(head: &[u8]) -> Option<FileKind> {
    if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(FileKind::Jpeg);
    }
    if head.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(FileKind::Png);
    }
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return Some(FileKind::Gif);
    }
    if head.starts_with(b"RIFF") && head.len() >= 12 {
        if &head[8..12] == b"WEBP" {
            return Some(FileKind::Webp);
        }
        if &head[8..12] == b"AVI " {
            return Some(FileKind::Avi);
        }
    }
    if head.starts_with(b"BM") && head.len() >= 14 {
        return Some(FileKind::Bmp);
    }
    if let Some(kind) = sniff_bmff(head) {
        return Some(kind);
    }
    if head.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        // EBML header; the DocType string somewhere in the early bytes tells
        // WebM apart from generic Matroska.
        let kind = if find(head, b"webm").is_some() {
            FileKind::Webm
        } else {
            FileKind::Matroska
        };
        return Some(kind);
    }
    if head.starts_with(b"OggS") {
        return Some(FileKind::Ogg);
    }
    // A bare MPEG audio frame sync without an ID3 tag is deliberately not
    // matched: signature-stripped inputs classify as unsupported.
    if head.starts_with(b"ID3") {
        return Some(FileKind::Mp3);
    }
    if head.starts_with(b"fLaC") {
        return Some(FileKind::Flac);
    }
    if head.starts_with(&[0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11]) {
        return Some(FileKind::Asf);
    }
    if head.starts_with(&[b'F', b'L', b'V', 0x01]) {
        return Some(FileKind::Flv);
    }
    if head.starts_with(&[b'P', b'K', 0x03, 0x04]) {
        return Some(FileKind::Zip);
    }
    if head.starts_with(&[b'R', b'a', b'r', b'!', 0x1A, 0x07]) {
        return Some(FileKind::Rar);
    }
    if head.starts_with(&[b'7', b'z', 0xBC, 0xAF, 0x27, 0x1C]) {
        return Some(FileKind::SevenZip);
    }
    None
}

/// ISO-BMFF / QuickTime probe: a box name at offset 4.
///
/// `ftyp` matches regardless of the brand that follows — containers with
/// rare or vendor brands must still be dispatched to the generic demuxer.
/// A handful of top-level atom names cover brand-less QuickTime files.
fn sniff_bmff(head: &[u8]) -> Option<FileKind> {
    if head.len() < 12 {
        return None;
    }
    const BOXES: &[&[u8; 4]] = &[b"ftyp", b"moov", b"mdat", b"free", b"skip", b"wide", b"pnot"];
    let name = &head[4..8];
    BOXES
        .iter()
        .any(|b| name == b.as_slice())
        .then_some(FileKind::Mp4)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
