//! Static suffix → image format table.

use std::fmt;

/// Image formats that can be requested through a path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Jpeg,
    Png,
    Gif,
    WebP,
    Bmp,
    Tiff,
    Ico,
}

impl Format {
    /// Every format, in suffix lookup order.
    pub const ALL: [Format; 7] = [
        Format::Jpeg,
        Format::Png,
        Format::Gif,
        Format::WebP,
        Format::Bmp,
        Format::Tiff,
        Format::Ico,
    ];

    /// Look up a format by file suffix (with leading dot, case-insensitive).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let suffix = suffix.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.suffixes().contains(&suffix.as_str()))
    }

    /// Canonical format name, used as the key of per-format save options.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
            Self::WebP => "WEBP",
            Self::Bmp => "BMP",
            Self::Tiff => "TIFF",
            Self::Ico => "ICO",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Ico => "image/vnd.microsoft.icon",
        }
    }

    /// Suffixes mapping to this format, preferred suffix first.
    pub fn suffixes(&self) -> &'static [&'static str] {
        match self {
            Self::Jpeg => &[".jpg", ".jpeg", ".jpe", ".jfif"],
            Self::Png => &[".png"],
            Self::Gif => &[".gif"],
            Self::WebP => &[".webp"],
            Self::Bmp => &[".bmp", ".dib"],
            Self::Tiff => &[".tif", ".tiff"],
            Self::Ico => &[".ico"],
        }
    }

    /// All known suffixes, in lookup order. Storage backends use this as the
    /// default search list when resolving a suffix-less key.
    pub fn all_suffixes() -> Vec<&'static str> {
        Self::ALL
            .iter()
            .flat_map(|format| format.suffixes().iter().copied())
            .collect()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_suffix() {
        assert_eq!(Format::from_suffix(".jpg"), Some(Format::Jpeg));
        assert_eq!(Format::from_suffix(".JPEG"), Some(Format::Jpeg));
        assert_eq!(Format::from_suffix(".png"), Some(Format::Png));
        assert_eq!(Format::from_suffix(".tif"), Some(Format::Tiff));
        assert_eq!(Format::from_suffix(".jpg2"), None);
        assert_eq!(Format::from_suffix("jpg"), None);
        assert_eq!(Format::from_suffix(""), None);
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(Format::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(Format::Png.mime_type(), "image/png");
        assert_eq!(Format::WebP.mime_type(), "image/webp");
    }

    #[test]
    fn test_all_suffixes_starts_with_preferred_jpeg() {
        let suffixes = Format::all_suffixes();
        assert_eq!(suffixes[0], ".jpg");
        assert!(suffixes.contains(&".png"));
        assert!(suffixes.contains(&".ico"));
    }
}
