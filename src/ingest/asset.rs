use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use bytes::Bytes;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Largest accepted upload: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Image container formats accepted at upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    /// Extensions accepted by the upload surface, without the leading dot.
    pub const ACCEPTED_EXTENSIONS: [&'static str; 4] = ["jpg", "jpeg", "png", "webp"];

    /// Resolves the format from a file name's extension, case-insensitively.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, extension) = name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// A validated, decoded upload. Immutable once built.
///
/// Cloning is cheap: the byte buffer is reference counted.
#[derive(Clone)]
pub struct ImageAsset {
    name: String,
    format: ImageFormat,
    bytes: Bytes,
    width: u32,
    height: u32,
    data_uri: String,
    sha256: String,
}

impl ImageAsset {
    pub(crate) fn new(
        name: String,
        format: ImageFormat,
        bytes: Bytes,
        width: u32,
        height: u32,
    ) -> Self {
        let data_uri = format!(
            "data:{};base64,{}",
            format.mime_type(),
            BASE64_STANDARD.encode(&bytes)
        );
        let sha256 = hex::encode(Sha256::digest(&bytes));

        Self {
            name,
            format,
            bytes,
            width,
            height,
            data_uri,
            sha256,
        }
    }

    /// Builds an asset without decoding the bytes. Dimensions are zero.
    #[cfg(test)]
    pub(crate) fn undecoded(name: &str, format: ImageFormat, bytes: Vec<u8>) -> Self {
        Self::new(name.to_string(), format, Bytes::from(bytes), 0, 0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// `data:<mime>;base64,...` preview suitable for an `<img src>`.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Hex SHA-256 of the raw bytes.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }
}

impl fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAsset")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sha256", &self.sha256)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        jpg = { "leaf.jpg", Some(ImageFormat::Jpeg) },
        jpeg_upper = { "LEAF.JPEG", Some(ImageFormat::Jpeg) },
        png = { "leaf.png", Some(ImageFormat::Png) },
        webp_mixed = { "leaf.WebP", Some(ImageFormat::Webp) },
        dotted_name = { "my.crop.photo.png", Some(ImageFormat::Png) },
        gif = { "leaf.gif", None },
        bmp = { "leaf.bmp", None },
        no_extension = { "leaf", None },
        trailing_dot = { "leaf.", None },
        suffix_without_dot = { "leafpng", None },
    )]
    fn test_format_from_file_name(name: &str, expected: Option<ImageFormat>) {
        assert_eq!(ImageFormat::from_file_name(name), expected);
    }

    #[test]
    fn test_max_upload_is_ten_mebibytes() {
        assert_eq!(MAX_UPLOAD_BYTES, 10_485_760);
    }

    #[test]
    fn test_data_uri_and_digest() {
        let asset = ImageAsset::undecoded("leaf.png", ImageFormat::Png, b"abc".to_vec());

        assert_eq!(asset.data_uri(), "data:image/png;base64,YWJj");
        assert_eq!(
            asset.sha256(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(asset.len(), 3);
        assert!(!asset.is_empty());
    }

    #[test]
    fn test_debug_omits_payload() {
        let asset = ImageAsset::undecoded("leaf.jpg", ImageFormat::Jpeg, vec![0u8; 64]);
        let debug = format!("{:?}", asset);
        assert!(debug.contains("leaf.jpg"));
        assert!(!debug.contains("base64"));
    }
}
