//! 附件类型识别 - 只读取文件头部字节判断是否为图片

use image::ImageFormat;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::PushError;

/// 识别文件类型所需的头部字节数
pub const SNIFF_LEN: u64 = 261;

/// 已识别的图片附件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageType {
    pub format: ImageFormat,
}

impl ImageType {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// 读取文件头部并判断是否为图片
pub fn inspect(path: &Path) -> Result<ImageType, PushError> {
    let io_err = |source| PushError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)
        .map_err(io_err)?
        .take(SNIFF_LEN)
        .read_to_end(&mut head)
        .map_err(io_err)?;

    let image_type = classify(&head).ok_or_else(|| PushError::NotAnImage {
        path: PathBuf::from(path),
    })?;

    debug!(path = %path.display(), mime = image_type.mime_type(), "Attachment classified");
    Ok(image_type)
}

/// Pushover 接受的图片格式
///
/// PNM、Radiance HDR、DDS 的签名是普通 ASCII 前缀（`P1`、`#?RADIANCE`、`DDS `），
/// 文本文件也会命中，不在此列。
const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Tiff,
    ImageFormat::Bmp,
    ImageFormat::Ico,
    ImageFormat::Avif,
];

/// 根据文件签名识别图片格式
pub fn classify(head: &[u8]) -> Option<ImageType> {
    image::guess_format(head)
        .ok()
        .filter(|format| ACCEPTED_FORMATS.contains(format))
        .map(|format| ImageType { format })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_classify_known_signatures() {
        assert_eq!(classify(PNG_HEADER).unwrap().format, ImageFormat::Png);
        assert_eq!(
            classify(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]).unwrap().format,
            ImageFormat::Jpeg
        );
        assert_eq!(classify(b"GIF89a\x01\x00").unwrap().mime_type(), "image/gif");
    }

    #[test]
    fn test_classify_rejects_text() {
        assert!(classify(b"hello world, definitely not an image").is_none());
        assert!(classify(&[]).is_none());
    }

    #[test]
    fn test_classify_rejects_text_with_ascii_image_prefixes() {
        assert!(classify(b"P1 release notes: fixed crash").is_none());
        assert!(classify(b"P3 tasks\n- write docs").is_none());
        assert!(classify(b"#?RADIANCE is my band").is_none());
        assert!(classify(b"DDS build log").is_none());
    }

    #[test]
    fn test_inspect_text_with_image_prefix_is_not_an_image() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "P6 changelog").unwrap();

        let err = inspect(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAnImage);
    }

    #[test]
    fn test_inspect_png_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PNG_HEADER).unwrap();
        file.write_all(&[0u8; 512]).unwrap();

        let image_type = inspect(file.path()).unwrap();
        assert_eq!(image_type.mime_type(), "image/png");
    }

    #[test]
    fn test_inspect_non_image() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "plain text").unwrap();

        let err = inspect(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAnImage);
    }

    #[test]
    fn test_inspect_missing_file_is_io_error() {
        let err = inspect(Path::new("/no/such/attachment.png")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoError);
    }
}
