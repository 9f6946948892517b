/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// # Arguments
/// * `data` - 文件内容的前几个字节
/// * `extension` - 文件扩展名（不含点号，如 "png"）
///
/// # Returns
/// * `true` - 魔术字节匹配，或该类型没有固定签名
/// * `false` - 魔术字节不匹配
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    match extension.trim_start_matches('.').to_lowercase().as_str() {
        // 图片格式
        "png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        "jpg" | "jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        "gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),

        // 文档格式
        "pdf" => data.starts_with(b"%PDF"),
        // MS Office 旧格式 (OLE Compound Document)
        "doc" => data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]),
        // MS Office 新格式与 zip 同为 PK 头
        "docx" | "zip" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),

        // 文本及其他格式 - 不检查魔术字节
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png_header, "png"));
        assert!(validate_magic_bytes(&png_header, "PNG"));
        assert!(!validate_magic_bytes(&png_header, "jpg"));
    }

    #[test]
    fn test_pdf_magic() {
        assert!(validate_magic_bytes(b"%PDF-1.4", "pdf"));
        assert!(validate_magic_bytes(b"%PDF-1.4", ".pdf"));
        assert!(!validate_magic_bytes(b"%PDF-1.4", "docx"));
        assert!(!validate_magic_bytes(b"", "pdf"));
    }

    #[test]
    fn test_text_files_not_checked() {
        assert!(validate_magic_bytes(b"Hello, World!", "txt"));
        assert!(validate_magic_bytes(b"", "txt"));
    }
}
