use std::path::Path;

/// MIME type for a file name, judged by its extension.
pub fn mime_from_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_image_extensions_case_insensitively() {
        assert_eq!(mime_from_path(Path::new("car.JPG")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("dir/side.webp")), "image/webp");
        assert_eq!(mime_from_path(Path::new("noext")), "application/octet-stream");
    }
}
