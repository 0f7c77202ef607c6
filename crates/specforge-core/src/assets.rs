//! Static ambient-module typings for image imports.

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use tokio::fs;

/// Ambient declarations letting TypeScript accept image imports as URLs
pub const IMAGE_TYPINGS: &str = "\
// Generated by specforge. Do not edit by hand.
declare module \"*.png\" { const url: string; export default url; }
declare module \"*.jpg\" { const url: string; export default url; }
declare module \"*.jpeg\" { const url: string; export default url; }
declare module \"*.gif\" { const url: string; export default url; }
declare module \"*.svg\" { const url: string; export default url; }
declare module \"*.webp\" { const url: string; export default url; }
";

/// Write the image typings stub, creating parent directories as needed.
pub async fn write_image_typings(path: &Path) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, IMAGE_TYPINGS).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_image_typings() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("types/images.d.ts");

        write_image_typings(&path).await?;

        let content = fs::read_to_string(&path).await?;
        assert!(content.contains("declare module \"*.png\""));
        assert!(content.contains("declare module \"*.webp\""));
        Ok(())
    }
}
