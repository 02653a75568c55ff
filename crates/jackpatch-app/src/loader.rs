//! Asset directory scanning, file-backed asset loading and config files.

use crate::error::{AppError, AppResult};
use jackpatch_core::{
    Asset, AssetCatalog, AssetError, AssetLoader, AssetResult, BoxFuture, EditorConfig, ImageData,
};
use jackpatch_render::decode_file;
use std::path::{Component, Path, PathBuf};

const MANIFEST: &str = "manifest.json";
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the editor configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> AppResult<EditorConfig> {
    match path {
        Some(path) => {
            let config: EditorConfig = read_json(path)?;
            log::info!("Loaded config from: {:?}", path);
            Ok(config)
        }
        None => Ok(EditorConfig::default()),
    }
}

/// Build the catalog from every image file in `dir`, sorted by name.
/// Entries in `manifest.json` override names and default sizes, and may
/// add sources that are not files in the directory.
pub fn scan_catalog(dir: &Path) -> AppResult<AssetCatalog> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()));
        if is_image && path.is_file() {
            if let Some(name) = path.file_name() {
                files.push(name.to_string_lossy().into_owned());
            }
        }
    }
    files.sort();

    let mut catalog: AssetCatalog = files
        .into_iter()
        .map(|source| {
            let name = Path::new(&source)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.clone());
            Asset::new(source).with_name(name)
        })
        .collect();

    let manifest = dir.join(MANIFEST);
    if manifest.is_file() {
        let entries: Vec<Asset> = read_json(&manifest)?;
        log::debug!("Applying {} manifest entries", entries.len());
        for mut asset in entries {
            if asset.name.is_empty() {
                asset.name = catalog
                    .find(&asset.source)
                    .map(|existing| existing.name.clone())
                    .unwrap_or_else(|| asset.source.clone());
            }
            catalog.insert(asset);
        }
    }

    log::info!("Found {} assets in {:?}", catalog.len(), dir);
    Ok(catalog)
}

/// Loads assets from files under a root directory.
#[derive(Debug, Clone)]
pub struct FileAssetLoader {
    root: PathBuf,
}

impl FileAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a source to a file under the root. Absolute paths and
    /// parent components are refused.
    fn resolve(&self, source: &str) -> AssetResult<PathBuf> {
        if source.trim().is_empty() {
            return Err(AssetError::EmptySource);
        }
        let relative = Path::new(source);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(AssetError::NotFound(source.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl AssetLoader for FileAssetLoader {
    fn load(&self, source: &str) -> BoxFuture<'_, AssetResult<ImageData>> {
        let path = self.resolve(source);
        Box::pin(async move {
            let path = path?;
            let image = decode_file(&path)?;
            log::debug!("Loaded {:?} ({}x{})", path, image.width(), image.height());
            Ok(image)
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jackpatch_render::{RenderedImage, encode_png};

    /// Write a solid-colour PNG into `dir`.
    pub(crate) fn write_png(dir: &Path, name: &str, width: u32, height: u32, rgba: [u8; 4]) {
        let image = RenderedImage {
            rgba_data: rgba.repeat((width * height) as usize),
            width,
            height,
        };
        std::fs::write(dir.join(name), encode_png(&image).unwrap()).unwrap();
    }

    #[test]
    fn test_scan_catalog_sorted_images_only() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "nose.png", 2, 2, [0, 0, 0, 255]);
        write_png(dir.path(), "eye.png", 2, 2, [0, 0, 0, 255]);
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let catalog = scan_catalog(dir.path()).unwrap();
        let sources: Vec<_> = catalog.iter().map(|a| a.source.as_str()).collect();
        assert_eq!(sources, vec!["eye.png", "nose.png"]);
        assert_eq!(catalog.find("eye.png").unwrap().name, "eye");
        assert_eq!(catalog.find("eye.png").unwrap().default_size, None);
    }

    #[test]
    fn test_manifest_overrides() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "eye.png", 2, 2, [0, 0, 0, 255]);
        std::fs::write(
            dir.path().join(MANIFEST),
            r#"[{"source":"eye.png","name":"Spooky eye","size":120}]"#,
        )
        .unwrap();

        let catalog = scan_catalog(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        let eye = catalog.find("eye.png").unwrap();
        assert_eq!(eye.name, "Spooky eye");
        assert_eq!(eye.default_size, Some(120.0));
    }

    #[test]
    fn test_manifest_size_strings() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "eye.png", 2, 2, [0, 0, 0, 255]);
        write_png(dir.path(), "nose.png", 2, 2, [0, 0, 0, 255]);
        std::fs::write(
            dir.path().join(MANIFEST),
            r#"[{"source":"eye.png","size":"80"},{"source":"nose.png","size":"big"}]"#,
        )
        .unwrap();

        let catalog = scan_catalog(dir.path()).unwrap();
        assert_eq!(catalog.find("eye.png").unwrap().default_size, Some(80.0));
        assert_eq!(catalog.find("nose.png").unwrap().default_size, None);
        assert_eq!(catalog.find("nose.png").unwrap().name, "nose");
    }

    #[test]
    fn test_bad_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST), "{").unwrap();
        assert!(matches!(scan_catalog(dir.path()), Err(AppError::Json { .. })));
    }

    #[test]
    fn test_file_loader() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "eye.png", 3, 2, [1, 2, 3, 255]);
        let loader = FileAssetLoader::new(dir.path());

        let image = pollster::block_on(loader.load("eye.png")).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert!(matches!(
            pollster::block_on(loader.load("")),
            Err(AssetError::EmptySource)
        ));
        assert!(matches!(
            pollster::block_on(loader.load("missing.png")),
            Err(AssetError::NotFound(_))
        ));
        assert!(matches!(
            pollster::block_on(loader.load("../eye.png")),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_config() {
        assert_eq!(load_config(None).unwrap(), EditorConfig::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"history_capacity": 5, "keep_ratio": false}"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.history_capacity, 5);
        assert!(!config.keep_ratio);
        assert_eq!(config.duplicate_offset, 30.0);
    }
}
