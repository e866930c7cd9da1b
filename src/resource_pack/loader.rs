//! Resource pack loading from ZIP files and directories.

use super::{BlockstateDefinition, JsonModel, ResourcePack};
use crate::error::{ModelError, Result};
use crate::resource_pack::texture::load_texture_from_bytes;
use log::warn;
use std::io::Read;
use std::path::Path;

/// Load a resource pack from a file path.
///
/// Supports both ZIP files and directories.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ResourcePack> {
    let path = path.as_ref();

    if path.is_dir() {
        load_from_directory(path)
    } else {
        let data = std::fs::read(path)?;
        load_from_bytes(&data)
    }
}

/// Load a resource pack from bytes (ZIP data).
pub fn load_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut pack = ResourcePack::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let file_path = file.name().to_string();
        let Some((namespace, asset_type, asset_path)) = parse_asset_path(&file_path) else {
            continue;
        };

        match asset_type {
            "blockstates" if asset_path.ends_with(".json") => {
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                add_blockstate(&mut pack, namespace, asset_path.trim_end_matches(".json"), &contents);
            }
            "models" if asset_path.ends_with(".json") => {
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                add_model(&mut pack, namespace, asset_path.trim_end_matches(".json"), &contents);
            }
            "textures" if asset_path.ends_with(".png") => {
                let mut data = Vec::new();
                file.read_to_end(&mut data)?;
                add_texture(&mut pack, namespace, asset_path.trim_end_matches(".png"), &data);
            }
            _ => {}
        }
    }

    Ok(pack)
}

/// Load a resource pack from a directory.
fn load_from_directory(path: &Path) -> Result<ResourcePack> {
    let mut pack = ResourcePack::new();

    let assets_path = path.join("assets");
    if !assets_path.exists() {
        return Err(ModelError::InvalidResourcePack(
            "No assets directory found".to_string(),
        ));
    }

    for namespace_entry in std::fs::read_dir(&assets_path)? {
        let namespace_entry = namespace_entry?;
        if !namespace_entry.file_type()?.is_dir() {
            continue;
        }

        let namespace = namespace_entry.file_name().to_string_lossy().to_string();
        let namespace_path = namespace_entry.path();

        let blockstates_path = namespace_path.join("blockstates");
        if blockstates_path.exists() {
            visit_files(&blockstates_path, &blockstates_path, "json", &mut |block_id, data| {
                add_blockstate(&mut pack, &namespace, block_id, &String::from_utf8_lossy(data));
            })?;
        }

        let models_path = namespace_path.join("models");
        if models_path.exists() {
            visit_files(&models_path, &models_path, "json", &mut |model_path, data| {
                add_model(&mut pack, &namespace, model_path, &String::from_utf8_lossy(data));
            })?;
        }

        let textures_path = namespace_path.join("textures");
        if textures_path.exists() {
            visit_files(&textures_path, &textures_path, "png", &mut |texture_path, data| {
                add_texture(&mut pack, &namespace, texture_path, data);
            })?;
        }
    }

    Ok(pack)
}

fn add_blockstate(pack: &mut ResourcePack, namespace: &str, block_id: &str, contents: &str) {
    match serde_json::from_str::<BlockstateDefinition>(contents) {
        Ok(def) => pack.add_blockstate(namespace, block_id, def),
        Err(e) => warn!("Failed to parse blockstate {}:{}: {}", namespace, block_id, e),
    }
}

fn add_model(pack: &mut ResourcePack, namespace: &str, model_path: &str, contents: &str) {
    match serde_json::from_str::<JsonModel>(contents) {
        Ok(model) => pack.add_model(namespace, model_path, model),
        Err(e) => warn!("Failed to parse model {}:{}: {}", namespace, model_path, e),
    }
}

fn add_texture(pack: &mut ResourcePack, namespace: &str, texture_path: &str, data: &[u8]) {
    match load_texture_from_bytes(data) {
        Ok(texture) => pack.add_texture(namespace, texture_path, texture),
        Err(e) => warn!("Failed to load texture {}:{}: {}", namespace, texture_path, e),
    }
}

/// Parse an asset path from a ZIP file.
/// Returns (namespace, asset_type, asset_path) if valid.
fn parse_asset_path(file_path: &str) -> Option<(&str, &str, &str)> {
    // Expected format: assets/{namespace}/{type}/{path}
    let parts: Vec<&str> = file_path.splitn(4, '/').collect();

    if parts.len() >= 4 && parts[0] == "assets" {
        Some((parts[1], parts[2], parts[3]))
    } else {
        None
    }
}

/// Recursively visit files with the given extension, passing the path relative
/// to `base` (extension stripped, `/`-separated) and the file contents.
fn visit_files<F>(base: &Path, dir: &Path, extension: &str, handler: &mut F) -> Result<()>
where
    F: FnMut(&str, &[u8]),
{
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            visit_files(base, &path, extension, handler)?;
        } else if path.extension().map(|e| e == extension).unwrap_or(false) {
            let Ok(relative) = path.strip_prefix(base) else {
                continue;
            };
            let relative = relative
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");

            let data = std::fs::read(&path)?;
            handler(&relative, &data);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_asset_path() {
        assert_eq!(
            parse_asset_path("assets/minecraft/blockstates/stone.json"),
            Some(("minecraft", "blockstates", "stone.json"))
        );
        assert_eq!(
            parse_asset_path("assets/minecraft/models/block/stone.json"),
            Some(("minecraft", "models", "block/stone.json"))
        );
        assert_eq!(
            parse_asset_path("assets/mymod/textures/block/custom.png"),
            Some(("mymod", "textures", "block/custom.png"))
        );
        assert_eq!(parse_asset_path("pack.mcmeta"), None);
        assert_eq!(parse_asset_path("data/minecraft/recipes/test.json"), None);
    }

    #[test]
    fn test_load_directory_pack() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets/minecraft");
        fs::create_dir_all(assets.join("models/block")).unwrap();
        fs::create_dir_all(assets.join("blockstates")).unwrap();

        fs::write(
            assets.join("models/block/stone.json"),
            r#"{ "parent": "block/cube_all", "textures": { "all": "block/stone" } }"#,
        )
        .unwrap();
        fs::write(assets.join("models/block/broken.json"), "{ not json").unwrap();
        fs::write(
            assets.join("blockstates/stone.json"),
            r#"{ "variants": { "": { "model": "block/stone" } } }"#,
        )
        .unwrap();

        let pack = load_from_path(dir.path()).unwrap();
        assert_eq!(pack.model_count(), 1);
        assert!(pack.get_model("minecraft:block/stone").is_some());
        assert!(pack.get_blockstate("minecraft:stone").is_some());
    }

    #[test]
    fn test_missing_assets_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_from_path(dir.path()),
            Err(ModelError::InvalidResourcePack(_))
        ));
    }
}
