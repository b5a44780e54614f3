use std::fs::File;
use std::io::Read;
use std::path::Path;

use marquee_machines::rom_loader::{RomLoadError, RomSet};

/// Resolve a user-supplied ROM path into a loaded [`RomSet`].
///
/// Accepts, in order of preference:
/// - a ZIP archive of ROM files
/// - a directory containing `{machine_name}.zip`
/// - a directory of loose ROM files
/// - a single program image file
pub fn load_rom_set(machine_name: &str, path: &str) -> Result<RomSet, RomLoadError> {
    let path = Path::new(path);

    if path.is_file() {
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip")) {
            return load_from_zip(path);
        }
        return load_single_file(path);
    }

    if path.is_dir() {
        let zip_path = path.join(format!("{machine_name}.zip"));
        if zip_path.is_file() {
            return load_from_zip(&zip_path);
        }
        return RomSet::from_directory(path);
    }

    Err(RomLoadError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("ROM path not found: {}", path.display()),
    )))
}

/// Load every file in a ZIP archive into a ROM set.
fn load_from_zip(path: &Path) -> Result<RomSet, RomLoadError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| RomLoadError::Io(std::io::Error::other(e.to_string())))?;

    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| RomLoadError::Io(std::io::Error::other(e.to_string())))?;
        if entry.is_dir() {
            continue;
        }
        let name = Path::new(entry.name())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.name().to_string());
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        entries.push((name, data));
    }

    Ok(RomSet::from_entries(entries))
}

/// Treat a lone file as a monolithic program image.
fn load_single_file(path: &Path) -> Result<RomSet, RomLoadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rom".to_string());
    let data = std::fs::read(path)?;
    Ok(RomSet::from_entries(vec![(name, data)]))
}
