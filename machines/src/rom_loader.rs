//! ROM loading for arcade machine emulation.
//!
//! Supports loading ROM files from pre-extracted ROM directories, from ZIP
//! entries handed over by the front-end, or from programmatic byte slices
//! (for testing). Short files are padded to their declared size with 0xFF
//! (the RST 38h opcode, what an unprogrammed EPROM reads as); missing
//! files are an error left to the caller to handle or surface.

use std::collections::HashMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a ROM set.
#[derive(Debug)]
pub enum RomLoadError {
    /// Underlying I/O error (file not found, permission denied, etc.)
    Io(std::io::Error),

    /// A required ROM file was not found in the set.
    MissingFile(String),

    /// ROM file is larger than the declared chip size.
    Oversized {
        file: String,
        expected: usize,
        actual: usize,
    },
}

impl std::fmt::Display for RomLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingFile(name) => write!(f, "missing ROM file: {name}"),
            Self::Oversized {
                file,
                expected,
                actual,
            } => write!(f, "ROM {file}: expected at most {expected} bytes, got {actual}"),
        }
    }
}

impl std::error::Error for RomLoadError {}

impl From<std::io::Error> for RomLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// RomSet
// ---------------------------------------------------------------------------

/// A collection of ROM files loaded from disk or provided programmatically.
pub struct RomSet {
    files: HashMap<String, Vec<u8>>,
}

impl RomSet {
    /// Create a RomSet from a directory of extracted ROM files.
    ///
    /// Reads all files in the directory (non-recursive) and stores
    /// them by filename (without path).
    pub fn from_directory(path: &Path) -> Result<Self, RomLoadError> {
        let mut files = HashMap::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let file_path = entry.path();
            if file_path.is_file() {
                let name = file_path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                let data = std::fs::read(&file_path)?;
                files.insert(name, data);
            }
        }
        Ok(Self { files })
    }

    /// Create a RomSet from owned (filename, data) pairs, e.g. extracted
    /// from a ZIP archive.
    pub fn from_entries(entries: Vec<(String, Vec<u8>)>) -> Self {
        Self {
            files: entries.into_iter().collect(),
        }
    }

    /// Create a RomSet from programmatic byte slices (for testing).
    pub fn from_slices(entries: &[(&str, &[u8])]) -> Self {
        let mut files = HashMap::new();
        for (name, data) in entries {
            files.insert(name.to_string(), data.to_vec());
        }
        Self { files }
    }

    /// Get a ROM file's data by name.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(|v| v.as_slice())
    }

    /// Get a ROM file's data, returning an error if missing.
    pub fn require(&self, name: &str) -> Result<&[u8], RomLoadError> {
        self.get(name)
            .ok_or_else(|| RomLoadError::MissingFile(name.to_string()))
    }

    /// List all file names in the set.
    pub fn file_names(&self) -> Vec<&str> {
        self.files.keys().map(|s| s.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// RomEntry / RomRegion
// ---------------------------------------------------------------------------

/// Describes how a single ROM file maps into a memory region.
pub struct RomEntry {
    /// Filename in the ROM set.
    pub name: &'static str,
    /// Declared chip size in bytes.
    pub size: usize,
    /// Offset within the target memory region where this ROM is loaded.
    pub offset: usize,
}

/// Describes the complete ROM mapping for a machine or subsystem.
///
/// A region has a total size and a list of ROM entries that fill parts of
/// it. [`load`](Self::load) assembles the region from a [`RomSet`]: every
/// entry must be present, a short file is padded to the declared size with
/// 0xFF (with a stderr warning), a file larger than the chip is rejected.
pub struct RomRegion {
    /// Total size of the memory region in bytes.
    pub size: usize,
    /// Individual ROM file entries.
    pub entries: &'static [RomEntry],
}

impl RomRegion {
    /// Load all ROM files into a contiguous byte array.
    pub fn load(&self, rom_set: &RomSet) -> Result<Vec<u8>, RomLoadError> {
        let mut region = vec![0xFFu8; self.size];

        for entry in self.entries {
            debug_assert!(
                entry.offset + entry.size <= self.size,
                "RomEntry '{}' exceeds region bounds: offset {} + size {} > region size {}",
                entry.name,
                entry.offset,
                entry.size,
                self.size,
            );

            let data = rom_set.require(entry.name)?;
            if data.len() > entry.size {
                return Err(RomLoadError::Oversized {
                    file: entry.name.to_string(),
                    expected: entry.size,
                    actual: data.len(),
                });
            }
            if data.len() < entry.size {
                eprintln!(
                    "rom: {} is {} bytes, padding to {} with 0xFF",
                    entry.name,
                    data.len(),
                    entry.size
                );
            }

            region[entry.offset..entry.offset + data.len()].copy_from_slice(data);
        }

        Ok(region)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- RomSet --------------------------------------------------------------

    #[test]
    fn from_slices_creates_romset() {
        let rom_set = RomSet::from_slices(&[
            ("test1.rom", &[0x01, 0x02, 0x03]),
            ("test2.rom", &[0x04, 0x05]),
        ]);
        assert_eq!(rom_set.get("test1.rom"), Some(&[0x01, 0x02, 0x03][..]));
        assert_eq!(rom_set.get("test2.rom"), Some(&[0x04, 0x05][..]));
    }

    #[test]
    fn from_entries_creates_romset() {
        let rom_set = RomSet::from_entries(vec![("a.rom".to_string(), vec![0xAA])]);
        assert_eq!(rom_set.get("a.rom"), Some(&[0xAA][..]));
    }

    #[test]
    fn get_missing_returns_none() {
        let rom_set = RomSet::from_slices(&[("a.rom", &[0x00])]);
        assert!(rom_set.get("missing.rom").is_none());
    }

    #[test]
    fn require_missing_returns_error() {
        let rom_set = RomSet::from_slices(&[]);
        let result = rom_set.require("missing.rom");
        assert!(matches!(result, Err(RomLoadError::MissingFile(_))));
    }

    #[test]
    fn file_names_lists_all() {
        let rom_set = RomSet::from_slices(&[("alpha.rom", &[]), ("beta.rom", &[])]);
        let mut names = rom_set.file_names();
        names.sort();
        assert_eq!(names, vec!["alpha.rom", "beta.rom"]);
    }

    // -- RomRegion::load -----------------------------------------------------

    #[test]
    fn load_single_rom() {
        static ENTRIES: [RomEntry; 1] = [RomEntry {
            name: "test.rom",
            size: 4,
            offset: 0,
        }];
        let region = RomRegion {
            size: 4,
            entries: &ENTRIES,
        };
        let rom_set = RomSet::from_slices(&[("test.rom", &[0xDE, 0xAD, 0xBE, 0xEF])]);
        let result = region.load(&rom_set).unwrap();
        assert_eq!(result, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn load_short_rom_pads_with_ff() {
        static ENTRIES: [RomEntry; 1] = [RomEntry {
            name: "test.rom",
            size: 8,
            offset: 0,
        }];
        let region = RomRegion {
            size: 8,
            entries: &ENTRIES,
        };
        let rom_set = RomSet::from_slices(&[("test.rom", &[0x11, 0x22])]);
        let loaded = region.load(&rom_set).unwrap();
        assert_eq!(loaded, vec![0x11, 0x22, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn load_oversized_rom_rejected() {
        static ENTRIES: [RomEntry; 1] = [RomEntry {
            name: "test.rom",
            size: 4,
            offset: 0,
        }];
        let region = RomRegion {
            size: 4,
            entries: &ENTRIES,
        };
        let rom_set = RomSet::from_slices(&[("test.rom", &[0u8; 5])]);
        let result = region.load(&rom_set);
        assert!(matches!(result, Err(RomLoadError::Oversized { .. })));
    }

    #[test]
    fn load_multiple_roms_at_offsets() {
        static ENTRIES: [RomEntry; 3] = [
            RomEntry {
                name: "rom1.bin",
                size: 8,
                offset: 0,
            },
            RomEntry {
                name: "rom2.bin",
                size: 8,
                offset: 8,
            },
            RomEntry {
                name: "rom3.bin",
                size: 8,
                offset: 16,
            },
        ];
        let region = RomRegion {
            size: 24,
            entries: &ENTRIES,
        };
        let rom_set = RomSet::from_slices(&[
            ("rom1.bin", &[0x11; 8]),
            ("rom2.bin", &[0x22; 8]),
            ("rom3.bin", &[0x33; 8]),
        ]);
        let loaded = region.load(&rom_set).unwrap();
        assert_eq!(loaded.len(), 24);
        assert!(loaded[..8].iter().all(|&b| b == 0x11));
        assert!(loaded[8..16].iter().all(|&b| b == 0x22));
        assert!(loaded[16..24].iter().all(|&b| b == 0x33));
    }

    #[test]
    fn load_missing_file_in_region() {
        static ENTRIES: [RomEntry; 2] = [
            RomEntry {
                name: "rom1.bin",
                size: 8,
                offset: 0,
            },
            RomEntry {
                name: "rom2.bin",
                size: 8,
                offset: 8,
            },
        ];
        let region = RomRegion {
            size: 16,
            entries: &ENTRIES,
        };
        let rom_set = RomSet::from_slices(&[("rom1.bin", &[0u8; 8])]);
        let result = region.load(&rom_set);
        assert!(matches!(result, Err(RomLoadError::MissingFile(_))));
    }

    // -- Directory loading ---------------------------------------------------

    #[test]
    fn from_directory_loads_files() {
        let dir = std::env::temp_dir().join("marquee_rom_loader_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("test.rom"), [0xAA, 0xBB]).unwrap();

        let rom_set = RomSet::from_directory(&dir).unwrap();
        assert_eq!(rom_set.get("test.rom"), Some(&[0xAA, 0xBB][..]));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
