use std::path::{Path, PathBuf};

pub mod app_config;
pub mod flight_file;
pub mod hotel_xml;

pub use flight_file::JsonFileInventory;
pub use hotel_xml::{HotelUpdate, XmlHotelInventory};

/// Sibling temp file used for write-then-rename: `<path>.tmp`.
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
