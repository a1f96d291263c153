//! # XML hotel inventory
//!
//! Hotels live in an XML document of `<hotel>` blocks, each carrying a
//! `<hotelId>` and an `<availableRooms>` count. Updates walk the document
//! as an event stream, rewrite the one element that changes, and copy
//! every other event through untouched, so formatting, comments and
//! unrelated hotels come back byte-for-byte.

use chrono::Utc;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesEnd, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, warn};
use waypoint_core::{CoreError, CoreResult};

use crate::temp_path;

const HOTEL_TAG: &[u8] = b"hotel";
const HOTEL_ID_TAG: &[u8] = b"hotelId";
const ROOMS_TAG: &[u8] = b"availableRooms";

#[derive(Debug, thiserror::Error)]
enum HotelXmlError {
    #[error("malformed hotel XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("failed to write hotel XML: {0}")]
    Io(#[from] std::io::Error),
    #[error("hotel XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<HotelXmlError> for CoreError {
    fn from(err: HotelXmlError) -> Self {
        CoreError::StorageUnavailable(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelUpdate {
    pub hotel_id: String,
    pub new_available_rooms: u32,
    /// Where the pre-update document was saved, if the backup succeeded.
    pub backup: Option<PathBuf>,
}

pub struct XmlHotelInventory {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl XmlHotelInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn set_available_rooms(&self, hotel_id: &str, rooms: u32) -> CoreResult<HotelUpdate> {
        let _guard = self.write_lock.lock().await;

        let original = fs::read_to_string(&self.path).await.map_err(|e| {
            CoreError::StorageUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let updated = rewrite_available_rooms(&original, hotel_id, rooms)?
            .ok_or_else(|| CoreError::NotFound(format!("hotel {}", hotel_id)))?;

        let backup_path = PathBuf::from(format!(
            "{}.bak.{}",
            self.path.display(),
            Utc::now().timestamp_millis()
        ));
        let backup = match fs::write(&backup_path, &original).await {
            Ok(()) => {
                info!("Created hotels backup: {:?}", backup_path);
                Some(backup_path)
            }
            Err(e) => {
                warn!("Failed to create hotels backup {:?}: {}", backup_path, e);
                None
            }
        };

        let temp_path = temp_path(&self.path);
        fs::write(&temp_path, updated).await.map_err(HotelXmlError::from)?;
        fs::rename(&temp_path, &self.path).await.map_err(HotelXmlError::from)?;

        info!("Hotel {} now has {} room(s) available", hotel_id, rooms);

        Ok(HotelUpdate {
            hotel_id: hotel_id.to_string(),
            new_available_rooms: rooms,
            backup,
        })
    }
}

/// Rewritten document, or `None` when no hotel carries `hotel_id`.
fn rewrite_available_rooms(xml: &str, hotel_id: &str, rooms: u32) -> Result<Option<String>, HotelXmlError> {
    let rooms_text = rooms.to_string();
    let wanted = hotel_id.to_lowercase();

    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    let mut block: Vec<Event> = Vec::new();
    let mut depth = 0usize;
    let mut updated = false;

    loop {
        let event = reader.read_event()?;
        if matches!(event, Event::Eof) {
            break;
        }

        match &event {
            Event::Start(e) if is_tag(e.name().as_ref(), HOTEL_TAG) => depth += 1,
            Event::End(e) if depth > 0 && is_tag(e.name().as_ref(), HOTEL_TAG) => depth -= 1,
            _ => {}
        }

        if block.is_empty() && depth == 0 {
            writer.write_event(event)?;
            continue;
        }

        block.push(event);
        if depth > 0 {
            continue;
        }

        let mut events = std::mem::take(&mut block);
        if !updated && block_hotel_id(&events).is_some_and(|id| id.to_lowercase() == wanted) {
            events = replace_rooms(events, &rooms_text);
            updated = true;
        }
        for e in events {
            writer.write_event(e)?;
        }
    }

    // Unterminated trailing block: keep it as-is.
    for e in block {
        writer.write_event(e)?;
    }

    if !updated {
        return Ok(None);
    }
    Ok(Some(String::from_utf8(writer.into_inner())?))
}

fn is_tag(name: &[u8], tag: &[u8]) -> bool {
    name.eq_ignore_ascii_case(tag)
}

/// Trimmed text of the first `<hotelId>` in a `<hotel>` block.
fn block_hotel_id(events: &[Event]) -> Option<String> {
    let mut inside = false;
    let mut text = String::new();

    for event in events {
        match event {
            Event::Start(e) if is_tag(e.name().as_ref(), HOTEL_ID_TAG) => inside = true,
            Event::Text(t) if inside => text.push_str(&String::from_utf8_lossy(t)),
            Event::CData(t) if inside => text.push_str(&String::from_utf8_lossy(t)),
            Event::GeneralRef(r) if inside => push_entity(&mut text, &String::from_utf8_lossy(r)),
            Event::End(e) if inside && is_tag(e.name().as_ref(), HOTEL_ID_TAG) => {
                return Some(text.trim().to_string());
            }
            _ => {}
        }
    }
    None
}

/// Appends the text an `&name;` reference stands for. Unknown entities are
/// kept verbatim.
fn push_entity(text: &mut String, name: &str) {
    let resolved = match name.strip_prefix('#') {
        Some(code) => match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        }
        .and_then(char::from_u32)
        .map(|c| text.push(c)),
        None => resolve_predefined_entity(name).map(|s| text.push_str(s)),
    };

    if resolved.is_none() {
        text.push('&');
        text.push_str(name);
        text.push(';');
    }
}

/// Swaps the content of the first `<availableRooms>` element for `rooms`.
fn replace_rooms<'a>(events: Vec<Event<'a>>, rooms: &'a str) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len() + 2);
    let mut inside = false;
    let mut done = false;

    for event in events {
        if inside {
            if let Event::End(e) = &event {
                if is_tag(e.name().as_ref(), ROOMS_TAG) {
                    inside = false;
                    done = true;
                    out.push(event);
                }
            }
            continue;
        }

        match event {
            Event::Start(e) if !done && is_tag(e.name().as_ref(), ROOMS_TAG) => {
                out.push(Event::Start(e));
                out.push(Event::Text(BytesText::new(rooms)));
                inside = true;
            }
            Event::Empty(e) if !done && is_tag(e.name().as_ref(), ROOMS_TAG) => {
                let end = BytesEnd::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                out.push(Event::Start(e));
                out.push(Event::Text(BytesText::new(rooms)));
                out.push(Event::End(end));
                done = true;
            }
            other => out.push(other),
        }
    }

    out
}
