//! JSON serialization of snapshots.
//!
//! The document keeps addresses as hex strings so a capture stays readable
//! next to the `/proc` listing it came from:
//!
//! ```json
//! {
//!   "pid": 1234,
//!   "regions": [
//!     { "start": "0x7f45c000", "end": "0x7f45e000", "offset": "0x0",
//!       "load_bias": "0x0", "perms": "r-x", "device": false,
//!       "name": "/system/lib/libc.so" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::domain::{ExportError, Pid};
use crate::maps::{MapRegion, MapSnapshot, Protection};

#[derive(Debug, Serialize, Deserialize)]
struct ExportedSnapshot {
    pid: libc::pid_t,
    regions: Vec<ExportedRegion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ExportedRegion {
    start: String,
    end: String,
    offset: String,
    load_bias: String,
    perms: String,
    device: bool,
    name: String,
}

impl From<&MapRegion> for ExportedRegion {
    fn from(region: &MapRegion) -> Self {
        Self {
            start: format!("{:#x}", region.start),
            end: format!("{:#x}", region.end),
            offset: format!("{:#x}", region.offset),
            load_bias: format!("{:#x}", region.load_bias),
            perms: region.flags.perm_string(),
            device: region.is_device(),
            name: region.name.clone(),
        }
    }
}

impl ExportedRegion {
    fn to_region(&self) -> Result<MapRegion, ExportError> {
        let mut flags = Protection::from_perm_chars(&self.perms);
        if self.device {
            flags |= Protection::DEVICE;
        }
        Ok(MapRegion {
            start: parse_hex("start", &self.start)?,
            end: parse_hex("end", &self.end)?,
            offset: parse_hex("offset", &self.offset)?,
            load_bias: parse_hex("load_bias", &self.load_bias)?,
            flags,
            name: self.name.clone(),
        })
    }
}

fn parse_hex(field: &str, value: &str) -> Result<u64, ExportError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    u64::from_str_radix(digits, 16)
        .map_err(|_| ExportError::InvalidField(format!("{field}: {value:?} is not hex")))
}

/// Exporter for a snapshot's region list.
pub struct SnapshotExporter<'a> {
    snapshot: &'a MapSnapshot,
}

impl<'a> SnapshotExporter<'a> {
    #[must_use]
    pub fn new(snapshot: &'a MapSnapshot) -> Self {
        Self { snapshot }
    }

    /// Write the snapshot as pretty-printed JSON.
    ///
    /// The traversal holds the iteration lock for the duration of the
    /// serialization, so a concurrent rebuild cannot tear the document.
    ///
    /// # Errors
    /// Fails on serialization or write errors.
    pub fn export<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let guard = self.snapshot.regions();
        let doc = ExportedSnapshot {
            pid: self.snapshot.pid().0,
            regions: guard.regions().iter().map(ExportedRegion::from).collect(),
        };
        serde_json::to_writer_pretty(writer, &doc)?;
        Ok(())
    }

    /// Export to a file path through a buffered writer.
    ///
    /// # Errors
    /// Fails when the file cannot be created or written.
    pub fn export_to_file(&self, path: &Path) -> Result<(), ExportError> {
        let file = File::create(path)?;
        self.export(BufWriter::new(file))
    }
}

/// Parse a previously exported document back into a pid and an ordered
/// region list, suitable for [`MapSnapshot::from_regions`].
///
/// # Errors
/// Fails on malformed JSON or non-hex address fields.
pub fn import<R: Read>(reader: R) -> Result<(Pid, Vec<MapRegion>), ExportError> {
    let doc: ExportedSnapshot = serde_json::from_reader(reader)?;
    let regions =
        doc.regions.iter().map(ExportedRegion::to_region).collect::<Result<Vec<_>, _>>()?;
    Ok((Pid(doc.pid), regions))
}

/// Convenience wrapper over [`import`] for a file path.
///
/// # Errors
/// Fails when the file cannot be opened or parsed.
pub fn import_from_file(path: &Path) -> Result<(Pid, Vec<MapRegion>), ExportError> {
    let file = File::open(path)?;
    import(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::SnapshotOptions;

    fn sample_regions() -> Vec<MapRegion> {
        vec![
            MapRegion {
                start: 0x7f45_c000,
                end: 0x7f45_e000,
                offset: 0,
                load_bias: 0,
                flags: Protection::READ | Protection::EXEC,
                name: "/system/lib/libc.so".to_string(),
            },
            MapRegion {
                start: 0xf000_0000,
                end: 0xf000_1000,
                offset: 0x1000,
                load_bias: 0,
                flags: Protection::READ | Protection::WRITE | Protection::DEVICE,
                name: "/dev/binder".to_string(),
            },
        ]
    }

    #[test]
    fn test_export_is_valid_json_with_hex_addresses() {
        let snapshot =
            MapSnapshot::from_regions(Pid(42), sample_regions(), SnapshotOptions::default());
        let mut buffer = Vec::new();
        SnapshotExporter::new(&snapshot).export(&mut buffer).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["pid"], 42);
        let regions = parsed["regions"].as_array().unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0]["start"], "0x7f45c000");
        assert_eq!(regions[0]["perms"], "r-x");
        assert_eq!(regions[1]["device"], true);
    }

    #[test]
    fn test_export_import_round_trip() {
        let regions = sample_regions();
        let snapshot =
            MapSnapshot::from_regions(Pid(42), regions.clone(), SnapshotOptions::default());
        let mut buffer = Vec::new();
        SnapshotExporter::new(&snapshot).export(&mut buffer).unwrap();

        let (pid, replayed) = import(buffer.as_slice()).unwrap();
        assert_eq!(pid, Pid(42));
        assert_eq!(replayed, regions);
    }

    #[test]
    fn test_import_rejects_non_hex_field() {
        let doc = r#"{"pid": 1, "regions": [
            {"start": "xyz", "end": "0x2000", "offset": "0x0",
             "load_bias": "0x0", "perms": "r--", "device": false, "name": ""}
        ]}"#;
        assert!(matches!(import(doc.as_bytes()), Err(ExportError::InvalidField(_))));
    }
}
