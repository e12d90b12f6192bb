//! Parser for the `/proc/<pid>/maps` listing format.
//!
//! The format is the kernel's external contract, consumed here and never
//! redefined:
//!
//! ```text
//! start-end perms offset dev inode          [path]
//! 7f45c000-7f45e000 r-xp 00000000 08:01 123456   /system/lib/libc.so
//! ```
//!
//! The first five columns are single-space separated; the optional path
//! column follows alignment padding and may itself contain spaces.

use super::region::{MapRegion, Protection};

/// Mappings under this prefix get the `DEVICE` classification bit.
const DEVICE_PREFIX: &str = "/dev/";
/// Except ashmem, which is ordinary memory that happens to live in `/dev/`.
const ASHMEM_PREFIX: &str = "/dev/ashmem/";

/// Parse a single maps-listing line into a region record.
///
/// Returns `None` for malformed lines; callers skip those without
/// aborting the surrounding build.
#[must_use]
pub fn parse_line(line: &str) -> Option<MapRegion> {
    let mut columns = line.splitn(6, ' ');

    let range = columns.next()?;
    let perms = columns.next()?;
    let offset = columns.next()?;
    let _dev = columns.next()?;
    let _inode = columns.next()?;
    let name = columns.next().unwrap_or("").trim_start();

    let (start, end) = range.split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    if end <= start {
        return None;
    }

    if perms.len() != 4 {
        return None;
    }
    let mut flags = Protection::from_perm_chars(perms);

    let offset = u64::from_str_radix(offset, 16).ok()?;

    if name.starts_with(DEVICE_PREFIX) && !name.starts_with(ASHMEM_PREFIX) {
        flags |= Protection::DEVICE;
    }

    Some(MapRegion { start, end, offset, load_bias: 0, flags, name: name.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_line() {
        let region = parse_line(
            "7f45c000-7f45e000 r-xp 00000000 08:01 123456                     /system/lib/libc.so",
        )
        .unwrap();

        assert_eq!(region.start, 0x7f45_c000);
        assert_eq!(region.end, 0x7f45_e000);
        assert_eq!(region.offset, 0);
        assert_eq!(region.load_bias, 0);
        assert_eq!(region.flags, Protection::READ | Protection::EXEC);
        assert_eq!(region.name, "/system/lib/libc.so");
    }

    #[test]
    fn test_parse_anonymous_mapping() {
        let region = parse_line("7f45c000-7f45e000 rw-p 00001000 00:00 0").unwrap();
        assert_eq!(region.flags, Protection::READ | Protection::WRITE);
        assert!(region.name.is_empty());
    }

    #[test]
    fn test_parse_pseudo_path() {
        let region = parse_line("7ffd1000-7ffd3000 rw-p 00000000 00:00 0          [stack]").unwrap();
        assert_eq!(region.name, "[stack]");
        assert!(!region.is_device());
    }

    #[test]
    fn test_parse_path_with_spaces() {
        let region =
            parse_line("00400000-00452000 r-xp 00000000 08:02 173521 /usr/bin/dbus daemon").unwrap();
        assert_eq!(region.name, "/usr/bin/dbus daemon");
    }

    #[test]
    fn test_device_classification() {
        let region = parse_line("f0000000-f0001000 rw-s 00000000 00:06 559 /dev/binder").unwrap();
        assert!(region.is_device());
        assert_eq!(region.flags & !Protection::DEVICE, Protection::READ | Protection::WRITE);
    }

    #[test]
    fn test_ashmem_is_not_a_device() {
        let region = parse_line(
            "e0000000-e0002000 rw-p 00000000 00:04 789 /dev/ashmem/dalvik-heap (deleted)",
        )
        .unwrap();
        assert!(!region.is_device());
    }

    #[test]
    fn test_malformed_lines_rejected() {
        assert!(parse_line("").is_none());
        assert!(parse_line("not a maps line").is_none());
        assert!(parse_line("7f45c000/7f45e000 r-xp 00000000 08:01 0").is_none());
        assert!(parse_line("zzzz-7f45e000 r-xp 00000000 08:01 0").is_none());
        assert!(parse_line("7f45c000-7f45e000 r-xp zzzz 08:01 0").is_none());
        // Permission column must be the kernel's fixed four characters.
        assert!(parse_line("7f45c000-7f45e000 rx 00000000 08:01 0").is_none());
    }

    #[test]
    fn test_zero_length_range_rejected() {
        assert!(parse_line("7f45c000-7f45c000 r--p 00000000 08:01 0").is_none());
        assert!(parse_line("7f45e000-7f45c000 r--p 00000000 08:01 0").is_none());
    }
}
