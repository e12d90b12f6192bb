//! Ordered region store with first-match address lookup.

use log::debug;

use super::parse::parse_line;
use super::region::MapRegion;

/// The ordered collection of all region records for one snapshot.
///
/// Insertion order is parse order of the source listing. The store never
/// re-sorts: the kernel's listing is normally address-ordered, but that is
/// not guaranteed by contract, so lookup stays a linear first-match scan.
/// Duplicate or overlapping entries from a malformed source are tolerated
/// and not deduplicated; the first match in store order wins.
#[derive(Debug, Default)]
pub struct RegionStore {
    regions: Vec<MapRegion>,
    suffixes_to_ignore: Vec<String>,
    skipped_lines: u64,
}

impl RegionStore {
    pub(crate) fn new(suffixes_to_ignore: Vec<String>) -> Self {
        Self { regions: Vec::new(), suffixes_to_ignore, skipped_lines: 0 }
    }

    /// Replace the contents with records parsed from listing lines.
    ///
    /// Malformed lines are skipped and counted, never fatal. An empty
    /// result is not an error here; it signals an empty or inaccessible
    /// address space, which callers handle explicitly.
    pub(crate) fn populate_from_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.regions.clear();
        self.skipped_lines = 0;

        for line in lines {
            let line = line.as_ref();
            if line.is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(region) => {
                    if !self.is_ignored(&region.name) {
                        self.regions.push(region);
                    }
                }
                None => {
                    debug!("skipping unparseable maps line: {line:?}");
                    self.skipped_lines += 1;
                }
            }
        }
    }

    /// Replace the contents with externally constructed records, in the
    /// given order, still subject to suffix filtering.
    pub(crate) fn populate_from_regions<I>(&mut self, regions: I)
    where
        I: IntoIterator<Item = MapRegion>,
    {
        self.skipped_lines = 0;
        let suffixes = &self.suffixes_to_ignore;
        self.regions = regions
            .into_iter()
            .filter(|r| !suffixes.iter().any(|suffix| r.name.ends_with(suffix.as_str())))
            .collect();
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.suffixes_to_ignore.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// Find the first record whose range contains `addr`.
    #[must_use]
    pub fn find(&self, addr: u64) -> Option<&MapRegion> {
        self.regions.iter().find(|region| region.contains(addr))
    }

    /// All records in store order.
    #[must_use]
    pub fn regions(&self) -> &[MapRegion] {
        &self.regions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Listing lines dropped by the last populate because they failed to
    /// parse. Diagnostic only.
    #[must_use]
    pub fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }

    /// The configured ignore-suffix set.
    #[must_use]
    pub fn suffixes_to_ignore(&self) -> &[String] {
        &self.suffixes_to_ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::region::Protection;

    fn listing_a() -> Vec<&'static str> {
        vec![
            "1000-2000 r-xp 00000000 08:01 100 /lib/liba.so",
            "2000-3000 rw-p 00001000 08:01 100 /lib/liba.so",
            "garbage line",
            "5000-6000 r--p 00000000 08:01 200 /lib/libb.so",
        ]
    }

    #[test]
    fn test_populate_skips_malformed_and_counts() {
        let mut store = RegionStore::new(Vec::new());
        store.populate_from_lines(listing_a());

        assert_eq!(store.len(), 3);
        assert_eq!(store.skipped_lines(), 1);
    }

    #[test]
    fn test_populate_replaces_not_merges() {
        let mut store = RegionStore::new(Vec::new());
        store.populate_from_lines(listing_a());
        store.populate_from_lines(vec!["9000-a000 r-xp 00000000 08:01 300 /lib/libc.so"]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.regions()[0].name, "/lib/libc.so");
        assert_eq!(store.skipped_lines(), 0);
        assert!(store.find(0x1800).is_none());
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let mut store = RegionStore::new(Vec::new());
        store.populate_from_lines(vec![
            "1000-3000 r-xp 00000000 08:01 100 /lib/first.so",
            "2000-4000 rw-p 00000000 08:01 200 /lib/second.so",
        ]);

        let region = store.find(0x2800).unwrap();
        assert_eq!(region.name, "/lib/first.so");
    }

    #[test]
    fn test_suffix_filter_on_lines() {
        let mut store = RegionStore::new(vec![".so.ignore".to_string()]);
        store.populate_from_lines(vec![
            "1000-2000 r-xp 00000000 08:01 100 /lib/real.so",
            "3000-4000 r-xp 00000000 08:01 101 /lib/synthetic.so.ignore",
        ]);

        assert_eq!(store.len(), 1);
        assert!(store.regions().iter().all(|r| !r.name.ends_with(".so.ignore")));
    }

    #[test]
    fn test_suffix_filter_on_static_regions() {
        let mut store = RegionStore::new(vec![".so.ignore".to_string()]);
        store.populate_from_regions(vec![
            MapRegion { start: 0x1000, end: 0x2000, name: "/a.so".into(), ..MapRegion::default() },
            MapRegion {
                start: 0x3000,
                end: 0x4000,
                name: "/b.so.ignore".into(),
                ..MapRegion::default()
            },
        ]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.regions()[0].name, "/a.so");
    }

    #[test]
    fn test_find_miss_outside_any_range() {
        let mut store = RegionStore::new(Vec::new());
        store.populate_from_lines(listing_a());

        assert!(store.find(0x0).is_none());
        assert!(store.find(0x4000).is_none());
        assert!(store.find(u64::MAX).is_none());
    }

    #[test]
    fn test_listing_order_preserved() {
        // Deliberately unsorted input; the store must not re-sort.
        let mut store = RegionStore::new(Vec::new());
        store.populate_from_lines(vec![
            "5000-6000 r--p 00000000 08:01 200 /lib/libb.so",
            "1000-2000 r-xp 00000000 08:01 100 /lib/liba.so",
        ]);

        assert_eq!(store.regions()[0].start, 0x5000);
        assert_eq!(store.regions()[1].start, 0x1000);
        assert_eq!(store.find(0x1800).unwrap().flags, Protection::READ | Protection::EXEC);
    }
}
