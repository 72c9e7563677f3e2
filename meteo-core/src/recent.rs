//! Bounded, most-recent-first list of searched locations, persisted as a
//! plain JSON array of [`Location`] objects.

use std::{fs, io, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

use crate::{
    error::{MeteoError, Result},
    model::Location,
};

/// Maximum number of remembered locations.
pub const MAX_RECENT: usize = 6;

/// File name used when no explicit path is configured.
pub const RECENT_FILE_NAME: &str = "recentCities.json";

/// Invariants: at most [`MAX_RECENT`] entries, unique `name`s, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentList(Vec<Location>);

impl RecentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from arbitrary entries, keeping the first entry for each
    /// name and at most [`MAX_RECENT`] of them.
    pub fn from_entries(entries: Vec<Location>) -> Self {
        let mut out: Vec<Location> = Vec::with_capacity(MAX_RECENT);
        for loc in entries {
            if out.len() == MAX_RECENT {
                break;
            }
            if out.iter().all(|c| c.name != loc.name) {
                out.push(loc);
            }
        }
        Self(out)
    }

    /// New list with `loc` in front and any same-named entry removed.
    pub fn inserted(self, loc: Location) -> Self {
        let rest: Vec<Location> = self
            .0
            .into_iter()
            .filter(|c| c.name != loc.name)
            .take(MAX_RECENT - 1)
            .collect();

        let mut next = Vec::with_capacity(MAX_RECENT);
        next.push(loc);
        next.extend(rest);
        Self(next)
    }

    pub fn select(&self, index: usize) -> Option<&Location> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Location] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a RecentList {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// File-backed storage for the [`RecentList`].
#[derive(Debug, Clone)]
pub struct RecentStore {
    path: PathBuf,
}

impl RecentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted list.
    ///
    /// A missing file yields an empty list. So does a file that is not a
    /// JSON array of locations: corrupt state is logged and treated as empty,
    /// never returned as an error. Only I/O failures are reported.
    pub fn load(&self) -> Result<RecentList> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RecentList::new()),
            Err(source) => return Err(self.persistence_error(source)),
        };

        if contents.trim_ascii().is_empty() {
            return Ok(RecentList::new());
        }

        match serde_json::from_slice::<Vec<Location>>(&contents) {
            Ok(entries) => Ok(RecentList::from_entries(entries)),
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable recent locations in {}: {}",
                    self.path.display(),
                    e
                );
                Ok(RecentList::new())
            }
        }
    }

    /// Put `loc` in front of `existing`, persist the result and return it.
    pub fn record(&self, loc: Location, existing: RecentList) -> Result<RecentList> {
        let next = existing.inserted(loc);
        self.save(&next)?;
        Ok(next)
    }

    fn save(&self, list: &RecentList) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.persistence_error(source))?;
        }

        let json = serde_json::to_string(list)?;
        fs::write(&self.path, json).map_err(|source| self.persistence_error(source))?;

        tracing::debug!("Saved {} recent locations to {}", list.len(), self.path.display());
        Ok(())
    }

    fn persistence_error(&self, source: io::Error) -> MeteoError {
        MeteoError::Persistence {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, lat: f64) -> Location {
        Location::new(name, Some("Testland".into()), lat, 0.0)
    }

    fn store_in(dir: &tempfile::TempDir) -> RecentStore {
        RecentStore::new(dir.path().join("nested").join(RECENT_FILE_NAME))
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn load_corrupted_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RECENT_FILE_NAME);
        let store = RecentStore::new(&path);

        for garbage in ["not json", "{\"name\":\"Paris\"}", "[1, 2, 3]", "[{\"name\": 5}]"] {
            fs::write(&path, garbage).unwrap();
            assert!(store.load().unwrap().is_empty(), "input {garbage:?}");
        }
    }

    #[test]
    fn load_non_utf8_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RECENT_FILE_NAME);
        fs::write(&path, [0xff, 0xfe, b'[', b']']).unwrap();

        let list = RecentStore::new(&path).load().unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn load_blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RECENT_FILE_NAME);
        fs::write(&path, " \n").unwrap();

        assert!(RecentStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn record_same_name_twice_keeps_latest() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let list = store.record(city("Paris", 1.0), RecentList::new()).unwrap();
        let list = store.record(city("Paris", 2.0), list).unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list.select(0), Some(&city("Paris", 2.0)));
        assert_eq!(store.load().unwrap(), list);
    }

    #[test]
    fn record_never_exceeds_max() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut list = RecentList::new();
        for i in 0..20 {
            list = store.record(city(&format!("City {i}"), f64::from(i)), list).unwrap();
            assert!(list.len() <= MAX_RECENT);
        }

        let names: Vec<&str> = list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["City 19", "City 18", "City 17", "City 16", "City 15", "City 14"]);
        assert_eq!(store.load().unwrap().len(), MAX_RECENT);
    }

    #[test]
    fn record_moves_existing_entry_to_front() {
        let list = RecentList::new()
            .inserted(city("Oslo", 1.0))
            .inserted(city("Rome", 2.0))
            .inserted(city("Lima", 3.0))
            .inserted(city("Oslo", 4.0));

        let names: Vec<&str> = list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Oslo", "Lima", "Rome"]);
    }

    #[test]
    fn dedup_is_case_sensitive() {
        let list = RecentList::new()
            .inserted(city("paris", 1.0))
            .inserted(city("Paris", 2.0));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn select_out_of_range_is_none() {
        let list = RecentList::new().inserted(city("Oslo", 1.0));
        assert!(list.select(0).is_some());
        assert!(list.select(1).is_none());
    }

    #[test]
    fn persisted_format_is_plain_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .record(Location::new("Paris", None, 48.85, 2.35), RecentList::new())
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!([
                { "name": "Paris", "country": null, "latitude": 48.85, "longitude": 2.35 }
            ])
        );
    }

    #[test]
    fn load_normalizes_foreign_lists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RECENT_FILE_NAME);
        let entries: Vec<Location> = ["A", "B", "A", "C", "D", "E", "F", "G"]
            .iter()
            .map(|n| city(n, 0.0))
            .collect();
        fs::write(&path, serde_json::to_string(&entries).unwrap()).unwrap();

        let list = RecentStore::new(&path).load().unwrap();
        let names: Vec<&str> = list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D", "E", "F"]);
    }
}
