use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::io::atomic::atomic_write;
use crate::io::config_io::scriptwriter_dir;

/// A single project entry in the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub path: String,
    /// Local time of the last open, ISO-8601 without offset.
    /// Unreadable stamps load as `None` instead of failing the whole file.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_opened: Option<NaiveDateTime>,
}

/// Accepts naive ISO-8601 or RFC 3339 (converted to local time); anything
/// else, including non-strings, becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_timestamp(&s),
        _ => None,
    })
}

/// Parse a stored `last_opened` value.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(naive) = s.parse::<NaiveDateTime>() {
        return Some(naive);
    }
    match DateTime::parse_from_rfc3339(s) {
        Ok(stamped) => Some(stamped.with_timezone(&Local).naive_local()),
        Err(e) => {
            debug!(value = s, error = %e, "ignoring unreadable last_opened");
            None
        }
    }
}

impl ProjectEntry {
    /// Whether the project directory is still on disk
    pub fn exists(&self) -> bool {
        Path::new(&self.path).is_dir()
    }
}

/// The persisted registry document (`projects.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryDocument {
    /// Entries keyed by slug, in insertion order
    #[serde(default)]
    pub projects: IndexMap<String, ProjectEntry>,
    #[serde(default)]
    pub last_project: Option<String>,
}

/// Error type for registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("project '{0}' not found")]
    NotFound(String),
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not delete {path}: {source}")]
    DeleteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize registry: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Get the registry file path, respecting SCRIPTWRITER_HOME
pub fn registry_path() -> PathBuf {
    scriptwriter_dir().join("projects.json")
}

/// Registry id for a project name: lowercased, spaces and underscores as hyphens
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace([' ', '_'], "-")
}

/// Read the registry document from a specific path.
/// If the file doesn't exist, returns an empty document.
/// If it can't be read or parsed, backs it up as .bak and returns empty.
pub fn read_registry_from(path: &Path) -> RegistryDocument {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return RegistryDocument::default(),
        Err(e) => {
            back_up_unusable(path, &e.to_string());
            return RegistryDocument::default();
        }
    };

    match serde_json::from_str::<RegistryDocument>(&content) {
        Ok(doc) => doc,
        Err(e) => {
            back_up_unusable(path, &e.to_string());
            RegistryDocument::default()
        }
    }
}

/// Copy an unusable registry to `.json.bak` before it gets overwritten.
fn back_up_unusable(path: &Path, reason: &str) {
    let bak = path.with_extension("json.bak");
    match fs::copy(path, &bak) {
        Ok(_) => warn!(
            path = %path.display(),
            backup = %bak.display(),
            error = reason,
            "unusable registry backed up, starting empty"
        ),
        Err(copy_err) => warn!(
            path = %path.display(),
            error = reason,
            backup_error = %copy_err,
            "unusable registry could not be backed up, starting empty"
        ),
    }
}

/// Write the registry document to a specific path.
pub fn write_registry_to(path: &Path, doc: &RegistryDocument) -> Result<(), RegistryError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RegistryError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let content = serde_json::to_string_pretty(doc)?;
    atomic_write(path, content.as_bytes()).map_err(|e| RegistryError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// The set of known projects, backed by one JSON file.
///
/// Every mutation re-reads the file, applies the change and writes it back,
/// so separate handles on the same file see each other's writes.
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    path: PathBuf,
    doc: RegistryDocument,
}

impl ProjectRegistry {
    /// Load the registry stored at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = read_registry_from(&path);
        ProjectRegistry { path, doc }
    }

    /// Load the registry from the default location
    pub fn open_default() -> Self {
        Self::open(registry_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn projects(&self) -> &IndexMap<String, ProjectEntry> {
        &self.doc.projects
    }

    pub fn get(&self, id: &str) -> Option<&ProjectEntry> {
        self.doc.projects.get(id)
    }

    pub fn last_project(&self) -> Option<&str> {
        self.doc.last_project.as_deref()
    }

    /// Register a project and make it the last opened one.
    ///
    /// An existing entry with the same slug is replaced.
    pub fn add(&mut self, name: &str, path: &Path) -> Result<String, RegistryError> {
        self.reload();
        let id = slugify(name);
        if self.doc.projects.contains_key(&id) {
            debug!(id = %id, "replacing registry entry with the same id");
        }
        self.doc.projects.insert(
            id.clone(),
            ProjectEntry {
                name: name.to_string(),
                path: path.to_string_lossy().to_string(),
                last_opened: Some(now()),
            },
        );
        self.doc.last_project = Some(id.clone());
        self.save()?;
        info!(id = %id, path = %path.display(), "registered project");
        Ok(id)
    }

    /// Drop a project from the registry, leaving its files alone.
    pub fn remove(&mut self, id: &str) -> Result<ProjectEntry, RegistryError> {
        self.reload();
        let removed = self
            .doc
            .projects
            .shift_remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        if self.doc.last_project.as_deref() == Some(id) {
            self.doc.last_project = self.doc.projects.keys().next().cloned();
        }
        self.save()?;
        info!(id = %id, "removed project from registry");
        Ok(removed)
    }

    /// Delete the project directory, then remove the entry.
    pub fn delete_permanently(&mut self, id: &str) -> Result<ProjectEntry, RegistryError> {
        self.reload();
        let entry = self
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        let dir = PathBuf::from(&entry.path);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| RegistryError::DeleteError {
                path: dir.clone(),
                source: e,
            })?;
            info!(id = %id, path = %dir.display(), "deleted project directory");
        }
        self.remove(id)
    }

    /// Stamp the entry as opened now and make it the last project.
    /// Unknown ids are ignored.
    pub fn update_last_opened(&mut self, id: &str) -> Result<(), RegistryError> {
        self.reload();
        let Some(entry) = self.doc.projects.get_mut(id) else {
            debug!(id = %id, "update_last_opened on unknown project");
            return Ok(());
        };
        entry.last_opened = Some(now());
        self.doc.last_project = Some(id.to_string());
        self.save()
    }

    fn reload(&mut self) {
        self.doc = read_registry_from(&self.path);
    }

    fn save(&self) -> Result<(), RegistryError> {
        write_registry_to(&self.path, &self.doc)
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Abbreviate a path by replacing $HOME with ~
pub fn abbreviate_path(path: &str) -> String {
    if let Ok(home) = std::env::var("HOME")
        && let Some(rest) = path.strip_prefix(&home)
    {
        return format!("~{}", rest);
    }
    path.to_string()
}

/// Format a last-opened stamp like `2025-03-01 14:05`
pub fn format_last_opened(stamp: Option<&NaiveDateTime>) -> String {
    match stamp {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "Never".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_registry() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".scriptwriter").join("projects.json");
        (tmp, path)
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Script"), "my-script");
        assert_eq!(slugify("Inland_Empire Two"), "inland-empire-two");
        assert_eq!(slugify("already-slug"), "already-slug");
    }

    #[test]
    fn test_empty_registry() {
        let (_tmp, path) = temp_registry();
        let reg = ProjectRegistry::open(&path);
        assert!(reg.projects().is_empty());
        assert!(reg.last_project().is_none());
    }

    #[test]
    fn test_add_and_read() {
        let (_tmp, path) = temp_registry();
        let mut reg = ProjectRegistry::open(&path);
        let id = reg.add("My Script", Path::new("/tmp/x")).unwrap();
        assert_eq!(id, "my-script");

        let reg = ProjectRegistry::open(&path);
        let entry = reg.get("my-script").unwrap();
        assert_eq!(entry.name, "My Script");
        assert_eq!(entry.path, "/tmp/x");
        assert!(entry.last_opened.is_some());
        assert_eq!(reg.last_project(), Some("my-script"));
    }

    #[test]
    fn test_add_collision_overwrites() {
        let (_tmp, path) = temp_registry();
        let mut reg = ProjectRegistry::open(&path);
        reg.add("My Script", Path::new("/tmp/one")).unwrap();
        reg.add("my_script", Path::new("/tmp/two")).unwrap();
        assert_eq!(reg.projects().len(), 1);
        assert_eq!(reg.get("my-script").unwrap().path, "/tmp/two");
        assert_eq!(reg.get("my-script").unwrap().name, "my_script");
    }

    #[test]
    fn test_remove_last_project_picks_remaining() {
        let (_tmp, path) = temp_registry();
        let mut reg = ProjectRegistry::open(&path);
        reg.add("Alpha", Path::new("/tmp/a")).unwrap();
        reg.add("Beta", Path::new("/tmp/b")).unwrap();
        assert_eq!(reg.last_project(), Some("beta"));

        reg.remove("beta").unwrap();
        assert_eq!(reg.last_project(), Some("alpha"));

        reg.remove("alpha").unwrap();
        assert!(reg.last_project().is_none());
        assert!(reg.projects().is_empty());
    }

    #[test]
    fn test_remove_other_project_keeps_last() {
        let (_tmp, path) = temp_registry();
        let mut reg = ProjectRegistry::open(&path);
        reg.add("Alpha", Path::new("/tmp/a")).unwrap();
        reg.add("Beta", Path::new("/tmp/b")).unwrap();
        reg.remove("alpha").unwrap();
        assert_eq!(reg.last_project(), Some("beta"));
    }

    #[test]
    fn test_remove_not_found() {
        let (_tmp, path) = temp_registry();
        let mut reg = ProjectRegistry::open(&path);
        assert!(matches!(
            reg.remove("nonexistent"),
            Err(RegistryError::NotFound(id)) if id == "nonexistent"
        ));
    }

    #[test]
    fn test_delete_permanently_removes_directory() {
        let (tmp, path) = temp_registry();
        let dir = tmp.path().join("Doomed");
        fs::create_dir_all(dir.join("cards")).unwrap();
        fs::write(dir.join("cards/01.md"), "# gone").unwrap();

        let mut reg = ProjectRegistry::open(&path);
        reg.add("Doomed", &dir).unwrap();
        let removed = reg.delete_permanently("doomed").unwrap();
        assert_eq!(removed.name, "Doomed");
        assert!(!dir.exists());
        assert!(reg.get("doomed").is_none());
    }

    #[test]
    fn test_delete_permanently_missing_dir_still_unregisters() {
        let (tmp, path) = temp_registry();
        let mut reg = ProjectRegistry::open(&path);
        reg.add("Vanished", &tmp.path().join("never-created")).unwrap();
        reg.delete_permanently("vanished").unwrap();
        assert!(reg.projects().is_empty());
    }

    #[test]
    fn test_delete_permanently_not_found() {
        let (_tmp, path) = temp_registry();
        let mut reg = ProjectRegistry::open(&path);
        assert!(matches!(
            reg.delete_permanently("ghost"),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_last_opened() {
        let (_tmp, path) = temp_registry();
        let mut reg = ProjectRegistry::open(&path);
        reg.add("Alpha", Path::new("/tmp/a")).unwrap();
        reg.add("Beta", Path::new("/tmp/b")).unwrap();
        let before = reg.get("alpha").unwrap().last_opened;

        reg.update_last_opened("alpha").unwrap();
        assert_eq!(reg.last_project(), Some("alpha"));
        assert!(reg.get("alpha").unwrap().last_opened >= before);

        // Unknown id is a no-op
        reg.update_last_opened("ghost").unwrap();
        assert_eq!(reg.last_project(), Some("alpha"));
    }

    #[test]
    fn test_handles_see_each_others_writes() {
        let (_tmp, path) = temp_registry();
        let mut first = ProjectRegistry::open(&path);
        let mut second = ProjectRegistry::open(&path);
        first.add("Alpha", Path::new("/tmp/a")).unwrap();
        second.add("Beta", Path::new("/tmp/b")).unwrap();
        let reg = ProjectRegistry::open(&path);
        assert_eq!(reg.projects().len(), 2);
    }

    #[test]
    fn test_corrupted_registry_backup() {
        let (_tmp, path) = temp_registry();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let reg = ProjectRegistry::open(&path);
        assert!(reg.projects().is_empty());
        assert!(path.with_extension("json.bak").exists());
    }

    #[test]
    fn test_unreadable_registry_backed_up() {
        let (_tmp, path) = temp_registry();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let garbage = [0xff, 0xfe, b'{', 0x80];
        fs::write(&path, garbage).unwrap();

        let mut reg = ProjectRegistry::open(&path);
        assert!(reg.projects().is_empty());
        reg.add("Fresh", Path::new("/fresh")).unwrap();

        let bak = path.with_extension("json.bak");
        assert_eq!(fs::read(&bak).unwrap(), garbage);
    }

    #[test]
    fn test_bad_timestamp_keeps_every_entry() {
        let (_tmp, path) = temp_registry();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{
  "projects": {
    "a": {"name": "A", "path": "/a", "last_opened": "2024-05-01T10:15:30"},
    "b": {"name": "B", "path": "/b", "last_opened": "Never"},
    "c": {"name": "C", "path": "/c", "last_opened": 17}
  },
  "last_project": "a"
}"#,
        )
        .unwrap();

        let mut reg = ProjectRegistry::open(&path);
        assert_eq!(reg.projects().len(), 3);
        assert!(reg.get("a").unwrap().last_opened.is_some());
        assert_eq!(reg.get("b").unwrap().last_opened, None);
        assert_eq!(reg.get("c").unwrap().last_opened, None);

        reg.add("D", Path::new("/d")).unwrap();
        let reopened = ProjectRegistry::open(&path);
        let ids: Vec<&String> = reopened.projects().keys().collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert!(!path.with_extension("json.bak").exists());
    }

    #[test]
    fn test_parse_timestamp() {
        let naive = parse_timestamp("2024-05-01T10:15:30.123456").unwrap();
        assert_eq!(format_last_opened(Some(&naive)), "2024-05-01 10:15");
        assert!(parse_timestamp("2024-05-01T10:15:30+02:00").is_some());
        assert_eq!(parse_timestamp("Never"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_reads_python_style_document() {
        let (_tmp, path) = temp_registry();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{
  "projects": {
    "eraserhead": {
      "name": "Eraserhead",
      "path": "/home/h/Documents/Scripts/Eraserhead",
      "last_opened": "2024-05-01T10:15:30.123456"
    },
    "dune": {
      "name": "Dune",
      "path": "/home/h/Documents/Scripts/Dune"
    }
  },
  "last_project": "eraserhead"
}"#,
        )
        .unwrap();
        let reg = ProjectRegistry::open(&path);
        let ids: Vec<&String> = reg.projects().keys().collect();
        assert_eq!(ids, vec!["eraserhead", "dune"]);
        assert_eq!(
            format_last_opened(reg.get("eraserhead").unwrap().last_opened.as_ref()),
            "2024-05-01 10:15"
        );
        assert_eq!(format_last_opened(None), "Never");
        assert_eq!(reg.last_project(), Some("eraserhead"));
    }

    #[test]
    fn test_null_last_project_serialized() {
        let (_tmp, path) = temp_registry();
        write_registry_to(&path, &RegistryDocument::default()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"last_project\": null"));
    }
}
