//! Anonymous installation id sent with telemetry events

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

/// Platform machine id locations, in lookup order
pub const MACHINE_ID_FILES: [&str; 2] = ["/etc/machine-id", "/var/lib/dbus/machine-id"];

/// Where a random id is kept when the machine id is unreadable
pub fn fallback_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cubejs-cli").join("anonymous-id"))
}

/// The anonymous id for this machine
pub fn anonymous_id() -> String {
    let candidates: Vec<PathBuf> = MACHINE_ID_FILES.iter().map(PathBuf::from).collect();
    resolve_anonymous_id(&candidates, fallback_file().as_deref())
}

/// UUIDv5 of the first readable machine id; otherwise a random UUID that is
/// persisted in `fallback_file` and reused on later runs
pub fn resolve_anonymous_id(candidates: &[PathBuf], fallback_file: Option<&Path>) -> String {
    if let Some(machine_id) = candidates.iter().find_map(|path| read_trimmed(path)) {
        return Uuid::new_v5(&Uuid::NAMESPACE_OID, machine_id.as_bytes()).to_string();
    }

    let Some(fallback_file) = fallback_file else {
        return Uuid::new_v4().to_string();
    };
    if let Some(id) = read_trimmed(fallback_file).and_then(|id| Uuid::parse_str(&id).ok()) {
        return id.to_string();
    }

    let id = Uuid::new_v4();
    let persisted = fallback_file
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| fs::write(fallback_file, id.to_string()));
    if let Err(e) = persisted {
        debug!(path = %fallback_file.display(), error = %e, "Could not persist anonymous id");
    }
    id.to_string()
}

fn read_trimmed(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let content = content.trim();
    (!content.is_empty()).then(|| content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_machine_id_is_hashed_deterministically() {
        let dir = TempDir::new().unwrap();
        let machine_id = dir.path().join("machine-id");
        fs::write(&machine_id, "4c4c4544004a3610804fb2c04f4e3832\n").unwrap();
        let candidates = vec![dir.path().join("missing"), machine_id];

        let first = resolve_anonymous_id(&candidates, None);
        let second = resolve_anonymous_id(&candidates, None);

        assert_eq!(first, second);
        assert_ne!(first, "4c4c4544004a3610804fb2c04f4e3832");
        assert_eq!(Uuid::parse_str(&first).unwrap().get_version_num(), 5);
    }

    #[test]
    fn test_fallback_id_is_persisted_and_reused() {
        let dir = TempDir::new().unwrap();
        let fallback = dir.path().join("cubejs-cli").join("anonymous-id");
        let candidates = vec![dir.path().join("missing")];

        let first = resolve_anonymous_id(&candidates, Some(&fallback));
        let second = resolve_anonymous_id(&candidates, Some(&fallback));

        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&fallback).unwrap(), first);
    }

    #[test]
    fn test_empty_machine_id_is_skipped() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("machine-id");
        fs::write(&empty, "\n").unwrap();
        let fallback = dir.path().join("anonymous-id");

        let id = resolve_anonymous_id(&[empty], Some(&fallback));

        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 4);
    }
}
