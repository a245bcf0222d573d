use sha2::Digest as _;
use std::path::Path;
use walkdir::WalkDir;

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

pub fn file_hash(path: &Path) -> std::io::Result<String> {
    let mut hasher = sha2::Sha256::new();
    let mut f = std::fs::File::open(path)?;
    std::io::copy(&mut f, &mut hasher)?;
    Ok(hex(&hasher.finalize()))
}

/// Hash of every readable file under `dir`, keyed by relative path in sorted order.
/// Unreadable entries are skipped.
pub fn dir_hash(dir: &Path) -> String {
    let mut entries: Vec<(String, String)> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let rel = e.path().strip_prefix(dir).ok()?.to_string_lossy().into_owned();
            let h = file_hash(e.path()).ok()?;
            Some((rel, h))
        })
        .collect();
    entries.sort();

    let mut hasher = sha2::Sha256::new();
    for (rel, h) in &entries {
        hasher.update(rel.as_bytes());
        hasher.update(b":");
        hasher.update(h.as_bytes());
        hasher.update(b"\n");
    }
    hex(&hasher.finalize())
}

/// Content hash of a file or directory; `None` when the path is neither.
pub fn item_hash(path: &Path) -> Option<String> {
    if path.is_file() {
        file_hash(path).ok()
    } else if path.is_dir() {
        Some(dir_hash(path))
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/hash.rs"]
mod tests;
