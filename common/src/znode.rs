//! Helpers for slash-delimited node paths

/// Validates a path the tree is copied from.
///
/// The path must be absolute and must not end with '/' unless it is the root itself.
pub fn validate_source_path(path: &str) -> anyhow::Result<()> {
    if path.is_empty() {
        return Err(anyhow::anyhow!("source path cannot be empty"));
    }
    if !path.starts_with('/') {
        return Err(anyhow::anyhow!(
            "source path {:?} must start with '/'",
            path
        ));
    }
    if path.len() > 1 && path.ends_with('/') {
        return Err(anyhow::anyhow!(
            "source path {:?} must not end with '/'",
            path
        ));
    }
    Ok(())
}

/// Validates a path the tree is copied to. A trailing '/' is tolerated, see [`normalize`].
pub fn validate_destination_path(path: &str) -> anyhow::Result<()> {
    if path.is_empty() {
        return Err(anyhow::anyhow!("destination path cannot be empty"));
    }
    if !path.starts_with('/') {
        return Err(anyhow::anyhow!(
            "destination path {:?} must start with '/'",
            path
        ));
    }
    Ok(())
}

/// Iterates over the non-empty segments of a path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Collapses repeated and trailing slashes: "/a//b/" -> "/a/b".
#[must_use]
pub fn normalize(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    for segment in segments(path) {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// Cumulative sub-paths leading to (and including) `path`: "/a/b" -> ["/a", "/a/b"].
///
/// The root has no ancestry since it always exists.
#[must_use]
pub fn ancestry(path: &str) -> Vec<String> {
    let mut current = String::with_capacity(path.len());
    segments(path)
        .map(|segment| {
            current.push('/');
            current.push_str(segment);
            current.clone()
        })
        .collect()
}

/// Path of `child` under `parent`. Children of the root are "/child", not "//child".
#[must_use]
pub fn join(parent: &str, child: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{child}")
    } else {
        format!("{parent}/{child}")
    }
}
