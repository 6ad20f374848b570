//! Content paths as mirrored below an index entry.
//!
//! `/content/foo` is stored as `<key>/content/foo` with the match marker on
//! the innermost node. The root path has no segments, so its marker sits on
//! the entry itself.

/// Splits a content path into its non-empty segments.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Joins segments back into an absolute path.
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    segments.iter().fold(String::new(), |mut path, segment| {
        path.push('/');
        path.push_str(segment.as_ref());
        path
    })
}
