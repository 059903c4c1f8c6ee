use std::fmt;

/// Descriptor that marks the highest-resolution entry of a `srcset` value.
const HIGHEST_RES_DESCRIPTOR: &str = "4x";

/// A raw `srcset` value as found on the page, e.g. `"a.jpg 1x, b.jpg 2x, c.jpg 4x"`.
///
/// Identity is the exact string. Two references that differ only in
/// formatting are distinct even when they resolve to the same image.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaReference(String);

impl MediaReference {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MediaReference {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for MediaReference {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The download target derived from a [`MediaReference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub target_url: String,
    pub filename: String,
}

/// Picks the highest-resolution URL out of a reference.
///
/// The site lists variants in ascending resolution, so the last entry wins.
/// Its trailing `4x` descriptor is dropped; the filename is the last path
/// segment with the query string removed.
pub fn resolve(reference: &MediaReference) -> ResolvedAsset {
    let raw = reference.as_str();
    let last = raw.rsplit(',').next().unwrap_or(raw).trim();

    let target_url = match last.rsplit_once(char::is_whitespace) {
        Some((url, HIGHEST_RES_DESCRIPTOR)) => url.trim_end(),
        _ => last,
    };

    ResolvedAsset {
        target_url: target_url.to_string(),
        filename: filename_of(target_url).to_string(),
    }
}

fn filename_of(url: &str) -> &str {
    let segment = url.rsplit('/').next().unwrap_or(url);
    segment.split('?').next().unwrap_or(segment)
}
