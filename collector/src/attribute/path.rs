use std::fmt;

/// Placeholder segment standing for an instance identifier discovered only at
/// runtime (for example `platform/garbage-collector/%s`).
pub const INSTANCE_PLACEHOLDER: &str = "%s";

/// A slash-separated address into the attribute tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributePath {
    segments: Vec<String>,
}

impl AttributePath {
    /// Parse a slash-separated path. Empty segments are dropped, so leading
    /// and trailing slashes are harmless.
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend the path by one segment.
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }

    /// Whether any segment is the [`INSTANCE_PLACEHOLDER`].
    pub fn has_placeholder(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| segment == INSTANCE_PLACEHOLDER)
    }

    /// The path up to (not including) the first placeholder segment. `None`
    /// when the path has no placeholder.
    pub fn placeholder_prefix(&self) -> Option<AttributePath> {
        let index = self
            .segments
            .iter()
            .position(|segment| segment == INSTANCE_PLACEHOLDER)?;
        Some(Self {
            segments: self.segments[..index].to_vec(),
        })
    }

    /// Replace every placeholder segment with the given instance identifier.
    pub fn substitute(&self, instance: &str) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .map(|segment| {
                    if segment == INSTANCE_PLACEHOLDER {
                        instance.to_string()
                    } else {
                        segment.clone()
                    }
                })
                .collect(),
        }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl From<&str> for AttributePath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
