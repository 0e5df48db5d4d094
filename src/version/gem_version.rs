//! RubyGems version values
//!
//! Gem versions are dot-separated runs of digits and letters (`3.2.8`,
//! `4.0.0.rc1`, `1.0.0.beta.2`). Any letter makes a version a prerelease,
//! and a letter segment sorts below every numeric segment, so
//! `4.0.0.rc1 < 4.0.0`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(?:\.[0-9A-Za-z]+)*(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?$").unwrap()
});

/// A single comparable piece of a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Number(u64),
    Tag(String),
}

impl Segment {
    fn compare(&self, other: &Segment) -> Ordering {
        match (self, other) {
            (Segment::Number(a), Segment::Number(b)) => a.cmp(b),
            (Segment::Tag(a), Segment::Tag(b)) => a.cmp(b),
            (Segment::Tag(_), Segment::Number(_)) => Ordering::Less,
            (Segment::Number(_), Segment::Tag(_)) => Ordering::Greater,
        }
    }
}

/// Parsed gem version that keeps the string it was parsed from
#[derive(Debug, Clone)]
pub struct GemVersion {
    original: String,
    segments: Vec<Segment>,
}

impl GemVersion {
    /// Parse a gem version string.
    ///
    /// Returns `None` for anything RubyGems would reject, e.g. `""`, `"v1.0"`
    /// or `"1..2"`. A `-` is read as `.pre.`, matching how RubyGems treats
    /// SemVer-style prereleases such as `1.0.0-beta`.
    pub fn parse(version: &str) -> Option<Self> {
        let trimmed = version.trim();
        if !VERSION_PATTERN.is_match(trimmed) {
            return None;
        }

        let normalized = trimmed.replace('-', ".pre.");
        let mut segments = Vec::new();
        for part in normalized.split('.') {
            segments.extend(split_runs(part)?);
        }

        Some(Self {
            original: trimmed.to_string(),
            segments,
        })
    }

    /// The version string as it was given (whitespace trimmed)
    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when any segment contains letters (`rc1`, `beta`, `pre`)
    pub fn is_prerelease(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Tag(_)))
    }

    /// Leading integer segment
    pub fn major(&self) -> u64 {
        match self.segments.first() {
            Some(Segment::Number(major)) => *major,
            _ => 0,
        }
    }

    /// Segments used for ordering: trailing zeros are dropped from the
    /// release part and from the prerelease part, so `1.0.a == 1.a`.
    fn canonical_segments(&self) -> Vec<&Segment> {
        let split = self
            .segments
            .iter()
            .position(|segment| matches!(segment, Segment::Tag(_)))
            .unwrap_or(self.segments.len());
        let (release, prerelease) = self.segments.split_at(split);

        trim_trailing_zeros(release)
            .iter()
            .chain(trim_trailing_zeros(prerelease))
            .collect()
    }
}

fn trim_trailing_zeros(segments: &[Segment]) -> &[Segment] {
    let end = segments
        .iter()
        .rposition(|segment| *segment != Segment::Number(0))
        .map_or(0, |i| i + 1);
    &segments[..end]
}

/// Split `0rc1` into `[0, "rc", 1]`
fn split_runs(part: &str) -> Option<Vec<Segment>> {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut current_is_digit = false;

    for ch in part.chars() {
        let is_digit = ch.is_ascii_digit();
        if !current.is_empty() && is_digit != current_is_digit {
            runs.push(to_segment(&current, current_is_digit)?);
            current.clear();
        }
        current_is_digit = is_digit;
        current.push(ch);
    }

    if !current.is_empty() {
        runs.push(to_segment(&current, current_is_digit)?);
    }

    Some(runs)
}

fn to_segment(run: &str, is_digit: bool) -> Option<Segment> {
    if is_digit {
        run.parse().ok().map(Segment::Number)
    } else {
        Some(Segment::Tag(run.to_string()))
    }
}

impl Ord for GemVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Missing trailing segments count as zero: 1.0 == 1.0.0
        let zero = Segment::Number(0);
        let lhs = self.canonical_segments();
        let rhs = other.canonical_segments();
        let len = lhs.len().max(rhs.len());

        (0..len)
            .map(|i| {
                let left = lhs.get(i).copied().unwrap_or(&zero);
                let right = rhs.get(i).copied().unwrap_or(&zero);
                left.compare(right)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for GemVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GemVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GemVersion {}

impl fmt::Display for GemVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Exact version equality.
///
/// Compares as gem versions when both sides parse, so `3.2` and `3.2.0` are
/// the same release. Falls back to plain string equality otherwise.
pub fn versions_equal(left: &str, right: &str) -> bool {
    match (GemVersion::parse(left), GemVersion::parse(right)) {
        (Some(l), Some(r)) => l == r,
        _ => left.trim() == right.trim(),
    }
}
