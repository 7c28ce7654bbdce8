use std::fmt;

/// One line of a line-oriented diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Present on both sides.
    Context(String),
    /// Only in the old text.
    Removed(String),
    /// Only in the new text.
    Added(String),
}

impl DiffLine {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Context(text) | Self::Removed(text) | Self::Added(text) => text,
        }
    }

    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Context(_))
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context(text) => write!(f, "  {text}"),
            Self::Removed(text) => write!(f, "- {text}"),
            Self::Added(text) => write!(f, "+ {text}"),
        }
    }
}

/// Diff two texts line by line using a longest common subsequence.
///
/// Within a changed block, removed lines come before added lines.
#[must_use]
pub fn line_diff(before: &str, after: &str) -> Vec<DiffLine> {
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();
    diff_slices(&old, &new)
}

fn diff_slices(old: &[&str], new: &[&str]) -> Vec<DiffLine> {
    let n = old.len();
    let m = new.len();
    let width = m + 1;

    // lcs[i * width + j] = LCS length of old[i..] and new[j..]
    let mut lcs = vec![0usize; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * width + j] = if old[i] == new[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let mut out = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            out.push(DiffLine::Context(old[i].to_string()));
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            out.push(DiffLine::Removed(old[i].to_string()));
            i += 1;
        } else {
            out.push(DiffLine::Added(new[j].to_string()));
            j += 1;
        }
    }
    out.extend(old[i..].iter().map(|line| DiffLine::Removed((*line).to_string())));
    out.extend(new[j..].iter().map(|line| DiffLine::Added((*line).to_string())));
    out
}

#[cfg(test)]
#[path = "lines_tests.rs"]
mod tests;
