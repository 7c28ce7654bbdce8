use std::fmt::Write;

use regex::Regex;
use serde_yaml::Value;

use super::{Mapping, Node, REFERENCE_TAG};

/// Scalars YAML 1.1 readers (GitLab's included) would turn into booleans.
const YAML11_BOOLS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "on", "On", "ON", "off", "Off",
    "OFF",
];

/// Characters that cannot start a plain scalar.
const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
];

/// Plain scalars a YAML 1.1 resolver reads as int, float or timestamp,
/// including the sexagesimal (`1:30`) and underscore (`1_000`) forms.
const YAML11_IMPLICIT: &str = concat!(
    r"^(?:",
    r"[-+]?0b[0-1_]+",
    r"|[-+]?0[0-7_]+",
    r"|[-+]?(?:0|[1-9][0-9_]*)",
    r"|[-+]?0x[0-9a-fA-F_]+",
    r"|[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+",
    r"|[-+]?[0-9][0-9_]*\.[0-9_]*(?:[eE][-+][0-9]+)?",
    r"|\.[0-9_]+(?:[eE][-+][0-9]+)?",
    r"|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*",
    r"|[-+]?\.(?:inf|Inf|INF)",
    r"|\.(?:nan|NaN|NAN)",
    r"|[0-9]{4}-[0-9]{2}-[0-9]{2}",
    r"|[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(?:[Tt]|[ \t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]*)?(?:[ \t]*(?:Z|[-+][0-9]{1,2}(?::[0-9]{2})?))?",
    r")$",
);

const INDENT: usize = 2;

/// Knobs for [`YamlEmitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitOptions {
    /// Emit mapping keys in lexicographic order instead of insertion order.
    pub sort_keys: bool,
}

/// Deterministic block-style YAML writer for [`Node`] trees.
///
/// Comma-grouped digit strings such as `1,000` are always quoted: the lint
/// service would otherwise read them back as something other than a string.
pub struct YamlEmitter {
    options: EmitOptions,
    numeric_groups: Regex,
    yaml11_implicit: Regex,
}

impl Default for YamlEmitter {
    fn default() -> Self {
        Self::new(EmitOptions::default())
    }
}

impl YamlEmitter {
    #[must_use]
    pub fn new(options: EmitOptions) -> Self {
        Self {
            options,
            numeric_groups: Regex::new(r"^[0-9]+(,[0-9]*)*$").expect("Invalid regex"),
            yaml11_implicit: Regex::new(YAML11_IMPLICIT).expect("Invalid regex"),
        }
    }

    /// Emitter producing key-sorted output, the canonical form used for diffs.
    #[must_use]
    pub fn sorted() -> Self {
        Self::new(EmitOptions { sort_keys: true })
    }

    /// Serialize a mapping (typically a whole document) to YAML text.
    #[must_use]
    pub fn mapping_to_string(&self, mapping: &Mapping) -> String {
        if mapping.is_empty() {
            return "{}\n".to_string();
        }
        let mut lines = Vec::new();
        self.emit_mapping(mapping, 0, &mut lines);
        join_lines(&lines)
    }

    /// Serialize any node to YAML text.
    #[must_use]
    pub fn node_to_string(&self, node: &Node) -> String {
        match node {
            Node::Mapping(map) if !map.is_empty() => self.mapping_to_string(map),
            Node::Sequence(seq) if !seq.is_empty() => {
                let mut lines = Vec::new();
                self.emit_sequence(seq, 0, &mut lines);
                join_lines(&lines)
            }
            other => format!("{}\n", self.inline(other)),
        }
    }

    /// Serialize `{name: body}`, the display form of a single job.
    #[must_use]
    pub fn job_to_string(&self, name: &str, body: &Node) -> String {
        let mut single = Mapping::with_capacity(1);
        single.insert(name.to_string(), body.clone());
        self.mapping_to_string(&single)
    }

    fn ordered<'a>(&self, mapping: &'a Mapping) -> Vec<(&'a String, &'a Node)> {
        let mut entries: Vec<_> = mapping.iter().collect();
        if self.options.sort_keys {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }
        entries
    }

    fn emit_mapping(&self, mapping: &Mapping, indent: usize, lines: &mut Vec<String>) {
        let pad = " ".repeat(indent);
        for (key, value) in self.ordered(mapping) {
            let key = self.scalar(key, false);
            match value {
                Node::Mapping(map) if !map.is_empty() => {
                    lines.push(format!("{pad}{key}:"));
                    self.emit_mapping(map, indent + INDENT, lines);
                }
                Node::Sequence(seq) if !seq.is_empty() => {
                    // Block sequences under a key are not indented further.
                    lines.push(format!("{pad}{key}:"));
                    self.emit_sequence(seq, indent, lines);
                }
                other => lines.push(format!("{pad}{key}: {}", self.inline(other))),
            }
        }
    }

    fn emit_sequence(&self, sequence: &[Node], indent: usize, lines: &mut Vec<String>) {
        let pad = " ".repeat(indent);
        for item in sequence {
            let nested_start = lines.len();
            match item {
                Node::Mapping(map) if !map.is_empty() => {
                    self.emit_mapping(map, indent + INDENT, lines);
                }
                Node::Sequence(seq) if !seq.is_empty() => {
                    self.emit_sequence(seq, indent + INDENT, lines);
                }
                other => {
                    lines.push(format!("{pad}- {}", self.inline(other)));
                    continue;
                }
            }
            // Fold the first nested line onto the dash: "- key: value".
            let first = &mut lines[nested_start];
            first.replace_range(..indent + INDENT, &format!("{pad}- "));
        }
    }

    fn inline(&self, node: &Node) -> String {
        match node {
            Node::Null => "null".to_string(),
            Node::Bool(b) => b.to_string(),
            Node::Number(n) => n.to_string(),
            Node::String(s) => self.scalar(s, false),
            Node::Reference(refs) => {
                let items: Vec<String> = refs.iter().map(|r| self.scalar(r, true)).collect();
                format!("{REFERENCE_TAG} [{}]", items.join(", "))
            }
            Node::Sequence(seq) => {
                let items: Vec<String> = seq.iter().map(|item| self.inline(item)).collect();
                format!("[{}]", items.join(", "))
            }
            Node::Mapping(map) => {
                let items: Vec<String> = self
                    .ordered(map)
                    .into_iter()
                    .map(|(k, v)| format!("{}: {}", self.scalar(k, true), self.inline(v)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            }
        }
    }

    /// Render a string scalar, quoting it when a plain rendering would not
    /// read back as the same string.
    fn scalar(&self, s: &str, flow: bool) -> String {
        if !self.needs_quotes(s, flow) {
            return s.to_string();
        }
        if s.chars().any(needs_escape) {
            double_quoted(s)
        } else {
            format!("'{}'", s.replace('\'', "''"))
        }
    }

    fn needs_quotes(&self, s: &str, flow: bool) -> bool {
        if s.is_empty()
            || self.numeric_groups.is_match(s)
            || self.yaml11_implicit.is_match(s)
            || YAML11_BOOLS.contains(&s)
            || s.starts_with(INDICATORS)
            || s.starts_with(char::is_whitespace)
            || s.ends_with(char::is_whitespace)
            || s.ends_with(':')
            || s.contains(": ")
            || s.contains(" #")
            || s.chars().any(needs_escape)
        {
            return true;
        }
        if flow && s.contains([',', '[', ']', '{', '}']) {
            return true;
        }
        // Anything the parser would read as a non-string needs quotes.
        !matches!(serde_yaml::from_str::<Value>(s), Ok(Value::String(ref parsed)) if parsed == s)
    }
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if needs_escape(c) => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Control characters plus the Unicode line breaks a YAML reader folds.
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
#[path = "emit_tests.rs"]
mod tests;
