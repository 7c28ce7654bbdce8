use crate::document::{Mapping, Node};
use crate::error::{CiDiffError, Result};
use crate::source::SourceId;

/// Include forms that need the GitLab server to resolve.
const SERVER_SIDE_KINDS: &[&str] = &["project", "template", "component"];

/// Turn the value of an `include` key into the sources it names, in order.
///
/// Accepts a path or URL string, a `{local: ..}` / `{remote: ..}` mapping, or
/// a list mixing both.
///
/// # Errors
/// Returns [`CiDiffError::UnsupportedInclude`] for `project`, `template` and
/// `component` includes and for values of any other shape.
pub fn parse_include(
    value: &Node,
    including: &SourceId,
    git_ref: Option<&str>,
) -> Result<Vec<SourceId>> {
    match value {
        Node::Null => Ok(Vec::new()),
        Node::String(path) => Ok(vec![SourceId::from_include(path, git_ref)]),
        Node::Mapping(map) => Ok(vec![parse_include_mapping(map, including, git_ref)?]),
        Node::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Node::String(path) => Ok(SourceId::from_include(path, git_ref)),
                Node::Mapping(map) => parse_include_mapping(map, including, git_ref),
                other => Err(unsupported(
                    including,
                    format!("include entries must be strings or mappings, found a {}", other.kind()),
                )),
            })
            .collect(),
        other => Err(unsupported(
            including,
            format!("include must be a string, mapping or list, found a {}", other.kind()),
        )),
    }
}

fn parse_include_mapping(
    map: &Mapping,
    including: &SourceId,
    git_ref: Option<&str>,
) -> Result<SourceId> {
    if let Some(local) = map.get("local") {
        let path = local
            .as_str()
            .ok_or_else(|| unsupported(including, "include:local must be a string"))?;
        return Ok(SourceId::from_include(path, git_ref));
    }

    if let Some(remote) = map.get("remote") {
        let url = remote
            .as_str()
            .ok_or_else(|| unsupported(including, "include:remote must be a string"))?;
        return Ok(SourceId::Remote(url.to_string()));
    }

    if let Some(kind) = SERVER_SIDE_KINDS.iter().find(|kind| map.contains_key(**kind)) {
        return Err(unsupported(
            including,
            format!("include:{kind} is resolved by the GitLab server and cannot be read locally"),
        ));
    }

    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    Err(unsupported(
        including,
        format!("unknown include form with keys [{}]", keys.join(", ")),
    ))
}

fn unsupported(including: &SourceId, detail: impl Into<String>) -> CiDiffError {
    CiDiffError::UnsupportedInclude {
        source_id: including.to_string(),
        detail: detail.into(),
    }
}
