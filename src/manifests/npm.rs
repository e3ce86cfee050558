//! npm manifest parsing (package.json, package-lock.json).
//!
//! `package.json` yields the DIRECT dependencies with their declared version
//! specifiers. `package-lock.json` yields the whole nested tree, parents
//! before children, with pinned versions.

use std::path::Path;

use serde_json::{Map, Value};

use super::{Dependency, ManifestError};

/// Maximum nesting of `dependencies` objects accepted in a lockfile.
///
/// Each level costs two JSON nesting levels, so this stays well under
/// serde_json's own recursion limit of 128 and the walker reports the error.
const MAX_LOCK_DEPTH: usize = 32;

/// Parse direct dependencies (name -> version spec) from package.json.
pub fn parse_package_json(path: &Path) -> Result<Vec<Dependency>, ManifestError> {
    let content = read(path)?;
    if content.trim().is_empty() {
        return Ok(vec![]);
    }

    let doc = parse_json(path, &content)?;
    let root = doc
        .as_object()
        .ok_or_else(|| ManifestError::invalid(path, "expected a JSON object"))?;

    let Some(deps) = dependencies_of(path, root)? else {
        return Ok(vec![]);
    };

    deps.iter()
        .map(|(name, version)| -> Result<Dependency, ManifestError> {
            let version = version.as_str().ok_or_else(|| {
                ManifestError::invalid(path, format!("version of `{name}` is not a string"))
            })?;
            Ok(Dependency::npm(name.as_str(), version))
        })
        .collect()
}

/// Parse every dependency, direct and transitive, from a v1-style
/// package-lock.json.
pub fn parse_package_lock(path: &Path) -> Result<Vec<Dependency>, ManifestError> {
    let content = read(path)?;
    let doc = parse_json(path, &content)?;
    walk_lock_tree(path, &doc)
}

/// Depth-first, pre-order walk over nested `dependencies` objects.
fn walk_lock_tree(path: &Path, root: &Value) -> Result<Vec<Dependency>, ManifestError> {
    let mut deps = Vec::new();
    let mut stack = Vec::new();

    push_children(path, root, 1, &mut stack)?;

    while let Some((name, entry, depth)) = stack.pop() {
        let version = match entry.get("version") {
            None => "",
            Some(Value::String(v)) => v.as_str(),
            Some(_) => {
                return Err(ManifestError::invalid(
                    path,
                    format!("version of `{name}` is not a string"),
                ));
            }
        };
        deps.push(Dependency::npm(name, version));

        push_children(path, entry, depth + 1, &mut stack)?;
    }

    Ok(deps)
}

/// Push the children of `node` so that the first child is popped first.
fn push_children<'a>(
    path: &Path,
    node: &'a Value,
    depth: usize,
    stack: &mut Vec<(&'a str, &'a Value, usize)>,
) -> Result<(), ManifestError> {
    let node = node
        .as_object()
        .ok_or_else(|| ManifestError::invalid(path, "dependency entry is not an object"))?;

    let Some(children) = dependencies_of(path, node)? else {
        return Ok(());
    };

    if children.is_empty() {
        return Ok(());
    }

    if depth > MAX_LOCK_DEPTH {
        return Err(ManifestError::TooDeep {
            path: path.to_path_buf(),
            limit: MAX_LOCK_DEPTH,
        });
    }

    for (name, entry) in children.iter().rev() {
        stack.push((name.as_str(), entry, depth));
    }

    Ok(())
}

fn dependencies_of<'a>(
    path: &Path,
    node: &'a Map<String, Value>,
) -> Result<Option<&'a Map<String, Value>>, ManifestError> {
    match node.get("dependencies") {
        None => Ok(None),
        Some(Value::Object(deps)) => Ok(Some(deps)),
        Some(_) => Err(ManifestError::invalid(
            path,
            "`dependencies` is not an object",
        )),
    }
}

fn read(path: &Path) -> Result<String, ManifestError> {
    std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json(path: &Path, content: &str) -> Result<Value, ManifestError> {
    serde_json::from_str(content).map_err(|source| ManifestError::Json {
        path: path.to_path_buf(),
        source,
    })
}
