//! Source resolution: locate a named declaration in a directory of Rust files.
//!
//! Files are matched with `dir/**/*.rs` (build output under `target/` is
//! skipped) and visited in sorted order. Items are searched depth-first in
//! source order, descending into inline `mod` blocks; the first item whose
//! identifier matches wins.

use crate::model::Package;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use syn::{Item, ItemStruct, ItemTrait, UseTree};
use thiserror::Error;
use tracing::{debug, warn};

/// Manifest file marking a crate root.
const MANIFEST: &str = "Cargo.toml";

/// Crate-root directories whose entries are separate Cargo targets.
const TARGET_DIRS: [&str; 3] = ["tests", "examples", "benches"];

/// Resolves a declaration name to its item, owning module and imports.
pub trait SourceResolver {
    fn resolve(&self, dir: &Path, name: &str) -> Result<Resolved, ResolveError>;
}

/// The located item.
#[derive(Debug, Clone)]
pub enum Declaration {
    Trait(ItemTrait),
    Struct(ItemStruct),
    /// Any other named item (`enum`, `union`, `type`, trait alias).
    Other { kind: &'static str },
}

/// Everything the resolver knows about a declaration.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub declaration: Declaration,
    pub package: Package,
    pub imports: Vec<Package>,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("type `{name}` not found in {}", dir.display())]
    NotFound { name: String, dir: PathBuf },
    #[error("failed to parse {}:{line}:{column}: {message}", file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid source pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("invalid manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Resolver backed by `syn`. Parses files; performs no type checking.
#[derive(Debug, Default, Clone, Copy)]
pub struct SynResolver;

impl SourceResolver for SynResolver {
    fn resolve(&self, dir: &Path, name: &str) -> Result<Resolved, ResolveError> {
        let dir = fs::canonicalize(dir).map_err(|source| ResolveError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        debug!(dir = %dir.display(), "parsing sources");

        // A broken file elsewhere in the tree should not hide the declaration,
        // but it is the likely cause when nothing is found.
        let mut parse_error = None;

        for file in source_files(&dir)? {
            let content = fs::read_to_string(&file).map_err(|source| ResolveError::Io {
                path: file.clone(),
                source,
            })?;
            let syntax = match syn::parse_file(&content) {
                Ok(syntax) => syntax,
                Err(e) => {
                    warn!(file = %file.display(), "skipping unparseable file: {}", e);
                    parse_error.get_or_insert_with(|| to_parse_error(&file, &e));
                    continue;
                }
            };

            if let Some(found) = find_item(&syntax.items, name) {
                debug!(file = %file.display(), "found `{}`", name);
                let mut segments = module_segments(&dir, &file)?;
                segments.extend(found.modules);
                return Ok(Resolved {
                    declaration: declaration(found.item),
                    package: package_from_segments(&segments),
                    imports: collect_imports(found.scope),
                });
            }
        }

        Err(parse_error.unwrap_or_else(|| ResolveError::NotFound {
            name: name.to_string(),
            dir,
        }))
    }
}

fn to_parse_error(file: &Path, err: &syn::Error) -> ResolveError {
    let start = err.span().start();
    ResolveError::Parse {
        file: file.to_path_buf(),
        line: start.line,
        column: start.column + 1,
        message: err.to_string(),
    }
}

/// All `.rs` files below `dir`, sorted, excluding `target/` trees.
fn source_files(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let pattern = format!(
        "{}/**/*.rs",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|source| ResolveError::Pattern {
            pattern: pattern.clone(),
            source,
        })?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            !p.strip_prefix(dir)
                .unwrap_or(p.as_path())
                .components()
                .any(|c| c == Component::Normal("target".as_ref()))
        })
        .collect();
    files.sort();
    Ok(files)
}

struct Found<'a> {
    item: &'a Item,
    /// Items sharing the declaration's scope, for `use` collection.
    scope: &'a [Item],
    /// Inline modules between the file and the item, outermost first.
    modules: Vec<String>,
}

fn find_item<'a>(items: &'a [Item], name: &str) -> Option<Found<'a>> {
    for item in items {
        if item_ident(item).is_some_and(|ident| ident == name) {
            return Some(Found {
                item,
                scope: items,
                modules: Vec::new(),
            });
        }
        if let Item::Mod(module) = item {
            if let Some((_, ref content)) = module.content {
                if let Some(mut found) = find_item(content, name) {
                    found.modules.insert(0, module.ident.to_string());
                    return Some(found);
                }
            }
        }
    }
    None
}

fn item_ident(item: &Item) -> Option<&syn::Ident> {
    match item {
        Item::Trait(i) => Some(&i.ident),
        Item::Struct(i) => Some(&i.ident),
        Item::Enum(i) => Some(&i.ident),
        Item::Union(i) => Some(&i.ident),
        Item::Type(i) => Some(&i.ident),
        Item::TraitAlias(i) => Some(&i.ident),
        _ => None,
    }
}

fn declaration(item: &Item) -> Declaration {
    match item {
        Item::Trait(i) => Declaration::Trait(i.clone()),
        Item::Struct(i) => Declaration::Struct(i.clone()),
        Item::Enum(_) => Declaration::Other { kind: "enum" },
        Item::Union(_) => Declaration::Other { kind: "union" },
        Item::Type(_) => Declaration::Other { kind: "type" },
        _ => Declaration::Other { kind: "trait alias" },
    }
}

// ── Module path ─────────────────────────────────────────────────

/// Module path segments of `file`: crate name first, then one segment per
/// directory and file below the crate's `src/`.
///
/// Under a crate's `tests/`, `examples/` and `benches/` every file (or
/// directory with a `main.rs`) is a crate of its own, named after it.
fn module_segments(dir: &Path, file: &Path) -> Result<Vec<String>, ResolveError> {
    let (root, mut crate_name, in_crate) = match find_crate(dir, file)? {
        Some((root, name)) => (root, name, true),
        None => (dir.to_path_buf(), dir_name(dir), false),
    };

    let rel = file.strip_prefix(&root).unwrap_or(file);
    let mut parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    match parts.first().map(String::as_str) {
        Some("src") => {
            parts.remove(0);
        }
        Some(first) if in_crate && parts.len() > 1 && TARGET_DIRS.contains(&first) => {
            parts.remove(0);
            let target = parts.remove(0);
            crate_name = target.strip_suffix(".rs").unwrap_or(&target).replace('-', "_");
        }
        _ => {}
    }

    let mut segments = vec![crate_name];
    if let Some(file_name) = parts.pop() {
        segments.extend(parts);
        let stem = file_name.strip_suffix(".rs").unwrap_or(&file_name);
        if !matches!(stem, "lib" | "main" | "mod") {
            segments.push(stem.to_string());
        }
    }
    Ok(segments)
}

/// Nearest manifest with a `[package]` between the file and `dir`.
fn find_crate(dir: &Path, file: &Path) -> Result<Option<(PathBuf, String)>, ResolveError> {
    let mut current = file.parent();
    while let Some(candidate) = current {
        if !candidate.starts_with(dir) {
            break;
        }
        let manifest = candidate.join(MANIFEST);
        if manifest.is_file() {
            if let Some(name) = package_name(&manifest)? {
                return Ok(Some((candidate.to_path_buf(), name)));
            }
        }
        current = candidate.parent();
    }
    Ok(None)
}

fn package_name(manifest: &Path) -> Result<Option<String>, ResolveError> {
    let content = fs::read_to_string(manifest).map_err(|source| ResolveError::Io {
        path: manifest.to_path_buf(),
        source,
    })?;
    let table: toml::Table = content.parse().map_err(|source| ResolveError::Manifest {
        path: manifest.to_path_buf(),
        source,
    })?;
    Ok(table
        .get("package")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .map(|n| n.replace('-', "_")))
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().replace('-', "_"))
        .unwrap_or_else(|| "crate".to_string())
}

fn package_from_segments(segments: &[String]) -> Package {
    let name = segments.last().cloned().unwrap_or_default();
    Package::new(name, segments.join("::"))
}

// ── Imports ─────────────────────────────────────────────────────

/// Every binding introduced by `use` items in `scope`, in source order.
/// Bindings sharing a name are all kept.
fn collect_imports(scope: &[Item]) -> Vec<Package> {
    let mut imports = Vec::new();
    for item in scope {
        if let Item::Use(item_use) = item {
            let mut prefix = Vec::new();
            let leading = item_use.leading_colon.is_some();
            flatten_use_tree(&item_use.tree, &mut prefix, leading, &mut imports);
        }
    }
    imports
}

fn flatten_use_tree(tree: &UseTree, prefix: &mut Vec<String>, leading: bool, out: &mut Vec<Package>) {
    match tree {
        UseTree::Path(p) => {
            prefix.push(p.ident.to_string());
            flatten_use_tree(&p.tree, prefix, leading, out);
            prefix.pop();
        }
        UseTree::Name(n) if n.ident == "self" => {
            let name = prefix.last().cloned().unwrap_or_default();
            out.push(Package::new(name, join_path(prefix, None, leading)));
        }
        UseTree::Name(n) => {
            let ident = n.ident.to_string();
            let path = join_path(prefix, Some(&ident), leading);
            out.push(Package::new(ident, path));
        }
        UseTree::Rename(r) => {
            let ident = r.ident.to_string();
            let last = if ident == "self" { None } else { Some(ident.as_str()) };
            out.push(Package::new(
                r.rename.to_string(),
                join_path(prefix, last, leading),
            ));
        }
        UseTree::Glob(_) => {
            out.push(Package::new("*", join_path(prefix, Some("*"), leading)));
        }
        UseTree::Group(g) => {
            for tree in &g.items {
                flatten_use_tree(tree, prefix, leading, out);
            }
        }
    }
}

fn join_path(prefix: &[String], last: Option<&str>, leading: bool) -> String {
    let mut parts: Vec<&str> = prefix.iter().map(String::as_str).collect();
    parts.extend(last);
    let path = parts.join("::");
    if leading {
        format!("::{}", path)
    } else {
        path
    }
}
