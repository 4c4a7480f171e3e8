//! In-memory file tree of a local directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::SourceError;
use crate::utils::file::{is_excluded, is_text_file};

/// A file or directory in the tree. Only allow-listed text files carry content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub children: Vec<FileNode>,
    pub content: Option<String>,
}

/// Options for building a file tree.
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// Glob patterns for paths to leave out
    pub exclude_patterns: Vec<String>,

    /// Text files larger than this are listed without content
    pub max_file_size: Option<u64>,
}

impl FileNode {
    fn directory(path: &Path) -> Self {
        Self {
            name: file_name(path),
            path: path.to_path_buf(),
            is_dir: true,
            children: Vec::new(),
            content: None,
        }
    }

    fn file(path: &Path, content: Option<String>) -> Self {
        Self {
            name: file_name(path),
            path: path.to_path_buf(),
            is_dir: false,
            children: Vec::new(),
            content,
        }
    }

    /// Number of files (not directories) in this subtree.
    pub fn file_count(&self) -> usize {
        if self.is_dir {
            self.children.iter().map(FileNode::file_count).sum()
        } else {
            1
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Build the tree rooted at directory `root`, children sorted by name.
///
/// Any read or directory-walk failure aborts the build.
pub fn build_tree(root: &Path, options: &TreeOptions) -> Result<FileNode, SourceError> {
    let metadata = std::fs::metadata(root).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(root.to_path_buf())
        } else {
            SourceError::Read {
                path: root.to_path_buf(),
                source,
            }
        }
    })?;
    if !metadata.is_dir() {
        return Err(SourceError::NotADirectory(root.to_path_buf()));
    }

    // Directories still being filled, root at the bottom. Entries arrive
    // depth-first, so a node is complete once the walk climbs above it.
    let mut stack = vec![FileNode::directory(root)];

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_excluded(relative_to(root, e.path()), &options.exclude_patterns));

    for entry in walker {
        let entry = entry?;
        collapse_to(&mut stack, entry.depth());

        // Links are not followed; only those resolving to a regular file are listed.
        if entry.path_is_symlink() && !entry.path().is_file() {
            debug!("Skipping link {}", entry.path().display());
            continue;
        }

        if entry.file_type().is_dir() {
            stack.push(FileNode::directory(entry.path()));
            continue;
        }

        let content = read_text(entry.path(), options)?;
        if let Some(parent) = stack.last_mut() {
            parent.children.push(FileNode::file(entry.path(), content));
        }
    }

    collapse_to(&mut stack, 1);
    let root = stack
        .pop()
        .unwrap_or_else(|| FileNode::directory(root));
    debug!("Built file tree with {} files", root.file_count());
    Ok(root)
}

/// Exclude patterns apply below the root, never to the root's own ancestors.
fn relative_to<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Pop finished directories until `depth` nodes remain on the stack.
fn collapse_to(stack: &mut Vec<FileNode>, depth: usize) {
    while stack.len() > depth.max(1) {
        if let Some(done) = stack.pop()
            && let Some(parent) = stack.last_mut()
        {
            parent.children.push(done);
        }
    }
}

fn read_text(path: &Path, options: &TreeOptions) -> Result<Option<String>, SourceError> {
    if !is_text_file(path) {
        return Ok(None);
    }

    let read_err = |source: std::io::Error| SourceError::Read {
        path: path.to_path_buf(),
        source,
    };

    if let Some(max) = options.max_file_size {
        let size = std::fs::metadata(path).map_err(read_err)?.len();
        if size > max {
            warn!(
                "Skipping {}: file exceeds maximum size ({} > {})",
                path.display(),
                size,
                max
            );
            return Ok(None);
        }
    }

    let bytes = std::fs::read(path).map_err(read_err)?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Render the tree with box-drawing connectors, directories suffixed with `/`.
pub fn render_tree(root: &FileNode) -> String {
    let mut output = format!("{}\n", root.name);
    render_children(&root.children, "", &mut output);
    output
}

fn render_children(children: &[FileNode], prefix: &str, output: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        let connector = if is_last { "└── " } else { "├── " };
        let suffix = if child.is_dir { "/" } else { "" };
        output.push_str(&format!("{prefix}{connector}{}{suffix}\n", child.name));

        if child.is_dir && !child.children.is_empty() {
            let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            render_children(&child.children, &child_prefix, output);
        }
    }
}
