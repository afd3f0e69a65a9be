/// Workspace file-tree model.
///
/// The backend returns a flat recursive listing; this module folds it into a
/// tree keyed by path segments and tracks the view state (expansion,
/// selection, transient status badges). Rendering lives in `tui/files_view`.
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::api::FileEntry;

const BADGE_TTL: Duration = Duration::from_secs(3);

// ── Tree ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub kind: FileKind,
    pub children: Vec<FileNode>,
}

impl FileNode {
    fn dir(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: FileKind::Directory,
            children: Vec::new(),
        }
    }
}

/// Fold a flat listing into a tree. Intermediate directories are created
/// from path segments even when the listing has no explicit entry for them.
/// Children sort folders-first, then lexicographically by name.
pub fn build_tree(entries: &[FileEntry]) -> FileNode {
    let mut root = FileNode::dir("", "");
    for entry in entries {
        let kind = if entry.kind == "directory" { FileKind::Directory } else { FileKind::File };
        insert(&mut root, &entry.path, kind);
    }
    sort_children(&mut root);
    root
}

fn insert(root: &mut FileNode, path: &str, kind: FileKind) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return;
    }
    let mut node = root;
    let mut prefix = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        let last = i == segments.len() - 1;
        let pos = node.children.iter().position(|c| c.name == *segment);
        let idx = match pos {
            Some(idx) => {
                if last && kind == FileKind::Directory {
                    node.children[idx].kind = FileKind::Directory;
                }
                idx
            }
            None => {
                let child = if last && kind == FileKind::File {
                    FileNode {
                        name: segment.to_string(),
                        path: prefix.clone(),
                        kind: FileKind::File,
                        children: Vec::new(),
                    }
                } else {
                    FileNode::dir(segment, &prefix)
                };
                node.children.push(child);
                node.children.len() - 1
            }
        };
        node = &mut node.children[idx];
    }
}

fn sort_children(node: &mut FileNode) {
    node.children.sort_by(|a, b| {
        (a.kind == FileKind::File)
            .cmp(&(b.kind == FileKind::File))
            .then_with(|| a.name.cmp(&b.name))
    });
    for child in &mut node.children {
        sort_children(child);
    }
}

// ── Badges ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Created,
    Modified,
    Deleted,
    Saved,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::Created => "created",
            Badge::Modified => "modified",
            Badge::Deleted => "deleted",
            Badge::Saved => "saved",
        }
    }

    /// Best-effort mapping from a file-operation result line.
    pub fn from_result(result: &str) -> Self {
        let lower = result.to_lowercase();
        if lower.contains("creat") {
            Badge::Created
        } else if lower.contains("delet") || lower.contains("remov") {
            Badge::Deleted
        } else {
            Badge::Modified
        }
    }
}

// ── Browser state ─────────────────────────────────────────────────────────────

/// One row of the flattened tree, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub depth: usize,
    pub name: String,
    pub path: String,
    pub kind: FileKind,
    pub expanded: bool,
}

#[derive(Debug)]
pub struct FileBrowser {
    root: FileNode,
    expanded: HashSet<String>,
    pub selected: usize,
    badges: HashMap<String, (Badge, Instant)>,
}

impl Default for FileBrowser {
    fn default() -> Self {
        let mut expanded = HashSet::new();
        // Root contents visible from the start
        expanded.insert(String::new());
        Self {
            root: FileNode::dir("", ""),
            expanded,
            selected: 0,
            badges: HashMap::new(),
        }
    }
}

impl FileBrowser {
    /// Replace the tree with a fresh listing. Expansion and badges survive a
    /// refresh; selection is clamped.
    pub fn set_entries(&mut self, entries: &[FileEntry]) {
        self.root = build_tree(entries);
        let rows = self.visible_rows();
        if self.selected >= rows.len() {
            self.selected = rows.len().saturating_sub(1);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Depth-first flatten of the expanded portion of the tree.
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        if self.expanded.contains("") {
            for child in &self.root.children {
                self.flatten(child, 0, &mut rows);
            }
        }
        rows
    }

    fn flatten(&self, node: &FileNode, depth: usize, rows: &mut Vec<TreeRow>) {
        let expanded = self.expanded.contains(&node.path);
        rows.push(TreeRow {
            depth,
            name: node.name.clone(),
            path: node.path.clone(),
            kind: node.kind,
            expanded,
        });
        if node.kind == FileKind::Directory && expanded {
            for child in &node.children {
                self.flatten(child, depth + 1, rows);
            }
        }
    }

    pub fn selected_row(&self) -> Option<TreeRow> {
        self.visible_rows().into_iter().nth(self.selected)
    }

    pub fn move_selection(&mut self, delta: i64) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as i64 + delta;
        self.selected = next.clamp(0, len as i64 - 1) as usize;
    }

    pub fn toggle_expand(&mut self, path: &str) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
    }

    pub fn set_badge(&mut self, path: &str, badge: Badge) {
        self.badges.insert(path.to_string(), (badge, Instant::now()));
    }

    pub fn badge(&self, path: &str) -> Option<Badge> {
        self.badges.get(path).map(|(b, _)| *b)
    }

    /// Drop badges older than the TTL. Called from the animation ticker.
    pub fn sweep_badges(&mut self, now: Instant) {
        self.badges.retain(|_, (_, set_at)| now.duration_since(*set_at) < BADGE_TTL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, kind: &str) -> FileEntry {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        FileEntry { name, path: path.to_string(), kind: kind.to_string() }
    }

    #[test]
    fn folders_sort_before_files_then_lexicographic() {
        let tree = build_tree(&[
            entry("zeta.txt", "file"),
            entry("alpha.txt", "file"),
            entry("src", "directory"),
            entry("docs", "directory"),
        ]);
        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["docs", "src", "alpha.txt", "zeta.txt"]);
    }

    #[test]
    fn nested_paths_create_intermediate_directories() {
        let tree = build_tree(&[entry("src/app/main.py", "file")]);
        assert_eq!(tree.children.len(), 1);
        let src = &tree.children[0];
        assert_eq!(src.kind, FileKind::Directory);
        let app = &src.children[0];
        assert_eq!(app.path, "src/app");
        assert_eq!(app.children[0].name, "main.py");
        assert_eq!(app.children[0].kind, FileKind::File);
    }

    #[test]
    fn collapsed_directories_hide_their_children() {
        let mut browser = FileBrowser::default();
        browser.set_entries(&[entry("src", "directory"), entry("src/main.py", "file")]);

        let rows = browser.visible_rows();
        assert_eq!(rows.len(), 1); // src collapsed by default

        browser.toggle_expand("src");
        let rows = browser.visible_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].path, "src/main.py");
        assert_eq!(rows[1].depth, 1);

        browser.toggle_expand("src");
        assert_eq!(browser.visible_rows().len(), 1);
    }

    #[test]
    fn badges_expire_after_ttl() {
        let mut browser = FileBrowser::default();
        browser.set_badge("main.py", Badge::Created);
        assert_eq!(browser.badge("main.py"), Some(Badge::Created));

        let now = Instant::now();
        browser.sweep_badges(now);
        assert_eq!(browser.badge("main.py"), Some(Badge::Created));

        browser.sweep_badges(now + Duration::from_secs(4));
        assert_eq!(browser.badge("main.py"), None);
    }

    #[test]
    fn badge_from_result_text() {
        assert_eq!(Badge::from_result("Created file main.py"), Badge::Created);
        assert_eq!(Badge::from_result("deleted old.py"), Badge::Deleted);
        assert_eq!(Badge::from_result("wrote 120 bytes"), Badge::Modified);
    }

    #[test]
    fn selection_clamps_to_visible_rows() {
        let mut browser = FileBrowser::default();
        browser.set_entries(&[entry("a.txt", "file"), entry("b.txt", "file")]);
        browser.move_selection(10);
        assert_eq!(browser.selected, 1);
        browser.move_selection(-10);
        assert_eq!(browser.selected, 0);
    }
}
