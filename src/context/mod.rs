// Project context discovery
//
// Searches upward from the working directory for a project instructions file
// and injects its contents into prompt templates that reference it.

use std::fs;
use std::path::{Path, PathBuf};

/// Loaded project context. `filename` is the base name of the source file,
/// e.g. "CLAUDE.md"; both fields are empty when no context file was found.
#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    pub content: String,
    pub filename: String,
}

impl ProjectContext {
    pub fn is_empty(&self) -> bool {
        self.filename.is_empty()
    }
}

const CANDIDATE_FILES: &[&str] = &["CLAUDE.md", "AGENTS.md"];

/// Search upward from `start_dir` for a project context file, in priority
/// order: CLAUDE.md, then AGENTS.md, then the alphabetically-first file in a
/// .cursor/rules/ directory. Returns a default (empty) context when nothing
/// is found.
pub fn load(start_dir: &Path) -> ProjectContext {
    for name in CANDIDATE_FILES {
        if let Some(path) = find_upward(start_dir, name) {
            if let Ok(content) = fs::read_to_string(&path) {
                return ProjectContext {
                    content,
                    filename: (*name).to_string(),
                };
            }
        }
    }

    if let Some(path) = find_cursor_rule(start_dir) {
        if let Ok(content) = fs::read_to_string(&path) {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            return ProjectContext { content, filename };
        }
    }

    ProjectContext::default()
}

fn find_upward(start_dir: &Path, filename: &str) -> Option<PathBuf> {
    let mut dir = start_dir.canonicalize().ok()?;
    loop {
        let candidate = dir.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

fn find_cursor_rule(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.canonicalize().ok()?;
    loop {
        let rules_dir = dir.join(".cursor").join("rules");
        if rules_dir.is_dir() {
            if let Ok(entries) = fs::read_dir(&rules_dir) {
                let mut files: Vec<PathBuf> = entries
                    .flatten()
                    .map(|e| e.path())
                    .filter(|p| p.is_file())
                    .collect();
                files.sort();
                if let Some(first) = files.into_iter().next() {
                    return Some(first);
                }
            }
        }
        if !dir.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_claude_md_in_start_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CLAUDE.md"), "use rust").unwrap();

        let ctx = load(dir.path());
        assert_eq!(ctx.filename, "CLAUDE.md");
        assert_eq!(ctx.content, "use rust");
    }

    #[test]
    fn walks_up_to_parent_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("AGENTS.md"), "agents").unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let ctx = load(&nested);
        assert_eq!(ctx.filename, "AGENTS.md");
    }

    #[test]
    fn claude_md_takes_priority_over_agents_md() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("AGENTS.md"), "agents").unwrap();
        fs::write(dir.path().join("CLAUDE.md"), "claude").unwrap();

        let ctx = load(dir.path());
        assert_eq!(ctx.filename, "CLAUDE.md");
        assert_eq!(ctx.content, "claude");
    }

    #[test]
    fn nearer_agents_md_loses_to_farther_claude_md() {
        // Named candidates are tried in priority order, each searched upward,
        // so a CLAUDE.md in an ancestor beats an AGENTS.md in the start dir.
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CLAUDE.md"), "root claude").unwrap();
        let nested = dir.path().join("sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("AGENTS.md"), "near agents").unwrap();

        let ctx = load(&nested);
        assert_eq!(ctx.filename, "CLAUDE.md");
    }

    #[test]
    fn falls_back_to_first_cursor_rule_sorted() {
        let dir = TempDir::new().unwrap();
        let rules = dir.path().join(".cursor").join("rules");
        fs::create_dir_all(&rules).unwrap();
        fs::write(rules.join("zz.mdc"), "last").unwrap();
        fs::write(rules.join("aa.mdc"), "first").unwrap();

        let ctx = load(dir.path());
        assert_eq!(ctx.filename, "aa.mdc");
        assert_eq!(ctx.content, "first");
    }

    #[test]
    fn empty_result_when_nothing_found() {
        let dir = TempDir::new().unwrap();
        let ctx = load(dir.path());
        assert!(ctx.is_empty());
        assert!(ctx.content.is_empty());
    }
}
