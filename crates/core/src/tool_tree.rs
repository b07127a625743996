//! Grouping of cheats by the command-line tool they invoke.

use indexmap::IndexMap;

use crate::store::{CheatId, CheatStore};

/// Bucket for commands with no recognisable tool. Always sorted last.
pub const OTHER_TOOL: &str = "other";

/// Leading words that wrap the real tool rather than being it.
const SKIPPED_PREFIXES: [&str; 7] = ["sudo", "env", "time", "nice", "nohup", "strace", "ltrace"];

/// Infers the tool a command runs from its first line.
///
/// Environment assignments (`FOO=bar`) and wrapper commands such as `sudo`
/// are skipped; the first remaining word loses any path prefix and is
/// lowercased.
///
/// # Examples
///
/// ```
/// use arsenal_core::tool_tree::tool_name;
///
/// assert_eq!(tool_name("sudo nmap -sV <ip>"), "nmap");
/// assert_eq!(tool_name("FOO=bar ./run.sh"), "run.sh");
/// assert_eq!(tool_name(""), "other");
/// ```
pub fn tool_name(command: &str) -> String {
    let first_line = command.trim().lines().next().unwrap_or_default();

    first_line
        .split_whitespace()
        .filter(|word| !word.contains('='))
        .find(|word| {
            !SKIPPED_PREFIXES
                .iter()
                .any(|prefix| word.eq_ignore_ascii_case(prefix))
        })
        .map(|word| word.rsplit('/').next().unwrap_or(word).to_lowercase())
        .unwrap_or_else(|| OTHER_TOOL.to_string())
}

/// Cheats grouped by tool. Derived on demand, never stored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ToolTree {
    groups: IndexMap<String, Vec<CheatId>>,
}

impl ToolTree {
    /// Groups `ids` by tool, keeping their order within each group.
    ///
    /// Group keys are sorted alphabetically except [`OTHER_TOOL`], which is
    /// moved to the end.
    pub fn build(store: &CheatStore, ids: &[CheatId]) -> Self {
        let mut groups: IndexMap<String, Vec<CheatId>> = IndexMap::new();
        for &id in ids {
            if let Some(cheat) = store.get(id) {
                groups.entry(tool_name(&cheat.command)).or_default().push(id);
            }
        }

        groups.sort_by(|a, _, b, _| {
            (a == OTHER_TOOL)
                .cmp(&(b == OTHER_TOOL))
                .then_with(|| a.cmp(b))
        });

        Self { groups }
    }

    /// Tool names in display order.
    pub fn tools(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Tools with their member cheats, in display order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[CheatId])> {
        self.groups
            .iter()
            .map(|(tool, ids)| (tool.as_str(), ids.as_slice()))
    }

    pub fn members(&self, tool: &str) -> &[CheatId] {
        self.groups.get(tool).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
