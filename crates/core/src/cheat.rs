//! Cheat records and the markdown grammar they are parsed from.
//!
//! A cheat file is read line by line:
//!
//! - `# Heading` starts a new section and forgets the current title and tags.
//! - `## Title` names the next cheat.
//! - A `#`-line containing `/` carries tags, e.g. `#cat/recon #plat/linux`.
//! - A fenced block (```` ``` ```` or `~~~`) holds the command body; closing it
//!   emits a cheat when a title is pending. Only a bare run of the same marker,
//!   at least as long as the opening one, closes a block.

use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use indexmap::IndexSet;
use regex::Regex;

use crate::error::{Error, Result};

/// One titled, tagged command snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cheat {
    pub title: String,
    /// Command body with surrounding blank space trimmed. May span lines.
    pub command: String,
    /// Lowercase tags in first-seen order.
    pub tags: IndexSet<String>,
    pub source_path: String,
}

impl Cheat {
    pub fn command_lines(&self) -> impl Iterator<Item = &str> {
        self.command.lines()
    }

    /// The command on a single line, for list rows.
    pub fn one_line_command(&self) -> String {
        self.command.replace('\n', " ")
    }

    /// Case-insensitive substring match on title or command.
    ///
    /// `lowercase_query` must already be lowercased.
    pub fn matches(&self, lowercase_query: &str) -> bool {
        self.title.to_lowercase().contains(lowercase_query)
            || self.command.to_lowercase().contains(lowercase_query)
    }
}

impl Display for Cheat {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} ({})", self.title, self.one_line_command())
    }
}

/// Shortest run of backticks or tildes that opens a code fence.
const MIN_FENCE_LENGTH: usize = 3;

/// An opening code fence: its marker character and how many times it repeats.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Fence {
    marker: char,
    length: usize,
}

impl Fence {
    fn detect(trimmed: &str) -> Option<Self> {
        let marker = trimmed.chars().next().filter(|&c| c == '`' || c == '~')?;
        let length = trimmed.chars().take_while(|&c| c == marker).count();
        (length >= MIN_FENCE_LENGTH).then_some(Fence { marker, length })
    }

    /// A closing fence uses the same marker, is at least as long as the
    /// opener and carries no info string.
    fn is_closed_by(self, trimmed: &str) -> bool {
        Fence::detect(trimmed).is_some_and(|closing| {
            closing.marker == self.marker
                && closing.length >= self.length
                && trimmed[closing.length * self.marker.len_utf8()..]
                    .trim()
                    .is_empty()
        })
    }
}

/// Longest run of consecutive backticks anywhere in `text`.
fn longest_backtick_run(text: &str) -> usize {
    text.split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or_default()
}

fn hashtag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#([\w/-]+)").expect("hashtag pattern is valid"))
}

/// Parses one markdown document into cheats.
///
/// # Errors
///
/// Returns [`Error::UnterminatedFence`] when a code fence is still open at the
/// end of the document. The caller decides whether to skip the whole file.
pub fn parse_markdown(text: &str, source_path: &str) -> Result<Vec<Cheat>> {
    let mut cheats = Vec::new();

    let mut title: Option<String> = None;
    let mut tags: IndexSet<String> = IndexSet::new();
    let mut open_fence: Option<(Fence, usize)> = None;
    let mut body: Vec<&str> = Vec::new();

    for (line_number, line) in text.lines().enumerate() {
        let trimmed = line.trim();

        if let Some((fence, _)) = open_fence {
            if fence.is_closed_by(trimmed) {
                let command = body.join("\n").trim().to_string();
                if let Some(title) = title.take() {
                    if !command.is_empty() {
                        cheats.push(Cheat {
                            title,
                            command,
                            tags: tags.clone(),
                            source_path: source_path.to_string(),
                        });
                    }
                }
                body.clear();
                open_fence = None;
            } else {
                body.push(line);
            }
            continue;
        }

        if let Some(fence) = Fence::detect(trimmed) {
            open_fence = Some((fence, line_number + 1));
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("## ") {
            title = Some(rest.trim().to_string()).filter(|t| !t.is_empty());
            continue;
        }

        if trimmed.starts_with("# ") {
            title = None;
            tags.clear();
            continue;
        }

        if trimmed.starts_with('#') && trimmed.contains('/') {
            for capture in hashtag_pattern().captures_iter(trimmed) {
                tags.insert(capture[1].to_lowercase());
            }
        }
    }

    if let Some((_, line)) = open_fence {
        return Err(Error::UnterminatedFence {
            path: source_path.to_string(),
            line,
        });
    }

    Ok(cheats)
}

/// A cheat typed in by the operator, before it is written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCheat {
    pub title: String,
    pub command: String,
    /// Space-separated tags as typed, without leading `#`.
    pub tags: String,
}

impl NewCheat {
    /// Whether both title and command hold more than whitespace.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.command.trim().is_empty()
    }

    /// Markdown block appended to the custom cheats file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteCheat`] if the title or command is empty.
    pub fn to_markdown(&self) -> Result<String> {
        if !self.is_complete() {
            return Err(Error::IncompleteCheat);
        }

        let mut entry = format!("\n## {}\n", self.title.trim());
        let tags: Vec<&str> = self.tags.split_whitespace().collect();
        if !tags.is_empty() {
            for tag in tags {
                entry.push('#');
                entry.push_str(tag);
                entry.push(' ');
            }
            entry.push('\n');
        }
        let fence = "`".repeat((longest_backtick_run(&self.command) + 1).max(MIN_FENCE_LENGTH));
        entry.push_str(&fence);
        entry.push('\n');
        entry.push_str(&self.command);
        entry.push('\n');
        entry.push_str(&fence);
        entry.push('\n');

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"# Nmap

#cat/recon #plat/linux

## Quick scan
```
nmap -sV <ip>
```

Some prose that is not a cheat.

## Full scan
~~~
sudo nmap -p- <ip>
  -oA full
~~~

# Web
#cat/web

## Dir bust
```bash
gobuster dir -u http://<ip> -w <wordlist|/usr/share/wordlists/dirb/common.txt>
```
"#;

    #[test]
    fn test_parse_titles_commands_and_tags() {
        let cheats = parse_markdown(FIXTURE, "nmap.md").unwrap();
        assert_eq!(cheats.len(), 3);

        assert_eq!(cheats[0].title, "Quick scan");
        assert_eq!(cheats[0].command, "nmap -sV <ip>");
        assert_eq!(
            cheats[0].tags.iter().collect::<Vec<_>>(),
            vec!["cat/recon", "plat/linux"]
        );
        assert_eq!(cheats[0].source_path, "nmap.md");
    }

    #[test]
    fn test_tags_persist_across_cheats_until_h1() {
        let cheats = parse_markdown(FIXTURE, "nmap.md").unwrap();
        assert_eq!(cheats[1].tags, cheats[0].tags);
        assert_eq!(cheats[2].tags.iter().collect::<Vec<_>>(), vec!["cat/web"]);
    }

    #[test]
    fn test_multiline_body_is_kept_verbatim_and_trimmed() {
        let cheats = parse_markdown(FIXTURE, "nmap.md").unwrap();
        assert_eq!(cheats[1].command, "sudo nmap -p- <ip>\n  -oA full");
        assert_eq!(cheats[1].command_lines().count(), 2);
        assert_eq!(cheats[1].one_line_command(), "sudo nmap -p- <ip>   -oA full");
    }

    #[test]
    fn test_fence_without_title_is_ignored() {
        let text = "```\nls -la\n```\n";
        assert!(parse_markdown(text, "x.md").unwrap().is_empty());
    }

    #[test]
    fn test_title_is_consumed_by_first_fence() {
        let text = "## Only once\n```\nid\n```\n```\nwhoami\n```\n";
        let cheats = parse_markdown(text, "x.md").unwrap();
        assert_eq!(cheats.len(), 1);
        assert_eq!(cheats[0].command, "id");
    }

    #[test]
    fn test_blank_body_emits_nothing() {
        let text = "## Empty\n```\n\n   \n```\n";
        assert!(parse_markdown(text, "x.md").unwrap().is_empty());
    }

    #[test]
    fn test_other_delimiter_inside_fence_is_body() {
        let text = "## Heredoc\n```\ncat <<EOF\n~~~\nEOF\n```\n";
        let cheats = parse_markdown(text, "x.md").unwrap();
        assert_eq!(cheats[0].command, "cat <<EOF\n~~~\nEOF");
    }

    #[test]
    fn test_h1_resets_pending_title() {
        let text = "## Orphan\n# Section\n```\nls\n```\n";
        assert!(parse_markdown(text, "x.md").unwrap().is_empty());
    }

    #[test]
    fn test_hash_line_without_slash_is_not_a_tag_line() {
        let text = "#notatag\n## T\n```\nls\n```\n";
        let cheats = parse_markdown(text, "x.md").unwrap();
        assert!(cheats[0].tags.is_empty());
    }

    #[test]
    fn test_duplicate_tags_are_deduplicated_and_lowercased() {
        let text = "#Cat/Recon #cat/recon #OS/Win\n## T\n```\nls\n```\n";
        let cheats = parse_markdown(text, "x.md").unwrap();
        assert_eq!(
            cheats[0].tags.iter().collect::<Vec<_>>(),
            vec!["cat/recon", "os/win"]
        );
    }

    #[test]
    fn test_unterminated_fence_is_an_error() {
        let text = "## Broken\n```\nnmap <ip>\n";
        let result = parse_markdown(text, "broken.md");
        assert!(matches!(
            result,
            Err(Error::UnterminatedFence { line: 2, .. })
        ));
    }

    #[test]
    fn test_cheat_matches_title_or_command() {
        let cheats = parse_markdown(FIXTURE, "nmap.md").unwrap();
        assert!(cheats[0].matches("quick"));
        assert!(cheats[0].matches("-sv"));
        assert!(!cheats[0].matches("gobuster"));
    }

    #[test]
    fn test_new_cheat_markdown_round_trips_through_parser() {
        let new_cheat = NewCheat {
            title: "Reverse shell".to_string(),
            command: "nc -lvnp <lport>\nbash -i".to_string(),
            tags: "cat/shell  os/linux".to_string(),
        };
        let markdown = new_cheat.to_markdown().unwrap();
        assert_eq!(
            markdown,
            "\n## Reverse shell\n#cat/shell #os/linux \n```\nnc -lvnp <lport>\nbash -i\n```\n"
        );

        let cheats = parse_markdown(&markdown, "custom.md").unwrap();
        assert_eq!(cheats.len(), 1);
        assert_eq!(cheats[0].command, new_cheat.command);
        assert!(cheats[0].tags.contains("os/linux"));
    }

    #[test]
    fn test_longer_fence_keeps_shorter_fences_as_body() {
        let text = "## Readme\n````\ncat > README.md <<EOF\n```\nmake\n```\nEOF\n````\n";
        let cheats = parse_markdown(text, "x.md").unwrap();
        assert_eq!(cheats.len(), 1);
        assert_eq!(cheats[0].command, "cat > README.md <<EOF\n```\nmake\n```\nEOF");
    }

    #[test]
    fn test_fence_with_info_string_does_not_close() {
        let text = "## Nested\n```\necho start\n```bash\n```\n";
        let cheats = parse_markdown(text, "x.md").unwrap();
        assert_eq!(cheats[0].command, "echo start\n```bash");
    }

    #[test]
    fn test_new_cheat_with_fence_lines_round_trips() {
        let odd = NewCheat {
            title: "Fence".to_string(),
            command: "printf '%s\\n' \\\n```".to_string(),
            tags: String::new(),
        };
        let even = NewCheat {
            title: "Readme".to_string(),
            command: "cat > R.md <<EOF\n```\nmake\n````\nEOF".to_string(),
            tags: "cat/docs".to_string(),
        };
        let listing = NewCheat {
            title: "List".to_string(),
            command: "ls -la".to_string(),
            tags: String::new(),
        };

        let markdown = [&listing, &odd, &even]
            .iter()
            .map(|cheat| cheat.to_markdown().unwrap())
            .collect::<String>();
        assert!(even.to_markdown().unwrap().contains("\n`````\n"));

        let cheats = parse_markdown(&markdown, "custom.md").unwrap();
        assert_eq!(cheats.len(), 3);
        assert_eq!(cheats[0].command, listing.command);
        assert_eq!(cheats[1].command, odd.command);
        assert_eq!(cheats[2].command, even.command);
    }

    #[test]
    fn test_whitespace_title_is_incomplete() {
        let new_cheat = NewCheat {
            title: "   ".to_string(),
            command: "id".to_string(),
            tags: String::new(),
        };
        assert!(!new_cheat.is_complete());
        assert!(matches!(new_cheat.to_markdown(), Err(Error::IncompleteCheat)));
    }

    #[test]
    fn test_new_cheat_without_tags_has_no_tag_line() {
        let new_cheat = NewCheat {
            title: "List".to_string(),
            command: "ls".to_string(),
            tags: String::new(),
        };
        assert_eq!(new_cheat.to_markdown().unwrap(), "\n## List\n```\nls\n```\n");
    }

    #[test]
    fn test_new_cheat_requires_title_and_command() {
        let new_cheat = NewCheat {
            title: "  ".to_string(),
            command: "ls".to_string(),
            tags: String::new(),
        };
        assert!(matches!(new_cheat.to_markdown(), Err(Error::IncompleteCheat)));
    }
}
