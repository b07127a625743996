//! Placeholder parameters inside cheat commands.
//!
//! A placeholder is written `<name>` or `<name|text>`. The name runs from the
//! `<` to the first `|` or `>`. The `|text` part is recognised but never used
//! as a fallback value: an unresolved placeholder is left exactly as written.

use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use regex::{Captures, Regex};

use crate::cheat::Cheat;

/// Candidates at or above this length are not treated as parameters.
const MAX_CANDIDATE_LENGTH: usize = 30;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<([^>|]+)").expect("name pattern is valid"))
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<([^>]+)>").expect("placeholder pattern is valid"))
}

/// A source of parameter values.
pub trait ParameterLookup {
    fn value_of(&self, name: &str) -> Option<&str>;
}

impl<S: std::hash::BuildHasher> ParameterLookup for IndexMap<String, String, S> {
    fn value_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<S: std::hash::BuildHasher> ParameterLookup for std::collections::HashMap<String, String, S> {
    fn value_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Two-level lookup: `overrides` first, then `fallback`.
pub struct Layered<'a, O: ?Sized, F: ?Sized> {
    pub overrides: &'a O,
    pub fallback: &'a F,
}

impl<O, F> ParameterLookup for Layered<'_, O, F>
where
    O: ParameterLookup + ?Sized,
    F: ParameterLookup + ?Sized,
{
    fn value_of(&self, name: &str) -> Option<&str> {
        self.overrides
            .value_of(name)
            .or_else(|| self.fallback.value_of(name))
    }
}

/// Parameter names in first-occurrence order, without duplicates.
///
/// # Examples
///
/// ```
/// use arsenal_core::parameters::parameter_names;
///
/// let names = parameter_names("<ip> <port> <ip>");
/// assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["ip", "port"]);
/// ```
pub fn parameter_names(command: &str) -> IndexSet<String> {
    name_pattern()
        .captures_iter(command)
        .map(|capture| capture[1].to_string())
        .collect()
}

/// Substitutes every placeholder whose name `values` knows.
///
/// Unknown placeholders, including any `|text` suffix, are kept verbatim.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use arsenal_core::parameters::fill;
///
/// let values = HashMap::from([("ip".to_string(), "10.0.0.5".to_string())]);
/// assert_eq!(fill("scan <ip>", &values), "scan 10.0.0.5");
/// assert_eq!(fill("scan <user|admin>", &values), "scan <user|admin>");
/// ```
pub fn fill<L: ParameterLookup + ?Sized>(command: &str, values: &L) -> String {
    placeholder_pattern()
        .replace_all(command, |capture: &Captures| {
            let inner = &capture[1];
            let name = inner.split('|').next().unwrap_or(inner);
            values
                .value_of(name)
                .map_or_else(|| capture[0].to_string(), ToString::to_string)
        })
        .into_owned()
}

/// Parameter names worth registering as globals, across all `cheats`.
///
/// Anything containing `/`, at least [`MAX_CANDIDATE_LENGTH`] long, or with
/// characters other than alphanumerics and `_` is rejected. Sorted, unique.
pub fn parameter_candidates<'a>(cheats: impl IntoIterator<Item = &'a Cheat>) -> Vec<String> {
    let mut candidates: Vec<String> = cheats
        .into_iter()
        .flat_map(|cheat| name_pattern().captures_iter(&cheat.command))
        .map(|capture| capture[1].to_string())
        .filter(|candidate| is_parameter_candidate(candidate))
        .collect();

    candidates.sort();
    candidates.dedup();
    candidates
}

fn is_parameter_candidate(candidate: &str) -> bool {
    let stripped: String = candidate.chars().filter(|&c| c != '_').collect();

    !candidate.contains('/')
        && candidate.chars().count() < MAX_CANDIDATE_LENGTH
        && !stripped.is_empty()
        && stripped.chars().all(char::is_alphanumeric)
}

/// Per-invocation parameter values layered over the globals.
///
/// Seeded from the globals for every name the command uses; edits only touch
/// the overrides, never the globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    command: String,
    overrides: IndexMap<String, String>,
}

impl Resolution {
    pub fn new<L: ParameterLookup + ?Sized>(command: &str, globals: &L) -> Self {
        let overrides = parameter_names(command)
            .into_iter()
            .map(|name| {
                let value = globals.value_of(&name).unwrap_or_default().to_string();
                (name, value)
            })
            .collect();

        Self {
            command: command.to_string(),
            overrides,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Parameter names with their current override values, in order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.overrides.get_index(index).map(|(name, _)| name.as_str())
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.overrides
            .get_index(index)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_at(&mut self, index: usize, value: String) {
        if let Some((_, slot)) = self.overrides.get_index_mut(index) {
            *slot = value;
        }
    }

    /// The command filled with overrides first, then `globals`.
    pub fn resolve<L: ParameterLookup + ?Sized>(&self, globals: &L) -> String {
        fill(
            &self.command,
            &Layered {
                overrides: &self.overrides,
                fallback: globals,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn cheat(command: &str) -> Cheat {
        Cheat {
            title: "t".to_string(),
            command: command.to_string(),
            tags: Default::default(),
            source_path: "t.md".to_string(),
        }
    }

    #[test]
    fn test_parameter_names_ordered_and_unique() {
        let names = parameter_names("<ip> <port> <ip>");
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["ip", "port"]);
    }

    #[test]
    fn test_parameter_names_stop_at_pipe() {
        let names = parameter_names("hydra -l <user|admin> -P <wordlist> <ip>");
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["user", "wordlist", "ip"]
        );
    }

    #[test]
    fn test_fill_substitutes_known_values() {
        assert_eq!(
            fill("scan <ip>", &values(&[("ip", "10.0.0.5")])),
            "scan 10.0.0.5"
        );
    }

    #[test]
    fn test_fill_does_not_apply_pipe_text() {
        assert_eq!(fill("scan <user|admin>", &values(&[])), "scan <user|admin>");
        assert_eq!(
            fill("scan <user|admin>", &values(&[("user", "root")])),
            "scan root"
        );
    }

    #[test]
    fn test_fill_keeps_unknown_placeholders() {
        assert_eq!(
            fill("<a> <b> <a>", &values(&[("a", "1")])),
            "1 <b> 1"
        );
    }

    #[test]
    fn test_fill_with_empty_value_removes_placeholder() {
        assert_eq!(fill("x<a>y", &values(&[("a", "")])), "xy");
    }

    #[test]
    fn test_layered_prefers_overrides() {
        let overrides = values(&[("ip", "1.1.1.1")]);
        let globals = values(&[("ip", "2.2.2.2"), ("port", "80")]);
        let layered = Layered {
            overrides: &overrides,
            fallback: &globals,
        };
        assert_eq!(fill("<ip>:<port> <x>", &layered), "1.1.1.1:80 <x>");
    }

    #[test]
    fn test_parameter_candidates_filtering() {
        let cheats = vec![
            cheat("curl http://<ip>:<port>/<path/to/file>"),
            cheat("cat <<EOF"),
            cheat("echo <lhost_ip> <a-b> <this_name_is_far_too_long_for_a_param>"),
            cheat("nmap <ip>"),
        ];
        assert_eq!(
            parameter_candidates(&cheats),
            vec!["ip", "lhost_ip", "port"]
        );
    }

    #[test]
    fn test_fill_multiline_command_substitutes_every_line() {
        let command = "ssh <user>@<ip>\nsudo -l\nscp loot.tar <user>@<ip>:/tmp/<dir>";
        assert_eq!(
            fill(command, &values(&[("user", "root"), ("ip", "10.0.0.5")])),
            "ssh root@10.0.0.5\nsudo -l\nscp loot.tar root@10.0.0.5:/tmp/<dir>"
        );
    }

    #[test]
    fn test_parameter_candidates_length_limit() {
        let at_limit = "a".repeat(MAX_CANDIDATE_LENGTH - 1);
        let over_limit = "b".repeat(MAX_CANDIDATE_LENGTH);
        let cheats = vec![cheat(&format!("echo <{at_limit}> <{over_limit}>"))];

        assert_eq!(at_limit.len(), 29);
        assert_eq!(parameter_candidates(&cheats), vec![at_limit]);
    }

    #[test]
    fn test_resolution_seeds_from_globals() {
        let globals = values(&[("ip", "10.0.0.1")]);
        let resolution = Resolution::new("nc <ip> <port>", &globals);
        assert_eq!(
            resolution.entries().collect::<Vec<_>>(),
            vec![("ip", "10.0.0.1"), ("port", "")]
        );
        assert_eq!(resolution.resolve(&globals), "nc 10.0.0.1 ");
    }

    #[test]
    fn test_resolution_edits_override_globals() {
        let globals = values(&[("ip", "10.0.0.1")]);
        let mut resolution = Resolution::new("nc <ip> <port>", &globals);
        resolution.set_at(1, "4444".to_string());
        resolution.set_at(0, "10.0.0.9".to_string());
        resolution.set_at(7, "ignored".to_string());

        assert_eq!(resolution.name_at(1), Some("port"));
        assert_eq!(resolution.value_at(1), Some("4444"));
        assert_eq!(resolution.resolve(&globals), "nc 10.0.0.9 4444");
        assert_eq!(globals["ip"], "10.0.0.1");
    }

    #[test]
    fn test_resolution_without_parameters() {
        let resolution = Resolution::new("id", &values(&[]));
        assert!(resolution.is_empty());
        assert_eq!(resolution.resolve(&values(&[])), "id");
    }
}
