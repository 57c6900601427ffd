use std::collections::HashSet;

use anyhow::Context;
use regex::RegexSet;

/// Pre-compiled entry-name filters from a pipe-separated pattern string.
/// Plain names go into an exact-match set; names with `*`/`?` wildcards
/// compile into a single regex set.
pub struct CompiledPatterns {
    exact: HashSet<String>,
    globs: Option<RegexSet>,
}

impl CompiledPatterns {
    pub fn new(pattern: &str) -> anyhow::Result<Self> {
        let mut exact = HashSet::new();
        let mut glob_regexes = Vec::new();

        for segment in pattern.split('|') {
            let name = segment.trim();
            if name.is_empty() {
                continue;
            }
            if name.contains('*') || name.contains('?') {
                glob_regexes.push(glob_to_regex(name));
            } else {
                exact.insert(name.to_owned());
            }
        }

        let globs = if glob_regexes.is_empty() {
            None
        } else {
            Some(
                RegexSet::new(&glob_regexes)
                    .with_context(|| format!("invalid ignore pattern: {pattern}"))?,
            )
        };

        Ok(Self { exact, globs })
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.exact.contains(name) {
            return true;
        }
        if let Some(globs) = &self.globs {
            return globs.is_match(name);
        }
        false
    }
}

/// Compile an optional pattern string, `None` passing everything through.
pub fn compile(pattern: Option<&str>) -> anyhow::Result<Option<CompiledPatterns>> {
    pattern.map(CompiledPatterns::new).transpose()
}

/// `*` matches any sequence, `?` a single character; everything else is
/// taken literally.
fn glob_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() * 2 + 2);
    regex.push('^');
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '\\' | '|' => {
                regex.push('\\');
                regex.push(c);
            }
            _ => regex.push(c),
        }
    }
    regex.push('$');
    regex
}
