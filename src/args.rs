//! Quote-aware inspection of free-form CI argument strings.
//!
//! CI job configurations hand the analyzer its arguments as one raw string
//! (e.g. `--workspace . -f "my results.json" --view detail`). Before and
//! after invoking the external tool we need to answer two questions about
//! that string: *does this flag appear?* and *what values were bound to
//! it?* — without breaking quoted paths that contain spaces.
//!
//! [`RunArguments`] parses the string once at construction into an ordered
//! list of `(flag, value)` entries and answers both queries from that list.
//! It never fails: unbalanced quotes, dangling flags, and empty input all
//! produce a best-effort parse rather than an error, because the string is
//! user-controlled and a crash here would mask the real analyzer run.

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder for spaces inside quoted spans. A control character cannot
/// appear in a CI argument string, so restoring it is unambiguous.
const SPACE_MARKER: char = '\u{1}';

static RE_SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(" +").unwrap());

/// A parsed view of a raw analyzer argument string.
///
/// Construction tokenizes the string exactly once; the queries below only
/// walk the parsed entries.
///
/// # Examples
///
/// ```
/// use analyzer_gate::args::RunArguments;
///
/// let args = RunArguments::new("--output-file=out.json --view detail");
/// assert!(args.contains_flag("--view", Some("-v")));
/// assert_eq!(args.values_for("--output-file", Some("-f")), vec!["out.json"]);
/// ```
pub struct RunArguments {
    /// Flag entries in order of appearance. Flags are stored lower-cased;
    /// values are verbatim.
    entries: Vec<(String, Option<String>)>,
}

impl RunArguments {
    /// Parses a raw argument string.
    ///
    /// Tokenization:
    /// 1. Spaces inside quoted spans (`'…'` or `"…"`) are replaced with a
    ///    sentinel and the quote characters are dropped.
    /// 2. Runs of spaces collapse to one, then the string splits on spaces.
    /// 3. The sentinel is restored to a literal space inside each token.
    /// 4. Tokens are walked left to right: `flag=value` splits on the first
    ///    `=` only; a bare flag consumes the next token as its value unless
    ///    that token starts with `-` or is blank.
    pub fn new(raw: &str) -> Self {
        let marked = mark_spaces_between_quotes(raw);
        let collapsed = RE_SPACE_RUNS.replace_all(&marked, " ");
        let tokens: Vec<String> = collapsed
            .split(' ')
            .map(|t| t.replace(SPACE_MARKER, " "))
            .collect();

        let mut entries: Vec<(String, Option<String>)> = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if let Some(eq) = token.find('=') {
                // Only the first '=' delimits; the value keeps any further
                // '=' characters verbatim (file names may contain them).
                entries.push((token[..eq].to_lowercase(), Some(token[eq + 1..].to_string())));
                i += 1;
            } else if token.trim().is_empty() {
                // Dangling separator at the edges of the string. The entry
                // is kept so positions stay faithful, but it has no value.
                entries.push((token.to_lowercase(), None));
                i += 1;
            } else if i + 1 < tokens.len()
                && !tokens[i + 1].starts_with('-')
                && !tokens[i + 1].trim().is_empty()
            {
                entries.push((token.to_lowercase(), Some(tokens[i + 1].clone())));
                i += 2;
            } else {
                entries.push((token.to_lowercase(), None));
                i += 1;
            }
        }

        RunArguments { entries }
    }

    /// Returns `true` if `flag` (or its short `alias`) appears anywhere as a
    /// standalone token. Matching is case-insensitive.
    pub fn contains_flag(&self, flag: &str, alias: Option<&str>) -> bool {
        let flag = flag.to_lowercase();
        let alias = alias.map(str::to_lowercase);
        self.entries
            .iter()
            .any(|(f, _)| *f == flag || alias.as_deref() == Some(f.as_str()))
    }

    /// Returns every value bound to `flag` (or its `alias`), in order of
    /// appearance. Occurrences with no value are skipped; an explicit
    /// `flag=` yields an empty string, which **is** included.
    pub fn values_for(&self, flag: &str, alias: Option<&str>) -> Vec<String> {
        let flag = flag.to_lowercase();
        let alias = alias.map(str::to_lowercase);
        self.entries
            .iter()
            .filter(|(f, _)| *f == flag || alias.as_deref() == Some(f.as_str()))
            .filter_map(|(_, v)| v.clone())
            .collect()
    }
}

/// Splits a command line into argv tokens using the same quote machinery as
/// [`RunArguments`], dropping blank tokens.
///
/// Used to turn a configured command string plus the raw argument string
/// into the argument vector for [`std::process::Command`].
pub fn split_command_line(raw: &str) -> Vec<String> {
    let marked = mark_spaces_between_quotes(raw);
    marked
        .split_whitespace()
        .map(|t| t.replace(SPACE_MARKER, " "))
        .collect()
}

/// Replaces spaces inside quoted spans with [`SPACE_MARKER`] and strips the
/// quote characters themselves.
///
/// A `'` or `"` outside a quoted span opens one; only the same character
/// closes it, so the other quote kind survives inside (e.g.
/// `"some'file.json"` keeps its apostrophe). An unbalanced quote simply
/// leaves the rest of the string marked — never an error.
fn mark_spaces_between_quotes(value: &str) -> String {
    let mut inside_quotes = false;
    let mut current_quote = '"';
    let mut output = String::with_capacity(value.len());
    for c in value.chars() {
        if !inside_quotes && (c == '"' || c == '\'') {
            inside_quotes = true;
            current_quote = c;
        } else if inside_quotes && c == current_quote {
            inside_quotes = false;
        } else if inside_quotes && c == ' ' {
            output.push(SPACE_MARKER);
        } else {
            output.push(c);
        }
    }
    output
}
