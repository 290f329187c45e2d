/// Parses a newline-delimited seed list: lines are trimmed and blank lines
/// dropped. Duplicates are kept; the frontier discards them.
pub fn parse_seed_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
