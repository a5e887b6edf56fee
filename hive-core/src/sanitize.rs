fn is_path_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Turn a branch name into a single path segment.
///
/// `/` becomes `--` so `a/b` and `a-b` stay distinct, every other character
/// outside `[A-Za-z0-9_.-]` becomes `-`, and leading/trailing `-` are trimmed.
/// Applying it twice changes nothing.
pub fn sanitize_branch(branch: &str) -> String {
    let mut out = String::with_capacity(branch.len() + 8);
    for c in branch.chars() {
        match c {
            '/' => out.push_str("--"),
            c if is_path_safe(c) => out.push(c),
            _ => out.push('-'),
        }
    }
    out.trim_matches('-').to_string()
}
