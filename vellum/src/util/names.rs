use once_cell::sync::OnceCell;

/// Splits the stringified argument list of a field macro into display names.
///
/// One name is produced per top level argument that is a plain identifier.
/// Arguments containing brackets or quotes are skipped entirely, which lets
/// literals and constructor expressions sit in the list without producing a
/// bogus label. Underscores in identifiers become spaces.
pub fn extract_names(source: &str) -> Vec<String> {
    let mut names = Vec::with_capacity(source.matches(',').count() + 1);

    // {} <> [] ()
    let mut scopes = [0isize; 4];
    // "" ''
    let mut in_quotes = [false; 2];

    let mut start = None;
    let mut end = 0;
    let mut has_digits = false;
    let mut has_letters = false;
    let mut valid = true;

    let flush = |names: &mut Vec<String>, start: Option<usize>, end: usize| {
        if let Some(start) = start {
            names.push(source[start..end].replace('_', " "));
        }
    };

    for (i, c) in source.char_indices() {
        match c {
            ' ' | '\t' | '\r' | '\n' => {}
            '{' | '<' | '[' | '(' => {
                scopes[bracket_kind(c)] += 1;
                valid = false;
            }
            '}' | '>' | ']' | ')' => {
                scopes[bracket_kind(c)] -= 1;
                valid = false;
            }
            '"' => {
                in_quotes[0] = !in_quotes[0];
                valid = false;
            }
            '\'' => {
                valid = false;
                // A quote after leading digits is a digit separator, as in 1'000.
                if !has_digits {
                    in_quotes[1] = !in_quotes[1];
                }
            }
            ',' if scopes.iter().all(|&s| s == 0) && !in_quotes[0] && !in_quotes[1] => {
                if valid {
                    flush(&mut names, start, end);
                }
                start = None;
                has_digits = false;
                has_letters = false;
                valid = true;
            }
            ',' => {}
            _ if !valid => {}
            '0'..='9' => {
                if has_letters {
                    end = i + 1;
                } else {
                    has_digits = true;
                }
            }
            'a'..='z' | 'A'..='Z' | '_' if has_digits && !has_letters => {
                // Letters after leading digits belong to a numeric literal.
                valid = false;
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                has_letters = true;
                if start.is_none() {
                    start = Some(i);
                }
                end = i + 1;
            }
            _ => {}
        }
    }

    if valid {
        flush(&mut names, start, end);
    }

    names
}

fn bracket_kind(c: char) -> usize {
    match c {
        '{' | '}' => 0,
        '<' | '>' => 1,
        '[' | ']' => 2,
        _ => 3,
    }
}

/// Lazily extracted field names, meant to live in a `static` next to the
/// field list they were stringified from.
pub struct FieldNames {
    source: &'static str,
    names: OnceCell<Vec<String>>,
}

impl FieldNames {
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            names: OnceCell::new(),
        }
    }

    pub fn names(&self) -> &[String] {
        self.names.get_or_init(|| extract_names(self.source))
    }

    /// Name of the field at `index`, or an empty name when the source had fewer
    /// usable arguments.
    pub fn get(&self, index: usize) -> &str {
        self.names().get(index).map_or("", String::as_str)
    }
}
