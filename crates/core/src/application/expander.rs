// Variable Expander
// Rewrites `$NAME` / `${NAME}` references in every environment value

use crate::port::{EnvError, EnvStore};
use std::collections::HashMap;
use tracing::debug;

/// Expand every variable in the environment store against one snapshot
///
/// All lookups read the snapshot taken before any rewrite, so the order in which
/// variables are rewritten does not matter. Covers the entire table, including
/// variables the resolver never touched.
///
/// # Returns
/// Number of variables whose value changed
pub fn expand_environment(env: &dyn EnvStore) -> Result<usize, EnvError> {
    let snapshot: HashMap<String, String> = env.snapshot().into_iter().collect();
    let mut rewritten = 0;

    for (name, value) in &snapshot {
        let expanded = expand(value, |key| lookup(&snapshot, key));
        if expanded != *value {
            env.set(name, &expanded)?;
            debug!(name = %name, "Expanded environment variable");
            rewritten += 1;
        }
    }

    Ok(rewritten)
}

fn lookup(snapshot: &HashMap<String, String>, key: &str) -> String {
    // `$$` stands for a literal dollar sign
    if key == "$" {
        return "$".to_string();
    }
    snapshot.get(key).cloned().unwrap_or_default()
}

/// Replace `$NAME` and `${NAME}` in `value` using `mapping`
///
/// Rules:
/// - a name is a run of ASCII letters, digits and `_`
/// - a single special character (`*#$@!?-` or a digit) is a one-character name
/// - `$` at the end, or before a character that cannot start a name, is kept
/// - `${}` and an unterminated `${` are bad syntax and are dropped
pub fn expand(value: &str, mapping: impl Fn(&str) -> String) -> String {
    if !value.contains('$') {
        return value.to_string();
    }

    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len() * 2);
    let mut start = 0;
    let mut j = 0;

    while j < bytes.len() {
        if bytes[j] == b'$' && j + 1 < bytes.len() {
            out.push_str(&value[start..j]);
            let (name, width) = shell_name(&value[j + 1..]);

            match name {
                Some(name) => out.push_str(&mapping(name)),
                // Bad syntax: the consumed characters are dropped
                None if width > 0 => {}
                None => out.push('$'),
            }

            j += width;
            start = j + 1;
        }
        j += 1;
    }

    out.push_str(&value[start..]);
    out
}

fn is_special(b: u8) -> bool {
    matches!(b, b'*' | b'#' | b'$' | b'@' | b'!' | b'?' | b'-') || b.is_ascii_digit()
}

fn is_name_char(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// Name following a `$` and the number of bytes it occupies
///
/// `(None, 0)` means no name at all; `(None, n)` means bad syntax spanning `n` bytes.
fn shell_name(s: &str) -> (Option<&str>, usize) {
    let bytes = s.as_bytes();

    if bytes[0] == b'{' {
        if bytes.len() > 2 && is_special(bytes[1]) && bytes[2] == b'}' {
            return (Some(&s[1..2]), 3);
        }
        return match s[1..].find('}') {
            Some(0) => (None, 2),
            Some(end) => (Some(&s[1..end + 1]), end + 2),
            None => (None, 1),
        };
    }

    if is_special(bytes[0]) {
        return (Some(&s[0..1]), 1);
    }

    let width = bytes.iter().take_while(|b| is_name_char(**b)).count();
    if width == 0 {
        (None, 0)
    } else {
        (Some(&s[..width]), width)
    }
}
