// Parameter Domain Model
// Remote parameters and the environment variables derived from them

/// A key/value entry listed from the remote parameter store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Full hierarchical key, e.g. `/app/prod/db/HOST`
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// How a parameter key is turned into a variable name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingMode {
    /// Last path segment only
    #[default]
    Short,
    /// Directories below the prefix, upper-cased and joined with `_`, then the last segment
    Long,
}

/// Environment variable produced from a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

impl EnvironmentVariable {
    /// Derive the variable for `param` listed under `prefix`
    pub fn from_parameter(param: &Parameter, prefix: &str, mode: NamingMode) -> Self {
        Self {
            name: variable_name(&param.name, prefix, mode),
            value: param.value.clone(),
        }
    }
}

/// Compute the variable name for a parameter key
///
/// # Example
/// ```
/// use ssm_env_core::domain::parameter::variable_name;
/// use ssm_env_core::domain::NamingMode;
///
/// assert_eq!(variable_name("/app/prod/db/HOST", "/app/prod", NamingMode::Short), "HOST");
/// assert_eq!(variable_name("/app/prod/db/HOST", "/app/prod", NamingMode::Long), "DB_HOST");
/// ```
pub fn variable_name(key: &str, prefix: &str, mode: NamingMode) -> String {
    let short = base(key);

    match mode {
        NamingMode::Short => short,
        NamingMode::Long => {
            let root = format!("{}/", prefix.strip_suffix('/').unwrap_or(prefix));
            let relative = key.replacen(&root, "", 1);
            let directory = dir(&relative);

            if directory == "." {
                short
            } else {
                format!("{}_{}", directory.to_uppercase().replace('/', "_"), short)
            }
        }
    }
}

/// Last element of a slash-separated path (trailing slashes ignored)
fn base(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }

    match trimmed.rfind('/') {
        Some(idx) => trimmed[idx + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

/// Everything but the last element of a slash-separated path, cleaned
fn dir(path: &str) -> String {
    let head = match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "",
    };
    clean(head)
}

/// Lexical path cleanup: collapses `//`, drops `.`, resolves `..`
fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
