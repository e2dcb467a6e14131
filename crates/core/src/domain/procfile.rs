// Procfile Parsing
// `<name>: <command and args>` lines mapping short process names to command lines

use regex::Regex;
use std::sync::LazyLock;

use super::process::ProcessSpec;

/// Default Procfile location, relative to the working directory
pub const DEFAULT_PROCFILE: &str = "Procfile";

static PROCFILE_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_\-]+):\s*(.+)$").expect("Invalid procfile line regex")
});

/// A single named entry of a Procfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcfileEntry {
    pub name: String,
    pub command: String,
}

impl ProcfileEntry {
    /// Split the command line on whitespace into executable + args
    ///
    /// Returns None when the command is blank.
    pub fn to_spec(&self) -> Option<ProcessSpec> {
        let mut parts = self.command.split_whitespace().map(str::to_string);
        let executable = parts.next()?;
        Some(ProcessSpec::new(executable, parts.collect()))
    }
}

/// Parse Procfile content, skipping lines that are not valid entries
pub fn parse(content: &str) -> Vec<ProcfileEntry> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter_map(|line| {
            let captures = PROCFILE_LINE_REGEX.captures(line)?;
            let entry = ProcfileEntry {
                name: captures[1].to_string(),
                command: captures[2].to_string(),
            };
            // Blank commands cannot be executed
            entry.to_spec().map(|_| entry)
        })
        .collect()
}

/// First entry with the given name
pub fn find<'a>(entries: &'a [ProcfileEntry], name: &str) -> Option<&'a ProcfileEntry> {
    entries.iter().find(|entry| entry.name == name)
}
