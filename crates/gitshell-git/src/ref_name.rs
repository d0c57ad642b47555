//! Validated branch and remote names.
//!
//! Every name the facade interpolates into a shell command line goes through
//! [`RefName`], which enforces git's ref-name rules and rejects shell
//! metacharacters so a name can never change the meaning of the command.

use std::fmt;

use crate::error::Error;

/// What a [`RefName`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// A local or remote-tracking branch.
    Branch,
    /// A configured remote.
    Remote,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch => f.write_str("branch"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// A trimmed, validated branch or remote name.
///
/// # Examples
///
/// ```
/// use gitshell_git::RefName;
///
/// // `git branch` output markers and padding are stripped
/// let name = RefName::branch("* feature/auth\n").unwrap();
/// assert_eq!(name, "feature/auth");
///
/// assert!(RefName::branch("main; rm -rf /").is_err());
/// assert!(RefName::remote("../origin").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefName(String);

impl RefName {
    /// Parse a branch name, stripping the `*` current-branch marker.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRefName`] when the name violates git's rules
    /// or contains shell metacharacters.
    pub fn branch(raw: &str) -> Result<Self, Error> {
        Self::parse(RefKind::Branch, trim_marker(raw))
    }

    /// Parse a remote name.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRefName`] when the name is unusable.
    pub fn remote(raw: &str) -> Result<Self, Error> {
        Self::parse(RefKind::Remote, trim_marker(raw))
    }

    fn parse(kind: RefKind, name: &str) -> Result<Self, Error> {
        check(name).map_err(|reason| Error::InvalidRefName {
            kind,
            name: name.to_string(),
            reason,
        })?;
        Ok(Self(name.to_string()))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<remote>/<branch>`, as listed by `git branch -r`.
    #[must_use]
    pub fn qualified(&self, remote: &Self) -> String {
        format!("{remote}/{self}")
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for RefName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for RefName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for RefName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RefName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for RefName {
    fn eq(&self, other: &String) -> bool {
        self.0 == *other
    }
}

/// Strip surrounding whitespace and `*` markers, as in `git branch` output.
#[must_use]
pub fn trim_marker(raw: &str) -> &str {
    raw.trim().trim_matches('*').trim()
}

/// Characters git itself forbids in ref names.
const GIT_FORBIDDEN: &[char] = &[' ', '~', '^', ':', '?', '*', '['];

/// Characters rejected so a name is inert inside `sh -c`.
const SHELL_META: &[char] = &[
    '$', ';', '|', '&', '>', '<', '`', '\\', '"', '\'', '(', ')', '{', '}', '!', '#',
];

/// Sequences that may not appear anywhere in the name.
const FORBIDDEN_SEQUENCES: &[(&str, &str)] = &[
    ("..", "cannot contain '..'"),
    ("//", "cannot contain '//'"),
    ("@{", "cannot contain '@{'"),
    ("/.", "component cannot start with '.'"),
];

fn check(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("cannot be empty".into());
    }
    if name == "@" {
        return Err("cannot be '@'".into());
    }
    if name.starts_with(['.', '/', '-']) {
        return Err(format!("cannot start with '{}'", &name[..1]));
    }
    if name.ends_with(['.', '/']) {
        return Err(format!("cannot end with '{}'", &name[name.len() - 1..]));
    }
    #[allow(clippy::case_sensitive_file_extension_comparisons)]
    if name.ends_with(".lock") {
        return Err("cannot end with '.lock'".into());
    }

    if let Some(c) = name.chars().find(char::is_ascii_control) {
        return Err(format!("cannot contain control character {c:?}"));
    }
    if let Some(c) = name.chars().find(|c| GIT_FORBIDDEN.contains(c)) {
        return Err(format!("cannot contain '{c}'"));
    }
    if let Some(c) = name.chars().find(|c| SHELL_META.contains(c)) {
        return Err(format!("cannot contain shell metacharacter '{c}'"));
    }
    if let Some((_, reason)) = FORBIDDEN_SEQUENCES
        .iter()
        .find(|(sequence, _)| name.contains(sequence))
    {
        return Err((*reason).to_string());
    }

    Ok(())
}
