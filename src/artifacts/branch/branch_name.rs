//! Branch name validation
//!
//! Branch names become file names under `refs/heads/`, so they are
//! validated before any ref file is created. The rules follow the usual
//! refname restrictions: no leading dot or slash, no `..`, no `/.`, no
//! control characters or glob metacharacters, no trailing `/` or `.lock`.

use std::fmt;

/// Characters that may not appear anywhere in a branch name
const FORBIDDEN_CHARS: [char; 8] = ['*', ':', '?', '[', '\\', '^', '~', ' '];

/// A validated branch name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    /// Validate and wrap a branch name
    ///
    /// # Returns
    ///
    /// The validated name, or an error describing the violated rule
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!("branch name cannot be empty");
        }
        if name.starts_with('.') || name.starts_with('/') {
            anyhow::bail!("branch name {} cannot start with '.' or '/'", name);
        }
        if name.ends_with('/') {
            anyhow::bail!("branch name {} cannot end with '/'", name);
        }
        if name.ends_with(".lock") {
            anyhow::bail!("branch name {} cannot end with '.lock'", name);
        }
        if name.contains("..") || name.contains("/.") {
            anyhow::bail!("branch name {} cannot contain '..' or '/.'", name);
        }
        if name.contains("@{") {
            anyhow::bail!("branch name {} cannot contain '@{{'", name);
        }
        if name.chars().any(|c| c.is_control()) {
            anyhow::bail!("branch name {} cannot contain control characters", name);
        }
        if name.chars().any(|c| FORBIDDEN_CHARS.contains(&c)) {
            anyhow::bail!("branch name {} contains forbidden characters", name);
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    proptest! {
        #[test]
        fn accepts_plain_names(name in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(name).is_ok());
        }

        #[test]
        fn accepts_hierarchical_names(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let name = format!("{}/{}", prefix, suffix);
            assert!(BranchName::try_parse(name).is_ok());
        }

        #[test]
        fn rejects_leading_dot(suffix in "[a-zA-Z0-9_-]+") {
            let name = format!(".{}", suffix);
            assert!(BranchName::try_parse(name).is_err());
        }

        #[test]
        fn rejects_lock_suffix(prefix in "[a-zA-Z0-9_-]+") {
            let name = format!("{}.lock", prefix);
            assert!(BranchName::try_parse(name).is_err());
        }

        #[test]
        fn rejects_consecutive_dots(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let name = format!("{}..{}", prefix, suffix);
            assert!(BranchName::try_parse(name).is_err());
        }

        #[test]
        fn rejects_slash_dot(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let name = format!("{}/.{}", prefix, suffix);
            assert!(BranchName::try_parse(name).is_err());
        }

        #[test]
        fn rejects_forbidden_characters(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            special in r"[\*:\?\[\\^~ ]"
        ) {
            let name = format!("{}{}{}", prefix, special, suffix);
            assert!(BranchName::try_parse(name).is_err());
        }
    }

    #[test]
    fn rejects_empty_name() {
        assert!(BranchName::try_parse("".to_string()).is_err());
    }

    #[test]
    fn rejects_leading_and_trailing_slash() {
        assert!(BranchName::try_parse("/feature".to_string()).is_err());
        assert!(BranchName::try_parse("feature/".to_string()).is_err());
    }

    #[test]
    fn rejects_at_brace() {
        assert!(BranchName::try_parse("a@{b}".to_string()).is_err());
    }

    #[test]
    fn accepts_typical_names() {
        assert!(BranchName::try_parse("main".to_string()).is_ok());
        assert!(BranchName::try_parse("feature/new-parser".to_string()).is_ok());
        assert!(BranchName::try_parse("bugfix_123".to_string()).is_ok());
    }
}
