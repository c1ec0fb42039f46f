use std::fmt::{self, Display};
use std::str::FromStr;

/// How the words of a multi-word meta identifier are joined in the token
/// text. Identifiers normalize both forms, so the choice never affects
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSeparator {
    Space,
    Hyphen,
}

impl WordSeparator {
    pub fn as_char(self) -> char {
        match self {
            WordSeparator::Space => ' ',
            WordSeparator::Hyphen => '-',
        }
    }
}

impl Default for WordSeparator {
    fn default() -> Self {
        WordSeparator::Space
    }
}

impl Display for WordSeparator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WordSeparator::Space => write!(f, "space"),
            WordSeparator::Hyphen => write!(f, "hyphen"),
        }
    }
}

impl FromStr for WordSeparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "space" => Ok(WordSeparator::Space),
            "hyphen" => Ok(WordSeparator::Hyphen),
            other => Err(format!("unknown word separator: {}", other)),
        }
    }
}

/// Scanner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Follow ISO/IEC 14977 strictly. Rejects empty terminal strings.
    pub iso: bool,
    pub word_separator: WordSeparator,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            iso: true,
            word_separator: WordSeparator::Space,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_separator_from_str() {
        assert_eq!("space".parse(), Ok(WordSeparator::Space));
        assert_eq!("hyphen".parse(), Ok(WordSeparator::Hyphen));
        assert!("tab".parse::<WordSeparator>().is_err());
        assert_eq!(WordSeparator::Hyphen.to_string(), "hyphen");
    }

    #[test]
    fn defaults_are_strict() {
        let opts = ScanOptions::default();
        assert!(opts.iso);
        assert_eq!(opts.word_separator.as_char(), ' ');
    }
}
