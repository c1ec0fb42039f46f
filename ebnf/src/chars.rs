//! ASCII character classes used by the scanner.

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_alnum(c: char) -> bool {
    is_letter(c) || is_digit(c)
}

/// Space, tab, CR, LF, form feed and vertical tab.
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0c' | '\x0b')
}

pub fn is_ident_start(c: char) -> bool {
    is_letter(c)
}

pub fn is_ident_continue(c: char) -> bool {
    is_alnum(c)
}

/// Single character symbols of the notation.
pub fn is_symbol(c: char) -> bool {
    "=;|,-*[]{}()".contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        let tests = vec![
            ('a', true, true, false),
            ('Z', true, true, false),
            ('7', false, true, false),
            ('_', false, false, false),
            ('\x0b', false, false, true),
            ('\r', false, false, true),
            ('é', false, false, false),
        ];
        for test in tests {
            assert_eq!(is_ident_start(test.0), test.1, "test case: {:?}", test);
            assert_eq!(is_ident_continue(test.0), test.2, "test case: {:?}", test);
            assert_eq!(is_space(test.0), test.3, "test case: {:?}", test);
        }
    }

    #[test]
    fn symbols() {
        for c in "=;|,-*[]{}()".chars() {
            assert!(is_symbol(c), "{:?}", c);
        }
        for c in ".:!+%@&#$<>/\\^`~_".chars() {
            assert!(!is_symbol(c), "{:?}", c);
        }
    }
}
