//! DOMTokenList (classList)
//!
//! Implements classList for CSS class manipulation.

/// DOMTokenList for managing space-separated tokens (e.g., classList)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string, dropping empty and duplicate tokens
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        for token in s.split_whitespace() {
            list.add(token);
        }
        list
    }

    /// Get number of tokens
    pub fn length(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get token at index
    pub fn item(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|s| s.as_str())
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token, returns false if it was empty or already present
    pub fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Remove a token, returns whether it was present
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Toggle token, returns new state
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        match force {
            Some(true) => {
                self.add(token);
                true
            }
            Some(false) => {
                self.remove(token);
                false
            }
            None => {
                if !self.remove(token) {
                    self.add(token);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Get value as string
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    /// Set from string
    pub fn set_value(&mut self, value: &str) {
        *self = Self::from_string(value);
    }

    /// Iterate over tokens
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }
}

impl std::fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        let list = DOMTokenList::from_string(" btn  btn-primary active btn");
        assert_eq!(list.length(), 3);
        assert!(list.contains("btn"));
        assert!(list.contains("btn-primary"));
        assert_eq!(list.item(2), Some("active"));
    }

    #[test]
    fn test_add_remove() {
        let mut list = DOMTokenList::new();
        assert!(list.add("foo"));
        assert!(list.add("bar"));
        assert!(!list.add("foo"));
        assert!(!list.add(""));
        assert_eq!(list.length(), 2);

        assert!(list.remove("foo"));
        assert!(!list.remove("foo"));
        assert_eq!(list.to_string(), "bar");
    }

    #[test]
    fn test_toggle() {
        let mut list = DOMTokenList::new();

        assert!(list.toggle("active", None));
        assert!(list.contains("active"));

        assert!(!list.toggle("active", None));
        assert!(!list.contains("active"));

        assert!(list.toggle("forced", Some(true)));
        assert!(list.toggle("forced", Some(true)));
        assert_eq!(list.length(), 1);
    }
}
