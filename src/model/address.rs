//! Mailbox (name + email) pairs as shown in the message header block.

/// A sender or recipient mailbox.
///
/// # Examples
/// - `"Juan García <juan@ejemplo.com>"` → `display_name = "Juan García"`, `address = "juan@ejemplo.com"`
/// - `"user@example.com"` → `display_name = ""`, `address = "user@example.com"`
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct EmailAddress {
    /// Human-readable display name (may be empty).
    pub display_name: String,
    /// The bare email address (`user@domain`).
    pub address: String,
}

impl EmailAddress {
    /// Build a mailbox from its two halves.
    pub fn new(display_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            address: address.into(),
        }
    }

    /// Convert a `mail-parser` address, trimming stray whitespace.
    pub fn from_addr(addr: &mail_parser::Addr<'_>) -> Self {
        Self {
            display_name: addr.name.as_deref().unwrap_or("").trim().to_string(),
            address: addr.address.as_deref().unwrap_or("").trim().to_string(),
        }
    }

    /// Collect every mailbox of an address header, flattening groups.
    pub fn list_from(address: Option<&mail_parser::Address<'_>>) -> Vec<Self> {
        match address {
            Some(mail_parser::Address::List(list)) => list.iter().map(Self::from_addr).collect(),
            Some(mail_parser::Address::Group(groups)) => groups
                .iter()
                .flat_map(|group| group.addresses.iter())
                .map(Self::from_addr)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Format as a recipient entry: `"Name <email>"`, or `"<email>"` when unnamed.
    pub fn labeled(&self) -> String {
        if self.display_name.is_empty() {
            format!("<{}>", self.address)
        } else {
            format!("{} <{}>", self.display_name, self.address)
        }
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.labeled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_with_name() {
        let addr = EmailAddress::new("Alice", "alice@example.com");
        assert_eq!(addr.labeled(), "Alice <alice@example.com>");
    }

    #[test]
    fn test_labeled_without_name() {
        let addr = EmailAddress::new("", "alice@example.com");
        assert_eq!(addr.labeled(), "<alice@example.com>");
    }

    #[test]
    fn test_list_from_none() {
        assert!(EmailAddress::list_from(None).is_empty());
    }

    #[test]
    fn test_display_matches_labeled() {
        let addr = EmailAddress::new("Bob", "bob@example.com");
        assert_eq!(addr.to_string(), addr.labeled());
    }
}
