use once_cell::sync::Lazy;
use regex::Regex;

static EXTRACTOR: Lazy<Extractor> = Lazy::new(Extractor::new);

/// Emails and phones found in one blob of text, in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl ContactInfo {
    pub fn emails_joined(&self) -> String {
        self.emails.join(", ")
    }

    pub fn phones_joined(&self) -> String {
        self.phones.join(", ")
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

pub struct Extractor {
    email_regex: Regex,
    phone_regex: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            email_regex: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap(),
            // Loose on purpose: any digit run of the right shape counts.
            phone_regex: Regex::new(r"\+?\d[\d\s\-]{7,15}\d").unwrap(),
        }
    }

    /// Matches are kept verbatim, duplicates included.
    pub fn extract_emails(&self, text: &str) -> Vec<String> {
        self.email_regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn extract_phones(&self, text: &str) -> Vec<String> {
        self.phone_regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn extract(&self, text: &str) -> ContactInfo {
        ContactInfo {
            emails: self.extract_emails(text),
            phones: self.extract_phones(text),
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs both patterns over `text` using a shared, lazily compiled extractor.
pub fn extract_contacts(text: &str) -> ContactInfo {
    EXTRACTOR.extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let info = extract_contacts("");
        assert!(info.emails.is_empty());
        assert!(info.phones.is_empty());
        assert!(info.is_empty());
    }

    #[test]
    fn test_emails_keep_order_and_duplicates() {
        let text = "Reach me at jane.doe+work@example.co.in or JANE@Example.com, again jane.doe+work@example.co.in";
        let info = extract_contacts(text);
        assert_eq!(
            info.emails,
            vec![
                "jane.doe+work@example.co.in",
                "JANE@Example.com",
                "jane.doe+work@example.co.in",
            ]
        );
        assert_eq!(
            info.emails_joined(),
            "jane.doe+work@example.co.in, JANE@Example.com, jane.doe+work@example.co.in"
        );
    }

    #[test]
    fn test_email_needs_two_letter_tld() {
        assert!(extract_contacts("user@host.c").emails.is_empty());
        assert_eq!(extract_contacts("user@host.io").emails, vec!["user@host.io"]);
    }

    #[test]
    fn test_phones_are_not_normalized() {
        let info = extract_contacts("Call +91 98765-43210 or 044 2345 6789 today");
        assert_eq!(info.phones, vec!["+91 98765-43210", "044 2345 6789"]);
    }

    #[test]
    fn test_short_digit_runs_are_ignored() {
        assert!(extract_contacts("Room 1234, floor 56").phones.is_empty());
    }

    #[test]
    fn test_phone_pattern_over_matches_digit_runs() {
        // Accepted behaviour: a long enough digit run is reported as a phone.
        let info = extract_contacts("Order id 2023123456789");
        assert_eq!(info.phones, vec!["2023123456789"]);
    }

    #[test]
    fn test_every_match_fits_the_grammar() {
        let email_re = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
        let phone_re = Regex::new(r"^\+?\d[\d\s\-]{7,15}\d$").unwrap();
        let text = "a@b.cd x 12345678901 y first.last@sub.domain.org +1-800-555-0199 z 99 999";
        let info = extract_contacts(text);
        assert_eq!(info.emails.len(), 2);
        assert_eq!(info.phones.len(), 2);
        assert!(info.emails.iter().all(|e| email_re.is_match(e)));
        assert!(info.phones.iter().all(|p| phone_re.is_match(p)));
    }
}
