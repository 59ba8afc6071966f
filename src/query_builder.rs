//! Search query strings for the two scan modes.

pub const PROFILE_SITE: &str = "site:linkedin.com/in";

/// Words that mark someone as having trained, mentored or consulted.
pub const ROLE_TERMS: [&str; 9] = [
    "trainer",
    "instructor",
    "training",
    "mentored",
    "conducted training",
    "taught",
    "mentor",
    "consultant",
    "coach",
];

/// Primary technology first, then each comma-separated related tool, trimmed.
pub fn technology_terms(technology: &str, related_tools: &str) -> Vec<String> {
    let mut terms = vec![technology.trim().to_string()];
    terms.extend(
        related_tools
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string),
    );
    terms
}

fn or_group<S: AsRef<str>>(terms: &[S]) -> String {
    let joined: Vec<&str> = terms.iter().map(|t| t.as_ref()).collect();
    format!("({})", joined.join(" OR "))
}

/// `site:linkedin.com/in (tech OR ...) (role OR ...) "location"`
pub fn build_trainer_query(technology_terms: &[String], role_terms: &[&str], location: &str) -> String {
    let mut query = format!(
        "{} {} {}",
        PROFILE_SITE,
        or_group(technology_terms),
        or_group(role_terms)
    );
    let location = location.trim();
    if !location.is_empty() {
        query.push_str(&format!(" \"{}\"", location));
    }
    query
}

/// Profile mode always searches India; the location is not a parameter here.
pub fn build_profile_query(keywords: &str) -> String {
    format!("{} {} India", keywords.trim(), PROFILE_SITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technology_terms() {
        assert_eq!(technology_terms(" Python ", "Django, Flask"), vec!["Python", "Django", "Flask"]);
        assert_eq!(technology_terms("Java", ""), vec!["Java"]);
        assert_eq!(technology_terms("Java", " , Spring,"), vec!["Java", "Spring"]);
    }

    #[test]
    fn test_trainer_query() {
        let terms = technology_terms("Python", "Django, Flask");
        let query = build_trainer_query(&terms, &ROLE_TERMS, "India");

        assert!(query.starts_with("site:linkedin.com/in "));
        assert!(query.contains("(Python OR Django OR Flask)"));
        assert!(query.contains(
            "(trainer OR instructor OR training OR mentored OR conducted training OR taught OR mentor OR consultant OR coach)"
        ));
        assert!(query.ends_with(" \"India\""));
    }

    #[test]
    fn test_trainer_query_without_location() {
        let query = build_trainer_query(&["Rust".to_string()], &["coach"], "  ");
        assert_eq!(query, "site:linkedin.com/in (Rust) (coach)");
    }

    #[test]
    fn test_profile_query() {
        assert_eq!(
            build_profile_query("data engineer"),
            "data engineer site:linkedin.com/in India"
        );
    }
}
