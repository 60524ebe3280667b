//! Utility functions

use uuid::Uuid;

pub fn is_valid_uuid(s: &str) -> bool {
    Uuid::parse_str(s).is_ok()
}

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let visible: String = local.chars().take(if local.chars().count() <= 2 { 1 } else { 2 }).collect();
        format!("{}***{}", visible, domain)
    } else {
        "***".to_string()
    }
}

/// Lowercase ASCII slug: alphanumerics separated by single dashes
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 100
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Keep digits only; a leading `00` international prefix is dropped
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.strip_prefix("00") {
        Some(rest) => rest.to_string(),
        None => digits,
    }
}

pub fn is_valid_phone(raw: &str) -> bool {
    let digits = normalize_phone(raw);
    (7..=15).contains(&digits.len())
}

/// Format minor units as `CUR 12.50`
pub fn format_money(amount_cents: i64, currency: &str) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let abs = amount_cents.unsigned_abs();
    format!("{} {}{}.{:02}", currency, sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("john@example.com"), "jo***@example.com");
        assert_eq!(mask_email("a@x.io"), "a***@x.io");
        assert_eq!(mask_email("invalid"), "***");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Joe's Pizza & Grill "), "joe-s-pizza-grill");
        assert_eq!(slugify("Café 21"), "caf-21");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("joes-pizza-2"));
        assert!(!is_valid_slug("-bad"));
        assert!(!is_valid_slug("Bad"));
        assert!(!is_valid_slug("a--b"));
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+62 812-3456-789"), "628123456789");
        assert_eq!(normalize_phone("0044 20 7946 0958"), "442079460958");
        assert!(is_valid_phone("+1 (555) 010-9999"));
        assert!(!is_valid_phone("12345"));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1250, "USD"), "USD 12.50");
        assert_eq!(format_money(5, "EUR"), "EUR 0.05");
        assert_eq!(format_money(-199, "USD"), "USD -1.99");
    }
}
