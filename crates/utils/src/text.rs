//! Small text helpers shared across services.

/// Turn a store or collection name into a URL slug: lowercase, runs of
/// whitespace, hyphens and underscores collapse to single hyphens, and
/// other non-alphanumerics are dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_hyphen = true;
        }
    }
    slug
}

/// Format integer cents as a two-decimal amount string.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Chanel Atelier"), "chanel-atelier");
        assert_eq!(slugify("  Maison  d'Or  "), "maison-dor");
        assert_eq!(slugify("Éclat & Co."), "clat-co");
        assert_eq!(slugify("already-sluggy"), "already-sluggy");
    }

    #[test]
    fn slugify_drops_leading_trailing_hyphens() {
        assert_eq!(slugify("--Vuitton--"), "vuitton");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn format_cents_pads() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(129900), "1299.00");
        assert_eq!(format_cents(-250), "-2.50");
    }
}
