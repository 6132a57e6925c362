use url::Url;

/// Extracts the lowercase host from a URL string
///
/// # Examples
///
/// ```
/// use relicscan::url::extract_host;
///
/// assert_eq!(extract_host("https://WWW.Example.edu/path"), Some("www.example.edu".to_string()));
/// assert_eq!(extract_host("not a url"), None);
/// ```
pub fn extract_host(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Checks whether a host belongs to the seed's site
///
/// A host is in scope when it equals the seed host exactly or is a
/// subdomain of it (`inside.example.edu` for seed `example.edu`). A host
/// that merely ends with the same characters (`notexample.edu`) is not.
pub fn is_same_site(host: &str, seed_host: &str) -> bool {
    let host = host.to_lowercase();
    let seed_host = seed_host.to_lowercase();

    host == seed_host || host.ends_with(&format!(".{}", seed_host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_host_lowercases() {
        assert_eq!(
            extract_host("https://Online.EXAMPLE.edu/courses"),
            Some("online.example.edu".to_string())
        );
    }

    #[test]
    fn test_extract_host_invalid() {
        assert_eq!(extract_host("::::"), None);
    }

    #[test]
    fn test_same_host() {
        assert!(is_same_site("example.edu", "example.edu"));
    }

    #[test]
    fn test_subdomain_in_scope() {
        assert!(is_same_site("registrar.example.edu", "example.edu"));
        assert!(is_same_site("a.b.example.edu", "example.edu"));
    }

    #[test]
    fn test_cross_domain_out_of_scope() {
        assert!(!is_same_site("other.edu", "example.edu"));
    }

    #[test]
    fn test_suffix_collision_out_of_scope() {
        assert!(!is_same_site("notexample.edu", "example.edu"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_same_site("Registrar.Example.EDU", "example.edu"));
    }
}
