//! Navigation-link classification.
//!
//! Decides whether following a link constitutes a page navigation that should
//! show the page overlay. The filter errs on the side of skipping the overlay:
//! a missed navigation is a cosmetic miss, an overlay over a non-navigation
//! (new tab, download, fragment jump) is a stuck loader.

/// Where the application currently is: host plus path and query of the
/// active view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkContext {
    pub host: String,
    pub path: String,
    pub query: String,
}

impl LinkContext {
    pub fn new(host: &str, path: &str, query: &str) -> Self {
        Self {
            host: host.to_string(),
            path: path.to_string(),
            query: query.to_string(),
        }
    }
}

/// A link as it appears on a rendered view.
#[derive(Debug, Clone, Default)]
pub struct Link {
    pub href: String,
    /// Browsing target (`_blank` etc.). Any non-empty target opts out.
    pub target: Option<String>,
    pub download: bool,
}

impl Link {
    pub fn new(href: &str) -> Self {
        Self {
            href: href.to_string(),
            target: None,
            download: false,
        }
    }

    pub fn with_target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    pub fn download(mut self) -> Self {
        self.download = true;
        self
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Href {
    /// `#...` — in-page jump, never a navigation.
    Fragment,
    /// `javascript:`, `mailto:`, `ftp:`, `data:`: anything with a scheme
    /// other than http(s) is not a page navigation.
    NonNavScheme,
    /// `http(s)://host/path?query`.
    Absolute {
        host: String,
        path: String,
        query: String,
    },
    /// Bare `/path?query` or `path?query`, resolved against the context.
    Relative { path: String, query: String },
}

fn parse_href(href: &str) -> Href {
    if href.starts_with('#') {
        return Href::Fragment;
    }

    // Strip any fragment before splitting off the query.
    let href = href.split('#').next().unwrap_or("");
    if href.is_empty() {
        return Href::Fragment;
    }

    // Protocol-relative: the host is still explicit, so it must be compared
    // against the context like any absolute href.
    if let Some(rest) = href.strip_prefix("//") {
        return parse_authority(rest);
    }

    if let Some(scheme) = split_scheme(href) {
        let rest = &href[scheme.len() + 1..];
        return if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
            parse_authority(rest.strip_prefix("//").unwrap_or(rest))
        } else {
            Href::NonNavScheme
        };
    }

    let (path, query) = split_query(href);
    Href::Relative { path, query }
}

/// The scheme token before the first `:`, if the href has one.
/// A `/` or `?` before the colon means the colon is part of the path.
fn split_scheme(href: &str) -> Option<&str> {
    let colon = href.find(':')?;
    let scheme = &href[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-')) {
        Some(scheme)
    } else {
        None
    }
}

fn parse_authority(rest: &str) -> Href {
    let cut = rest.find(['/', '?']).unwrap_or(rest.len());
    let (path, query) = match rest[cut..].strip_prefix('?') {
        Some(q) => ("/".to_string(), q.to_string()),
        None if cut < rest.len() => split_query(&rest[cut..]),
        None => ("/".to_string(), String::new()),
    };
    Href::Absolute {
        host: rest[..cut].to_ascii_lowercase(),
        path,
        query,
    }
}

fn split_query(s: &str) -> (String, String) {
    match s.find('?') {
        Some(i) => (s[..i].to_string(), s[i + 1..].to_string()),
        None => (s.to_string(), String::new()),
    }
}

/// Resolve a possibly relative path against the context's current path.
fn resolve_path(ctx: &LinkContext, path: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    if path.is_empty() {
        return ctx.path.clone();
    }
    let base = match ctx.path.rfind('/') {
        Some(i) => &ctx.path[..=i],
        None => "/",
    };
    format!("{}{}", base, path)
}

/// True when following `link` from `ctx` is a same-host page navigation to a
/// different path or query. False negatives are acceptable; false positives
/// are not.
pub fn should_show_loader(ctx: &LinkContext, link: &Link) -> bool {
    if link.href.is_empty() {
        return false;
    }
    if link.target.as_deref().is_some_and(|t| !t.is_empty()) {
        return false;
    }
    if link.download {
        return false;
    }

    let (path, query) = match parse_href(&link.href) {
        Href::Fragment | Href::NonNavScheme => return false,
        Href::Absolute { host, path, query } => {
            if host != ctx.host {
                return false;
            }
            (path, query)
        }
        Href::Relative { path, query } => (resolve_path(ctx, &path), query),
    };

    // Same page, same query: reloading would flash the overlay for nothing.
    !(path == ctx.path && query == ctx.query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> LinkContext {
        LinkContext::new("farm.example.com", "/sows", "")
    }

    #[test]
    fn test_internal_link_navigates() {
        assert!(should_show_loader(&ctx(), &Link::new("/litters")));
        assert!(should_show_loader(
            &ctx(),
            &Link::new("https://farm.example.com/expenses")
        ));
    }

    #[test]
    fn test_cross_host_skipped() {
        assert!(!should_show_loader(
            &ctx(),
            &Link::new("https://other.example.com/sows")
        ));
    }

    #[test]
    fn test_new_tab_and_download_skipped() {
        assert!(!should_show_loader(
            &ctx(),
            &Link::new("/litters").with_target("_blank")
        ));
        assert!(!should_show_loader(
            &ctx(),
            &Link::new("/reports/herd.pdf").download()
        ));
    }

    #[test]
    fn test_non_navigational_schemes_skipped() {
        assert!(!should_show_loader(&ctx(), &Link::new("#farrowing")));
        assert!(!should_show_loader(&ctx(), &Link::new("javascript:void(0)")));
        assert!(!should_show_loader(&ctx(), &Link::new("mailto:vet@example.com")));
        assert!(!should_show_loader(&ctx(), &Link::new("tel:+27115551234")));
        assert!(!should_show_loader(&ctx(), &Link::new("")));
    }

    #[test]
    fn test_protocol_relative_compares_host() {
        assert!(!should_show_loader(
            &ctx(),
            &Link::new("//other.example.com/steal")
        ));
        assert!(should_show_loader(
            &ctx(),
            &Link::new("//farm.example.com/litters")
        ));
        assert!(!should_show_loader(&ctx(), &Link::new("//farm.example.com/sows")));
    }

    #[test]
    fn test_scheme_matching_is_case_insensitive() {
        assert!(!should_show_loader(
            &ctx(),
            &Link::new("HTTPS://other.example.com/sows")
        ));
        assert!(should_show_loader(
            &ctx(),
            &Link::new("HTTP://FARM.EXAMPLE.COM/litters")
        ));
        assert!(!should_show_loader(&ctx(), &Link::new("JavaScript:void(0)")));
    }

    #[test]
    fn test_unknown_schemes_skipped() {
        assert!(!should_show_loader(
            &ctx(),
            &Link::new("ftp://farm.example.com/litters")
        ));
        assert!(!should_show_loader(
            &ctx(),
            &Link::new("data:text/html,<h1>hi</h1>")
        ));
        assert!(!should_show_loader(&ctx(), &Link::new("intent://scan/#x")));
        // A colon inside the path or query is not a scheme.
        assert!(should_show_loader(&ctx(), &Link::new("/sows?at=09:30")));
    }

    #[test]
    fn test_same_page_same_query_skipped() {
        assert!(!should_show_loader(&ctx(), &Link::new("/sows")));
        assert!(!should_show_loader(
            &ctx(),
            &Link::new("https://farm.example.com/sows")
        ));
    }

    #[test]
    fn test_same_page_different_query_navigates() {
        assert!(should_show_loader(&ctx(), &Link::new("/sows?page=2")));

        let paged = LinkContext::new("farm.example.com", "/sows", "page=2");
        assert!(!should_show_loader(&paged, &Link::new("/sows?page=2")));
        assert!(should_show_loader(&paged, &Link::new("/sows?page=3")));
    }

    #[test]
    fn test_fragment_on_other_page_navigates() {
        assert!(should_show_loader(&ctx(), &Link::new("/litters#recent")));
        assert!(!should_show_loader(&ctx(), &Link::new("/sows#top")));
    }

    #[test]
    fn test_relative_path_resolution() {
        let deep = LinkContext::new("farm.example.com", "/sows/12/litters", "");
        assert!(should_show_loader(&deep, &Link::new("edit")));
        assert_eq!(resolve_path(&deep, "edit"), "/sows/12/edit");

        let bare = LinkContext::new("farm.example.com", "/sows", "");
        assert_eq!(resolve_path(&bare, "12"), "/12");
    }

    #[test]
    fn test_host_only_href_means_root() {
        let home = LinkContext::new("farm.example.com", "/", "");
        assert!(!should_show_loader(
            &home,
            &Link::new("https://farm.example.com")
        ));
        assert!(should_show_loader(
            &ctx(),
            &Link::new("https://farm.example.com")
        ));
    }
}
