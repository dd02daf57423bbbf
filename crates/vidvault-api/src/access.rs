//! Access control for inbound requests.
//!
//! Classification and the allow/redirect decision are pure functions of the
//! authentication state and the request path. The axum wiring lives in
//! [`crate::middleware::access_guard`].

use std::fmt;

/// Dashboard path for signed-in users.
pub const HOME_PATH: &str = "/home";

/// Where unauthenticated users are sent.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Registration page.
pub const SIGN_UP_PATH: &str = "/sign-up";

/// Catalog listing endpoint.
pub const VIDEOS_API_PATH: &str = "/api/videos";

/// Outcome of the access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Pass the request through unmodified.
    Allow,
    /// Redirect to the given path.
    Redirect(&'static str),
}

impl AccessDecision {
    /// Label used for logging and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            AccessDecision::Allow => "allow",
            AccessDecision::Redirect(_) => "redirect",
        }
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessDecision::Allow => write!(f, "allow"),
            AccessDecision::Redirect(target) => write!(f, "redirect -> {}", target),
        }
    }
}

/// Coarse classification of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Root,
    PublicPage,
    PublicApi,
    ProtectedApi,
    Protected,
}

impl RouteClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Root => "root",
            RouteClass::PublicPage => "public_page",
            RouteClass::PublicApi => "public_api",
            RouteClass::ProtectedApi => "protected_api",
            RouteClass::Protected => "protected",
        }
    }
}

/// Path tables driving the access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub home: &'static str,
    pub sign_in: &'static str,
    /// Pages reachable without a session.
    pub public_pages: &'static [&'static str],
    /// API routes reachable without a session.
    pub public_api: &'static [&'static str],
}

impl AccessPolicy {
    pub const DEFAULT: AccessPolicy = AccessPolicy {
        home: HOME_PATH,
        sign_in: SIGN_IN_PATH,
        public_pages: &[SIGN_IN_PATH, SIGN_UP_PATH],
        public_api: &[VIDEOS_API_PATH],
    };

    pub fn is_public_page(&self, path: &str) -> bool {
        self.public_pages.iter().any(|route| matches_route(path, route))
    }

    pub fn is_public_api(&self, path: &str) -> bool {
        self.public_api.iter().any(|route| matches_route(path, route))
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        if path == "/" {
            RouteClass::Root
        } else if self.is_public_page(path) {
            RouteClass::PublicPage
        } else if self.is_public_api(path) {
            RouteClass::PublicApi
        } else if is_api_request(path) {
            RouteClass::ProtectedApi
        } else {
            RouteClass::Protected
        }
    }

    /// Decide whether a request may proceed.
    ///
    /// Rules, first match wins:
    /// 1. signed in, root: go home
    /// 2. signed in, public page other than home: go home
    /// 3. signed out, root or anything outside the public pages and public
    ///    API (which covers every non-public API route): go to sign-in
    /// 4. otherwise allow
    pub fn decide(&self, authenticated: bool, path: &str) -> AccessDecision {
        let is_root = path == "/";
        let is_public_page = self.is_public_page(path);

        if authenticated {
            if is_root {
                return AccessDecision::Redirect(self.home);
            }
            if is_public_page && !matches_route(path, self.home) {
                return AccessDecision::Redirect(self.home);
            }
            return AccessDecision::Allow;
        }

        if is_root || (!is_public_page && !self.is_public_api(path)) {
            return AccessDecision::Redirect(self.sign_in);
        }

        AccessDecision::Allow
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Decide with the default path tables.
pub fn decide(authenticated: bool, path: &str) -> AccessDecision {
    AccessPolicy::DEFAULT.decide(authenticated, path)
}

/// True for `/api` and anything below it.
pub fn is_api_request(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Whether the guard runs for this path at all.
///
/// Static files (any path containing a dot), build assets under `/_next` and
/// the favicon are skipped. API paths and the root are always guarded.
pub fn guard_applies(path: &str) -> bool {
    if path == "/" || is_api_request(path) || path == "/trpc" || path.starts_with("/trpc/") {
        return true;
    }
    !(path.contains('.') || path.starts_with("/_next") || path == "/favicon.ico")
}

/// Exact match, tolerating a single trailing slash.
fn matches_route(path: &str, route: &str) -> bool {
    path == route || path.strip_suffix('/') == Some(route)
}
