/// Pages reachable from the navigation bar or the `:` path prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Recommender,
    /// Any path without a page of its own. Holds the path as typed.
    NotFound(String),
}

/// A navigation bar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
}

impl Route {
    /// Brand shown at the left of the navigation bar; links to `/`.
    pub const BRAND: NavLink = NavLink { label: "Recommender", path: "/" };

    pub const NAV_LINKS: [NavLink; 2] = [
        NavLink { label: "Home", path: "/" },
        NavLink { label: "Recommender", path: "/recommender" },
    ];

    /// Resolve a path. Matching is exact: `/recommender/` and `recommender`
    /// are not the recommender page.
    pub fn parse(path: &str) -> Self {
        match path {
            "/" => Self::Home,
            "/recommender" => Self::Recommender,
            other => Self::NotFound(other.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Home => "/",
            Self::Recommender => "/recommender",
            Self::NotFound(path) => path,
        }
    }

    /// Index of the nav link for this route, if it has one.
    pub fn nav_index(&self) -> Option<usize> {
        Self::NAV_LINKS.iter().position(|l| l.path == self.path())
    }

    /// Route of the next nav link, wrapping. Not-found pages continue at the first link.
    pub fn next(&self) -> Self {
        let i = self.nav_index().map_or(0, |i| (i + 1) % Self::NAV_LINKS.len());
        Self::parse(Self::NAV_LINKS[i].path)
    }

    pub fn prev(&self) -> Self {
        let len = Self::NAV_LINKS.len();
        let i = self.nav_index().map_or(len - 1, |i| (i + len - 1) % len);
        Self::parse(Self::NAV_LINKS[i].path)
    }
}
