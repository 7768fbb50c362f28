//! crates/oceanus_core/src/access.rs
//!
//! Client routing and role-based authorization.
//!
//! Every client path maps to a [`Route`]; every route has exactly one entry in
//! [`ROUTE_TABLE`] stating who may see it. [`authorize`] is the only place the
//! table is consulted, and it is re-evaluated on every navigation.

use crate::domain::{Role, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Root,
    Dashboard,
    Upload,
    Explorer,
    Visualize,
    AiTools,
    Taxonomy,
    Reports,
    Admin,
    Profile,
    AccessDenied,
    NotFound,
}

/// Who may render a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Roles(&'static [Role]),
}

#[derive(Debug, Clone, Copy)]
pub struct RouteRule {
    pub route: Route,
    pub path: &'static str,
    pub access: Access,
    /// Sidebar label, for routes that appear in the navigation.
    pub nav_label: Option<&'static str>,
}

const STAFF: &[Role] = &[Role::Admin, Role::Researcher];
const ANALYSTS: &[Role] = &[Role::Admin, Role::Researcher, Role::PolicyUser];
const ADMINS: &[Role] = &[Role::Admin];

/// The single declaration of route paths and their allow-lists.
///
/// Order matters for [`navigation_for`]: it is the sidebar order.
pub const ROUTE_TABLE: &[RouteRule] = &[
    rule(Route::Login, "/auth/login", Access::Public, None),
    rule(Route::Root, "/", Access::Public, None),
    rule(Route::Dashboard, "/dashboard", Access::Roles(STAFF), Some("Dashboard")),
    rule(Route::Upload, "/upload", Access::Roles(STAFF), Some("Upload Data")),
    rule(Route::Explorer, "/explorer", Access::Authenticated, Some("Data Explorer")),
    rule(Route::Visualize, "/visualize", Access::Roles(ANALYSTS), Some("Visualizations")),
    rule(Route::AiTools, "/ai-tools", Access::Roles(STAFF), Some("AI Tools")),
    rule(Route::Taxonomy, "/taxonomy", Access::Roles(ANALYSTS), Some("Taxonomy")),
    rule(Route::Reports, "/reports", Access::Roles(ANALYSTS), Some("Reports")),
    rule(Route::Admin, "/admin", Access::Roles(ADMINS), Some("Admin")),
    rule(Route::Profile, "/profile", Access::Authenticated, None),
    rule(Route::AccessDenied, "/403", Access::Public, None),
];

const fn rule(
    route: Route,
    path: &'static str,
    access: Access,
    nav_label: Option<&'static str>,
) -> RouteRule {
    RouteRule {
        route,
        path,
        access,
        nav_label,
    }
}

impl Route {
    /// Resolves a client path, ignoring query, fragment and a trailing slash.
    pub fn from_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        ROUTE_TABLE
            .iter()
            .find(|rule| rule.path == path)
            .map(|rule| rule.route)
            .unwrap_or(Route::NotFound)
    }

    pub fn path(&self) -> &'static str {
        self.rule().map(|rule| rule.path).unwrap_or("/404")
    }

    pub fn access(&self) -> Access {
        self.rule().map(|rule| rule.access).unwrap_or(Access::Public)
    }

    fn rule(&self) -> Option<&'static RouteRule> {
        ROUTE_TABLE.iter().find(|rule| rule.route == *self)
    }
}

/// The outcome of a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Navigation {
    /// The route the user ends up on.
    pub fn target(&self) -> Route {
        match self {
            Navigation::Render(route) | Navigation::Redirect(route) => *route,
        }
    }
}

/// Where each role lands after visiting `/`.
pub fn landing_route(role: Role) -> Route {
    match role {
        Role::Admin => Route::Admin,
        Role::Researcher => Route::Dashboard,
        Role::PolicyUser => Route::Visualize,
        Role::Guest => Route::Explorer,
    }
}

/// Decides whether to render `path` for `session` or where to send the user instead.
pub fn authorize(session: Option<&Session>, path: &str) -> Navigation {
    let route = Route::from_path(path);
    let role = session.map(|s| s.user.role);

    if route == Route::Root {
        return match role {
            Some(role) => Navigation::Redirect(landing_route(role)),
            None => Navigation::Redirect(Route::Login),
        };
    }

    match (route.access(), role) {
        (Access::Public, _) => Navigation::Render(route),
        (_, None) => Navigation::Redirect(Route::Login),
        (Access::Authenticated, Some(_)) => Navigation::Render(route),
        (Access::Roles(allowed), Some(role)) if allowed.contains(&role) => {
            Navigation::Render(route)
        }
        (Access::Roles(_), Some(_)) => Navigation::Redirect(Route::AccessDenied),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
}

/// Sidebar entries visible to a role, in display order.
pub fn navigation_for(role: Role) -> Vec<NavItem> {
    ROUTE_TABLE
        .iter()
        .filter_map(|rule| {
            let label = rule.nav_label?;
            let visible = match rule.access {
                Access::Public | Access::Authenticated => true,
                Access::Roles(allowed) => allowed.contains(&role),
            };
            visible.then_some(NavItem {
                path: rule.path,
                label,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PublicUser;
    use uuid::Uuid;

    fn session(role: Role) -> Session {
        Session {
            token: "tok".to_string(),
            user: PublicUser {
                id: Uuid::new_v4(),
                email: "someone@oceanus.com".to_string(),
                name: "Someone".to_string(),
                role,
            },
            expires_in: 3600,
        }
    }

    const PROTECTED: &[&str] = &[
        "/dashboard",
        "/upload",
        "/explorer",
        "/visualize",
        "/ai-tools",
        "/taxonomy",
        "/reports",
        "/admin",
        "/profile",
    ];

    #[test]
    fn every_protected_route_redirects_anonymous_users_to_login() {
        for path in PROTECTED {
            assert_eq!(
                authorize(None, path),
                Navigation::Redirect(Route::Login),
                "{path}"
            );
        }
    }

    #[test]
    fn access_is_granted_iff_role_is_in_allow_list() {
        for role in Role::ALL {
            let session = session(role);
            for path in PROTECTED {
                let route = Route::from_path(path);
                let expected = match route.access() {
                    Access::Roles(allowed) if !allowed.contains(&role) => {
                        Navigation::Redirect(Route::AccessDenied)
                    }
                    _ => Navigation::Render(route),
                };
                assert_eq!(authorize(Some(&session), path), expected, "{role} {path}");
            }
        }
    }

    #[test]
    fn allow_lists_match_the_platform_matrix() {
        let can = |role: Role, path: &str| {
            authorize(Some(&session(role)), path).target() == Route::from_path(path)
        };

        assert!(can(Role::Admin, "/admin"));
        assert!(!can(Role::Researcher, "/admin"));
        assert!(can(Role::Researcher, "/upload"));
        assert!(!can(Role::PolicyUser, "/upload"));
        assert!(can(Role::PolicyUser, "/reports"));
        assert!(!can(Role::Guest, "/taxonomy"));
        assert!(can(Role::Guest, "/explorer"));
        assert!(can(Role::Guest, "/profile"));
    }

    #[test]
    fn root_redirects_to_role_landing_page() {
        let expect = [
            (Role::Admin, Route::Admin),
            (Role::Researcher, Route::Dashboard),
            (Role::PolicyUser, Route::Visualize),
            (Role::Guest, Route::Explorer),
        ];
        for (role, landing) in expect {
            assert_eq!(
                authorize(Some(&session(role)), "/"),
                Navigation::Redirect(landing)
            );
        }
        assert_eq!(authorize(None, "/"), Navigation::Redirect(Route::Login));
    }

    #[test]
    fn guest_visiting_admin_is_sent_to_403() {
        assert_eq!(
            authorize(Some(&session(Role::Guest)), "/admin"),
            Navigation::Redirect(Route::AccessDenied)
        );
    }

    #[test]
    fn public_routes_render_without_a_session() {
        assert_eq!(authorize(None, "/auth/login"), Navigation::Render(Route::Login));
        assert_eq!(authorize(None, "/403"), Navigation::Render(Route::AccessDenied));
        assert_eq!(authorize(None, "/nowhere"), Navigation::Render(Route::NotFound));
    }

    #[test]
    fn paths_are_normalised() {
        assert_eq!(Route::from_path("/admin/"), Route::Admin);
        assert_eq!(Route::from_path("/explorer?type=edna"), Route::Explorer);
        assert_eq!(Route::from_path("/reports#latest"), Route::Reports);
        assert_eq!(Route::from_path(""), Route::Root);
        assert_eq!(Route::from_path("/admin/users"), Route::NotFound);
    }

    #[test]
    fn sidebar_follows_the_guard() {
        let labels = |role: Role| {
            navigation_for(role)
                .into_iter()
                .map(|item| item.label)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            labels(Role::Admin),
            vec![
                "Dashboard",
                "Upload Data",
                "Data Explorer",
                "Visualizations",
                "AI Tools",
                "Taxonomy",
                "Reports",
                "Admin"
            ]
        );
        assert_eq!(
            labels(Role::PolicyUser),
            vec!["Data Explorer", "Visualizations", "Taxonomy", "Reports"]
        );
        assert_eq!(labels(Role::Guest), vec!["Data Explorer"]);

        for role in Role::ALL {
            let session = session(role);
            for item in navigation_for(role) {
                assert!(matches!(authorize(Some(&session), item.path), Navigation::Render(_)));
            }
        }
    }
}
