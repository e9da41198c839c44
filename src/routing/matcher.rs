//! Route table and matching
//!
//! Routes are grouped into resources (one per path template). Lookup
//! resolves the resource first and leaves method selection to the caller,
//! which is how the gateway decides between 404 and 405.

use hyper::Method;

use super::pattern::{split_path, PathPattern};
use crate::error::RouteError;

/// One path template and the entries registered for each of its methods
#[derive(Debug)]
pub struct Resource<T> {
    pattern: PathPattern,
    routes: Vec<(Method, T)>,
}

impl<T> Resource<T> {
    pub const fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn route(&self, method: &Method) -> Option<&T> {
        self.routes
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, entry)| entry)
    }

    /// Registered methods in registration order
    pub fn methods(&self) -> Vec<Method> {
        self.routes.iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.routes.iter().map(|(_, entry)| entry)
    }
}

/// Result of a successful path lookup
#[derive(Debug)]
pub struct RouteMatch<'a, T> {
    pub resource: &'a Resource<T>,
    pub params: Vec<(String, String)>,
}

/// Immutable once the owning app is frozen
#[derive(Debug)]
pub struct RouteTable<T> {
    resources: Vec<Resource<T>>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
        }
    }
}

impl<T: Clone> RouteTable<T> {
    /// Register `entry` for every method in `methods`.
    ///
    /// All conflicts are checked before anything is inserted, so a failed
    /// call leaves the table untouched.
    pub fn insert(
        &mut self,
        pattern: PathPattern,
        methods: &[Method],
        entry: T,
    ) -> Result<(), RouteError> {
        let existing = self
            .resources
            .iter()
            .position(|r| r.pattern.same_shape(&pattern));

        if let Some(index) = existing {
            let resource = &self.resources[index];
            if !resource.pattern.param_names().eq(pattern.param_names()) {
                return Err(RouteError::ConflictingPlaceholders {
                    path: pattern.as_str().to_string(),
                    existing: resource.pattern.as_str().to_string(),
                });
            }
            if let Some(method) = methods.iter().find(|m| resource.route(m).is_some()) {
                return Err(RouteError::DuplicateRoute {
                    method: method.clone(),
                    path: pattern.as_str().to_string(),
                });
            }
        }

        let routes = methods.iter().map(|m| (m.clone(), entry.clone()));
        match existing {
            Some(index) => self.resources[index].routes.extend(routes),
            None => self.resources.push(Resource {
                pattern,
                routes: routes.collect(),
            }),
        }
        Ok(())
    }
}

impl<T> RouteTable<T> {
    /// Find the most specific resource whose template matches `path`.
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_, T>> {
        let segments = split_path(path);
        self.resources
            .iter()
            .filter_map(|resource| {
                resource
                    .pattern
                    .match_segments(&segments)
                    .map(|params| RouteMatch { resource, params })
            })
            .max_by_key(|m| m.resource.pattern.specificity())
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource<T>> {
        self.resources.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(routes: &[(&str, Method, &'static str)]) -> RouteTable<&'static str> {
        let mut table = RouteTable::default();
        for (path, method, name) in routes {
            table
                .insert(PathPattern::parse(path).unwrap(), &[method.clone()], *name)
                .unwrap();
        }
        table
    }

    #[test]
    fn test_lookup_exact() {
        let table = make_table(&[("/", Method::GET, "index"), ("/users", Method::POST, "users")]);

        let m = table.lookup("/").unwrap();
        assert_eq!(m.resource.route(&Method::GET), Some(&"index"));

        let m = table.lookup("/users").unwrap();
        assert_eq!(m.resource.route(&Method::POST), Some(&"users"));
        assert_eq!(m.resource.route(&Method::GET), None);

        assert!(table.lookup("/missing").is_none());
        assert!(table.lookup("/users/extra").is_none());
    }

    #[test]
    fn test_literal_beats_placeholder() {
        // Registration order must not matter
        let table = make_table(&[
            ("/users/{id}", Method::GET, "by_id"),
            ("/users/me", Method::GET, "me"),
        ]);

        let m = table.lookup("/users/me").unwrap();
        assert_eq!(m.resource.route(&Method::GET), Some(&"me"));
        assert!(m.params.is_empty());

        let m = table.lookup("/users/42").unwrap();
        assert_eq!(m.resource.route(&Method::GET), Some(&"by_id"));
        assert_eq!(m.params, vec![("id".to_string(), "42".to_string())]);
    }

    #[test]
    fn test_methods_share_a_resource() {
        let table = make_table(&[
            ("/items/{id}", Method::GET, "get"),
            ("/items/{id}", Method::DELETE, "delete"),
        ]);
        assert_eq!(table.resources().count(), 1);

        let m = table.lookup("/items/7").unwrap();
        assert_eq!(m.resource.methods(), vec![Method::GET, Method::DELETE]);
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let mut table = make_table(&[("/items", Method::GET, "a")]);
        let err = table
            .insert(PathPattern::parse("/items").unwrap(), &[Method::GET], "b")
            .unwrap_err();
        assert!(matches!(err, RouteError::DuplicateRoute { .. }));
    }

    #[test]
    fn test_conflicting_placeholders_rejected() {
        let mut table = make_table(&[("/items/{id}", Method::GET, "a")]);
        let err = table
            .insert(
                PathPattern::parse("/items/{item_id}").unwrap(),
                &[Method::PUT],
                "b",
            )
            .unwrap_err();
        assert!(matches!(err, RouteError::ConflictingPlaceholders { .. }));
    }

    #[test]
    fn test_failed_insert_leaves_table_untouched() {
        let mut table = make_table(&[("/items", Method::GET, "a")]);
        let result = table.insert(
            PathPattern::parse("/items").unwrap(),
            &[Method::POST, Method::GET],
            "b",
        );
        assert!(result.is_err());

        let m = table.lookup("/items").unwrap();
        assert_eq!(m.resource.methods(), vec![Method::GET]);
    }
}
