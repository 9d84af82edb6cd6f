use std::collections::HashMap;

use indexmap::IndexMap;

use crate::config::{CollisionPolicy, NavigationConfig};
use crate::error::{Diagnostic, ParseError};
use crate::model::{Endpoint, NavigationNode};

/// The navigation tree plus the path assigned to each endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub nodes: Vec<NavigationNode>,
    /// `nav_paths[i]` is the navigable path of `endpoints[i]`.
    pub nav_paths: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds the sidebar tree for a list of endpoints.
#[derive(Debug, Clone)]
pub struct NavigationGenerator<'a> {
    config: &'a NavigationConfig,
    policy: CollisionPolicy,
}

impl<'a> NavigationGenerator<'a> {
    pub fn new(config: &'a NavigationConfig, policy: CollisionPolicy) -> Self {
        Self { config, policy }
    }

    /// Group endpoints by their first tag and assign each a unique path.
    ///
    /// Groups follow `declared_tags` order; undeclared tags come after,
    /// sorted by name. Pages keep endpoint order within a group.
    pub fn generate(
        &self,
        endpoints: &[Endpoint],
        declared_tags: &[String],
    ) -> Result<Navigation, ParseError> {
        let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (i, endpoint) in endpoints.iter().enumerate() {
            groups.entry(endpoint.primary_tag()).or_default().push(i);
        }

        let declared_index = |tag: &str| declared_tags.iter().position(|t| t == tag);
        groups.sort_by(|a, _, b, _| {
            let ka = (declared_index(*a).unwrap_or(usize::MAX), *a);
            let kb = (declared_index(*b).unwrap_or(usize::MAX), *b);
            ka.cmp(&kb)
        });

        let mut nav_paths = vec![String::new(); endpoints.len()];
        let mut taken: HashMap<String, usize> = HashMap::new();
        let mut diagnostics = Vec::new();
        let mut nodes = Vec::with_capacity(groups.len());

        for (tag, members) in &groups {
            let tag_slug = slugify(tag);
            let mut children = Vec::with_capacity(members.len());

            for &i in members {
                let endpoint = &endpoints[i];
                let base = format!(
                    "{}/{}/{}",
                    self.config.route_prefix,
                    tag_slug,
                    endpoint_slug(endpoint)
                );
                let path = match taken.get(&base) {
                    None => base,
                    Some(&existing) => self.resolve_collision(
                        base,
                        &endpoints[existing],
                        endpoint,
                        &taken,
                        &mut diagnostics,
                    )?,
                };
                taken.insert(path.clone(), i);

                children.push(NavigationNode::Page {
                    title: endpoint.title.clone(),
                    path: path.clone(),
                    method: Some(endpoint.method),
                });
                nav_paths[i] = path;
            }

            nodes.push(NavigationNode::Group {
                title: group_title(tag),
                children,
            });
        }

        Ok(Navigation {
            nodes,
            nav_paths,
            diagnostics,
        })
    }

    fn resolve_collision(
        &self,
        base: String,
        existing: &Endpoint,
        duplicate: &Endpoint,
        taken: &HashMap<String, usize>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<String, ParseError> {
        let existing = format!("{} {}", existing.method, existing.path);
        let duplicate = format!("{} {}", duplicate.method, duplicate.path);

        if self.policy == CollisionPolicy::Error {
            return Err(ParseError::SlugCollision {
                path: base,
                existing,
                duplicate,
            });
        }

        log::warn!("`{duplicate}` collides with `{existing}` at {base}");
        diagnostics.push(Diagnostic::SlugCollision {
            path: base.clone(),
            existing,
            duplicate,
        });

        if self.policy == CollisionPolicy::LastWins {
            return Ok(base);
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if !taken.contains_key(&candidate) {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

/// The last segment of an endpoint's navigable path.
pub fn endpoint_slug(endpoint: &Endpoint) -> String {
    let from_id = endpoint
        .operation_id
        .as_deref()
        .map(slugify)
        .filter(|slug| !slug.is_empty());
    from_id.unwrap_or_else(|| slugify(&format!("{}_{}", endpoint.method, endpoint.path)))
}

/// Lowercase, strip `{` and `}`, and collapse every run of other
/// characters outside `[a-z0-9-]` into one `_`. Leading and trailing `_`
/// are trimmed, so `slugify(slugify(s)) == slugify(s)`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for ch in input.chars().flat_map(char::to_lowercase) {
        match ch {
            '{' | '}' => {}
            'a'..='z' | '0'..='9' | '-' => slug.push(ch),
            _ => {
                if !slug.ends_with('_') {
                    slug.push('_');
                }
            }
        }
    }
    slug.trim_matches('_').to_string()
}

/// Display title for a tag group: `-` and `_` become spaces and each word
/// is capitalized.
pub fn group_title(tag: &str) -> String {
    tag.replace(['-', '_'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, SecuritySchemas};
    use indexmap::IndexMap;

    fn endpoint(method: HttpMethod, path: &str, operation_id: Option<&str>, tag: &str) -> Endpoint {
        Endpoint {
            title: operation_id.unwrap_or(path).to_string(),
            summary: None,
            description: None,
            method,
            path: path.to_string(),
            deprecated: false,
            tags: vec![tag.to_string()],
            external_docs: None,
            parameters: vec![],
            request_body: None,
            responses: IndexMap::new(),
            base_url: String::new(),
            security: None,
            effective_security: vec![],
            security_schemas: SecuritySchemas::default(),
            operation_id: operation_id.map(str::to_string),
            nav_path: String::new(),
        }
    }

    fn generate(
        endpoints: &[Endpoint],
        declared: &[&str],
        policy: CollisionPolicy,
    ) -> Result<Navigation, ParseError> {
        let config = NavigationConfig::default();
        let declared: Vec<String> = declared.iter().map(|s| s.to_string()).collect();
        NavigationGenerator::new(&config, policy).generate(endpoints, &declared)
    }

    fn group_titles(nav: &Navigation) -> Vec<&str> {
        nav.nodes.iter().map(NavigationNode::title).collect()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("getUser"), "getuser");
        assert_eq!(slugify("GET_/users/{id}"), "get_users_id");
        assert_eq!(slugify("list-pets"), "list-pets");
        assert_eq!(slugify("  Hello, World!  "), "hello_world");
        assert_eq!(slugify("{}"), "");
    }

    #[test]
    fn test_slugify_idempotent() {
        for input in [
            "getUser",
            "GET_/users/{id}/posts/{postId}",
            "__weird__Name--x",
            "Ünïcode Tag",
            "a//b",
        ] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_group_title() {
        assert_eq!(group_title("user-accounts"), "User Accounts");
        assert_eq!(group_title("pet_store"), "Pet Store");
        assert_eq!(group_title("Users"), "Users");
    }

    #[test]
    fn test_endpoint_slug_without_operation_id() {
        let e = endpoint(HttpMethod::Get, "/users/{id}", None, "users");
        assert_eq!(endpoint_slug(&e), "get_users_id");
    }

    #[test]
    fn test_declared_tags_first_then_lexicographic() {
        let endpoints = vec![
            endpoint(HttpMethod::Get, "/zebras", Some("listZebras"), "zebras"),
            endpoint(HttpMethod::Get, "/apples", Some("listApples"), "apples"),
            endpoint(HttpMethod::Get, "/users", Some("listUsers"), "users"),
            endpoint(HttpMethod::Get, "/pets", Some("listPets"), "pets"),
        ];
        let nav = generate(&endpoints, &["users", "pets"], CollisionPolicy::Suffix).unwrap();
        assert_eq!(group_titles(&nav), vec!["Users", "Pets", "Apples", "Zebras"]);
    }

    #[test]
    fn test_pages_keep_endpoint_order() {
        let endpoints = vec![
            endpoint(HttpMethod::Post, "/users", Some("createUser"), "users"),
            endpoint(HttpMethod::Get, "/users", Some("listUsers"), "users"),
        ];
        let nav = generate(&endpoints, &[], CollisionPolicy::Suffix).unwrap();
        insta::assert_debug_snapshot!(nav.nav_paths, @r#"
        [
            "/api_reference/users/createuser",
            "/api_reference/users/listusers",
        ]
        "#);
        let pages: Vec<_> = nav.nodes[0].children().iter().map(NavigationNode::title).collect();
        assert_eq!(pages, vec!["createUser", "listUsers"]);
    }

    #[test]
    fn test_collision_suffix() {
        let endpoints = vec![
            endpoint(HttpMethod::Get, "/a", Some("getThing"), "things"),
            endpoint(HttpMethod::Get, "/b", Some("get_thing"), "things"),
            endpoint(HttpMethod::Get, "/c", Some("get-thing"), "things"),
            endpoint(HttpMethod::Get, "/d", Some("GET THING"), "things"),
        ];
        let nav = generate(&endpoints, &[], CollisionPolicy::Suffix).unwrap();
        insta::assert_debug_snapshot!(nav.nav_paths, @r#"
        [
            "/api_reference/things/getthing",
            "/api_reference/things/get_thing",
            "/api_reference/things/get-thing",
            "/api_reference/things/get_thing_2",
        ]
        "#);
        assert_eq!(nav.diagnostics.len(), 1);
    }

    #[test]
    fn test_collision_last_wins() {
        let endpoints = vec![
            endpoint(HttpMethod::Get, "/a", Some("getThing"), "things"),
            endpoint(HttpMethod::Get, "/b", Some("GETTHING"), "things"),
        ];
        let nav = generate(&endpoints, &[], CollisionPolicy::LastWins).unwrap();
        assert_eq!(nav.nav_paths[0], nav.nav_paths[1]);
        assert_eq!(
            nav.diagnostics,
            vec![Diagnostic::SlugCollision {
                path: "/api_reference/things/getthing".to_string(),
                existing: "GET /a".to_string(),
                duplicate: "GET /b".to_string(),
            }]
        );
    }

    #[test]
    fn test_collision_error() {
        let endpoints = vec![
            endpoint(HttpMethod::Get, "/a", Some("getThing"), "things"),
            endpoint(HttpMethod::Get, "/b", Some("GETTHING"), "things"),
        ];
        let err = generate(&endpoints, &[], CollisionPolicy::Error).unwrap_err();
        assert!(matches!(err, ParseError::SlugCollision { .. }));
    }

    #[test]
    fn test_custom_route_prefix() {
        let config = NavigationConfig {
            route_prefix: "/docs/api".to_string(),
            ..NavigationConfig::default()
        };
        let endpoints = vec![endpoint(HttpMethod::Delete, "/pets/{id}", None, "pets")];
        let nav = NavigationGenerator::new(&config, CollisionPolicy::Suffix)
            .generate(&endpoints, &[])
            .unwrap();
        assert_eq!(nav.nav_paths, vec!["/docs/api/pets/delete_pets_id"]);
        assert_eq!(nav.nodes[0].children()[0].path(), Some("/docs/api/pets/delete_pets_id"));
    }
}
