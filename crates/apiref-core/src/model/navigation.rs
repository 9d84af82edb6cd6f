use serde::Serialize;

use super::endpoint::HttpMethod;

/// An entry in the API reference sidebar. Groups only ever contain pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavigationNode {
    Page {
        title: String,
        path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        method: Option<HttpMethod>,
    },
    Group {
        title: String,
        children: Vec<NavigationNode>,
    },
}

impl NavigationNode {
    pub fn title(&self) -> &str {
        match self {
            NavigationNode::Page { title, .. } | NavigationNode::Group { title, .. } => title,
        }
    }

    /// Child nodes; empty for pages.
    pub fn children(&self) -> &[NavigationNode] {
        match self {
            NavigationNode::Page { .. } => &[],
            NavigationNode::Group { children, .. } => children,
        }
    }

    /// The navigable path of a page.
    pub fn path(&self) -> Option<&str> {
        match self {
            NavigationNode::Page { path, .. } => Some(path),
            NavigationNode::Group { .. } => None,
        }
    }
}
