//! Radix tree node.
//!
//! One node per path segment. Static children are kept sorted for binary
//! search; a node has at most one parameter child and one wildcard child.

use crate::method_router::MethodRouter;
use crate::params::Params;

/// Kind of path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal segment, e.g. `game`.
    Static,
    /// Named parameter, e.g. `{id}`.
    Param(String),
    /// Catch-all, e.g. `*rest`. Must be last.
    Wildcard(String),
}

/// A node in the routing tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    segment: String,
    kind: SegmentKind,
    methods: Option<MethodRouter<T>>,
    static_children: Vec<Node<T>>,
    param_child: Option<Box<Node<T>>>,
    wildcard_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn with_kind(segment: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            segment: segment.into(),
            kind,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates the root node.
    #[must_use]
    pub fn root() -> Self {
        Self::with_kind("", SegmentKind::Static)
    }

    /// Returns the segment text this node was built from.
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Returns the kind of segment.
    #[must_use]
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// Inserts a route template, merging with any methods already present.
    ///
    /// # Panics
    ///
    /// Panics if a wildcard segment is not the last segment of `path`.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) {
        let segments = parse_path(path);
        self.insert_segments(&segments, methods);
    }

    fn insert_segments(&mut self, segments: &[(String, SegmentKind)], methods: MethodRouter<T>) {
        let Some(((segment, kind), remaining)) = segments.split_first() else {
            match &mut self.methods {
                Some(existing) => existing.merge(methods),
                None => self.methods = Some(methods),
            }
            return;
        };

        match kind {
            SegmentKind::Static => {
                let idx = match self.find_static_index(segment) {
                    Ok(idx) => idx,
                    Err(idx) => {
                        self.static_children
                            .insert(idx, Node::with_kind(segment.clone(), SegmentKind::Static));
                        idx
                    }
                };
                self.static_children[idx].insert_segments(remaining, methods);
            }
            SegmentKind::Param(_) => self
                .param_child
                .get_or_insert_with(|| Box::new(Node::with_kind(segment.clone(), kind.clone())))
                .insert_segments(remaining, methods),
            SegmentKind::Wildcard(_) => {
                assert!(
                    remaining.is_empty(),
                    "wildcard must be the last segment in a route"
                );
                self.wildcard_child
                    .get_or_insert_with(|| Box::new(Node::with_kind(segment.clone(), kind.clone())))
                    .insert_segments(&[], methods);
            }
        }
    }

    /// Matches a request path, returning the method table and captured params.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    // Priority: static, then parameter, then wildcard. Params captured on a
    // failed branch are rolled back before the next branch is tried.
    fn match_segments<'a>(&'a self, segments: &[&str], params: &mut Params) -> Option<&'a MethodRouter<T>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        if let Ok(idx) = self.find_static_index(segment) {
            if let Some(found) = self.static_children[idx].match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.clone(), *segment);
                if let Some(found) = child.match_segments(remaining, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let SegmentKind::Wildcard(name) = &child.kind {
                if let Some(methods) = &child.methods {
                    params.push(name.clone(), segments.join("/"));
                    return Some(methods);
                }
            }
        }

        None
    }

    fn find_static_index(&self, segment: &str) -> Result<usize, usize> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
    }
}

fn parse_path(path: &str) -> Vec<(String, SegmentKind)> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            let kind = if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                SegmentKind::Param(name.to_string())
            } else if let Some(name) = s.strip_prefix('*') {
                SegmentKind::Wildcard(name.to_string())
            } else {
                SegmentKind::Static
            };
            (s.to_string(), kind)
        })
        .collect()
}
