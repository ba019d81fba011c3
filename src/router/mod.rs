//! Route table and history-based navigation.
//!
//! Paths are matched exactly. A path with no route resolves to `None`; the
//! caller renders nothing for it.

mod history;

pub use history::History;

use crate::views::View;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RouterError {
    #[error("route path {0:?} is already declared")]
    DuplicatePath(String),
    #[error("route path {0:?} must start with '/'")]
    InvalidPath(String),
}

#[derive(Debug, Clone)]
pub struct Route<V> {
    pub path: String,
    pub view: V,
}

/// Ordered (path, view) pairs with unique paths.
#[derive(Debug, Clone)]
pub struct RouteTable<V> {
    routes: Vec<Route<V>>,
}

impl<V> Default for RouteTable<V> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<V: Copy> RouteTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: impl Into<String>, view: V) -> Result<Self, RouterError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(RouterError::InvalidPath(path));
        }
        if self.routes.iter().any(|r| r.path == path) {
            return Err(RouterError::DuplicatePath(path));
        }
        self.routes.push(Route { path, view });
        Ok(self)
    }

    pub fn resolve(&self, path: &str) -> Option<V> {
        self.routes.iter().find(|r| r.path == path).map(|r| r.view)
    }

    pub fn routes(&self) -> &[Route<V>] {
        &self.routes
    }
}

pub struct Router<V> {
    table: RouteTable<V>,
    history: History,
}

impl<V: Copy> Router<V> {
    pub fn new(table: RouteTable<V>, start_path: impl Into<String>) -> Self {
        Self {
            table,
            history: History::new(start_path),
        }
    }

    pub fn current_path(&self) -> &str {
        self.history.current()
    }

    /// View matched by the current path, if any.
    pub fn current_view(&self) -> Option<V> {
        self.table.resolve(self.history.current())
    }

    pub fn navigate(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        let moved = self.history.push(path);
        if moved {
            tracing::info!(
                path = %self.current_path(),
                matched = self.current_view().is_some(),
                depth = self.history.len(),
                "Navigated"
            );
        }
        moved
    }

    pub fn back(&mut self) -> bool {
        let moved = self.history.back();
        if moved {
            tracing::info!(path = %self.current_path(), "Navigated back");
        }
        moved
    }

    pub fn forward(&mut self) -> bool {
        let moved = self.history.forward();
        if moved {
            tracing::info!(path = %self.current_path(), "Navigated forward");
        }
        moved
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    pub fn table(&self) -> &RouteTable<V> {
        &self.table
    }
}

/// The application's router: `/` renders the home view.
pub fn main_router(start_path: &str) -> Result<Router<View>, RouterError> {
    let table = RouteTable::new().route("/", View::Home)?;
    Ok(Router::new(table, start_path))
}
