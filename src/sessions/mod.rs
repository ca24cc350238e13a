//! Assessment sessions — storage, page transitions and the HTTP surface.

pub mod manager;
pub mod routes;
pub mod store;
pub mod views;

pub use manager::SessionManager;
pub use routes::{CorsOrigins, SessionRouteState, build_cors_layer, session_routes};
pub use store::{SessionEntry, SessionStore, spawn_expiry_task};
pub use views::PageView;
