pub mod cli;
pub mod core;
pub mod health;
pub mod models;
pub mod remote;
pub mod server;

/// Name to print above a rendered tree: the path as given, or the root
/// sentinel when the path only re-addresses the root.
pub fn display_path(path: &str) -> &str {
    if models::normalize_path(path).is_empty() {
        models::ROOT_NAME
    } else {
        path
    }
}
