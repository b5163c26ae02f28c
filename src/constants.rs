//! Application-wide constants
//!
//! Single source of truth for document identifiers, file locations and
//! socket naming used throughout the application.

/// Config file location constants
pub mod config {
    /// Directory under the user config dir holding our files
    pub const APP_DIR: &str = "sections-admin";

    /// File holding the full set of site configuration documents
    pub const FILENAME: &str = "site-config.json";
}

/// Fixed identifiers of the configuration documents this app owns
pub mod documents {
    /// Key → bool map overriding per-section default visibility
    pub const SECTIONS_VISIBILITY: &str = "sections_visibility";

    /// Key → number map overriding per-section default order
    pub const SECTIONS_ORDER: &str = "sections_order";
}

/// IPC socket constants
pub mod ipc {
    /// Socket filename under the runtime (or cache) directory
    pub const SOCKET_FILENAME: &str = "config.sock";
}
