//! Profile catalog port
//!
//! Role composition lives outside this core; it only needs each profile's
//! allowed tool names and its opaque prompt text.

use board_domain::Profile;

pub trait ProfileCatalog: Send + Sync {
    fn profile(&self, name: &str) -> Option<Profile>;

    /// All profile names, sorted
    fn profile_names(&self) -> Vec<String>;
}
