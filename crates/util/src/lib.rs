pub mod aws_profiles;
pub mod path_processing;
pub mod preferences;

pub use aws_profiles::{DEFAULT_REGIONS, DiscoveryError, discover_profiles, discover_profiles_in};
pub use path_processing::expand_tilde;
pub use preferences::{PreferencesError, PreferencesPayload, UserPreferences};
