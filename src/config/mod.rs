//! Configuration system.
//!
//! Configuration is merged field-by-field from these tiers, lowest first:
//! 1. **Defaults** - compiled in
//! 2. **Project** - `$CWD/taskpad/config.yaml`
//! 3. **User** - `~/.taskpad/config.yaml`
//! 4. **Environment** - the variables below
//!
//! Command-line flags are applied on top by the binary.
//!
//! ## Environment Variables
//! - `TASKPAD_CONFIG_PATH` - Explicit config file (replaces the file tiers)
//! - `TASKPAD_DB_PATH` - Database path
//! - `TASKPAD_BIND` - Listen address
//! - `TASKPAD_PORT` - Listen port
//! - `TASKPAD_USER_DIR` - User config dir (default: `~/.taskpad`)
//! - `TASKPAD_PROJECT_DIR` - Project config dir (default: `./taskpad`)

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
