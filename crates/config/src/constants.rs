//! Fixed names shared by the config layer and the host CLI

/// Directory under the platform config dir that holds `config.toml`
pub const CONFIG_DIR_NAME: &str = "pkgrecipe";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory under the platform data dir used as the default package cache
pub const CACHE_DIR_NAME: &str = "pkgrecipe";

/// Default destinations, relative to the working directory
pub const DEFAULT_PACKAGE_DIR: &str = "package";
pub const DEFAULT_IMPORT_DIR: &str = ".";

pub const ENV_OUTPUT: &str = "PKGRECIPE_OUTPUT";
pub const ENV_COLOR: &str = "PKGRECIPE_COLOR";
pub const ENV_CACHE: &str = "PKGRECIPE_CACHE";
