/// Application name, used for default directories and env var prefixes.
pub const APP_NAME: &str = "extdeps";

/// Program launched when no tool override is configured.
pub const DEFAULT_TOOL: &str = "conan";

/// Manifest file name conan looks for in the working directory.
pub const CONANFILE_NAME: &str = "conanfile.txt";

/// Artifact the `json` generator writes into the working directory.
pub const BUILD_INFO_NAME: &str = "conanbuildinfo.json";

/// Generator requested in every manifest. The build-info parser only understands its output.
pub const JSON_GENERATOR: &str = "json";

/// Value passed to `--build=`.
pub const DEFAULT_BUILD_POLICY: &str = "missing";

/// Length of the truncated digest shown for resolution keys.
pub const KEY_DIGEST_LEN: usize = 12;

/// Env var overriding the conan program.
pub const ENV_TOOL: &str = "EXTDEPS_CONAN";

/// Env var overriding the generated root directory.
pub const ENV_ROOT: &str = "EXTDEPS_ROOT";

/// Env var bounding the install wait, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "EXTDEPS_TIMEOUT_SECS";
