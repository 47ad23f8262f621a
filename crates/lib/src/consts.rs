/// Declaration file evaluated when none is given on the command line.
pub const DEFAULT_DECLARATION_FILE: &str = "build.lua";

/// Number of hex characters kept from a SHA-256 digest for object hashes.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Name of the Lua global table exposing evaluation state.
pub const LUA_GLOBAL_TABLE: &str = "trellis";

/// Lua registry key for the set of files currently being evaluated.
pub const LOADING_REGISTRY_KEY: &str = "trellis.loading";
