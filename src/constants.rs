/// Constants module to avoid magic strings in the codebase

// Action marker tags (the wire format embedded in assistant output)
pub const TAG_CREATE_FILE: &str = "CREATE_FILE";
pub const TAG_CREATE_DIRECTORY: &str = "CREATE_DIRECTORY";
pub const TAG_CREATE_FOLDER: &str = "CREATE_FOLDER"; // alias for CREATE_DIRECTORY
pub const TAG_DELETE_FILE: &str = "DELETE_FILE";
pub const TAG_DELETE_DIRECTORY: &str = "DELETE_DIRECTORY";
pub const TAG_MOVE_FILE: &str = "MOVE_FILE";
pub const TAG_COPY_FILE: &str = "COPY_FILE";
pub const TAG_EDIT_FILE: &str = "EDIT_FILE";

// Content block delimiters
pub const TAG_FILE_CONTENT_OPEN: &str = "[FILE_CONTENT:";
pub const TAG_FILE_CONTENT_CLOSE: &str = "[/FILE_CONTENT]";

// Configuration
pub const ENV_PREFIX: &str = "SCRIBE_";
pub const LOCAL_CONFIG_PATH: &str = ".scribe/config.toml";
pub const LOCAL_CONFIG_EXAMPLE_PATH: &str = ".scribe/config.toml.example";
