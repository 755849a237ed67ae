/// Decode options applied while building the value tree.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum nesting of arrays, maps and tags accepted in a payload.
    pub max_recursion: usize,
    /// Promote text strings holding an RFC 3339 date-time to timestamp nodes.
    pub text_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_recursion: 128,
            text_timestamps: true,
        }
    }
}
