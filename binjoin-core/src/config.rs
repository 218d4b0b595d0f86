use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_NAME: &str = "combined_file";
pub const DEFAULT_EXTENSION: &str = "bin";
/// 100 MiB; the whole output is held in memory.
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 100 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineConfig {
    pub output_base_name: String,
    pub output_extension: String,
    /// Emit `--- FILE <n> SEPARATOR ---` before every file but the first.
    pub insert_separators: bool,
    /// Prefix the output with an `FMETA{json}ENDMETA` header.
    pub include_metadata_header: bool,
    pub max_total_bytes: u64,
    /// When true, pin `generatedAt` to the Unix epoch for reproducible output.
    pub deterministic: bool,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            output_base_name: DEFAULT_BASE_NAME.to_string(),
            output_extension: DEFAULT_EXTENSION.to_string(),
            insert_separators: false,
            include_metadata_header: false,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            deterministic: false,
        }
    }
}

impl CombineConfig {
    /// `{base}.{ext}` with the extension lower-cased and stripped of leading dots.
    pub fn file_name(&self) -> String {
        let base = sanitize_base(&self.output_base_name);
        let ext = normalize_extension(&self.output_extension);
        if ext.is_empty() {
            base
        } else {
            format!("{base}.{ext}")
        }
    }
}

pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

fn sanitize_base(base: &str) -> String {
    let trimmed = base.trim();
    if trimmed.is_empty() {
        return DEFAULT_BASE_NAME.to_string();
    }
    trimmed
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}
