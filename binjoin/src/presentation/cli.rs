use binjoin_core::CombineConfig;
use binjoin_core::FileId;
use binjoin_core::config::{DEFAULT_BASE_NAME, DEFAULT_MAX_TOTAL_BYTES};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "binjoin CLI: byte-level file concatenation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct OutputArgs {
    /// Directory the combined file is written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Output base name (without extension)
    #[arg(long, default_value = DEFAULT_BASE_NAME)]
    pub name: String,

    /// Output extension; a leading dot is ignored
    #[arg(long)]
    pub ext: Option<String>,

    /// Insert `--- FILE <n> SEPARATOR ---` before every file but the first
    #[arg(long)]
    pub separators: bool,

    /// Prefix the output with an FMETA{json}ENDMETA header
    #[arg(long)]
    pub metadata: bool,

    /// Upper bound for the summed input size, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_TOTAL_BYTES)]
    pub max_total: u64,

    /// Pin the header timestamp to the Unix epoch
    #[arg(long)]
    pub deterministic: bool,
}

impl OutputArgs {
    pub fn config(&self, default_ext: &str) -> CombineConfig {
        CombineConfig {
            output_base_name: self.name.clone(),
            output_extension: self.ext.clone().unwrap_or_else(|| default_ext.to_string()),
            insert_separators: self.separators,
            include_metadata_header: self.metadata,
            max_total_bytes: self.max_total,
            deterministic: self.deterministic,
        }
    }
}

/// `ID:POS`, e.g. `3:0` moves the third input to the front.
pub fn parse_move(s: &str) -> Result<(FileId, usize), String> {
    let (id, pos) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ID:POS, got `{s}`"))?;
    let id = id
        .trim()
        .parse::<FileId>()
        .map_err(|e| format!("bad id `{id}`: {e}"))?;
    let pos = pos
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad position `{pos}`: {e}"))?;
    Ok((id, pos))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Concatenate two or more files (directories expand to their files, sorted)
    Combine {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Drop an input by id (ids are 1-based in argument order)
        #[arg(long = "drop")]
        drops: Vec<FileId>,

        /// Move an input: ID:POS with a 0-based target position
        #[arg(long = "move", value_parser = parse_move)]
        moves: Vec<(FileId, usize)>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Join a PDF document and a ZIP archive, document first
    Pair {
        document: PathBuf,
        archive: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the metadata header of a combined file
    Inspect { file: PathBuf },

    /// Write a combined file's payload without its metadata header
    Strip { file: PathBuf, out: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves() {
        assert_eq!(parse_move("3:0"), Ok((3, 0)));
        assert_eq!(parse_move(" 2 : 5 "), Ok((2, 5)));
        assert!(parse_move("3").is_err());
        assert!(parse_move("x:1").is_err());
    }

    #[test]
    fn combine_flags_build_config() {
        let cli = Cli::try_parse_from([
            "binjoin", "combine", "a", "b", "--name", "out", "--ext", ".TXT", "--separators",
            "--move", "2:0",
        ])
        .unwrap();
        let Commands::Combine { inputs, moves, output, .. } = cli.command else {
            panic!("expected combine");
        };
        assert_eq!(inputs.len(), 2);
        assert_eq!(moves, vec![(2, 0)]);
        let cfg = output.config("bin");
        assert_eq!(cfg.file_name(), "out.txt");
        assert!(cfg.insert_separators);
        assert!(!cfg.include_metadata_header);
    }

    #[test]
    fn combine_requires_inputs() {
        assert!(Cli::try_parse_from(["binjoin", "combine"]).is_err());
    }
}
