use clap::Parser;
use std::path::PathBuf;

use rs_1brc_stream::config::{Config, DEFAULT_CHUNK_SIZE, DEFAULT_INPUT, DEFAULT_MAX_TOKEN_LEN};

#[derive(Debug, Parser)]
#[command(name = "rs_1brc_stream")]
#[command(version, about = "Per-station min/avg/max over a `name;value` measurement file")]
pub struct Cli {
    /// Measurement file to read
    #[arg(env = "MEASUREMENTS_PATH", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Bytes requested per read
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Longest accepted name or value token
    #[arg(long, default_value_t = DEFAULT_MAX_TOKEN_LEN)]
    pub max_token_len: usize,

    /// Log how long each phase takes
    #[arg(long, env = "PROFILE")]
    pub profile: bool,

    /// Compare the output against this file and fail on mismatch
    #[arg(long)]
    pub expected: Option<PathBuf>,
}

impl Cli {
    pub fn to_config(&self) -> Config {
        Config::new(&self.input)
            .with_chunk_size(self.chunk_size)
            .with_max_token_len(self.max_token_len)
            .with_profile(self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_into_config() {
        let cli = Cli::try_parse_from([
            "rs_1brc_stream",
            "data/m.txt",
            "--chunk-size",
            "4096",
            "--max-token-len",
            "200",
            "--profile",
        ])
        .unwrap();
        let config = cli.to_config();
        assert_eq!(config.input, PathBuf::from("data/m.txt"));
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.max_token_len, 200);
        assert!(config.profile);
        assert!(cli.expected.is_none());
    }

    #[test]
    fn expected_file_flag() {
        let cli = Cli::try_parse_from(["rs_1brc_stream", "m.txt", "--expected", "m.out"]).unwrap();
        assert_eq!(cli.expected, Some(PathBuf::from("m.out")));
    }
}
