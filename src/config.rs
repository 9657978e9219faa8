use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::data::classify::{BooleanTokens, CategoricalPolicy, InferenceOptions};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum BooleanPolicy {
    /// true/t/yes/y/1 and false/f/no/n/0.
    Broad,
    /// Only true and false.
    Strict,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CategoryPolicy {
    /// Tiny tables need at most 3 distinct values; larger ones a unique ratio below 0.5.
    SizeAware,
    /// Unique ratio below 0.5 regardless of table size.
    Uniform,
}

/// Service configuration.  Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "DTYPE_INFER_ADDR", default_value = "127.0.0.1:8000")]
    pub addr: SocketAddr,

    /// Keep analyses as JSON files in this directory (in memory when unset).
    #[arg(long, env = "DTYPE_INFER_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Where uploads are written while they are analysed (system temp dir when unset).
    #[arg(long, env = "DTYPE_INFER_UPLOAD_DIR", value_name = "DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Largest accepted upload body.
    #[arg(long, env = "DTYPE_INFER_MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// Allowed CORS origin; repeat for several.  Any origin when omitted.
    #[arg(long = "cors-origin", value_name = "ORIGIN")]
    pub cors_origins: Vec<String>,

    /// Tables with at least this many rows classify columns in parallel.
    #[arg(long, env = "DTYPE_INFER_PARALLEL_MIN_ROWS", default_value_t = 10_000)]
    pub parallel_columns_min_rows: usize,

    /// Which spellings count as booleans.
    #[arg(long, value_enum, default_value_t = BooleanPolicy::Broad)]
    pub boolean_tokens: BooleanPolicy,

    /// When string columns become categorical.
    #[arg(long, value_enum, default_value_t = CategoryPolicy::SizeAware)]
    pub categorical_policy: CategoryPolicy,
}

impl Config {
    /// Heuristic settings derived from the policy flags.
    pub fn inference_options(&self) -> InferenceOptions {
        let boolean_tokens = match self.boolean_tokens {
            BooleanPolicy::Broad => BooleanTokens::Broad,
            BooleanPolicy::Strict => BooleanTokens::Strict,
        };
        let categorical = match self.categorical_policy {
            CategoryPolicy::SizeAware => CategoricalPolicy::default(),
            CategoryPolicy::Uniform => CategoricalPolicy::UniformRatio { ratio: 0.5 },
        };
        InferenceOptions {
            boolean_tokens,
            categorical,
            ..InferenceOptions::default()
        }
    }
}
