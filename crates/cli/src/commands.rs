use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Stream new sheet rows to stdout as JSON lines
    Read {
        #[arg(long, help = "Connector config file (KEY=VALUE lines)")]
        config: PathBuf,

        #[arg(
            long,
            help = "File holding the last acknowledged position; read on start and updated after every record"
        )]
        position_file: Option<PathBuf>,
    },
    /// Append JSON lines from stdin to a sheet
    Write {
        #[arg(long, help = "Connector config file (KEY=VALUE lines)")]
        config: PathBuf,

        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..), help = "Records per append request")]
        batch_size: u64,
    },
    /// Print the accepted configuration keys as JSON
    Spec,
}
