use std::io;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use raft_seq_log::Config;
use raft_seq_log::Dump;

#[derive(Clone, Debug, PartialEq, Eq, clap::Parser)]
#[clap(about = "dump the entries of a sequential log store", author)]
pub struct Args {
    /// Directory that contains `store.idx` and `store.data`
    #[arg(value_name = "PATH")]
    path: PathBuf,
}

fn main() -> Result<(), io::Error> {
    let args = Args::parse();

    let config = Config::new(args.path.display());

    Dump::new(Arc::new(config)).write(stdout().lock())
}
