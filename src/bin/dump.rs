use std::io;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use commit_log::Config;
use commit_log::Dump;
use commit_log::Record;

#[derive(Clone, Debug, PartialEq, Eq, clap::Parser)]
#[clap(about = "dump the segments of a commit log directory", author)]
pub struct Args {
    #[arg(value_name = "PATH")]
    path: PathBuf,
}

fn main() -> Result<(), io::Error> {
    let args = Args::parse();

    let config = Arc::new(Config::new(args.path.display()));

    Dump::<Record>::new(config).write_to(stdout())
}
