// src/main.rs

use jobdag::errors::ErrorKind;
use jobdag::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("jobdag error: {err:?}");
        std::process::exit(1);
    }

    match run(args).await {
        Ok(summary) if summary.success() => {}
        Ok(_) => std::process::exit(1),
        Err(err) => {
            eprintln!("jobdag error: {err}");
            if err.kind() == ErrorKind::Argument {
                eprintln!("See `jobdag --help`");
            }
            std::process::exit(1);
        }
    }
}
