//! Binary using the MiDA stream policy: every host write starts cold
//! (stream 0), each GC survival promotes the page one stream hotter (§6).

use anyhow::Result;

use ftlsim::cli;
use ftlsim::policy::MidaPolicy;

fn main() -> Result<()> {
    let Some(args) = cli::parse_args() else {
        return Ok(());
    };
    ftlsim::logging::init(args.verbose);

    let policy = MidaPolicy::new(args.num_streams);
    cli::drive_main(&args, policy)
}
