//! Binary using the identity stream policy: host writes go to the
//! stream the trace hints at, GC never changes a page's stream (§6).

use anyhow::Result;

use ftlsim::cli;
use ftlsim::policy::IdentityPolicy;

fn main() -> Result<()> {
    let Some(args) = cli::parse_args() else {
        return Ok(());
    };
    ftlsim::logging::init(args.verbose);

    let policy = IdentityPolicy::new(args.num_streams);
    cli::drive_main(&args, policy)
}
