use std::io::BufRead;

use clap::Args;

use crate::auth::CredentialHasher;
use crate::cli::SessionArgs;

#[derive(Args)]
pub struct HashArgs {
    /// Password to hash. Defaults to the global --password, then to the first line of stdin
    #[arg(id = "plain", value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Check the password against this hash instead of printing a new one
    #[arg(long, value_name = "HASH")]
    pub verify: Option<String>,
}

/// Execute hash subcommand
///
/// # Errors
///
/// Returns an error if the password cannot be read or hashed, or if `--verify`
/// is given and the password does not match.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: HashArgs, session: &SessionArgs, verbose: bool) -> anyhow::Result<()> {
    let hasher = CredentialHasher::new(&session.hasher_config()?)?;
    if verbose {
        eprintln!("Using {hasher:?}");
    }

    let password = match args.password.or_else(|| session.password.clone()) {
        Some(password) => password,
        None => read_password_line()?,
    };

    match &args.verify {
        Some(hash) => {
            if !hasher.verify(&password, hash) {
                anyhow::bail!("Password does not match hash");
            }
            println!("OK");
        }
        None => println!("{}", hasher.hash(password.as_bytes())?),
    }

    Ok(())
}

fn read_password_line() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
