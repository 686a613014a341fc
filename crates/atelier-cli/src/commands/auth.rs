use anyhow::Result;
use colored::Colorize;

use crate::auth::{self, StoredCredentials};
use crate::cli::{LoginArgs, MintArgs};
use crate::output::{print_error, print_success};

pub fn login(server: &str, args: &LoginArgs, profile: &str) -> Result<()> {
    let token = args.token.trim();
    if token.is_empty() {
        anyhow::bail!("--token must not be empty");
    }
    let creds = StoredCredentials {
        server: Some(server.to_string()),
        access_token: token.to_string(),
    };
    auth::save_credentials(profile, &creds)?;
    print_success(&format!("Saved bearer token for {}", server.cyan()));
    Ok(())
}

pub fn logout(profile: &str) -> Result<()> {
    if auth::remove_credentials(profile)? {
        print_success("Logged out (credentials removed)");
    } else {
        println!("No credentials found for profile \"{profile}\"");
    }
    Ok(())
}

pub fn whoami(profile: &str) -> Result<()> {
    match auth::load_credentials(profile)? {
        Some(creds) => {
            println!("{}: {}", "Profile".cyan(), profile);
            println!(
                "{}: {}",
                "Server".cyan(),
                creds.server.as_deref().unwrap_or("(not set)").cyan()
            );
            println!("{}: Bearer (token: {})", "Auth".cyan(), creds.preview());
        }
        None => {
            print_error(&format!("Not logged in (profile: \"{profile}\")"));
        }
    }
    Ok(())
}

/// Prints a freshly signed token; with `--save` also stores it for the profile.
pub fn mint(args: &MintArgs, server: Option<String>, profile: &str) -> Result<()> {
    let token = auth::mint(args)?;
    if args.save {
        let creds = StoredCredentials {
            server,
            access_token: token,
        };
        auth::save_credentials(profile, &creds)?;
        print_success(&format!(
            "Minted token for {} (roles: {}), saved to profile \"{profile}\"",
            args.subject.cyan(),
            args.roles.join(", ")
        ));
    } else {
        println!("{token}");
    }
    Ok(())
}
