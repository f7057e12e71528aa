use devlogs_core::DevlogsError;
use secrecy::ExposeSecret;

use crate::app::AppContext;
use crate::cli::{AccountArgs, DeleteAccountArgs, SignupArgs};
use crate::constants::PASSWORD_ENV;
use crate::errors::CliError;
use crate::helpers::{
    confirm, is_interactive, password_from_env, prompt_new_password, prompt_password,
};

pub fn handle_signup(ctx: &AppContext, args: &SignupArgs) -> anyhow::Result<()> {
    let password = prompt_new_password()?;
    let account = ctx
        .store()
        .create(&args.username, password.expose_secret(), args.overwrite)?;

    if !ctx.quiet() {
        println!(
            "Created account '{}' at {}",
            account.username(),
            ctx.store().path_for(account.username()).display()
        );
    }
    Ok(())
}

pub fn handle_delete_account(ctx: &AppContext, args: &DeleteAccountArgs) -> anyhow::Result<()> {
    // Proves the password, with lockout, before anything is removed
    ctx.with_session(&args.username, false, |_| Ok(()))?;

    if !args.yes {
        if !is_interactive() {
            return Err(CliError::invalid_input(
                "Refusing to delete without confirmation. Pass --yes to skip the prompt.",
            )
            .into());
        }
        let prompt = format!(
            "Delete account '{}' and all of its entries? This cannot be undone",
            args.username
        );
        if !confirm(&prompt)? {
            if !ctx.quiet() {
                println!("Aborted.");
            }
            return Ok(());
        }
    }

    ctx.store().delete(&args.username)?;
    if !ctx.quiet() {
        println!("Deleted account '{}'", args.username);
    }
    Ok(())
}

pub fn handle_check(ctx: &AppContext, args: &AccountArgs) -> anyhow::Result<()> {
    if !ctx.store().exists(&args.username) {
        return Err(DevlogsError::AccountNotFound(args.username.clone()).into());
    }
    let password = match password_from_env() {
        Some(password) => password,
        None if is_interactive() => prompt_password(&args.username)?,
        None => {
            return Err(anyhow::anyhow!(
                "No password provided and no TTY available. Set {}.",
                PASSWORD_ENV
            ))
        }
    };

    if ctx
        .store()
        .check_auth(&args.username, password.expose_secret())?
    {
        if !ctx.quiet() {
            println!("Password unlocks '{}'", args.username);
        }
        Ok(())
    } else {
        Err(CliError::auth_failed("Incorrect password.").into())
    }
}
