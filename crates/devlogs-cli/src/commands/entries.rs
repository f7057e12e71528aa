use devlogs_core::DevlogsError;

use crate::app::AppContext;
use crate::cli::{AddArgs, Direction, EditArgs, EntryArgs, ListArgs, MoveArgs, ShowArgs};
use crate::helpers::read_entry_body;
use crate::output::{entries_json, entries_table, entry_json, print_entry};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let entries = ctx.with_session(&args.username, false, |manager| Ok(manager.entries()?))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries_json(&entries))?);
        return Ok(());
    }
    if entries.is_empty() {
        if !ctx.quiet() {
            println!("No entries yet.");
        }
        return Ok(());
    }
    println!("{}", entries_table(&entries));
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let entry = ctx.with_session(&args.username, false, |manager| {
        let entries = manager.entries()?;
        entries
            .into_iter()
            .nth(args.position)
            .ok_or_else(|| DevlogsError::EntryNotFound(args.position).into())
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entry_json(&entry))?);
    } else {
        print_entry(args.position, &entry, ctx.quiet());
    }
    Ok(())
}

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let entry = ctx.with_session(&args.username, true, |manager| {
        let body = read_entry_body(args.body.clone(), "")?;
        Ok(manager.add_entry(&args.title, &body)?)
    })?;

    if !ctx.quiet() {
        println!("Added entry #{} '{}'", entry.position(), entry.title());
    }
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let entry = ctx.with_session(&args.username, true, |manager| {
        let current = manager
            .entries()?
            .into_iter()
            .nth(args.position)
            .ok_or(DevlogsError::EntryNotFound(args.position))?;

        let title = args
            .title
            .clone()
            .unwrap_or_else(|| current.title().to_string());
        let body = match (&args.body, &args.title) {
            (Some(body), _) => body.clone(),
            // Title-only edits keep the body as is
            (None, Some(_)) => current.body().to_string(),
            (None, None) => read_entry_body(None, current.body())?,
        };
        Ok(manager.update_entry(args.position, &title, &body)?)
    })?;

    if !ctx.quiet() {
        println!("Edited entry #{} '{}'", args.position, entry.title());
    }
    Ok(())
}

pub fn handle_rm(ctx: &AppContext, args: &EntryArgs) -> anyhow::Result<()> {
    let removed = ctx.with_session(&args.username, true, |manager| {
        Ok(manager.delete_entry(args.position)?)
    })?;

    if !ctx.quiet() {
        println!("Removed entry #{} '{}'", args.position, removed.title());
    }
    Ok(())
}

pub fn handle_move(ctx: &AppContext, args: &MoveArgs) -> anyhow::Result<()> {
    let target = ctx.with_session(&args.username, true, |manager| {
        match args.direction {
            Direction::Up => {
                manager.move_entry_up(args.position)?;
                Ok(args.position.saturating_sub(1))
            }
            Direction::Down => {
                let last = manager.entries()?.len().saturating_sub(1);
                manager.move_entry_down(args.position)?;
                Ok((args.position + 1).min(last))
            }
        }
    })?;

    if !ctx.quiet() {
        println!("Moved entry #{} to #{}", args.position, target);
    }
    Ok(())
}
