//! `addrbook` - expand mail aliases and classify addresses from the command
//! line.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;

use std::path::Path;

use addrbook_address::AddressList;
use addrbook_core::alias::{alias_line, check_alias_name};
use addrbook_core::{AddressBook, Alias, Config, PasswdFile, StaticDirectory, UserDirectory};
use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "addrbook=info,addrbook_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("cannot load configuration from {}", config_path.display()))?;

    let mut book = AddressBook::new(config, user_directory())?;

    let alias_file = book.config().alias_file_path();
    if alias_file.exists() {
        source(&mut book, &alias_file)?;
    }
    for path in &cli.source {
        source(&mut book, path)?;
    }

    match cli.command {
        Command::Expand { addresses, display } => expand(&book, &addresses.join(", "), display),
        Command::Aliases { tag } => {
            list_aliases(&book, tag.as_deref());
            Ok(())
        }
        Command::Check { addresses } => check(&book, &addresses.join(", ")),
        Command::Add {
            name,
            addresses,
            comment,
            tags,
            fix_name,
        } => add(&mut book, name, &addresses.join(", "), comment, tags, fix_name),
    }
}

fn user_directory() -> Box<dyn UserDirectory> {
    match PasswdFile::system() {
        Ok(passwd) => Box::new(passwd),
        Err(e) => {
            debug!("no password file: {e}");
            Box::new(StaticDirectory::new())
        }
    }
}

fn source(book: &mut AddressBook, path: &Path) -> Result<()> {
    let failures = book
        .source_file(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    for (line, error) in failures {
        eprintln!("{}:{line}: {error}", path.display());
    }
    Ok(())
}

fn parse(text: &str) -> Result<AddressList> {
    let mut list = AddressList::new();
    if list.parse2(text)? == 0 {
        bail!("no address in '{text}'");
    }
    Ok(list)
}

fn expand(book: &AddressBook, text: &str, display: bool) -> Result<()> {
    let mut list = parse(text)?;
    book.expand(&mut list);

    let options = book.config().idn_options();
    if display {
        let decoded = list.to_local(options);
        debug!("{decoded} domain(s) decoded");
    } else if let Err(errors) = list.to_intl(options) {
        for e in &errors {
            warn!("{e}");
        }
        bail!("{} address(es) could not be converted", errors.len());
    }

    println!("{}", list.write_wrap("To", book.config().wrap_columns));
    Ok(())
}

fn list_aliases(book: &AddressBook, tag: Option<&str>) {
    for alias in book.aliases().iter() {
        if tag.is_some_and(|t| !alias.tags().iter().any(|a| a == t)) {
            continue;
        }
        println!("{}", alias_line(alias));
    }
}

fn check(book: &AddressBook, text: &str) -> Result<()> {
    let list = parse(text)?;
    for address in list.iter().filter(|a| a.mailbox().is_some()) {
        let mut labels = Vec::new();
        if book.is_user(address) {
            labels.push("user".to_string());
        }
        if book.is_subscribed_list(address) {
            labels.push("subscribed list".to_string());
        } else if book.is_mail_list(address) {
            labels.push("mailing list".to_string());
        }
        if let Some(alias) = book.alias_for(address) {
            labels.push(format!("alias {}", alias.name()));
        }
        for group in book.groups().iter() {
            if let Some(mailbox) = address.mailbox().filter(|m| group.matches(m)) {
                debug!("{mailbox} in group {}", group.name());
                labels.push(format!("group {}", group.name()));
            }
        }

        let labels = if labels.is_empty() {
            "-".to_string()
        } else {
            labels.join(", ")
        };
        println!("{}\t{labels}", book.display(address));
    }
    Ok(())
}

fn add(
    book: &mut AddressBook,
    name: String,
    text: &str,
    comment: Option<String>,
    tags: Vec<String>,
    fix_name: bool,
) -> Result<()> {
    let name = match check_alias_name(&name) {
        Ok(()) => name,
        Err(fixed) if fix_name => {
            info!("using alias name '{fixed}' instead of '{name}'");
            fixed
        }
        Err(fixed) => {
            warn!("alias name '{name}' may not work, consider '{fixed}' (--fix-name)");
            name
        }
    };

    let mut alias = Alias::new(name, parse(text)?).with_tags(tags);
    if let Some(comment) = comment {
        alias = alias.with_comment(comment);
    }

    let name = alias.name().to_string();
    book.create_alias(alias)
        .with_context(|| format!("cannot create alias '{name}'"))?;

    // Persist the stored form, with domains already in ASCII.
    if let Some(stored) = book.aliases().get(&name) {
        book.append_alias(stored)
            .with_context(|| format!("cannot write {}", book.config().alias_file_path().display()))?;
        println!("{}", alias_line(stored));
    }
    Ok(())
}
