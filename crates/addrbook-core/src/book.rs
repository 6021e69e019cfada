//! The address book: aliases, groups and classification lists together
//! with the configuration they depend on.

use std::path::Path;
use std::sync::mpsc::Receiver;

use addrbook_address::{Address, AddressList};
use tracing::{debug, trace, warn};

use crate::alias::{Alias, AliasEvent, AliasFile, AliasRegistry, Expander};
use crate::alternates::Alternates;
use crate::command::{CommandError, TokenFlags, Tokenizer, logical_lines};
use crate::config::Config;
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::group::{GroupList, GroupRegistry};
use crate::identity::{Identity, UserDirectory};
use crate::maillist::MailingLists;

type CommandResult = std::result::Result<(), CommandError>;

/// What a `group` or `ungroup` argument applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupState {
    None,
    Regex,
    Address,
}

/// Owns every registry and list used to resolve and classify addresses.
#[derive(Debug)]
pub struct AddressBook {
    config: Config,
    aliases: AliasRegistry,
    groups: GroupRegistry,
    alternates: Alternates,
    lists: MailingLists,
    identity: Identity,
}

impl AddressBook {
    /// Creates an empty address book.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured GECOS mask does not compile.
    pub fn new(config: Config, directory: Box<dyn UserDirectory>) -> Result<Self> {
        let identity = Identity::new(directory, &config.gecos_mask)?;
        Ok(Self {
            config,
            aliases: AliasRegistry::new(),
            groups: GroupRegistry::new(),
            alternates: Alternates::new(),
            lists: MailingLists::new(),
            identity,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the alias registry.
    #[must_use]
    pub const fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    /// Returns the group registry.
    #[must_use]
    pub const fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    /// Returns the user's alternate addresses.
    #[must_use]
    pub const fn alternates(&self) -> &Alternates {
        &self.alternates
    }

    /// Returns the known mailing lists.
    #[must_use]
    pub const fn mailing_lists(&self) -> &MailingLists {
        &self.lists
    }

    /// Registers for alias change notifications.
    pub fn subscribe(&mut self) -> Receiver<AliasEvent> {
        self.aliases.subscribe()
    }

    /// Runs the configuration commands on one line.
    ///
    /// # Errors
    ///
    /// Returns the first failing command's error; commands after it on
    /// the same line are not run.
    pub fn execute(&mut self, line: &str) -> CommandResult {
        let mut tok = Tokenizer::new(line);
        while !tok.at_end() {
            if tok.next_command() {
                continue;
            }
            let command = tok.next_token(TokenFlags::WORD);
            self.dispatch(&command, &mut tok)?;
            if !tok.next_command() {
                break;
            }
        }
        Ok(())
    }

    /// Runs every line of a configuration text.
    ///
    /// Lines ending in a backslash continue on the next line. A failing
    /// line is reported and skipped.
    ///
    /// Returns the failures with their line numbers.
    pub fn source(&mut self, text: &str) -> Vec<(usize, CommandError)> {
        let mut failures = Vec::new();
        for (number, line) in logical_lines(text.lines()) {
            if let Err(e) = self.execute(&line) {
                warn!("line {number}: {e}");
                failures.push((number, e));
            }
        }
        failures
    }

    /// Runs a configuration file stored in the alias file charset.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn source_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<(usize, CommandError)>> {
        let path = path.as_ref();
        debug!("sourcing {}", path.display());
        let text = AliasFile::new(path)
            .with_charset(self.config.alias_charset()?)
            .read()?;
        Ok(self.source(&text))
    }

    fn dispatch(&mut self, command: &str, tok: &mut Tokenizer<'_>) -> CommandResult {
        match command {
            "alias" => self.parse_alias(tok),
            "unalias" => self.parse_unalias(tok),
            "group" => self.parse_group(tok, false),
            "ungroup" => self.parse_group(tok, true),
            "alternates" => {
                let mut groups = GroupList::new();
                let result = each_word(command, tok, |tok, first| {
                    let pattern = parse_grouplist(&mut groups, &mut self.groups, tok, first)?;
                    self.alternates.add(&pattern)?;
                    groups.add_regex(&mut self.groups, &pattern)?;
                    Ok(())
                });
                if result.is_err() {
                    groups.remove_empty(&mut self.groups);
                }
                result
            }
            "unalternates" => each_word(command, tok, |_, pattern| {
                Ok(self.alternates.remove(&pattern)?)
            }),
            "lists" | "subscribe" => {
                let subscribe = command == "subscribe";
                let mut groups = GroupList::new();
                let result = each_word(command, tok, |tok, first| {
                    let pattern = parse_grouplist(&mut groups, &mut self.groups, tok, first)?;
                    if subscribe {
                        self.lists.subscribe(&pattern)?;
                    } else {
                        self.lists.add_list(&pattern)?;
                    }
                    groups.add_regex(&mut self.groups, &pattern)?;
                    Ok(())
                });
                if result.is_err() {
                    groups.remove_empty(&mut self.groups);
                }
                result
            }
            "unlists" => each_word(command, tok, |_, pattern| {
                Ok(self.lists.remove_list(&pattern)?)
            }),
            "unsubscribe" => each_word(command, tok, |_, pattern| {
                Ok(self.lists.unsubscribe(&pattern)?)
            }),
            _ => Err(CommandError::error(format!("{command}: unknown command"))),
        }
    }

    // alias [-group NAME]... NAME ADDRESS-LIST [# COMMENT [tags:T1,T2]]
    fn parse_alias(&mut self, tok: &mut Tokenizer<'_>) -> CommandResult {
        if !tok.more_args() {
            return Err(CommandError::warning("alias: no address"));
        }

        let mut groups = GroupList::new();
        let first = tok.next_token(TokenFlags::WORD);
        let name = parse_grouplist(&mut groups, &mut self.groups, tok, first)?;

        let text = tok.next_token(TokenFlags::ADDRESS);
        let mut addresses = AddressList::new();
        if addresses.parse2(&text).unwrap_or(0) == 0 {
            groups.remove_empty(&mut self.groups);
            return Err(CommandError::error(format!(
                "Warning: Bad address '{}' in alias '{name}'",
                text.trim_end()
            )));
        }

        if let Err(errors) = addresses.to_intl(self.config.idn_options()) {
            let mailbox = errors
                .first()
                .and_then(addrbook_address::Error::mailbox)
                .unwrap_or_default();
            groups.remove_empty(&mut self.groups);
            return Err(CommandError::error(format!(
                "Warning: Bad IDN '{mailbox}' in alias '{name}'"
            )));
        }

        groups.add_addrlist(&mut self.groups, &addresses);

        let mut alias = Alias::new(name, addresses);
        if let Some(comment) = tok.comment() {
            alias.parse_comments(comment);
        }
        self.aliases.define(alias);
        Ok(())
    }

    // unalias (* | NAME...)
    fn parse_unalias(&mut self, tok: &mut Tokenizer<'_>) -> CommandResult {
        if !tok.more_args() {
            return Err(CommandError::warning("unalias: too few arguments"));
        }
        loop {
            let name = tok.next_token(TokenFlags::WORD);
            if name == "*" {
                self.aliases.delete_all();
                return Ok(());
            }
            self.aliases.delete(&name);
            if !tok.more_args() {
                return Ok(());
            }
        }
    }

    // group [-group NAME]... (-rx EXPR... | -addr ADDRESS...)
    // ungroup [-group NAME]... (* | -rx EXPR... | -addr ADDRESS...)
    fn parse_group(&mut self, tok: &mut Tokenizer<'_>, remove: bool) -> CommandResult {
        let command = if remove { "ungroup" } else { "group" };
        if !tok.more_args() {
            return Err(CommandError::warning(format!("{command}: too few arguments")));
        }

        let mut groups = GroupList::new();
        let result = self.group_words(tok, command, remove, &mut groups);
        if result.is_err() {
            groups.remove_empty(&mut self.groups);
        }
        result
    }

    fn group_words(
        &mut self,
        tok: &mut Tokenizer<'_>,
        command: &str,
        remove: bool,
        groups: &mut GroupList,
    ) -> CommandResult {
        let mut state = GroupState::None;
        loop {
            let first = tok.next_token(TokenFlags::WORD);
            let word = parse_grouplist(groups, &mut self.groups, tok, first)?;

            if remove && word == "*" {
                std::mem::take(groups).clear(&mut self.groups);
                return Ok(());
            }

            if word.eq_ignore_ascii_case("-rx") {
                state = GroupState::Regex;
            } else if word.eq_ignore_ascii_case("-addr") {
                state = GroupState::Address;
            } else {
                match state {
                    GroupState::None => {
                        return Err(CommandError::warning(format!(
                            "{command}: missing -rx or -addr"
                        )));
                    }
                    GroupState::Regex if remove => {
                        if !groups.remove_regex(&mut self.groups, &word) {
                            return Err(CommandError::error(format!(
                                "{command}: pattern '{word}' not found"
                            )));
                        }
                    }
                    GroupState::Regex => groups.add_regex(&mut self.groups, &word)?,
                    GroupState::Address => {
                        let mut list = AddressList::new();
                        if list.parse2(&word).unwrap_or(0) == 0 {
                            return Err(CommandError::error(format!(
                                "{command}: bad address '{word}'"
                            )));
                        }
                        if let Err(errors) = list.to_intl(self.config.idn_options()) {
                            let mailbox = errors
                                .first()
                                .and_then(addrbook_address::Error::mailbox)
                                .unwrap_or_default();
                            return Err(CommandError::error(format!(
                                "{command}: warning: bad IDN '{mailbox}'"
                            )));
                        }
                        if remove {
                            groups.remove_addrlist(&mut self.groups, &list);
                        } else {
                            groups.add_addrlist(&mut self.groups, &list);
                        }
                    }
                }
            }

            if !tok.more_args() {
                return Ok(());
            }
        }
    }

    /// Expands aliases in `list` and removes duplicate mailboxes.
    ///
    /// Bare local mailboxes left over are given the user's real name when
    /// known and, with `use_domain`, qualified with the host's domain.
    pub fn expand(&self, list: &mut AddressList) {
        let domain = if self.config.use_domain {
            self.config.fqdn(true)
        } else {
            None
        };
        Expander::new(&self.aliases)
            .with_identity(&self.identity)
            .with_domain(domain)
            .expand(list);
    }

    /// Expands aliases in every address field of `envelope`.
    pub fn expand_fields(&self, envelope: &mut Envelope) {
        for field in envelope.fields_mut() {
            self.expand(field);
        }
    }

    /// Picks the addresses to offer when creating an alias from a message,
    /// with the label of the header they came from.
    #[must_use]
    pub fn reply_target<'e>(&self, envelope: &'e Envelope) -> (&'static str, &'e AddressList) {
        if envelope.from.first().is_some_and(|a| self.is_user(a)) {
            if envelope.to.first().is_some_and(|a| !self.is_mail_list(a)) {
                ("To", &envelope.to)
            } else {
                ("Cc", &envelope.cc)
            }
        } else if envelope.reply_to.first().is_some_and(|a| !self.is_mail_list(a)) {
            ("Reply-To", &envelope.reply_to)
        } else {
            ("From", &envelope.from)
        }
    }

    /// Returns true if `address` belongs to the user.
    #[must_use]
    pub fn is_user(&self, address: &Address) -> bool {
        let Some(mailbox) = address.mailbox() else {
            trace!("no, no mailbox");
            return false;
        };

        if let Some(user) = self.config.username() {
            if mailbox.eq_ignore_ascii_case(&user) {
                trace!("yes, {mailbox} = {user}");
                return true;
            }
            let hosts = [
                self.config.short_hostname(),
                self.config.fqdn(false),
                self.config.fqdn(true),
            ];
            for host in hosts.into_iter().flatten() {
                if is_address_of(mailbox, &user, host) {
                    trace!("yes, {mailbox} = {user} @ {host}");
                    return true;
                }
            }
        }

        let from = self.config.from_address().ok().flatten();
        if let Some(from) = from.filter(|f| f.mailbox_eq(address)) {
            trace!("yes, {mailbox} = {}", from.mailbox().unwrap_or_default());
            return true;
        }

        if self.alternates.matches(mailbox) {
            return true;
        }

        trace!("no, all failed");
        false
    }

    /// Returns true if `address` is a known mailing list.
    #[must_use]
    pub fn is_mail_list(&self, address: &Address) -> bool {
        self.lists.is_mail_list(address)
    }

    /// Returns true if `address` is a subscribed mailing list.
    #[must_use]
    pub fn is_subscribed_list(&self, address: &Address) -> bool {
        self.lists.is_subscribed_list(address)
    }

    /// Returns true if `mailbox` is in the group called `name`.
    #[must_use]
    pub fn group_match(&self, name: &str, mailbox: &str) -> bool {
        self.groups.matches(name, mailbox)
    }

    /// Returns the alias an address is known by.
    #[must_use]
    pub fn alias_for(&self, address: &Address) -> Option<&Alias> {
        self.aliases.reverse_lookup(address)
    }

    /// Formats an address for the user, following the `idn_decode`
    /// setting.
    #[must_use]
    pub fn display(&self, address: &Address) -> String {
        address.write_display(self.config.idn_options())
    }

    /// Registers a new alias. Its domains are converted to ASCII first.
    ///
    /// # Errors
    ///
    /// Returns an error if an alias of that name exists or a domain cannot
    /// be converted.
    pub fn create_alias(&mut self, mut alias: Alias) -> Result<()> {
        let options = self.config.idn_options();
        if let Err(errors) = alias.addresses_mut().to_intl(options) {
            if let Some(first) = errors.into_iter().next() {
                return Err(Error::Address(first));
            }
        }
        self.aliases.create(alias)
    }

    /// Appends `alias` to the configured alias file.
    ///
    /// # Errors
    ///
    /// Returns an error if the alias cannot be written.
    pub fn append_alias(&self, alias: &Alias) -> Result<()> {
        AliasFile::new(self.config.alias_file_path())
            .with_charset(self.config.alias_charset()?)
            .append(alias)
    }
}

/// Reads `-group NAME` options ahead of `first`, adding each named group to
/// `list`. Returns the first word that is not part of an option.
fn parse_grouplist(
    list: &mut GroupList,
    registry: &mut GroupRegistry,
    tok: &mut Tokenizer<'_>,
    first: String,
) -> std::result::Result<String, CommandError> {
    let mut word = first;
    while word.eq_ignore_ascii_case("-group") {
        if !tok.more_args() {
            list.remove_empty(registry);
            return Err(CommandError::error("-group: no group name"));
        }
        let name = tok.next_token(TokenFlags::WORD);
        list.add(registry, &name);

        if !tok.more_args() {
            list.remove_empty(registry);
            return Err(CommandError::error("out of arguments"));
        }
        word = tok.next_token(TokenFlags::WORD);
    }
    Ok(word)
}

/// Calls `f` for every remaining word of a command that takes at least one.
fn each_word<'a>(
    command: &str,
    tok: &mut Tokenizer<'a>,
    mut f: impl FnMut(&mut Tokenizer<'a>, String) -> CommandResult,
) -> CommandResult {
    if !tok.more_args() {
        return Err(CommandError::warning(format!("{command}: too few arguments")));
    }
    loop {
        let word = tok.next_token(TokenFlags::WORD);
        f(tok, word)?;
        if !tok.more_args() {
            return Ok(());
        }
    }
}

fn is_address_of(mailbox: &str, user: &str, host: &str) -> bool {
    mailbox
        .split_once('@')
        .is_some_and(|(local, domain)| local.eq_ignore_ascii_case(user) && domain.eq_ignore_ascii_case(host))
}
