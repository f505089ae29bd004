//! Intent parsing for the line-oriented driver

use anyhow::{Context, Result, anyhow, bail};
use inbox::{FilterMode, MessageId};
use std::str::FromStr;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectPage(u32),
    Next,
    Previous,
    Retry,
    Open(MessageId),
    ToggleFavorite(MessageId),
    MarkRead(MessageId),
    SetFilter(FilterMode),
    Back,
    Reset,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  page <n>          show page n (also: selectPage)
  next | prev       move one page forward or back
  retry             fetch the current page again
  open <id>         open a message (also: selectItem)
  star <id>         toggle favorite (also: toggleFavorite)
  read <id>         mark a message read
  filter <mode>     all, favorites, read or unread (also: setFilterMode)
  back              close the open message (also: goBack)
  reset             discard all local read/favorite edits
  show              print the current view
  quit";

impl FromStr for Intent {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let command = words
            .next()
            .ok_or_else(|| anyhow!("Empty command"))?
            .to_ascii_lowercase();
        let argument = words.next();
        if words.next().is_some() {
            bail!("Too many arguments: {}", line.trim());
        }

        let id = || {
            argument
                .map(MessageId::new)
                .with_context(|| format!("'{}' needs a message id", command))
        };

        let intent = match command.as_str() {
            "page" | "selectpage" => {
                let page = argument.with_context(|| format!("'{}' needs a page number", command))?;
                let page = page
                    .parse()
                    .with_context(|| format!("Not a page number: {}", page))?;
                Intent::SelectPage(page)
            }
            "next" => Intent::Next,
            "prev" | "previous" => Intent::Previous,
            "retry" | "reload" => Intent::Retry,
            "open" | "selectitem" => Intent::Open(id()?),
            "star" | "togglefavorite" => Intent::ToggleFavorite(id()?),
            "read" => Intent::MarkRead(id()?),
            "filter" | "setfiltermode" => {
                let mode = argument.with_context(|| format!("'{}' needs a mode", command))?;
                Intent::SetFilter(mode.parse()?)
            }
            "back" | "goback" => Intent::Back,
            "reset" => Intent::Reset,
            "show" | "ls" => Intent::Show,
            "help" | "?" => Intent::Help,
            "quit" | "exit" | "q" => Intent::Quit,
            other => bail!("Unknown command: {} (try 'help')", other),
        };

        let takes_argument = matches!(
            intent,
            Intent::SelectPage(_)
                | Intent::Open(_)
                | Intent::ToggleFavorite(_)
                | Intent::MarkRead(_)
                | Intent::SetFilter(_)
        );
        if !takes_argument && argument.is_some() {
            bail!("'{}' takes no arguments", command);
        }
        Ok(intent)
    }
}
