//! Intent loop
//!
//! Network fetches run on the blocking pool while input keeps being read.
//! Their results are applied in order of arrival; the session drops any
//! that a newer request has superseded.

use anyhow::Result;
use inbox::{DetailTicket, Inbox, MessageSummary, NetworkError, PageOutcome, PageTicket};
use log::{debug, error, info, warn};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{JoinError, JoinSet};

use crate::commands::{HELP, Intent};
use crate::render::{OutputFormat, write_notice, write_snapshot};

/// A finished fetch waiting to be applied to the session
enum Completion {
    Page(PageTicket, Result<Vec<MessageSummary>, NetworkError>),
    Detail(DetailTicket, Result<String, NetworkError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Driver<W: Write> {
    inbox: Inbox,
    pending: JoinSet<Completion>,
    out: W,
    format: OutputFormat,
}

impl<W: Write> Driver<W> {
    pub fn new(inbox: Inbox, out: W, format: OutputFormat) -> Self {
        Self {
            inbox,
            pending: JoinSet::new(),
            out,
            format,
        }
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    /// Request the start page
    pub fn start(&mut self) {
        let ticket = self.inbox.begin_retry();
        self.spawn_page(ticket);
    }

    /// Read intents from `input` until it ends or asks to quit
    ///
    /// Fetches still running when input ends are waited for.
    pub async fn run(&mut self, input: impl AsyncBufRead + Unpin) -> Result<()> {
        let mut lines = input.lines();
        let mut input_open = true;

        loop {
            tokio::select! {
                line = lines.next_line(), if input_open => match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        if self.handle_line(&line)? == Flow::Quit {
                            info!("Quit requested");
                            break;
                        }
                    }
                    None => {
                        debug!("Input closed; waiting for {} pending fetches", self.pending.len());
                        input_open = false;
                    }
                },
                Some(joined) = self.pending.join_next() => self.apply(joined)?,
                else => break,
            }
        }
        Ok(())
    }

    /// Wait for every in-flight fetch and apply its result
    pub async fn settle(&mut self) -> Result<()> {
        while let Some(joined) = self.pending.join_next().await {
            self.apply(joined)?;
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        match line.parse::<Intent>() {
            Ok(intent) => self.handle(intent),
            Err(e) => {
                write_notice(&mut self.out, self.format, &e.to_string())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Apply one intent, starting any fetch it needs
    ///
    /// Store failures are reported and the loop continues.
    pub fn handle(&mut self, intent: Intent) -> Result<Flow> {
        debug!("Handling {:?}", intent);
        match self.dispatch(intent) {
            Ok(flow) => Ok(flow),
            Err(e) => {
                error!("Intent failed: {:#}", e);
                write_notice(&mut self.out, self.format, &format!("Error: {:#}", e))?;
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch(&mut self, intent: Intent) -> Result<Flow> {
        match intent {
            Intent::SelectPage(page) => match self.inbox.begin_page(page) {
                Some(ticket) => self.spawn_page(ticket),
                None => return self.notice(&format!("Cannot go to page {}", page)),
            },
            Intent::Next => match self.inbox.begin_next() {
                Some(ticket) => self.spawn_page(ticket),
                None => return self.notice("No more pages"),
            },
            Intent::Previous => match self.inbox.begin_previous() {
                Some(ticket) => self.spawn_page(ticket),
                None => return self.notice("Already on the first page"),
            },
            Intent::Retry => {
                let ticket = self.inbox.begin_retry();
                self.spawn_page(ticket);
            }
            Intent::Open(id) => match self.inbox.begin_select(&id)? {
                Some(ticket) => self.spawn_detail(ticket),
                None => return self.notice(&format!("No message {} on this page", id)),
            },
            Intent::ToggleFavorite(id) => {
                if self.inbox.toggle_favorite(&id)?.is_none() {
                    return self.notice(&format!("No message {} on this page", id));
                }
            }
            Intent::MarkRead(id) => {
                if !self.inbox.mark_read(&id)? {
                    return self.notice(&format!("No message {} on this page", id));
                }
            }
            Intent::SetFilter(mode) => self.inbox.set_filter(mode),
            Intent::Back => self.inbox.go_back(),
            Intent::Reset => self.inbox.reset_overrides()?,
            Intent::Show => {}
            Intent::Help => return self.notice(HELP),
            Intent::Quit => return Ok(Flow::Quit),
        }

        self.render()?;
        Ok(Flow::Continue)
    }

    fn apply(&mut self, joined: Result<Completion, JoinError>) -> Result<()> {
        let completion = match joined {
            Ok(completion) => completion,
            Err(e) => {
                error!("Fetch task failed: {}", e);
                return Ok(());
            }
        };

        let changed = match completion {
            Completion::Page(ticket, result) => match self.inbox.complete_page(ticket, result) {
                Ok(PageOutcome::Stale) => false,
                Ok(outcome) => {
                    debug!("Page {} completed: {:?}", ticket.page(), outcome);
                    true
                }
                Err(e) => {
                    warn!("Could not apply page {}: {:#}", ticket.page(), e);
                    write_notice(&mut self.out, self.format, &format!("Error: {:#}", e))?;
                    false
                }
            },
            Completion::Detail(ticket, result) => self.inbox.complete_detail(ticket, result),
        };

        if changed {
            self.render()?;
        }
        Ok(())
    }

    fn spawn_page(&mut self, ticket: PageTicket) {
        let source = self.inbox.source();
        self.pending.spawn_blocking(move || {
            let result = source.fetch_page(ticket.page());
            Completion::Page(ticket, result)
        });
    }

    fn spawn_detail(&mut self, ticket: DetailTicket) {
        let source = self.inbox.source();
        self.pending.spawn_blocking(move || {
            let result = source.fetch_body(ticket.id());
            Completion::Detail(ticket, result)
        });
    }

    fn render(&mut self) -> Result<()> {
        write_snapshot(&mut self.out, self.format, &self.inbox.snapshot())
    }

    fn notice(&mut self, text: &str) -> Result<Flow> {
        write_notice(&mut self.out, self.format, text)?;
        Ok(Flow::Continue)
    }
}
