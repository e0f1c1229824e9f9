//! Context handed to every menu action

use crate::terminal::Console;
use console::style;
use s3menu_core::{Error, MenuConfig, ObjectStore, Result, Terminal};
use std::io::{BufRead, Write};

/// Printed whenever a storage call fails
pub const FAILURE_MESSAGE: &str = "Uh oh. Something went wrong...\n";

/// How an action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation succeeded and, when enabled, the listing agrees
    Completed,
    /// The mutation succeeded but the follow-up listing does not show it yet
    Unconfirmed,
    /// Bad input or local path; nothing was sent to storage
    Aborted,
    /// The storage service returned an error
    Failed,
}

/// Terminal, storage handle and settings for one interactive run
pub struct Session<'a, I, O> {
    console: Console<I, O>,
    store: &'a dyn ObjectStore,
    settings: MenuConfig,
}

impl<'a, I: BufRead, O: Write> Session<'a, I, O> {
    pub fn new(console: Console<I, O>, store: &'a dyn ObjectStore, settings: MenuConfig) -> Self {
        Self {
            console,
            store,
            settings,
        }
    }

    pub fn store(&self) -> &'a dyn ObjectStore {
        self.store
    }

    #[cfg(test)]
    pub fn console(&self) -> &Console<I, O> {
        &self.console
    }

    /// Wait for enter, when pausing is enabled
    pub fn pause(&mut self) -> Result<()> {
        if self.settings.pause_after_action {
            self.ask("Press enter to continue.")?;
        }
        Ok(())
    }

    /// Report why an action stopped early and go back to the menu
    pub fn abort(&mut self, reason: &str) -> Result<Outcome> {
        tracing::debug!(reason, "action aborted");
        if self.settings.pause_after_action {
            self.ask(&format!("{} Press enter to go back to the main menu.", reason))?;
        } else {
            self.write_line(reason)?;
        }
        Ok(Outcome::Aborted)
    }

    pub fn success(&mut self, message: &str) -> Result<()> {
        self.write_line(&style(message).green().to_string())
    }

    /// Let the user pick one of `items` by index.
    ///
    /// Returns `None` when there is nothing to pick or the answer is not a
    /// listed index.
    pub fn select(&mut self, items: Vec<String>, prompt: &str) -> Result<Option<String>> {
        if items.is_empty() {
            self.write_line("No items to choose from.")?;
            return Ok(None);
        }

        for (index, item) in items.iter().enumerate() {
            self.write_line(&format!("{}: {}", index, item))?;
        }
        self.write_line("")?;

        let choice = self.ask(prompt)?;
        let choice = choice.trim();
        // Only the exact index as listed; `parse` alone would take "+1" or "01".
        let picked = (0..items.len())
            .find(|index| index.to_string() == choice)
            .and_then(|index| items.into_iter().nth(index));

        Ok(picked)
    }

    pub fn select_bucket(&mut self, prompt: &str) -> Result<Option<String>> {
        let buckets = self.store.list_buckets()?;
        self.select(buckets, prompt)
    }

    pub fn select_object(&mut self, bucket: &str, prompt: &str) -> Result<Option<String>> {
        let objects = self.store.list_objects(bucket)?;
        self.select(objects, prompt)
    }

    /// Run an advisory read-after-write check.
    ///
    /// The mutation already succeeded, so a failing or disagreeing check
    /// only downgrades the outcome to [`Outcome::Unconfirmed`].
    pub fn confirm<F>(&mut self, what: &str, check: F) -> Result<Outcome>
    where
        F: FnOnce(&dyn ObjectStore) -> Result<bool>,
    {
        if !self.settings.verify_writes {
            return Ok(Outcome::Completed);
        }

        match check(self.store) {
            Ok(true) => Ok(Outcome::Completed),
            Ok(false) => {
                tracing::warn!(what, "read-after-write check did not observe the change");
                self.write_line(&format!(
                    "{} succeeded, but the listing does not reflect it yet.\n",
                    what
                ))?;
                Ok(Outcome::Unconfirmed)
            }
            Err(err) => {
                tracing::warn!(what, error = %err, "read-after-write check failed");
                self.write_line(&format!(
                    "{} succeeded, but it could not be verified: {}\n",
                    what, err
                ))?;
                Ok(Outcome::Unconfirmed)
            }
        }
    }

    /// Turn the result of an action body into the value returned to the menu.
    ///
    /// Errors are printed and reported as [`Outcome::Failed`], except for
    /// closed input which ends the session.
    pub fn conclude(&mut self, result: Result<Outcome>) -> Result<Option<Outcome>> {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(Error::InputClosed) => return Err(Error::InputClosed),
            Err(err) => {
                tracing::error!(error = %err, "action failed");
                self.write_line(&err.to_string())?;
                self.write_line(&style(FAILURE_MESSAGE).red().to_string())?;
                Outcome::Failed
            }
        };

        if outcome != Outcome::Aborted {
            self.pause()?;
        }

        Ok(Some(outcome))
    }
}

impl<I: BufRead, O: Write> Terminal for Session<'_, I, O> {
    fn read_line(&mut self) -> Result<String> {
        self.console.read_line()
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.console.write_line(line)
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.console.ask(prompt)
    }
}
