//! Generic text menu: a prompt, keyed options and a dispatch loop.
//!
//! The engine knows nothing about storage. Each option carries an action
//! that receives the caller's context `C`, which must also provide line
//! based terminal I/O through [`Terminal`].

use crate::error::{Error, Result};

/// Line based terminal used by the menu and by actions.
pub trait Terminal {
    /// Read one line, without its trailing newline.
    ///
    /// Returns [`Error::InputClosed`] once input is exhausted.
    fn read_line(&mut self) -> Result<String>;

    /// Write one line of output.
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Write `prompt` without a newline, then read the answer.
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Action bound to a menu option.
pub type Action<C, R> = Box<dyn Fn(&mut C) -> Result<Option<R>>>;

/// A single entry in a [`Menu`].
pub struct MenuOption<C, R> {
    display_text: String,
    confirmation_text: String,
    action: Action<C, R>,
    is_exit: bool,
    alternatives: Vec<String>,
}

impl<C, R> MenuOption<C, R> {
    /// Create an option whose action does nothing.
    pub fn new(display_text: impl Into<String>, confirmation_text: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            confirmation_text: confirmation_text.into(),
            action: Box::new(|_: &mut C| Ok(None)),
            is_exit: false,
            alternatives: Vec::new(),
        }
    }

    /// Bind the action run when this option is chosen.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) -> Result<Option<R>> + 'static,
    {
        self.action = Box::new(action);
        self
    }

    /// Mark this option as the one that ends the session.
    pub fn exit(mut self) -> Self {
        self.is_exit = true;
        self
    }

    /// Extra tokens accepted in place of the option's key.
    pub fn alternatives<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternatives.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn confirmation_text(&self) -> &str {
        &self.confirmation_text
    }

    pub fn is_exit(&self) -> bool {
        self.is_exit
    }

    pub fn alternative_tokens(&self) -> &[String] {
        &self.alternatives
    }

    fn accepts(&self, input: &str) -> bool {
        self.alternatives.iter().any(|alt| alt == input)
    }
}

/// Result of one call to [`Menu::choose_option`].
#[derive(Debug, PartialEq)]
pub enum Selection<R> {
    /// An option was dispatched; `result` is what its action returned.
    Dispatched { key: String, result: Option<R> },
    /// Too many invalid choices in a row; nothing was dispatched.
    Abandoned,
}

/// Ordered set of options behind a prompt.
pub struct Menu<C, R> {
    prompt: String,
    options: Vec<(String, MenuOption<C, R>)>,
    should_exit: bool,
    max_invalid_choices: usize,
}

impl<C: Terminal, R> Menu<C, R> {
    /// Default number of consecutive invalid choices tolerated per call.
    pub const DEFAULT_MAX_INVALID_CHOICES: usize = 5;

    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            options: Vec::new(),
            should_exit: false,
            max_invalid_choices: Self::DEFAULT_MAX_INVALID_CHOICES,
        }
    }

    /// Set how many invalid choices in a row `choose_option` accepts
    /// before giving up. Values below one are treated as one.
    pub fn with_max_invalid_choices(mut self, max: usize) -> Self {
        self.max_invalid_choices = max.max(1);
        self
    }

    /// Register an option under `key`.
    ///
    /// Fails when the key, or any of the option's alternatives, is already
    /// taken by a key or alternative of this menu.
    pub fn add_option(&mut self, key: impl Into<String>, option: MenuOption<C, R>) -> Result<()> {
        let key = key.into();

        let mut incoming = Vec::with_capacity(option.alternatives.len() + 1);
        incoming.push(key.as_str());
        incoming.extend(option.alternatives.iter().map(String::as_str));

        for (i, token) in incoming.iter().enumerate() {
            if incoming[..i].contains(token) || self.is_taken(token) {
                return Err(Error::DuplicateSelection(token.to_string()));
            }
        }

        self.options.push((key, option));
        Ok(())
    }

    /// Builder form of [`Menu::add_option`].
    pub fn option(mut self, key: impl Into<String>, option: MenuOption<C, R>) -> Result<Self> {
        self.add_option(key, option)?;
        Ok(self)
    }

    fn is_taken(&self, token: &str) -> bool {
        self.options
            .iter()
            .any(|(key, option)| key == token || option.accepts(token))
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|(key, _)| key.as_str())
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn show_prompt(&self, term: &mut C) -> Result<()> {
        term.write_line(&self.prompt)
    }

    /// List every option in insertion order.
    pub fn show(&self, term: &mut C) -> Result<()> {
        for (key, option) in &self.options {
            term.write_line(&format!("    {}. {}", key, option.display_text))?;
        }
        Ok(())
    }

    /// Resolve raw input to the index of an option.
    ///
    /// Keys win over alternatives; among alternatives the first option in
    /// display order wins.
    pub fn resolve(&self, input: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|(key, _)| key == input)
            .or_else(|| self.options.iter().position(|(_, option)| option.accepts(input)))
    }

    /// Read a choice and dispatch it.
    ///
    /// Invalid input is reported and read again, up to the configured limit.
    pub fn choose_option(&mut self, ctx: &mut C) -> Result<Selection<R>> {
        for _ in 0..self.max_invalid_choices {
            let input = ctx.read_line()?;
            let choice = input.trim();

            let Some(index) = self.resolve(choice) else {
                tracing::debug!(input = choice, "invalid menu choice");
                ctx.write_line("Invalid choice. Please try again.\n")?;
                continue;
            };

            let (key, option) = &self.options[index];
            let key = key.clone();
            let is_exit = option.is_exit;
            tracing::debug!(key = %key, "menu option selected");

            if !option.confirmation_text.is_empty() {
                ctx.write_line(&option.confirmation_text)?;
            }
            let result = (option.action)(ctx)?;
            if is_exit {
                self.should_exit = true;
            }

            return Ok(Selection::Dispatched { key, result });
        }

        Ok(Selection::Abandoned)
    }
}
