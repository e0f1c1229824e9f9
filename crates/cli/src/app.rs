//! Main menu definition and the interactive loop

use crate::actions;
use crate::session::{Outcome, Session};
use s3menu_core::{Error, Menu, MenuOption, Result, Selection, Terminal};
use std::io::{BufRead, Write};

pub type MainMenu<'a, I, O> = Menu<Session<'a, I, O>, Outcome>;

/// Build the main menu for `app_name`
pub fn build_menu<'a, I, O>(app_name: &str, max_invalid_choices: usize) -> Result<MainMenu<'a, I, O>>
where
    I: BufRead + 'static,
    O: Write + 'static,
{
    let prompt = format!(
        "\n********* Welcome to the  {} Application *********\n   What would you like to do?",
        app_name
    );
    let farewell = format!("Thanks for trying the {} Application.", app_name);

    Menu::new(prompt)
        .with_max_invalid_choices(max_invalid_choices)
        .option("a", titled("Create a bucket", ["A"]).action(actions::create_bucket))?
        .option(
            "b",
            titled("Upload an object to a bucket", ["B"]).action(actions::upload_object),
        )?
        .option(
            "c",
            titled("Delete an object in a bucket", ["C"]).action(actions::delete_object),
        )?
        .option("d", titled("Delete a bucket", ["D"]).action(actions::delete_bucket))?
        .option(
            "e",
            titled("Copy an object from one bucket to another", ["E"])
                .action(actions::copy_object),
        )?
        .option(
            "f",
            titled("Download an existing object from a bucket", ["F"])
                .action(actions::download_object),
        )?
        .option(
            "g",
            // The farewell carries the time of leaving, so the action prints it.
            MenuOption::new("Exit the program", "")
                .alternatives(["G", "exit", "quit", "q"])
                .action(move |s: &mut Session<'a, I, O>| {
                    s.write_line(&format!(
                        "{} It is currently {}",
                        farewell,
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
                    ))?;
                    Ok(None)
                })
                .exit(),
        )
}

/// Option whose confirmation banner repeats its display text
fn titled<C, const N: usize>(text: &str, alternatives: [&str; N]) -> MenuOption<C, Outcome> {
    MenuOption::new(text, format!("********* {} *********", text)).alternatives(alternatives)
}

/// Show the menu and dispatch choices until the exit option is chosen or
/// input runs out.
pub fn run<'a, I: BufRead, O: Write>(
    menu: &mut MainMenu<'a, I, O>,
    session: &mut Session<'a, I, O>,
) -> Result<()> {
    while !menu.should_exit() {
        menu.show_prompt(session)?;
        menu.show(session)?;

        match menu.choose_option(session) {
            Ok(Selection::Dispatched { key, result }) => {
                tracing::debug!(key = %key, outcome = ?result, "menu action finished");
            }
            Ok(Selection::Abandoned) => {
                tracing::debug!("too many invalid choices, showing the menu again");
            }
            Err(Error::InputClosed) => {
                tracing::info!("input closed, leaving");
                session.write_line("")?;
                break;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}
