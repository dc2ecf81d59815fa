use std::io::{BufRead, Write};

use anyhow::Result;

use crate::store::SeriesStore;

pub const NO_COMMANDS_MESSAGE: &str = "No commands available.";
pub const CHOOSE_COMMAND_MESSAGE: &str = "Choose a command:";
pub const COMMAND_PROMPT: &str = "> ";
pub const INVALID_SELECTION_MESSAGE: &str = "Invalid selection, please try again.";
pub const EXIT_MESSAGE: &str = "Goodbye.";

/// What the menu loop should do after a command ran. Exit is ordinary control
/// flow, not an error: a command that wants the loop to stop returns
/// [`MenuFlow::Exit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFlow {
    Continue,
    Exit,
}

/// Everything a command may touch: the series store and the terminal streams.
/// Streams are injected so the loop is scriptable in tests.
pub struct Session<'a> {
    pub store: &'a mut SeriesStore,
    pub input: &'a mut dyn BufRead,
    pub output: &'a mut dyn Write,
}

impl Session<'_> {
    /// Prints a prompt and reads one trimmed line. `None` means EOF.
    pub fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

pub trait Command {
    /// Label shown in the numbered menu listing.
    fn name(&self) -> &str;

    fn execute(&self, session: &mut Session<'_>) -> Result<MenuFlow>;
}

/// The interactive driver: lists commands, reads a 1-based selection, runs
/// the chosen command, repeats until one of them asks to exit.
///
/// Invalid selections print a fixed notice and keep the loop alive; command
/// errors propagate out of the loop untouched.
pub struct Menu {
    commands: Vec<Box<dyn Command>>,
}

impl Menu {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    pub fn run(&self, session: &mut Session<'_>) -> Result<()> {
        if self.commands.is_empty() {
            writeln!(session.output, "{NO_COMMANDS_MESSAGE}")?;
            return Ok(());
        }

        loop {
            writeln!(session.output, "{CHOOSE_COMMAND_MESSAGE}")?;
            for (index, command) in self.commands.iter().enumerate() {
                writeln!(session.output, "{}: {}", index + 1, command.name())?;
            }

            let Some(line) = session.prompt(COMMAND_PROMPT)? else {
                // EOF on stdin behaves as an exit selection.
                writeln!(session.output, "{EXIT_MESSAGE}")?;
                return Ok(());
            };

            let selection = line
                .parse::<usize>()
                .ok()
                .and_then(|number| number.checked_sub(1))
                .and_then(|index| self.commands.get(index));

            let Some(command) = selection else {
                writeln!(session.output, "{INVALID_SELECTION_MESSAGE}")?;
                continue;
            };

            match command.execute(session)? {
                MenuFlow::Continue => {}
                MenuFlow::Exit => {
                    writeln!(session.output, "{EXIT_MESSAGE}")?;
                    return Ok(());
                }
            }
        }
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use anyhow::anyhow;

    use super::*;

    struct Noop;

    impl Command for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn execute(&self, session: &mut Session<'_>) -> Result<MenuFlow> {
            writeln!(session.output, "noop ran")?;
            Ok(MenuFlow::Continue)
        }
    }

    struct Quit;

    impl Command for Quit {
        fn name(&self) -> &str {
            "quit"
        }

        fn execute(&self, _session: &mut Session<'_>) -> Result<MenuFlow> {
            Ok(MenuFlow::Exit)
        }
    }

    struct Explode;

    impl Command for Explode {
        fn name(&self) -> &str {
            "explode"
        }

        fn execute(&self, _session: &mut Session<'_>) -> Result<MenuFlow> {
            Err(anyhow!("boom"))
        }
    }

    fn run_menu(menu: &Menu, input: &str) -> (Result<()>, String) {
        let mut store = SeriesStore::new();
        let mut cursor = Cursor::new(input.as_bytes().to_vec());
        let mut output: Vec<u8> = Vec::new();

        let result = {
            let mut session = Session {
                store: &mut store,
                input: &mut cursor,
                output: &mut output,
            };
            menu.run(&mut session)
        };
        (result, String::from_utf8(output).expect("utf8 output"))
    }

    #[test]
    fn empty_menu_prints_the_no_commands_message() {
        let menu = Menu::new();
        let (result, output) = run_menu(&menu, "");

        result.unwrap();
        assert!(output.contains(NO_COMMANDS_MESSAGE));
        assert!(!output.contains(CHOOSE_COMMAND_MESSAGE));
    }

    #[test]
    fn invalid_selections_keep_the_loop_alive() {
        let mut menu = Menu::new();
        menu.add_command(Box::new(Noop));
        menu.add_command(Box::new(Quit));

        let (result, output) = run_menu(&menu, "99\nnope\n1\n2\n");

        result.unwrap();
        assert_eq!(output.matches(INVALID_SELECTION_MESSAGE).count(), 2);
        assert!(output.contains("noop ran"));
        assert!(output.contains(EXIT_MESSAGE));
    }

    #[test]
    fn exit_selection_stops_the_loop() {
        let mut menu = Menu::new();
        menu.add_command(Box::new(Noop));
        menu.add_command(Box::new(Quit));

        let (result, output) = run_menu(&menu, "2\n1\n");

        result.unwrap();
        assert!(output.contains(EXIT_MESSAGE));
        // The loop stopped before the trailing "1" selection could run.
        assert!(!output.contains("noop ran"));
    }

    #[test]
    fn eof_behaves_as_exit() {
        let mut menu = Menu::new();
        menu.add_command(Box::new(Noop));

        let (result, output) = run_menu(&menu, "");

        result.unwrap();
        assert!(output.contains(EXIT_MESSAGE));
    }

    #[test]
    fn command_errors_propagate_out_of_the_loop() {
        let mut menu = Menu::new();
        menu.add_command(Box::new(Explode));

        let (result, output) = run_menu(&menu, "1\n");

        assert_eq!(result.unwrap_err().to_string(), "boom");
        assert!(!output.contains(EXIT_MESSAGE));
    }
}
