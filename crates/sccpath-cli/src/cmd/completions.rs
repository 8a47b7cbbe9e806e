//! `sccpath completions`: print a shell completion script.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `sccpath completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the completion script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `command` to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_completions(shell, command, &mut out);
    out.flush().context("Failed to flush completion script")
}

/// Render the script under the command's own binary name.
fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    let bin_name = command.get_name().to_string();
    generate(shell, command, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn script_for(shell: Shell) -> String {
        let mut command = crate::Cli::command();
        let mut buf = Vec::new();
        write_completions(shell, &mut command, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn bash_script_covers_subcommands() {
        let script = script_for(Shell::Bash);
        assert!(script.contains("sccpath"));
        assert!(script.contains("analyze"));
        assert!(script.contains("generate"));
    }

    #[test]
    fn zsh_script_names_the_binary() {
        let script = script_for(Shell::Zsh);
        assert!(script.starts_with("#compdef sccpath"));
    }
}
