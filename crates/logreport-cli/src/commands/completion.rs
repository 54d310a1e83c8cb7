use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Print a `logreport` completion script for `shell`
pub fn execute(shell: Shell, cmd: &mut Command) -> Result<()> {
    write_completions(shell, cmd, &mut io::stdout().lock());
    Ok(())
}

pub fn write_completions<W: Write>(shell: Shell, cmd: &mut Command, out: &mut W) {
    let bin_name = cmd.get_name().to_string();
    tracing::debug!("Generating {} completions for {}", shell, bin_name);
    generate(shell, cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    #[test]
    fn test_zsh_completions_name_subcommands() {
        let mut cmd = Command::new("logreport")
            .subcommand(Command::new("stats").arg(Arg::new("file")))
            .subcommand(Command::new("analyze"));
        let mut out = Vec::new();

        write_completions(Shell::Zsh, &mut cmd, &mut out);

        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("#compdef logreport"));
        assert!(script.contains("stats"));
    }
}
