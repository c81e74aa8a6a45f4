use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Command};
use clap_complete::{Shell, generate};

/// Arguments for `centra completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the script for.
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to this file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Write the completion script for `command` to `out`, registered under the
/// command's own name.
pub fn write_completions(shell: Shell, command: &mut Command, out: &mut dyn Write) {
    let bin_name = command.get_name().to_string();
    generate(shell, command, bin_name, out);
}

/// Generate the completion script to stdout or `--output`.
///
/// # Errors
///
/// Returns an error if the output file cannot be created or written.
pub fn run_completions(args: &CompletionsArgs, command: &mut Command) -> Result<()> {
    match args.output {
        Some(ref path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_completions(args.shell, command, &mut out);
            out.flush()
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            let mut out = io::stdout().lock();
            write_completions(args.shell, command, &mut out);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_command() -> Command {
        Command::new("centra").subcommand(Command::new("rank"))
    }

    #[test]
    fn script_registers_the_command_name() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut sample_command(), &mut buf);
        let script = String::from_utf8(buf).expect("utf8 script");
        assert!(script.contains("centra"));
        assert!(script.contains("rank"));
    }

    #[test]
    fn output_flag_writes_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("centra.fish");
        let args = CompletionsArgs {
            shell: Shell::Fish,
            output: Some(path.clone()),
        };

        run_completions(&args, &mut sample_command()).expect("write script");
        let script = std::fs::read_to_string(&path).expect("script exists");
        assert!(script.contains("rank"));
    }
}
