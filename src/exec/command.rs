// src/exec/command.rs

//! Turning a job's command line into a process.
//!
//! Command lines containing shell syntax go through the platform shell.
//! Plain ones are split on whitespace and executed directly, so a missing
//! executable surfaces as a spawn error rather than a shell exit status.

use std::io;
use std::process::ExitStatus;
use std::sync::LazyLock;

use regex::Regex;
use tokio::process::Command;

static SHELL_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[*?{}\[\]<>()~&|\\$;'`"\n#=%]"#).expect("shell syntax pattern is valid")
});

/// Whether `cmdline` needs a shell to be interpreted.
pub fn needs_shell(cmdline: &str) -> bool {
    SHELL_SYNTAX.is_match(cmdline)
}

/// Build (but do not spawn) the process for a command line.
pub fn build_command(cmdline: &str) -> io::Result<Command> {
    if needs_shell(cmdline) {
        let cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(cmdline);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(cmdline);
            c
        };
        return Ok(cmd);
    }

    let mut words = cmdline.split_whitespace();
    let program = words
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

    let mut cmd = Command::new(program);
    cmd.args(words);
    Ok(cmd)
}

/// Exit code of a finished process.
///
/// A process killed by a signal reports `128 + signal` on unix; anything
/// else without a code reports `-1`.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

/// Text written to a slot's capture file when a command cannot be started.
pub fn spawn_error_line(cmdline: &str, job: &str, err: &io::Error) -> String {
    format!("ERROR: failed to spawn command '{cmdline}' for job '{job}': {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_commands_skip_the_shell() {
        assert!(!needs_shell("make -j4 all"));
        assert!(!needs_shell("command_not_found arg"));
        assert!(needs_shell("echo hi > out.txt"));
        assert!(needs_shell("exit 42;"));
        assert!(needs_shell("FOO=1 make"));
        assert!(needs_shell("echo $HOME"));
    }

    #[test]
    fn plain_command_is_split_into_program_and_args() {
        let cmd = build_command("  printf  %s   x ").unwrap();
        // `%` forces the shell.
        assert_eq!(cmd.as_std().get_program(), if cfg!(windows) { "cmd" } else { "sh" });

        let cmd = build_command("printf hello world").unwrap();
        let std = cmd.as_std();
        assert_eq!(std.get_program(), "printf");
        let args: Vec<_> = std.get_args().collect();
        assert_eq!(args, vec!["hello", "world"]);
    }

    #[test]
    fn empty_command_is_an_invalid_input_error() {
        let err = build_command("   ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn spawn_error_line_format() {
        let err = io::Error::new(io::ErrorKind::NotFound, "No such file or directory");
        assert_eq!(
            spawn_error_line("command_not_found arg", "command_not_found", &err),
            "ERROR: failed to spawn command 'command_not_found arg' for job 'command_not_found': No such file or directory"
        );
    }
}
