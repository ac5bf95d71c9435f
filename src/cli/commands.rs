use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{parse_line, parse_script, IoResultExt, Outcome, TreeSession};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::TraversalKind;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see nametree --help".to_string(),
        ));
    };

    // These do not need a tree.
    match command {
        Commands::Completion { shell } => return _completion(*shell),
        Commands::Config { command } => return _config(cli, command),
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let mut session = open_session(cli.input.as_deref(), &settings)?;

    match command {
        Commands::Run { script } => _run(&mut session, script),
        Commands::Repl => _repl(&mut session),
        Commands::Add {
            name,
            value,
            parent,
        } => _add(&mut session, parent, name, value),
        Commands::Delete { name } => _delete(&mut session, name),
        Commands::Traverse { kind } => _traverse(&mut session, *kind),
        Commands::Show { json } => _show(&session, *json),
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

/// Session from `--input` if given, otherwise the configured seed.
#[instrument(level = "debug", skip(settings))]
fn open_session(input: Option<&Path>, settings: &Settings) -> CliResult<TreeSession> {
    match input {
        Some(path) => {
            let json = fs::read_to_string(path).with_path_context("read snapshot", path)?;
            Ok(TreeSession::from_json(&json, settings)?)
        }
        None => Ok(TreeSession::new(settings)),
    }
}

#[instrument(skip(session))]
fn _run(session: &mut TreeSession, script: &Path) -> CliResult<()> {
    let content = fs::read_to_string(script).with_path_context("read script", script)?;
    let commands = parse_script(&content)?;
    debug!("Executing {} commands", commands.len());
    for command in &commands {
        let outcome = session.execute(command)?;
        output::outcome(&outcome);
    }
    Ok(())
}

#[instrument(skip(session))]
fn _repl(session: &mut TreeSession) -> CliResult<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    repl_lines(session, stdin.lock(), interactive)
}

/// Executes `reader` line by line; bad lines are reported and skipped.
fn repl_lines(
    session: &mut TreeSession,
    reader: impl BufRead,
    interactive: bool,
) -> CliResult<()> {
    let mut lines = reader.lines();
    let mut line_no = 0;

    loop {
        if interactive {
            output::prompt("nametree>");
        }
        let Some(line) = lines.next() else {
            break;
        };
        line_no += 1;
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                output::error(&format!("line {line_no}: not valid UTF-8"));
                continue;
            }
            Err(e) => return Err(CliError::io("read stdin", e)),
        };

        let result = parse_line(line_no, &line).and_then(|command| match command {
            Some(command) => session.execute(&command).map(Some),
            None => Ok(None),
        });
        match result {
            Ok(Some(outcome)) => output::outcome(&outcome),
            Ok(None) => {}
            Err(e) => output::error(&e),
        }
    }
    Ok(())
}

#[instrument(skip(session))]
fn _add(session: &mut TreeSession, parent: &str, name: &str, value: &str) -> CliResult<()> {
    let inserted = session.add(parent, name, value)?;
    output::outcome(&Outcome::Inserted(inserted));
    output::info(session.render().trim_end());
    Ok(())
}

#[instrument(skip(session))]
fn _delete(session: &mut TreeSession, name: &str) -> CliResult<()> {
    let removed = session.delete(name)?;
    output::outcome(&Outcome::Deleted(removed));
    output::info(session.render().trim_end());
    Ok(())
}

#[instrument(skip(session))]
fn _traverse(session: &mut TreeSession, kind: TraversalKind) -> CliResult<()> {
    let names = session.traverse(kind).to_vec();
    output::outcome(&Outcome::Traversal(kind, names));
    Ok(())
}

#[instrument(skip(session))]
fn _show(session: &TreeSession, json: bool) -> CliResult<()> {
    if json {
        output::info(&session.to_json()?);
    } else {
        output::info(session.render().trim_end());
    }
    Ok(())
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exitcode;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn unseeded() -> Settings {
        let mut settings = Settings::default();
        settings.seed.enabled = false;
        settings
    }

    #[test]
    fn given_invalid_utf8_line_when_repl_then_reports_and_continues() {
        let mut session = TreeSession::new(&unseeded());
        let input: &[u8] = b"add A 1\n\xff\xfe\nadd B 2 A\n";

        repl_lines(&mut session, Cursor::new(input), false).unwrap();

        assert_eq!(session.tree().traverse_pre_order(), ["A", "B"]);
    }

    #[test]
    fn given_bad_commands_when_repl_then_later_lines_still_run() {
        let mut session = TreeSession::new(&unseeded());
        let input = "add A 1\nbogus\nadd \"unterminated\nadd B \"\" A\n# note\nadd C 3 A\n";

        repl_lines(&mut session, Cursor::new(input), false).unwrap();

        assert_eq!(session.tree().traverse_pre_order(), ["A", "C"]);
    }

    #[test]
    fn given_snapshot_file_when_opening_session_then_tree_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(&path, r#"{"name":"A","value":"1","children":[{"name":"B","value":"2"}]}"#)
            .unwrap();

        let session = open_session(Some(&path), &Settings::default()).unwrap();

        assert_eq!(session.tree().traverse_pre_order(), ["A", "B"]);
    }

    #[test]
    fn given_no_input_when_opening_session_then_seeded() {
        let session = open_session(None, &Settings::default()).unwrap();
        assert_eq!(session.tree().traverse_pre_order(), ["Root"]);
    }

    #[test]
    fn given_missing_snapshot_file_when_opening_session_then_noinput() {
        let dir = TempDir::new().unwrap();
        let err = open_session(Some(&dir.path().join("absent.json")), &Settings::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn given_script_file_when_run_then_session_reflects_commands() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.tree");
        fs::write(&path, "add A 1\nadd B 2 A\nadd C 3 A\ndelete B\ntraverse pre\n").unwrap();
        let mut session = TreeSession::new(&unseeded());

        _run(&mut session, &path).unwrap();

        assert_eq!(session.last_traversal(), ["A", "C"]);
    }

    #[test]
    fn given_bad_script_line_when_run_then_dataerr_and_nothing_executed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.tree");
        fs::write(&path, "add A 1\nbogus\n").unwrap();
        let mut session = TreeSession::new(&unseeded());

        let err = _run(&mut session, &path).unwrap_err();

        assert_eq!(err.exit_code(), exitcode::DATAERR);
        assert!(session.tree().is_empty());
    }
}
