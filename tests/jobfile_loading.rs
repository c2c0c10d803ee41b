// tests/jobfile_loading.rs

mod common;
use crate::common::write_file;

use std::path::Path;

use jobdag::config::{load_jobfile, RunOptions};
use jobdag::dag::JobState;
use jobdag::errors::{ErrorKind, JobdagError};
use tempfile::TempDir;

fn names(graph: &jobdag::dag::Graph) -> Vec<String> {
    graph.jobs().map(|j| j.name.clone()).collect()
}

#[test]
fn jobs_keep_file_order_and_start_ready_without_predecessors() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "Jobfile.toml",
        r#"
[job.zeta]
cmd = "echo zeta"

[job.alpha]
cmd = "echo alpha"
after = ["zeta"]

[job.mid]
cmd = "echo mid"
"#,
    );

    let jobfile = load_jobfile(&path).unwrap();
    let graph = &jobfile.graph;

    assert_eq!(names(graph), vec!["zeta", "alpha", "mid"]);
    assert_eq!(graph.state_of("zeta"), Some(JobState::Ready));
    assert_eq!(graph.state_of("alpha"), Some(JobState::Pending));
    assert_eq!(graph.state_of("mid"), Some(JobState::Ready));
    assert_eq!(graph.job("alpha").unwrap().predecessors, vec!["zeta"]);
}

#[test]
fn undefined_predecessor_cites_name_and_line() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "Jobfile.toml",
        r#"[job.first]
cmd = "true"

[job.second]
cmd = "true"
after = ["first", "ghost"]
"#,
    );

    let err = load_jobfile(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Definition);

    match &err {
        JobdagError::UndefinedPredecessor {
            job,
            missing,
            location,
        } => {
            assert_eq!(job, "second");
            assert_eq!(missing, &vec!["ghost".to_string()]);
            assert_eq!(location.line, 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let msg = err.to_string();
    assert!(msg.contains("'ghost'"), "{msg}");
    assert!(msg.contains("Jobfile.toml:4"), "{msg}");
}

#[test]
fn predecessor_defined_later_is_still_undefined() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "Jobfile.toml",
        r#"
[job.early]
cmd = "true"
after = ["late"]

[job.late]
cmd = "true"
"#,
    );

    let err = load_jobfile(&path).unwrap_err();
    assert!(matches!(err, JobdagError::UndefinedPredecessor { .. }));
}

#[test]
fn job_without_cmd_is_incomplete() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "Jobfile.toml",
        r#"
[job.lonely]
after = []
"#,
    );

    let err = load_jobfile(&path).unwrap_err();
    assert!(matches!(err, JobdagError::IncompleteJob { ref job, .. } if job == "lonely"));
    assert!(err.to_string().contains("[job.lonely]"));
}

#[test]
fn imports_are_prefixed_and_usable_as_predecessors() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "lib/common.toml",
        r#"
[job.setup]
cmd = "echo setup"

[job.check]
cmd = "echo check"
after = ["setup"]
"#,
    );
    let path = write_file(
        dir.path(),
        "Jobfile.toml",
        r#"
[[import]]
prefix = "lib"
path = "lib/common.toml"

[job.build]
cmd = "make"
after = ["lib-check"]
"#,
    );

    let jobfile = load_jobfile(&path).unwrap();
    let graph = &jobfile.graph;

    assert_eq!(names(graph), vec!["lib-setup", "lib-check", "build"]);
    assert_eq!(graph.job("lib-check").unwrap().predecessors, vec!["lib-setup"]);
    assert_eq!(graph.state_of("lib-setup"), Some(JobState::Ready));
    assert_eq!(graph.state_of("build"), Some(JobState::Pending));
}

#[test]
fn same_file_can_be_imported_twice_under_different_prefixes() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "one.toml", "[job.x]\ncmd = \"true\"\n");
    let path = write_file(
        dir.path(),
        "Jobfile.toml",
        r#"
[[import]]
prefix = "a"
path = "one.toml"

[[import]]
prefix = "b"
path = "one.toml"
"#,
    );

    let jobfile = load_jobfile(&path).unwrap();
    assert_eq!(names(&jobfile.graph), vec!["a-x", "b-x"]);
}

#[test]
fn import_colliding_with_existing_job_is_a_duplicate() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "one.toml", "[job.x]\ncmd = \"true\"\n");
    let path = write_file(
        dir.path(),
        "Jobfile.toml",
        r#"
[[import]]
prefix = "a"
path = "one.toml"

[[import]]
prefix = "a"
path = "one.toml"
"#,
    );

    let err = load_jobfile(&path).unwrap_err();
    assert!(matches!(err, JobdagError::DuplicateJob { ref job, .. } if job == "a-x"));
}

#[test]
fn blank_or_non_string_prefix_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "one.toml", "[job.x]\ncmd = \"true\"\n");

    for prefix in [r#""   ""#, "42", "[\"a\"]"] {
        let path = write_file(
            dir.path(),
            "Jobfile.toml",
            &format!("[[import]]\nprefix = {prefix}\npath = \"one.toml\"\n"),
        );
        let err = load_jobfile(&path).unwrap_err();
        assert!(
            matches!(err, JobdagError::InvalidImportPrefix { .. }),
            "prefix {prefix}: {err:?}"
        );
        assert_eq!(err.kind(), ErrorKind::Argument);
    }
}

#[test]
fn missing_import_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "Jobfile.toml",
        "[[import]]\nprefix = \"p\"\npath = \"nope.toml\"\n",
    );

    let err = load_jobfile(&path).unwrap_err();
    match &err {
        JobdagError::ImportNotFound { path, .. } => {
            assert!(path.ends_with("nope.toml"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn import_cycles_are_detected() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "a.toml",
        "[[import]]\nprefix = \"b\"\npath = \"b.toml\"\n",
    );
    write_file(
        dir.path(),
        "b.toml",
        "[[import]]\nprefix = \"a\"\npath = \"a.toml\"\n",
    );

    let err = load_jobfile(dir.path().join("a.toml")).unwrap_err();
    assert!(matches!(err, JobdagError::ConfigError(ref msg) if msg.contains("import cycle")));
}

#[test]
fn invalid_toml_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "Jobfile.toml", "[job.x\ncmd = ");

    let err = load_jobfile(&path).unwrap_err();
    assert!(matches!(err, JobdagError::TomlError(_)));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn zero_max_jobs_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "Jobfile.toml",
        "[options]\nmax_jobs = 0\n\n[job.x]\ncmd = \"true\"\n",
    );

    let err = load_jobfile(&path).unwrap_err();
    assert!(matches!(err, JobdagError::ConfigError(_)));
}

#[test]
fn options_section_feeds_run_options() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "sub/Jobfile.toml",
        "[options]\nmax_jobs = 3\noutput_directory = \"out\"\n\n[job.x]\ncmd = \"true\"\n",
    );

    let jobfile = load_jobfile(&path).unwrap();

    let from_file =
        RunOptions::resolve(None, None, false, &jobfile.options, &jobfile.path).unwrap();
    assert_eq!(from_file.max_jobs, 3);
    assert_eq!(from_file.output_directory, dir.path().join("sub").join("out"));

    let cli_wins_for_jobs = RunOptions::resolve(
        Some(7),
        Some(Path::new("elsewhere")),
        true,
        &jobfile.options,
        &jobfile.path,
    )
    .unwrap();
    assert_eq!(cli_wins_for_jobs.max_jobs, 7);
    assert_eq!(
        cli_wins_for_jobs.output_directory,
        dir.path().join("sub").join("out")
    );
    assert!(cli_wins_for_jobs.dot);
}

#[test]
fn dot_output_lists_every_job_and_edge() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "Jobfile.toml",
        "[job.a]\ncmd = \"true\"\n\n[job.b]\ncmd = \"true\"\nafter = [\"a\"]\n",
    );

    let dot = load_jobfile(&path).unwrap().graph.to_dot();
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("\"a\""));
    assert!(dot.contains("\"b\""));
    assert!(dot.contains("0 -> 1"));
}
