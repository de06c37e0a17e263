//! Library integration tests.

use waldo::WaldoError;

#[test]
fn error_types_are_public() {
    let err = WaldoError::UnrecognizedBuildType {
        path: "/builds/app.zip".into(),
    };
    assert!(err.to_string().contains("/builds/app.zip"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> waldo::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use waldo::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["waldo", "info", "some/dir"]);
    match cli.command {
        Commands::Info(args) => assert_eq!(args.dir, Some("some/dir".into())),
        other => panic!("Expected Info command, got {:?}", other),
    }
}

#[test]
fn provenance_from_injected_environment_and_runner() {
    use waldo::ci::CiProvider;
    use waldo::git::{CommandOutput, GitAccess, ScriptedRunner};
    use waldo::provenance::Provenance;

    let env = |key: &str| match key {
        "CIRCLECI" => Ok("true".to_string()),
        "CIRCLE_BRANCH" => Ok("release/2.0".to_string()),
        "CIRCLE_SHA1" => Ok("feedface".to_string()),
        _ => Err(std::env::VarError::NotPresent),
    };
    let runner = ScriptedRunner::new()
        .respond("git", &["rev-parse"], CommandOutput::success(""))
        .respond(
            "git",
            &["log", "--format=%H", "--skip=0", "-1"],
            CommandOutput::success("feedface"),
        )
        .respond(
            "git",
            &["for-each-ref", "--points-at=feedface", "--format=%(refname)"],
            CommandOutput::success("refs/remotes/origin/HEAD\nrefs/remotes/origin/release/2.0"),
        );

    let provenance = Provenance::gather_with(env, runner);
    assert_eq!(provenance.ci.provider, CiProvider::CircleCI);
    assert_eq!(provenance.ci.git_branch.as_deref(), Some("release/2.0"));
    assert_eq!(provenance.git.access(), GitAccess::Ok);
    assert_eq!(provenance.git.branch(), Some("release/2.0"));
}

#[test]
fn config_overrides_are_public() {
    use waldo::config::{load_merged_config, DEFAULT_ERROR_ENDPOINT};

    let temp = tempfile::TempDir::new().unwrap();
    let config = load_merged_config(
        None,
        temp.path(),
        &["wrapperName=CI Plugin", "wrapperVersion=0.4.1"],
    )
    .unwrap();

    assert_eq!(config.wrapper_name.as_deref(), Some("CI Plugin"));
    assert_eq!(config.reported_version(), "0.4.1");
    assert_eq!(config.endpoints.error, DEFAULT_ERROR_ENDPOINT);
}
