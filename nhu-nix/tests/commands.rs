//! Exercises the command wrappers against stand-in shell scripts.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use nhu_nix::{Error, Nix, Operation, System, switch_to_configuration};
use tempfile::TempDir;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Writes an executable `/bin/sh` script that records its arguments, one per
/// line, to `<name>.args` next to it and then runs `body`.
fn fake_program(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    let args_file = dir.join(format!("{name}.args"));
    let script = format!(
        "#!/bin/sh\nfor a in \"$@\"; do printf '%s\\n' \"$a\"; done > '{}'\n{body}\n",
        args_file.display()
    );
    fs::write(&path, script)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

fn recorded_args(dir: &Path, name: &str) -> Result<Vec<String>> {
    Ok(fs::read_to_string(dir.join(format!("{name}.args")))?
        .lines()
        .map(str::to_string)
        .collect())
}

#[test_log::test(tokio::test)]
async fn test_flake_metadata() -> Result<()> {
    let dir = TempDir::new()?;
    let nix = fake_program(
        dir.path(),
        "nix",
        r#"echo '{"lastModified":1718000000,"originalUrl":"github:example/nix-config","url":"github:example/nix-config/abc"}'"#,
    )?;

    let metadata = Nix::new().with_nix(nix).flake_metadata("self").await?;
    assert_eq!(metadata.original_url, "github:example/nix-config");
    assert_eq!(metadata.last_modified, 1718000000);
    assert_eq!(
        recorded_args(dir.path(), "nix")?,
        [
            "--extra-experimental-features",
            "nix-command flakes",
            "flake",
            "metadata",
            "--json",
            "self"
        ]
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_build_passes_extra_args() -> Result<()> {
    let dir = TempDir::new()?;
    let nix = fake_program(
        dir.path(),
        "nix",
        r#"echo '[{"drvPath":"/nix/store/dddddddddddddddddddddddddddddddd-nixos-system-oak.drv","outputs":{"out":"/nix/store/oooooooooooooooooooooooooooooooo-nixos-system-oak"}}]'"#,
    )?;
    let target = "github:example/nix-config#nixosConfigurations.oak.config.system.build.toplevel";

    let result = Nix::new()
        .with_nix(nix)
        .build(target, &["--impure".to_string(), "--max-jobs".to_string(), "4".to_string()])
        .await?;
    assert_eq!(
        result,
        PathBuf::from("/nix/store/oooooooooooooooooooooooooooooooo-nixos-system-oak")
    );
    assert_eq!(
        recorded_args(dir.path(), "nix")?,
        [
            "--extra-experimental-features",
            "nix-command flakes",
            "build",
            target,
            "--no-link",
            "--json",
            "--impure",
            "--max-jobs",
            "4"
        ]
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_build_failure() -> Result<()> {
    let dir = TempDir::new()?;
    let nix = fake_program(dir.path(), "nix", "echo 'error: build failed' >&2; exit 1")?;

    let err = Nix::new().with_nix(nix).build("x#y", &[]).await.unwrap_err();
    match err {
        Error::CommandFailed { status, .. } => assert_eq!(status.code(), Some(1)),
        other => panic!("expected CommandFailed, got {other:?}"),
    }
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_build_without_outputs() -> Result<()> {
    let dir = TempDir::new()?;
    let nix = fake_program(dir.path(), "nix", "echo '[]'")?;

    let err = Nix::new().with_nix(nix).build("x#y", &[]).await.unwrap_err();
    assert!(matches!(err, Error::NoBuildOutput(ref t) if t == "x#y"), "{err}");
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_flake_metadata_garbage() -> Result<()> {
    let dir = TempDir::new()?;
    let nix = fake_program(dir.path(), "nix", "echo 'not json'")?;

    let err = Nix::new().with_nix(nix).flake_metadata("self").await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "{err}");
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_diff_arguments() -> Result<()> {
    let dir = TempDir::new()?;
    let dix = fake_program(dir.path(), "dix", "exit 0")?;

    Nix::new()
        .with_dix(dix)
        .diff(Path::new("/run/current-system"), Path::new("/nix/store/new"))
        .await?;
    assert_eq!(
        recorded_args(dir.path(), "dix")?,
        ["/run/current-system", "/nix/store/new"]
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_switch_to_configuration() -> Result<()> {
    let result = TempDir::new()?;
    let bin = result.path().join("bin");
    fs::create_dir(&bin)?;
    fake_program(&bin, "switch-to-configuration", "exit 0")?;

    switch_to_configuration(result.path(), Operation::DryActivate).await?;
    assert_eq!(
        recorded_args(&bin, "switch-to-configuration")?,
        ["dry-activate"]
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_switch_requires_binary() -> Result<()> {
    let result = TempDir::new()?;

    let err = switch_to_configuration(result.path(), Operation::Boot)
        .await
        .unwrap_err();
    match err {
        Error::MissingSwitchBinary { path, .. } => {
            assert_eq!(path, result.path().join("bin/switch-to-configuration"));
        }
        other => panic!("expected MissingSwitchBinary, got {other:?}"),
    }
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_ping() -> Result<()> {
    let dir = TempDir::new()?;
    let ping = fake_program(
        dir.path(),
        "ping",
        r#"[ "$5" = "reachable.example.com" ] || exit 1; echo "3 packets transmitted, 3 received""#,
    )?;
    let system = System::new().with_ping(ping);

    system.ping("reachable.example.com").await?;
    assert_eq!(
        recorded_args(dir.path(), "ping")?,
        ["-q", "-c", "3", "--", "reachable.example.com"]
    );

    let err = system.ping("down.example.com").await.unwrap_err();
    assert!(matches!(err, Error::CommandFailed { .. }), "{err}");
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_reboot() -> Result<()> {
    let dir = TempDir::new()?;
    let systemctl = fake_program(dir.path(), "systemctl", "exit 0")?;

    System::new().with_systemctl(systemctl).reboot().await?;
    assert_eq!(recorded_args(dir.path(), "systemctl")?, ["reboot"]);
    Ok(())
}
