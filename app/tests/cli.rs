use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir, server: Option<&httptest::Server>) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("photomind_cli")?;
    cmd.env("HOME", home.path());
    cmd.env("PHOTOMIND_CACHE_PATH", home.path().join(".photomind"));
    cmd.env_remove("PHOTOMIND_API_BASE_URL");
    if let Some(server) = server {
        cmd.arg("--api-base-url").arg(mocks::base_url(server));
    }
    Ok(cmd)
}

#[test]
fn photomind_cli_help() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    cli(&home, None)?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PhotoMind command line client"));
    Ok(())
}

#[test]
fn photomind_cli_health() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = mocks::photomind_server();
    mocks::expect_health(&server);
    cli(&home, Some(&server))?
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: healthy"))
        .stdout(predicate::str::contains("PhotoMind Backend"));
    Ok(())
}

#[test]
fn photomind_cli_search_lists_photos() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = mocks::photomind_server();
    mocks::expect_search(&server);
    cli(&home, Some(&server))?
        .arg("search")
        .assert()
        .success()
        .stdout(predicate::str::contains("p1\tlake.jpg"))
        .stdout(predicate::str::contains("Mountain View (98%)"))
        .stdout(predicate::str::contains("3 photos"));
    Ok(())
}

#[test]
fn photomind_cli_deep_search() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = mocks::photomind_server();
    mocks::expect_deep_search(&server, "furry friends", &[("Dog", 0.93)]);
    cli(&home, Some(&server))?
        .args(["deep-search", "furry friends"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dog (0.93)"));
    Ok(())
}

#[test]
fn photomind_cli_tabs_and_add_tab() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = mocks::photomind_server();
    mocks::expect_tabs(&server, &["Pets", "Travel"]);
    mocks::expect_add_tab(&server, "Food");

    cli(&home, Some(&server))?
        .arg("tabs")
        .assert()
        .success()
        .stdout(predicate::str::contains("All Photos"))
        .stdout(predicate::str::contains("Travel (id: t2)"));

    cli(&home, Some(&server))?
        .args(["add-tab", "  Food "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tab created: Food (id: new)"));
    Ok(())
}

#[test]
fn photomind_cli_add_tab_rejects_blank_name() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    cli(&home, None)?
        .args(["--api-base-url", "http://127.0.0.1:9", "add-tab", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tab name must not be blank"));
    Ok(())
}

#[test]
fn photomind_cli_upload() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = mocks::photomind_server();
    mocks::expect_uploads(&server, 2);
    let a = home.path().join("a.jpg");
    let b = home.path().join("b.png");
    std::fs::write(&a, b"jpeg")?;
    std::fs::write(&b, b"png")?;

    cli(&home, Some(&server))?
        .arg("upload")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("Uploaded 2 files"));
    Ok(())
}

#[test]
fn photomind_cli_upload_reports_backend_error() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = mocks::photomind_server();
    mocks::expect_upload_rejected(&server, "Invalid file type");
    let a = home.path().join("a.txt");
    std::fs::write(&a, b"text")?;

    cli(&home, Some(&server))?
        .arg("upload")
        .arg(&a)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid file type"));
    Ok(())
}

#[test]
fn photomind_cli_filter_by_tab() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = mocks::photomind_server();
    mocks::expect_search(&server);
    mocks::expect_deep_search(&server, "Pets", &[("Dog", 0.9), ("Cat", 0.7)]);
    cli(&home, Some(&server))?
        .args(["filter", "--tab", "Pets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("p3\tdog.jpg\tdog"))
        .stdout(predicate::str::contains("1 of 3 photos"));
    Ok(())
}

#[test]
fn photomind_cli_filter_by_query() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = mocks::photomind_server();
    mocks::expect_search(&server);
    cli(&home, Some(&server))?
        .args(["filter", "--query", "MOUNTAIN"])
        .assert()
        .success()
        .stdout(predicate::str::contains("p1\tlake.jpg\tmountain view"))
        .stdout(predicate::str::contains("1 of 3 photos"));
    Ok(())
}

#[test]
fn photomind_cli_filter_all_photos_skips_deep_search() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = mocks::photomind_server();
    mocks::expect_search(&server);
    cli(&home, Some(&server))?
        .args(["filter", "--tab", "All Photos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 of 3 photos"));
    Ok(())
}

#[test]
fn photomind_cli_unreachable_backend_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    cli(&home, None)?
        .args(["--api-base-url", "http://127.0.0.1:9", "tabs"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn photomind_cli_reads_base_url_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let server = mocks::photomind_server();
    mocks::expect_health(&server);
    let config_path = home.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!("api_base_url = \"{}\"\nlog_level = \"debug\"\n", mocks::base_url(&server)),
    )?;

    cli(&home, None)?
        .arg("--config")
        .arg(&config_path)
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: healthy"));
    Ok(())
}
