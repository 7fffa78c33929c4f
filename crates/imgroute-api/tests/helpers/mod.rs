//! Test helpers: build the router over a temporary image directory.
//!
//! Run from workspace root: `cargo test -p imgroute-api --test images_test`.

pub mod fixtures;

use axum_test::TestServer;
use imgroute_api::setup::{build_state, routes};
use imgroute_core::LoaderRegistry;
use std::path::Path;
use tempfile::TempDir;

/// Routing config used by most tests. `{root}` is replaced by the image directory.
pub const DEFAULT_CONFIG: &str = r#"
storage:
  fs:
    type: file
    root: "{root}"
transform:
  small:
    - type: t
      options: [8, 8]
route:
  /:
    storage: fs
    transform: true
    expire: 3600
  /private:
    storage: fs
    transform: false
  /limited:
    storage: fs
    transform: [small]
"#;

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// Write `template` (with `{root}` substituted) as `imgroute.<suffix>` and load it.
pub fn write_config(dir: &Path, template: &str, suffix: &str) -> std::path::PathBuf {
    let path = dir.join(format!("imgroute.{}", suffix));
    let contents = template.replace("{root}", &dir.display().to_string());
    std::fs::write(&path, contents).expect("Failed to write config");
    path
}

/// Setup test app with the given config and cache capacity.
pub fn setup_test_app_with(template: &str, cache_capacity: usize) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fixtures::write_jpeg(temp_dir.path(), "photo", 64, 32);
    fixtures::write_jpeg(temp_dir.path(), "private/photo", 64, 32);
    fixtures::write_jpeg(temp_dir.path(), "limited/photo", 64, 32);

    let config_path = write_config(temp_dir.path(), template, "yaml");
    let config = LoaderRegistry::with_builtins()
        .load(&config_path)
        .expect("Failed to load config");

    let state = build_state(config, cache_capacity).expect("Failed to build state");
    let app = routes::setup_routes(state, 16);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, temp_dir }
}

/// Setup test app with the default config and no read cache.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(DEFAULT_CONFIG, 0)
}
