use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("gamescout.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Option catalog as served by the tags function
#[allow(dead_code)]
pub fn catalog_body() -> Value {
    json!([
        {"id": 5, "slug": "rpg", "name": "RPG", "type": "genre"},
        {"id": 4, "slug": "action", "name": "Action", "type": "genre"},
        {"id": 36, "slug": "open-world", "name": "Open World", "type": "tag"},
        {"id": 16, "slug": "horror", "name": "Horror", "type": "tag"}
    ])
}

/// Two games in the proxy's response shape
#[allow(dead_code)]
pub fn games_body() -> Value {
    json!([
        {
            "name": "The Witcher 3: Wild Hunt",
            "slug": "the-witcher-3-wild-hunt",
            "released": "2015-05-18",
            "rating": 4.66,
            "genres": [{"name": "Action"}, {"name": "RPG"}],
            "platforms": [{"platform": {"name": "PC"}}]
        },
        {
            "name": "Divinity: Original Sin 2",
            "slug": "divinity-original-sin-2",
            "released": "2017-09-14",
            "rating": 4.47,
            "genres": [{"name": "RPG"}, {"name": "Strategy"}]
        }
    ])
}
