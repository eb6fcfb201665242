#![allow(deprecated)]
//! Walks through follow/feature sessions the way a user would, swapping the mocked
//! server state between steps.
use assert_cmd::Command;
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{json, Value};
use tempfile::TempDir;

fn bin(server: &MockServer, home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dee-mastodon").unwrap();
    cmd.env("HOME", home.path());
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"));
    cmd.env("DEE_MASTODON_INSTANCE", server.base_url());
    cmd.env("DEE_MASTODON_TOKEN", "test-token");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("FORCE_COLOR");
    cmd.env("NO_COLOR", "1");
    cmd
}

fn run(server: &MockServer, home: &TempDir, args: &[&str]) -> String {
    let out = bin(server, home).args(args).output().unwrap();
    assert!(
        out.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

fn run_json(server: &MockServer, home: &TempDir, args: &[&str]) -> Value {
    let mut args = args.to_vec();
    args.push("--json");
    serde_json::from_str(&run(server, home, &args)).expect("stdout must be valid JSON")
}

fn find_tags(stdout: &str) -> Vec<String> {
    let mut tags: Vec<String> = stdout
        .split_whitespace()
        .filter(|word| word.starts_with('#'))
        .map(str::to_owned)
        .collect();
    tags.sort();
    tags
}

fn followed<'a>(server: &'a MockServer, names: &[&str]) -> Mock<'a> {
    let body: Vec<Value> = names
        .iter()
        .map(|name| json!({"name": name, "following": true, "history": []}))
        .collect();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/followed_tags");
        then.status(200).json_body(Value::Array(body));
    })
}

fn follow_action<'a>(server: &'a MockServer, name: &str, action: &str) -> Mock<'a> {
    let following = action == "follow";
    let path = format!("/api/v1/tags/{name}/{action}");
    server.mock(|when, then| {
        when.method(POST).path(path);
        then.status(200)
            .json_body(json!({"name": name, "following": following}));
    })
}

fn featured<'a>(server: &'a MockServer, tags: &[(&str, &str)]) -> Mock<'a> {
    let body: Vec<Value> = tags
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name, "statuses_count": 0}))
        .collect();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/featured_tags");
        then.status(200).json_body(Value::Array(body));
    })
}

#[test]
fn follow_and_unfollow_session() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();

    let mut list = followed(&server, &[]);
    assert_eq!(
        run(&server, &home, &["tags", "followed"]),
        "You're not following any hashtags"
    );

    let mut action = follow_action(&server, "foo", "follow");
    assert_eq!(
        run(&server, &home, &["tags", "follow", "foo"]),
        "✓ You are now following #foo"
    );
    action.delete();
    list.delete();

    let mut list = followed(&server, &["foo"]);
    assert_eq!(
        find_tags(&run(&server, &home, &["tags", "followed"])),
        ["#foo"]
    );

    let mut action = follow_action(&server, "bar", "follow");
    assert_eq!(
        run(&server, &home, &["tags", "follow", "bar"]),
        "✓ You are now following #bar"
    );
    action.delete();
    list.delete();

    // Most recently followed first, as the server returns them.
    let mut list = followed(&server, &["bar", "foo"]);
    assert_eq!(
        find_tags(&run(&server, &home, &["tags", "followed"])),
        ["#bar", "#foo"]
    );

    let mut action = follow_action(&server, "foo", "unfollow");
    assert_eq!(
        run(&server, &home, &["tags", "unfollow", "foo"]),
        "✓ You are no longer following #foo"
    );
    action.delete();
    list.delete();

    let mut list = followed(&server, &["bar"]);
    assert_eq!(
        find_tags(&run(&server, &home, &["tags", "followed"])),
        ["#bar"]
    );

    let mut action = follow_action(&server, "bar", "unfollow");
    assert_eq!(
        run(&server, &home, &["tags", "unfollow", "bar"]),
        "✓ You are no longer following #bar"
    );
    action.delete();
    list.delete();

    followed(&server, &[]);
    assert_eq!(
        run(&server, &home, &["tags", "followed"]),
        "You're not following any hashtags"
    );
}

#[test]
fn follow_session_json() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();

    let mut list = followed(&server, &[]);
    assert_eq!(run_json(&server, &home, &["tags", "followed"]), json!([]));
    list.delete();

    follow_action(&server, "foo", "follow");
    follow_action(&server, "bar", "follow");
    let tag = run_json(&server, &home, &["tags", "follow", "foo"]);
    assert_eq!(tag["name"], json!("foo"));
    assert_eq!(tag["following"], json!(true));

    let mut list = followed(&server, &["bar", "foo"]);
    let tags = run_json(&server, &home, &["tags", "followed"]);
    let mut names: Vec<&str> = tags
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, ["bar", "foo"]);
    list.delete();

    follow_action(&server, "foo", "unfollow");
    let tag = run_json(&server, &home, &["tags", "unfollow", "foo"]);
    assert_eq!(tag["name"], json!("foo"));
    assert_eq!(tag["following"], json!(false));

    followed(&server, &[]);
    assert_eq!(run_json(&server, &home, &["tags", "followed"]), json!([]));
}

#[test]
fn feature_and_unfeature_session() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();

    let mut list = featured(&server, &[]);
    assert_eq!(
        run(&server, &home, &["tags", "featured"]),
        "You don't have any featured hashtags"
    );
    list.delete();

    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/featured_tags")
            .json_body(json!({"name": "foo"}));
        then.status(200)
            .json_body(json!({"id": "1", "name": "foo", "statuses_count": 0}));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/featured_tags")
            .json_body(json!({"name": "bar"}));
        then.status(200)
            .json_body(json!({"id": "2", "name": "bar", "statuses_count": 0}));
    });
    assert_eq!(
        run(&server, &home, &["tags", "feature", "foo"]),
        "✓ Tag #foo is now featured"
    );
    assert_eq!(
        run(&server, &home, &["tags", "feature", "bar"]),
        "✓ Tag #bar is now featured"
    );

    let mut list = featured(&server, &[("1", "foo"), ("2", "bar")]);
    assert_eq!(
        find_tags(&run(&server, &home, &["tags", "featured"])),
        ["#bar", "#foo"]
    );

    let mut delete = server.mock(|when, then| {
        when.method(DELETE).path("/api/v1/featured_tags/1");
        then.status(200).json_body(json!({}));
    });
    assert_eq!(
        run(&server, &home, &["tags", "unfeature", "foo"]),
        "✓ Tag #foo is no longer featured"
    );
    delete.assert();
    delete.delete();
    list.delete();

    let mut list = featured(&server, &[("2", "bar")]);
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/api/v1/featured_tags/2");
        then.status(200).json_body(json!({}));
    });
    assert_eq!(
        run(&server, &home, &["tags", "unfeature", "2"]),
        "✓ Tag #bar is no longer featured"
    );
    delete.assert();
    list.delete();

    featured(&server, &[]);
    assert_eq!(
        run(&server, &home, &["tags", "featured"]),
        "You don't have any featured hashtags"
    );
}

#[test]
fn unfeature_session_json_prints_empty_objects() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();

    featured(&server, &[("1", "foo"), ("2", "bar")]);
    server.mock(|when, then| {
        when.method(DELETE).path_contains("/api/v1/featured_tags/");
        then.status(200).json_body(json!({}));
    });

    assert_eq!(
        run_json(&server, &home, &["tags", "unfeature", "foo"]),
        json!({})
    );
    assert_eq!(
        run_json(&server, &home, &["tags", "unfeature", "2"]),
        json!({})
    );
}
