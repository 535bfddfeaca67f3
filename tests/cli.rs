mod common;

use common::{envelope, read_json, run_ok, StubEndpoint, Workspace};

#[test]
fn enhance_returns_the_model_answer_verbatim() {
    let ws = Workspace::create();
    let answer = "```json\n{\"title\": \"A Quiet Morning\", \"content\": \"<p>I watched the fog lift.</p>\"}\n```";
    let endpoint = StubEndpoint::serve_once(200, &envelope(answer));

    let stdout = run_ok(
        ws.mj_with_endpoint(&endpoint.url)
            .args(["enhance", "--title", "morning", "--content", "fog lifting"])
            .arg("--json"),
    );
    let result: serde_json::Value = serde_json::from_str(&stdout).expect("parse output");
    assert_eq!(result["title"], "A Quiet Morning");
    assert_eq!(result["content"], "<p>I watched the fog lift.</p>");
    assert!(result.get("error").is_none(), "{result}");

    let request = endpoint.received().expect("stub saw a request");
    assert!(request.contains("Bearer test-key"), "{request}");
    assert!(request.contains("gpt-4o-mini"), "{request}");
    assert!(request.contains("fog lifting"), "{request}");
}

#[test]
fn enhance_falls_back_when_the_endpoint_errors() {
    let ws = Workspace::create();
    let endpoint = StubEndpoint::serve_once(500, r#"{"error": {"message": "boom"}}"#);

    let stdout = run_ok(
        ws.mj_with_endpoint(&endpoint.url)
            .args(["enhance", "--title", "My Trip", "--content", "We saw the sea."])
            .arg("--json"),
    );
    let result: serde_json::Value = serde_json::from_str(&stdout).expect("parse output");
    assert_eq!(result["title"], "My Journey: My Trip");
    assert_eq!(result["content"], "<p>We saw the sea.</p>");
    assert!(result.get("error").is_none(), "{result}");
    assert!(endpoint.received().is_some());

    let log = run_ok(ws.mj().args(["log", "--json"]));
    let runs: serde_json::Value = serde_json::from_str(&log).expect("parse log");
    let runs = runs.as_array().expect("log is an array");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["outcome"], "fallback");
    assert_eq!(runs[0]["title_preview"], "My Journey: My Trip");
}

#[test]
fn enhance_without_api_key_uses_the_local_formatter() {
    let ws = Workspace::create();
    let content = "The walk was long and the light was kind.\n\nI slept early.";
    let stdout = run_ok(
        ws.mj()
            .args(["enhance", "--title", "Evening reflection", "--content", content])
            .arg("--json"),
    );
    let result: serde_json::Value = serde_json::from_str(&stdout).expect("parse output");
    assert_eq!(result["title"], "Evening reflection");
    assert_eq!(
        result["content"],
        "<p>Today I took some time to reflect on my thoughts and experiences.</p>\n\
         <p>The walk was long and the light was kind.</p>\n<p>I slept early.</p>"
    );
}

#[test]
fn enhance_requires_content() {
    let ws = Workspace::create();
    let output = ws
        .mj()
        .args(["enhance", "--title", "x"])
        .output()
        .expect("run mj");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pass --content or --file"), "{stderr}");
}

#[test]
fn journal_entries_are_added_listed_and_enhanced() {
    let ws = Workspace::create();
    let id = run_ok(ws.mj().args([
        "journal", "add", "--title", "Lake day", "--content", "We swam.", "--mood", "happy",
    ]));
    let id = id.trim().to_string();
    assert!(id.starts_with("entry-"), "{id}");

    let listed = run_ok(ws.mj().args(["journal", "list", "--json"]));
    let entries: serde_json::Value = serde_json::from_str(&listed).expect("parse list");
    assert_eq!(entries[0]["id"], id.as_str());
    assert_eq!(entries[0]["mood"], "happy");

    run_ok(ws.mj().args(["journal", "enhance", &id]));
    let shown = run_ok(ws.mj().args(["journal", "show", &id, "--json"]));
    let entry: serde_json::Value = serde_json::from_str(&shown).expect("parse entry");
    assert_eq!(entry["title"], "My Journey: Lake day");
    assert_eq!(entry["content"], "<p>We swam.</p>");

    let state = read_json(&ws.data_dir().join("state.json"));
    assert_eq!(state["schema_version"], 1);
    assert_eq!(state["journal_entries"].as_array().map(Vec::len), Some(1));

    run_ok(ws.mj().args(["journal", "delete", &id]));
    let listed = run_ok(ws.mj().args(["journal", "list", "--json"]));
    assert_eq!(listed.trim(), "[]");
}

#[test]
fn unknown_mood_is_rejected() {
    let ws = Workspace::create();
    let output = ws
        .mj()
        .args(["journal", "add", "--content", "x", "--mood", "ecstatic"])
        .output()
        .expect("run mj");
    assert!(!output.status.success());
}

#[test]
fn pin_lock_guards_entries_and_attachments_and_locks_out_after_five_misses() {
    let ws = Workspace::create();
    let id = run_ok(ws.mj().args(["journal", "add", "--title", "Private", "--content", "secret"]));
    let id = id.trim().to_string();
    let scan = ws.write_file("scan.txt", b"private diary scan");
    let path = run_ok(ws.mj().args(["attach", "upload", &id]).arg(&scan));
    let path = path.trim().to_string();
    run_ok(ws.mj().args(["auth", "enroll", "--pin", "2468"]));

    let output = ws.mj().args(["journal", "list"]).output().expect("run mj");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("pass --pin"));

    let listed = run_ok(ws.mj().args(["journal", "list", "--pin", "2468"]));
    assert!(listed.contains("Private"), "{listed}");

    let out = ws.dir.path().join("out.txt");
    let output = ws
        .mj()
        .args(["attach", "download", &path, "--out"])
        .arg(&out)
        .output()
        .expect("run mj");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("pass --pin"));
    assert!(!out.exists());
    for args in [
        vec!["attach", "url", path.as_str()],
        vec!["attach", "delete", id.as_str(), path.as_str()],
    ] {
        let output = ws.mj().args(&args).output().expect("run mj");
        assert!(!output.status.success(), "{args:?}");
    }
    let output = ws
        .mj()
        .args(["attach", "upload", &id])
        .arg(&scan)
        .output()
        .expect("run mj");
    assert!(!output.status.success());

    run_ok(
        ws.mj()
            .args(["attach", "download", &path, "--pin", "2468", "--out"])
            .arg(&out),
    );
    assert_eq!(std::fs::read(&out).expect("read copy"), b"private diary scan");

    for _ in 0..5 {
        let output = ws
            .mj()
            .args(["auth", "unlock", "--pin", "1111"])
            .output()
            .expect("run mj");
        assert!(!output.status.success());
    }
    let output = ws
        .mj()
        .args(["journal", "list", "--pin", "2468"])
        .output()
        .expect("run mj");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("too many incorrect attempts"), "{stderr}");

    let state = read_json(&ws.data_dir().join("state.json"));
    assert!(!state.to_string().contains("\"2468\""), "PIN stored in clear");
    assert_eq!(state["auth_method"], "pin");
}

#[test]
fn attachments_round_trip_through_local_storage() {
    let ws = Workspace::create();
    let id = run_ok(ws.mj().args(["journal", "add", "--content", "photo day"]));
    let id = id.trim().to_string();
    let photo = ws.write_file("sunset photo.png", b"\x89PNG fake");

    let path = run_ok(ws.mj().args(["attach", "upload", &id]).arg(&photo));
    let path = path.trim().to_string();
    assert!(path.ends_with("sunset_photo.png"), "{path}");

    let url = run_ok(ws.mj().args(["attach", "url", &path]));
    assert!(url.trim().starts_with("file://"), "{url}");

    let out = ws.dir.path().join("copy.png");
    run_ok(ws.mj().args(["attach", "download", &path, "--out"]).arg(&out));
    assert_eq!(std::fs::read(&out).expect("read copy"), b"\x89PNG fake");

    run_ok(ws.mj().args(["attach", "delete", &id, &path]));
    let shown = run_ok(ws.mj().args(["journal", "show", &id, "--json"]));
    let entry: serde_json::Value = serde_json::from_str(&shown).expect("parse entry");
    assert_eq!(entry["attachments"], serde_json::json!([]));
}

#[test]
fn stats_report_streaks_and_goal() {
    let ws = Workspace::create();
    for (date, minutes) in [("2020-01-01", "10"), ("2020-01-02", "20"), ("2020-01-04", "15")] {
        run_ok(ws.mj().args(["session", "log", "--minutes", minutes, "--mood", "calm", "--date", date]));
    }
    let stdout = run_ok(ws.mj().args(["stats", "--goal", "5", "--json"]));
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("parse stats");
    assert_eq!(report["sessions"]["total_sessions"], 3);
    assert_eq!(report["sessions"]["total_minutes"], 45);
    assert_eq!(report["sessions"]["average_minutes"], 15.0);
    assert_eq!(report["sessions"]["longest_streak"], 2);
    assert_eq!(report["sessions"]["current_streak"], 0);
    assert_eq!(report["weekly_goal"]["target"], 5);
    assert_eq!(report["weekly_goal"]["achieved"], 0);
}

#[test]
fn greeting_follows_language_and_hour() {
    let ws = Workspace::create();
    let english = run_ok(ws.mj().args(["greet", "--hour", "20"]));
    assert_eq!(english.trim(), "Good evening");

    run_ok(ws.mj().args(["greet", "--lang", "es", "--hour", "8", "--save"]));
    let spanish = run_ok(ws.mj().args(["greet", "--hour", "8"]));
    assert_eq!(spanish.trim(), "Buenos días");
}

#[test]
fn config_output_never_shows_the_key() {
    let ws = Workspace::create();
    let stdout = run_ok(ws.mj().env("MJ_API_KEY", "sk-very-secret").arg("config"));
    assert!(!stdout.contains("sk-very-secret"), "{stdout}");
    assert!(stdout.contains("data dir:"), "{stdout}");
}
