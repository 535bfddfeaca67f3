use super::{parse_enhancement, strip_code_fences};

#[test]
fn bare_json_object_parses_exactly() {
    let draft = parse_enhancement(r#"{"title":"A Quiet Sunday","content":"<p>Rest.</p>"}"#)
        .expect("parse bare object");
    assert_eq!(draft.title, "A Quiet Sunday");
    assert_eq!(draft.content, "<p>Rest.</p>");
}

#[test]
fn fenced_json_parses_regardless_of_surrounding_whitespace() {
    let bodies = [
        "```json\n{\"title\":\"T\",\"content\":\"<p>C</p>\"}\n```",
        "\n\n   ```json\n{\"title\":\"T\",\"content\":\"<p>C</p>\"}\n```   \n",
        "```\n  {\"title\":\"T\",\"content\":\"<p>C</p>\"}  \n```",
    ];
    for body in bodies {
        let draft = parse_enhancement(body).expect("parse fenced object");
        assert_eq!(draft.title, "T", "{body:?}");
        assert_eq!(draft.content, "<p>C</p>", "{body:?}");
    }
}

#[test]
fn strip_code_fences_leaves_unfenced_text() {
    assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
}

#[test]
fn object_embedded_in_prose_is_recovered() {
    let body = "Sure! Here is your entry:\n{\"title\": \"Morning Walk\", \"content\": \"<p>Fresh air.</p>\"}\nHope it helps.";
    let draft = parse_enhancement(body).expect("parse embedded object");
    assert_eq!(draft.title, "Morning Walk");
    assert_eq!(draft.content, "<p>Fresh air.</p>");
}

#[test]
fn malformed_json_falls_back_to_field_extraction() {
    // Trailing comma and a literal newline make this invalid JSON.
    let body = "{\"title\": \"Late \\\"Night\\\" Thoughts\", \"content\": \"<p>One</p>\n<p>Two</p>\",}";
    let draft = parse_enhancement(body).expect("extract fields");
    assert_eq!(draft.title, "Late \"Night\" Thoughts");
    assert_eq!(draft.content, "<p>One</p>\n<p>Two</p>");
}

#[test]
fn missing_or_empty_fields_fail() {
    for body in [
        r#"{"title":"Only a title"}"#,
        r#"{"title":"","content":"<p>x</p>"}"#,
        r#"{"title":"T","content":42}"#,
        "I could not rewrite this entry.",
        "",
    ] {
        assert!(parse_enhancement(body).is_none(), "{body:?}");
    }
}

#[test]
fn decodable_answer_without_top_level_fields_is_not_recovered() {
    for body in [
        r#"{"entry":{"title":"Nested","content":"<p>x</p>"}}"#,
        "```json\n{\"result\": {\"title\": \"Nested\", \"content\": \"<p>x</p>\"}}\n```",
        r#"["{\"title\":\"T\",\"content\":\"C\"}"]"#,
    ] {
        assert!(parse_enhancement(body).is_none(), "{body:?}");
    }
}
