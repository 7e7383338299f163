use std::collections::VecDeque;
use std::fs;
use std::sync::{Arc, Mutex};

use alduin::SessionBuilder;
use alduin::core::{AgentEvent, AgentStage};
use alduin_model::Turn;
use alduin_test_model::{PresetResponse, TestModelProvider, tool_use};
use serde_json::json;
use tempfile::tempdir;

#[tokio::test]
async fn test_session_exposes_built_in_tools() {
    let provider = TestModelProvider::with_script([PresetResponse::text("Hi")]);
    let mut session = SessionBuilder::with_model_provider(provider.clone()).build();
    session.send_message("Hello").await.unwrap();

    let requests = provider.requests();
    let tools = &requests[0].tools;
    let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["read_file", "edit_file", "list_files", "bash"]);

    let edit_file = &tools[1];
    assert_eq!(
        edit_file.description,
        "Create or edit a file by replacing occurrences of a string."
    );
    assert_eq!(
        edit_file.parameters["properties"]["path"],
        json!({ "type": "string", "description": "The path to the file to edit." })
    );
    assert_eq!(
        edit_file.parameters["required"],
        json!(["path", "old_str", "new_str"])
    );
}

#[tokio::test]
async fn test_session_runs_tools() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.md"), "# Notes\n").unwrap();
    let path = dir.path().to_string_lossy().into_owned();

    let provider = TestModelProvider::with_script([
        PresetResponse::with_segments([tool_use(
            "call:1",
            "list_files",
            json!({ "path": path }),
        )]),
        PresetResponse::with_segments([tool_use(
            "call:2",
            "edit_file",
            json!({ "path": format!("{path}/todo.md"), "old_str": "", "new_str": "- ship\n" }),
        )]),
        PresetResponse::text("Created your todo list."),
    ]);
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut session = SessionBuilder::with_model_provider(provider.clone())
        .on_event({
            let events = Arc::clone(&events);
            move |event: AgentEvent| events.lock().unwrap().push(event)
        })
        .build();

    let mut input = VecDeque::from(["Make me a todo list".to_owned()]);
    session.run(&mut input).await.unwrap();

    assert_eq!(session.stage(), AgentStage::Closed);
    assert_eq!(provider.request_count(), 3);
    assert_eq!(
        fs::read_to_string(dir.path().join("todo.md")).unwrap(),
        "- ship\n"
    );

    let turns = session.agent().conversation().turns();
    let Turn::ToolResults(results) = &turns[2] else {
        panic!("expected tool results");
    };
    assert_eq!(results[0].content, "notes.md");

    let events = events.lock().unwrap();
    assert!(matches!(events.first(), Some(AgentEvent::UserMessage(_))));
    assert_eq!(events.last(), Some(&AgentEvent::Goodbye));
}

#[tokio::test]
async fn test_bash_needs_approval() {
    let provider = TestModelProvider::with_script([
        PresetResponse::with_segments([tool_use(
            "call:1",
            "bash",
            json!({ "command": "echo should-not-run" }),
        )]),
        PresetResponse::text("Okay, I won't."),
    ]);
    let mut session = SessionBuilder::with_model_provider(provider)
        .on_tool_call_request(|approval| approval.reject(None))
        .build();
    session.send_message("Run something").await.unwrap();

    let turns = session.agent().conversation().turns();
    let Turn::ToolResults(results) = &turns[2] else {
        panic!("expected tool results");
    };
    assert!(results[0].is_error);
    assert!(results[0].content.starts_with("Permission denied"));
}
