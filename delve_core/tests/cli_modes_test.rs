//! REPL and single-command modes driven through in-memory streams.

mod common;

use common::World;
use delve_core::shell::modes::{run_repl, run_single};
use delve_core::shell::render::OutputFormat;
use std::io::Cursor;

#[test]
fn test_single_command_exit_codes() {
    let world = World::new();
    let mut sandbox = world.sandbox();
    let mut out = Vec::new();

    assert_eq!(run_single(&mut sandbox, "mkdir hall", &mut out, OutputFormat::Text).unwrap(), 0);
    assert_eq!(run_single(&mut sandbox, "cd ..", &mut out, OutputFormat::Text).unwrap(), 1);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(&format!("+ {}", world.root.join("hall").display())));
}

#[test]
fn test_repl_stops_at_exit() {
    let world = World::new();
    let mut sandbox = world.sandbox();
    let input = Cursor::new("mkdir hall\n\ncd hall\nexit\nmkdir never\n");
    let mut out = Vec::new();

    let code = run_repl(&mut sandbox, input, &mut out, OutputFormat::Text).unwrap();
    assert_eq!(code, 0);
    assert!(world.root.join("hall").is_dir());
    assert!(!world.root.join("hall/never").exists());
    assert_eq!(sandbox.history().len(), 2);
}

#[test]
fn test_repl_json_lines() {
    let world = World::new();
    let mut sandbox = world.sandbox();
    let input = Cursor::new("touch lamp.item\nrm ../outside.txt\n");
    let mut out = Vec::new();

    let code = run_repl(&mut sandbox, input, &mut out, OutputFormat::Json).unwrap();
    assert_eq!(code, 1);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["success"], true);
    assert_eq!(lines[1]["success"], false);
}
