//! Stack trace parsing and path normalization.
//!
//! Raw stack text arrives as V8-style lines (`at fn (file:line:col)`). Each
//! parseable line becomes a [`Frame`]; everything else (the leading
//! `Error: message` line, blank lines, native frames) is skipped. File paths
//! are rewritten so payloads do not leak machine-specific prefixes.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Token substituted for a nested vendor-module prefix.
pub const NODE_MODULES_TOKEN: &str = "[NODE_MODULES]";

/// Token substituted for the configured project root prefix.
pub const PROJECT_ROOT_TOKEN: &str = "[PROJECT_ROOT]";

const NODE_MODULES_SEGMENT: &str = "node_modules/";

/// One entry of a normalized stack trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// File path after substitution rules have been applied.
    pub file: String,
    /// Line number, 0 when unknown.
    pub line: u32,
    /// Function or method name, if the frame carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Parse raw stack text into ordered frames, innermost call first.
///
/// Lines that do not look like stack frames are dropped. This function never
/// fails; unparseable input yields an empty backtrace.
pub fn parse_backtrace(raw: &str, project_root: Option<&str>) -> Vec<Frame> {
    // at <fn> (<file>:<line>:<col>)  |  at <file>:<line>:<col>
    let frame_re =
        Regex::new(r"^\s*at\s+(?:(?P<method>[^()]+?)\s+\()?(?P<file>.+?):(?P<line>\d+)(?::(?P<col>\d+))?\)?\s*$")
            .unwrap();

    raw.lines()
        .filter_map(|line| {
            let caps = frame_re.captures(line)?;
            let file = caps.name("file")?.as_str();
            let line_no = caps
                .name("line")
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);
            let method = caps.name("method").map(|m| m.as_str().trim().to_string());

            Some(Frame {
                file: substitute_path(file, project_root),
                line: line_no,
                method,
            })
        })
        .collect()
}

/// Apply path substitution rules, first match wins.
///
/// Nested vendor paths (two or more `node_modules/` boundaries) collapse
/// through the last boundary; a single vendored segment falls through to the
/// project-root rule. Substitution is purely textual.
fn substitute_path(file: &str, project_root: Option<&str>) -> String {
    let boundaries: Vec<usize> = file
        .match_indices(NODE_MODULES_SEGMENT)
        .map(|(idx, _)| idx)
        .collect();
    if boundaries.len() >= 2 {
        let tail_start = boundaries[boundaries.len() - 1] + NODE_MODULES_SEGMENT.len();
        return format!("{}/{}", NODE_MODULES_TOKEN, &file[tail_start..]);
    }

    if let Some(root) = project_root.filter(|r| !r.is_empty()) {
        if let Some(rest) = file.strip_prefix(root) {
            return format!("{}{}", PROJECT_ROOT_TOKEN, rest);
        }
    }

    file.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STACK: &str = "Error: boom\n    at handler (/path/to/app/lib/x.js:10:5)\n    at /path/to/app/lib/y.js:22:3\n    at process.processTicksAndRejections (node:internal/process/task_queues:95:5)";

    #[test]
    fn test_parses_frames_in_stack_order() {
        let frames = parse_backtrace(STACK, None);

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].file, "/path/to/app/lib/x.js");
        assert_eq!(frames[0].line, 10);
        assert_eq!(frames[0].method.as_deref(), Some("handler"));
        assert_eq!(frames[1].file, "/path/to/app/lib/y.js");
        assert_eq!(frames[1].method, None);
    }

    #[test]
    fn test_skips_non_frame_lines() {
        let frames = parse_backtrace("Error: boom\n\nsome noise\n    at native", None);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_backtrace() {
        assert!(parse_backtrace("", Some("/path/to/app")).is_empty());
    }

    #[test]
    fn test_project_root_substitution() {
        let frames = parse_backtrace(STACK, Some("/path/to/app"));

        assert_eq!(frames[0].file, "[PROJECT_ROOT]/lib/x.js");
        assert_eq!(frames[1].file, "[PROJECT_ROOT]/lib/y.js");
    }

    #[test]
    fn test_path_outside_project_root_left_unmodified() {
        let stack = "    at outside (/other/place/z.js:7:1)";
        let frames = parse_backtrace(stack, Some("/path/to/app"));

        assert_eq!(frames[0].file, "/other/place/z.js");
        assert!(!frames[0].file.starts_with(PROJECT_ROOT_TOKEN));
    }

    #[test]
    fn test_nested_node_modules_collapse_through_last_boundary() {
        let stack = "    at run (/root/node_modules/foo/node_modules/bar/baz.js:1:1)";
        let frames = parse_backtrace(stack, None);

        assert_eq!(frames[0].file, "[NODE_MODULES]/bar/baz.js");
    }

    #[test]
    fn test_node_modules_collapse_wins_over_project_root() {
        let stack = "    at run (/app/node_modules/a/node_modules/b/c.js:1:1)";
        let frames = parse_backtrace(stack, Some("/app"));

        assert_eq!(frames[0].file, "[NODE_MODULES]/b/c.js");
    }

    #[test]
    fn test_single_node_modules_segment_falls_through() {
        let stack = "    at run (/app/node_modules/foo/index.js:3:9)";
        let frames = parse_backtrace(stack, Some("/app"));

        assert_eq!(frames[0].file, "[PROJECT_ROOT]/node_modules/foo/index.js");
    }

    #[test]
    fn test_method_omitted_from_serialized_frame_when_absent() {
        let frames = parse_backtrace("    at /a/b.js:1:2", None);
        let json = serde_json::to_value(&frames[0]).unwrap();

        assert!(json.get("method").is_none());
        assert_eq!(json["line"], 1);
    }
}
