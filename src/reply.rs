//! Decomposes a raw AI response into a primary message and tool output
//!
//! Backends that execute tools append each tool report after the natural
//! language reply, separated by a blank line and opened by a success or
//! failure marker. Everything before the first marker is the primary
//! message; everything from the first marker on is re-joined into a single
//! tool-output block.

/// Marker opening a successful tool report
pub const TOOL_SUCCESS_MARKER: &str = "✅ Tool";

/// Marker opening a failed tool report
pub const TOOL_FAILURE_MARKER: &str = "❌ Tool";

/// A decomposed AI response
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecomposedReply {
    /// Natural-language portion of the response
    pub primary: String,

    /// Tool reports, re-joined into at most one block
    pub tool_outputs: Vec<String>,
}

impl DecomposedReply {
    /// Check whether the response carried any tool output
    pub fn has_tool_output(&self) -> bool {
        !self.tool_outputs.is_empty()
    }
}

/// Split a response at tool-report boundaries.
///
/// A boundary is the literal sequence `"\n\n"` immediately followed by one
/// of the tool markers. With no boundary present the whole input is the
/// primary message, even if a marker appears mid-line. With one or more
/// boundaries, the text after the first boundary becomes one tool-output
/// entry: each segment keeps its marker, and the blank-line separators
/// between segments are consumed by the split. Multiple tool reports are
/// deliberately not separated; callers render the block as a single entry.
pub fn decompose_reply(response: &str) -> DecomposedReply {
    let boundaries = find_boundaries(response);

    let Some(&first) = boundaries.first() else {
        return DecomposedReply {
            primary: response.to_string(),
            tool_outputs: Vec::new(),
        };
    };

    let mut block = String::new();
    for (i, &start) in boundaries.iter().enumerate() {
        let end = boundaries.get(i + 1).copied().unwrap_or(response.len());
        block.push_str(&response[start + 2..end]);
    }

    DecomposedReply {
        primary: response[..first].to_string(),
        tool_outputs: vec![block],
    }
}

/// Byte offsets of split boundaries, left to right.
///
/// Each offset points at the `"\n\n"`. The scan resumes after a matched
/// marker, so boundaries never overlap.
fn find_boundaries(response: &str) -> Vec<usize> {
    let mut boundaries = Vec::new();
    let mut at = 0;

    while at < response.len() {
        let rest = &response[at..];
        let matched = [TOOL_SUCCESS_MARKER, TOOL_FAILURE_MARKER]
            .iter()
            .find_map(|marker| {
                rest.strip_prefix("\n\n")
                    .filter(|tail| tail.starts_with(marker))
                    .map(|_| 2 + marker.len())
            });

        match matched {
            Some(len) => {
                boundaries.push(at);
                at += len;
            }
            None => {
                at += rest.chars().next().map_or(1, |c| c.len_utf8());
            }
        }
    }

    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_response_passes_through() {
        let reply = decompose_reply("Hello! How can I help?");
        assert_eq!(reply.primary, "Hello! How can I help?");
        assert!(reply.tool_outputs.is_empty());
        assert!(!reply.has_tool_output());
    }

    #[test]
    fn test_success_marker_splits() {
        let reply = decompose_reply("A\n\n✅ Tool ran");
        assert_eq!(reply.primary, "A");
        assert_eq!(reply.tool_outputs, vec!["✅ Tool ran".to_string()]);
    }

    #[test]
    fn test_failure_marker_splits() {
        let reply = decompose_reply("Sorry, that failed.\n\n❌ Tool [search] failed: timeout");
        assert_eq!(reply.primary, "Sorry, that failed.");
        assert_eq!(
            reply.tool_outputs,
            vec!["❌ Tool [search] failed: timeout".to_string()]
        );
    }

    #[test]
    fn test_multiple_tool_reports_stay_joined() {
        let reply = decompose_reply("A\n\n✅ Tool one\n\n❌ Tool two");
        assert_eq!(reply.primary, "A");
        // One block; the separators between reports are consumed by the split
        assert_eq!(reply.tool_outputs, vec!["✅ Tool one❌ Tool two".to_string()]);
    }

    #[test]
    fn test_empty_primary_is_preserved() {
        let reply = decompose_reply("\n\n✅ Tool ran");
        assert_eq!(reply.primary, "");
        assert_eq!(reply.tool_outputs, vec!["✅ Tool ran".to_string()]);
    }

    #[test]
    fn test_marker_without_blank_line_is_primary() {
        let reply = decompose_reply("Done ✅ Tool ran");
        assert_eq!(reply.primary, "Done ✅ Tool ran");
        assert!(reply.tool_outputs.is_empty());
    }

    #[test]
    fn test_single_newline_does_not_split() {
        let reply = decompose_reply("A\n✅ Tool ran");
        assert_eq!(reply.primary, "A\n✅ Tool ran");
        assert!(reply.tool_outputs.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let reply = decompose_reply("");
        assert_eq!(reply.primary, "");
        assert!(reply.tool_outputs.is_empty());
    }

    #[test]
    fn test_boundary_at_end_keeps_bare_marker() {
        let reply = decompose_reply("A\n\n✅ Tool");
        assert_eq!(reply.primary, "A");
        assert_eq!(reply.tool_outputs, vec!["✅ Tool".to_string()]);
    }

    #[test]
    fn test_multiline_primary_kept_intact() {
        let reply = decompose_reply("First paragraph.\n\nSecond paragraph.");
        assert_eq!(reply.primary, "First paragraph.\n\nSecond paragraph.");
        assert!(reply.tool_outputs.is_empty());
    }

    #[test]
    fn test_extra_newline_stays_with_primary() {
        let reply = decompose_reply("A\n\n\n✅ Tool x");
        assert_eq!(reply.primary, "A\n");
        assert_eq!(reply.tool_outputs, vec!["✅ Tool x".to_string()]);
    }

    #[test]
    fn test_realistic_tool_report() {
        let response = "The weather in Stockholm is sunny.\n\n\
                        ✅ Tool [get_weather] executed successfully: 22°C, clear skies";
        let reply = decompose_reply(response);
        assert_eq!(reply.primary, "The weather in Stockholm is sunny.");
        assert_eq!(reply.tool_outputs.len(), 1);
        assert!(reply.tool_outputs[0].starts_with("✅ Tool [get_weather]"));
    }
}
