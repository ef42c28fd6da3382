//! Merging model source fragments

use std::collections::HashSet;

/// Tokens whose presence means nullable reference type annotations are in use
const NULLABLE_MARKERS: &[&str] = &["string?", "object?", "null!", "default!", "#nullable enable"];

/// Whether the text uses nullable reference type syntax.
///
/// A text heuristic, not a semantic analysis.
#[must_use]
pub fn detect_nullable_context(source: &str) -> bool {
    NULLABLE_MARKERS.iter().any(|marker| source.contains(marker))
}

fn is_using_directive(line: &str) -> bool {
    let rest = line.strip_prefix("global ").map_or(line, str::trim_start);
    rest.starts_with("using ") && rest.ends_with(';') && !rest.contains('(')
}

fn is_preamble_line(line: &str) -> bool {
    line.is_empty() || line.starts_with("//") || line.starts_with('#') || is_using_directive(line)
}

/// Merge fragments into one compilation unit.
///
/// The leading `using` / `global using` directives of every fragment are
/// hoisted to the top, deduplicated in first-seen order. The remainder of each
/// fragment follows in input order.
#[must_use]
pub fn merge_sources<S: AsRef<str>>(sources: &[S]) -> String {
    let mut seen = HashSet::new();
    let mut usings = Vec::new();
    let mut bodies = Vec::new();

    for source in sources {
        let mut body = Vec::new();
        let mut in_preamble = true;
        for line in source.as_ref().lines() {
            let trimmed = line.trim();
            if in_preamble && is_preamble_line(trimmed) {
                if is_using_directive(trimmed) {
                    if seen.insert(trimmed.to_string()) {
                        usings.push(trimmed.to_string());
                    }
                    continue;
                }
            } else {
                in_preamble = false;
            }
            body.push(line);
        }
        let body = body.join("\n");
        if !body.trim().is_empty() {
            bodies.push(body);
        }
    }

    let mut merged = usings.join("\n");
    for body in bodies {
        if !merged.is_empty() {
            merged.push_str("\n\n");
        }
        merged.push_str(body.trim_matches('\n'));
    }
    merged.push('\n');
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_hoists_and_dedups_usings() {
        let a = "using System;\nusing System.ComponentModel;\n\npublic class A { }";
        let b = "// header\nusing System;\nglobal using System.Linq;\npublic class B { }";
        let merged = merge_sources(&[a, b]);
        assert_eq!(
            merged,
            "using System;\nusing System.ComponentModel;\nglobal using System.Linq;\n\n\
             public class A { }\n\n// header\npublic class B { }\n"
        );
    }

    #[test]
    fn test_merge_keeps_usings_after_declarations() {
        let merged = merge_sources(&["public class A { }\nusing X;"]);
        assert_eq!(merged, "public class A { }\nusing X;\n");
    }

    #[test]
    fn test_detect_nullable_context() {
        assert!(detect_nullable_context("public string? Name { get; set; }"));
        assert!(detect_nullable_context("public string Title { get; set; } = null!;"));
        assert!(detect_nullable_context("#nullable enable\nclass A {}"));
        assert!(!detect_nullable_context("public int? Age { get; set; }"));
    }
}
