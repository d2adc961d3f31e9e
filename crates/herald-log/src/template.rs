//! Positional message templates.
//!
//! # Design
//! - A template without arguments is emitted verbatim, so object text and serialized
//!   payloads containing braces are never reinterpreted.
//! - `{0}` selects an argument by position; `{}` and named holes such as `{user}`
//!   consume arguments in order.
//! - `{N,width}` pads the rendered argument; a `:format` suffix is accepted and ignored.
//! - Arity mismatches are tolerated: unresolved holes stay in the output as written.

use std::fmt::Display;

/// Render `template` with the supplied positional arguments.
#[must_use]
pub fn render_template(template: &str, args: &[&dyn Display]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len().saturating_add(args.len() * 8));
    let mut next = 0usize;
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        let Some(end) = tail.find('}') else {
            out.push_str(tail);
            rest = "";
            break;
        };
        let hole = &tail[1..end];
        if hole.contains('{') {
            out.push('{');
            rest = &tail[1..];
            continue;
        }

        match resolve_hole(hole, args, &mut next) {
            Some(text) => out.push_str(&text),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }

    out.push_str(rest);
    out
}

fn resolve_hole(hole: &str, args: &[&dyn Display], next: &mut usize) -> Option<String> {
    let head = hole.split_once(':').map_or(hole, |(head, _format)| head);
    let (name, width) = match head.split_once(',') {
        Some((name, width)) => (name.trim(), Some(width.trim().parse::<i64>().ok()?)),
        None => (head.trim(), None),
    };

    let index = if let Ok(index) = name.parse::<usize>() {
        index
    } else if name.is_empty() || is_hole_name(name) {
        let index = *next;
        *next = next.saturating_add(1);
        index
    } else {
        return None;
    };

    // std formatting rejects widths above u16::MAX at runtime.
    let padding = match width {
        Some(width) => usize::from(u16::try_from(width.unsigned_abs()).ok()?),
        None => 0,
    };
    let text = args.get(index)?.to_string();
    Some(match width {
        Some(width) if width > 0 => format!("{text:>padding$}"),
        Some(width) if width < 0 => format!("{text:<padding$}"),
        _ => text,
    })
}

fn is_hole_name(name: &str) -> bool {
    let name = name.trim_start_matches(['@', '$']);
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '.')
}
