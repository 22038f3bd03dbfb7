use anyhow::Error;

pub(crate) fn format(err: &Error) -> String {
    let mut out = format!("Error: {err:#}");
    let hints = suggestions(err);
    if !hints.is_empty() {
        out.push_str("\n\nHints:\n");
        for hint in hints {
            out.push_str("- ");
            out.push_str(&hint);
            out.push('\n');
        }
    }
    out
}

fn suggestions(err: &Error) -> Vec<String> {
    let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
    let haystack = chain.join(" | ").to_ascii_lowercase();
    let mut out: Vec<String> = Vec::new();

    if haystack.contains("git is not available on path") {
        push_hint(&mut out, "Install git and verify it with `git --version`.");
    }

    if haystack.contains("not inside a git repository") {
        push_hint(&mut out, "Point `--repo` at a git checkout.");
        push_hint(&mut out, "Initialize git first if needed: `git init`.");
    }

    if haystack.contains("not found") || haystack.contains("no such file or directory") {
        push_hint(&mut out, "Verify the path exists and is readable.");
        push_hint(
            &mut out,
            "Relative paths in dtok.toml resolve from the config file's directory.",
        );
    }

    if haystack.contains("toml") && (haystack.contains("parse") || haystack.contains("invalid")) {
        push_hint(
            &mut out,
            "Check `dtok.toml` syntax and key names, or regenerate with `dtok init --force`.",
        );
    }

    if haystack.contains("invalid pattern for token format") || haystack.contains("duplicate token format") {
        push_hint(
            &mut out,
            "Run `dtok formats` to see registered format names; `[[formats]]` names must be unique.",
        );
    }

    if haystack.contains("duplicate repository name") {
        push_hint(
            &mut out,
            "Give each `[[repositories]]` entry a unique `name`; it names the checkout directory.",
        );
    }

    if haystack.contains("token dictionary") {
        push_hint(
            &mut out,
            "The dictionary file must be a JSON array of objects with `name`, `tier` and `type`.",
        );
    }

    out
}

fn push_hint(out: &mut Vec<String>, hint: &str) {
    if !out.iter().any(|h| h == hint) {
        out.push(hint.to_string());
    }
}
