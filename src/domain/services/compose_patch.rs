//! Compose manifest patching
//!
//! Publishes `"443:443"` on the proxy service by inserting a line right after
//! its `"80:80"` mapping. Purely textual so operator edits elsewhere in the
//! file survive.

/// Result of a patch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// New manifest text with the mapping inserted
    Patched(String),
    /// Mapping already published; nothing to do
    AlreadyPresent,
    /// A structural marker is absent; the file must stay untouched
    MarkerMissing(&'static str),
}

const HTTPS_MAPPING: &str = "\"443:443\"";

/// Insert the 443 mapping after the proxy service's 80 mapping.
///
/// Requires, in order: a `  <service>:` line, a `    ports:` line inside that
/// service, and a `      - "80:80"` entry in that ports list.
pub fn add_https_port(manifest: &str, service: &str) -> PatchOutcome {
    let lines: Vec<&str> = manifest.lines().collect();
    let header = format!("  {}:", service);

    let Some(start) = lines.iter().position(|l| l.trim_end() == header) else {
        return PatchOutcome::MarkerMissing("proxy service block");
    };
    let end = lines[start + 1..]
        .iter()
        .position(|l| !l.trim().is_empty() && indent(l) <= 2)
        .map(|p| start + 1 + p)
        .unwrap_or(lines.len());
    let block = &lines[start + 1..end];

    if block.iter().any(|l| l.contains(HTTPS_MAPPING)) {
        return PatchOutcome::AlreadyPresent;
    }

    let Some(ports) = block.iter().position(|l| l.trim_end() == "    ports:") else {
        return PatchOutcome::MarkerMissing("ports section");
    };
    let Some(http) = block[ports + 1..]
        .iter()
        .take_while(|l| indent(l) > 4 || l.trim().is_empty())
        .position(|l| l.trim() == "- \"80:80\"")
    else {
        return PatchOutcome::MarkerMissing("\"80:80\" mapping");
    };

    let insert_at = start + 1 + ports + 1 + http + 1;
    let http_line = lines[insert_at - 1];
    let prefix = &http_line[..http_line.len() - http_line.trim_start().len()];

    let mut out: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    out.insert(insert_at, format!("{}- {}", prefix, HTTPS_MAPPING));
    let mut text = out.join("\n");
    if manifest.ends_with('\n') {
        text.push('\n');
    }
    PatchOutcome::Patched(text)
}

fn indent(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
