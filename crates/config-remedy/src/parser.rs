//! Indentation-aware configuration parser
//!
//! Turns raw device output into a populated [`Config`] tree: banner blocks
//! are aggregated into single nodes, substitution rules scrub transient
//! lines, indent-adjust rules deepen regions the device prints flat, and
//! previously emitted sectional exits are stripped so that parse and dump
//! stay symmetric. JunOS brace-format input is flattened to set-format by
//! the driver's preprocessor before any of this runs.

use regex::Regex;
use std::collections::HashSet;

use crate::driver::Driver;
use crate::error::{ConfigRemedyError, Result};
use crate::tree::{Config, NodeId, ROOT};

impl Config {
    /// Parse raw configuration text with the full pipeline: preprocessor,
    /// whole-text substitutions, banner aggregation, per-line substitutions,
    /// indentation tracking, sectional-exit stripping and post-load
    /// callbacks.
    ///
    /// # Errors
    /// Returns an error when a banner is still open at the end of the text.
    pub fn parse(driver: Driver, text: &str) -> Result<Self> {
        let preprocessed = driver.config_preprocessor(text);
        let mut text = preprocessed.into_owned();
        for rule in &driver.rules().full_text_sub {
            text = rule
                .search
                .replace_all(&text, rule.replace.as_str())
                .into_owned();
        }

        let mut config = Config::new(driver.clone());
        load_lines(&mut config, &driver, &text)?;

        config.delete_sectional_exits();
        for callback in &driver.rules().post_load_callbacks {
            callback(&mut config);
        }
        Ok(config)
    }

    /// Parse pre-normalized lines, skipping banner aggregation and every
    /// substitution rule. Callers use this when the input is already clean,
    /// e.g. lines produced by [`Config::dump`] consumers.
    #[must_use]
    pub fn parse_from_lines_fast<I, S>(driver: Driver, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Config::new(driver);
        let mut current_section = ROOT;
        let mut most_recent = ROOT;

        for line in lines {
            let line = line.as_ref();
            let stripped = line.trim_start();
            if stripped.is_empty() {
                continue;
            }
            let indent = (line.len() - stripped.len()) as i32;
            let normalized = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
            (most_recent, current_section) =
                analyze_indent(&mut config, most_recent, current_section, indent, &normalized);
        }

        config.delete_sectional_exits();
        config
    }
}

/// Resolve the parent of a line from its effective indentation: ascend while
/// the current section is at least as deep, then descend one step when the
/// line is deeper than the most recently added one.
fn analyze_indent(
    config: &mut Config,
    most_recent: NodeId,
    mut current_section: NodeId,
    indent: i32,
    line: &str,
) -> (NodeId, NodeId) {
    while indent <= config.real_indent_level(current_section) {
        current_section = config.parent(current_section);
    }

    if indent > config.real_indent_level(most_recent) {
        current_section = most_recent;
    }

    let added = config.add_child(current_section, line);
    config.set_real_indent_level(added, indent);

    (added, current_section)
}

fn end_of_banner_test(
    line: &str,
    banner_end_lines: &HashSet<String>,
    banner_end_contains: &[String],
) -> bool {
    if line.starts_with('^') {
        return true;
    }
    if banner_end_lines.contains(line) {
        return true;
    }
    banner_end_contains.iter().any(|token| line.contains(token))
}

fn load_lines(config: &mut Config, driver: &Driver, text: &str) -> Result<()> {
    let mut current_section = ROOT;
    let mut most_recent = ROOT;
    let mut indent_adjust = 0i32;
    let mut end_adjust: Vec<Regex> = Vec::new();
    let mut temp_banner: Vec<&str> = Vec::new();
    let mut banner_end_lines: HashSet<String> =
        ["EOF", "%", "!"].into_iter().map(str::to_string).collect();
    let mut banner_end_contains: Vec<String> = Vec::new();
    let mut in_banner = false;

    for line in text.lines() {
        // Aggregate banner bodies into a single node
        if in_banner {
            if line != "!" {
                temp_banner.push(line);
            }
            if end_of_banner_test(line, &banner_end_lines, &banner_end_contains) {
                in_banner = false;
                let banner = temp_banner.join("\n");
                most_recent = config.add_child(ROOT, &banner);
                config.set_real_indent_level(most_recent, 0);
                current_section = ROOT;
                temp_banner.clear();
            }
            continue;
        }

        // An empty `banner motd ##` has been seen on NX-OS; it opens nothing
        if line.starts_with("banner ") && line != "banner motd ##" {
            in_banner = true;
            temp_banner.push(line);
            let words: Vec<&str> = line.split_whitespace().collect();
            if let Some(word) = words.get(2) {
                banner_end_contains.push((*word).to_string());
                // ArubaOS-Switch delimits banners with a quoted token
                if word.starts_with('"') {
                    banner_end_contains.push("\"".to_string());
                }
                banner_end_lines.insert(word.chars().take(1).collect());
                banner_end_lines.insert(word.chars().take(2).collect());
            }
            continue;
        }

        let actual_indent = line.len() - line.trim_start().len();
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut processed = format!("{}{collapsed}", " ".repeat(actual_indent));
        for rule in &driver.rules().per_line_sub {
            processed = rule
                .search
                .replace_all(&processed, rule.replace.as_str())
                .into_owned();
        }
        let processed = processed.trim_end();
        if processed.is_empty() {
            continue;
        }

        let stripped = processed.trim_start();
        let this_indent = (processed.len() - stripped.len()) as i32 + indent_adjust;

        (most_recent, current_section) =
            analyze_indent(config, most_recent, current_section, this_indent, stripped);

        for rule in &driver.rules().indent_adjust {
            if rule.start_expression.is_match(stripped) {
                indent_adjust += 1;
                end_adjust.push(rule.end_expression.clone());
                break;
            }
        }
        if !end_adjust.is_empty() && end_adjust[0].is_match(stripped) {
            indent_adjust -= 1;
            end_adjust.remove(0);
        }
    }

    if in_banner {
        return Err(ConfigRemedyError::Parse(
            "still inside a banner at the end of the configuration".to_string(),
        ));
    }
    Ok(())
}

/// Convert a JunOS brace-format configuration into set commands.
///
/// Headers ending with `{` are pushed onto a path stack, lines ending with
/// `}` close their block, and ordinary lines become `set <path...> <line>`
/// unless they already carry a `set `/`delete ` form. Levels are derived
/// from leading 4-space groups; trailing semicolons are dropped.
#[must_use]
pub fn convert_to_set_commands(raw: &str) -> String {
    let mut path: Vec<String> = Vec::new();
    let mut set_commands: Vec<String> = Vec::new();

    for line in raw.split('\n') {
        let mut stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }
        if let Some(rest) = stripped.strip_suffix(';') {
            stripped = rest;
        }

        let level = (line.len() - line.trim_start().len()) / 4;
        path.truncate(level);

        if let Some(header) = stripped.strip_suffix('{') {
            path.push(header.trim().to_string());
        } else if stripped.ends_with('}') {
            // the truncate above already closed the block
        } else if stripped.starts_with("set") || stripped.starts_with("delete") {
            set_commands.push(stripped.to_string());
        } else {
            let mut parts: Vec<&str> = vec!["set"];
            parts.extend(path.iter().map(String::as_str));
            parts.push(stripped);
            set_commands.push(parts.join(" "));
        }
    }

    set_commands.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Platform, get_driver};

    #[test]
    fn test_simple_hierarchy() {
        let driver = get_driver(Platform::Generic).unwrap();
        let config = Config::parse(
            driver,
            "hostname test\ninterface Vlan2\n ip address 10.0.0.1 255.255.255.0\n no shutdown\n",
        )
        .unwrap();

        let interface = config.child_by_text(ROOT, "interface Vlan2").unwrap();
        assert_eq!(config.children(interface).len(), 2);
        assert!(config.child_by_text(ROOT, "hostname test").is_some());
    }

    #[test]
    fn test_sibling_after_section() {
        let driver = get_driver(Platform::Generic).unwrap();
        let config = Config::parse(
            driver,
            "interface Vlan2\n description one\ninterface Vlan3\n description two\n",
        )
        .unwrap();

        assert_eq!(config.children(ROOT).len(), 2);
        let vlan3 = config.child_by_text(ROOT, "interface Vlan3").unwrap();
        assert!(config.child_by_text(vlan3, "description two").is_some());
    }

    #[test]
    fn test_whitespace_collapse() {
        let driver = get_driver(Platform::Generic).unwrap();
        let config = Config::parse(driver, "hostname     test\n").unwrap();
        assert!(config.child_by_text(ROOT, "hostname test").is_some());
    }

    #[test]
    fn test_per_line_sub_scrubs_preamble() {
        let driver = get_driver(Platform::CiscoIos).unwrap();
        let config = Config::parse(
            driver,
            "Building configuration...\nCurrent configuration : 1444 bytes\nhostname test\nend\n",
        )
        .unwrap();
        assert_eq!(config.children(ROOT).len(), 1);
        assert!(config.child_by_text(ROOT, "hostname test").is_some());
    }

    #[test]
    fn test_banner_aggregation() {
        let driver = get_driver(Platform::CiscoIos).unwrap();
        let config = Config::parse(
            driver,
            "hostname test\nbanner motd ^C\nAuthorized access only\n^C\nip routing\n",
        )
        .unwrap();

        let banner = config
            .children(ROOT)
            .iter()
            .copied()
            .find(|&c| config.text(c).starts_with("banner motd"))
            .unwrap();
        assert!(config.text(banner).contains("Authorized access only"));
        assert!(config.child_by_text(ROOT, "ip routing").is_some());
    }

    #[test]
    fn test_unterminated_banner_is_an_error() {
        let driver = get_driver(Platform::CiscoIos).unwrap();
        let result = Config::parse(driver, "banner motd ^C\nnever closed\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_sectional_exit_stripping() {
        let driver = get_driver(Platform::CiscoIos).unwrap();
        let config = Config::parse(
            driver,
            "router bgp 65000\n address-family ipv4\n  network 10.0.0.0 mask 255.255.255.0\n exit-address-family\n",
        )
        .unwrap();

        let bgp = config.child_by_text(ROOT, "router bgp 65000").unwrap();
        let af = config.child_by_text(bgp, "address-family ipv4").unwrap();
        assert!(config.child_by_text(af, "exit-address-family").is_none());
    }

    #[test]
    fn test_indent_adjust_for_flat_templates() {
        let driver = get_driver(Platform::CiscoXr).unwrap();
        let config = Config::parse(
            driver,
            "template ONE\ndescription inside\nend-template\nhostname test\n",
        )
        .unwrap();

        let template = config.child_by_text(ROOT, "template ONE").unwrap();
        assert!(config.child_by_text(template, "description inside").is_some());
        assert!(config.child_by_text(ROOT, "hostname test").is_some());
    }

    #[test]
    fn test_fast_load_skips_substitutions() {
        let driver = get_driver(Platform::CiscoIos).unwrap();
        let config = Config::parse_from_lines_fast(driver, ["version 15.2", "hostname test"]);
        // the full parser would have scrubbed `version ...`
        assert!(config.child_by_text(ROOT, "version 15.2").is_some());
    }

    #[test]
    fn test_convert_to_set_commands() {
        let raw = "vlans {\n    switch_mgmt {\n        vlan-id 2;\n    }\n}\n";
        assert_eq!(
            convert_to_set_commands(raw),
            "set vlans switch_mgmt vlan-id 2"
        );
    }

    #[test]
    fn test_convert_passes_existing_set_commands() {
        let raw = "set vlans A vlan-id 2\ndelete vlans B\n";
        assert_eq!(
            convert_to_set_commands(raw),
            "set vlans A vlan-id 2\ndelete vlans B"
        );
    }

    #[test]
    fn test_junos_brace_parse() {
        let driver = get_driver(Platform::JuniperJunos).unwrap();
        let config = Config::parse(
            driver,
            "vlans {\n    switch_mgmt {\n        vlan-id 2;\n    }\n}\n",
        )
        .unwrap();
        assert!(
            config
                .child_by_text(ROOT, "set vlans switch_mgmt vlan-id 2")
                .is_some()
        );
    }
}
