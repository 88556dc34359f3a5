//! Placeholder substitution: `{{ KEY }}` → value.

use crate::vars::VariableMap;
use regex::{Captures, Regex};
use std::sync::OnceLock;

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
static UNRESOLVED_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_re() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").unwrap())
}

fn unresolved_re() -> &'static Regex {
    UNRESOLVED_RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Z][A-Z0-9_]*)\s*\}\}").unwrap())
}

/// Replace every `{{ KEY }}` whose key is in `vars`.
///
/// The key must match a map entry exactly, so `{{FOO}}` is never touched by an
/// entry named `FOOBAR`. A `None` value renders as the empty string. Tokens
/// whose key is not in the map stay as they are, which is what lets workflow
/// expressions like `${{ secrets.TOKEN }}` through. Values are inserted
/// verbatim and are not scanned again.
pub fn substitute(template: &str, vars: &VariableMap) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.clone().unwrap_or_default(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Upper-case placeholder keys still present in `text`, in order of first appearance.
pub fn unresolved(text: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in unresolved_re().captures_iter(text) {
        let key = &caps[1];
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, Option<&str>)]) -> VariableMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn replaces_with_and_without_inner_whitespace() {
        let v = vars(&[("NAME", Some("shop"))]);
        assert_eq!(substitute("a {{NAME}} b {{ NAME }} c {{  NAME\t}}", &v), "a shop b shop c shop");
    }

    #[test]
    fn missing_value_renders_empty() {
        let v = vars(&[("MIGRATION_COMMAND", None)]);
        assert_eq!(substitute("run: {{ MIGRATION_COMMAND }}", &v), "run: ");
    }

    #[test]
    fn unknown_keys_stay_literal() {
        let v = vars(&[("NAME", Some("shop"))]);
        let text = "token: ${{ secrets.TOKEN }} other: {{ OTHER }}";
        assert_eq!(substitute(text, &v), text);
    }

    #[test]
    fn key_prefix_does_not_collide() {
        let v = vars(&[("FOOBAR", Some("x"))]);
        assert_eq!(substitute("{{FOO}} {{FOOBAR}}", &v), "{{FOO}} x");

        let v = vars(&[("FOO", Some("short")), ("FOOBAR", Some("long"))]);
        assert_eq!(substitute("{{FOOBAR}}/{{FOO}}", &v), "long/short");
    }

    #[test]
    fn values_are_inserted_verbatim() {
        let v = vars(&[
            ("CMD", Some("echo $HOME ${1} {{ NAME }}")),
            ("NAME", Some("shop")),
        ]);
        assert_eq!(substitute("{{ CMD }}", &v), "echo $HOME ${1} {{ NAME }}");
    }

    #[test]
    fn unused_keys_are_ignored() {
        let v = vars(&[("A", Some("1")), ("B", Some("2"))]);
        assert_eq!(substitute("plain text", &v), "plain text");
    }

    #[test]
    fn totality_when_all_keys_present() {
        let config = crate::config::ScaffoldConfig::new("shop", crate::types::Stack::Node).unwrap();
        let v = crate::vars::variables(&config);
        let template: String = crate::vars::TemplateVars::all()
            .iter()
            .map(|k| format!("{k}={{{{ {k} }}}}\n"))
            .collect();
        let out = substitute(&template, &v);
        assert!(unresolved(&out).is_empty(), "left: {:?}", unresolved(&out));
    }

    #[test]
    fn unresolved_lists_each_key_once() {
        let text = "{{ A }} {{B}} {{ A }} ${{ github.sha }}";
        assert_eq!(unresolved(text), vec!["A".to_string(), "B".to_string()]);
    }
}
