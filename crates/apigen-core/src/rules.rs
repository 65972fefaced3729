//! Naming-fix and ordering rules.
//!
//! Both rule kinds share [`RuleTarget`]: either an exact string, which must
//! equal the whole value, or a pattern, which matches anywhere in the value.
//!
//! In configuration files an exact target is a plain string and a pattern is
//! a map with a `pattern` key:
//!
//! ```yaml
//! function_name_rules:
//!   - target: delete
//!     replace: "delete{Group}"
//!   - target: { pattern: "^list" }
//!     replace: "list{Group}s"
//! type_order_rules:
//!   - { pattern: "^Common" }
//!   - { pattern: "Param$" }
//! ```
//!
//! Patterns that fail to compile are kept but never match.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::capitalize;

/// A compiled pattern that remembers its source text
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    regex: Option<Regex>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let regex = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(e) => {
                log::warn!("Ignoring rule pattern '{}': {}", source, e);
                None
            }
        };
        Self { source, regex }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(value))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// What a rule matches against
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTarget", into = "RawTarget")]
pub enum RuleTarget {
    Exact(String),
    Pattern(Pattern),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawTarget {
    Exact(String),
    Pattern { pattern: String },
}

impl From<RawTarget> for RuleTarget {
    fn from(raw: RawTarget) -> Self {
        match raw {
            RawTarget::Exact(s) => RuleTarget::Exact(s),
            RawTarget::Pattern { pattern } => RuleTarget::Pattern(Pattern::new(pattern)),
        }
    }
}

impl From<RuleTarget> for RawTarget {
    fn from(target: RuleTarget) -> Self {
        match target {
            RuleTarget::Exact(s) => RawTarget::Exact(s),
            RuleTarget::Pattern(p) => RawTarget::Pattern { pattern: p.source },
        }
    }
}

impl RuleTarget {
    pub fn exact(value: impl Into<String>) -> Self {
        Self::Exact(value.into())
    }

    pub fn pattern(source: impl Into<String>) -> Self {
        Self::Pattern(Pattern::new(source))
    }

    /// Exact targets need full equality, patterns a match anywhere
    pub fn matches(&self, value: &str) -> bool {
        match self {
            RuleTarget::Exact(target) => target == value,
            RuleTarget::Pattern(pattern) => pattern.is_match(value),
        }
    }
}

/// A naming-fix rule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixRule {
    pub target: RuleTarget,
    /// Replacement template; `{key}` and `{Key}` expand to the substitution
    /// parameter raw and capitalized
    pub replace: String,
}

impl FixRule {
    pub fn new(target: RuleTarget, replace: impl Into<String>) -> Self {
        Self {
            target,
            replace: replace.into(),
        }
    }

    /// Apply this rule to `value`.
    ///
    /// An exact target replaces the whole value when equal. A pattern target
    /// replaces its first match only, with `$n` capture references expanded.
    pub fn apply(&self, value: &str, key: &str, param: &str) -> String {
        let replacement = expand_placeholders(&self.replace, key, param);
        match &self.target {
            RuleTarget::Exact(target) if target == value => replacement,
            RuleTarget::Exact(_) => value.to_string(),
            RuleTarget::Pattern(pattern) => match &pattern.regex {
                Some(re) => re.replacen(value, 1, replacement.as_str()).into_owned(),
                None => value.to_string(),
            },
        }
    }
}

fn expand_placeholders(template: &str, key: &str, param: &str) -> String {
    template
        .replace(&format!("{{{}}}", key), param)
        .replace(&format!("{{{}}}", capitalize(key)), &capitalize(param))
}

/// Run every rule in order, each on the result of the previous one.
///
/// `key` names the placeholder (`group` for function names, `type` for type
/// names) that expands to `param` in replacement templates.
pub fn apply_fix_rules(rules: &[FixRule], value: &str, key: &str, param: &str) -> String {
    rules.iter().fold(value.to_string(), |current, rule| {
        let next = rule.apply(&current, key, param);
        if next != current {
            log::debug!("Rule {:?} renamed '{}' to '{}'", rule.target, current, next);
        }
        next
    })
}

/// Run type naming rules; `{type}` expands to the value as it stands when
/// each rule runs.
pub fn fix_type_name(rules: &[FixRule], type_name: &str) -> String {
    rules.iter().fold(type_name.to_string(), |current, rule| {
        rule.apply(&current, "type", &current)
    })
}

/// Placement bookkeeping for [`order_by_rules`]: an ordered slot list plus the
/// slot each item currently occupies.
struct Placement {
    slots: Vec<Option<usize>>,
    position: Vec<Option<usize>>,
}

impl Placement {
    fn new(len: usize) -> Self {
        Self {
            slots: Vec::with_capacity(len),
            position: vec![None; len],
        }
    }

    /// Place `item` at the end, vacating any earlier slot it held
    fn place(&mut self, item: usize) {
        if let Some(slot) = self.position[item] {
            self.slots[slot] = None;
        }
        self.position[item] = Some(self.slots.len());
        self.slots.push(Some(item));
    }

    fn is_placed(&self, item: usize) -> bool {
        self.position[item].is_some()
    }

    /// Ruled items in slot order, then unruled items in original order
    fn into_order(self) -> Vec<usize> {
        let unplaced = (0..self.position.len()).filter(|&i| self.position[i].is_none());
        self.slots.into_iter().flatten().chain(unplaced).collect()
    }
}

/// Reorder `items` by rules.
///
/// Each rule, in list order, places the items whose key it matches, in their
/// original relative order. An item matched again by a later rule moves to
/// that rule's position. Items no rule matches follow in original order.
pub fn order_by_rules<T, F>(items: Vec<T>, rules: &[RuleTarget], key: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    if rules.is_empty() {
        return items;
    }

    let mut placement = Placement::new(items.len());
    for rule in rules {
        for (index, item) in items.iter().enumerate() {
            if rule.matches(key(item)) {
                if placement.is_placed(index) {
                    log::debug!("Rule {:?} moves '{}'", rule, key(item));
                }
                placement.place(index);
            }
        }
    }

    let order = placement.into_order();
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(names: &[&str], rules: &[RuleTarget]) -> Vec<String> {
        let items: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        order_by_rules(items, rules, |s| s.as_str())
    }

    #[test]
    fn test_exact_fix_rule_uses_group_param() {
        let rule = FixRule::new(RuleTarget::exact("delete"), "delete{Group}");
        assert_eq!(rule.apply("delete", "group", "role"), "deleteRole");
        assert_eq!(rule.apply("deleteList", "group", "role"), "deleteList");
    }

    #[test]
    fn test_pattern_fix_rule_replaces_first_match_only() {
        let rule = FixRule::new(RuleTarget::pattern("_request"), "");
        assert_eq!(rule.apply("Role_request", "type", "Role_request"), "Role");

        let rule = FixRule::new(RuleTarget::pattern(">"), "[]>");
        assert_eq!(rule.apply("A<B<C>>", "type", ""), "A<B<C[]>>");
    }

    #[test]
    fn test_pattern_fix_rule_expands_captures() {
        let rule = FixRule::new(RuleTarget::pattern("(List[a-zA-Z]+)>"), "$1[]>");
        assert_eq!(
            rule.apply("CommonResult<ListResource>", "type", ""),
            "CommonResult<ListResource[]>"
        );
    }

    #[test]
    fn test_fix_rules_chain() {
        let rules = vec![
            FixRule::new(RuleTarget::pattern("(List[a-zA-Z]+)>"), "$1[]>"),
            FixRule::new(RuleTarget::pattern("<List"), "<"),
            FixRule::new(RuleTarget::pattern("<>"), ""),
        ];
        assert_eq!(
            apply_fix_rules(&rules, "CommonResult<ListResource>", "type", ""),
            "CommonResult<Resource[]>"
        );
        assert_eq!(
            apply_fix_rules(&rules, "CommonResult<>", "type", ""),
            "CommonResult"
        );
    }

    #[test]
    fn test_invalid_pattern_never_matches() {
        let rule = FixRule::new(RuleTarget::pattern("(unclosed"), "x");
        assert_eq!(rule.apply("(unclosed", "type", ""), "(unclosed");
        assert!(!RuleTarget::pattern("[").matches("["));
    }

    #[test]
    fn test_type_placeholder() {
        let rule = FixRule::new(RuleTarget::exact("Role"), "{Type}Dto");
        assert_eq!(rule.apply("Role", "type", "role"), "RoleDto");
    }

    #[test]
    fn test_fix_type_name_uses_current_value() {
        let rules = vec![
            FixRule::new(RuleTarget::pattern("_response$"), ""),
            FixRule::new(RuleTarget::exact("Role"), "{type}Vo"),
        ];
        assert_eq!(fix_type_name(&rules, "Role_response"), "RoleVo");
    }

    #[test]
    fn test_order_unmatched_keep_original_order() {
        let rules = vec![RuleTarget::pattern("^add")];
        assert_eq!(
            order(&["listRoles", "addRole", "deleteRole", "addUser"], &rules),
            vec!["addRole", "addUser", "listRoles", "deleteRole"]
        );
    }

    #[test]
    fn test_order_last_rule_wins() {
        let rules = vec![
            RuleTarget::pattern("^list"),
            RuleTarget::pattern("^delete"),
            RuleTarget::pattern("^listAll"),
        ];
        assert_eq!(
            order(
                &["listAllRoles", "deleteRole", "other", "listRoles"],
                &rules
            ),
            vec!["listRoles", "deleteRole", "listAllRoles", "other"]
        );
    }

    #[test]
    fn test_order_exact_rule_moves_too() {
        let rules = vec![RuleTarget::pattern("^get"), RuleTarget::exact("getRole")];
        assert_eq!(
            order(&["getRole", "getUser", "add"], &rules),
            vec!["getUser", "getRole", "add"]
        );
    }

    #[test]
    fn test_order_without_rules_is_identity() {
        assert_eq!(order(&["b", "a"], &[]), vec!["b", "a"]);
    }

    #[test]
    fn test_rule_target_from_yaml() {
        let targets: Vec<RuleTarget> =
            serde_yaml::from_str("- listAll\n- pattern: \"^get\"\n").unwrap();
        assert_eq!(targets[0], RuleTarget::exact("listAll"));
        assert!(targets[1].matches("getRole"));
        assert!(!targets[1].matches("forget"));
    }
}
