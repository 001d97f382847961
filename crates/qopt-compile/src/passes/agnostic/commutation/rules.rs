//! Pairwise commutation rules.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use qopt_ir::{Instruction, QubitId};

use crate::error::CompileResult;

/// The parts of an operation a commutation rule may look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor<'a> {
    /// Gate name, e.g. `"cz"`.
    pub name: &'a str,
    /// Operand qubits in order.
    pub qubits: &'a [QubitId],
}

impl<'a> OperationDescriptor<'a> {
    /// Describe an operation by name and qubits.
    pub fn new(name: &'a str, qubits: &'a [QubitId]) -> Self {
        Self { name, qubits }
    }
}

impl<'a> From<&'a Instruction> for OperationDescriptor<'a> {
    fn from(inst: &'a Instruction) -> Self {
        Self {
            name: inst.name(),
            qubits: &inst.qubits,
        }
    }
}

/// One serialized table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Name of the later operation.
    pub first: String,
    /// Name of its predecessor.
    pub second: String,
    /// Whether the later operation may move before the predecessor.
    pub commutes: bool,
}

/// Ordered `(later, earlier)` gate-name pairs mapped to a commutation verdict.
///
/// Lookups are by name only. No qubit overlap or parameter check is made,
/// so an entry asserts that the two gates commute on *every* qubit
/// assignment. That holds for few real pairs: the default `("cz", "x")`
/// entry is kept for compatibility but is not a physical identity, so
/// rewrites driven by it can change what a circuit computes.
///
/// Serialized as a JSON list of `{ "first", "second", "commutes" }`
/// objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RuleEntry>", into = "Vec<RuleEntry>")]
pub struct CommutationTable {
    rules: BTreeMap<String, BTreeMap<String, bool>>,
}

impl CommutationTable {
    /// A table with no rules; nothing commutes.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Add a rule, builder style.
    #[must_use]
    pub fn with_rule(mut self, first: &str, second: &str, commutes: bool) -> Self {
        self.insert(first, second, commutes);
        self
    }

    /// Add or replace a rule.
    pub fn insert(&mut self, first: &str, second: &str, commutes: bool) {
        self.rules
            .entry(first.to_string())
            .or_default()
            .insert(second.to_string(), commutes);
    }

    /// The stored verdict for `(first, second)`, if any.
    pub fn lookup(&self, first: &str, second: &str) -> Option<bool> {
        self.rules.get(first)?.get(second).copied()
    }

    /// Whether `node` may be moved before its predecessor `pred`.
    ///
    /// Missing entries answer `false`.
    pub fn commutes(&self, node: &OperationDescriptor<'_>, pred: &OperationDescriptor<'_>) -> bool {
        self.lookup(node.name, pred.name).unwrap_or(false)
    }

    /// All rules, sorted by `(first, second)`.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &str, bool)> + '_ {
        self.rules.iter().flat_map(|(a, seconds)| {
            seconds
                .iter()
                .map(move |(b, &v)| (a.as_str(), b.as_str(), v))
        })
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.values().map(BTreeMap::len).sum()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.values().all(BTreeMap::is_empty)
    }

    /// Parse a table from JSON.
    pub fn from_json(json: &str) -> CompileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON table from disk.
    pub fn from_path(path: impl AsRef<Path>) -> CompileResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> CompileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for CommutationTable {
    /// The single built-in rule: a `cz` commutes with an `x` just before it.
    fn default() -> Self {
        Self::empty().with_rule("cz", "x", true)
    }
}

impl From<Vec<RuleEntry>> for CommutationTable {
    fn from(entries: Vec<RuleEntry>) -> Self {
        let mut table = Self::empty();
        for e in entries {
            table.insert(&e.first, &e.second, e.commutes);
        }
        table
    }
}

impl From<CommutationTable> for Vec<RuleEntry> {
    fn from(table: CommutationTable) -> Self {
        table
            .rules
            .into_iter()
            .flat_map(|(first, seconds)| {
                seconds.into_iter().map(move |(second, commutes)| RuleEntry {
                    first: first.clone(),
                    second,
                    commutes,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn op<'a>(name: &'a str, qubits: &'a [QubitId]) -> OperationDescriptor<'a> {
        OperationDescriptor::new(name, qubits)
    }

    #[test]
    fn test_default_rule_is_ordered() {
        let table = CommutationTable::default();
        let q = [QubitId(0), QubitId(1)];
        assert!(table.commutes(&op("cz", &q), &op("x", &q[..1])));
        assert!(!table.commutes(&op("x", &q[..1]), &op("cz", &q)));
        assert!(!table.commutes(&op("cx", &q), &op("x", &q[..1])));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_name_only_ignores_qubits() {
        let table = CommutationTable::default();
        let cz = [QubitId(0), QubitId(1)];
        let far = [QubitId(7)];
        assert!(table.commutes(&op("cz", &cz), &op("x", &far)));
    }

    #[test]
    fn test_empty_table_never_commutes() {
        let table = CommutationTable::empty();
        assert!(table.is_empty());
        let q = [QubitId(0)];
        assert!(!table.commutes(&op("cz", &q), &op("x", &q)));
    }

    #[test]
    fn test_explicit_false_and_override() {
        let mut table = CommutationTable::default().with_rule("h", "h", false);
        assert_eq!(table.lookup("h", "h"), Some(false));
        assert_eq!(table.lookup("h", "x"), None);
        table.insert("cz", "x", false);
        assert_eq!(table.lookup("cz", "x"), Some(false));
    }

    #[test]
    fn test_rules_sorted() {
        let table = CommutationTable::empty()
            .with_rule("x", "h", true)
            .with_rule("cz", "x", true)
            .with_rule("cz", "h", false);
        let rules: Vec<_> = table.rules().collect();
        assert_eq!(
            rules,
            vec![("cz", "h", false), ("cz", "x", true), ("x", "h", true)]
        );
    }

    #[test]
    fn test_lookup_by_ordered_pair() {
        let table = CommutationTable::empty()
            .with_rule("cz", "x", true)
            .with_rule("cz", "h", false);
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("cz", "h"), Some(false));
        assert_eq!(table.lookup("x", "cz"), None);
        assert_eq!(table.lookup("c", "zx"), None);
        assert_eq!(table.lookup("rz", "x"), None);
        assert!(CommutationTable::empty().is_empty());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"first": "cz", "second": "x", "commutes": true},
            {"first": "x", "second": "h", "commutes": true}
        ]"#;
        let table = CommutationTable::from_json(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("x", "h"), Some(true));

        let back = CommutationTable::from_json(&table.to_json().unwrap()).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_from_json_rejects_bad_shape() {
        let result = CommutationTable::from_json(r#"{"cz": "x"}"#);
        assert!(matches!(
            result,
            Err(crate::error::CompileError::InvalidRules(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"first": "cz", "second": "h", "commutes": true}}]"#).unwrap();
        let table = CommutationTable::from_path(file.path()).unwrap();
        assert_eq!(table.lookup("cz", "h"), Some(true));

        let missing = CommutationTable::from_path("/nonexistent/rules.json");
        assert!(matches!(
            missing,
            Err(crate::error::CompileError::RulesIo(_))
        ));
    }
}
