use serde::Serialize;

use super::record::UseStatement;

/// Namespace and imports in effect at a declaration; resolves the short names
/// written in source to fully-qualified ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameInformation {
    namespace: Option<String>,
    uses: Vec<UseStatement>,
}

impl NameInformation {
    pub fn new(namespace: Option<String>, uses: Vec<UseStatement>) -> Self {
        Self { namespace, uses }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn has_namespace(&self) -> bool {
        self.namespace.as_deref().is_some_and(|ns| !ns.is_empty())
    }

    pub fn uses(&self) -> &[UseStatement] {
        &self.uses
    }

    pub fn add_use(&mut self, statement: UseStatement) {
        self.uses.push(statement);
    }

    /// Resolve a name as PHP would for a class reference.
    ///
    /// Fully-qualified names lose their leading `\`; a first segment matching
    /// an import (case-insensitively) is replaced by it; anything else is
    /// prefixed with the namespace. Builtin types are returned unchanged.
    pub fn resolve_name(&self, name: &str) -> String {
        if let Some(qualified) = name.strip_prefix('\\') {
            return qualified.to_string();
        }
        if is_builtin_type(name) {
            return name.to_string();
        }

        let (first, rest) = match name.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };

        if let Some(statement) = self
            .uses
            .iter()
            .find(|statement| statement.local_name().eq_ignore_ascii_case(first))
        {
            return match rest {
                Some(rest) => format!("{}\\{}", statement.import, rest),
                None => statement.import.clone(),
            };
        }

        match self.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => format!("{namespace}\\{name}"),
            _ => name.to_string(),
        }
    }
}

/// Names that are types on their own and never refer to a class.
pub fn is_builtin_type(name: &str) -> bool {
    const BUILTIN: &[&str] = &[
        "array", "bool", "callable", "false", "float", "int", "iterable", "mixed", "never",
        "null", "object", "parent", "self", "static", "string", "true", "void",
    ];
    BUILTIN.iter().any(|builtin| builtin.eq_ignore_ascii_case(name))
}
