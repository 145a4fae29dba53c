//! Rule sets: what one recipe entry removes.
//!
//! A [`RuleSet`] is six independent string sets and the dialect the scripts
//! are visited under. It is built once per recipe entry and never changes
//! afterwards; every query is a hash lookup.

use im::HashSet;

use crate::syntax::{Dialect, DialectCaps};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    plugins: HashSet<String>,
    methods: HashSet<String>,
    classpath: HashSet<String>,
    methods_with_arg: HashSet<String>,
    imports: HashSet<String>,
    type_parameters: HashSet<String>,
    dialect: Dialect,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Plugin ids matched against the first argument of `id`/`alias` calls.
    pub fn removes_plugin(&self, id: &str) -> bool {
        self.plugins.contains(id)
    }

    pub fn removes_method(&self, name: &str) -> bool {
        self.methods.contains(name)
    }

    /// Dependency coordinates matched against `implementation`/`classpath` calls.
    pub fn removes_classpath(&self, coordinate: &str) -> bool {
        self.classpath.contains(coordinate)
    }

    /// Whole calls matched by their printed form, e.g. `apply(plugin = "x")`.
    pub fn removes_method_with_arg(&self, printed: &str) -> bool {
        self.methods_with_arg.contains(printed)
    }

    pub fn removes_import(&self, qualified_name: &str) -> bool {
        self.imports.contains(qualified_name)
    }

    pub fn removes_type_parameter(&self, name: &str) -> bool {
        self.type_parameters.contains(name)
    }

    /// Whether any call is matched by its printed form. Printing is skipped
    /// when this is false.
    pub fn has_methods_with_arg(&self) -> bool {
        !self.methods_with_arg.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
            && self.methods.is_empty()
            && self.classpath.is_empty()
            && self.methods_with_arg.is_empty()
            && self.imports.is_empty()
            && self.type_parameters.is_empty()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn capabilities(&self) -> DialectCaps {
        self.dialect.capabilities()
    }
}

/// Collects rule entries; duplicates collapse.
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    rules: RuleSet,
}

impl RuleSetBuilder {
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.rules.dialect = dialect;
        self
    }

    pub fn plugins<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.plugins.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn methods<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.methods.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn classpath<I, S>(mut self, coordinates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules
            .classpath
            .extend(coordinates.into_iter().map(Into::into));
        self
    }

    pub fn methods_with_arg<I, S>(mut self, printed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules
            .methods_with_arg
            .extend(printed.into_iter().map(Into::into));
        self
    }

    pub fn imports<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.imports.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn type_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules
            .type_parameters
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> RuleSet {
        self.rules
    }
}
