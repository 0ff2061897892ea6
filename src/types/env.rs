use std::collections::HashMap;

use super::error::CompileError;
use super::functions::{builtins, FunctionDecl, FunctionRegistry};
use super::kind::Kind;
use super::value::Value;

/// Default evaluation cost ceiling, in abstract cost units.
pub const DEFAULT_COST_LIMIT: u64 = 1000;

/// Field layout of a host object type exposed to expressions.
///
/// Field names follow the host struct's serde tags, so expression field
/// access and the serialized fixture form always agree.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    name: &'static str,
    fields: HashMap<&'static str, Kind>,
}

impl ObjectSchema {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: HashMap::new(),
        }
    }

    /// Declare a field and its kind.
    #[must_use]
    pub fn field(mut self, name: &'static str, kind: Kind) -> Self {
        self.fields.insert(name, kind);
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn kind_of(&self, field: &str) -> Option<&Kind> {
        self.fields.get(field)
    }

    pub(crate) fn field_kinds(&self) -> impl Iterator<Item = (&'static str, &Kind)> {
        self.fields.iter().map(|(name, kind)| (*name, kind))
    }
}

/// Compile/evaluation environment: declared variables, object schemas,
/// registered functions, and the evaluation cost ceiling.
///
/// Immutable once built; shared by every evaluation of a compiled policy.
#[derive(Debug, Clone)]
pub struct Env {
    variables: HashMap<String, Kind>,
    objects: HashMap<&'static str, ObjectSchema>,
    functions: FunctionRegistry,
    cost_limit: u64,
}

impl Env {
    /// Start building an environment. Built-in functions (`quantity`, `int`,
    /// string methods) are pre-registered.
    #[must_use]
    pub fn builder() -> EnvBuilder {
        EnvBuilder::new()
    }

    pub(crate) fn variable_kind(&self, name: &str) -> Option<&Kind> {
        self.variables.get(name)
    }

    pub(crate) fn schema(&self, name: &str) -> Option<&ObjectSchema> {
        self.objects.get(name)
    }

    pub(crate) fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// The evaluation cost ceiling applied to every evaluation.
    #[must_use]
    pub fn cost_limit(&self) -> u64 {
        self.cost_limit
    }
}

/// Builder for [`Env`]. Validation of object-type references happens in
/// [`build()`](EnvBuilder::build): a variable or schema field naming an
/// unregistered object type is a startup-fatal configuration error.
#[derive(Debug)]
pub struct EnvBuilder {
    variables: HashMap<String, Kind>,
    objects: HashMap<&'static str, ObjectSchema>,
    functions: FunctionRegistry,
    cost_limit: u64,
}

impl EnvBuilder {
    fn new() -> Self {
        let mut functions = FunctionRegistry::new();
        for decl in builtins() {
            functions.register(decl);
        }
        Self {
            variables: HashMap::new(),
            objects: HashMap::new(),
            functions,
            cost_limit: DEFAULT_COST_LIMIT,
        }
    }

    /// Declare a variable visible to expressions.
    #[must_use]
    pub fn variable(mut self, name: &str, kind: Kind) -> Self {
        self.variables.insert(name.to_owned(), kind);
        self
    }

    /// Register an object schema.
    #[must_use]
    pub fn object(mut self, schema: ObjectSchema) -> Self {
        self.objects.insert(schema.name(), schema);
        self
    }

    /// Register a function or method declaration.
    #[must_use]
    pub fn function(mut self, decl: FunctionDecl) -> Self {
        self.functions.register(decl);
        self
    }

    /// Override the evaluation cost ceiling (default
    /// [`DEFAULT_COST_LIMIT`]).
    #[must_use]
    pub fn cost_limit(mut self, limit: u64) -> Self {
        self.cost_limit = limit;
        self
    }

    /// Validate and freeze the environment.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnknownType`] if a declared variable or a
    /// schema field references an object type with no registered schema.
    pub fn build(self) -> Result<Env, CompileError> {
        for kind in self.variables.values() {
            self.check_resolvable(kind)?;
        }
        for schema in self.objects.values() {
            for (_, kind) in schema.field_kinds() {
                self.check_resolvable(kind)?;
            }
        }
        Ok(Env {
            variables: self.variables,
            objects: self.objects,
            functions: self.functions,
            cost_limit: self.cost_limit,
        })
    }

    fn check_resolvable(&self, kind: &Kind) -> Result<(), CompileError> {
        if let Kind::Object(name) = kind {
            if !self.objects.contains_key(name) {
                return Err(CompileError::UnknownType {
                    name: (*name).to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// Per-evaluation variable bindings. Exclusively owned by the evaluation
/// they are built for; never shared across claims.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: HashMap<String, Value>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value to a variable name.
    #[must_use]
    pub fn bind(mut self, name: &str, value: Value) -> Self {
        self.values.insert(name.to_owned(), value);
        self
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}
