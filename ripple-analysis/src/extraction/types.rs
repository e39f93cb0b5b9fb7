//! Extraction fact types.

use serde::{Deserialize, Serialize};

use crate::scanner::Language;

/// A function or method definition found in a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionFact {
    pub name: String,
    /// Qualified name when the function is a member, e.g. "UserService.find".
    pub qualified_name: Option<String>,
    pub start_line: u32,
    pub end_line: u32,
    pub is_exported: bool,
    pub is_async: bool,
    pub is_constructor: bool,
    pub parameters: Vec<ParameterFact>,
    pub return_type: Option<String>,
    /// Decorator/annotation strings as written, e.g. "@Get('/users')".
    pub decorators: Vec<String>,
}

/// A declared parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterFact {
    pub name: String,
    pub type_annotation: Option<String>,
}

/// The syntactic shape of a call expression, as seen by the extractor.
///
/// Shapes beyond `Direct`/`Method` are inherently dynamic: the resolver
/// never attempts to resolve them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallShape {
    /// Plain `foo(...)`.
    Direct,
    /// `receiver.method(...)` with a statically written receiver.
    Method,
    /// `receiver.method(...)` where the receiver is itself an expression
    /// whose type cannot be known statically.
    DynamicReceiver,
    /// `obj[name](...)` — computed property access.
    Computed,
    /// Reflection APIs (`Reflect.apply`, `getattr(...)()`, …).
    Reflection,
    /// `eval`-like constructs.
    Eval,
    /// Call through a parameter of function type.
    HigherOrder,
    /// Plugin/extension hook dispatch.
    PluginHook,
}

/// A call site found in a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallFact {
    /// Callee name as written in source.
    pub callee_name: String,
    /// Receiver/object expression, e.g. "this" or "userService".
    pub receiver: Option<String>,
    pub line: u32,
    pub column: u32,
    pub shape: CallShape,
}

/// An import statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportFact {
    /// Module specifier as written, e.g. "./users/service" or "express".
    pub source: String,
    pub named: Vec<String>,
    pub default: Option<String>,
    pub namespace: Option<String>,
    pub line: u32,
}

/// An exported symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFact {
    pub name: String,
    pub line: u32,
}

/// Kind of type/class declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Class,
    Interface,
    Struct,
    Enum,
}

/// A type/class declaration, with its method names for class-scoped
/// resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDeclFact {
    pub name: String,
    pub kind: DeclKind,
    pub line: u32,
    pub methods: Vec<String>,
}

/// Data operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOperation {
    Read,
    Write,
    Delete,
}

/// A direct data-access fact (table/field plus operation kind).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataAccessFact {
    pub table: String,
    pub fields: Vec<String>,
    pub operation: DataOperation,
    pub line: u32,
    pub confidence: f32,
}

/// Which strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Structural,
    Regex,
    Merged,
}

impl StrategyKind {
    /// Base coverage confidence for results produced by this strategy alone.
    pub fn base_confidence(&self) -> f32 {
        match self {
            StrategyKind::Structural => 0.95,
            StrategyKind::Regex => 0.65,
            StrategyKind::Merged => 0.85,
        }
    }
}

/// Raw facts from a single strategy run, before quality is attached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawExtraction {
    pub functions: Vec<FunctionFact>,
    pub calls: Vec<CallFact>,
    pub imports: Vec<ImportFact>,
    pub exports: Vec<ExportFact>,
    pub declarations: Vec<TypeDeclFact>,
    pub data_access: Vec<DataAccessFact>,
    /// Non-fatal parse errors, as messages.
    pub errors: Vec<String>,
}

impl RawExtraction {
    /// Total items extracted, used for coverage estimation and merge weighting.
    pub fn item_count(&self) -> u32 {
        (self.functions.len()
            + self.calls.len()
            + self.imports.len()
            + self.exports.len()
            + self.declarations.len()
            + self.data_access.len()) as u32
    }
}

/// Per-file quality metadata.
///
/// Consumed by the assembler to weight confidence; never read by query
/// logic downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionQuality {
    pub strategy: StrategyKind,
    /// Coverage estimate in [0,1].
    pub coverage: f32,
    pub parse_error_count: u32,
    pub item_count: u32,
    pub used_fallback: bool,
    pub elapsed_us: u64,
}

/// Complete extraction output for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileExtraction {
    /// Path relative to the project root.
    pub file: String,
    pub language: Language,
    pub content_hash: u64,
    pub facts: RawExtraction,
    pub quality: ExtractionQuality,
}
