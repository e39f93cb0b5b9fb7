//! Shared test fixtures: a line-directive extraction strategy and a call
//! graph builder.
//!
//! The directive strategy stands in for the pluggable per-language parsers
//! the real tool injects; each line of a fixture file is one fact:
//!
//! ```text
//! fn NAME [exported] [async] [class=Cls]
//! call NAME [recv=RECEIVER] [shape=computed|reflection|eval|higher|plugin|dynamic]
//! import SOURCE [named=a,b] [default=x] [ns=y]
//! export NAME
//! class NAME [methods=a,b]
//! read TABLE [fields=a,b]   (also: write, delete)
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use ripple_analysis::extraction::{
    CallFact, CallShape, DataAccessFact, DataOperation, DeclKind, ExportFact, ExtractionStrategy,
    FunctionFact, ImportFact, ParameterFact, RawExtraction, StrategyError, StrategyKind,
    StrategyRegistry, TypeDeclFact,
};
use ripple_analysis::graph::{CallGraph, CallReference, FunctionRecord, SCHEMA_VERSION};
use ripple_analysis::scanner::Language;
use ripple_core::types::collections::FxHashMap;
use smallvec::SmallVec;

/// Parses the fixture directive language above.
pub struct DirectiveStrategy {
    kind: StrategyKind,
}

impl DirectiveStrategy {
    pub fn structural() -> Self {
        Self {
            kind: StrategyKind::Structural,
        }
    }

    pub fn regex() -> Self {
        Self {
            kind: StrategyKind::Regex,
        }
    }
}

fn attr<'a>(parts: &'a [&str], key: &str) -> Option<&'a str> {
    parts
        .iter()
        .find_map(|p| p.strip_prefix(key).and_then(|rest| rest.strip_prefix('=')))
}

fn list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default()
}

impl ExtractionStrategy for DirectiveStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn extract(&self, _file: &str, text: &str) -> Result<RawExtraction, StrategyError> {
        let mut raw = RawExtraction::default();
        let mut open_function: Option<usize> = None;

        let lines: Vec<&str> = text.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            let line_no = i as u32 + 1;
            let parts: Vec<&str> = line.split_whitespace().collect();
            let Some(&directive) = parts.first() else {
                continue;
            };
            match directive {
                "fn" => {
                    // Close the previous function at the preceding line.
                    if let Some(open) = open_function.take() {
                        raw.functions[open].end_line = line_no - 1;
                    }
                    let name = parts.get(1).copied().unwrap_or_default().to_string();
                    let class = attr(&parts, "class");
                    let params: Vec<ParameterFact> = list(attr(&parts, "params"))
                        .into_iter()
                        .map(|p| match p.split_once(':') {
                            Some((name, ty)) => ParameterFact {
                                name: name.to_string(),
                                type_annotation: Some(ty.to_string()),
                            },
                            None => ParameterFact {
                                name: p,
                                type_annotation: None,
                            },
                        })
                        .collect();
                    raw.functions.push(FunctionFact {
                        qualified_name: class.map(|c| format!("{c}.{name}")),
                        name,
                        start_line: line_no,
                        end_line: lines.len() as u32,
                        is_exported: parts.contains(&"exported"),
                        is_async: parts.contains(&"async"),
                        is_constructor: parts.contains(&"constructor"),
                        parameters: params,
                        return_type: attr(&parts, "returns").map(str::to_string),
                        decorators: list(attr(&parts, "decorators")),
                    });
                    open_function = Some(raw.functions.len() - 1);
                }
                "call" => {
                    let shape = match attr(&parts, "shape") {
                        Some("computed") => CallShape::Computed,
                        Some("reflection") => CallShape::Reflection,
                        Some("eval") => CallShape::Eval,
                        Some("higher") => CallShape::HigherOrder,
                        Some("plugin") => CallShape::PluginHook,
                        Some("dynamic") => CallShape::DynamicReceiver,
                        _ => {
                            if attr(&parts, "recv").is_some() {
                                CallShape::Method
                            } else {
                                CallShape::Direct
                            }
                        }
                    };
                    raw.calls.push(CallFact {
                        callee_name: parts.get(1).copied().unwrap_or_default().to_string(),
                        receiver: attr(&parts, "recv").map(str::to_string),
                        line: line_no,
                        column: 0,
                        shape,
                    });
                }
                "import" => {
                    raw.imports.push(ImportFact {
                        source: parts.get(1).copied().unwrap_or_default().to_string(),
                        named: list(attr(&parts, "named")),
                        default: attr(&parts, "default").map(str::to_string),
                        namespace: attr(&parts, "ns").map(str::to_string),
                        line: line_no,
                    });
                }
                "export" => {
                    raw.exports.push(ExportFact {
                        name: parts.get(1).copied().unwrap_or_default().to_string(),
                        line: line_no,
                    });
                }
                "class" => {
                    raw.declarations.push(TypeDeclFact {
                        name: parts.get(1).copied().unwrap_or_default().to_string(),
                        kind: DeclKind::Class,
                        line: line_no,
                        methods: list(attr(&parts, "methods")),
                    });
                }
                "read" | "write" | "delete" => {
                    let operation = match directive {
                        "read" => DataOperation::Read,
                        "write" => DataOperation::Write,
                        _ => DataOperation::Delete,
                    };
                    raw.data_access.push(DataAccessFact {
                        table: parts.get(1).copied().unwrap_or_default().to_string(),
                        fields: list(attr(&parts, "fields")),
                        operation,
                        line: line_no,
                        confidence: 0.9,
                    });
                }
                _ => {}
            }
        }

        Ok(raw)
    }
}

/// A registry with the directive strategy as TypeScript primary.
pub fn directive_registry() -> Arc<StrategyRegistry> {
    let mut registry = StrategyRegistry::new();
    registry.register_primary(Arc::new(DirectiveStrategy::structural()));
    registry.register_fallback(Arc::new(DirectiveStrategy::regex()));
    Arc::new(registry)
}

/// Builds small call graphs directly, for engine-level tests.
#[derive(Default)]
pub struct GraphBuilder {
    functions: FxHashMap<String, FunctionRecord>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function(&mut self, file: &str, name: &str, line: u32) -> &mut FunctionRecord {
        let id = format!("{file}::{name}::{line}");
        self.functions
            .entry(id.clone())
            .or_insert_with(|| FunctionRecord {
                id,
                name: name.to_string(),
                qualified_name: name.to_string(),
                file: file.to_string(),
                language: Language::TypeScript,
                start_line: line,
                end_line: line + 9,
                is_exported: false,
                is_async: false,
                is_constructor: false,
                is_entry_point: false,
                entry_point_kind: None,
                is_data_accessor: false,
                parameters: Vec::new(),
                return_type: None,
                decorators: Vec::new(),
                calls: Vec::new(),
                called_by: Vec::new(),
                data_access: Vec::new(),
            })
    }

    /// Add a resolved edge between two already-registered functions,
    /// maintaining bidirectional consistency.
    pub fn edge(&mut self, caller: &str, callee: &str) {
        let callee_name = callee.split("::").nth(1).unwrap_or(callee).to_string();
        let caller_file = caller.split("::").next().unwrap_or("").to_string();
        let reference = CallReference {
            caller_id: caller.to_string(),
            callee_id: Some(callee.to_string()),
            callee_name,
            receiver: None,
            file: caller_file,
            line: 5,
            column: 0,
            shape: CallShape::Direct,
            resolved: true,
            candidates: SmallVec::from_vec(vec![callee.to_string()]),
            confidence: 0.95,
            resolution: Some(ripple_analysis::graph::ResolutionKind::SameFile),
            unresolved_reason: None,
        };
        if let Some(record) = self.functions.get_mut(caller) {
            record.calls.push(reference);
        }
        if let Some(record) = self.functions.get_mut(callee) {
            if !record.called_by.contains(&caller.to_string()) {
                record.called_by.push(caller.to_string());
            }
        }
    }

    pub fn data_access(&mut self, id: &str, table: &str, fields: &[&str], operation: DataOperation) {
        if let Some(record) = self.functions.get_mut(id) {
            record.data_access.push(DataAccessFact {
                table: table.to_string(),
                fields: fields.iter().map(|f| f.to_string()).collect(),
                operation,
                line: record.start_line + 2,
                confidence: 0.9,
            });
            record.is_data_accessor = true;
        }
    }

    pub fn entry_point(&mut self, id: &str) {
        if let Some(record) = self.functions.get_mut(id) {
            record.is_entry_point = true;
            record.is_exported = true;
        }
    }

    pub fn test_entry(&mut self, id: &str) {
        if let Some(record) = self.functions.get_mut(id) {
            record.is_entry_point = true;
            record.entry_point_kind =
                Some(ripple_analysis::graph::EntryPointKind::Test);
        }
    }

    pub fn build(self) -> CallGraph {
        let mut entry_points: Vec<String> = self
            .functions
            .values()
            .filter(|r| r.is_entry_point)
            .map(|r| r.id.clone())
            .collect();
        entry_points.sort();
        let mut data_accessors: Vec<String> = self
            .functions
            .values()
            .filter(|r| r.is_data_accessor)
            .map(|r| r.id.clone())
            .collect();
        data_accessors.sort();

        let mut graph = CallGraph {
            schema_version: SCHEMA_VERSION.to_string(),
            built_at_ms: 0,
            project_root: "/test".to_string(),
            functions: self.functions,
            entry_points,
            data_accessors,
            stats: Default::default(),
        };
        let total_files = graph
            .functions
            .values()
            .map(|r| r.file.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .len();
        graph.recompute_stats(total_files);
        graph
    }
}
