//! Per-language node-kind tables.
//!
//! Every string comparison against grammar node kinds lives here. The rest of
//! the crate asks [`LanguageProfile::role_of`] once per node and matches on the
//! returned [`NodeRole`].

/// Structural role of a syntax node within its language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Import / use statement
    Import,
    /// Class-like definition (class, struct, trait, impl, interface)
    Class,
    /// Function-like definition
    Function,
    /// Control-flow statement that anchors a logical block
    ControlFlow,
    /// Assignment or bare expression statement
    Statement,
    /// Node wrapping a definition (decorators, `export`)
    Wrapper,
    /// Namespace whose `body` holds further definitions (`mod`, `namespace`)
    Container,
    /// Anything else
    Other,
}

/// How parameter names are read from a function's parameter list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterStyle {
    /// Direct identifier children, falling back to `name`/`left` fields of
    /// default-value wrappers (Python, JavaScript)
    Identifiers,
    /// Formal-parameter wrappers carrying a `pattern` field (TypeScript, Rust)
    Patterns,
}

/// Where a definition's documentation lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocstringStyle {
    /// First statement of the body is a bare string literal
    BodyString,
    /// Contiguous line comments directly above the definition
    LeadingComments(&'static [&'static str]),
}

/// A node kind that wraps a definition reachable through `field`
#[derive(Debug, Clone, Copy)]
pub struct WrapperKind {
    pub kind: &'static str,
    pub field: &'static str,
}

/// A node kind whose callee/type name is found under `field`
#[derive(Debug, Clone, Copy)]
pub struct FieldLink {
    pub kind: &'static str,
    pub field: &'static str,
}

/// Immutable per-language constant table of node-kind names
#[derive(Debug)]
pub struct LanguageProfile {
    pub import_kinds: &'static [&'static str],
    pub class_kinds: &'static [&'static str],
    pub function_kinds: &'static [&'static str],
    pub control_flow_kinds: &'static [&'static str],
    pub statement_kinds: &'static [&'static str],
    pub wrappers: &'static [WrapperKind],
    pub container_kinds: &'static [&'static str],
    /// Call-shaped nodes and the field holding the callee
    pub calls: &'static [FieldLink],
    /// Instantiation nodes and the field holding the constructed type
    pub instantiations: &'static [FieldLink],
    /// Member/path access nodes and the field holding the trailing name
    pub member_access: &'static [FieldLink],
    /// Definitions whose name is not under the `name` field
    pub name_fields: &'static [FieldLink],
    /// Class kinds that add members to a type defined elsewhere (`impl`)
    pub extension_kinds: &'static [&'static str],
    /// Kinds holding a class body's member list
    pub class_body_kinds: &'static [&'static str],
    /// Top-level `const f = () => {}` bindings count as functions
    pub function_bindings: bool,
    pub string_kinds: &'static [&'static str],
    pub comment_kinds: &'static [&'static str],
    pub parameter_style: ParameterStyle,
    pub docstring_style: DocstringStyle,
}

impl LanguageProfile {
    /// Classify a node kind
    pub fn role_of(&self, kind: &str) -> NodeRole {
        if self.import_kinds.contains(&kind) {
            NodeRole::Import
        } else if self.class_kinds.contains(&kind) {
            NodeRole::Class
        } else if self.function_kinds.contains(&kind) {
            NodeRole::Function
        } else if self.control_flow_kinds.contains(&kind) {
            NodeRole::ControlFlow
        } else if self.statement_kinds.contains(&kind) {
            NodeRole::Statement
        } else if self.wrappers.iter().any(|w| w.kind == kind) {
            NodeRole::Wrapper
        } else if self.container_kinds.contains(&kind) {
            NodeRole::Container
        } else {
            NodeRole::Other
        }
    }

    /// Field through which a wrapper node exposes its definition
    pub fn wrapper_field(&self, kind: &str) -> Option<&'static str> {
        Self::lookup(self.wrappers.iter().map(|w| (w.kind, w.field)), kind)
    }

    pub fn call_field(&self, kind: &str) -> Option<&'static str> {
        Self::lookup(self.calls.iter().map(|l| (l.kind, l.field)), kind)
    }

    pub fn instantiation_field(&self, kind: &str) -> Option<&'static str> {
        Self::lookup(self.instantiations.iter().map(|l| (l.kind, l.field)), kind)
    }

    pub fn member_field(&self, kind: &str) -> Option<&'static str> {
        Self::lookup(self.member_access.iter().map(|l| (l.kind, l.field)), kind)
    }

    /// Field holding a definition's name (`name` unless overridden)
    pub fn name_field(&self, kind: &str) -> &'static str {
        Self::lookup(self.name_fields.iter().map(|l| (l.kind, l.field)), kind).unwrap_or("name")
    }

    pub fn is_extension(&self, kind: &str) -> bool {
        self.extension_kinds.contains(&kind)
    }

    pub fn is_class_body(&self, kind: &str) -> bool {
        self.class_body_kinds.contains(&kind)
    }

    pub fn is_string(&self, kind: &str) -> bool {
        self.string_kinds.contains(&kind)
    }

    pub fn is_comment(&self, kind: &str) -> bool {
        self.comment_kinds.contains(&kind)
    }

    fn lookup(
        mut pairs: impl Iterator<Item = (&'static str, &'static str)>,
        kind: &str,
    ) -> Option<&'static str> {
        pairs.find(|(k, _)| *k == kind).map(|(_, field)| field)
    }
}

pub static PYTHON: LanguageProfile = LanguageProfile {
    import_kinds: &[
        "import_statement",
        "import_from_statement",
        "future_import_statement",
    ],
    class_kinds: &["class_definition"],
    function_kinds: &["function_definition"],
    control_flow_kinds: &[
        "if_statement",
        "for_statement",
        "while_statement",
        "try_statement",
        "with_statement",
        "match_statement",
    ],
    statement_kinds: &["expression_statement", "assignment", "augmented_assignment"],
    wrappers: &[WrapperKind {
        kind: "decorated_definition",
        field: "definition",
    }],
    container_kinds: &[],
    calls: &[FieldLink {
        kind: "call",
        field: "function",
    }],
    instantiations: &[],
    member_access: &[FieldLink {
        kind: "attribute",
        field: "attribute",
    }],
    name_fields: &[],
    extension_kinds: &[],
    class_body_kinds: &["block"],
    function_bindings: false,
    string_kinds: &["string"],
    comment_kinds: &["comment"],
    parameter_style: ParameterStyle::Identifiers,
    docstring_style: DocstringStyle::BodyString,
};

const JS_CONTROL_FLOW: &[&str] = &[
    "if_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "try_statement",
    "switch_statement",
];

const JS_CALLS: &[FieldLink] = &[FieldLink {
    kind: "call_expression",
    field: "function",
}];

const JS_NEW: &[FieldLink] = &[FieldLink {
    kind: "new_expression",
    field: "constructor",
}];

const JS_MEMBERS: &[FieldLink] = &[FieldLink {
    kind: "member_expression",
    field: "property",
}];

const JS_EXPORT: &[WrapperKind] = &[WrapperKind {
    kind: "export_statement",
    field: "declaration",
}];

pub static JAVASCRIPT: LanguageProfile = LanguageProfile {
    import_kinds: &["import_statement"],
    class_kinds: &["class_declaration"],
    function_kinds: &[
        "function_declaration",
        "generator_function_declaration",
        "method_definition",
    ],
    control_flow_kinds: JS_CONTROL_FLOW,
    statement_kinds: &[
        "expression_statement",
        "lexical_declaration",
        "variable_declaration",
    ],
    wrappers: JS_EXPORT,
    container_kinds: &[],
    calls: JS_CALLS,
    instantiations: JS_NEW,
    member_access: JS_MEMBERS,
    name_fields: &[],
    extension_kinds: &[],
    class_body_kinds: &["class_body"],
    function_bindings: true,
    string_kinds: &["string"],
    comment_kinds: &["comment"],
    parameter_style: ParameterStyle::Identifiers,
    docstring_style: DocstringStyle::BodyString,
};

pub static TYPESCRIPT: LanguageProfile = LanguageProfile {
    import_kinds: &["import_statement"],
    class_kinds: &[
        "class_declaration",
        "abstract_class_declaration",
        "interface_declaration",
        "enum_declaration",
    ],
    function_kinds: &[
        "function_declaration",
        "generator_function_declaration",
        "method_definition",
    ],
    control_flow_kinds: JS_CONTROL_FLOW,
    statement_kinds: &[
        "expression_statement",
        "lexical_declaration",
        "variable_declaration",
        "type_alias_declaration",
    ],
    wrappers: JS_EXPORT,
    container_kinds: &["internal_module", "module"],
    calls: JS_CALLS,
    instantiations: JS_NEW,
    member_access: JS_MEMBERS,
    name_fields: &[],
    extension_kinds: &[],
    class_body_kinds: &["class_body", "interface_body"],
    function_bindings: true,
    string_kinds: &["string"],
    comment_kinds: &["comment"],
    parameter_style: ParameterStyle::Patterns,
    docstring_style: DocstringStyle::BodyString,
};

pub static RUST: LanguageProfile = LanguageProfile {
    import_kinds: &["use_declaration", "extern_crate_declaration"],
    class_kinds: &[
        "struct_item",
        "enum_item",
        "union_item",
        "trait_item",
        "impl_item",
    ],
    function_kinds: &["function_item"],
    control_flow_kinds: &[
        "if_expression",
        "for_expression",
        "while_expression",
        "loop_expression",
        "match_expression",
    ],
    statement_kinds: &[
        "expression_statement",
        "let_declaration",
        "const_item",
        "static_item",
        "type_item",
        "macro_invocation",
    ],
    wrappers: &[],
    container_kinds: &["mod_item"],
    calls: &[FieldLink {
        kind: "call_expression",
        field: "function",
    }],
    instantiations: &[FieldLink {
        kind: "struct_expression",
        field: "name",
    }],
    member_access: &[
        FieldLink {
            kind: "field_expression",
            field: "field",
        },
        FieldLink {
            kind: "scoped_identifier",
            field: "name",
        },
        FieldLink {
            kind: "generic_function",
            field: "function",
        },
        FieldLink {
            kind: "scoped_type_identifier",
            field: "name",
        },
        FieldLink {
            kind: "generic_type",
            field: "type",
        },
    ],
    name_fields: &[FieldLink {
        kind: "impl_item",
        field: "type",
    }],
    extension_kinds: &["impl_item"],
    class_body_kinds: &["declaration_list"],
    function_bindings: false,
    string_kinds: &["string_literal", "raw_string_literal"],
    comment_kinds: &["line_comment", "block_comment"],
    parameter_style: ParameterStyle::Patterns,
    docstring_style: DocstringStyle::LeadingComments(&["///", "/**"]),
};
