//! # HCL Blocks
//!
//! A small immutable model of the Terraform blocks this compiler emits and
//! the renderer that turns them into text. Rendering is pure; the same block
//! always renders to the same bytes.

const INDENT: &str = "  ";

/// The right-hand side of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A quoted string literal.
    Str(String),
    Bool(bool),
    /// A bare traversal such as `aws_vpc.main.id`.
    Ref(String),
    /// A list of bare traversals.
    RefList(Vec<String>),
}

impl Expr {
    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    /// `<resource_type>.<name>.id`
    pub fn id_of(resource_type: &str, name: &str) -> Self {
        Expr::Ref(format!("{}.{}.id", resource_type, name))
    }

    fn render(&self) -> String {
        match self {
            Expr::Str(value) => quote(value),
            Expr::Bool(value) => value.to_string(),
            Expr::Ref(traversal) => traversal.clone(),
            Expr::RefList(items) => format!("[{}]", items.join(", ")),
        }
    }
}

/// One line or nested construct inside a block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyItem {
    Attribute {
        key: String,
        value: Expr,
        comment: Option<String>,
    },
    /// A `key = { k = "v" ... }` map of string literals, kept in insertion order.
    Map {
        key: String,
        entries: Vec<(String, String)>,
    },
    Block(Block),
    Blank,
}

/// A labelled block: `resource "aws_vpc" "main" { ... }`, `route { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub block_type: String,
    pub labels: Vec<String>,
    pub body: Vec<BodyItem>,
}

impl Block {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            labels: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: Expr) -> Self {
        self.body.push(BodyItem::Attribute {
            key: key.into(),
            value,
            comment: None,
        });
        self
    }

    /// An attribute followed by a trailing `# comment`.
    pub fn attr_with_comment(
        mut self,
        key: impl Into<String>,
        value: Expr,
        comment: impl Into<String>,
    ) -> Self {
        self.body.push(BodyItem::Attribute {
            key: key.into(),
            value,
            comment: Some(comment.into()),
        });
        self
    }

    pub fn map(mut self, key: impl Into<String>, entries: Vec<(String, String)>) -> Self {
        self.body.push(BodyItem::Map {
            key: key.into(),
            entries,
        });
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.body.push(BodyItem::Block(block));
        self
    }

    pub fn blank(mut self) -> Self {
        self.body.push(BodyItem::Blank);
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = INDENT.repeat(depth);
        let inner = INDENT.repeat(depth + 1);

        out.push_str(&indent);
        out.push_str(&self.block_type);
        for label in &self.labels {
            out.push_str(&format!(" {}", quote(label)));
        }
        out.push_str(" {\n");

        let widths = alignment_widths(&self.body);
        for (item, width) in self.body.iter().zip(widths) {
            match item {
                BodyItem::Attribute { key, value, comment } => {
                    out.push_str(&format!(
                        "{}{:<width$} = {}",
                        inner,
                        key,
                        value.render(),
                        width = width
                    ));
                    if let Some(comment) = comment {
                        out.push_str(&format!("  # {}", comment));
                    }
                    out.push('\n');
                }
                BodyItem::Map { key, entries } => {
                    out.push_str(&format!("{}{} = {{\n", inner, key));
                    for (k, v) in entries {
                        out.push_str(&format!("{}{}{} = {}\n", inner, INDENT, map_key(k), quote(v)));
                    }
                    out.push_str(&format!("{}}}\n", inner));
                }
                BodyItem::Block(block) => block.render_into(out, depth + 1),
                BodyItem::Blank => out.push('\n'),
            }
        }

        out.push_str(&indent);
        out.push('}');
        if depth > 0 {
            out.push('\n');
        }
    }
}

/// Key column width per body item: attributes in an unbroken run share the
/// width of the run's longest key, as `terraform fmt` lays them out.
fn alignment_widths(body: &[BodyItem]) -> Vec<usize> {
    let mut widths = vec![0; body.len()];
    let mut run_start = 0;

    for i in 0..=body.len() {
        let in_run = matches!(body.get(i), Some(BodyItem::Attribute { .. }));
        if in_run {
            continue;
        }
        let width = body[run_start..i]
            .iter()
            .map(|item| match item {
                BodyItem::Attribute { key, .. } => key.len(),
                _ => 0,
            })
            .max()
            .unwrap_or(0);
        for w in &mut widths[run_start..i] {
            *w = width;
        }
        run_start = i + 1;
    }

    widths
}

/// A map key: bare when it is a plain identifier, quoted otherwise.
pub fn map_key(key: &str) -> String {
    let mut chars = key.chars();
    let bare = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        quote(key)
    }
}

/// Quote and escape a string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                // Template sequences would be interpolated; double the sigil.
                out.push(ch);
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
