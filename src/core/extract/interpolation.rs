//! Interpolated text: the single representation shared by template literals,
//! canonicalized `+` chains and merged markup runs.

use swc_common::{Span, Spanned};
use swc_ecma_ast::{BinaryOp, Expr, Lit, MemberProp, Tpl};

use crate::utils::contains_target_text;

#[derive(Debug, Clone)]
pub enum Part<'a> {
    Text(String),
    Slot(&'a Expr),
}

#[derive(Debug, Clone)]
pub struct InterpolatedText<'a> {
    pub span: Span,
    pub parts: Vec<Part<'a>>,
}

impl<'a> InterpolatedText<'a> {
    /// Build from a template literal. Quasis fall back to their raw text when the
    /// cooked value is not valid UTF-8.
    pub fn from_tpl(tpl: &'a Tpl) -> Self {
        let mut parts = Vec::with_capacity(tpl.quasis.len() + tpl.exprs.len());
        for (i, quasi) in tpl.quasis.iter().enumerate() {
            let text = quasi
                .cooked
                .as_ref()
                .and_then(|c| c.as_str())
                .unwrap_or(&*quasi.raw);
            if !text.is_empty() {
                parts.push(Part::Text(text.to_string()));
            }
            if let Some(expr) = tpl.exprs.get(i) {
                parts.push(Part::Slot(expr));
            }
        }
        Self {
            span: tpl.span,
            parts,
        }
    }

    /// Canonicalize a `+` chain into one interpolated text.
    ///
    /// Operands are flattened left to right and adjacent static pieces are coalesced.
    /// Returns `None` for chains without a string operand and for chains where two or
    /// more non-string operands precede the first string one, since those start with a
    /// numeric addition.
    pub fn from_concat(expr: &'a Expr) -> Option<Self> {
        let mut operands = Vec::new();
        flatten_concat(expr, &mut operands);

        let first_string = operands.iter().position(|e| is_string_operand(e))?;
        if first_string >= 2 {
            return None;
        }

        let mut parts: Vec<Part<'a>> = Vec::new();
        for operand in operands {
            match operand {
                Expr::Lit(Lit::Str(s)) => push_text(&mut parts, s.value.as_str()?),
                Expr::Lit(Lit::Num(n)) => push_text(&mut parts, &n.value.to_string()),
                Expr::Tpl(tpl) => {
                    for part in InterpolatedText::from_tpl(tpl).parts {
                        match part {
                            Part::Text(text) => push_text(&mut parts, &text),
                            slot => parts.push(slot),
                        }
                    }
                }
                other => parts.push(Part::Slot(other)),
            }
        }

        Some(Self {
            span: expr.span(),
            parts,
        })
    }

    /// True if the static skeleton contains target text.
    pub fn has_target_text(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, Part::Text(t) if contains_target_text(t)))
    }

    pub fn slot_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, Part::Slot(_)))
            .count()
    }
}

fn push_text(parts: &mut Vec<Part<'_>>, text: &str) {
    if let Some(Part::Text(last)) = parts.last_mut() {
        last.push_str(text);
    } else if !text.is_empty() {
        parts.push(Part::Text(text.to_string()));
    }
}

fn flatten_concat<'a>(expr: &'a Expr, out: &mut Vec<&'a Expr>) {
    match expr {
        Expr::Bin(bin) if bin.op == BinaryOp::Add => {
            flatten_concat(&bin.left, out);
            flatten_concat(&bin.right, out);
        }
        other => out.push(other),
    }
}

fn is_string_operand(expr: &Expr) -> bool {
    matches!(expr, Expr::Lit(Lit::Str(_)) | Expr::Tpl(_))
}

/// Name an interpolation slot after the expression it holds.
///
/// Identifiers keep their name and member accesses use the property name; anything
/// else gets a positional `var{index}` tag.
pub fn slot_base_name(expr: &Expr, index: usize) -> String {
    match expr {
        Expr::Ident(ident) => ident.sym.to_string(),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => prop.sym.to_string(),
            _ => format!("var{}", index),
        },
        Expr::Paren(paren) => slot_base_name(&paren.expr, index),
        _ => format!("var{}", index),
    }
}

/// One `name: value` entry of the interpolation map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBinding {
    pub name: String,
    /// Source text of the value expression, after inner replacements.
    pub value: String,
    /// Render as `{ name }` instead of `{ name: value }`.
    pub shorthand: bool,
}

/// Assigns unique slot names. Slots with identical source share one name; distinct
/// sources clashing on a name get a numeric suffix (`name2`, `name3`, ...).
#[derive(Debug, Default)]
pub struct SlotNamer {
    bindings: Vec<SlotBinding>,
    sources: Vec<String>,
}

impl SlotNamer {
    /// Register a slot and return its placeholder name.
    pub fn bind(&mut self, base: String, source: &str, value: String, shorthand: bool) -> String {
        if let Some(i) = self.sources.iter().position(|s| s == source) {
            return self.bindings[i].name.clone();
        }

        let mut name = base.clone();
        let mut n = 2;
        while self.bindings.iter().any(|b| b.name == name) {
            name = format!("{}{}", base, n);
            n += 1;
        }

        self.sources.push(source.to_string());
        self.bindings.push(SlotBinding {
            shorthand: shorthand && name == base,
            name: name.clone(),
            value,
        });
        name
    }

    pub fn names(&self) -> Vec<String> {
        self.bindings.iter().map(|b| b.name.clone()).collect()
    }

    pub fn into_bindings(self) -> Vec<SlotBinding> {
        self.bindings
    }
}

/// Render the lookup call: `t("key")` or `t("key", { name, count: list.length })`.
pub fn render_lookup(function: &str, key: &str, slots: &[SlotBinding]) -> String {
    let key = serde_json::Value::from(key).to_string();
    if slots.is_empty() {
        return format!("{}({})", function, key);
    }

    let entries: Vec<String> = slots
        .iter()
        .map(|slot| {
            if slot.shorthand {
                slot.name.clone()
            } else {
                format!("{}: {}", slot.name, slot.value)
            }
        })
        .collect();
    format!("{}({}, {{ {} }})", function, key, entries.join(", "))
}
