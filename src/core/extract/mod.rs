//! Extraction-and-rewrite engine.
//!
//! One file goes through: markup planning, Pass 1 (collect sites), batched key
//! resolution, Pass 2 (apply keys), import injection, splicing and a residual scan of
//! the re-parsed output. See [`pipeline::process_file`].

pub mod edits;
pub mod imports;
pub mod interpolation;
pub mod markup;
pub mod pipeline;
pub mod residual;
pub mod scope;
pub mod sites;
pub mod walker;

#[cfg(test)]
mod tests;

use swc_ecma_ast::{BinaryOp, Callee, Expr, JSXElementName, Lit, MemberProp};

use crate::{config::Config, core::stats::NodeKind, utils::contains_target_text};

pub use pipeline::{FileOutcome, process_file};
pub use sites::{CandidateSite, SiteId, SiteKind};
pub use walker::{Extraction, MAX_DEPTH};

/// Engine settings derived from the config.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub lookup_function: String,
    pub import_source: String,
    pub skip_functions: Vec<String>,
    pub max_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            lookup_function: config.lookup_function.clone(),
            import_source: config.lookup_import_source.clone(),
            skip_functions: config.skip_functions.clone(),
            max_depth: MAX_DEPTH,
        }
    }

    /// `t(...)` or any member call ending in `.t(...)`.
    pub fn is_lookup_call(&self, callee: &str) -> bool {
        callee.rsplit('.').next() == Some(self.lookup_function.as_str())
    }

    /// Exact or prefix-dot match against the skip-list.
    pub fn is_skipped_call(&self, callee: &str) -> bool {
        self.skip_functions.iter().any(|skip| {
            callee == skip
                || (callee.starts_with(skip.as_str()) && callee[skip.len()..].starts_with('.'))
        })
    }
}

/// Dotted name of a callee (`console.log`, `this.logger.warn`), if it has one.
pub fn callee_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::This(_) => Some("this".to_string()),
        Expr::Paren(paren) => callee_name(&paren.expr),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => Some(format!("{}.{}", callee_name(&member.obj)?, prop.sym)),
            _ => None,
        },
        _ => None,
    }
}

/// `import(...)` and `require(...)`: their arguments name modules, not messages.
pub fn is_module_load(callee: &Callee) -> bool {
    match callee {
        Callee::Import(_) => true,
        Callee::Expr(expr) => matches!(&**expr, Expr::Ident(ident) if &*ident.sym == "require"),
        Callee::Super(_) => false,
    }
}

/// Target text of a bare string literal or expression-free template.
pub fn literal_target_text(expr: &Expr) -> Option<(String, NodeKind)> {
    match expr {
        Expr::Lit(Lit::Str(s)) => s
            .value
            .as_str()
            .filter(|v| contains_target_text(v))
            .map(|v| (v.to_string(), NodeKind::StringLiteral)),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => {
            let text: String = tpl
                .quasis
                .iter()
                .filter_map(|q| q.cooked.as_ref().and_then(|c| c.as_str()))
                .collect();
            contains_target_text(&text).then_some((text, NodeKind::TemplateLiteral))
        }
        Expr::Paren(paren) => literal_target_text(&paren.expr),
        _ => None,
    }
}

pub fn is_comparison(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::EqEq | BinaryOp::EqEqEq | BinaryOp::NotEq | BinaryOp::NotEqEq | BinaryOp::In
    )
}

/// `<style>` and `<script>` hold raw text that is never touched.
pub fn is_raw_text_element(name: &JSXElementName) -> bool {
    matches!(name, JSXElementName::Ident(ident) if ident.sym == "style" || ident.sym == "script")
}

pub fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}
