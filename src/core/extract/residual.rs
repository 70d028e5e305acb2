//! Residual scan of the rewritten output.
//!
//! Anything still carrying target text outside a lookup call, and outside the contexts
//! the walker deliberately leaves alone, is reported as a missing sample.

use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BinExpr, CallExpr, Callee, Constructor, Expr, Function, GetterProp, JSXAttr,
    JSXAttrValue, JSXElement, JSXText, Lit, MemberExpr, MemberProp, ModuleItem, NewExpr,
    SetterProp, Stmt, SwitchCase, TaggedTpl, Tpl, TsEnumDecl,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::{
    core::{
        classify::FileInfo,
        extract::{
            EngineOptions, callee_name, is_comparison, is_module_load, is_raw_text_element,
            literal_target_text,
            markup::clean_jsx_text,
            scope::{BindingFinder, binds_name},
        },
        parsers::jsx::ParsedJSX,
        stats::{Location, NodeKind, Sample, SkipReason},
    },
    utils::contains_target_text,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FoundText {
    pub text: String,
    pub node_kind: NodeKind,
    pub pos: BytePos,
}

/// Every target text under `node`, regardless of context.
pub(crate) fn find_target_text<N>(node: &N) -> Vec<FoundText>
where
    N: VisitWith<TextFinder>,
{
    let mut finder = TextFinder::default();
    node.visit_with(&mut finder);
    finder.found
}

#[derive(Debug, Default)]
pub(crate) struct TextFinder {
    found: Vec<FoundText>,
}

impl Visit for TextFinder {
    fn visit_expr(&mut self, node: &Expr) {
        match node {
            Expr::Lit(Lit::Str(_)) => {
                if let Some((text, node_kind)) = literal_target_text(node) {
                    self.found.push(FoundText {
                        text,
                        node_kind,
                        pos: node.span().lo,
                    });
                }
            }
            Expr::Tpl(tpl) => {
                if let Some(text) = tpl_text(tpl) {
                    self.found.push(FoundText {
                        text,
                        node_kind: NodeKind::TemplateLiteral,
                        pos: tpl.span.lo,
                    });
                }
                tpl.visit_children_with(self);
            }
            _ => node.visit_children_with(self),
        }
    }

    fn visit_jsx_text(&mut self, node: &JSXText) {
        let text = clean_jsx_text(&node.value);
        if contains_target_text(&text) {
            self.found.push(FoundText {
                text: text.trim().to_string(),
                node_kind: NodeKind::JsxText,
                pos: node.span.lo,
            });
        }
    }

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        if let Some(JSXAttrValue::Str(s)) = &node.value
            && let Some(text) = s.value.as_str()
            && contains_target_text(text)
        {
            self.found.push(FoundText {
                text: text.to_string(),
                node_kind: NodeKind::JsxAttribute,
                pos: s.span.lo,
            });
            return;
        }
        node.visit_children_with(self);
    }
}

/// Static parts of a template joined, if they carry target text.
fn tpl_text(tpl: &Tpl) -> Option<String> {
    let text: String = tpl
        .quasis
        .iter()
        .map(|q| q.cooked.as_ref().and_then(|c| c.as_str()).unwrap_or(&*q.raw))
        .collect();
    contains_target_text(&text).then_some(text)
}

pub fn residual_scan(parsed: &ParsedJSX, file: &FileInfo, options: &EngineOptions) -> Vec<Sample> {
    let mut scanner = ResidualScanner {
        parsed,
        file,
        options,
        samples: Vec::new(),
    };
    parsed.module.visit_with(&mut scanner);
    scanner.samples
}

struct ResidualScanner<'a> {
    parsed: &'a ParsedJSX,
    file: &'a FileInfo,
    options: &'a EngineOptions,
    samples: Vec<Sample>,
}

impl ResidualScanner<'_> {
    fn report(&mut self, text: String, node_kind: NodeKind, pos: BytePos) {
        let loc = self.parsed.loc(pos);
        self.samples.push(Sample {
            text,
            node_kind,
            reason: SkipReason::Unextracted,
            location: Location::new(&self.file.path, loc.line, loc.col_display + 1),
        });
    }

    /// Visit `expr` unless it is a literal the walker keeps on purpose.
    fn visit_unless_kept_literal(&mut self, expr: &Expr) {
        if literal_target_text(expr).is_none() {
            expr.visit_with(self);
        }
    }

    fn is_shadowed<N>(&self, node: &N) -> bool
    where
        N: for<'n> VisitWith<BindingFinder<'n>> + ?Sized,
    {
        binds_name(node, &self.options.lookup_function)
    }

    fn is_skipped_callee(&self, callee: &Expr) -> bool {
        callee_name(callee).is_some_and(|name| {
            self.options.is_lookup_call(&name) || self.options.is_skipped_call(&name)
        })
    }
}

impl Visit for ResidualScanner<'_> {
    fn visit_expr(&mut self, node: &Expr) {
        match node {
            Expr::Lit(Lit::Str(_)) => {
                if let Some((text, kind)) = literal_target_text(node) {
                    self.report(text, kind, node.span().lo);
                }
            }
            Expr::Tpl(tpl) => {
                if let Some(text) = tpl_text(tpl) {
                    self.report(text, NodeKind::TemplateLiteral, tpl.span.lo);
                }
                tpl.visit_children_with(self);
            }
            _ => node.visit_children_with(self),
        }
    }

    // Scopes hiding the lookup function are left alone by the walker as a whole.
    fn visit_module_item(&mut self, node: &ModuleItem) {
        if matches!(node, ModuleItem::Stmt(stmt) if !matches!(stmt, Stmt::Decl(_)))
            && self.is_shadowed(node)
        {
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, node: &Function) {
        if !self.is_shadowed(&node.params) && !self.is_shadowed(&node.body) {
            node.visit_children_with(self);
        }
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        if !self.is_shadowed(&node.params) && !self.is_shadowed(&*node.body) {
            node.visit_children_with(self);
        }
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        if !self.is_shadowed(&node.params) && !self.is_shadowed(&node.body) {
            node.visit_children_with(self);
        }
    }

    fn visit_getter_prop(&mut self, node: &GetterProp) {
        if !self.is_shadowed(&node.body) {
            node.visit_children_with(self);
        }
    }

    fn visit_setter_prop(&mut self, node: &SetterProp) {
        if !self.is_shadowed(&*node.param) && !self.is_shadowed(&node.body) {
            node.visit_children_with(self);
        }
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if is_module_load(&node.callee) {
            return;
        }
        if let Callee::Expr(callee) = &node.callee
            && self.is_skipped_callee(callee)
        {
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_new_expr(&mut self, node: &NewExpr) {
        if callee_name(&node.callee).is_some_and(|name| self.options.is_skipped_call(&name)) {
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_bin_expr(&mut self, node: &BinExpr) {
        if is_comparison(node.op) {
            self.visit_unless_kept_literal(&node.left);
            self.visit_unless_kept_literal(&node.right);
        } else {
            node.visit_children_with(self);
        }
    }

    fn visit_member_expr(&mut self, node: &MemberExpr) {
        node.obj.visit_with(self);
        if let MemberProp::Computed(computed) = &node.prop {
            self.visit_unless_kept_literal(&computed.expr);
        }
    }

    fn visit_switch_case(&mut self, node: &SwitchCase) {
        if let Some(test) = &node.test {
            self.visit_unless_kept_literal(test);
        }
        node.cons.visit_with(self);
    }

    fn visit_ts_enum_decl(&mut self, _: &TsEnumDecl) {}

    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        node.tag.visit_with(self);
        for expr in &node.tpl.exprs {
            expr.visit_with(self);
        }
    }

    fn visit_computed_prop_name(&mut self, node: &swc_ecma_ast::ComputedPropName) {
        self.visit_unless_kept_literal(&node.expr);
    }

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        node.opening.visit_with(self);
        if !is_raw_text_element(&node.opening.name) {
            node.children.visit_with(self);
        }
    }

    fn visit_jsx_text(&mut self, node: &JSXText) {
        if self.file.is_pure_data {
            return;
        }
        let text = clean_jsx_text(&node.value);
        if contains_target_text(&text) {
            self.report(text.trim().to_string(), NodeKind::JsxText, node.span.lo);
        }
    }

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        if let Some(JSXAttrValue::Str(s)) = &node.value {
            if let Some(text) = s.value.as_str()
                && contains_target_text(text)
            {
                self.report(text.to_string(), NodeKind::JsxAttribute, s.span.lo);
            }
            return;
        }
        node.visit_children_with(self);
    }
}
