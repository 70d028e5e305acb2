//! Markup-child merging.
//!
//! A sentence split across JSX text and expression containers (`欢迎回来，{name}！`)
//! is fused into one interpolated unit before extraction. The plan is computed once,
//! top-down, and consulted by both passes.

use std::collections::HashMap;

use swc_common::{BytePos, Span};
use swc_ecma_ast::{Expr, JSXElement, JSXElementChild, JSXExpr, JSXFragment, Lit};
use swc_ecma_visit::{Visit, VisitWith};

use crate::{
    core::{extract::interpolation::Part, parsers::jsx::ParsedJSX},
    utils::contains_target_text,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPart {
    /// Cleaned static text.
    Text(String),
    /// Index of an expression container child.
    Expr(usize),
}

/// A maximal run of children `[start, end)` that is rewritten as one lookup call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupRun {
    pub start: usize,
    pub end: usize,
    /// Raw whitespace before the first and after the last visible character.
    pub leading_ws: String,
    pub trailing_ws: String,
    pub parts: Vec<RunPart>,
}

impl MarkupRun {
    /// Interpolation parts, resolving container indices against `children`.
    pub fn interpolation_parts<'a>(&self, children: &'a [JSXElementChild]) -> Vec<Part<'a>> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                RunPart::Text(text) => Some(Part::Text(text.clone())),
                RunPart::Expr(i) => match children.get(*i) {
                    Some(JSXElementChild::JSXExprContainer(container)) => match &container.expr {
                        JSXExpr::Expr(expr) => Some(Part::Slot(&**expr)),
                        JSXExpr::JSXEmptyExpr(_) => None,
                    },
                    _ => None,
                },
            })
            .collect()
    }

    /// Span from the first to the last child of the run.
    pub fn span(&self, children: &[JSXElementChild]) -> Option<Span> {
        let first = children.get(self.start)?;
        let last = children.get(self.end.checked_sub(1)?)?;
        Some(Span::new(child_span(first).lo, child_span(last).hi))
    }
}

/// Merge runs keyed by the span of the element or fragment owning the children.
#[derive(Debug, Default)]
pub struct MarkupPlan {
    runs: HashMap<(BytePos, BytePos), Vec<MarkupRun>>,
}

impl MarkupPlan {
    /// Plan merges for a whole module. Pure data files get an empty plan.
    pub fn build(parsed: &ParsedJSX, is_pure_data: bool) -> Self {
        let mut planner = Planner {
            parsed,
            plan: MarkupPlan::default(),
        };
        if !is_pure_data {
            planner.visit_module(&parsed.module);
        }
        planner.plan
    }

    pub fn runs_for(&self, owner: Span) -> &[MarkupRun] {
        self.runs
            .get(&(owner.lo, owner.hi))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.runs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

struct Planner<'a> {
    parsed: &'a ParsedJSX,
    plan: MarkupPlan,
}

impl Planner<'_> {
    fn plan_children(&mut self, owner: Span, children: &[JSXElementChild]) {
        let mut runs = Vec::new();
        let mut i = 0;
        while i < children.len() {
            if !is_run_member(&children[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < children.len() && is_run_member(&children[i]) {
                i += 1;
            }
            if let Some(run) = self.plan_run(children, start, i) {
                runs.push(run);
            }
        }
        if !runs.is_empty() {
            self.plan.runs.insert((owner.lo, owner.hi), runs);
        }
    }

    fn plan_run(&self, children: &[JSXElementChild], start: usize, end: usize) -> Option<MarkupRun> {
        let mut parts: Vec<RunPart> = Vec::new();
        let mut has_target = false;
        let mut has_expr = false;
        let mut has_text = false;

        for (i, child) in children.iter().enumerate().take(end).skip(start) {
            match child {
                JSXElementChild::JSXText(text) => {
                    let cleaned = clean_jsx_text(&text.value);
                    has_target |= contains_target_text(&cleaned);
                    has_text |= !cleaned.trim().is_empty();
                    push_text(&mut parts, &cleaned);
                }
                JSXElementChild::JSXExprContainer(container) => match &container.expr {
                    JSXExpr::Expr(expr) => match &**expr {
                        Expr::Lit(Lit::Str(s)) if s.value.as_str().is_some() => {
                            let value = s.value.as_str().unwrap_or_default();
                            has_target |= contains_target_text(value);
                            has_text |= !value.trim().is_empty();
                            push_text(&mut parts, value);
                        }
                        _ => {
                            has_expr = true;
                            parts.push(RunPart::Expr(i));
                        }
                    },
                    JSXExpr::JSXEmptyExpr(_) => return None,
                },
                _ => return None,
            }
        }

        if !(has_target && has_expr && has_text) {
            return None;
        }

        if let Some(RunPart::Text(first)) = parts.first_mut() {
            *first = first.trim_start().to_string();
        }
        if let Some(RunPart::Text(last)) = parts.last_mut() {
            *last = last.trim_end().to_string();
        }
        parts.retain(|p| !matches!(p, RunPart::Text(t) if t.is_empty()));

        Some(MarkupRun {
            start,
            end,
            leading_ws: self.leading_ws(&children[start]),
            trailing_ws: self.trailing_ws(&children[end - 1]),
            parts,
        })
    }

    fn leading_ws(&self, child: &JSXElementChild) -> String {
        match child {
            JSXElementChild::JSXText(text) => {
                let raw = self.parsed.snippet(text.span);
                raw[..raw.len() - raw.trim_start_matches(is_jsx_ws).len()].to_string()
            }
            _ => String::new(),
        }
    }

    fn trailing_ws(&self, child: &JSXElementChild) -> String {
        match child {
            JSXElementChild::JSXText(text) => {
                let raw = self.parsed.snippet(text.span);
                raw[raw.trim_end_matches(is_jsx_ws).len()..].to_string()
            }
            _ => String::new(),
        }
    }
}

impl Visit for Planner<'_> {
    fn visit_jsx_element(&mut self, node: &JSXElement) {
        self.plan_children(node.span, &node.children);
        node.visit_children_with(self);
    }

    fn visit_jsx_fragment(&mut self, node: &JSXFragment) {
        self.plan_children(node.span, &node.children);
        node.visit_children_with(self);
    }
}

fn push_text(parts: &mut Vec<RunPart>, text: &str) {
    if let Some(RunPart::Text(last)) = parts.last_mut() {
        last.push_str(text);
    } else {
        parts.push(RunPart::Text(text.to_string()));
    }
}

/// Text and non-empty expression containers. Comments, elements and spreads end a run.
fn is_run_member(child: &JSXElementChild) -> bool {
    match child {
        JSXElementChild::JSXText(_) => true,
        JSXElementChild::JSXExprContainer(container) => {
            matches!(container.expr, JSXExpr::Expr(_))
        }
        _ => false,
    }
}

fn child_span(child: &JSXElementChild) -> Span {
    match child {
        JSXElementChild::JSXText(n) => n.span,
        JSXElementChild::JSXExprContainer(n) => n.span,
        JSXElementChild::JSXSpreadChild(n) => n.span,
        JSXElementChild::JSXElement(n) => n.span,
        JSXElementChild::JSXFragment(n) => n.span,
    }
}

pub fn is_jsx_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Collapse JSX text the way React renders it.
///
/// Tabs become spaces, every line but the first loses leading whitespace, every line
/// but the last loses trailing whitespace, and the remaining non-empty lines are
/// joined with a single space.
pub fn clean_jsx_text(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    let last = lines.len().saturating_sub(1);

    let mut kept: Vec<String> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let line = line.replace('\t', " ");
        let mut trimmed = line.as_str();
        if i != 0 {
            trimmed = trimmed.trim_start_matches(is_jsx_ws);
        }
        if i != last {
            trimmed = trimmed.trim_end_matches(is_jsx_ws);
        }
        if !trimmed.is_empty() {
            kept.push(trimmed.to_string());
        }
    }
    kept.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsers::jsx::parse_jsx_source;
    use pretty_assertions::assert_eq;

    fn build_plan(code: &str) -> (ParsedJSX, MarkupPlan) {
        let parsed = parse_jsx_source(code.to_string(), "a.tsx", true).unwrap();
        let plan = MarkupPlan::build(&parsed, false);
        (parsed, plan)
    }

    #[test]
    fn test_clean_jsx_text() {
        assert_eq!(clean_jsx_text("\n    确认删除吗？\n  "), "确认删除吗？");
        assert_eq!(clean_jsx_text("欢迎回来， "), "欢迎回来， ");
        assert_eq!(clean_jsx_text("第一行\n   第二行"), "第一行 第二行");
        assert_eq!(clean_jsx_text("\n  \n"), "");
        assert_eq!(clean_jsx_text("a\tb"), "a b");
    }

    #[test]
    fn test_merges_mixed_run() {
        let (parsed, plan) = build_plan("const a = <p>\n  欢迎回来，{user.name}！\n</p>;");
        assert_eq!(plan.len(), 1);
        assert!(!parsed.module.body.is_empty());

        let runs: Vec<&MarkupRun> = plan.runs.values().flatten().collect();
        let run = runs[0];
        assert_eq!(run.start, 0);
        assert_eq!(run.end, 3);
        assert_eq!(run.leading_ws, "\n  ");
        assert_eq!(run.trailing_ws, "\n");
        assert_eq!(
            run.parts,
            vec![
                RunPart::Text("欢迎回来，".to_string()),
                RunPart::Expr(1),
                RunPart::Text("！".to_string()),
            ]
        );
    }

    #[test]
    fn test_absorbs_string_containers() {
        let (_, plan) = build_plan("const a = <p>共{\" \"}{count}{\" \"}条</p>;");
        let run = plan.runs.values().flatten().next().unwrap();
        assert_eq!(
            run.parts,
            vec![
                RunPart::Text("共 ".to_string()),
                RunPart::Expr(2),
                RunPart::Text(" 条".to_string()),
            ]
        );
    }

    #[test]
    fn test_runs_without_mixed_shape_are_left_alone() {
        let (_, plan) = build_plan("const a = <p>只有文本</p>;");
        assert!(plan.is_empty());

        let (_, plan) = build_plan("const a = <p>{name}: {value}</p>;");
        assert!(plan.is_empty());

        let (_, plan) = build_plan("const a = <p>你好{/* 注释 */}{name}</p>;");
        assert!(plan.is_empty());
    }

    #[test]
    fn test_nested_elements_break_runs() {
        let (_, plan) = build_plan("const a = <p>你好<b>{name}</b>，欢迎</p>;");
        assert!(plan.is_empty());

        let (_, plan) = build_plan("const a = <div><span>共{count}条</span></div>;");
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_pure_data_files_get_no_plan() {
        let parsed =
            parse_jsx_source("const a = <p>你好{name}</p>;".to_string(), "a.tsx", true).unwrap();
        assert!(MarkupPlan::build(&parsed, true).is_empty());
    }
}
