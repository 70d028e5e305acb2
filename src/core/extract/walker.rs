//! The extraction walker shared by both passes.
//!
//! [`Walker`] implements [`Visit`] to reach every expression of a module and hands each
//! one to [`Walker::extract`], a closed `match` over expression kinds returning
//! `Option<Extraction>`. Replacements are built bottom-up: every arm that rebuilds a
//! node opens an edit frame, lets its children push their edits, then splices them
//! into the node's own source text.
//!
//! What the walker does with a site is up to its [`SiteHandler`]: Pass 1 collects,
//! Pass 2 applies pre-resolved keys. Everything else is identical between the passes.

use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BinExpr, BinaryOp, BlockStmtOrExpr, CallExpr, Callee, ClassDecl, ClassExpr,
    ClassProp, Constructor, ExportDefaultExpr, Expr, FnDecl, FnExpr, Function, GetterProp,
    JSXAttr, JSXAttrValue, JSXElement, JSXElementChild, JSXFragment, JSXText, Lit, MemberExpr,
    MemberProp, ModuleItem, NewExpr, ObjectLit, Pat, PrivateProp, Prop, PropName, PropOrSpread,
    SetterProp, Stmt, Str, SwitchCase, TsEnumDecl, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::{
    core::{
        classify::FileInfo,
        extract::{
            EngineOptions, callee_name,
            edits::{Edit, splice},
            interpolation::{
                InterpolatedText, Part, SlotBinding, SlotNamer, render_lookup, slot_base_name,
            },
            is_comparison, is_component_name, is_module_load, is_raw_text_element,
            literal_target_text,
            markup::{MarkupPlan, MarkupRun, clean_jsx_text, is_jsx_ws},
            residual::find_target_text,
            scope::{BindingFinder, binds_name},
            sites::{CandidateSite, SiteHandler, SiteId, SiteKind},
        },
        parsers::jsx::ParsedJSX,
        stats::{DeferredBinding, Location, NodeKind, Sample, SkipReason},
    },
    utils::contains_target_text,
};

/// Recursion bound for nested extraction.
pub const MAX_DEPTH: usize = 10;

/// Replacement source text for an expression, plus the first key it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub replacement: String,
    pub matched_key: String,
}

/// Diagnostics and counters gathered during one walk.
#[derive(Debug, Default)]
pub struct WalkReport {
    /// Sites the handler returned a key for.
    pub applied: usize,
    /// Applied sites with at least one interpolation.
    pub interpolated: usize,
    pub lazy_accessors: usize,
    pub unrecognized: Vec<Sample>,
    pub deferred: Vec<DeferredBinding>,
    /// Subtrees abandoned past the depth limit.
    pub depth_aborts: Vec<Location>,
    /// Module-level getters that build a new array on every access.
    pub container_accessors: Vec<Location>,
}

pub struct WalkOutput<H> {
    pub handler: H,
    /// File-level edits, offsets into the parsed source.
    pub edits: Vec<Edit>,
    pub report: WalkReport,
}

/// Result of extracting an interpolated text.
enum Interpolation {
    Lookup(Extraction),
    /// No key for the whole text; inner slot replacements still apply.
    Unkeyed(Vec<Edit>),
}

pub struct Walker<'a, H: SiteHandler> {
    parsed: &'a ParsedJSX,
    file: &'a FileInfo,
    options: &'a EngineOptions,
    markup: &'a MarkupPlan,
    handler: H,

    /// Edit frames; the innermost node being rebuilt owns the last one.
    frames: Vec<Vec<Edit>>,
    /// Number of enclosing function-like scopes. Zero means module evaluation time.
    runtime_depth: usize,
    /// Enclosing component names, innermost last.
    components: Vec<String>,
    /// Keys emitted while `runtime_depth == 0`, in order.
    eager_keys: Vec<String>,
    /// Number of enclosing scopes binding the lookup function's name locally.
    shadowed: usize,
    /// Enclosing class names, innermost last.
    classes: Vec<String>,

    report: WalkReport,
}

impl<'a, H: SiteHandler> Walker<'a, H> {
    pub fn new(
        parsed: &'a ParsedJSX,
        file: &'a FileInfo,
        options: &'a EngineOptions,
        markup: &'a MarkupPlan,
        handler: H,
    ) -> Self {
        Self {
            parsed,
            file,
            options,
            markup,
            handler,
            frames: Vec::new(),
            runtime_depth: 0,
            components: Vec::new(),
            eager_keys: Vec::new(),
            shadowed: 0,
            classes: Vec::new(),
            report: WalkReport::default(),
        }
    }

    pub fn walk(mut self) -> WalkOutput<H> {
        let parsed = self.parsed;
        self.frames.push(Vec::new());
        parsed.module.visit_with(&mut self);
        let edits = self.frames.pop().unwrap_or_default();
        WalkOutput {
            handler: self.handler,
            edits,
            report: self.report,
        }
    }

    // ============================================================
    // Value extractor
    // ============================================================

    /// Extract target text inside `expr`.
    ///
    /// Returns the replacement for the whole expression, or `None` when nothing inside
    /// it changes.
    pub fn extract(&mut self, expr: &Expr, depth: usize) -> Option<Extraction> {
        if depth > self.options.max_depth {
            let location = self.location(expr.span().lo);
            self.report.depth_aborts.push(location);
            return None;
        }

        match expr {
            Expr::Lit(Lit::Str(s)) => self.extract_str(s),
            Expr::Tpl(tpl) => {
                let text = InterpolatedText::from_tpl(tpl);
                if text.has_target_text() {
                    return self.extract_interpolated(&text, depth);
                }
                let exprs: Vec<&Expr> = tpl.exprs.iter().map(|e| &**e).collect();
                self.rebuild(tpl.span, &exprs, depth)
            }
            // Tagged templates are opaque text; only their expressions are extracted.
            Expr::TaggedTpl(tagged) => {
                let mut parts: Vec<&Expr> = vec![&tagged.tag];
                parts.extend(tagged.tpl.exprs.iter().map(|e| &**e));
                self.rebuild(tagged.span, &parts, depth)
            }
            Expr::Cond(cond) => {
                self.rebuild(cond.span, &[&*cond.test, &*cond.cons, &*cond.alt], depth)
            }
            Expr::Bin(bin) => match bin.op {
                BinaryOp::Add => self.extract_concat(expr, bin, depth),
                op if is_comparison(op) => self.extract_comparison(bin, depth),
                _ => self.rebuild(bin.span, &[&*bin.left, &*bin.right], depth),
            },
            Expr::Call(call) => self.extract_call(call, depth),
            Expr::New(new) => self.extract_new(new, depth),
            Expr::Array(array) => {
                let elems: Vec<&Expr> = array.elems.iter().flatten().map(|e| &*e.expr).collect();
                self.rebuild(array.span, &elems, depth)
            }
            Expr::Object(object) => self.extract_object(object, depth),
            Expr::Arrow(arrow) => self.extract_arrow(arrow, depth),
            Expr::Paren(paren) => self.rebuild(paren.span, &[&*paren.expr], depth),
            // `"文本" as const` is replaced whole; a lookup result is not a literal type.
            Expr::TsConstAssertion(assertion) => match &*assertion.expr {
                Expr::Lit(Lit::Str(s)) => self.extract_str(s),
                inner => self.rebuild(assertion.span, &[inner], depth),
            },
            _ => self.rebuild_children(expr),
        }
    }

    fn extract_str(&mut self, s: &Str) -> Option<Extraction> {
        let text = s.value.as_str()?;
        if !contains_target_text(text) {
            return None;
        }
        let key = self.emit(s.span, SiteKind::Literal, text.to_string(), Vec::new())?;
        Some(Extraction {
            replacement: self.lookup(&key, &[]),
            matched_key: key,
        })
    }

    fn extract_interpolated(&mut self, text: &InterpolatedText<'_>, depth: usize) -> Option<Extraction> {
        match self.interpolate(text, SiteKind::Interpolated, depth) {
            Interpolation::Lookup(extraction) => Some(extraction),
            Interpolation::Unkeyed(edits) => self.splice_span(text.span, edits),
        }
    }

    /// Emit one site for `text`, extracting inside every slot first.
    fn interpolate(
        &mut self,
        text: &InterpolatedText<'_>,
        kind: SiteKind,
        depth: usize,
    ) -> Interpolation {
        let mut namer = SlotNamer::default();
        let mut message = String::new();
        let mut slot_edits = Vec::new();

        let mut index = 0;
        for part in &text.parts {
            match part {
                Part::Text(t) => message.push_str(t),
                Part::Slot(expr) => {
                    let source = self.parsed.snippet(expr.span()).to_string();
                    let inner = self.extract(expr, depth + 1);
                    let shorthand = inner.is_none() && matches!(expr, Expr::Ident(_));
                    let value = match inner {
                        Some(extraction) => {
                            let value = extraction.replacement.clone();
                            slot_edits.push(self.edit(expr.span(), extraction));
                            value
                        }
                        None => source.clone(),
                    };
                    let name = namer.bind(slot_base_name(expr, index), &source, value, shorthand);
                    index += 1;
                    message.push('{');
                    message.push_str(&name);
                    message.push('}');
                }
            }
        }

        match self.emit(text.span, kind, message, namer.names()) {
            Some(key) => Interpolation::Lookup(Extraction {
                replacement: self.lookup(&key, &namer.into_bindings()),
                matched_key: key,
            }),
            None => Interpolation::Unkeyed(slot_edits),
        }
    }

    /// A `+` chain is one unit when its canonical form carries target text; otherwise
    /// both operands are handled independently.
    fn extract_concat(&mut self, expr: &Expr, bin: &BinExpr, depth: usize) -> Option<Extraction> {
        if let Some(text) = InterpolatedText::from_concat(expr)
            && text.has_target_text()
        {
            return self.extract_interpolated(&text, depth);
        }
        self.rebuild(bin.span, &[&*bin.left, &*bin.right], depth)
    }

    /// Literals compared against stay literal.
    fn extract_comparison(&mut self, bin: &BinExpr, depth: usize) -> Option<Extraction> {
        self.open_frame();
        for operand in [&*bin.left, &*bin.right] {
            match literal_target_text(operand) {
                Some((text, kind)) => {
                    self.record_unrecognized(text, kind, SkipReason::Comparison, operand.span().lo)
                }
                None => self.extract_into_frame(operand, depth + 1),
            }
        }
        self.close_frame(bin.span)
    }

    fn extract_call(&mut self, call: &CallExpr, depth: usize) -> Option<Extraction> {
        if is_module_load(&call.callee) {
            for arg in &call.args {
                for found in find_target_text(&*arg.expr) {
                    self.record_unrecognized(
                        found.text,
                        found.node_kind,
                        SkipReason::ModuleSpecifier,
                        found.pos,
                    );
                }
            }
            return None;
        }

        let callee = match &call.callee {
            Callee::Expr(callee) => Some(&**callee),
            _ => None,
        };

        if let Some(name) = callee.and_then(callee_name) {
            if self.options.is_lookup_call(&name) {
                return None;
            }
            if self.options.is_skipped_call(&name) {
                self.record_skipped_args(&name, call.args.iter().map(|a| &*a.expr));
                return None;
            }
        }

        self.open_frame();
        if let Some(callee) = callee {
            self.extract_into_frame(callee, depth + 1);
        }
        for arg in &call.args {
            self.extract_into_frame(&arg.expr, depth + 1);
        }
        self.close_frame(call.span)
    }

    fn extract_new(&mut self, new: &NewExpr, depth: usize) -> Option<Extraction> {
        let args = new.args.as_deref().unwrap_or_default();

        if let Some(name) = callee_name(&new.callee)
            && self.options.is_skipped_call(&name)
        {
            self.record_skipped_args(&name, args.iter().map(|a| &*a.expr));
            return None;
        }

        self.open_frame();
        self.extract_into_frame(&new.callee, depth + 1);
        for arg in args {
            self.extract_into_frame(&arg.expr, depth + 1);
        }
        self.close_frame(new.span)
    }

    /// Object literals evaluated at module load turn extracted `key: value` properties
    /// into getters so the lookup runs on access.
    fn extract_object(&mut self, object: &ObjectLit, depth: usize) -> Option<Extraction> {
        self.open_frame();
        for prop in &object.props {
            let prop = match prop {
                PropOrSpread::Spread(spread) => {
                    self.extract_into_frame(&spread.expr, depth + 1);
                    continue;
                }
                PropOrSpread::Prop(prop) => &**prop,
            };

            let Prop::KeyValue(kv) = prop else {
                // Shorthand props carry no literal; getters, setters and methods are
                // runtime scopes of their own.
                prop.visit_with(self);
                continue;
            };

            if let PropName::Computed(computed) = &kv.key {
                self.visit_computed_key(&computed.expr);
                self.extract_into_frame(&kv.value, depth + 1);
                continue;
            }

            // Function values already defer their own evaluation; nested objects get
            // getters on their own properties and keep their identity.
            if self.runtime_depth > 0
                || matches!(&*kv.value, Expr::Arrow(_) | Expr::Fn(_) | Expr::Object(_))
            {
                self.extract_into_frame(&kv.value, depth + 1);
                continue;
            }

            let Some(extraction) = self.in_runtime(|w| w.extract(&kv.value, depth + 1)) else {
                continue;
            };
            let key_source = self.parsed.snippet(kv.key.span()).to_string();
            let accessor = Extraction {
                replacement: format!(
                    "get {}() {{ return {}; }}",
                    key_source, extraction.replacement
                ),
                matched_key: extraction.matched_key,
            };
            self.report.lazy_accessors += 1;
            if matches!(&*kv.value, Expr::Array(_)) {
                let location = self.location(kv.key.span().lo);
                self.report.container_accessors.push(location);
            }
            self.push_edit(Span::new(kv.key.span().lo, kv.value.span().hi), accessor);
        }
        self.close_frame(object.span)
    }

    fn extract_arrow(&mut self, arrow: &ArrowExpr, depth: usize) -> Option<Extraction> {
        let shadows = self.binds_lookup(&arrow.params) || self.binds_lookup(&*arrow.body);
        self.in_function(shadows, |w| {
            w.open_frame();
            for param in &arrow.params {
                param.visit_with(w);
            }
            match &*arrow.body {
                BlockStmtOrExpr::Expr(body) => w.extract_into_frame(body, depth + 1),
                BlockStmtOrExpr::BlockStmt(block) => block.visit_with(w),
            }
            w.close_frame(arrow.span)
        })
    }

    // ============================================================
    // Markup
    // ============================================================

    fn visit_jsx_children(&mut self, owner: Span, children: &[JSXElementChild]) {
        let markup = self.markup;
        let runs = markup.runs_for(owner);

        let mut i = 0;
        while i < children.len() {
            if let Some(run) = runs.iter().find(|r| r.start == i) {
                self.extract_markup_run(run, children);
                i = run.end.max(i + 1);
                continue;
            }
            children[i].visit_with(self);
            i += 1;
        }
    }

    fn extract_markup_run(&mut self, run: &MarkupRun, children: &[JSXElementChild]) {
        let Some(span) = run.span(children) else {
            return;
        };
        let text = InterpolatedText {
            span,
            parts: run.interpolation_parts(children),
        };

        match self.interpolate(&text, SiteKind::MarkupText, 0) {
            Interpolation::Lookup(extraction) => {
                let replacement = format!(
                    "{}{{{}}}{}",
                    run.leading_ws, extraction.replacement, run.trailing_ws
                );
                self.push_edit(
                    span,
                    Extraction {
                        replacement,
                        matched_key: extraction.matched_key,
                    },
                );
            }
            Interpolation::Unkeyed(edits) => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.extend(edits);
                }
            }
        }
    }

    fn extract_jsx_text(&mut self, node: &JSXText) {
        let cleaned = clean_jsx_text(&node.value);
        let text = cleaned.trim();
        if !contains_target_text(text) {
            return;
        }

        if self.file.is_pure_data {
            self.record_unrecognized(
                text.to_string(),
                NodeKind::JsxText,
                SkipReason::DataFileSkip,
                node.span.lo,
            );
            return;
        }

        let raw = self.parsed.snippet(node.span);
        let leading = raw[..raw.len() - raw.trim_start_matches(is_jsx_ws).len()].to_string();
        let trailing = raw[raw.trim_end_matches(is_jsx_ws).len()..].to_string();

        let Some(key) = self.emit(node.span, SiteKind::MarkupText, text.to_string(), Vec::new())
        else {
            return;
        };
        let replacement = format!("{}{{{}}}{}", leading, self.lookup(&key, &[]), trailing);
        self.push_edit(
            node.span,
            Extraction {
                replacement,
                matched_key: key,
            },
        );
    }

    // ============================================================
    // Sites, edits and diagnostics
    // ============================================================

    fn emit(
        &mut self,
        span: Span,
        kind: SiteKind,
        text: String,
        interpolation_vars: Vec<String>,
    ) -> Option<String> {
        if self.shadowed > 0 {
            let node_kind = match kind {
                SiteKind::Literal => NodeKind::StringLiteral,
                SiteKind::Interpolated => NodeKind::TemplateLiteral,
                SiteKind::MarkupText => NodeKind::JsxText,
            };
            self.record_unrecognized(text, node_kind, SkipReason::ShadowedLookup, span.lo);
            return None;
        }

        let has_vars = !interpolation_vars.is_empty();
        let site = CandidateSite {
            id: SiteId::new(span, kind),
            text,
            kind,
            span_start: self.parsed.offset(span.lo),
            span_end: self.parsed.offset(span.hi),
            interpolation_vars,
            location: self.location(span.lo),
            component_hint: self.components.last().cloned(),
        };

        let key = self.handler.on_site(site)?;
        self.report.applied += 1;
        if has_vars {
            self.report.interpolated += 1;
        }
        if self.runtime_depth == 0 {
            self.eager_keys.push(key.clone());
        }
        Some(key)
    }

    fn lookup(&self, key: &str, slots: &[SlotBinding]) -> String {
        render_lookup(&self.options.lookup_function, key, slots)
    }

    fn location(&self, pos: BytePos) -> Location {
        let loc = self.parsed.loc(pos);
        Location::new(&self.file.path, loc.line, loc.col_display + 1)
    }

    fn record_unrecognized(&mut self, text: String, node_kind: NodeKind, reason: SkipReason, pos: BytePos) {
        let location = self.location(pos);
        self.report.unrecognized.push(Sample {
            text,
            node_kind,
            reason,
            location,
        });
    }

    fn record_skipped_args<'e>(&mut self, callee: &str, args: impl Iterator<Item = &'e Expr>) {
        for arg in args {
            for found in find_target_text(arg) {
                self.record_unrecognized(
                    found.text,
                    found.node_kind,
                    SkipReason::SkipFunctionCall(callee.to_string()),
                    found.pos,
                );
            }
        }
    }

    /// Computed keys (`obj["名称"]`, `{ ["名称"]: v }`) must keep their literal.
    fn visit_computed_key(&mut self, expr: &Expr) {
        match literal_target_text(expr) {
            Some((text, kind)) => {
                self.record_unrecognized(text, kind, SkipReason::MemberKey, expr.span().lo)
            }
            None => expr.visit_with(self),
        }
    }

    fn edit(&self, span: Span, extraction: Extraction) -> Edit {
        Edit {
            lo: self.parsed.offset(span.lo),
            hi: self.parsed.offset(span.hi),
            text: extraction.replacement,
            key: extraction.matched_key,
        }
    }

    fn push_edit(&mut self, span: Span, extraction: Extraction) {
        let edit = self.edit(span, extraction);
        if let Some(frame) = self.frames.last_mut() {
            frame.push(edit);
        }
    }

    fn extract_into_frame(&mut self, expr: &Expr, depth: usize) {
        if let Some(extraction) = self.extract(expr, depth) {
            self.push_edit(expr.span(), extraction);
        }
    }

    fn open_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    fn close_frame(&mut self, span: Span) -> Option<Extraction> {
        let edits = self.frames.pop().unwrap_or_default();
        self.splice_span(span, edits)
    }

    fn splice_span(&self, span: Span, edits: Vec<Edit>) -> Option<Extraction> {
        let matched_key = edits.first()?.key.clone();
        let replacement = splice(
            &self.parsed.code,
            self.parsed.offset(span.lo),
            self.parsed.offset(span.hi),
            edits,
        );
        Some(Extraction {
            replacement,
            matched_key,
        })
    }

    fn rebuild(&mut self, span: Span, parts: &[&Expr], depth: usize) -> Option<Extraction> {
        self.open_frame();
        for part in parts {
            self.extract_into_frame(part, depth + 1);
        }
        self.close_frame(span)
    }

    /// Generic fallback: walk the children with the visitor and splice what changed.
    fn rebuild_children(&mut self, expr: &Expr) -> Option<Extraction> {
        self.open_frame();
        expr.visit_children_with(self);
        self.close_frame(expr.span())
    }

    fn in_runtime<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.runtime_depth += 1;
        let result = f(self);
        self.runtime_depth -= 1;
        result
    }

    /// Run `f` in a function scope, shadowed when the scope binds the lookup name.
    fn in_function<R>(&mut self, shadows: bool, f: impl FnOnce(&mut Self) -> R) -> R {
        self.shadowed += usize::from(shadows);
        let result = self.in_runtime(f);
        self.shadowed -= usize::from(shadows);
        result
    }

    fn binds_lookup<N>(&self, node: &N) -> bool
    where
        N: for<'n> VisitWith<BindingFinder<'n>> + ?Sized,
    {
        binds_name(node, &self.options.lookup_function)
    }

    fn with_class(&mut self, name: String, f: impl FnOnce(&mut Self)) {
        self.classes.push(name);
        f(self);
        self.classes.pop();
    }

    /// Static class fields run when the class is defined.
    fn visit_static_field(&mut self, key: Span, pos: BytePos, f: impl FnOnce(&mut Self)) {
        let class = self.classes.last().map_or("class", String::as_str);
        let name = format!("{}.{}", class, self.parsed.snippet(key));
        self.track_binding(name, pos, f);
    }

    fn with_component(&mut self, name: Option<String>, f: impl FnOnce(&mut Self)) {
        let pushed = name.is_some();
        if let Some(name) = name {
            self.components.push(name);
        }
        f(self);
        if pushed {
            self.components.pop();
        }
    }

    /// Run `f` and record a deferred binding when it emitted keys at module load time.
    fn track_binding(&mut self, name: String, pos: BytePos, f: impl FnOnce(&mut Self)) {
        let top_level = self.runtime_depth == 0;
        let before = self.eager_keys.len();
        f(self);
        if top_level && let Some(key) = self.eager_keys.get(before).cloned() {
            let location = self.location(pos);
            self.report.deferred.push(DeferredBinding {
                name,
                key,
                location,
            });
        }
    }
}

impl<H: SiteHandler> Visit for Walker<'_, H> {
    fn visit_expr(&mut self, node: &Expr) {
        if let Some(extraction) = self.extract(node, 0) {
            self.push_edit(node.span(), extraction);
        }
    }

    fn visit_module_item(&mut self, node: &ModuleItem) {
        // Declarations at module level share the import's scope; other statements
        // (blocks, loops, `try`) may bind the name for their own body.
        let shadows = matches!(node, ModuleItem::Stmt(stmt) if !matches!(stmt, Stmt::Decl(_)))
            && self.binds_lookup(node);
        self.shadowed += usize::from(shadows);
        node.visit_children_with(self);
        self.shadowed -= usize::from(shadows);
    }

    fn visit_function(&mut self, node: &Function) {
        let shadows = self.binds_lookup(&node.params) || self.binds_lookup(&node.body);
        self.in_function(shadows, |w| node.visit_children_with(w));
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        let shadows = self.binds_lookup(&node.params) || self.binds_lookup(&node.body);
        self.in_function(shadows, |w| node.visit_children_with(w));
    }

    fn visit_getter_prop(&mut self, node: &GetterProp) {
        let shadows = self.binds_lookup(&node.body);
        self.in_function(shadows, |w| node.visit_children_with(w));
    }

    fn visit_setter_prop(&mut self, node: &SetterProp) {
        let shadows = self.binds_lookup(&*node.param) || self.binds_lookup(&node.body);
        self.in_function(shadows, |w| node.visit_children_with(w));
    }

    fn visit_class_prop(&mut self, node: &ClassProp) {
        if node.is_static {
            self.visit_static_field(node.key.span(), node.span.lo, |w| {
                node.visit_children_with(w)
            });
        } else {
            self.in_runtime(|w| node.visit_children_with(w));
        }
    }

    fn visit_private_prop(&mut self, node: &PrivateProp) {
        if node.is_static {
            self.visit_static_field(node.key.span(), node.span.lo, |w| {
                node.visit_children_with(w)
            });
        } else {
            self.in_runtime(|w| node.visit_children_with(w));
        }
    }

    fn visit_member_expr(&mut self, node: &MemberExpr) {
        node.obj.visit_with(self);
        if let MemberProp::Computed(computed) = &node.prop {
            self.visit_computed_key(&computed.expr);
        }
    }

    fn visit_ts_enum_decl(&mut self, node: &TsEnumDecl) {
        for member in &node.members {
            let Some(init) = &member.init else {
                continue;
            };
            for found in find_target_text(&**init) {
                self.record_unrecognized(
                    found.text,
                    found.node_kind,
                    SkipReason::EnumMember,
                    found.pos,
                );
            }
        }
    }

    fn visit_switch_case(&mut self, node: &SwitchCase) {
        if let Some(test) = &node.test {
            match literal_target_text(test) {
                Some((text, kind)) => {
                    self.record_unrecognized(text, kind, SkipReason::Comparison, test.span().lo)
                }
                None => test.visit_with(self),
            }
        }
        node.cons.visit_with(self);
    }

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        node.opening.visit_with(self);
        if is_raw_text_element(&node.opening.name) {
            return;
        }
        self.visit_jsx_children(node.span, &node.children);
    }

    fn visit_jsx_fragment(&mut self, node: &JSXFragment) {
        self.visit_jsx_children(node.span, &node.children);
    }

    fn visit_jsx_text(&mut self, node: &JSXText) {
        self.extract_jsx_text(node);
    }

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        if let Some(JSXAttrValue::Str(s)) = &node.value {
            if let Some(extraction) = self.extract_str(s) {
                let replacement = format!("{{{}}}", extraction.replacement);
                self.push_edit(
                    s.span,
                    Extraction {
                        replacement,
                        matched_key: extraction.matched_key,
                    },
                );
            }
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        let name = match &node.name {
            Pat::Ident(ident) => ident.id.sym.to_string(),
            other => self.parsed.snippet(other.span()).to_string(),
        };
        let is_function = node
            .init
            .as_deref()
            .is_some_and(|init| matches!(init, Expr::Arrow(_) | Expr::Fn(_)));
        let component = (is_function && is_component_name(&name)).then(|| name.clone());

        self.track_binding(name, node.span.lo, |w| {
            w.with_component(component, |w| node.visit_children_with(w));
        });
    }

    fn visit_export_default_expr(&mut self, node: &ExportDefaultExpr) {
        self.track_binding("default".to_string(), node.span.lo, |w| {
            node.visit_children_with(w);
        });
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        let name = node.ident.sym.to_string();
        let component = is_component_name(&name).then_some(name);
        self.with_component(component, |w| node.visit_children_with(w));
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        let component = node
            .ident
            .as_ref()
            .map(|i| i.sym.to_string())
            .filter(|name| is_component_name(name));
        self.with_component(component, |w| node.visit_children_with(w));
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        let name = node.ident.sym.to_string();
        let component = is_component_name(&name).then(|| name.clone());
        self.with_class(name, |w| {
            w.with_component(component, |w| node.visit_children_with(w));
        });
    }

    fn visit_class_expr(&mut self, node: &ClassExpr) {
        let name = node
            .ident
            .as_ref()
            .map_or_else(|| "class".to_string(), |i| i.sym.to_string());
        self.with_class(name, |w| node.visit_children_with(w));
    }
}
