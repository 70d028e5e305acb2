//! Local bindings that hide the lookup function.

use swc_ecma_ast::{
    ArrowExpr, BindingIdent, Class, ClassDecl, Constructor, FnDecl, FnExpr, Function, GetterProp,
    SetterProp,
};
use swc_ecma_visit::{Visit, VisitWith};

/// Whether `node` binds `name` in its own scope.
///
/// Nested functions and classes are not entered; they are checked when the walk
/// reaches them.
pub fn binds_name<'n, N>(node: &N, name: &'n str) -> bool
where
    N: VisitWith<BindingFinder<'n>> + ?Sized,
{
    let mut finder = BindingFinder { name, found: false };
    node.visit_with(&mut finder);
    finder.found
}

pub struct BindingFinder<'n> {
    name: &'n str,
    found: bool,
}

impl Visit for BindingFinder<'_> {
    fn visit_binding_ident(&mut self, node: &BindingIdent) {
        self.found |= &*node.id.sym == self.name;
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.found |= &*node.ident.sym == self.name;
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.found |= &*node.ident.sym == self.name;
    }

    fn visit_function(&mut self, _: &Function) {}
    fn visit_fn_expr(&mut self, _: &FnExpr) {}
    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}
    fn visit_class(&mut self, _: &Class) {}
    fn visit_constructor(&mut self, _: &Constructor) {}
    fn visit_getter_prop(&mut self, _: &GetterProp) {}
    fn visit_setter_prop(&mut self, _: &SetterProp) {}
}
