use crate::{
    compile::{
        bundle::{PredicateBundle, compile_bundle},
        filter::{self, CompiledFilter},
        members::{FieldRef, MemberResolver},
        pagination, sort,
    },
    error::{CompileError, Result},
    mutation,
    resolve,
    settings::CompileSettings,
};
use model::{
    core::identifiers::FieldPath,
    expr::{Expr, ExprType, bound::BoundExpr},
    mutation::MutationResult,
    query::{filter::FilterClause, pagination::PaginationSpec, sort::SortSpec},
    schema::{field::ArgumentValues, registry::SchemaRegistry},
    selection::SelectionTree,
};

/// Entry point for compiling query fragments against one schema snapshot.
#[derive(Clone)]
pub struct QueryCompiler<'s> {
    schema: &'s dyn SchemaRegistry,
    settings: CompileSettings,
}

impl<'s> QueryCompiler<'s> {
    pub fn new(schema: &'s dyn SchemaRegistry) -> Self {
        Self {
            schema,
            settings: CompileSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: CompileSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &CompileSettings {
        &self.settings
    }

    fn resolver(&self) -> MemberResolver<'s> {
        MemberResolver::new(self.schema, self.settings.member_lookup)
    }

    pub fn compile_filter(&self, clauses: &[FilterClause], element_type: &ExprType) -> Result<CompiledFilter> {
        filter::compile_filter(
            self.resolver(),
            clauses,
            element_type,
            self.settings.ambiguous_clauses,
        )
    }

    pub fn compile_filter_sort_page(
        &self,
        clauses: &[FilterClause],
        sort: Option<&SortSpec>,
        page: PaginationSpec,
        element_type: &ExprType,
    ) -> Result<PredicateBundle> {
        compile_bundle(
            self.resolver(),
            self.settings.ambiguous_clauses,
            clauses,
            sort,
            page,
            element_type,
        )
    }

    /// Appends ordering to a sequence expression.
    pub fn apply_sort(&self, seq: Expr, spec: Option<&SortSpec>) -> Result<Expr> {
        let element_type = element_type_of(&seq)?;
        sort::apply_sort(self.resolver(), seq, spec, &element_type)
    }

    pub fn apply_pagination(&self, seq: Expr, spec: &PaginationSpec) -> Result<Expr> {
        element_type_of(&seq)?;
        Ok(pagination::apply_pagination(seq, spec))
    }

    /// Resolves a dotted member path starting at `root`.
    pub fn resolve_path(&self, root: Expr, path: &FieldPath) -> Result<FieldRef> {
        self.resolver().resolve_path(root, path)
    }

    /// Resolves `field_name` on `type_name` with the supplied arguments,
    /// re-parented onto `context`.
    pub fn resolve_field(
        &self,
        type_name: &str,
        field_name: &str,
        supplied: &ArgumentValues,
        context: &Expr,
    ) -> Result<BoundExpr> {
        let field = self
            .schema
            .lookup_field(type_name, field_name)
            .ok_or_else(|| CompileError::UnknownField {
                field: field_name.to_string(),
                type_name: type_name.to_string(),
            })?;
        resolve::resolve_field(
            self.resolver(),
            self.settings.ambiguous_clauses,
            field,
            supplied,
            context,
        )
    }

    pub fn rewrite_mutation(&self, result: &MutationResult, selection: &SelectionTree) -> Result<BoundExpr> {
        mutation::rewrite_mutation(result, selection)
    }

    /// Rewrites a mutation result and re-parents it onto `context`.
    pub fn rewrite_mutation_onto(
        &self,
        result: &MutationResult,
        selection: &SelectionTree,
        context: &Expr,
    ) -> Result<BoundExpr> {
        Ok(self.rewrite_mutation(result, selection)?.substitute_context(context))
    }
}

fn element_type_of(seq: &Expr) -> Result<ExprType> {
    let ty = seq.ty();
    ty.element_type()
        .cloned()
        .ok_or_else(|| CompileError::NotASequence {
            found: ty.to_string(),
        })
}
