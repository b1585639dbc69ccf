use crate::{
    assemble::{build_project_model, ModelError},
    configuration::ResolveOptions,
    host::{DependencyResolver, ProjectSource},
    intern::ModelContext,
    model::ProjectModel,
};

mod builder;

pub use builder::DepModelBuilder;

/// Entry point for building project models.
///
/// Owns the interning state, so models built by the same instance share
/// instances for equal coordinates until [`DepModel::reset_caches`] is called.
pub struct DepModel {
    context: ModelContext,
    options: ResolveOptions,
}

impl DepModel {
    pub fn builder() -> DepModelBuilder {
        DepModelBuilder::default()
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Builds the model of a project whose host also answers resolution requests
    pub fn build_model<H>(&mut self, host: &H) -> Result<ProjectModel, ModelError>
    where
        H: ProjectSource + DependencyResolver,
    {
        self.build_model_with(host, host)
    }

    /// Builds the model of a project, reading declarations and resolution
    /// results from separate adapters
    pub fn build_model_with<S, R>(
        &mut self,
        source: &S,
        resolver: &R,
    ) -> Result<ProjectModel, ModelError>
    where
        S: ProjectSource + ?Sized,
        R: DependencyResolver + ?Sized,
    {
        build_project_model(&mut self.context, source, resolver, &self.options)
    }

    /// Forgets all interned instances. Call between unrelated builds.
    pub fn reset_caches(&mut self) {
        self.context.reset_caches()
    }
}
