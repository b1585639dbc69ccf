use crate::{
    config::DepModelConfig,
    configuration::{ResolveOptions, DEFAULT_ARTIFACT_TYPE, DEFAULT_MAX_DEPTH},
    intern::ModelContext,
    DepModel,
};

#[derive(Default)]
pub struct DepModelBuilder {
    max_depth: Option<usize>,
    default_type: Option<String>,
    ignore_environment: bool,
}

impl DepModelBuilder {
    /// Deepest resolved tree level accepted before a configuration is rejected.
    ///
    /// Defaults to `DEPMODEL_RESOLVE_DEPTH`, or 512.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Artifact type recorded for requests that do not state one.
    ///
    /// Defaults to `DEPMODEL_DEFAULT_TYPE`, or `jar`.
    pub fn default_type(mut self, artifact_type: impl Into<String>) -> Self {
        self.default_type = Some(artifact_type.into());
        self
    }

    /// Skip reading `DEPMODEL_*` environment variables.
    pub fn ignore_environment(mut self) -> Self {
        self.ignore_environment = true;
        self
    }

    pub fn try_build(self) -> anyhow::Result<DepModel> {
        let Self {
            max_depth,
            default_type,
            ignore_environment,
        } = self;

        let config = if ignore_environment {
            DepModelConfig {
                max_depth: None,
                default_type: None,
            }
        } else {
            DepModelConfig::load()?
        };

        let options = ResolveOptions {
            max_depth: max_depth.or(config.max_depth).unwrap_or(DEFAULT_MAX_DEPTH),
            default_type: default_type
                .or(config.default_type)
                .unwrap_or_else(|| DEFAULT_ARTIFACT_TYPE.to_string()),
        };

        Ok(DepModel {
            context: ModelContext::new(),
            options,
        })
    }
}
