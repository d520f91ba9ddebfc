//! Graph Builder UseCase

use crate::config::ExportConfig;
use crate::errors::Result;
use crate::features::graph_builder::domain::GraphDocument;
use crate::features::graph_builder::infrastructure::GraphBuilder;
use crate::shared::models::Document;

/// Graph Builder UseCase Trait
pub trait GraphBuilderUseCase: Send + Sync {
    fn build_graph(&self, document: &Document) -> Result<GraphDocument>;
}

/// Graph Builder UseCase Implementation
#[derive(Debug, Default)]
pub struct GraphBuilderUseCaseImpl {
    builder: GraphBuilder,
}

impl GraphBuilderUseCaseImpl {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            builder: GraphBuilder::new(config),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        self.builder.config()
    }
}

impl GraphBuilderUseCase for GraphBuilderUseCaseImpl {
    fn build_graph(&self, document: &Document) -> Result<GraphDocument> {
        self.builder.build(document)
    }
}
