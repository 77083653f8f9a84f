//! Generation pipeline infrastructure.

mod stage;

pub use stage::{
    ErosionStage, GenerationStage, HeightmapStage, Pipeline, PipelineError, StageConfig, StageId,
};
