use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<P::Output> {
        tracing::info!("Starting import...");

        // Extract
        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} rows", records.len());

        // Transform
        let games = self.pipeline.transform(records).await?;
        tracing::info!("Validated {} games", games.len());

        // Load
        let output = self.pipeline.load(games).await?;
        tracing::info!("Import finished");

        Ok(output)
    }
}
