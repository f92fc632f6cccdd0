use crate::adapters::chart::artifact_name;
use crate::domain::model::TrendSeries;
use crate::domain::ports::{ChartRenderer, Storage};
use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

/// Renders a series with every configured renderer and stores the artifacts,
/// one file each or bundled into a single ZIP.
pub struct ReportWriter<S: Storage> {
    storage: S,
    renderers: Vec<Box<dyn ChartRenderer>>,
    bundle: bool,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S, renderers: Vec<Box<dyn ChartRenderer>>, bundle: bool) -> Self {
        Self {
            storage,
            renderers,
            bundle,
        }
    }

    /// Returns the stored file names.
    pub async fn write(&self, series: &TrendSeries) -> Result<Vec<String>> {
        let mut artifacts = Vec::with_capacity(self.renderers.len());
        for renderer in &self.renderers {
            let name = artifact_name(&series.identity, renderer.extension());
            artifacts.push((name, renderer.render(series)?));
        }

        if !self.bundle {
            let mut written = Vec::with_capacity(artifacts.len());
            for (name, data) in artifacts {
                tracing::debug!("Writing {} ({} bytes)", name, data.len());
                self.storage.write_file(&name, &data).await?;
                written.push(name);
            }
            return Ok(written);
        }

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &artifacts {
                zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                zip.write_all(data)?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        let name = artifact_name(&series.identity, "zip");
        tracing::debug!("Writing {} ({} bytes, {} entries)", name, zip_data.len(), artifacts.len());
        self.storage.write_file(&name, &zip_data).await?;
        Ok(vec![name])
    }
}
