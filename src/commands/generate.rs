//! Generate static files

use anyhow::Result;

use crate::content::BlogLoader;
use crate::generator::Generator;
use crate::Site;

/// Load every post and write the static rendition into `output_dir`
pub async fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = BlogLoader::new(site);
    let posts = loader.load_all().await;
    tracing::info!("Loaded {} posts", posts.len());

    let generator = Generator::new(site)?;
    generator.generate(&posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
