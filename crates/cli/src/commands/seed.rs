//! Seed the storefront catalog from a YAML file.
//!
//! The file lists categories and products (see
//! [`emporium_storefront::db::seed`] for the format). Photo paths are
//! resolved relative to the YAML file.

use std::collections::HashMap;
use std::path::Path;

use emporium_core::ProductId;
use emporium_storefront::catalog::Photo;
use emporium_storefront::db::{self, seed::SeedFile, seed::photo_content_type};
use tracing::{error, info};

use super::migrate::database_url;

/// Seed categories and products from `file_path`.
///
/// With `dry_run` the file is parsed, validated and its photos read, but
/// the database is not contacted.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or a database write fails.
pub async fn catalog(file_path: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;

    info!(
        categories = seed.categories.len(),
        products = seed.products.len(),
        "Parsed catalog"
    );

    let errors = seed.validate();
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let photos = load_photos(&seed, base_dir).await?;
    info!(photos = photos.len(), "Catalog validated successfully");

    if dry_run {
        info!("Dry run, database not modified");
        return Ok(());
    }

    let pool = db::create_pool(&database_url()?).await?;
    info!("Connected to database");

    let summary = seed.apply(&pool, &photos).await?;

    info!("Seeding complete!");
    info!("  Categories upserted: {}", summary.categories);
    info!("  Products upserted: {}", summary.products);

    Ok(())
}

async fn load_photos(
    seed: &SeedFile,
    base_dir: &Path,
) -> Result<HashMap<ProductId, Photo>, Box<dyn std::error::Error>> {
    let mut photos = HashMap::new();

    for product in &seed.products {
        let Some(photo_path) = &product.photo else {
            continue;
        };

        let full_path = base_dir.join(photo_path);
        let bytes = tokio::fs::read(&full_path).await.map_err(|e| {
            format!(
                "product {}: cannot read photo {}: {e}",
                product.id,
                full_path.display()
            )
        })?;

        photos.insert(
            product.id.clone(),
            Photo {
                content_type: photo_content_type(photo_path).to_owned(),
                bytes,
            },
        );
    }

    Ok(photos)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CATALOG: &str = r"
categories:
  - _id: lighting
    name: Lighting
    slug: lighting
products:
  - _id: desk-lamp
    name: Desk Lamp
    slug: desk-lamp
    description: Warm light for late nights
    price: 19.99
    category: lighting
    quantity: 12
    shipping: true
    photo: lamp.png
  - _id: mug
    name: Mug
    slug: mug
    price: 8
";

    #[test]
    fn test_yaml_parses_into_seed_file() {
        let seed: SeedFile = serde_yaml::from_str(CATALOG).unwrap();
        assert_eq!(seed.categories.len(), 1);
        assert_eq!(seed.products.len(), 2);
        assert_eq!(seed.products[0].photo.as_deref(), Some("lamp.png"));
        assert!(seed.products[1].description.is_empty());
        assert!(seed.validate().is_empty());
    }

    #[tokio::test]
    async fn test_photos_resolve_relative_to_file() {
        let dir = std::env::temp_dir().join(format!("emporium-seed-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("lamp.png"), [0x89, b'P', b'N', b'G'])
            .await
            .unwrap();

        let seed: SeedFile = serde_yaml::from_str(CATALOG).unwrap();
        let photos = load_photos(&seed, &dir).await.unwrap();

        let photo = &photos[&ProductId::from("desk-lamp")];
        assert_eq!(photo.content_type, "image/png");
        assert_eq!(photo.bytes.len(), 4);
        assert!(!photos.contains_key(&ProductId::from("mug")));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_dry_run_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!("emporium-bad-{}.yaml", std::process::id()));
        tokio::fs::write(&path, "products:\n  - {_id: p, name: P, slug: p, price: -5}\n")
            .await
            .unwrap();

        let result = catalog(path.to_str().unwrap(), true).await;
        assert!(result.unwrap_err().to_string().contains("1 validation errors"));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
