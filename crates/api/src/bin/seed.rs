//! Replaces the lesson catalog with the bundled seed lessons.

use api::Config;
use domain::{LessonCatalog, seed};

#[tokio::main]
async fn main() {
    let config = Config::load();
    api::init_tracing(&config);

    let store = match api::connect_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to document store");
            std::process::exit(1);
        }
    };

    let catalog = LessonCatalog::new(store);
    match catalog.replace_all(&seed::catalog()).await {
        Ok(lessons) => {
            for lesson in &lessons {
                tracing::info!(
                    id = %lesson.id,
                    subject = %lesson.subject,
                    location = %lesson.location,
                    spaces = lesson.available_spaces,
                    "seeded lesson"
                );
            }
            tracing::info!(count = lessons.len(), "lesson catalog seeded");
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to seed lessons");
            std::process::exit(1);
        }
    }
}
