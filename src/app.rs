//! Wiring shared by every CLI command: the loaded store, the optional
//! image resolver, and display flags.

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::image::ImageResolver;
use crate::loader::DatasetLoader;
use crate::store::RecordStore;

pub struct App {
    store: Arc<RecordStore>,
    resolver: Option<ImageResolver>,
    debug: bool,
}

impl App {
    /// Loads the dataset and builds the image resolver.
    ///
    /// Fails only when there is no data at all. Per-file warnings are
    /// printed to stderr and loading carries on.
    pub fn open(config: &Config, with_images: bool, debug: bool) -> Result<Self> {
        let loader = DatasetLoader::new(&config.data);
        let store = loader.load()?;
        for warning in store.warnings() {
            eprintln!("Warning: {}", warning);
        }

        let resolver = if with_images {
            Some(ImageResolver::from_config(&config.images)?)
        } else {
            None
        };

        Ok(Self::new(store, resolver, debug))
    }

    pub fn new(store: Arc<RecordStore>, resolver: Option<ImageResolver>, debug: bool) -> Self {
        Self {
            store,
            resolver,
            debug,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Rendered image line for `name`, or `None` when images are off.
    pub fn image_line(&self, name: &str) -> Option<String> {
        self.resolver.as_ref().map(|resolver| {
            crate::display::image_line(
                &resolver.resolve(name),
                resolver.source_label(),
                self.debug,
            )
        })
    }
}
