//! Selection state for the catalog browser.
//!
//! [`Browser`] holds what is on screen: the catalog, the selected entry's
//! details and its two images. Images arrive asynchronously through
//! [`ImageLoader`]; every selection bumps an epoch so results for an earlier
//! selection are dropped instead of overwriting the current one.

use std::sync::Arc;

use appshelf_catalog::{Catalog, CatalogEntry};
use appshelf_fetch::{AssetFetcher, HttpClient, ImageResource};
use appshelf_install::InstallJob;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

const DATE_FORMAT: &str = "%d %b %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Icon,
    Screenshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub epoch: u64,
    pub slot: ImageSlot,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct ImageLoaded {
    pub epoch: u64,
    pub slot: ImageSlot,
    pub image: Option<ImageResource>,
}

/// Text fields shown for the selected entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details {
    pub name: String,
    pub developer: String,
    pub version: String,
    pub date: String,
    pub summary: String,
    pub website: String,
    pub website_host: String,
}

impl Details {
    fn of(entry: &CatalogEntry) -> Self {
        Self {
            name: entry.name().to_string(),
            developer: entry.developer().to_string(),
            version: entry.version().to_string(),
            date: entry
                .date()
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            summary: entry.summary().to_string(),
            website: entry.website().to_string(),
            website_host: website_host(entry.website()),
        }
    }
}

fn website_host(website: &str) -> String {
    let Ok(url) = Url::parse(website) else {
        return String::new();
    };
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

#[derive(Debug)]
pub struct Browser {
    catalog: Arc<Catalog>,
    selected: Option<usize>,
    epoch: u64,
    details: Option<Details>,
    icon: Option<ImageResource>,
    screenshot: Option<ImageResource>,
}

impl Browser {
    /// Nothing is selected until [`Browser::select`] is called.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            selected: None,
            epoch: 0,
            details: None,
            icon: None,
            screenshot: None,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Swaps in a new catalog and selects its first entry, if any.
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) -> Vec<ImageRequest> {
        self.catalog = catalog;
        self.select(0)
    }

    /// Shows the entry at `index` and returns the images to load for it.
    ///
    /// An out-of-range index clears the selection.
    pub fn select(&mut self, index: usize) -> Vec<ImageRequest> {
        self.epoch += 1;
        self.icon = None;
        self.screenshot = None;

        let Some(entry) = self.catalog.get(index) else {
            self.selected = None;
            self.details = None;
            return Vec::new();
        };
        self.selected = Some(index);
        self.details = Some(Details::of(entry));

        let epoch = self.epoch;
        let screenshot = entry.screenshots().first().map(|s| s.image()).unwrap_or("");
        [(ImageSlot::Icon, entry.icon()), (ImageSlot::Screenshot, screenshot)]
            .into_iter()
            .filter(|(_, url)| !url.is_empty())
            .map(|(slot, url)| ImageRequest {
                epoch,
                slot,
                url: url.to_string(),
            })
            .collect()
    }

    /// Stores a loaded image unless it belongs to an earlier selection.
    pub fn apply(&mut self, loaded: ImageLoaded) -> bool {
        if loaded.epoch != self.epoch {
            debug!(epoch = loaded.epoch, current = self.epoch, "dropping stale image");
            return false;
        }
        match loaded.slot {
            ImageSlot::Icon => self.icon = loaded.image,
            ImageSlot::Screenshot => self.screenshot = loaded.image,
        }
        true
    }

    pub fn selected(&self) -> Option<&CatalogEntry> {
        self.selected.and_then(|i| self.catalog.get(i))
    }

    pub fn details(&self) -> Option<&Details> {
        self.details.as_ref()
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&ImageResource> {
        match slot {
            ImageSlot::Icon => self.icon.as_ref(),
            ImageSlot::Screenshot => self.screenshot.as_ref(),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// What the install action would run for the shown entry.
    pub fn install_target(&self) -> Option<InstallJob> {
        self.selected().map(InstallJob::from)
    }
}

/// Resolves [`ImageRequest`]s in the background.
///
/// Each call to [`ImageLoader::load`] aborts the tasks of the previous one.
pub struct ImageLoader<C: HttpClient> {
    fetcher: Arc<AssetFetcher<C>>,
    tx: UnboundedSender<ImageLoaded>,
    tasks: Vec<JoinHandle<()>>,
}

impl<C: HttpClient + 'static> ImageLoader<C> {
    pub fn new(fetcher: AssetFetcher<C>) -> (Self, UnboundedReceiver<ImageLoaded>) {
        let (tx, rx) = unbounded_channel();
        let loader = Self {
            fetcher: Arc::new(fetcher),
            tx,
            tasks: Vec::new(),
        };
        (loader, rx)
    }

    pub fn load(&mut self, requests: Vec<ImageRequest>) {
        self.cancel();
        for request in requests {
            let fetcher = Arc::clone(&self.fetcher);
            let tx = self.tx.clone();
            self.tasks.push(tokio::spawn(async move {
                let image = fetcher.resolve(&request.url).await;
                let _ = tx.send(ImageLoaded {
                    epoch: request.epoch,
                    slot: request.slot,
                    image,
                });
            }));
        }
    }

    pub fn cancel(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl<C: HttpClient> Drop for ImageLoader<C> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
