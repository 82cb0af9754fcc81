//! Drink images: source selection, async resolution and JPEG re-compression.
//!
//! A drink has three possible image sources. Exactly one is authoritative when
//! reading, chosen by fixed priority: stored bytes, then remote URL, then a
//! named bundled asset.

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;
use tokio::sync::watch;
use url::Url;

use brewup_core::{AggregateRoot, DomainError, DomainResult};

use crate::drink::{DEFAULT_IMAGE_NAME, Drink};

pub const DEFAULT_IMAGE_QUALITY: f32 = 0.8;

/// The authoritative image source of a drink, without loading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    Data(&'a [u8]),
    Remote(&'a Url),
    Asset(&'a str),
}

/// A resolved image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrinkImage {
    /// Encoded image bytes (stored or downloaded).
    Bytes(Vec<u8>),
    /// Name of a bundled asset for the front end to look up.
    Asset(String),
}

#[derive(Debug, Error)]
pub enum ImageFetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Network collaborator for remote images. No retry policy.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, ImageFetchError>;
}

/// [`ImageFetcher`] over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, ImageFetchError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ImageFetchError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ImageFetchError::Status(resp.status().as_u16()));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ImageFetchError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Cancels image loads holding the paired [`CancelSignal`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observed by an in-flight image load; cloning shares the same cancellation.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once cancelled. Pending forever if the handle is dropped first.
    pub async fn cancelled(&mut self) {
        let closed = self.rx.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

impl Drink {
    pub fn image_data(&self) -> Option<&[u8]> {
        self.image_data.as_deref()
    }

    pub fn image_source(&self) -> ImageSource<'_> {
        if let Some(data) = &self.image_data {
            ImageSource::Data(data)
        } else if let Some(url) = &self.image_url {
            ImageSource::Remote(url)
        } else {
            ImageSource::Asset(&self.image_name)
        }
    }

    pub fn has_image(&self) -> bool {
        self.image_data.is_some() || self.image_url.is_some() || self.image_name != DEFAULT_IMAGE_NAME
    }

    /// Load the authoritative image.
    ///
    /// Fetch failures are logged and reported as `None`. A cancelled load also
    /// returns `None` and leaves the drink untouched.
    pub async fn resolve_image(
        &self,
        fetcher: &dyn ImageFetcher,
        cancel: &CancelSignal,
    ) -> Option<DrinkImage> {
        match self.image_source() {
            ImageSource::Data(data) => Some(DrinkImage::Bytes(data.to_vec())),
            ImageSource::Asset(name) => Some(DrinkImage::Asset(name.to_string())),
            ImageSource::Remote(url) => {
                if cancel.is_cancelled() {
                    return None;
                }
                let mut cancel = cancel.clone();
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!(drink_id = %self.id(), %url, "image load cancelled");
                        None
                    }
                    result = fetcher.fetch(url) => match result {
                        Ok(bytes) => Some(DrinkImage::Bytes(bytes)),
                        Err(err) => {
                            tracing::warn!(drink_id = %self.id(), %url, "failed to load image: {err}");
                            None
                        }
                    },
                }
            }
        }
    }

    /// Store `image` re-encoded as JPEG at `quality` (0.0..=1.0), or clear the
    /// stored bytes when `None`.
    ///
    /// Bytes that are not a decodable image leave the drink unchanged.
    pub fn set_image(&mut self, image: Option<&[u8]>, quality: f32) -> DomainResult<()> {
        match image {
            Some(bytes) => {
                self.image_data = Some(compress_jpeg(bytes, quality)?);
            }
            None => {
                self.image_data = None;
            }
        }
        Ok(())
    }
}

/// Serde adapter storing image bytes as a standard base64 string.
pub(crate) mod stored_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| STANDARD.decode(encoded).map_err(D::Error::custom))
            .transpose()
    }
}

fn compress_jpeg(bytes: &[u8], quality: f32) -> DomainResult<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| DomainError::codec(format!("unreadable image: {e}")))?;
    // JPEG has no alpha channel.
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, jpeg_quality(quality));
    rgb.write_with_encoder(encoder)
        .map_err(|e| DomainError::codec(format!("jpeg encoding failed: {e}")))?;
    Ok(out)
}

fn jpeg_quality(quality: f32) -> u8 {
    if !quality.is_finite() {
        return (DEFAULT_IMAGE_QUALITY * 100.0) as u8;
    }
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drink::CreateDrink;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFetcher {
        result: Result<Vec<u8>, u16>,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn ok(bytes: &[u8]) -> Self {
            Self {
                result: Ok(bytes.to_vec()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                result: Err(status),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ImageFetcher for StubFetcher {
        async fn fetch(&self, _url: &Url) -> Result<Vec<u8>, ImageFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().map_err(ImageFetchError::Status)
        }
    }

    /// Never completes, so only cancellation can end the load.
    struct HangingFetcher;

    #[async_trait]
    impl ImageFetcher for HangingFetcher {
        async fn fetch(&self, _url: &Url) -> Result<Vec<u8>, ImageFetchError> {
            std::future::pending().await
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 120, 40, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn remote() -> Url {
        Url::parse("https://images.example.com/latte.jpg").unwrap()
    }

    #[test]
    fn default_drink_has_no_image() {
        let d = Drink::default();
        assert!(!d.has_image());
        assert_eq!(d.image_source(), ImageSource::Asset(DEFAULT_IMAGE_NAME));
    }

    #[test]
    fn any_non_default_source_counts_as_image() {
        let named = Drink::create(CreateDrink {
            image_name: "LattePicture".to_string(),
            ..CreateDrink::default()
        });
        assert!(named.has_image());

        let linked = Drink::create(CreateDrink {
            image_url: Some(remote()),
            ..CreateDrink::default()
        });
        assert!(linked.has_image());
    }

    #[test]
    fn bytes_take_priority_over_url_and_asset() {
        let d = Drink::create(CreateDrink {
            image_data: Some(vec![1, 2, 3]),
            image_url: Some(remote()),
            image_name: "LattePicture".to_string(),
            ..CreateDrink::default()
        });
        assert_eq!(d.image_source(), ImageSource::Data(&[1, 2, 3]));

        let d = Drink::create(CreateDrink {
            image_url: Some(remote()),
            image_name: "LattePicture".to_string(),
            ..CreateDrink::default()
        });
        assert!(matches!(d.image_source(), ImageSource::Remote(_)));
    }

    #[test]
    fn set_image_reencodes_as_jpeg() {
        let mut d = Drink::default();
        d.set_image(Some(&png_bytes()), DEFAULT_IMAGE_QUALITY).unwrap();

        let stored = d.image_data().unwrap();
        assert_eq!(&stored[..2], &[0xFF, 0xD8]);
        assert_eq!(
            image::guess_format(stored).unwrap(),
            image::ImageFormat::Jpeg
        );
        assert!(d.has_image());
    }

    #[test]
    fn set_image_none_clears_bytes() {
        let mut d = Drink::default();
        d.set_image(Some(&png_bytes()), 0.5).unwrap();
        d.set_image(None, DEFAULT_IMAGE_QUALITY).unwrap();
        assert!(d.image_data().is_none());
        assert!(!d.has_image());
    }

    #[test]
    fn set_image_rejects_undecodable_bytes_without_side_effects() {
        let mut d = Drink::create(CreateDrink {
            image_data: Some(vec![9, 9, 9]),
            ..CreateDrink::default()
        });
        let err = d.set_image(Some(b"not an image"), 0.8).unwrap_err();
        assert!(matches!(err, DomainError::Codec(_)));
        assert_eq!(d.image_data(), Some(&[9u8, 9, 9][..]));
    }

    #[test]
    fn stored_bytes_serialize_as_base64() {
        let d = Drink::create(CreateDrink {
            image_data: Some(vec![0xFF, 0xD8, 0x00]),
            ..CreateDrink::default()
        });
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["image_data"], serde_json::json!("/9gA"));

        let back: Drink = serde_json::from_value(json).unwrap();
        assert_eq!(back.image_data(), Some(&[0xFF, 0xD8, 0x00][..]));
    }

    #[test]
    fn missing_or_corrupt_stored_bytes() {
        let mut json = serde_json::to_value(Drink::default()).unwrap();
        json.as_object_mut().unwrap().remove("image_data");
        let back: Drink = serde_json::from_value(json.clone()).unwrap();
        assert!(back.image_data().is_none());

        json["image_data"] = serde_json::json!("%%%");
        assert!(serde_json::from_value::<Drink>(json).is_err());
    }

    #[test]
    fn jpeg_quality_is_clamped() {
        assert_eq!(jpeg_quality(0.8), 80);
        assert_eq!(jpeg_quality(2.0), 100);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(f32::NAN), 80);
    }

    #[tokio::test]
    async fn resolve_prefers_stored_bytes_without_fetching() {
        let fetcher = StubFetcher::ok(&[7]);
        let d = Drink::create(CreateDrink {
            image_data: Some(vec![1, 2]),
            image_url: Some(remote()),
            ..CreateDrink::default()
        });
        let image = d.resolve_image(&fetcher, &CancelSignal::never()).await;
        assert_eq!(image, Some(DrinkImage::Bytes(vec![1, 2])));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn resolve_fetches_remote_url() {
        let fetcher = StubFetcher::ok(&[4, 5, 6]);
        let d = Drink::create(CreateDrink {
            image_url: Some(remote()),
            ..CreateDrink::default()
        });
        let image = d.resolve_image(&fetcher, &CancelSignal::never()).await;
        assert_eq!(image, Some(DrinkImage::Bytes(vec![4, 5, 6])));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resolve_swallows_fetch_failures() {
        let fetcher = StubFetcher::failing(404);
        let d = Drink::create(CreateDrink {
            image_url: Some(remote()),
            ..CreateDrink::default()
        });
        assert_eq!(d.resolve_image(&fetcher, &CancelSignal::never()).await, None);
    }

    #[tokio::test]
    async fn resolve_falls_back_to_named_asset() {
        let fetcher = StubFetcher::ok(&[]);
        let d = Drink::default();
        let image = d.resolve_image(&fetcher, &CancelSignal::never()).await;
        assert_eq!(image, Some(DrinkImage::Asset(DEFAULT_IMAGE_NAME.to_string())));
    }

    #[tokio::test]
    async fn cancelled_before_start_skips_the_fetch() {
        let fetcher = StubFetcher::ok(&[1]);
        let d = Drink::create(CreateDrink {
            image_url: Some(remote()),
            ..CreateDrink::default()
        });
        let (handle, signal) = cancel_pair();
        handle.cancel();
        assert_eq!(d.resolve_image(&fetcher, &signal).await, None);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancel_abandons_an_in_flight_fetch() {
        let d = Arc::new(Drink::create(CreateDrink {
            image_url: Some(remote()),
            ..CreateDrink::default()
        }));
        let (handle, signal) = cancel_pair();

        let task = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.resolve_image(&HangingFetcher, &signal).await })
        };
        tokio::task::yield_now().await;
        handle.cancel();

        assert_eq!(task.await.unwrap(), None);
    }
}
