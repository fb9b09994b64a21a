//! Mock alt text provider for running without an API key

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

use crate::errors::Result;
use crate::vision::provider::AltTextProvider;
use crate::vision::upload::ImageUpload;

/// Canned responses the mock picks from
pub const MOCK_RESPONSES: [&str; 10] = [
    "A person working on a laptop computer in a bright, modern office space",
    "Beautiful sunset landscape with mountains and colorful sky in the background",
    "Close-up portrait of a happy golden retriever dog sitting outdoors on grass",
    "Modern kitchen interior with white cabinets and stainless steel appliances",
    "Group of friends enjoying dinner together at a restaurant table",
    "Serene mountain lake surrounded by pine trees under a clear blue sky",
    "Vintage red bicycle leaning against a brick wall covered with green ivy",
    "Professional woman giving a business presentation to colleagues in conference room",
    "Fresh vegetables and fruits arranged colorfully on a wooden cutting board",
    "Cozy living room with comfortable sofa, plants, and warm lighting",
];

/// Picks a random canned description after an optional delay
pub struct MockAltTextProvider {
    rng: Mutex<StdRng>,
    delay: Duration,
}

impl MockAltTextProvider {
    /// Entropy-seeded mock
    pub fn new(delay: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            delay,
        }
    }

    /// Deterministic mock for tests
    pub fn seeded(seed: u64, delay: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            delay,
        }
    }

    fn pick(&self) -> &'static str {
        let index = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..MOCK_RESPONSES.len()),
            Err(poisoned) => poisoned.into_inner().gen_range(0..MOCK_RESPONSES.len()),
        };
        MOCK_RESPONSES[index]
    }
}

#[async_trait]
impl AltTextProvider for MockAltTextProvider {
    async fn generate(&self, _image: &ImageUpload) -> Result<String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.pick().to_string())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::upload::UploadLimits;
    use bytes::Bytes;

    fn image() -> ImageUpload {
        ImageUpload::validate("image/png", Bytes::from_static(b"png"), UploadLimits::default()).unwrap()
    }

    #[tokio::test]
    async fn test_returns_table_entry() {
        let mock = MockAltTextProvider::new(Duration::ZERO);
        let text = mock.generate(&image()).await.unwrap();
        assert!(MOCK_RESPONSES.contains(&text.as_str()));
    }

    #[tokio::test]
    async fn test_same_seed_same_sequence() {
        let a = MockAltTextProvider::seeded(42, Duration::ZERO);
        let b = MockAltTextProvider::seeded(42, Duration::ZERO);

        for _ in 0..5 {
            assert_eq!(a.generate(&image()).await.unwrap(), b.generate(&image()).await.unwrap());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_applied() {
        let mock = MockAltTextProvider::seeded(1, Duration::from_millis(1500));
        let start = tokio::time::Instant::now();
        mock.generate(&image()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }
}
